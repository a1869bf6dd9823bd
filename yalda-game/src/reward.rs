//! Prize wheel, claim message and the invite-locked reward chest.
use log::{info, warn};
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::LOG_TARGET;
use crate::stats::PlayerStats;

const INVITE_MESSAGE: &str = "Join the Yalda 2077 business battle and find your path to success!";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RewardError {
    #[error("prize already drawn this session: {0}")]
    AlreadyDrawn(String),
    #[error("the prize wheel has no prizes")]
    NoPrizes,
}

/// Uniform draw over the named prizes, limited per session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrizeWheel {
    prizes: Vec<String>,
    limit: u32,
    won: Vec<String>,
}

impl PrizeWheel {
    #[must_use]
    pub fn new(prizes: Vec<String>, limit: u32) -> Self {
        Self {
            prizes,
            limit,
            won: Vec::new(),
        }
    }

    /// Spin the wheel once.
    ///
    /// # Errors
    ///
    /// Returns `RewardError::AlreadyDrawn` once the session's draws are used
    /// up, and `RewardError::NoPrizes` for an empty wheel.
    pub fn spin<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<&str, RewardError> {
        if self.draws_left() == 0 {
            let last = self.won.last().cloned().unwrap_or_default();
            warn!(target: LOG_TARGET, "prize wheel spun again after winning {last}");
            return Err(RewardError::AlreadyDrawn(last));
        }
        if self.prizes.is_empty() {
            return Err(RewardError::NoPrizes);
        }
        let idx = rng.gen_range(0..self.prizes.len());
        let prize = self.prizes[idx].clone();
        info!(target: LOG_TARGET, "prize wheel landed on {prize}");
        self.won.push(prize);
        Ok(self.won.last().map_or("", String::as_str))
    }

    /// Most recent prize, if any.
    #[must_use]
    pub fn prize(&self) -> Option<&str> {
        self.won.last().map(String::as_str)
    }

    #[must_use]
    pub fn prizes(&self) -> &[String] {
        &self.prizes
    }

    #[must_use]
    pub fn can_spin(&self) -> bool {
        !self.prizes.is_empty() && self.draws_left() > 0
    }

    fn draws_left(&self) -> usize {
        usize::try_from(self.limit)
            .unwrap_or(usize::MAX)
            .saturating_sub(self.won.len())
    }
}

/// Message the player sends to claim a prize.
#[must_use]
pub fn claim_message(stats: &PlayerStats, prize: &str) -> String {
    format!(
        "Hello! I am {}.\nI took part in the Yalda business battle.\n\
         Score: {}\nRank: {}\nPrize won: {}\n\nPlease send me my prize!",
        stats.display_name(),
        stats.quiz_score,
        stats.title,
        prize
    )
}

/// Bonus chest opened by sharing the invite message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardChest {
    locked: bool,
}

impl Default for RewardChest {
    fn default() -> Self {
        Self { locked: true }
    }
}

impl RewardChest {
    #[must_use]
    pub const fn is_locked(&self) -> bool {
        self.locked
    }

    /// Record that the invite was shared and open the chest.
    ///
    /// Returns the invite text for the host to share.
    pub fn share_invite(&mut self) -> &'static str {
        if self.locked {
            info!(target: LOG_TARGET, "invite shared; reward chest unlocked");
        }
        self.locked = false;
        INVITE_MESSAGE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;
    use std::collections::HashMap;

    fn wheel() -> PrizeWheel {
        let prizes = crate::data::QuizContent::load_from_static().unwrap().prizes;
        PrizeWheel::new(prizes, 1)
    }

    #[test]
    fn one_prize_per_session() {
        let mut rng = ChaCha20Rng::seed_from_u64(8);
        let mut wheel = wheel();
        let prize = wheel.spin(&mut rng).unwrap().to_string();
        assert!(wheel.prizes().contains(&prize));
        assert!(!wheel.can_spin());
        assert_eq!(wheel.spin(&mut rng), Err(RewardError::AlreadyDrawn(prize.clone())));
        assert_eq!(wheel.prize(), Some(prize.as_str()));
    }

    #[test]
    fn draw_is_roughly_uniform() {
        let mut rng = ChaCha20Rng::seed_from_u64(21);
        let mut counts: HashMap<String, u32> = HashMap::new();
        let base = wheel();
        for _ in 0..6_000 {
            let mut fresh = base.clone();
            let prize = fresh.spin(&mut rng).unwrap().to_string();
            *counts.entry(prize).or_default() += 1;
        }
        assert_eq!(counts.len(), 6);
        assert!(counts.values().all(|&n| (800..=1_200).contains(&n)));
    }

    #[test]
    fn empty_wheel_reports_no_prizes() {
        let mut rng = ChaCha20Rng::seed_from_u64(1);
        let mut wheel = PrizeWheel::new(Vec::new(), 1);
        assert_eq!(wheel.spin(&mut rng), Err(RewardError::NoPrizes));
        assert!(!wheel.can_spin());
    }

    #[test]
    fn claim_message_names_player_and_prize() {
        let stats = PlayerStats {
            name: "Dara".to_string(),
            quiz_score: 1_234,
            title: "Market Legend".to_string(),
            ..PlayerStats::default()
        };
        let msg = claim_message(&stats, "20% off services");
        assert!(msg.contains("Dara"));
        assert!(msg.contains("1234"));
        assert!(msg.contains("Market Legend"));
        assert!(msg.contains("20% off services"));
    }

    #[test]
    fn chest_unlocks_on_invite() {
        let mut chest = RewardChest::default();
        assert!(chest.is_locked());
        assert!(chest.share_invite().contains("Yalda 2077"));
        assert!(!chest.is_locked());
    }
}
