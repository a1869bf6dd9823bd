//! Result-screen leaderboard: fixed seed entries plus the current player.
use serde::{Deserialize, Serialize};

use crate::stats::PlayerStats;

/// Fixed leaderboard row shipped with the content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardSeed {
    pub name: String,
    pub score: i32,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    /// 1-based position after sorting.
    pub rank: usize,
    pub name: String,
    pub score: i32,
    pub title: String,
    #[serde(default)]
    pub is_player: bool,
}

impl LeaderboardEntry {
    fn from_seed(seed: &BoardSeed) -> Self {
        Self {
            rank: 0,
            name: seed.name.clone(),
            score: seed.score,
            title: seed.title.clone(),
            is_player: false,
        }
    }

    fn from_player(stats: &PlayerStats) -> Self {
        Self {
            rank: 0,
            name: stats.display_name().to_string(),
            score: stats.quiz_score,
            title: stats.title.clone(),
            is_player: true,
        }
    }
}

/// Insert the player among the seeds and rank everyone by descending score.
///
/// The sort is stable and the player is appended last, so a player tying a
/// seed entry ranks below it.
#[must_use]
pub fn build_leaderboard(seeds: &[BoardSeed], player: &PlayerStats) -> Vec<LeaderboardEntry> {
    let mut board: Vec<LeaderboardEntry> = seeds
        .iter()
        .map(LeaderboardEntry::from_seed)
        .chain(std::iter::once(LeaderboardEntry::from_player(player)))
        .collect();
    board.sort_by(|a, b| b.score.cmp(&a.score));
    for (idx, entry) in board.iter_mut().enumerate() {
        entry.rank = idx + 1;
    }
    board
}

/// Rank of the player's row, if present.
#[must_use]
pub fn player_rank(board: &[LeaderboardEntry]) -> Option<usize> {
    board.iter().find(|entry| entry.is_player).map(|entry| entry.rank)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::QuizContent;

    fn player(score: i32) -> PlayerStats {
        PlayerStats {
            name: "Nika".to_string(),
            quiz_score: score,
            title: "Market Legend".to_string(),
            ..PlayerStats::default()
        }
    }

    fn seeds() -> Vec<BoardSeed> {
        QuizContent::load_from_static().unwrap().leaderboard
    }

    #[test]
    fn player_lands_between_seeds() {
        let board = build_leaderboard(&seeds(), &player(2_800));
        assert_eq!(board.len(), 6);
        assert_eq!(player_rank(&board), Some(3));
        let ranks: Vec<usize> = board.iter().map(|e| e.rank).collect();
        assert_eq!(ranks, vec![1, 2, 3, 4, 5, 6]);
        assert!(board.windows(2).all(|pair| pair[0].score >= pair[1].score));
    }

    #[test]
    fn ties_rank_player_below_seed() {
        let board = build_leaderboard(&seeds(), &player(2_950));
        assert_eq!(board[1].name, "Sara SEO");
        assert!(!board[1].is_player);
        assert_eq!(player_rank(&board), Some(3));
    }

    #[test]
    fn low_score_ranks_last_and_high_score_first() {
        assert_eq!(player_rank(&build_leaderboard(&seeds(), &player(10))), Some(6));
        assert_eq!(player_rank(&build_leaderboard(&seeds(), &player(5_000))), Some(1));
    }

    #[test]
    fn blank_name_uses_placeholder() {
        let stats = PlayerStats {
            name: "   ".to_string(),
            ..PlayerStats::default()
        };
        let board = build_leaderboard(&[], &stats);
        assert_eq!(board[0].name, "Player");
        assert_eq!(board[0].rank, 1);
    }
}
