//! Stage 2: fixed-branch scenario battle against the market boss.
use log::{debug, info};
use serde::{Deserialize, Serialize};

use super::{Stage, StageCompletion, StageError, StagePrompt, StageStep};
use crate::aggregate::{GoldChange, StatsDelta, merge};
use crate::config::ArenaConfig;
use crate::constants::{COMBO_BASELINE, LOG_TARGET};
use crate::data::{ArenaBank, ArenaScenario};
use crate::stats::PlayerStats;

/// Single-use protection against self damage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShieldState {
    #[default]
    Available,
    Armed,
    Spent,
}

/// Outcome of the last choice, held until the feedback delay resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArenaFeedback {
    pub damage: i32,
    pub self_damage: i32,
    pub shielded: bool,
    pub knocked_down: bool,
}

#[derive(Debug, Clone)]
pub struct ArenaStage {
    scenarios: Vec<ArenaScenario>,
    cfg: ArenaConfig,
    baseline: PlayerStats,
    index: usize,
    player_hp: i32,
    max_hp: i32,
    enemy_hp: i32,
    shield: ShieldState,
    pending: Option<ArenaFeedback>,
    knockdowns: u32,
    finished: bool,
}

impl ArenaStage {
    #[must_use]
    pub fn new(stats: &PlayerStats, bank: &ArenaBank, cfg: &ArenaConfig) -> Self {
        let player_hp = if stats.hp > 0 { stats.hp } else { stats.max_hp };
        Self {
            scenarios: bank.scenarios.clone(),
            cfg: cfg.clone(),
            baseline: stats.clone(),
            index: 0,
            player_hp,
            max_hp: stats.max_hp,
            enemy_hp: cfg.enemy_hp,
            shield: ShieldState::Available,
            pending: None,
            knockdowns: 0,
            finished: bank.scenarios.is_empty(),
        }
    }

    /// Arm the shield for the next choice.
    ///
    /// # Errors
    ///
    /// Returns `StageError::ShieldSpent` once the shield has been consumed, and
    /// the usual completion/feedback errors when no choice can follow.
    pub fn arm_shield(&mut self) -> Result<(), StageError> {
        self.ensure_accepting()?;
        match self.shield {
            ShieldState::Spent => Err(StageError::ShieldSpent),
            ShieldState::Available | ShieldState::Armed => {
                self.shield = ShieldState::Armed;
                Ok(())
            }
        }
    }

    /// Close the feedback window opened by the last choice.
    ///
    /// A knockdown replays the same scenario. Otherwise moves to the next
    /// scenario, or finishes the stage when the enemy is down or the
    /// scenarios are exhausted.
    ///
    /// # Errors
    ///
    /// Returns `StageError::NothingPending` when no choice awaits resolution.
    pub fn resolve(&mut self) -> Result<StageStep, StageError> {
        let Some(feedback) = self.pending.take() else {
            return Err(StageError::NothingPending);
        };
        if feedback.knocked_down {
            info!(
                target: LOG_TARGET,
                "knocked down on scenario {}, replaying at {} hp",
                self.index + 1,
                self.player_hp
            );
        } else if self.enemy_hp <= 0 || self.index + 1 >= self.scenarios.len() {
            self.finished = true;
            info!(
                target: LOG_TARGET,
                "arena finished after {} scenarios: hp {}, enemy {}",
                self.index + 1,
                self.player_hp,
                self.enemy_hp
            );
        } else {
            self.index += 1;
        }
        Ok(StageStep::scored(feedback.damage, self.finished))
    }

    #[must_use]
    pub const fn player_hp(&self) -> i32 {
        self.player_hp
    }

    #[must_use]
    pub const fn enemy_hp(&self) -> i32 {
        self.enemy_hp
    }

    #[must_use]
    pub const fn shield(&self) -> ShieldState {
        self.shield
    }

    #[must_use]
    pub const fn feedback(&self) -> Option<ArenaFeedback> {
        self.pending
    }

    /// Times the player hit 0 hp and recovered.
    #[must_use]
    pub const fn knockdowns(&self) -> u32 {
        self.knockdowns
    }

    const fn ensure_accepting(&self) -> Result<(), StageError> {
        if self.finished {
            return Err(StageError::Complete);
        }
        if self.pending.is_some() {
            return Err(StageError::FeedbackPending);
        }
        Ok(())
    }
}

impl Stage for ArenaStage {
    /// Index of the chosen option.
    type Choice = usize;

    fn present(&self) -> Option<StagePrompt<'_>> {
        if self.finished {
            return None;
        }
        let scenario = self.scenarios.get(self.index)?;
        Some(StagePrompt::Battle {
            index: self.index,
            total: self.scenarios.len(),
            prompt: &scenario.prompt,
            options: &scenario.options,
            player_hp: self.player_hp,
            enemy_hp: self.enemy_hp,
            shield: self.shield,
        })
    }

    fn score(&mut self, choice: usize) -> Result<StageStep, StageError> {
        self.ensure_accepting()?;
        let scenario = self.scenarios.get(self.index).ok_or(StageError::Complete)?;
        let available = scenario.options.len();
        let option = scenario
            .options
            .get(choice)
            .ok_or(StageError::InvalidOption {
                index: choice,
                available,
            })?;
        let damage = option.damage.max(0);
        let mut self_damage = option.self_damage.max(0);

        let shielded = self.shield == ShieldState::Armed && self_damage > 0;
        if shielded {
            self_damage = 0;
            self.shield = ShieldState::Spent;
        }

        self.enemy_hp = (self.enemy_hp - damage).max(0);
        self.player_hp = (self.player_hp - self_damage).max(0);
        let knocked_down = self.player_hp == 0;
        if knocked_down {
            self.player_hp = self.cfg.recovery_hp.min(self.max_hp);
            self.knockdowns += 1;
        }
        debug!(
            target: LOG_TARGET,
            "arena scenario {} option {}: dealt {}, took {}{} -> hp {}, enemy {}",
            self.index + 1,
            choice,
            damage,
            self_damage,
            if shielded { " (shielded)" } else { "" },
            self.player_hp,
            self.enemy_hp
        );

        self.pending = Some(ArenaFeedback {
            damage,
            self_damage,
            shielded,
            knocked_down,
        });
        Ok(StageStep {
            points: damage,
            pending: Some(self.cfg.feedback_delay()),
            complete: false,
        })
    }

    fn is_complete(&self) -> bool {
        self.finished
    }

    fn completion(&self) -> Option<StageCompletion> {
        if !self.finished {
            return None;
        }
        let delta = StatsDelta {
            quiz_score_gain: self.player_hp.saturating_mul(self.cfg.bonus_per_hp),
            gold: GoldChange::Add(self.cfg.victory_gold),
            hp: Some(self.player_hp),
            enemy_hp: Some(0),
            combo_multiplier: Some(COMBO_BASELINE),
            ..StatsDelta::default()
        };
        Some(StageCompletion {
            stats: merge(&self.baseline, &delta),
            log: format!("Arena Victory. HP Left: {}", self.player_hp),
        })
    }
}
