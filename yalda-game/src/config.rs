//! Tunable scoring configuration.
//!
//! Every magnitude used by the stage scorers lives here so balance changes do
//! not require touching the scoring rules themselves.
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{
    ADVANCE_DELAY_MS, ANALYSIS_COMBO_STEP, ANALYSIS_FAST_BONUS, ANALYSIS_FAST_THRESHOLD,
    ANALYSIS_GOLD_PER_POINT, ANALYSIS_PROBLEM_THRESHOLD, ANALYSIS_QUESTION_TICKS,
    ARENA_BONUS_PER_HP, ARENA_FEEDBACK_DELAY_MS, ARENA_RECOVERY_HP, ARENA_VICTORY_GOLD,
    CELEBRATION_THRESHOLD, DEFAULT_ENEMY_HP, INSIGHT_GOLD_PER_POINT, INSIGHT_SAMPLE_SIZE,
    PITCH_GOLD_REWARD, PITCH_MAX_SCORE, PITCH_MERCY_SCORE, PITCH_MERCY_THRESHOLD,
    PITCH_PEAK_SCALE, PITCH_SCORE_MULTIPLIER, PITCH_SIMULATED_SCORE, PITCH_TICKS,
    PRIZES_PER_SESSION, START_DELAY_MS, TITLE_LOW, TITLE_MID, TITLE_MID_THRESHOLD, TITLE_TOP,
    TITLE_TOP_THRESHOLD,
};

/// Errors raised when scoring configuration invariants are violated.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{field} must be at least {min} (got {value})")]
    MinViolation {
        field: &'static str,
        min: f64,
        value: f64,
    },
    #[error("{field} must be between {min} and {max} (got {value})")]
    RangeViolation {
        field: &'static str,
        min: f64,
        max: f64,
        value: f64,
    },
    #[error("title thresholds must ascend (mid {mid} >= top {top})")]
    TitleThresholds { mid: i32, top: i32 },
    #[error("invalid configuration json: {0}")]
    Parse(String),
}

/// Delays imposed by the session controller around phase transitions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "SessionConfig::default_start_delay_ms")]
    pub start_delay_ms: u64,
    #[serde(default = "SessionConfig::default_advance_delay_ms")]
    pub advance_delay_ms: u64,
}

impl SessionConfig {
    const fn default_start_delay_ms() -> u64 {
        START_DELAY_MS
    }

    const fn default_advance_delay_ms() -> u64 {
        ADVANCE_DELAY_MS
    }

    /// Configuration without artificial delays, used by automated runs.
    #[must_use]
    pub const fn instant() -> Self {
        Self {
            start_delay_ms: 0,
            advance_delay_ms: 0,
        }
    }

    #[must_use]
    pub const fn start_delay(&self) -> Duration {
        Duration::from_millis(self.start_delay_ms)
    }

    #[must_use]
    pub const fn advance_delay(&self) -> Duration {
        Duration::from_millis(self.advance_delay_ms)
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            start_delay_ms: Self::default_start_delay_ms(),
            advance_delay_ms: Self::default_advance_delay_ms(),
        }
    }
}

/// Stage 1 combo/timer scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    #[serde(default = "AnalysisConfig::default_question_ticks")]
    pub question_ticks: u32,
    /// Answers strictly above this many remaining ticks earn the fast bonus.
    #[serde(default = "AnalysisConfig::default_fast_threshold")]
    pub fast_threshold: u32,
    #[serde(default = "AnalysisConfig::default_fast_bonus")]
    pub fast_bonus: f64,
    #[serde(default = "AnalysisConfig::default_combo_step")]
    pub combo_step: f64,
    #[serde(default = "AnalysisConfig::default_gold_per_point")]
    pub gold_per_point: i32,
    /// Stage totals below this are diagnosed as an infrastructure problem.
    #[serde(default = "AnalysisConfig::default_problem_threshold")]
    pub problem_threshold: i32,
}

impl AnalysisConfig {
    const fn default_question_ticks() -> u32 {
        ANALYSIS_QUESTION_TICKS
    }

    const fn default_fast_threshold() -> u32 {
        ANALYSIS_FAST_THRESHOLD
    }

    const fn default_fast_bonus() -> f64 {
        ANALYSIS_FAST_BONUS
    }

    const fn default_combo_step() -> f64 {
        ANALYSIS_COMBO_STEP
    }

    const fn default_gold_per_point() -> i32 {
        ANALYSIS_GOLD_PER_POINT
    }

    const fn default_problem_threshold() -> i32 {
        ANALYSIS_PROBLEM_THRESHOLD
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.question_ticks == 0 {
            return Err(ConfigError::MinViolation {
                field: "analysis.question_ticks",
                min: 1.0,
                value: 0.0,
            });
        }
        if !(1.0..=10.0).contains(&self.fast_bonus) {
            return Err(ConfigError::RangeViolation {
                field: "analysis.fast_bonus",
                min: 1.0,
                max: 10.0,
                value: self.fast_bonus,
            });
        }
        if !(0.0..=1.0).contains(&self.combo_step) {
            return Err(ConfigError::RangeViolation {
                field: "analysis.combo_step",
                min: 0.0,
                max: 1.0,
                value: self.combo_step,
            });
        }
        Ok(())
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            question_ticks: Self::default_question_ticks(),
            fast_threshold: Self::default_fast_threshold(),
            fast_bonus: Self::default_fast_bonus(),
            combo_step: Self::default_combo_step(),
            gold_per_point: Self::default_gold_per_point(),
            problem_threshold: Self::default_problem_threshold(),
        }
    }
}

/// Stage 2 battle tuning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArenaConfig {
    #[serde(default = "ArenaConfig::default_enemy_hp")]
    pub enemy_hp: i32,
    #[serde(default = "ArenaConfig::default_recovery_hp")]
    pub recovery_hp: i32,
    #[serde(default = "ArenaConfig::default_bonus_per_hp")]
    pub bonus_per_hp: i32,
    #[serde(default = "ArenaConfig::default_victory_gold")]
    pub victory_gold: i32,
    #[serde(default = "ArenaConfig::default_feedback_delay_ms")]
    pub feedback_delay_ms: u64,
}

impl ArenaConfig {
    const fn default_enemy_hp() -> i32 {
        DEFAULT_ENEMY_HP
    }

    const fn default_recovery_hp() -> i32 {
        ARENA_RECOVERY_HP
    }

    const fn default_bonus_per_hp() -> i32 {
        ARENA_BONUS_PER_HP
    }

    const fn default_victory_gold() -> i32 {
        ARENA_VICTORY_GOLD
    }

    const fn default_feedback_delay_ms() -> u64 {
        ARENA_FEEDBACK_DELAY_MS
    }

    #[must_use]
    pub const fn feedback_delay(&self) -> Duration {
        Duration::from_millis(self.feedback_delay_ms)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.enemy_hp < 1 {
            return Err(ConfigError::MinViolation {
                field: "arena.enemy_hp",
                min: 1.0,
                value: f64::from(self.enemy_hp),
            });
        }
        if self.recovery_hp < 1 {
            return Err(ConfigError::MinViolation {
                field: "arena.recovery_hp",
                min: 1.0,
                value: f64::from(self.recovery_hp),
            });
        }
        Ok(())
    }
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            enemy_hp: Self::default_enemy_hp(),
            recovery_hp: Self::default_recovery_hp(),
            bonus_per_hp: Self::default_bonus_per_hp(),
            victory_gold: Self::default_victory_gold(),
            feedback_delay_ms: Self::default_feedback_delay_ms(),
        }
    }
}

/// Stage 3 sampling tuning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsightConfig {
    #[serde(default = "InsightConfig::default_sample_size")]
    pub sample_size: usize,
    #[serde(default = "InsightConfig::default_gold_per_point")]
    pub gold_per_point: i32,
}

impl InsightConfig {
    const fn default_sample_size() -> usize {
        INSIGHT_SAMPLE_SIZE
    }

    const fn default_gold_per_point() -> i32 {
        INSIGHT_GOLD_PER_POINT
    }
}

impl Default for InsightConfig {
    fn default() -> Self {
        Self {
            sample_size: Self::default_sample_size(),
            gold_per_point: Self::default_gold_per_point(),
        }
    }
}

/// Stage 4 capture tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PitchConfig {
    #[serde(default = "PitchConfig::default_ticks")]
    pub ticks: u32,
    /// Peak energy that maps to a full score.
    #[serde(default = "PitchConfig::default_peak_scale")]
    pub peak_scale: f64,
    #[serde(default = "PitchConfig::default_max_score")]
    pub max_score: u32,
    #[serde(default = "PitchConfig::default_mercy_threshold")]
    pub mercy_threshold: u32,
    #[serde(default = "PitchConfig::default_mercy_score")]
    pub mercy_score: u32,
    #[serde(default = "PitchConfig::default_simulated_score")]
    pub simulated_score: u32,
    #[serde(default = "PitchConfig::default_score_multiplier")]
    pub score_multiplier: i32,
    #[serde(default = "PitchConfig::default_gold_reward")]
    pub gold_reward: i32,
}

impl PitchConfig {
    const fn default_ticks() -> u32 {
        PITCH_TICKS
    }

    const fn default_peak_scale() -> f64 {
        PITCH_PEAK_SCALE
    }

    const fn default_max_score() -> u32 {
        PITCH_MAX_SCORE
    }

    const fn default_mercy_threshold() -> u32 {
        PITCH_MERCY_THRESHOLD
    }

    const fn default_mercy_score() -> u32 {
        PITCH_MERCY_SCORE
    }

    const fn default_simulated_score() -> u32 {
        PITCH_SIMULATED_SCORE
    }

    const fn default_score_multiplier() -> i32 {
        PITCH_SCORE_MULTIPLIER
    }

    const fn default_gold_reward() -> i32 {
        PITCH_GOLD_REWARD
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.ticks == 0 {
            return Err(ConfigError::MinViolation {
                field: "pitch.ticks",
                min: 1.0,
                value: 0.0,
            });
        }
        if self.peak_scale.is_nan() || self.peak_scale <= 0.0 {
            return Err(ConfigError::MinViolation {
                field: "pitch.peak_scale",
                min: f64::EPSILON,
                value: self.peak_scale,
            });
        }
        if self.mercy_score > self.max_score {
            return Err(ConfigError::RangeViolation {
                field: "pitch.mercy_score",
                min: 0.0,
                max: f64::from(self.max_score),
                value: f64::from(self.mercy_score),
            });
        }
        Ok(())
    }
}

impl Default for PitchConfig {
    fn default() -> Self {
        Self {
            ticks: Self::default_ticks(),
            peak_scale: Self::default_peak_scale(),
            max_score: Self::default_max_score(),
            mercy_threshold: Self::default_mercy_threshold(),
            mercy_score: Self::default_mercy_score(),
            simulated_score: Self::default_simulated_score(),
            score_multiplier: Self::default_score_multiplier(),
            gold_reward: Self::default_gold_reward(),
        }
    }
}

/// Title tiers keyed by cumulative quiz score. Thresholds are inclusive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TitleConfig {
    #[serde(default = "TitleConfig::default_low")]
    pub low: String,
    #[serde(default = "TitleConfig::default_mid")]
    pub mid: String,
    #[serde(default = "TitleConfig::default_top")]
    pub top: String,
    #[serde(default = "TitleConfig::default_mid_threshold")]
    pub mid_threshold: i32,
    #[serde(default = "TitleConfig::default_top_threshold")]
    pub top_threshold: i32,
}

impl TitleConfig {
    fn default_low() -> String {
        TITLE_LOW.to_string()
    }

    fn default_mid() -> String {
        TITLE_MID.to_string()
    }

    fn default_top() -> String {
        TITLE_TOP.to_string()
    }

    const fn default_mid_threshold() -> i32 {
        TITLE_MID_THRESHOLD
    }

    const fn default_top_threshold() -> i32 {
        TITLE_TOP_THRESHOLD
    }

    /// Title earned by a cumulative score.
    #[must_use]
    pub fn title_for(&self, score: i32) -> &str {
        if score >= self.top_threshold {
            &self.top
        } else if score >= self.mid_threshold {
            &self.mid
        } else {
            &self.low
        }
    }
}

impl Default for TitleConfig {
    fn default() -> Self {
        Self {
            low: Self::default_low(),
            mid: Self::default_mid(),
            top: Self::default_top(),
            mid_threshold: Self::default_mid_threshold(),
            top_threshold: Self::default_top_threshold(),
        }
    }
}

/// Result screen and prize wheel tuning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardConfig {
    /// Final scores strictly above this trigger the celebration.
    #[serde(default = "RewardConfig::default_celebration_threshold")]
    pub celebration_threshold: i32,
    #[serde(default = "RewardConfig::default_prizes_per_session")]
    pub prizes_per_session: u32,
}

impl RewardConfig {
    const fn default_celebration_threshold() -> i32 {
        CELEBRATION_THRESHOLD
    }

    const fn default_prizes_per_session() -> u32 {
        PRIZES_PER_SESSION
    }
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self {
            celebration_threshold: Self::default_celebration_threshold(),
            prizes_per_session: Self::default_prizes_per_session(),
        }
    }
}

/// Full scoring configuration for a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ScoringConfig {
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub arena: ArenaConfig,
    #[serde(default)]
    pub insight: InsightConfig,
    #[serde(default)]
    pub pitch: PitchConfig,
    #[serde(default)]
    pub titles: TitleConfig,
    #[serde(default)]
    pub rewards: RewardConfig,
}

impl ScoringConfig {
    /// Load a configuration from JSON; absent fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Parse` for malformed JSON and any validation error
    /// raised by [`ScoringConfig::validate`].
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let cfg: Self =
            serde_json::from_str(json).map_err(|err| ConfigError::Parse(err.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Check every section against its documented bounds.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when any field violates the documented bounds.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.analysis.validate()?;
        self.arena.validate()?;
        self.pitch.validate()?;
        if self.insight.sample_size == 0 {
            return Err(ConfigError::MinViolation {
                field: "insight.sample_size",
                min: 1.0,
                value: 0.0,
            });
        }
        if self.rewards.prizes_per_session == 0 {
            return Err(ConfigError::MinViolation {
                field: "rewards.prizes_per_session",
                min: 1.0,
                value: 0.0,
            });
        }
        if self.titles.mid_threshold >= self.titles.top_threshold {
            return Err(ConfigError::TitleThresholds {
                mid: self.titles.mid_threshold,
                top: self.titles.top_threshold,
            });
        }
        Ok(())
    }

    /// Same tuning with transition delays removed.
    #[must_use]
    pub fn without_delays(mut self) -> Self {
        self.session = SessionConfig::instant();
        self.arena.feedback_delay_ms = 0;
        self
    }
}
