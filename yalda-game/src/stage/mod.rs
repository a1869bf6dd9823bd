//! Stage scorers.
//!
//! Each of the four stages implements [`Stage`]: it is built from a snapshot
//! of the player's stats, consumes player choices one at a time and, once
//! complete, yields a [`StageCompletion`] holding the replacement stats and a
//! history line. [`ActiveStage`] wraps the four variants so hosts can drive
//! whichever stage the session is in through one surface.

pub mod analysis;
pub mod arena;
pub mod insight;
pub mod pitch;

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::ScoringConfig;
use crate::data::{ArenaOption, InsightOption, QuizContent};
use crate::phase::GamePhase;
use crate::rng::RngBundle;
use crate::stats::PlayerStats;

pub use analysis::AnalysisStage;
pub use arena::{ArenaStage, ShieldState};
pub use insight::InsightStage;
pub use pitch::{CaptureEvent, CaptureMode, PitchStage, frame_energy, synthetic_frame};

/// Errors raised when a stage receives input it cannot accept.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StageError {
    #[error("stage already complete")]
    Complete,
    #[error("waiting for feedback to resolve before the next choice")]
    FeedbackPending,
    #[error("no feedback is pending")]
    NothingPending,
    #[error("option {index} out of range ({available} available)")]
    InvalidOption { index: usize, available: usize },
    #[error("shield already used this stage")]
    ShieldSpent,
    #[error("capture has not started")]
    CaptureNotStarted,
    #[error("input {input} does not apply to the {phase} stage")]
    WrongInput {
        phase: GamePhase,
        input: &'static str,
    },
}

/// Result of feeding one choice into a stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StageStep {
    /// Points (or damage, in the arena) produced by the choice.
    pub points: i32,
    /// Delay the host must wait before calling `resolve`.
    pub pending: Option<Duration>,
    pub complete: bool,
}

impl StageStep {
    #[must_use]
    pub const fn scored(points: i32, complete: bool) -> Self {
        Self {
            points,
            pending: None,
            complete,
        }
    }
}

/// Replacement stats plus the history line for the session log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageCompletion {
    pub stats: PlayerStats,
    pub log: String,
}

/// What the host should currently show for a stage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StagePrompt<'a> {
    YesNo {
        index: usize,
        total: usize,
        text: &'a str,
        remaining: u32,
        combo: u32,
    },
    Battle {
        index: usize,
        total: usize,
        prompt: &'a str,
        options: &'a [ArenaOption; 3],
        player_hp: i32,
        enemy_hp: i32,
        shield: ShieldState,
    },
    Choice {
        index: usize,
        total: usize,
        prompt: &'a str,
        options: &'a [InsightOption; 3],
    },
    Capture {
        mode: CaptureMode,
        remaining: u32,
        peak: f64,
    },
}

/// Shared capability set of the four stage scorers.
pub trait Stage {
    type Choice;

    /// Current prompt, or `None` once the stage is complete.
    fn present(&self) -> Option<StagePrompt<'_>>;

    /// Score one choice.
    ///
    /// # Errors
    ///
    /// Returns `StageError` when the stage cannot accept the choice.
    fn score(&mut self, choice: Self::Choice) -> Result<StageStep, StageError>;

    fn is_complete(&self) -> bool;

    /// Replacement stats and log line, available once complete.
    fn completion(&self) -> Option<StageCompletion>;

    /// One timer tick. Stages without timers ignore it.
    fn tick(&mut self) {}

    /// Stop any timer so late ticks are ignored.
    fn cancel_timers(&mut self) {}
}

/// Uniform input for [`ActiveStage::apply`].
#[derive(Debug, Clone, PartialEq)]
pub enum StageInput {
    Answer(bool),
    Pick(usize),
    ArmShield,
    Capture(CaptureEvent),
}

impl StageInput {
    const fn label(&self) -> &'static str {
        match self {
            Self::Answer(_) => "answer",
            Self::Pick(_) => "pick",
            Self::ArmShield => "arm-shield",
            Self::Capture(_) => "capture",
        }
    }
}

/// The stage for the session's current phase.
#[derive(Debug, Clone)]
pub enum ActiveStage {
    Analysis(AnalysisStage),
    Arena(ArenaStage),
    Insight(InsightStage),
    Pitch(PitchStage),
}

impl ActiveStage {
    /// Build the stage matching `phase`. Non-stage phases yield `None`.
    #[must_use]
    pub fn build(
        phase: GamePhase,
        stats: &PlayerStats,
        content: &QuizContent,
        cfg: &ScoringConfig,
        rng: &mut RngBundle,
    ) -> Option<Self> {
        match phase {
            GamePhase::Analysis => Some(Self::Analysis(AnalysisStage::new(
                stats,
                &content.analysis,
                &cfg.analysis,
            ))),
            GamePhase::Arena => Some(Self::Arena(ArenaStage::new(
                stats,
                &content.arena,
                &cfg.arena,
            ))),
            GamePhase::Insight => Some(Self::Insight(InsightStage::new(
                stats,
                &content.insight,
                &cfg.insight,
                &cfg.titles,
                rng.insight(),
            ))),
            GamePhase::Pitch => Some(Self::Pitch(PitchStage::new(stats, &cfg.pitch))),
            GamePhase::Intro | GamePhase::Result => None,
        }
    }

    #[must_use]
    pub const fn phase(&self) -> GamePhase {
        match self {
            Self::Analysis(_) => GamePhase::Analysis,
            Self::Arena(_) => GamePhase::Arena,
            Self::Insight(_) => GamePhase::Insight,
            Self::Pitch(_) => GamePhase::Pitch,
        }
    }

    #[must_use]
    pub fn present(&self) -> Option<StagePrompt<'_>> {
        match self {
            Self::Analysis(stage) => stage.present(),
            Self::Arena(stage) => stage.present(),
            Self::Insight(stage) => stage.present(),
            Self::Pitch(stage) => stage.present(),
        }
    }

    /// Route one input to the wrapped stage.
    ///
    /// # Errors
    ///
    /// Returns `StageError::WrongInput` when the input kind does not belong to
    /// this stage, or whatever the stage itself rejects.
    pub fn apply(&mut self, input: StageInput) -> Result<StageStep, StageError> {
        let phase = self.phase();
        match (self, input) {
            (Self::Analysis(stage), StageInput::Answer(yes)) => stage.score(yes),
            (Self::Arena(stage), StageInput::Pick(index)) => stage.score(index),
            (Self::Arena(stage), StageInput::ArmShield) => {
                stage.arm_shield().map(|()| StageStep::default())
            }
            (Self::Insight(stage), StageInput::Pick(index)) => stage.score(index),
            (Self::Pitch(stage), StageInput::Capture(event)) => stage.score(event),
            (_, other) => Err(StageError::WrongInput {
                phase,
                input: other.label(),
            }),
        }
    }

    /// Finish a pending feedback delay (arena only).
    ///
    /// # Errors
    ///
    /// Returns `StageError::NothingPending` when no delay is outstanding.
    pub fn resolve(&mut self) -> Result<StageStep, StageError> {
        match self {
            Self::Arena(stage) => stage.resolve(),
            _ => Err(StageError::NothingPending),
        }
    }

    pub fn tick(&mut self) {
        match self {
            Self::Analysis(stage) => stage.tick(),
            Self::Arena(stage) => stage.tick(),
            Self::Insight(stage) => stage.tick(),
            Self::Pitch(stage) => stage.tick(),
        }
    }

    pub fn cancel_timers(&mut self) {
        match self {
            Self::Analysis(stage) => stage.cancel_timers(),
            Self::Arena(stage) => stage.cancel_timers(),
            Self::Insight(stage) => stage.cancel_timers(),
            Self::Pitch(stage) => stage.cancel_timers(),
        }
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        match self {
            Self::Analysis(stage) => stage.is_complete(),
            Self::Arena(stage) => stage.is_complete(),
            Self::Insight(stage) => stage.is_complete(),
            Self::Pitch(stage) => stage.is_complete(),
        }
    }

    #[must_use]
    pub fn completion(&self) -> Option<StageCompletion> {
        match self {
            Self::Analysis(stage) => stage.completion(),
            Self::Arena(stage) => stage.completion(),
            Self::Insight(stage) => stage.completion(),
            Self::Pitch(stage) => stage.completion(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(phase: GamePhase) -> Option<ActiveStage> {
        let content = QuizContent::load_from_static().unwrap();
        let cfg = ScoringConfig::default();
        let mut rng = RngBundle::from_user_seed(1);
        ActiveStage::build(phase, &PlayerStats::default(), &content, &cfg, &mut rng)
    }

    #[test]
    fn builds_one_stage_per_scoring_phase() {
        for phase in GamePhase::ORDER {
            let stage = build(phase);
            assert_eq!(stage.as_ref().map(ActiveStage::phase), phase.is_stage().then_some(phase));
        }
    }

    #[test]
    fn wrong_input_is_rejected() {
        let mut stage = build(GamePhase::Analysis).unwrap();
        assert_eq!(
            stage.apply(StageInput::Pick(0)),
            Err(StageError::WrongInput {
                phase: GamePhase::Analysis,
                input: "pick"
            })
        );
        assert_eq!(stage.resolve(), Err(StageError::NothingPending));
    }

    #[test]
    fn present_reports_matching_prompt_shape() {
        let analysis = build(GamePhase::Analysis).unwrap();
        assert!(matches!(
            analysis.present(),
            Some(StagePrompt::YesNo { index: 0, total: 20, remaining: 10, .. })
        ));
        let arena = build(GamePhase::Arena).unwrap();
        assert!(matches!(
            arena.present(),
            Some(StagePrompt::Battle { total: 5, enemy_hp: 100, .. })
        ));
        let insight = build(GamePhase::Insight).unwrap();
        assert!(matches!(insight.present(), Some(StagePrompt::Choice { total: 3, .. })));
        let pitch = build(GamePhase::Pitch).unwrap();
        assert!(matches!(
            pitch.present(),
            Some(StagePrompt::Capture { mode: CaptureMode::Idle, remaining: 10, .. })
        ));
    }
}
