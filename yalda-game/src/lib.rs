//! Yalda Game Engine
//!
//! Platform-agnostic scoring and progression core for the Yalda 2077 quiz.
//! This crate holds the phase state machine, the four stage scorers, stats
//! aggregation, leaderboard, prize wheel and the report collaborator seam,
//! without any UI or platform-specific dependencies.

pub mod aggregate;
pub mod audio;
pub mod classes;
pub mod config;
mod constants;
pub mod countdown;
pub mod data;
pub mod leaderboard;
pub mod numbers;
pub mod phase;
pub mod report;
pub mod result;
pub mod reward;
pub mod rng;
pub mod session;
pub mod stage;
pub mod stats;

// Re-export commonly used types
pub use aggregate::{GoldChange, StatsDelta, merge, title_for_score};
pub use audio::{AudioBackend, MusicToggle, SilentBackend};
pub use classes::{CharacterClass, ClassList, ClassPreset, ClassStart};
pub use config::{
    AnalysisConfig, ArenaConfig, ConfigError, InsightConfig, PitchConfig, RewardConfig,
    ScoringConfig, SessionConfig, TitleConfig,
};
pub use countdown::Countdown;
pub use data::{
    AnalysisBank, AnalysisQuestion, ArenaBank, ArenaOption, ArenaScenario, ContentError,
    InsightOption, InsightPool, InsightQuestion, QuizContent,
};
pub use leaderboard::{BoardSeed, LeaderboardEntry, build_leaderboard, player_rank};
pub use phase::GamePhase;
pub use report::{
    ExportError, GenerationError, OfflineGenerator, ReportService, TextGenerator, export_report,
    report_file_name, static_report,
};
#[cfg(feature = "async")]
pub use report::{AsyncReportService, AsyncTextGenerator};
pub use result::{HudSnapshot, ResultSummary, result_summary};
pub use reward::{PrizeWheel, RewardChest, RewardError, claim_message};
pub use rng::RngBundle;
pub use session::{SessionController, SessionError, SessionState, TransitionTicket};
pub use stage::{
    ActiveStage, AnalysisStage, ArenaStage, CaptureEvent, CaptureMode, InsightStage, PitchStage,
    ShieldState, Stage, StageCompletion, StageError, StageInput, StagePrompt, StageStep,
    frame_energy, synthetic_frame,
};
pub use stats::{Analysis, InventoryItem, ItemKind, PlayerStats};

/// Source of quiz content and tuning, so hosts can ship their own questions.
pub trait ContentLoader {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Load questions, scenarios, board seeds, prizes and class presets
    ///
    /// # Errors
    ///
    /// Returns an error if the content cannot be loaded.
    fn load_content(&self) -> Result<QuizContent, Self::Error>;

    /// Load scoring configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be loaded or parsed.
    fn load_config(&self) -> Result<ScoringConfig, Self::Error>;
}

/// Loader backed by the content embedded in this crate and default tuning.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticContent;

impl ContentLoader for StaticContent {
    type Error = ContentError;

    fn load_content(&self) -> Result<QuizContent, Self::Error> {
        QuizContent::load_from_static()
    }

    fn load_config(&self) -> Result<ScoringConfig, Self::Error> {
        Ok(ScoringConfig::default())
    }
}

/// Creates sessions from validated content.
pub struct YaldaEngine<L>
where
    L: ContentLoader,
{
    loader: L,
}

impl<L> YaldaEngine<L>
where
    L: ContentLoader,
{
    pub const fn new(loader: L) -> Self {
        Self { loader }
    }

    /// Create a fresh session in the intro phase
    ///
    /// # Errors
    ///
    /// Returns an error if content or configuration fails to load or validate.
    pub fn create_session(&self, seed: u64) -> Result<SessionController, anyhow::Error>
    where
        L::Error: Into<anyhow::Error>,
    {
        let content = self.loader.load_content().map_err(Into::into)?;
        let cfg = self.loader.load_config().map_err(Into::into)?;
        cfg.validate()?;
        content.validate(cfg.insight.sample_size)?;
        Ok(SessionController::new(content, cfg, seed))
    }
}
