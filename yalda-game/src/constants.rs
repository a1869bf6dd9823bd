//! Centralized balance and tuning defaults for Yalda game logic.
//!
//! These values seed the serde defaults of [`crate::config::ScoringConfig`].
//! Hosts may override them through configuration; the numbers here are the
//! shipped campaign tuning.

// Starting stats -------------------------------------------------------------
pub(crate) const DEFAULT_HP: i32 = 100;
pub(crate) const DEFAULT_ENERGY: i32 = 50;
pub(crate) const DEFAULT_ENEMY_HP: i32 = 100;
pub(crate) const DEFAULT_TITLE: &str = "Novice Merchant";
pub(crate) const COMBO_BASELINE: u32 = 1;
pub(crate) const DEFAULT_PLAYER_NAME: &str = "Player";

// Session timing -------------------------------------------------------------
pub(crate) const START_DELAY_MS: u64 = 3_000;
pub(crate) const ADVANCE_DELAY_MS: u64 = 3_500;

// Stage 1: analysis ------------------------------------------------------------
pub(crate) const ANALYSIS_QUESTION_TICKS: u32 = 10;
pub(crate) const ANALYSIS_FAST_THRESHOLD: u32 = 5;
pub(crate) const ANALYSIS_FAST_BONUS: f64 = 1.5;
pub(crate) const ANALYSIS_COMBO_STEP: f64 = 0.1;
pub(crate) const ANALYSIS_GOLD_PER_POINT: i32 = 10;
pub(crate) const ANALYSIS_PROBLEM_THRESHOLD: i32 = 200;
pub(crate) const ANALYSIS_PROBLEM_LOW: &str = "Infrastructure weakness";
pub(crate) const ANALYSIS_PROBLEM_HIGH: &str = "Scalability challenge";
pub(crate) const ANALYSIS_GOAL: &str = "Improvement";

// Stage 2: arena ---------------------------------------------------------------
pub(crate) const ARENA_RECOVERY_HP: i32 = 50;
pub(crate) const ARENA_BONUS_PER_HP: i32 = 2;
pub(crate) const ARENA_VICTORY_GOLD: i32 = 500;
pub(crate) const ARENA_FEEDBACK_DELAY_MS: u64 = 1_000;

// Stage 3: insight -------------------------------------------------------------
pub(crate) const INSIGHT_SAMPLE_SIZE: usize = 3;
pub(crate) const INSIGHT_GOLD_PER_POINT: i32 = 10;

// Stage 4: pitch ---------------------------------------------------------------
pub(crate) const PITCH_TICKS: u32 = 10;
pub(crate) const PITCH_PEAK_SCALE: f64 = 150.0;
pub(crate) const PITCH_MAX_SCORE: u32 = 100;
pub(crate) const PITCH_MERCY_THRESHOLD: u32 = 40;
pub(crate) const PITCH_MERCY_SCORE: u32 = 50;
pub(crate) const PITCH_SIMULATED_SCORE: u32 = 85;
pub(crate) const PITCH_SCORE_MULTIPLIER: i32 = 5;
pub(crate) const PITCH_GOLD_REWARD: i32 = 200;

// Titles -----------------------------------------------------------------------
pub(crate) const TITLE_LOW: &str = "Intern";
pub(crate) const TITLE_MID: &str = "Galactic Merchant";
pub(crate) const TITLE_TOP: &str = "Market Legend";
pub(crate) const TITLE_MID_THRESHOLD: i32 = 150;
pub(crate) const TITLE_TOP_THRESHOLD: i32 = 300;

// Result screen ----------------------------------------------------------------
pub(crate) const CELEBRATION_THRESHOLD: i32 = 1_000;
pub(crate) const PRIZES_PER_SESSION: u32 = 1;
pub(crate) const REPORT_FILE_PREFIX: &str = "Yalda_Report_";

// Collaborator fallbacks ---------------------------------------------------------
pub(crate) const REPORT_FALLBACK: &str =
    "The link to the server of history was lost. But your victory is eternal.";
pub(crate) const REPORT_EMPTY_FALLBACK: &str =
    "The data could not be analyzed. But your name is carved into the inscriptions.";
pub(crate) const TAUNT_FALLBACK: &str =
    "The Achaemenid comms network is down... but the shadows are closing in.";
pub(crate) const TAUNT_EMPTY_FALLBACK: &str =
    "The darkness of bankruptcy swallows you, little merchant!";

// Logging keys -------------------------------------------------------------------
pub(crate) const LOG_TARGET: &str = "yalda_game";

// RNG domains --------------------------------------------------------------------
pub(crate) const RNG_DOMAIN_INSIGHT: &[u8] = b"yalda.insight.sample";
pub(crate) const RNG_DOMAIN_PRIZE: &[u8] = b"yalda.prize.wheel";
pub(crate) const RNG_DOMAIN_CAPTURE: &[u8] = b"yalda.pitch.capture";
