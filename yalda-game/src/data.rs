//! Quiz content: question banks, scenario pools, board seeds and prizes.
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::classes::ClassList;
use crate::leaderboard::BoardSeed;

const DEFAULT_ANALYSIS_DATA: &str = include_str!("../assets/data/analysis.json");
const DEFAULT_ARENA_DATA: &str = include_str!("../assets/data/arena.json");
const DEFAULT_INSIGHT_DATA: &str = include_str!("../assets/data/insight.json");
const DEFAULT_CLASSES_DATA: &str = include_str!("../assets/data/classes.json");
const DEFAULT_LEADERBOARD_DATA: &str = include_str!("../assets/data/leaderboard.json");
const DEFAULT_PRIZES_DATA: &str = include_str!("../assets/data/prizes.json");

/// Errors raised while loading or validating quiz content.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ContentError {
    #[error("failed to parse {asset}: {message}")]
    Parse {
        asset: &'static str,
        message: String,
    },
    #[error("{asset} must not be empty")]
    Empty { asset: &'static str },
    #[error("insight pool has {pool} questions but {sample} are sampled per stage")]
    PoolTooSmall { pool: usize, sample: usize },
}

fn parse<T: serde::de::DeserializeOwned>(asset: &'static str, json: &str) -> Result<T, ContentError> {
    serde_json::from_str(json).map_err(|err| ContentError::Parse {
        asset,
        message: err.to_string(),
    })
}

/// Yes/no diagnostic question for the analysis stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisQuestion {
    pub text: String,
    pub score: i32,
    #[serde(default)]
    pub topic: String,
    /// When set, answering "no" is the positive outcome.
    #[serde(default)]
    pub inverted: bool,
}

impl AnalysisQuestion {
    /// Whether an answer counts as positive under this question's polarity.
    #[must_use]
    pub const fn is_positive(&self, yes: bool) -> bool {
        yes != self.inverted
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct AnalysisBank {
    pub questions: Vec<AnalysisQuestion>,
}

/// One response in an arena scenario.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArenaOption {
    pub text: String,
    #[serde(default)]
    pub damage: i32,
    #[serde(default)]
    pub self_damage: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArenaScenario {
    pub prompt: String,
    pub options: [ArenaOption; 3],
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ArenaBank {
    pub scenarios: Vec<ArenaScenario>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsightOption {
    pub text: String,
    pub score: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsightQuestion {
    pub id: u32,
    pub prompt: String,
    pub options: [InsightOption; 3],
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct InsightPool {
    pub pool: Vec<InsightQuestion>,
}

/// Everything a session needs besides tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizContent {
    pub analysis: AnalysisBank,
    pub arena: ArenaBank,
    pub insight: InsightPool,
    pub classes: ClassList,
    pub leaderboard: Vec<BoardSeed>,
    pub prizes: Vec<String>,
}

impl QuizContent {
    /// Parse the content shipped with the crate.
    ///
    /// # Errors
    ///
    /// Returns an error if any embedded asset fails to parse.
    pub fn load_from_static() -> Result<Self, ContentError> {
        Ok(Self {
            analysis: parse("analysis.json", DEFAULT_ANALYSIS_DATA)?,
            arena: parse("arena.json", DEFAULT_ARENA_DATA)?,
            insight: parse("insight.json", DEFAULT_INSIGHT_DATA)?,
            classes: ClassList::from_json(DEFAULT_CLASSES_DATA).map_err(|err| {
                ContentError::Parse {
                    asset: "classes.json",
                    message: err.to_string(),
                }
            })?,
            leaderboard: parse("leaderboard.json", DEFAULT_LEADERBOARD_DATA)?,
            prizes: parse("prizes.json", DEFAULT_PRIZES_DATA)?,
        })
    }

    /// Check the content can drive a full session.
    ///
    /// # Errors
    ///
    /// Returns `ContentError` when a bank is empty or the insight pool cannot
    /// supply `sample_size` distinct questions.
    pub fn validate(&self, sample_size: usize) -> Result<(), ContentError> {
        if self.analysis.questions.is_empty() {
            return Err(ContentError::Empty {
                asset: "analysis.json",
            });
        }
        if self.arena.scenarios.is_empty() {
            return Err(ContentError::Empty { asset: "arena.json" });
        }
        if self.insight.pool.len() < sample_size {
            return Err(ContentError::PoolTooSmall {
                pool: self.insight.pool.len(),
                sample: sample_size,
            });
        }
        if self.classes.is_empty() {
            return Err(ContentError::Empty {
                asset: "classes.json",
            });
        }
        if self.prizes.is_empty() {
            return Err(ContentError::Empty {
                asset: "prizes.json",
            });
        }
        Ok(())
    }
}
