//! Final report and boss taunt through an external text generator.
//!
//! Generation never fails from the caller's point of view: errors and empty
//! output are replaced by fixed fallback strings, and a deterministic static
//! report is always available for instant display and export.
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use thiserror::Error;

use crate::constants::{
    LOG_TARGET, REPORT_EMPTY_FALLBACK, REPORT_FALLBACK, REPORT_FILE_PREFIX, TAUNT_EMPTY_FALLBACK,
    TAUNT_FALLBACK,
};
use crate::stats::PlayerStats;

const UNKNOWN_PROBLEM: &str = "Unknown fear";

/// Failure reported by a text generator.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GenerationError {
    #[error("text generator unavailable: {0}")]
    Unavailable(String),
    #[error("text generator timed out")]
    Timeout,
    #[error("text generator rejected the prompt: {0}")]
    Rejected(String),
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to write report to {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Opaque prompt-to-text capability.
pub trait TextGenerator {
    /// Produce text for `prompt`.
    ///
    /// # Errors
    ///
    /// Returns `GenerationError` when the provider cannot answer.
    fn generate(&self, prompt: &str) -> Result<String, GenerationError>;
}

impl<F> TextGenerator for F
where
    F: Fn(&str) -> Result<String, GenerationError>,
{
    fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        self(prompt)
    }
}

/// Generator for hosts without a provider; every call falls back.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineGenerator;

impl TextGenerator for OfflineGenerator {
    fn generate(&self, _prompt: &str) -> Result<String, GenerationError> {
        Err(GenerationError::Unavailable("offline".to_string()))
    }
}

/// Which literal to use when generation does not produce text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Fallbacks {
    Report,
    Taunt,
}

impl Fallbacks {
    const fn on_error(self) -> &'static str {
        match self {
            Self::Report => REPORT_FALLBACK,
            Self::Taunt => TAUNT_FALLBACK,
        }
    }

    const fn on_empty(self) -> &'static str {
        match self {
            Self::Report => REPORT_EMPTY_FALLBACK,
            Self::Taunt => TAUNT_EMPTY_FALLBACK,
        }
    }
}

fn settle(outcome: Result<String, GenerationError>, kind: Fallbacks) -> String {
    match outcome {
        Ok(text) if text.trim().is_empty() => {
            warn!(target: LOG_TARGET, "{kind:?} generator returned empty text; using fallback");
            kind.on_empty().to_string()
        }
        Ok(text) => text,
        Err(err) => {
            warn!(target: LOG_TARGET, "{kind:?} generation failed: {err}; using fallback");
            kind.on_error().to_string()
        }
    }
}

/// Prompt asking for the final decree.
#[must_use]
pub fn report_prompt(stats: &PlayerStats, history: &[String]) -> String {
    let has_business = stats.has_business();
    let problem = stats.main_problem().unwrap_or(UNKNOWN_PROBLEM);
    let mut prompt = String::new();
    let _ = writeln!(prompt, "Create a Yalda business decree for the player.");
    let _ = writeln!(prompt, "Name: {}", stats.display_name());
    let _ = writeln!(
        prompt,
        "Has business: {}",
        if has_business { "YES" } else { "NO" }
    );
    let _ = writeln!(prompt, "Main struggle: {problem}");
    let _ = writeln!(prompt, "Final score: {} ({})", stats.quiz_score, stats.title);
    let _ = writeln!(prompt, "Journey:");
    for line in history {
        let _ = writeln!(prompt, "- {line}");
    }
    let _ = writeln!(prompt, "Sections: the verdict, the strategic roadmap, the Yalda blessing.");
    if has_business {
        let _ = writeln!(
            prompt,
            "Roadmap: three steps fixing \"{problem}\" covering website optimization, lead generation and Instagram funnels."
        );
    } else {
        let _ = writeln!(
            prompt,
            "Roadmap: start a web design agency or Instagram business: learn the skill, build a personal brand, land the first client."
        );
    }
    prompt
}

/// Prompt asking for a short taunt aimed at the player's weakness.
#[must_use]
pub fn taunt_prompt(stats: &PlayerStats) -> String {
    format!(
        "The player has reached the giant of financial failure.\n\
         Player name: {}\nPlayer problem: {}\n\
         Generate a short, epic taunt that mocks their problem, under 20 words.",
        stats.display_name(),
        stats.main_problem().unwrap_or(UNKNOWN_PROBLEM)
    )
}

/// Deterministic report built from the final stats alone.
#[must_use]
pub fn static_report(stats: &PlayerStats) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# Yalda Decree for {}", stats.display_name());
    let _ = writeln!(out);
    let _ = writeln!(out, "## The Verdict");
    let _ = writeln!(
        out,
        "You finished the battle with {} points and earned the rank of {}.",
        stats.quiz_score, stats.title
    );
    if let Some(voice) = stats.voice_score {
        let _ = writeln!(out, "Your pitch carried {voice}% of its possible energy.");
    }
    let _ = writeln!(out, "Longest streak: {}.", stats.max_combo);
    let _ = writeln!(out);
    let _ = writeln!(out, "## The Strategic Roadmap");
    if stats.has_business() {
        let problem = stats.main_problem().unwrap_or(UNKNOWN_PROBLEM);
        let _ = writeln!(out, "Your main struggle: {problem}.");
        let _ = writeln!(out, "1. Website optimization: make every visit count.");
        let _ = writeln!(out, "2. Lead generation: capture and keep every contact.");
        let _ = writeln!(out, "3. Instagram funnels: turn followers into buyers.");
    } else {
        let _ = writeln!(out, "Start a web design agency or an Instagram business.");
        let _ = writeln!(out, "1. Learn a sellable skill.");
        let _ = writeln!(out, "2. Build your personal brand.");
        let _ = writeln!(out, "3. Land your first client.");
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "## The Yalda Blessing");
    let _ = write!(
        out,
        "May this longest night end in the brightest dawn, and may your ledger fill like a pomegranate."
    );
    out
}

/// Export file name for a player's report.
#[must_use]
pub fn report_file_name(stats: &PlayerStats) -> String {
    let name: String = stats
        .display_name()
        .chars()
        .map(|c| if matches!(c, '/' | '\\' | ':') { '_' } else { c })
        .collect();
    format!("{REPORT_FILE_PREFIX}{name}.txt")
}

/// Write `report` into `dir` under [`report_file_name`].
///
/// # Errors
///
/// Returns `ExportError::Io` if the file cannot be written.
pub fn export_report(dir: &Path, stats: &PlayerStats, report: &str) -> Result<PathBuf, ExportError> {
    let path = dir.join(report_file_name(stats));
    fs::write(&path, report).map_err(|source| ExportError::Io {
        path: path.clone(),
        source,
    })?;
    debug!(target: LOG_TARGET, "report exported to {}", path.display());
    Ok(path)
}

/// Report and taunt generation with fixed fallbacks.
#[derive(Debug, Clone, Default)]
pub struct ReportService<G> {
    generator: G,
}

impl<G: TextGenerator> ReportService<G> {
    pub const fn new(generator: G) -> Self {
        Self { generator }
    }

    /// Final report text; never fails.
    pub fn generate_report(&self, stats: &PlayerStats, history: &[String]) -> String {
        let prompt = report_prompt(stats, history);
        settle(self.generator.generate(&prompt), Fallbacks::Report)
    }

    /// Boss taunt text; never fails.
    pub fn generate_prize_taunt(&self, stats: &PlayerStats) -> String {
        settle(self.generator.generate(&taunt_prompt(stats)), Fallbacks::Taunt)
    }
}

#[cfg(feature = "async")]
pub use self::nonblocking::{AsyncReportService, AsyncTextGenerator};

#[cfg(feature = "async")]
mod nonblocking {
    use std::time::Duration;

    use async_trait::async_trait;

    use super::{
        Fallbacks, GenerationError, PlayerStats, report_prompt, settle, taunt_prompt,
    };

    /// Asynchronous prompt-to-text capability.
    #[async_trait]
    pub trait AsyncTextGenerator: Send + Sync {
        async fn generate(&self, prompt: &str) -> Result<String, GenerationError>;
    }

    /// Async report generation bounded by a timeout so progression never waits
    /// on the provider.
    pub struct AsyncReportService<G> {
        generator: G,
        timeout: Duration,
    }

    impl<G: AsyncTextGenerator> AsyncReportService<G> {
        pub const fn new(generator: G, timeout: Duration) -> Self {
            Self { generator, timeout }
        }

        async fn bounded(&self, prompt: &str) -> Result<String, GenerationError> {
            tokio::time::timeout(self.timeout, self.generator.generate(prompt))
                .await
                .unwrap_or(Err(GenerationError::Timeout))
        }

        pub async fn generate_report(&self, stats: &PlayerStats, history: &[String]) -> String {
            let prompt = report_prompt(stats, history);
            settle(self.bounded(&prompt).await, Fallbacks::Report)
        }

        pub async fn generate_prize_taunt(&self, stats: &PlayerStats) -> String {
            let prompt = taunt_prompt(stats);
            settle(self.bounded(&prompt).await, Fallbacks::Taunt)
        }
    }
}
