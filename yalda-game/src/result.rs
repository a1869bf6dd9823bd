//! End-of-session summary and the in-stage HUD snapshot.
use serde::{Deserialize, Serialize};

use crate::config::RewardConfig;
use crate::leaderboard::{BoardSeed, LeaderboardEntry, build_leaderboard, player_rank};
use crate::phase::GamePhase;
use crate::report::static_report;
use crate::stats::PlayerStats;

/// Number of scoring stages shown on the HUD.
pub const STAGE_COUNT: u8 = 4;

/// Everything the result screen shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultSummary {
    pub name: String,
    pub final_score: i32,
    pub title: String,
    pub max_combo: u32,
    pub voice_score: Option<u32>,
    /// Score high enough for the celebration effect.
    pub celebrate: bool,
    pub leaderboard: Vec<LeaderboardEntry>,
    pub player_rank: Option<usize>,
    pub prize: Option<String>,
    /// Instant report text, also the export body.
    pub report: String,
}

/// Build the result screen from final stats.
#[must_use]
pub fn result_summary(
    stats: &PlayerStats,
    seeds: &[BoardSeed],
    rewards: &RewardConfig,
    prize: Option<&str>,
) -> ResultSummary {
    let leaderboard = build_leaderboard(seeds, stats);
    let player_rank = player_rank(&leaderboard);
    ResultSummary {
        name: stats.display_name().to_string(),
        final_score: stats.quiz_score,
        title: stats.title.clone(),
        max_combo: stats.max_combo,
        voice_score: stats.voice_score,
        celebrate: stats.quiz_score > rewards.celebration_threshold,
        leaderboard,
        player_rank,
        prize: prize.map(str::to_string),
        report: static_report(stats),
    }
}

/// Compact view of the stats shown while a stage is on screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HudSnapshot {
    pub name: String,
    pub title: String,
    pub hp: i32,
    pub max_hp: i32,
    pub energy: i32,
    pub gold: i32,
    pub quiz_score: i32,
    pub combo: u32,
    pub stage: u8,
    pub stages: u8,
}

impl HudSnapshot {
    /// HUD for `phase`; hidden while loading and outside the four stages.
    #[must_use]
    pub fn capture(phase: GamePhase, stats: &PlayerStats, loading: bool) -> Option<Self> {
        if loading {
            return None;
        }
        let stage = phase.stage_number()?;
        Some(Self {
            name: stats.display_name().to_string(),
            title: stats.title.clone(),
            hp: stats.hp,
            max_hp: stats.max_hp,
            energy: stats.energy,
            gold: stats.gold,
            quiz_score: stats.quiz_score,
            combo: stats.combo_multiplier,
            stage,
            stages: STAGE_COUNT,
        })
    }

    /// Stage progress as a percentage.
    #[must_use]
    pub fn progress_percent(&self) -> u8 {
        let pct = u32::from(self.stage) * 100 / u32::from(self.stages.max(1));
        u8::try_from(pct).unwrap_or(100)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::QuizContent;

    fn stats(score: i32) -> PlayerStats {
        PlayerStats {
            name: "Kaveh".to_string(),
            quiz_score: score,
            title: "Market Legend".to_string(),
            max_combo: 12,
            voice_score: Some(80),
            ..PlayerStats::default()
        }
    }

    #[test]
    fn celebration_requires_more_than_threshold() {
        let seeds = QuizContent::load_from_static().unwrap().leaderboard;
        let cfg = RewardConfig::default();
        assert!(!result_summary(&stats(1_000), &seeds, &cfg, None).celebrate);
        assert!(result_summary(&stats(1_001), &seeds, &cfg, None).celebrate);
    }

    #[test]
    fn summary_carries_board_and_prize() {
        let seeds = QuizContent::load_from_static().unwrap().leaderboard;
        let summary = result_summary(
            &stats(2_000),
            &seeds,
            &RewardConfig::default(),
            Some("Sales strategy course"),
        );
        assert_eq!(summary.player_rank, Some(5));
        assert_eq!(summary.leaderboard.len(), 6);
        assert_eq!(summary.prize.as_deref(), Some("Sales strategy course"));
        assert!(summary.report.contains("2000 points"));
        assert_eq!(summary.max_combo, 12);
    }

    #[test]
    fn hud_only_during_stages() {
        let s = stats(10);
        assert!(HudSnapshot::capture(GamePhase::Intro, &s, false).is_none());
        assert!(HudSnapshot::capture(GamePhase::Result, &s, false).is_none());
        assert!(HudSnapshot::capture(GamePhase::Arena, &s, true).is_none());
        let hud = HudSnapshot::capture(GamePhase::Insight, &s, false).unwrap();
        assert_eq!(hud.stage, 3);
        assert_eq!(hud.stages, 4);
        assert_eq!(hud.progress_percent(), 75);
    }
}
