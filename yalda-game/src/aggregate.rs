//! Stats aggregation: folding a stage's deltas into the cumulative record.
use log::debug;
use serde::{Deserialize, Serialize};

use crate::config::TitleConfig;
use crate::constants::LOG_TARGET;
use crate::stats::{Analysis, PlayerStats};

/// How a stage changes the gold balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GoldChange {
    #[default]
    Keep,
    Set(i32),
    Add(i32),
}

/// Fields a stage may touch. Anything left at its default is preserved.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StatsDelta {
    /// Added to the cumulative quiz score; negative gains are ignored.
    pub quiz_score_gain: i32,
    pub gold: GoldChange,
    pub hp: Option<i32>,
    pub enemy_hp: Option<i32>,
    pub combo_multiplier: Option<u32>,
    /// Stage-local streak high-water mark.
    pub max_combo: Option<u32>,
    pub title: Option<String>,
    pub analysis: Option<Analysis>,
    pub voice_score: Option<u32>,
}

/// Merge `delta` over `previous`, returning a new record.
///
/// Enforces the cross-stage invariants: quiz score never decreases, hp stays
/// within `[0, max_hp]`, max combo is a high-water mark and gold is never negative.
#[must_use]
pub fn merge(previous: &PlayerStats, delta: &StatsDelta) -> PlayerStats {
    let mut next = previous.clone();

    next.quiz_score = previous
        .quiz_score
        .saturating_add(delta.quiz_score_gain.max(0));

    next.gold = match delta.gold {
        GoldChange::Keep => previous.gold,
        GoldChange::Set(value) => value,
        GoldChange::Add(gain) => previous.gold.saturating_add(gain),
    };

    if let Some(hp) = delta.hp {
        next.hp = hp;
    }
    if let Some(enemy_hp) = delta.enemy_hp {
        next.enemy_hp = enemy_hp;
    }
    if let Some(combo) = delta.combo_multiplier {
        next.combo_multiplier = combo;
    }
    if let Some(max_combo) = delta.max_combo {
        next.max_combo = previous.max_combo.max(max_combo);
    }
    if let Some(title) = &delta.title {
        next.title.clone_from(title);
    }
    if let Some(analysis) = &delta.analysis {
        next.analysis = Some(analysis.clone());
    }
    if let Some(voice) = delta.voice_score {
        next.voice_score = Some(voice);
    }

    next.clamp();
    debug!(
        target: LOG_TARGET,
        "merged stats: score {} -> {}, gold {} -> {}, hp {}",
        previous.quiz_score,
        next.quiz_score,
        previous.gold,
        next.gold,
        next.hp
    );
    next
}

/// Title tier for a cumulative score.
#[must_use]
pub fn title_for_score(score: i32, titles: &TitleConfig) -> String {
    titles.title_for(score).to_string()
}
