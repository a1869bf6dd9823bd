//! Stage 3: multiple choice over a seeded sample of the insight pool.
use log::debug;
use rand::seq::index;
use rand_chacha::ChaCha20Rng;
use smallvec::SmallVec;

use super::{Stage, StageCompletion, StageError, StagePrompt, StageStep};
use crate::aggregate::{GoldChange, StatsDelta, merge, title_for_score};
use crate::config::{InsightConfig, TitleConfig};
use crate::constants::{COMBO_BASELINE, LOG_TARGET};
use crate::data::{InsightPool, InsightQuestion};
use crate::stats::PlayerStats;

/// Questions drawn for one stage; three by default.
pub type InsightSample = SmallVec<[InsightQuestion; 3]>;

/// Draw `size` distinct questions from `pool`, in draw order.
///
/// A pool smaller than `size` yields every question once.
pub fn draw_sample(pool: &InsightPool, size: usize, rng: &mut ChaCha20Rng) -> InsightSample {
    let amount = size.min(pool.pool.len());
    index::sample(rng, pool.pool.len(), amount)
        .into_iter()
        .filter_map(|i| pool.pool.get(i).cloned())
        .collect()
}

#[derive(Debug, Clone)]
pub struct InsightStage {
    sample: InsightSample,
    cfg: InsightConfig,
    titles: TitleConfig,
    baseline: PlayerStats,
    index: usize,
    round: i32,
}

impl InsightStage {
    /// Build the stage, drawing its sample once from `rng`.
    #[must_use]
    pub fn new(
        stats: &PlayerStats,
        pool: &InsightPool,
        cfg: &InsightConfig,
        titles: &TitleConfig,
        rng: &mut ChaCha20Rng,
    ) -> Self {
        let sample = draw_sample(pool, cfg.sample_size, rng);
        debug!(
            target: LOG_TARGET,
            "insight sample: {:?}",
            sample.iter().map(|q| q.id).collect::<Vec<_>>()
        );
        Self {
            sample,
            cfg: cfg.clone(),
            titles: titles.clone(),
            baseline: stats.clone(),
            index: 0,
            round: 0,
        }
    }

    /// Questions fixed for this stage.
    #[must_use]
    pub fn sample(&self) -> &[InsightQuestion] {
        &self.sample
    }

    /// Score gathered this stage; may be negative.
    #[must_use]
    pub const fn round(&self) -> i32 {
        self.round
    }

    /// Cumulative total before negative gains are discarded.
    #[must_use]
    pub const fn total(&self) -> i32 {
        self.baseline.quiz_score.saturating_add(self.round)
    }
}

impl Stage for InsightStage {
    /// Index of the chosen option.
    type Choice = usize;

    fn present(&self) -> Option<StagePrompt<'_>> {
        let question = self.sample.get(self.index)?;
        Some(StagePrompt::Choice {
            index: self.index,
            total: self.sample.len(),
            prompt: &question.prompt,
            options: &question.options,
        })
    }

    fn score(&mut self, choice: usize) -> Result<StageStep, StageError> {
        let question = self.sample.get(self.index).ok_or(StageError::Complete)?;
        let option = question
            .options
            .get(choice)
            .ok_or(StageError::InvalidOption {
                index: choice,
                available: question.options.len(),
            })?;
        let points = option.score;
        debug!(
            target: LOG_TARGET,
            "insight question {} option {} -> {}",
            question.id,
            choice,
            points
        );
        self.round = self.round.saturating_add(points);
        self.index += 1;
        Ok(StageStep::scored(points, self.is_complete()))
    }

    fn is_complete(&self) -> bool {
        self.index >= self.sample.len()
    }

    fn completion(&self) -> Option<StageCompletion> {
        if !self.is_complete() {
            return None;
        }
        let total = self.total();
        let delta = StatsDelta {
            quiz_score_gain: self.round,
            gold: GoldChange::Add(self.round.saturating_mul(self.cfg.gold_per_point)),
            combo_multiplier: Some(COMBO_BASELINE),
            title: Some(title_for_score(total, &self.titles)),
            ..StatsDelta::default()
        };
        Some(StageCompletion {
            stats: merge(&self.baseline, &delta),
            log: format!("Level 3 Visual Score: {}. Total: {}", self.round, total),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::QuizContent;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn pool() -> InsightPool {
        QuizContent::load_from_static().unwrap().insight
    }

    fn stage_with(stats: &PlayerStats, seed: u64) -> InsightStage {
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        InsightStage::new(
            stats,
            &pool(),
            &InsightConfig::default(),
            &TitleConfig::default(),
            &mut rng,
        )
    }

    fn best_option(question: &InsightQuestion) -> usize {
        question
            .options
            .iter()
            .enumerate()
            .max_by_key(|(_, option)| option.score)
            .map_or(0, |(i, _)| i)
    }

    #[test]
    fn sample_is_three_distinct_questions() {
        for seed in 0..64 {
            let stage = stage_with(&PlayerStats::default(), seed);
            let ids: HashSet<u32> = stage.sample().iter().map(|q| q.id).collect();
            assert_eq!(stage.sample().len(), 3);
            assert_eq!(ids.len(), 3);
        }
    }

    #[test]
    fn sample_is_stable_for_a_seed() {
        let first = stage_with(&PlayerStats::default(), 11);
        let second = stage_with(&PlayerStats::default(), 11);
        assert_eq!(first.sample(), second.sample());
    }

    #[test]
    fn small_pool_is_used_whole() {
        let mut small = pool();
        small.pool.truncate(2);
        let mut rng = ChaCha20Rng::seed_from_u64(3);
        assert_eq!(draw_sample(&small, 3, &mut rng).len(), 2);
    }

    #[test]
    fn best_answers_promote_title() {
        let stats = PlayerStats {
            quiz_score: 250,
            gold: 100,
            ..PlayerStats::default()
        };
        let mut stage = stage_with(&stats, 5);
        while let Some(question) = stage.sample().get(stage.index).cloned() {
            stage.score(best_option(&question)).unwrap();
        }
        assert_eq!(stage.round(), 60);
        let done = stage.completion().unwrap();
        assert_eq!(done.stats.quiz_score, 310);
        assert_eq!(done.stats.title, "Market Legend");
        assert_eq!(done.stats.gold, 700);
        assert_eq!(done.log, "Level 3 Visual Score: 60. Total: 310");
    }

    #[test]
    fn negative_round_keeps_score_and_floors_gold() {
        let question = InsightQuestion {
            id: 99,
            prompt: "p".to_string(),
            options: [-10, 0, 5].map(|score| crate::data::InsightOption {
                text: score.to_string(),
                score,
            }),
        };
        let pool = InsightPool {
            pool: vec![question.clone(), InsightQuestion { id: 100, ..question }],
        };
        let stats = PlayerStats {
            quiz_score: 155,
            gold: 50,
            ..PlayerStats::default()
        };
        let mut rng = ChaCha20Rng::seed_from_u64(1);
        let cfg = InsightConfig {
            sample_size: 2,
            ..InsightConfig::default()
        };
        let mut stage = InsightStage::new(&stats, &pool, &cfg, &TitleConfig::default(), &mut rng);
        stage.score(0).unwrap();
        stage.score(0).unwrap();
        let done = stage.completion().unwrap();
        assert_eq!(stage.total(), 135);
        assert_eq!(done.stats.quiz_score, 155);
        assert_eq!(done.stats.gold, 0);
        assert_eq!(done.stats.title, "Intern");
    }

    #[test]
    fn rejects_out_of_range_and_finished_input() {
        let mut stage = stage_with(&PlayerStats::default(), 2);
        assert!(matches!(
            stage.score(7),
            Err(StageError::InvalidOption { index: 7, .. })
        ));
        for _ in 0..3 {
            stage.score(0).unwrap();
        }
        assert_eq!(stage.score(0), Err(StageError::Complete));
        assert!(stage.present().is_none());
    }
}
