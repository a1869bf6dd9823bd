//! Stage 1: timed yes/no business analysis with a combo streak.
use log::debug;

use super::{Stage, StageCompletion, StageError, StagePrompt, StageStep};
use crate::aggregate::{GoldChange, StatsDelta, merge};
use crate::config::AnalysisConfig;
use crate::constants::{
    ANALYSIS_GOAL, ANALYSIS_PROBLEM_HIGH, ANALYSIS_PROBLEM_LOW, COMBO_BASELINE, LOG_TARGET,
};
use crate::countdown::Countdown;
use crate::data::{AnalysisBank, AnalysisQuestion};
use crate::numbers::{floor_f64_to_i32, saturating_u32_to_i32};
use crate::stats::{Analysis, PlayerStats};

#[derive(Debug, Clone)]
pub struct AnalysisStage {
    questions: Vec<AnalysisQuestion>,
    cfg: AnalysisConfig,
    baseline: PlayerStats,
    index: usize,
    total: i32,
    combo: u32,
    max_combo: u32,
    countdown: Countdown,
    answers: Vec<bool>,
    awards: Vec<i32>,
}

impl AnalysisStage {
    #[must_use]
    pub fn new(stats: &PlayerStats, bank: &AnalysisBank, cfg: &AnalysisConfig) -> Self {
        Self {
            questions: bank.questions.clone(),
            cfg: cfg.clone(),
            baseline: stats.clone(),
            index: 0,
            total: 0,
            combo: 0,
            max_combo: 0,
            countdown: Countdown::new(cfg.question_ticks),
            answers: Vec::with_capacity(bank.questions.len()),
            awards: Vec::with_capacity(bank.questions.len()),
        }
    }

    /// Points a positive answer earns right now.
    #[must_use]
    pub fn positive_award(&self, base: i32) -> i32 {
        let time_bonus = if self.countdown.remaining() > self.cfg.fast_threshold {
            self.cfg.fast_bonus
        } else {
            1.0
        };
        let combo_mult = 1.0 + f64::from(self.combo) * self.cfg.combo_step;
        floor_f64_to_i32(f64::from(base) * combo_mult * time_bonus)
    }

    #[must_use]
    pub const fn total(&self) -> i32 {
        self.total
    }

    #[must_use]
    pub const fn combo(&self) -> u32 {
        self.combo
    }

    #[must_use]
    pub const fn max_combo(&self) -> u32 {
        self.max_combo
    }

    #[must_use]
    pub const fn remaining(&self) -> u32 {
        self.countdown.remaining()
    }

    /// Points awarded per answered question, in order.
    #[must_use]
    pub fn awards(&self) -> &[i32] {
        &self.awards
    }

    fn diagnose(&self) -> Analysis {
        let main_problem = if self.total < self.cfg.problem_threshold {
            ANALYSIS_PROBLEM_LOW
        } else {
            ANALYSIS_PROBLEM_HIGH
        };
        Analysis {
            has_business: self.answers.first().copied().unwrap_or(false),
            main_problem: main_problem.to_string(),
            goal: ANALYSIS_GOAL.to_string(),
            score: self.total,
        }
    }
}

impl Stage for AnalysisStage {
    /// `true` for "yes".
    type Choice = bool;

    fn present(&self) -> Option<StagePrompt<'_>> {
        let question = self.questions.get(self.index)?;
        Some(StagePrompt::YesNo {
            index: self.index,
            total: self.questions.len(),
            text: &question.text,
            remaining: self.countdown.remaining(),
            combo: self.combo,
        })
    }

    fn score(&mut self, yes: bool) -> Result<StageStep, StageError> {
        let Some(question) = self.questions.get(self.index) else {
            return Err(StageError::Complete);
        };
        let points = if question.is_positive(yes) {
            let points = self.positive_award(question.score);
            self.combo += 1;
            self.max_combo = self.max_combo.max(self.combo);
            points
        } else {
            self.combo = 0;
            0
        };
        debug!(
            target: LOG_TARGET,
            "analysis q{} answered {} -> {} points (combo {}, {}s left)",
            self.index + 1,
            if yes { "yes" } else { "no" },
            points,
            self.combo,
            self.countdown.remaining()
        );
        self.total += points;
        self.answers.push(yes);
        self.awards.push(points);
        self.index += 1;
        if self.index < self.questions.len() {
            self.countdown.reset();
        } else {
            self.countdown.cancel();
        }
        Ok(StageStep::scored(points, self.is_complete()))
    }

    fn is_complete(&self) -> bool {
        self.index >= self.questions.len()
    }

    fn completion(&self) -> Option<StageCompletion> {
        if !self.is_complete() {
            return None;
        }
        let delta = StatsDelta {
            quiz_score_gain: self.total,
            gold: GoldChange::Set(self.total.saturating_mul(self.cfg.gold_per_point)),
            combo_multiplier: Some(COMBO_BASELINE),
            max_combo: Some(self.max_combo),
            analysis: Some(self.diagnose()),
            ..StatsDelta::default()
        };
        Some(StageCompletion {
            stats: merge(&self.baseline, &delta),
            log: format!(
                "Level 1 Analysis Score: {}. Max Combo: {}",
                self.total,
                saturating_u32_to_i32(self.max_combo)
            ),
        })
    }

    fn tick(&mut self) {
        if !self.is_complete() {
            self.countdown.tick();
        }
    }

    fn cancel_timers(&mut self) {
        self.countdown.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::QuizContent;

    fn stage() -> AnalysisStage {
        let content = QuizContent::load_from_static().unwrap();
        AnalysisStage::new(
            &PlayerStats::default(),
            &content.analysis,
            &AnalysisConfig::default(),
        )
    }

    fn bank(scores: &[(i32, bool)]) -> AnalysisBank {
        AnalysisBank {
            questions: scores
                .iter()
                .map(|(score, inverted)| AnalysisQuestion {
                    text: format!("q{score}"),
                    score: *score,
                    topic: String::new(),
                    inverted: *inverted,
                })
                .collect(),
        }
    }

    #[test]
    fn fast_positive_answers_build_combo() {
        let questions = bank(&[(10, false), (10, false), (5, false), (15, false)]);
        let mut stage =
            AnalysisStage::new(&PlayerStats::default(), &questions, &AnalysisConfig::default());
        let points: Vec<i32> = (0..4).map(|_| stage.score(true).unwrap().points).collect();
        assert_eq!(points, vec![15, 16, 9, 29]);
        assert_eq!(stage.combo(), 4);
        assert_eq!(stage.max_combo(), 4);
        assert!(stage.is_complete());
    }

    #[test]
    fn slow_answers_lose_time_bonus() {
        let questions = bank(&[(10, false)]);
        let mut stage =
            AnalysisStage::new(&PlayerStats::default(), &questions, &AnalysisConfig::default());
        for _ in 0..5 {
            stage.tick();
        }
        assert_eq!(stage.remaining(), 5);
        assert_eq!(stage.score(true).unwrap().points, 10);
    }

    #[test]
    fn negative_answer_resets_combo() {
        let questions = bank(&[(10, false), (10, false), (10, false)]);
        let mut stage =
            AnalysisStage::new(&PlayerStats::default(), &questions, &AnalysisConfig::default());
        stage.score(true).unwrap();
        stage.score(true).unwrap();
        assert_eq!(stage.combo(), 2);
        assert_eq!(stage.score(false).unwrap().points, 0);
        assert_eq!(stage.combo(), 0);
        assert_eq!(stage.max_combo(), 2);
    }

    #[test]
    fn inverted_question_rewards_no() {
        let questions = bank(&[(5, true), (5, true)]);
        let mut stage =
            AnalysisStage::new(&PlayerStats::default(), &questions, &AnalysisConfig::default());
        assert_eq!(stage.score(false).unwrap().points, 7);
        assert_eq!(stage.score(true).unwrap().points, 0);
        assert_eq!(stage.combo(), 0);
    }

    #[test]
    fn countdown_resets_per_question() {
        let mut stage = stage();
        for _ in 0..12 {
            stage.tick();
        }
        assert_eq!(stage.remaining(), 0);
        stage.score(true).unwrap();
        assert_eq!(stage.remaining(), 10);
    }

    #[test]
    fn optimal_run_scores_full_sheet() {
        let content = QuizContent::load_from_static().unwrap();
        let mut stage = stage();
        for question in &content.analysis.questions {
            stage.score(!question.inverted).unwrap();
        }
        assert_eq!(stage.total(), 572);
        assert_eq!(stage.awards().iter().sum::<i32>(), stage.total());
        let done = stage.completion().unwrap();
        assert_eq!(done.stats.quiz_score, 572);
        assert_eq!(done.stats.gold, 5_720);
        assert_eq!(done.stats.max_combo, 20);
        assert_eq!(done.stats.combo_multiplier, 1);
        let analysis = done.stats.analysis.unwrap();
        assert!(analysis.has_business);
        assert_eq!(analysis.main_problem, "Scalability challenge");
        assert_eq!(done.log, "Level 1 Analysis Score: 572. Max Combo: 20");
    }

    #[test]
    fn low_score_diagnoses_infrastructure() {
        let mut stage = stage();
        while !stage.is_complete() {
            stage.score(false).unwrap();
        }
        let done = stage.completion().unwrap();
        let analysis = done.stats.analysis.unwrap();
        assert!(!analysis.has_business);
        assert_eq!(analysis.main_problem, "Infrastructure weakness");
        assert_eq!(done.stats.quiz_score, 7);
    }

    #[test]
    fn input_after_completion_is_rejected() {
        let questions = bank(&[(10, false)]);
        let mut stage =
            AnalysisStage::new(&PlayerStats::default(), &questions, &AnalysisConfig::default());
        assert!(stage.completion().is_none());
        assert!(stage.score(true).unwrap().complete);
        assert_eq!(stage.score(true), Err(StageError::Complete));
        assert!(stage.present().is_none());
    }
}
