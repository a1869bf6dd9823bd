use std::fmt;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use serde::Serialize;
use yalda_game::{AnalysisQuestion, ArenaOption, InsightOption};

/// Policy interface for automated play strategies.
pub trait PlayerPolicy {
    /// Name used for logging/debug output.
    fn name(&self) -> &'static str;

    /// Answer one analysis question.
    fn answer(&mut self, question: &AnalysisQuestion) -> bool;

    /// Pick an arena move.
    fn arena(&mut self, options: &[ArenaOption; 3]) -> usize;

    /// Whether to arm the shield before the given arena scenario.
    fn arm_shield(&mut self, _scenario: usize) -> bool {
        false
    }

    /// Pick an insight option.
    fn insight(&mut self, options: &[InsightOption; 3]) -> usize;

    /// `None` denies microphone access; otherwise the frames to feed. An empty
    /// list asks the session for synthetic frames instead.
    fn capture(&mut self) -> Option<Vec<Vec<u8>>>;
}

/// Built-in strategies for automated runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    Optimal,
    Cautious,
    Contrarian,
    Random,
}

impl Strategy {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Strategy::Optimal => "Optimal",
            Strategy::Cautious => "Cautious",
            Strategy::Contrarian => "Contrarian",
            Strategy::Random => "Random",
        }
    }

    #[must_use]
    pub fn create_policy(self, seed: u64) -> Box<dyn PlayerPolicy + Send> {
        match self {
            Strategy::Optimal => Box::new(OptimalPolicy),
            Strategy::Cautious => Box::new(CautiousPolicy),
            Strategy::Contrarian => Box::new(ContrarianPolicy),
            Strategy::Random => Box::new(RandomPolicy::new(seed)),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Index of the highest score, earliest on ties.
fn best_by(scores: impl Iterator<Item = i32>) -> usize {
    scores
        .enumerate()
        .max_by_key(|(idx, score)| (*score, std::cmp::Reverse(*idx)))
        .map_or(0, |(idx, _)| idx)
}

fn worst_by(scores: impl Iterator<Item = i32>) -> usize {
    best_by(scores.map(|s| -s))
}

fn net_damage(option: &ArenaOption) -> i32 {
    option.damage - option.self_damage
}

struct OptimalPolicy;
struct CautiousPolicy;
struct ContrarianPolicy;

struct RandomPolicy {
    rng: ChaCha20Rng,
}

impl RandomPolicy {
    fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha20Rng::seed_from_u64(seed ^ 0x5EED_F00D),
        }
    }
}

impl PlayerPolicy for OptimalPolicy {
    fn name(&self) -> &'static str {
        "optimal"
    }

    fn answer(&mut self, question: &AnalysisQuestion) -> bool {
        question.is_positive(true)
    }

    fn arena(&mut self, options: &[ArenaOption; 3]) -> usize {
        best_by(options.iter().map(net_damage))
    }

    fn insight(&mut self, options: &[InsightOption; 3]) -> usize {
        best_by(options.iter().map(|o| o.score))
    }

    fn capture(&mut self) -> Option<Vec<Vec<u8>>> {
        None
    }
}

impl PlayerPolicy for CautiousPolicy {
    fn name(&self) -> &'static str {
        "cautious"
    }

    fn answer(&mut self, _question: &AnalysisQuestion) -> bool {
        true
    }

    fn arena(&mut self, options: &[ArenaOption; 3]) -> usize {
        worst_by(options.iter().map(|o| o.self_damage))
    }

    fn arm_shield(&mut self, _scenario: usize) -> bool {
        true
    }

    fn insight(&mut self, options: &[InsightOption; 3]) -> usize {
        best_by(options.iter().map(|o| o.score))
    }

    // A quiet room: the peak never clears the mercy threshold.
    fn capture(&mut self) -> Option<Vec<Vec<u8>>> {
        Some(vec![vec![2, 4, 3, 1]; 4])
    }
}

impl PlayerPolicy for ContrarianPolicy {
    fn name(&self) -> &'static str {
        "contrarian"
    }

    fn answer(&mut self, question: &AnalysisQuestion) -> bool {
        !question.is_positive(true)
    }

    fn arena(&mut self, options: &[ArenaOption; 3]) -> usize {
        worst_by(options.iter().map(net_damage))
    }

    fn insight(&mut self, options: &[InsightOption; 3]) -> usize {
        worst_by(options.iter().map(|o| o.score))
    }

    fn capture(&mut self) -> Option<Vec<Vec<u8>>> {
        Some(vec![vec![255; 16]])
    }
}

impl PlayerPolicy for RandomPolicy {
    fn name(&self) -> &'static str {
        "random"
    }

    fn answer(&mut self, _question: &AnalysisQuestion) -> bool {
        self.rng.r#gen()
    }

    fn arena(&mut self, _options: &[ArenaOption; 3]) -> usize {
        self.rng.gen_range(0..3)
    }

    fn arm_shield(&mut self, _scenario: usize) -> bool {
        self.rng.gen_bool(0.3)
    }

    fn insight(&mut self, _options: &[InsightOption; 3]) -> usize {
        self.rng.gen_range(0..3)
    }

    fn capture(&mut self) -> Option<Vec<Vec<u8>>> {
        match self.rng.gen_range(0..4) {
            0 => return None,
            1 => return Some(Vec::new()),
            _ => {}
        }
        let frames = self.rng.gen_range(1..8);
        Some(
            (0..frames)
                .map(|_| (0..32).map(|_| self.rng.r#gen::<u8>()).collect())
                .collect(),
        )
    }
}
