//! Linear phase sequence of a session.
use serde::{Deserialize, Serialize};

/// Phase of a session, in play order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum GamePhase {
    #[default]
    Intro,
    /// Stage 1: yes/no business analysis.
    Analysis,
    /// Stage 2: scenario battle.
    Arena,
    /// Stage 3: randomized visual insight quiz.
    Insight,
    /// Stage 4: timed voice pitch.
    Pitch,
    Result,
}

/// Allowed transitions. Every phase has at most one successor; `Result` only
/// leaves through a restart, which is not a transition.
const TRANSITIONS: [(GamePhase, GamePhase); 5] = [
    (GamePhase::Intro, GamePhase::Analysis),
    (GamePhase::Analysis, GamePhase::Arena),
    (GamePhase::Arena, GamePhase::Insight),
    (GamePhase::Insight, GamePhase::Pitch),
    (GamePhase::Pitch, GamePhase::Result),
];

impl GamePhase {
    pub const ORDER: [Self; 6] = [
        Self::Intro,
        Self::Analysis,
        Self::Arena,
        Self::Insight,
        Self::Pitch,
        Self::Result,
    ];

    /// Successor in the transition table.
    #[must_use]
    pub fn next(self) -> Option<Self> {
        TRANSITIONS
            .iter()
            .find(|(from, _)| *from == self)
            .map(|(_, to)| *to)
    }

    #[must_use]
    pub fn can_transition(self, to: Self) -> bool {
        TRANSITIONS.contains(&(self, to))
    }

    /// 1-based stage number for the four scoring phases.
    #[must_use]
    pub const fn stage_number(self) -> Option<u8> {
        match self {
            Self::Analysis => Some(1),
            Self::Arena => Some(2),
            Self::Insight => Some(3),
            Self::Pitch => Some(4),
            Self::Intro | Self::Result => None,
        }
    }

    #[must_use]
    pub const fn is_stage(self) -> bool {
        self.stage_number().is_some()
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Intro => "intro",
            Self::Analysis => "analysis",
            Self::Arena => "arena",
            Self::Insight => "insight",
            Self::Pitch => "pitch",
            Self::Result => "result",
        }
    }
}

impl std::fmt::Display for GamePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_follows_play_order() {
        let mut phase = GamePhase::Intro;
        let mut visited = vec![phase];
        while let Some(next) = phase.next() {
            visited.push(next);
            phase = next;
        }
        assert_eq!(visited, GamePhase::ORDER.to_vec());
        assert_eq!(GamePhase::Result.next(), None);
    }

    #[test]
    fn table_rejects_skips_and_reversals() {
        assert!(GamePhase::Analysis.can_transition(GamePhase::Arena));
        assert!(!GamePhase::Analysis.can_transition(GamePhase::Insight));
        assert!(!GamePhase::Arena.can_transition(GamePhase::Analysis));
        assert!(!GamePhase::Result.can_transition(GamePhase::Intro));
        assert!(!GamePhase::Pitch.can_transition(GamePhase::Pitch));
    }

    #[test]
    fn stage_numbers() {
        assert_eq!(GamePhase::Intro.stage_number(), None);
        assert_eq!(GamePhase::Analysis.stage_number(), Some(1));
        assert_eq!(GamePhase::Pitch.stage_number(), Some(4));
        assert!(!GamePhase::Result.is_stage());
        assert_eq!(GamePhase::Insight.to_string(), "insight");
    }
}
