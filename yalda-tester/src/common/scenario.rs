use anyhow::{Result, ensure};
use yalda_game::{CharacterClass, GamePhase};

use crate::logic::{SimulationPlan, SimulationSummary, Strategy};

/// Flawless archer run with capture denied: 572 + 100 hp * 2 + 60 + 85 * 5.
const OPTIMAL_ARCHER_SCORE: i32 = 572 + 200 + 60 + 425;
const MERCY_SCORE: u32 = 50;

// Logic test scenario
#[derive(Debug, Clone)]
pub struct TestScenario {
    pub name: String,
    pub description: String,
    pub plan: SimulationPlan,
}

impl TestScenario {
    #[must_use]
    pub fn simulation(
        name: impl Into<String>,
        description: impl Into<String>,
        plan: SimulationPlan,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            plan,
        }
    }
}

const CATALOG: [(&str, &str); 7] = [
    ("smoke", "Optimal archer reaches the result screen with full marks"),
    ("full-run", "Random play across every class keeps stats in bounds"),
    ("mercy", "Quiet microphone input is lifted to the mercy score"),
    ("shield", "Shield-first arena play survives with hp in range"),
    ("contrarian", "Worst answers everywhere still finish a consistent board"),
    ("leaderboard", "High scores celebrate and rank on the board"),
    ("restart", "Restart after the insight stage replays cleanly from the intro"),
];

/// Every scenario key with its description.
#[must_use]
pub fn list_scenarios() -> Vec<(&'static str, &'static str)> {
    CATALOG.to_vec()
}

/// Build the scenario registered under `name`.
#[must_use]
pub fn get_scenario(name: &str) -> Option<TestScenario> {
    let (key, description) = CATALOG.iter().find(|(key, _)| *key == name)?;
    let plan = match *key {
        "smoke" => SimulationPlan::new(Strategy::Optimal)
            .with_class(CharacterClass::Archer)
            .with_expectation(expect_finished)
            .with_expectation(expect_optimal_archer),
        "full-run" => SimulationPlan::new(Strategy::Random)
            .with_expectation(expect_finished)
            .with_expectation(expect_stats_in_bounds)
            .with_expectation(expect_consistent_board),
        "mercy" => SimulationPlan::new(Strategy::Cautious)
            .with_expectation(expect_finished)
            .with_expectation(expect_mercy_voice),
        "shield" => SimulationPlan::new(Strategy::Cautious)
            .with_class(CharacterClass::Guardian)
            .with_expectation(expect_finished)
            .with_expectation(expect_stats_in_bounds),
        "contrarian" => SimulationPlan::new(Strategy::Contrarian)
            .with_expectation(expect_finished)
            .with_expectation(expect_stats_in_bounds)
            .with_expectation(expect_consistent_board),
        "leaderboard" => SimulationPlan::new(Strategy::Optimal)
            .with_expectation(expect_finished)
            .with_expectation(expect_celebration)
            .with_expectation(expect_consistent_board),
        "restart" => SimulationPlan::new(Strategy::Optimal)
            .with_restart_after(GamePhase::Insight)
            .with_expectation(expect_finished)
            .with_expectation(expect_single_restart),
        _ => return None,
    };
    Some(TestScenario::simulation(*key, *description, plan))
}

fn expect_finished(summary: &SimulationSummary) -> Result<()> {
    ensure!(
        summary.history.len() == 4,
        "expected four stage logs, got {:?}",
        summary.history
    );
    ensure!(!summary.prize.is_empty(), "no prize drawn");
    ensure!(!summary.narrative.is_empty(), "empty report");
    Ok(())
}

fn expect_optimal_archer(summary: &SimulationSummary) -> Result<()> {
    ensure!(
        summary.final_stats.quiz_score == OPTIMAL_ARCHER_SCORE,
        "score {} != {OPTIMAL_ARCHER_SCORE}",
        summary.final_stats.quiz_score
    );
    Ok(())
}

fn expect_stats_in_bounds(summary: &SimulationSummary) -> Result<()> {
    let stats = &summary.final_stats;
    ensure!(
        stats.hp > 0 && stats.hp <= stats.max_hp,
        "hp {} outside 1..={}",
        stats.hp,
        stats.max_hp
    );
    ensure!(stats.gold >= 0, "negative gold {}", stats.gold);
    ensure!(stats.enemy_hp == 0, "enemy left standing at {}", stats.enemy_hp);
    ensure!(stats.combo_multiplier == 1, "combo not reset");
    let voice = stats.voice_score.unwrap_or(0);
    ensure!((40..=100).contains(&voice), "voice score {voice} out of range");
    Ok(())
}

fn expect_mercy_voice(summary: &SimulationSummary) -> Result<()> {
    ensure!(
        summary.final_stats.voice_score == Some(MERCY_SCORE),
        "voice score {:?} should be lifted to {MERCY_SCORE}",
        summary.final_stats.voice_score
    );
    Ok(())
}

fn expect_consistent_board(summary: &SimulationSummary) -> Result<()> {
    let board = &summary.result.leaderboard;
    ensure!(
        board.windows(2).all(|w| w[0].score >= w[1].score),
        "leaderboard not sorted"
    );
    ensure!(
        board.iter().enumerate().all(|(i, e)| e.rank == i + 1),
        "ranks not contiguous"
    );
    let player = board.iter().filter(|e| e.is_player).count();
    ensure!(player == 1, "expected exactly one player row, found {player}");
    ensure!(
        summary.result.celebrate == (summary.result.final_score > 1_000),
        "celebration flag disagrees with score {}",
        summary.result.final_score
    );
    Ok(())
}

fn expect_celebration(summary: &SimulationSummary) -> Result<()> {
    ensure!(summary.result.celebrate, "optimal run did not celebrate");
    ensure!(summary.result.player_rank.is_some(), "player missing from board");
    Ok(())
}

fn expect_single_restart(summary: &SimulationSummary) -> Result<()> {
    ensure!(summary.restarts == 1, "restarts {}", summary.restarts);
    Ok(())
}
