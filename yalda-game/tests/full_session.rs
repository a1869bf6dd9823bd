mod common;

use common::{Optimal, Player, new_session, play_full, play_stage};
use yalda_game::{
    ArenaOption, CharacterClass, GamePhase, HudSnapshot, InsightOption, SessionError, StageInput,
    claim_message,
};

#[test]
fn optimal_archer_reaches_result_screen() {
    let session = play_full(0x59A1_DA00, CharacterClass::Archer, &mut Optimal);
    let stats = session.stats();

    assert_eq!(session.phase(), GamePhase::Result);
    assert_eq!(session.progress(), 4);
    assert_eq!(stats.quiz_score, 572 + 200 + 60 + 425);
    assert_eq!(stats.gold, 5_720 + 500 + 600 + 200);
    assert_eq!(stats.hp, 100);
    assert_eq!(stats.enemy_hp, 0);
    assert_eq!(stats.energy, 80);
    assert_eq!(stats.max_combo, 20);
    assert_eq!(stats.combo_multiplier, 1);
    assert_eq!(stats.voice_score, Some(85));
    assert_eq!(stats.title, "Market Legend");

    let history = session.history();
    assert_eq!(history.len(), 4);
    assert_eq!(history[0], "Level 1 Analysis Score: 572. Max Combo: 20");
    assert_eq!(history[1], "Arena Victory. HP Left: 100");
    assert_eq!(history[2], "Level 3 Visual Score: 60. Total: 832");
    assert_eq!(history[3], "Pitch Challenge Score: 85");
}

#[test]
fn result_summary_celebrates_and_ranks_player() {
    let mut session = play_full(7, CharacterClass::Guardian, &mut Optimal);
    assert!(session.hud().is_none());

    let prize = session.spin_prize().unwrap();
    assert!(session.content().prizes.contains(&prize));
    assert!(matches!(
        session.spin_prize(),
        Err(SessionError::Reward(_))
    ));

    let summary = session.summary().unwrap();
    assert!(summary.celebrate);
    assert_eq!(summary.final_score, 572 + 240 + 60 + 425);
    assert_eq!(summary.player_rank, Some(6));
    assert_eq!(summary.prize.as_deref(), Some(prize.as_str()));
    assert_eq!(summary.name, "Tester");

    let claim = claim_message(session.stats(), &prize);
    assert!(claim.contains("1297"));

    assert!(session.chest().is_locked());
    session.share_invite();
    assert!(!session.chest().is_locked());
}

#[test]
fn mage_gold_is_replaced_by_analysis_payout() {
    let mut session = new_session(3);
    session.start("Darius", "0935", CharacterClass::Mage).unwrap();
    session.commit().unwrap();
    assert_eq!(session.stats().gold, 500);
    play_stage(&mut session, &mut Optimal);
    session.complete_stage().unwrap();
    session.commit().unwrap();
    assert_eq!(session.stats().gold, 5_720);
}

#[test]
fn hud_tracks_stage_number() {
    let mut session = new_session(11);
    assert!(session.hud().is_none());
    session.start("Parisa", "0901", CharacterClass::Archer).unwrap();
    assert!(session.hud().is_none());
    session.commit().unwrap();
    let mut seen = Vec::new();
    while session.phase() != GamePhase::Result {
        let hud: HudSnapshot = session.hud().unwrap();
        seen.push(hud.stage);
        play_stage(&mut session, &mut Optimal);
        session.complete_stage().unwrap();
        session.commit().unwrap();
    }
    assert_eq!(seen, vec![1, 2, 3, 4]);
}

struct Careless;

impl Player for Careless {
    fn answer(&mut self, _index: usize, _text: &str) -> bool {
        false
    }

    fn arena(&mut self, options: &[ArenaOption; 3]) -> usize {
        common::best_by(options.iter().map(|o| o.self_damage))
    }

    fn insight(&mut self, options: &[InsightOption; 3]) -> usize {
        common::best_by(options.iter().map(|o| -o.score))
    }

    fn capture(&mut self) -> Option<Vec<Vec<u8>>> {
        Some(vec![vec![10; 16]])
    }
}

#[test]
fn careless_run_keeps_invariants_and_mercy_score() {
    let session = play_full(99, CharacterClass::Guardian, &mut Careless);
    let stats = session.stats();
    assert_eq!(stats.voice_score, Some(50));
    assert!(stats.hp > 0 && stats.hp <= stats.max_hp);
    assert!(stats.gold >= 0);
    assert_eq!(stats.title, "Intern");
    // knocked down on the last scenario, replays it and ends on 40 hp
    assert_eq!(stats.hp, 40);
    assert_eq!(stats.quiz_score, 7 + 80 + 250);
    assert!(!session.summary().unwrap().celebrate);
}

#[test]
fn restart_mid_run_returns_to_gate() {
    let mut session = new_session(5);
    session.start("Babak", "0912", CharacterClass::Archer).unwrap();
    session.commit().unwrap();
    session.input(StageInput::Answer(true)).unwrap();
    session.restart();
    assert_eq!(session.phase(), GamePhase::Intro);
    assert_eq!(session.stats().quiz_score, 0);
    assert!(session.history().is_empty());
    assert_eq!(session.progress(), 0);
    assert_eq!(
        session.input(StageInput::Answer(true)),
        Err(SessionError::NoActiveStage(GamePhase::Intro))
    );
}
