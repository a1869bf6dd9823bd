#![allow(dead_code)]

use yalda_game::{
    CaptureEvent, CharacterClass, GamePhase, QuizContent, ScoringConfig, SessionController,
    StageInput, StagePrompt,
};

/// How the scripted player answers each prompt.
pub trait Player {
    fn answer(&mut self, index: usize, text: &str) -> bool;
    fn arena(&mut self, options: &[yalda_game::ArenaOption; 3]) -> usize;
    fn insight(&mut self, options: &[yalda_game::InsightOption; 3]) -> usize;
    fn shield_before(&mut self, _scenario: usize) -> bool {
        false
    }
    /// `None` denies capture; otherwise the frames fed before the countdown ends.
    fn capture(&mut self) -> Option<Vec<Vec<u8>>>;
}

/// Picks every best-scoring option and denies capture.
pub struct Optimal;

impl Player for Optimal {
    fn answer(&mut self, _index: usize, text: &str) -> bool {
        !text.contains("fear of failure")
    }

    fn arena(&mut self, options: &[yalda_game::ArenaOption; 3]) -> usize {
        best_by(options.iter().map(|o| o.damage - o.self_damage))
    }

    fn insight(&mut self, options: &[yalda_game::InsightOption; 3]) -> usize {
        best_by(options.iter().map(|o| o.score))
    }

    fn capture(&mut self) -> Option<Vec<Vec<u8>>> {
        None
    }
}

pub fn best_by(scores: impl Iterator<Item = i32>) -> usize {
    scores
        .enumerate()
        .max_by_key(|(idx, score)| (*score, std::cmp::Reverse(*idx)))
        .map_or(0, |(idx, _)| idx)
}

pub fn new_session(seed: u64) -> SessionController {
    SessionController::new(
        QuizContent::load_from_static().unwrap(),
        ScoringConfig::default(),
        seed,
    )
}

/// Drive the current stage to completion with `player`.
pub fn play_stage(session: &mut SessionController, player: &mut dyn Player) {
    match session.phase() {
        GamePhase::Analysis => {
            while let Some(StagePrompt::YesNo { index, text, .. }) = session.prompt() {
                let yes = player.answer(index, text);
                session.input(StageInput::Answer(yes)).unwrap();
            }
        }
        GamePhase::Arena => {
            while let Some(StagePrompt::Battle {
                index,
                options,
                shield,
                ..
            }) = session.prompt()
            {
                let choice = player.arena(options);
                if shield == yalda_game::ShieldState::Available && player.shield_before(index) {
                    session.input(StageInput::ArmShield).unwrap();
                }
                session.input(StageInput::Pick(choice)).unwrap();
                session.resolve_feedback().unwrap();
            }
        }
        GamePhase::Insight => {
            while let Some(StagePrompt::Choice { options, .. }) = session.prompt() {
                let choice = player.insight(options);
                session.input(StageInput::Pick(choice)).unwrap();
            }
        }
        GamePhase::Pitch => {
            match player.capture() {
                None => {
                    session.input(StageInput::Capture(CaptureEvent::Denied)).unwrap();
                }
                Some(frames) => {
                    session.input(StageInput::Capture(CaptureEvent::Start)).unwrap();
                    for frame in frames {
                        session
                            .input(StageInput::Capture(CaptureEvent::Frame(frame)))
                            .unwrap();
                    }
                }
            }
            while session.prompt().is_some() {
                session.tick();
            }
        }
        GamePhase::Intro | GamePhase::Result => {}
    }
}

/// Play a whole session from the gate to the result screen.
pub fn play_full(seed: u64, class: CharacterClass, player: &mut dyn Player) -> SessionController {
    let mut session = new_session(seed);
    session.start("Tester", "0912", class).unwrap();
    session.commit().unwrap();
    while session.phase() != GamePhase::Result {
        play_stage(&mut session, player);
        session.complete_stage().unwrap();
        session.commit().unwrap();
    }
    session
}
