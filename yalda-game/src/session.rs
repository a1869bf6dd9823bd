//! Session controller: phase progression, loading gate and stage ownership.
use std::time::Duration;

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::audio::{AudioBackend, MusicToggle};
use crate::classes::CharacterClass;
use crate::config::ScoringConfig;
use crate::constants::LOG_TARGET;
use crate::data::QuizContent;
use crate::phase::GamePhase;
use crate::result::{HudSnapshot, ResultSummary, result_summary};
use crate::reward::{PrizeWheel, RewardChest, RewardError};
use crate::rng::RngBundle;
use crate::stage::{
    ActiveStage, StageCompletion, StageError, StageInput, StagePrompt, StageStep, synthetic_frame,
};
use crate::stats::PlayerStats;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("a transition to {pending} is already in flight")]
    TransitionInFlight { pending: GamePhase },
    #[error("cannot move from {from} to {to}")]
    InvalidTransition { from: GamePhase, to: GamePhase },
    #[error("{field} must not be empty")]
    EmptyIdentity { field: &'static str },
    #[error("class {0} is not offered by the loaded content")]
    UnknownClass(String),
    #[error("no transition is pending")]
    NoPending,
    #[error("completion would lower {field} from {current} to {proposed}")]
    Regression {
        field: &'static str,
        current: i64,
        proposed: i64,
    },
    #[error("the {0} stage is not complete")]
    StageIncomplete(GamePhase),
    #[error("no stage is active in the {0} phase")]
    NoActiveStage(GamePhase),
    #[error("prize wheel is only available on the result screen")]
    NotFinished,
    #[error(transparent)]
    Stage(#[from] StageError),
    #[error(transparent)]
    Reward(#[from] RewardError),
}

/// Owned snapshot of a session's progression.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SessionState {
    pub phase: GamePhase,
    pub stats: PlayerStats,
    /// Append-only stage log.
    pub history: Vec<String>,
    /// Number of completed stages.
    pub progress: u32,
}

/// Handle describing a transition waiting to be committed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionTicket {
    pub to: GamePhase,
    /// How long the host should show the loading screen before `commit`.
    pub delay: Duration,
}

#[derive(Debug, Clone)]
struct PendingTransition {
    to: GamePhase,
    stats: PlayerStats,
    log: Option<String>,
}

/// Drives one player's session through the phase sequence.
///
/// Transitions are two-step: `start`/`advance` open a loading window and
/// return a [`TransitionTicket`]; `commit` applies it once the delay has
/// elapsed. Only one transition may be in flight.
#[derive(Debug, Clone)]
pub struct SessionController {
    content: QuizContent,
    cfg: ScoringConfig,
    rng: RngBundle,
    state: SessionState,
    pending: Option<PendingTransition>,
    active: Option<ActiveStage>,
    music: MusicToggle,
    wheel: PrizeWheel,
    chest: RewardChest,
}

impl SessionController {
    #[must_use]
    pub fn new(content: QuizContent, cfg: ScoringConfig, seed: u64) -> Self {
        let wheel = PrizeWheel::new(content.prizes.clone(), cfg.rewards.prizes_per_session);
        Self {
            content,
            cfg,
            rng: RngBundle::from_user_seed(seed),
            state: SessionState::default(),
            pending: None,
            active: None,
            music: MusicToggle::default(),
            wheel,
            chest: RewardChest::default(),
        }
    }

    /// Consume the controller, keeping only its state.
    #[must_use]
    pub fn into_state(self) -> SessionState {
        self.state
    }

    /// Enter the gate: apply a class preset to fresh stats and queue stage 1.
    ///
    /// # Errors
    ///
    /// Rejects blank identity fields, a session past the intro, a transition
    /// already in flight, and classes missing from the content.
    pub fn start(
        &mut self,
        name: &str,
        phone_number: &str,
        class: CharacterClass,
    ) -> Result<TransitionTicket, SessionError> {
        self.ensure_idle()?;
        self.check_transition(GamePhase::Analysis)?;
        let name = name.trim();
        let phone_number = phone_number.trim();
        if name.is_empty() {
            return Err(SessionError::EmptyIdentity { field: "name" });
        }
        if phone_number.is_empty() {
            return Err(SessionError::EmptyIdentity {
                field: "phone_number",
            });
        }
        let preset = self
            .content
            .classes
            .get(class)
            .ok_or_else(|| SessionError::UnknownClass(class.to_string()))?;

        let mut stats = PlayerStats {
            name: name.to_string(),
            phone_number: phone_number.to_string(),
            ..PlayerStats::default()
        };
        preset.apply(&mut stats);
        info!(target: LOG_TARGET, "session start: {name} as {class}");
        Ok(self.open_transition(GamePhase::Analysis, stats, None, self.cfg.session.start_delay()))
    }

    /// Queue the move past the current stage using its completion.
    ///
    /// # Errors
    ///
    /// Rejects calls while loading, from phases with no stage successor, and
    /// completions that would lower the quiz score or the max combo.
    pub fn advance(&mut self, completion: StageCompletion) -> Result<TransitionTicket, SessionError> {
        self.ensure_idle()?;
        let from = self.state.phase;
        let to = from.next().unwrap_or(from);
        // the gate only opens through `start`
        if !from.is_stage() {
            return Err(self.reject(to));
        }
        self.check_transition(to)?;
        self.check_progression(&completion.stats)?;
        if let Some(stage) = self.active.as_mut() {
            stage.cancel_timers();
        }
        self.active = None;
        Ok(self.open_transition(
            to,
            completion.stats,
            Some(completion.log),
            self.cfg.session.advance_delay(),
        ))
    }

    /// Take the active stage's completion and queue the next phase.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::StageIncomplete` until the stage has finished.
    pub fn complete_stage(&mut self) -> Result<TransitionTicket, SessionError> {
        self.ensure_idle()?;
        let phase = self.state.phase;
        let stage = self
            .active
            .as_ref()
            .ok_or(SessionError::NoActiveStage(phase))?;
        let completion = stage
            .completion()
            .ok_or(SessionError::StageIncomplete(phase))?;
        self.advance(completion)
    }

    /// Apply the pending transition. Returns the new phase.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NoPending` when nothing is in flight.
    pub fn commit(&mut self) -> Result<GamePhase, SessionError> {
        let pending = self.pending.take().ok_or(SessionError::NoPending)?;
        let from = self.state.phase;
        self.state.stats = pending.stats;
        if let Some(log) = pending.log {
            self.state.history.push(log);
            self.state.progress += 1;
        }
        self.state.phase = pending.to;
        self.active = ActiveStage::build(
            pending.to,
            &self.state.stats,
            &self.content,
            &self.cfg,
            &mut self.rng,
        );
        info!(
            target: LOG_TARGET,
            "phase {from} -> {} (score {}, progress {})",
            pending.to,
            self.state.stats.quiz_score,
            self.state.progress
        );
        Ok(pending.to)
    }

    /// Back to the intro with fresh stats. Cancels any in-flight transition.
    pub fn restart(&mut self) {
        if let Some(pending) = self.pending.take() {
            debug!(target: LOG_TARGET, "restart cancelled transition to {}", pending.to);
        }
        if let Some(stage) = self.active.as_mut() {
            stage.cancel_timers();
        }
        self.active = None;
        self.state = SessionState::default();
        self.wheel = PrizeWheel::new(
            self.content.prizes.clone(),
            self.cfg.rewards.prizes_per_session,
        );
        self.chest = RewardChest::default();
        info!(target: LOG_TARGET, "session restarted");
    }

    /// Feed one input to the active stage.
    ///
    /// # Errors
    ///
    /// Rejects input while loading, outside a stage, and anything the stage
    /// itself refuses.
    pub fn input(&mut self, input: StageInput) -> Result<StageStep, SessionError> {
        self.ensure_idle()?;
        let phase = self.state.phase;
        let stage = self
            .active
            .as_mut()
            .ok_or(SessionError::NoActiveStage(phase))?;
        stage.apply(input).map_err(|err| {
            warn!(target: LOG_TARGET, "rejected input in {phase}: {err}");
            SessionError::Stage(err)
        })
    }

    /// Close the arena feedback window.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Stage` when no feedback is pending.
    pub fn resolve_feedback(&mut self) -> Result<StageStep, SessionError> {
        let phase = self.state.phase;
        let stage = self
            .active
            .as_mut()
            .ok_or(SessionError::NoActiveStage(phase))?;
        Ok(stage.resolve()?)
    }

    /// One countdown tick for the active stage. Ignored while loading.
    pub fn tick(&mut self) {
        if self.pending.is_some() {
            return;
        }
        if let Some(stage) = self.active.as_mut() {
            stage.tick();
        }
    }

    #[must_use]
    pub fn prompt(&self) -> Option<StagePrompt<'_>> {
        if self.pending.is_some() {
            return None;
        }
        self.active.as_ref().and_then(ActiveStage::present)
    }

    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    #[must_use]
    pub fn pending_phase(&self) -> Option<GamePhase> {
        self.pending.as_ref().map(|p| p.to)
    }

    #[must_use]
    pub const fn phase(&self) -> GamePhase {
        self.state.phase
    }

    #[must_use]
    pub const fn stats(&self) -> &PlayerStats {
        &self.state.stats
    }

    #[must_use]
    pub fn history(&self) -> &[String] {
        &self.state.history
    }

    #[must_use]
    pub const fn progress(&self) -> u32 {
        self.state.progress
    }

    #[must_use]
    pub const fn state(&self) -> &SessionState {
        &self.state
    }

    #[must_use]
    pub const fn active_stage(&self) -> Option<&ActiveStage> {
        self.active.as_ref()
    }

    #[must_use]
    pub const fn content(&self) -> &QuizContent {
        &self.content
    }

    #[must_use]
    pub const fn config(&self) -> &ScoringConfig {
        &self.cfg
    }

    /// Session seed driving sampling and the prize wheel.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.rng.seed()
    }

    /// Random capture frame from the session's capture stream, for hosts
    /// that have no microphone but still feed the pitch stage.
    pub fn synthetic_frame(&mut self, bins: usize) -> Vec<u8> {
        synthetic_frame(self.rng.capture(), bins, u8::MAX)
    }

    #[must_use]
    pub fn hud(&self) -> Option<HudSnapshot> {
        HudSnapshot::capture(self.state.phase, &self.state.stats, self.is_loading())
    }

    pub fn toggle_music(&mut self, backend: &mut dyn AudioBackend) -> bool {
        self.music.toggle(backend)
    }

    #[must_use]
    pub const fn is_music_playing(&self) -> bool {
        self.music.is_playing()
    }

    /// Spin the prize wheel on the result screen.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotFinished` before the result phase and
    /// `SessionError::Reward` once the prize is drawn.
    pub fn spin_prize(&mut self) -> Result<String, SessionError> {
        if self.state.phase != GamePhase::Result {
            return Err(SessionError::NotFinished);
        }
        Ok(self.wheel.spin(self.rng.prize())?.to_string())
    }

    #[must_use]
    pub fn prize(&self) -> Option<&str> {
        self.wheel.prize()
    }

    pub fn share_invite(&mut self) -> &'static str {
        self.chest.share_invite()
    }

    #[must_use]
    pub const fn chest(&self) -> RewardChest {
        self.chest
    }

    /// Result screen data, available once the session has finished.
    #[must_use]
    pub fn summary(&self) -> Option<ResultSummary> {
        (self.state.phase == GamePhase::Result).then(|| {
            result_summary(
                &self.state.stats,
                &self.content.leaderboard,
                &self.cfg.rewards,
                self.wheel.prize(),
            )
        })
    }

    fn ensure_idle(&self) -> Result<(), SessionError> {
        match &self.pending {
            Some(pending) => {
                warn!(
                    target: LOG_TARGET,
                    "transition request rejected; {} already in flight",
                    pending.to
                );
                Err(SessionError::TransitionInFlight {
                    pending: pending.to,
                })
            }
            None => Ok(()),
        }
    }

    fn check_transition(&self, to: GamePhase) -> Result<(), SessionError> {
        if self.state.phase.can_transition(to) {
            Ok(())
        } else {
            Err(self.reject(to))
        }
    }

    fn check_progression(&self, next: &PlayerStats) -> Result<(), SessionError> {
        let current = &self.state.stats;
        if next.quiz_score < current.quiz_score {
            return Err(SessionError::Regression {
                field: "quiz_score",
                current: i64::from(current.quiz_score),
                proposed: i64::from(next.quiz_score),
            });
        }
        if next.max_combo < current.max_combo {
            return Err(SessionError::Regression {
                field: "max_combo",
                current: i64::from(current.max_combo),
                proposed: i64::from(next.max_combo),
            });
        }
        Ok(())
    }

    fn reject(&self, to: GamePhase) -> SessionError {
        warn!(target: LOG_TARGET, "invalid transition {} -> {to}", self.state.phase);
        SessionError::InvalidTransition {
            from: self.state.phase,
            to,
        }
    }

    fn open_transition(
        &mut self,
        to: GamePhase,
        stats: PlayerStats,
        log: Option<String>,
        delay: Duration,
    ) -> TransitionTicket {
        debug!(target: LOG_TARGET, "loading {to} for {delay:?}");
        self.pending = Some(PendingTransition { to, stats, log });
        TransitionTicket { to, delay }
    }
}

#[cfg(feature = "async")]
impl SessionController {
    /// `start`, wait out the loading delay, then `commit`.
    ///
    /// # Errors
    ///
    /// Propagates errors from [`SessionController::start`].
    pub async fn start_and_wait(
        &mut self,
        name: &str,
        phone_number: &str,
        class: CharacterClass,
    ) -> Result<GamePhase, SessionError> {
        let ticket = self.start(name, phone_number, class)?;
        tokio::time::sleep(ticket.delay).await;
        self.commit()
    }

    /// `complete_stage`, wait out the loading delay, then `commit`.
    ///
    /// # Errors
    ///
    /// Propagates errors from [`SessionController::complete_stage`].
    pub async fn advance_and_wait(&mut self) -> Result<GamePhase, SessionError> {
        let ticket = self.complete_stage()?;
        tokio::time::sleep(ticket.delay).await;
        self.commit()
    }
}
