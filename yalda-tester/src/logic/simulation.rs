use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use log::debug;
use serde::Serialize;
use sha2::{Digest, Sha256};
use yalda_game::{
    AsyncReportService, AsyncTextGenerator, CaptureEvent, CharacterClass, GamePhase,
    GenerationError, OfflineGenerator, PlayerStats, QuizContent, ResultSummary, ScoringConfig,
    SessionController, SessionState, ShieldState, StageInput, StagePrompt, TextGenerator,
};

use super::policy::{PlayerPolicy, Strategy};

const SYNTHETIC_FRAMES: usize = 4;
const SYNTHETIC_BINS: usize = 32;

/// Check run against a finished simulation.
pub type Expectation = fn(&SimulationSummary) -> Result<()>;

/// What to play and what must hold afterwards.
#[derive(Debug, Clone)]
pub struct SimulationPlan {
    /// Fixed class, or rotate through all three by seed.
    pub class: Option<CharacterClass>,
    pub strategy: Strategy,
    /// Restart once right after this phase is committed, then play through.
    pub restart_after: Option<GamePhase>,
    pub expectations: Vec<Expectation>,
}

impl SimulationPlan {
    #[must_use]
    pub const fn new(strategy: Strategy) -> Self {
        Self {
            class: None,
            strategy,
            restart_after: None,
            expectations: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_class(mut self, class: CharacterClass) -> Self {
        self.class = Some(class);
        self
    }

    #[must_use]
    pub fn with_restart_after(mut self, phase: GamePhase) -> Self {
        self.restart_after = Some(phase);
        self
    }

    #[must_use]
    pub fn with_expectation(mut self, expectation: Expectation) -> Self {
        self.expectations.push(expectation);
        self
    }

    #[must_use]
    pub fn class_for(&self, seed: u64) -> CharacterClass {
        self.class.unwrap_or_else(|| {
            let idx = usize::try_from(seed % 3).unwrap_or(0);
            CharacterClass::ALL[idx]
        })
    }
}

/// Outcome of one simulated session.
#[derive(Debug, Clone, Serialize)]
pub struct SimulationSummary {
    pub seed: u64,
    pub strategy: Strategy,
    pub class: CharacterClass,
    pub final_stats: PlayerStats,
    pub result: ResultSummary,
    pub history: Vec<String>,
    pub prize: String,
    pub narrative: String,
    pub restarts: u32,
    /// Hex SHA-256 of the serialized final state and prize.
    pub digest: String,
}

/// Offline text generation behind the async seam.
struct OfflineAsync;

#[async_trait]
impl AsyncTextGenerator for OfflineAsync {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        OfflineGenerator.generate(prompt)
    }
}

/// Drives whole sessions with a policy.
pub struct Simulator {
    content: Arc<QuizContent>,
    cfg: ScoringConfig,
    reports: AsyncReportService<OfflineAsync>,
}

impl Simulator {
    /// Simulator over the embedded content with loading delays removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the embedded content or default tuning is invalid.
    pub fn try_new() -> Result<Self> {
        let content = QuizContent::load_from_static().context("loading quiz content")?;
        let cfg = ScoringConfig::default().without_delays();
        cfg.validate().context("validating scoring config")?;
        content
            .validate(cfg.insight.sample_size)
            .context("validating quiz content")?;
        Ok(Self {
            content: Arc::new(content),
            cfg,
            reports: AsyncReportService::new(OfflineAsync, Duration::from_secs(2)),
        })
    }

    /// Play `plan` once for `seed`.
    ///
    /// # Errors
    ///
    /// Returns an error if the session rejects any scripted input.
    pub async fn run_plan(&self, plan: &SimulationPlan, seed: u64) -> Result<SimulationSummary> {
        let class = plan.class_for(seed);
        let mut policy = plan.strategy.create_policy(seed);
        let mut session =
            SessionController::new(self.content.as_ref().clone(), self.cfg.clone(), seed);
        let mut restarts = 0;
        debug!("seed {seed}: {} policy playing {class}", policy.name());

        session.start_and_wait("Simulated", "0912", class).await?;
        while session.phase() != GamePhase::Result {
            play_stage(&mut session, policy.as_mut())?;
            let reached = session.advance_and_wait().await?;
            debug!("seed {seed}: reached {reached}");
            if restarts == 0 && plan.restart_after == Some(reached) {
                session.restart();
                restarts += 1;
                if session.phase() != GamePhase::Intro || session.stats().quiz_score != 0 {
                    bail!("restart did not return to a clean intro");
                }
                session.start_and_wait("Simulated", "0912", class).await?;
            }
        }

        let prize = session.spin_prize()?;
        let Some(result) = session.summary() else {
            bail!("no result summary at {}", session.phase());
        };
        let narrative = self
            .reports
            .generate_report(session.stats(), session.history())
            .await;

        Ok(SimulationSummary {
            seed,
            strategy: plan.strategy,
            class,
            final_stats: session.stats().clone(),
            result,
            history: session.history().to_vec(),
            digest: state_digest(session.state(), &prize)?,
            prize,
            narrative,
            restarts,
        })
    }
}

/// Feed the active stage from `policy` until it reports completion.
fn play_stage(session: &mut SessionController, policy: &mut dyn PlayerPolicy) -> Result<()> {
    match session.phase() {
        GamePhase::Analysis => {
            while let Some(StagePrompt::YesNo { index, .. }) = session.prompt() {
                let question = session
                    .content()
                    .analysis
                    .questions
                    .get(index)
                    .with_context(|| format!("analysis question {index} missing"))?;
                let yes = policy.answer(question);
                session.input(StageInput::Answer(yes))?;
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
                let choice = policy.arena(options);
                if shield == ShieldState::Available && policy.arm_shield(index) {
                    session.input(StageInput::ArmShield)?;
                }
                session.input(StageInput::Pick(choice))?;
                session.resolve_feedback()?;
            }
        }
        GamePhase::Insight => {
            while let Some(StagePrompt::Choice { options, .. }) = session.prompt() {
                let choice = policy.insight(options);
                session.input(StageInput::Pick(choice))?;
            }
        }
        GamePhase::Pitch => {
            match policy.capture() {
                None => {
                    session.input(StageInput::Capture(CaptureEvent::Denied))?;
                }
                Some(frames) if frames.is_empty() => {
                    session.input(StageInput::Capture(CaptureEvent::Start))?;
                    for _ in 0..SYNTHETIC_FRAMES {
                        let frame = session.synthetic_frame(SYNTHETIC_BINS);
                        session.input(StageInput::Capture(CaptureEvent::Frame(frame)))?;
                    }
                }
                Some(frames) => {
                    session.input(StageInput::Capture(CaptureEvent::Start))?;
                    for frame in frames {
                        session.input(StageInput::Capture(CaptureEvent::Frame(frame)))?;
                    }
                }
            }
            while session.prompt().is_some() {
                session.tick();
            }
        }
        GamePhase::Intro | GamePhase::Result => {}
    }
    Ok(())
}

/// Hex SHA-256 over the serialized session state and the drawn prize.
///
/// # Errors
///
/// Returns an error if the state cannot be serialized.
pub fn state_digest(state: &SessionState, prize: &str) -> Result<String> {
    let mut hasher = Sha256::new();
    hasher.update(serde_json::to_vec(state)?);
    hasher.update(prize.as_bytes());
    Ok(format!("{:x}", hasher.finalize()))
}
