//! Stage 4: timed voice pitch scored from the peak capture energy.
use log::{debug, info, warn};
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::{Stage, StageCompletion, StageError, StagePrompt, StageStep};
use crate::aggregate::{GoldChange, StatsDelta, merge};
use crate::config::PitchConfig;
use crate::constants::{COMBO_BASELINE, LOG_TARGET};
use crate::countdown::Countdown;
use crate::numbers::{floor_f64_to_u32, mean_u8, saturating_u32_to_i32};
use crate::stats::PlayerStats;

/// Where capture energy comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaptureMode {
    /// Waiting for the player to begin.
    #[default]
    Idle,
    /// Sampling real frames.
    Live,
    /// Capture was denied; the stage awards the simulated score.
    Simulated,
}

/// Input fed to the pitch stage by the host's capture source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CaptureEvent {
    /// Capture access granted; the countdown starts.
    Start,
    /// Capture access refused; switch to the simulated path.
    Denied,
    /// One frame of frequency-bin magnitudes.
    Frame(Vec<u8>),
}

/// Mean energy of one frame. Empty frames carry no energy.
#[must_use]
pub fn frame_energy(frame: &[u8]) -> f64 {
    mean_u8(frame)
}

/// Random frame for hosts without a capture device.
pub fn synthetic_frame<R: Rng + ?Sized>(rng: &mut R, bins: usize, ceiling: u8) -> Vec<u8> {
    (0..bins).map(|_| rng.gen_range(0..=ceiling)).collect()
}

#[derive(Debug, Clone)]
pub struct PitchStage {
    cfg: PitchConfig,
    baseline: PlayerStats,
    mode: CaptureMode,
    countdown: Countdown,
    peak: f64,
    frames: u32,
    finished: bool,
}

impl PitchStage {
    #[must_use]
    pub fn new(stats: &PlayerStats, cfg: &PitchConfig) -> Self {
        Self {
            cfg: cfg.clone(),
            baseline: stats.clone(),
            mode: CaptureMode::Idle,
            countdown: Countdown::new(cfg.ticks),
            peak: 0.0,
            frames: 0,
            finished: false,
        }
    }

    #[must_use]
    pub const fn mode(&self) -> CaptureMode {
        self.mode
    }

    /// Highest frame energy seen so far.
    #[must_use]
    pub const fn peak(&self) -> f64 {
        self.peak
    }

    #[must_use]
    pub const fn remaining(&self) -> u32 {
        self.countdown.remaining()
    }

    /// Score before the mercy floor is applied.
    #[must_use]
    pub fn raw_score(&self) -> u32 {
        match self.mode {
            CaptureMode::Simulated => self.cfg.simulated_score,
            CaptureMode::Idle | CaptureMode::Live => {
                let scaled = floor_f64_to_u32(self.peak / self.cfg.peak_scale * 100.0);
                scaled.min(self.cfg.max_score)
            }
        }
    }

    /// Final voice score with the mercy floor applied.
    #[must_use]
    pub fn final_score(&self) -> u32 {
        let raw = self.raw_score();
        if raw < self.cfg.mercy_threshold {
            self.cfg.mercy_score
        } else {
            raw
        }
    }

    fn finish(&mut self) {
        self.finished = true;
        self.countdown.cancel();
        info!(
            target: LOG_TARGET,
            "pitch finished ({:?}, {} frames, peak {:.1}) -> score {}",
            self.mode,
            self.frames,
            self.peak,
            self.final_score()
        );
    }
}

impl Stage for PitchStage {
    type Choice = CaptureEvent;

    fn present(&self) -> Option<StagePrompt<'_>> {
        if self.finished {
            return None;
        }
        Some(StagePrompt::Capture {
            mode: self.mode,
            remaining: self.countdown.remaining(),
            peak: self.peak,
        })
    }

    fn score(&mut self, event: CaptureEvent) -> Result<StageStep, StageError> {
        if self.finished {
            return Err(StageError::Complete);
        }
        match event {
            CaptureEvent::Start => {
                if self.mode == CaptureMode::Idle {
                    self.mode = CaptureMode::Live;
                    self.countdown.reset();
                }
            }
            CaptureEvent::Denied => {
                if self.mode == CaptureMode::Idle {
                    self.countdown.reset();
                }
                warn!(target: LOG_TARGET, "capture denied; using simulated pitch score");
                self.mode = CaptureMode::Simulated;
            }
            CaptureEvent::Frame(frame) => match self.mode {
                CaptureMode::Idle => return Err(StageError::CaptureNotStarted),
                CaptureMode::Simulated => {}
                CaptureMode::Live => {
                    let energy = frame_energy(&frame);
                    self.frames += 1;
                    if energy > self.peak {
                        debug!(target: LOG_TARGET, "pitch peak {:.1} -> {:.1}", self.peak, energy);
                        self.peak = energy;
                    }
                }
            },
        }
        Ok(StageStep::scored(0, false))
    }

    fn is_complete(&self) -> bool {
        self.finished
    }

    fn completion(&self) -> Option<StageCompletion> {
        if !self.finished {
            return None;
        }
        let score = self.final_score();
        let gain = saturating_u32_to_i32(score).saturating_mul(self.cfg.score_multiplier);
        let delta = StatsDelta {
            quiz_score_gain: gain,
            gold: GoldChange::Add(self.cfg.gold_reward),
            combo_multiplier: Some(COMBO_BASELINE),
            voice_score: Some(score),
            ..StatsDelta::default()
        };
        Some(StageCompletion {
            stats: merge(&self.baseline, &delta),
            log: format!("Pitch Challenge Score: {score}"),
        })
    }

    /// Ticks only count once capture has started or been denied.
    fn tick(&mut self) {
        if self.finished || self.mode == CaptureMode::Idle {
            return;
        }
        if self.countdown.tick() == 0 {
            self.finish();
        }
    }

    fn cancel_timers(&mut self) {
        self.countdown.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    fn run_out(stage: &mut PitchStage) {
        for _ in 0..10 {
            stage.tick();
        }
    }

    fn live_with_peak(level: u8) -> PitchStage {
        let mut stage = PitchStage::new(&PlayerStats::default(), &PitchConfig::default());
        stage.score(CaptureEvent::Start).unwrap();
        stage.score(CaptureEvent::Frame(vec![level; 32])).unwrap();
        run_out(&mut stage);
        stage
    }

    #[test]
    fn countdown_waits_for_start() {
        let mut stage = PitchStage::new(&PlayerStats::default(), &PitchConfig::default());
        run_out(&mut stage);
        assert!(!stage.is_complete());
        assert_eq!(stage.remaining(), 10);
        assert_eq!(
            stage.score(CaptureEvent::Frame(vec![200])),
            Err(StageError::CaptureNotStarted)
        );
    }

    #[test]
    fn peak_is_scaled_and_capped() {
        let stage = live_with_peak(120);
        assert!(stage.is_complete());
        assert_eq!(stage.final_score(), 80);
        assert_eq!(live_with_peak(255).final_score(), 100);
    }

    #[test]
    fn mercy_floor_applies_below_threshold() {
        // 58.5 / 150 -> 39
        let mut stage = PitchStage::new(&PlayerStats::default(), &PitchConfig::default());
        stage.score(CaptureEvent::Start).unwrap();
        stage.score(CaptureEvent::Frame(vec![58, 59])).unwrap();
        run_out(&mut stage);
        assert_eq!(stage.raw_score(), 39);
        assert_eq!(stage.final_score(), 50);

        assert_eq!(live_with_peak(60).final_score(), 40);
        assert_eq!(live_with_peak(0).final_score(), 50);
    }

    #[test]
    fn denial_uses_simulated_score() {
        let mut stage = PitchStage::new(&PlayerStats::default(), &PitchConfig::default());
        stage.score(CaptureEvent::Denied).unwrap();
        stage.score(CaptureEvent::Frame(vec![255; 8])).unwrap();
        run_out(&mut stage);
        assert_eq!(stage.final_score(), 85);
        let done = stage.completion().unwrap();
        assert_eq!(done.stats.quiz_score, 425);
        assert_eq!(done.stats.gold, 200);
        assert_eq!(done.stats.voice_score, Some(85));
        assert_eq!(done.log, "Pitch Challenge Score: 85");
    }

    #[test]
    fn peak_only_rises() {
        let mut stage = PitchStage::new(&PlayerStats::default(), &PitchConfig::default());
        stage.score(CaptureEvent::Start).unwrap();
        stage.score(CaptureEvent::Frame(vec![90; 4])).unwrap();
        stage.score(CaptureEvent::Frame(vec![10; 4])).unwrap();
        stage.score(CaptureEvent::Frame(Vec::new())).unwrap();
        assert!((stage.peak() - 90.0).abs() < f64::EPSILON);
    }

    #[test]
    fn finished_stage_rejects_input_and_ignores_ticks() {
        let mut stage = live_with_peak(150);
        assert_eq!(stage.score(CaptureEvent::Start), Err(StageError::Complete));
        stage.tick();
        assert!(stage.present().is_none());
        assert_eq!(stage.completion().unwrap().stats.quiz_score, 500);
    }

    #[test]
    fn synthetic_frames_respect_ceiling() {
        let mut rng = ChaCha20Rng::seed_from_u64(4);
        let frame = synthetic_frame(&mut rng, 64, 180);
        assert_eq!(frame.len(), 64);
        assert!(frame.iter().all(|&bin| bin <= 180));
    }
}
