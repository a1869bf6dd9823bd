//! Background music toggle, delegating playback to the host.
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::constants::LOG_TARGET;

/// Host playback capability.
pub trait AudioBackend {
    /// Begin playback. Returns `false` if the host refused (autoplay rules).
    fn play(&mut self) -> bool;
    fn pause(&mut self);
}

/// Backend that accepts every request and does nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentBackend;

impl AudioBackend for SilentBackend {
    fn play(&mut self) -> bool {
        true
    }

    fn pause(&mut self) {}
}

/// Music state owned by the session, independent of phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MusicToggle {
    playing: bool,
}

impl MusicToggle {
    #[must_use]
    pub const fn is_playing(&self) -> bool {
        self.playing
    }

    /// Flip playback. Returns the new state.
    pub fn toggle(&mut self, backend: &mut dyn AudioBackend) -> bool {
        if self.playing {
            backend.pause();
            self.playing = false;
        } else if backend.play() {
            self.playing = true;
        } else {
            warn!(target: LOG_TARGET, "audio backend refused playback");
        }
        debug!(target: LOG_TARGET, "music playing: {}", self.playing);
        self.playing
    }
}
