use serde::{Deserialize, Serialize};

/// Whole-second countdown driven by external ticks.
///
/// The host ticks it once per second while the owning question or stage is
/// displayed. A cancelled countdown ignores further ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Countdown {
    start: u32,
    remaining: u32,
    cancelled: bool,
}

impl Countdown {
    #[must_use]
    pub const fn new(start: u32) -> Self {
        Self {
            start,
            remaining: start,
            cancelled: false,
        }
    }

    /// Advance by one tick, flooring at zero. Returns the remaining time.
    pub const fn tick(&mut self) -> u32 {
        if !self.cancelled {
            self.remaining = self.remaining.saturating_sub(1);
        }
        self.remaining
    }

    /// Restart from the initial value.
    pub const fn reset(&mut self) {
        self.remaining = self.start;
        self.cancelled = false;
    }

    pub const fn cancel(&mut self) {
        self.cancelled = true;
    }

    #[must_use]
    pub const fn remaining(&self) -> u32 {
        self.remaining
    }

    #[must_use]
    pub const fn start(&self) -> u32 {
        self.start
    }

    #[must_use]
    pub const fn is_expired(&self) -> bool {
        self.remaining == 0
    }

    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        self.cancelled
    }
}
