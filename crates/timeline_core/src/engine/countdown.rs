//! Auto-clear countdown shown with an empty result set.

use crate::config::NO_RESULTS_COUNTDOWN_TICKS;

/// Outcome of one countdown tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownTick {
    /// No countdown is running.
    Idle,
    Counting { remaining: u32 },
    /// Reached zero; filters were cleared and the layout recomputed.
    Expired,
}

/// Fixed-length countdown, one unit per tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdown {
    remaining: u32,
}

impl Countdown {
    pub fn start() -> Self {
        Self {
            remaining: NO_RESULTS_COUNTDOWN_TICKS,
        }
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn tick(&mut self) -> CountdownTick {
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            CountdownTick::Expired
        } else {
            CountdownTick::Counting {
                remaining: self.remaining,
            }
        }
    }
}
