//! Tick-driven countdown timers
//!
//! Phase timers are decremented once per simulation tick. A cancelled timer
//! never fires, and a timer fires at most once.

use serde::{Deserialize, Serialize};

use crate::consts::TICK_HZ;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Countdown {
    total_ticks: u32,
    remaining_ticks: u32,
    cancelled: bool,
    fired: bool,
}

impl Countdown {
    pub fn from_ticks(ticks: u32) -> Self {
        Self {
            total_ticks: ticks,
            remaining_ticks: ticks,
            cancelled: false,
            fired: false,
        }
    }

    pub fn from_secs(secs: u32) -> Self {
        Self::from_ticks(secs.saturating_mul(TICK_HZ))
    }

    /// Advance one tick. Returns true on the single tick the timer fires.
    pub fn tick(&mut self) -> bool {
        if self.cancelled || self.fired {
            return false;
        }
        self.remaining_ticks = self.remaining_ticks.saturating_sub(1);
        if self.remaining_ticks == 0 {
            self.fired = true;
            return true;
        }
        false
    }

    pub fn cancel(&mut self) {
        self.cancelled = true;
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    pub fn has_fired(&self) -> bool {
        self.fired
    }

    pub fn remaining_ticks(&self) -> u32 {
        self.remaining_ticks
    }

    pub fn elapsed_ticks(&self) -> u32 {
        self.total_ticks - self.remaining_ticks
    }

    /// Whole seconds left, rounded up (what a countdown display shows)
    pub fn remaining_secs(&self) -> u32 {
        self.remaining_ticks.div_ceil(TICK_HZ)
    }
}
