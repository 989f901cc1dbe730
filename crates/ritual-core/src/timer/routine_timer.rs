//! Routine-level timer.
//!
//! The final duration rounds up to the next whole minute, while the live
//! counter shown during a run rounds down.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::base::{Timed, Timer};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutineTimer {
    timer: Timer,
    /// Simulated seconds added by fast-forward/advance since the last start.
    #[serde(default)]
    advanced_secs: u64,
}

impl RoutineTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Running total in whole minutes at `now`, rounded down.
    pub fn current_minutes(&self, now: NaiveDateTime) -> u64 {
        self.timer.seconds_until(now) / 60
    }

    /// Record simulated seconds. Start and end instants are left alone; the
    /// owning routine moves its time cursor. Returns `false`, recording
    /// nothing, if the total would overflow.
    pub fn advance_time(&mut self, seconds: u64) -> bool {
        match self.advanced_secs.checked_add(seconds) {
            Some(total) => {
                self.advanced_secs = total;
                true
            }
            None => false,
        }
    }

    pub fn advanced_seconds(&self) -> u64 {
        self.advanced_secs
    }

    pub(crate) fn reset_advance(&mut self) {
        self.advanced_secs = 0;
    }
}

impl Timed for RoutineTimer {
    fn timer(&self) -> &Timer {
        &self.timer
    }

    fn timer_mut(&mut self) -> &mut Timer {
        &mut self.timer
    }

    fn elapsed_minutes(&self) -> u64 {
        if self.timer.start_time().is_none() || self.timer.end_time().is_none() {
            return 0;
        }
        self.timer.elapsed_seconds().div_ceil(60)
    }
}
