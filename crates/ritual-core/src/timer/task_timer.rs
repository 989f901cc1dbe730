use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::base::{Timed, Timer};

/// Marks when the current task became current.
///
/// The definitive duration of a completed task is computed by the routine;
/// this timer only answers "how long has the current task been running".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskTimer {
    timer: Timer,
}

impl TaskTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Live elapsed seconds of the current task at `cursor`.
    pub fn seconds_until(&self, cursor: NaiveDateTime) -> u64 {
        self.timer.seconds_until(cursor)
    }
}

impl Timed for TaskTimer {
    fn timer(&self) -> &Timer {
        &self.timer
    }

    fn timer_mut(&mut self) -> &mut Timer {
        &mut self.timer
    }

    /// Rounded down, matching the live display of an unfinished task.
    fn elapsed_minutes(&self) -> u64 {
        self.timer.elapsed_seconds() / 60
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    #[test]
    fn live_read_floors_minutes() {
        let t0 = NaiveDate::from_ymd_opt(2025, 2, 1)
            .unwrap()
            .and_hms_opt(7, 0, 0)
            .unwrap();
        let mut timer = TaskTimer::new();
        timer.start(t0);
        timer.end(t0 + Duration::seconds(18 * 60 + 30));
        assert_eq!(timer.elapsed_minutes(), 18);
        assert_eq!(timer.seconds_until(t0 + Duration::seconds(45)), 45);
    }
}
