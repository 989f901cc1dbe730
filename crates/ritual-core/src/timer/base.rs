//! Base start/end timer shared by the routine and task timers.
//!
//! A [`Timer`] records a start instant, an optional end instant, and whether it
//! is running. It never reads the wall clock: every instant is supplied by the
//! caller, so the same code drives live runs and deterministic simulations.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tracing::warn;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timer {
    start_time: Option<NaiveDateTime>,
    end_time: Option<NaiveDateTime>,
    running: bool,
}

impl Timer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start the timer at `at`. Ignored while already running.
    pub fn start(&mut self, at: NaiveDateTime) {
        if self.running {
            return;
        }
        self.start_time = Some(at);
        self.end_time = None;
        self.running = true;
    }

    /// Stop the timer at `at`.
    ///
    /// Ignored when the timer is not running. An end instant earlier than the
    /// start is logged and dropped; the timer keeps running.
    pub fn end(&mut self, at: NaiveDateTime) {
        if !self.running {
            return;
        }
        if let Some(start) = self.start_time {
            if at < start {
                warn!(%start, end = %at, "end time before start, ignoring");
                return;
            }
        }
        self.end_time = Some(at);
        self.running = false;
    }

    /// Resume a stopped timer without moving its start instant.
    pub fn reopen(&mut self) {
        if self.running || self.start_time.is_none() {
            return;
        }
        self.end_time = None;
        self.running = true;
    }

    /// Whole seconds between start and end, 0 if either is unset.
    pub fn elapsed_seconds(&self) -> u64 {
        match (self.start_time, self.end_time) {
            (Some(start), Some(end)) => seconds_between(start, end),
            _ => 0,
        }
    }

    /// Whole seconds from start to `at`, 0 before the first start.
    pub fn seconds_until(&self, at: NaiveDateTime) -> u64 {
        self.start_time
            .map(|start| seconds_between(start, at))
            .unwrap_or(0)
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn start_time(&self) -> Option<NaiveDateTime> {
        self.start_time
    }

    pub fn end_time(&self) -> Option<NaiveDateTime> {
        self.end_time
    }
}

/// Non-negative whole seconds from `from` to `to`.
fn seconds_between(from: NaiveDateTime, to: NaiveDateTime) -> u64 {
    (to - from).num_seconds().max(0) as u64
}

/// Shared contract of the routine and task timers.
///
/// Implementors embed a [`Timer`] and choose their own rounding for
/// [`Timed::elapsed_minutes`].
pub trait Timed {
    fn timer(&self) -> &Timer;

    fn timer_mut(&mut self) -> &mut Timer;

    /// Final elapsed minutes between start and end, 0 if either is unset.
    fn elapsed_minutes(&self) -> u64;

    fn start(&mut self, at: NaiveDateTime) {
        self.timer_mut().start(at);
    }

    fn end(&mut self, at: NaiveDateTime) {
        self.timer_mut().end(at);
    }

    fn is_running(&self) -> bool {
        self.timer().is_running()
    }

    fn start_time(&self) -> Option<NaiveDateTime> {
        self.timer().start_time()
    }

    fn end_time(&self) -> Option<NaiveDateTime> {
        self.timer().end_time()
    }

    fn elapsed_seconds(&self) -> u64 {
        self.timer().elapsed_seconds()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    fn t0() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 2, 1)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap()
    }

    #[test]
    fn start_then_end_records_both_instants() {
        let mut timer = Timer::new();
        timer.start(t0());
        assert!(timer.is_running());

        timer.end(t0() + Duration::seconds(90));
        assert!(!timer.is_running());
        assert_eq!(timer.start_time(), Some(t0()));
        assert_eq!(timer.end_time(), Some(t0() + Duration::seconds(90)));
        assert_eq!(timer.elapsed_seconds(), 90);
    }

    #[test]
    fn second_start_keeps_first_instant() {
        let mut timer = Timer::new();
        timer.start(t0());
        timer.start(t0() + Duration::minutes(5));
        assert_eq!(timer.start_time(), Some(t0()));
    }

    #[test]
    fn end_before_start_is_ignored() {
        let mut timer = Timer::new();
        timer.start(t0());
        timer.end(t0() - Duration::seconds(1));
        assert!(timer.is_running());
        assert_eq!(timer.end_time(), None);
    }

    #[test]
    fn end_without_start_is_noop() {
        let mut timer = Timer::new();
        timer.end(t0());
        assert_eq!(timer.end_time(), None);
        assert_eq!(timer.elapsed_seconds(), 0);
    }

    #[test]
    fn restart_clears_previous_end() {
        let mut timer = Timer::new();
        timer.start(t0());
        timer.end(t0() + Duration::minutes(1));
        timer.start(t0() + Duration::minutes(2));
        assert_eq!(timer.end_time(), None);
        assert_eq!(timer.start_time(), Some(t0() + Duration::minutes(2)));
    }

    #[test]
    fn reopen_keeps_start() {
        let mut timer = Timer::new();
        timer.start(t0());
        timer.end(t0() + Duration::minutes(1));
        timer.reopen();
        assert!(timer.is_running());
        assert_eq!(timer.start_time(), Some(t0()));
        timer.end(t0() + Duration::minutes(3));
        assert_eq!(timer.elapsed_seconds(), 180);
    }

    #[test]
    fn seconds_until_clamps_to_zero() {
        let mut timer = Timer::new();
        assert_eq!(timer.seconds_until(t0()), 0);
        timer.start(t0());
        assert_eq!(timer.seconds_until(t0() - Duration::seconds(10)), 0);
        assert_eq!(timer.seconds_until(t0() + Duration::seconds(10)), 10);
    }
}
