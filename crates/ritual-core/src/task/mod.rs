//! Checklist items of a routine.
//!
//! A task moves through its flags at most once per run:
//!
//! ```text
//! pending ──complete──> completed (+ checked_off, duration frozen)
//!    │
//!    └──routine end──> skipped
//! ```
//!
//! `reset()` puts a task back to pending for the next run.

mod duration;
mod list;

pub use duration::{TaskDuration, SECONDS_BUCKET};
pub use list::TaskList;

use serde::{Deserialize, Serialize};

pub type TaskId = u32;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    name: String,
    #[serde(default)]
    checked_off: bool,
    #[serde(default)]
    completed: bool,
    #[serde(default)]
    skipped: bool,
    /// Whole minutes, meaningful only once completed.
    #[serde(default)]
    duration: u64,
    #[serde(default)]
    elapsed_seconds: u64,
}

impl Task {
    pub fn new(id: TaskId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            checked_off: false,
            completed: false,
            skipped: false,
            duration: 0,
            elapsed_seconds: 0,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn id(&self) -> TaskId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_checked_off(&self) -> bool {
        self.checked_off
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    pub fn is_skipped(&self) -> bool {
        self.skipped
    }

    /// Neither completed nor skipped.
    pub fn is_pending(&self) -> bool {
        !self.completed && !self.skipped
    }

    pub fn duration(&self) -> u64 {
        self.duration
    }

    pub fn elapsed_seconds(&self) -> u64 {
        self.elapsed_seconds
    }

    /// Rounded display duration, `None` until completed.
    pub fn display_duration(&self) -> Option<TaskDuration> {
        self.completed
            .then(|| TaskDuration::from_elapsed_seconds(self.elapsed_seconds))
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Toggle the user's check mark. Clearing it is refused once the
    /// duration has been finalized.
    pub fn set_checked_off(&mut self, checked_off: bool) {
        if self.completed && !checked_off {
            return;
        }
        self.checked_off = checked_off;
    }

    /// Finalize the task with `elapsed_seconds` of work. Returns `false` if
    /// the task was already completed or skipped.
    pub fn complete(&mut self, elapsed_seconds: u64) -> bool {
        if !self.is_pending() {
            return false;
        }
        self.elapsed_seconds = elapsed_seconds;
        self.duration = TaskDuration::from_elapsed_seconds(elapsed_seconds).minutes();
        self.completed = true;
        self.checked_off = true;
        true
    }

    /// Mark an unfinished task as skipped. Returns `false` if it was already
    /// completed or skipped.
    pub fn skip(&mut self) -> bool {
        if !self.is_pending() {
            return false;
        }
        self.skipped = true;
        true
    }

    pub fn reset(&mut self) {
        self.checked_off = false;
        self.completed = false;
        self.skipped = false;
        self.duration = 0;
        self.elapsed_seconds = 0;
    }

    /// Overwrite the run fields from a persisted snapshot.
    pub(crate) fn restore_state(
        &mut self,
        completed: bool,
        skipped: bool,
        duration: u64,
        elapsed_seconds: u64,
    ) {
        // A snapshot claiming both keeps the completion.
        self.completed = completed;
        self.skipped = skipped && !completed;
        self.checked_off = completed;
        self.duration = duration;
        self.elapsed_seconds = elapsed_seconds;
    }
}
