//! Routine run state machine.
//!
//! A routine owns its ordered tasks and two timers: one for the whole run and
//! one marking when the current task began. It never reads the wall clock;
//! callers pass instants into the operations that need one.
//!
//! ## State Transitions
//!
//! ```text
//! NotStarted -> Active <-> Paused -> Ended
//!                 ^                    |
//!                 +---- start again ---+
//! ```
//!
//! ## Time model
//!
//! The routine keeps a time *cursor*: the wall-clock instant last observed
//! plus any simulated seconds added by [`Routine::advance_time`] or
//! [`Routine::fast_forward_time`]. While paused the cursor is frozen (but can
//! still be advanced). Every elapsed-time read is taken at the cursor.
//!
//! ## Usage
//!
//! ```ignore
//! let mut routine = Routine::new(1, "Morning");
//! routine.add_task(Task::new(1, "Shower"))?;
//! routine.start_routine(now);
//! routine.tick(later);
//! routine.complete_task("Shower")?;
//! if routine.auto_complete_routine() {
//!     // run is over
//! }
//! ```

use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{CoreError, Result, ValidationError};
use crate::events::Event;
use crate::task::{Task, TaskDuration, TaskId, TaskList};
use crate::timer::{RoutineTimer, TaskTimer, Timed};

pub type RoutineId = u32;

/// Seconds added by one fast-forward.
pub const FAST_FORWARD_SECS: u64 = 30;

/// Largest single simulated advance accepted, one year.
pub const MAX_ADVANCE_SECS: u64 = 365 * 24 * 60 * 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoutineState {
    NotStarted,
    Active,
    Paused,
    Ended,
}

#[derive(Debug, Clone)]
pub struct Routine {
    id: RoutineId,
    name: String,
    tasks: TaskList,
    routine_timer: RoutineTimer,
    task_timer: TaskTimer,
    goal_time: Option<u32>,
    state: RoutineState,
    cursor: Option<NaiveDateTime>,
    /// Simulated seconds added since the last (re)start, applied to every
    /// wall-clock instant observed while active.
    offset_secs: u64,
}

impl Routine {
    pub fn new(id: RoutineId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            tasks: TaskList::new(),
            routine_timer: RoutineTimer::new(),
            task_timer: TaskTimer::new(),
            goal_time: None,
            state: RoutineState::NotStarted,
            cursor: None,
            offset_secs: 0,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn id(&self) -> RoutineId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tasks(&self) -> &TaskList {
        &self.tasks
    }

    pub fn task(&self, id: TaskId) -> Option<&Task> {
        self.tasks.get(id)
    }

    pub fn state(&self) -> RoutineState {
        self.state
    }

    /// A run is in progress (active or paused).
    pub fn is_active(&self) -> bool {
        matches!(self.state, RoutineState::Active | RoutineState::Paused)
    }

    pub fn is_paused(&self) -> bool {
        self.state == RoutineState::Paused
    }

    pub fn is_ended(&self) -> bool {
        self.state == RoutineState::Ended
    }

    pub fn goal_time(&self) -> Option<u32> {
        self.goal_time
    }

    /// The routine's notion of "now"; `None` before the first start.
    pub fn current_time(&self) -> Option<NaiveDateTime> {
        self.cursor
    }

    pub fn routine_timer(&self) -> &RoutineTimer {
        &self.routine_timer
    }

    pub fn task_timer(&self) -> &TaskTimer {
        &self.task_timer
    }

    /// First task that is neither completed nor skipped.
    pub fn current_task(&self) -> Option<&Task> {
        self.tasks.first_pending()
    }

    /// Routine minutes: floor at the cursor during a run, the final
    /// rounded-up total once ended.
    pub fn current_minutes(&self) -> u64 {
        match self.state {
            RoutineState::NotStarted => 0,
            RoutineState::Ended => self.routine_timer.elapsed_minutes(),
            RoutineState::Active | RoutineState::Paused => self
                .cursor
                .map(|at| self.routine_timer.current_minutes(at))
                .unwrap_or(0),
        }
    }

    /// Seconds the current task has been running, 0 outside a run.
    pub fn current_task_elapsed_seconds(&self) -> u64 {
        if !self.is_active() || self.current_task().is_none() {
            return 0;
        }
        self.cursor
            .map(|at| self.task_timer.seconds_until(at))
            .unwrap_or(0)
    }

    /// Live minutes of the current task, rounded down.
    pub fn current_task_minutes(&self) -> u64 {
        self.current_task_elapsed_seconds() / 60
    }

    /// Build a full state snapshot event.
    pub fn status(&self) -> Event {
        Event::StateSnapshot {
            routine_id: self.id,
            routine_name: self.name.clone(),
            state: self.state,
            current_task: self.current_task().map(|t| t.name().to_string()),
            current_minutes: self.current_minutes(),
            current_task_secs: self.current_task_elapsed_seconds(),
            goal_time: self.goal_time,
            tasks_done: self.tasks.iter().filter(|t| !t.is_pending()).count(),
            tasks_total: self.tasks.len(),
            at: self.cursor,
        }
    }

    // ── Run commands ─────────────────────────────────────────────────

    /// Begin a run at `now`. Ignored while a run is in progress.
    ///
    /// Starting an ended routine begins a fresh run over the same tasks;
    /// tasks are not reset here.
    pub fn start_routine(&mut self, now: NaiveDateTime) -> Option<Event> {
        match self.state {
            RoutineState::Active | RoutineState::Paused => {
                debug!(routine_id = self.id, "start ignored, run already in progress");
                None
            }
            RoutineState::NotStarted | RoutineState::Ended => {
                self.routine_timer.start(now);
                self.routine_timer.reset_advance();
                self.task_timer.start(now);
                self.cursor = Some(now);
                self.offset_secs = 0;
                self.state = RoutineState::Active;
                debug!(routine_id = self.id, %now, "routine started");
                Some(Event::RoutineStarted {
                    routine_id: self.id,
                    at: now,
                })
            }
        }
    }

    /// Observe the wall clock while active.
    pub fn tick(&mut self, now: NaiveDateTime) {
        if self.state == RoutineState::Active {
            self.observe(now);
        }
    }

    /// Stop both timers at `now` and freeze the cursor.
    pub fn pause_time(&mut self, now: NaiveDateTime) -> Option<Event> {
        if self.state != RoutineState::Active {
            return None;
        }
        let at = self.observe(now);
        self.routine_timer.end(at);
        self.task_timer.end(at);
        self.state = RoutineState::Paused;
        debug!(routine_id = self.id, %at, "routine paused");
        Some(Event::RoutinePaused {
            routine_id: self.id,
            elapsed_secs: self.routine_timer.elapsed_seconds(),
            at,
        })
    }

    /// Continue a paused run at `now`.
    ///
    /// Both timers restart from synthetic instants `now - accrued`, so the
    /// wall-clock gap spent paused never counts while simulated advances
    /// made during the pause do.
    pub fn resume_time(&mut self, now: NaiveDateTime) -> Option<Event> {
        if self.state != RoutineState::Paused {
            return None;
        }
        let cursor = self.cursor.unwrap_or(now);
        let routine_accrued = self.routine_timer.timer().seconds_until(cursor);
        let task_accrued = self.task_timer.seconds_until(cursor);

        self.routine_timer.start(rewind(now, routine_accrued));
        self.task_timer.start(rewind(now, task_accrued));
        self.cursor = Some(now);
        self.offset_secs = 0;
        self.state = RoutineState::Active;
        debug!(routine_id = self.id, %now, routine_accrued, "routine resumed");
        Some(Event::RoutineResumed {
            routine_id: self.id,
            at: now,
        })
    }

    /// Advance simulated time by [`FAST_FORWARD_SECS`].
    pub fn fast_forward_time(&mut self) -> Option<Event> {
        self.advance_time(FAST_FORWARD_SECS)
    }

    /// Advance simulated time by `seconds` without waiting for the clock.
    /// Ignored outside a run. Advances above [`MAX_ADVANCE_SECS`], or that
    /// would push the cursor out of range, are logged and dropped.
    pub fn advance_time(&mut self, seconds: u64) -> Option<Event> {
        if !self.is_active() {
            return None;
        }
        let current = self.cursor?;
        let moved = (seconds <= MAX_ADVANCE_SECS)
            .then(|| secs(seconds))
            .flatten()
            .and_then(|delta| current.checked_add_signed(delta));
        let offset = self.offset_secs.checked_add(seconds);
        let (Some(cursor), Some(offset)) = (moved, offset) else {
            warn!(routine_id = self.id, seconds, "advance out of range, ignoring");
            return None;
        };
        if !self.routine_timer.advance_time(seconds) {
            warn!(routine_id = self.id, seconds, "advance total overflows, ignoring");
            return None;
        }
        self.cursor = Some(cursor);
        self.offset_secs = offset;
        debug!(routine_id = self.id, seconds, %cursor, "time advanced");
        Some(Event::TimeAdvanced {
            routine_id: self.id,
            seconds,
            current_time: cursor,
        })
    }

    /// Complete the first pending task named `name` at the cursor.
    ///
    /// The task's duration runs from when it became current to the cursor.
    /// The routine is not ended here, even for the last task; callers check
    /// [`Routine::auto_complete_routine`] afterwards.
    ///
    /// # Errors
    /// `RoutineNotInProgress` outside a run, `TaskNotFound` when no pending
    /// task has that exact name.
    pub fn complete_task(&mut self, name: &str) -> Result<Event> {
        let at = match self.cursor {
            Some(at) if self.is_active() => at,
            _ => return Err(CoreError::RoutineNotInProgress { routine_id: self.id }),
        };
        let task_not_found = || CoreError::TaskNotFound {
            name: name.to_string(),
        };
        let id = self.tasks.find_pending_by_name(name).ok_or_else(task_not_found)?;
        let elapsed = self.task_timer.seconds_until(at);
        let task = self.tasks.get_mut(id).ok_or_else(task_not_found)?;
        task.complete(elapsed);

        self.restart_task_timer(at);
        debug!(routine_id = self.id, task_id = id, elapsed, "task completed");
        Ok(Event::TaskCompleted {
            routine_id: self.id,
            task_id: id,
            name: name.to_string(),
            duration: TaskDuration::from_elapsed_seconds(elapsed),
            elapsed_secs: elapsed,
            at,
        })
    }

    /// True when the routine has tasks and every one is completed or skipped.
    /// An in-progress run is ended at the cursor as a side effect.
    pub fn auto_complete_routine(&mut self) -> bool {
        if self.tasks.is_empty() || self.tasks.iter().any(Task::is_pending) {
            return false;
        }
        if self.is_active() {
            if let Some(at) = self.cursor {
                self.finish(at);
            }
        }
        true
    }

    /// End the run at `now` (or at the frozen cursor when paused).
    ///
    /// Pending tasks are marked skipped. Calling again after the end is
    /// ignored, so the final duration never changes.
    pub fn end_routine(&mut self, now: NaiveDateTime) -> Option<Event> {
        let at = match self.state {
            RoutineState::Ended => return None,
            RoutineState::Active => self.observe(now),
            RoutineState::Paused => self.cursor.unwrap_or(now),
            RoutineState::NotStarted => {
                self.cursor = Some(now);
                now
            }
        };
        Some(self.finish(at))
    }

    pub fn update_goal_time(&mut self, minutes: Option<u32>) {
        self.goal_time = minutes;
    }

    // ── Task list commands ───────────────────────────────────────────

    /// Append a task. Tasks added to an ended routine wait for the next run.
    pub fn add_task(&mut self, task: Task) -> Result<()> {
        if task.name().trim().is_empty() {
            return Err(ValidationError::EmptyName { field: "task name" }.into());
        }
        let id = task.id();
        self.tasks.push(task)?;
        debug!(routine_id = self.id, task_id = id, state = ?self.state, "task added");
        Ok(())
    }

    /// Append a task named `name` with the next free id.
    pub fn new_task(&mut self, name: impl Into<String>) -> Result<TaskId> {
        let id = self.tasks.next_id();
        self.add_task(Task::new(id, name))?;
        Ok(id)
    }

    pub fn next_task_id(&self) -> TaskId {
        self.tasks.next_id()
    }

    pub fn remove_task(&mut self, id: TaskId) -> Result<Task> {
        Ok(self.tasks.remove(id)?)
    }

    pub fn rename_task(&mut self, id: TaskId, name: impl Into<String>) -> Result<()> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ValidationError::EmptyName { field: "task name" }.into());
        }
        let task = self
            .tasks
            .get_mut(id)
            .ok_or(ValidationError::UnknownTaskId(id))?;
        task.set_name(name);
        Ok(())
    }

    pub fn move_task_up(&mut self, id: TaskId) -> Result<()> {
        Ok(self.tasks.move_up(id)?)
    }

    pub fn move_task_down(&mut self, id: TaskId) -> Result<()> {
        Ok(self.tasks.move_down(id)?)
    }

    pub fn move_task_to(&mut self, id: TaskId, index: usize) -> Result<()> {
        Ok(self.tasks.move_to(id, index)?)
    }

    /// Put every task back to pending for a clean run.
    pub fn reset_tasks(&mut self) {
        self.tasks.iter_mut().for_each(Task::reset);
    }

    pub fn rename(&mut self, name: impl Into<String>) -> Result<()> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ValidationError::EmptyName { field: "routine name" }.into());
        }
        self.name = name;
        Ok(())
    }

    // ── Restore support ──────────────────────────────────────────────

    pub(crate) fn offset_secs(&self) -> u64 {
        self.offset_secs
    }

    pub(crate) fn task_mut(&mut self, id: TaskId) -> Option<&mut Task> {
        self.tasks.get_mut(id)
    }

    /// Re-seat the task timer start and simulated offset of a freshly
    /// started run.
    pub(crate) fn restore_timing(&mut self, task_start: Option<NaiveDateTime>, offset_secs: u64) {
        if self.state != RoutineState::Active {
            return;
        }
        if let Some(start) = task_start {
            self.task_timer = TaskTimer::new();
            self.task_timer.start(start);
        }
        if offset_secs > 0 {
            self.advance_time(offset_secs);
        }
    }

    // ── Internal ─────────────────────────────────────────────────────

    /// Move the cursor to `now` plus the simulated offset, never backwards.
    fn observe(&mut self, now: NaiveDateTime) -> NaiveDateTime {
        let target = secs(self.offset_secs)
            .and_then(|delta| now.checked_add_signed(delta))
            .unwrap_or(now);
        let at = match self.cursor {
            Some(cursor) if cursor > target => cursor,
            _ => target,
        };
        self.cursor = Some(at);
        at
    }

    fn restart_task_timer(&mut self, at: NaiveDateTime) {
        self.task_timer.end(at);
        self.task_timer.start(at);
        if self.state == RoutineState::Paused {
            self.task_timer.end(at);
        }
    }

    fn finish(&mut self, at: NaiveDateTime) -> Event {
        self.routine_timer.timer_mut().reopen();
        self.routine_timer.end(at);
        self.task_timer.timer_mut().reopen();
        self.task_timer.end(at);

        let skipped: Vec<TaskId> = self
            .tasks
            .ids()
            .to_vec()
            .into_iter()
            .filter(|&id| self.tasks.get_mut(id).is_some_and(Task::skip))
            .collect();
        self.state = RoutineState::Ended;

        let elapsed_minutes = self.routine_timer.elapsed_minutes();
        debug!(routine_id = self.id, %at, elapsed_minutes, skipped = skipped.len(), "routine ended");
        Event::RoutineEnded {
            routine_id: self.id,
            elapsed_minutes,
            skipped,
            at,
        }
    }
}

/// `None` when `seconds` does not fit a chrono duration.
fn secs(seconds: u64) -> Option<Duration> {
    i64::try_from(seconds).ok().and_then(Duration::try_seconds)
}

/// `now - seconds`, clamped to `now` when out of range.
fn rewind(now: NaiveDateTime, seconds: u64) -> NaiveDateTime {
    secs(seconds)
        .and_then(|delta| now.checked_sub_signed(delta))
        .unwrap_or(now)
}
