use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::routine::{RoutineId, RoutineState};
use crate::task::{TaskDuration, TaskId};

/// Every state change of a routine run produces an Event.
/// The CLI prints them; a GUI would render them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    RoutineStarted {
        routine_id: RoutineId,
        at: NaiveDateTime,
    },
    RoutinePaused {
        routine_id: RoutineId,
        /// Routine seconds accrued up to the pause.
        elapsed_secs: u64,
        at: NaiveDateTime,
    },
    RoutineResumed {
        routine_id: RoutineId,
        at: NaiveDateTime,
    },
    /// Simulated time was added to the run (fast-forward or advance).
    TimeAdvanced {
        routine_id: RoutineId,
        seconds: u64,
        current_time: NaiveDateTime,
    },
    TaskCompleted {
        routine_id: RoutineId,
        task_id: TaskId,
        name: String,
        duration: TaskDuration,
        elapsed_secs: u64,
        at: NaiveDateTime,
    },
    RoutineEnded {
        routine_id: RoutineId,
        elapsed_minutes: u64,
        /// Tasks marked skipped by this end.
        skipped: Vec<TaskId>,
        at: NaiveDateTime,
    },
    StateSnapshot {
        routine_id: RoutineId,
        routine_name: String,
        state: RoutineState,
        current_task: Option<String>,
        current_minutes: u64,
        current_task_secs: u64,
        goal_time: Option<u32>,
        tasks_done: usize,
        tasks_total: usize,
        at: Option<NaiveDateTime>,
    },
}
