//! Save/restore contract for routine runs.
//!
//! A [`RoutineSnapshot`] holds everything needed to rebuild an equivalent
//! run after the process is killed: when it started, whether and where it is
//! paused, and each task's completion state. Serialization format is the
//! caller's choice; the storage layer uses JSON.
//!
//! `restore` expects a routine populated with the same task identities and
//! no run in progress. The routine id is not checked.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::routine::{Routine, RoutineId, RoutineState};
use crate::task::TaskId;
use crate::timer::Timed;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskSnapshot {
    pub id: TaskId,
    pub name: String,
    pub completed: bool,
    pub skipped: bool,
    pub duration: u64,
    pub elapsed_seconds: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutineSnapshot {
    pub routine_id: RoutineId,
    pub start_time: Option<NaiveDateTime>,
    /// Frozen cursor, present iff the run is paused.
    pub pause_time: Option<NaiveDateTime>,
    pub goal_time: Option<u32>,
    pub tasks: Vec<TaskSnapshot>,
    /// Present iff the run has ended.
    #[serde(default)]
    pub end_time: Option<NaiveDateTime>,
    /// When the current task became current.
    #[serde(default)]
    pub task_start_time: Option<NaiveDateTime>,
    /// Simulated seconds of an active run.
    #[serde(default)]
    pub simulated_offset_secs: u64,
}

impl RoutineSnapshot {
    pub fn is_paused(&self) -> bool {
        self.pause_time.is_some()
    }

    pub fn is_ended(&self) -> bool {
        self.end_time.is_some()
    }
}

/// Capture the timing and task state of `routine`.
pub fn snapshot(routine: &Routine) -> RoutineSnapshot {
    let state = routine.state();
    let started = state != RoutineState::NotStarted;
    RoutineSnapshot {
        routine_id: routine.id(),
        start_time: started
            .then(|| routine.routine_timer().start_time())
            .flatten(),
        pause_time: (state == RoutineState::Paused)
            .then(|| routine.current_time())
            .flatten(),
        goal_time: routine.goal_time(),
        tasks: routine
            .tasks()
            .iter()
            .map(|task| TaskSnapshot {
                id: task.id(),
                name: task.name().to_string(),
                completed: task.is_completed(),
                skipped: task.is_skipped(),
                duration: task.duration(),
                elapsed_seconds: task.elapsed_seconds(),
            })
            .collect(),
        end_time: (state == RoutineState::Ended)
            .then(|| routine.routine_timer().end_time())
            .flatten(),
        task_start_time: started.then(|| routine.task_timer().start_time()).flatten(),
        simulated_offset_secs: if state == RoutineState::Active {
            routine.offset_secs()
        } else {
            0
        },
    }
}

/// Rebuild a run on `routine` from `snapshot`.
///
/// Replays the start, the pause or end when present, then overwrites each
/// task's completion fields by id.
pub fn restore(routine: &mut Routine, snapshot: &RoutineSnapshot) {
    routine.update_goal_time(snapshot.goal_time);

    if let Some(start) = snapshot.start_time {
        routine.start_routine(start);
        let offset = if snapshot.is_paused() || snapshot.is_ended() {
            0
        } else {
            snapshot.simulated_offset_secs
        };
        routine.restore_timing(snapshot.task_start_time, offset);

        if let Some(pause) = snapshot.pause_time {
            routine.pause_time(pause);
        } else if let Some(end) = snapshot.end_time {
            routine.end_routine(end);
        }
    }

    for saved in &snapshot.tasks {
        match routine.task_mut(saved.id) {
            Some(task) => task.restore_state(
                saved.completed,
                saved.skipped,
                saved.duration,
                saved.elapsed_seconds,
            ),
            None => warn!(
                routine_id = routine.id(),
                task_id = saved.id,
                "snapshot task missing from routine, skipping"
            ),
        }
    }
}
