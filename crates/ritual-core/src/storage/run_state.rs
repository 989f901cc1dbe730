//! Run-state persistence across process restarts.
//!
//! The routine rows in [`Database`] hold the checklist; the timing of a run
//! lives in a [`RoutineSnapshot`] stored as JSON in the key-value table. A
//! routine that was never started has no saved run.

use tracing::debug;

use super::Database;
use crate::error::Result;
use crate::routine::{Routine, RoutineId, RoutineState};
use crate::snapshot::{restore, snapshot, RoutineSnapshot};

const ACTIVE_ROUTINE_KEY: &str = "active_routine_id";

fn run_key(id: RoutineId) -> String {
    format!("run:{id}")
}

pub struct RunState<'a> {
    db: &'a Database,
}

impl<'a> RunState<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Save the run of `routine`, or clear it if the routine has no run.
    pub fn save(&self, routine: &Routine) -> Result<()> {
        if routine.state() == RoutineState::NotStarted {
            debug!(routine_id = routine.id(), "no run to save, clearing");
            return self.clear(routine.id());
        }
        let json = serde_json::to_string(&snapshot(routine))?;
        self.db.kv_set(&run_key(routine.id()), &json)?;
        debug!(routine_id = routine.id(), state = ?routine.state(), "run state saved");
        Ok(())
    }

    pub fn has_run(&self, id: RoutineId) -> Result<bool> {
        Ok(self.db.kv_get(&run_key(id))?.is_some())
    }

    /// # Errors
    /// Returns an error if the stored snapshot is not valid JSON.
    pub fn load(&self, id: RoutineId) -> Result<Option<RoutineSnapshot>> {
        match self.db.kv_get(&run_key(id))? {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    /// Replay the saved run onto `routine`. Returns whether one was found.
    pub fn restore_into(&self, routine: &mut Routine) -> Result<bool> {
        let Some(snap) = self.load(routine.id())? else {
            return Ok(false);
        };
        restore(routine, &snap);
        debug!(routine_id = routine.id(), state = ?routine.state(), "run state restored");
        Ok(true)
    }

    pub fn clear(&self, id: RoutineId) -> Result<()> {
        self.db.kv_delete(&run_key(id))
    }

    /// Remember which routine the user is currently running.
    pub fn set_active_routine(&self, id: RoutineId) -> Result<()> {
        self.db.kv_set(ACTIVE_ROUTINE_KEY, &id.to_string())
    }

    /// The routine last marked active. An unparsable value reads as none.
    pub fn active_routine(&self) -> Result<Option<RoutineId>> {
        Ok(self
            .db
            .kv_get(ACTIVE_ROUTINE_KEY)?
            .and_then(|value| value.parse().ok()))
    }

    pub fn clear_active_routine(&self) -> Result<()> {
        self.db.kv_delete(ACTIVE_ROUTINE_KEY)
    }
}
