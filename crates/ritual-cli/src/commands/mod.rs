pub mod config;
pub mod routine;
pub mod run;
pub mod task;

use ritual_core::{CoreError, Database, Routine, RoutineId, RunState};
use serde::Serialize;

/// Load a routine with its saved run replayed onto it.
pub(crate) fn load_with_run(db: &Database, id: RoutineId) -> Result<Routine, CoreError> {
    let mut routine = db
        .load_routine(id)?
        .ok_or(CoreError::RoutineNotFound { id })?;
    RunState::new(db).restore_into(&mut routine)?;
    Ok(routine)
}

/// Persist both the checklist and the run.
pub(crate) fn persist(db: &Database, routine: &Routine) -> Result<(), CoreError> {
    db.save_routine(routine)?;
    RunState::new(db).save(routine)
}

pub(crate) fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
