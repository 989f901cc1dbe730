use clap::Subcommand;
use ritual_core::{Database, RoutineId, TaskId};

use super::{load_with_run, persist, print_json};

#[derive(Subcommand)]
pub enum TaskAction {
    /// Append a task to a routine
    Add {
        /// Routine ID
        routine: RoutineId,
        /// Task name
        name: String,
    },
    /// Rename a task
    Rename {
        /// Routine ID
        routine: RoutineId,
        /// Task ID
        id: TaskId,
        /// New name
        name: String,
    },
    /// Remove a task
    Remove {
        /// Routine ID
        routine: RoutineId,
        /// Task ID
        id: TaskId,
    },
    /// Move a task one place earlier
    Up {
        /// Routine ID
        routine: RoutineId,
        /// Task ID
        id: TaskId,
    },
    /// Move a task one place later
    Down {
        /// Routine ID
        routine: RoutineId,
        /// Task ID
        id: TaskId,
    },
    /// Put every task of a routine back to pending
    Reset {
        /// Routine ID
        routine: RoutineId,
    },
}

pub fn run(action: TaskAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;

    // The run is replayed first so edits made mid-run are saved into it.
    let routine_id = match &action {
        TaskAction::Add { routine, .. }
        | TaskAction::Rename { routine, .. }
        | TaskAction::Remove { routine, .. }
        | TaskAction::Up { routine, .. }
        | TaskAction::Down { routine, .. }
        | TaskAction::Reset { routine } => *routine,
    };
    let mut routine = load_with_run(&db, routine_id)?;

    match action {
        TaskAction::Add { name, .. } => {
            let id = routine.new_task(name)?;
            persist(&db, &routine)?;
            if let Some(task) = routine.task(id) {
                print_json(task)?;
            }
        }
        TaskAction::Rename { id, name, .. } => {
            routine.rename_task(id, name)?;
            persist(&db, &routine)?;
            println!("task {id} renamed");
        }
        TaskAction::Remove { id, .. } => {
            let removed = routine.remove_task(id)?;
            persist(&db, &routine)?;
            println!("task {id} ({}) removed", removed.name());
        }
        TaskAction::Up { id, .. } => {
            routine.move_task_up(id)?;
            persist(&db, &routine)?;
            print_json(routine.tasks().ids())?;
        }
        TaskAction::Down { id, .. } => {
            routine.move_task_down(id)?;
            persist(&db, &routine)?;
            print_json(routine.tasks().ids())?;
        }
        TaskAction::Reset { .. } => {
            if routine.is_active() {
                return Err(format!("routine {routine_id} has a run in progress; end it first").into());
            }
            routine.reset_tasks();
            persist(&db, &routine)?;
            println!("tasks of routine {routine_id} reset");
        }
    }
    Ok(())
}
