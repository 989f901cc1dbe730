use clap::Subcommand;
use ritual_core::{Config, CoreError, Database, Routine, RoutineId, RunState, ValidationError};
use serde_json::json;

use super::{load_with_run, persist, print_json};

#[derive(Subcommand)]
pub enum RoutineAction {
    /// Create a new routine
    Create {
        /// Routine name
        name: String,
        /// Goal time in minutes (defaults to config routine.default_goal_time)
        #[arg(long)]
        goal: Option<u32>,
    },
    /// List all routines
    List,
    /// Show a routine, its tasks and run state
    Show {
        /// Routine ID
        id: RoutineId,
    },
    /// Rename a routine
    Rename {
        /// Routine ID
        id: RoutineId,
        /// New name
        name: String,
    },
    /// Delete a routine and its saved run
    Delete {
        /// Routine ID
        id: RoutineId,
    },
    /// Set or clear the goal time
    Goal {
        /// Routine ID
        id: RoutineId,
        /// Goal in minutes; omit to clear
        minutes: Option<u32>,
    },
}

pub fn run(action: RoutineAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;

    match action {
        RoutineAction::Create { name, goal } => {
            if name.trim().is_empty() {
                return Err(ValidationError::EmptyName { field: "routine name" }.into());
            }
            let mut routine = Routine::new(db.next_routine_id()?, name);
            let goal = goal.or(Config::load_or_default().routine.default_goal_time);
            routine.update_goal_time(goal);
            db.save_routine(&routine)?;
            print_json(&json!({
                "id": routine.id(),
                "name": routine.name(),
                "goal_time": routine.goal_time(),
            }))?;
        }
        RoutineAction::List => {
            print_json(&db.list_routines()?)?;
        }
        RoutineAction::Show { id } => {
            let mut routine = load_with_run(&db, id)?;
            routine.tick(ritual_core::now_local());
            let tasks: Vec<_> = routine
                .tasks()
                .iter()
                .map(|task| {
                    json!({
                        "id": task.id(),
                        "name": task.name(),
                        "checked_off": task.is_checked_off(),
                        "completed": task.is_completed(),
                        "skipped": task.is_skipped(),
                        "duration": task.display_duration(),
                    })
                })
                .collect();
            print_json(&json!({
                "id": routine.id(),
                "name": routine.name(),
                "goal_time": routine.goal_time(),
                "tasks": tasks,
                "status": routine.status(),
            }))?;
        }
        RoutineAction::Rename { id, name } => {
            let mut routine = load_with_run(&db, id)?;
            routine.rename(name)?;
            db.save_routine(&routine)?;
            println!("routine {id} renamed to {}", routine.name());
        }
        RoutineAction::Delete { id } => {
            if !db.delete_routine(id)? {
                return Err(CoreError::RoutineNotFound { id }.into());
            }
            let runs = RunState::new(&db);
            runs.clear(id)?;
            if runs.active_routine()? == Some(id) {
                runs.clear_active_routine()?;
            }
            println!("routine {id} deleted");
        }
        RoutineAction::Goal { id, minutes } => {
            let mut routine = load_with_run(&db, id)?;
            routine.update_goal_time(minutes);
            persist(&db, &routine)?;
            match minutes {
                Some(m) => println!("goal for routine {id} set to {m}m"),
                None => println!("goal for routine {id} cleared"),
            }
        }
    }
    Ok(())
}
