use chrono::format::{Item, StrftimeItems};
use clap::Subcommand;
use ritual_core::{
    Config, Database, Event, Routine, RoutineId, RoutineState, RunState, MAX_ADVANCE_SECS,
};

use super::{load_with_run, persist, print_json};

#[derive(Subcommand)]
pub enum RunAction {
    /// Start a run and make the routine active
    Start,
    /// Pause the run
    Pause,
    /// Resume a paused run
    Resume,
    /// Fast-forward simulated time by 30 seconds
    Ff,
    /// Advance simulated time by a number of seconds
    Advance {
        /// Seconds to add (at most one year)
        #[arg(value_parser = clap::value_parser!(u64).range(..=MAX_ADVANCE_SECS))]
        seconds: u64,
    },
    /// Complete the first pending task with this name
    Complete {
        /// Task name
        name: String,
    },
    /// End the run, skipping unfinished tasks
    End,
    /// Print the current run state
    Status {
        /// Print a single human-readable line instead of JSON
        #[arg(long)]
        text: bool,
    },
}

fn resolve_routine(
    runs: &RunState<'_>,
    routine: Option<RoutineId>,
) -> Result<RoutineId, Box<dyn std::error::Error>> {
    match routine {
        Some(id) => Ok(id),
        None => runs
            .active_routine()?
            .ok_or_else(|| "no active routine; pass --routine <ID>".into()),
    }
}

fn format_status(routine: &Routine, config: &Config) -> String {
    let state = match routine.state() {
        RoutineState::NotStarted => "not started",
        RoutineState::Active => "active",
        RoutineState::Paused => "paused",
        RoutineState::Ended => "ended",
    };
    let mut line = format!("{} [{state}] {}m", routine.name(), routine.current_minutes());
    if config.display.show_goal {
        if let Some(goal) = routine.goal_time() {
            line.push_str(&format!(" / {goal}m"));
        }
    }
    if routine.is_active() {
        if let Some(task) = routine.current_task() {
            line.push_str(&format!(
                ", {} {}m",
                task.name(),
                routine.current_task_minutes()
            ));
        }
    }
    if let Some(at) = routine.current_time() {
        let pattern = config.display.time_format.as_str();
        // A malformed pattern would make chrono's Display fail.
        let pattern = if StrftimeItems::new(pattern).any(|item| item == Item::Error) {
            tracing::warn!(pattern, "invalid display.time_format, using default");
            "%H:%M:%S"
        } else {
            pattern
        };
        line.push_str(&format!(" at {}", at.format(pattern)));
    }
    line
}

pub fn run(
    routine: Option<RoutineId>,
    action: RunAction,
) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let runs = RunState::new(&db);
    let id = resolve_routine(&runs, routine)?;

    let now = ritual_core::now_local();
    let mut routine = load_with_run(&db, id)?;
    routine.tick(now);

    let check_auto_complete = matches!(
        action,
        RunAction::Complete { .. } | RunAction::Ff | RunAction::Advance { .. }
    );

    let mut events: Vec<Event> = Vec::new();
    match action {
        RunAction::Start => {
            events.extend(routine.start_routine(now));
            runs.set_active_routine(id)?;
        }
        RunAction::Pause => events.extend(routine.pause_time(now)),
        RunAction::Resume => events.extend(routine.resume_time(now)),
        RunAction::Ff => events.extend(routine.fast_forward_time()),
        RunAction::Advance { seconds } => events.extend(routine.advance_time(seconds)),
        RunAction::Complete { name } => events.push(routine.complete_task(&name)?),
        RunAction::End => events.extend(routine.end_routine(now)),
        RunAction::Status { text } => {
            if text {
                println!("{}", format_status(&routine, &Config::load_or_default()));
                return Ok(());
            }
        }
    }

    if check_auto_complete && routine.is_active() && routine.auto_complete_routine() {
        tracing::debug!(routine_id = id, "all tasks done, routine ended");
        events.push(routine.status());
    }
    if routine.is_ended() && runs.active_routine()? == Some(id) {
        runs.clear_active_routine()?;
    }

    persist(&db, &routine)?;

    if events.is_empty() {
        events.push(routine.status());
    }
    for event in &events {
        print_json(event)?;
    }
    Ok(())
}
