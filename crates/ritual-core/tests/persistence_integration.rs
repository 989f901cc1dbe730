//! Integration tests for surviving a process restart.
//!
//! Each test saves a routine and its run into a database file, drops every
//! handle, then rebuilds the run from a fresh connection.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use ritual_core::{Database, Routine, RoutineState, RunState};
use std::path::Path;

fn at(seconds: i64) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 6, 3)
        .unwrap()
        .and_hms_opt(7, 0, 0)
        .unwrap()
        + Duration::seconds(seconds)
}

fn persist(path: &Path, routine: &Routine) {
    let db = Database::open_at(path).unwrap();
    db.save_routine(routine).unwrap();
    RunState::new(&db).save(routine).unwrap();
}

fn relaunch(path: &Path, id: u32) -> Routine {
    let db = Database::open_at(path).unwrap();
    let mut routine = db.load_routine(id).unwrap().unwrap();
    RunState::new(&db).restore_into(&mut routine).unwrap();
    routine
}

fn morning() -> Routine {
    let mut routine = Routine::new(7, "Morning");
    routine.update_goal_time(Some(25));
    routine.new_task("Shower").unwrap();
    routine.new_task("Dress").unwrap();
    routine
}

#[test]
fn test_active_run_keeps_simulated_time() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ritual.db");

    let mut routine = morning();
    routine.start_routine(at(0));
    routine.advance_time(120);
    persist(&path, &routine);

    let mut restored = relaunch(&path, 7);
    assert_eq!(restored.state(), RoutineState::Active);
    assert_eq!(restored.current_time(), Some(at(120)));

    restored.tick(at(60));
    assert_eq!(restored.current_minutes(), 3);
    assert_eq!(restored.goal_time(), Some(25));
}

#[test]
fn test_paused_run_excludes_downtime() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ritual.db");

    let mut routine = morning();
    routine.start_routine(at(0));
    routine.tick(at(100));
    routine.complete_task("Shower").unwrap();
    routine.pause_time(at(300));
    persist(&path, &routine);

    let mut restored = relaunch(&path, 7);
    assert!(restored.is_paused());
    assert!(restored.task(1).unwrap().is_completed());

    restored.resume_time(at(3600));
    restored.tick(at(3660));
    assert_eq!(restored.current_minutes(), 6);
    assert_eq!(restored.current_task_elapsed_seconds(), 260);
}

#[test]
fn test_ended_run_keeps_final_duration() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ritual.db");

    let mut routine = morning();
    routine.start_routine(at(0));
    routine.advance_time(61);
    routine.complete_task("Shower").unwrap();
    routine.advance_time(61);
    routine.complete_task("Dress").unwrap();
    assert!(routine.auto_complete_routine());
    persist(&path, &routine);

    let restored = relaunch(&path, 7);
    assert!(restored.is_ended());
    assert_eq!(restored.current_minutes(), 3);
    assert_eq!(restored.task(2).unwrap().duration(), 1);
}

#[test]
fn test_resetting_clears_saved_run() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ritual.db");

    let mut routine = morning();
    routine.start_routine(at(0));
    persist(&path, &routine);

    let fresh = morning();
    persist(&path, &fresh);

    let db = Database::open_at(&path).unwrap();
    assert!(!RunState::new(&db).has_run(7).unwrap());
    let restored = relaunch(&path, 7);
    assert_eq!(restored.state(), RoutineState::NotStarted);
}
