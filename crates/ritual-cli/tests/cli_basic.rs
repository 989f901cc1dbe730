//! Basic CLI E2E tests.
//!
//! Tests invoke the built binary with HOME pointed at a temporary directory
//! and verify its JSON output.

use serde_json::Value;
use std::path::Path;
use std::process::Command;

/// Run a CLI command and return (exit code, stdout, stderr).
fn run_cli(home: &Path, args: &[&str]) -> (i32, String, String) {
    let output = Command::new(env!("CARGO_BIN_EXE_ritual"))
        .args(args)
        .env("HOME", home)
        .env_remove("RITUAL_ENV")
        .env_remove("RITUAL_LOG")
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (code, stdout, stderr)
}

/// Parse every JSON document printed to stdout.
fn json_docs(stdout: &str) -> Vec<Value> {
    serde_json::Deserializer::from_str(stdout)
        .into_iter::<Value>()
        .collect::<Result<_, _>>()
        .expect("stdout is not a JSON stream")
}

fn create_morning(home: &Path) -> u64 {
    let (code, stdout, _) = run_cli(home, &["routine", "create", "Morning", "--goal", "20"]);
    assert_eq!(code, 0, "routine create failed");
    let id = json_docs(&stdout)[0]["id"].as_u64().unwrap();
    for name in ["Shower", "Dress"] {
        let (code, _, stderr) = run_cli(home, &["task", "add", &id.to_string(), name]);
        assert_eq!(code, 0, "task add failed: {stderr}");
    }
    id
}

#[test]
fn test_routine_create_and_list() {
    let home = tempfile::tempdir().unwrap();
    let id = create_morning(home.path());
    assert_eq!(id, 1);

    let (code, stdout, _) = run_cli(home.path(), &["routine", "list"]);
    assert_eq!(code, 0);
    let list = &json_docs(&stdout)[0];
    assert_eq!(list[0]["name"], "Morning");
    assert_eq!(list[0]["goal_time"], 20);
    assert_eq!(list[0]["task_count"], 2);
}

#[test]
fn test_full_run_auto_completes() {
    let home = tempfile::tempdir().unwrap();
    create_morning(home.path());

    let (code, stdout, _) = run_cli(home.path(), &["run", "start", "--routine", "1"]);
    assert_eq!(code, 0);
    assert_eq!(json_docs(&stdout)[0]["type"], "RoutineStarted");

    // The active routine is remembered from here on.
    let (code, _, _) = run_cli(home.path(), &["run", "advance", "36"]);
    assert_eq!(code, 0);
    let (code, stdout, _) = run_cli(home.path(), &["run", "complete", "Shower"]);
    assert_eq!(code, 0);
    let completed = &json_docs(&stdout)[0];
    assert_eq!(completed["type"], "TaskCompleted");
    assert_eq!(completed["duration"]["unit"], "seconds");

    let (code, _, _) = run_cli(home.path(), &["run", "advance", "120"]);
    assert_eq!(code, 0);
    let (code, stdout, _) = run_cli(home.path(), &["run", "complete", "Dress"]);
    assert_eq!(code, 0);
    let docs = json_docs(&stdout);
    assert_eq!(docs[0]["type"], "TaskCompleted");
    assert_eq!(docs[0]["duration"]["unit"], "minutes");
    assert_eq!(docs[1]["type"], "StateSnapshot");
    assert_eq!(docs[1]["state"], "ended");

    let (code, stdout, _) = run_cli(home.path(), &["run", "status", "--routine", "1"]);
    assert_eq!(code, 0);
    let status = &json_docs(&stdout)[0];
    assert_eq!(status["state"], "ended");
    assert_eq!(status["tasks_done"], 2);
}

#[test]
fn test_pause_survives_between_invocations() {
    let home = tempfile::tempdir().unwrap();
    create_morning(home.path());

    run_cli(home.path(), &["run", "start", "-r", "1"]);
    run_cli(home.path(), &["run", "advance", "90"]);
    let (code, stdout, _) = run_cli(home.path(), &["run", "pause"]);
    assert_eq!(code, 0);
    assert_eq!(json_docs(&stdout)[0]["type"], "RoutinePaused");

    let (_, stdout, _) = run_cli(home.path(), &["run", "status"]);
    let status = &json_docs(&stdout)[0];
    assert_eq!(status["state"], "paused");
    assert_eq!(status["current_minutes"], 1);
    assert_eq!(status["current_task"], "Shower");

    let (code, stdout, _) = run_cli(home.path(), &["run", "status", "--text"]);
    assert_eq!(code, 0);
    assert!(stdout.starts_with("Morning [paused] 1m / 20m"));
}

#[test]
fn test_complete_unknown_task_fails() {
    let home = tempfile::tempdir().unwrap();
    create_morning(home.path());
    run_cli(home.path(), &["run", "start", "-r", "1"]);

    let (code, _, stderr) = run_cli(home.path(), &["run", "complete", "Breakfast"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("No pending task named 'Breakfast'"));
}

#[test]
fn test_run_without_active_routine_fails() {
    let home = tempfile::tempdir().unwrap();
    let (code, _, stderr) = run_cli(home.path(), &["run", "status"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("no active routine"));
}

#[test]
fn test_config_set_and_get() {
    let home = tempfile::tempdir().unwrap();
    let (code, _, _) = run_cli(home.path(), &["config", "set", "routine.default_goal_time", "45"]);
    assert_eq!(code, 0);
    let (code, stdout, _) = run_cli(home.path(), &["config", "get", "routine.default_goal_time"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "45");

    let (_, stdout, _) = run_cli(home.path(), &["routine", "create", "Evening"]);
    assert_eq!(json_docs(&stdout)[0]["goal_time"], 45);

    let (code, _, _) = run_cli(home.path(), &["config", "get", "nope"]);
    assert_ne!(code, 0);
}

#[test]
fn test_advance_beyond_limit_is_rejected() {
    let home = tempfile::tempdir().unwrap();
    create_morning(home.path());
    run_cli(home.path(), &["run", "start", "-r", "1"]);

    let (code, _, _) = run_cli(home.path(), &["run", "advance", "18446744073709551615"]);
    assert_ne!(code, 0);

    let (_, stdout, _) = run_cli(home.path(), &["run", "status"]);
    assert_eq!(json_docs(&stdout)[0]["current_minutes"], 0);
}
