//! Concurrency and recovery tests for the lift binary.
//!
//! These tests verify that multiple processes can safely:
//! - Plan different days at the same time (file locking)
//! - Race to plan the same day without both persisting
//! - Keep working when the session file has corrupted lines, without losing them

use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};
use std::thread;
use tempfile::TempDir;

fn setup_test_dir() -> (TempDir, PathBuf) {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let config_path = temp_dir.path().join("config.toml");
    fs::write(
        &config_path,
        "[preferences]\nmonday = true\nwednesday = true\nfriday = true\n",
    )
    .expect("Failed to write config");
    (temp_dir, config_path)
}

fn cli(data_dir: &Path, config: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("lift"));
    cmd.arg("--data-dir").arg(data_dir).arg("--config").arg(config);
    cmd
}

#[test]
fn test_concurrent_plans_for_different_days() {
    let (temp_dir, config) = setup_test_dir();
    let data_dir = temp_dir.path().join("data");

    let handles: Vec<_> = (3..=9)
        .map(|day| {
            let data_dir = data_dir.clone();
            let config = config.clone();
            thread::spawn(move || {
                cli(&data_dir, &config)
                    .args(["plan", "--date", &format!("2024-06-{:02}", day)])
                    .assert()
                    .success();
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("Thread panicked");
    }

    let contents = fs::read_to_string(data_dir.join("sessions.jsonl")).unwrap();
    assert_eq!(contents.lines().count(), 7, "Expected one session per day");
}

#[test]
fn test_racing_plans_for_same_day_store_one() {
    let (temp_dir, config) = setup_test_dir();
    let data_dir = temp_dir.path().join("data");

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let data_dir = data_dir.clone();
            let config = config.clone();
            thread::spawn(move || {
                cli(&data_dir, &config)
                    .args(["plan", "--date", "2024-06-03"])
                    .output()
                    .expect("Failed to run lift")
                    .status
                    .success()
            })
        })
        .collect();

    let successes = handles
        .into_iter()
        .map(|h| h.join().expect("Thread panicked"))
        .filter(|ok| *ok)
        .count();
    assert_eq!(successes, 1, "Exactly one planner should win the day");

    let contents = fs::read_to_string(data_dir.join("sessions.jsonl")).unwrap();
    assert_eq!(contents.lines().count(), 1);
}

#[test]
fn test_corrupted_lines_survive_rewrites() {
    let (temp_dir, config) = setup_test_dir();
    let data_dir = temp_dir.path().join("data");

    cli(&data_dir, &config)
        .args(["plan", "--date", "2024-06-03"])
        .assert()
        .success();

    let path = data_dir.join("sessions.jsonl");
    let mut contents = fs::read_to_string(&path).unwrap();
    contents.push_str("{\"date\": \"2024-06-05\", \"exercise_sets\": [\n");
    fs::write(&path, contents).unwrap();

    cli(&data_dir, &config)
        .args(["show", "--date", "2024-06-03", "--json"])
        .assert()
        .success();

    // The next write keeps the damaged line as it was
    cli(&data_dir, &config)
        .args(["plan", "--date", "2024-06-05"])
        .assert()
        .success();

    let contents = fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[2], "{\"date\": \"2024-06-05\", \"exercise_sets\": [");
    for line in &lines[..2] {
        serde_json::from_str::<serde_json::Value>(line).expect("Stored sessions parse");
    }

    cli(&data_dir, &config)
        .args(["show", "--date", "2024-06-05", "--json"])
        .assert()
        .success();
}
