//! Corruption recovery tests for kcal.
//!
//! These tests verify the tracker can handle:
//! - Corrupted tracker files
//! - Empty or truncated tracker files
//! - A stored total that disagrees with the stored entries

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use tempfile::TempDir;

fn cli() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("kcal"))
}

fn setup_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

#[test]
fn test_corrupted_tracker_file() {
    let temp_dir = setup_test_dir();
    let tracker_path = temp_dir.path().join("tracker.json");
    fs::write(&tracker_path, "{ invalid json }}}}").expect("Failed to write corrupted tracker");

    cli()
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Gain/Loss:         0 kcal"));

    // The next write replaces the corrupted document
    cli()
        .arg("meal")
        .arg("Breakfast")
        .arg("400")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success();

    let content = fs::read_to_string(&tracker_path).unwrap();
    let tracker: Value = serde_json::from_str(&content).expect("tracker rewritten as valid JSON");
    assert_eq!(tracker["total_calories"], 400);
}

#[test]
fn test_empty_tracker_file() {
    let temp_dir = setup_test_dir();
    fs::write(temp_dir.path().join("tracker.json"), "").unwrap();

    cli()
        .arg("list")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Meals (0):"));
}

#[test]
fn test_truncated_tracker_file() {
    let temp_dir = setup_test_dir();
    fs::write(
        temp_dir.path().join("tracker.json"),
        r#"{"calorie_limit":1800,"total_calories":400,"meals":[{"id":"00000000-0000-0000"#,
    )
    .unwrap();

    cli()
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Daily limit:    2000 kcal"));
}

#[test]
fn test_mismatched_total_is_recomputed() {
    let temp_dir = setup_test_dir();
    let tracker_path = temp_dir.path().join("tracker.json");
    fs::write(
        &tracker_path,
        r#"{
  "calorie_limit": 2000,
  "total_calories": 99999,
  "meals": [{"id":"7d5c1b3e-2a64-4c4f-9a55-0e7f1f0e2c11","name":"Breakfast","calories":400}],
  "workouts": [{"id":"9a0c4e4b-5d1f-4e8e-8f3c-3b7c2f6d1a22","name":"Run","calories":320}]
}"#,
    )
    .unwrap();

    cli()
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Gain/Loss:        80 kcal"));

    let tracker: Value = serde_json::from_str(&fs::read_to_string(&tracker_path).unwrap()).unwrap();
    assert_eq!(tracker["total_calories"], 80);
}

#[test]
fn test_hand_written_document_without_total() {
    let temp_dir = setup_test_dir();
    fs::write(
        temp_dir.path().join("tracker.json"),
        r#"{"meals":[{"id":"7d5c1b3e-2a64-4c4f-9a55-0e7f1f0e2c11","name":"Lunch","calories":750}]}"#,
    )
    .unwrap();

    cli()
        .arg("remove-meal")
        .arg("7d5c1b3e-2a64-4c4f-9a55-0e7f1f0e2c11")
        .arg("--yes")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed meal: Lunch"))
        .stdout(predicate::str::contains("Gain/Loss:         0 kcal"));
}
