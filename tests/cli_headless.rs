// Drives the compiled binary in headless mode, where it runs on a simulated
// clock and prints one JSON snapshot per simulated second.

use assert_cmd::Command;
use serde_json::Value;
use std::path::Path;
use tempfile::tempdir;

fn run(config: &Path, args: &[&str]) -> Vec<Value> {
    let output = Command::cargo_bin("wakefail")
        .unwrap()
        .arg("--headless")
        .arg("--config")
        .arg(config)
        .args(args)
        .output()
        .unwrap();
    assert!(output.status.success(), "{output:?}");

    String::from_utf8(output.stdout)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

#[test]
fn friday_run_freezes_at_99_9() {
    let dir = tempdir().unwrap();
    let snapshots = run(
        &dir.path().join("config.json"),
        &["--period", "friday", "--duration-secs", "3", "--seed", "7"],
    );
    assert_eq!(snapshots.len(), 4);

    let first = &snapshots[0];
    assert_eq!(first["timePeriod"], "fridayAfternoon");
    assert_eq!(first["progress"], 95.0);
    assert_eq!(first["message"], "Almost weekend!");
    assert_eq!(first["phase"], "deferredTransitionPending");

    let last = &snapshots[3];
    assert_eq!(last["progress"], 99.9);
    assert_eq!(last["secondaryShown"], true);
    assert_eq!(last["isInteractive"], true);
    assert_eq!(last["phase"], "frozen");
}

#[test]
fn same_seed_same_session() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.json");
    let args = ["--period", "monday", "--duration-secs", "2", "--seed", "11"];
    let a = run(&path, &args);
    let b = run(&path, &args);
    assert_eq!(a[0]["theme"], b[0]["theme"]);
    assert_eq!(a[0]["message"], b[0]["message"]);
    assert_eq!(a[2]["progress"], b[2]["progress"]);
}

#[test]
fn saved_period_is_used_next_time() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join("config.json");

    run(
        &path,
        &["--period", "night", "--duration-secs", "0", "--save-config"],
    );
    let stored: Value = serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
    assert_eq!(stored["period"], "lateNight");

    let snapshots = run(&path, &["--duration-secs", "0"]);
    assert_eq!(snapshots.len(), 1);
    assert_eq!(snapshots[0]["timePeriod"], "lateNight");
}

#[test]
fn unknown_period_is_rejected() {
    let dir = tempdir().unwrap();
    Command::cargo_bin("wakefail")
        .unwrap()
        .args(["--headless", "--period", "teatime", "--config"])
        .arg(dir.path().join("config.json"))
        .assert()
        .failure();
}

#[test]
fn console_theater_streams_to_stderr() {
    let dir = tempdir().unwrap();
    let output = Command::cargo_bin("wakefail")
        .unwrap()
        .args(["--headless", "--period", "monday", "--duration-secs", "6", "--config"])
        .arg(dir.path().join("config.json"))
        .output()
        .unwrap();
    assert!(output.status.success(), "{output:?}");

    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("Welcome to the Developer Console Theater"));
    assert!(stderr.contains("[SYSTEM] Initializing wake sequence..."));
    // the second cue is due at 6.5s
    assert!(!stderr.contains("[AI] Good morning!"));

    // stdout stays pure JSON
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert_eq!(stdout.lines().count(), 7);
    assert!(stdout
        .lines()
        .all(|line| serde_json::from_str::<Value>(line).is_ok()));
}
