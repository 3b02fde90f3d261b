//! End-to-end tests for the `pomodoro-history` binary.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn cmd() -> Command {
    Command::cargo_bin("pomodoro-history").unwrap()
}

fn seed_history(dir: &TempDir) {
    let seed = r#"[
        {"id": "1714000000000", "data": [1714000000000, 1714000600000, 1714000900000, 1714002100000], "createdAt": 1714002100000},
        {"id": "1714003000000", "data": [1714003000000, 1714004500000], "createdAt": 1714004500000}
    ]"#;
    std::fs::write(dir.path().join("sessions.json"), seed).unwrap();
}

// ============================================================================
// Help and Completions
// ============================================================================

#[test]
fn test_help_lists_commands() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("run"))
        .stdout(predicate::str::contains("history"))
        .stdout(predicate::str::contains("completions"));
}

#[test]
fn test_completions_bash() {
    cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("pomodoro-history"));
}

#[test]
fn test_unknown_subcommand_fails() {
    cmd().arg("pause-forever").assert().failure();
}

// ============================================================================
// History
// ============================================================================

#[test]
fn test_history_demo() {
    cmd()
        .args(["history", "--demo", "--width", "40"])
        .assert()
        .success()
        .stdout(predicate::str::contains("セッション履歴"))
        .stdout(predicate::str::contains("█"));
}

#[test]
fn test_history_empty_dir() {
    let dir = tempfile::tempdir().unwrap();
    cmd()
        .arg("history")
        .arg("--data-dir")
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("記録されたセッションはありません"));
}

#[test]
fn test_history_lists_stored_sessions() {
    let dir = tempfile::tempdir().unwrap();
    seed_history(&dir);

    cmd()
        .arg("history")
        .arg("--data-dir")
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("セッション履歴 (2件)"))
        .stdout(predicate::str::contains("一時停止 1回"))
        .stdout(predicate::str::contains(" 25分"));
}

#[test]
fn test_history_corrupt_file_reports_error() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("sessions.json"), "{ broken").unwrap();

    cmd()
        .arg("history")
        .arg("--data-dir")
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("エラー"));
}

#[test]
fn test_history_demo_conflicts_with_data_dir() {
    cmd()
        .args(["history", "--demo", "--data-dir", "/tmp"])
        .assert()
        .failure();
}

// ============================================================================
// Run
// ============================================================================

#[test]
fn test_run_start_then_quit() {
    let dir = tempfile::tempdir().unwrap();
    cmd()
        .args(["run", "--start", "-m", "1", "--no-sound"])
        .arg("--data-dir")
        .arg(dir.path())
        .arg("--config")
        .arg(dir.path().join("config.json"))
        .write_stdin("q\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("ポモドーロタイマー (1分)"))
        .stdout(predicate::str::contains("> 01:00 作業中"));

    // Quitting mid-session stores nothing.
    assert!(!dir.path().join("sessions.json").exists());
}

#[test]
fn test_run_unknown_input_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    cmd()
        .args(["run", "--no-sound"])
        .arg("--data-dir")
        .arg(dir.path())
        .arg("--config")
        .arg(dir.path().join("config.json"))
        .write_stdin("jump\nq\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("ポモドーロタイマー (25分)"))
        .stderr(predicate::str::contains("jump"));
}

#[test]
fn test_run_invalid_minutes() {
    cmd().args(["run", "-m", "0"]).assert().failure();
}

#[test]
fn test_run_missing_sound_file() {
    cmd()
        .args(["run", "--sound-file", "/nonexistent/bell.wav"])
        .assert()
        .failure();
}
