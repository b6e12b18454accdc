//! Basic CLI E2E tests.
//!
//! Tests invoke CLI commands via cargo run and verify outputs. PINGME_ENV
//! is set to `dev` so the tests never touch the real config file.

use std::process::{Command, Stdio};

/// Run a CLI command with stdin closed and return output.
fn run_cli(args: &[&str]) -> (String, String, i32) {
    let output = Command::new("cargo")
        .args(["run", "-p", "pingme-cli", "--"])
        .args(args)
        .env("PINGME_ENV", "dev")
        .stdin(Stdio::null())
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

#[test]
fn test_help() {
    let (stdout, _, code) = run_cli(&["--help"]);
    assert_eq!(code, 0, "help failed");
    assert!(stdout.contains("check-in"));
}

#[test]
fn test_config_list() {
    let (stdout, _, code) = run_cli(&["config", "list"]);
    assert_eq!(code, 0, "config list failed");
    let parsed: serde_json::Value =
        serde_json::from_str(&stdout).expect("config list should print JSON");
    assert!(parsed.get("interval_secs").is_some());
    assert!(parsed.get("notification").is_some());
}

#[test]
fn test_config_get() {
    let (_, _, code) = run_cli(&["config", "get", "sound"]);
    assert_eq!(code, 0, "config get failed");
}

#[test]
fn test_config_get_unknown_key_fails() {
    let (_, stderr, code) = run_cli(&["config", "get", "no.such.key"]);
    assert!(code != 0, "unknown key should fail");
    assert!(stderr.contains("unknown key"));
}

#[test]
fn test_config_set() {
    let (stdout, _, code) = run_cli(&["config", "set", "notification.timeout_secs", "10"]);
    assert_eq!(code, 0, "config set failed");
    assert!(stdout.contains("ok"));
}

#[test]
fn test_config_path() {
    let (stdout, _, code) = run_cli(&["config", "path"]);
    assert_eq!(code, 0, "config path failed");
    assert!(stdout.contains("config.toml"));
}

#[test]
fn test_completions() {
    let (stdout, _, code) = run_cli(&["completions", "bash"]);
    assert_eq!(code, 0, "completions failed");
    assert!(stdout.contains("pingme"));
}

// With stdin closed the reply channel reports end-of-input, so every cycle
// is a miss; the loop must end on its own with exit code 0.
#[test]
fn test_start_ends_after_max_misses_without_input() {
    let (stdout, _, code) = run_cli(&["start", "-i", "0", "--reply-timeout", "1", "-n", "2"]);
    assert_eq!(code, 0, "start should exit cleanly");
    assert!(stdout.contains("Sleep protocol initialized!"));
    assert_eq!(stdout.matches("No reply received.").count(), 2);
    assert!(stdout.contains("Missed pings: 2/2"));
    assert!(stdout.contains("Sleep protocol deactivated!"));
}

#[test]
fn test_start_json_emits_event_lines() {
    let (stdout, _, code) = run_cli(&[
        "start",
        "-i",
        "0",
        "--reply-timeout",
        "1",
        "-n",
        "1",
        "--json",
    ]);
    assert_eq!(code, 0, "start --json should exit cleanly");

    let events: Vec<serde_json::Value> = stdout
        .lines()
        .filter(|l| l.starts_with('{'))
        .map(|l| serde_json::from_str(l).expect("each line should be a JSON event"))
        .collect();
    assert!(!events.is_empty());
    assert_eq!(events.first().unwrap()["type"], "CheckinStarted");
    assert_eq!(events.last().unwrap()["type"], "CheckinEnded");
    assert_eq!(events.last().unwrap()["reason"], "miss_limit_reached");
}
