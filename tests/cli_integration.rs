#![allow(deprecated)]

/// End-to-end tests for the `qabot` binary
///
/// These cover startup validation and history listing, neither of which
/// reaches the network.
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
mod common;

const CREDENTIAL_VARS: [&str; 3] = ["GEMINI_API_KEY", "GOOGLE_API_KEY", "OPENAI_API_KEY"];

/// Command with no credentials in its environment, run inside `dir`
fn qabot_without_credentials(dir: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("qabot").unwrap();
    cmd.current_dir(dir);
    for var in CREDENTIAL_VARS {
        cmd.env_remove(var);
    }
    cmd.env_remove("QABOT_PROVIDER")
        .env_remove("QABOT_HISTORY_FILE")
        .env_remove("RUST_LOG");
    cmd
}

/// Missing API key fails at startup with setup help
#[test]
fn test_missing_credential_fails_with_help() {
    let tmp = tempfile::tempdir().unwrap();

    let mut cmd = qabot_without_credentials(tmp.path());
    cmd.arg("ask").arg("What is 2+2?");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Missing credentials").count(1))
        .stderr(predicate::str::contains("GEMINI_API_KEY"));

    assert!(!tmp.path().join("chat_history.json").exists());
}

#[test]
fn test_missing_openai_credential_names_openai_var() {
    let tmp = tempfile::tempdir().unwrap();

    let mut cmd = qabot_without_credentials(tmp.path());
    cmd.args(["--provider", "openai", "ask", "hello"]);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("OPENAI_API_KEY"));
}

#[test]
fn test_invalid_provider_in_config() {
    let (temp_dir, config_path) = common::temp_config_file("provider:\n  type: llama\n");

    let mut cmd = qabot_without_credentials(temp_dir.path());
    cmd.arg("--config").arg(config_path).arg("history").arg("list");

    cmd.assert()
        .code(1)
        .stderr(predicate::str::contains("Invalid provider type").count(1));
}

#[test]
fn test_invalid_temperature_in_config() {
    let (temp_dir, config_path) =
        common::temp_config_file("generation:\n  temperature: 3.5\n");

    let mut cmd = qabot_without_credentials(temp_dir.path());
    cmd.arg("--config").arg(config_path).arg("history").arg("list");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("temperature"));
}

/// History listing works without any credential
#[test]
fn test_history_list_empty() {
    let tmp = tempfile::tempdir().unwrap();

    let mut cmd = qabot_without_credentials(tmp.path());
    cmd.args(["history", "list"]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("No conversation history yet."));
}

#[test]
fn test_history_list_json_with_limit() {
    let tmp = tempfile::tempdir().unwrap();
    let log = tmp.path().join("log.json");
    fs::write(
        &log,
        r#"[
  {"timestamp": "2025-10-01T10:00:00+00:00", "mode": "FAQ", "input": "q1", "output": "a1"},
  {"timestamp": "2025-10-01T10:01:00+00:00", "mode": "SUMMARY", "input": "t2", "output": "s2"},
  {"timestamp": "2025-10-01T10:02:00+00:00", "mode": "FAQ", "input": "q3", "output": "a3"}
]"#,
    )
    .unwrap();

    let mut cmd = qabot_without_credentials(tmp.path());
    cmd.arg("--history-file")
        .arg(&log)
        .args(["history", "list", "--json", "--limit", "2"]);

    let output = cmd.assert().success().get_output().stdout.clone();
    let records: serde_json::Value =
        serde_json::from_slice(&output).expect("stdout should be JSON");
    let records = records.as_array().expect("JSON array");

    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["input"], "t2");
    assert_eq!(records[0]["mode"], "SUMMARY");
    assert_eq!(records[1]["input"], "q3");
}

#[test]
fn test_history_list_table_shows_entries() {
    let tmp = tempfile::tempdir().unwrap();
    let log = tmp.path().join("log.json");
    fs::write(
        &log,
        r#"[{"timestamp": "2025-10-01T10:00:00+00:00", "mode": "FAQ", "input": "What is 2+2?", "output": "4"}]"#,
    )
    .unwrap();

    let mut cmd = qabot_without_credentials(tmp.path());
    cmd.env("QABOT_HISTORY_FILE", &log).args(["history", "list"]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("What is 2+2?"));
}

#[test]
fn test_history_list_corrupt_file_warns() {
    let tmp = tempfile::tempdir().unwrap();
    let log = tmp.path().join("log.json");
    fs::write(&log, "not json at all").unwrap();

    let mut cmd = qabot_without_credentials(tmp.path());
    cmd.arg("--history-file")
        .arg(&log)
        .args(["history", "list"]);

    cmd.assert()
        .success()
        .stderr(predicate::str::contains("malformed JSON"));

    assert_eq!(fs::read_to_string(&log).unwrap(), "not json at all");
}

#[test]
fn test_summarize_rejects_file_and_text_together() {
    let tmp = tempfile::tempdir().unwrap();

    let mut cmd = qabot_without_credentials(tmp.path());
    cmd.args(["summarize", "--file", "a.txt", "inline text"]);

    cmd.assert().failure();
}
