//! End-to-end tests of the `eno` binary.

mod test_helpers;

use predicates::prelude::*;
use serde_json::Value;
use std::path::Path;
use tempfile::tempdir;
use test_helpers::{base_eno_command, OTHER_PASSPHRASE};

fn stdout_json(data_dir: &Path, args: &[&str]) -> Value {
    let output = base_eno_command(data_dir)
        .args(args)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    serde_json::from_slice(&output).expect("stdout is JSON")
}

#[test]
fn test_cli_no_args_shows_usage() {
    let dir = tempdir().unwrap();
    base_eno_command(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn test_cli_notebook_lifecycle() {
    let dir = tempdir().unwrap();

    let created = stdout_json(dir.path(), &["notebook", "create", "Diary", "-d", "daily"]);
    assert_eq!(created["name"], "Diary");
    assert_eq!(created["entries"], serde_json::json!({}));
    assert!(dir.path().join("notebooks").join("Diary.eno").exists());

    let listed = stdout_json(dir.path(), &["notebook", "list"]);
    assert_eq!(listed.as_array().map(Vec::len), Some(1));
    assert_eq!(listed[0]["description"], "daily");

    let shown = stdout_json(dir.path(), &["notebook", "show", "Diary"]);
    assert_eq!(shown["name"], "Diary");

    base_eno_command(dir.path())
        .args(["notebook", "delete", "Diary"])
        .assert()
        .success();
    let listed = stdout_json(dir.path(), &["notebook", "list"]);
    assert_eq!(listed, serde_json::json!([]));
}

#[test]
fn test_cli_entry_write_from_stdin_and_search() {
    let dir = tempdir().unwrap();
    stdout_json(dir.path(), &["notebook", "create", "Diary"]);
    stdout_json(dir.path(), &["entry", "create", "-n", "Diary", "Monday"]);

    base_eno_command(dir.path())
        .args(["entry", "write", "-n", "Diary", "Monday"])
        .write_stdin("buy MILK")
        .assert()
        .success();

    let hits = stdout_json(dir.path(), &["entry", "search", "-n", "Diary", "milk"]);
    assert_eq!(hits["Monday"]["content"], "buy MILK");

    let hits = stdout_json(dir.path(), &["entry", "search", "-n", "Diary", "milk", "--regex"]);
    assert_eq!(hits, serde_json::json!({}));
}

#[test]
fn test_cli_wrong_key_message() {
    let dir = tempdir().unwrap();
    stdout_json(dir.path(), &["notebook", "create", "Diary"]);

    base_eno_command(dir.path())
        .env("ENO_PASSPHRASE", OTHER_PASSPHRASE)
        .args(["notebook", "open", "Diary"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("error: incorrect notebook key"));
}

#[test]
fn test_cli_missing_notebook_message() {
    let dir = tempdir().unwrap();
    base_eno_command(dir.path())
        .args(["notebook", "show", "Nowhere"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "error: the specified notebook does not exist",
        ));
}

#[test]
fn test_cli_rekey() {
    let dir = tempdir().unwrap();
    stdout_json(dir.path(), &["notebook", "create", "Diary"]);

    base_eno_command(dir.path())
        .env("ENO_NEW_PASSPHRASE", OTHER_PASSPHRASE)
        .args(["notebook", "rekey", "Diary"])
        .assert()
        .success();

    base_eno_command(dir.path())
        .env("ENO_PASSPHRASE", OTHER_PASSPHRASE)
        .args(["notebook", "open", "Diary"])
        .assert()
        .success();
}

#[test]
fn test_cli_short_passphrase_is_rejected() {
    let dir = tempdir().unwrap();
    base_eno_command(dir.path())
        .env("ENO_PASSPHRASE", "short")
        .args(["notebook", "create", "Diary"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "notebook key must be between 8 and 256 characters in length",
        ));
}

#[test]
fn test_cli_settings() {
    let dir = tempdir().unwrap();

    let all = stdout_json(dir.path(), &["settings", "list"]);
    assert_eq!(all, serde_json::json!({}));
    assert!(dir.path().join("settings.json").exists());

    base_eno_command(dir.path())
        .args(["settings", "set", "fontSize", "14"])
        .assert()
        .success();
    assert_eq!(
        stdout_json(dir.path(), &["settings", "get", "fontSize"]),
        serde_json::json!(14)
    );

    base_eno_command(dir.path())
        .args(["settings", "delete", "fontSize"])
        .assert()
        .success();
    assert_eq!(
        stdout_json(dir.path(), &["settings", "get", "fontSize"]),
        Value::Null
    );
}

#[test]
fn test_cli_relative_data_dir_is_rejected() {
    let dir = tempdir().unwrap();
    base_eno_command(dir.path())
        .env("ENO_DIR", "relative/dir")
        .args(["notebook", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("absolute path"));
}

#[test]
fn test_cli_json_logs_go_to_stderr() {
    let dir = tempdir().unwrap();
    let output = base_eno_command(dir.path())
        .env("ENO_LOG_FORMAT", "json")
        .env("ENO_LOG_LEVEL", "info")
        .args(["notebook", "create", "Diary"])
        .assert()
        .success()
        .get_output()
        .clone();

    let stdout: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(stdout["name"], "Diary");
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr
        .lines()
        .all(|line| serde_json::from_str::<Value>(line).is_ok()));
    assert!(stderr.contains("Created notebook file"));
}
