//! End-to-end tests for the `algotrace` binary

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const SEARCH_REQUEST: &str = r#"{
    "family": "search",
    "algorithm": "linear",
    "array": [38, 12, 72, 5, 23, 91, 16, 45, 8, 56, 2],
    "target": 23
}"#;

fn algotrace(data_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("algotrace").expect("binary should build");
    cmd.arg("--data-dir").arg(data_dir.path());
    cmd
}

#[test]
fn test_run_prints_narration() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    algotrace(&dir)
        .args(["run", "-"])
        .write_stdin(SEARCH_REQUEST)
        .assert()
        .success()
        .stdout(predicate::str::contains("init"))
        .stdout(predicate::str::contains("Found 23 at index 4 after 5 comparisons"));

    assert!(dir.path().join("logs").join("algotrace.log").exists());
}

#[test]
fn test_saved_tape_replays_as_json() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let request = dir.path().join("request.json");
    let tape = dir.path().join("search.jsonl");
    std::fs::write(&request, SEARCH_REQUEST).unwrap();

    algotrace(&dir)
        .arg("run")
        .arg(&request)
        .args(["--format", "jsonl", "--save"])
        .arg(&tape)
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""type":"header""#));

    let output = algotrace(&dir)
        .arg("replay")
        .arg(&tape)
        .args(["--format", "json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let doc: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(doc["family"], "search");
    assert_eq!(doc["algorithm"], "linear");
    assert_eq!(doc["steps"].as_array().unwrap().len(), 7);
}

#[test]
fn test_save_without_path_uses_tapes_dir() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    algotrace(&dir)
        .args(["run", "-", "--save"])
        .write_stdin(SEARCH_REQUEST)
        .assert()
        .success();

    let saved: Vec<_> = std::fs::read_dir(dir.path().join("tapes"))
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(saved.len(), 1);
    assert!(saved[0].starts_with("search-linear-"), "{saved:?}");
}

#[test]
fn test_play_narrates_every_step() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let assert = algotrace(&dir)
        .args(["run", "-", "--play", "--speed", "1"])
        .write_stdin(SEARCH_REQUEST)
        .assert()
        .success();
    let stdout = String::from_utf8_lossy(&assert.get_output().stdout);
    assert_eq!(stdout.lines().count(), 7, "stdout:\n{stdout}");
}

#[test]
fn test_config_creates_default_file() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    algotrace(&dir)
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("speed_ms = 800"))
        .stdout(predicate::str::contains("kind = \"max\""));

    assert!(dir.path().join("config.toml").exists());
}

#[test]
fn test_config_changes_defaults() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    std::fs::write(dir.path().join("config.toml"), "[heap]\nkind = \"min\"\n").unwrap();
    algotrace(&dir)
        .args(["run", "-"])
        .write_stdin(r#"{"family":"heap","operation":{"op":"extract"},"array":[1,5,3]}"#)
        .assert()
        .success()
        .stdout(predicate::str::contains("Returned 1"));
}

#[test]
fn test_rejected_edit_fails() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    algotrace(&dir)
        .args(["run", "-"])
        .write_stdin(r#"{"family":"list","operation":{"op":"get","index":5},"values":[1,2]}"#)
        .assert()
        .failure()
        .stderr(predicate::str::contains("rejected"));
}

#[test]
fn test_malformed_request_fails() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    algotrace(&dir)
        .args(["run", "-"])
        .write_stdin("{not json")
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid request"));
}
