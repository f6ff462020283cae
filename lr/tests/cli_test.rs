//! CLI tests for the `lr` binary

use std::fs;
use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn walkthrough() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("scenarios")
        .join("walkthrough.yml")
}

/// `lr` with logs redirected into a temp dir
fn lr(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("lr").expect("lr binary should build");
    cmd.env("HOME", home.path())
        .env("XDG_DATA_HOME", home.path().join("data"))
        .env("XDG_CONFIG_HOME", home.path().join("config"))
        .current_dir(home.path());
    cmd
}

#[test]
fn test_catalog_text() {
    let home = TempDir::new().unwrap();
    lr(&home)
        .arg("catalog")
        .assert()
        .success()
        .stdout(predicate::str::contains("Chapter 1: Basic Operations"))
        .stdout(predicate::str::contains("Chapter 5: Material Nodes"));
}

#[test]
fn test_catalog_single_chapter_json() {
    let home = TempDir::new().unwrap();
    let output = lr(&home)
        .args(["catalog", "--chapter", "3", "--format", "json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let entries: serde_json::Value = serde_json::from_slice(&output).unwrap();
    let entries = entries.as_array().unwrap();
    assert_eq!(entries.len(), 6);
    assert_eq!(entries[4]["stage"]["rule"], "extrude");
}

#[test]
fn test_catalog_unknown_chapter_fails() {
    let home = TempDir::new().unwrap();
    lr(&home)
        .args(["catalog", "--chapter", "9"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown chapter: 9"));
}

#[test]
fn test_run_walkthrough() {
    let home = TempDir::new().unwrap();
    lr(&home)
        .arg("run")
        .arg(walkthrough())
        .assert()
        .success()
        .stdout(predicate::str::contains("full course walkthrough"))
        .stdout(predicate::str::contains("now at stage 5.5 (complete)"));
}

#[test]
fn test_run_walkthrough_json() {
    let home = TempDir::new().unwrap();
    let output = lr(&home)
        .arg("run")
        .arg(walkthrough())
        .args(["--format", "json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let summary: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(summary["state"]["chapter"], 5);
    assert_eq!(summary["state"]["stage"], 5);
    assert_eq!(summary["state"]["stage_complete"], true);
}

#[test]
fn test_run_failing_scenario() {
    let home = TempDir::new().unwrap();
    let path = home.path().join("fail.yml");
    fs::write(&path, "name: fail\nsteps:\n  - do: setup\n  - do: expect\n    stage: 4\n").unwrap();

    lr(&home)
        .arg("run")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Step 2 (expect) failed"));
}

#[test]
fn test_validate_scenario() {
    let home = TempDir::new().unwrap();
    lr(&home)
        .arg("validate-scenario")
        .arg(walkthrough())
        .assert()
        .success()
        .stdout(predicate::str::contains("Valid scenario"));
}

#[test]
fn test_validate_scenario_rejects_unknown_step() {
    let home = TempDir::new().unwrap();
    let path = home.path().join("bad.yml");
    fs::write(&path, "name: bad\nsteps:\n  - do: fly\n").unwrap();

    lr(&home).arg("validate-scenario").arg(&path).assert().failure();
}

#[test]
fn test_explicit_config_is_used() {
    let home = TempDir::new().unwrap();
    let config = home.path().join("lr.yml");
    fs::write(&config, "progress:\n  require-completion-to-advance: true\n").unwrap();
    let scenario = home.path().join("strict.yml");
    fs::write(&scenario, "name: strict\nsteps:\n  - do: setup\n  - do: deselect\n  - do: advance\n").unwrap();

    lr(&home)
        .arg("--config")
        .arg(&config)
        .arg("run")
        .arg(&scenario)
        .assert()
        .failure()
        .stderr(predicate::str::contains("not complete"));
}
