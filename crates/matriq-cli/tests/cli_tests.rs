//! CLI integration tests using assert_cmd.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

use matriq_core::puzzle::Puzzle;
use matriq_core::scoring::{score_session, FixedMetrics};

fn matriq() -> Command {
    #[allow(deprecated)]
    Command::cargo_bin("matriq").unwrap()
}

fn saved_report(dir: &TempDir) -> std::path::PathBuf {
    let puzzles = vec![Puzzle::sample(); 5];
    let answers: Vec<_> = puzzles
        .iter()
        .map(|p| Some(p.correct_option_index))
        .collect();
    let report = score_session(&puzzles, &answers, 75, &FixedMetrics::default());

    let path = dir.path().join("report.json");
    report.save_json(&path).unwrap();
    path
}

#[test]
fn help_lists_subcommands() {
    matriq()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("run"))
        .stdout(predicate::str::contains("show"))
        .stdout(predicate::str::contains("preview"))
        .stdout(predicate::str::contains("init"));
}

#[test]
fn show_renders_text_summary() {
    let dir = TempDir::new().unwrap();
    let path = saved_report(&dir);

    matriq()
        .arg("show")
        .arg("--report")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Score: 130"))
        .stdout(predicate::str::contains("87th percentile"))
        .stdout(predicate::str::contains("Pattern Logic"));
}

#[test]
fn show_renders_markdown() {
    let dir = TempDir::new().unwrap();
    let path = saved_report(&dir);

    matriq()
        .arg("show")
        .arg("--report")
        .arg(&path)
        .arg("--format")
        .arg("markdown")
        .assert()
        .success()
        .stdout(predicate::str::contains("# matriq results"))
        .stdout(predicate::str::contains("| Pattern Logic | 5/5 |"));
}

#[test]
fn show_renders_html() {
    let dir = TempDir::new().unwrap();
    let path = saved_report(&dir);

    matriq()
        .arg("show")
        .arg("--report")
        .arg(&path)
        .arg("--format")
        .arg("html")
        .assert()
        .success()
        .stdout(predicate::str::contains("<!DOCTYPE html>"))
        .stdout(predicate::str::contains("Cognitive Profile"));
}

#[test]
fn show_rejects_unknown_format() {
    let dir = TempDir::new().unwrap();
    let path = saved_report(&dir);

    matriq()
        .arg("show")
        .arg("--report")
        .arg(&path)
        .arg("--format")
        .arg("pdf")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown format"));
}

#[test]
fn show_nonexistent_report_fails() {
    matriq()
        .arg("show")
        .arg("--report")
        .arg("nonexistent.json")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn preview_offline_prints_a_puzzle() {
    matriq()
        .arg("preview")
        .arg("--offline")
        .assert()
        .success()
        .stdout(predicate::str::contains("?"))
        .stdout(predicate::str::contains("Options:"))
        .stdout(predicate::str::contains("Answer: option 1"));
}

#[test]
fn init_creates_config() {
    let dir = TempDir::new().unwrap();

    matriq()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created matriq.toml"));

    assert!(dir.path().join("matriq.toml").exists());
}

#[test]
fn init_skips_existing() {
    let dir = TempDir::new().unwrap();

    matriq().current_dir(dir.path()).arg("init").assert().success();

    matriq()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}
