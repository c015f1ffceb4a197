#![allow(deprecated)]
use assert_cmd::Command;
use mig3_cli::exit_codes;
use predicates::prelude::*;
use serde_json::{json, Value};
use std::path::Path;
use std::process::Command as StdCommand;
use tempfile::TempDir;

const ENV_VARS: [&str; 7] = [
    "MIG3_PROJECT",
    "MIG3_CONFIGURATION",
    "MIG3_ENDPOINT",
    "MIG3_TOKEN",
    "MIG3_REPORT",
    "MIG3_DRY_RUN",
    "MIG3_LOG_LEVEL",
];

const PROXY_VARS: [&str; 6] = [
    "HTTP_PROXY",
    "http_proxy",
    "HTTPS_PROXY",
    "https_proxy",
    "ALL_PROXY",
    "all_proxy",
];

fn mig3(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("mig3").unwrap();
    cmd.current_dir(dir).env_remove("RUST_LOG");
    for var in ENV_VARS.iter().chain(&PROXY_VARS) {
        cmd.env_remove(var);
    }
    cmd
}

fn simple_report() -> String {
    json!({
        "meta": {"pytest_version": "3.2.1"},
        "included": [
            {"type": "test", "attributes": {"name": "tests/test_a.py::test_one", "outcome": "passed"}},
            {"type": "test", "attributes": {"name": "tests/test_a.py::test_two", "outcome": "skipped"}}
        ]
    })
    .to_string()
}

fn git_available() -> bool {
    StdCommand::new("git").arg("--version").output().is_ok()
}

/// A temp dir holding a git repository with one commit.
fn repository() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    let git = |args: &[&str]| {
        let status = StdCommand::new("git")
            .args(args)
            .current_dir(dir.path())
            .env("GIT_AUTHOR_NAME", "Test User")
            .env("GIT_AUTHOR_EMAIL", "user@example.com")
            .env("GIT_COMMITTER_NAME", "Test User")
            .env("GIT_COMMITTER_EMAIL", "user@example.com")
            .status()
            .unwrap();
        assert!(status.success(), "git {:?} failed", args);
    };
    git(&["init", "--quiet"]);
    git(&[
        "-c",
        "commit.gpgsign=false",
        "commit",
        "--quiet",
        "--allow-empty",
        "-m",
        "initial",
    ]);
    dir
}

#[test]
fn test_missing_token_fails_before_reading() {
    let dir = tempfile::tempdir().unwrap();

    mig3(dir.path())
        .args(["-p", "p", "-c", "c", "--endpoint", "e"])
        .assert()
        .code(exit_codes::USAGE)
        .stderr(predicate::str::contains("--token"))
        .stderr(predicate::str::contains("Reading report").not());
}

#[test]
fn test_missing_project_fails() {
    let dir = tempfile::tempdir().unwrap();

    mig3(dir.path())
        .args(["-c", "c", "--endpoint", "e", "--token", "t"])
        .assert()
        .code(exit_codes::USAGE)
        .stderr(predicate::str::contains("--project"));
}

#[test]
fn test_version() {
    let dir = tempfile::tempdir().unwrap();

    mig3(dir.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_missing_default_report() {
    let dir = tempfile::tempdir().unwrap();

    mig3(dir.path())
        .args(["-p", "p", "-c", "c", "--endpoint", "e", "--token", "t"])
        .assert()
        .code(exit_codes::FAILURE)
        .stderr(predicate::str::contains("Reading report...FAIL"))
        .stderr(predicate::str::contains("NotFound"));
}

#[test]
fn test_invalid_report() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join(".report.json"), "Decidedly not JSON content.").unwrap();

    mig3(dir.path())
        .args(["-p", "p", "-c", "c", "--endpoint", "e", "--token", "t"])
        .assert()
        .code(exit_codes::FAILURE)
        .stderr(predicate::str::contains("Reading report...FAIL"))
        .stderr(predicate::str::contains("MalformedReport"))
        .stderr(predicate::str::contains("Converting test data").not());
}

#[test]
fn test_dry_run_from_environment() {
    if !git_available() {
        return;
    }
    let dir = repository();
    std::fs::write(dir.path().join(".report.json"), simple_report()).unwrap();

    let assert = mig3(dir.path())
        .env("MIG3_PROJECT", "p")
        .env("MIG3_CONFIGURATION", "c")
        .env("MIG3_ENDPOINT", "http://127.0.0.1:9/")
        .env("MIG3_TOKEN", "t")
        .env("MIG3_DRY_RUN", "1")
        .assert()
        .success()
        .stderr(predicate::str::contains("Building submission...OK"))
        .stderr(predicate::str::contains("Sending submission").not());

    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    let submission: Value = serde_json::from_str(&stdout).unwrap();
    assert!(submission["project_version"].as_str().unwrap().len() >= 40);
    assert_eq!(submission["author"]["email"], "user@example.com");
    assert_eq!(submission["tests"][1]["outcome"], "skipped");
}

#[test]
fn test_dry_run_from_stdin() {
    if !git_available() {
        return;
    }
    let dir = repository();

    mig3(dir.path())
        .args(["-p", "p", "-c", "c", "--endpoint", "e", "--token", "t"])
        .args(["--report", "-", "-n"])
        .write_stdin(simple_report())
        .assert()
        .success()
        .stdout(predicate::str::contains("\"project_version\""))
        .stdout(predicate::str::contains("\"module\": \"tests/test_a.py\""));
}

#[test]
fn test_dry_run_outside_repository() {
    if !git_available() {
        return;
    }
    // Own repo with no commits, so the lookup cannot escape to an outer checkout.
    let dir = tempfile::tempdir().unwrap();
    let status = StdCommand::new("git")
        .args(["init", "--quiet"])
        .current_dir(dir.path())
        .status()
        .unwrap();
    assert!(status.success());
    std::fs::write(dir.path().join(".report.json"), simple_report()).unwrap();

    mig3(dir.path())
        .args(["-p", "p", "-c", "c", "--endpoint", "e", "--token", "t", "-n"])
        .assert()
        .code(exit_codes::FAILURE)
        .stderr(predicate::str::contains("Building submission...FAIL"))
        .stderr(predicate::str::contains("VcsUnavailable"));
}

#[test]
fn test_unreachable_endpoint() {
    if !git_available() {
        return;
    }
    let dir = repository();
    std::fs::write(dir.path().join(".report.json"), simple_report()).unwrap();

    mig3(dir.path())
        .args(["-p", "p", "-c", "c", "--token", "t"])
        .args(["--endpoint", "http://127.0.0.1:9/api/jobs/"])
        .assert()
        .code(exit_codes::FAILURE)
        .stderr(predicate::str::contains("Sending submission...FAIL"))
        .stderr(predicate::str::contains("Transport"));
}

#[test]
fn test_malformed_dotenv_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join(".env"), "MIG3_PROJECT='unterminated\n").unwrap();

    mig3(dir.path())
        .args(["-c", "c", "--endpoint", "e", "--token", "t"])
        .assert()
        .code(exit_codes::FAILURE)
        .stderr(predicate::str::contains(".env"))
        .stderr(predicate::str::contains("--project").not());
}

#[test]
fn test_dotenv_supplies_flags() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join(".env"),
        "MIG3_PROJECT=p\nMIG3_CONFIGURATION=c\nMIG3_ENDPOINT=e\nMIG3_TOKEN=t\n",
    )
    .unwrap();

    mig3(dir.path())
        .assert()
        .code(exit_codes::FAILURE)
        .stderr(predicate::str::contains("Reading report...FAIL"));
}
