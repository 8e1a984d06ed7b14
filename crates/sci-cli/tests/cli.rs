//! CLI E2E tests for `sci`.
//!
//! Validates:
//! - Function subcommands print values in text and JSON
//! - Exit codes distinguish converged, exhausted, and out-of-domain results
//! - Solver budgets are picked up from `--config` and `SCI_CONFIG`
//! - `config show` / `config validate` success and error paths
//! - Logging goes to stderr and leaves stdout parseable

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::{tempdir, TempDir};

// ============================================================================
// Helpers
// ============================================================================

/// A `sci` command isolated from the user's real config.
fn sci(home: &Path) -> Command {
    let mut cmd = cargo_bin_cmd!("sci");
    cmd.timeout(Duration::from_secs(60))
        .env_remove("SCI_CONFIG")
        .env_remove("SCI_LOG")
        .env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join(".config"));
    cmd
}

fn json_stdout(cmd: &mut Command, expected_code: i32) -> Value {
    let output = cmd.assert().code(expected_code).get_output().stdout.clone();
    serde_json::from_slice(&output).expect("parse JSON")
}

fn write_config(dir: &TempDir, name: &str, body: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, body).expect("write config");
    path
}

const ONE_STEP_BETA: &str = r#"{
    "schema_version": "1.0.0",
    "description": "one Newton step",
    "solvers": {"inv_incomplete_beta": {"max_iterations": 1, "tolerance": 1e-8}}
}"#;

// ============================================================================
// Function Evaluation
// ============================================================================

#[test]
fn test_gamma_json() {
    let home = tempdir().unwrap();
    let json = json_stdout(sci(home.path()).args(["--format", "json", "gamma", "5"]), 0);

    assert_eq!(json["function"], "gamma");
    assert_eq!(json["args"]["x"], 5.0);
    assert_eq!(json["status"], "converged");
    assert_eq!(json["iterations"], 0);
    assert!(json.get("schema_version").is_some());
    let value = json["value"].as_f64().expect("numeric value");
    assert!((value - 24.0).abs() < 1e-6, "gamma(5) = {value}");
}

#[test]
fn test_erf_negative_argument_text() {
    let home = tempdir().unwrap();
    sci(home.path())
        .args(["erf", "-0.5"])
        .assert()
        .success()
        .stdout(predicate::str::contains("erf(-0.5) = -0.520"));
}

#[test]
fn test_inc_beta_symmetric_median() {
    let home = tempdir().unwrap();
    let json = json_stdout(
        sci(home.path()).args(["--format", "json", "inc-beta", "2", "2", "0.5"]),
        0,
    );
    assert!((json["value"].as_f64().unwrap() - 0.5).abs() < 1e-8);
}

#[test]
fn test_lambert_secondary_branch() {
    let home = tempdir().unwrap();
    let json = json_stdout(
        sci(home.path()).args(["--format", "json", "lambert-w", "-0.2", "--branch", "secondary"]),
        0,
    );
    assert_eq!(json["branch"], "secondary");
    let w = json["value"].as_f64().unwrap();
    assert!((w - (-2.542_641_357_773_5)).abs() < 1e-6, "W_-1(-0.2) = {w}");
}

#[test]
fn test_inv_lower_gamma_round_trip() {
    let home = tempdir().unwrap();
    // γ(3, 2) = 2(1 − 5e^(−2))
    let y = (2.0 * (1.0 - 5.0 * (-2.0f64).exp())).to_string();
    let json = json_stdout(
        sci(home.path()).args(["--format", "json", "inv-lower-gamma", "3", y.as_str()]),
        0,
    );
    assert!((json["value"].as_f64().unwrap() - 2.0).abs() < 1e-4);
}

#[test]
fn test_out_of_domain_exit_code() {
    let home = tempdir().unwrap();
    let json = json_stdout(sci(home.path()).args(["--format", "json", "ln-gamma", "-1"]), 2);
    assert_eq!(json["status"], "out_of_domain");
    assert!(json["value"].is_null());

    sci(home.path())
        .args(["inc-beta", "2", "3", "1.5"])
        .assert()
        .code(2)
        .stdout(predicate::str::contains("[out of domain]"));
}

#[test]
fn test_unparseable_number_is_usage_error() {
    let home = tempdir().unwrap();
    sci(home.path())
        .args(["gamma", "five"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid"));
}

// ============================================================================
// Solver Budgets From Config
// ============================================================================

#[test]
fn test_exhausted_budget_exit_code_via_flag() {
    let home = tempdir().unwrap();
    let cfg = write_config(&home, "tight.json", ONE_STEP_BETA);
    let json = json_stdout(
        sci(home.path())
            .arg("--config")
            .arg(&cfg)
            .args(["--format", "json", "inv-inc-beta", "2", "5", "0.3"]),
        1,
    );
    assert_eq!(json["status"], "exhausted");
    assert_eq!(json["iterations"], 1);
    assert!(json["value"].as_f64().unwrap().is_finite());
}

#[test]
fn test_exhausted_budget_via_env() {
    let home = tempdir().unwrap();
    let cfg = write_config(&home, "tight.json", ONE_STEP_BETA);
    sci(home.path())
        .env("SCI_CONFIG", &cfg)
        .args(["inv-inc-beta", "2", "5", "0.3"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("exhausted after 1 iterations"));
}

#[test]
fn test_user_config_dir_is_picked_up() {
    let home = tempdir().unwrap();
    let dir = home.path().join(".config").join("scientific");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("solvers.json"), ONE_STEP_BETA).unwrap();

    if cfg!(target_os = "linux") {
        sci(home.path())
            .args(["inv-inc-beta", "2", "5", "0.3"])
            .assert()
            .code(1);
    }
}

#[test]
fn test_missing_env_config_is_io_error() {
    let home = tempdir().unwrap();
    sci(home.path())
        .env("SCI_CONFIG", home.path().join("absent.json"))
        .args(["gamma", "2"])
        .assert()
        .code(13)
        .stderr(predicate::str::contains("absent.json"));
}

#[test]
fn test_bad_json_config_is_config_error() {
    let home = tempdir().unwrap();
    let cfg = write_config(&home, "bad.json", "{ not json");
    let json = json_stdout(
        sci(home.path())
            .arg("--config")
            .arg(&cfg)
            .args(["--format", "json", "erf", "1"]),
        10,
    );
    assert_eq!(json["status"], "error");
    assert_eq!(json["error"]["code"], 10);
}

// ============================================================================
// Config Commands
// ============================================================================

#[test]
fn test_config_show_defaults() {
    let home = tempdir().unwrap();
    let json = json_stdout(sci(home.path()).args(["--format", "json", "config", "show"]), 0);
    assert_eq!(json["command"], "config show");
    assert_eq!(json["source"]["kind"], "built_in");
    assert_eq!(json["config"]["solvers"]["lambert_w"]["max_iterations"], 150);
    assert_eq!(json["config"]["solvers"]["continued_fraction"]["max_iterations"], 100);
}

#[test]
fn test_config_show_text_lists_every_solver() {
    let home = tempdir().unwrap();
    let cfg = write_config(&home, "tight.json", ONE_STEP_BETA);
    sci(home.path())
        .arg("--config")
        .arg(&cfg)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("one Newton step"))
        .stdout(predicate::str::contains("inv_incomplete_beta: max_iterations=1"))
        .stdout(predicate::str::contains("lambert_w: max_iterations=150"));
}

#[test]
fn test_config_validate_ok() {
    let home = tempdir().unwrap();
    let cfg = write_config(&home, "ok.json", ONE_STEP_BETA);
    let json = json_stdout(
        sci(home.path())
            .args(["--format", "json", "config", "validate"])
            .arg(&cfg),
        0,
    );
    assert_eq!(json["status"], "valid");
}

#[test]
fn test_config_validate_rejects_zero_budget() {
    let home = tempdir().unwrap();
    let cfg = write_config(
        &home,
        "zero.json",
        r#"{"schema_version": "1.0.0", "solvers": {"lambert_w": {"max_iterations": 0, "tolerance": 1e-7}}}"#,
    );
    sci(home.path())
        .args(["config", "validate"])
        .arg(&cfg)
        .assert()
        .code(10)
        .stderr(predicate::str::contains("lambert_w"));
}

#[test]
fn test_config_validate_rejects_future_schema() {
    let home = tempdir().unwrap();
    let cfg = write_config(&home, "v2.json", r#"{"schema_version": "2.0.0"}"#);
    let json = json_stdout(
        sci(home.path())
            .args(["--format", "json", "config", "validate"])
            .arg(&cfg),
        10,
    );
    assert_eq!(json["error"]["code"], 12);
}

#[test]
fn test_config_validate_missing_file() {
    let home = tempdir().unwrap();
    sci(home.path())
        .args(["config", "validate"])
        .arg(home.path().join("nope.json"))
        .assert()
        .code(13);
}

// ============================================================================
// Logging
// ============================================================================

#[test]
fn test_verbose_logs_to_stderr_only() {
    let home = tempdir().unwrap();
    let assert = sci(home.path())
        .args(["-v", "--format", "json", "gamma", "3"])
        .assert()
        .success()
        .stderr(predicate::str::contains("solver settings loaded"));

    let stdout = assert.get_output().stdout.clone();
    let json: Value = serde_json::from_slice(&stdout).expect("stdout stays pure JSON");
    assert_eq!(json["function"], "gamma");
}

#[test]
fn test_json_log_format() {
    let home = tempdir().unwrap();
    sci(home.path())
        .args(["-v", "--log-format", "json", "gamma", "3"])
        .assert()
        .success()
        .stderr(predicate::str::contains("\"level\":\"DEBUG\""));
}

#[test]
fn test_quiet_by_default() {
    let home = tempdir().unwrap();
    sci(home.path())
        .args(["gamma", "3"])
        .assert()
        .success()
        .stderr(predicate::str::is_empty());
}
