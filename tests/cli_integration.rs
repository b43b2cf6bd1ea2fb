//! CLI Integration Tests
//!
//! Tests the diagnostic subcommands end-to-end.

use assert_cmd::Command;
use assert_fs::prelude::*;
use predicates::prelude::*;

/// Get the binary to test, isolated from the caller's environment.
fn issuegate() -> Command {
    let mut cmd = Command::cargo_bin("issuegate").unwrap();
    cmd.env_remove("ISSUEGATE_CONFIG").env_remove("RUST_LOG");
    cmd
}

/// A project directory with an empty local config.
fn project() -> assert_fs::TempDir {
    let temp = assert_fs::TempDir::new().unwrap();
    temp.child(".issuegate.toml").write_str("").unwrap();
    temp
}

// ============================================================================
// Help & Version Tests
// ============================================================================

#[test]
fn test_help_flag() {
    issuegate()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Route issue workflow prompts"));
}

#[test]
fn test_short_help_flag() {
    issuegate().arg("-h").assert().success().stdout(predicate::str::contains("Usage:"));
}

#[test]
fn test_version_flag() {
    issuegate()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_help_lists_subcommands() {
    issuegate()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("classify"))
        .stdout(predicate::str::contains("sentinel"))
        .stdout(predicate::str::contains("completions"));
}

// ============================================================================
// Classify Command Tests
// ============================================================================

#[test]
fn test_classify_work_prompt() {
    issuegate()
        .args(["classify", "let's work on issue #75"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Intent: issue-work"))
        .stdout(predicate::str::contains("Issue:  #75"));
}

#[test]
fn test_classify_unrelated_prompt() {
    issuegate()
        .args(["classify", "what's for lunch?"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Intent: none"))
        .stdout(predicate::str::contains("Rule:").not());
}

#[test]
fn test_classify_json_output() {
    let output = issuegate().args(["classify", "LGTM", "--format", "json"]).output().unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["intent"], "approval");
    assert_eq!(json["rule_set"], "approval");
    assert_eq!(json["rule"], "lgtm");
    assert!(json["issue_number"].is_null());
}

#[test]
fn test_classify_requires_text() {
    issuegate().arg("classify").assert().failure();
}

// ============================================================================
// Sentinel Command Tests
// ============================================================================

#[test]
fn test_sentinel_lists_pending() {
    let temp = project();
    temp.child("claudedocs/issue-12-awaiting-approval.md")
        .write_str("Title: Fix login\nBranch: fix/login\n")
        .unwrap();
    temp.child("claudedocs/issue-12-analysis.md").write_str("# Analysis").unwrap();

    issuegate()
        .current_dir(temp.path())
        .arg("sentinel")
        .assert()
        .success()
        .stdout(predicate::str::contains("#12 Fix login"))
        .stdout(predicate::str::contains("Total: 1 awaiting approval"));
}

#[test]
fn test_sentinel_json_output() {
    let temp = project();
    temp.child("claudedocs/issue-3-awaiting-approval.md").write_str("Title: Three\n").unwrap();
    temp.child("claudedocs/issue-20-awaiting-approval.md").write_str("Title: Twenty\n").unwrap();

    let output =
        issuegate().current_dir(temp.path()).args(["sentinel", "-f", "json"]).output().unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let issues: Vec<&str> =
        json.as_array().unwrap().iter().map(|r| r["issue_number"].as_str().unwrap()).collect();
    assert_eq!(issues, vec!["3", "20"]);
}

#[test]
fn test_sentinel_without_directory() {
    let temp = project();
    issuegate()
        .current_dir(temp.path())
        .arg("sentinel")
        .assert()
        .success()
        .stdout(predicate::str::contains("No sentinel directory found"));
}

// ============================================================================
// Config Command Tests
// ============================================================================

#[test]
fn test_config_shows_defaults() {
    let temp = project();
    issuegate()
        .current_dir(temp.path())
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("dir_name = \"claudedocs\""))
        .stdout(predicate::str::contains("closer = \"issue-closer\""));
}

#[test]
fn test_config_path_prefers_local_file() {
    let temp = project();
    issuegate()
        .current_dir(temp.path())
        .args(["config", "--path"])
        .assert()
        .success()
        .stdout(predicate::str::contains(".issuegate.toml"));
}

#[test]
fn test_explicit_config_flag() {
    let temp = project();
    let config = temp.child("custom.toml");
    config.write_str("[agents]\nmodel = \"sonnet\"\n").unwrap();

    issuegate()
        .current_dir(temp.path())
        .args(["config", "--config"])
        .arg(config.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("model = \"sonnet\""));
}

#[test]
fn test_config_from_env_var() {
    let temp = project();
    let config = temp.child("env.toml");
    config.write_str("[project]\ntarget_branch = \"develop\"\n").unwrap();

    issuegate()
        .current_dir(temp.path())
        .env("ISSUEGATE_CONFIG", config.path())
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("target_branch = \"develop\""));
}

#[test]
fn test_invalid_config_is_an_error_for_diagnostics() {
    let temp = project();
    temp.child(".issuegate.toml").write_str("[sentinel\n").unwrap();
    issuegate().current_dir(temp.path()).arg("config").assert().failure();
}

// ============================================================================
// Completions Tests
// ============================================================================

#[test]
fn test_completions_bash() {
    issuegate()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("issuegate"));
}
