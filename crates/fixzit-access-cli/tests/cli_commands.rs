// crates/fixzit-access-cli/tests/cli_commands.rs
// ============================================================================
// Module: CLI Command Tests
// Description: End-to-end runs of the fixzit-access binary.
// Purpose: Ensure commands wire config, store, and core together.
// ============================================================================

//! ## Overview
//! Runs the compiled binary against a temporary config and `SQLite` store and
//! inspects its canonical JSON output and exit codes.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::path::Path;
use std::path::PathBuf;
use std::process::Command;
use std::process::Output;

use serde_json::Value;
use tempfile::TempDir;

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Writes a config with a temp store, silent audit, and org-1 approvers.
fn write_config(dir: &TempDir) -> PathBuf {
    let store = dir.path().join("workflows.db");
    let config = format!(
        r#"[approvers."org-1"]
PROPERTY_MANAGER = ["user-pm-1"]
ADMIN = ["user-admin-1"]

[store]
path = {store:?}

[audit]
sink = "none"
"#,
        store = store.display().to_string()
    );
    let path = dir.path().join("fixzit-access.toml");
    fs::write(&path, config).unwrap();
    path
}

/// Runs the binary with `--config` and the given arguments.
fn run(config: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_fixzit-access"))
        .arg("--config")
        .arg(config)
        .args(args)
        .output()
        .unwrap()
}

/// Parses stdout as JSON.
fn stdout_json(output: &Output) -> Value {
    serde_json::from_slice(&output.stdout).unwrap()
}

// ============================================================================
// SECTION: Capability Checks
// ============================================================================

/// Verifies allowed and denied checks differ in output and exit code.
#[test]
fn check_reports_reason_and_exit_code() {
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir);
    let session = [
        "--user",
        "user-1",
        "--role",
        "TEAM_MEMBER",
        "--sub-role",
        "FINANCE_OFFICER",
        "--org",
        "org-1",
        "--plan",
        "STARTER",
    ];

    let mut args = vec!["check"];
    args.extend(session);
    args.extend(["--submodule", "FINANCE_INVOICES", "--action", "approve"]);
    let output = run(&config, &args);
    assert!(output.status.success());
    let report = stdout_json(&output);
    assert_eq!(report["allowed"], true);
    assert_eq!(report["reason"], "sub_role_override");
    assert_eq!(report["context"]["is_org_member"], true);

    let mut args = vec!["check"];
    args.extend(session);
    args.extend(["--submodule", "FINANCE_BUDGETS", "--action", "view"]);
    let output = run(&config, &args);
    assert_eq!(output.status.code(), Some(2));
    assert_eq!(stdout_json(&output)["reason"], "plan_gate_denied");
}

/// Verifies an unknown role fails with its boundary status.
#[test]
fn check_with_unknown_role_fails() {
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir);
    let output = run(
        &config,
        &[
            "check",
            "--user",
            "user-1",
            "--role",
            "WIZARD",
            "--submodule",
            "WO_CREATE",
            "--action",
            "view",
        ],
    );
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("unknown role"));
    assert!(stderr.contains("403"));
}

// ============================================================================
// SECTION: Tenant Scope
// ============================================================================

/// Verifies cross-org validation is denied and filters render per family.
#[test]
fn org_commands_scope_to_caller() {
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir);

    let output = run(&config, &["org", "validate", "--org-id", "org-1", "--target-org", "org-2"]);
    assert_eq!(output.status.code(), Some(2));
    assert_eq!(stdout_json(&output)["outcome"], "denied");

    let output = run(&config, &["org", "validate", "--org-id", "org-1"]);
    assert!(output.status.success());
    assert_eq!(stdout_json(&output)["outcome"], "granted");

    let output = run(&config, &["org", "filter", "--org-id", "org-1", "--record-id", "r-1"]);
    assert!(output.status.success());
    let predicate = stdout_json(&output);
    assert_eq!(predicate["_id"], "r-1");
    assert!(predicate["$or"].as_array().is_some_and(|clauses| !clauses.is_empty()));
}

// ============================================================================
// SECTION: Approval Workflows
// ============================================================================

/// Verifies a request can be routed, listed, approved, and summarized.
#[test]
fn approval_lifecycle_persists_between_runs() {
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir);
    let request = dir.path().join("request.json");
    fs::write(
        &request,
        r#"{"request_id":"r-1","org_id":"org-1","amount":"750",
            "requested_by":"user-req-1","submitted_at":0}"#,
    )
    .unwrap();

    let output = run(&config, &["approval", "route", "--request", request.to_str().unwrap()]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(stdout_json(&output)["workflow"]["status"], "pending");

    let output = run(&config, &["approval", "pending", "--org-id", "org-1", "--user", "user-pm-1"]);
    assert_eq!(stdout_json(&output).as_array().map(Vec::len), Some(1));

    let output = run(
        &config,
        &[
            "approval",
            "decide",
            "--org-id",
            "org-1",
            "--request-id",
            "r-1",
            "--approver",
            "user-pm-1",
            "--decision",
            "approve",
            "--now-ms",
            "1000",
        ],
    );
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(stdout_json(&output)["outcome"]["status"], "approved");

    let output =
        run(&config, &["approval", "show", "--org-id", "org-1", "--request-id", "r-1"]);
    let workflow = stdout_json(&output);
    assert_eq!(workflow["status"], "approved");
    assert_eq!(workflow["version"], 2);

    let output = run(&config, &["approval", "summary", "--org-id", "org-1"]);
    assert_eq!(stdout_json(&output)["approved"], 1);
}

/// Verifies a decision against a missing workflow fails as unprocessable.
#[test]
fn deciding_unknown_workflow_fails() {
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir);
    let output = run(
        &config,
        &[
            "approval",
            "decide",
            "--org-id",
            "org-1",
            "--request-id",
            "missing",
            "--approver",
            "user-pm-1",
            "--decision",
            "approve",
        ],
    );
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8(output.stderr).unwrap().contains("422"));
}

// ============================================================================
// SECTION: Config
// ============================================================================

/// Verifies the example config validates and the custom config does too.
#[test]
fn config_commands_validate_and_print_example() {
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir);
    let output = run(&config, &["config", "validate"]);
    assert!(output.status.success());
    assert_eq!(String::from_utf8(output.stdout).unwrap().trim(), "config ok");

    let output = run(&config, &["config", "example"]);
    assert!(output.status.success());
    let example = dir.path().join("example.toml");
    fs::write(&example, output.stdout).unwrap();
    let output = run(&example, &["config", "validate"]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
}
