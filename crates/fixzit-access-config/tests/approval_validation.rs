// crates/fixzit-access-config/tests/approval_validation.rs
// ============================================================================
// Module: Approval Config Validation Tests
// Description: Policy table and approver directory sections.
// Purpose: Ensure approval routing config fails closed.
// ============================================================================

//! ## Overview
//! Approval policy and approver directory tests for `fixzit-access-config`.

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
    reason = "Test-only assertions and helpers are permitted."
)]

mod common;

use bigdecimal::BigDecimal;
use fixzit_access_core::ApproverDirectory;
use fixzit_access_core::ApproverRole;
use fixzit_access_core::OrgId;
use fixzit_access_core::Role;
use fixzit_access_core::SubRole;
use fixzit_access_core::UserId;

use crate::common::TestResult;
use crate::common::assert_invalid;
use crate::common::config_from_toml;

/// Builds a one-policy approval section.
fn policy_toml(name: &str, threshold: &str, timeout_hours: u32, required: &str) -> String {
    format!(
        "[[approval.policies]]\nname = \"{name}\"\namount_threshold = \"{threshold}\"\n\
         required_roles = [{required}]\ntimeout_hours = {timeout_hours}\n"
    )
}

/// Verifies configured policies are reordered by descending threshold.
#[test]
fn policies_sort_by_descending_threshold() -> TestResult {
    let toml = format!(
        "{}{}",
        policy_toml("small", "0", 24, "\"ADMIN\""),
        policy_toml("large", "5000", 24, "\"CORPORATE_OWNER\"")
    );
    let config = config_from_toml(&toml).map_err(|err| err.to_string())?;
    let engine = config.build_engine().map_err(|err| err.to_string())?;
    let selected = engine.policies().select(&BigDecimal::from(7_500), None).unwrap();
    assert_eq!(selected.name.as_str(), "large");
    assert_eq!(selected.required_roles, vec![ApproverRole::Role(Role::CorporateOwner)]);
    Ok(())
}

/// Verifies an explicitly empty table is rejected.
#[test]
fn empty_policy_table_is_invalid() -> TestResult {
    assert_invalid(config_from_toml("[approval]\npolicies = []\n"), "policy table is empty")
}

/// Verifies malformed policies are rejected.
#[test]
fn malformed_policies_are_invalid() -> TestResult {
    let first = policy_toml("p", "0", 24, "\"ADMIN\"");
    let second = policy_toml("p", "10", 24, "\"ADMIN\"");
    let duplicate = format!("{first}{second}");
    assert_invalid(config_from_toml(&duplicate), "duplicate policy name: p")?;
    assert_invalid(config_from_toml(&policy_toml("p", "0", 0, "\"ADMIN\"")), "timeout_hours")?;
    assert_invalid(config_from_toml(&policy_toml("p", "0", 24, "")), "required_roles is empty")?;
    assert_invalid(config_from_toml(&policy_toml("p", "-1", 24, "\"ADMIN\"")), "negative")
}

/// Verifies unknown approver roles in policies fail to parse.
#[test]
fn unknown_policy_roles_fail_to_parse() {
    let result = config_from_toml(&policy_toml("p", "0", 24, "\"WIZARD\""));
    assert!(matches!(result, Err(fixzit_access_config::ConfigError::Parse(_))));
}

/// Verifies the approver directory resolves roles and sub-roles per org.
#[test]
fn approvers_build_static_directory() -> TestResult {
    let config = config_from_toml(
        r#"
[approvers."org-1"]
ADMIN = ["user-admin-1"]
FINANCE_OFFICER = [" user-fin-1 ", "user-fin-2"]
"#,
    )
    .map_err(|err| err.to_string())?;
    let directory = config.approver_directory().map_err(|err| err.to_string())?;
    let org_id = OrgId::parse("org-1").unwrap();
    assert_eq!(
        directory.approvers_for(&org_id, &ApproverRole::SubRole(SubRole::FinanceOfficer)).unwrap(),
        vec![UserId::new("user-fin-1"), UserId::new("user-fin-2")]
    );
    let other = OrgId::parse("org-2").unwrap();
    assert!(directory.approvers_for(&other, &ApproverRole::Role(Role::Admin)).unwrap().is_empty());
    Ok(())
}

/// Verifies malformed approver entries are rejected.
#[test]
fn approvers_reject_malformed_entries() -> TestResult {
    assert_invalid(config_from_toml("[approvers.\"org-1\"]\nWIZARD = [\"u\"]\n"), "WIZARD")?;
    assert_invalid(config_from_toml("[approvers.\"org-1\"]\nADMIN = [\"  \"]\n"), "blank user id")?;
    assert_invalid(config_from_toml("[approvers.\"  \"]\nADMIN = [\"u\"]\n"), "approvers.")
}
