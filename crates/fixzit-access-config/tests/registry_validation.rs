// crates/fixzit-access-config/tests/registry_validation.rs
// ============================================================================
// Module: Registry Config Validation Tests
// Description: Plan gate, module list, and grant overrides.
// Purpose: Ensure unknown names fail closed and overrides reach the resolver.
// ============================================================================

//! ## Overview
//! Registry section tests for `fixzit-access-config`.

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

use fixzit_access_core::Action;
use fixzit_access_core::ModuleKey;
use fixzit_access_core::Plan;
use fixzit_access_core::PlanGateDefault;
use fixzit_access_core::Role;
use fixzit_access_core::SubRole;
use fixzit_access_core::SubmoduleKey;

use crate::common::TestResult;
use crate::common::assert_invalid;
use crate::common::config_from_toml;

/// Verifies gate entries set, then clear, builtin gates.
#[test]
fn plan_gates_set_and_clear_entries() -> TestResult {
    let config = config_from_toml(
        r#"
[registry]
plan_gate_default = "allow"

[[registry.plan_gates]]
plan = "starter"
submodule = "wo_pm"
allowed = true

[[registry.plan_gates]]
plan = "ENTERPRISE"
submodule = "FINANCE_BUDGETS"
"#,
    )
    .map_err(|err| err.to_string())?;
    let registry = config.build_registry().map_err(|err| err.to_string())?;
    assert_eq!(registry.plan_gate_default(), PlanGateDefault::Allow);
    assert_eq!(registry.plan_gate(Plan::Starter, SubmoduleKey::WoPm), Some(true));
    assert_eq!(registry.plan_gate(Plan::Enterprise, SubmoduleKey::FinanceBudgets), None);
    assert!(registry.gate_allows(Plan::Enterprise, SubmoduleKey::FinanceBudgets));
    Ok(())
}

/// Verifies unknown plans and submodules are rejected.
#[test]
fn plan_gates_reject_unknown_names() -> TestResult {
    assert_invalid(
        config_from_toml("[[registry.plan_gates]]\nplan = \"GOLD\"\nsubmodule = \"WO_PM\"\n"),
        "unknown plan GOLD",
    )?;
    assert_invalid(
        config_from_toml("[[registry.plan_gates]]\nplan = \"PRO\"\nsubmodule = \"WO_TELEPORT\"\n"),
        "registry.plan_gates[0]: unknown submodule WO_TELEPORT",
    )
}

/// Verifies module lists replace the builtin lists and accept role aliases.
#[test]
fn role_modules_replace_builtin_lists() -> TestResult {
    let config = config_from_toml(
        r#"
[registry.role_modules]
VENDOR = ["DASHBOARD", "MARKETPLACE", "WORK_ORDERS"]

[registry.sub_role_modules]
SUPPORT_AGENT = ["DASHBOARD", "SUPPORT"]
"#,
    )
    .map_err(|err| err.to_string())?;
    let registry = config.build_registry().map_err(|err| err.to_string())?;
    assert_eq!(
        registry.role_modules(Role::Vendor),
        &[ModuleKey::Dashboard, ModuleKey::Marketplace, ModuleKey::WorkOrders]
    );
    assert_eq!(
        registry.sub_role_modules(SubRole::SupportAgent),
        Some(&[ModuleKey::Dashboard, ModuleKey::Support][..])
    );
    Ok(())
}

/// Verifies unknown roles and modules are rejected.
#[test]
fn role_modules_reject_unknown_names() -> TestResult {
    assert_invalid(
        config_from_toml("[registry.role_modules]\nWIZARD = [\"DASHBOARD\"]\n"),
        "unknown role WIZARD",
    )?;
    assert_invalid(
        config_from_toml("[registry.role_modules]\nVENDOR = [\"CASINO\"]\n"),
        "unknown module CASINO",
    )?;
    assert_invalid(
        config_from_toml("[registry.sub_role_modules]\nJANITOR = [\"DASHBOARD\"]\n"),
        "unknown sub_role JANITOR",
    )
}

/// Verifies grants extend sub-role action sets.
#[test]
fn grants_extend_action_sets() -> TestResult {
    let config = config_from_toml(
        r#"
[[registry.grants]]
sub_role = "OPERATIONS_MANAGER"
submodule = "WO_PM"
actions = ["view", "schedule"]

[[registry.grants]]
role = "VENDOR"
submodule = "WO_SERVICE_HISTORY"
actions = ["export"]
"#,
    )
    .map_err(|err| err.to_string())?;
    let registry = config.build_registry().map_err(|err| err.to_string())?;
    let actions =
        registry.sub_role_actions(SubRole::OperationsManager, SubmoduleKey::WoPm).unwrap();
    assert!(actions.contains(&Action::View));
    assert!(actions.contains(&Action::Schedule));
    let vendor = registry.role_actions(Role::Vendor, SubmoduleKey::WoServiceHistory).unwrap();
    assert!(vendor.contains(&Action::Export));
    Ok(())
}

/// Verifies grants name exactly one target and known actions.
#[test]
fn grants_reject_ambiguous_targets_and_unknown_actions() -> TestResult {
    assert_invalid(
        config_from_toml(
            "[[registry.grants]]\nrole = \"ADMIN\"\nsub_role = \"HR_OFFICER\"\nsubmodule = \
             \"WO_PM\"\nactions = [\"view\"]\n",
        ),
        "exactly one of role or sub_role",
    )?;
    assert_invalid(
        config_from_toml("[[registry.grants]]\nsubmodule = \"WO_PM\"\nactions = [\"view\"]\n"),
        "exactly one of role or sub_role",
    )?;
    assert_invalid(
        config_from_toml(
            "[[registry.grants]]\nrole = \"ADMIN\"\nsubmodule = \"WO_PM\"\nactions = [\"fly\"]\n",
        ),
        "unknown action fly",
    )?;
    assert_invalid(
        config_from_toml(
            "[[registry.grants]]\nrole = \"ADMIN\"\nsubmodule = \"WO_PM\"\nactions = []\n",
        ),
        "actions must be non-empty",
    )
}
