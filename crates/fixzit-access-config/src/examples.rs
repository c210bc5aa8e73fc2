// crates/fixzit-access-config/src/examples.rs
// ============================================================================
// Module: Config Examples
// Description: Canonical example configuration payload.
// Purpose: Deterministic example for docs and the CLI.
// Dependencies: std
// ============================================================================

//! ## Overview
//! Canonical example `fixzit-access.toml`. The example must always pass
//! validation; the config tests enforce that.

/// Returns a canonical example `fixzit-access.toml` configuration.
#[must_use]
pub fn config_toml_example() -> String {
    String::from(
        r#"[registry]
plan_gate_default = "deny"

[[registry.plan_gates]]
plan = "STARTER"
submodule = "WO_PM"
allowed = true

[registry.role_modules]
VENDOR = ["DASHBOARD", "MARKETPLACE", "WORK_ORDERS"]

[[registry.grants]]
sub_role = "OPERATIONS_MANAGER"
submodule = "WO_PM"
actions = ["view", "create"]

[[approval.policies]]
name = "executive"
amount_threshold = "100000"
required_roles = ["CORPORATE_OWNER"]
parallel_roles = ["FINANCE_OFFICER", "ADMIN"]
timeout_hours = 72
escalate_to_roles = ["SUPER_ADMIN"]

[[approval.policies]]
name = "management"
amount_threshold = "10000"
required_roles = ["ADMIN"]
parallel_roles = ["FINANCE_OFFICER"]
timeout_hours = 48
escalate_to_roles = ["CORPORATE_OWNER"]

[[approval.policies]]
name = "emergency-repairs"
amount_threshold = "0"
categories = ["emergency"]
required_roles = ["PROPERTY_MANAGER"]
timeout_hours = 4
escalate_to_roles = ["ADMIN"]

[[approval.policies]]
name = "operational"
amount_threshold = "0"
required_roles = ["PROPERTY_MANAGER"]
timeout_hours = 24
escalate_to_roles = ["ADMIN"]

[approvers."org-1"]
CORPORATE_OWNER = ["user-owner-1"]
ADMIN = ["user-admin-1"]
SUPER_ADMIN = ["user-root-1"]
PROPERTY_MANAGER = ["user-pm-1"]
FINANCE_OFFICER = ["user-fin-1", "user-fin-2"]

[store]
path = "fixzit-access.db"
journal_mode = "wal"
sync_mode = "full"
busy_timeout_ms = 5000

[audit]
sink = "stderr"
"#,
    )
}
