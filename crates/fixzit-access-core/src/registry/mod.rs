// crates/fixzit-access-core/src/registry/mod.rs
// ============================================================================
// Module: Fixzit Access Registry
// Description: Role, sub-role, and plan entitlement tables.
// Purpose: Hold read-only permission tables injected into the resolver.
// Dependencies: crate::core, serde
// ============================================================================

//! ## Overview
//! [`AccessRegistry`] is the data the capability resolver consults: module
//! lists per role and sub-role, per-submodule action sets, per-plan gates,
//! and the set of org-scoped submodules. It is built once at process start
//! (from [`AccessRegistry::builtin`] plus configuration overrides) and then
//! shared read-only behind an `Arc`.
//!
//! Security posture: lookups fail closed. A role with no module entry sees
//! only the dashboard; a missing plan gate follows [`PlanGateDefault`], which
//! defaults to deny.

// ============================================================================
// SECTION: Submodules
// ============================================================================

mod builtin;

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use serde::Deserialize;
use serde::Serialize;

use crate::core::Action;
use crate::core::ModuleKey;
use crate::core::Plan;
use crate::core::Role;
use crate::core::SubRole;
use crate::core::SubmoduleKey;

// ============================================================================
// SECTION: Defaults
// ============================================================================

/// Module list for roles without an explicit entry.
pub const DEFAULT_ROLE_MODULES: &[ModuleKey] = &[ModuleKey::Dashboard];

/// Behavior for a plan/submodule pair with no explicit gate entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanGateDefault {
    /// Missing entries deny access.
    #[default]
    Deny,
    /// Missing entries allow access (legacy gate-by-exception behavior).
    Allow,
}

impl PlanGateDefault {
    /// Returns the gate value applied to missing entries.
    #[must_use]
    pub const fn allows(self) -> bool {
        matches!(self, Self::Allow)
    }
}

/// Action sets keyed by submodule.
pub type ActionTable = BTreeMap<SubmoduleKey, BTreeSet<Action>>;

// ============================================================================
// SECTION: Registry
// ============================================================================

/// Read-only permission tables.
///
/// # Invariants
/// - Sub-role module lists replace the parent role's list; they never merge.
/// - Plan gates are hard ceilings independent of role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessRegistry {
    /// Module lists per role.
    role_modules: BTreeMap<Role, Vec<ModuleKey>>,
    /// Module lists per sub-role.
    sub_role_modules: BTreeMap<SubRole, Vec<ModuleKey>>,
    /// Explicit plan gates.
    plan_gates: BTreeMap<(Plan, SubmoduleKey), bool>,
    /// Gate applied when no explicit entry exists.
    plan_gate_default: PlanGateDefault,
    /// Allowed actions per role.
    role_actions: BTreeMap<Role, ActionTable>,
    /// Allowed actions per sub-role.
    sub_role_actions: BTreeMap<SubRole, ActionTable>,
    /// Submodules that require organization membership.
    org_scoped: BTreeSet<SubmoduleKey>,
}

impl Default for AccessRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl AccessRegistry {
    /// Creates an empty registry: every role sees only the dashboard, no
    /// actions are granted, and every submodule is org-scoped.
    #[must_use]
    pub fn empty(plan_gate_default: PlanGateDefault) -> Self {
        Self {
            role_modules: BTreeMap::new(),
            sub_role_modules: BTreeMap::new(),
            plan_gates: BTreeMap::new(),
            plan_gate_default,
            role_actions: BTreeMap::new(),
            sub_role_actions: BTreeMap::new(),
            org_scoped: SubmoduleKey::ALL.into_iter().collect(),
        }
    }

    /// Returns the builtin registry shipped with the platform.
    #[must_use]
    pub fn builtin() -> Self {
        builtin::registry()
    }

    // ------------------------------------------------------------------------
    // Lookups
    // ------------------------------------------------------------------------

    /// Returns the module list for a role, defaulting to [`DEFAULT_ROLE_MODULES`].
    #[must_use]
    pub fn role_modules(&self, role: Role) -> &[ModuleKey] {
        self.role_modules.get(&role).map_or(DEFAULT_ROLE_MODULES, Vec::as_slice)
    }

    /// Returns the explicit module list for a sub-role.
    #[must_use]
    pub fn sub_role_modules(&self, sub_role: SubRole) -> Option<&[ModuleKey]> {
        self.sub_role_modules.get(&sub_role).map(Vec::as_slice)
    }

    /// Computes the module list for a role and optional sub-role.
    ///
    /// A sub-role with an entry replaces the role's list.
    #[must_use]
    pub fn compute_allowed_modules(&self, role: Role, sub_role: Option<SubRole>) -> Vec<ModuleKey> {
        sub_role
            .and_then(|sub_role| self.sub_role_modules(sub_role))
            .unwrap_or_else(|| self.role_modules(role))
            .to_vec()
    }

    /// Returns the explicit plan gate, when one exists.
    #[must_use]
    pub fn plan_gate(&self, plan: Plan, submodule: SubmoduleKey) -> Option<bool> {
        self.plan_gates.get(&(plan, submodule)).copied()
    }

    /// Returns whether the plan gate admits the submodule.
    #[must_use]
    pub fn gate_allows(&self, plan: Plan, submodule: SubmoduleKey) -> bool {
        self.plan_gate(plan, submodule).unwrap_or_else(|| self.plan_gate_default.allows())
    }

    /// Returns the missing-gate behavior.
    #[must_use]
    pub const fn plan_gate_default(&self) -> PlanGateDefault {
        self.plan_gate_default
    }

    /// Returns the role's action set for a submodule.
    #[must_use]
    pub fn role_actions(&self, role: Role, submodule: SubmoduleKey) -> Option<&BTreeSet<Action>> {
        self.role_actions.get(&role).and_then(|table| table.get(&submodule))
    }

    /// Returns the sub-role's action set for a submodule.
    #[must_use]
    pub fn sub_role_actions(
        &self,
        sub_role: SubRole,
        submodule: SubmoduleKey,
    ) -> Option<&BTreeSet<Action>> {
        self.sub_role_actions.get(&sub_role).and_then(|table| table.get(&submodule))
    }

    /// Returns true when the submodule requires organization membership.
    #[must_use]
    pub fn requires_org_scope(&self, submodule: SubmoduleKey) -> bool {
        self.org_scoped.contains(&submodule)
    }

    // ------------------------------------------------------------------------
    // Builders
    // ------------------------------------------------------------------------

    /// Sets the missing-gate behavior.
    pub const fn set_plan_gate_default(&mut self, default: PlanGateDefault) {
        self.plan_gate_default = default;
    }

    /// Sets an explicit plan gate.
    pub fn set_plan_gate(&mut self, plan: Plan, submodule: SubmoduleKey, allowed: bool) {
        self.plan_gates.insert((plan, submodule), allowed);
    }

    /// Removes an explicit plan gate so the default applies.
    pub fn clear_plan_gate(&mut self, plan: Plan, submodule: SubmoduleKey) {
        self.plan_gates.remove(&(plan, submodule));
    }

    /// Replaces a role's module list.
    pub fn set_role_modules(&mut self, role: Role, modules: Vec<ModuleKey>) {
        self.role_modules.insert(role, dedup(modules));
    }

    /// Replaces a sub-role's module list.
    pub fn set_sub_role_modules(&mut self, sub_role: SubRole, modules: Vec<ModuleKey>) {
        self.sub_role_modules.insert(sub_role, dedup(modules));
    }

    /// Adds actions to a role's set for a submodule.
    pub fn grant_role_actions(&mut self, role: Role, submodule: SubmoduleKey, actions: &[Action]) {
        self.role_actions
            .entry(role)
            .or_default()
            .entry(submodule)
            .or_default()
            .extend(actions.iter().copied());
    }

    /// Adds actions to a sub-role's set for a submodule.
    pub fn grant_sub_role_actions(
        &mut self,
        sub_role: SubRole,
        submodule: SubmoduleKey,
        actions: &[Action],
    ) {
        self.sub_role_actions
            .entry(sub_role)
            .or_default()
            .entry(submodule)
            .or_default()
            .extend(actions.iter().copied());
    }

    /// Marks whether a submodule requires organization membership.
    pub fn set_org_scoped(&mut self, submodule: SubmoduleKey, scoped: bool) {
        if scoped {
            self.org_scoped.insert(submodule);
        } else {
            self.org_scoped.remove(&submodule);
        }
    }
}

/// Removes duplicate modules while preserving first-seen order.
fn dedup(modules: Vec<ModuleKey>) -> Vec<ModuleKey> {
    let mut seen = BTreeSet::new();
    modules.into_iter().filter(|module| seen.insert(*module)).collect()
}
