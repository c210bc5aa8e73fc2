// crates/fixzit-access-core/src/runtime/resolver.rs
// ============================================================================
// Module: Fixzit Capability Resolver
// Description: Maps a resource context to permitted actions on a submodule.
// Purpose: Answer "can this session do action X on submodule Y" fail-closed.
// Dependencies: crate::{core, registry}, serde
// ============================================================================

//! ## Overview
//! [`CapabilityResolver`] applies, in order: tenant isolation, the plan gate
//! ceiling, the sub-role action override, then the base role's actions. A
//! denial is a value, never an error.
//!
//! Security posture: every branch that cannot prove access denies it. A
//! context claiming membership without an organization is treated as a
//! non-member.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use serde::Serialize;

use crate::core::Action;
use crate::core::ModuleKey;
use crate::core::ResourceContext;
use crate::core::Role;
use crate::core::SubRole;
use crate::core::SubmoduleKey;
use crate::core::SubscriptionFeature;
use crate::core::tier_allows;
use crate::registry::AccessRegistry;

// ============================================================================
// SECTION: Decisions
// ============================================================================

/// Why a capability decision came out the way it did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionReason {
    /// Caller is not a member of the org owning an org-scoped submodule.
    NotOrgMember,
    /// The plan gate denies the submodule.
    PlanGateDenied,
    /// The sub-role's action set decided the outcome.
    SubRoleOverride,
    /// The base role's action set granted the action.
    RoleAction,
    /// No applicable action set contains the action.
    ActionNotAllowed,
}

impl DecisionReason {
    /// Returns the stable reason label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotOrgMember => "not_org_member",
            Self::PlanGateDenied => "plan_gate_denied",
            Self::SubRoleOverride => "sub_role_override",
            Self::RoleAction => "role_action",
            Self::ActionNotAllowed => "action_not_allowed",
        }
    }
}

/// Capability decision with its reason.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CapabilityDecision {
    /// Whether the action is permitted.
    pub allowed: bool,
    /// Reason label.
    pub reason: DecisionReason,
}

impl CapabilityDecision {
    /// Builds a denial.
    const fn deny(reason: DecisionReason) -> Self {
        Self {
            allowed: false,
            reason,
        }
    }
}

// ============================================================================
// SECTION: Resolver
// ============================================================================

/// Capability resolver over an injected registry.
#[derive(Debug, Clone)]
pub struct CapabilityResolver {
    /// Shared read-only registry.
    registry: Arc<AccessRegistry>,
}

impl Default for CapabilityResolver {
    fn default() -> Self {
        Self::builtin()
    }
}

impl CapabilityResolver {
    /// Creates a resolver over the given registry.
    #[must_use]
    pub const fn new(registry: Arc<AccessRegistry>) -> Self {
        Self {
            registry,
        }
    }

    /// Creates a resolver over the builtin registry.
    #[must_use]
    pub fn builtin() -> Self {
        Self::new(Arc::new(AccessRegistry::builtin()))
    }

    /// Returns the registry.
    #[must_use]
    pub fn registry(&self) -> &AccessRegistry {
        &self.registry
    }

    /// Evaluates an action on a submodule and reports why.
    ///
    /// Action checks are independent of the module list: a team member whose
    /// sub-role narrows the modules keeps the role's actions on submodules the
    /// sub-role has no entry for. Use [`Self::can_access_module`] or
    /// [`Self::allowed_submodules`] for navigation-level visibility.
    #[must_use]
    pub fn evaluate(
        &self,
        submodule: SubmoduleKey,
        action: Action,
        ctx: &ResourceContext,
    ) -> CapabilityDecision {
        if self.registry.requires_org_scope(submodule) && !ctx.has_org_membership() {
            return CapabilityDecision::deny(DecisionReason::NotOrgMember);
        }
        if !self.registry.gate_allows(ctx.plan, submodule) {
            return CapabilityDecision::deny(DecisionReason::PlanGateDenied);
        }
        if let Some(actions) = ctx
            .effective_sub_role()
            .and_then(|sub_role| self.registry.sub_role_actions(sub_role, submodule))
        {
            return CapabilityDecision {
                allowed: actions.contains(&action),
                reason: if actions.contains(&action) {
                    DecisionReason::SubRoleOverride
                } else {
                    DecisionReason::ActionNotAllowed
                },
            };
        }
        match self.registry.role_actions(ctx.role, submodule) {
            Some(actions) if actions.contains(&action) => CapabilityDecision {
                allowed: true,
                reason: DecisionReason::RoleAction,
            },
            _ => CapabilityDecision::deny(DecisionReason::ActionNotAllowed),
        }
    }

    /// Returns whether the context may perform `action` on `submodule`.
    #[must_use]
    pub fn can_perform(
        &self,
        submodule: SubmoduleKey,
        action: Action,
        ctx: &ResourceContext,
    ) -> bool {
        self.evaluate(submodule, action, ctx).allowed
    }

    /// Returns every action the context may perform on `submodule`, in
    /// [`Action::ALL`] order.
    #[must_use]
    pub fn get_allowed_actions(
        &self,
        submodule: SubmoduleKey,
        ctx: &ResourceContext,
    ) -> Vec<Action> {
        Action::ALL.into_iter().filter(|action| self.can_perform(submodule, *action, ctx)).collect()
    }

    /// Returns the module list for a role and optional sub-role.
    ///
    /// The sub-role only applies to [`Role::TeamMember`].
    #[must_use]
    pub fn compute_allowed_modules(&self, role: Role, sub_role: Option<SubRole>) -> Vec<ModuleKey> {
        let sub_role = if role == Role::TeamMember { sub_role } else { None };
        self.registry.compute_allowed_modules(role, sub_role)
    }

    /// Coarse check: the submodule's parent module is in the resolved module
    /// list and the plan gate does not hard-deny the submodule.
    #[must_use]
    pub fn can_access_module(&self, submodule: SubmoduleKey, ctx: &ResourceContext) -> bool {
        if self.registry.requires_org_scope(submodule) && !ctx.has_org_membership() {
            return false;
        }
        self.compute_allowed_modules(ctx.role, ctx.sub_role).contains(&submodule.module())
            && self.registry.gate_allows(ctx.plan, submodule)
    }

    /// Returns every submodule whose parent module is in the resolved module
    /// list and on which the context may perform at least one action.
    #[must_use]
    pub fn allowed_submodules(&self, ctx: &ResourceContext) -> Vec<SubmoduleKey> {
        let modules = self.compute_allowed_modules(ctx.role, ctx.sub_role);
        SubmoduleKey::ALL
            .into_iter()
            .filter(|submodule| modules.contains(&submodule.module()))
            .filter(|submodule| {
                Action::ALL.into_iter().any(|action| self.can_perform(*submodule, action, ctx))
            })
            .collect()
    }

    /// Returns whether the context's subscription tier unlocks `feature`.
    ///
    /// Contexts without a subscription tier are denied.
    #[must_use]
    pub fn has_feature(&self, feature: SubscriptionFeature, ctx: &ResourceContext) -> bool {
        ctx.subscription_tier.is_some_and(|tier| tier_allows(tier, feature))
    }
}
