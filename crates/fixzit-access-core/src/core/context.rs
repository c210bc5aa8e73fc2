// crates/fixzit-access-core/src/core/context.rs
// ============================================================================
// Module: Fixzit Access Context
// Description: Session input and the per-request resource context.
// Purpose: Turn untrusted session data into a typed authorization context.
// Dependencies: crate::core::{identifiers, plans, roles}, serde, thiserror
// ============================================================================

//! ## Overview
//! A [`Session`] is raw, untrusted input from the session provider. A
//! [`ResourceContext`] is the typed value the capability resolver consumes.
//! Contexts are built fresh for every authorization check and never persisted.
//!
//! Security posture: organization membership is derived only from an exact
//! match between the validated session org and the target org. An absent org
//! on either side means no membership.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::core::identifiers::OrgId;
use crate::core::identifiers::PropertyId;
use crate::core::identifiers::UserId;
use crate::core::plans::Plan;
use crate::core::plans::SubscriptionTier;
use crate::core::plans::normalize_plan;
use crate::core::roles::Role;
use crate::core::roles::SubRole;
use crate::core::roles::resolve_role_pair;

// ============================================================================
// SECTION: Session
// ============================================================================

/// Session payload supplied by the external auth provider.
///
/// # Invariants
/// - All fields are untrusted; normalize before use.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Authenticated user id.
    pub user_id: String,
    /// Raw role string (canonical or legacy alias).
    pub role: String,
    /// Raw sub-role string, when present.
    #[serde(default)]
    pub sub_role: Option<String>,
    /// Raw organization id, when present.
    #[serde(default)]
    pub org_id: Option<String>,
    /// Raw plan or subscription tier name, when present.
    #[serde(default)]
    pub plan: Option<String>,
}

/// Request target an authorization check is evaluated against.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceTarget {
    /// Organization owning the resource; `None` means the caller's own org.
    pub org_id: Option<OrgId>,
    /// Property the request targets.
    pub property_id: Option<PropertyId>,
}

/// Errors raised when a session cannot produce a resource context.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccessError {
    /// The session user id was blank.
    #[error("session user id is empty")]
    InvalidUser,
    /// The session role did not normalize to a canonical role.
    #[error("unknown role: {0}")]
    UnknownRole(String),
}

// ============================================================================
// SECTION: Resource Context
// ============================================================================

/// Per-request authorization context.
///
/// # Invariants
/// - `is_org_member == true` implies `org_id.is_some()`; the resolver denies
///   org-scoped access when this is violated.
/// - `sub_role` is only honored for [`Role::TeamMember`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceContext {
    /// Canonical role.
    pub role: Role,
    /// Sub-role specialization.
    pub sub_role: Option<SubRole>,
    /// FM plan used for submodule gates.
    pub plan: Plan,
    /// Subscription tier used for feature gates, when the session carried one.
    pub subscription_tier: Option<SubscriptionTier>,
    /// Acting user.
    pub user_id: UserId,
    /// Caller organization.
    pub org_id: Option<OrgId>,
    /// Targeted property.
    pub property_id: Option<PropertyId>,
    /// Whether the caller belongs to the target organization.
    pub is_org_member: bool,
}

impl ResourceContext {
    /// Creates a context with no organization membership on the starter plan.
    #[must_use]
    pub fn new(role: Role, user_id: impl Into<UserId>) -> Self {
        Self {
            role,
            sub_role: None,
            plan: Plan::Starter,
            subscription_tier: None,
            user_id: user_id.into(),
            org_id: None,
            property_id: None,
            is_org_member: false,
        }
    }

    /// Sets the sub-role.
    #[must_use]
    pub const fn with_sub_role(mut self, sub_role: SubRole) -> Self {
        self.sub_role = Some(sub_role);
        self
    }

    /// Sets the FM plan.
    #[must_use]
    pub const fn with_plan(mut self, plan: Plan) -> Self {
        self.plan = plan;
        self
    }

    /// Sets the subscription tier.
    #[must_use]
    pub const fn with_subscription_tier(mut self, tier: SubscriptionTier) -> Self {
        self.subscription_tier = Some(tier);
        self
    }

    /// Marks the caller as a member of `org_id`.
    #[must_use]
    pub fn member_of(mut self, org_id: OrgId) -> Self {
        self.org_id = Some(org_id);
        self.is_org_member = true;
        self
    }

    /// Sets the targeted property.
    #[must_use]
    pub fn with_property(mut self, property_id: PropertyId) -> Self {
        self.property_id = Some(property_id);
        self
    }

    /// Returns the sub-role that applies to capability checks.
    #[must_use]
    pub fn effective_sub_role(&self) -> Option<SubRole> {
        if self.role == Role::TeamMember { self.sub_role } else { None }
    }

    /// Returns true only when membership is asserted and an org is present.
    #[must_use]
    pub const fn has_org_membership(&self) -> bool {
        self.is_org_member && self.org_id.is_some()
    }

    /// Builds a context from an untrusted session and a request target.
    ///
    /// Role and sub-role go through the normalizer. The plan accepts either
    /// lattice: FM plan names map directly, subscription tier names map via
    /// [`Plan::from_subscription_tier`], anything else falls back to
    /// [`Plan::Starter`].
    ///
    /// # Errors
    ///
    /// Returns [`AccessError`] when the user id is blank or the role is unknown.
    pub fn from_session(session: &Session, target: &ResourceTarget) -> Result<Self, AccessError> {
        let user_id = session.user_id.trim();
        if user_id.is_empty() {
            return Err(AccessError::InvalidUser);
        }
        let (role, sub_role) =
            resolve_role_pair(Some(session.role.as_str()), session.sub_role.as_deref())
                .ok_or_else(|| AccessError::UnknownRole(session.role.clone()))?;
        let raw_plan = session.plan.as_deref();
        let subscription_tier = raw_plan.and_then(SubscriptionTier::parse);
        let plan = normalize_plan(raw_plan)
            .or_else(|| subscription_tier.map(Plan::from_subscription_tier))
            .unwrap_or(Plan::Starter);
        let session_org = session.org_id.as_deref().and_then(|raw| OrgId::parse(raw).ok());
        let is_org_member = match (&session_org, &target.org_id) {
            (Some(_), None) => true,
            (Some(caller), Some(target_org)) => caller == target_org,
            (None, _) => false,
        };
        Ok(Self {
            role,
            sub_role,
            plan,
            subscription_tier,
            user_id: UserId::new(user_id),
            org_id: session_org,
            property_id: target.property_id.clone(),
            is_org_member,
        })
    }
}
