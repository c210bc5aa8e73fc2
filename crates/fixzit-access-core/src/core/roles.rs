// crates/fixzit-access-core/src/core/roles.rs
// ============================================================================
// Module: Fixzit Access Roles
// Description: Canonical roles, sub-roles, and the legacy alias table.
// Purpose: Normalize untrusted role strings into a closed enumeration.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Roles arrive from sessions as free-form strings accumulated over years of
//! legacy naming. This module reconciles them into [`Role`] and [`SubRole`]
//! through a fixed, data-driven alias table. Normalization is total: unknown
//! input yields `None` and never panics.
//!
//! Security posture: role strings are untrusted; an unrecognized role is
//! never mapped to a privileged default.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Roles
// ============================================================================

/// Canonical platform roles.
///
/// # Invariants
/// - Variants are stable for serialization; wire form is `SCREAMING_SNAKE_CASE`.
/// - [`Role::as_str`] round-trips through [`normalize_role`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// Platform operator with access to every tenant capability.
    SuperAdmin,
    /// Organization administrator.
    Admin,
    /// Owner of a corporate portfolio.
    CorporateOwner,
    /// Internal staff member; may carry a [`SubRole`].
    TeamMember,
    /// Field technician executing work orders.
    Technician,
    /// Property manager.
    PropertyManager,
    /// Resident or lessee.
    Tenant,
    /// External vendor or contractor.
    Vendor,
    /// Read-only guest.
    Guest,
}

impl Role {
    /// Every canonical role in declaration order.
    pub const ALL: [Self; 9] = [
        Self::SuperAdmin,
        Self::Admin,
        Self::CorporateOwner,
        Self::TeamMember,
        Self::Technician,
        Self::PropertyManager,
        Self::Tenant,
        Self::Vendor,
        Self::Guest,
    ];

    /// Returns the canonical wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SuperAdmin => "SUPER_ADMIN",
            Self::Admin => "ADMIN",
            Self::CorporateOwner => "CORPORATE_OWNER",
            Self::TeamMember => "TEAM_MEMBER",
            Self::Technician => "TECHNICIAN",
            Self::PropertyManager => "PROPERTY_MANAGER",
            Self::Tenant => "TENANT",
            Self::Vendor => "VENDOR",
            Self::Guest => "GUEST",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// SECTION: Sub-Roles
// ============================================================================

/// Specialization tags for [`Role::TeamMember`].
///
/// # Invariants
/// - Only effective when the resolved role is [`Role::TeamMember`].
/// - Narrows module access; never widens it beyond the specialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubRole {
    /// Finance staff (invoices, payments, budgets).
    FinanceOfficer,
    /// Human resources staff.
    HrOfficer,
    /// Customer support staff.
    SupportAgent,
    /// Operations and dispatch staff.
    OperationsManager,
}

impl SubRole {
    /// Every sub-role in declaration order.
    pub const ALL: [Self; 4] = [
        Self::FinanceOfficer,
        Self::HrOfficer,
        Self::SupportAgent,
        Self::OperationsManager,
    ];

    /// Returns the canonical wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FinanceOfficer => "FINANCE_OFFICER",
            Self::HrOfficer => "HR_OFFICER",
            Self::SupportAgent => "SUPPORT_AGENT",
            Self::OperationsManager => "OPERATIONS_MANAGER",
        }
    }
}

impl fmt::Display for SubRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// SECTION: Alias Tables
// ============================================================================

/// Legacy role alias entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleAlias {
    /// Uppercase legacy spelling.
    pub alias: &'static str,
    /// Canonical role the alias resolves to.
    pub role: Role,
    /// Sub-role implied by the alias, used only when no explicit sub-role is set.
    pub implied_sub_role: Option<SubRole>,
}

/// Shorthand constructor for alias rows.
const fn alias(alias: &'static str, role: Role, implied_sub_role: Option<SubRole>) -> RoleAlias {
    RoleAlias {
        alias,
        role,
        implied_sub_role,
    }
}

/// Legacy role spellings observed in stored sessions.
pub const ROLE_ALIASES: &[RoleAlias] = &[
    alias("SUPERADMIN", Role::SuperAdmin, None),
    alias("PLATFORM_ADMIN", Role::SuperAdmin, None),
    alias("TENANT_ADMIN", Role::Admin, None),
    alias("CORPORATE_ADMIN", Role::Admin, None),
    alias("FM_ADMIN", Role::Admin, None),
    alias("ORG_ADMIN", Role::Admin, None),
    alias("OWNER", Role::CorporateOwner, None),
    alias("PROPERTY_OWNER", Role::CorporateOwner, None),
    alias("EMPLOYEE", Role::TeamMember, None),
    alias("STAFF", Role::TeamMember, None),
    alias("FINANCE", Role::TeamMember, Some(SubRole::FinanceOfficer)),
    alias("FINANCE_MANAGER", Role::TeamMember, Some(SubRole::FinanceOfficer)),
    alias("ACCOUNTANT", Role::TeamMember, Some(SubRole::FinanceOfficer)),
    alias("HR", Role::TeamMember, Some(SubRole::HrOfficer)),
    alias("HR_MANAGER", Role::TeamMember, Some(SubRole::HrOfficer)),
    alias("SUPPORT", Role::TeamMember, Some(SubRole::SupportAgent)),
    alias("CUSTOMER_SERVICE", Role::TeamMember, Some(SubRole::SupportAgent)),
    alias("DISPATCHER", Role::TeamMember, Some(SubRole::OperationsManager)),
    alias("OPERATIONS", Role::TeamMember, Some(SubRole::OperationsManager)),
    alias("FIELD_ENGINEER", Role::Technician, None),
    alias("MAINTENANCE", Role::Technician, None),
    alias("FM_MANAGER", Role::PropertyManager, None),
    alias("MANAGER", Role::PropertyManager, None),
    alias("RESIDENT", Role::Tenant, None),
    alias("CUSTOMER", Role::Tenant, None),
    alias("SUPPLIER", Role::Vendor, None),
    alias("CONTRACTOR", Role::Vendor, None),
    alias("VIEWER", Role::Guest, None),
];

/// Legacy sub-role spellings.
pub const SUB_ROLE_ALIASES: &[(&str, SubRole)] = &[
    ("FINANCE", SubRole::FinanceOfficer),
    ("FINANCE_MANAGER", SubRole::FinanceOfficer),
    ("ACCOUNTANT", SubRole::FinanceOfficer),
    ("HR", SubRole::HrOfficer),
    ("HR_MANAGER", SubRole::HrOfficer),
    ("SUPPORT", SubRole::SupportAgent),
    ("CUSTOMER_SERVICE", SubRole::SupportAgent),
    ("OPS_MANAGER", SubRole::OperationsManager),
    ("OPERATIONS", SubRole::OperationsManager),
    ("DISPATCHER", SubRole::OperationsManager),
];

// ============================================================================
// SECTION: Normalization
// ============================================================================

/// Uppercases and trims a raw role string; `None` when blank.
fn canonical_key(raw: Option<&str>) -> Option<String> {
    let trimmed = raw?.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.to_ascii_uppercase())
}

/// Normalizes a raw role string into a canonical [`Role`].
///
/// Input is trimmed and uppercased, then resolved through [`ROLE_ALIASES`]
/// before a direct match against canonical names. Unknown input returns
/// `None`.
#[must_use]
pub fn normalize_role(raw: Option<&str>) -> Option<Role> {
    let key = canonical_key(raw)?;
    if let Some(entry) = ROLE_ALIASES.iter().find(|entry| entry.alias == key) {
        return Some(entry.role);
    }
    Role::ALL.into_iter().find(|role| role.as_str() == key)
}

/// Normalizes a raw sub-role string into a canonical [`SubRole`].
#[must_use]
pub fn normalize_sub_role(raw: Option<&str>) -> Option<SubRole> {
    let key = canonical_key(raw)?;
    if let Some((_, sub_role)) = SUB_ROLE_ALIASES.iter().find(|(name, _)| *name == key) {
        return Some(*sub_role);
    }
    SubRole::ALL.into_iter().find(|sub_role| sub_role.as_str() == key)
}

/// Derives a default sub-role from a raw role string.
///
/// Only legacy aliases that encoded a specialization (for example
/// `"ACCOUNTANT"`) imply one. Callers use this as a fallback when the session
/// carries no explicit sub-role.
#[must_use]
pub fn infer_sub_role_from_role(raw: Option<&str>) -> Option<SubRole> {
    let key = canonical_key(raw)?;
    ROLE_ALIASES.iter().find(|entry| entry.alias == key).and_then(|entry| entry.implied_sub_role)
}

/// Resolves the effective role and sub-role pair for a session.
///
/// The explicit sub-role wins over an inferred one. A sub-role is dropped
/// unless the effective role is [`Role::TeamMember`].
#[must_use]
pub fn resolve_role_pair(
    raw_role: Option<&str>,
    raw_sub_role: Option<&str>,
) -> Option<(Role, Option<SubRole>)> {
    let role = normalize_role(raw_role)?;
    let sub_role =
        normalize_sub_role(raw_sub_role).or_else(|| infer_sub_role_from_role(raw_role));
    let effective = if role == Role::TeamMember { sub_role } else { None };
    Some((role, effective))
}
