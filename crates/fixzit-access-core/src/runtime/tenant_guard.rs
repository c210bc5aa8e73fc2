// crates/fixzit-access-core/src/runtime/tenant_guard.rs
// ============================================================================
// Module: Fixzit Tenant Scope Guard
// Description: Organization id validation and tenant matching.
// Purpose: Fail fast on missing, malformed, or mismatched organization ids.
// Dependencies: crate::{core, interfaces}, serde, thiserror
// ============================================================================

//! ## Overview
//! The tenant guard runs before capability resolution. It validates the
//! caller's organization id, distinguishes "no session" from "invalid org"
//! from "session backend down", and checks that a target organization matches
//! the caller's.
//!
//! Security posture: every ambiguity denies. There is no wildcard org.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Serialize;
use thiserror::Error;

use crate::core::OrgId;
use crate::core::OrgIdError;
use crate::core::Session;
use crate::interfaces::SessionError;
use crate::interfaces::SessionSource;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Organization id validation failures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[serde(tag = "code", content = "detail", rename_all = "snake_case")]
pub enum OrgScopeError {
    /// No organization id was supplied.
    #[error("organization id is missing")]
    Missing,
    /// The organization id was empty or whitespace-only.
    #[error("organization id is empty")]
    Empty,
    /// The organization id failed structural validation.
    #[error("organization id is malformed: {0}")]
    Malformed(String),
    /// The target organization differs from the caller's.
    #[error("organization mismatch: caller {caller}, target {target}")]
    Mismatch {
        /// Caller organization.
        caller: String,
        /// Target organization.
        target: String,
    },
}

impl From<OrgIdError> for OrgScopeError {
    fn from(error: OrgIdError) -> Self {
        match error {
            OrgIdError::Empty => Self::Empty,
            other => Self::Malformed(other.to_string()),
        }
    }
}

/// Session-level tenant guard failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TenantGuardError {
    /// No session or no user in the session.
    #[error("no authenticated session")]
    NoSession,
    /// The session backend failed.
    #[error("session unavailable: {0}")]
    Unavailable(String),
    /// The session's organization id is missing or invalid.
    #[error("invalid session organization: {0}")]
    InvalidOrg(OrgScopeError),
}

impl From<SessionError> for TenantGuardError {
    fn from(error: SessionError) -> Self {
        match error {
            SessionError::Unavailable(message) => Self::Unavailable(message),
        }
    }
}

// ============================================================================
// SECTION: Validation
// ============================================================================

/// Validates and canonicalizes a raw organization id.
///
/// # Errors
///
/// Returns [`OrgScopeError::Missing`] for `None`, [`OrgScopeError::Empty`] for
/// blank input, and [`OrgScopeError::Malformed`] for structural failures.
pub fn validate_org_id(raw: Option<&str>) -> Result<OrgId, OrgScopeError> {
    let raw = raw.ok_or(OrgScopeError::Missing)?;
    Ok(OrgId::parse(raw)?)
}

/// Validates the organization id carried by a session.
///
/// # Errors
///
/// Returns [`TenantGuardError::NoSession`] when the session or its user is
/// absent, and [`TenantGuardError::InvalidOrg`] when the org id fails
/// validation.
pub fn validate_org_id_from_session(session: Option<&Session>) -> Result<OrgId, TenantGuardError> {
    let session = session.ok_or(TenantGuardError::NoSession)?;
    if session.user_id.trim().is_empty() {
        return Err(TenantGuardError::NoSession);
    }
    validate_org_id(session.org_id.as_deref()).map_err(TenantGuardError::InvalidOrg)
}

/// Reads the current session and validates its organization id.
///
/// # Errors
///
/// Returns [`TenantGuardError::Unavailable`] when the source fails, plus the
/// errors of [`validate_org_id_from_session`].
pub fn resolve_session_org<S>(source: &S) -> Result<(Session, OrgId), TenantGuardError>
where
    S: SessionSource + ?Sized,
{
    let session = source.current_session()?;
    let org_id = validate_org_id_from_session(session.as_ref())?;
    session.map(|session| (session, org_id)).ok_or(TenantGuardError::NoSession)
}

// ============================================================================
// SECTION: Tenant Matching
// ============================================================================

/// Outcome of matching a caller against a target organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum TenantAccess {
    /// Access is scoped to this organization.
    Granted {
        /// Canonical organization id.
        org_id: OrgId,
    },
    /// Access is denied.
    Denied {
        /// Denial reason.
        reason: OrgScopeError,
    },
}

impl TenantAccess {
    /// Returns true for [`TenantAccess::Granted`].
    #[must_use]
    pub const fn is_granted(&self) -> bool {
        matches!(self, Self::Granted { .. })
    }
}

/// Checks that a target organization matches the caller's.
///
/// A missing target means the caller's own organization. A missing or
/// invalid caller org always denies.
#[must_use]
pub fn authorize_org_access(caller: Option<&str>, target: Option<&str>) -> TenantAccess {
    let caller = match validate_org_id(caller) {
        Ok(org_id) => org_id,
        Err(reason) => return TenantAccess::Denied { reason },
    };
    let Some(raw_target) = target else {
        return TenantAccess::Granted { org_id: caller };
    };
    match validate_org_id(Some(raw_target)) {
        Ok(target) if target == caller => TenantAccess::Granted { org_id: caller },
        Ok(target) => TenantAccess::Denied {
            reason: OrgScopeError::Mismatch {
                caller: caller.to_string(),
                target: target.to_string(),
            },
        },
        Err(reason) => TenantAccess::Denied { reason },
    }
}
