// crates/fixzit-access-core/src/runtime/failure.rs
// ============================================================================
// Module: Fixzit Access Failure Classification
// Description: Maps access-core errors onto boundary failure categories.
// Purpose: Keep infra failures distinguishable from authorization denials.
// Dependencies: crate::{core, interfaces, runtime}, serde, thiserror
// ============================================================================

//! ## Overview
//! [`AccessFailure`] is the single classification a calling layer needs to
//! choose a response status: unauthenticated, forbidden, unprocessable, or
//! unavailable. Infrastructure failures always classify as unavailable.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Serialize;
use thiserror::Error;

use crate::core::AccessError;
use crate::interfaces::SessionError;
use crate::interfaces::StoreError;
use crate::runtime::approval::ApprovalError;
use crate::runtime::service::ApprovalServiceError;
use crate::runtime::tenant_guard::OrgScopeError;
use crate::runtime::tenant_guard::TenantGuardError;

// ============================================================================
// SECTION: Failure Categories
// ============================================================================

/// Boundary failure category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[serde(tag = "kind", content = "message", rename_all = "snake_case")]
pub enum AccessFailure {
    /// No or invalid session (401).
    #[error("unauthenticated: {0}")]
    Unauthenticated(String),
    /// Valid session without permission, or tenant mismatch (403).
    #[error("forbidden: {0}")]
    Forbidden(String),
    /// Malformed request (422).
    #[error("unprocessable: {0}")]
    Unprocessable(String),
    /// Upstream infrastructure failure (503).
    #[error("unavailable: {0}")]
    Unavailable(String),
}

impl AccessFailure {
    /// Returns the HTTP status code for the category.
    #[must_use]
    pub const fn http_status(&self) -> u16 {
        match self {
            Self::Unauthenticated(_) => 401,
            Self::Forbidden(_) => 403,
            Self::Unprocessable(_) => 422,
            Self::Unavailable(_) => 503,
        }
    }
}

impl From<OrgScopeError> for AccessFailure {
    fn from(error: OrgScopeError) -> Self {
        match error {
            OrgScopeError::Mismatch { .. } => Self::Forbidden(error.to_string()),
            OrgScopeError::Missing | OrgScopeError::Empty | OrgScopeError::Malformed(_) => {
                Self::Unprocessable(error.to_string())
            }
        }
    }
}

impl From<TenantGuardError> for AccessFailure {
    fn from(error: TenantGuardError) -> Self {
        match error {
            TenantGuardError::NoSession => Self::Unauthenticated(error.to_string()),
            TenantGuardError::Unavailable(_) => Self::Unavailable(error.to_string()),
            TenantGuardError::InvalidOrg(_) => Self::Forbidden(error.to_string()),
        }
    }
}

impl From<SessionError> for AccessFailure {
    fn from(error: SessionError) -> Self {
        Self::Unavailable(error.to_string())
    }
}

impl From<AccessError> for AccessFailure {
    fn from(error: AccessError) -> Self {
        match error {
            AccessError::InvalidUser => Self::Unauthenticated(error.to_string()),
            AccessError::UnknownRole(_) => Self::Forbidden(error.to_string()),
        }
    }
}

impl From<StoreError> for AccessFailure {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::VersionConflict { .. } => Self::Unprocessable(error.to_string()),
            StoreError::Io(_)
            | StoreError::Corrupt(_)
            | StoreError::VersionMismatch(_)
            | StoreError::Invalid(_)
            | StoreError::Store(_) => Self::Unavailable(error.to_string()),
        }
    }
}

impl From<ApprovalError> for AccessFailure {
    fn from(error: ApprovalError) -> Self {
        match error {
            ApprovalError::NotAnApprover(_) => Self::Forbidden(error.to_string()),
            ApprovalError::Directory(_) | ApprovalError::Corrupt(_) => {
                Self::Unavailable(error.to_string())
            }
            ApprovalError::InvalidRequest(_)
            | ApprovalError::InvalidPolicy(_)
            | ApprovalError::PolicyNotFound { .. }
            | ApprovalError::NoApprovers { .. }
            | ApprovalError::InvalidState(_)
            | ApprovalError::DuplicateDecision(_)
            | ApprovalError::InvalidDecision(_) => Self::Unprocessable(error.to_string()),
        }
    }
}

impl From<ApprovalServiceError> for AccessFailure {
    fn from(error: ApprovalServiceError) -> Self {
        match error {
            ApprovalServiceError::Approval(inner) => inner.into(),
            ApprovalServiceError::Store(inner) => inner.into(),
            ApprovalServiceError::NotFound(_) => Self::Unprocessable(error.to_string()),
        }
    }
}
