// crates/fixzit-access-core/src/interfaces/mod.rs
// ============================================================================
// Module: Fixzit Access Interfaces
// Description: Backend-agnostic seams for sessions, approvers, and storage.
// Purpose: Define the narrow contracts external collaborators implement.
// Dependencies: crate::core, thiserror
// ============================================================================

//! ## Overview
//! The access core never performs I/O on its own. Sessions come from a
//! [`SessionSource`], approver ids from an [`ApproverDirectory`], and
//! workflows are loaded and saved through a [`WorkflowStore`].
//!
//! Security posture: infrastructure failures are reported through dedicated
//! error variants so outages are never confused with authorization denials.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

use crate::core::ApprovalWorkflow;
use crate::core::ApproverRole;
use crate::core::OrgId;
use crate::core::RequestId;
use crate::core::Session;
use crate::core::UserId;

// ============================================================================
// SECTION: Session Source
// ============================================================================

/// Session provider errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// Session backend is unreachable or failed.
    #[error("session source unavailable: {0}")]
    Unavailable(String),
}

/// Source of the current request's session.
pub trait SessionSource {
    /// Returns the current session, or `None` when the caller is anonymous.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] when the session backend fails.
    fn current_session(&self) -> Result<Option<Session>, SessionError>;
}

// ============================================================================
// SECTION: Approver Directory
// ============================================================================

/// Approver directory errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DirectoryError {
    /// Directory backend failed.
    #[error("approver directory error: {0}")]
    Backend(String),
}

/// Resolves approver roles to user ids within an organization.
pub trait ApproverDirectory {
    /// Returns the users holding `role` in `org_id`.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError`] when the lookup fails.
    fn approvers_for(
        &self,
        org_id: &OrgId,
        role: &ApproverRole,
    ) -> Result<Vec<UserId>, DirectoryError>;
}

// ============================================================================
// SECTION: Workflow Store
// ============================================================================

/// Workflow store errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Store I/O error.
    #[error("workflow store io error: {0}")]
    Io(String),
    /// Store data is corrupted or fails integrity checks.
    #[error("workflow store corruption: {0}")]
    Corrupt(String),
    /// Store schema version is incompatible.
    #[error("workflow store version mismatch: {0}")]
    VersionMismatch(String),
    /// Store data is invalid.
    #[error("workflow store invalid data: {0}")]
    Invalid(String),
    /// Stored workflow version differs from the caller's expectation.
    #[error("workflow version conflict: expected {expected:?}, found {actual:?}")]
    VersionConflict {
        /// Version the caller loaded, or `None` for a new workflow.
        expected: Option<u64>,
        /// Version currently stored, or `None` when absent.
        actual: Option<u64>,
    },
    /// Store reported an error.
    #[error("workflow store error: {0}")]
    Store(String),
}

/// Persistence for approval workflows.
///
/// # Invariants
/// - `save` succeeds only when the stored version equals `expected_version`
///   (`None` meaning no workflow is stored yet).
pub trait WorkflowStore {
    /// Loads a workflow by organization and request id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when loading fails.
    fn load(
        &self,
        org_id: &OrgId,
        request_id: &RequestId,
    ) -> Result<Option<ApprovalWorkflow>, StoreError>;

    /// Saves a workflow, checking the previously stored version.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::VersionConflict`] on a stale write and other
    /// [`StoreError`] variants when saving fails.
    fn save(
        &self,
        workflow: &ApprovalWorkflow,
        expected_version: Option<u64>,
    ) -> Result<(), StoreError>;

    /// Lists an organization's workflows ordered by request id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when listing fails.
    fn list(&self, org_id: &OrgId) -> Result<Vec<ApprovalWorkflow>, StoreError>;
}
