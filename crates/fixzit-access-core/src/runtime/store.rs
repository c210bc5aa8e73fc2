// crates/fixzit-access-core/src/runtime/store.rs
// ============================================================================
// Module: Fixzit In-Memory Stores
// Description: In-memory workflow store and static approver directory.
// Purpose: Provide deterministic collaborators for tests and local runs.
// Dependencies: crate::{core, interfaces}
// ============================================================================

//! ## Overview
//! [`InMemoryWorkflowStore`] implements [`WorkflowStore`] with the same
//! version-checked save semantics as the durable store.
//! [`StaticApproverDirectory`] resolves approver roles from a fixed table.
//! Neither is intended for production use.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::Mutex;

use crate::core::ApprovalWorkflow;
use crate::core::ApproverRole;
use crate::core::OrgId;
use crate::core::RequestId;
use crate::core::UserId;
use crate::interfaces::ApproverDirectory;
use crate::interfaces::DirectoryError;
use crate::interfaces::StoreError;
use crate::interfaces::WorkflowStore;

// ============================================================================
// SECTION: In-Memory Workflow Store
// ============================================================================

/// Store key: organization and request id.
type WorkflowKey = (OrgId, RequestId);

/// In-memory workflow store for tests and examples.
#[derive(Debug, Default, Clone)]
pub struct InMemoryWorkflowStore {
    /// Workflow map protected by a mutex.
    workflows: Arc<Mutex<BTreeMap<WorkflowKey, ApprovalWorkflow>>>,
}

impl InMemoryWorkflowStore {
    /// Creates a new in-memory workflow store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            workflows: Arc::new(Mutex::new(BTreeMap::new())),
        }
    }
}

impl WorkflowStore for InMemoryWorkflowStore {
    fn load(
        &self,
        org_id: &OrgId,
        request_id: &RequestId,
    ) -> Result<Option<ApprovalWorkflow>, StoreError> {
        let guard = self
            .workflows
            .lock()
            .map_err(|_| StoreError::Store("workflow store mutex poisoned".to_string()))?;
        Ok(guard.get(&(org_id.clone(), request_id.clone())).cloned())
    }

    fn save(
        &self,
        workflow: &ApprovalWorkflow,
        expected_version: Option<u64>,
    ) -> Result<(), StoreError> {
        let mut guard = self
            .workflows
            .lock()
            .map_err(|_| StoreError::Store("workflow store mutex poisoned".to_string()))?;
        let key = (workflow.org_id.clone(), workflow.request_id.clone());
        let actual = guard.get(&key).map(|stored| stored.version);
        if actual != expected_version {
            return Err(StoreError::VersionConflict {
                expected: expected_version,
                actual,
            });
        }
        guard.insert(key, workflow.clone());
        Ok(())
    }

    fn list(&self, org_id: &OrgId) -> Result<Vec<ApprovalWorkflow>, StoreError> {
        let guard = self
            .workflows
            .lock()
            .map_err(|_| StoreError::Store("workflow store mutex poisoned".to_string()))?;
        Ok(guard
            .iter()
            .filter(|((org, _), _)| org == org_id)
            .map(|(_, workflow)| workflow.clone())
            .collect())
    }
}

// ============================================================================
// SECTION: Static Approver Directory
// ============================================================================

/// Approver directory backed by a fixed org/role table.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct StaticApproverDirectory {
    /// Approver ids keyed by organization, then role.
    entries: BTreeMap<OrgId, BTreeMap<ApproverRole, Vec<UserId>>>,
}

impl StaticApproverDirectory {
    /// Creates an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds approvers for a role in an organization.
    pub fn insert(
        &mut self,
        org_id: OrgId,
        role: ApproverRole,
        users: impl IntoIterator<Item = UserId>,
    ) {
        let ids = self.entries.entry(org_id).or_default().entry(role).or_default();
        for user in users {
            if !ids.contains(&user) {
                ids.push(user);
            }
        }
    }

    /// Adds approvers and returns the directory.
    #[must_use]
    pub fn with(
        mut self,
        org_id: OrgId,
        role: ApproverRole,
        users: impl IntoIterator<Item = UserId>,
    ) -> Self {
        self.insert(org_id, role, users);
        self
    }
}

impl ApproverDirectory for StaticApproverDirectory {
    fn approvers_for(
        &self,
        org_id: &OrgId,
        role: &ApproverRole,
    ) -> Result<Vec<UserId>, DirectoryError> {
        Ok(self
            .entries
            .get(org_id)
            .and_then(|roles| roles.get(role))
            .cloned()
            .unwrap_or_default())
    }
}
