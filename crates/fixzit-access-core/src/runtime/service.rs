// crates/fixzit-access-core/src/runtime/service.rs
// ============================================================================
// Module: Fixzit Approval Service
// Description: Load-mutate-save orchestration around the approval engine.
// Purpose: Apply engine transitions under optimistic concurrency and audit them.
// Dependencies: crate::{audit, core, interfaces, runtime}, thiserror
// ============================================================================

//! ## Overview
//! [`ApprovalService`] composes the [`ApprovalEngine`], a [`WorkflowStore`],
//! an [`ApproverDirectory`], and an [`AuditSink`]. Each mutating call loads
//! the workflow, applies one engine transition, and saves it with the
//! version it was loaded at, so concurrent writers lose with
//! [`StoreError::VersionConflict`] instead of overwriting each other.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use thiserror::Error;

use crate::audit::ApprovalAuditEvent;
use crate::audit::ApprovalAuditEventParams;
use crate::audit::AuditSink;
use crate::core::ApprovalRequest;
use crate::core::ApprovalWorkflow;
use crate::core::OrgId;
use crate::core::RequestId;
use crate::core::Timestamp;
use crate::core::UserId;
use crate::core::WorkflowSummary;
use crate::interfaces::ApproverDirectory;
use crate::interfaces::StoreError;
use crate::interfaces::WorkflowStore;
use crate::runtime::approval::ApprovalEngine;
use crate::runtime::approval::ApprovalError;
use crate::runtime::approval::ApprovalOutcome;
use crate::runtime::approval::DecisionInput;
use crate::runtime::approval::RoutedApproval;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Approval service errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApprovalServiceError {
    /// Engine rejected the operation.
    #[error(transparent)]
    Approval(#[from] ApprovalError),
    /// Store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
    /// Workflow does not exist.
    #[error("approval workflow not found: {0}")]
    NotFound(String),
}

// ============================================================================
// SECTION: Service
// ============================================================================

/// Result of a mutating service call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceOutcome {
    /// Workflow after the call.
    pub workflow: ApprovalWorkflow,
    /// Engine outcome.
    pub outcome: ApprovalOutcome,
}

/// Approval orchestration over a store and directory.
pub struct ApprovalService<S, D> {
    /// Routing engine.
    engine: ApprovalEngine,
    /// Workflow persistence.
    store: S,
    /// Approver lookup.
    directory: D,
    /// Audit destination.
    audit: Arc<dyn AuditSink>,
}

impl<S, D> ApprovalService<S, D>
where
    S: WorkflowStore,
    D: ApproverDirectory,
{
    /// Creates a service.
    #[must_use]
    pub fn new(engine: ApprovalEngine, store: S, directory: D, audit: Arc<dyn AuditSink>) -> Self {
        Self {
            engine,
            store,
            directory,
            audit,
        }
    }

    /// Returns the store.
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Routes and persists a new workflow.
    ///
    /// # Errors
    ///
    /// Returns [`ApprovalServiceError`] when routing fails or a workflow with
    /// the same request id already exists.
    pub fn submit(
        &self,
        request: &ApprovalRequest,
    ) -> Result<RoutedApproval, ApprovalServiceError> {
        let routed = match self.engine.route(request, &self.directory) {
            Ok(routed) => routed,
            Err(err) => {
                self.record_failure(&request.org_id, &request.request_id, "routed", None, &err);
                return Err(err.into());
            }
        };
        self.store.save(&routed.workflow, None)?;
        self.record(&routed.workflow, "routed", None);
        Ok(routed)
    }

    /// Applies a decision and persists the result.
    ///
    /// # Errors
    ///
    /// Returns [`ApprovalServiceError::NotFound`] for unknown workflows,
    /// engine errors for rejected decisions, and store errors (including
    /// version conflicts) on save.
    pub fn decide(
        &self,
        org_id: &OrgId,
        request_id: &RequestId,
        input: DecisionInput,
        now: Timestamp,
    ) -> Result<ServiceOutcome, ApprovalServiceError> {
        let mut workflow = self.get(org_id, request_id)?;
        let expected = workflow.version;
        let approver = input.approver_id.clone();
        let outcome = match self.engine.process_decision(&mut workflow, input, now) {
            Ok(outcome) => outcome,
            Err(err) => {
                self.record_failure(org_id, request_id, "decision", Some(&approver), &err);
                return Err(err.into());
            }
        };
        self.store.save(&workflow, Some(expected))?;
        self.record(&workflow, "decision", Some(&approver));
        Ok(ServiceOutcome {
            workflow,
            outcome,
        })
    }

    /// Evaluates the timeout of one workflow and persists any change.
    ///
    /// # Errors
    ///
    /// Returns [`ApprovalServiceError`] when the workflow is missing, the
    /// engine fails, or the save conflicts.
    pub fn check_timeouts(
        &self,
        org_id: &OrgId,
        request_id: &RequestId,
        now: Timestamp,
    ) -> Result<ServiceOutcome, ApprovalServiceError> {
        let workflow = self.get(org_id, request_id)?;
        self.apply_timeout(workflow, now)
    }

    /// Evaluates timeouts for every open workflow of an organization.
    ///
    /// # Errors
    ///
    /// Returns the first [`ApprovalServiceError`] encountered.
    pub fn sweep_timeouts(
        &self,
        org_id: &OrgId,
        now: Timestamp,
    ) -> Result<Vec<ServiceOutcome>, ApprovalServiceError> {
        let mut changed = Vec::new();
        for workflow in self.store.list(org_id)? {
            if workflow.is_terminal() {
                continue;
            }
            let result = self.apply_timeout(workflow, now)?;
            if result.outcome.changed {
                changed.push(result);
            }
        }
        Ok(changed)
    }

    /// Loads a workflow.
    ///
    /// # Errors
    ///
    /// Returns [`ApprovalServiceError::NotFound`] when absent.
    pub fn get(
        &self,
        org_id: &OrgId,
        request_id: &RequestId,
    ) -> Result<ApprovalWorkflow, ApprovalServiceError> {
        self.store
            .load(org_id, request_id)?
            .ok_or_else(|| ApprovalServiceError::NotFound(request_id.to_string()))
    }

    /// Lists the organization's workflows awaiting `user`.
    ///
    /// # Errors
    ///
    /// Returns [`ApprovalServiceError::Store`] when listing fails.
    pub fn pending_for(
        &self,
        org_id: &OrgId,
        user: &UserId,
    ) -> Result<Vec<ApprovalWorkflow>, ApprovalServiceError> {
        Ok(self.store.list(org_id)?.into_iter().filter(|workflow| workflow.awaits(user)).collect())
    }

    /// Counts the organization's workflows by status.
    ///
    /// # Errors
    ///
    /// Returns [`ApprovalServiceError::Store`] when listing fails.
    pub fn summary(&self, org_id: &OrgId) -> Result<WorkflowSummary, ApprovalServiceError> {
        Ok(WorkflowSummary::from_workflows(&self.store.list(org_id)?))
    }

    /// Runs a timeout check on a loaded workflow and saves when changed.
    fn apply_timeout(
        &self,
        mut workflow: ApprovalWorkflow,
        now: Timestamp,
    ) -> Result<ServiceOutcome, ApprovalServiceError> {
        let expected = workflow.version;
        let outcome = self.engine.check_timeouts(&mut workflow, now, &self.directory)?;
        if outcome.changed {
            self.store.save(&workflow, Some(expected))?;
            self.record(&workflow, "timeout", None);
        }
        Ok(ServiceOutcome {
            workflow,
            outcome,
        })
    }

    /// Records a successful transition.
    fn record(&self, workflow: &ApprovalWorkflow, kind: &'static str, approver: Option<&UserId>) {
        self.audit.record_approval(&ApprovalAuditEvent::new(ApprovalAuditEventParams {
            org_id: workflow.org_id.to_string(),
            request_id: workflow.request_id.to_string(),
            kind,
            status: Some(workflow.status),
            stage_index: Some(workflow.current_stage_index),
            approver_id: approver.map(ToString::to_string),
            error: None,
        }));
    }

    /// Records a transition the engine refused.
    fn record_failure(
        &self,
        org_id: &OrgId,
        request_id: &RequestId,
        kind: &'static str,
        approver: Option<&UserId>,
        error: &ApprovalError,
    ) {
        self.audit.record_approval(&ApprovalAuditEvent::new(ApprovalAuditEventParams {
            org_id: org_id.to_string(),
            request_id: request_id.to_string(),
            kind,
            status: None,
            stage_index: None,
            approver_id: approver.map(ToString::to_string),
            error: Some(error.to_string()),
        }));
    }
}
