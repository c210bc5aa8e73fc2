// crates/fixzit-access-core/src/runtime/approval.rs
// ============================================================================
// Module: Fixzit Approval Routing Engine
// Description: Policy selection, stage construction, decisions, and timeouts.
// Purpose: Drive the approval workflow state machine deterministically.
// Dependencies: crate::{core, interfaces}, bigdecimal, thiserror
// ============================================================================

//! ## Overview
//! [`ApprovalEngine`] routes a request to the first matching policy in an
//! [`ApprovalPolicyTable`], builds a sequential stage (plus an optional
//! parallel stage), and advances the resulting [`ApprovalWorkflow`] through
//! decisions and lazily evaluated timeouts.
//!
//! The engine performs no I/O beyond the injected [`ApproverDirectory`]. It
//! returns [`NotificationRequest`] values for the caller to forward.
//!
//! Security posture: terminal workflows reject further decisions, only
//! listed approvers may decide, and each approver votes at most once per
//! stage.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;

use bigdecimal::BigDecimal;
use serde::Serialize;
use thiserror::Error;

use crate::core::ApprovalDecision;
use crate::core::ApprovalPolicy;
use crate::core::ApprovalRequest;
use crate::core::ApprovalStage;
use crate::core::ApprovalWorkflow;
use crate::core::ApproverRole;
use crate::core::DecisionKind;
use crate::core::NotificationKind;
use crate::core::NotificationRequest;
use crate::core::OrgId;
use crate::core::PolicyName;
use crate::core::Role;
use crate::core::StageKind;
use crate::core::StageStatus;
use crate::core::SubRole;
use crate::core::Timestamp;
use crate::core::UserId;
use crate::core::WorkflowStatus;
use crate::interfaces::ApproverDirectory;

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Maximum stage timeout accepted in a policy (one year).
pub const MAX_TIMEOUT_HOURS: u32 = 24 * 366;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Approval routing and decision errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApprovalError {
    /// The request is malformed.
    #[error("invalid approval request: {0}")]
    InvalidRequest(String),
    /// A policy failed validation.
    #[error("invalid approval policy: {0}")]
    InvalidPolicy(String),
    /// No policy matches the request.
    #[error("no approval policy matches amount {amount} (category: {category})")]
    PolicyNotFound {
        /// Requested amount.
        amount: String,
        /// Requested category, or `any`.
        category: String,
    },
    /// A stage resolved to no approver ids.
    #[error("no approvers for stage {stage_index} (roles: {roles})")]
    NoApprovers {
        /// Stage index.
        stage_index: usize,
        /// Roles that were resolved.
        roles: String,
    },
    /// The workflow cannot accept the operation in its current state.
    #[error("invalid workflow state: {0}")]
    InvalidState(String),
    /// The decider is not an approver of the active stage.
    #[error("user is not an approver of the current stage: {0}")]
    NotAnApprover(String),
    /// The approver already decided on the active stage.
    #[error("approver already decided on the current stage: {0}")]
    DuplicateDecision(String),
    /// The decision payload is invalid.
    #[error("invalid decision: {0}")]
    InvalidDecision(String),
    /// The approver directory failed.
    #[error("approver directory failed: {0}")]
    Directory(String),
    /// The workflow violates a structural invariant.
    #[error("corrupt workflow: {0}")]
    Corrupt(String),
}

// ============================================================================
// SECTION: Policy Table
// ============================================================================

/// Ordered approval policy table.
///
/// # Invariants
/// - Non-empty, names unique, policies sorted by descending threshold (stable).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApprovalPolicyTable {
    /// Policies in match order.
    policies: Vec<ApprovalPolicy>,
}

impl Default for ApprovalPolicyTable {
    fn default() -> Self {
        Self::builtin()
    }
}

impl ApprovalPolicyTable {
    /// Validates policies and orders them by descending threshold.
    ///
    /// Ties keep their input order, so a category-specific policy listed
    /// before a catch-all at the same threshold wins.
    ///
    /// # Errors
    ///
    /// Returns [`ApprovalError::InvalidPolicy`] when the table is empty or a
    /// policy is malformed.
    pub fn new(mut policies: Vec<ApprovalPolicy>) -> Result<Self, ApprovalError> {
        if policies.is_empty() {
            return Err(ApprovalError::InvalidPolicy("policy table is empty".to_string()));
        }
        let zero = BigDecimal::from(0_i64);
        let mut names = BTreeSet::new();
        for policy in &policies {
            let name = policy.name.as_str().trim();
            if name.is_empty() {
                return Err(ApprovalError::InvalidPolicy("policy name is empty".to_string()));
            }
            if !names.insert(name.to_string()) {
                return Err(ApprovalError::InvalidPolicy(format!("duplicate policy name: {name}")));
            }
            if policy.required_roles.is_empty() {
                return Err(ApprovalError::InvalidPolicy(format!(
                    "{name}: required_roles is empty"
                )));
            }
            if policy.timeout_hours == 0 || policy.timeout_hours > MAX_TIMEOUT_HOURS {
                return Err(ApprovalError::InvalidPolicy(format!(
                    "{name}: timeout_hours must be between 1 and {MAX_TIMEOUT_HOURS}"
                )));
            }
            if policy.amount_threshold < zero {
                return Err(ApprovalError::InvalidPolicy(format!(
                    "{name}: amount_threshold is negative"
                )));
            }
            if policy.categories.iter().any(|category| category.trim().is_empty()) {
                return Err(ApprovalError::InvalidPolicy(format!("{name}: blank category")));
            }
        }
        policies.sort_by(|left, right| right.amount_threshold.cmp(&left.amount_threshold));
        Ok(Self {
            policies,
        })
    }

    /// Returns the builtin policy table.
    #[must_use]
    pub fn builtin() -> Self {
        let policy = |name: &str,
                      threshold: i64,
                      categories: &[&str],
                      required: &[ApproverRole],
                      parallel: &[ApproverRole],
                      timeout_hours: u32,
                      escalate: &[ApproverRole]| ApprovalPolicy {
            name: PolicyName::new(name),
            amount_threshold: BigDecimal::from(threshold),
            categories: categories.iter().map(|category| (*category).to_string()).collect(),
            required_roles: required.to_vec(),
            parallel_roles: parallel.to_vec(),
            timeout_hours,
            escalate_to_roles: escalate.to_vec(),
        };
        let owner = ApproverRole::Role(Role::CorporateOwner);
        let admin = ApproverRole::Role(Role::Admin);
        let super_admin = ApproverRole::Role(Role::SuperAdmin);
        let manager = ApproverRole::Role(Role::PropertyManager);
        let finance = ApproverRole::SubRole(SubRole::FinanceOfficer);
        Self {
            policies: vec![
                policy("executive", 100_000, &[], &[owner], &[finance, admin], 72, &[super_admin]),
                policy("management", 10_000, &[], &[admin], &[finance], 48, &[owner]),
                policy("emergency-repairs", 0, &["emergency"], &[manager], &[], 4, &[admin]),
                policy("operational", 0, &[], &[manager], &[], 24, &[admin]),
            ],
        }
    }

    /// Returns the policies in match order.
    #[must_use]
    pub fn policies(&self) -> &[ApprovalPolicy] {
        &self.policies
    }

    /// Selects the first policy matching the amount and category.
    ///
    /// # Errors
    ///
    /// Returns [`ApprovalError::PolicyNotFound`] when nothing matches.
    pub fn select(
        &self,
        amount: &BigDecimal,
        category: Option<&str>,
    ) -> Result<&ApprovalPolicy, ApprovalError> {
        self.policies.iter().find(|policy| policy.matches(amount, category)).ok_or_else(|| {
            ApprovalError::PolicyNotFound {
                amount: amount.to_string(),
                category: category.unwrap_or("any").to_string(),
            }
        })
    }
}

// ============================================================================
// SECTION: Inputs and Outcomes
// ============================================================================

/// Decision submitted against the active stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecisionInput {
    /// Deciding approver.
    pub approver_id: UserId,
    /// Decision verb.
    pub decision: DecisionKind,
    /// Delegate target for [`DecisionKind::Delegate`].
    pub delegate_to: Option<UserId>,
    /// Free-form note.
    pub note: Option<String>,
}

impl DecisionInput {
    /// Builds an approval.
    #[must_use]
    pub fn approve(approver_id: impl Into<UserId>) -> Self {
        Self {
            approver_id: approver_id.into(),
            decision: DecisionKind::Approve,
            delegate_to: None,
            note: None,
        }
    }

    /// Builds a rejection.
    #[must_use]
    pub fn reject(approver_id: impl Into<UserId>) -> Self {
        Self {
            decision: DecisionKind::Reject,
            ..Self::approve(approver_id)
        }
    }

    /// Builds a delegation.
    #[must_use]
    pub fn delegate(approver_id: impl Into<UserId>, delegate_to: impl Into<UserId>) -> Self {
        Self {
            decision: DecisionKind::Delegate,
            delegate_to: Some(delegate_to.into()),
            ..Self::approve(approver_id)
        }
    }

    /// Attaches a note.
    #[must_use]
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}

/// Result of routing a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoutedApproval {
    /// Newly created workflow.
    pub workflow: ApprovalWorkflow,
    /// Notifications for the first stage.
    pub notifications: Vec<NotificationRequest>,
}

/// Result of a decision or timeout check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApprovalOutcome {
    /// Workflow status after the operation.
    pub status: WorkflowStatus,
    /// Whether the workflow was mutated.
    pub changed: bool,
    /// Notifications to forward.
    pub notifications: Vec<NotificationRequest>,
}

impl ApprovalOutcome {
    /// Builds an outcome for an untouched workflow.
    const fn unchanged(status: WorkflowStatus) -> Self {
        Self {
            status,
            changed: false,
            notifications: Vec::new(),
        }
    }
}

/// Stage-level effect of a decision, applied after the stage borrow ends.
enum Transition {
    /// A delegate joined the stage.
    Delegated(UserId),
    /// The stage was rejected.
    Rejected,
    /// The stage was satisfied.
    StageApproved,
    /// The vote was recorded; the stage remains open.
    Recorded,
}

// ============================================================================
// SECTION: Engine
// ============================================================================

/// Approval routing engine.
#[derive(Debug, Clone, Default)]
pub struct ApprovalEngine {
    /// Policy table consulted by routing.
    policies: ApprovalPolicyTable,
}

impl ApprovalEngine {
    /// Creates an engine over a policy table.
    #[must_use]
    pub const fn new(policies: ApprovalPolicyTable) -> Self {
        Self {
            policies,
        }
    }

    /// Returns the policy table.
    #[must_use]
    pub const fn policies(&self) -> &ApprovalPolicyTable {
        &self.policies
    }

    /// Routes a request into a new workflow.
    ///
    /// # Errors
    ///
    /// Returns [`ApprovalError::InvalidRequest`] for malformed requests,
    /// [`ApprovalError::PolicyNotFound`] when no policy matches, and
    /// [`ApprovalError::NoApprovers`] when a stage resolves to nobody.
    pub fn route<D>(
        &self,
        request: &ApprovalRequest,
        directory: &D,
    ) -> Result<RoutedApproval, ApprovalError>
    where
        D: ApproverDirectory + ?Sized,
    {
        if request.amount < BigDecimal::from(0_i64) {
            return Err(ApprovalError::InvalidRequest("amount must be non-negative".to_string()));
        }
        if request.request_id.as_str().trim().is_empty() {
            return Err(ApprovalError::InvalidRequest("request id is empty".to_string()));
        }
        if request.requested_by.as_str().trim().is_empty() {
            return Err(ApprovalError::InvalidRequest("requested_by is empty".to_string()));
        }
        let category =
            request.category.as_deref().map(str::trim).filter(|category| !category.is_empty());
        let policy = self.policies.select(&request.amount, category)?;

        let mut stages = vec![build_stage(
            directory,
            &request.org_id,
            &policy.required_roles,
            StageKind::Sequential,
            policy.timeout_ms(),
            0,
        )?];
        if !policy.parallel_roles.is_empty() {
            stages.push(build_stage(
                directory,
                &request.org_id,
                &policy.parallel_roles,
                StageKind::Parallel,
                policy.timeout_ms(),
                1,
            )?);
        }

        let workflow = ApprovalWorkflow {
            request_id: request.request_id.clone(),
            org_id: request.org_id.clone(),
            quotation_id: request.quotation_id.clone(),
            work_order_id: request.work_order_id.clone(),
            policy_name: policy.name.clone(),
            amount: request.amount.clone(),
            category: category.map(str::to_string),
            requested_by: request.requested_by.clone(),
            stages,
            current_stage_index: 0,
            status: WorkflowStatus::Pending,
            escalate_to_roles: policy.escalate_to_roles.clone(),
            created_at: request.submitted_at,
            updated_at: request.submitted_at,
            version: 1,
        };
        let notifications = stage_assigned(&workflow).into_iter().collect();
        Ok(RoutedApproval {
            workflow,
            notifications,
        })
    }

    /// Applies a decision to the active stage.
    ///
    /// # Errors
    ///
    /// Returns [`ApprovalError::InvalidState`] for terminal workflows,
    /// [`ApprovalError::NotAnApprover`], [`ApprovalError::DuplicateDecision`],
    /// or [`ApprovalError::InvalidDecision`] for rejected inputs.
    pub fn process_decision(
        &self,
        workflow: &mut ApprovalWorkflow,
        input: DecisionInput,
        now: Timestamp,
    ) -> Result<ApprovalOutcome, ApprovalError> {
        ensure_open(workflow)?;
        let next_version = next_version(workflow)?;
        let index = workflow.current_stage_index;
        let stage = workflow
            .stages
            .get_mut(index)
            .ok_or_else(|| ApprovalError::Corrupt(format!("stage index {index} out of bounds")))?;
        if !stage.status.is_open() {
            return Err(ApprovalError::Corrupt(format!("stage {index} is closed")));
        }
        if !stage.is_eligible(&input.approver_id) {
            return Err(ApprovalError::NotAnApprover(input.approver_id.to_string()));
        }
        if stage.has_voted(&input.approver_id) {
            return Err(ApprovalError::DuplicateDecision(input.approver_id.to_string()));
        }

        let transition = match input.decision {
            DecisionKind::Delegate => {
                let delegate = input.delegate_to.clone().ok_or_else(|| {
                    ApprovalError::InvalidDecision("delegate requires delegate_to".to_string())
                })?;
                if delegate.as_str().trim().is_empty() {
                    return Err(ApprovalError::InvalidDecision("delegate_to is empty".to_string()));
                }
                if delegate == input.approver_id {
                    return Err(ApprovalError::InvalidDecision(
                        "cannot delegate to self".to_string(),
                    ));
                }
                if !stage.approver_ids.contains(&delegate) {
                    stage.approver_ids.push(delegate.clone());
                }
                Transition::Delegated(delegate)
            }
            DecisionKind::Reject => {
                stage.status = StageStatus::Rejected;
                Transition::Rejected
            }
            DecisionKind::Approve => Transition::Recorded,
        };
        stage.decisions.push(ApprovalDecision {
            approver_id: input.approver_id,
            decision: input.decision,
            delegate_to: input.delegate_to,
            note: input.note,
            timestamp: now,
        });
        let transition = match transition {
            Transition::Recorded if stage.is_satisfied() => {
                stage.status = StageStatus::Approved;
                Transition::StageApproved
            }
            other => other,
        };

        let mut notifications = Vec::new();
        match transition {
            Transition::Delegated(delegate) => {
                let roles = workflow.stages.get(index).map(|s| s.approver_roles.clone());
                notifications.push(notification(
                    workflow,
                    NotificationKind::StageAssigned,
                    vec![delegate],
                    roles.unwrap_or_default(),
                ));
            }
            Transition::Rejected => {
                workflow.status = WorkflowStatus::Rejected;
                notifications.push(completed(workflow));
            }
            Transition::StageApproved => {
                if index + 1 < workflow.stages.len() {
                    workflow.current_stage_index = index + 1;
                    workflow.status = WorkflowStatus::Pending;
                    notifications.extend(stage_assigned(workflow));
                } else {
                    workflow.status = WorkflowStatus::Approved;
                    notifications.push(completed(workflow));
                }
            }
            Transition::Recorded => {}
        }
        workflow.version = next_version;
        workflow.updated_at = now;
        Ok(ApprovalOutcome {
            status: workflow.status,
            changed: true,
            notifications,
        })
    }

    /// Evaluates the active stage's timeout.
    ///
    /// A pending stage past its timeout escalates when escalation roles
    /// resolve to at least one approver; otherwise it times out and the
    /// workflow is rejected. An escalated stage past its timeout times out.
    /// Terminal workflows are returned unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`ApprovalError::Directory`] when escalation lookup fails and
    /// [`ApprovalError::Corrupt`] for structurally invalid workflows.
    pub fn check_timeouts<D>(
        &self,
        workflow: &mut ApprovalWorkflow,
        now: Timestamp,
        directory: &D,
    ) -> Result<ApprovalOutcome, ApprovalError>
    where
        D: ApproverDirectory + ?Sized,
    {
        if workflow.is_terminal() {
            return Ok(ApprovalOutcome::unchanged(workflow.status));
        }
        let next_version = next_version(workflow)?;
        let index = workflow.current_stage_index;
        let stage = workflow
            .stages
            .get(index)
            .ok_or_else(|| ApprovalError::Corrupt(format!("stage index {index} out of bounds")))?;
        if now.millis_since(workflow.updated_at) <= stage.timeout_ms {
            return Ok(ApprovalOutcome::unchanged(workflow.status));
        }

        let escalation_ids = match stage.status {
            StageStatus::Pending if !workflow.escalate_to_roles.is_empty() => {
                collect_approvers(directory, &workflow.org_id, &workflow.escalate_to_roles)?
            }
            StageStatus::Pending | StageStatus::Escalated => Vec::new(),
            StageStatus::Approved | StageStatus::Rejected | StageStatus::Timeout => {
                return Err(ApprovalError::Corrupt(format!("stage {index} is closed")));
            }
        };

        let roles = workflow.escalate_to_roles.clone();
        let notification = if escalation_ids.is_empty() {
            if let Some(stage) = workflow.stages.get_mut(index) {
                stage.status = StageStatus::Timeout;
            }
            workflow.status = WorkflowStatus::Rejected;
            completed(workflow)
        } else {
            if let Some(stage) = workflow.stages.get_mut(index) {
                for role in &roles {
                    if !stage.approver_roles.contains(role) {
                        stage.approver_roles.push(*role);
                    }
                }
                for id in &escalation_ids {
                    if !stage.escalated_ids.contains(id) {
                        stage.escalated_ids.push(id.clone());
                    }
                }
                stage.status = StageStatus::Escalated;
            }
            workflow.status = WorkflowStatus::Escalated;
            notification(workflow, NotificationKind::Escalated, escalation_ids, roles)
        };
        workflow.version = next_version;
        workflow.updated_at = now;
        Ok(ApprovalOutcome {
            status: workflow.status,
            changed: true,
            notifications: vec![notification],
        })
    }
}

// ============================================================================
// SECTION: Queries
// ============================================================================

/// Returns the workflows whose active stage awaits a decision from `user`.
#[must_use]
pub fn pending_for_approver<'a>(
    workflows: &'a [ApprovalWorkflow],
    user: &UserId,
) -> Vec<&'a ApprovalWorkflow> {
    workflows.iter().filter(|workflow| workflow.awaits(user)).collect()
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Rejects operations on terminal workflows.
fn ensure_open(workflow: &ApprovalWorkflow) -> Result<(), ApprovalError> {
    if workflow.is_terminal() {
        return Err(ApprovalError::InvalidState(format!(
            "workflow {} is {}",
            workflow.request_id, workflow.status
        )));
    }
    Ok(())
}

/// Returns the version the next mutation will carry.
fn next_version(workflow: &ApprovalWorkflow) -> Result<u64, ApprovalError> {
    workflow
        .version
        .checked_add(1)
        .ok_or_else(|| ApprovalError::Corrupt("workflow version overflow".to_string()))
}

/// Resolves roles to distinct approver ids in role order.
fn collect_approvers<D>(
    directory: &D,
    org_id: &OrgId,
    roles: &[ApproverRole],
) -> Result<Vec<UserId>, ApprovalError>
where
    D: ApproverDirectory + ?Sized,
{
    let mut ids: Vec<UserId> = Vec::new();
    for role in roles {
        let resolved = directory
            .approvers_for(org_id, role)
            .map_err(|err| ApprovalError::Directory(err.to_string()))?;
        for id in resolved {
            if !id.as_str().trim().is_empty() && !ids.contains(&id) {
                ids.push(id);
            }
        }
    }
    Ok(ids)
}

/// Builds a stage, failing closed when nobody can approve it.
fn build_stage<D>(
    directory: &D,
    org_id: &OrgId,
    roles: &[ApproverRole],
    kind: StageKind,
    timeout_ms: u64,
    stage_index: usize,
) -> Result<ApprovalStage, ApprovalError>
where
    D: ApproverDirectory + ?Sized,
{
    let approver_ids = collect_approvers(directory, org_id, roles)?;
    if approver_ids.is_empty() {
        return Err(ApprovalError::NoApprovers {
            stage_index,
            roles: roles.iter().map(|role| role.as_str()).collect::<Vec<_>>().join(","),
        });
    }
    Ok(ApprovalStage {
        approver_roles: roles.to_vec(),
        approver_ids,
        escalated_ids: Vec::new(),
        kind,
        timeout_ms,
        status: StageStatus::Pending,
        decisions: Vec::new(),
    })
}

/// Builds a notification for the active stage.
fn notification(
    workflow: &ApprovalWorkflow,
    kind: NotificationKind,
    recipients: Vec<UserId>,
    roles: Vec<ApproverRole>,
) -> NotificationRequest {
    NotificationRequest {
        request_id: workflow.request_id.clone(),
        org_id: workflow.org_id.clone(),
        stage_index: workflow.current_stage_index,
        kind,
        recipients,
        roles,
        status: workflow.status,
    }
}

/// Notifies the active stage's approvers.
fn stage_assigned(workflow: &ApprovalWorkflow) -> Option<NotificationRequest> {
    workflow.current_stage().map(|stage| {
        notification(
            workflow,
            NotificationKind::StageAssigned,
            stage.approver_ids.clone(),
            stage.approver_roles.clone(),
        )
    })
}

/// Notifies the requester of a terminal outcome.
fn completed(workflow: &ApprovalWorkflow) -> NotificationRequest {
    notification(
        workflow,
        NotificationKind::Completed,
        vec![workflow.requested_by.clone()],
        Vec::new(),
    )
}
