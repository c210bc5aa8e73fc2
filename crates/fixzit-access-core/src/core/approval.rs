// crates/fixzit-access-core/src/core/approval.rs
// ============================================================================
// Module: Fixzit Approval Types
// Description: Approval policies, requests, workflows, stages, and decisions.
// Purpose: Provide the serializable aggregate the approval engine mutates.
// Dependencies: crate::core::{identifiers, roles, time}, bigdecimal, serde
// ============================================================================

//! ## Overview
//! An [`ApprovalWorkflow`] is created per approval request and advanced by
//! decisions and timeout checks. It is persisted externally between calls;
//! `version` supports optimistic concurrency at the persistence boundary.
//!
//! Security posture: workflows loaded from storage are untrusted; the engine
//! re-checks stage bounds before mutating.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use bigdecimal::BigDecimal;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::core::identifiers::OrgId;
use crate::core::identifiers::PolicyName;
use crate::core::identifiers::QuotationId;
use crate::core::identifiers::RequestId;
use crate::core::identifiers::UserId;
use crate::core::identifiers::WorkOrderId;
use crate::core::roles::Role;
use crate::core::roles::SubRole;
use crate::core::roles::normalize_role;
use crate::core::roles::normalize_sub_role;
use crate::core::time::MILLIS_PER_HOUR;
use crate::core::time::Timestamp;

// ============================================================================
// SECTION: Approver Roles
// ============================================================================

/// Error raised when an approver role name does not resolve.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown approver role: {0}")]
pub struct UnknownApproverRole(pub String);

/// Role that can be asked to approve: a canonical role or a sub-role.
///
/// # Invariants
/// - Wire form is the canonical role or sub-role name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ApproverRole {
    /// Canonical role.
    Role(Role),
    /// Team member specialization.
    SubRole(SubRole),
}

impl ApproverRole {
    /// Parses an approver role name.
    ///
    /// Canonical sub-role names win, then canonical role names, then
    /// sub-role aliases, then role aliases.
    ///
    /// # Errors
    ///
    /// Returns [`UnknownApproverRole`] when nothing matches.
    pub fn parse(raw: &str) -> Result<Self, UnknownApproverRole> {
        let key = raw.trim().to_ascii_uppercase();
        if let Some(sub_role) = SubRole::ALL.into_iter().find(|s| s.as_str() == key) {
            return Ok(Self::SubRole(sub_role));
        }
        if let Some(role) = Role::ALL.into_iter().find(|r| r.as_str() == key) {
            return Ok(Self::Role(role));
        }
        normalize_sub_role(Some(&key))
            .map(Self::SubRole)
            .or_else(|| normalize_role(Some(&key)).map(Self::Role))
            .ok_or_else(|| UnknownApproverRole(raw.to_string()))
    }

    /// Returns the canonical wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Role(role) => role.as_str(),
            Self::SubRole(sub_role) => sub_role.as_str(),
        }
    }
}

impl fmt::Display for ApproverRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for ApproverRole {
    type Error = UnknownApproverRole;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ApproverRole> for String {
    fn from(value: ApproverRole) -> Self {
        value.as_str().to_string()
    }
}

impl From<Role> for ApproverRole {
    fn from(value: Role) -> Self {
        Self::Role(value)
    }
}

impl From<SubRole> for ApproverRole {
    fn from(value: SubRole) -> Self {
        Self::SubRole(value)
    }
}

// ============================================================================
// SECTION: Policies
// ============================================================================

/// Static approval routing rule.
///
/// # Invariants
/// - `amount_threshold` is non-negative.
/// - `required_roles` is non-empty and `timeout_hours > 0` once validated by
///   the policy table.
/// - Empty `categories` matches any category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovalPolicy {
    /// Unique policy name.
    pub name: PolicyName,
    /// Minimum amount (inclusive) the policy applies to.
    pub amount_threshold: BigDecimal,
    /// Categories the policy is limited to; empty means any.
    #[serde(default)]
    pub categories: Vec<String>,
    /// Roles approving sequentially in the first stage.
    pub required_roles: Vec<ApproverRole>,
    /// Roles approving in parallel in the optional second stage.
    #[serde(default)]
    pub parallel_roles: Vec<ApproverRole>,
    /// Stage timeout in hours.
    pub timeout_hours: u32,
    /// Roles added to a stalled stage on timeout.
    #[serde(default)]
    pub escalate_to_roles: Vec<ApproverRole>,
}

impl ApprovalPolicy {
    /// Returns true when the policy covers `amount` and `category`.
    ///
    /// Category matching is case-insensitive. A policy with categories never
    /// matches a request without one.
    #[must_use]
    pub fn matches(&self, amount: &BigDecimal, category: Option<&str>) -> bool {
        if &self.amount_threshold > amount {
            return false;
        }
        if self.categories.is_empty() {
            return true;
        }
        category.is_some_and(|category| {
            self.categories.iter().any(|candidate| candidate.trim().eq_ignore_ascii_case(category))
        })
    }

    /// Returns the stage timeout in milliseconds.
    #[must_use]
    pub fn timeout_ms(&self) -> u64 {
        u64::from(self.timeout_hours).saturating_mul(MILLIS_PER_HOUR)
    }
}

// ============================================================================
// SECTION: Requests
// ============================================================================

/// Monetary approval request submitted for routing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovalRequest {
    /// Request identifier.
    pub request_id: RequestId,
    /// Owning organization.
    pub org_id: OrgId,
    /// Related vendor quotation.
    #[serde(default)]
    pub quotation_id: Option<QuotationId>,
    /// Related work order.
    #[serde(default)]
    pub work_order_id: Option<WorkOrderId>,
    /// Requested amount.
    pub amount: BigDecimal,
    /// Spend category (for example `"emergency"`).
    #[serde(default)]
    pub category: Option<String>,
    /// Submitting user.
    pub requested_by: UserId,
    /// Submission time.
    pub submitted_at: Timestamp,
}

// ============================================================================
// SECTION: Stages
// ============================================================================

/// Stage satisfaction rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StageKind {
    /// Every listed approver must approve.
    Sequential,
    /// Any single approver suffices.
    Parallel,
}

/// Stage lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StageStatus {
    /// Awaiting decisions.
    Pending,
    /// Satisfied.
    Approved,
    /// Rejected by an approver.
    Rejected,
    /// Timed out once; escalation approvers were added.
    Escalated,
    /// Timed out with no escalation path left.
    Timeout,
}

impl StageStatus {
    /// Returns true while the stage still accepts decisions.
    #[must_use]
    pub const fn is_open(self) -> bool {
        matches!(self, Self::Pending | Self::Escalated)
    }
}

/// Decision verb.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecisionKind {
    /// Approve the stage.
    Approve,
    /// Reject the whole workflow.
    Reject,
    /// Add another approver to the stage.
    Delegate,
}

/// Immutable decision record appended to a stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovalDecision {
    /// Deciding approver.
    pub approver_id: UserId,
    /// Decision verb.
    pub decision: DecisionKind,
    /// Delegate target for [`DecisionKind::Delegate`].
    #[serde(default)]
    pub delegate_to: Option<UserId>,
    /// Free-form note.
    #[serde(default)]
    pub note: Option<String>,
    /// Decision time.
    pub timestamp: Timestamp,
}

/// One step of an approval workflow.
///
/// # Invariants
/// - `approver_ids` holds the ids the stage's kind rule is evaluated over,
///   including delegates.
/// - `escalated_ids` holds approvers added on timeout; one approval from any
///   of them satisfies the stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovalStage {
    /// Roles asked to approve this stage.
    pub approver_roles: Vec<ApproverRole>,
    /// Resolved approver ids.
    pub approver_ids: Vec<UserId>,
    /// Approvers added by escalation.
    #[serde(default)]
    pub escalated_ids: Vec<UserId>,
    /// Satisfaction rule.
    #[serde(rename = "type")]
    pub kind: StageKind,
    /// Stage timeout in milliseconds.
    pub timeout_ms: u64,
    /// Stage status.
    pub status: StageStatus,
    /// Decisions in arrival order.
    #[serde(default)]
    pub decisions: Vec<ApprovalDecision>,
}

impl ApprovalStage {
    /// Returns true when `user` may decide on this stage.
    #[must_use]
    pub fn is_eligible(&self, user: &UserId) -> bool {
        self.approver_ids.contains(user) || self.escalated_ids.contains(user)
    }

    /// Returns true when `user` already approved or rejected this stage.
    #[must_use]
    pub fn has_voted(&self, user: &UserId) -> bool {
        self.decisions.iter().any(|decision| {
            &decision.approver_id == user && decision.decision != DecisionKind::Delegate
        })
    }

    /// Returns true when `user` has a recorded approval.
    fn has_approved(&self, user: &UserId) -> bool {
        self.decisions.iter().any(|decision| {
            &decision.approver_id == user && decision.decision == DecisionKind::Approve
        })
    }

    /// Returns true when the stage's satisfaction rule holds.
    #[must_use]
    pub fn is_satisfied(&self) -> bool {
        if self.escalated_ids.iter().any(|id| self.has_approved(id)) {
            return true;
        }
        match self.kind {
            StageKind::Sequential => {
                !self.approver_ids.is_empty()
                    && self.approver_ids.iter().all(|id| self.has_approved(id))
            }
            StageKind::Parallel => self.approver_ids.iter().any(|id| self.has_approved(id)),
        }
    }

    /// Returns every id eligible to decide, approvers first.
    #[must_use]
    pub fn eligible_ids(&self) -> Vec<UserId> {
        let mut ids = self.approver_ids.clone();
        for id in &self.escalated_ids {
            if !ids.contains(id) {
                ids.push(id.clone());
            }
        }
        ids
    }
}

// ============================================================================
// SECTION: Workflows
// ============================================================================

/// Workflow lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkflowStatus {
    /// Awaiting decisions.
    Pending,
    /// Every stage approved.
    Approved,
    /// Rejected or timed out.
    Rejected,
    /// Current stage escalated.
    Escalated,
}

impl WorkflowStatus {
    /// Returns true for APPROVED and REJECTED.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Approved | Self::Rejected)
    }

    /// Returns the wire label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Escalated => "escalated",
        }
    }
}

impl fmt::Display for WorkflowStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Approval workflow aggregate.
///
/// # Invariants
/// - `current_stage_index` only moves forward and stays below `stages.len()`.
/// - Terminal statuses are never left.
/// - `version` increments on every mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovalWorkflow {
    /// Request identifier.
    pub request_id: RequestId,
    /// Owning organization.
    pub org_id: OrgId,
    /// Related vendor quotation.
    pub quotation_id: Option<QuotationId>,
    /// Related work order.
    pub work_order_id: Option<WorkOrderId>,
    /// Policy the workflow was routed by.
    pub policy_name: PolicyName,
    /// Requested amount.
    pub amount: BigDecimal,
    /// Spend category.
    pub category: Option<String>,
    /// Submitting user.
    pub requested_by: UserId,
    /// Ordered stages.
    pub stages: Vec<ApprovalStage>,
    /// Index of the active stage.
    pub current_stage_index: usize,
    /// Workflow status.
    pub status: WorkflowStatus,
    /// Roles added to a stage on timeout.
    pub escalate_to_roles: Vec<ApproverRole>,
    /// Creation time.
    pub created_at: Timestamp,
    /// Last mutation time.
    pub updated_at: Timestamp,
    /// Optimistic concurrency version.
    pub version: u64,
}

impl ApprovalWorkflow {
    /// Returns the active stage, when the index is in bounds.
    #[must_use]
    pub fn current_stage(&self) -> Option<&ApprovalStage> {
        self.stages.get(self.current_stage_index)
    }

    /// Returns true when the workflow can no longer change.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Returns true when `user` is eligible on the active stage and has not voted.
    #[must_use]
    pub fn awaits(&self, user: &UserId) -> bool {
        !self.is_terminal()
            && self
                .current_stage()
                .is_some_and(|stage| stage.is_eligible(user) && !stage.has_voted(user))
    }
}

// ============================================================================
// SECTION: Notifications
// ============================================================================

/// Notification reason.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// Approvers have a stage to decide.
    StageAssigned,
    /// Escalation approvers were added to a stalled stage.
    Escalated,
    /// The workflow reached a terminal status.
    Completed,
}

/// Side-effect-free notification handoff for an external notifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationRequest {
    /// Request identifier.
    pub request_id: RequestId,
    /// Owning organization.
    pub org_id: OrgId,
    /// Stage the notification concerns.
    pub stage_index: usize,
    /// Notification reason.
    pub kind: NotificationKind,
    /// Users to notify.
    pub recipients: Vec<UserId>,
    /// Roles the recipients were resolved from.
    pub roles: Vec<ApproverRole>,
    /// Workflow status at the time of the notification.
    pub status: WorkflowStatus,
}

// ============================================================================
// SECTION: Summary
// ============================================================================

/// Workflow counts by status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowSummary {
    /// Total workflows.
    pub total: usize,
    /// Pending workflows.
    pub pending: usize,
    /// Escalated workflows.
    pub escalated: usize,
    /// Approved workflows.
    pub approved: usize,
    /// Rejected workflows.
    pub rejected: usize,
}

impl WorkflowSummary {
    /// Counts workflows by status.
    #[must_use]
    pub fn from_workflows(workflows: &[ApprovalWorkflow]) -> Self {
        workflows.iter().fold(Self::default(), |mut summary, workflow| {
            summary.total += 1;
            match workflow.status {
                WorkflowStatus::Pending => summary.pending += 1,
                WorkflowStatus::Escalated => summary.escalated += 1,
                WorkflowStatus::Approved => summary.approved += 1,
                WorkflowStatus::Rejected => summary.rejected += 1,
            }
            summary
        })
    }
}
