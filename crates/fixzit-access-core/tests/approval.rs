// crates/fixzit-access-core/tests/approval.rs
// ============================================================================
// Module: Approval Engine Tests
// Description: Policy selection, stage rules, delegation, and timeouts.
// Purpose: Validate the approval workflow state machine end to end.
// ============================================================================

//! ## Overview
//! Approval engine tests over the builtin policy table and the shared static
//! approver directory.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only assertions and helpers are permitted."
)]

mod common;

use bigdecimal::BigDecimal;
use fixzit_access_core::ApprovalEngine;
use fixzit_access_core::ApprovalError;
use fixzit_access_core::ApprovalPolicy;
use fixzit_access_core::ApprovalPolicyTable;
use fixzit_access_core::ApproverRole;
use fixzit_access_core::DecisionInput;
use fixzit_access_core::DecisionKind;
use fixzit_access_core::NotificationKind;
use fixzit_access_core::PolicyName;
use fixzit_access_core::Role;
use fixzit_access_core::StageKind;
use fixzit_access_core::StageStatus;
use fixzit_access_core::StaticApproverDirectory;
use fixzit_access_core::SubRole;
use fixzit_access_core::Timestamp;
use fixzit_access_core::UserId;
use fixzit_access_core::WorkflowStatus;
use fixzit_access_core::WorkflowSummary;
use fixzit_access_core::pending_for_approver;

use crate::common::HOUR_MS;
use crate::common::directory;
use crate::common::hours;
use crate::common::org;
use crate::common::request;
use crate::common::users;

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Builds a minimal policy.
fn policy(name: &str, threshold: i64, categories: &[&str]) -> ApprovalPolicy {
    ApprovalPolicy {
        name: PolicyName::new(name),
        amount_threshold: BigDecimal::from(threshold),
        categories: categories.iter().map(|category| (*category).to_string()).collect(),
        required_roles: vec![ApproverRole::Role(Role::Admin)],
        parallel_roles: Vec::new(),
        timeout_hours: 24,
        escalate_to_roles: Vec::new(),
    }
}

// ============================================================================
// SECTION: Policy Selection
// ============================================================================

/// Verifies the table orders policies by descending threshold.
#[test]
fn policies_are_ordered_by_descending_threshold() {
    let table = ApprovalPolicyTable::new(vec![
        policy("low", 0, &[]),
        policy("mid", 10_000, &[]),
        policy("high", 100_000, &[]),
    ])
    .unwrap();
    let names: Vec<&str> = table.policies().iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["high", "mid", "low"]);

    let selected = table.select(&BigDecimal::from(50_000), Some("plumbing")).unwrap();
    assert_eq!(selected.name.as_str(), "mid");
    let boundary = table.select(&BigDecimal::from(100_000), None).unwrap();
    assert_eq!(boundary.name.as_str(), "high");
}

/// Verifies category-specific policies win ties when listed first.
#[test]
fn category_policies_match_case_insensitively() {
    let engine = ApprovalEngine::default();
    let dir = directory();
    let routed = engine.route(&request("r-1", 500, Some(" Emergency ")), &dir).unwrap();
    assert_eq!(routed.workflow.policy_name.as_str(), "emergency-repairs");
    assert_eq!(routed.workflow.category.as_deref(), Some("Emergency"));

    let routed = engine.route(&request("r-2", 500, Some("   ")), &dir).unwrap();
    assert_eq!(routed.workflow.policy_name.as_str(), "operational");
    assert_eq!(routed.workflow.category, None);
}

/// Verifies an uncovered amount reports the amount and category.
#[test]
fn uncovered_amount_is_policy_not_found() {
    let table = ApprovalPolicyTable::new(vec![policy("only-large", 1_000, &["capex"])]).unwrap();
    let err = table.select(&BigDecimal::from(10), None).unwrap_err();
    assert_eq!(
        err,
        ApprovalError::PolicyNotFound {
            amount: "10".to_string(),
            category: "any".to_string(),
        }
    );
    assert!(table.select(&BigDecimal::from(5_000), None).is_err());
}

/// Verifies malformed policy tables are rejected.
#[test]
fn malformed_policy_tables_are_rejected() {
    assert!(ApprovalPolicyTable::new(Vec::new()).is_err());
    assert!(ApprovalPolicyTable::new(vec![policy("a", 0, &[]), policy("a", 10, &[])]).is_err());

    let mut no_roles = policy("a", 0, &[]);
    no_roles.required_roles.clear();
    assert!(matches!(
        ApprovalPolicyTable::new(vec![no_roles]),
        Err(ApprovalError::InvalidPolicy(_))
    ));

    let mut no_timeout = policy("a", 0, &[]);
    no_timeout.timeout_hours = 0;
    assert!(ApprovalPolicyTable::new(vec![no_timeout]).is_err());

    assert!(ApprovalPolicyTable::new(vec![policy("a", -1, &[])]).is_err());
    assert!(ApprovalPolicyTable::new(vec![policy("a", 0, &[" "])]).is_err());
}

// ============================================================================
// SECTION: Routing
// ============================================================================

/// Verifies a management request builds a sequential then parallel stage.
#[test]
fn management_request_builds_two_stages() {
    let engine = ApprovalEngine::default();
    let routed = engine.route(&request("r-1", 50_000, Some("plumbing")), &directory()).unwrap();
    let workflow = &routed.workflow;
    assert_eq!(workflow.policy_name.as_str(), "management");
    assert_eq!(workflow.status, WorkflowStatus::Pending);
    assert_eq!(workflow.version, 1);
    assert_eq!(workflow.stages.len(), 2);
    assert_eq!(workflow.stages[0].kind, StageKind::Sequential);
    assert_eq!(workflow.stages[0].approver_ids, users(&["admin-1"]));
    assert_eq!(workflow.stages[1].kind, StageKind::Parallel);
    assert_eq!(workflow.stages[1].approver_ids, users(&["fin-1", "fin-2"]));
    assert_eq!(workflow.stages[0].timeout_ms, 48 * 3_600_000);

    assert_eq!(routed.notifications.len(), 1);
    assert_eq!(routed.notifications[0].kind, NotificationKind::StageAssigned);
    assert_eq!(routed.notifications[0].recipients, users(&["admin-1"]));
}

/// Verifies a stage that resolves to nobody fails routing.
#[test]
fn stage_without_approvers_fails_closed() {
    let dir = StaticApproverDirectory::new().with(
        org("org-1"),
        ApproverRole::Role(Role::Admin),
        users(&["admin-1"]),
    );
    let err = ApprovalEngine::default().route(&request("r-1", 50_000, None), &dir).unwrap_err();
    assert_eq!(
        err,
        ApprovalError::NoApprovers {
            stage_index: 1,
            roles: "FINANCE_OFFICER".to_string(),
        }
    );
}

/// Verifies malformed requests are refused before policy selection.
#[test]
fn malformed_requests_are_refused() {
    let engine = ApprovalEngine::default();
    let dir = directory();
    assert!(matches!(
        engine.route(&request("r-1", -5, None), &dir),
        Err(ApprovalError::InvalidRequest(_))
    ));
    assert!(matches!(
        engine.route(&request(" ", 5, None), &dir),
        Err(ApprovalError::InvalidRequest(_))
    ));
}

// ============================================================================
// SECTION: Decisions
// ============================================================================

/// Verifies a sequential stage needs every listed approver.
#[test]
fn sequential_stage_requires_all_approvers() {
    let engine = ApprovalEngine::default();
    let mut workflow = engine.route(&request("r-1", 500, None), &directory()).unwrap().workflow;

    let first =
        engine.process_decision(&mut workflow, DecisionInput::approve("pm-1"), hours(1)).unwrap();
    assert_eq!(first.status, WorkflowStatus::Pending);
    assert!(first.changed);
    assert!(first.notifications.is_empty());
    assert_eq!(workflow.stages[0].status, StageStatus::Pending);
    assert_eq!(workflow.version, 2);

    let second =
        engine.process_decision(&mut workflow, DecisionInput::approve("pm-2"), hours(2)).unwrap();
    assert_eq!(second.status, WorkflowStatus::Approved);
    assert_eq!(workflow.stages[0].status, StageStatus::Approved);
    assert_eq!(second.notifications[0].kind, NotificationKind::Completed);
    assert_eq!(second.notifications[0].recipients, users(&["requester-1"]));
    assert_eq!(workflow.updated_at, hours(2));
}

/// Verifies a parallel stage needs one approval after the sequential stage.
#[test]
fn parallel_stage_needs_one_approval() {
    let engine = ApprovalEngine::default();
    let mut workflow = engine.route(&request("r-1", 50_000, None), &directory()).unwrap().workflow;

    let advanced = engine
        .process_decision(&mut workflow, DecisionInput::approve("admin-1"), hours(1))
        .unwrap();
    assert_eq!(workflow.current_stage_index, 1);
    assert_eq!(advanced.notifications[0].recipients, users(&["fin-1", "fin-2"]));

    let done =
        engine.process_decision(&mut workflow, DecisionInput::approve("fin-2"), hours(2)).unwrap();
    assert_eq!(done.status, WorkflowStatus::Approved);
    assert_eq!(workflow.version, 3);
}

/// Verifies a rejection is terminal and later operations are refused.
#[test]
fn rejection_is_terminal() {
    let engine = ApprovalEngine::default();
    let dir = directory();
    let mut workflow = engine.route(&request("r-1", 50_000, None), &dir).unwrap().workflow;

    let reject = DecisionInput::reject("admin-1").with_note("over budget");
    let outcome = engine.process_decision(&mut workflow, reject, hours(1)).unwrap();
    assert_eq!(outcome.status, WorkflowStatus::Rejected);
    assert_eq!(workflow.stages[0].status, StageStatus::Rejected);
    assert_eq!(workflow.stages[0].decisions[0].note.as_deref(), Some("over budget"));

    let snapshot = workflow.clone();
    let err = engine
        .process_decision(&mut workflow, DecisionInput::approve("admin-1"), hours(2))
        .unwrap_err();
    assert!(matches!(err, ApprovalError::InvalidState(_)));
    let timeout = engine.check_timeouts(&mut workflow, hours(1_000), &dir).unwrap();
    assert!(!timeout.changed);
    assert_eq!(workflow, snapshot);
}

/// Verifies non-approvers and repeat voters are refused without mutation.
#[test]
fn outsiders_and_repeat_votes_are_refused() {
    let engine = ApprovalEngine::default();
    let mut workflow = engine.route(&request("r-1", 500, None), &directory()).unwrap().workflow;

    let err = engine
        .process_decision(&mut workflow, DecisionInput::approve("fin-1"), hours(1))
        .unwrap_err();
    assert_eq!(err, ApprovalError::NotAnApprover("fin-1".to_string()));

    engine.process_decision(&mut workflow, DecisionInput::approve("pm-1"), hours(1)).unwrap();
    let snapshot = workflow.clone();
    let err = engine
        .process_decision(&mut workflow, DecisionInput::reject("pm-1"), hours(2))
        .unwrap_err();
    assert_eq!(err, ApprovalError::DuplicateDecision("pm-1".to_string()));
    assert_eq!(workflow, snapshot);
}

/// Verifies delegation adds an approver and keeps the delegator eligible.
#[test]
fn delegation_adds_an_approver() {
    let engine = ApprovalEngine::default();
    let mut workflow = engine.route(&request("r-1", 500, None), &directory()).unwrap().workflow;

    let outcome = engine
        .process_decision(&mut workflow, DecisionInput::delegate("pm-1", "pm-3"), hours(1))
        .unwrap();
    assert_eq!(outcome.notifications[0].kind, NotificationKind::StageAssigned);
    assert_eq!(outcome.notifications[0].recipients, users(&["pm-3"]));
    assert_eq!(workflow.stages[0].approver_ids, users(&["pm-1", "pm-2", "pm-3"]));
    assert_eq!(workflow.stages[0].decisions[0].decision, DecisionKind::Delegate);

    engine.process_decision(&mut workflow, DecisionInput::approve("pm-3"), hours(2)).unwrap();
    engine.process_decision(&mut workflow, DecisionInput::approve("pm-2"), hours(2)).unwrap();
    assert_eq!(workflow.status, WorkflowStatus::Pending);
    let done =
        engine.process_decision(&mut workflow, DecisionInput::approve("pm-1"), hours(3)).unwrap();
    assert_eq!(done.status, WorkflowStatus::Approved);
}

/// Verifies malformed delegations are rejected.
#[test]
fn malformed_delegations_are_rejected() {
    let engine = ApprovalEngine::default();
    let mut workflow = engine.route(&request("r-1", 500, None), &directory()).unwrap().workflow;

    let to_self = DecisionInput::delegate("pm-1", "pm-1");
    assert!(matches!(
        engine.process_decision(&mut workflow, to_self, hours(1)),
        Err(ApprovalError::InvalidDecision(_))
    ));
    let missing = DecisionInput {
        delegate_to: None,
        ..DecisionInput::delegate("pm-1", "pm-3")
    };
    assert!(matches!(
        engine.process_decision(&mut workflow, missing, hours(1)),
        Err(ApprovalError::InvalidDecision(_))
    ));
    assert_eq!(workflow.version, 1);
}

/// Verifies an out-of-range stage index is reported as corruption.
#[test]
fn out_of_range_stage_is_corrupt() {
    let engine = ApprovalEngine::default();
    let mut workflow = engine.route(&request("r-1", 500, None), &directory()).unwrap().workflow;
    workflow.current_stage_index = 7;
    assert!(matches!(
        engine.process_decision(&mut workflow, DecisionInput::approve("pm-1"), hours(1)),
        Err(ApprovalError::Corrupt(_))
    ));
}

// ============================================================================
// SECTION: Timeouts
// ============================================================================

/// Verifies a stage is not timed out at exactly its timeout.
#[test]
fn timeout_boundary_is_exclusive() {
    let engine = ApprovalEngine::default();
    let dir = directory();
    let mut workflow = engine.route(&request("r-1", 500, None), &dir).unwrap().workflow;
    let outcome = engine.check_timeouts(&mut workflow, hours(24), &dir).unwrap();
    assert!(!outcome.changed);
    assert_eq!(workflow.version, 1);
}

/// Verifies a stalled stage escalates and an escalation approver can finish it.
#[test]
fn stalled_stage_escalates() {
    let engine = ApprovalEngine::default();
    let dir = directory();
    let mut workflow = engine.route(&request("r-1", 500, None), &dir).unwrap().workflow;

    let outcome = engine.check_timeouts(&mut workflow, hours(25), &dir).unwrap();
    assert!(outcome.changed);
    assert_eq!(outcome.status, WorkflowStatus::Escalated);
    assert_eq!(outcome.notifications[0].kind, NotificationKind::Escalated);
    assert_eq!(outcome.notifications[0].recipients, users(&["admin-1"]));
    let stage = &workflow.stages[0];
    assert_eq!(stage.status, StageStatus::Escalated);
    assert_eq!(stage.escalated_ids, users(&["admin-1"]));
    assert!(stage.approver_roles.contains(&ApproverRole::Role(Role::Admin)));

    let done = engine
        .process_decision(&mut workflow, DecisionInput::approve("admin-1"), hours(26))
        .unwrap();
    assert_eq!(done.status, WorkflowStatus::Approved);
}

/// Verifies a second timeout on an escalated stage rejects the workflow.
#[test]
fn escalated_stage_times_out() {
    let engine = ApprovalEngine::default();
    let dir = directory();
    let mut workflow = engine.route(&request("r-1", 500, None), &dir).unwrap().workflow;
    engine.check_timeouts(&mut workflow, hours(25), &dir).unwrap();

    let later = Timestamp::from_unix_millis(25 * HOUR_MS + 24 * HOUR_MS + 1);
    let outcome = engine.check_timeouts(&mut workflow, later, &dir).unwrap();
    assert_eq!(outcome.status, WorkflowStatus::Rejected);
    assert_eq!(workflow.stages[0].status, StageStatus::Timeout);
    assert_eq!(outcome.notifications[0].kind, NotificationKind::Completed);
}

/// Verifies a stage with no escalation approvers times out directly.
#[test]
fn timeout_without_escalation_rejects() {
    let engine = ApprovalEngine::default();
    let dir = StaticApproverDirectory::new().with(
        org("org-1"),
        ApproverRole::Role(Role::PropertyManager),
        users(&["pm-1"]),
    );
    let mut workflow = engine.route(&request("r-1", 500, None), &dir).unwrap().workflow;
    let outcome = engine.check_timeouts(&mut workflow, hours(30), &dir).unwrap();
    assert_eq!(outcome.status, WorkflowStatus::Rejected);
    assert_eq!(workflow.stages[0].status, StageStatus::Timeout);
}

// ============================================================================
// SECTION: Queries
// ============================================================================

/// Verifies pending queries list only workflows awaiting the user.
#[test]
fn pending_queries_track_active_stage() {
    let engine = ApprovalEngine::default();
    let dir = directory();
    let mut small = engine.route(&request("r-1", 500, None), &dir).unwrap().workflow;
    let large = engine.route(&request("r-2", 50_000, None), &dir).unwrap().workflow;
    engine.process_decision(&mut small, DecisionInput::approve("pm-1"), hours(1)).unwrap();

    let workflows = vec![small, large];
    let pm1 = pending_for_approver(&workflows, &UserId::new("pm-1"));
    assert!(pm1.is_empty());
    let pm2 = pending_for_approver(&workflows, &UserId::new("pm-2"));
    assert_eq!(pm2.len(), 1);
    let admin = pending_for_approver(&workflows, &UserId::new("admin-1"));
    assert_eq!(admin[0].request_id.as_str(), "r-2");
    assert!(pending_for_approver(&workflows, &UserId::new("fin-1")).is_empty());

    let summary = WorkflowSummary::from_workflows(&workflows);
    assert_eq!(summary.total, 2);
    assert_eq!(summary.pending, 2);
}

/// Verifies the builtin table routes executive requests to the owner.
#[test]
fn executive_requests_route_to_owner() {
    let routed =
        ApprovalEngine::default().route(&request("r-1", 250_000, None), &directory()).unwrap();
    assert_eq!(routed.workflow.policy_name.as_str(), "executive");
    assert_eq!(routed.workflow.stages[0].approver_ids, users(&["owner-1"]));
    assert_eq!(
        routed.workflow.stages[1].approver_roles,
        vec![ApproverRole::SubRole(SubRole::FinanceOfficer), ApproverRole::Role(Role::Admin)]
    );
    assert_eq!(routed.workflow.stages[1].approver_ids, users(&["fin-1", "fin-2", "admin-1"]));
}
