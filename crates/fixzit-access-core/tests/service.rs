// crates/fixzit-access-core/tests/service.rs
// ============================================================================
// Module: Approval Service Tests
// Description: Load-mutate-save orchestration, concurrency, and audit events.
// Purpose: Ensure persisted workflows advance once per accepted transition.
// ============================================================================

//! ## Overview
//! Approval service tests over the in-memory workflow store.

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

use std::sync::Arc;
use std::sync::Mutex;

use fixzit_access_core::AccessAuditEvent;
use fixzit_access_core::ApprovalAuditEvent;
use fixzit_access_core::ApprovalEngine;
use fixzit_access_core::ApprovalError;
use fixzit_access_core::ApprovalService;
use fixzit_access_core::ApprovalServiceError;
use fixzit_access_core::AuditSink;
use fixzit_access_core::DecisionInput;
use fixzit_access_core::InMemoryWorkflowStore;
use fixzit_access_core::RequestId;
use fixzit_access_core::StaticApproverDirectory;
use fixzit_access_core::StoreError;
use fixzit_access_core::UserId;
use fixzit_access_core::WorkflowStatus;
use fixzit_access_core::WorkflowStore;

use crate::common::directory;
use crate::common::hours;
use crate::common::org;
use crate::common::request;

// ============================================================================
// SECTION: Fixtures
// ============================================================================

/// Audit sink collecting approval events.
#[derive(Default)]
struct CollectingSink {
    events: Mutex<Vec<ApprovalAuditEvent>>,
}

impl AuditSink for CollectingSink {
    fn record_access(&self, _event: &AccessAuditEvent) {}

    fn record_approval(&self, event: &ApprovalAuditEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}

/// Service over in-memory collaborators.
type MemoryService = ApprovalService<InMemoryWorkflowStore, StaticApproverDirectory>;

/// Builds a service and returns the sink it audits to.
fn service() -> (MemoryService, Arc<CollectingSink>) {
    let sink = Arc::new(CollectingSink::default());
    let service = ApprovalService::new(
        ApprovalEngine::default(),
        InMemoryWorkflowStore::new(),
        directory(),
        sink.clone(),
    );
    (service, sink)
}

// ============================================================================
// SECTION: Tests
// ============================================================================

/// Verifies submitted workflows are persisted and decisions bump the version.
#[test]
fn submit_and_decide_persist_workflow() {
    let (service, sink) = service();
    let org_id = org("org-1");
    let request_id = RequestId::new("r-1");
    service.submit(&request("r-1", 500, None)).unwrap();
    assert_eq!(service.get(&org_id, &request_id).unwrap().version, 1);

    let result =
        service.decide(&org_id, &request_id, DecisionInput::approve("pm-1"), hours(1)).unwrap();
    assert_eq!(result.workflow.version, 2);
    assert_eq!(service.get(&org_id, &request_id).unwrap(), result.workflow);

    let events = sink.events.lock().unwrap();
    let kinds: Vec<&str> = events.iter().map(|event| event.kind).collect();
    assert_eq!(kinds, vec!["routed", "decision"]);
    assert_eq!(events[1].approver_id.as_deref(), Some("pm-1"));
    drop(events);
}

/// Verifies a duplicate submission conflicts instead of overwriting.
#[test]
fn duplicate_submission_conflicts() {
    let (service, _sink) = service();
    service.submit(&request("r-1", 500, None)).unwrap();
    let err = service.submit(&request("r-1", 500, None)).unwrap_err();
    assert_eq!(
        err,
        ApprovalServiceError::Store(StoreError::VersionConflict {
            expected: None,
            actual: Some(1),
        })
    );
}

/// Verifies a stale writer loses to a concurrent decision.
#[test]
fn stale_writes_are_rejected() {
    let (service, _sink) = service();
    let org_id = org("org-1");
    let request_id = RequestId::new("r-1");
    service.submit(&request("r-1", 500, None)).unwrap();
    let stale = service.get(&org_id, &request_id).unwrap();

    service.decide(&org_id, &request_id, DecisionInput::approve("pm-1"), hours(1)).unwrap();
    let err = service.store().save(&stale, Some(stale.version)).unwrap_err();
    assert_eq!(
        err,
        StoreError::VersionConflict {
            expected: Some(1),
            actual: Some(2),
        }
    );
}

/// Verifies refused decisions are audited and leave the store untouched.
#[test]
fn refused_decisions_are_audited() {
    let (service, sink) = service();
    let org_id = org("org-1");
    let request_id = RequestId::new("r-1");
    service.submit(&request("r-1", 500, None)).unwrap();

    let err = service
        .decide(&org_id, &request_id, DecisionInput::approve("stranger"), hours(1))
        .unwrap_err();
    assert_eq!(
        err,
        ApprovalServiceError::Approval(ApprovalError::NotAnApprover("stranger".to_string()))
    );
    assert_eq!(service.get(&org_id, &request_id).unwrap().version, 1);

    let events = sink.events.lock().unwrap();
    let last = events.last().unwrap();
    assert_eq!(last.kind, "decision");
    assert!(last.error.as_deref().unwrap().contains("stranger"));
    drop(events);
}

/// Verifies unknown workflows are reported as not found.
#[test]
fn unknown_workflows_are_not_found() {
    let (service, _sink) = service();
    let err = service
        .decide(&org("org-1"), &RequestId::new("missing"), DecisionInput::approve("pm-1"), hours(1))
        .unwrap_err();
    assert_eq!(err, ApprovalServiceError::NotFound("missing".to_string()));
}

/// Verifies the sweep only persists workflows whose stage timed out.
#[test]
fn sweep_updates_only_stalled_workflows() {
    let (service, _sink) = service();
    let org_id = org("org-1");
    service.submit(&request("r-1", 500, None)).unwrap();
    service.submit(&request("r-2", 50_000, None)).unwrap();

    let changed = service.sweep_timeouts(&org_id, hours(25)).unwrap();
    assert_eq!(changed.len(), 1);
    assert_eq!(changed[0].workflow.request_id.as_str(), "r-1");
    assert_eq!(changed[0].workflow.status, WorkflowStatus::Escalated);

    let stored = service.get(&org_id, &RequestId::new("r-2")).unwrap();
    assert_eq!(stored.version, 1);

    let summary = service.summary(&org_id).unwrap();
    assert_eq!(summary.escalated, 1);
    assert_eq!(summary.pending, 1);

    let pending = service.pending_for(&org_id, &UserId::new("admin-1")).unwrap();
    let ids: Vec<&str> = pending.iter().map(|workflow| workflow.request_id.as_str()).collect();
    assert_eq!(ids, vec!["r-1", "r-2"]);
}

/// Verifies workflows are isolated per organization.
#[test]
fn workflows_are_scoped_per_org() {
    let (service, _sink) = service();
    service.submit(&request("r-1", 500, None)).unwrap();
    assert!(service.store().list(&org("org-2")).unwrap().is_empty());
    assert!(matches!(
        service.get(&org("org-2"), &RequestId::new("r-1")),
        Err(ApprovalServiceError::NotFound(_))
    ));
}
