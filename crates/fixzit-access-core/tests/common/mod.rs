// crates/fixzit-access-core/tests/common/mod.rs
// ============================================================================
// Module: Shared Test Fixtures
// Description: Org ids, approver directories, and request builders.
// Purpose: Keep approval and resolver tests focused on behavior.
// ============================================================================

//! Shared fixtures for access core integration tests.

#![allow(dead_code, reason = "Each test crate uses a different subset of fixtures.")]
#![allow(clippy::unwrap_used, reason = "Fixture construction panics on invalid literals.")]

use bigdecimal::BigDecimal;
use fixzit_access_core::ApprovalRequest;
use fixzit_access_core::ApproverRole;
use fixzit_access_core::OrgId;
use fixzit_access_core::RequestId;
use fixzit_access_core::Role;
use fixzit_access_core::StaticApproverDirectory;
use fixzit_access_core::SubRole;
use fixzit_access_core::Timestamp;
use fixzit_access_core::UserId;

/// Millisecond offset for one hour.
pub const HOUR_MS: i64 = 3_600_000;

/// Parses an org id literal.
pub fn org(raw: &str) -> OrgId {
    OrgId::parse(raw).unwrap()
}

/// Builds user ids from literals.
pub fn users(ids: &[&str]) -> Vec<UserId> {
    ids.iter().map(|id| UserId::new(*id)).collect()
}

/// Directory covering every builtin policy role for `org-1`.
pub fn directory() -> StaticApproverDirectory {
    let org_id = org("org-1");
    StaticApproverDirectory::new()
        .with(org_id.clone(), ApproverRole::Role(Role::CorporateOwner), users(&["owner-1"]))
        .with(org_id.clone(), ApproverRole::Role(Role::Admin), users(&["admin-1"]))
        .with(org_id.clone(), ApproverRole::Role(Role::SuperAdmin), users(&["root-1"]))
        .with(org_id.clone(), ApproverRole::Role(Role::PropertyManager), users(&["pm-1", "pm-2"]))
        .with(org_id, ApproverRole::SubRole(SubRole::FinanceOfficer), users(&["fin-1", "fin-2"]))
}

/// Builds a request for `org-1` submitted at t=0.
pub fn request(id: &str, amount: i64, category: Option<&str>) -> ApprovalRequest {
    ApprovalRequest {
        request_id: RequestId::new(id),
        org_id: org("org-1"),
        quotation_id: None,
        work_order_id: None,
        amount: BigDecimal::from(amount),
        category: category.map(str::to_string),
        requested_by: UserId::new("requester-1"),
        submitted_at: Timestamp::from_unix_millis(0),
    }
}

/// Returns a timestamp `hours` after t=0.
pub const fn hours(hours: i64) -> Timestamp {
    Timestamp::from_unix_millis(hours * HOUR_MS)
}
