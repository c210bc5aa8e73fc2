// crates/fixzit-access-core/tests/tenant_guard.rs
// ============================================================================
// Module: Tenant Scope Guard Tests
// Description: Org id validation, session resolution, and tenant matching.
// Purpose: Ensure malformed or foreign org ids never reach a query.
// ============================================================================

//! ## Overview
//! Tenant guard tests covering validation edge cases, session source
//! failures, and boundary failure classification.

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

use fixzit_access_core::AccessError;
use fixzit_access_core::AccessFailure;
use fixzit_access_core::ApprovalError;
use fixzit_access_core::ApprovalServiceError;
use fixzit_access_core::MAX_ORG_ID_LENGTH;
use fixzit_access_core::OrgScopeError;
use fixzit_access_core::Session;
use fixzit_access_core::SessionError;
use fixzit_access_core::SessionSource;
use fixzit_access_core::StoreError;
use fixzit_access_core::TenantAccess;
use fixzit_access_core::TenantGuardError;
use fixzit_access_core::authorize_org_access;
use fixzit_access_core::resolve_session_org;
use fixzit_access_core::validate_org_id;
use fixzit_access_core::validate_org_id_from_session;

// ============================================================================
// SECTION: Fixtures
// ============================================================================

/// Session source returning a fixed result.
struct FixedSessionSource(Result<Option<Session>, SessionError>);

impl SessionSource for FixedSessionSource {
    fn current_session(&self) -> Result<Option<Session>, SessionError> {
        self.0.clone()
    }
}

/// Builds a session for `user` in `org`.
fn session(user: &str, org: Option<&str>) -> Session {
    Session {
        user_id: user.to_string(),
        role: "ADMIN".to_string(),
        sub_role: None,
        org_id: org.map(str::to_string),
        plan: None,
    }
}

// ============================================================================
// SECTION: Validation
// ============================================================================

/// Verifies missing, empty, and whitespace-only org ids are rejected.
#[test]
fn blank_org_ids_are_rejected() {
    assert_eq!(validate_org_id(None), Err(OrgScopeError::Missing));
    assert_eq!(validate_org_id(Some("")), Err(OrgScopeError::Empty));
    assert_eq!(validate_org_id(Some("   ")), Err(OrgScopeError::Empty));
}

/// Verifies org ids are trimmed to their canonical form.
#[test]
fn org_ids_are_trimmed() {
    let org_id = validate_org_id(Some(" abc ")).unwrap();
    assert_eq!(org_id.as_str(), "abc");
}

/// Verifies oversized and control-character org ids are malformed.
#[test]
fn structurally_invalid_org_ids_are_malformed() {
    let long = "a".repeat(MAX_ORG_ID_LENGTH + 1);
    assert!(matches!(validate_org_id(Some(&long)), Err(OrgScopeError::Malformed(_))));
    assert!(matches!(validate_org_id(Some("org\u{0}1")), Err(OrgScopeError::Malformed(_))));
    assert!(validate_org_id(Some(&"a".repeat(MAX_ORG_ID_LENGTH))).is_ok());
}

// ============================================================================
// SECTION: Sessions
// ============================================================================

/// Verifies absent sessions and blank users are unauthenticated.
#[test]
fn missing_sessions_are_unauthenticated() {
    assert_eq!(validate_org_id_from_session(None), Err(TenantGuardError::NoSession));
    let blank = session("  ", Some("org-1"));
    assert_eq!(validate_org_id_from_session(Some(&blank)), Err(TenantGuardError::NoSession));
}

/// Verifies a session without an org id is an invalid org, not a missing session.
#[test]
fn session_without_org_is_invalid_org() {
    let orgless = session("user-1", None);
    assert_eq!(
        validate_org_id_from_session(Some(&orgless)),
        Err(TenantGuardError::InvalidOrg(OrgScopeError::Missing))
    );
}

/// Verifies session source failures surface as unavailable.
#[test]
fn session_source_failures_are_unavailable() {
    let source = FixedSessionSource(Err(SessionError::Unavailable("timeout".to_string())));
    let err = resolve_session_org(&source).unwrap_err();
    assert_eq!(err, TenantGuardError::Unavailable("timeout".to_string()));
    assert_eq!(AccessFailure::from(err).http_status(), 503);

    let empty = FixedSessionSource(Ok(None));
    let err = resolve_session_org(&empty).unwrap_err();
    assert_eq!(AccessFailure::from(err).http_status(), 401);
}

/// Verifies a valid session resolves to its canonical org id.
#[test]
fn valid_session_resolves_org() {
    let source = FixedSessionSource(Ok(Some(session("user-1", Some(" org-1 ")))));
    let (resolved, org_id) = resolve_session_org(&source).unwrap();
    assert_eq!(resolved.user_id, "user-1");
    assert_eq!(org_id.as_str(), "org-1");
}

// ============================================================================
// SECTION: Tenant Matching
// ============================================================================

/// Verifies matching orgs are granted and a missing target means the caller's org.
#[test]
fn matching_orgs_are_granted() {
    let granted = authorize_org_access(Some("org-1"), Some(" org-1"));
    assert!(granted.is_granted());
    let own = authorize_org_access(Some("org-1"), None);
    assert!(matches!(own, TenantAccess::Granted { org_id } if org_id.as_str() == "org-1"));
}

/// Verifies foreign targets and invalid callers are denied.
#[test]
fn mismatched_or_invalid_orgs_are_denied() {
    let mismatch = authorize_org_access(Some("org-1"), Some("org-2"));
    let TenantAccess::Denied {
        reason,
    } = mismatch
    else {
        panic!("expected denial");
    };
    assert_eq!(
        reason,
        OrgScopeError::Mismatch {
            caller: "org-1".to_string(),
            target: "org-2".to_string(),
        }
    );
    assert_eq!(AccessFailure::from(reason).http_status(), 403);

    assert!(!authorize_org_access(None, Some("org-1")).is_granted());
    assert!(!authorize_org_access(Some("org-1"), Some("  ")).is_granted());
}

// ============================================================================
// SECTION: Failure Classification
// ============================================================================

/// Verifies each error family maps to its boundary status.
#[test]
fn failures_map_to_boundary_statuses() {
    assert_eq!(AccessFailure::from(OrgScopeError::Empty).http_status(), 422);
    assert_eq!(AccessFailure::from(AccessError::InvalidUser).http_status(), 401);
    assert_eq!(AccessFailure::from(AccessError::UnknownRole("x".to_string())).http_status(), 403);
    assert_eq!(AccessFailure::from(StoreError::Io("disk".to_string())).http_status(), 503);
    let conflict = StoreError::VersionConflict {
        expected: Some(1),
        actual: Some(2),
    };
    assert_eq!(AccessFailure::from(conflict).http_status(), 422);
    let not_approver = ApprovalError::NotAnApprover("u".to_string());
    assert_eq!(AccessFailure::from(not_approver).http_status(), 403);
    let directory_down = ApprovalError::Directory("down".to_string());
    assert_eq!(AccessFailure::from(directory_down).http_status(), 503);
    assert_eq!(
        AccessFailure::from(ApprovalError::DuplicateDecision("u".to_string())).http_status(),
        422
    );
    let not_found = ApprovalServiceError::NotFound("r".to_string());
    assert_eq!(AccessFailure::from(not_found).http_status(), 422);
    assert_eq!(
        AccessFailure::from(ApprovalServiceError::Store(StoreError::Corrupt("x".to_string())))
            .http_status(),
        503
    );
}
