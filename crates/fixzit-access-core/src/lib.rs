// crates/fixzit-access-core/src/lib.rs
// ============================================================================
// Module: Fixzit Access Core Library
// Description: Public API surface for the Fixzit access core.
// Purpose: Expose core types, the registry, interfaces, and runtime helpers.
// Dependencies: crate::{audit, core, interfaces, registry, runtime}
// ============================================================================

//! ## Overview
//! Fixzit access core resolves what a session may do in a multi-tenant
//! facilities platform: it normalizes roles, applies plan gates and
//! role/sub-role action tables, scopes every check to the caller's
//! organization, and routes monetary requests through a multi-stage
//! approval workflow. It performs no I/O of its own beyond audit sinks and
//! integrates through explicit interfaces.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod audit;
pub mod core;
pub mod interfaces;
pub mod registry;
pub mod runtime;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use crate::core::*;

pub use audit::AccessAuditEvent;
pub use audit::ApprovalAuditEvent;
pub use audit::ApprovalAuditEventParams;
pub use audit::AuditSink;
pub use audit::AuditedResolver;
pub use audit::FileAuditSink;
pub use audit::NoopAuditSink;
pub use audit::StderrAuditSink;
pub use audit::TenantAuditEvent;
pub use audit::TenantAuditEventParams;
pub use interfaces::ApproverDirectory;
pub use interfaces::DirectoryError;
pub use interfaces::SessionError;
pub use interfaces::SessionSource;
pub use interfaces::StoreError;
pub use interfaces::WorkflowStore;
pub use registry::AccessRegistry;
pub use registry::ActionTable;
pub use registry::DEFAULT_ROLE_MODULES;
pub use registry::PlanGateDefault;
pub use runtime::AccessFailure;
pub use runtime::ApprovalEngine;
pub use runtime::ApprovalError;
pub use runtime::ApprovalOutcome;
pub use runtime::ApprovalPolicyTable;
pub use runtime::ApprovalService;
pub use runtime::ApprovalServiceError;
pub use runtime::CapabilityDecision;
pub use runtime::CapabilityResolver;
pub use runtime::CollectionFamily;
pub use runtime::DecisionInput;
pub use runtime::DecisionReason;
pub use runtime::IdRepresentation;
pub use runtime::InMemoryWorkflowStore;
pub use runtime::MAX_TIMEOUT_HOURS;
pub use runtime::OrgFilter;
pub use runtime::OrgScopeError;
pub use runtime::RoutedApproval;
pub use runtime::ServiceOutcome;
pub use runtime::StaticApproverDirectory;
pub use runtime::TenantAccess;
pub use runtime::TenantGuardError;
pub use runtime::authorize_org_access;
pub use runtime::build_org_only_filter;
pub use runtime::build_org_scoped_filter;
pub use runtime::build_souq_org_filter;
pub use runtime::pending_for_approver;
pub use runtime::resolve_session_org;
pub use runtime::validate_org_id;
pub use runtime::validate_org_id_from_session;
