// crates/fixzit-access-core/src/runtime/mod.rs
// ============================================================================
// Module: Fixzit Access Runtime
// Description: Capability resolution, tenant scoping, and approval routing.
// Purpose: Execute authorization checks and approval transitions.
// Dependencies: crate::{core, interfaces, registry}
// ============================================================================

//! ## Overview
//! Runtime modules implement the capability resolver, the tenant scope guard
//! and org filter adapter, and the approval engine with its service wrapper.
//! Every outer surface calls into the same logic.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod approval;
pub mod failure;
pub mod org_filter;
pub mod resolver;
pub mod service;
pub mod store;
pub mod tenant_guard;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use approval::ApprovalEngine;
pub use approval::ApprovalError;
pub use approval::ApprovalOutcome;
pub use approval::ApprovalPolicyTable;
pub use approval::DecisionInput;
pub use approval::MAX_TIMEOUT_HOURS;
pub use approval::RoutedApproval;
pub use approval::pending_for_approver;
pub use failure::AccessFailure;
pub use org_filter::CollectionFamily;
pub use org_filter::IdRepresentation;
pub use org_filter::OrgFilter;
pub use org_filter::build_org_only_filter;
pub use org_filter::build_org_scoped_filter;
pub use org_filter::build_souq_org_filter;
pub use resolver::CapabilityDecision;
pub use resolver::CapabilityResolver;
pub use resolver::DecisionReason;
pub use service::ApprovalService;
pub use service::ApprovalServiceError;
pub use service::ServiceOutcome;
pub use store::InMemoryWorkflowStore;
pub use store::StaticApproverDirectory;
pub use tenant_guard::OrgScopeError;
pub use tenant_guard::TenantAccess;
pub use tenant_guard::TenantGuardError;
pub use tenant_guard::authorize_org_access;
pub use tenant_guard::resolve_session_org;
pub use tenant_guard::validate_org_id;
pub use tenant_guard::validate_org_id_from_session;
