// crates/fixzit-access-core/src/core/mod.rs
// ============================================================================
// Module: Fixzit Access Core Types
// Description: Canonical identifiers, roles, plans, modules, and approval types.
// Purpose: Provide stable, serializable types shared by every access surface.
// Dependencies: bigdecimal, serde, thiserror
// ============================================================================

//! ## Overview
//! Core types are the closed vocabularies the registry and resolver reason
//! over, plus the approval workflow aggregate. They carry no behavior beyond
//! parsing, normalization, and simple predicates.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod approval;
pub mod context;
pub mod identifiers;
pub mod modules;
pub mod plans;
pub mod roles;
pub mod time;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use approval::ApprovalDecision;
pub use approval::ApprovalPolicy;
pub use approval::ApprovalRequest;
pub use approval::ApprovalStage;
pub use approval::ApprovalWorkflow;
pub use approval::ApproverRole;
pub use approval::DecisionKind;
pub use approval::NotificationKind;
pub use approval::NotificationRequest;
pub use approval::StageKind;
pub use approval::StageStatus;
pub use approval::UnknownApproverRole;
pub use approval::WorkflowStatus;
pub use approval::WorkflowSummary;
pub use context::AccessError;
pub use context::ResourceContext;
pub use context::ResourceTarget;
pub use context::Session;
pub use identifiers::MAX_ORG_ID_LENGTH;
pub use identifiers::OrgId;
pub use identifiers::OrgIdError;
pub use identifiers::PolicyName;
pub use identifiers::PropertyId;
pub use identifiers::QuotationId;
pub use identifiers::RequestId;
pub use identifiers::UserId;
pub use identifiers::WorkOrderId;
pub use modules::Action;
pub use modules::ModuleKey;
pub use modules::SubmoduleKey;
pub use plans::Plan;
pub use plans::SubscriptionFeature;
pub use plans::SubscriptionTier;
pub use plans::normalize_plan;
pub use plans::tier_allows;
pub use roles::ROLE_ALIASES;
pub use roles::Role;
pub use roles::RoleAlias;
pub use roles::SUB_ROLE_ALIASES;
pub use roles::SubRole;
pub use roles::infer_sub_role_from_role;
pub use roles::normalize_role;
pub use roles::normalize_sub_role;
pub use roles::resolve_role_pair;
pub use time::MILLIS_PER_HOUR;
pub use time::Timestamp;
