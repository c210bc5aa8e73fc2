// crates/fixzit-access-core/src/audit.rs
// ============================================================================
// Module: Fixzit Access Audit Logging
// Description: Structured audit events for capability checks and approvals.
// Purpose: Emit JSON-line audit records without a logging framework dependency.
// Dependencies: crate::{core, runtime}, serde, serde_json
// ============================================================================

//! ## Overview
//! This module defines audit event payloads and sinks for access decisions,
//! tenant scope checks, and approval workflow transitions. Deployments route
//! events to their logging pipeline by choosing a sink. Sink failures are
//! swallowed; logging never changes an authorization outcome.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use std::sync::Mutex;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use serde::Serialize;

use crate::core::Action;
use crate::core::Plan;
use crate::core::ResourceContext;
use crate::core::Role;
use crate::core::SubRole;
use crate::core::SubmoduleKey;
use crate::core::WorkflowStatus;
use crate::runtime::resolver::CapabilityDecision;
use crate::runtime::resolver::CapabilityResolver;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Capability check audit event payload.
#[derive(Debug, Clone, Serialize)]
pub struct AccessAuditEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Acting user.
    pub user_id: String,
    /// Caller organization when known.
    pub org_id: Option<String>,
    /// Submodule checked.
    pub submodule: SubmoduleKey,
    /// Action checked.
    pub action: Action,
    /// Caller role.
    pub role: Role,
    /// Caller sub-role.
    pub sub_role: Option<SubRole>,
    /// Caller plan.
    pub plan: Plan,
    /// Whether access was allowed.
    pub allowed: bool,
    /// Decision reason label.
    pub reason: &'static str,
}

/// Tenant scope audit event payload.
#[derive(Debug, Clone, Serialize)]
pub struct TenantAuditEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Caller organization when valid.
    pub org_id: Option<String>,
    /// Target organization when supplied.
    pub target_org_id: Option<String>,
    /// Whether access was granted.
    pub granted: bool,
    /// Failure label when denied.
    pub reason: Option<String>,
}

/// Approval workflow audit event payload.
#[derive(Debug, Clone, Serialize)]
pub struct ApprovalAuditEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Organization owning the workflow.
    pub org_id: String,
    /// Request identifier.
    pub request_id: String,
    /// Transition kind (`routed`, `decision`, `timeout`, `rejected_input`).
    pub kind: &'static str,
    /// Workflow status after the transition.
    pub status: Option<WorkflowStatus>,
    /// Active stage index after the transition.
    pub stage_index: Option<usize>,
    /// Deciding approver when applicable.
    pub approver_id: Option<String>,
    /// Error message when the transition failed.
    pub error: Option<String>,
}

/// Inputs required to construct a tenant audit event.
pub struct TenantAuditEventParams {
    /// Caller organization when valid.
    pub org_id: Option<String>,
    /// Target organization when supplied.
    pub target_org_id: Option<String>,
    /// Whether access was granted.
    pub granted: bool,
    /// Failure label when denied.
    pub reason: Option<String>,
}

/// Inputs required to construct an approval audit event.
pub struct ApprovalAuditEventParams {
    /// Organization owning the workflow.
    pub org_id: String,
    /// Request identifier.
    pub request_id: String,
    /// Transition kind.
    pub kind: &'static str,
    /// Workflow status after the transition.
    pub status: Option<WorkflowStatus>,
    /// Active stage index after the transition.
    pub stage_index: Option<usize>,
    /// Deciding approver when applicable.
    pub approver_id: Option<String>,
    /// Error message when the transition failed.
    pub error: Option<String>,
}

/// Returns the current wall-clock time in milliseconds since epoch.
fn now_ms() -> u128 {
    SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis()
}

impl AccessAuditEvent {
    /// Creates a capability check event from a context and decision.
    #[must_use]
    pub fn new(
        submodule: SubmoduleKey,
        action: Action,
        ctx: &ResourceContext,
        decision: CapabilityDecision,
    ) -> Self {
        Self {
            event: "access_check",
            timestamp_ms: now_ms(),
            user_id: ctx.user_id.to_string(),
            org_id: ctx.org_id.as_ref().map(ToString::to_string),
            submodule,
            action,
            role: ctx.role,
            sub_role: ctx.effective_sub_role(),
            plan: ctx.plan,
            allowed: decision.allowed,
            reason: decision.reason.as_str(),
        }
    }
}

impl TenantAuditEvent {
    /// Creates a tenant scope event with a consistent timestamp.
    #[must_use]
    pub fn new(params: TenantAuditEventParams) -> Self {
        Self {
            event: "tenant_scope",
            timestamp_ms: now_ms(),
            org_id: params.org_id,
            target_org_id: params.target_org_id,
            granted: params.granted,
            reason: params.reason,
        }
    }
}

impl ApprovalAuditEvent {
    /// Creates an approval event with a consistent timestamp.
    #[must_use]
    pub fn new(params: ApprovalAuditEventParams) -> Self {
        Self {
            event: "approval_workflow",
            timestamp_ms: now_ms(),
            org_id: params.org_id,
            request_id: params.request_id,
            kind: params.kind,
            status: params.status,
            stage_index: params.stage_index,
            approver_id: params.approver_id,
            error: params.error,
        }
    }
}

// ============================================================================
// SECTION: Trait
// ============================================================================

/// Audit sink for access events.
pub trait AuditSink: Send + Sync {
    /// Record a capability check.
    fn record_access(&self, event: &AccessAuditEvent);

    /// Record a tenant scope check.
    fn record_tenant(&self, _event: &TenantAuditEvent) {}

    /// Record an approval workflow transition.
    fn record_approval(&self, _event: &ApprovalAuditEvent) {}
}

/// Writes one serialized event as a JSON line.
fn write_line<W: Write, T: Serialize>(writer: &mut W, event: &T) {
    if let Ok(payload) = serde_json::to_string(event) {
        let _ = writeln!(writer, "{payload}");
        let _ = writer.flush();
    }
}

/// Audit sink that logs JSON lines to stderr.
pub struct StderrAuditSink;

impl AuditSink for StderrAuditSink {
    fn record_access(&self, event: &AccessAuditEvent) {
        write_line(&mut io::stderr(), event);
    }

    fn record_tenant(&self, event: &TenantAuditEvent) {
        write_line(&mut io::stderr(), event);
    }

    fn record_approval(&self, event: &ApprovalAuditEvent) {
        write_line(&mut io::stderr(), event);
    }
}

/// Audit sink that logs JSON lines to a file.
pub struct FileAuditSink {
    /// File handle used for append-only logging.
    file: Mutex<std::fs::File>,
}

impl FileAuditSink {
    /// Opens the audit log file in append mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn new(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }
}

impl AuditSink for FileAuditSink {
    fn record_access(&self, event: &AccessAuditEvent) {
        if let Ok(mut file) = self.file.lock() {
            write_line(&mut *file, event);
        }
    }

    fn record_tenant(&self, event: &TenantAuditEvent) {
        if let Ok(mut file) = self.file.lock() {
            write_line(&mut *file, event);
        }
    }

    fn record_approval(&self, event: &ApprovalAuditEvent) {
        if let Ok(mut file) = self.file.lock() {
            write_line(&mut *file, event);
        }
    }
}

/// No-op audit sink.
pub struct NoopAuditSink;

impl AuditSink for NoopAuditSink {
    fn record_access(&self, _event: &AccessAuditEvent) {}

    fn record_tenant(&self, _event: &TenantAuditEvent) {}

    fn record_approval(&self, _event: &ApprovalAuditEvent) {}
}

// ============================================================================
// SECTION: Audited Resolver
// ============================================================================

/// Capability resolver that records one audit event per check.
#[derive(Clone)]
pub struct AuditedResolver {
    /// Wrapped resolver.
    resolver: CapabilityResolver,
    /// Destination for access events.
    sink: Arc<dyn AuditSink>,
}

impl AuditedResolver {
    /// Wraps a resolver with an audit sink.
    #[must_use]
    pub fn new(resolver: CapabilityResolver, sink: Arc<dyn AuditSink>) -> Self {
        Self {
            resolver,
            sink,
        }
    }

    /// Returns the wrapped resolver.
    #[must_use]
    pub const fn resolver(&self) -> &CapabilityResolver {
        &self.resolver
    }

    /// Evaluates and records a capability check.
    #[must_use]
    pub fn evaluate(
        &self,
        submodule: SubmoduleKey,
        action: Action,
        ctx: &ResourceContext,
    ) -> CapabilityDecision {
        let decision = self.resolver.evaluate(submodule, action, ctx);
        self.sink.record_access(&AccessAuditEvent::new(submodule, action, ctx, decision));
        decision
    }

    /// Returns whether the action is permitted, recording the check.
    #[must_use]
    pub fn can_perform(
        &self,
        submodule: SubmoduleKey,
        action: Action,
        ctx: &ResourceContext,
    ) -> bool {
        self.evaluate(submodule, action, ctx).allowed
    }
}
