// crates/fixzit-access-cli/src/main.rs
// ============================================================================
// Module: Fixzit Access CLI Entry Point
// Description: Command dispatcher for capability checks and approval workflows.
// Purpose: Provide an offline operator surface over the access core.
// Dependencies: clap, fixzit-access-core, fixzit-access-config, serde, thiserror.
// ============================================================================

//! ## Overview
//! The Fixzit access CLI evaluates capability checks for a described session,
//! validates tenant scope, renders org filter predicates, and drives approval
//! workflows persisted in the `SQLite` store. Output is canonical JSON on
//! stdout; errors go to stderr with their boundary status.
//!
//! Security posture: arguments and request files are untrusted; inputs are
//! size-limited and every org id passes through the tenant guard.

// ============================================================================
// SECTION: Modules
// ============================================================================


// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::File;
use std::io::Read;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use clap::ArgAction;
use clap::Args;
use clap::CommandFactory;
use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use fixzit_access_config::ConfigError;
use fixzit_access_config::FixzitAccessConfig;
use fixzit_access_config::config_toml_example;
use fixzit_access_core::AccessFailure;
use fixzit_access_core::Action;
use fixzit_access_core::ApprovalOutcome;
use fixzit_access_core::ApprovalRequest;
use fixzit_access_core::ApprovalService;
use fixzit_access_core::ApprovalWorkflow;
use fixzit_access_core::AuditedResolver;
use fixzit_access_core::CollectionFamily;
use fixzit_access_core::DecisionInput;
use fixzit_access_core::DecisionReason;
use fixzit_access_core::ModuleKey;
use fixzit_access_core::OrgFilter;
use fixzit_access_core::OrgId;
use fixzit_access_core::PropertyId;
use fixzit_access_core::RequestId;
use fixzit_access_core::ResourceContext;
use fixzit_access_core::ResourceTarget;
use fixzit_access_core::ServiceOutcome;
use fixzit_access_core::Session;
use fixzit_access_core::StaticApproverDirectory;
use fixzit_access_core::StoreError;
use fixzit_access_core::SubmoduleKey;
use fixzit_access_core::TenantAccess;
use fixzit_access_core::TenantAuditEvent;
use fixzit_access_core::TenantAuditEventParams;
use fixzit_access_core::Timestamp;
use fixzit_access_core::UserId;
use fixzit_access_core::authorize_org_access;
use fixzit_access_core::validate_org_id;
use fixzit_access_core::validate_org_id_from_session;
use fixzit_access_store_sqlite::SqliteWorkflowStore;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Maximum size of an approval request file.
const MAX_REQUEST_BYTES: usize = 64 * 1024;
/// Exit code for a denied check; distinct from command failure.
const DENIED_EXIT_CODE: u8 = 2;

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "fixzit-access", disable_help_subcommand = true, disable_version_flag = true)]
struct Cli {
    /// Print version information and exit.
    #[arg(long = "version", action = ArgAction::SetTrue, global = true)]
    show_version: bool,
    /// Optional config file path (defaults to fixzit-access.toml or env override).
    #[arg(long, value_name = "PATH", global = true)]
    config: Option<PathBuf>,
    /// Selected subcommand to execute.
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Supported CLI subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Evaluate one capability check for a session.
    Check(CheckCommand),
    /// List the modules and submodules a session can reach.
    Modules(ModulesCommand),
    /// Tenant scope utilities.
    Org {
        /// Selected org subcommand.
        #[command(subcommand)]
        command: OrgCommand,
    },
    /// Approval workflow utilities.
    Approval {
        /// Selected approval subcommand.
        #[command(subcommand)]
        command: ApprovalCommand,
    },
    /// Configuration utilities.
    Config {
        /// Selected config subcommand.
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

/// Tenant scope subcommands.
#[derive(Subcommand, Debug)]
enum OrgCommand {
    /// Match a caller org against a target org.
    Validate(OrgValidateCommand),
    /// Render the org-scoped query predicate for a collection family.
    Filter(OrgFilterCommand),
}

/// Approval workflow subcommands.
#[derive(Subcommand, Debug)]
enum ApprovalCommand {
    /// Route and persist a new approval request.
    Route(ApprovalRouteCommand),
    /// Record an approver decision.
    Decide(ApprovalDecideCommand),
    /// Escalate or expire timed-out stages.
    Timeouts(ApprovalTimeoutsCommand),
    /// Show one workflow.
    Show(ApprovalShowCommand),
    /// List open workflows awaiting an approver.
    Pending(ApprovalPendingCommand),
    /// Count workflows by status.
    Summary(ApprovalSummaryCommand),
}

/// Configuration subcommands.
#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Validate the configuration file.
    Validate,
    /// Print a canonical example configuration.
    Example,
}

/// Raw session fields, as the auth provider would supply them.
#[derive(Args, Debug, Clone)]
struct SessionArgs {
    /// Authenticated user id.
    #[arg(long = "user", value_name = "USER_ID")]
    user_id: String,
    /// Role name (canonical or legacy alias).
    #[arg(long, value_name = "ROLE")]
    role: String,
    /// Optional sub-role for team members.
    #[arg(long = "sub-role", value_name = "SUB_ROLE")]
    sub_role: Option<String>,
    /// Caller organization id.
    #[arg(long = "org", value_name = "ORG_ID")]
    org_id: Option<String>,
    /// Plan or subscription tier name.
    #[arg(long, value_name = "PLAN")]
    plan: Option<String>,
    /// Organization owning the resource (defaults to the caller's).
    #[arg(long = "target-org", value_name = "ORG_ID")]
    target_org: Option<String>,
    /// Targeted property id.
    #[arg(long = "property", value_name = "PROPERTY_ID")]
    property_id: Option<String>,
}

/// Arguments for `check`.
#[derive(Args, Debug)]
struct CheckCommand {
    /// Session description.
    #[command(flatten)]
    session: SessionArgs,
    /// Submodule key (e.g. `WO_CREATE`).
    #[arg(long, value_name = "SUBMODULE")]
    submodule: String,
    /// Action verb (e.g. `approve`).
    #[arg(long, value_name = "ACTION")]
    action: String,
}

/// Output formats for listings.
#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
enum OutputFormat {
    /// Canonical JSON output.
    Json,
    /// One key per line.
    Text,
}

/// Arguments for `modules`.
#[derive(Args, Debug)]
struct ModulesCommand {
    /// Session description.
    #[command(flatten)]
    session: SessionArgs,
    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,
}

/// Arguments for `org validate`.
#[derive(Args, Debug)]
struct OrgValidateCommand {
    /// Caller organization id.
    #[arg(long = "org-id", value_name = "ORG_ID")]
    org_id: Option<String>,
    /// Target organization id.
    #[arg(long = "target-org", value_name = "ORG_ID")]
    target_org: Option<String>,
}

/// Collection families accepted on the command line.
#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
enum FamilyArg {
    /// Facilities-management collections.
    Facilities,
    /// Marketplace collections.
    Marketplace,
}

impl From<FamilyArg> for CollectionFamily {
    fn from(value: FamilyArg) -> Self {
        match value {
            FamilyArg::Facilities => Self::Facilities,
            FamilyArg::Marketplace => Self::Marketplace,
        }
    }
}

/// Arguments for `org filter`.
#[derive(Args, Debug)]
struct OrgFilterCommand {
    /// Organization id.
    #[arg(long = "org-id", value_name = "ORG_ID")]
    org_id: String,
    /// Optional record id.
    #[arg(long = "record-id", value_name = "ID")]
    record_id: Option<String>,
    /// Collection family.
    #[arg(long, value_enum, default_value_t = FamilyArg::Facilities)]
    family: FamilyArg,
}

/// Arguments for `approval route`.
#[derive(Args, Debug)]
struct ApprovalRouteCommand {
    /// JSON approval request file.
    #[arg(long, value_name = "PATH")]
    request: PathBuf,
}

/// Decision kinds accepted on the command line.
#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
enum DecisionArg {
    /// Approve the current stage.
    Approve,
    /// Reject the workflow.
    Reject,
    /// Delegate to another user.
    Delegate,
}

/// Workflow address shared by approval subcommands.
#[derive(Args, Debug, Clone)]
struct WorkflowArgs {
    /// Organization id.
    #[arg(long = "org-id", value_name = "ORG_ID")]
    org_id: String,
    /// Request id.
    #[arg(long = "request-id", value_name = "REQUEST_ID")]
    request_id: String,
}

/// Arguments for `approval decide`.
#[derive(Args, Debug)]
struct ApprovalDecideCommand {
    /// Target workflow.
    #[command(flatten)]
    workflow: WorkflowArgs,
    /// Deciding approver.
    #[arg(long, value_name = "USER_ID")]
    approver: String,
    /// Decision kind.
    #[arg(long, value_enum)]
    decision: DecisionArg,
    /// Delegate user for `delegate` decisions.
    #[arg(long = "delegate-to", value_name = "USER_ID")]
    delegate_to: Option<String>,
    /// Optional free-form note.
    #[arg(long, value_name = "TEXT")]
    note: Option<String>,
    /// Decision time in unix milliseconds (defaults to now).
    #[arg(long = "now-ms", value_name = "MILLIS")]
    now_ms: Option<i64>,
}

/// Arguments for `approval timeouts`.
#[derive(Args, Debug)]
struct ApprovalTimeoutsCommand {
    /// Organization id.
    #[arg(long = "org-id", value_name = "ORG_ID")]
    org_id: String,
    /// Restrict the check to one request.
    #[arg(long = "request-id", value_name = "REQUEST_ID")]
    request_id: Option<String>,
    /// Evaluation time in unix milliseconds (defaults to now).
    #[arg(long = "now-ms", value_name = "MILLIS")]
    now_ms: Option<i64>,
}

/// Arguments for `approval show`.
#[derive(Args, Debug)]
struct ApprovalShowCommand {
    /// Target workflow.
    #[command(flatten)]
    workflow: WorkflowArgs,
}

/// Arguments for `approval pending`.
#[derive(Args, Debug)]
struct ApprovalPendingCommand {
    /// Organization id.
    #[arg(long = "org-id", value_name = "ORG_ID")]
    org_id: String,
    /// Approver user id.
    #[arg(long, value_name = "USER_ID")]
    user: String,
}

/// Arguments for `approval summary`.
#[derive(Args, Debug)]
struct ApprovalSummaryCommand {
    /// Organization id.
    #[arg(long = "org-id", value_name = "ORG_ID")]
    org_id: String,
}

// ============================================================================
// SECTION: Output Types
// ============================================================================

/// Output of `check`.
#[derive(Serialize)]
struct CheckReport<'a> {
    /// Whether the action is permitted.
    allowed: bool,
    /// Decision reason label.
    reason: DecisionReason,
    /// Context the check was evaluated against.
    context: &'a ResourceContext,
}

/// Output of `modules`.
#[derive(Serialize)]
struct ModulesReport {
    /// Modules visible in navigation.
    modules: Vec<ModuleKey>,
    /// Submodules the plan gate and visibility allow.
    submodules: Vec<SubmoduleKey>,
}

/// Output of a mutating approval command.
#[derive(Serialize)]
struct OutcomeReport<'a> {
    /// Workflow after the call.
    workflow: &'a ApprovalWorkflow,
    /// Engine outcome.
    outcome: &'a ApprovalOutcome,
}

impl<'a> From<&'a ServiceOutcome> for OutcomeReport<'a> {
    fn from(value: &'a ServiceOutcome) -> Self {
        Self {
            workflow: &value.workflow,
            outcome: &value.outcome,
        }
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI error wrapper.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// Rendered error message.
    message: String,
}

impl CliError {
    /// Creates a new CLI error.
    const fn new(message: String) -> Self {
        Self {
            message,
        }
    }
}

/// Result alias for CLI operations.
type CliResult<T> = Result<T, CliError>;

/// Errors raised by bounded file reads.
#[derive(Debug)]
enum ReadLimitError {
    /// File I/O failure.
    Io(std::io::Error),
    /// File size exceeds the configured limit.
    TooLarge {
        /// Actual size in bytes.
        size: u64,
        /// Allowed limit in bytes.
        limit: usize,
    },
}

/// Renders an access failure with its boundary status.
fn failure_error(error: impl Into<AccessFailure>) -> CliError {
    let failure = error.into();
    CliError::new(format!("{failure} (status {})", failure.http_status()))
}

/// Renders a configuration error.
fn config_error(error: &ConfigError) -> CliError {
    CliError::new(format!("config load failed: {error}"))
}

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// CLI entry point.
fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => emit_error(&err.to_string()),
    }
}

/// Executes the CLI command dispatcher.
fn run() -> CliResult<ExitCode> {
    let cli = Cli::parse();

    if cli.show_version {
        let version = env!("CARGO_PKG_VERSION");
        write_stdout_line(&format!("fixzit-access {version}"))
            .map_err(|err| CliError::new(output_error("stdout", &err)))?;
        return Ok(ExitCode::SUCCESS);
    }

    let Some(command) = cli.command else {
        show_help()?;
        return Ok(ExitCode::SUCCESS);
    };

    let config_path = cli.config.as_deref();
    match command {
        Commands::Check(command) => command_check(config_path, &command),
        Commands::Modules(command) => command_modules(config_path, &command),
        Commands::Org {
            command,
        } => command_org(config_path, &command),
        Commands::Approval {
            command,
        } => command_approval(config_path, &command),
        Commands::Config {
            command,
        } => command_config(config_path, &command),
    }
}

/// Prints CLI help to stdout.
fn show_help() -> CliResult<()> {
    let mut command = Cli::command();
    command.print_help().map_err(|err| CliError::new(output_error("stdout", &err)))?;
    write_stdout_line("").map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(())
}

/// Loads configuration, using defaults when no file is present.
fn load_config(path: Option<&Path>) -> CliResult<FixzitAccessConfig> {
    FixzitAccessConfig::load_or_default(path).map_err(|err| config_error(&err))
}

// ============================================================================
// SECTION: Capability Commands
// ============================================================================

impl SessionArgs {
    /// Builds the raw session payload.
    fn session(&self) -> Session {
        Session {
            user_id: self.user_id.clone(),
            role: self.role.clone(),
            sub_role: self.sub_role.clone(),
            org_id: self.org_id.clone(),
            plan: self.plan.clone(),
        }
    }

    /// Builds the resource context for the described request.
    ///
    /// A session org, when present, must pass the tenant guard first.
    fn context(&self) -> CliResult<ResourceContext> {
        let session = self.session();
        if session.org_id.is_some() {
            validate_org_id_from_session(Some(&session)).map_err(failure_error)?;
        }
        let org_id = match self.target_org.as_deref() {
            Some(raw) => Some(validate_org_id(Some(raw)).map_err(failure_error)?),
            None => None,
        };
        let target = ResourceTarget {
            org_id,
            property_id: self.property_id.as_deref().map(PropertyId::new),
        };
        ResourceContext::from_session(&session, &target).map_err(failure_error)
    }
}

/// Executes `check`.
fn command_check(config_path: Option<&Path>, command: &CheckCommand) -> CliResult<ExitCode> {
    let config = load_config(config_path)?;
    let resolver = config.build_resolver().map_err(|err| config_error(&err))?;
    let sink = config.build_audit_sink().map_err(|err| config_error(&err))?;
    let resolver = AuditedResolver::new(resolver, sink);

    let submodule = parse_submodule(&command.submodule)?;
    let action = parse_action(&command.action)?;
    let context = command.session.context()?;
    let decision = resolver.evaluate(submodule, action, &context);
    write_json(&CheckReport {
        allowed: decision.allowed,
        reason: decision.reason,
        context: &context,
    })?;
    Ok(if decision.allowed { ExitCode::SUCCESS } else { ExitCode::from(DENIED_EXIT_CODE) })
}

/// Executes `modules`.
fn command_modules(config_path: Option<&Path>, command: &ModulesCommand) -> CliResult<ExitCode> {
    let config = load_config(config_path)?;
    let resolver = config.build_resolver().map_err(|err| config_error(&err))?;
    let context = command.session.context()?;
    let report = ModulesReport {
        modules: resolver.compute_allowed_modules(context.role, context.sub_role),
        submodules: resolver.allowed_submodules(&context),
    };
    match command.format {
        OutputFormat::Json => write_json(&report)?,
        OutputFormat::Text => {
            for module in &report.modules {
                write_stdout_line(module.as_str())
                    .map_err(|err| CliError::new(output_error("stdout", &err)))?;
            }
            for submodule in &report.submodules {
                write_stdout_line(&format!("  {}", submodule.as_str()))
                    .map_err(|err| CliError::new(output_error("stdout", &err)))?;
            }
        }
    }
    Ok(ExitCode::SUCCESS)
}

/// Parses a submodule argument.
fn parse_submodule(raw: &str) -> CliResult<SubmoduleKey> {
    SubmoduleKey::parse(raw).ok_or_else(|| CliError::new(format!("unknown submodule: {raw}")))
}

/// Parses an action argument.
fn parse_action(raw: &str) -> CliResult<Action> {
    Action::parse(raw).ok_or_else(|| CliError::new(format!("unknown action: {raw}")))
}

// ============================================================================
// SECTION: Tenant Commands
// ============================================================================

/// Dispatches org subcommands.
fn command_org(config_path: Option<&Path>, command: &OrgCommand) -> CliResult<ExitCode> {
    match command {
        OrgCommand::Validate(command) => command_org_validate(config_path, command),
        OrgCommand::Filter(command) => command_org_filter(command),
    }
}

/// Executes `org validate`.
fn command_org_validate(
    config_path: Option<&Path>,
    command: &OrgValidateCommand,
) -> CliResult<ExitCode> {
    let config = load_config(config_path)?;
    let sink = config.build_audit_sink().map_err(|err| config_error(&err))?;
    let access =
        authorize_org_access(command.org_id.as_deref(), command.target_org.as_deref());
    let reason = match &access {
        TenantAccess::Granted {
            ..
        } => None,
        TenantAccess::Denied {
            reason,
        } => Some(reason.to_string()),
    };
    sink.record_tenant(&TenantAuditEvent::new(TenantAuditEventParams {
        org_id: command.org_id.clone(),
        target_org_id: command.target_org.clone(),
        granted: access.is_granted(),
        reason,
    }));
    write_json(&access)?;
    Ok(if access.is_granted() { ExitCode::SUCCESS } else { ExitCode::from(DENIED_EXIT_CODE) })
}

/// Executes `org filter`.
fn command_org_filter(command: &OrgFilterCommand) -> CliResult<ExitCode> {
    let org_id = validate_org_id(Some(&command.org_id)).map_err(failure_error)?;
    let filter = OrgFilter {
        org_id,
        record_id: command.record_id.clone(),
        family: command.family.into(),
    };
    write_json(&filter.to_predicate())?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Approval Commands
// ============================================================================

/// Approval service backed by the configured `SQLite` store.
type CliApprovalService = ApprovalService<SqliteWorkflowStore, StaticApproverDirectory>;

/// Builds the approval service from configuration.
fn build_service(config: &FixzitAccessConfig) -> CliResult<CliApprovalService> {
    let engine = config.build_engine().map_err(|err| config_error(&err))?;
    let directory = config.approver_directory().map_err(|err| config_error(&err))?;
    let sink = config.build_audit_sink().map_err(|err| config_error(&err))?;
    let store = SqliteWorkflowStore::new(config.store.sqlite_config())
        .map_err(|err| failure_error(StoreError::from(err)))?;
    Ok(ApprovalService::new(engine, store, directory, sink))
}

/// Dispatches approval subcommands.
fn command_approval(config_path: Option<&Path>, command: &ApprovalCommand) -> CliResult<ExitCode> {
    let config = load_config(config_path)?;
    let service = build_service(&config)?;
    match command {
        ApprovalCommand::Route(command) => command_approval_route(&service, command),
        ApprovalCommand::Decide(command) => command_approval_decide(&service, command),
        ApprovalCommand::Timeouts(command) => command_approval_timeouts(&service, command),
        ApprovalCommand::Show(command) => command_approval_show(&service, command),
        ApprovalCommand::Pending(command) => command_approval_pending(&service, command),
        ApprovalCommand::Summary(command) => command_approval_summary(&service, command),
    }
}

/// Executes `approval route`.
fn command_approval_route(
    service: &CliApprovalService,
    command: &ApprovalRouteCommand,
) -> CliResult<ExitCode> {
    let request = read_request(&command.request)?;
    let routed = service.submit(&request).map_err(failure_error)?;
    write_json(&routed)?;
    Ok(ExitCode::SUCCESS)
}

/// Executes `approval decide`.
fn command_approval_decide(
    service: &CliApprovalService,
    command: &ApprovalDecideCommand,
) -> CliResult<ExitCode> {
    let (org_id, request_id) = command.workflow.resolve()?;
    let input = decision_input(command)?;
    let now = resolve_now(command.now_ms);
    let outcome = service.decide(&org_id, &request_id, input, now).map_err(failure_error)?;
    write_json(&OutcomeReport::from(&outcome))?;
    Ok(ExitCode::SUCCESS)
}

/// Builds a decision from command arguments.
fn decision_input(command: &ApprovalDecideCommand) -> CliResult<DecisionInput> {
    let approver = command.approver.as_str();
    let input = match (command.decision, command.delegate_to.as_deref()) {
        (DecisionArg::Approve, None) => DecisionInput::approve(approver),
        (DecisionArg::Reject, None) => DecisionInput::reject(approver),
        (DecisionArg::Delegate, Some(delegate)) => DecisionInput::delegate(approver, delegate),
        (DecisionArg::Delegate, None) => {
            return Err(CliError::new("--delegate-to is required for delegate".to_string()));
        }
        (_, Some(_)) => {
            return Err(CliError::new("--delegate-to is only valid for delegate".to_string()));
        }
    };
    Ok(match &command.note {
        Some(note) => input.with_note(note.clone()),
        None => input,
    })
}

/// Executes `approval timeouts`.
fn command_approval_timeouts(
    service: &CliApprovalService,
    command: &ApprovalTimeoutsCommand,
) -> CliResult<ExitCode> {
    let org_id = validate_org_id(Some(&command.org_id)).map_err(failure_error)?;
    let now = resolve_now(command.now_ms);
    let outcomes = match &command.request_id {
        Some(request_id) => vec![
            service
                .check_timeouts(&org_id, &RequestId::new(request_id.clone()), now)
                .map_err(failure_error)?,
        ],
        None => service.sweep_timeouts(&org_id, now).map_err(failure_error)?,
    };
    let reports: Vec<OutcomeReport<'_>> = outcomes.iter().map(OutcomeReport::from).collect();
    write_json(&reports)?;
    Ok(ExitCode::SUCCESS)
}

/// Executes `approval show`.
fn command_approval_show(
    service: &CliApprovalService,
    command: &ApprovalShowCommand,
) -> CliResult<ExitCode> {
    let (org_id, request_id) = command.workflow.resolve()?;
    let workflow = service.get(&org_id, &request_id).map_err(failure_error)?;
    write_json(&workflow)?;
    Ok(ExitCode::SUCCESS)
}

/// Executes `approval pending`.
fn command_approval_pending(
    service: &CliApprovalService,
    command: &ApprovalPendingCommand,
) -> CliResult<ExitCode> {
    let org_id = validate_org_id(Some(&command.org_id)).map_err(failure_error)?;
    let workflows =
        service.pending_for(&org_id, &UserId::new(command.user.clone())).map_err(failure_error)?;
    write_json(&workflows)?;
    Ok(ExitCode::SUCCESS)
}

/// Executes `approval summary`.
fn command_approval_summary(
    service: &CliApprovalService,
    command: &ApprovalSummaryCommand,
) -> CliResult<ExitCode> {
    let org_id = validate_org_id(Some(&command.org_id)).map_err(failure_error)?;
    let summary = service.summary(&org_id).map_err(failure_error)?;
    write_json(&summary)?;
    Ok(ExitCode::SUCCESS)
}

impl WorkflowArgs {
    /// Validates the org id and wraps the request id.
    fn resolve(&self) -> CliResult<(OrgId, RequestId)> {
        let org_id = validate_org_id(Some(&self.org_id)).map_err(failure_error)?;
        Ok((org_id, RequestId::new(self.request_id.clone())))
    }
}

/// Reads and parses an approval request file.
fn read_request(path: &Path) -> CliResult<ApprovalRequest> {
    let bytes = read_bytes_with_limit(path, MAX_REQUEST_BYTES).map_err(|err| match err {
        ReadLimitError::Io(err) => {
            CliError::new(format!("failed to read request {}: {err}", path.display()))
        }
        ReadLimitError::TooLarge {
            size,
            limit,
        } => CliError::new(format!(
            "request {} is {size} bytes, exceeding the {limit} byte limit",
            path.display()
        )),
    })?;
    serde_json::from_slice(&bytes)
        .map_err(|err| CliError::new(format!("invalid request {}: {err}", path.display())))
}

/// Resolves an explicit timestamp or the current wall clock.
fn resolve_now(now_ms: Option<i64>) -> Timestamp {
    now_ms.map_or_else(
        || {
            let millis = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map_or(0, |elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX));
            Timestamp::from_unix_millis(millis)
        },
        Timestamp::from_unix_millis,
    )
}

// ============================================================================
// SECTION: Config Commands
// ============================================================================

/// Dispatches config subcommands.
fn command_config(config_path: Option<&Path>, command: &ConfigCommand) -> CliResult<ExitCode> {
    match command {
        ConfigCommand::Validate => command_config_validate(config_path),
        ConfigCommand::Example => command_config_example(),
    }
}

/// Executes `config validate`.
fn command_config_validate(config_path: Option<&Path>) -> CliResult<ExitCode> {
    let config = FixzitAccessConfig::load(config_path).map_err(|err| config_error(&err))?;
    config.build_resolver().map_err(|err| config_error(&err))?;
    config.build_engine().map_err(|err| config_error(&err))?;
    config.approver_directory().map_err(|err| config_error(&err))?;
    write_stdout_line("config ok").map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

/// Executes `config example`.
fn command_config_example() -> CliResult<ExitCode> {
    write_stdout_bytes(config_toml_example().as_bytes())
        .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: I/O Helpers
// ============================================================================

/// Reads a file from disk while enforcing a hard size limit.
fn read_bytes_with_limit(path: &Path, max_bytes: usize) -> Result<Vec<u8>, ReadLimitError> {
    let file = File::open(path).map_err(ReadLimitError::Io)?;
    let size = file.metadata().map_err(ReadLimitError::Io)?.len();
    let limit = u64::try_from(max_bytes).map_err(|_| ReadLimitError::TooLarge {
        size,
        limit: max_bytes,
    })?;
    if size > limit {
        return Err(ReadLimitError::TooLarge {
            size,
            limit: max_bytes,
        });
    }

    let mut bytes = Vec::new();
    file.take(limit.saturating_add(1)).read_to_end(&mut bytes).map_err(ReadLimitError::Io)?;
    if bytes.len() > max_bytes {
        return Err(ReadLimitError::TooLarge {
            size: u64::try_from(bytes.len()).unwrap_or(u64::MAX),
            limit: max_bytes,
        });
    }
    Ok(bytes)
}

/// Writes a line to stdout.
fn write_stdout_line(message: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{message}")
}

/// Writes raw bytes to stdout without adding a newline.
fn write_stdout_bytes(bytes: &[u8]) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    stdout.write_all(bytes)
}

/// Writes a value as canonical JSON followed by a newline.
fn write_json<T: Serialize>(value: &T) -> CliResult<()> {
    let mut bytes = serde_jcs::to_vec(value)
        .map_err(|err| CliError::new(format!("failed to render json: {err}")))?;
    bytes.push(b'\n');
    write_stdout_bytes(&bytes).map_err(|err| CliError::new(output_error("stdout", &err)))
}

/// Writes a line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}

/// Formats an output error message.
fn output_error(stream: &str, error: &std::io::Error) -> String {
    format!("failed to write to {stream}: {error}")
}

/// Emits an error message to stderr and returns a failure exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(message);
    ExitCode::FAILURE
}
