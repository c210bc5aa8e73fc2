// crates/fixzit-access-config/src/config.rs
// ============================================================================
// Module: Fixzit Access Configuration
// Description: Configuration loading and validation for the access core.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: fixzit-access-core, fixzit-access-store-sqlite, serde, toml
// ============================================================================

//! ## Overview
//! Configuration is loaded from `fixzit-access.toml` with strict size and
//! path limits. Every section is optional and falls back to the builtin
//! tables, but anything present must parse: unknown role, plan, module,
//! submodule, or action names are rejected rather than ignored. The
//! `build_*` methods turn a validated config into the registry, policy
//! table, approver directory, store config, and audit sink the runtime
//! consumes.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;

use fixzit_access_core::AccessRegistry;
use fixzit_access_core::Action;
use fixzit_access_core::ApprovalEngine;
use fixzit_access_core::ApprovalPolicy;
use fixzit_access_core::ApprovalPolicyTable;
use fixzit_access_core::ApproverRole;
use fixzit_access_core::AuditSink;
use fixzit_access_core::CapabilityResolver;
use fixzit_access_core::FileAuditSink;
use fixzit_access_core::ModuleKey;
use fixzit_access_core::NoopAuditSink;
use fixzit_access_core::OrgId;
use fixzit_access_core::Plan;
use fixzit_access_core::PlanGateDefault;
use fixzit_access_core::Role;
use fixzit_access_core::StaticApproverDirectory;
use fixzit_access_core::StderrAuditSink;
use fixzit_access_core::SubRole;
use fixzit_access_core::SubmoduleKey;
use fixzit_access_core::UserId;
use fixzit_access_core::normalize_plan;
use fixzit_access_core::normalize_role;
use fixzit_access_core::normalize_sub_role;
use fixzit_access_store_sqlite::SqliteStoreConfig;
use fixzit_access_store_sqlite::SqliteStoreMode;
use fixzit_access_store_sqlite::SqliteSyncMode;
use serde::Deserialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
pub const DEFAULT_CONFIG_NAME: &str = "fixzit-access.toml";
/// Environment variable used to override the config path.
pub const CONFIG_ENV_VAR: &str = "FIXZIT_ACCESS_CONFIG";
/// Maximum configuration file size in bytes.
pub const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Default `SQLite` database filename.
const DEFAULT_STORE_PATH: &str = "fixzit-access.db";
/// Default `SQLite` busy timeout (ms).
const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;
/// Maximum `SQLite` busy timeout (ms).
const MAX_BUSY_TIMEOUT_MS: u64 = 60_000;
/// Maximum number of approver ids for one org/role pair.
const MAX_APPROVERS_PER_ROLE: usize = 256;

// ============================================================================
// SECTION: Config Model
// ============================================================================

/// Top-level `fixzit-access.toml` configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct FixzitAccessConfig {
    /// Registry overrides applied on top of the builtin tables.
    #[serde(default)]
    pub registry: RegistryConfig,
    /// Approval policy table; absent means the builtin table.
    #[serde(default)]
    pub approval: Option<ApprovalConfig>,
    /// Static approver directory keyed by org id, then approver role.
    #[serde(default)]
    pub approvers: BTreeMap<String, BTreeMap<String, Vec<String>>>,
    /// Workflow store configuration.
    #[serde(default)]
    pub store: StoreConfig,
    /// Audit sink configuration.
    #[serde(default)]
    pub audit: AuditConfig,
}

impl FixzitAccessConfig {
    /// Loads configuration from disk using the default resolution rules.
    ///
    /// The path comes from `path`, then [`CONFIG_ENV_VAR`], then
    /// [`DEFAULT_CONFIG_NAME`] in the working directory.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let resolved = resolve_path(path)?;
        validate_path(&resolved)?;
        let bytes = fs::read(&resolved).map_err(|err| ConfigError::Io(err.to_string()))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        Self::from_toml_str(content)
    }

    /// Loads configuration, falling back to defaults when nothing was named.
    ///
    /// Defaults apply only when `path` is `None`, [`CONFIG_ENV_VAR`] is unset,
    /// and [`DEFAULT_CONFIG_NAME`] does not exist. An explicit path that is
    /// missing is still an error.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        if path.is_none()
            && env::var_os(CONFIG_ENV_VAR).is_none()
            && !Path::new(DEFAULT_CONFIG_NAME).exists()
        {
            return Ok(Self::default());
        }
        Self::load(path)
    }

    /// Parses and validates configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed TOML and
    /// [`ConfigError::Invalid`] when validation fails.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        if content.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when any section is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.build_registry()?;
        self.build_policy_table()?;
        self.approver_directory()?;
        self.store.validate()?;
        self.audit.validate()?;
        Ok(())
    }

    /// Builds the access registry: builtin tables plus configured overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when a name fails to parse.
    pub fn build_registry(&self) -> Result<AccessRegistry, ConfigError> {
        self.registry.build()
    }

    /// Builds a capability resolver over [`Self::build_registry`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when the registry section is invalid.
    pub fn build_resolver(&self) -> Result<CapabilityResolver, ConfigError> {
        Ok(CapabilityResolver::new(Arc::new(self.build_registry()?)))
    }

    /// Builds the approval policy table.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when the configured table is empty or
    /// a policy is malformed.
    pub fn build_policy_table(&self) -> Result<ApprovalPolicyTable, ConfigError> {
        let Some(approval) = &self.approval else {
            return Ok(ApprovalPolicyTable::builtin());
        };
        ApprovalPolicyTable::new(approval.policies.clone())
            .map_err(|err| ConfigError::Invalid(format!("approval.policies: {err}")))
    }

    /// Builds an approval engine over [`Self::build_policy_table`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when the policy table is invalid.
    pub fn build_engine(&self) -> Result<ApprovalEngine, ConfigError> {
        Ok(ApprovalEngine::new(self.build_policy_table()?))
    }

    /// Builds the static approver directory.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for malformed org ids, unknown
    /// approver roles, or blank user ids.
    pub fn approver_directory(&self) -> Result<StaticApproverDirectory, ConfigError> {
        let mut directory = StaticApproverDirectory::new();
        for (raw_org, roles) in &self.approvers {
            let org_id = OrgId::parse(raw_org)
                .map_err(|err| ConfigError::Invalid(format!("approvers.{raw_org}: {err}")))?;
            for (raw_role, users) in roles {
                let role = ApproverRole::parse(raw_role).map_err(|err| {
                    ConfigError::Invalid(format!("approvers.{raw_org}.{raw_role}: {err}"))
                })?;
                if users.len() > MAX_APPROVERS_PER_ROLE {
                    return Err(ConfigError::Invalid(format!(
                        "approvers.{raw_org}.{raw_role} exceeds {MAX_APPROVERS_PER_ROLE} entries"
                    )));
                }
                let mut ids = Vec::with_capacity(users.len());
                for user in users {
                    let trimmed = user.trim();
                    if trimmed.is_empty() {
                        return Err(ConfigError::Invalid(format!(
                            "approvers.{raw_org}.{raw_role} contains a blank user id"
                        )));
                    }
                    ids.push(UserId::new(trimmed));
                }
                directory.insert(org_id.clone(), role, ids);
            }
        }
        Ok(directory)
    }

    /// Builds the configured audit sink.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the file sink cannot be opened.
    pub fn build_audit_sink(&self) -> Result<Arc<dyn AuditSink>, ConfigError> {
        self.audit.build_sink()
    }
}

// ============================================================================
// SECTION: Registry
// ============================================================================

/// Registry overrides.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RegistryConfig {
    /// Gate behavior for plan/submodule pairs without an entry.
    #[serde(default)]
    pub plan_gate_default: PlanGateDefault,
    /// Explicit plan gate entries applied in order.
    #[serde(default)]
    pub plan_gates: Vec<PlanGateConfig>,
    /// Replacement module lists keyed by role name.
    #[serde(default)]
    pub role_modules: BTreeMap<String, Vec<String>>,
    /// Replacement module lists keyed by sub-role name.
    #[serde(default)]
    pub sub_role_modules: BTreeMap<String, Vec<String>>,
    /// Additional action grants.
    #[serde(default)]
    pub grants: Vec<GrantConfig>,
}

/// One plan gate override.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PlanGateConfig {
    /// Plan name.
    pub plan: String,
    /// Submodule name.
    pub submodule: String,
    /// Gate value; `None` clears the entry so the default applies.
    #[serde(default)]
    pub allowed: Option<bool>,
}

/// Additional actions granted to exactly one role or sub-role.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GrantConfig {
    /// Role receiving the grant.
    #[serde(default)]
    pub role: Option<String>,
    /// Sub-role receiving the grant.
    #[serde(default)]
    pub sub_role: Option<String>,
    /// Submodule the actions apply to.
    pub submodule: String,
    /// Action names.
    pub actions: Vec<String>,
}

impl RegistryConfig {
    /// Applies the overrides to the builtin registry.
    fn build(&self) -> Result<AccessRegistry, ConfigError> {
        let mut registry = AccessRegistry::builtin();
        registry.set_plan_gate_default(self.plan_gate_default);
        for (index, gate) in self.plan_gates.iter().enumerate() {
            let field = format!("registry.plan_gates[{index}]");
            let plan = parse_plan(&field, &gate.plan)?;
            let submodule = parse_submodule(&field, &gate.submodule)?;
            match gate.allowed {
                Some(allowed) => registry.set_plan_gate(plan, submodule, allowed),
                None => registry.clear_plan_gate(plan, submodule),
            }
        }
        for (raw_role, modules) in &self.role_modules {
            let field = format!("registry.role_modules.{raw_role}");
            let role = parse_role(&field, raw_role)?;
            registry.set_role_modules(role, parse_modules(&field, modules)?);
        }
        for (raw_sub_role, modules) in &self.sub_role_modules {
            let field = format!("registry.sub_role_modules.{raw_sub_role}");
            let sub_role = parse_sub_role(&field, raw_sub_role)?;
            registry.set_sub_role_modules(sub_role, parse_modules(&field, modules)?);
        }
        for (index, grant) in self.grants.iter().enumerate() {
            let field = format!("registry.grants[{index}]");
            let submodule = parse_submodule(&field, &grant.submodule)?;
            let actions = parse_actions(&field, &grant.actions)?;
            match (&grant.role, &grant.sub_role) {
                (Some(raw_role), None) => {
                    let role = parse_role(&field, raw_role)?;
                    registry.grant_role_actions(role, submodule, &actions);
                }
                (None, Some(raw_sub_role)) => {
                    let sub_role = parse_sub_role(&field, raw_sub_role)?;
                    registry.grant_sub_role_actions(sub_role, submodule, &actions);
                }
                _ => {
                    return Err(ConfigError::Invalid(format!(
                        "{field} must set exactly one of role or sub_role"
                    )));
                }
            }
        }
        Ok(registry)
    }
}

// ============================================================================
// SECTION: Approval
// ============================================================================

/// Approval policy table configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ApprovalConfig {
    /// Policies; reordered by descending threshold at build time.
    pub policies: Vec<ApprovalPolicy>,
}

// ============================================================================
// SECTION: Store
// ============================================================================

/// `SQLite` workflow store configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StoreConfig {
    /// Database path.
    #[serde(default = "default_store_path")]
    pub path: PathBuf,
    /// Busy timeout in milliseconds.
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
    /// `SQLite` journal mode.
    #[serde(default)]
    pub journal_mode: SqliteStoreMode,
    /// `SQLite` sync mode.
    #[serde(default)]
    pub sync_mode: SqliteSyncMode,
    /// Optional number of snapshots retained per workflow.
    #[serde(default)]
    pub max_versions: Option<u64>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_store_path(),
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
            journal_mode: SqliteStoreMode::default(),
            sync_mode: SqliteSyncMode::default(),
            max_versions: None,
        }
    }
}

impl StoreConfig {
    /// Validates the store section.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for bad paths or limits.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_path_string("store.path", &self.path.to_string_lossy())?;
        if self.busy_timeout_ms == 0 || self.busy_timeout_ms > MAX_BUSY_TIMEOUT_MS {
            return Err(ConfigError::Invalid(format!(
                "store.busy_timeout_ms must be between 1 and {MAX_BUSY_TIMEOUT_MS}"
            )));
        }
        if self.max_versions == Some(0) {
            return Err(ConfigError::Invalid(
                "store.max_versions must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Returns the `SQLite` store configuration.
    #[must_use]
    pub fn sqlite_config(&self) -> SqliteStoreConfig {
        SqliteStoreConfig {
            path: self.path.clone(),
            busy_timeout_ms: self.busy_timeout_ms,
            journal_mode: self.journal_mode,
            sync_mode: self.sync_mode,
            max_versions: self.max_versions,
        }
    }
}

/// Returns the default store path.
fn default_store_path() -> PathBuf {
    PathBuf::from(DEFAULT_STORE_PATH)
}

/// Returns the default busy timeout.
const fn default_busy_timeout_ms() -> u64 {
    DEFAULT_BUSY_TIMEOUT_MS
}

// ============================================================================
// SECTION: Audit
// ============================================================================

/// Audit sink selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditSinkKind {
    /// JSON lines on stderr.
    #[default]
    Stderr,
    /// JSON lines appended to `audit.path`.
    File,
    /// Audit disabled.
    None,
}

/// Audit configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AuditConfig {
    /// Sink kind.
    #[serde(default)]
    pub sink: AuditSinkKind,
    /// Log file path for the file sink.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl AuditConfig {
    /// Validates the audit section.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when the file sink lacks a path or a
    /// path is set for another sink.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match (self.sink, &self.path) {
            (AuditSinkKind::File, Some(path)) => {
                validate_path_string("audit.path", &path.to_string_lossy())
            }
            (AuditSinkKind::File, None) => {
                Err(ConfigError::Invalid("audit.path is required for the file sink".to_string()))
            }
            (_, Some(_)) => {
                Err(ConfigError::Invalid("audit.path is only valid for the file sink".to_string()))
            }
            (_, None) => Ok(()),
        }
    }

    /// Builds the configured sink.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when validation fails or the log file cannot
    /// be opened.
    pub fn build_sink(&self) -> Result<Arc<dyn AuditSink>, ConfigError> {
        self.validate()?;
        match (self.sink, &self.path) {
            (AuditSinkKind::File, Some(path)) => {
                let sink =
                    FileAuditSink::new(path).map_err(|err| ConfigError::Io(err.to_string()))?;
                Ok(Arc::new(sink))
            }
            (AuditSinkKind::None, _) => Ok(Arc::new(NoopAuditSink)),
            _ => Ok(Arc::new(StderrAuditSink)),
        }
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration loading or validation errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Name Parsing
// ============================================================================

/// Parses a role name, accepting aliases.
fn parse_role(field: &str, raw: &str) -> Result<Role, ConfigError> {
    normalize_role(Some(raw))
        .ok_or_else(|| ConfigError::Invalid(format!("{field}: unknown role {raw}")))
}

/// Parses a sub-role name, accepting aliases.
fn parse_sub_role(field: &str, raw: &str) -> Result<SubRole, ConfigError> {
    normalize_sub_role(Some(raw))
        .ok_or_else(|| ConfigError::Invalid(format!("{field}: unknown sub_role {raw}")))
}

/// Parses a plan name.
fn parse_plan(field: &str, raw: &str) -> Result<Plan, ConfigError> {
    normalize_plan(Some(raw))
        .ok_or_else(|| ConfigError::Invalid(format!("{field}: unknown plan {raw}")))
}

/// Parses a submodule name.
fn parse_submodule(field: &str, raw: &str) -> Result<SubmoduleKey, ConfigError> {
    SubmoduleKey::parse(raw)
        .ok_or_else(|| ConfigError::Invalid(format!("{field}: unknown submodule {raw}")))
}

/// Parses a module list.
fn parse_modules(field: &str, raw: &[String]) -> Result<Vec<ModuleKey>, ConfigError> {
    raw.iter()
        .map(|name| {
            ModuleKey::parse(name)
                .ok_or_else(|| ConfigError::Invalid(format!("{field}: unknown module {name}")))
        })
        .collect()
}

/// Parses a non-empty action list.
fn parse_actions(field: &str, raw: &[String]) -> Result<Vec<Action>, ConfigError> {
    if raw.is_empty() {
        return Err(ConfigError::Invalid(format!("{field}: actions must be non-empty")));
    }
    raw.iter()
        .map(|name| {
            Action::parse(name)
                .ok_or_else(|| ConfigError::Invalid(format!("{field}: unknown action {name}")))
        })
        .collect()
}

// ============================================================================
// SECTION: Path Helpers
// ============================================================================

/// Resolves the config path from CLI or environment defaults.
fn resolve_path(path: Option<&Path>) -> Result<PathBuf, ConfigError> {
    if let Some(path) = path {
        return Ok(path.to_path_buf());
    }
    if let Ok(env_path) = env::var(CONFIG_ENV_VAR) {
        if env_path.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        return Ok(PathBuf::from(env_path));
    }
    Ok(PathBuf::from(DEFAULT_CONFIG_NAME))
}

/// Validates the resolved path against length limits.
fn validate_path(path: &Path) -> Result<(), ConfigError> {
    if path.to_string_lossy().len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
    }
    for component in path.components() {
        if component.as_os_str().to_string_lossy().len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid("config path component too long".to_string()));
        }
    }
    Ok(())
}

/// Validates a configured path string.
fn validate_path_string(field: &str, value: &str) -> Result<(), ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::Invalid(format!("{field} must be non-empty")));
    }
    if trimmed.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid(format!("{field} exceeds max length")));
    }
    for component in Path::new(trimmed).components() {
        if component.as_os_str().to_string_lossy().len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid(format!("{field} path component too long")));
        }
    }
    Ok(())
}
