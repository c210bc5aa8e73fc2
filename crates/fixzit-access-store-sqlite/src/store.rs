// crates/fixzit-access-store-sqlite/src/store.rs
// ============================================================================
// Module: SQLite Workflow Store
// Description: Durable WorkflowStore backed by SQLite WAL.
// Purpose: Persist approval workflow snapshots with optimistic versioning.
// Dependencies: fixzit-access-core, rusqlite, serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! This module implements a durable [`WorkflowStore`] using `SQLite`. The
//! `workflows` table holds one head row per `(org_id, request_id)` naming the
//! latest version; `workflow_versions` holds the canonical JSON snapshot for
//! each saved version. Saves compare the head version with the caller's
//! expectation inside one transaction, so concurrent writers cannot both
//! advance the same workflow. Loads verify the stored digest and the
//! key/payload match before returning anything.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::Mutex;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use fixzit_access_core::ApprovalWorkflow;
use fixzit_access_core::OrgId;
use fixzit_access_core::RequestId;
use fixzit_access_core::StoreError;
use fixzit_access_core::WorkflowStore;
use rusqlite::Connection;
use rusqlite::OpenFlags;
use rusqlite::OptionalExtension;
use rusqlite::Transaction;
use rusqlite::params;
use serde::Deserialize;
use thiserror::Error;

use crate::integrity::SHA256_LABEL;
use crate::integrity::canonical_json_bytes;
use crate::integrity::sha256_hex;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// `SQLite` schema version for the store.
const SCHEMA_VERSION: i64 = 1;
/// Default busy timeout (ms).
const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;
/// Maximum length of a single path component.
const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Maximum workflow snapshot size accepted by the store.
pub const MAX_WORKFLOW_BYTES: usize = 1024 * 1024;

// ============================================================================
// SECTION: Config
// ============================================================================

/// `SQLite` journal mode configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SqliteStoreMode {
    /// WAL journal mode.
    #[default]
    Wal,
    /// Delete journal mode.
    Delete,
}

impl SqliteStoreMode {
    /// Returns the `SQLite` pragma value.
    #[must_use]
    pub const fn pragma_value(self) -> &'static str {
        match self {
            Self::Wal => "wal",
            Self::Delete => "delete",
        }
    }
}

/// `SQLite` sync mode configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SqliteSyncMode {
    /// Full synchronous mode.
    #[default]
    Full,
    /// Normal synchronous mode.
    Normal,
}

impl SqliteSyncMode {
    /// Returns the `SQLite` pragma value.
    #[must_use]
    pub const fn pragma_value(self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::Normal => "normal",
        }
    }
}

/// Configuration for the `SQLite` workflow store.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SqliteStoreConfig {
    /// Path to the `SQLite` database file.
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

impl SqliteStoreConfig {
    /// Returns a config for `path` with default pragmas and no retention cap.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
            journal_mode: SqliteStoreMode::default(),
            sync_mode: SqliteSyncMode::default(),
            max_versions: None,
        }
    }
}

/// Returns the default busy timeout for `SQLite` connections.
const fn default_busy_timeout_ms() -> u64 {
    DEFAULT_BUSY_TIMEOUT_MS
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// `SQLite` store errors.
#[derive(Debug, Error)]
pub enum SqliteStoreError {
    /// Store I/O error.
    #[error("sqlite store io error: {0}")]
    Io(String),
    /// `SQLite` engine error.
    #[error("sqlite store db error: {0}")]
    Db(String),
    /// Store corruption or hash mismatch.
    #[error("sqlite store corruption: {0}")]
    Corrupt(String),
    /// Store schema version mismatch.
    #[error("sqlite store version mismatch: {0}")]
    VersionMismatch(String),
    /// Invalid store data.
    #[error("sqlite store invalid data: {0}")]
    Invalid(String),
    /// Head version differs from the caller's expectation.
    #[error("sqlite store version conflict: expected {expected:?}, found {actual:?}")]
    VersionConflict {
        /// Version the caller loaded.
        expected: Option<u64>,
        /// Version currently stored.
        actual: Option<u64>,
    },
    /// Snapshot exceeded the size limit.
    #[error("sqlite store payload too large: {actual_bytes} bytes (max {max_bytes})")]
    TooLarge {
        /// Maximum allowed bytes.
        max_bytes: usize,
        /// Actual payload size in bytes.
        actual_bytes: usize,
    },
}

impl From<SqliteStoreError> for StoreError {
    fn from(error: SqliteStoreError) -> Self {
        match error {
            SqliteStoreError::Io(message) => Self::Io(message),
            SqliteStoreError::Db(message) => Self::Store(message),
            SqliteStoreError::Corrupt(message) => Self::Corrupt(message),
            SqliteStoreError::VersionMismatch(message) => Self::VersionMismatch(message),
            SqliteStoreError::Invalid(message) => Self::Invalid(message),
            SqliteStoreError::VersionConflict {
                expected,
                actual,
            } => Self::VersionConflict {
                expected,
                actual,
            },
            SqliteStoreError::TooLarge {
                max_bytes,
                actual_bytes,
            } => Self::Invalid(format!(
                "workflow_json exceeds size limit: {actual_bytes} bytes (max {max_bytes})"
            )),
        }
    }
}

// ============================================================================
// SECTION: Store
// ============================================================================

/// Raw snapshot row: bytes, digest, digest algorithm, version.
type SnapshotRow = (Vec<u8>, String, String, i64);

/// `SQLite`-backed workflow store with WAL support.
#[derive(Clone)]
pub struct SqliteWorkflowStore {
    /// Store configuration.
    config: SqliteStoreConfig,
    /// Shared `SQLite` connection guarded by a mutex.
    connection: Arc<Mutex<Connection>>,
}

impl SqliteWorkflowStore {
    /// Opens an `SQLite`-backed workflow store.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteStoreError`] when the database cannot be opened or
    /// initialized, or when its schema version is unsupported.
    pub fn new(config: SqliteStoreConfig) -> Result<Self, SqliteStoreError> {
        validate_store_path(&config.path)?;
        if config.max_versions == Some(0) {
            return Err(SqliteStoreError::Invalid(
                "max_versions must be greater than zero".to_string(),
            ));
        }
        ensure_parent_dir(&config.path)?;
        let mut connection = open_connection(&config)?;
        initialize_schema(&mut connection)?;
        Ok(Self {
            config,
            connection: Arc::new(Mutex::new(connection)),
        })
    }

    /// Returns the store configuration.
    #[must_use]
    pub const fn config(&self) -> &SqliteStoreConfig {
        &self.config
    }

    /// Returns the retained snapshot versions of a workflow, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteStoreError`] when the query fails.
    pub fn versions(
        &self,
        org_id: &OrgId,
        request_id: &RequestId,
    ) -> Result<Vec<u64>, SqliteStoreError> {
        let guard =
            self.connection.lock().map_err(|_| SqliteStoreError::Db("mutex poisoned".to_string()))?;
        let mut stmt = guard
            .prepare(
                "SELECT version FROM workflow_versions WHERE org_id = ?1 AND request_id = ?2 \
                 ORDER BY version ASC",
            )
            .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
        let rows = stmt
            .query_map(params![org_id.as_str(), request_id.as_str()], |row| row.get::<_, i64>(0))
            .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
        let mut versions = Vec::new();
        for row in rows {
            let value = row.map_err(|err| SqliteStoreError::Db(err.to_string()))?;
            versions.push(stored_version(value, request_id)?);
        }
        drop(stmt);
        drop(guard);
        Ok(versions)
    }

    /// Loads the latest snapshot of one workflow.
    fn load_workflow(
        &self,
        org_id: &OrgId,
        request_id: &RequestId,
    ) -> Result<Option<ApprovalWorkflow>, SqliteStoreError> {
        let row = {
            let mut guard = self
                .connection
                .lock()
                .map_err(|_| SqliteStoreError::Db("mutex poisoned".to_string()))?;
            let tx = guard.transaction().map_err(|err| SqliteStoreError::Db(err.to_string()))?;
            let row = read_snapshot(&tx, org_id, request_id)?;
            tx.commit().map_err(|err| SqliteStoreError::Db(err.to_string()))?;
            drop(guard);
            row
        };
        row.map(|row| decode_snapshot(row, org_id, request_id)).transpose()
    }

    /// Saves a workflow snapshot under an optimistic version check.
    fn save_workflow(
        &self,
        workflow: &ApprovalWorkflow,
        expected_version: Option<u64>,
    ) -> Result<(), SqliteStoreError> {
        let version = i64::try_from(workflow.version)
            .map_err(|_| SqliteStoreError::Invalid("workflow version too large".to_string()))?;
        let canonical_json = canonical_json_bytes(workflow)
            .map_err(|err| SqliteStoreError::Invalid(err.to_string()))?;
        if canonical_json.len() > MAX_WORKFLOW_BYTES {
            return Err(SqliteStoreError::TooLarge {
                max_bytes: MAX_WORKFLOW_BYTES,
                actual_bytes: canonical_json.len(),
            });
        }
        let digest = sha256_hex(&canonical_json);
        let saved_at = unix_millis();
        let org_id = workflow.org_id.as_str();
        let request_id = workflow.request_id.as_str();
        {
            let mut guard = self
                .connection
                .lock()
                .map_err(|_| SqliteStoreError::Db("mutex poisoned".to_string()))?;
            let tx = guard.transaction().map_err(|err| SqliteStoreError::Db(err.to_string()))?;
            let latest: Option<i64> = tx
                .query_row(
                    "SELECT latest_version FROM workflows WHERE org_id = ?1 AND request_id = ?2",
                    params![org_id, request_id],
                    |row| row.get(0),
                )
                .optional()
                .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
            let actual =
                latest.map(|value| stored_version(value, &workflow.request_id)).transpose()?;
            if actual != expected_version {
                return Err(SqliteStoreError::VersionConflict {
                    expected: expected_version,
                    actual,
                });
            }
            if let Some(current) = actual
                && workflow.version <= current
            {
                return Err(SqliteStoreError::Invalid(format!(
                    "workflow version {} does not advance past {current}",
                    workflow.version
                )));
            }
            tx.execute(
                "INSERT INTO workflows (org_id, request_id, latest_version) VALUES (?1, ?2, ?3) \
                 ON CONFLICT(org_id, request_id) DO UPDATE SET latest_version = \
                 excluded.latest_version",
                params![org_id, request_id, version],
            )
            .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
            tx.execute(
                "INSERT INTO workflow_versions (org_id, request_id, version, workflow_json, \
                 workflow_hash, hash_algorithm, saved_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    org_id,
                    request_id,
                    version,
                    canonical_json,
                    digest,
                    SHA256_LABEL,
                    saved_at
                ],
            )
            .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
            enforce_retention(&tx, org_id, request_id, self.config.max_versions)?;
            tx.commit().map_err(|err| SqliteStoreError::Db(err.to_string()))?;
            drop(guard);
        }
        Ok(())
    }

    /// Lists the latest snapshot of every workflow in an organization.
    fn list_workflows(&self, org_id: &OrgId) -> Result<Vec<ApprovalWorkflow>, SqliteStoreError> {
        let rows = {
            let mut guard = self
                .connection
                .lock()
                .map_err(|_| SqliteStoreError::Db("mutex poisoned".to_string()))?;
            let tx = guard.transaction().map_err(|err| SqliteStoreError::Db(err.to_string()))?;
            let request_ids = {
                let mut stmt = tx
                    .prepare(
                        "SELECT request_id FROM workflows WHERE org_id = ?1 ORDER BY request_id \
                         ASC",
                    )
                    .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
                let mapped = stmt
                    .query_map(params![org_id.as_str()], |row| row.get::<_, String>(0))
                    .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
                let mut ids = Vec::new();
                for id in mapped {
                    ids.push(RequestId::new(
                        id.map_err(|err| SqliteStoreError::Db(err.to_string()))?,
                    ));
                }
                ids
            };
            let mut rows = Vec::with_capacity(request_ids.len());
            for request_id in request_ids {
                let Some(row) = read_snapshot(&tx, org_id, &request_id)? else {
                    return Err(SqliteStoreError::Corrupt(format!(
                        "workflow {request_id} vanished during listing"
                    )));
                };
                rows.push((request_id, row));
            }
            tx.commit().map_err(|err| SqliteStoreError::Db(err.to_string()))?;
            drop(guard);
            rows
        };
        rows.into_iter()
            .map(|(request_id, row)| decode_snapshot(row, org_id, &request_id))
            .collect()
    }
}

impl WorkflowStore for SqliteWorkflowStore {
    fn load(
        &self,
        org_id: &OrgId,
        request_id: &RequestId,
    ) -> Result<Option<ApprovalWorkflow>, StoreError> {
        self.load_workflow(org_id, request_id).map_err(StoreError::from)
    }

    fn save(
        &self,
        workflow: &ApprovalWorkflow,
        expected_version: Option<u64>,
    ) -> Result<(), StoreError> {
        self.save_workflow(workflow, expected_version).map_err(StoreError::from)
    }

    fn list(&self, org_id: &OrgId) -> Result<Vec<ApprovalWorkflow>, StoreError> {
        self.list_workflows(org_id).map_err(StoreError::from)
    }
}

// ============================================================================
// SECTION: Snapshot Helpers
// ============================================================================

/// Reads the head snapshot for a workflow inside an open transaction.
fn read_snapshot(
    tx: &Transaction<'_>,
    org_id: &OrgId,
    request_id: &RequestId,
) -> Result<Option<SnapshotRow>, SqliteStoreError> {
    let latest: Option<i64> = tx
        .query_row(
            "SELECT latest_version FROM workflows WHERE org_id = ?1 AND request_id = ?2",
            params![org_id.as_str(), request_id.as_str()],
            |row| row.get(0),
        )
        .optional()
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    let Some(latest) = latest else {
        return Ok(None);
    };
    stored_version(latest, request_id)?;
    let metadata = tx
        .query_row(
            "SELECT length(workflow_json), workflow_hash, hash_algorithm FROM workflow_versions \
             WHERE org_id = ?1 AND request_id = ?2 AND version = ?3",
            params![org_id.as_str(), request_id.as_str(), latest],
            |row| {
                let length: i64 = row.get(0)?;
                let hash: String = row.get(1)?;
                let algorithm: String = row.get(2)?;
                Ok((length, hash, algorithm))
            },
        )
        .optional()
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    let Some((length, hash, algorithm)) = metadata else {
        return Err(SqliteStoreError::Corrupt(format!(
            "missing workflow version {latest} for request {request_id}"
        )));
    };
    let length = usize::try_from(length).map_err(|_| {
        SqliteStoreError::Invalid(format!("negative workflow length for request {request_id}"))
    })?;
    if length > MAX_WORKFLOW_BYTES {
        return Err(SqliteStoreError::TooLarge {
            max_bytes: MAX_WORKFLOW_BYTES,
            actual_bytes: length,
        });
    }
    let bytes: Vec<u8> = tx
        .query_row(
            "SELECT workflow_json FROM workflow_versions WHERE org_id = ?1 AND request_id = ?2 \
             AND version = ?3",
            params![org_id.as_str(), request_id.as_str(), latest],
            |row| row.get(0),
        )
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    Ok(Some((bytes, hash, algorithm, latest)))
}

/// Verifies and decodes a snapshot row.
fn decode_snapshot(
    row: SnapshotRow,
    org_id: &OrgId,
    request_id: &RequestId,
) -> Result<ApprovalWorkflow, SqliteStoreError> {
    let (bytes, hash, algorithm, version) = row;
    if algorithm != SHA256_LABEL {
        return Err(SqliteStoreError::Invalid(format!("unsupported hash algorithm: {algorithm}")));
    }
    if sha256_hex(&bytes) != hash {
        return Err(SqliteStoreError::Corrupt(format!("hash mismatch for request {request_id}")));
    }
    let workflow: ApprovalWorkflow =
        serde_json::from_slice(&bytes).map_err(|err| SqliteStoreError::Invalid(err.to_string()))?;
    if &workflow.org_id != org_id || &workflow.request_id != request_id {
        return Err(SqliteStoreError::Invalid(
            "workflow key mismatch between row and payload".to_string(),
        ));
    }
    if i64::try_from(workflow.version).ok() != Some(version) {
        return Err(SqliteStoreError::Corrupt(format!(
            "workflow version mismatch for request {request_id}"
        )));
    }
    Ok(workflow)
}

/// Converts a stored version number, rejecting values below one.
fn stored_version(value: i64, request_id: &RequestId) -> Result<u64, SqliteStoreError> {
    u64::try_from(value).ok().filter(|version| *version >= 1).ok_or_else(|| {
        SqliteStoreError::Corrupt(format!("invalid latest_version for request {request_id}"))
    })
}

// ============================================================================
// SECTION: Connection Helpers
// ============================================================================

/// Ensures the parent directory for the store exists.
fn ensure_parent_dir(path: &Path) -> Result<(), SqliteStoreError> {
    let Some(parent) = path.parent() else {
        return Err(SqliteStoreError::Io("store path missing parent directory".to_string()));
    };
    std::fs::create_dir_all(parent).map_err(|err| SqliteStoreError::Io(err.to_string()))
}

/// Validates store paths for length limits and file type.
fn validate_store_path(path: &Path) -> Result<(), SqliteStoreError> {
    if path.as_os_str().is_empty() {
        return Err(SqliteStoreError::Invalid("store path is empty".to_string()));
    }
    if path.display().to_string().len() > MAX_TOTAL_PATH_LENGTH {
        return Err(SqliteStoreError::Invalid("store path exceeds length limit".to_string()));
    }
    for component in path.components() {
        if component.as_os_str().to_string_lossy().len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(SqliteStoreError::Invalid(
                "store path contains an overlong component".to_string(),
            ));
        }
    }
    if path.is_dir() {
        return Err(SqliteStoreError::Invalid(
            "store path must be a file, not a directory".to_string(),
        ));
    }
    Ok(())
}

/// Opens an `SQLite` connection and applies pragmas.
fn open_connection(config: &SqliteStoreConfig) -> Result<Connection, SqliteStoreError> {
    let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
        | OpenFlags::SQLITE_OPEN_CREATE
        | OpenFlags::SQLITE_OPEN_FULL_MUTEX;
    let connection = Connection::open_with_flags(&config.path, flags)
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    apply_pragmas(&connection, config)?;
    Ok(connection)
}

/// Applies durability pragmas.
fn apply_pragmas(
    connection: &Connection,
    config: &SqliteStoreConfig,
) -> Result<(), SqliteStoreError> {
    connection
        .execute_batch("PRAGMA foreign_keys = ON;")
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    connection
        .execute_batch(&format!("PRAGMA journal_mode = {};", config.journal_mode.pragma_value()))
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    connection
        .execute_batch(&format!("PRAGMA synchronous = {};", config.sync_mode.pragma_value()))
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    connection
        .busy_timeout(std::time::Duration::from_millis(config.busy_timeout_ms))
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    Ok(())
}

/// Creates the schema or validates the existing version.
fn initialize_schema(connection: &mut Connection) -> Result<(), SqliteStoreError> {
    let tx = connection.transaction().map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    tx.execute_batch("CREATE TABLE IF NOT EXISTS store_meta (version INTEGER NOT NULL);")
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    let version: Option<i64> = tx
        .query_row("SELECT version FROM store_meta LIMIT 1", params![], |row| row.get(0))
        .optional()
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    match version {
        None => {
            tx.execute("INSERT INTO store_meta (version) VALUES (?1)", params![SCHEMA_VERSION])
                .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
            tx.execute_batch(
                "CREATE TABLE IF NOT EXISTS workflows (
                    org_id TEXT NOT NULL,
                    request_id TEXT NOT NULL,
                    latest_version INTEGER NOT NULL,
                    PRIMARY KEY (org_id, request_id)
                );
                CREATE TABLE IF NOT EXISTS workflow_versions (
                    org_id TEXT NOT NULL,
                    request_id TEXT NOT NULL,
                    version INTEGER NOT NULL,
                    workflow_json BLOB NOT NULL,
                    workflow_hash TEXT NOT NULL,
                    hash_algorithm TEXT NOT NULL,
                    saved_at INTEGER NOT NULL,
                    PRIMARY KEY (org_id, request_id, version),
                    FOREIGN KEY (org_id, request_id)
                        REFERENCES workflows(org_id, request_id) ON DELETE CASCADE
                );",
            )
            .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
        }
        Some(value) if value == SCHEMA_VERSION => {}
        Some(value) => {
            return Err(SqliteStoreError::VersionMismatch(format!(
                "unsupported schema version: {value}"
            )));
        }
    }
    tx.commit().map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    Ok(())
}

/// Prunes snapshots beyond the retention cap, keeping the newest.
fn enforce_retention(
    tx: &Transaction<'_>,
    org_id: &str,
    request_id: &str,
    max_versions: Option<u64>,
) -> Result<(), SqliteStoreError> {
    let Some(max_versions) = max_versions else {
        return Ok(());
    };
    let keep = i64::try_from(max_versions)
        .map_err(|_| SqliteStoreError::Invalid("max_versions too large".to_string()))?;
    tx.execute(
        "DELETE FROM workflow_versions WHERE org_id = ?1 AND request_id = ?2 AND version NOT IN \
         (SELECT version FROM workflow_versions WHERE org_id = ?1 AND request_id = ?2 ORDER BY \
         version DESC LIMIT ?3)",
        params![org_id, request_id, keep],
    )
    .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    Ok(())
}

/// Returns the current unix epoch in milliseconds.
fn unix_millis() -> i64 {
    let now = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default();
    i64::try_from(now.as_millis()).unwrap_or(i64::MAX)
}
