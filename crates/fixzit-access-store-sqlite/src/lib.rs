// crates/fixzit-access-store-sqlite/src/lib.rs
// ============================================================================
// Module: SQLite Workflow Store
// Description: Durable WorkflowStore backend using SQLite WAL.
// Purpose: Persist approval workflows across process restarts.
// Dependencies: fixzit-access-core, rusqlite
// ============================================================================

//! ## Overview
//! This crate provides a SQLite-backed [`WorkflowStore`] implementation.
//! Every save writes a canonical JSON snapshot into an append-only version
//! table and moves the workflow's head pointer under an optimistic version
//! check. Loads verify the stored digest and fail closed on corruption.
//!
//! [`WorkflowStore`]: fixzit_access_core::WorkflowStore

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod integrity;
pub mod store;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use integrity::HashError;
pub use integrity::canonical_json_bytes;
pub use integrity::sha256_hex;
pub use store::MAX_WORKFLOW_BYTES;
pub use store::SqliteStoreConfig;
pub use store::SqliteStoreError;
pub use store::SqliteStoreMode;
pub use store::SqliteSyncMode;
pub use store::SqliteWorkflowStore;
