// crates/fixzit-access-config/src/lib.rs
// ============================================================================
// Module: Fixzit Access Config Library
// Description: Canonical config model, validation, and runtime construction.
// Purpose: Single source of truth for fixzit-access.toml semantics.
// Dependencies: fixzit-access-core, fixzit-access-store-sqlite, serde, toml
// ============================================================================

//! ## Overview
//! `fixzit-access-config` defines the configuration model for the access
//! core. It validates fail-closed and builds the registry, approval policy
//! table, approver directory, store config, and audit sink from a single
//! `fixzit-access.toml`.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;
pub mod examples;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::*;
pub use examples::config_toml_example;
