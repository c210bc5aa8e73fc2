// crates/fixzit-access-store-sqlite/src/integrity.rs
// ============================================================================
// Module: Workflow Snapshot Integrity
// Description: RFC 8785 canonical JSON and SHA-256 digests for snapshots.
// Purpose: Give every stored workflow a stable, verifiable digest.
// Dependencies: serde, serde_jcs, sha2
// ============================================================================

//! ## Overview
//! Workflow snapshots are serialized with JSON canonicalization (RFC 8785)
//! so the same workflow always yields the same bytes. The store records a
//! SHA-256 digest of those bytes and recomputes it on every load.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Serialize;
use sha2::Digest;
use sha2::Sha256;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Label recorded next to SHA-256 digests.
pub const SHA256_LABEL: &str = "sha256";

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised while canonicalizing snapshots.
#[derive(Debug, Error)]
pub enum HashError {
    /// JSON canonicalization failed.
    #[error("failed to canonicalize json: {0}")]
    Canonicalization(String),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Returns canonical JSON bytes for a serializable value.
///
/// # Errors
///
/// Returns [`HashError::Canonicalization`] when serialization fails.
pub fn canonical_json_bytes<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, HashError> {
    serde_jcs::to_vec(value).map_err(|err| HashError::Canonicalization(err.to_string()))
}

/// Returns the lowercase hex SHA-256 digest of `bytes`.
#[must_use]
pub fn sha256_hex(bytes: &[u8]) -> String {
    const HEX: &[u8; 16] = b"0123456789abcdef";
    let digest = Sha256::digest(bytes);
    let mut out = String::with_capacity(digest.len() * 2);
    for byte in digest {
        out.push(char::from(HEX[usize::from(byte >> 4)]));
        out.push(char::from(HEX[usize::from(byte & 0x0f)]));
    }
    out
}
