// crates/fixzit-access-core/src/core/identifiers.rs
// ============================================================================
// Module: Fixzit Access Identifiers
// Description: Canonical opaque identifiers for tenants, users, and approvals.
// Purpose: Provide strongly typed, serializable identifiers with stable wire forms.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! This module defines the identifiers used throughout the access core.
//! Identifiers are opaque strings on the wire. [`OrgId`] is the exception: it
//! can only be constructed through validation so an empty or whitespace-only
//! organization id is unrepresentable inside the core.
//!
//! Security posture: organization ids arrive from untrusted sessions and
//! request bodies; validation trims and rejects rather than guessing.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Maximum accepted organization id length in bytes, after trimming.
pub const MAX_ORG_ID_LENGTH: usize = 128;

// ============================================================================
// SECTION: Organization Identifier
// ============================================================================

/// Errors raised when an organization id fails validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrgIdError {
    /// The id was empty or whitespace-only.
    #[error("organization id is empty")]
    Empty,
    /// The id exceeded [`MAX_ORG_ID_LENGTH`].
    #[error("organization id exceeds {max} bytes (got {actual})")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
        /// Observed length.
        actual: usize,
    },
    /// The id contained control characters.
    #[error("organization id contains control characters")]
    ControlCharacter,
}

/// Canonical organization (tenant) identifier.
///
/// # Invariants
/// - Trimmed, non-empty, at most [`MAX_ORG_ID_LENGTH`] bytes.
/// - Contains no control characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct OrgId(String);

impl OrgId {
    /// Parses and canonicalizes an organization id.
    ///
    /// # Errors
    ///
    /// Returns [`OrgIdError`] when the trimmed input is empty, too long, or
    /// contains control characters.
    pub fn parse(raw: &str) -> Result<Self, OrgIdError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(OrgIdError::Empty);
        }
        if trimmed.len() > MAX_ORG_ID_LENGTH {
            return Err(OrgIdError::TooLong {
                max: MAX_ORG_ID_LENGTH,
                actual: trimmed.len(),
            });
        }
        if trimmed.chars().any(char::is_control) {
            return Err(OrgIdError::ControlCharacter);
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrgId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl TryFrom<String> for OrgId {
    type Error = OrgIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl TryFrom<&str> for OrgId {
    type Error = OrgIdError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<OrgId> for String {
    fn from(value: OrgId) -> Self {
        value.0
    }
}

// ============================================================================
// SECTION: Identifier Types
// ============================================================================

/// User identifier supplied by the session provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Creates a new user identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for UserId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for UserId {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

/// Property identifier a request targets.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PropertyId(String);

impl PropertyId {
    /// Creates a new property identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PropertyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for PropertyId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for PropertyId {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

/// Approval request identifier; keys a workflow within an organization.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(String);

impl RequestId {
    /// Creates a new request identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for RequestId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for RequestId {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

/// Vendor quotation identifier attached to an approval request.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuotationId(String);

impl QuotationId {
    /// Creates a new quotation identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for QuotationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for QuotationId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for QuotationId {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

/// Work order identifier attached to an approval request.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkOrderId(String);

impl WorkOrderId {
    /// Creates a new work order identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WorkOrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for WorkOrderId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for WorkOrderId {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

/// Approval policy name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PolicyName(String);

impl PolicyName {
    /// Creates a new policy name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PolicyName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for PolicyName {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for PolicyName {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}
