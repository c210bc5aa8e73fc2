// crates/fixzit-access-core/src/core/time.rs
// ============================================================================
// Module: Fixzit Access Time Model
// Description: Canonical timestamp representation for approval workflows.
// Purpose: Keep timeout evaluation deterministic by taking time from callers.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Approval timeouts are a domain concept evaluated lazily by callers. The
//! core never reads wall-clock time; hosts pass the current [`Timestamp`]
//! into routing, decision, and timeout operations.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Time Values
// ============================================================================

/// Milliseconds in one hour.
pub const MILLIS_PER_HOUR: u64 = 3_600_000;

/// Canonical timestamp in unix epoch milliseconds.
///
/// # Invariants
/// - Values are explicitly provided by callers; the core never reads wall-clock time.
/// - Monotonicity is a caller responsibility; elapsed time saturates at zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(i64);

impl Timestamp {
    /// Creates a timestamp from unix epoch milliseconds.
    #[must_use]
    pub const fn from_unix_millis(value: i64) -> Self {
        Self(value)
    }

    /// Returns the timestamp as unix epoch milliseconds.
    #[must_use]
    pub const fn as_unix_millis(self) -> i64 {
        self.0
    }

    /// Returns milliseconds elapsed from `earlier` to `self`, or zero when
    /// `earlier` is in the future.
    #[must_use]
    pub const fn millis_since(self, earlier: Self) -> u64 {
        let delta = self.0.saturating_sub(earlier.0);
        if delta <= 0 { 0 } else { delta.unsigned_abs() }
    }
}
