// crates/fixzit-access-core/src/core/plans.rs
// ============================================================================
// Module: Fixzit Access Plans
// Description: Subscription plan lattices and feature tiers.
// Purpose: Model the FM plan lattice and the subscription tier lattice apart.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Two plan lattices coexist:
//! - [`Plan`] (`STARTER < STANDARD < PRO < ENTERPRISE`) drives facilities
//!   submodule gates in the registry.
//! - [`SubscriptionTier`] (`BASIC=1 < STANDARD=2 < PREMIUM=3 < ENTERPRISE=4`)
//!   drives [`SubscriptionFeature`] gating through a minimum-tier table.
//!
//! They are kept as distinct types. [`Plan::from_subscription_tier`] is the
//! one explicit migration path between them.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: FM Plans
// ============================================================================

/// Facilities management subscription plan.
///
/// # Invariants
/// - Ordering follows declaration order: `Starter < Standard < Pro < Enterprise`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Plan {
    /// Entry plan.
    Starter,
    /// Standard plan.
    Standard,
    /// Professional plan.
    Pro,
    /// Enterprise plan.
    Enterprise,
}

impl Plan {
    /// Every plan in ascending order.
    pub const ALL: [Self; 4] = [Self::Starter, Self::Standard, Self::Pro, Self::Enterprise];

    /// Returns the canonical wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Starter => "STARTER",
            Self::Standard => "STANDARD",
            Self::Pro => "PRO",
            Self::Enterprise => "ENTERPRISE",
        }
    }

    /// Maps a subscription tier onto the FM plan lattice.
    ///
    /// `BASIC` maps to `STARTER` and `PREMIUM` to `PRO`; the shared names map
    /// to themselves.
    #[must_use]
    pub const fn from_subscription_tier(tier: SubscriptionTier) -> Self {
        match tier {
            SubscriptionTier::Basic => Self::Starter,
            SubscriptionTier::Standard => Self::Standard,
            SubscriptionTier::Premium => Self::Pro,
            SubscriptionTier::Enterprise => Self::Enterprise,
        }
    }
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalizes a raw plan string. Unknown or blank input returns `None`.
#[must_use]
pub fn normalize_plan(raw: Option<&str>) -> Option<Plan> {
    let key = raw?.trim().to_ascii_uppercase();
    Plan::ALL.into_iter().find(|plan| plan.as_str() == key)
}

// ============================================================================
// SECTION: Subscription Tiers
// ============================================================================

/// Subscription billing tier.
///
/// # Invariants
/// - [`SubscriptionTier::level`] is strictly increasing in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubscriptionTier {
    /// Basic tier (level 1).
    Basic,
    /// Standard tier (level 2).
    Standard,
    /// Premium tier (level 3).
    Premium,
    /// Enterprise tier (level 4).
    Enterprise,
}

impl SubscriptionTier {
    /// Every tier in ascending order.
    pub const ALL: [Self; 4] = [Self::Basic, Self::Standard, Self::Premium, Self::Enterprise];

    /// Returns the numeric tier level.
    #[must_use]
    pub const fn level(self) -> u8 {
        match self {
            Self::Basic => 1,
            Self::Standard => 2,
            Self::Premium => 3,
            Self::Enterprise => 4,
        }
    }

    /// Returns the canonical wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Basic => "BASIC",
            Self::Standard => "STANDARD",
            Self::Premium => "PREMIUM",
            Self::Enterprise => "ENTERPRISE",
        }
    }

    /// Parses a raw tier string. Unknown or blank input returns `None`.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let key = raw.trim().to_ascii_uppercase();
        Self::ALL.into_iter().find(|tier| tier.as_str() == key)
    }
}

impl fmt::Display for SubscriptionTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Features gated by subscription tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionFeature {
    /// Work order management.
    WorkOrders,
    /// Property portfolio management.
    PropertyPortfolio,
    /// Preventive maintenance scheduling.
    PreventiveMaintenance,
    /// Vendor marketplace.
    VendorMarketplace,
    /// Finance suite.
    FinanceSuite,
    /// HR suite.
    HrSuite,
    /// Advanced analytics reports.
    AdvancedReports,
    /// Public API access.
    ApiAccess,
    /// Single sign-on integration.
    SsoIntegration,
    /// Custom branding.
    CustomBranding,
    /// Audit log export.
    AuditExport,
}

impl SubscriptionFeature {
    /// Every feature in declaration order.
    pub const ALL: [Self; 11] = [
        Self::WorkOrders,
        Self::PropertyPortfolio,
        Self::PreventiveMaintenance,
        Self::VendorMarketplace,
        Self::FinanceSuite,
        Self::HrSuite,
        Self::AdvancedReports,
        Self::ApiAccess,
        Self::SsoIntegration,
        Self::CustomBranding,
        Self::AuditExport,
    ];

    /// Returns the minimum tier that unlocks this feature.
    #[must_use]
    pub const fn minimum_tier(self) -> SubscriptionTier {
        match self {
            Self::WorkOrders | Self::PropertyPortfolio => SubscriptionTier::Basic,
            Self::PreventiveMaintenance | Self::VendorMarketplace | Self::FinanceSuite => {
                SubscriptionTier::Standard
            }
            Self::HrSuite | Self::AdvancedReports | Self::ApiAccess => SubscriptionTier::Premium,
            Self::SsoIntegration | Self::CustomBranding | Self::AuditExport => {
                SubscriptionTier::Enterprise
            }
        }
    }
}

/// Returns true when `tier` meets the feature's minimum tier level.
#[must_use]
pub const fn tier_allows(tier: SubscriptionTier, feature: SubscriptionFeature) -> bool {
    tier.level() >= feature.minimum_tier().level()
}
