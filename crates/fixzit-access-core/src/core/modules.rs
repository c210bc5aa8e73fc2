// crates/fixzit-access-core/src/core/modules.rs
// ============================================================================
// Module: Fixzit Access Modules
// Description: Module, submodule, and action identifiers.
// Purpose: Provide the closed universes the capability resolver reasons over.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Modules are coarse functional areas; submodules are the fine-grained,
//! plan-gated features nested under them. [`Action`] is the fixed verb
//! universe that permission tables map onto submodules.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Modules
// ============================================================================

/// Coarse functional area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ModuleKey {
    /// Landing dashboard.
    Dashboard,
    /// Work order management.
    WorkOrders,
    /// Property portfolio.
    Properties,
    /// Finance.
    Finance,
    /// Human resources.
    Hr,
    /// Vendor marketplace.
    Marketplace,
    /// Customer support.
    Support,
    /// Compliance and contracts.
    Compliance,
    /// Reporting.
    Reports,
    /// Organization administration.
    Administration,
}

impl ModuleKey {
    /// Every module in declaration order.
    pub const ALL: [Self; 10] = [
        Self::Dashboard,
        Self::WorkOrders,
        Self::Properties,
        Self::Finance,
        Self::Hr,
        Self::Marketplace,
        Self::Support,
        Self::Compliance,
        Self::Reports,
        Self::Administration,
    ];

    /// Returns the canonical wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Dashboard => "DASHBOARD",
            Self::WorkOrders => "WORK_ORDERS",
            Self::Properties => "PROPERTIES",
            Self::Finance => "FINANCE",
            Self::Hr => "HR",
            Self::Marketplace => "MARKETPLACE",
            Self::Support => "SUPPORT",
            Self::Compliance => "COMPLIANCE",
            Self::Reports => "REPORTS",
            Self::Administration => "ADMINISTRATION",
        }
    }

    /// Parses a module name (case-insensitive, trimmed).
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let key = raw.trim().to_ascii_uppercase();
        Self::ALL.into_iter().find(|module| module.as_str() == key)
    }
}

impl fmt::Display for ModuleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// SECTION: Submodules
// ============================================================================

/// Fine-grained, plan-gated feature area.
///
/// # Invariants
/// - Every submodule has exactly one parent [`ModuleKey`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubmoduleKey {
    /// Dashboard overview widgets.
    DashboardOverview,
    /// Create work orders.
    WoCreate,
    /// Track and assign work orders.
    WoTrackAssign,
    /// Preventive maintenance schedules.
    WoPm,
    /// Service history.
    WoServiceHistory,
    /// Property list.
    PropList,
    /// Units within properties.
    PropUnits,
    /// Leases.
    PropLeases,
    /// Inspections.
    PropInspections,
    /// Invoices.
    FinanceInvoices,
    /// Payments.
    FinancePayments,
    /// Expenses.
    FinanceExpenses,
    /// Budgets.
    FinanceBudgets,
    /// Employee directory.
    HrDirectory,
    /// Payroll.
    HrPayroll,
    /// Vendor directory.
    MarketplaceVendors,
    /// Requests for quotation.
    MarketplaceRfq,
    /// Support tickets.
    SupportTickets,
    /// Service contracts.
    ComplianceContracts,
    /// Standard reports.
    ReportsStandard,
    /// Custom report builder.
    ReportsCustom,
    /// User administration.
    AdminUsers,
    /// Organization settings.
    AdminSettings,
}

impl SubmoduleKey {
    /// Every submodule in declaration order.
    pub const ALL: [Self; 23] = [
        Self::DashboardOverview,
        Self::WoCreate,
        Self::WoTrackAssign,
        Self::WoPm,
        Self::WoServiceHistory,
        Self::PropList,
        Self::PropUnits,
        Self::PropLeases,
        Self::PropInspections,
        Self::FinanceInvoices,
        Self::FinancePayments,
        Self::FinanceExpenses,
        Self::FinanceBudgets,
        Self::HrDirectory,
        Self::HrPayroll,
        Self::MarketplaceVendors,
        Self::MarketplaceRfq,
        Self::SupportTickets,
        Self::ComplianceContracts,
        Self::ReportsStandard,
        Self::ReportsCustom,
        Self::AdminUsers,
        Self::AdminSettings,
    ];

    /// Returns the canonical wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DashboardOverview => "DASHBOARD_OVERVIEW",
            Self::WoCreate => "WO_CREATE",
            Self::WoTrackAssign => "WO_TRACK_ASSIGN",
            Self::WoPm => "WO_PM",
            Self::WoServiceHistory => "WO_SERVICE_HISTORY",
            Self::PropList => "PROP_LIST",
            Self::PropUnits => "PROP_UNITS",
            Self::PropLeases => "PROP_LEASES",
            Self::PropInspections => "PROP_INSPECTIONS",
            Self::FinanceInvoices => "FINANCE_INVOICES",
            Self::FinancePayments => "FINANCE_PAYMENTS",
            Self::FinanceExpenses => "FINANCE_EXPENSES",
            Self::FinanceBudgets => "FINANCE_BUDGETS",
            Self::HrDirectory => "HR_DIRECTORY",
            Self::HrPayroll => "HR_PAYROLL",
            Self::MarketplaceVendors => "MARKETPLACE_VENDORS",
            Self::MarketplaceRfq => "MARKETPLACE_RFQ",
            Self::SupportTickets => "SUPPORT_TICKETS",
            Self::ComplianceContracts => "COMPLIANCE_CONTRACTS",
            Self::ReportsStandard => "REPORTS_STANDARD",
            Self::ReportsCustom => "REPORTS_CUSTOM",
            Self::AdminUsers => "ADMIN_USERS",
            Self::AdminSettings => "ADMIN_SETTINGS",
        }
    }

    /// Returns the parent module.
    #[must_use]
    pub const fn module(self) -> ModuleKey {
        match self {
            Self::DashboardOverview => ModuleKey::Dashboard,
            Self::WoCreate | Self::WoTrackAssign | Self::WoPm | Self::WoServiceHistory => {
                ModuleKey::WorkOrders
            }
            Self::PropList | Self::PropUnits | Self::PropLeases | Self::PropInspections => {
                ModuleKey::Properties
            }
            Self::FinanceInvoices
            | Self::FinancePayments
            | Self::FinanceExpenses
            | Self::FinanceBudgets => ModuleKey::Finance,
            Self::HrDirectory | Self::HrPayroll => ModuleKey::Hr,
            Self::MarketplaceVendors | Self::MarketplaceRfq => ModuleKey::Marketplace,
            Self::SupportTickets => ModuleKey::Support,
            Self::ComplianceContracts => ModuleKey::Compliance,
            Self::ReportsStandard | Self::ReportsCustom => ModuleKey::Reports,
            Self::AdminUsers | Self::AdminSettings => ModuleKey::Administration,
        }
    }

    /// Parses a submodule name (case-insensitive, trimmed).
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let key = raw.trim().to_ascii_uppercase();
        Self::ALL.into_iter().find(|submodule| submodule.as_str() == key)
    }
}

impl fmt::Display for SubmoduleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// SECTION: Actions
// ============================================================================

/// Fixed universe of action verbs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Read access.
    View,
    /// Create records.
    Create,
    /// Modify records.
    Update,
    /// Delete records.
    Delete,
    /// Assign records to users.
    Assign,
    /// Approve a pending item.
    Approve,
    /// Reject a pending item.
    Reject,
    /// Comment on a record.
    Comment,
    /// Close a record.
    Close,
    /// Reopen a closed record.
    Reopen,
    /// Schedule work.
    Schedule,
    /// Export data.
    Export,
    /// Import data.
    Import,
    /// Upload attachments.
    Upload,
    /// Share records externally.
    Share,
    /// Execute a payment.
    Pay,
    /// Post to the ledger.
    Post,
    /// Invite users.
    Invite,
    /// Change settings.
    Configure,
    /// Full management rights.
    Manage,
}

impl Action {
    /// Every action in declaration order.
    pub const ALL: [Self; 20] = [
        Self::View,
        Self::Create,
        Self::Update,
        Self::Delete,
        Self::Assign,
        Self::Approve,
        Self::Reject,
        Self::Comment,
        Self::Close,
        Self::Reopen,
        Self::Schedule,
        Self::Export,
        Self::Import,
        Self::Upload,
        Self::Share,
        Self::Pay,
        Self::Post,
        Self::Invite,
        Self::Configure,
        Self::Manage,
    ];

    /// Returns the canonical wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::View => "view",
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::Assign => "assign",
            Self::Approve => "approve",
            Self::Reject => "reject",
            Self::Comment => "comment",
            Self::Close => "close",
            Self::Reopen => "reopen",
            Self::Schedule => "schedule",
            Self::Export => "export",
            Self::Import => "import",
            Self::Upload => "upload",
            Self::Share => "share",
            Self::Pay => "pay",
            Self::Post => "post",
            Self::Invite => "invite",
            Self::Configure => "configure",
            Self::Manage => "manage",
        }
    }

    /// Parses an action verb (case-insensitive, trimmed).
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let key = raw.trim().to_ascii_lowercase();
        Self::ALL.into_iter().find(|action| action.as_str() == key)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
