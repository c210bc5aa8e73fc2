// crates/fixzit-access-core/src/registry/builtin.rs
// ============================================================================
// Module: Fixzit Builtin Registry
// Description: Platform default role, sub-role, and plan tables.
// Purpose: Seed the registry with the entitlements shipped to every tenant.
// Dependencies: crate::core, crate::registry
// ============================================================================

//! ## Overview
//! The builtin tables. Plan gates are written explicitly for every
//! plan/submodule pair from each submodule's minimum plan, so the registry's
//! missing-gate default only matters after configuration clears an entry.

// ============================================================================
// SECTION: Imports
// ============================================================================

use super::AccessRegistry;
use super::PlanGateDefault;
use crate::core::Action;
use crate::core::ModuleKey;
use crate::core::Plan;
use crate::core::Role;
use crate::core::SubRole;
use crate::core::SubmoduleKey;

// ============================================================================
// SECTION: Action Sets
// ============================================================================

use crate::core::Action::Approve;
use crate::core::Action::Assign;
use crate::core::Action::Close;
use crate::core::Action::Comment;
use crate::core::Action::Create;
use crate::core::Action::Export;
use crate::core::Action::Pay;
use crate::core::Action::Post;
use crate::core::Action::Reject;
use crate::core::Action::Reopen;
use crate::core::Action::Schedule;
use crate::core::Action::Update;
use crate::core::Action::Upload;
use crate::core::Action::View;

/// Role action rows: `(role, submodule, actions)`.
type RoleRow = (Role, SubmoduleKey, &'static [Action]);

/// Sub-role action rows: `(sub_role, submodule, actions)`.
type SubRoleRow = (SubRole, SubmoduleKey, &'static [Action]);

/// Explicit role action grants. SUPER_ADMIN and ADMIN are granted every
/// action programmatically.
const ROLE_ACTIONS: &[RoleRow] = &[
    // CORPORATE_OWNER: view and export everywhere, plus owner approvals.
    (Role::CorporateOwner, SubmoduleKey::WoCreate, &[Create, Update, Approve, Comment]),
    (Role::CorporateOwner, SubmoduleKey::WoTrackAssign, &[Update, Approve, Comment]),
    (Role::CorporateOwner, SubmoduleKey::FinanceInvoices, &[Approve, Reject]),
    (Role::CorporateOwner, SubmoduleKey::FinancePayments, &[Approve]),
    (Role::CorporateOwner, SubmoduleKey::FinanceBudgets, &[Approve, Create, Update]),
    (Role::CorporateOwner, SubmoduleKey::PropLeases, &[Approve, Create, Update]),
    (Role::CorporateOwner, SubmoduleKey::ReportsCustom, &[Create]),
    // TEAM_MEMBER: baseline staff access, no finance.
    (Role::TeamMember, SubmoduleKey::DashboardOverview, &[View]),
    (Role::TeamMember, SubmoduleKey::WoCreate, &[View, Create, Comment]),
    (Role::TeamMember, SubmoduleKey::WoTrackAssign, &[View, Comment]),
    (Role::TeamMember, SubmoduleKey::WoServiceHistory, &[View]),
    (Role::TeamMember, SubmoduleKey::PropList, &[View]),
    (Role::TeamMember, SubmoduleKey::PropUnits, &[View]),
    (Role::TeamMember, SubmoduleKey::SupportTickets, &[View, Create, Comment]),
    (Role::TeamMember, SubmoduleKey::ReportsStandard, &[View]),
    (Role::TeamMember, SubmoduleKey::HrDirectory, &[View]),
    // TECHNICIAN
    (Role::Technician, SubmoduleKey::DashboardOverview, &[View]),
    (Role::Technician, SubmoduleKey::WoCreate, &[View, Create, Comment]),
    (Role::Technician, SubmoduleKey::WoTrackAssign, &[View, Update, Comment, Close, Upload]),
    (Role::Technician, SubmoduleKey::WoPm, &[View, Update]),
    (Role::Technician, SubmoduleKey::WoServiceHistory, &[View]),
    (Role::Technician, SubmoduleKey::SupportTickets, &[View, Create, Comment]),
    // PROPERTY_MANAGER
    (Role::PropertyManager, SubmoduleKey::DashboardOverview, &[View]),
    (Role::PropertyManager, SubmoduleKey::WoCreate, &[View, Create, Update, Comment, Upload]),
    (
        Role::PropertyManager,
        SubmoduleKey::WoTrackAssign,
        &[View, Assign, Update, Comment, Close, Reopen, Schedule],
    ),
    (Role::PropertyManager, SubmoduleKey::WoPm, &[View, Create, Update, Schedule]),
    (Role::PropertyManager, SubmoduleKey::WoServiceHistory, &[View, Export]),
    (Role::PropertyManager, SubmoduleKey::PropList, &[View, Update]),
    (Role::PropertyManager, SubmoduleKey::PropUnits, &[View, Create, Update]),
    (Role::PropertyManager, SubmoduleKey::PropLeases, &[View, Create, Update]),
    (Role::PropertyManager, SubmoduleKey::PropInspections, &[View, Create, Update, Schedule]),
    (Role::PropertyManager, SubmoduleKey::MarketplaceVendors, &[View]),
    (Role::PropertyManager, SubmoduleKey::MarketplaceRfq, &[View, Create]),
    (Role::PropertyManager, SubmoduleKey::SupportTickets, &[View, Create, Comment, Close]),
    (Role::PropertyManager, SubmoduleKey::ReportsStandard, &[View, Export]),
    // TENANT
    (Role::Tenant, SubmoduleKey::DashboardOverview, &[View]),
    (Role::Tenant, SubmoduleKey::WoCreate, &[View, Create, Comment, Upload]),
    (Role::Tenant, SubmoduleKey::WoTrackAssign, &[View, Comment]),
    (Role::Tenant, SubmoduleKey::PropList, &[View]),
    (Role::Tenant, SubmoduleKey::PropUnits, &[View]),
    (Role::Tenant, SubmoduleKey::PropLeases, &[View]),
    (Role::Tenant, SubmoduleKey::SupportTickets, &[View, Create, Comment]),
    // VENDOR
    (Role::Vendor, SubmoduleKey::DashboardOverview, &[View]),
    (Role::Vendor, SubmoduleKey::WoTrackAssign, &[View, Update, Comment, Upload, Close]),
    (Role::Vendor, SubmoduleKey::MarketplaceVendors, &[View, Update]),
    (Role::Vendor, SubmoduleKey::MarketplaceRfq, &[View, Create, Update]),
    (Role::Vendor, SubmoduleKey::SupportTickets, &[View, Create, Comment]),
    // GUEST
    (Role::Guest, SubmoduleKey::DashboardOverview, &[View]),
];

/// Sub-role action grants; an entry overrides the parent role for that submodule.
const SUB_ROLE_ACTIONS: &[SubRoleRow] = &[
    (
        SubRole::FinanceOfficer,
        SubmoduleKey::FinanceInvoices,
        &[View, Create, Update, Approve, Export, Post],
    ),
    (SubRole::FinanceOfficer, SubmoduleKey::FinancePayments, &[View, Create, Approve, Pay, Export]),
    (
        SubRole::FinanceOfficer,
        SubmoduleKey::FinanceExpenses,
        &[View, Create, Update, Approve, Export],
    ),
    (SubRole::FinanceOfficer, SubmoduleKey::FinanceBudgets, &[View, Create, Update, Export]),
    (SubRole::FinanceOfficer, SubmoduleKey::ReportsStandard, &[View, Export]),
    (SubRole::FinanceOfficer, SubmoduleKey::ReportsCustom, &[View, Create, Export]),
    (SubRole::HrOfficer, SubmoduleKey::HrDirectory, &[View, Create, Update, Export]),
    (SubRole::HrOfficer, SubmoduleKey::HrPayroll, &[View, Create, Update, Approve, Export]),
    (SubRole::HrOfficer, SubmoduleKey::ReportsStandard, &[View, Export]),
    (
        SubRole::SupportAgent,
        SubmoduleKey::SupportTickets,
        &[View, Create, Update, Assign, Comment, Close, Reopen],
    ),
    (SubRole::SupportAgent, SubmoduleKey::WoCreate, &[View, Create, Comment]),
    (SubRole::SupportAgent, SubmoduleKey::WoTrackAssign, &[View, Update, Comment]),
    (SubRole::SupportAgent, SubmoduleKey::WoServiceHistory, &[View]),
    (SubRole::OperationsManager, SubmoduleKey::WoCreate, &[View, Create, Update, Comment]),
    (
        SubRole::OperationsManager,
        SubmoduleKey::WoTrackAssign,
        &[View, Assign, Update, Comment, Close, Reopen, Schedule],
    ),
    (SubRole::OperationsManager, SubmoduleKey::WoPm, &[View, Create, Update, Schedule]),
    (SubRole::OperationsManager, SubmoduleKey::WoServiceHistory, &[View, Export]),
    (SubRole::OperationsManager, SubmoduleKey::PropList, &[View]),
    (SubRole::OperationsManager, SubmoduleKey::PropUnits, &[View]),
    (
        SubRole::OperationsManager,
        SubmoduleKey::PropInspections,
        &[View, Create, Update, Schedule],
    ),
    (SubRole::OperationsManager, SubmoduleKey::MarketplaceVendors, &[View]),
    (SubRole::OperationsManager, SubmoduleKey::MarketplaceRfq, &[View, Create]),
    (SubRole::OperationsManager, SubmoduleKey::ReportsStandard, &[View, Export]),
];

// ============================================================================
// SECTION: Module Lists
// ============================================================================

/// Returns the builtin module list for a role; `None` leaves the default.
const fn role_modules(role: Role) -> Option<&'static [ModuleKey]> {
    use ModuleKey::Compliance;
    use ModuleKey::Dashboard;
    use ModuleKey::Finance;
    use ModuleKey::Hr;
    use ModuleKey::Marketplace;
    use ModuleKey::Properties;
    use ModuleKey::Reports;
    use ModuleKey::Support;
    use ModuleKey::WorkOrders;

    match role {
        Role::SuperAdmin | Role::Admin => Some(&ModuleKey::ALL),
        Role::CorporateOwner => Some(&[
            Dashboard,
            WorkOrders,
            Properties,
            Finance,
            Hr,
            Marketplace,
            Support,
            Compliance,
            Reports,
        ]),
        Role::TeamMember => {
            Some(&[Dashboard, WorkOrders, Properties, Finance, Hr, Support, Reports])
        }
        Role::Technician => Some(&[Dashboard, WorkOrders, Support]),
        Role::PropertyManager => {
            Some(&[Dashboard, WorkOrders, Properties, Marketplace, Support, Reports])
        }
        Role::Tenant => Some(&[Dashboard, WorkOrders, Properties, Support]),
        Role::Vendor => Some(&[Dashboard, WorkOrders, Marketplace, Support]),
        Role::Guest => None,
    }
}

/// Returns the builtin module list for a sub-role.
const fn sub_role_modules(sub_role: SubRole) -> &'static [ModuleKey] {
    match sub_role {
        SubRole::FinanceOfficer => &[ModuleKey::Dashboard, ModuleKey::Finance, ModuleKey::Reports],
        SubRole::HrOfficer => &[ModuleKey::Dashboard, ModuleKey::Hr, ModuleKey::Reports],
        SubRole::SupportAgent => &[ModuleKey::Dashboard, ModuleKey::Support, ModuleKey::WorkOrders],
        SubRole::OperationsManager => &[
            ModuleKey::Dashboard,
            ModuleKey::WorkOrders,
            ModuleKey::Properties,
            ModuleKey::Marketplace,
            ModuleKey::Reports,
        ],
    }
}

// ============================================================================
// SECTION: Plan Gates
// ============================================================================

/// Returns the lowest plan that unlocks a submodule.
const fn minimum_plan(submodule: SubmoduleKey) -> Plan {
    match submodule {
        SubmoduleKey::DashboardOverview
        | SubmoduleKey::WoCreate
        | SubmoduleKey::WoTrackAssign
        | SubmoduleKey::PropList
        | SubmoduleKey::PropUnits
        | SubmoduleKey::FinanceInvoices
        | SubmoduleKey::SupportTickets
        | SubmoduleKey::ReportsStandard
        | SubmoduleKey::AdminUsers
        | SubmoduleKey::AdminSettings
        | SubmoduleKey::HrDirectory => Plan::Starter,
        SubmoduleKey::WoPm
        | SubmoduleKey::WoServiceHistory
        | SubmoduleKey::PropLeases
        | SubmoduleKey::PropInspections
        | SubmoduleKey::FinancePayments
        | SubmoduleKey::FinanceExpenses
        | SubmoduleKey::MarketplaceVendors => Plan::Standard,
        SubmoduleKey::FinanceBudgets
        | SubmoduleKey::HrPayroll
        | SubmoduleKey::MarketplaceRfq
        | SubmoduleKey::ComplianceContracts => Plan::Pro,
        SubmoduleKey::ReportsCustom => Plan::Enterprise,
    }
}

// ============================================================================
// SECTION: Assembly
// ============================================================================

/// Builds the builtin registry.
pub(super) fn registry() -> AccessRegistry {
    let mut registry = AccessRegistry::empty(PlanGateDefault::Deny);

    for role in Role::ALL {
        if let Some(modules) = role_modules(role) {
            registry.set_role_modules(role, modules.to_vec());
        }
    }
    for sub_role in SubRole::ALL {
        registry.set_sub_role_modules(sub_role, sub_role_modules(sub_role).to_vec());
    }

    for plan in Plan::ALL {
        for submodule in SubmoduleKey::ALL {
            registry.set_plan_gate(plan, submodule, plan >= minimum_plan(submodule));
        }
    }

    for submodule in SubmoduleKey::ALL {
        registry.grant_role_actions(Role::SuperAdmin, submodule, &Action::ALL);
        registry.grant_role_actions(Role::Admin, submodule, &Action::ALL);
        if submodule.module() != ModuleKey::Administration {
            registry.grant_role_actions(Role::CorporateOwner, submodule, &[View, Export]);
        }
    }
    for (role, submodule, actions) in ROLE_ACTIONS {
        registry.grant_role_actions(*role, *submodule, actions);
    }
    for (sub_role, submodule, actions) in SUB_ROLE_ACTIONS {
        registry.grant_sub_role_actions(*sub_role, *submodule, actions);
    }

    registry.set_org_scoped(SubmoduleKey::DashboardOverview, false);
    registry
}
