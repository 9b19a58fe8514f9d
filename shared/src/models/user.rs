//! Account and permission models
//!
//! The backend describes an account with two fields: `Type` (warehouse staff
//! or cashier) and `Role` (manager or clerk, meaningful for staff only). They
//! are folded into one [`AccountKind`] here, and everything the UI may show
//! is derived from it by [`capabilities`].

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Wire value of the `Type` field for warehouse staff
pub const TYPE_WAREHOUSE_STAFF: &str = "NhanVienKho";
/// Wire value of the `Type` field (and cashier `Role`) for cashiers
pub const TYPE_CASHIER: &str = "ThuNgan";
/// Wire value of the manager role
pub const ROLE_MANAGER: &str = "Quản lý";
/// Wire value of the clerk role
pub const ROLE_CLERK: &str = "Nhân viên";

/// Hierarchical role of warehouse staff
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum StaffRole {
    Manager,
    Clerk,
}

/// The single permission axis of an account
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case", tag = "kind", content = "role")]
pub enum AccountKind {
    Staff(StaffRole),
    Cashier,
}

impl AccountKind {
    /// Resolve the backend's `Type`/`Role` pair
    ///
    /// `Type` decides the axis; `Role` is only consulted for staff.
    pub fn from_wire(account_type: &str, role: Option<&str>) -> Result<Self, DomainError> {
        match account_type {
            TYPE_CASHIER => Ok(AccountKind::Cashier),
            TYPE_WAREHOUSE_STAFF => match role {
                Some(ROLE_MANAGER) => Ok(AccountKind::Staff(StaffRole::Manager)),
                Some(ROLE_CLERK) => Ok(AccountKind::Staff(StaffRole::Clerk)),
                _ => Err(DomainError::validation("Role", "Unknown warehouse staff role")),
            },
            _ => Err(DomainError::validation("Type", "Unknown account type")),
        }
    }

    /// The `Type` value sent with login credentials
    pub fn wire_type(&self) -> &'static str {
        match self {
            AccountKind::Staff(_) => TYPE_WAREHOUSE_STAFF,
            AccountKind::Cashier => TYPE_CASHIER,
        }
    }

    pub fn is_manager(&self) -> bool {
        matches!(self, AccountKind::Staff(StaffRole::Manager))
    }
}

impl std::fmt::Display for AccountKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AccountKind::Staff(StaffRole::Manager) => write!(f, "Warehouse manager"),
            AccountKind::Staff(StaffRole::Clerk) => write!(f, "Warehouse clerk"),
            AccountKind::Cashier => write!(f, "Cashier"),
        }
    }
}

/// User record as returned by `/auth/login` and `/auth/me`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountRecord {
    #[serde(rename = "MaNV")]
    pub account_id: String,
    #[serde(rename = "Ten")]
    pub name: String,
    #[serde(rename = "TaiKhoanNV", default)]
    pub username: Option<String>,
    #[serde(rename = "Role", default)]
    pub role: Option<String>,
    #[serde(rename = "Type")]
    pub account_type: String,
}

/// A resolved account
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Account {
    pub account_id: String,
    pub name: String,
    pub username: Option<String>,
    pub kind: AccountKind,
}

impl TryFrom<AccountRecord> for Account {
    type Error = DomainError;

    fn try_from(record: AccountRecord) -> Result<Self, Self::Error> {
        let kind = AccountKind::from_wire(&record.account_type, record.role.as_deref())?;
        Ok(Account {
            account_id: record.account_id,
            name: record.name,
            username: record.username,
            kind,
        })
    }
}

/// Something the UI lets an account do
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    Dashboard,
    Products,
    Reports,
    SupplierOrders,
    /// Approve, reject or delete supplier orders
    ApproveOrders,
    WarehouseImport,
    WarehouseExport,
    WarehouseTransfer,
    InventoryCount,
    InventoryAdjustment,
    Discard,
    PointOfSale,
    Returns,
    DeleteMovements,
}

impl Capability {
    pub fn tag(&self) -> &'static str {
        match self {
            Capability::Dashboard => "dashboard",
            Capability::Products => "products",
            Capability::Reports => "reports",
            Capability::SupplierOrders => "supplier_orders",
            Capability::ApproveOrders => "approve_orders",
            Capability::WarehouseImport => "warehouse_import",
            Capability::WarehouseExport => "warehouse_export",
            Capability::WarehouseTransfer => "warehouse_transfer",
            Capability::InventoryCount => "inventory_count",
            Capability::InventoryAdjustment => "inventory_adjustment",
            Capability::Discard => "discard",
            Capability::PointOfSale => "point_of_sale",
            Capability::Returns => "returns",
            Capability::DeleteMovements => "delete_movements",
        }
    }
}

const WAREHOUSE_CAPABILITIES: &[Capability] = &[
    Capability::Dashboard,
    Capability::SupplierOrders,
    Capability::WarehouseImport,
    Capability::WarehouseExport,
    Capability::WarehouseTransfer,
    Capability::InventoryCount,
    Capability::InventoryAdjustment,
    Capability::Discard,
];

const MANAGER_EXTRA_CAPABILITIES: &[Capability] = &[
    Capability::Products,
    Capability::Reports,
    Capability::ApproveOrders,
    Capability::DeleteMovements,
];

const CASHIER_CAPABILITIES: &[Capability] = &[
    Capability::Dashboard,
    Capability::PointOfSale,
    Capability::Returns,
    Capability::Reports,
];

/// Everything an account of the given kind may see and do
pub fn capabilities(kind: AccountKind) -> BTreeSet<Capability> {
    match kind {
        AccountKind::Staff(StaffRole::Clerk) => WAREHOUSE_CAPABILITIES.iter().copied().collect(),
        AccountKind::Staff(StaffRole::Manager) => WAREHOUSE_CAPABILITIES
            .iter()
            .chain(MANAGER_EXTRA_CAPABILITIES)
            .copied()
            .collect(),
        AccountKind::Cashier => CASHIER_CAPABILITIES.iter().copied().collect(),
    }
}

/// Capability tags in a stable order, for navigation menus
pub fn capability_tags(kind: AccountKind) -> Vec<&'static str> {
    capabilities(kind).iter().map(Capability::tag).collect()
}
