//! Warehouse models

use serde::{Deserialize, Serialize};

/// A physical warehouse
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Warehouse {
    #[serde(rename = "MaKho")]
    pub warehouse_id: String,
    #[serde(rename = "DiaChi", default)]
    pub address: Option<String>,
    #[serde(rename = "Loai")]
    pub kind: WarehouseKind,
    #[serde(rename = "SucChua", default)]
    pub capacity: Option<i64>,
}

/// Warehouse type
///
/// Sales are always served from a regular warehouse; defective stock is moved
/// into the defect warehouse by transfer.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum WarehouseKind {
    #[serde(rename = "Kho thường")]
    Regular,
    #[serde(rename = "Kho lỗi")]
    Defect,
}

impl std::fmt::Display for WarehouseKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WarehouseKind::Regular => write!(f, "Regular"),
            WarehouseKind::Defect => write!(f, "Defect"),
        }
    }
}

/// One batch row of a warehouse inventory snapshot
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InventoryRow {
    #[serde(rename = "MaSP")]
    pub product_id: String,
    #[serde(rename = "TenSP", default)]
    pub product_name: Option<String>,
    #[serde(rename = "MaLo")]
    pub batch_id: String,
    #[serde(rename = "MaVach", default)]
    pub barcode: Option<String>,
    #[serde(rename = "NSX", default)]
    pub manufacture_date: Option<chrono::NaiveDate>,
    #[serde(rename = "HSD", default)]
    pub expiry_date: Option<chrono::NaiveDate>,
    #[serde(rename = "SLTon")]
    pub quantity: i64,
}

/// Inventory snapshot of one warehouse
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventorySnapshot {
    #[serde(default)]
    pub warehouse: Option<Warehouse>,
    #[serde(default)]
    pub inventory: Vec<InventoryRow>,
}

impl InventorySnapshot {
    /// Total stock of a product across all of its batches
    pub fn product_stock(&self, product_id: &str) -> i64 {
        self.inventory
            .iter()
            .filter(|row| row.product_id == product_id)
            .map(|row| row.quantity)
            .sum()
    }

    pub fn row(&self, product_id: &str, batch_id: &str) -> Option<&InventoryRow> {
        self.inventory
            .iter()
            .find(|row| row.product_id == product_id && row.batch_id == batch_id)
    }
}
