//! Supplier order models
//!
//! Orders are drafted per product (no batch yet), submitted for approval and
//! then approved or rejected by a manager. Only orders that are not approved
//! may be deleted.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::cart::{LineCandidate, LineItem, SubmissionShape};
use crate::models::Product;
use crate::types::{money, Money};

/// A supplier from the directory
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Supplier {
    #[serde(rename = "Ten")]
    pub name: String,
    #[serde(rename = "PhuongThucLienHe", default)]
    pub contact: Option<String>,
}

/// Reorder suggestion for a product at or below its warning level
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderSuggestion {
    #[serde(flatten)]
    pub product: Product,
    #[serde(default)]
    pub current_stock: i64,
    #[serde(default)]
    pub warning_level: i64,
    #[serde(default)]
    pub suggested_quantity: i64,
    #[serde(default)]
    pub shortage: i64,
}

/// Approval state of a supplier order
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum OrderStatus {
    #[serde(rename = "Chờ duyệt")]
    Pending,
    #[serde(rename = "Đã duyệt")]
    Approved,
    #[serde(rename = "Từ chối")]
    Rejected,
}

impl OrderStatus {
    pub fn is_pending(&self) -> bool {
        matches!(self, OrderStatus::Pending)
    }

    /// Approved orders are kept for the record
    pub fn can_delete(&self) -> bool {
        !matches!(self, OrderStatus::Approved)
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderStatus::Pending => write!(f, "pending"),
            OrderStatus::Approved => write!(f, "approved"),
            OrderStatus::Rejected => write!(f, "rejected"),
        }
    }
}

/// Header fields of an order draft
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, PartialEq)]
pub struct OrderHeader {
    #[validate(length(min = 1, message = "Supplier is required"))]
    pub supplier: String,
    #[validate(length(max = 200, message = "Purpose is too long"))]
    pub purpose: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderLinePayload {
    #[serde(rename = "MaSP")]
    pub product_id: String,
    #[serde(rename = "SoLuongDat")]
    pub quantity: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SupplierOrderRequest {
    #[serde(rename = "TenNCC")]
    pub supplier: String,
    #[serde(rename = "MucDich")]
    pub purpose: String,
    pub items: Vec<OrderLinePayload>,
}

/// Supplier order draft; lines are keyed by product alone
#[derive(Debug, Clone, Copy, Default)]
pub struct SupplierOrderShape;

impl SubmissionShape for SupplierOrderShape {
    type Header = OrderHeader;
    type Payload = SupplierOrderRequest;

    const PRICED: bool = true;
    const CEILING: bool = false;

    fn assemble(header: &OrderHeader, lines: &[LineItem]) -> SupplierOrderRequest {
        SupplierOrderRequest {
            supplier: header.supplier.trim().to_string(),
            purpose: header.purpose.trim().to_string(),
            items: lines
                .iter()
                .map(|line| OrderLinePayload {
                    product_id: line.product_id.clone(),
                    quantity: line.quantity,
                })
                .collect(),
        }
    }

    fn validate_header(header: &OrderHeader) -> Result<(), validator::ValidationErrors> {
        header.validate()
    }
}

impl LineCandidate {
    /// Candidate for a product to order; no batch exists yet
    pub fn for_order(product: &Product, quantity: i64) -> Self {
        Self {
            product_id: product.product_id.clone(),
            product_name: Some(product.name.clone()),
            batch_id: String::new(),
            barcode: None,
            unit_price: Some(product.unit_price),
            quantity,
            unit_label: product.unit_label().to_string(),
            available_stock: None,
            manufacture_date: None,
            expiry_date: None,
        }
    }
}

/// One line of a stored order, priced at the current sale price
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SupplierOrderLine {
    #[serde(rename = "MaSP")]
    pub product_id: String,
    #[serde(rename = "TenSP", default)]
    pub product_name: Option<String>,
    #[serde(rename = "SoLuongDat")]
    pub quantity: i64,
    #[serde(rename = "DVT", default)]
    pub unit_label: Option<String>,
    #[serde(rename = "GiaBan", default, deserialize_with = "money::deserialize_option")]
    pub unit_price: Option<Money>,
    #[serde(rename = "GhiChu", default)]
    pub note: Option<String>,
    #[serde(rename = "ThanhTien", default, deserialize_with = "money::deserialize_option")]
    pub line_total: Option<Money>,
}

/// A supplier order with its approval trail
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SupplierOrder {
    #[serde(rename = "MaDonHang")]
    pub order_code: String,
    #[serde(rename = "TenNCC")]
    pub supplier: String,
    #[serde(rename = "MaNVTao", alias = "MaNV", default)]
    pub created_by: Option<String>,
    #[serde(rename = "TenNVTao", default)]
    pub created_by_name: Option<String>,
    #[serde(rename = "NgayDat", default)]
    pub ordered_at: Option<NaiveDateTime>,
    #[serde(rename = "MucDich", default)]
    pub purpose: Option<String>,
    #[serde(rename = "TrangThai")]
    pub status: OrderStatus,
    #[serde(rename = "MaNVDuyet", default)]
    pub approved_by: Option<String>,
    #[serde(rename = "TenNVDuyet", default)]
    pub approved_by_name: Option<String>,
    #[serde(rename = "NgayDuyet", default)]
    pub decided_at: Option<NaiveDateTime>,
    #[serde(rename = "LyDoTuChoi", default)]
    pub rejection_reason: Option<String>,
    #[serde(default)]
    pub items: Vec<SupplierOrderLine>,
    #[serde(default)]
    pub total_items: usize,
    #[serde(default)]
    pub total_quantity: i64,
    #[serde(default, deserialize_with = "money::deserialize_option")]
    pub total_amount: Option<Money>,
}

impl SupplierOrder {
    /// Quantity summed over the lines, for comparison with `total_quantity`
    pub fn line_quantity(&self) -> i64 {
        self.items.iter().map(|i| i.quantity).sum()
    }
}

/// Response of the order create call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderCreated {
    pub order: SupplierOrder,
}

/// Response of approve and reject
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderDecision {
    #[serde(rename = "MaDonHang")]
    pub order_code: String,
    #[serde(rename = "TrangThai")]
    pub status: OrderStatus,
    #[serde(rename = "MaNVDuyet", default)]
    pub approved_by: Option<String>,
    #[serde(rename = "LyDoTuChoi", default)]
    pub rejection_reason: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RejectOrderRequest {
    #[serde(rename = "LyDo")]
    pub reason: String,
}
