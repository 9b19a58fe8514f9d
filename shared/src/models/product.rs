//! Product catalogue models

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::types::{money, Money};

/// A product in the catalogue
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    #[serde(rename = "MaSP")]
    pub product_id: String,
    #[serde(rename = "TenSP")]
    pub name: String,
    #[serde(rename = "LoaiSP", default)]
    pub category: Option<String>,
    #[serde(rename = "TrangThai", default)]
    pub status: Option<ProductStatus>,
    /// Unit of measure label (e.g. "Hộp", "Chai")
    #[serde(rename = "DVT", default)]
    pub unit_label: Option<String>,
    #[serde(rename = "GiaBan", deserialize_with = "money::deserialize")]
    pub unit_price: Money,
    /// Reorder threshold used by the low-stock report
    #[serde(rename = "MucCanhBaoDatHang", default)]
    pub reorder_level: Option<i64>,
}

impl Product {
    pub fn unit_label(&self) -> &str {
        self.unit_label.as_deref().unwrap_or("")
    }
}

/// Sale status of a product
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ProductStatus {
    #[serde(rename = "Còn hàng")]
    InStock,
    #[serde(rename = "Hết hàng")]
    OutOfStock,
    #[serde(rename = "Ngừng kinh doanh")]
    Discontinued,
}

/// Query parameters for product search and listing
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProductQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub page: u32,
    pub per_page: u32,
}

impl ProductQuery {
    pub fn search(text: &str) -> Self {
        Self {
            search: Some(text.trim().to_string()),
            category: None,
            page: 1,
            per_page: 10,
        }
    }
}

/// Product with its total stock, as returned by the low-stock report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LowStockProduct {
    #[serde(flatten)]
    pub product: Product,
    #[serde(rename = "current_stock", default)]
    pub total_stock: i64,
    #[serde(default)]
    pub needed: Option<i64>,
}

impl LowStockProduct {
    /// Units missing to reach the reorder level
    pub fn shortfall(&self) -> i64 {
        self.needed.unwrap_or_else(|| {
            self.product
                .reorder_level
                .map(|level| (level - self.total_stock).max(0))
                .unwrap_or(0)
        })
    }
}

/// Low-stock report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LowStockReport {
    #[serde(default)]
    pub products: Vec<LowStockProduct>,
    #[serde(default)]
    pub count: usize,
}

/// Reorder level given to new products when none is entered
pub const DEFAULT_REORDER_LEVEL: i64 = 10;

/// New catalogue entry; the backend assigns the id when none is given
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
pub struct ProductDraft {
    #[serde(rename = "MaSP", skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 20, message = "Product code must be 1-20 characters"))]
    pub product_id: Option<String>,
    #[serde(rename = "TenSP")]
    #[validate(length(min = 1, max = 200, message = "Product name is required"))]
    pub name: String,
    #[serde(rename = "LoaiSP", skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(rename = "DVT", skip_serializing_if = "Option::is_none")]
    pub unit_label: Option<String>,
    #[serde(rename = "GiaBan")]
    #[validate(range(min = 0, message = "Price cannot be negative"))]
    pub unit_price: i64, // = Money; validator derive needs a literal number type
    #[serde(rename = "MucCanhBaoDatHang")]
    #[validate(range(min = 0, message = "Reorder level cannot be negative"))]
    pub reorder_level: i64,
}

impl ProductDraft {
    pub fn new(name: &str, unit_price: Money) -> Self {
        Self {
            product_id: None,
            name: name.trim().to_string(),
            category: None,
            unit_label: None,
            unit_price,
            reorder_level: DEFAULT_REORDER_LEVEL,
        }
    }
}

/// Partial edit of a product; only the fields set are sent
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, PartialEq)]
pub struct ProductUpdate {
    #[serde(rename = "TenSP", skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 200, message = "Product name cannot be empty"))]
    pub name: Option<String>,
    #[serde(rename = "LoaiSP", skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(rename = "TrangThai", skip_serializing_if = "Option::is_none")]
    pub status: Option<ProductStatus>,
    #[serde(rename = "DVT", skip_serializing_if = "Option::is_none")]
    pub unit_label: Option<String>,
    #[serde(rename = "GiaBan", skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0, message = "Price cannot be negative"))]
    pub unit_price: Option<i64>, // = Money
    #[serde(rename = "MucCanhBaoDatHang", skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0, message = "Reorder level cannot be negative"))]
    pub reorder_level: Option<i64>,
}

impl ProductUpdate {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}
