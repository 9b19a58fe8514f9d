//! Report models: expiry, sales and batch history

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::models::Product;
use crate::types::{money, Money};

// ============================================================================
// Expiry
// ============================================================================

/// Which batches the expiry report lists
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ExpiryFilter {
    #[default]
    All,
    Expired,
    Expiring,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExpiryQuery {
    /// Look-ahead window in days
    pub days: u32,
    #[serde(rename = "ma_kho", skip_serializing_if = "Option::is_none")]
    pub warehouse_id: Option<String>,
    pub status: ExpiryFilter,
}

impl Default for ExpiryQuery {
    fn default() -> Self {
        Self {
            days: 30,
            warehouse_id: None,
            status: ExpiryFilter::All,
        }
    }
}

/// Urgency of one batch in the expiry report
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum ExpiryLevel {
    Expired,
    /// Seven days or fewer left
    Critical,
    Warning,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExpiryItem {
    #[serde(rename = "MaKho", default)]
    pub warehouse_id: Option<String>,
    #[serde(rename = "MaSP")]
    pub product_id: String,
    #[serde(rename = "TenSP", default)]
    pub product_name: Option<String>,
    #[serde(rename = "LoaiSP", default)]
    pub category: Option<String>,
    #[serde(rename = "DVT", default)]
    pub unit_label: Option<String>,
    #[serde(rename = "MaLo")]
    pub batch_id: String,
    #[serde(rename = "MaVach", default)]
    pub barcode: Option<String>,
    #[serde(rename = "NSX", default)]
    pub manufacture_date: Option<NaiveDate>,
    #[serde(rename = "HSD", default)]
    pub expiry_date: Option<NaiveDate>,
    #[serde(rename = "SLTon", default)]
    pub quantity: i64,
    #[serde(default)]
    pub days_to_expiry: i64,
    #[serde(default)]
    pub is_expired: bool,
    pub status: ExpiryLevel,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ExpirySummary {
    #[serde(default)]
    pub total_expired: usize,
    #[serde(default)]
    pub total_expiring: usize,
    #[serde(default)]
    pub total_expired_quantity: i64,
    #[serde(default)]
    pub total_expiring_quantity: i64,
    #[serde(default)]
    pub check_period_days: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExpiryReport {
    #[serde(default)]
    pub expired: Vec<ExpiryItem>,
    #[serde(default)]
    pub expiring: Vec<ExpiryItem>,
    #[serde(default)]
    pub summary: ExpirySummary,
}

impl ExpiryReport {
    /// Expired rows first, then expiring rows by days left
    pub fn rows(&self) -> Vec<&ExpiryItem> {
        let mut rows: Vec<&ExpiryItem> = self.expired.iter().chain(&self.expiring).collect();
        rows.sort_by_key(|item| (item.status, item.days_to_expiry));
        rows
    }

    pub fn at_level(&self, level: ExpiryLevel) -> impl Iterator<Item = &ExpiryItem> {
        self.expired
            .iter()
            .chain(&self.expiring)
            .filter(move |item| item.status == level)
    }
}

// ============================================================================
// Sales
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct SalesQuery {
    pub from_date: NaiveDate,
    pub to_date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_by: Option<String>,
}

impl SalesQuery {
    pub fn new(from_date: NaiveDate, to_date: NaiveDate) -> DomainResult<Self> {
        if to_date < from_date {
            return Err(DomainError::validation(
                "to_date",
                "End date must not be before start date",
            ));
        }
        Ok(Self {
            from_date,
            to_date,
            group_by: None,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DailySales {
    pub date: NaiveDate,
    #[serde(deserialize_with = "money::deserialize")]
    pub total_revenue: Money,
    #[serde(default)]
    pub total_quantity: i64,
    #[serde(default)]
    pub total_invoices: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TopProduct {
    #[serde(rename = "MaSP")]
    pub product_id: String,
    #[serde(rename = "TenSP", default)]
    pub product_name: Option<String>,
    #[serde(rename = "GiaBan", default, deserialize_with = "money::deserialize_option")]
    pub unit_price: Option<Money>,
    #[serde(default)]
    pub total_quantity: i64,
    #[serde(deserialize_with = "money::deserialize")]
    pub total_revenue: Money,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SalesSummary {
    #[serde(default, deserialize_with = "money::deserialize")]
    pub total_revenue: Money,
    #[serde(default)]
    pub total_quantity: i64,
    #[serde(default)]
    pub total_invoices: u64,
    #[serde(default, deserialize_with = "money::deserialize")]
    pub average_revenue_per_day: Money,
    #[serde(default, deserialize_with = "money::deserialize")]
    pub average_invoice_value: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReportPeriod {
    pub from_date: NaiveDate,
    pub to_date: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalesReport {
    #[serde(default)]
    pub daily_sales: Vec<DailySales>,
    #[serde(default)]
    pub top_products: Vec<TopProduct>,
    #[serde(default)]
    pub summary: SalesSummary,
    #[serde(default)]
    pub period: Option<ReportPeriod>,
}

impl SalesReport {
    /// Revenue summed over the days, for comparison with the summary
    pub fn daily_revenue(&self) -> Money {
        self.daily_sales.iter().map(|d| d.total_revenue).sum()
    }

    /// Day with the highest revenue
    pub fn best_day(&self) -> Option<&DailySales> {
        self.daily_sales.iter().max_by_key(|d| d.total_revenue)
    }
}

// ============================================================================
// Batch history
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct BatchHistoryQuery {
    #[serde(rename = "ma_lo")]
    pub batch_id: String,
    #[serde(rename = "ma_sp")]
    pub product_id: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BatchMovementKind {
    Import,
    Export,
}

/// One receipt that touched the batch
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BatchMovement {
    #[serde(rename = "type")]
    pub kind: BatchMovementKind,
    pub date: NaiveDateTime,
    #[serde(rename = "ma_phieu")]
    pub document_code: String,
    #[serde(rename = "muc_dich", default)]
    pub purpose: Option<String>,
    #[serde(rename = "ma_kho", default)]
    pub warehouse_id: Option<String>,
    #[serde(rename = "so_luong", default)]
    pub quantity: i64,
    /// Display label chosen by the backend
    #[serde(default)]
    pub action: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BatchHistoryInfo {
    #[serde(rename = "MaLo")]
    pub batch_id: String,
    #[serde(rename = "MaSP")]
    pub product_id: String,
    #[serde(rename = "MaKho", default)]
    pub warehouse_id: Option<String>,
    #[serde(rename = "MaVach", default)]
    pub barcode: Option<String>,
    #[serde(rename = "NSX", default)]
    pub manufacture_date: Option<NaiveDate>,
    #[serde(rename = "HSD", default)]
    pub expiry_date: Option<NaiveDate>,
    #[serde(rename = "SLTon", default)]
    pub quantity: i64,
    #[serde(default)]
    pub product: Option<Product>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchHistory {
    pub batch_info: BatchHistoryInfo,
    #[serde(default)]
    pub history: Vec<BatchMovement>,
    #[serde(default)]
    pub total_movements: usize,
}

impl BatchHistory {
    /// Movements in date order
    pub fn timeline(&self) -> Vec<&BatchMovement> {
        let mut movements: Vec<&BatchMovement> = self.history.iter().collect();
        movements.sort_by_key(|m| m.date);
        movements
    }

    pub fn last_movement(&self) -> Option<&BatchMovement> {
        self.history.iter().max_by_key(|m| m.date)
    }
}
