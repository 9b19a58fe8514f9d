//! Inventory count and stock adjustment models
//!
//! A count starts with the backend listing every batch of a warehouse with
//! its system quantity. The operator records counted quantities on a
//! [`CountSheet`]; after submission the backend can turn the discrepancies
//! into adjustment receipts (an import for surplus, an export for shortage).

use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::cart::LineKey;
use crate::error::{DomainError, DomainResult};

/// Request to open a count
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StartCountRequest {
    #[serde(rename = "MaKho")]
    pub warehouse_id: String,
    #[serde(rename = "MucDich", skip_serializing_if = "Option::is_none")]
    pub purpose: Option<String>,
}

/// Count document header
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CountDocument {
    #[serde(rename = "MaPhieu")]
    pub check_code: String,
    #[serde(rename = "NgayTao", default)]
    pub created_at: Option<NaiveDateTime>,
    #[serde(rename = "MucDich", default)]
    pub purpose: Option<String>,
    #[serde(rename = "MaKho", default)]
    pub warehouse_id: Option<String>,
}

/// A batch to count, with the quantity the system believes is on hand
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CountBatch {
    #[serde(rename = "MaSP")]
    pub product_id: String,
    #[serde(rename = "MaLo")]
    pub batch_id: String,
    #[serde(rename = "MaVach", default)]
    pub barcode: Option<String>,
    #[serde(rename = "HSD", default)]
    pub expiry_date: Option<NaiveDate>,
    #[serde(rename = "SLHeThong")]
    pub system_quantity: i64,
}

impl CountBatch {
    pub fn key(&self) -> LineKey {
        LineKey::new(self.product_id.clone(), self.batch_id.clone())
    }
}

/// Response of the count start call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountStart {
    #[serde(rename = "phieu")]
    pub document: CountDocument,
    #[serde(default)]
    pub batches: Vec<CountBatch>,
}

/// Counted vs system quantity of one batch
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Discrepancy {
    #[serde(rename = "MaSP")]
    pub product_id: String,
    #[serde(rename = "MaLo")]
    pub batch_id: String,
    #[serde(rename = "MaVach", default)]
    pub barcode: Option<String>,
    #[serde(rename = "SLHeThong")]
    pub system_quantity: i64,
    #[serde(rename = "SLThucTe")]
    pub counted_quantity: i64,
    /// `counted - system`; positive is a surplus
    #[serde(rename = "ChenhLech")]
    pub difference: i64,
}

/// One counted line of the record request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CountedLine {
    #[serde(rename = "MaSP")]
    pub product_id: String,
    #[serde(rename = "MaLo")]
    pub batch_id: String,
    #[serde(rename = "MaVach", skip_serializing_if = "Option::is_none")]
    pub barcode: Option<String>,
    #[serde(rename = "SLThucTe")]
    pub counted_quantity: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecordCountRequest {
    #[serde(rename = "MaPhieu")]
    pub check_code: String,
    pub items: Vec<CountedLine>,
}

/// Response of the record call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountResult {
    #[serde(rename = "phieu")]
    pub document: CountDocument,
    #[serde(default)]
    pub discrepancies: Vec<Discrepancy>,
    #[serde(default)]
    pub has_discrepancies: bool,
}

/// Counted quantities of one open count
#[derive(Debug, Clone)]
pub struct CountSheet {
    document: CountDocument,
    batches: Vec<CountBatch>,
    counted: BTreeMap<LineKey, i64>,
}

impl CountSheet {
    pub fn new(start: CountStart) -> Self {
        Self {
            document: start.document,
            batches: start.batches,
            counted: BTreeMap::new(),
        }
    }

    pub fn check_code(&self) -> &str {
        &self.document.check_code
    }

    pub fn batches(&self) -> &[CountBatch] {
        &self.batches
    }

    pub fn counted(&self, key: &LineKey) -> Option<i64> {
        self.counted.get(key).copied()
    }

    pub fn uncounted(&self) -> usize {
        self.batches
            .iter()
            .filter(|b| !self.counted.contains_key(&b.key()))
            .count()
    }

    /// Record the physical count of a batch, replacing any earlier count
    pub fn record_count(&mut self, key: &LineKey, quantity: i64) -> DomainResult<()> {
        if quantity < 0 {
            return Err(DomainError::validation(
                "counted_quantity",
                "Counted quantity cannot be negative",
            ));
        }
        if !self.batches.iter().any(|b| &b.key() == key) {
            return Err(DomainError::LineNotFound {
                product_id: key.product_id.clone(),
                batch_id: key.batch_id.clone(),
            });
        }
        self.counted.insert(key.clone(), quantity);
        Ok(())
    }

    /// Record a count for the batch carrying `barcode`
    pub fn record_by_barcode(&mut self, barcode: &str, quantity: i64) -> DomainResult<LineKey> {
        let key = self
            .batches
            .iter()
            .find(|b| b.barcode.as_deref() == Some(barcode))
            .map(CountBatch::key)
            .ok_or_else(|| DomainError::validation("barcode", "Barcode is not part of this count"))?;
        self.record_count(&key, quantity)?;
        Ok(key)
    }

    fn counted_or_system(&self, batch: &CountBatch) -> i64 {
        self.counted
            .get(&batch.key())
            .copied()
            .unwrap_or(batch.system_quantity)
    }

    /// Batches whose count differs from the system quantity
    pub fn discrepancies(&self) -> Vec<Discrepancy> {
        self.batches
            .iter()
            .filter_map(|batch| {
                let counted = self.counted_or_system(batch);
                let difference = counted - batch.system_quantity;
                (difference != 0).then(|| Discrepancy {
                    product_id: batch.product_id.clone(),
                    batch_id: batch.batch_id.clone(),
                    barcode: batch.barcode.clone(),
                    system_quantity: batch.system_quantity,
                    counted_quantity: counted,
                    difference,
                })
            })
            .collect()
    }

    /// Record request; uncounted batches are submitted at their system quantity
    pub fn to_request(&self) -> RecordCountRequest {
        RecordCountRequest {
            check_code: self.document.check_code.clone(),
            items: self
                .batches
                .iter()
                .map(|batch| CountedLine {
                    product_id: batch.product_id.clone(),
                    batch_id: batch.batch_id.clone(),
                    barcode: batch.barcode.clone(),
                    counted_quantity: self.counted_or_system(batch),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CountReportSummary {
    #[serde(default)]
    pub total_items: usize,
    #[serde(default)]
    pub items_with_discrepancy: usize,
    /// Sum of absolute differences
    #[serde(default)]
    pub total_discrepancy: i64,
}

/// Recorded results of a finished count
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountReport {
    #[serde(rename = "phieu")]
    pub document: CountDocument,
    #[serde(default)]
    pub items: Vec<Discrepancy>,
    #[serde(default)]
    pub summary: CountReportSummary,
}

// ============================================================================
// Adjustment
// ============================================================================

/// Request body of adjustment preview and execute
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AdjustmentRequest {
    #[serde(rename = "MaPhieuKiem")]
    pub check_code: String,
}

/// A count that has recorded results and can be adjusted
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AdjustableCount {
    #[serde(rename = "MaPhieu")]
    pub check_code: String,
    #[serde(rename = "NgayTao", default)]
    pub created_at: Option<NaiveDateTime>,
    #[serde(rename = "MaKho", default)]
    pub warehouse_id: Option<String>,
    #[serde(default)]
    pub discrepancy_count: usize,
}

/// One receipt an adjustment creates (or would create)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AdjustmentLine {
    #[serde(rename = "MaPhieu", default)]
    pub receipt_code: Option<String>,
    #[serde(rename = "MaSP")]
    pub product_id: String,
    #[serde(rename = "MaLo")]
    pub batch_id: String,
    #[serde(rename = "SoLuong")]
    pub quantity: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AdjustmentSummary {
    #[serde(default)]
    pub import_receipts: usize,
    #[serde(default)]
    pub export_receipts: usize,
    #[serde(default)]
    pub total_increase: i64,
    #[serde(default)]
    pub total_decrease: i64,
}

/// What an adjustment would do, without touching stock
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AdjustmentPreview {
    #[serde(default)]
    pub import_receipts: Vec<AdjustmentLine>,
    #[serde(default)]
    pub export_receipts: Vec<AdjustmentLine>,
    #[serde(default)]
    pub total_adjustments: usize,
    #[serde(default)]
    pub summary: AdjustmentSummary,
}

impl AdjustmentPreview {
    pub fn is_noop(&self) -> bool {
        self.total_adjustments == 0
            && self.import_receipts.is_empty()
            && self.export_receipts.is_empty()
    }

    /// Net stock change: increases minus decreases
    pub fn net_change(&self) -> i64 {
        let up: i64 = self.import_receipts.iter().map(|l| l.quantity).sum();
        let down: i64 = self.export_receipts.iter().map(|l| l.quantity).sum();
        up - down
    }
}

/// Result of executing an adjustment
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AdjustmentResult {
    #[serde(rename = "phieu_nhap", default)]
    pub import_receipts: Vec<AdjustmentLine>,
    #[serde(rename = "phieu_xuat", default)]
    pub export_receipts: Vec<AdjustmentLine>,
    #[serde(default)]
    pub total_adjustments: usize,
}

/// Direction of a historical adjustment receipt
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AdjustmentDirection {
    Increase,
    Decrease,
}

impl std::fmt::Display for AdjustmentDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AdjustmentDirection::Increase => write!(f, "increase"),
            AdjustmentDirection::Decrease => write!(f, "decrease"),
        }
    }
}

/// A past adjustment receipt
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AdjustmentRecord {
    #[serde(rename = "MaPhieu")]
    pub receipt_code: String,
    #[serde(rename = "NgayTao", default)]
    pub created_at: Option<NaiveDateTime>,
    #[serde(rename = "type")]
    pub direction: AdjustmentDirection,
    #[serde(rename = "MaThamChieu", default)]
    pub check_code: Option<String>,
    #[serde(rename = "MucDich", default)]
    pub purpose: Option<String>,
    #[serde(rename = "MaSP", default)]
    pub product_id: Option<String>,
    #[serde(rename = "MaLo", default)]
    pub batch_id: Option<String>,
    #[serde(rename = "SoLuong", default)]
    pub quantity: i64,
}
