//! Discard of defective stock
//!
//! Only batches held in the defect warehouse can be discarded. Lines come
//! from that warehouse's inventory snapshot, so each carries its stock as
//! the ceiling.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::cart::{LineCandidate, LineItem, SubmissionShape};
use crate::models::{BatchLinePayload, InventoryRow, StockDocument};

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, PartialEq)]
pub struct DiscardHeader {
    #[validate(length(min = 1, max = 500, message = "Reason is required"))]
    pub reason: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DiscardRequest {
    #[serde(rename = "LyDo")]
    pub reason: String,
    pub items: Vec<BatchLinePayload>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DiscardShape;

impl SubmissionShape for DiscardShape {
    type Header = DiscardHeader;
    type Payload = DiscardRequest;

    const PRICED: bool = false;
    const CEILING: bool = true;

    fn assemble(header: &DiscardHeader, lines: &[LineItem]) -> DiscardRequest {
        DiscardRequest {
            reason: header.reason.trim().to_string(),
            items: lines.iter().map(BatchLinePayload::from).collect(),
        }
    }

    fn validate_header(header: &DiscardHeader) -> Result<(), validator::ValidationErrors> {
        header.validate()
    }
}

impl InventoryRow {
    /// Candidate taking `quantity` units out of this row
    pub fn candidate(&self, quantity: i64) -> LineCandidate {
        LineCandidate {
            product_id: self.product_id.clone(),
            product_name: self.product_name.clone(),
            batch_id: self.batch_id.clone(),
            barcode: self.barcode.clone(),
            unit_price: None,
            quantity,
            unit_label: String::new(),
            available_stock: Some(self.quantity),
            manufacture_date: self.manufacture_date,
            expiry_date: self.expiry_date,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DiscardedItem {
    #[serde(rename = "MaSP")]
    pub product_id: String,
    #[serde(rename = "MaLo")]
    pub batch_id: String,
    #[serde(rename = "SoLuong")]
    pub quantity: i64,
    #[serde(rename = "MaKho", default)]
    pub warehouse_id: Option<String>,
}

/// Response of the discard call: the issue slip and what left stock
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscardReceipt {
    #[serde(rename = "phieu")]
    pub document: StockDocument,
    #[serde(default)]
    pub discarded_items: Vec<DiscardedItem>,
}

impl DiscardReceipt {
    pub fn total_quantity(&self) -> i64 {
        self.discarded_items.iter().map(|i| i.quantity).sum()
    }
}
