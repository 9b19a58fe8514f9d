//! Warehouse movement models: import, export and transfer
//!
//! Each movement screen has a header, a list of lines, a preview round trip
//! and a create call. The wire shapes below mirror the backend's payloads.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::cart::{LineItem, SubmissionShape};

/// Kinds of stock movement
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum MovementKind {
    Import,
    Export,
    Transfer,
}

impl MovementKind {
    /// Path segment under `/warehouse`
    pub fn path(&self) -> &'static str {
        match self {
            MovementKind::Import => "import",
            MovementKind::Export => "export",
            MovementKind::Transfer => "transfer",
        }
    }

    pub fn create_path(&self) -> String {
        format!("/warehouse/{}", self.path())
    }

    /// Read-only classification endpoint; transfers call it `validate`
    pub fn preview_path(&self) -> String {
        match self {
            MovementKind::Transfer => "/warehouse/transfer/validate".to_string(),
            kind => format!("/warehouse/{}/preview", kind.path()),
        }
    }

    /// Imports add new stock, so their lines carry no stock ceiling
    pub fn has_stock_ceiling(&self) -> bool {
        !matches!(self, MovementKind::Import)
    }
}

impl std::fmt::Display for MovementKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.path())
    }
}

// ============================================================================
// Headers
// ============================================================================

/// Header fields of a goods receipt
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, PartialEq)]
pub struct ImportHeader {
    #[validate(length(min = 1, message = "Destination warehouse is required"))]
    pub warehouse_id: String,
    #[validate(length(max = 200, message = "Purpose is too long"))]
    pub purpose: String,
    #[validate(length(max = 50, message = "Reference code is too long"))]
    pub reference_code: Option<String>,
    pub supplier: Option<String>,
}

/// Header fields of a goods issue
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, PartialEq)]
pub struct ExportHeader {
    #[validate(length(min = 1, message = "Source warehouse is required"))]
    pub warehouse_id: String,
    #[validate(length(max = 200, message = "Purpose is too long"))]
    pub purpose: String,
    #[validate(length(max = 50, message = "Reference code is too long"))]
    pub reference_code: Option<String>,
}

/// Header fields of a transfer between two warehouses
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, PartialEq)]
#[validate(schema(function = "validate_transfer_pair", skip_on_field_errors = true))]
pub struct TransferHeader {
    #[validate(length(min = 1, message = "Source warehouse is required"))]
    pub source_warehouse_id: String,
    #[validate(length(min = 1, message = "Destination warehouse is required"))]
    pub destination_warehouse_id: String,
    #[validate(length(max = 200, message = "Purpose is too long"))]
    pub purpose: String,
}

fn validate_transfer_pair(header: &TransferHeader) -> Result<(), ValidationError> {
    if header.source_warehouse_id == header.destination_warehouse_id {
        let mut err = ValidationError::new("same_warehouse");
        err.message = Some("Source and destination warehouses must differ".into());
        return Err(err);
    }
    Ok(())
}

// ============================================================================
// Request payloads
// ============================================================================

/// One line of a goods receipt request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ImportLinePayload {
    #[serde(rename = "MaSP")]
    pub product_id: String,
    #[serde(rename = "MaLo")]
    pub batch_id: String,
    #[serde(rename = "MaVach", skip_serializing_if = "Option::is_none")]
    pub barcode: Option<String>,
    #[serde(rename = "NSX", skip_serializing_if = "Option::is_none")]
    pub manufacture_date: Option<NaiveDate>,
    #[serde(rename = "HSD", skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<NaiveDate>,
    #[serde(rename = "SoLuong")]
    pub quantity: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ImportRequest {
    #[serde(rename = "MaKho")]
    pub warehouse_id: String,
    #[serde(rename = "MucDich")]
    pub purpose: String,
    #[serde(rename = "MaThamChieu", skip_serializing_if = "Option::is_none")]
    pub reference_code: Option<String>,
    #[serde(rename = "NhaCungCap", skip_serializing_if = "Option::is_none")]
    pub supplier: Option<String>,
    pub items: Vec<ImportLinePayload>,
}

/// One batch-specific line of an issue or transfer request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BatchLinePayload {
    #[serde(rename = "MaSP")]
    pub product_id: String,
    #[serde(rename = "MaLo")]
    pub batch_id: String,
    #[serde(rename = "MaVach", skip_serializing_if = "Option::is_none")]
    pub barcode: Option<String>,
    #[serde(rename = "SoLuong")]
    pub quantity: i64,
}

impl From<&LineItem> for BatchLinePayload {
    fn from(line: &LineItem) -> Self {
        Self {
            product_id: line.product_id.clone(),
            batch_id: line.batch_id.clone(),
            barcode: line.barcode.clone(),
            quantity: line.quantity,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExportRequest {
    #[serde(rename = "MaKho")]
    pub warehouse_id: String,
    #[serde(rename = "MucDich")]
    pub purpose: String,
    #[serde(rename = "MaThamChieu", skip_serializing_if = "Option::is_none")]
    pub reference_code: Option<String>,
    pub items: Vec<BatchLinePayload>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TransferRequest {
    #[serde(rename = "KhoXuat")]
    pub source_warehouse_id: String,
    #[serde(rename = "KhoNhap")]
    pub destination_warehouse_id: String,
    #[serde(rename = "MucDich")]
    pub purpose: String,
    pub items: Vec<BatchLinePayload>,
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value
        .as_ref()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

// ============================================================================
// Submission shapes
// ============================================================================

/// Goods receipt screen
#[derive(Debug, Clone, Copy, Default)]
pub struct ImportShape;

impl SubmissionShape for ImportShape {
    type Header = ImportHeader;
    type Payload = ImportRequest;

    const PRICED: bool = false;
    const CEILING: bool = false;

    fn assemble(header: &ImportHeader, lines: &[LineItem]) -> ImportRequest {
        ImportRequest {
            warehouse_id: header.warehouse_id.clone(),
            purpose: header.purpose.trim().to_string(),
            reference_code: non_empty(&header.reference_code),
            supplier: non_empty(&header.supplier),
            items: lines
                .iter()
                .map(|line| ImportLinePayload {
                    product_id: line.product_id.clone(),
                    batch_id: line.batch_id.clone(),
                    barcode: line.barcode.clone(),
                    manufacture_date: line.manufacture_date,
                    expiry_date: line.expiry_date,
                    quantity: line.quantity,
                })
                .collect(),
        }
    }

    fn validate_header(header: &ImportHeader) -> Result<(), validator::ValidationErrors> {
        header.validate()
    }
}

/// Goods issue screen
#[derive(Debug, Clone, Copy, Default)]
pub struct ExportShape;

impl SubmissionShape for ExportShape {
    type Header = ExportHeader;
    type Payload = ExportRequest;

    const PRICED: bool = false;
    const CEILING: bool = true;

    fn assemble(header: &ExportHeader, lines: &[LineItem]) -> ExportRequest {
        ExportRequest {
            warehouse_id: header.warehouse_id.clone(),
            purpose: header.purpose.trim().to_string(),
            reference_code: non_empty(&header.reference_code),
            items: lines.iter().map(BatchLinePayload::from).collect(),
        }
    }

    fn validate_header(header: &ExportHeader) -> Result<(), validator::ValidationErrors> {
        header.validate()
    }
}

/// Transfer screen
#[derive(Debug, Clone, Copy, Default)]
pub struct TransferShape;

impl SubmissionShape for TransferShape {
    type Header = TransferHeader;
    type Payload = TransferRequest;

    const PRICED: bool = false;
    const CEILING: bool = true;

    fn assemble(header: &TransferHeader, lines: &[LineItem]) -> TransferRequest {
        TransferRequest {
            source_warehouse_id: header.source_warehouse_id.clone(),
            destination_warehouse_id: header.destination_warehouse_id.clone(),
            purpose: header.purpose.trim().to_string(),
            items: lines.iter().map(BatchLinePayload::from).collect(),
        }
    }

    fn validate_header(header: &TransferHeader) -> Result<(), validator::ValidationErrors> {
        header.validate()
    }
}

// ============================================================================
// Preview
// ============================================================================

/// Classification of one line by the preview round trip
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LineStatus {
    Ok,
    Warning,
    Error,
}

/// Whether a transfer moves a whole batch or splits it
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TransferType {
    Full,
    Partial,
}

/// Preview result for one line
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LinePreview {
    #[serde(rename = "MaSP")]
    pub product_id: String,
    #[serde(rename = "MaLo", default)]
    pub batch_id: String,
    #[serde(rename = "SoLuong", default)]
    pub quantity: i64,
    #[serde(rename = "SLTon", default)]
    pub available_stock: Option<i64>,
    pub status: LineStatus,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub transfer_type: Option<TransferType>,
    /// Batch id the quantity lands in at the destination (transfers only)
    #[serde(rename = "new_MaLo", default)]
    pub destination_batch_id: Option<String>,
}

impl LinePreview {
    /// A partial transfer that mints a new destination batch
    pub fn is_split(&self) -> bool {
        self.transfer_type == Some(TransferType::Partial)
            && self
                .destination_batch_id
                .as_deref()
                .map(|dest| dest != self.batch_id)
                .unwrap_or(false)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PreviewSummary {
    #[serde(default)]
    pub source_warehouse: Option<String>,
    #[serde(default)]
    pub destination_warehouse: Option<String>,
    #[serde(default)]
    pub total_quantity: i64,
    #[serde(default)]
    pub total_items: usize,
}

/// Read-only classification of a movement draft
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PreviewReport {
    #[serde(default)]
    pub valid: bool,
    #[serde(default)]
    pub items: Vec<LinePreview>,
    #[serde(default)]
    pub errors: Vec<String>,
    #[serde(default)]
    pub warnings: Vec<String>,
    #[serde(default)]
    pub summary: PreviewSummary,
}

impl PreviewReport {
    pub fn error_lines(&self) -> impl Iterator<Item = &LinePreview> {
        self.items.iter().filter(|l| l.status == LineStatus::Error)
    }

    /// Commit is allowed when no line and no header check failed
    pub fn is_committable(&self) -> bool {
        self.errors.is_empty() && self.error_lines().next().is_none()
    }

    pub fn split_lines(&self) -> impl Iterator<Item = &LinePreview> {
        self.items.iter().filter(|l| l.is_split())
    }
}

// ============================================================================
// Receipts and history
// ============================================================================

/// A stock document (receipt, issue or transfer slip)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StockDocument {
    #[serde(rename = "MaPhieu")]
    pub code: String,
    #[serde(rename = "NgayTao", default)]
    pub created_at: Option<NaiveDateTime>,
    #[serde(rename = "MucDich", default)]
    pub purpose: Option<String>,
    #[serde(rename = "MaThamChieu", default)]
    pub reference_code: Option<String>,
    #[serde(rename = "KhoXuat", default)]
    pub source_warehouse_id: Option<String>,
    #[serde(rename = "KhoNhap", default)]
    pub destination_warehouse_id: Option<String>,
}

/// Response of an import or export create call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovementReceipt {
    #[serde(rename = "phieu")]
    pub document: StockDocument,
    #[serde(default)]
    pub batches: Vec<serde_json::Value>,
}

/// One transferred line as reported by the transfer create call
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TransferredItem {
    #[serde(rename = "MaSP")]
    pub product_id: String,
    #[serde(rename = "MaLo")]
    pub batch_id: String,
    #[serde(rename = "SoLuong")]
    pub quantity: i64,
    #[serde(default)]
    pub transfer_type: Option<TransferType>,
    #[serde(rename = "new_MaLo", default)]
    pub destination_batch_id: Option<String>,
}

/// Response of a transfer create call: the transfer slip plus the paired
/// issue and receipt documents
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferReceipt {
    #[serde(rename = "phieu_chuyen_kho")]
    pub transfer: StockDocument,
    #[serde(rename = "phieu_xuat")]
    pub issue: StockDocument,
    #[serde(rename = "phieu_nhap")]
    pub receipt: StockDocument,
    #[serde(default)]
    pub transferred_items: Vec<TransferredItem>,
}

impl TransferReceipt {
    pub fn split_count(&self) -> usize {
        self.transferred_items
            .iter()
            .filter(|i| {
                i.transfer_type == Some(TransferType::Partial)
                    && i.destination_batch_id.as_deref() != Some(i.batch_id.as_str())
            })
            .count()
    }

    /// Quantity moved out of the source equals the quantity submitted
    pub fn is_conserved(&self, submitted: &[LineItem]) -> bool {
        let moved: i64 = self.transferred_items.iter().map(|i| i.quantity).sum();
        let requested: i64 = submitted.iter().map(|l| l.quantity).sum();
        moved == requested
    }
}
