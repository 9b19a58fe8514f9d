//! Customer return models
//!
//! A return starts from an invoice. Each invoice line that names its batch
//! can be returned up to the quantity bought, once per invoice and only
//! inside the return window. Returned goods go back into either a regular
//! or the defect warehouse.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::cart::{LineCandidate, LineItem, SubmissionShape};
use crate::error::{DomainError, DomainResult};
use crate::models::{BatchLinePayload, WarehouseKind};
use crate::types::{money, Money};

/// Days after purchase during which a return is accepted
pub const RETURN_POLICY_DAYS: i64 = 7;

/// A staff member, given either by name alone or with their id
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum StaffRef {
    Named(String),
    Staff {
        #[serde(rename = "MaNV")]
        staff_id: String,
        #[serde(rename = "Ten")]
        name: String,
    },
}

impl StaffRef {
    pub fn name(&self) -> &str {
        match self {
            StaffRef::Named(name) => name,
            StaffRef::Staff { name, .. } => name,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SoldBatch {
    #[serde(rename = "MaLo")]
    pub batch_id: String,
    #[serde(rename = "HSD", default)]
    pub expiry_date: Option<NaiveDate>,
    #[serde(rename = "NSX", default)]
    pub manufacture_date: Option<NaiveDate>,
}

/// One line of an invoice looked up for a return
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReturnableLine {
    #[serde(rename = "MaSP")]
    pub product_id: String,
    #[serde(rename = "TenSP", default)]
    pub product_name: Option<String>,
    #[serde(rename = "DVT", default)]
    pub unit_label: Option<String>,
    /// Quantity bought, the most that can come back
    #[serde(rename = "SoLuong")]
    pub quantity: i64,
    #[serde(rename = "DonGia", deserialize_with = "money::deserialize")]
    pub unit_price: Money,
    #[serde(rename = "ThanhTien", default, deserialize_with = "money::deserialize_option")]
    pub line_total: Option<Money>,
    #[serde(default)]
    pub batch_info: Option<SoldBatch>,
}

impl ReturnableLine {
    /// Candidate returning `quantity` units of this line
    ///
    /// Lines whose batch is unknown cannot be returned.
    pub fn candidate(&self, quantity: i64) -> DomainResult<LineCandidate> {
        let batch = self.batch_info.as_ref().ok_or_else(|| {
            DomainError::validation("batch_id", "Sold batch is unknown for this line")
        })?;
        Ok(LineCandidate {
            product_id: self.product_id.clone(),
            product_name: self.product_name.clone(),
            batch_id: batch.batch_id.clone(),
            barcode: None,
            unit_price: Some(self.unit_price),
            quantity,
            unit_label: self.unit_label.clone().unwrap_or_default(),
            available_stock: Some(self.quantity),
            manufacture_date: batch.manufacture_date,
            expiry_date: batch.expiry_date,
        })
    }
}

/// Invoice as returned by the return lookup
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReturnableInvoice {
    #[serde(rename = "MaHD")]
    pub invoice_code: String,
    #[serde(rename = "NgayTao", default)]
    pub created_at: Option<NaiveDateTime>,
    #[serde(rename = "TongTien", default, deserialize_with = "money::deserialize_option")]
    pub total_amount: Option<Money>,
    #[serde(default)]
    pub items: Vec<ReturnableLine>,
    #[serde(rename = "da_tra_hang", default)]
    pub already_returned: bool,
    #[serde(default)]
    pub days_since_purchase: i64,
    #[serde(rename = "ThuNgan", default)]
    pub cashier: Option<StaffRef>,
}

impl ReturnableInvoice {
    /// Refuse invoices that were already returned or are past the window
    pub fn check_returnable(&self, policy_days: i64) -> DomainResult<()> {
        if self.already_returned {
            return Err(DomainError::validation(
                "invoice",
                "Invoice has already been returned",
            ));
        }
        if self.days_since_purchase > policy_days {
            return Err(DomainError::validation(
                "invoice",
                "Invoice is outside the return window",
            ));
        }
        Ok(())
    }

    pub fn line(&self, product_id: &str, batch_id: &str) -> Option<&ReturnableLine> {
        self.items.iter().find(|line| {
            line.product_id == product_id
                && line.batch_info.as_ref().map(|b| b.batch_id.as_str()) == Some(batch_id)
        })
    }
}

/// Header fields of a return
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
pub struct ReturnHeader {
    #[validate(length(min = 1, message = "Invoice is required"))]
    pub invoice_code: String,
    #[validate(length(min = 1, max = 500, message = "Reason is required"))]
    pub reason: String,
    /// Regular stock for resale, defect stock for damaged goods
    pub restock_into: WarehouseKind,
    #[validate(range(min = 0, message = "Return window cannot be negative"))]
    pub policy_days: i64,
}

impl Default for ReturnHeader {
    fn default() -> Self {
        Self {
            invoice_code: String::new(),
            reason: String::new(),
            restock_into: WarehouseKind::Regular,
            policy_days: RETURN_POLICY_DAYS,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReturnRequest {
    #[serde(rename = "ma_hd")]
    pub invoice_code: String,
    #[serde(rename = "ly_do")]
    pub reason: String,
    pub items: Vec<BatchLinePayload>,
    #[serde(rename = "kho_nhap")]
    pub restock_into: WarehouseKind,
    #[serde(rename = "return_policy_days")]
    pub policy_days: i64,
}

/// Return form; the ceiling of each line is the quantity bought
#[derive(Debug, Clone, Copy, Default)]
pub struct ReturnShape;

impl SubmissionShape for ReturnShape {
    type Header = ReturnHeader;
    type Payload = ReturnRequest;

    const PRICED: bool = true;
    const CEILING: bool = true;

    fn assemble(header: &ReturnHeader, lines: &[LineItem]) -> ReturnRequest {
        ReturnRequest {
            invoice_code: header.invoice_code.trim().to_string(),
            reason: header.reason.trim().to_string(),
            items: lines.iter().map(BatchLinePayload::from).collect(),
            restock_into: header.restock_into,
            policy_days: header.policy_days,
        }
    }

    fn validate_header(header: &ReturnHeader) -> Result<(), validator::ValidationErrors> {
        header.validate()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReturnedLine {
    #[serde(rename = "MaSP")]
    pub product_id: String,
    #[serde(rename = "TenSP", default)]
    pub product_name: Option<String>,
    #[serde(rename = "MaLo", default)]
    pub batch_id: Option<String>,
    #[serde(rename = "SoLuong")]
    pub quantity: i64,
    #[serde(rename = "DonGia", default, deserialize_with = "money::deserialize_option")]
    pub unit_price: Option<Money>,
    #[serde(rename = "ThanhTien", default, deserialize_with = "money::deserialize_option")]
    pub line_total: Option<Money>,
}

/// A processed return, from the create call or the return list
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReturnReceipt {
    #[serde(rename = "MaYC")]
    pub return_code: String,
    #[serde(rename = "MaHD", default)]
    pub invoice_code: Option<String>,
    /// Goods receipt that put the items back into stock
    #[serde(rename = "MaPhieuNK", default)]
    pub import_code: Option<String>,
    #[serde(rename = "NgayTao", default)]
    pub created_at: Option<NaiveDateTime>,
    #[serde(rename = "LyDo", default)]
    pub reason: Option<String>,
    #[serde(rename = "KhoNhap", default)]
    pub restock_into: Option<WarehouseKind>,
    #[serde(default)]
    pub items: Vec<ReturnedLine>,
    #[serde(rename = "TongTienHoanTra", default, deserialize_with = "money::deserialize_option")]
    pub refund_amount: Option<Money>,
    #[serde(rename = "NguoiXuLy", default)]
    pub handled_by: Option<StaffRef>,
}

/// Date filter of the return list
#[derive(Debug, Clone, Default, Serialize)]
pub struct ReturnQuery {
    pub page: u32,
    pub per_page: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_date: Option<NaiveDate>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::LineStore;

    fn invoice() -> ReturnableInvoice {
        serde_json::from_str(
            r#"{
                "MaHD": "HD000001", "NgayTao": "2025-06-01T10:00:00", "TongTien": 25000.0,
                "items": [
                    {"MaSP": "P2", "TenSP": "Nước suối", "DVT": "Chai", "SoLuong": 3,
                     "DonGia": 5000.0, "ThanhTien": 15000.0,
                     "batch_info": {"MaLo": "B2", "HSD": "2030-01-01", "NSX": null}},
                    {"MaSP": "P3", "SoLuong": 1, "DonGia": 10000.0, "batch_info": null}
                ],
                "da_tra_hang": false, "days_since_purchase": 2,
                "ThuNgan": {"MaNV": "TN01", "Ten": "Hoa"}
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_return_capped_at_quantity_bought() {
        let invoice = invoice();
        let line = invoice.line("P2", "B2").unwrap();
        let mut form: LineStore<ReturnShape> = LineStore::new();

        form.add_line(line.candidate(2).unwrap()).unwrap();
        assert!(matches!(
            form.add_line(line.candidate(2).unwrap()),
            Err(DomainError::InsufficientStock { available: 3, .. })
        ));
        assert_eq!(form.total().total_amount, 10_000);
    }

    #[test]
    fn test_line_without_batch_cannot_be_returned() {
        let invoice = invoice();
        assert!(invoice.items[1].candidate(1).is_err());
        assert!(invoice.line("P3", "").is_none());
    }

    #[test]
    fn test_window_and_repeat_checks() {
        let mut invoice = invoice();
        assert!(invoice.check_returnable(RETURN_POLICY_DAYS).is_ok());
        invoice.days_since_purchase = 8;
        assert!(invoice.check_returnable(RETURN_POLICY_DAYS).is_err());
        invoice.days_since_purchase = 0;
        invoice.already_returned = true;
        assert!(invoice.check_returnable(RETURN_POLICY_DAYS).is_err());
        assert_eq!(invoice.cashier.as_ref().map(StaffRef::name), Some("Hoa"));
    }

    #[test]
    fn test_request_body() {
        let invoice = invoice();
        let mut form: LineStore<ReturnShape> = LineStore::new();
        form.add_line(invoice.items[0].candidate(1).unwrap()).unwrap();
        let header = ReturnHeader {
            invoice_code: "HD000001".into(),
            reason: "Bao bì rách".into(),
            restock_into: WarehouseKind::Defect,
            ..ReturnHeader::default()
        };
        let body = serde_json::to_value(form.assemble(&header)).unwrap();
        assert_eq!(body["ma_hd"], "HD000001");
        assert_eq!(body["kho_nhap"], "Kho lỗi");
        assert_eq!(body["return_policy_days"], 7);
        assert_eq!(body["items"][0]["MaLo"], "B2");
    }

    #[test]
    fn test_receipt_handler_as_name_or_object() {
        let created: ReturnReceipt = serde_json::from_str(
            r#"{"MaYC": "YC000001", "MaHD": "HD000001", "KhoNhap": "Kho thường",
                "TongTienHoanTra": 5000.0, "NguoiXuLy": "Hoa"}"#,
        )
        .unwrap();
        assert_eq!(created.handled_by.as_ref().map(StaffRef::name), Some("Hoa"));
        assert_eq!(created.restock_into, Some(WarehouseKind::Regular));

        let detail: ReturnReceipt = serde_json::from_str(
            r#"{"MaYC": "YC000001", "NguoiXuLy": {"MaNV": "TN01", "Ten": "Hoa"}}"#,
        )
        .unwrap();
        assert!(matches!(detail.handled_by, Some(StaffRef::Staff { .. })));
    }
}
