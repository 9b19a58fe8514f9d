//! Point-of-sale models: invoices and the sale batch list

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::cart::{LineItem, SubmissionShape};
use crate::models::{Batch, BatchLinePayload, Product};
use crate::types::{money, Money};

/// POS checkout has no header fields; the cashier comes from the token
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SaleHeader;

/// Invoice creation request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InvoiceRequest {
    pub items: Vec<BatchLinePayload>,
}

/// Checkout cart
#[derive(Debug, Clone, Copy, Default)]
pub struct SaleShape;

impl SubmissionShape for SaleShape {
    type Header = SaleHeader;
    type Payload = InvoiceRequest;

    const PRICED: bool = true;
    const CEILING: bool = true;

    fn assemble(_header: &SaleHeader, lines: &[LineItem]) -> InvoiceRequest {
        InvoiceRequest {
            items: lines.iter().map(BatchLinePayload::from).collect(),
        }
    }
}

/// One priced line of a created invoice
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InvoiceLine {
    #[serde(rename = "MaSP")]
    pub product_id: String,
    #[serde(rename = "TenSP", default)]
    pub product_name: Option<String>,
    #[serde(rename = "MaLo")]
    pub batch_id: String,
    #[serde(rename = "SoLuong")]
    pub quantity: i64,
    #[serde(rename = "DonGia", deserialize_with = "money::deserialize")]
    pub unit_price: Money,
    #[serde(rename = "ThanhTien", deserialize_with = "money::deserialize")]
    pub line_total: Money,
}

/// A created invoice together with the issue slip generated for it
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Invoice {
    #[serde(rename = "MaHD")]
    pub invoice_code: String,
    #[serde(rename = "NgayTao", default)]
    pub created_at: Option<NaiveDateTime>,
    #[serde(rename = "TenThuNgan", default)]
    pub cashier_name: Option<String>,
    #[serde(default)]
    pub items: Vec<InvoiceLine>,
    #[serde(rename = "TongTien", default, deserialize_with = "money::deserialize_option")]
    pub total_amount: Option<Money>,
    /// Issue slip created alongside the invoice
    #[serde(rename = "MaPhieuXK", default)]
    pub issue_code: Option<String>,
}

impl Invoice {
    pub fn computed_total(&self) -> Money {
        self.items.iter().map(|i| i.line_total).sum()
    }
}

/// Batches of a product available for sale, in FEFO order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaleBatches {
    pub product: Product,
    #[serde(default)]
    pub batches: Vec<Batch>,
    #[serde(default)]
    pub total_stock: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::{LineCandidate, LineStore};

    #[test]
    fn test_assemble_invoice_payload() {
        let mut cart: LineStore<SaleShape> = LineStore::new();
        cart.add_line(LineCandidate {
            product_id: "SP001".into(),
            product_name: Some("Sữa tươi".into()),
            batch_id: "LO001".into(),
            barcode: Some("8930001".into()),
            unit_price: Some(12_000),
            quantity: 2,
            unit_label: "Hộp".into(),
            available_stock: Some(10),
            manufacture_date: None,
            expiry_date: None,
        })
        .unwrap();

        let payload = serde_json::to_value(cart.assemble(&SaleHeader)).unwrap();
        assert_eq!(
            payload,
            serde_json::json!({
                "items": [{"MaSP": "SP001", "MaLo": "LO001", "MaVach": "8930001", "SoLuong": 2}]
            })
        );
    }

    #[test]
    fn test_invoice_from_wire() {
        let json = r#"{
            "MaHD": "HD000123", "NgayTao": "2026-02-01T09:30:00",
            "items": [{"MaSP": "SP001", "TenSP": "Sữa tươi", "MaLo": "LO001",
                       "SoLuong": 2, "DonGia": 12000.0, "ThanhTien": 24000.0}],
            "TongTien": 24000.0, "MaPhieuXK": "PXK000045", "TenThuNgan": "Hoa"
        }"#;
        let invoice: Invoice = serde_json::from_str(json).unwrap();
        assert_eq!(invoice.total_amount, Some(24_000));
        assert_eq!(invoice.computed_total(), 24_000);
        assert_eq!(invoice.issue_code.as_deref(), Some("PXK000045"));
    }
}
