//! Barcode scan models

use serde::{Deserialize, Serialize};

use crate::models::{Batch, Product};

/// Screen a barcode is scanned on
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ScanMode {
    Sale,
    Export,
    Transfer,
}

impl ScanMode {
    pub fn path(&self) -> &'static str {
        match self {
            ScanMode::Sale => "/sales/scan-barcode",
            ScanMode::Export => "/warehouse/export/scan-barcode",
            ScanMode::Transfer => "/warehouse/transfer/scan-barcode",
        }
    }

    /// Quantity of the pending draft after a successful scan
    ///
    /// The POS always starts a scanned line at one unit; warehouse screens
    /// keep whatever the operator already typed.
    pub fn draft_quantity(&self, entered: Option<i64>) -> i64 {
        match self {
            ScanMode::Sale => 1,
            ScanMode::Export | ScanMode::Transfer => entered.filter(|q| *q > 0).unwrap_or(1),
        }
    }
}

impl std::str::FromStr for ScanMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sale" => Ok(ScanMode::Sale),
            "export" => Ok(ScanMode::Export),
            "transfer" => Ok(ScanMode::Transfer),
            other => Err(format!("unknown scan mode '{other}'")),
        }
    }
}

/// Body of a warehouse scan request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WarehouseScanRequest {
    #[serde(rename = "MaVach")]
    pub barcode: String,
    #[serde(rename = "MaKho")]
    pub warehouse_id: String,
}

/// Body of a POS scan request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SaleScanRequest {
    pub barcode: String,
}

/// POS scan response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaleScanResponse {
    pub product: Product,
    pub batch: Batch,
    #[serde(default)]
    pub expiry_warning: Option<String>,
}

/// Export/transfer scan response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WarehouseScanResponse {
    pub batch_info: Batch,
    #[serde(default)]
    pub product: Option<Product>,
    #[serde(default)]
    pub warnings: Vec<String>,
}

/// A barcode resolved to a product and batch
#[derive(Debug, Clone)]
pub struct ScanHit {
    pub product: Option<Product>,
    pub batch: Batch,
    /// Advisory messages; none of them blocks the add
    pub warnings: Vec<String>,
}

impl ScanHit {
    pub fn product_id(&self) -> &str {
        &self.batch.product_id
    }
}

impl From<SaleScanResponse> for ScanHit {
    fn from(resp: SaleScanResponse) -> Self {
        Self {
            product: Some(resp.product),
            batch: resp.batch,
            warnings: resp.expiry_warning.into_iter().collect(),
        }
    }
}

impl From<WarehouseScanResponse> for ScanHit {
    fn from(resp: WarehouseScanResponse) -> Self {
        Self {
            product: resp.product,
            batch: resp.batch_info,
            warnings: resp.warnings,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draft_quantity_policy() {
        assert_eq!(ScanMode::Sale.draft_quantity(Some(7)), 1);
        assert_eq!(ScanMode::Transfer.draft_quantity(Some(7)), 7);
        assert_eq!(ScanMode::Export.draft_quantity(None), 1);
        assert_eq!(ScanMode::Export.draft_quantity(Some(0)), 1);
    }

    #[test]
    fn test_sale_scan_warning_carried() {
        let json = r#"{
            "product": {"MaSP": "SP001", "TenSP": "Sữa tươi", "GiaBan": 12000.0},
            "batch": {"MaLo": "LO001", "MaSP": "SP001", "SLTon": 4, "HSD": "2026-02-05"},
            "expiry_warning": "Expires in 4 days"
        }"#;
        let hit: ScanHit = serde_json::from_str::<SaleScanResponse>(json).unwrap().into();
        assert_eq!(hit.product_id(), "SP001");
        assert_eq!(hit.warnings, vec!["Expires in 4 days".to_string()]);
    }

    #[test]
    fn test_scan_mode_parse() {
        assert_eq!("transfer".parse::<ScanMode>().unwrap(), ScanMode::Transfer);
        assert!("return".parse::<ScanMode>().is_err());
    }
}
