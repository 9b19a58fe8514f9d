//! CSV export of inventory snapshots, adjustment history and the expiry
//! and sales reports

use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;
use shared::{
    AdjustmentRecord, ExpiryLevel, ExpiryReport, ExpiryStatus, InventorySnapshot, Money,
    SalesReport,
};

use crate::error::{ClientError, ClientResult};

/// One row of the inventory snapshot export
#[derive(Debug, Serialize)]
pub struct InventoryCsvRow {
    pub warehouse_id: String,
    pub product_id: String,
    pub product_name: String,
    pub batch_id: String,
    pub barcode: String,
    pub manufacture_date: Option<NaiveDate>,
    pub expiry_date: Option<NaiveDate>,
    pub expiry_status: String,
    pub quantity: i64,
}

/// One row of the adjustment history export
#[derive(Debug, Serialize)]
pub struct AdjustmentCsvRow {
    pub receipt_code: String,
    pub created_at: Option<NaiveDateTime>,
    pub direction: String,
    pub check_code: String,
    pub product_id: String,
    pub batch_id: String,
    pub quantity: i64,
    pub purpose: String,
}

/// One row of the expiry report export
#[derive(Debug, Serialize)]
pub struct ExpiryCsvRow {
    pub level: &'static str,
    pub warehouse_id: String,
    pub product_id: String,
    pub product_name: String,
    pub batch_id: String,
    pub expiry_date: Option<NaiveDate>,
    pub days_to_expiry: i64,
    pub quantity: i64,
}

/// One row of the daily sales export
#[derive(Debug, Serialize)]
pub struct SalesCsvRow {
    pub date: NaiveDate,
    pub invoices: u64,
    pub quantity: i64,
    pub revenue: Money,
}

pub fn inventory_rows(snapshot: &InventorySnapshot, today: NaiveDate) -> Vec<InventoryCsvRow> {
    let warehouse_id = snapshot
        .warehouse
        .as_ref()
        .map(|w| w.warehouse_id.clone())
        .unwrap_or_default();
    snapshot
        .inventory
        .iter()
        .map(|row| InventoryCsvRow {
            warehouse_id: warehouse_id.clone(),
            product_id: row.product_id.clone(),
            product_name: row.product_name.clone().unwrap_or_default(),
            batch_id: row.batch_id.clone(),
            barcode: row.barcode.clone().unwrap_or_default(),
            manufacture_date: row.manufacture_date,
            expiry_date: row.expiry_date,
            expiry_status: expiry_label(ExpiryStatus::classify(row.expiry_date, today)).to_string(),
            quantity: row.quantity,
        })
        .collect()
}

pub fn adjustment_rows(records: &[AdjustmentRecord]) -> Vec<AdjustmentCsvRow> {
    records
        .iter()
        .map(|r| AdjustmentCsvRow {
            receipt_code: r.receipt_code.clone(),
            created_at: r.created_at,
            direction: r.direction.to_string(),
            check_code: r.check_code.clone().unwrap_or_default(),
            product_id: r.product_id.clone().unwrap_or_default(),
            batch_id: r.batch_id.clone().unwrap_or_default(),
            quantity: r.quantity,
            purpose: r.purpose.clone().unwrap_or_default(),
        })
        .collect()
}

/// Expiry report rows, most urgent first
pub fn expiry_rows(report: &ExpiryReport) -> Vec<ExpiryCsvRow> {
    report
        .rows()
        .into_iter()
        .map(|item| ExpiryCsvRow {
            level: level_label(item.status),
            warehouse_id: item.warehouse_id.clone().unwrap_or_default(),
            product_id: item.product_id.clone(),
            product_name: item.product_name.clone().unwrap_or_default(),
            batch_id: item.batch_id.clone(),
            expiry_date: item.expiry_date,
            days_to_expiry: item.days_to_expiry,
            quantity: item.quantity,
        })
        .collect()
}

pub fn sales_rows(report: &SalesReport) -> Vec<SalesCsvRow> {
    report
        .daily_sales
        .iter()
        .map(|day| SalesCsvRow {
            date: day.date,
            invoices: day.total_invoices,
            quantity: day.total_quantity,
            revenue: day.total_revenue,
        })
        .collect()
}

fn level_label(level: ExpiryLevel) -> &'static str {
    match level {
        ExpiryLevel::Expired => "expired",
        ExpiryLevel::Critical => "critical",
        ExpiryLevel::Warning => "warning",
    }
}

fn expiry_label(status: ExpiryStatus) -> &'static str {
    match status {
        ExpiryStatus::Expired => "expired",
        ExpiryStatus::ExpiringSoon => "expiring_soon",
        ExpiryStatus::Good => "good",
        ExpiryStatus::Unknown => "unknown",
    }
}

/// Export report data as CSV
pub fn export_to_csv<T: Serialize>(data: &[T]) -> ClientResult<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    for record in data {
        wtr.serialize(record)
            .map_err(|e| ClientError::Export(format!("CSV serialization error: {}", e)))?;
    }
    let bytes = wtr
        .into_inner()
        .map_err(|e| ClientError::Export(format!("CSV writer error: {}", e)))?;
    String::from_utf8(bytes)
        .map_err(|e| ClientError::Export(format!("UTF-8 conversion error: {}", e)))
}

/// Write report data to a CSV file
pub fn write_csv<T: Serialize>(path: &Path, data: &[T]) -> ClientResult<()> {
    let mut wtr = csv::Writer::from_path(path)
        .map_err(|e| ClientError::Export(format!("{}: {}", path.display(), e)))?;
    for record in data {
        wtr.serialize(record)
            .map_err(|e| ClientError::Export(format!("CSV serialization error: {}", e)))?;
    }
    wtr.flush()
        .map_err(|e| ClientError::Export(format!("{}: {}", path.display(), e)))?;
    tracing::info!(path = %path.display(), rows = data.len(), "CSV written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::{InventoryRow, Warehouse, WarehouseKind};

    fn snapshot() -> InventorySnapshot {
        InventorySnapshot {
            warehouse: Some(Warehouse {
                warehouse_id: "K01".into(),
                address: None,
                kind: WarehouseKind::Regular,
                capacity: None,
            }),
            inventory: vec![InventoryRow {
                product_id: "SP001".into(),
                product_name: Some("Sữa tươi".into()),
                batch_id: "LO001".into(),
                barcode: Some("8930001".into()),
                manufacture_date: None,
                expiry_date: NaiveDate::from_ymd_opt(2025, 6, 10),
                quantity: 24,
            }],
        }
    }

    #[test]
    fn test_inventory_csv_has_header_and_row() {
        let today = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let csv = export_to_csv(&inventory_rows(&snapshot(), today)).unwrap();
        let mut lines = csv.lines();
        assert_eq!(
            lines.next().unwrap(),
            "warehouse_id,product_id,product_name,batch_id,barcode,manufacture_date,expiry_date,expiry_status,quantity"
        );
        assert_eq!(
            lines.next().unwrap(),
            "K01,SP001,Sữa tươi,LO001,8930001,,2025-06-10,expiring_soon,24"
        );
        assert!(lines.next().is_none());
    }

    #[test]
    fn test_adjustment_csv_direction_labels() {
        let records: Vec<AdjustmentRecord> = serde_json::from_str(
            r#"[{"MaPhieu": "PN001", "type": "increase", "MaThamChieu": "PKK001", "SoLuong": 3},
                {"MaPhieu": "PX001", "type": "decrease", "SoLuong": 2}]"#,
        )
        .unwrap();
        let csv = export_to_csv(&adjustment_rows(&records)).unwrap();
        assert!(csv.contains("PN001,,increase,PKK001,,,3,"));
        assert!(csv.contains("PX001,,decrease,,,,2,"));
    }

    #[test]
    fn test_expiry_csv_most_urgent_first() {
        let report: ExpiryReport = serde_json::from_str(
            r#"{
                "expired": [],
                "expiring": [
                    {"MaKho": "K01", "MaSP": "SP2", "MaLo": "L2", "HSD": "2025-06-25",
                     "SLTon": 5, "days_to_expiry": 24, "status": "warning"},
                    {"MaKho": "K01", "MaSP": "SP1", "TenSP": "Sữa tươi", "MaLo": "L1",
                     "HSD": "2025-06-04", "SLTon": 2, "days_to_expiry": 3, "status": "critical"}
                ]
            }"#,
        )
        .unwrap();
        let csv = export_to_csv(&expiry_rows(&report)).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(
            lines[0],
            "level,warehouse_id,product_id,product_name,batch_id,expiry_date,days_to_expiry,quantity"
        );
        assert_eq!(lines[1], "critical,K01,SP1,Sữa tươi,L1,2025-06-04,3,2");
        assert!(lines[2].starts_with("warning,K01,SP2"));
    }
}
