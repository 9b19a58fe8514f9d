//! Goods receipt and goods issue screens against the mock backend
//!
//! Receiving checks batch codes and dates locally and merges repeated
//! batches without a stock ceiling. Issuing goes through the same preview
//! and commit round trips as a transfer.

mod common;

use chrono::NaiveDate;
use common::{cashier_session, staff_session, MockBackend};
use shared::{Batch, DomainError, LineKey, LineStatus, Phase, Product};
use tokio_test::assert_ok;
use warehouse_retail_client::services::{ExportDesk, ImportDesk};
use warehouse_retail_client::{ClientError, ErrorKind};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn today() -> NaiveDate {
    date(2025, 6, 1)
}

fn product() -> Product {
    serde_json::from_str(r#"{"MaSP": "P2", "TenSP": "Nước suối", "DVT": "Thùng", "GiaBan": 60000}"#)
        .unwrap()
}

fn batch(id: &str, expiry: &str, stock: i64) -> Batch {
    serde_json::from_value(serde_json::json!({
        "MaLo": id, "MaSP": "P2", "HSD": expiry, "SLTon": stock
    }))
    .unwrap()
}

fn validation_field(err: &ClientError) -> Option<&str> {
    match err {
        ClientError::Domain(DomainError::Validation { field, .. }) => Some(field.as_str()),
        _ => None,
    }
}

fn import_desk(backend: &MockBackend) -> ImportDesk {
    let mut desk = ImportDesk::new(backend.client());
    desk.update_header(|h| {
        h.warehouse_id = "W1".to_string();
        h.purpose = "Nhập hàng NCC".to_string();
        h.supplier = Some("Lavie".to_string());
    })
    .unwrap();
    desk
}

fn export_desk(backend: &MockBackend, stock: i64, quantity: i64) -> ExportDesk {
    let mut desk = ExportDesk::new(backend.client());
    desk.update_header(|h| {
        h.warehouse_id = "W1".to_string();
        h.purpose = "Xuất bán sỉ".to_string();
    })
    .unwrap();
    desk.add_batch(&product(), &batch("B2", "2030-01-01", stock), quantity, today())
        .unwrap();
    desk
}

// =============================================================================
// Receiving
// =============================================================================

mod receive {
    use super::*;

    /// Batch codes with spaces or symbols never reach the draft
    #[tokio::test]
    async fn bad_batch_code_rejected() {
        let backend = MockBackend::start().await;
        let mut desk = import_desk(&backend);

        let err = desk
            .receive(&product(), "LÔ 01", None, None, 10)
            .unwrap_err();

        assert_eq!(validation_field(&err), Some("batch_id"));
        assert!(desk.workflow().lines().is_empty());

        let err = desk.receive(&product(), "  ", None, None, 10).unwrap_err();
        assert_eq!(validation_field(&err), Some("batch_id"));
    }

    /// Expiry on or before manufacture is rejected on the expiry field
    #[tokio::test]
    async fn expiry_must_follow_manufacture() {
        let backend = MockBackend::start().await;
        let mut desk = import_desk(&backend);

        let err = desk
            .receive(
                &product(),
                "LO-2025",
                Some(date(2025, 5, 1)),
                Some(date(2025, 5, 1)),
                10,
            )
            .unwrap_err();

        assert_eq!(validation_field(&err), Some("expiry_date"));
        assert!(desk.workflow().lines().is_empty());
    }

    /// The same batch received twice merges into one line with no ceiling
    #[tokio::test]
    async fn repeated_batch_merges_without_ceiling() {
        let backend = MockBackend::start().await;
        let mut desk = import_desk(&backend);
        let (mfg, exp) = (Some(date(2025, 5, 1)), Some(date(2026, 5, 1)));

        assert_ok!(desk.receive(&product(), "LO-2025", mfg, exp, 600));
        assert_ok!(desk.receive(&product(), " LO-2025 ", mfg, exp, 900));

        let lines = desk.workflow().lines();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].batch_id, "LO-2025");
        assert_eq!(lines[0].quantity, 1500);
        assert_eq!(lines[0].available_stock, None);
        assert_eq!(lines[0].expiry_date, exp);
    }

    /// Existing batches cannot be picked on the receipt screen
    #[tokio::test]
    async fn add_batch_refused() {
        let backend = MockBackend::start().await;
        let mut desk = import_desk(&backend);

        let err = desk
            .add_batch(&product(), &batch("B2", "2030-01-01", 5), 1, today())
            .unwrap_err();

        assert_eq!(validation_field(&err), Some("batch"));
        assert!(desk.workflow().lines().is_empty());
    }

    /// A batch code the backend already knows is flagged by the preview
    #[tokio::test]
    async fn duplicate_batch_blocks_commit() {
        let backend = MockBackend::start().await;
        let session = staff_session(&backend.client()).await;
        let mut desk = import_desk(&backend);
        desk.receive(&product(), "DUP", None, None, 5).unwrap();

        let report = assert_ok!(desk.preview(&session).await).clone();

        assert_eq!(report.items[0].status, LineStatus::Error);
        assert_eq!(desk.phase(), &Phase::ValidationFailed);
        assert!(desk.commit(&session).await.is_err());
        assert_eq!(backend.commit_calls(), 0);
    }

    /// Preview then commit creates the receipt and clears the form
    #[tokio::test]
    async fn commit_creates_receipt() {
        let backend = MockBackend::start().await;
        let session = staff_session(&backend.client()).await;
        let mut desk = import_desk(&backend);
        desk.receive(&product(), "LO-2025", None, Some(date(2026, 5, 1)), 24)
            .unwrap();
        assert_ok!(desk.preview(&session).await);
        assert_eq!(desk.phase(), &Phase::ReadyToCommit);

        let receipt = assert_ok!(desk.commit(&session).await).clone();

        assert_eq!(receipt.document.code, "PN000009");
        assert_eq!(receipt.document.destination_warehouse_id.as_deref(), Some("W1"));
        assert_eq!(
            desk.phase(),
            &Phase::Committed {
                receipt: "PN000009".to_string()
            }
        );
        assert!(desk.workflow().lines().is_empty());
        assert_eq!(desk.history().len(), 1);
        assert_eq!(backend.commit_calls(), 1);
    }
}

// =============================================================================
// Issuing
// =============================================================================

mod issue {
    use super::*;

    /// The local ceiling refuses more than the batch holds
    #[tokio::test]
    async fn local_ceiling_enforced() {
        let backend = MockBackend::start().await;
        let mut desk = export_desk(&backend, 5, 3);

        let err = desk
            .update_quantity(&LineKey::new("P2", "B2"), 6)
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::InsufficientStock);
        assert_eq!(desk.workflow().lines()[0].quantity, 3);
    }

    /// Expired batches cannot be issued
    #[tokio::test]
    async fn expired_batch_refused() {
        let backend = MockBackend::start().await;
        let mut desk = ExportDesk::new(backend.client());

        let err = desk
            .add_batch(&product(), &batch("B1", "2025-05-01", 5), 1, today())
            .unwrap_err();

        assert!(matches!(
            err,
            ClientError::Domain(DomainError::ExpiredBatch { ref batch_id }) if batch_id == "B1"
        ));
    }

    /// A preview within the server's stock is ready to commit
    #[tokio::test]
    async fn preview_within_stock() {
        let backend = MockBackend::start().await;
        let session = staff_session(&backend.client()).await;
        let mut desk = export_desk(&backend, 5, 3);

        let report = assert_ok!(desk.preview(&session).await).clone();

        assert!(report.is_committable());
        assert_eq!(report.items[0].available_stock, Some(5));
        assert_eq!(report.summary.total_quantity, 3);
        assert_eq!(desk.phase(), &Phase::ReadyToCommit);
    }

    /// Stock moved since the batch was fetched: the server flags the line
    #[tokio::test]
    async fn stale_stock_flagged() {
        let backend = MockBackend::start().await;
        let session = staff_session(&backend.client()).await;
        let mut desk = export_desk(&backend, 9, 7);

        assert_ok!(desk.preview(&session).await);

        assert_eq!(desk.phase(), &Phase::ValidationFailed);
        assert_eq!(desk.workflow().report().unwrap().error_lines().count(), 1);
    }

    /// Commit creates the issue and refreshes the wrapped history list
    #[tokio::test]
    async fn commit_creates_issue() {
        let backend = MockBackend::start().await;
        let session = staff_session(&backend.client()).await;
        let mut desk = export_desk(&backend, 5, 5);
        assert_ok!(desk.preview(&session).await);

        let receipt = assert_ok!(desk.commit(&session).await).clone();

        assert_eq!(receipt.document.code, "PX000009");
        assert_eq!(receipt.document.source_warehouse_id.as_deref(), Some("W1"));
        assert!(desk.workflow().lines().is_empty());
        assert_eq!(desk.history()[0].code, "PX000009");
    }

    /// A failed commit keeps the draft for a manual retry
    #[tokio::test]
    async fn failed_commit_keeps_draft() {
        let backend = MockBackend::start().await;
        let session = staff_session(&backend.client()).await;
        let mut desk = export_desk(&backend, 5, 2);
        assert_ok!(desk.preview(&session).await);

        backend.fail_commits(true);
        assert!(desk.commit(&session).await.is_err());

        assert!(matches!(desk.phase(), Phase::CommitFailed { .. }));
        assert_eq!(desk.workflow().lines()[0].quantity, 2);
        assert_eq!(backend.commit_calls(), 1);
    }

    /// Cashiers cannot issue warehouse stock
    #[tokio::test]
    async fn cashier_cannot_preview() {
        let backend = MockBackend::start().await;
        let session = cashier_session(&backend.client()).await;
        let mut desk = export_desk(&backend, 5, 2);

        let err = desk.preview(&session).await.unwrap_err();

        assert_eq!(err.code(), "FORBIDDEN");
    }
}
