//! Warehouse movement screens: import, export and transfer
//!
//! A [`MovementDesk`] owns one [`MovementWorkflow`] and performs its preview
//! and commit round trips. Commit is sent at most once per request; on
//! failure every header field and line stays in place.

use std::fmt::Debug;

use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use shared::{
    validate_batch_code, validate_batch_dates, Batch, Capability, DomainError, ExportShape,
    ImportShape, LineCandidate, LineItem, LineKey, MovementKind, MovementReceipt,
    MovementWorkflow, Phase, PreviewReport, Product, StockDocument, SubmissionShape,
    TransferReceipt, TransferShape,
};

use crate::api::ApiClient;
use crate::error::ClientResult;
use crate::session::Session;

/// Binds a submission shape to its endpoints
pub trait MovementEndpoint: SubmissionShape {
    const KIND: MovementKind;
    const CAPABILITY: Capability;

    type Receipt: DeserializeOwned + Debug + Clone;

    /// Code of the document the commit created
    fn receipt_code(receipt: &Self::Receipt) -> String;

    /// Post-commit consistency check against the submitted lines
    fn check_receipt(_receipt: &Self::Receipt, _submitted: &[LineItem]) {}
}

impl MovementEndpoint for ImportShape {
    const KIND: MovementKind = MovementKind::Import;
    const CAPABILITY: Capability = Capability::WarehouseImport;
    type Receipt = MovementReceipt;

    fn receipt_code(receipt: &MovementReceipt) -> String {
        receipt.document.code.clone()
    }
}

impl MovementEndpoint for ExportShape {
    const KIND: MovementKind = MovementKind::Export;
    const CAPABILITY: Capability = Capability::WarehouseExport;
    type Receipt = MovementReceipt;

    fn receipt_code(receipt: &MovementReceipt) -> String {
        receipt.document.code.clone()
    }
}

impl MovementEndpoint for TransferShape {
    const KIND: MovementKind = MovementKind::Transfer;
    const CAPABILITY: Capability = Capability::WarehouseTransfer;
    type Receipt = TransferReceipt;

    fn receipt_code(receipt: &TransferReceipt) -> String {
        receipt.transfer.code.clone()
    }

    fn check_receipt(receipt: &TransferReceipt, submitted: &[LineItem]) {
        if !receipt.is_conserved(submitted) {
            tracing::warn!(
                transfer_code = %receipt.transfer.code,
                "Transferred quantity differs from the submitted quantity"
            );
        }
        if receipt.split_count() > 0 {
            tracing::info!(
                transfer_code = %receipt.transfer.code,
                split_batches = receipt.split_count(),
                "Partial transfer minted new destination batches"
            );
        }
    }
}

pub type ImportDesk = MovementDesk<ImportShape>;
pub type ExportDesk = MovementDesk<ExportShape>;
pub type TransferDesk = MovementDesk<TransferShape>;

/// One movement screen
pub struct MovementDesk<S: MovementEndpoint> {
    api: ApiClient,
    workflow: MovementWorkflow<S>,
    last_receipt: Option<S::Receipt>,
    history: Vec<StockDocument>,
}

impl<S: MovementEndpoint> MovementDesk<S> {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            workflow: MovementWorkflow::new(),
            last_receipt: None,
            history: Vec::new(),
        }
    }

    pub fn workflow(&self) -> &MovementWorkflow<S> {
        &self.workflow
    }

    pub fn phase(&self) -> &Phase {
        self.workflow.phase()
    }

    pub fn last_receipt(&self) -> Option<&S::Receipt> {
        self.last_receipt.as_ref()
    }

    /// Documents created on this screen, as of the last refresh
    pub fn history(&self) -> &[StockDocument] {
        &self.history
    }

    pub fn update_header(&mut self, edit: impl FnOnce(&mut S::Header)) -> ClientResult<()> {
        Ok(self.workflow.update_header(edit)?)
    }

    pub fn add_line(&mut self, candidate: LineCandidate) -> ClientResult<()> {
        Ok(self.workflow.add_line(candidate)?)
    }

    pub fn update_quantity(&mut self, key: &LineKey, quantity: i64) -> ClientResult<()> {
        Ok(self.workflow.update_quantity(key, quantity)?)
    }

    pub fn remove_line(&mut self, key: &LineKey) -> ClientResult<()> {
        Ok(self.workflow.remove_line(key)?)
    }

    pub fn back_to_draft(&mut self) -> ClientResult<()> {
        Ok(self.workflow.back_to_draft()?)
    }

    pub fn acknowledge_failure(&mut self) {
        self.workflow.acknowledge_failure();
    }

    /// Classify the draft's lines on the backend
    ///
    /// A report with `error` lines is a successful call; it leaves the form
    /// in `ValidationFailed`.
    pub async fn preview(&mut self, session: &Session) -> ClientResult<&PreviewReport> {
        session.require(S::CAPABILITY)?;
        let ticket = self.workflow.begin_preview()?;

        match self
            .api
            .warehouse()
            .preview(session, S::KIND, &ticket.payload)
            .await
        {
            Ok(report) => {
                tracing::debug!(
                    kind = %S::KIND,
                    valid = report.valid,
                    errors = report.error_lines().count(),
                    warnings = report.warnings.len(),
                    "Preview received"
                );
                self.workflow.apply_preview(&ticket, report);
            }
            Err(e) => {
                tracing::warn!(kind = %S::KIND, "Preview failed: {}", e);
                self.workflow.preview_failed(&ticket);
                return Err(e);
            }
        }

        self.workflow.report().ok_or_else(|| {
            DomainError::InvalidTransition {
                phase: self.workflow.phase().name().to_string(),
                action: "read preview".to_string(),
            }
            .into()
        })
    }

    /// Create the movement
    pub async fn commit(&mut self, session: &Session) -> ClientResult<&S::Receipt> {
        session.require(S::CAPABILITY)?;
        let ticket = self.workflow.begin_commit()?;
        let totals = self.workflow.totals();

        let result: ClientResult<S::Receipt> = self
            .api
            .warehouse()
            .create(session, S::KIND, &ticket.payload)
            .await;

        match result {
            Ok(receipt) => {
                let code = S::receipt_code(&receipt);
                S::check_receipt(&receipt, self.workflow.lines());
                self.workflow.complete_commit(&ticket, code.clone());
                tracing::info!(
                    kind = %S::KIND,
                    code = %code,
                    lines = totals.line_count,
                    quantity = totals.total_quantity,
                    "Movement committed"
                );

                if let Err(e) = self.refresh_history(session).await {
                    tracing::warn!(kind = %S::KIND, "History refresh failed: {}", e);
                }
                Ok(self.last_receipt.insert(receipt))
            }
            Err(e) => {
                tracing::error!(
                    kind = %S::KIND,
                    code = e.code(),
                    lines = totals.line_count,
                    "Commit failed: {}",
                    e
                );
                self.workflow.commit_failed(&ticket, e.to_string());
                Err(e)
            }
        }
    }

    pub async fn refresh_history(&mut self, session: &Session) -> ClientResult<()> {
        self.history = self.api.warehouse().history(session, S::KIND).await?;
        Ok(())
    }
}

impl MovementDesk<ImportShape> {
    /// Add a line for a batch being received
    pub fn receive(
        &mut self,
        product: &Product,
        batch_id: &str,
        manufacture_date: Option<NaiveDate>,
        expiry_date: Option<NaiveDate>,
        quantity: i64,
    ) -> ClientResult<()> {
        validate_batch_code(batch_id).map_err(|msg| DomainError::validation("batch_id", msg))?;
        validate_batch_dates(manufacture_date, expiry_date)
            .map_err(|msg| DomainError::validation("expiry_date", msg))?;
        self.add_line(LineCandidate::for_import(
            product,
            batch_id,
            manufacture_date,
            expiry_date,
            quantity,
        ))
    }
}

impl<S: MovementEndpoint> MovementDesk<S> {
    /// Add units of an existing batch (export and transfer screens)
    pub fn add_batch(
        &mut self,
        product: &Product,
        batch: &Batch,
        quantity: i64,
        today: NaiveDate,
    ) -> ClientResult<()> {
        if !S::KIND.has_stock_ceiling() {
            return Err(DomainError::validation(
                "batch",
                "Received goods are entered as new batches",
            )
            .into());
        }
        if batch.is_expired_on(today) {
            return Err(DomainError::ExpiredBatch {
                batch_id: batch.batch_id.clone(),
            }
            .into());
        }
        self.add_line(LineCandidate::from_batch(product, batch, quantity))
    }
}
