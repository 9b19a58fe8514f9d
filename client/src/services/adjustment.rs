//! Inventory count and adjustment desk
//!
//! Counting happens in two steps: open a count sheet for a warehouse, then
//! record the counted quantities. Adjustment turns a recorded count's
//! discrepancies into import and export receipts on the backend.

use shared::{
    AdjustableCount, AdjustmentPreview, AdjustmentRecord, AdjustmentResult, Capability,
    CountResult, CountSheet, DomainError, LineKey, StartCountRequest,
};

use crate::api::ApiClient;
use crate::error::ClientResult;
use crate::session::Session;

pub struct AdjustmentDesk {
    api: ApiClient,
    sheet: Option<CountSheet>,
}

impl AdjustmentDesk {
    pub fn new(api: ApiClient) -> Self {
        Self { api, sheet: None }
    }

    /// The open count, if any
    pub fn sheet(&self) -> Option<&CountSheet> {
        self.sheet.as_ref()
    }

    pub async fn start_count(
        &mut self,
        session: &Session,
        warehouse_id: &str,
        purpose: Option<&str>,
    ) -> ClientResult<&CountSheet> {
        session.require(Capability::InventoryCount)?;
        if warehouse_id.trim().is_empty() {
            return Err(DomainError::validation("warehouse", "Select a warehouse first").into());
        }

        let request = StartCountRequest {
            warehouse_id: warehouse_id.to_string(),
            purpose: purpose
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(str::to_string),
        };
        let start = self.api.adjustment().start_count(session, &request).await?;
        tracing::info!(
            check_code = %start.document.check_code,
            warehouse_id,
            batches = start.batches.len(),
            "Inventory count started"
        );
        Ok(self.sheet.insert(CountSheet::new(start)))
    }

    fn open_sheet(&mut self) -> ClientResult<&mut CountSheet> {
        self.sheet.as_mut().ok_or_else(|| {
            DomainError::InvalidTransition {
                phase: "no open count".to_string(),
                action: "record count".to_string(),
            }
            .into()
        })
    }

    pub fn record(&mut self, key: &LineKey, quantity: i64) -> ClientResult<()> {
        Ok(self.open_sheet()?.record_count(key, quantity)?)
    }

    pub fn record_by_barcode(&mut self, barcode: &str, quantity: i64) -> ClientResult<LineKey> {
        Ok(self.open_sheet()?.record_by_barcode(barcode, quantity)?)
    }

    /// Submit the open count; the sheet is closed only on success
    pub async fn submit_count(&mut self, session: &Session) -> ClientResult<CountResult> {
        session.require(Capability::InventoryCount)?;
        let request = self.open_sheet()?.to_request();
        let result = self.api.adjustment().record_count(session, &request).await?;
        tracing::info!(
            check_code = %request.check_code,
            discrepancies = result.discrepancies.len(),
            "Inventory count recorded"
        );
        self.sheet = None;
        Ok(result)
    }

    pub async fn adjustable_counts(&self, session: &Session) -> ClientResult<Vec<AdjustableCount>> {
        session.require(Capability::InventoryAdjustment)?;
        self.api.adjustment().adjustable_counts(session).await
    }

    pub async fn preview(
        &self,
        session: &Session,
        check_code: &str,
    ) -> ClientResult<AdjustmentPreview> {
        session.require(Capability::InventoryAdjustment)?;
        self.api.adjustment().preview(session, check_code).await
    }

    /// Create the adjustment receipts for a recorded count
    pub async fn execute(&self, session: &Session, check_code: &str) -> ClientResult<AdjustmentResult> {
        session.require(Capability::InventoryAdjustment)?;
        match self.api.adjustment().execute(session, check_code).await {
            Ok(result) => {
                tracing::info!(
                    check_code,
                    import_receipts = result.import_receipts.len(),
                    export_receipts = result.export_receipts.len(),
                    "Adjustment executed"
                );
                Ok(result)
            }
            Err(e) => {
                tracing::error!(check_code, code = e.code(), "Adjustment failed: {}", e);
                Err(e)
            }
        }
    }

    pub async fn history(&self, session: &Session) -> ClientResult<Vec<AdjustmentRecord>> {
        session.require(Capability::InventoryAdjustment)?;
        self.api.adjustment().history(session).await
    }
}
