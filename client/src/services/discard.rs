//! Discard desk: write off stock held in the defect warehouse

use shared::{
    Capability, DiscardHeader, DiscardReceipt, DiscardShape, DomainError, Draft,
    InventorySnapshot, LineItem, LineKey, WarehouseKind,
};

use crate::api::ApiClient;
use crate::error::ClientResult;
use crate::session::Session;

pub struct DiscardDesk {
    api: ApiClient,
    stock: Option<InventorySnapshot>,
    draft: Draft<DiscardShape>,
    last_receipt: Option<DiscardReceipt>,
}

impl DiscardDesk {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            stock: None,
            draft: Draft::new(),
            last_receipt: None,
        }
    }

    /// Defect stock as last loaded
    pub fn stock(&self) -> Option<&InventorySnapshot> {
        self.stock.as_ref()
    }

    pub fn draft(&self) -> &Draft<DiscardShape> {
        &self.draft
    }

    pub fn last_receipt(&self) -> Option<&DiscardReceipt> {
        self.last_receipt.as_ref()
    }

    /// Load the batches of a defect warehouse; other warehouses are refused
    pub async fn load(&mut self, session: &Session, warehouse_id: &str) -> ClientResult<&InventorySnapshot> {
        session.require(Capability::Discard)?;
        let warehouse = self.api.warehouse();
        let kind = warehouse
            .warehouses(session)
            .await?
            .into_iter()
            .find(|w| w.warehouse_id == warehouse_id)
            .map(|w| w.kind)
            .ok_or_else(|| DomainError::validation("warehouse", "Unknown warehouse"))?;
        if kind != WarehouseKind::Defect {
            return Err(DomainError::validation(
                "warehouse",
                "Only stock in the defect warehouse can be discarded",
            )
            .into());
        }

        let snapshot = warehouse.inventory(session, warehouse_id).await?;
        tracing::debug!(warehouse_id, batches = snapshot.inventory.len(), "Defect stock loaded");
        self.draft.reset();
        Ok(self.stock.insert(snapshot))
    }

    pub fn update_header(&mut self, edit: impl FnOnce(&mut DiscardHeader)) {
        self.draft.update_header(edit);
    }

    /// Discard `quantity` units of a loaded batch
    pub fn add(&mut self, product_id: &str, batch_id: &str, quantity: i64) -> ClientResult<&LineItem> {
        let stock = self.stock.as_ref().ok_or_else(|| DomainError::InvalidTransition {
            phase: "no defect stock loaded".to_string(),
            action: "add discard line".to_string(),
        })?;
        let row = stock.row(product_id, batch_id).ok_or_else(|| DomainError::LineNotFound {
            product_id: product_id.to_string(),
            batch_id: batch_id.to_string(),
        })?;
        let candidate = row.candidate(quantity);
        Ok(self.draft.add_line(candidate)?)
    }

    pub fn update_quantity(&mut self, key: &LineKey, quantity: i64) -> ClientResult<()> {
        Ok(self.draft.update_quantity(key, quantity)?)
    }

    pub fn remove_line(&mut self, key: &LineKey) {
        self.draft.remove_line(key);
    }

    /// Write the lines off; a failure keeps every line
    pub async fn submit(&mut self, session: &Session) -> ClientResult<&DiscardReceipt> {
        session.require(Capability::Discard)?;
        let request = self.draft.payload()?;
        let totals = self.draft.totals();

        match self.api.warehouse().discard(session, &request).await {
            Ok(receipt) => {
                tracing::info!(
                    code = %receipt.document.code,
                    lines = totals.line_count,
                    quantity = receipt.total_quantity(),
                    "Defect stock discarded"
                );
                self.draft.reset();
                // Stock figures are stale after the write-off
                self.stock = None;
                Ok(self.last_receipt.insert(receipt))
            }
            Err(e) => {
                tracing::error!(code = e.code(), lines = totals.line_count, "Discard failed: {}", e);
                Err(e)
            }
        }
    }
}
