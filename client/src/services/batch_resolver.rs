//! Batch resolver: candidate batches for a product, in FEFO order
//!
//! The backend decides which batches have stock and how a requested quantity
//! is split across them. The resolver re-applies the client-side ordering so
//! ranks are deterministic, and keeps "no batches" apart from a failed call.

use chrono::NaiveDate;
use shared::{order_fefo, preferred_batch, select_batch, Batch, Product};

use crate::api::ApiClient;
use crate::error::ClientResult;
use crate::session::Session;

/// Outcome of a batch lookup that reached the backend
#[derive(Debug, Clone, PartialEq)]
pub enum BatchLookup {
    /// The product has no batch with stock in this context
    NoBatches,
    /// Batches ordered by expiry, `fefo_rank` assigned
    Available(Vec<Batch>),
}

impl BatchLookup {
    fn from_batches(batches: Vec<Batch>) -> Self {
        if batches.is_empty() {
            BatchLookup::NoBatches
        } else {
            BatchLookup::Available(order_fefo(batches))
        }
    }

    pub fn batches(&self) -> &[Batch] {
        match self {
            BatchLookup::NoBatches => &[],
            BatchLookup::Available(batches) => batches,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, BatchLookup::NoBatches)
    }

    /// First selectable batch: lowest rank that is neither expired nor empty
    pub fn preferred(&self, today: NaiveDate) -> Option<&Batch> {
        preferred_batch(self.batches(), today)
    }

    /// Pick a batch by id, refusing expired ones
    pub fn select(&self, batch_id: &str, today: NaiveDate) -> ClientResult<&Batch> {
        Ok(select_batch(self.batches(), batch_id, today)?)
    }
}

/// FEFO lookup for a requested quantity on the export or transfer screen
#[derive(Debug, Clone, PartialEq)]
pub struct FefoLookup {
    pub lookup: BatchLookup,
    /// The batches together hold at least the requested quantity
    pub can_fulfill: bool,
    pub shortage: i64,
}

impl FefoLookup {
    /// Sum of the backend's per-batch suggestions
    pub fn suggested_total(&self) -> i64 {
        self.lookup
            .batches()
            .iter()
            .filter_map(|b| b.suggested_quantity)
            .sum()
    }
}

/// Resolves products to candidate batches
#[derive(Clone)]
pub struct BatchResolver {
    api: ApiClient,
}

impl BatchResolver {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Batches of `product_id` in a source warehouse, with the backend's
    /// suggested split of `quantity`
    pub async fn for_movement(
        &self,
        session: &Session,
        product_id: &str,
        warehouse_id: &str,
        quantity: i64,
    ) -> ClientResult<FefoLookup> {
        let suggestion = self
            .api
            .warehouse()
            .fefo_batches(session, product_id, warehouse_id, quantity.max(0))
            .await?;

        tracing::debug!(
            product_id,
            warehouse_id,
            batches = suggestion.batches.len(),
            can_fulfill = suggestion.can_fulfill,
            "Resolved FEFO batches"
        );

        Ok(FefoLookup {
            lookup: BatchLookup::from_batches(suggestion.batches),
            can_fulfill: suggestion.can_fulfill,
            shortage: suggestion.shortage,
        })
    }

    /// Sellable batches of a product for the POS
    pub async fn for_sale(
        &self,
        session: &Session,
        product_id: &str,
    ) -> ClientResult<(Product, BatchLookup)> {
        let sale = self.api.sales().product_batches(session, product_id).await?;
        tracing::debug!(
            product_id,
            batches = sale.batches.len(),
            total_stock = sale.total_stock,
            "Resolved sale batches"
        );
        Ok((sale.product, BatchLookup::from_batches(sale.batches)))
    }
}
