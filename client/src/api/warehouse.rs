//! Warehouse endpoints: reference data, FEFO lookup, scans and movements

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use shared::{
    DiscardReceipt, DiscardRequest, FefoSuggestion, InventorySnapshot, MovementKind,
    PreviewReport, StockDocument, Warehouse, WarehouseScanRequest, WarehouseScanResponse,
};

use super::ApiClient;
use crate::error::ClientResult;
use crate::session::Session;

#[derive(Debug, Serialize)]
struct FefoRequest<'a> {
    #[serde(rename = "MaSP")]
    product_id: &'a str,
    #[serde(rename = "MaKho")]
    warehouse_id: &'a str,
    #[serde(rename = "SoLuong")]
    quantity: i64,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum DocumentList {
    Wrapped { items: Vec<StockDocument> },
    Bare(Vec<StockDocument>),
}

/// Warehouse operations
pub struct WarehouseApi<'a> {
    api: &'a ApiClient,
}

impl<'a> WarehouseApi<'a> {
    pub(crate) fn new(api: &'a ApiClient) -> Self {
        Self { api }
    }

    pub async fn warehouses(&self, session: &Session) -> ClientResult<Vec<Warehouse>> {
        self.api.get(Some(session), "/warehouse/warehouses").await
    }

    /// Batch rows currently held by one warehouse
    pub async fn inventory(
        &self,
        session: &Session,
        warehouse_id: &str,
    ) -> ClientResult<InventorySnapshot> {
        self.api
            .get(
                Some(session),
                &format!("/warehouse/warehouses/{}/inventory", warehouse_id),
            )
            .await
    }

    /// Batches with stock for a product in a warehouse, with the backend's
    /// suggested split of `quantity` across them
    pub async fn fefo_batches(
        &self,
        session: &Session,
        product_id: &str,
        warehouse_id: &str,
        quantity: i64,
    ) -> ClientResult<FefoSuggestion> {
        let body = FefoRequest {
            product_id,
            warehouse_id,
            quantity,
        };
        self.api
            .post(Some(session), "/warehouse/export/fefo-batches", &body)
            .await
    }

    /// Resolve a barcode on the export or transfer screen
    pub async fn scan(
        &self,
        session: &Session,
        path: &str,
        request: &WarehouseScanRequest,
    ) -> ClientResult<WarehouseScanResponse> {
        self.api.post(Some(session), path, request).await
    }

    /// Classify every line of a draft without touching stock
    pub async fn preview<B: Serialize + ?Sized>(
        &self,
        session: &Session,
        kind: MovementKind,
        payload: &B,
    ) -> ClientResult<PreviewReport> {
        self.api
            .post(Some(session), &kind.preview_path(), payload)
            .await
    }

    /// Create the movement; sent once, never retried
    pub async fn create<B, R>(
        &self,
        session: &Session,
        kind: MovementKind,
        payload: &B,
    ) -> ClientResult<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        self.api
            .post(Some(session), &kind.create_path(), payload)
            .await
    }

    /// Documents previously created on a movement screen
    pub async fn history(
        &self,
        session: &Session,
        kind: MovementKind,
    ) -> ClientResult<Vec<StockDocument>> {
        let list: DocumentList = self.api.get(Some(session), &kind.create_path()).await?;
        Ok(match list {
            DocumentList::Wrapped { items } => items,
            DocumentList::Bare(items) => items,
        })
    }

    /// Write off defective stock; sent once, never retried
    pub async fn discard(
        &self,
        session: &Session,
        request: &DiscardRequest,
    ) -> ClientResult<DiscardReceipt> {
        self.api
            .post(Some(session), "/warehouse/discard", request)
            .await
    }
}
