//! Inventory count and stock adjustment endpoints

use serde::Deserialize;
use shared::{
    AdjustableCount, AdjustmentPreview, AdjustmentRecord, AdjustmentRequest, AdjustmentResult,
    CountReport, CountResult, CountStart, RecordCountRequest, StartCountRequest,
};

use super::ApiClient;
use crate::error::ClientResult;
use crate::session::Session;

#[derive(Deserialize)]
struct AdjustableList {
    #[serde(default)]
    inventories: Vec<AdjustableCount>,
}

#[derive(Deserialize)]
struct HistoryList {
    #[serde(default)]
    adjustments: Vec<AdjustmentRecord>,
}

pub struct AdjustmentApi<'a> {
    api: &'a ApiClient,
}

impl<'a> AdjustmentApi<'a> {
    pub(crate) fn new(api: &'a ApiClient) -> Self {
        Self { api }
    }

    /// Open a count; the response lists every batch with its system quantity
    pub async fn start_count(
        &self,
        session: &Session,
        request: &StartCountRequest,
    ) -> ClientResult<CountStart> {
        self.api
            .post(Some(session), "/warehouse/inventory/start", request)
            .await
    }

    pub async fn record_count(
        &self,
        session: &Session,
        request: &RecordCountRequest,
    ) -> ClientResult<CountResult> {
        self.api
            .post(Some(session), "/warehouse/inventory/record", request)
            .await
    }

    pub async fn count_report(
        &self,
        session: &Session,
        check_code: &str,
    ) -> ClientResult<CountReport> {
        self.api
            .get(
                Some(session),
                &format!("/warehouse/inventory/{}", check_code),
            )
            .await
    }

    /// Counts with recorded results that have not been adjusted yet
    pub async fn adjustable_counts(&self, session: &Session) -> ClientResult<Vec<AdjustableCount>> {
        let list: AdjustableList = self
            .api
            .get(Some(session), "/warehouse/adjustment/inventories")
            .await?;
        Ok(list.inventories)
    }

    pub async fn preview(
        &self,
        session: &Session,
        check_code: &str,
    ) -> ClientResult<AdjustmentPreview> {
        let body = AdjustmentRequest {
            check_code: check_code.to_string(),
        };
        self.api
            .post(Some(session), "/warehouse/adjustment/preview", &body)
            .await
    }

    /// Create the adjustment receipts; sent once, never retried
    pub async fn execute(
        &self,
        session: &Session,
        check_code: &str,
    ) -> ClientResult<AdjustmentResult> {
        let body = AdjustmentRequest {
            check_code: check_code.to_string(),
        };
        self.api
            .post(Some(session), "/warehouse/adjustment", &body)
            .await
    }

    pub async fn history(&self, session: &Session) -> ClientResult<Vec<AdjustmentRecord>> {
        let list: HistoryList = self
            .api
            .get(Some(session), "/warehouse/adjustment/history")
            .await?;
        Ok(list.adjustments)
    }
}
