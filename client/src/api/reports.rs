//! Report endpoints

use shared::{
    BatchHistory, BatchHistoryQuery, ExpiryQuery, ExpiryReport, SalesQuery, SalesReport,
};

use super::ApiClient;
use crate::error::ClientResult;
use crate::session::Session;

pub struct ReportsApi<'a> {
    api: &'a ApiClient,
}

impl<'a> ReportsApi<'a> {
    pub(crate) fn new(api: &'a ApiClient) -> Self {
        Self { api }
    }

    /// Batches expired or expiring within `query.days`
    pub async fn expiry(&self, session: &Session, query: &ExpiryQuery) -> ClientResult<ExpiryReport> {
        self.api
            .get_with_query(Some(session), "/reports/expiry", query)
            .await
    }

    pub async fn sales(&self, session: &Session, query: &SalesQuery) -> ClientResult<SalesReport> {
        self.api
            .get_with_query(Some(session), "/reports/sales", query)
            .await
    }

    /// Receipts that touched one batch
    pub async fn batch_history(
        &self,
        session: &Session,
        query: &BatchHistoryQuery,
    ) -> ClientResult<BatchHistory> {
        self.api
            .get_with_query(Some(session), "/reports/batch-history", query)
            .await
    }
}
