//! Report desk: expiry, sales and batch history

use chrono::NaiveDate;
use shared::{
    BatchHistory, BatchHistoryQuery, Capability, DomainError, ExpiryQuery, ExpiryReport,
    SalesQuery, SalesReport,
};

use crate::api::ApiClient;
use crate::error::ClientResult;
use crate::session::Session;

pub struct ReportDesk {
    api: ApiClient,
}

impl ReportDesk {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn expiry(&self, session: &Session, query: &ExpiryQuery) -> ClientResult<ExpiryReport> {
        session.require(Capability::Reports)?;
        if query.days == 0 {
            return Err(DomainError::validation("days", "Look-ahead must be at least one day").into());
        }
        let report = self.api.reports().expiry(session, query).await?;
        tracing::debug!(
            expired = report.expired.len(),
            expiring = report.expiring.len(),
            days = query.days,
            "Expiry report received"
        );
        Ok(report)
    }

    pub async fn sales(
        &self,
        session: &Session,
        from_date: NaiveDate,
        to_date: NaiveDate,
    ) -> ClientResult<SalesReport> {
        session.require(Capability::Reports)?;
        let query = SalesQuery::new(from_date, to_date)?;
        let report = self.api.reports().sales(session, &query).await?;
        if report.daily_revenue() != report.summary.total_revenue {
            tracing::warn!(
                daily = report.daily_revenue(),
                summary = report.summary.total_revenue,
                "Daily revenue does not add up to the summary"
            );
        }
        Ok(report)
    }

    pub async fn batch_history(
        &self,
        session: &Session,
        product_id: &str,
        batch_id: &str,
    ) -> ClientResult<BatchHistory> {
        session.require(Capability::Reports)?;
        let (product_id, batch_id) = (product_id.trim(), batch_id.trim());
        if product_id.is_empty() || batch_id.is_empty() {
            return Err(DomainError::validation("batch", "Product and batch are both required").into());
        }
        let query = BatchHistoryQuery {
            batch_id: batch_id.to_string(),
            product_id: product_id.to_string(),
        };
        self.api.reports().batch_history(session, &query).await
    }
}
