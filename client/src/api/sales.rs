//! Point-of-sale endpoints

use serde::Serialize;
use shared::{
    Invoice, InvoiceRequest, PaginatedResponse, Pagination, ReturnQuery, ReturnReceipt,
    ReturnRequest, ReturnableInvoice, SaleBatches, SaleScanRequest, SaleScanResponse, ScanMode,
};

use super::ApiClient;
use crate::error::ClientResult;
use crate::session::Session;

#[derive(Serialize)]
struct InvoiceLookup<'a> {
    ma_hd: &'a str,
}

pub struct SalesApi<'a> {
    api: &'a ApiClient,
}

impl<'a> SalesApi<'a> {
    pub(crate) fn new(api: &'a ApiClient) -> Self {
        Self { api }
    }

    /// Sellable batches of a product across regular warehouses
    pub async fn product_batches(
        &self,
        session: &Session,
        product_id: &str,
    ) -> ClientResult<SaleBatches> {
        self.api
            .get(
                Some(session),
                &format!("/sales/products/{}/batches", product_id),
            )
            .await
    }

    pub async fn scan(&self, session: &Session, barcode: &str) -> ClientResult<SaleScanResponse> {
        let body = SaleScanRequest {
            barcode: barcode.to_string(),
        };
        self.api
            .post(Some(session), ScanMode::Sale.path(), &body)
            .await
    }

    /// Create the invoice and its stock issue; sent once, never retried
    pub async fn create_invoice(
        &self,
        session: &Session,
        request: &InvoiceRequest,
    ) -> ClientResult<Invoice> {
        self.api.post(Some(session), "/sales/invoices", request).await
    }

    /// Invoice with its sold batches, return status and age
    pub async fn returnable_invoice(
        &self,
        session: &Session,
        invoice_code: &str,
    ) -> ClientResult<ReturnableInvoice> {
        let query = InvoiceLookup {
            ma_hd: invoice_code,
        };
        self.api
            .get_with_query(Some(session), "/sales/returns/search-invoice", &query)
            .await
    }

    /// Record the return and put the goods back into stock; sent once
    pub async fn create_return(
        &self,
        session: &Session,
        request: &ReturnRequest,
    ) -> ClientResult<ReturnReceipt> {
        self.api.post(Some(session), "/sales/returns", request).await
    }

    pub async fn returns(
        &self,
        session: &Session,
        query: &ReturnQuery,
    ) -> ClientResult<PaginatedResponse<ReturnReceipt>> {
        let page = Pagination {
            page: query.page,
            per_page: query.per_page,
        }
        .clamped();
        let query = ReturnQuery {
            page: page.page,
            per_page: page.per_page,
            ..query.clone()
        };
        self.api
            .get_with_query(Some(session), "/sales/returns", &query)
            .await
    }

    pub async fn return_detail(
        &self,
        session: &Session,
        return_code: &str,
    ) -> ClientResult<ReturnReceipt> {
        self.api
            .get(Some(session), &format!("/sales/returns/{}", return_code))
            .await
    }
}
