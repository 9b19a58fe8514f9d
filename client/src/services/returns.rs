//! Customer return desk
//!
//! Look up the invoice, pick the lines coming back, then submit once. The
//! backend books the goods into a regular or the defect warehouse and
//! records the refund.

use shared::{
    Capability, DomainError, Draft, LineItem, LineKey, PaginatedResponse, ReturnHeader,
    ReturnQuery, ReturnReceipt, ReturnShape, ReturnableInvoice,
};

use crate::api::ApiClient;
use crate::error::ClientResult;
use crate::session::Session;

pub struct ReturnDesk {
    api: ApiClient,
    invoice: Option<ReturnableInvoice>,
    draft: Draft<ReturnShape>,
    last_receipt: Option<ReturnReceipt>,
}

impl ReturnDesk {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            invoice: None,
            draft: Draft::new(),
            last_receipt: None,
        }
    }

    /// The invoice being returned, if one is open
    pub fn invoice(&self) -> Option<&ReturnableInvoice> {
        self.invoice.as_ref()
    }

    pub fn draft(&self) -> &Draft<ReturnShape> {
        &self.draft
    }

    pub fn last_receipt(&self) -> Option<&ReturnReceipt> {
        self.last_receipt.as_ref()
    }

    /// Open an invoice for return, replacing any open one
    ///
    /// Invoices already returned or past the return window are refused and
    /// leave the desk as it was.
    pub async fn open_invoice(
        &mut self,
        session: &Session,
        invoice_code: &str,
    ) -> ClientResult<&ReturnableInvoice> {
        session.require(Capability::Returns)?;
        let invoice_code = invoice_code.trim();
        if invoice_code.is_empty() {
            return Err(DomainError::validation("invoice", "Enter an invoice code").into());
        }

        let invoice = self
            .api
            .sales()
            .returnable_invoice(session, invoice_code)
            .await?;
        invoice.check_returnable(self.draft.header().policy_days)?;

        tracing::debug!(
            invoice_code = %invoice.invoice_code,
            lines = invoice.items.len(),
            days_since_purchase = invoice.days_since_purchase,
            "Invoice opened for return"
        );
        let policy_days = self.draft.header().policy_days;
        self.draft.reset();
        self.draft.update_header(|h| {
            h.invoice_code = invoice.invoice_code.clone();
            h.policy_days = policy_days;
        });
        Ok(self.invoice.insert(invoice))
    }

    pub fn update_header(&mut self, edit: impl FnOnce(&mut ReturnHeader)) {
        self.draft.update_header(edit);
    }

    /// Return `quantity` units of one sold batch
    pub fn add_return(
        &mut self,
        product_id: &str,
        batch_id: &str,
        quantity: i64,
    ) -> ClientResult<&LineItem> {
        let invoice = self.invoice.as_ref().ok_or_else(|| DomainError::InvalidTransition {
            phase: "no open invoice".to_string(),
            action: "add return line".to_string(),
        })?;
        let line = invoice.line(product_id, batch_id).ok_or_else(|| {
            DomainError::LineNotFound {
                product_id: product_id.to_string(),
                batch_id: batch_id.to_string(),
            }
        })?;
        let candidate = line.candidate(quantity)?;
        Ok(self.draft.add_line(candidate)?)
    }

    pub fn update_quantity(&mut self, key: &LineKey, quantity: i64) -> ClientResult<()> {
        Ok(self.draft.update_quantity(key, quantity)?)
    }

    pub fn remove_line(&mut self, key: &LineKey) {
        self.draft.remove_line(key);
    }

    /// Submit the return; a failure keeps the invoice and every line
    pub async fn submit(&mut self, session: &Session) -> ClientResult<&ReturnReceipt> {
        session.require(Capability::Returns)?;
        let invoice_code = self
            .invoice
            .as_ref()
            .map(|i| i.invoice_code.clone())
            .ok_or_else(|| DomainError::validation("invoice", "Open an invoice first"))?;
        self.draft.update_header(|h| h.invoice_code = invoice_code.clone());
        let request = self.draft.payload()?;
        let totals = self.draft.totals();

        match self.api.sales().create_return(session, &request).await {
            Ok(receipt) => {
                tracing::info!(
                    return_code = %receipt.return_code,
                    invoice_code = %invoice_code,
                    restock_into = %request.restock_into,
                    quantity = totals.total_quantity,
                    "Return recorded"
                );
                if let Some(refund) = receipt.refund_amount {
                    if refund != totals.total_amount {
                        tracing::warn!(
                            return_code = %receipt.return_code,
                            refund,
                            draft_total = totals.total_amount,
                            "Refund differs from the returned lines"
                        );
                    }
                }
                self.invoice = None;
                self.draft.reset();
                Ok(self.last_receipt.insert(receipt))
            }
            Err(e) => {
                tracing::error!(invoice_code = %invoice_code, code = e.code(), "Return failed: {}", e);
                Err(e)
            }
        }
    }

    pub async fn history(
        &self,
        session: &Session,
        query: &ReturnQuery,
    ) -> ClientResult<PaginatedResponse<ReturnReceipt>> {
        session.require(Capability::Returns)?;
        self.api.sales().returns(session, query).await
    }

    pub async fn detail(&self, session: &Session, return_code: &str) -> ClientResult<ReturnReceipt> {
        session.require(Capability::Returns)?;
        self.api.sales().return_detail(session, return_code).await
    }
}
