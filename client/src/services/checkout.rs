//! Point-of-sale checkout
//!
//! Holds the cashier's cart and turns it into an invoice. A failed invoice
//! call leaves the cart untouched for a manual retry; a successful one
//! empties it.

use chrono::NaiveDate;
use shared::{
    Batch, CartTotals, Capability, DomainError, Invoice, LineCandidate, LineItem, LineKey,
    LineStore, Product, SaleHeader, SaleShape,
};

use crate::api::ApiClient;
use crate::error::{ClientError, ClientResult};
use crate::services::scan::ScanOutcome;
use crate::session::Session;

pub struct Checkout {
    api: ApiClient,
    cart: LineStore<SaleShape>,
    last_invoice: Option<Invoice>,
}

impl Checkout {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            cart: LineStore::new(),
            last_invoice: None,
        }
    }

    pub fn lines(&self) -> &[LineItem] {
        self.cart.lines()
    }

    pub fn totals(&self) -> CartTotals {
        self.cart.total()
    }

    pub fn last_invoice(&self) -> Option<&Invoice> {
        self.last_invoice.as_ref()
    }

    /// Add units of a batch picked in the batch dialog
    pub fn add_batch(
        &mut self,
        product: &Product,
        batch: &Batch,
        quantity: i64,
        today: NaiveDate,
    ) -> ClientResult<&LineItem> {
        if batch.is_expired_on(today) {
            return Err(DomainError::ExpiredBatch {
                batch_id: batch.batch_id.clone(),
            }
            .into());
        }
        Ok(self
            .cart
            .add_line(LineCandidate::from_batch(product, batch, quantity))?)
    }

    /// Add a scanned item with the outcome's draft quantity
    pub fn add_scanned(&mut self, outcome: &ScanOutcome, today: NaiveDate) -> ClientResult<&LineItem> {
        let product = outcome.hit.product.as_ref().ok_or_else(|| {
            ClientError::from(DomainError::validation(
                "product",
                "Scan result has no product details",
            ))
        })?;
        self.add_batch(product, &outcome.hit.batch, outcome.draft_quantity, today)
    }

    pub fn update_quantity(&mut self, key: &LineKey, quantity: i64) -> ClientResult<()> {
        Ok(self.cart.update_quantity(key, quantity)?)
    }

    pub fn remove_line(&mut self, key: &LineKey) {
        self.cart.remove_line(key);
    }

    pub fn clear(&mut self) {
        self.cart.clear();
    }

    /// Create the invoice for the current cart
    pub async fn submit(&mut self, session: &Session) -> ClientResult<&Invoice> {
        session.require(Capability::PointOfSale)?;
        if self.cart.is_empty() {
            return Err(DomainError::validation("lines", "Cart is empty").into());
        }

        let request = self.cart.assemble(&SaleHeader);
        let totals = self.cart.total();
        match self.api.sales().create_invoice(session, &request).await {
            Ok(invoice) => {
                tracing::info!(
                    invoice_code = %invoice.invoice_code,
                    lines = totals.line_count,
                    total_amount = totals.total_amount,
                    "Invoice created"
                );
                if let Some(server_total) = invoice.total_amount {
                    if server_total != totals.total_amount {
                        tracing::warn!(
                            invoice_code = %invoice.invoice_code,
                            server_total,
                            cart_total = totals.total_amount,
                            "Invoice total differs from cart total"
                        );
                    }
                }
                self.cart.clear();
                Ok(self.last_invoice.insert(invoice))
            }
            Err(e) => {
                tracing::error!(
                    lines = totals.line_count,
                    code = e.code(),
                    "Invoice creation failed: {}",
                    e
                );
                Err(e)
            }
        }
    }
}
