//! Supplier order desk
//!
//! Clerks and managers draft orders and submit them for approval; only
//! managers approve, reject or delete them.

use shared::{
    Capability, DomainError, Draft, LineCandidate, LineItem, LineKey, OrderDecision, OrderHeader,
    OrderSuggestion, Product, Supplier, SupplierOrder, SupplierOrderShape,
};

use crate::api::ApiClient;
use crate::error::ClientResult;
use crate::session::Session;

pub struct OrderDesk {
    api: ApiClient,
    draft: Draft<SupplierOrderShape>,
    last_order: Option<SupplierOrder>,
}

impl OrderDesk {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            draft: Draft::new(),
            last_order: None,
        }
    }

    pub fn draft(&self) -> &Draft<SupplierOrderShape> {
        &self.draft
    }

    pub fn last_order(&self) -> Option<&SupplierOrder> {
        self.last_order.as_ref()
    }

    pub async fn suppliers(&self, session: &Session) -> ClientResult<Vec<Supplier>> {
        session.require(Capability::SupplierOrders)?;
        self.api.orders().suppliers(session).await
    }

    pub async fn suggestions(&self, session: &Session) -> ClientResult<Vec<OrderSuggestion>> {
        session.require(Capability::SupplierOrders)?;
        self.api.orders().suggestions(session).await
    }

    pub fn update_header(&mut self, edit: impl FnOnce(&mut OrderHeader)) {
        self.draft.update_header(edit);
    }

    pub fn add_product(&mut self, product: &Product, quantity: i64) -> ClientResult<&LineItem> {
        Ok(self
            .draft
            .add_line(LineCandidate::for_order(product, quantity))?)
    }

    /// Add a suggestion at its suggested quantity, or its shortage when the
    /// backend suggested nothing
    pub fn add_suggestion(&mut self, suggestion: &OrderSuggestion) -> ClientResult<&LineItem> {
        let quantity = if suggestion.suggested_quantity > 0 {
            suggestion.suggested_quantity
        } else {
            suggestion.shortage
        };
        self.add_product(&suggestion.product, quantity)
    }

    pub fn update_quantity(&mut self, product_id: &str, quantity: i64) -> ClientResult<()> {
        Ok(self
            .draft
            .update_quantity(&LineKey::new(product_id, ""), quantity)?)
    }

    pub fn remove_line(&mut self, product_id: &str) {
        self.draft.remove_line(&LineKey::new(product_id, ""));
    }

    /// Submit the draft for approval; a failure keeps the draft
    pub async fn submit(&mut self, session: &Session) -> ClientResult<&SupplierOrder> {
        session.require(Capability::SupplierOrders)?;
        let request = self.draft.payload()?;
        let totals = self.draft.totals();

        match self.api.orders().create(session, &request).await {
            Ok(order) => {
                tracing::info!(
                    order_code = %order.order_code,
                    supplier = %order.supplier,
                    lines = totals.line_count,
                    quantity = totals.total_quantity,
                    "Supplier order submitted"
                );
                if order.total_quantity != totals.total_quantity {
                    tracing::warn!(
                        order_code = %order.order_code,
                        server_quantity = order.total_quantity,
                        draft_quantity = totals.total_quantity,
                        "Ordered quantity differs from the draft"
                    );
                }
                self.draft.reset();
                Ok(self.last_order.insert(order))
            }
            Err(e) => {
                tracing::error!(code = e.code(), "Supplier order failed: {}", e);
                Err(e)
            }
        }
    }

    pub async fn orders(&self, session: &Session) -> ClientResult<Vec<SupplierOrder>> {
        session.require(Capability::SupplierOrders)?;
        self.api.orders().list(session).await
    }

    pub async fn order(&self, session: &Session, order_code: &str) -> ClientResult<SupplierOrder> {
        session.require(Capability::SupplierOrders)?;
        self.api.orders().get(session, order_code).await
    }

    pub async fn approve(&self, session: &Session, order_code: &str) -> ClientResult<OrderDecision> {
        session.require(Capability::ApproveOrders)?;
        let decision = self.api.orders().approve(session, order_code).await?;
        tracing::info!(order_code, status = %decision.status, "Supplier order approved");
        Ok(decision)
    }

    pub async fn reject(
        &self,
        session: &Session,
        order_code: &str,
        reason: &str,
    ) -> ClientResult<OrderDecision> {
        session.require(Capability::ApproveOrders)?;
        let reason = reason.trim();
        if reason.is_empty() {
            return Err(DomainError::validation("reason", "A rejection reason is required").into());
        }
        let decision = self.api.orders().reject(session, order_code, reason).await?;
        tracing::info!(order_code, status = %decision.status, "Supplier order rejected");
        Ok(decision)
    }

    /// Delete an order that has not been approved
    pub async fn delete(&self, session: &Session, order: &SupplierOrder) -> ClientResult<()> {
        session.require(Capability::ApproveOrders)?;
        if !order.status.can_delete() {
            return Err(DomainError::InvalidTransition {
                phase: order.status.to_string(),
                action: "delete order".to_string(),
            }
            .into());
        }
        self.api.orders().delete(session, &order.order_code).await?;
        tracing::info!(order_code = %order.order_code, "Supplier order deleted");
        Ok(())
    }
}
