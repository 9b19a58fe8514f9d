//! Supplier and supplier order endpoints

use serde::Deserialize;
use shared::{
    OrderCreated, OrderDecision, OrderSuggestion, RejectOrderRequest, Supplier, SupplierOrder,
    SupplierOrderRequest,
};

use super::ApiClient;
use crate::error::ClientResult;
use crate::session::Session;

#[derive(Deserialize)]
struct SupplierList {
    #[serde(default)]
    suppliers: Vec<Supplier>,
}

#[derive(Deserialize)]
struct SuggestionList {
    #[serde(default)]
    suggestions: Vec<OrderSuggestion>,
}

#[derive(Deserialize)]
struct OrderList {
    #[serde(default)]
    orders: Vec<SupplierOrder>,
}

pub struct OrdersApi<'a> {
    api: &'a ApiClient,
}

impl<'a> OrdersApi<'a> {
    pub(crate) fn new(api: &'a ApiClient) -> Self {
        Self { api }
    }

    pub async fn suppliers(&self, session: &Session) -> ClientResult<Vec<Supplier>> {
        let list: SupplierList = self.api.get(Some(session), "/suppliers").await?;
        Ok(list.suppliers)
    }

    /// Products below their warning level, largest shortage first
    pub async fn suggestions(&self, session: &Session) -> ClientResult<Vec<OrderSuggestion>> {
        let list: SuggestionList = self.api.get(Some(session), "/suggest-order").await?;
        Ok(list.suggestions)
    }

    /// Submit an order for approval; sent once, never retried
    pub async fn create(
        &self,
        session: &Session,
        request: &SupplierOrderRequest,
    ) -> ClientResult<SupplierOrder> {
        let created: OrderCreated = self.api.post(Some(session), "/orders", request).await?;
        Ok(created.order)
    }

    pub async fn list(&self, session: &Session) -> ClientResult<Vec<SupplierOrder>> {
        let list: OrderList = self.api.get(Some(session), "/orders").await?;
        Ok(list.orders)
    }

    pub async fn get(&self, session: &Session, order_code: &str) -> ClientResult<SupplierOrder> {
        self.api
            .get(Some(session), &format!("/orders/{}", order_code))
            .await
    }

    pub async fn approve(&self, session: &Session, order_code: &str) -> ClientResult<OrderDecision> {
        self.api
            .post(
                Some(session),
                &format!("/orders/{}/approve", order_code),
                &serde_json::json!({}),
            )
            .await
    }

    pub async fn reject(
        &self,
        session: &Session,
        order_code: &str,
        reason: &str,
    ) -> ClientResult<OrderDecision> {
        let body = RejectOrderRequest {
            reason: reason.to_string(),
        };
        self.api
            .post(Some(session), &format!("/orders/{}/reject", order_code), &body)
            .await
    }

    pub async fn delete(&self, session: &Session, order_code: &str) -> ClientResult<()> {
        self.api
            .delete(Some(session), &format!("/orders/{}", order_code))
            .await
    }
}
