//! REST client for the warehouse/retail backend
//!
//! Every endpoint answers with the `{ success, message, data | error }`
//! envelope. Create and commit calls are sent once; nothing here retries.

mod adjustment;
mod auth;
mod catalog;
mod orders;
mod reports;
mod sales;
mod warehouse;

pub use adjustment::AdjustmentApi;
pub use auth::AuthApi;
pub use catalog::CatalogApi;
pub use orders::OrdersApi;
pub use reports::ReportsApi;
pub use sales::SalesApi;
pub use warehouse::WarehouseApi;

use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder};
use serde::{de::DeserializeOwned, Serialize};
use shared::ApiEnvelope;
use uuid::Uuid;

use crate::config::ApiConfig;
use crate::error::{ClientError, ClientResult};
use crate::session::Session;

/// Header carrying the per-request correlation id
pub const REQUEST_ID_HEADER: &str = "X-Request-Id";

/// Low-level HTTP client shared by the endpoint groups
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Create a client from configuration
    pub fn new(config: &ApiConfig) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Create a client with custom base URL (for testing)
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn auth(&self) -> AuthApi<'_> {
        AuthApi::new(self)
    }

    pub fn catalog(&self) -> CatalogApi<'_> {
        CatalogApi::new(self)
    }

    pub fn warehouse(&self) -> WarehouseApi<'_> {
        WarehouseApi::new(self)
    }

    pub fn sales(&self) -> SalesApi<'_> {
        SalesApi::new(self)
    }

    pub fn adjustment(&self) -> AdjustmentApi<'_> {
        AdjustmentApi::new(self)
    }

    pub fn orders(&self) -> OrdersApi<'_> {
        OrdersApi::new(self)
    }

    pub fn reports(&self) -> ReportsApi<'_> {
        ReportsApi::new(self)
    }

    fn request(&self, method: Method, path: &str, session: Option<&Session>) -> RequestBuilder {
        let builder = self
            .client
            .request(method, format!("{}{}", self.base_url, path));
        match session {
            Some(session) => builder.bearer_auth(session.bearer()),
            None => builder,
        }
    }

    pub(crate) async fn get<T>(&self, session: Option<&Session>, path: &str) -> ClientResult<T>
    where
        T: DeserializeOwned,
    {
        let builder = self.request(Method::GET, path, session);
        self.send(Method::GET, path, builder).await
    }

    pub(crate) async fn get_with_query<T, Q>(
        &self,
        session: Option<&Session>,
        path: &str,
        query: &Q,
    ) -> ClientResult<T>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let builder = self.request(Method::GET, path, session).query(query);
        self.send(Method::GET, path, builder).await
    }

    pub(crate) async fn post<T, B>(
        &self,
        session: Option<&Session>,
        path: &str,
        body: &B,
    ) -> ClientResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let builder = self.request(Method::POST, path, session).json(body);
        self.send(Method::POST, path, builder).await
    }

    pub(crate) async fn put<T, B>(
        &self,
        session: Option<&Session>,
        path: &str,
        body: &B,
    ) -> ClientResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let builder = self.request(Method::PUT, path, session).json(body);
        self.send(Method::PUT, path, builder).await
    }

    pub(crate) async fn delete<T>(&self, session: Option<&Session>, path: &str) -> ClientResult<T>
    where
        T: DeserializeOwned,
    {
        let builder = self.request(Method::DELETE, path, session);
        self.send(Method::DELETE, path, builder).await
    }

    async fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        builder: RequestBuilder,
    ) -> ClientResult<T> {
        let request_id = Uuid::new_v4();
        tracing::debug!(%method, path, %request_id, "Sending request");

        let response = builder
            .header(REQUEST_ID_HEADER, request_id.to_string())
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(%method, path, %request_id, "Request failed: {}", e);
                ClientError::Transport(e)
            })?;

        let status = response.status();
        let body = response.text().await?;
        tracing::debug!(%method, path, %request_id, status = status.as_u16(), "Received response");

        decode_envelope(path, status, &body)
    }
}

/// Turn a raw response into the envelope's `data`, or the matching error
fn decode_envelope<T: DeserializeOwned>(
    path: &str,
    status: reqwest::StatusCode,
    body: &str,
) -> ClientResult<T> {
    let envelope = serde_json::from_str::<ApiEnvelope<serde_json::Value>>(body);

    if !status.is_success() {
        let message = envelope
            .ok()
            .and_then(|env| env.failure_message().map(str::to_string))
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("Request failed")
                    .to_string()
            });
        return Err(ClientError::from_status(status, message));
    }

    let envelope = envelope.map_err(|e| ClientError::Decode {
        path: path.to_string(),
        message: e.to_string(),
    })?;

    if !envelope.success {
        let message = envelope
            .failure_message()
            .unwrap_or("Request was not successful")
            .to_string();
        return Err(ClientError::ServerValidation { message });
    }

    let data = envelope.data.unwrap_or(serde_json::Value::Null);
    serde_json::from_value(data).map_err(|e| ClientError::Decode {
        path: path.to_string(),
        message: e.to_string(),
    })
}
