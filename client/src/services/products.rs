//! Catalogue maintenance for managers

use shared::{Capability, DomainError, Product, ProductDraft, ProductUpdate};
use validator::Validate;

use crate::api::ApiClient;
use crate::error::ClientResult;
use crate::session::Session;

pub struct ProductDesk {
    api: ApiClient,
}

impl ProductDesk {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn create(&self, session: &Session, draft: &ProductDraft) -> ClientResult<Product> {
        session.require(Capability::Products)?;
        draft
            .validate()
            .map_err(|errors| DomainError::from_validation("product", &errors))?;
        let product = self.api.catalog().create_product(session, draft).await?;
        tracing::info!(product_id = %product.product_id, "Product created");
        Ok(product)
    }

    /// Apply a partial edit; an edit with no fields set is refused
    pub async fn update(
        &self,
        session: &Session,
        product_id: &str,
        update: &ProductUpdate,
    ) -> ClientResult<Product> {
        session.require(Capability::Products)?;
        if update.is_empty() {
            return Err(DomainError::validation("product", "Nothing to update").into());
        }
        update
            .validate()
            .map_err(|errors| DomainError::from_validation("product", &errors))?;
        let product = self
            .api
            .catalog()
            .update_product(session, product_id, update)
            .await?;
        tracing::info!(product_id, "Product updated");
        Ok(product)
    }

    pub async fn delete(&self, session: &Session, product_id: &str) -> ClientResult<()> {
        session.require(Capability::Products)?;
        self.api.catalog().delete_product(session, product_id).await?;
        tracing::info!(product_id, "Product deleted");
        Ok(())
    }
}
