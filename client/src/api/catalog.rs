//! Product catalogue endpoints

use serde::Deserialize;
use shared::{
    LowStockReport, PaginatedResponse, Pagination, Product, ProductDraft, ProductQuery,
    ProductUpdate,
};

use super::ApiClient;
use crate::error::ClientResult;
use crate::session::Session;

#[derive(Deserialize)]
struct CategoryList {
    #[serde(default)]
    categories: Vec<String>,
}

/// Catalogue lookups
pub struct CatalogApi<'a> {
    api: &'a ApiClient,
}

impl<'a> CatalogApi<'a> {
    pub(crate) fn new(api: &'a ApiClient) -> Self {
        Self { api }
    }

    /// Search or list products, one page at a time
    pub async fn products(
        &self,
        session: &Session,
        query: &ProductQuery,
    ) -> ClientResult<PaginatedResponse<Product>> {
        let page = Pagination {
            page: query.page,
            per_page: query.per_page,
        }
        .clamped();
        let query = ProductQuery {
            page: page.page,
            per_page: page.per_page,
            ..query.clone()
        };
        self.api
            .get_with_query(Some(session), "/products", &query)
            .await
    }

    pub async fn product(&self, session: &Session, product_id: &str) -> ClientResult<Product> {
        self.api
            .get(Some(session), &format!("/products/{}", product_id))
            .await
    }

    pub async fn categories(&self, session: &Session) -> ClientResult<Vec<String>> {
        let list: CategoryList = self.api.get(Some(session), "/products/categories").await?;
        Ok(list.categories)
    }

    /// Products at or below their reorder level
    pub async fn low_stock(&self, session: &Session) -> ClientResult<LowStockReport> {
        self.api.get(Some(session), "/products/low-stock").await
    }

    /// Add a product to the catalogue
    pub async fn create_product(
        &self,
        session: &Session,
        draft: &ProductDraft,
    ) -> ClientResult<Product> {
        self.api.post(Some(session), "/products", draft).await
    }

    pub async fn update_product(
        &self,
        session: &Session,
        product_id: &str,
        update: &ProductUpdate,
    ) -> ClientResult<Product> {
        self.api
            .put(Some(session), &format!("/products/{}", product_id), update)
            .await
    }

    /// Remove a product; the backend refuses while it still has stock
    pub async fn delete_product(&self, session: &Session, product_id: &str) -> ClientResult<()> {
        self.api
            .delete(Some(session), &format!("/products/{}", product_id))
            .await
    }
}
