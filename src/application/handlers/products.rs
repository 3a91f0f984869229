use std::sync::Arc;

use uuid::Uuid;

use crate::application::dto::{
    DeleteResponse, PageQuery, ProductListResponse, ProductRequest, ProductResponse,
};
use crate::application::errors::{EntityKind, HandlerError};
use crate::domain::product::Product;
use crate::metrics::Metrics;
use crate::store::{page_of, DataContext};
use super::{commit, observe};

#[derive(Clone)]
pub struct ProductHandler {
    context: Arc<dyn DataContext>,
    metrics: Option<Arc<Metrics>>,
}

impl ProductHandler {
    pub fn new(context: Arc<dyn DataContext>) -> Self {
        Self {
            context,
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub async fn create(&self, request: ProductRequest) -> Result<ProductResponse, HandlerError> {
        observe(self.metrics.as_deref(), "create_product", self.create_product(request)).await
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<ProductResponse, HandlerError> {
        observe(self.metrics.as_deref(), "get_product", self.get_product(id)).await
    }

    pub async fn get_all(&self, query: PageQuery) -> Result<ProductListResponse, HandlerError> {
        observe(self.metrics.as_deref(), "list_products", self.list_products(query)).await
    }

    /// Replace every field; the new price must still be positive
    pub async fn update(
        &self,
        id: Uuid,
        request: ProductRequest,
    ) -> Result<ProductResponse, HandlerError> {
        observe(self.metrics.as_deref(), "update_product", self.update_product(id, request)).await
    }

    /// Delete a product; order lines referencing it go with it
    pub async fn delete(&self, id: Uuid) -> Result<DeleteResponse, HandlerError> {
        observe(self.metrics.as_deref(), "delete_product", self.delete_product(id)).await
    }

    async fn create_product(&self, request: ProductRequest) -> Result<ProductResponse, HandlerError> {
        let scope = self.context.begin();
        let product = Product::new(request.title, request.description, request.slug, request.price)?;

        scope.products.add(product.clone()).await?;
        commit(&scope, self.metrics.as_deref()).await?;

        tracing::info!(product_id = %product.id(), price = %product.price(), "✅ Product created");
        Ok(ProductResponse::from(&product))
    }

    async fn get_product(&self, id: Uuid) -> Result<ProductResponse, HandlerError> {
        let scope = self.context.begin();
        let product = scope
            .products
            .get_by_id(id)
            .await?
            .ok_or_else(|| HandlerError::not_found(EntityKind::Product, id))?;

        Ok(ProductResponse::from(&product))
    }

    async fn list_products(&self, query: PageQuery) -> Result<ProductListResponse, HandlerError> {
        let scope = self.context.begin();
        let products = scope.products.get_all().await?;
        let total_count = products.len();

        let (page, page_size) = (query.page(), query.page_size());
        let products = page_of(products, page, page_size)
            .iter()
            .map(ProductResponse::from)
            .collect();

        Ok(ProductListResponse {
            products,
            page,
            page_size,
            total_count,
        })
    }

    async fn update_product(
        &self,
        id: Uuid,
        request: ProductRequest,
    ) -> Result<ProductResponse, HandlerError> {
        let scope = self.context.begin();
        let mut product = scope
            .products
            .get_by_id(id)
            .await?
            .ok_or_else(|| HandlerError::not_found(EntityKind::Product, id))?;

        product.update(request.title, request.description, request.slug, request.price)?;

        scope.products.update(product.clone()).await?;
        commit(&scope, self.metrics.as_deref()).await?;

        tracing::info!(product_id = %id, price = %product.price(), "✅ Product updated");
        Ok(ProductResponse::from(&product))
    }

    async fn delete_product(&self, id: Uuid) -> Result<DeleteResponse, HandlerError> {
        let scope = self.context.begin();
        if scope.products.get_by_id(id).await?.is_none() {
            return Err(HandlerError::not_found(EntityKind::Product, id));
        }

        scope.products.delete(id).await?;
        commit(&scope, self.metrics.as_deref()).await?;

        tracing::info!(product_id = %id, "✅ Product deleted");
        Ok(DeleteResponse::deleted("Product"))
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
