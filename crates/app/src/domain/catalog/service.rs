//! Catalog Service

use async_trait::async_trait;
use mockall::automock;
use tracing::debug;

use crate::{
    database::Db,
    domain::catalog::{
        CatalogServiceError,
        data::ProductQuery,
        records::{CategoryRecord, ProductListing},
        repository::PgCatalogRepository,
    },
};

#[derive(Debug, Clone)]
pub struct PgCatalogService {
    db: Db,
    repository: PgCatalogRepository,
}

impl PgCatalogService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgCatalogRepository::new(),
        }
    }
}

#[async_trait]
impl CatalogService for PgCatalogService {
    #[tracing::instrument(
        name = "catalog.service.list_products",
        skip(self),
        fields(result_count = tracing::field::Empty),
        err
    )]
    async fn list_products(
        &self,
        query: ProductQuery,
    ) -> Result<Vec<ProductListing>, CatalogServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let products = self.repository.list_products(&mut tx, query).await?;

        tx.commit().await?;

        tracing::Span::current().record("result_count", tracing::field::display(products.len()));

        Ok(products)
    }

    #[tracing::instrument(name = "catalog.service.list_categories", skip(self), err)]
    async fn list_categories(&self) -> Result<Vec<CategoryRecord>, CatalogServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let categories = self.repository.list_categories(&mut tx).await?;

        tx.commit().await?;

        Ok(categories)
    }

    #[tracing::instrument(name = "catalog.service.popular_products", skip(self), err)]
    async fn popular_products(
        &self,
        limit: u32,
    ) -> Result<Vec<ProductListing>, CatalogServiceError> {
        let products = self.list_products(ProductQuery::popular(limit)).await?;

        debug!(count = products.len(), "loaded popular products");

        Ok(products)
    }
}

#[automock]
#[async_trait]
pub trait CatalogService: Send + Sync {
    /// List products matching `query`, each with its category name and variants.
    async fn list_products(
        &self,
        query: ProductQuery,
    ) -> Result<Vec<ProductListing>, CatalogServiceError>;

    /// List every category.
    async fn list_categories(&self) -> Result<Vec<CategoryRecord>, CatalogServiceError>;

    /// The `limit` most ordered in-stock products.
    async fn popular_products(&self, limit: u32)
    -> Result<Vec<ProductListing>, CatalogServiceError>;
}
