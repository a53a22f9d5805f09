//! Product mutations and owner-scoped reads.
//!
//! Each mutation validates the submitted form, checks ownership and returns
//! the outcome; redirects are left to the route handlers.

use sqlx::PgPool;
use thiserror::Error;

use asseto_core::{
    DashboardMetrics, DomainError, InventoryQuery, InventorySummary, NewProduct, Product,
    ProductId, ProductInput, ProductPatch, UserId,
};

use crate::db::{ProductRepository, RepositoryError};

/// Errors from product operations.
#[derive(Debug, Error)]
pub enum ProductError {
    /// Validation, not-found or ownership failure.
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("database error: {0}")]
    Repository(RepositoryError),
}

impl From<RepositoryError> for ProductError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => Self::Domain(DomainError::NotFound),
            other => Self::Repository(other),
        }
    }
}

/// One page of the inventory listing plus its aggregates.
#[derive(Debug, Clone)]
pub struct InventoryPage {
    pub summary: InventorySummary,
    pub products: Vec<Product>,
}

/// Product service.
pub struct ProductService<'a> {
    products: ProductRepository<'a>,
}

impl<'a> ProductService<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            products: ProductRepository::new(pool),
        }
    }

    /// Create a product owned by `user_id`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the name is missing or a number
    /// cannot be parsed.
    pub async fn create(
        &self,
        user_id: UserId,
        input: &ProductInput,
    ) -> Result<Product, ProductError> {
        let new_product = NewProduct::try_from(input)?;
        let product = self.products.create(user_id, &new_product).await?;

        tracing::info!(product_id = %product.id, user_id = %user_id, "Product created");
        Ok(product)
    }

    /// Apply a partial update to a product owned by `user_id`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` for a missing product id or bad
    /// numbers, `DomainError::NotFound` if the product does not exist and
    /// `DomainError::Unauthorized` if another user owns it.
    pub async fn update(
        &self,
        user_id: UserId,
        input: &ProductInput,
    ) -> Result<Product, ProductError> {
        let id = input.product_id()?;
        let patch = ProductPatch::try_from(input)?;
        let existing = self.owned(id, user_id).await?;

        let product = self.products.update(&patch.apply(existing)).await?;

        tracing::info!(product_id = %product.id, user_id = %user_id, "Product updated");
        Ok(product)
    }

    /// Permanently delete a product owned by `user_id`.
    ///
    /// # Errors
    ///
    /// Same failure rules as [`ProductService::update`].
    pub async fn delete(&self, user_id: UserId, input: &ProductInput) -> Result<(), ProductError> {
        let id = input.product_id()?;
        self.owned(id, user_id).await?;
        self.products.delete(id, user_id).await?;

        tracing::info!(product_id = %id, user_id = %user_id, "Product deleted");
        Ok(())
    }

    /// Product for the edit form, or `None` if `raw_id` is malformed,
    /// missing or belongs to someone else.
    ///
    /// # Errors
    ///
    /// Returns `ProductError::Repository` if the lookup fails.
    pub async fn find_for_edit(
        &self,
        user_id: UserId,
        raw_id: &str,
    ) -> Result<Option<Product>, ProductError> {
        let Ok(id) = raw_id.parse::<ProductId>() else {
            return Ok(None);
        };
        match self.owned(id, user_id).await {
            Ok(product) => Ok(Some(product)),
            Err(ProductError::Domain(DomainError::NotFound | DomainError::Unauthorized)) => {
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Aggregates and one page of the owner's filtered products.
    ///
    /// # Errors
    ///
    /// Returns `ProductError::Repository` if a query fails.
    pub async fn inventory(
        &self,
        user_id: UserId,
        query: &InventoryQuery,
    ) -> Result<InventoryPage, ProductError> {
        let summary = self.products.summary(user_id, query.search.as_ref()).await?;
        let products = self.products.page(user_id, query).await?;
        Ok(InventoryPage { summary, products })
    }

    /// Dashboard metrics plus the most recently created products.
    ///
    /// # Errors
    ///
    /// Returns `ProductError::Repository` if the query fails.
    pub async fn dashboard(
        &self,
        user_id: UserId,
        recent: usize,
    ) -> Result<(DashboardMetrics, Vec<Product>), ProductError> {
        let products = self.products.list_for_user(user_id).await?;
        let metrics = DashboardMetrics::compute(&products, chrono::Utc::now().date_naive());
        let recent_products = products.into_iter().take(recent).collect();
        Ok((metrics, recent_products))
    }

    async fn owned(&self, id: ProductId, user_id: UserId) -> Result<Product, ProductError> {
        let product = self.products.get(id).await?.ok_or(DomainError::NotFound)?;
        product.ensure_owned_by(user_id)?;
        Ok(product)
    }
}
