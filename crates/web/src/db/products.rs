//! Product repository.
//!
//! Every read and write is scoped by owner except [`ProductRepository::get`],
//! which exists so callers can tell "missing" apart from "someone else's".

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use asseto_core::{
    InventoryQuery, InventorySummary, NewProduct, Product, ProductId, SearchTerm, UserId,
};

use super::RepositoryError;

const PRODUCT_COLUMNS: &str =
    "id, user_id, name, sku, price, quantity, low_stock_at, created_at";

/// Owner + optional name/SKU filter shared by the listing queries.
/// `$1` is the owner and `$2` the escaped `ILIKE` pattern or NULL.
const LISTING_FILTER: &str =
    "user_id = $1 AND ($2::TEXT IS NULL OR name ILIKE $2 OR sku ILIKE $2)";

#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: ProductId,
    user_id: UserId,
    name: String,
    sku: Option<String>,
    price: Decimal,
    quantity: i32,
    low_stock_at: Option<i32>,
    created_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            name: row.name,
            sku: row.sku,
            price: row.price,
            quantity: row.quantity,
            low_stock_at: row.low_stock_at,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct SummaryRow {
    total_count: i64,
    total_quantity: i64,
    low_stock_count: i64,
}

impl From<SummaryRow> for InventorySummary {
    fn from(row: SummaryRow) -> Self {
        Self {
            total_count: row.total_count,
            total_quantity: row.total_quantity,
            low_stock_count: row.low_stock_count,
        }
    }
}

/// Repository for product database operations.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a product by ID regardless of owner.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM asseto.product WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Product::from))
    }

    /// Insert a product owned by `user_id`, created now.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(
        &self,
        user_id: UserId,
        product: &NewProduct,
    ) -> Result<Product, RepositoryError> {
        self.create_at(user_id, product, Utc::now()).await
    }

    /// Insert a product with an explicit creation time.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create_at(
        &self,
        user_id: UserId,
        product: &NewProduct,
        created_at: DateTime<Utc>,
    ) -> Result<Product, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            r"
            INSERT INTO asseto.product
                (id, user_id, name, sku, price, quantity, low_stock_at, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {PRODUCT_COLUMNS}
            "
        ))
        .bind(ProductId::generate())
        .bind(user_id)
        .bind(&product.name)
        .bind(&product.sku)
        .bind(product.price)
        .bind(product.quantity)
        .bind(product.low_stock_at)
        .bind(created_at)
        .fetch_one(self.pool)
        .await?;

        Ok(row.into())
    }

    /// Persist the mutable fields of `product`.
    ///
    /// The write is guarded by owner as well as ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no row matches ID and owner.
    /// Returns `RepositoryError::Database` if the update fails.
    pub async fn update(&self, product: &Product) -> Result<Product, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            r"
            UPDATE asseto.product
            SET name = $3, sku = $4, price = $5, quantity = $6, low_stock_at = $7,
                updated_at = NOW()
            WHERE id = $1 AND user_id = $2
            RETURNING {PRODUCT_COLUMNS}
            "
        ))
        .bind(product.id)
        .bind(product.user_id)
        .bind(&product.name)
        .bind(&product.sku)
        .bind(product.price)
        .bind(product.quantity)
        .bind(product.low_stock_at)
        .fetch_optional(self.pool)
        .await?;

        row.map(Product::from).ok_or(RepositoryError::NotFound)
    }

    /// Permanently delete a product owned by `user_id`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no row matches ID and owner.
    /// Returns `RepositoryError::Database` if the delete fails.
    pub async fn delete(&self, id: ProductId, user_id: UserId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM asseto.product WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Count, total quantity and low-stock count over the filtered set.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn summary(
        &self,
        user_id: UserId,
        search: Option<&SearchTerm>,
    ) -> Result<InventorySummary, RepositoryError> {
        let row = sqlx::query_as::<_, SummaryRow>(&format!(
            r"
            SELECT
                COUNT(*) AS total_count,
                COALESCE(SUM(quantity), 0)::BIGINT AS total_quantity,
                COUNT(*) FILTER (
                    WHERE low_stock_at IS NOT NULL AND quantity <= low_stock_at
                ) AS low_stock_count
            FROM asseto.product
            WHERE {LISTING_FILTER}
            "
        ))
        .bind(user_id)
        .bind(search.map(SearchTerm::like_pattern))
        .fetch_one(self.pool)
        .await?;

        Ok(row.into())
    }

    /// One page of the filtered set, newest first.
    ///
    /// Pages past the end return an empty list.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn page(
        &self,
        user_id: UserId,
        query: &InventoryQuery,
    ) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            r"
            SELECT {PRODUCT_COLUMNS}
            FROM asseto.product
            WHERE {LISTING_FILTER}
            ORDER BY created_at DESC, id
            LIMIT $3 OFFSET $4
            "
        ))
        .bind(user_id)
        .bind(query.search.as_ref().map(SearchTerm::like_pattern))
        .bind(query.limit())
        .bind(query.offset())
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    /// Every product owned by `user_id`, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            r"
            SELECT {PRODUCT_COLUMNS}
            FROM asseto.product
            WHERE user_id = $1
            ORDER BY created_at DESC, id
            "
        ))
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Product::from).collect())
    }
}
