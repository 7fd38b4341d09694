//! # Product Repository
//!
//! Database operations for the catalog.
//!
//! ## Key Operations
//! - Add / update / save (add-or-update) from inventory control
//! - Lookup and listing for the sales terminal
//! - Stock decrement (also done inside the sale transaction)
//!
//! ## Save Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Admin saves "Pen" (stock 50, 2.00, 1.00)                              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  INSERT INTO products ...                                              │
//! │       │                                                                 │
//! │       ├── ok ───────────────────────────────► SaveOutcome::Created     │
//! │       │                                                                 │
//! │       └── UNIQUE constraint failed: products.name                      │
//! │                │                                                        │
//! │                ▼                                                        │
//! │           UPDATE products ... WHERE name = ? ──► SaveOutcome::Updated  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//! No read-then-branch: two admins saving the same new name at once both
//! end up with exactly one row.

use ecotrack_core::validation::{validate_price, validate_product_name, validate_stock};
use ecotrack_core::Product;
use serde::Serialize;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};

/// Whether `save` inserted a new row or updated an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SaveOutcome {
    Created,
    Updated,
}

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = db.products();
///
/// repo.add(&Product::new("Pen", 10, Money::from_cents(200), Money::from_cents(100))).await?;
/// let pen = repo.get_by_name("Pen").await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Lists the whole catalog ordered by name.
    pub async fn list(&self) -> DbResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT name, stock, price_cents, cost_price_cents
            FROM products
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        debug!(count = products.len(), "Listed products");
        Ok(products)
    }

    /// Gets a product by its name.
    pub async fn get_by_name(&self, name: &str) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            SELECT name, stock, price_cents, cost_price_cents
            FROM products
            WHERE name = ?1
            "#,
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Explicit membership query.
    pub async fn exists(&self, name: &str) -> DbResult<bool> {
        let found: Option<i64> = sqlx::query_scalar("SELECT 1 FROM products WHERE name = ?1")
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;

        Ok(found.is_some())
    }

    /// Number of products in the catalog.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Inserts a new product.
    ///
    /// ## Errors
    /// * `DbError::UniqueViolation` - the name is taken; the existing row is untouched
    /// * `DbError::Validation` - empty name, negative stock or price
    pub async fn add(&self, product: &Product) -> DbResult<()> {
        validate(product)?;

        debug!(name = %product.name, stock = product.stock, "Adding product");

        sqlx::query(
            r#"
            INSERT INTO products (name, stock, price_cents, cost_price_cents)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )
        .bind(&product.name)
        .bind(product.stock)
        .bind(product.price)
        .bind(product.cost_price)
        .execute(&self.pool)
        .await
        .map_err(|e| match DbError::from(e) {
            DbError::UniqueViolation { field, .. } => DbError::UniqueViolation {
                field,
                value: product.name.clone(),
            },
            other => other,
        })?;

        Ok(())
    }

    /// Overwrites stock, price and cost of the product with this name.
    ///
    /// Returns the number of rows affected: 0 when the name doesn't exist.
    pub async fn update(&self, product: &Product) -> DbResult<u64> {
        validate(product)?;

        debug!(name = %product.name, stock = product.stock, "Updating product");

        let result = sqlx::query(
            r#"
            UPDATE products SET
                stock = ?2,
                price_cents = ?3,
                cost_price_cents = ?4
            WHERE name = ?1
            "#,
        )
        .bind(&product.name)
        .bind(product.stock)
        .bind(product.price)
        .bind(product.cost_price)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    /// Add-or-update used by inventory control.
    pub async fn save(&self, product: &Product) -> DbResult<SaveOutcome> {
        match self.add(product).await {
            Ok(()) => Ok(SaveOutcome::Created),
            Err(DbError::UniqueViolation { .. }) => {
                if self.update(product).await? == 0 {
                    // Row vanished between the two statements; products are never
                    // deleted by the application, so this is outside interference.
                    return Err(DbError::not_found("Product", &product.name));
                }
                Ok(SaveOutcome::Updated)
            }
            Err(e) => Err(e),
        }
    }

    /// Reduces stock by `quantity`. No floor is enforced here.
    ///
    /// Returns the number of rows affected.
    pub async fn decrement_stock(&self, name: &str, quantity: i64) -> DbResult<u64> {
        debug!(name = %name, quantity, "Decrementing stock");

        let result = sqlx::query("UPDATE products SET stock = stock - ?2 WHERE name = ?1")
            .bind(name)
            .bind(quantity)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}

fn validate(product: &Product) -> DbResult<()> {
    validate_product_name(&product.name)?;
    validate_stock(product.stock)?;
    validate_price("price", product.price)?;
    validate_price("cost_price", product.cost_price)?;
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
