//! # Sale Repository
//!
//! The sale recorder: turns a checked-out cart into a permanent sale and
//! takes the sold units out of stock, all or nothing.
//!
//! ## The Sale Transaction
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     record_sale(draft, policy)                          │
//! │                                                                         │
//! │  BEGIN                                                                  │
//! │    │                                                                    │
//! │    ├── 1. INSERT INTO sales (items_json, totals, date, cashier)        │
//! │    │      RETURNING id, date   (AUTOINCREMENT id, date taken by SQLite │
//! │    │                            once the write lock is held)           │
//! │    │                                                                    │
//! │    ├── 2. for each line:                                               │
//! │    │      Reject:        UPDATE ... SET stock = stock - q              │
//! │    │                     WHERE name = ? AND stock >= q                 │
//! │    │      AllowOversell: UPDATE ... SET stock = stock - q              │
//! │    │                     WHERE name = ?                                │
//! │    │      0 rows? ──► ProductNotFound / InsufficientStock ──► ROLLBACK │
//! │    │                                                                    │
//! │  COMMIT ──► SaleReceipt { invoice_id, timestamp }                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Why the conditional UPDATE
//! The cart checked stock when each line was added. Another terminal may
//! have sold the same units since. Folding the check into the UPDATE
//! makes it atomic with the decrement; SQLite serializes writers, so two
//! checkouts can never both take the last unit.

use ecotrack_core::cart::{decode_line_items, encode_line_items};
use ecotrack_core::{Money, Sale, SaleDraft, SaleReceipt, StockPolicy, SALE_TIMESTAMP_FORMAT};
use sqlx::{Sqlite, SqlitePool, Transaction};
use tracing::{debug, info, warn};

use crate::error::{DbError, DbResult};

/// Row shape of the `sales` table.
#[derive(Debug, sqlx::FromRow)]
struct SaleRow {
    id: i64,
    items_json: String,
    total_price_cents: Money,
    total_cost_cents: Money,
    date: String,
    cashier: String,
}

impl TryFrom<SaleRow> for Sale {
    type Error = DbError;

    fn try_from(row: SaleRow) -> Result<Self, Self::Error> {
        Ok(Sale {
            id: row.id,
            line_items: decode_line_items(&row.items_json)?,
            total_price: row.total_price_cents,
            total_cost: row.total_cost_cents,
            date: row.date,
            cashier: row.cashier,
        })
    }
}

/// Repository for sale database operations.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    /// Creates a new SaleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    /// Persists a sale and decrements stock in one transaction.
    ///
    /// ## Returns
    /// * `Ok(SaleReceipt)` - invoice id and the timestamp stored with the sale
    /// * `Err(DbError::NotFound)` - a line names a product that no longer exists
    /// * `Err(DbError::InsufficientStock)` - `Reject` policy and stock ran out
    ///
    /// On any error nothing is written. The caller's cart is not touched.
    pub async fn record_sale(
        &self,
        draft: &SaleDraft,
        policy: StockPolicy,
    ) -> DbResult<SaleReceipt> {
        let items_json = encode_line_items(draft.line_items())?;

        debug!(
            cashier = %draft.cashier(),
            lines = draft.line_items().len(),
            total = %draft.total_price(),
            ?policy,
            "Recording sale"
        );

        let mut tx = self.pool.begin().await?;

        // The INSERT is the first statement, so SQLite has granted the write
        // lock before `now` is evaluated; dates follow invoice order.
        let (invoice_id, timestamp): (i64, String) = sqlx::query_as(
            r#"
            INSERT INTO sales (items_json, total_price_cents, total_cost_cents, date, cashier)
            VALUES (?1, ?2, ?3, strftime(?4, 'now', 'localtime'), ?5)
            RETURNING id, date
            "#,
        )
        .bind(&items_json)
        .bind(draft.total_price())
        .bind(draft.total_cost())
        .bind(SALE_TIMESTAMP_FORMAT)
        .bind(draft.cashier())
        .fetch_one(&mut *tx)
        .await?;

        for line in draft.line_items() {
            decrement_in_tx(&mut tx, &line.product_name, line.quantity, policy).await?;
        }

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        info!(
            invoice_id,
            cashier = %draft.cashier(),
            total = %draft.total_price(),
            "Sale recorded"
        );

        Ok(SaleReceipt {
            invoice_id,
            timestamp,
        })
    }

    /// Gets a sale by invoice id.
    pub async fn get(&self, id: i64) -> DbResult<Option<Sale>> {
        let row = sqlx::query_as::<_, SaleRow>(
            r#"
            SELECT id, items_json, total_price_cents, total_cost_cents, date, cashier
            FROM sales
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Sale::try_from).transpose()
    }

    /// All sales, newest first.
    pub async fn list(&self) -> DbResult<Vec<Sale>> {
        let rows = sqlx::query_as::<_, SaleRow>(
            r#"
            SELECT id, items_json, total_price_cents, total_cost_cents, date, cashier
            FROM sales
            ORDER BY id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Sale::try_from).collect()
    }

    /// Number of recorded sales.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sales")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

/// Takes `quantity` units of `name` out of stock inside `tx`.
async fn decrement_in_tx(
    tx: &mut Transaction<'_, Sqlite>,
    name: &str,
    quantity: i64,
    policy: StockPolicy,
) -> DbResult<()> {
    let sql = match policy {
        StockPolicy::Reject => {
            "UPDATE products SET stock = stock - ?1 WHERE name = ?2 AND stock >= ?1"
        }
        StockPolicy::AllowOversell => "UPDATE products SET stock = stock - ?1 WHERE name = ?2",
    };

    let result = sqlx::query(sql)
        .bind(quantity)
        .bind(name)
        .execute(&mut **tx)
        .await?;

    let remaining: Option<i64> = sqlx::query_scalar("SELECT stock FROM products WHERE name = ?1")
        .bind(name)
        .fetch_optional(&mut **tx)
        .await?;

    if result.rows_affected() == 0 {
        return Err(match remaining {
            None => {
                warn!(product = %name, "Sale rejected: product no longer exists");
                DbError::not_found("Product", name)
            }
            Some(available) => {
                warn!(product = %name, available, requested = quantity, "Sale rejected: insufficient stock");
                DbError::InsufficientStock {
                    product: name.to_string(),
                    available,
                    requested: quantity,
                }
            }
        });
    }

    if let Some(stock) = remaining.filter(|s| *s < 0) {
        warn!(product = %name, stock, "Oversold: stock is now negative");
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use crate::{Database, DbConfig};
    use ecotrack_core::{Cart, Product};

    use super::*;

    async fn db_with_pen(stock: i64) -> Database {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.products()
            .add(&Product::new("Pen", stock, Money::from_cents(200), Money::from_cents(100)))
            .await
            .unwrap();
        db
    }

    async fn stock_of(db: &Database, name: &str) -> i64 {
        db.products().get_by_name(name).await.unwrap().unwrap().stock
    }

    fn draft_for(product: &Product, qty: i64) -> SaleDraft {
        let mut cart = Cart::new();
        cart.add(product, qty).unwrap();
        SaleDraft::from_cart(&cart, "alice").unwrap()
    }

    #[tokio::test]
    async fn test_pen_checkout() {
        let db = db_with_pen(10).await;
        let pen = db.products().get_by_name("Pen").await.unwrap().unwrap();

        let receipt = db
            .sales()
            .record_sale(&draft_for(&pen, 3), StockPolicy::Reject)
            .await
            .unwrap();

        assert_eq!(stock_of(&db, "Pen").await, 7);

        let sale = db.sales().get(receipt.invoice_id).await.unwrap().unwrap();
        assert_eq!(sale.total_price, Money::from_cents(600));
        assert_eq!(sale.total_cost, Money::from_cents(300));
        assert_eq!(sale.cashier, "alice");
        assert_eq!(sale.date, receipt.timestamp);
        assert!(chrono::NaiveDateTime::parse_from_str(&sale.date, SALE_TIMESTAMP_FORMAT).is_ok());
        assert_eq!(sale.line_items.len(), 1);
        assert_eq!(sale.line_items[0].quantity, 3);
    }

    #[tokio::test]
    async fn test_invoice_ids_increase() {
        let db = db_with_pen(10).await;
        let pen = db.products().get_by_name("Pen").await.unwrap().unwrap();

        let first = db
            .sales()
            .record_sale(&draft_for(&pen, 1), StockPolicy::Reject)
            .await
            .unwrap();
        let second = db
            .sales()
            .record_sale(&draft_for(&pen, 1), StockPolicy::Reject)
            .await
            .unwrap();

        assert!(second.invoice_id > first.invoice_id);
        assert_eq!(db.sales().count().await.unwrap(), 2);

        let listed: Vec<i64> = db.sales().list().await.unwrap().iter().map(|s| s.id).collect();
        assert_eq!(listed, vec![second.invoice_id, first.invoice_id]);
    }

    #[tokio::test]
    async fn test_reject_policy_rolls_back_on_depleted_stock() {
        let db = db_with_pen(10).await;
        let pen = db.products().get_by_name("Pen").await.unwrap().unwrap();
        let draft = draft_for(&pen, 8);

        // Another terminal sells 5 after this cart was filled.
        db.products().decrement_stock("Pen", 5).await.unwrap();

        let err = db
            .sales()
            .record_sale(&draft, StockPolicy::Reject)
            .await
            .unwrap_err();
        match err {
            DbError::InsufficientStock {
                available,
                requested,
                ..
            } => {
                assert_eq!(available, 5);
                assert_eq!(requested, 8);
            }
            other => panic!("expected InsufficientStock, got {other:?}"),
        }

        assert_eq!(stock_of(&db, "Pen").await, 5);
        assert_eq!(db.sales().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_allow_oversell_goes_negative() {
        let db = db_with_pen(10).await;
        let pen = db.products().get_by_name("Pen").await.unwrap().unwrap();
        let draft = draft_for(&pen, 8);

        db.products().decrement_stock("Pen", 5).await.unwrap();

        db.sales()
            .record_sale(&draft, StockPolicy::AllowOversell)
            .await
            .unwrap();

        assert_eq!(stock_of(&db, "Pen").await, -3);
        assert_eq!(db.sales().count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_missing_product_leaves_no_sale_row() {
        let db = db_with_pen(10).await;
        let pen = db.products().get_by_name("Pen").await.unwrap().unwrap();
        let ghost = Product::new("Ghost", 5, Money::from_cents(100), Money::zero());

        let mut cart = Cart::new();
        cart.add(&pen, 2).unwrap();
        cart.add(&ghost, 1).unwrap();
        let draft = SaleDraft::from_cart(&cart, "alice").unwrap();

        for policy in [StockPolicy::Reject, StockPolicy::AllowOversell] {
            let err = db.sales().record_sale(&draft, policy).await.unwrap_err();
            assert!(matches!(err, DbError::NotFound { .. }));
        }

        // Pen's decrement ran before Ghost failed and was rolled back with it.
        assert_eq!(stock_of(&db, "Pen").await, 10);
        assert_eq!(db.sales().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_stored_lines_round_trip() {
        let db = db_with_pen(10).await;
        db.products()
            .add(&Product::new("Notebook", 4, Money::from_cents(4550), Money::from_cents(3000)))
            .await
            .unwrap();
        let pen = db.products().get_by_name("Pen").await.unwrap().unwrap();
        let notebook = db.products().get_by_name("Notebook").await.unwrap().unwrap();

        let mut cart = Cart::new();
        cart.add(&notebook, 2).unwrap();
        cart.add(&pen, 1).unwrap();
        let draft = SaleDraft::from_cart(&cart, "alice").unwrap();

        let receipt = db
            .sales()
            .record_sale(&draft, StockPolicy::Reject)
            .await
            .unwrap();
        let sale = db.sales().get(receipt.invoice_id).await.unwrap().unwrap();

        assert_eq!(sale.line_items, cart.items());
        assert_eq!(Ok(sale.total_price), cart.total());
        assert_eq!(Ok(sale.total_cost), cart.total_cost());
    }

    #[tokio::test]
    async fn test_get_unknown_invoice() {
        let db = db_with_pen(1).await;
        assert!(db.sales().get(999).await.unwrap().is_none());
    }
}
