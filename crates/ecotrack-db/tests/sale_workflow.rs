//! End-to-end sale workflow against a real database file.

use ecotrack_core::{Cart, Money, Product, Role, SaleDraft, StockPolicy, SALE_TIMESTAMP_FORMAT};
use ecotrack_db::{Database, DbConfig, DbError};
use std::path::PathBuf;
use std::time::Duration;
use uuid::Uuid;

struct TempDb {
    db: Database,
    path: PathBuf,
}

impl TempDb {
    async fn new() -> Self {
        let path = std::env::temp_dir().join(format!("ecotrack-test-{}.db", Uuid::new_v4()));
        let db = Database::new(DbConfig::new(&path).max_connections(4))
            .await
            .unwrap();
        TempDb { db, path }
    }

    async fn cleanup(self) {
        self.db.close().await;
        for suffix in ["", "-wal", "-shm"] {
            let mut name = self.path.clone().into_os_string();
            name.push(suffix);
            let _ = std::fs::remove_file(name);
        }
    }
}

fn pen(stock: i64) -> Product {
    Product::new("Pen", stock, Money::from_cents(200), Money::from_cents(100))
}

#[tokio::test]
async fn test_checkout_persists_across_reopen() {
    let temp = TempDb::new().await;
    temp.db.products().add(&pen(10)).await.unwrap();

    let mut cart = Cart::new();
    cart.add(&pen(10), 3).unwrap();
    let receipt = temp
        .db
        .sales()
        .record_sale(&SaleDraft::from_cart(&cart, "alice").unwrap(), StockPolicy::Reject)
        .await
        .unwrap();
    temp.db.close().await;

    // Reopen the same file; migrations are already applied.
    let reopened = Database::new(DbConfig::new(&temp.path)).await.unwrap();
    let sale = reopened.sales().get(receipt.invoice_id).await.unwrap().unwrap();
    assert_eq!(sale.total_price, Money::from_cents(600));
    assert_eq!(sale.total_cost, Money::from_cents(300));
    assert_eq!(
        reopened.products().get_by_name("Pen").await.unwrap().unwrap().stock,
        7
    );

    let temp = TempDb {
        db: reopened,
        path: temp.path,
    };
    temp.cleanup().await;
}

#[tokio::test]
async fn test_concurrent_checkouts_never_oversell() {
    let temp = TempDb::new().await;
    temp.db.products().add(&pen(3)).await.unwrap();

    let mut cart = Cart::new();
    cart.add(&pen(3), 1).unwrap();
    let draft = SaleDraft::from_cart(&cart, "alice").unwrap();

    let mut handles = Vec::new();
    for _ in 0..6 {
        let db = temp.db.clone();
        let draft = draft.clone();
        handles.push(tokio::spawn(async move {
            db.sales().record_sale(&draft, StockPolicy::Reject).await
        }));
    }

    let mut succeeded = 0;
    let mut rejected = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => succeeded += 1,
            Err(DbError::InsufficientStock { .. }) => rejected += 1,
            Err(other) => panic!("unexpected error: {other:?}"),
        }
    }

    assert_eq!(succeeded, 3);
    assert_eq!(rejected, 3);
    assert_eq!(
        temp.db.products().get_by_name("Pen").await.unwrap().unwrap().stock,
        0
    );
    assert_eq!(temp.db.sales().count().await.unwrap(), 3);

    temp.cleanup().await;
}

#[tokio::test]
async fn test_bootstrap_and_register() {
    let temp = TempDb::new().await;
    let users = temp.db.users();

    assert!(users.ensure_default_admin().await.unwrap());
    users.register("bob", "pass1", Role::Sales).await.unwrap();
    assert!(users.register("bob", "pass2", Role::Admin).await.unwrap_err().is_duplicate());

    assert_eq!(users.count().await.unwrap(), 2);
    assert_eq!(users.authenticate("bob", "pass1").await.unwrap(), Some(Role::Sales));

    temp.cleanup().await;
}

#[tokio::test]
async fn test_sale_date_is_taken_after_waiting_for_the_write_lock() {
    let temp = TempDb::new().await;
    temp.db.products().add(&pen(10)).await.unwrap();

    let mut cart = Cart::new();
    cart.add(&pen(10), 1).unwrap();
    let draft = SaleDraft::from_cart(&cart, "alice").unwrap();

    // Another writer holds the database while this checkout starts.
    let mut writer = temp.db.pool().acquire().await.unwrap();
    sqlx::query("BEGIN IMMEDIATE").execute(&mut *writer).await.unwrap();

    let db = temp.db.clone();
    let checkout = tokio::spawn(async move { db.sales().record_sale(&draft, StockPolicy::Reject).await });

    tokio::time::sleep(Duration::from_millis(1200)).await;
    let released_at = chrono::Local::now().format(SALE_TIMESTAMP_FORMAT).to_string();
    sqlx::query("COMMIT").execute(&mut *writer).await.unwrap();
    drop(writer);

    let receipt = checkout.await.unwrap().unwrap();
    assert!(
        receipt.timestamp >= released_at,
        "sale dated {} before the lock was released at {}",
        receipt.timestamp,
        released_at
    );

    let stored = temp.db.sales().get(receipt.invoice_id).await.unwrap().unwrap();
    assert_eq!(stored.date, receipt.timestamp);

    temp.cleanup().await;
}
