//! Rows written under the initial schema stay readable after the cost
//! columns are added.

use ecotrack_core::Money;
use ecotrack_db::{Database, DbConfig};
use sqlx::migrate::Migrator;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::path::{Path, PathBuf};
use uuid::Uuid;

const INITIAL_SCHEMA: &str = include_str!("../../../migrations/sqlite/001_initial_schema.sql");

fn remove_db_files(path: &Path) {
    for suffix in ["", "-wal", "-shm"] {
        let mut name = path.to_path_buf().into_os_string();
        name.push(suffix);
        let _ = std::fs::remove_file(name);
    }
}

/// Creates a database that has only seen the first migration.
async fn create_initial_schema_db(db_path: &Path, migrations_dir: &Path) {
    std::fs::create_dir_all(migrations_dir).unwrap();
    std::fs::write(migrations_dir.join("001_initial_schema.sql"), INITIAL_SCHEMA).unwrap();

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(
            SqliteConnectOptions::new()
                .filename(db_path)
                .create_if_missing(true),
        )
        .await
        .unwrap();

    Migrator::new(migrations_dir).await.unwrap().run(&pool).await.unwrap();

    sqlx::query("INSERT INTO products (name, stock, price_cents) VALUES ('Pen', 10, 200)")
        .execute(&pool)
        .await
        .unwrap();
    sqlx::query(
        r#"
        INSERT INTO sales (items_json, total_price_cents, date, cashier)
        VALUES ('[{"product_name":"Pen","quantity":2,"unit_price":200}]', 400,
                '2025-01-15 10:00:00', 'alice')
        "#,
    )
    .execute(&pool)
    .await
    .unwrap();

    pool.close().await;
}

#[tokio::test]
async fn test_rows_before_cost_tracking_read_back_with_zero_cost() {
    let scratch: PathBuf = std::env::temp_dir().join(format!("ecotrack-migrate-{}", Uuid::new_v4()));
    let db_path = scratch.join("legacy.db");
    create_initial_schema_db(&db_path, &scratch.join("migrations")).await;

    let db = Database::new(DbConfig::new(&db_path)).await.unwrap();

    let pen = db.products().get_by_name("Pen").await.unwrap().unwrap();
    assert_eq!(pen.stock, 10);
    assert_eq!(pen.price, Money::from_cents(200));
    assert_eq!(pen.cost_price, Money::zero());

    let sales = db.sales().list().await.unwrap();
    assert_eq!(sales.len(), 1);
    assert_eq!(sales[0].total_price, Money::from_cents(400));
    assert_eq!(sales[0].total_cost, Money::zero());
    assert_eq!(sales[0].line_items[0].unit_cost, Money::zero());
    assert_eq!(sales[0].date, "2025-01-15 10:00:00");

    let summary = db.reports().summary().await.unwrap();
    assert_eq!(summary.profit(), Money::from_cents(400));

    db.close().await;
    remove_db_files(&db_path);
    let _ = std::fs::remove_dir_all(&scratch);
}
