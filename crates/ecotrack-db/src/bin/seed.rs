//! # Seed Data Generator
//!
//! Loads a small demo catalog and the default administrator.
//!
//! ## Usage
//! ```bash
//! # Seed ./ecotrack_dev.db
//! cargo run -p ecotrack-db --bin seed
//!
//! # Specify database path
//! cargo run -p ecotrack-db --bin seed -- --db ./data/erp_data.db
//! ```
//!
//! ## Generated Products
//! Stationery, snacks and household goods, each with:
//! - Unique name including pack size
//! - Price between 10.00 and 450.00
//! - Cost at 55-80% of price
//! - Stock between 0 and 120 (some items start sold out)

use ecotrack_core::{Money, Product};
use ecotrack_db::{Database, DbConfig};
use std::env;

/// Base items: (name, base price in cents).
const CATALOG: &[(&str, &[(&str, i64)])] = &[
    (
        "Stationery",
        &[
            ("Ball Pen Blue", 1000),
            ("Ball Pen Black", 1000),
            ("Gel Pen", 2500),
            ("Pencil HB", 500),
            ("Eraser", 500),
            ("Sharpener", 800),
            ("Notebook A5", 4500),
            ("Notebook A4", 7000),
            ("Stapler", 15000),
            ("Sticky Notes", 6000),
        ],
    ),
    (
        "Snacks",
        &[
            ("Potato Chips", 2000),
            ("Salted Peanuts", 3000),
            ("Chocolate Bar", 4000),
            ("Glucose Biscuits", 1000),
            ("Masala Namkeen", 3500),
        ],
    ),
    (
        "Household",
        &[
            ("Dish Soap", 9900),
            ("Hand Wash", 12000),
            ("Paper Towels", 15000),
            ("Bamboo Toothbrush", 6000),
            ("Cloth Bag", 4500),
        ],
    ),
];

/// Pack sizes: (label, price multiplier).
const PACKS: &[(&str, i64)] = &[("Single", 1), ("Pack of 3", 3)];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./ecotrack_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("EcoTrack Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./ecotrack_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 EcoTrack Seed Data Generator");
    println!("==============================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    if db.users().ensure_default_admin().await? {
        println!("✓ Created default admin (change the password!)");
    }

    let existing = db.products().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} products", existing);
        println!("  Skipping seed to avoid duplicates.");
        return Ok(());
    }

    println!();
    println!("Generating products...");

    let mut generated = 0usize;
    let mut seed = 0usize;
    for (category, items) in CATALOG {
        for (name, base_cents) in items.iter() {
            for (pack, multiplier) in PACKS {
                let product = generate_product(name, pack, base_cents * multiplier, seed);
                seed += 1;

                if let Err(e) = db.products().add(&product).await {
                    eprintln!("Failed to insert {}: {}", product.name, e);
                    continue;
                }
                generated += 1;
            }
        }
        println!("  {} done", category);
    }

    println!();
    println!("✓ Generated {} products", generated);

    db.close().await;
    println!("✓ Seed complete!");

    Ok(())
}

/// Generates one product with deterministic pseudo-random stock and cost.
fn generate_product(name: &str, pack: &str, price_cents: i64, seed: usize) -> Product {
    let cost_pct = 55 + (seed * 7 % 26) as i64;
    let stock = if seed % 11 == 0 { 0 } else { (seed * 37 % 121) as i64 };

    Product::new(
        format!("{} ({})", name, pack),
        stock,
        Money::from_cents(price_cents),
        Money::from_cents(price_cents * cost_pct / 100),
    )
}
