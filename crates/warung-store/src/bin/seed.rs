//! # Seed Data
//!
//! Fills a local database with the shop's everyday vegetables so the
//! dashboard has something to show during development.
//!
//! ## Usage
//! ```bash
//! # Seed the configured database
//! cargo run -p warung-store --bin seed
//!
//! # Specify database path
//! cargo run -p warung-store --bin seed -- --db ./data/warung.db
//!
//! # Also record a few sample sales and purchases
//! cargo run -p warung-store --bin seed -- --with-transactions
//! ```

use std::env;
use std::path::PathBuf;

use warung_core::{Money, NewProduct, NewPurchase, NewSale};
use warung_store::{AppConfig, StorageKind};

/// `(name, category, unit, buy, sell, stock, min_stock)`
const VEGETABLES: &[(&str, &str, &str, i64, i64, i64, i64)] = &[
    ("Bayam", "Daun", "ikat", 2000, 3000, 30, 10),
    ("Wortel", "Umbi", "kg", 8000, 12000, 20, 5),
    ("Kol", "Daun", "buah", 5000, 8000, 12, 5),
    ("Kentang", "Umbi", "kg", 10000, 15000, 25, 10),
];

const SEED_ACTOR: &str = "admin";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    warung_store::init_tracing();

    let args: Vec<String> = env::args().collect();

    let mut db_path: Option<PathBuf> = None;
    let mut with_transactions = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = Some(PathBuf::from(&args[i + 1]));
                    i += 1;
                }
            }
            "--with-transactions" | "-t" => with_transactions = true,
            "--help" | "-h" => {
                println!("Warung Sayur Seed Data");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>            Database file path (default: from config)");
                println!("  -t, --with-transactions    Also add sample sales and purchases");
                println!("  -h, --help                 Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    let mut config = AppConfig::load_or_default(None);
    config.storage.backend = StorageKind::Sqlite;
    if db_path.is_some() {
        config.storage.database_path = db_path;
    }

    println!("🌱 Warung Sayur Seed Data");
    println!("=========================");
    println!("Database: {}", config.database_path()?.display());
    println!();

    let app = warung_store::open(config).await?;
    println!("✓ Connected to database");

    let existing = app.store.products().await.len();
    if existing > 0 {
        println!("⚠ Database already has {} products", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Use the data management page to clear it first.");
        app.close().await;
        return Ok(());
    }

    for &(name, category, unit, buy, sell, stock, min_stock) in VEGETABLES {
        let product = app
            .store
            .add_product(
                NewProduct {
                    name: name.to_string(),
                    category: category.to_string(),
                    stock,
                    unit: unit.to_string(),
                    buy_price: Money::from_rupiah(buy),
                    sell_price: Money::from_rupiah(sell),
                    min_stock,
                },
                SEED_ACTOR,
            )
            .await;
        println!("  + #{} {} ({} {})", product.id, product.name, product.stock, product.unit);
    }

    if with_transactions {
        app.store
            .add_purchase(NewPurchase::new(1, 20, "Pasar Induk Kramat Jati"), SEED_ACTOR)
            .await?;
        app.store
            .add_sale(NewSale::new(1, 5).customer("Bu Sri"), "kasir")
            .await?;
        app.store.add_sale(NewSale::new(2, 2), "kasir").await?;
        println!("  + 1 purchase, 2 sales");
    }

    if let Some(warning) = app.store.take_persistence_warning().await {
        println!("⚠ {}", warning);
    }

    let stats = app.store.statistics().await;
    println!();
    println!("✓ Seeded {} products", stats.total_products);
    println!("  Sales:     {}", stats.total_sales_value);
    println!("  Purchases: {}", stats.total_purchases_value);
    println!("  Profit:    {}", stats.profit);

    app.close().await;
    Ok(())
}
