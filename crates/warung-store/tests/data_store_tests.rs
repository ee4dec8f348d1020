use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveDate, TimeZone, Utc};

use warung_core::{
    Backup, CoreError, Money, NewProduct, NewPurchase, NewSale, PRODUCTS_KEY, PURCHASES_KEY,
    SALES_KEY,
};
use warung_db::{
    Database, DbConfig, DbError, DbResult, MemoryStorage, Persistence, StorageBackend, WriteOp,
};
use warung_store::{AppConfig, DataStore, StorageKind, StorePolicy};

fn product(name: &str, buy: i64, sell: i64, stock: i64, min_stock: i64) -> NewProduct {
    NewProduct {
        name: name.to_string(),
        category: "Sayur".to_string(),
        stock,
        unit: "ikat".to_string(),
        buy_price: Money::from_rupiah(buy),
        sell_price: Money::from_rupiah(sell),
        min_stock,
    }
}

fn spinach() -> NewProduct {
    product("Spinach", 2000, 3000, 20, 10)
}

async fn memory_store() -> DataStore {
    DataStore::init(Persistence::in_memory(), StorePolicy::default()).await
}

/// A backend whose writes can be switched off.
#[derive(Debug, Default)]
struct FlakyStorage {
    inner: MemoryStorage,
    failing: AtomicBool,
}

impl FlakyStorage {
    fn check(&self) -> DbResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            Err(DbError::QueryFailed("database or disk is full".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl StorageBackend for FlakyStorage {
    fn name(&self) -> &'static str {
        "flaky"
    }

    async fn get(&self, key: &str) -> DbResult<Option<String>> {
        self.inner.get(key).await
    }

    async fn put(&self, key: &str, value: &str) -> DbResult<()> {
        self.check()?;
        self.inner.put(key, value).await
    }

    async fn delete(&self, key: &str) -> DbResult<()> {
        self.check()?;
        self.inner.delete(key).await
    }

    async fn write_batch(&self, ops: Vec<WriteOp>) -> DbResult<()> {
        self.check()?;
        self.inner.write_batch(ops).await
    }
}

// =============================================================================
// Identity and stock bookkeeping
// =============================================================================

#[tokio::test]
async fn test_sequential_ids_start_at_one() {
    let store = memory_store().await;

    let ids: Vec<i64> = add_three_products(&store).await;
    assert_eq!(ids, vec![1, 2, 3]);

    // deleting the highest id frees it; ids are max + 1
    store.delete_product(3).await;
    let next = store.add_product(spinach(), "admin").await;
    assert_eq!(next.id, 3);

    store.delete_product(1).await;
    let next = store.add_product(spinach(), "admin").await;
    assert_eq!(next.id, 4);
}

async fn add_three_products(store: &DataStore) -> Vec<i64> {
    let mut ids = Vec::new();
    for name in ["Bayam", "Wortel", "Kol"] {
        ids.push(store.add_product(product(name, 1000, 2000, 5, 1), "admin").await.id);
    }
    ids
}

#[tokio::test]
async fn test_spinach_scenario() {
    let store = memory_store().await;

    let added = store.add_product(spinach(), "admin").await;
    assert_eq!(added.id, 1);
    assert_eq!(added.stock, 20);
    assert_eq!(added.updated_by, "admin");

    let sale = store
        .add_sale(NewSale::new(1, 5), "kasir")
        .await
        .expect("sale should succeed");
    assert_eq!(sale.total_price, Money::from_rupiah(15000));
    assert_eq!(store.product(1).await.unwrap().stock, 15);

    let stats = store.statistics().await;
    assert_eq!(stats.total_sales_value.rupiah(), 15000);
    assert_eq!(stats.profit.rupiah(), 15000);

    let purchase = store
        .add_purchase(NewPurchase::new(1, 10, "Pasar Induk"), "admin")
        .await
        .expect("purchase should succeed");
    assert_eq!(purchase.total_price, Money::from_rupiah(20000));
    assert_eq!(store.product(1).await.unwrap().stock, 25);

    let stats = store.statistics().await;
    assert_eq!(stats.total_purchases_value.rupiah(), 20000);
    assert_eq!(stats.profit.rupiah(), -5000);
    assert_eq!(stats.profit.to_string(), "-Rp 5.000");
}

#[tokio::test]
async fn test_no_cross_contamination() {
    let store = memory_store().await;
    store.add_product(product("Bayam", 2000, 3000, 20, 5), "admin").await;
    store.add_product(product("Wortel", 8000, 12000, 10, 5), "admin").await;

    store.add_sale(NewSale::new(1, 4), "kasir").await.unwrap();
    store
        .add_purchase(NewPurchase::new(2, 6, "Pak Budi"), "admin")
        .await
        .unwrap();

    assert_eq!(store.product(1).await.unwrap().stock, 16);
    assert_eq!(store.product(2).await.unwrap().stock, 16);
}

#[tokio::test]
async fn test_oversized_sale_changes_nothing() {
    let store = memory_store().await;
    store.add_product(spinach(), "admin").await;

    let result = store.add_sale(NewSale::new(1, 21), "kasir").await;
    match result {
        Err(CoreError::InsufficientStock {
            product,
            available,
            requested,
        }) => {
            assert_eq!(product, "Spinach");
            assert_eq!(available, 20);
            assert_eq!(requested, 21);
        }
        other => panic!("expected InsufficientStock, got {:?}", other),
    }

    assert!(store.sales().await.is_empty());
    assert_eq!(store.product(1).await.unwrap().stock, 20);

    // selling the exact remaining stock is allowed
    store.add_sale(NewSale::new(1, 20), "kasir").await.unwrap();
    assert_eq!(store.product(1).await.unwrap().stock, 0);
}

#[tokio::test]
async fn test_huge_quantities_never_panic() {
    let store = memory_store().await;
    store.add_product(product("Spinach", 2000, 3000, 20, 10), "admin").await;

    let result = store
        .add_purchase(NewPurchase::new(1, i64::MAX / 1000, "X"), "admin")
        .await;
    assert!(matches!(result, Err(CoreError::Validation(_))));

    let result = store.add_sale(NewSale::new(1, i64::MAX / 3000), "kasir").await;
    assert!(matches!(result, Err(CoreError::Validation(_))));

    assert_eq!(store.product(1).await.unwrap().stock, 20);
    assert!(store.statistics().await.total_sales_value.is_zero());

    // totals already on disk that no longer fit still add up without panicking
    let big = i64::MAX / 2 + 1;
    let sale = |id: i64| {
        format!(
            r#"{{"id": {id}, "date": "2026-10-19", "productId": 1, "productName": "Spinach",
                "quantity": {big}, "totalPrice": {big}, "customer": "Bu Sri", "cashier": "kasir"}}"#
        )
    };
    let json = format!(
        r#"{{"products": [], "sales": [{}, {}], "purchases": []}}"#,
        sale(1),
        sale(2)
    );
    store.import_backup_json(&json).await.unwrap();

    let stats = store.statistics().await;
    assert_eq!(stats.total_sales_value, Money::from_rupiah(i64::MAX));
    assert_eq!(stats.profit, Money::from_rupiah(i64::MAX));

    let report = store
        .financial_report(
            NaiveDate::from_ymd_opt(2026, 10, 19).unwrap(),
            Money::from_rupiah(500_000),
        )
        .await;
    assert_eq!(report.total_units_sold, i64::MAX);
}

#[tokio::test]
async fn test_concurrent_sales_never_oversell() {
    let store = Arc::new(memory_store().await);
    store.add_product(spinach(), "admin").await;

    let mut handles = Vec::new();
    for _ in 0..10 {
        let store = Arc::clone(&store);
        handles.push(tokio::spawn(async move {
            store.add_sale(NewSale::new(1, 3), "kasir").await.is_ok()
        }));
    }

    let mut succeeded = 0;
    for handle in handles {
        if handle.await.expect("task panicked") {
            succeeded += 1;
        }
    }

    assert_eq!(succeeded, 6);
    assert_eq!(store.product(1).await.unwrap().stock, 2);
    assert_eq!(store.sales().await.len(), 6);
}

#[tokio::test]
async fn test_deleting_product_keeps_history() {
    let store = memory_store().await;
    store.add_product(spinach(), "admin").await;
    store.add_sale(NewSale::new(1, 2), "kasir").await.unwrap();

    let removed = store.delete_product(1).await.expect("product existed");
    assert_eq!(removed.name, "Spinach");
    assert!(store.delete_product(1).await.is_none());

    let sales = store.sales().await;
    assert_eq!(sales.len(), 1);
    assert_eq!(sales[0].product_name, "Spinach");
}

// =============================================================================
// Clearing, reset, backup
// =============================================================================

#[tokio::test]
async fn test_clear_all_data_then_statistics() {
    let backend = Arc::new(MemoryStorage::new());
    let store = DataStore::init(Persistence::new(backend.clone()), StorePolicy::default()).await;

    store.add_product(spinach(), "admin").await;
    store.add_sale(NewSale::new(1, 5), "kasir").await.unwrap();
    store
        .add_purchase(NewPurchase::new(1, 10, "Pasar Induk"), "admin")
        .await
        .unwrap();

    store.clear_all_data().await;

    let stats = store.statistics().await;
    assert!(stats.is_empty);
    assert!(stats.total_sales_value.is_zero());
    assert!(stats.total_purchases_value.is_zero());
    assert!(stats.profit.is_zero());
    assert_eq!(stats.low_stock_count, 0);

    for key in [PRODUCTS_KEY, SALES_KEY, PURCHASES_KEY] {
        assert_eq!(backend.get(key).await.unwrap(), None, "{} still stored", key);
    }
}

#[tokio::test]
async fn test_reset_writes_empty_collections() {
    let backend = Arc::new(MemoryStorage::new());
    let store = DataStore::init(Persistence::new(backend.clone()), StorePolicy::default()).await;
    store.add_product(spinach(), "admin").await;

    store.reset_all_data().await;

    assert!(store.statistics().await.is_empty);
    for key in [PRODUCTS_KEY, SALES_KEY, PURCHASES_KEY] {
        assert_eq!(backend.get(key).await.unwrap().as_deref(), Some("[]"));
    }
}

#[tokio::test]
async fn test_clear_single_collections() {
    let store = memory_store().await;
    store.add_product(spinach(), "admin").await;
    store.add_sale(NewSale::new(1, 1), "kasir").await.unwrap();
    store
        .add_purchase(NewPurchase::new(1, 1, "Pasar Induk"), "admin")
        .await
        .unwrap();

    store.clear_all_sales().await;
    assert!(store.sales().await.is_empty());
    assert_eq!(store.purchases().await.len(), 1);

    store.clear_all_purchases().await;
    assert!(store.purchases().await.is_empty());

    store.clear_all_products().await;
    assert!(store.statistics().await.is_empty);
}

#[tokio::test]
async fn test_export_clear_import_roundtrip() {
    let store = memory_store().await;
    store.add_product(spinach(), "admin").await;
    store.add_product(product("Kentang", 10000, 15000, 25, 10), "admin").await;
    store
        .add_sale(
            NewSale::new(2, 3)
                .on(NaiveDate::from_ymd_opt(2026, 10, 18).unwrap())
                .customer("Bu Sri"),
            "kasir",
        )
        .await
        .unwrap();
    store
        .add_purchase(NewPurchase::new(1, 10, "Pasar Induk"), "admin")
        .await
        .unwrap();

    let before = (
        store.products().await,
        store.sales().await,
        store.purchases().await,
    );

    let exported_at = Utc.with_ymd_and_hms(2026, 10, 19, 9, 0, 0).unwrap();
    let json = store
        .export_backup(exported_at)
        .await
        .to_json_pretty()
        .expect("backup serializes");

    store.clear_all_data().await;
    assert!(store.statistics().await.is_empty);

    let imported = store.import_backup_json(&json).await.expect("valid backup");
    assert_eq!(imported, 4);

    let after = (
        store.products().await,
        store.sales().await,
        store.purchases().await,
    );
    assert_eq!(before, after);
}

#[tokio::test]
async fn test_rejected_import_touches_nothing() {
    let store = memory_store().await;
    store.add_product(spinach(), "admin").await;

    let result = store
        .import_backup_json(r#"{"products": [], "sales": []}"#)
        .await;
    assert!(matches!(result, Err(CoreError::InvalidBackup(_))));
    assert_eq!(store.products().await.len(), 1);
}

#[tokio::test]
async fn test_import_replaces_everything() {
    let store = memory_store().await;
    store.add_product(spinach(), "admin").await;

    store
        .import_backup(Backup::from_json(r#"{"products": [], "sales": [], "purchases": []}"#).unwrap())
        .await;
    assert!(store.statistics().await.is_empty);
}

// =============================================================================
// Persistence
// =============================================================================

#[tokio::test]
async fn test_state_survives_reload() {
    let persistence = Persistence::in_memory();

    let store = DataStore::init(persistence.clone(), StorePolicy::default()).await;
    store.add_product(spinach(), "admin").await;
    store.add_sale(NewSale::new(1, 5), "kasir").await.unwrap();

    let reloaded = DataStore::init(persistence, StorePolicy::default()).await;
    assert_eq!(reloaded.product(1).await.unwrap().stock, 15);
    assert_eq!(reloaded.sales().await.len(), 1);
}

#[tokio::test]
async fn test_sqlite_persistence_roundtrip() {
    let db = Database::new(DbConfig::in_memory())
        .await
        .expect("in-memory database");

    let store = DataStore::init(Persistence::sqlite(&db), StorePolicy::default()).await;
    store.add_product(spinach(), "admin").await;
    store
        .add_purchase(NewPurchase::new(1, 10, "Pasar Induk"), "admin")
        .await
        .unwrap();
    assert!(store.take_persistence_warning().await.is_none());

    let reloaded = DataStore::init(Persistence::sqlite(&db), StorePolicy::default()).await;
    assert_eq!(reloaded.product(1).await.unwrap().stock, 30);
    assert_eq!(reloaded.purchases().await[0].supplier, "Pasar Induk");

    reloaded.clear_all_data().await;
    assert_eq!(db.kv().keys().await.unwrap(), Vec::<String>::new());
}

#[tokio::test]
async fn test_corrupt_slot_starts_empty() {
    let backend = MemoryStorage::with_entries([
        (PRODUCTS_KEY, "this is not json"),
        (SALES_KEY, "[]"),
    ]);
    let store = DataStore::init(Persistence::new(Arc::new(backend)), StorePolicy::default()).await;

    assert!(store.products().await.is_empty());
    assert!(store.statistics().await.is_empty);
}

#[tokio::test]
async fn test_failed_write_is_a_warning_not_an_error() {
    let backend = Arc::new(FlakyStorage::default());
    let store = DataStore::init(Persistence::new(backend.clone()), StorePolicy::default()).await;
    store.add_product(spinach(), "admin").await;
    assert!(store.take_persistence_warning().await.is_none());

    backend.failing.store(true, Ordering::SeqCst);
    let sale = store.add_sale(NewSale::new(1, 5), "kasir").await;
    assert!(sale.is_ok());
    assert_eq!(store.product(1).await.unwrap().stock, 15);

    let warning = store.take_persistence_warning().await.expect("warning recorded");
    assert!(warning.contains("may not be saved"));
    assert!(store.take_persistence_warning().await.is_none());

    // the stored copy still has the pre-sale stock
    let reloaded = DataStore::init(Persistence::new(backend), StorePolicy::default()).await;
    assert_eq!(reloaded.product(1).await.unwrap().stock, 20);
}

// =============================================================================
// Reports and startup
// =============================================================================

#[tokio::test]
async fn test_financial_report() {
    let store = memory_store().await;
    store.add_product(spinach(), "admin").await;

    let today = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
    store
        .add_sale(NewSale::new(1, 5).on(today), "kasir")
        .await
        .unwrap();

    let report = store
        .financial_report(today, Money::from_rupiah(500_000))
        .await;
    assert_eq!(report.today_sales_value.rupiah(), 15000);
    assert_eq!(report.inventory_value.rupiah(), 15 * 2000);
    assert_eq!(report.net_profit.rupiah(), 15000 - 500_000);
    assert_eq!(report.sales_by_product[0].quantity, 5);
}

#[tokio::test]
async fn test_open_memory_backend() {
    let mut config = AppConfig::default();
    config.storage.backend = StorageKind::Memory;
    config.policy.reverse_stock_on_delete = true;

    let app = warung_store::open(config).await.expect("open");
    assert!(app.store.policy().reverse_stock_on_delete);
    assert!(app.session.current_user().await.is_none());

    let user = app.session.login("admin", "admin123").await.unwrap();
    app.store.add_product(spinach(), &user.username).await;
    assert_eq!(app.store.product(1).await.unwrap().updated_by, "admin");
    app.close().await;
}

#[tokio::test]
async fn test_open_sqlite_file_survives_restart() {
    let dir = std::env::temp_dir().join(format!("warung-open-{}", std::process::id()));
    let mut config = AppConfig::default();
    config.storage.database_path = Some(dir.join("warung.db"));

    let app = warung_store::open(config.clone()).await.expect("open");
    app.store.add_product(spinach(), "admin").await;
    app.session.login("kasir", "kasir123").await.unwrap();
    app.close().await;

    let app = warung_store::open(config).await.expect("reopen");
    assert_eq!(app.store.products().await.len(), 1);
    assert_eq!(
        app.session.current_user().await.map(|u| u.username),
        Some("kasir".to_string())
    );
    app.close().await;

    let _ = std::fs::remove_dir_all(dir);
}
