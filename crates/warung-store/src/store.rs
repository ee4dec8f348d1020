//! # Data Store
//!
//! The single owner of the product, sale and purchase collections.
//!
//! ## Write Path
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        DataStore::add_sale                              │
//! │                                                                         │
//! │  lock collections ──────────────────────────────────────────┐          │
//! │       │                                                     │          │
//! │       ▼                                                     │          │
//! │  quantity > 0?  product exists?  stock ≥ quantity?          │ held     │
//! │       │ no ──► Err(CoreError), nothing changed              │ across   │
//! │       ▼ yes                                                 │ the      │
//! │  decrement stock, append Sale                               │ whole    │
//! │       │                                                     │ block    │
//! │       ▼                                                     │          │
//! │  commit products + sales slots (one batch)                  │          │
//! │       │ failed ──► persistence warning, change stands       │          │
//! │       ▼                                                     │          │
//! │  unlock ◄───────────────────────────────────────────────────┘          │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Two sales of the same product can never both pass the stock check
//! against the same starting stock.

use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use warung_core::types::next_id;
use warung_core::validation::validate_quantity;
use warung_core::{
    Backup, CoreError, CoreResult, FinancialReport, Money, NewProduct, NewPurchase, NewSale,
    Product, ProductPatch, Purchase, Sale, Statistics, PRODUCTS_KEY, PURCHASES_KEY, SALES_KEY,
};
use warung_db::{Database, DbResult, Persistence, WriteBatch};

// =============================================================================
// Policy
// =============================================================================

/// Behavior switches for the store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorePolicy {
    /// Deleting a sale puts its quantity back on the shelf; deleting a
    /// purchase takes it off again (never below zero).
    /// Off by default: deletes only touch the transaction list.
    pub reverse_stock_on_delete: bool,
}

// =============================================================================
// Collections
// =============================================================================

#[derive(Debug, Clone, Copy)]
enum Slot {
    Products,
    Sales,
    Purchases,
}

const ALL_SLOTS: [Slot; 3] = [Slot::Products, Slot::Sales, Slot::Purchases];

#[derive(Debug, Default)]
struct Collections {
    products: Vec<Product>,
    sales: Vec<Sale>,
    purchases: Vec<Purchase>,
    /// Last failed write, until someone takes it.
    warning: Option<String>,
}

impl Collections {
    /// Current contents of `slots`, ready to commit.
    fn snapshot(&self, slots: &[Slot]) -> DbResult<WriteBatch> {
        slots
            .iter()
            .try_fold(WriteBatch::new(), |batch, slot| match slot {
                Slot::Products => batch.save(PRODUCTS_KEY, &self.products),
                Slot::Sales => batch.save(SALES_KEY, &self.sales),
                Slot::Purchases => batch.save(PURCHASES_KEY, &self.purchases),
            })
    }

    fn product_index(&self, id: i64) -> CoreResult<usize> {
        self.products
            .iter()
            .position(|p| p.id == id)
            .ok_or(CoreError::ProductNotFound(id))
    }
}

fn slot_key(slot: Slot) -> &'static str {
    match slot {
        Slot::Products => PRODUCTS_KEY,
        Slot::Sales => SALES_KEY,
        Slot::Purchases => PURCHASES_KEY,
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

// =============================================================================
// DataStore
// =============================================================================

/// In-memory collections mirrored write-through to a [`Persistence`].
///
/// `Send + Sync`; share it behind an `Arc`. Every mutating method holds the
/// collection lock until its persistence write has finished.
#[derive(Debug)]
pub struct DataStore {
    persistence: Persistence,
    database: Option<Database>,
    policy: StorePolicy,
    state: Mutex<Collections>,
}

impl DataStore {
    /// Loads all three collections. Missing or corrupt slots start empty.
    pub async fn init(persistence: Persistence, policy: StorePolicy) -> Self {
        let products: Vec<Product> = persistence.load(PRODUCTS_KEY, Vec::new).await;
        let sales: Vec<Sale> = persistence.load(SALES_KEY, Vec::new).await;
        let purchases: Vec<Purchase> = persistence.load(PURCHASES_KEY, Vec::new).await;

        info!(
            backend = persistence.backend_name(),
            products = products.len(),
            sales = sales.len(),
            purchases = purchases.len(),
            "Data store loaded"
        );

        DataStore {
            persistence,
            database: None,
            policy,
            state: Mutex::new(Collections {
                products,
                sales,
                purchases,
                warning: None,
            }),
        }
    }

    /// Hands the database to the store so [`close`](Self::close) can shut it down.
    pub fn with_database(mut self, database: Database) -> Self {
        self.database = Some(database);
        self
    }

    pub fn policy(&self) -> StorePolicy {
        self.policy
    }

    /// Commits `batch`; a failure is kept as the persistence warning.
    async fn persist(&self, state: &mut Collections, batch: DbResult<WriteBatch>) {
        let result = match batch {
            Ok(batch) => self.persistence.commit(batch).await,
            Err(e) => Err(e),
        };

        if let Err(e) = result {
            warn!(error = %e, "Changes may not be saved");
            state.warning = Some(format!("Changes may not be saved: {}", e));
        }
    }

    async fn persist_slots(&self, state: &mut Collections, slots: &[Slot]) {
        let batch = state.snapshot(slots);
        self.persist(state, batch).await;
    }

    async fn remove_slots(&self, state: &mut Collections, slots: &[Slot]) {
        let batch = slots
            .iter()
            .fold(WriteBatch::new(), |batch, slot| batch.remove(slot_key(*slot)));
        self.persist(state, Ok(batch)).await;
    }

    /// Returns and clears the last persistence warning.
    pub async fn take_persistence_warning(&self) -> Option<String> {
        self.state.lock().await.warning.take()
    }

    // =========================================================================
    // Products
    // =========================================================================

    /// Adds a product with the next id, stamped with today's date and `actor`.
    pub async fn add_product(&self, input: NewProduct, actor: &str) -> Product {
        let mut state = self.state.lock().await;

        let product = input.into_product(next_id(&state.products), today(), actor);
        state.products.push(product.clone());

        debug!(product_id = product.id, name = %product.name, "Product added");
        self.persist_slots(&mut state, &[Slot::Products]).await;

        product
    }

    /// Merges `patch` into the product. `None` when the id is unknown.
    pub async fn update_product(
        &self,
        id: i64,
        patch: ProductPatch,
        actor: &str,
    ) -> Option<Product> {
        let mut state = self.state.lock().await;

        let Some(product) = state.products.iter_mut().find(|p| p.id == id) else {
            debug!(product_id = id, "Update skipped, product not found");
            return None;
        };

        patch.apply_to(product);
        product.last_updated = today();
        product.updated_by = actor.to_string();
        let updated = product.clone();

        debug!(product_id = id, "Product updated");
        self.persist_slots(&mut state, &[Slot::Products]).await;

        Some(updated)
    }

    /// Removes the product. Sales and purchases keep their name snapshot.
    pub async fn delete_product(&self, id: i64) -> Option<Product> {
        let mut state = self.state.lock().await;

        let index = state.products.iter().position(|p| p.id == id)?;
        let removed = state.products.remove(index);

        debug!(product_id = id, name = %removed.name, "Product deleted");
        self.persist_slots(&mut state, &[Slot::Products]).await;

        Some(removed)
    }

    pub async fn clear_all_products(&self) {
        let mut state = self.state.lock().await;
        state.products.clear();

        info!("All products cleared");
        self.remove_slots(&mut state, &[Slot::Products]).await;
    }

    // =========================================================================
    // Sales
    // =========================================================================

    /// Records a sale and takes the quantity off the product's stock.
    ///
    /// Fails without changing anything when the quantity is out of range,
    /// the product doesn't exist, stock is short or the total won't fit.
    pub async fn add_sale(&self, input: NewSale, cashier: &str) -> CoreResult<Sale> {
        let mut state = self.state.lock().await;

        validate_quantity(input.quantity)?;
        let index = state.product_index(input.product_id)?;

        let product = &state.products[index];
        if !product.can_sell(input.quantity) {
            debug!(
                product_id = product.id,
                available = product.stock,
                requested = input.quantity,
                "Sale rejected, insufficient stock"
            );
            return Err(CoreError::InsufficientStock {
                product: product.name.clone(),
                available: product.stock,
                requested: input.quantity,
            });
        }

        let total_price = product
            .sell_price
            .checked_mul(input.quantity)
            .ok_or_else(|| CoreError::TooLarge("totalPrice".to_string()))?;

        let today = today();
        let sale = Sale {
            id: next_id(&state.sales),
            date: input.date.unwrap_or(today),
            product_id: product.id,
            product_name: product.name.clone(),
            quantity: input.quantity,
            total_price,
            customer: input.customer_or_default(),
            cashier: cashier.to_string(),
        };

        let product = &mut state.products[index];
        product.stock -= sale.quantity;
        product.last_updated = today;
        product.updated_by = cashier.to_string();
        state.sales.push(sale.clone());

        info!(
            sale_id = sale.id,
            product_id = sale.product_id,
            quantity = sale.quantity,
            total = %sale.total_price,
            "Sale recorded"
        );
        self.persist_slots(&mut state, &[Slot::Products, Slot::Sales]).await;

        Ok(sale)
    }

    /// Removes the sale record. Restores stock only when the policy says so.
    pub async fn delete_sale(&self, id: i64) -> Option<Sale> {
        let mut state = self.state.lock().await;

        let index = state.sales.iter().position(|s| s.id == id)?;
        let removed = state.sales.remove(index);

        let mut slots = vec![Slot::Sales];
        if self.policy.reverse_stock_on_delete {
            if let Some(product) = state
                .products
                .iter_mut()
                .find(|p| p.id == removed.product_id)
            {
                product.stock = product.stock.saturating_add(removed.quantity);
                slots.push(Slot::Products);
            }
        }

        debug!(sale_id = id, "Sale deleted");
        self.persist_slots(&mut state, &slots).await;

        Some(removed)
    }

    pub async fn clear_all_sales(&self) {
        let mut state = self.state.lock().await;
        state.sales.clear();

        info!("All sales cleared");
        self.remove_slots(&mut state, &[Slot::Sales]).await;
    }

    // =========================================================================
    // Purchases
    // =========================================================================

    /// Records a purchase and adds the quantity to the product's stock.
    ///
    /// Fails without changing anything when the quantity is out of range,
    /// the product doesn't exist or the new stock or total won't fit.
    pub async fn add_purchase(&self, input: NewPurchase, actor: &str) -> CoreResult<Purchase> {
        let mut state = self.state.lock().await;

        validate_quantity(input.quantity)?;
        let index = state.product_index(input.product_id)?;

        let product = &state.products[index];
        let total_price = product
            .buy_price
            .checked_mul(input.quantity)
            .ok_or_else(|| CoreError::TooLarge("totalPrice".to_string()))?;
        let stock = product
            .stock
            .checked_add(input.quantity)
            .ok_or_else(|| CoreError::TooLarge("stock".to_string()))?;

        let today = today();
        let id = next_id(&state.purchases);
        let product = &mut state.products[index];
        let purchase = Purchase {
            id,
            date: input.date.unwrap_or(today),
            product_id: product.id,
            product_name: product.name.clone(),
            quantity: input.quantity,
            total_price,
            supplier: input.supplier.trim().to_string(),
        };

        product.stock = stock;
        product.last_updated = today;
        product.updated_by = actor.to_string();
        state.purchases.push(purchase.clone());

        info!(
            purchase_id = purchase.id,
            product_id = purchase.product_id,
            quantity = purchase.quantity,
            total = %purchase.total_price,
            "Purchase recorded"
        );
        self.persist_slots(&mut state, &[Slot::Products, Slot::Purchases]).await;

        Ok(purchase)
    }

    /// Removes the purchase record. Takes the stock back off only when the
    /// policy says so, clamped at zero.
    pub async fn delete_purchase(&self, id: i64) -> Option<Purchase> {
        let mut state = self.state.lock().await;

        let index = state.purchases.iter().position(|p| p.id == id)?;
        let removed = state.purchases.remove(index);

        let mut slots = vec![Slot::Purchases];
        if self.policy.reverse_stock_on_delete {
            if let Some(product) = state
                .products
                .iter_mut()
                .find(|p| p.id == removed.product_id)
            {
                product.stock = product.stock.saturating_sub(removed.quantity).max(0);
                slots.push(Slot::Products);
            }
        }

        debug!(purchase_id = id, "Purchase deleted");
        self.persist_slots(&mut state, &slots).await;

        Some(removed)
    }

    pub async fn clear_all_purchases(&self) {
        let mut state = self.state.lock().await;
        state.purchases.clear();

        info!("All purchases cleared");
        self.remove_slots(&mut state, &[Slot::Purchases]).await;
    }

    // =========================================================================
    // Whole-store operations
    // =========================================================================

    /// Empties everything and removes the three persisted slots.
    pub async fn clear_all_data(&self) {
        let mut state = self.state.lock().await;
        state.products.clear();
        state.sales.clear();
        state.purchases.clear();

        info!("All data cleared");
        self.remove_slots(&mut state, &ALL_SLOTS).await;
    }

    /// Empties everything and writes the three slots back as empty arrays.
    pub async fn reset_all_data(&self) {
        let mut state = self.state.lock().await;
        state.products.clear();
        state.sales.clear();
        state.purchases.clear();

        info!("All data reset to defaults");
        self.persist_slots(&mut state, &ALL_SLOTS).await;
    }

    /// Snapshot of all three collections for download.
    pub async fn export_backup(&self, now: DateTime<Utc>) -> Backup {
        let state = self.state.lock().await;
        let backup = Backup::new(
            state.products.clone(),
            state.sales.clone(),
            state.purchases.clone(),
            now,
        );

        info!(records = backup.record_count(), "Backup exported");
        backup
    }

    /// Replaces all three collections with the backup's contents.
    pub async fn import_backup(&self, backup: Backup) {
        let mut state = self.state.lock().await;

        info!(
            products = backup.products.len(),
            sales = backup.sales.len(),
            purchases = backup.purchases.len(),
            version = %backup.version,
            "Importing backup"
        );

        state.products = backup.products;
        state.sales = backup.sales;
        state.purchases = backup.purchases;
        self.persist_slots(&mut state, &ALL_SLOTS).await;
    }

    /// Parses and imports an uploaded backup file. Nothing changes if the
    /// file is rejected.
    pub async fn import_backup_json(&self, contents: &str) -> CoreResult<usize> {
        let backup = Backup::from_json(contents)?;
        let count = backup.record_count();
        self.import_backup(backup).await;
        Ok(count)
    }

    // =========================================================================
    // Reads
    // =========================================================================

    pub async fn statistics(&self) -> Statistics {
        let state = self.state.lock().await;
        Statistics::compute(&state.products, &state.sales, &state.purchases)
    }

    pub async fn financial_report(
        &self,
        today: NaiveDate,
        operating_expenses: Money,
    ) -> FinancialReport {
        let state = self.state.lock().await;
        FinancialReport::build(
            &state.products,
            &state.sales,
            &state.purchases,
            today,
            operating_expenses,
        )
    }

    pub async fn products(&self) -> Vec<Product> {
        self.state.lock().await.products.clone()
    }

    pub async fn sales(&self) -> Vec<Sale> {
        self.state.lock().await.sales.clone()
    }

    pub async fn purchases(&self) -> Vec<Purchase> {
        self.state.lock().await.purchases.clone()
    }

    pub async fn product(&self, id: i64) -> Option<Product> {
        self.state
            .lock()
            .await
            .products
            .iter()
            .find(|p| p.id == id)
            .cloned()
    }

    pub async fn low_stock_products(&self) -> Vec<Product> {
        self.state
            .lock()
            .await
            .products
            .iter()
            .filter(|p| p.is_low_stock())
            .cloned()
            .collect()
    }

    /// Closes the underlying database, if there is one.
    pub async fn close(&self) {
        if let Some(database) = &self.database {
            database.close().await;
        }
        info!("Data store closed");
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn bayam() -> NewProduct {
        NewProduct {
            name: "Bayam".to_string(),
            category: "Daun".to_string(),
            stock: 20,
            unit: "ikat".to_string(),
            buy_price: Money::from_rupiah(2000),
            sell_price: Money::from_rupiah(3000),
            min_stock: 10,
        }
    }

    async fn store(policy: StorePolicy) -> DataStore {
        DataStore::init(Persistence::in_memory(), policy).await
    }

    #[tokio::test]
    async fn test_update_missing_product_is_noop() {
        let store = store(StorePolicy::default()).await;
        store.add_product(bayam(), "admin").await;

        let patch = ProductPatch {
            stock: Some(99),
            ..Default::default()
        };
        assert!(store.update_product(42, patch, "admin").await.is_none());
        assert_eq!(store.product(1).await.unwrap().stock, 20);
    }

    #[tokio::test]
    async fn test_update_keeps_id_and_stamps_actor() {
        let store = store(StorePolicy::default()).await;
        store.add_product(bayam(), "admin").await;

        let patch = ProductPatch {
            name: Some("Bayam Merah".to_string()),
            ..Default::default()
        };
        let updated = store.update_product(1, patch, "kasir").await.unwrap();
        assert_eq!(updated.id, 1);
        assert_eq!(updated.name, "Bayam Merah");
        assert_eq!(updated.updated_by, "kasir");
        assert_eq!(updated.stock, 20);
    }

    #[tokio::test]
    async fn test_delete_sale_keeps_stock_by_default() {
        let store = store(StorePolicy::default()).await;
        store.add_product(bayam(), "admin").await;
        let sale = store.add_sale(NewSale::new(1, 5), "kasir").await.unwrap();

        assert!(store.delete_sale(sale.id).await.is_some());
        assert!(store.delete_sale(sale.id).await.is_none());
        assert_eq!(store.product(1).await.unwrap().stock, 15);
    }

    #[tokio::test]
    async fn test_delete_reverses_stock_with_policy() {
        let store = store(StorePolicy {
            reverse_stock_on_delete: true,
        })
        .await;
        store.add_product(bayam(), "admin").await;

        let sale = store.add_sale(NewSale::new(1, 5), "kasir").await.unwrap();
        store.delete_sale(sale.id).await;
        assert_eq!(store.product(1).await.unwrap().stock, 20);

        let purchase = store
            .add_purchase(NewPurchase::new(1, 10, "Pasar Induk"), "admin")
            .await
            .unwrap();
        store.add_sale(NewSale::new(1, 25), "kasir").await.unwrap();
        assert_eq!(store.product(1).await.unwrap().stock, 5);

        // stock can't go below zero when the purchase is taken back
        store.delete_purchase(purchase.id).await;
        assert_eq!(store.product(1).await.unwrap().stock, 0);
    }

    #[tokio::test]
    async fn test_sale_validation_order() {
        let store = store(StorePolicy::default()).await;

        assert!(matches!(
            store.add_sale(NewSale::new(1, 0), "kasir").await,
            Err(CoreError::Validation(_))
        ));
        assert!(matches!(
            store.add_sale(NewSale::new(1, 1), "kasir").await,
            Err(CoreError::ProductNotFound(1))
        ));
        assert!(store.sales().await.is_empty());
    }

    #[tokio::test]
    async fn test_sale_defaults() {
        let store = store(StorePolicy::default()).await;
        store.add_product(bayam(), "admin").await;

        let sale = store
            .add_sale(NewSale::new(1, 2).customer("  "), "kasir")
            .await
            .unwrap();
        assert_eq!(sale.customer, "Pelanggan Umum");
        assert_eq!(sale.cashier, "kasir");
        assert_eq!(sale.date, today());
        assert_eq!(sale.product_name, "Bayam");
    }

    #[tokio::test]
    async fn test_purchase_of_unknown_product() {
        let store = store(StorePolicy::default()).await;
        let result = store
            .add_purchase(NewPurchase::new(7, 3, "Pasar Induk"), "admin")
            .await;
        assert!(matches!(result, Err(CoreError::ProductNotFound(7))));
        assert!(store.purchases().await.is_empty());
    }

    #[tokio::test]
    async fn test_oversized_quantities_are_rejected() {
        let store = store(StorePolicy::default()).await;
        store.add_product(bayam(), "admin").await;

        let result = store
            .add_purchase(NewPurchase::new(1, i64::MAX / 1000, "Pasar Induk"), "admin")
            .await;
        assert!(matches!(result, Err(CoreError::Validation(_))));

        let result = store
            .add_sale(NewSale::new(1, i64::MAX / 3000), "kasir")
            .await;
        assert!(matches!(result, Err(CoreError::Validation(_))));

        assert!(store.purchases().await.is_empty());
        assert!(store.sales().await.is_empty());
        assert_eq!(store.product(1).await.unwrap().stock, 20);
    }

    #[tokio::test]
    async fn test_overflowing_totals_change_nothing() {
        let store = store(StorePolicy::default()).await;
        let mut pricey = bayam();
        pricey.buy_price = Money::from_rupiah(i64::MAX / 2);
        pricey.sell_price = Money::from_rupiah(i64::MAX / 2 + 1);
        store.add_product(pricey, "admin").await;

        let result = store
            .add_purchase(NewPurchase::new(1, 3, "Pasar Induk"), "admin")
            .await;
        assert!(matches!(result, Err(CoreError::TooLarge(_))));

        let result = store.add_sale(NewSale::new(1, 3), "kasir").await;
        assert!(matches!(result, Err(CoreError::TooLarge(_))));

        let mut full = bayam();
        full.stock = i64::MAX - 1;
        store.add_product(full, "admin").await;
        let result = store
            .add_purchase(NewPurchase::new(2, 5, "Pasar Induk"), "admin")
            .await;
        assert!(matches!(result, Err(CoreError::TooLarge(_))));

        assert!(store.purchases().await.is_empty());
        assert!(store.sales().await.is_empty());
        assert_eq!(store.product(1).await.unwrap().stock, 20);
        assert_eq!(store.product(2).await.unwrap().stock, i64::MAX - 1);
    }

    #[tokio::test]
    async fn test_low_stock_products() {
        let store = store(StorePolicy::default()).await;
        store.add_product(bayam(), "admin").await;
        assert!(store.low_stock_products().await.is_empty());

        store.add_sale(NewSale::new(1, 10), "kasir").await.unwrap();
        assert_eq!(store.low_stock_products().await.len(), 1);
    }

    #[tokio::test]
    async fn test_no_warning_on_healthy_backend() {
        let store = store(StorePolicy::default()).await;
        store.add_product(bayam(), "admin").await;
        assert!(store.take_persistence_warning().await.is_none());
    }
}
