//! # Domain Types
//!
//! The three record kinds the shop keeps, plus the inputs used to create them.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │◄──│      Sale       │   │    Purchase     │──►    │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (i64)       │   │  id (i64)       │   │  id (i64)       │       │
//! │  │  stock          │   │  product_id     │   │  product_id     │       │
//! │  │  buy_price      │   │  product_name*  │   │  product_name*  │       │
//! │  │  sell_price     │   │  total_price    │   │  total_price    │       │
//! │  │  min_stock      │   │  customer       │   │  supplier       │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  * snapshot taken at creation; no cascade when a product is deleted    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identity
//! Ids are small integers: a new record gets `max(existing) + 1`, or `1` for
//! an empty collection. See [`next_id`].
//!
//! All records serialize with camelCase keys, the layout used by the
//! persisted collections and backup files.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Identity
// =============================================================================

/// A record with an integer id unique within its collection.
pub trait Record {
    fn id(&self) -> i64;
}

/// Next id for a collection: `max(existing ids) + 1`, or `1` when empty.
///
/// ```rust
/// use warung_core::types::{next_id, Record};
///
/// struct Row(i64);
/// impl Record for Row {
///     fn id(&self) -> i64 { self.0 }
/// }
///
/// assert_eq!(next_id::<Row>(&[]), 1);
/// assert_eq!(next_id(&[Row(3), Row(1)]), 4);
/// ```
pub fn next_id<T: Record>(records: &[T]) -> i64 {
    records.iter().map(Record::id).max().map_or(1, |max| max + 1)
}

// =============================================================================
// Product
// =============================================================================

/// An inventory item with buy/sell price and stock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Product {
    pub id: i64,

    /// Display name, e.g. "Bayam".
    pub name: String,

    /// Free-text grouping, e.g. "Daun" or "Umbi".
    pub category: String,

    /// Units on hand. Changed by sales and purchases.
    pub stock: i64,

    /// Unit of sale: kg, ikat, buah, ...
    pub unit: String,

    pub buy_price: Money,

    pub sell_price: Money,

    /// Low-stock threshold (inclusive).
    pub min_stock: i64,

    #[ts(as = "String")]
    pub last_updated: NaiveDate,

    /// Username of whoever touched the record last.
    pub updated_by: String,
}

impl Product {
    /// `stock <= min_stock`.
    #[inline]
    pub fn is_low_stock(&self) -> bool {
        self.stock <= self.min_stock
    }

    /// Whether `quantity` units can be sold from current stock.
    #[inline]
    pub fn can_sell(&self, quantity: i64) -> bool {
        quantity <= self.stock
    }

    /// Stock valued at buy price.
    #[inline]
    pub fn stock_value(&self) -> Money {
        self.buy_price.multiply_quantity(self.stock)
    }

    /// Margin per unit (sell - buy).
    #[inline]
    pub fn unit_margin(&self) -> Money {
        self.sell_price - self.buy_price
    }
}

impl Record for Product {
    fn id(&self) -> i64 {
        self.id
    }
}

/// Input for creating a product. The store assigns `id`, `last_updated`
/// and `updated_by`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct NewProduct {
    pub name: String,
    pub category: String,
    pub stock: i64,
    pub unit: String,
    pub buy_price: Money,
    pub sell_price: Money,
    pub min_stock: i64,
}

impl NewProduct {
    /// Builds the stored product.
    pub fn into_product(self, id: i64, today: NaiveDate, updated_by: &str) -> Product {
        Product {
            id,
            name: self.name,
            category: self.category,
            stock: self.stock,
            unit: self.unit,
            buy_price: self.buy_price,
            sell_price: self.sell_price,
            min_stock: self.min_stock,
            last_updated: today,
            updated_by: updated_by.to_string(),
        }
    }
}

/// Partial update for a product. `None` leaves the field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase", default)]
#[ts(export)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub category: Option<String>,
    pub stock: Option<i64>,
    pub unit: Option<String>,
    pub buy_price: Option<Money>,
    pub sell_price: Option<Money>,
    pub min_stock: Option<i64>,
}

impl ProductPatch {
    /// Merges the set fields into `product`. The id is never touched.
    pub fn apply_to(self, product: &mut Product) {
        if let Some(name) = self.name {
            product.name = name;
        }
        if let Some(category) = self.category {
            product.category = category;
        }
        if let Some(stock) = self.stock {
            product.stock = stock;
        }
        if let Some(unit) = self.unit {
            product.unit = unit;
        }
        if let Some(buy_price) = self.buy_price {
            product.buy_price = buy_price;
        }
        if let Some(sell_price) = self.sell_price {
            product.sell_price = sell_price;
        }
        if let Some(min_stock) = self.min_stock {
            product.min_stock = min_stock;
        }
    }
}

impl From<NewProduct> for ProductPatch {
    /// A full replacement, as sent by the inventory edit form.
    fn from(input: NewProduct) -> Self {
        ProductPatch {
            name: Some(input.name),
            category: Some(input.category),
            stock: Some(input.stock),
            unit: Some(input.unit),
            buy_price: Some(input.buy_price),
            sell_price: Some(input.sell_price),
            min_stock: Some(input.min_stock),
        }
    }
}

// =============================================================================
// Sale
// =============================================================================

/// A recorded sale. Decreased the product's stock when it was created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Sale {
    pub id: i64,
    #[ts(as = "String")]
    pub date: NaiveDate,
    pub product_id: i64,
    /// Product name at time of sale (frozen).
    pub product_name: String,
    pub quantity: i64,
    /// quantity × sell price at time of sale.
    pub total_price: Money,
    pub customer: String,
    pub cashier: String,
}

impl Record for Sale {
    fn id(&self) -> i64 {
        self.id
    }
}

/// Sales form input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct NewSale {
    pub product_id: i64,
    pub quantity: i64,
    /// Defaults to today.
    #[serde(default)]
    #[ts(as = "Option<String>")]
    pub date: Option<NaiveDate>,
    /// Blank or missing becomes [`crate::DEFAULT_CUSTOMER`].
    #[serde(default)]
    pub customer: Option<String>,
}

impl NewSale {
    pub fn new(product_id: i64, quantity: i64) -> Self {
        NewSale {
            product_id,
            quantity,
            date: None,
            customer: None,
        }
    }

    pub fn on(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn customer(mut self, customer: impl Into<String>) -> Self {
        self.customer = Some(customer.into());
        self
    }

    /// Customer name to record, falling back to the placeholder.
    pub fn customer_or_default(&self) -> String {
        match self.customer.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => crate::DEFAULT_CUSTOMER.to_string(),
        }
    }
}

// =============================================================================
// Purchase
// =============================================================================

/// A recorded purchase from a supplier. Increased the product's stock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Purchase {
    pub id: i64,
    #[ts(as = "String")]
    pub date: NaiveDate,
    pub product_id: i64,
    /// Product name at time of purchase (frozen).
    pub product_name: String,
    pub quantity: i64,
    /// quantity × buy price at time of purchase.
    pub total_price: Money,
    pub supplier: String,
}

impl Record for Purchase {
    fn id(&self) -> i64 {
        self.id
    }
}

/// Purchase form input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct NewPurchase {
    pub product_id: i64,
    pub quantity: i64,
    #[serde(default)]
    #[ts(as = "Option<String>")]
    pub date: Option<NaiveDate>,
    pub supplier: String,
}

impl NewPurchase {
    pub fn new(product_id: i64, quantity: i64, supplier: impl Into<String>) -> Self {
        NewPurchase {
            product_id,
            quantity,
            date: None,
            supplier: supplier.into(),
        }
    }

    pub fn on(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn bayam() -> Product {
        NewProduct {
            name: "Bayam".to_string(),
            category: "Daun".to_string(),
            stock: 20,
            unit: "ikat".to_string(),
            buy_price: Money::from_rupiah(2000),
            sell_price: Money::from_rupiah(3000),
            min_stock: 10,
        }
        .into_product(1, NaiveDate::from_ymd_opt(2026, 10, 19).unwrap(), "admin")
    }

    #[test]
    fn test_next_id() {
        let empty: Vec<Product> = Vec::new();
        assert_eq!(next_id(&empty), 1);

        let mut second = bayam();
        second.id = 7;
        assert_eq!(next_id(&[bayam(), second]), 8);
    }

    #[test]
    fn test_low_stock_is_inclusive() {
        let mut product = bayam();
        assert!(!product.is_low_stock());

        product.stock = 10;
        assert!(product.is_low_stock());

        product.stock = 0;
        assert!(product.is_low_stock());
    }

    #[test]
    fn test_can_sell() {
        let product = bayam();
        assert!(product.can_sell(20));
        assert!(!product.can_sell(21));
        assert_eq!(product.stock_value().rupiah(), 40000);
        assert_eq!(product.unit_margin().rupiah(), 1000);
    }

    #[test]
    fn test_patch_keeps_unset_fields() {
        let mut product = bayam();
        ProductPatch {
            stock: Some(5),
            sell_price: Some(Money::from_rupiah(3500)),
            ..ProductPatch::default()
        }
        .apply_to(&mut product);

        assert_eq!(product.id, 1);
        assert_eq!(product.name, "Bayam");
        assert_eq!(product.stock, 5);
        assert_eq!(product.sell_price.rupiah(), 3500);
        assert_eq!(product.buy_price.rupiah(), 2000);
    }

    #[test]
    fn test_product_json_layout() {
        let json = serde_json::to_value(bayam()).unwrap();
        assert_eq!(json["buyPrice"], 2000);
        assert_eq!(json["minStock"], 10);
        assert_eq!(json["lastUpdated"], "2026-10-19");
        assert_eq!(json["updatedBy"], "admin");
    }

    #[test]
    fn test_customer_default() {
        assert_eq!(NewSale::new(1, 2).customer_or_default(), "Pelanggan Umum");
        assert_eq!(
            NewSale::new(1, 2).customer("  ").customer_or_default(),
            "Pelanggan Umum"
        );
        assert_eq!(
            NewSale::new(1, 2).customer("Bu Sri").customer_or_default(),
            "Bu Sri"
        );
    }

    #[test]
    fn test_new_sale_accepts_missing_optional_fields() {
        let input: NewSale = serde_json::from_str(r#"{"productId": 3, "quantity": 2}"#).unwrap();
        assert_eq!(input, NewSale::new(3, 2));
    }
}
