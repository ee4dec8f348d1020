//! # Statistics
//!
//! Aggregates derived from the three collections. Never persisted; the
//! store recomputes them on every request.
//!
//! ```text
//! totalSalesValue     = Σ sale.totalPrice
//! totalPurchasesValue = Σ purchase.totalPrice
//! profit              = totalSalesValue - totalPurchasesValue
//! lowStockCount       = count(product.stock ≤ product.minStock)
//! isEmpty             = no products ∧ no sales ∧ no purchases
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::{Product, Purchase, Sale};

/// Summary figures for the dashboard and data-management pages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Statistics {
    pub total_products: usize,
    pub total_sales_value: Money,
    pub total_purchases_value: Money,
    pub profit: Money,
    pub low_stock_count: usize,
    pub total_sales_transactions: usize,
    pub total_purchase_transactions: usize,
    pub is_empty: bool,
    pub has_products: bool,
    pub has_sales: bool,
    pub has_purchases: bool,
}

impl Statistics {
    pub fn compute(products: &[Product], sales: &[Sale], purchases: &[Purchase]) -> Self {
        let total_sales_value = total_sales(sales);
        let total_purchases_value = total_purchases(purchases);

        Statistics {
            total_products: products.len(),
            total_sales_value,
            total_purchases_value,
            profit: total_sales_value - total_purchases_value,
            low_stock_count: products.iter().filter(|p| p.is_low_stock()).count(),
            total_sales_transactions: sales.len(),
            total_purchase_transactions: purchases.len(),
            is_empty: products.is_empty() && sales.is_empty() && purchases.is_empty(),
            has_products: !products.is_empty(),
            has_sales: !sales.is_empty(),
            has_purchases: !purchases.is_empty(),
        }
    }
}

/// Σ sale.totalPrice
pub fn total_sales(sales: &[Sale]) -> Money {
    sales.iter().map(|s| s.total_price).sum()
}

/// Σ purchase.totalPrice
pub fn total_purchases(purchases: &[Purchase]) -> Money {
    purchases.iter().map(|p| p.total_price).sum()
}
