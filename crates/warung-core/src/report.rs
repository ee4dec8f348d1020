//! # Financial Report
//!
//! The figures behind the dashboard and the "Laporan Keuangan" page.
//!
//! ## Figures
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  grossProfit     = Σ sales − Σ purchases                                │
//! │  netProfit       = grossProfit − operatingExpenses (only with sales)    │
//! │  inventoryValue  = Σ product.stock × product.buyPrice                   │
//! │  salesByProduct  = quantity and total per product name                  │
//! │  todaySales      = Σ totalPrice of sales dated today                    │
//! │  recentSales     = newest 5 sales by date                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `today` is passed in so the report stays a pure function.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::stats::{total_purchases, total_sales};
use crate::types::{Product, Purchase, Sale};
use crate::RECENT_SALES_LIMIT;

/// Units and revenue for one product name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ProductSalesSummary {
    pub product_name: String,
    pub quantity: i64,
    pub total: Money,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct FinancialReport {
    pub total_sales_value: Money,
    pub total_purchases_value: Money,
    pub gross_profit: Money,
    pub operating_expenses: Money,
    pub net_profit: Money,
    pub inventory_value: Money,
    pub today_sales_value: Money,
    pub total_units_sold: i64,
    /// Grouped by the product name snapshot, in first-seen order.
    pub sales_by_product: Vec<ProductSalesSummary>,
    pub recent_sales: Vec<Sale>,
    pub low_stock_products: Vec<Product>,
}

impl FinancialReport {
    pub fn build(
        products: &[Product],
        sales: &[Sale],
        purchases: &[Purchase],
        today: NaiveDate,
        operating_expenses: Money,
    ) -> Self {
        let total_sales_value = total_sales(sales);
        let total_purchases_value = total_purchases(purchases);
        let gross_profit = total_sales_value - total_purchases_value;

        // Running costs only count once the shop has actually sold something.
        let operating_expenses = if sales.is_empty() {
            Money::zero()
        } else {
            operating_expenses
        };

        FinancialReport {
            total_sales_value,
            total_purchases_value,
            gross_profit,
            operating_expenses,
            net_profit: gross_profit - operating_expenses,
            inventory_value: products.iter().map(Product::stock_value).sum(),
            today_sales_value: sales
                .iter()
                .filter(|s| s.date == today)
                .map(|s| s.total_price)
                .sum(),
            total_units_sold: sales
                .iter()
                .fold(0i64, |units, s| units.saturating_add(s.quantity)),
            sales_by_product: sales_by_product(sales),
            recent_sales: recent_sales(sales, RECENT_SALES_LIMIT),
            low_stock_products: products
                .iter()
                .filter(|p| p.is_low_stock())
                .cloned()
                .collect(),
        }
    }
}

/// Groups sales by product name, keeping the order names first appear in.
pub fn sales_by_product(sales: &[Sale]) -> Vec<ProductSalesSummary> {
    let mut summaries: Vec<ProductSalesSummary> = Vec::new();

    for sale in sales {
        match summaries
            .iter_mut()
            .find(|s| s.product_name == sale.product_name)
        {
            Some(summary) => {
                summary.quantity = summary.quantity.saturating_add(sale.quantity);
                summary.total += sale.total_price;
            }
            None => summaries.push(ProductSalesSummary {
                product_name: sale.product_name.clone(),
                quantity: sale.quantity,
                total: sale.total_price,
            }),
        }
    }

    summaries
}

/// Newest `limit` sales by date. Equal dates keep collection order.
pub fn recent_sales(sales: &[Sale], limit: usize) -> Vec<Sale> {
    let mut sorted = sales.to_vec();
    sorted.sort_by(|a, b| b.date.cmp(&a.date));
    sorted.truncate(limit);
    sorted
}
