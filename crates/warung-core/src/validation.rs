//! # Validation Module
//!
//! Form-level input rules for Warung Sayur.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: View layer                                                   │
//! │  └── Calls THIS MODULE before submitting a form                        │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: DataStore (warung-store)                                     │
//! │  ├── Quantity, product existence, stock sufficiency                    │
//! │  └── Checked under the store lock, atomically with the stock change    │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Persistence                                                  │
//! │  └── JSON shape only                                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The DataStore accepts any well-typed product; price ordering is a
//! caller-side rule enforced here.
//!
//! ## Usage
//! ```rust
//! use warung_core::money::Money;
//! use warung_core::types::NewProduct;
//! use warung_core::validation::validate_new_product;
//!
//! let input = NewProduct {
//!     name: "Wortel".into(),
//!     category: "Umbi".into(),
//!     stock: 12,
//!     unit: "kg".into(),
//!     buy_price: Money::from_rupiah(8000),
//!     sell_price: Money::from_rupiah(12000),
//!     min_stock: 5,
//! };
//! assert!(validate_new_product(&input).is_ok());
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::{NewProduct, NewPurchase, NewSale};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest name/category/unit/supplier accepted.
pub const MAX_TEXT_LEN: usize = 100;

/// Largest quantity a single sale or purchase may move.
pub const MAX_ITEM_QUANTITY: i64 = 1_000_000;

// =============================================================================
// Field Validators
// =============================================================================

/// Validates a required text field (name, category, unit, supplier).
///
/// ## Rules
/// - Must not be empty after trimming
/// - At most [`MAX_TEXT_LEN`] characters
pub fn validate_required_text(field: &str, value: &str) -> ValidationResult<()> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.chars().count() > MAX_TEXT_LEN {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_TEXT_LEN,
        });
    }

    Ok(())
}

/// Validates a sale or purchase quantity.
///
/// ## Rules
/// - Must be positive (> 0)
/// - At most [`MAX_ITEM_QUANTITY`]
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a stock-like count (>= 0).
pub fn validate_count(field: &str, value: i64) -> ValidationResult<()> {
    if value < 0 {
        return Err(ValidationError::Negative {
            field: field.to_string(),
        });
    }

    Ok(())
}

/// Validates a price (> 0).
pub fn validate_price(field: &str, price: Money) -> ValidationResult<()> {
    if !price.is_positive() {
        return Err(ValidationError::MustBePositive {
            field: field.to_string(),
        });
    }

    Ok(())
}

/// Sell price must be strictly above buy price.
///
/// ```rust
/// use warung_core::money::Money;
/// use warung_core::validation::validate_price_order;
///
/// assert!(validate_price_order(Money::from_rupiah(2000), Money::from_rupiah(3000)).is_ok());
/// assert!(validate_price_order(Money::from_rupiah(3000), Money::from_rupiah(3000)).is_err());
/// ```
pub fn validate_price_order(buy: Money, sell: Money) -> ValidationResult<()> {
    if sell <= buy {
        return Err(ValidationError::SellPriceNotAboveBuyPrice {
            buy: buy.rupiah(),
            sell: sell.rupiah(),
        });
    }

    Ok(())
}

// =============================================================================
// Form Validators
// =============================================================================

/// Everything the inventory form checks before `add_product`/`update_product`.
pub fn validate_new_product(input: &NewProduct) -> ValidationResult<()> {
    validate_required_text("name", &input.name)?;
    validate_required_text("category", &input.category)?;
    validate_required_text("unit", &input.unit)?;
    validate_count("stock", input.stock)?;
    validate_count("minStock", input.min_stock)?;
    validate_price("buyPrice", input.buy_price)?;
    validate_price("sellPrice", input.sell_price)?;
    validate_price_order(input.buy_price, input.sell_price)
}

/// Sales form checks. Stock sufficiency is left to the store.
pub fn validate_new_sale(input: &NewSale) -> ValidationResult<()> {
    validate_quantity(input.quantity)?;
    if let Some(customer) = &input.customer {
        if customer.chars().count() > MAX_TEXT_LEN {
            return Err(ValidationError::TooLong {
                field: "customer".to_string(),
                max: MAX_TEXT_LEN,
            });
        }
    }
    Ok(())
}

/// Purchase form checks: positive quantity and a named supplier.
pub fn validate_new_purchase(input: &NewPurchase) -> ValidationResult<()> {
    validate_quantity(input.quantity)?;
    validate_required_text("supplier", &input.supplier)
}

// =============================================================================
// Unit Tests
// =============================================================================
