//! # Money Module
//!
//! Provides the `Money` type for prices and transaction totals.
//!
//! ## Why Whole Rupiah?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Rupiah prices at a vegetable stall never carry a fractional part:     │
//! │    Bayam: Rp 3.000 / ikat     Wortel: Rp 12.000 / kg                   │
//! │                                                                         │
//! │  Storing whole rupiah in an i64 keeps every total exact:               │
//! │    5 × Rp 3.000 = Rp 15.000, never 14999.999...                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `Money` serializes as a bare JSON number, so persisted records read
//! `"sellPrice": 3000`.
//!
//! ## Usage
//! ```rust
//! use warung_core::money::Money;
//!
//! let buy = Money::from_rupiah(2000);
//! let total = buy * 10;
//! assert_eq!(total.rupiah(), 20_000);
//! assert_eq!(format!("{}", total), "Rp 20.000");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};
use ts_rs::TS;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in whole rupiah.
///
/// ## Design Decisions
/// - **i64 (signed)**: profit goes negative when purchases exceed sales
/// - **Newtype**: serde writes the inner number, so JSON stays `"buyPrice": 2000`
/// - **Saturating operators**: totals over imported data can't panic
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from whole rupiah.
    #[inline]
    pub const fn from_rupiah(rupiah: i64) -> Self {
        Money(rupiah)
    }

    /// Returns the value in whole rupiah.
    #[inline]
    pub const fn rupiah(&self) -> i64 {
        self.0
    }

    /// Zero rupiah.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Price × quantity, the total of a sale or purchase line.
    ///
    /// Saturates at the `i64` bounds; use [`checked_mul`](Self::checked_mul)
    /// when a record is about to be written.
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0.saturating_mul(qty))
    }

    /// Price × quantity, or `None` if it doesn't fit in an `i64`.
    ///
    /// ```rust
    /// use warung_core::money::Money;
    ///
    /// assert_eq!(Money::from_rupiah(3000).checked_mul(5), Some(Money::from_rupiah(15000)));
    /// assert_eq!(Money::from_rupiah(i64::MAX / 2).checked_mul(3), None);
    /// ```
    #[inline]
    pub const fn checked_mul(&self, qty: i64) -> Option<Self> {
        match self.0.checked_mul(qty) {
            Some(value) => Some(Money(value)),
            None => None,
        }
    }

    /// Sum of two amounts, or `None` on overflow.
    #[inline]
    pub const fn checked_add(&self, other: Money) -> Option<Self> {
        match self.0.checked_add(other.0) {
            Some(value) => Some(Money(value)),
            None => None,
        }
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Formats as `Rp 15.000` (Indonesian dot grouping), `-Rp 5.000` when negative.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let digits = self.0.unsigned_abs().to_string();

        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push('.');
            }
            grouped.push(ch);
        }

        write!(f, "{}Rp {}", sign, grouped)
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0.saturating_add(other.0))
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_add(other.0);
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0.saturating_sub(other.0))
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_sub(other.0);
    }
}

impl Neg for Money {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Money(self.0.saturating_neg())
    }
}

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0.saturating_mul(qty))
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(Money::from_rupiah(0).to_string(), "Rp 0");
        assert_eq!(Money::from_rupiah(500).to_string(), "Rp 500");
        assert_eq!(Money::from_rupiah(3000).to_string(), "Rp 3.000");
        assert_eq!(Money::from_rupiah(15000).to_string(), "Rp 15.000");
        assert_eq!(Money::from_rupiah(1_250_000).to_string(), "Rp 1.250.000");
        assert_eq!(Money::from_rupiah(-5000).to_string(), "-Rp 5.000");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_rupiah(15000);
        let b = Money::from_rupiah(20000);

        assert_eq!((a - b).rupiah(), -5000);
        assert_eq!((a + b).rupiah(), 35000);
        assert_eq!((Money::from_rupiah(3000) * 5).rupiah(), 15000);
        assert_eq!(-a, Money::from_rupiah(-15000));
    }

    #[test]
    fn test_sum() {
        let totals = vec![Money::from_rupiah(1000), Money::from_rupiah(2500)];
        let sum: Money = totals.iter().sum();
        assert_eq!(sum.rupiah(), 3500);

        let empty: Vec<Money> = Vec::new();
        assert!(empty.into_iter().sum::<Money>().is_zero());
    }

    #[test]
    fn test_serializes_as_plain_number() {
        let json = serde_json::to_string(&Money::from_rupiah(3000)).unwrap();
        assert_eq!(json, "3000");

        let parsed: Money = serde_json::from_str("12000").unwrap();
        assert_eq!(parsed.rupiah(), 12000);
    }

    #[test]
    fn test_sign_checks() {
        assert!(Money::zero().is_zero());
        assert!(Money::from_rupiah(1).is_positive());
        assert!(Money::from_rupiah(-1).is_negative());
        assert_eq!(Money::from_rupiah(2000).multiply_quantity(10).rupiah(), 20000);
    }

    #[test]
    fn test_overflow_saturates_or_reports() {
        let max = Money::from_rupiah(i64::MAX);

        assert_eq!(max + Money::from_rupiah(1), max);
        assert_eq!(
            Money::from_rupiah(i64::MIN) - Money::from_rupiah(1),
            Money::from_rupiah(i64::MIN)
        );
        assert_eq!(max * 2, max);
        assert_eq!(-Money::from_rupiah(i64::MIN), max);

        let totals = [max, Money::from_rupiah(i64::MAX / 3)];
        assert_eq!(totals.iter().sum::<Money>(), max);

        assert_eq!(Money::from_rupiah(i64::MAX / 1000).checked_mul(2000), None);
        assert_eq!(max.checked_add(Money::from_rupiah(1)), None);
        assert_eq!(
            Money::from_rupiah(2000).checked_add(Money::from_rupiah(1000)),
            Some(Money::from_rupiah(3000))
        );
    }
}
