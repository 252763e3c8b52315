//! # Money Module
//!
//! Provides the `Money` type for handling rupee amounts safely.
//!
//! ## Why Whole Rupees?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  JEWELRY PRICING                                                        │
//! │                                                                         │
//! │  Catalog prices are whole rupees:      ₹1,25,000                        │
//! │  Every breakdown figure is rounded to the nearest rupee before it is    │
//! │  displayed, summed, or printed on an invoice.                           │
//! │                                                                         │
//! │  So the smallest unit we ever store is ONE RUPEE (i64).                 │
//! │  Fractional intermediate values only exist inside `from_ratio`, as      │
//! │  exact integer fractions, and are rounded exactly once.                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use aali_core::money::Money;
//!
//! let price = Money::from_rupees(125_000);
//! let line = price * 2;
//! assert_eq!(line.rupees(), 250_000);
//! assert_eq!(line.to_string(), "₹2,50,000");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};
use ts_rs::TS;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in whole Indian rupees.
///
/// ## Design Decisions
/// - **i64 (signed)**: differences (savings, adjustments) may go negative
/// - **Single field tuple struct**: zero-cost abstraction over i64
/// - **Newtype serde**: serializes as the bare number (`{"price": 125000}`)
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from whole rupees.
    #[inline]
    pub const fn from_rupees(rupees: i64) -> Self {
        Money(rupees)
    }

    /// Creates a Money value from the exact fraction `numerator / denominator`,
    /// rounding half away from negative infinity (`⌊x + ½⌋`).
    ///
    /// This matches how the storefront has always rounded breakdown figures,
    /// so ₹0.5 becomes ₹1 and -₹0.5 becomes ₹0.
    ///
    /// ## Example
    /// ```rust
    /// use aali_core::money::Money;
    ///
    /// assert_eq!(Money::from_ratio(5, 2).rupees(), 3);   // 2.5  → 3
    /// assert_eq!(Money::from_ratio(-5, 2).rupees(), -2); // -2.5 → -2
    /// assert_eq!(Money::from_ratio(7, 3).rupees(), 2);   // 2.33 → 2
    /// ```
    ///
    /// ## Panics
    /// Never for a positive denominator; a zero denominator yields zero.
    pub fn from_ratio(numerator: i128, denominator: i128) -> Self {
        if denominator == 0 {
            return Money::zero();
        }
        let (num, den) = if denominator < 0 {
            (-numerator, -denominator)
        } else {
            (numerator, denominator)
        };
        // ⌊n/d + 1/2⌋ == ⌊(2n + d) / 2d⌋
        let rounded = (2 * num + den).div_euclid(2 * den);
        Money(rounded as i64)
    }

    /// Returns the value in rupees.
    #[inline]
    pub const fn rupees(&self) -> i64 {
        self.0
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Returns the absolute value.
    #[inline]
    pub const fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    /// Multiplies money by a quantity.
    ///
    /// ## Example
    /// ```rust
    /// use aali_core::money::Money;
    ///
    /// let unit_price = Money::from_rupees(85_000);
    /// assert_eq!(unit_price.multiply_quantity(3).rupees(), 255_000);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0.saturating_mul(qty))
    }

    /// Returns `self - other` when positive, otherwise zero.
    #[inline]
    pub fn saturating_excess_over(&self, other: Money) -> Money {
        if self.0 > other.0 {
            Money(self.0 - other.0)
        } else {
            Money::zero()
        }
    }

    /// Formats the amount with Indian digit grouping (lakh/crore).
    ///
    /// The last three digits form one group; every group before it has two.
    ///
    /// ## Example
    /// ```rust
    /// use aali_core::money::Money;
    ///
    /// assert_eq!(Money::from_rupees(0).format_inr(), "₹0");
    /// assert_eq!(Money::from_rupees(999).format_inr(), "₹999");
    /// assert_eq!(Money::from_rupees(125_000).format_inr(), "₹1,25,000");
    /// assert_eq!(Money::from_rupees(12_345_678).format_inr(), "₹1,23,45,678");
    /// ```
    pub fn format_inr(&self) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        format!("{}₹{}", sign, group_indian(self.0.unsigned_abs()))
    }
}

/// Groups digits the Indian way: `12345678` → `1,23,45,678`.
fn group_indian(value: u64) -> String {
    let digits = value.to_string();
    if digits.len() <= 3 {
        return digits;
    }

    let (head, last_three) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 0 {
        let start = end.saturating_sub(2);
        groups.push(&head[start..end]);
        end = start;
    }
    groups.reverse();

    format!("{},{}", groups.join(","), last_three)
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display uses the storefront's rupee format (`₹1,25,000`).
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format_inr())
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        self.multiply_quantity(qty)
    }
}

impl Neg for Money {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Money(-self.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + *m)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
