//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  OUR SOLUTION: Integer minor units                                      │
//! │    Court rate 100000 + coach 50000 + 2 × 20000 = 190000, exactly        │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Booking prices are quoted in the smallest currency unit with zero decimal
//! places, so a `Money` is just a signed count of that unit.
//!
//! ## Usage
//! ```rust
//! use courtside_core::money::Money;
//!
//! let rate = Money::from_minor(100_000);
//! let doubled = rate * 2;
//! let total = rate + Money::from_minor(50_000);
//! assert_eq!(doubled.minor(), 200_000);
//! assert_eq!(total.minor(), 150_000);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub};
use ts_rs::TS;

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in the smallest currency unit.
///
/// ## Design Decisions
/// - **i64 (signed)**: matches SQLite INTEGER; negative values never appear
///   in prices but fall out of subtraction in reports
/// - **Single field tuple struct**: Zero-cost abstraction over i64
///
/// ## Where Money is Used
/// ```text
/// Venue.rate ───────┐
/// CoachProfile.rate ┼──► compute_total ──► Booking.total_price
/// Equipment × qty ──┘                  └─► RevenueSplit
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from minor units.
    ///
    /// ## Example
    /// ```rust
    /// use courtside_core::money::Money;
    ///
    /// let rate = Money::from_minor(75_000);
    /// assert_eq!(rate.minor(), 75_000);
    /// ```
    #[inline]
    pub const fn from_minor(amount: i64) -> Self {
        Money(amount)
    }

    /// Returns the value in minor units.
    #[inline]
    pub const fn minor(&self) -> i64 {
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

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Multiplies money by a quantity, `None` on overflow.
    ///
    /// ## Example
    /// ```rust
    /// use courtside_core::money::Money;
    ///
    /// let unit_price = Money::from_minor(20_000);
    /// assert_eq!(unit_price.checked_mul(3).map(|m| m.minor()), Some(60_000));
    /// assert_eq!(Money::from_minor(i64::MAX / 2).checked_mul(3), None);
    /// ```
    #[inline]
    pub const fn checked_mul(self, qty: i64) -> Option<Self> {
        match self.0.checked_mul(qty) {
            Some(amount) => Some(Money(amount)),
            None => None,
        }
    }

    /// Adds two amounts, `None` on overflow.
    #[inline]
    pub const fn checked_add(self, other: Self) -> Option<Self> {
        match self.0.checked_add(other.0) {
            Some(amount) => Some(Money(amount)),
            None => None,
        }
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Renders the amount with thousands separators (`190.000`).
///
/// ## Note
/// This is for logs and debugging. Clients format for their locale.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = self.0.unsigned_abs().to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push('.');
            }
            grouped.push(ch);
        }
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}", sign, grouped)
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

/// Multiplication by i64 (for quantity calculations).
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_minor() {
        let money = Money::from_minor(100_000);
        assert_eq!(money.minor(), 100_000);
        assert!(!money.is_zero());
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_minor(190_000).to_string(), "190.000");
        assert_eq!(Money::from_minor(1_500_000).to_string(), "1.500.000");
        assert_eq!(Money::from_minor(999).to_string(), "999");
        assert_eq!(Money::from_minor(0).to_string(), "0");
        assert_eq!(Money::from_minor(-20_000).to_string(), "-20.000");
    }

    #[test]
    fn test_checked_arithmetic() {
        let big = Money::from_minor(i64::MAX / 2);
        assert_eq!(big.checked_mul(2), Some(Money::from_minor(i64::MAX - 1)));
        assert_eq!(big.checked_mul(3), None);
        assert_eq!(big.checked_add(big), Some(Money::from_minor(i64::MAX - 1)));
        assert_eq!(Money::from_minor(i64::MAX).checked_add(Money::from_minor(1)), None);
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_minor(100_000);
        let b = Money::from_minor(50_000);

        assert_eq!((a + b).minor(), 150_000);
        assert_eq!((a - b).minor(), 50_000);
        assert_eq!((b * 3).minor(), 150_000);

        let mut c = a;
        c += b;
        assert_eq!(c.minor(), 150_000);
    }

    #[test]
    fn test_sum() {
        let total: Money = [10, 20, 30].into_iter().map(Money::from_minor).sum();
        assert_eq!(total.minor(), 60);

        let empty: Money = std::iter::empty::<Money>().sum();
        assert!(empty.is_zero());
    }
}
