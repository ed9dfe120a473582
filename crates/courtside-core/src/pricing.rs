//! # Pricing Engine
//!
//! Computes booking totals and revenue splits.
//!
//! ## Formula
//! ```text
//! total = venue_rate
//!       + coach_rate        (only when a coach slot is attached)
//!       + Σ unit_price × quantity
//! ```
//!
//! Everything here is a pure function of its inputs. The lifecycle manager
//! calls it on every create and update with freshly read rates, so a total
//! is never patched incrementally.
//!
//! All sums are checked. A total that does not fit in `i64` is rejected as
//! `OutOfRange` instead of wrapping.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreResult, ValidationError};
use crate::money::Money;

fn overflow(field: &str) -> ValidationError {
    ValidationError::OutOfRange {
        field: field.to_string(),
        min: 0,
        max: i64::MAX,
    }
}

// =============================================================================
// Priced Line
// =============================================================================

/// One equipment line as seen by the pricing engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PricedLine {
    pub name: String,
    pub unit_price: Money,
    pub quantity: i64,
}

impl PricedLine {
    pub fn new(name: impl Into<String>, unit_price: Money, quantity: i64) -> Self {
        PricedLine {
            name: name.into(),
            unit_price,
            quantity,
        }
    }

    /// unit_price × quantity.
    #[inline]
    pub fn subtotal(&self) -> CoreResult<Money> {
        self.unit_price
            .checked_mul(self.quantity)
            .ok_or_else(|| overflow("line_subtotal").into())
    }
}

/// Σ subtotal over all lines.
pub fn equipment_total(lines: &[PricedLine]) -> CoreResult<Money> {
    lines.iter().try_fold(Money::zero(), |acc, line| -> CoreResult<Money> {
        acc.checked_add(line.subtotal()?)
            .ok_or_else(|| overflow("equipment_total").into())
    })
}

/// Computes the total price of a booking.
///
/// ## Example
/// ```rust
/// use courtside_core::money::Money;
/// use courtside_core::pricing::compute_total;
///
/// let total = compute_total(Money::from_minor(100_000), Some(Money::from_minor(50_000)), &[]);
/// assert_eq!(total.unwrap().minor(), 150_000);
/// ```
pub fn compute_total(
    venue_rate: Money,
    coach_rate: Option<Money>,
    lines: &[PricedLine],
) -> CoreResult<Money> {
    let equipment = equipment_total(lines)?;
    venue_rate
        .checked_add(coach_rate.unwrap_or_default())
        .and_then(|sum| sum.checked_add(equipment))
        .ok_or_else(|| overflow("total_price").into())
}

// =============================================================================
// Revenue Split
// =============================================================================

/// How a booking's revenue is attributed.
///
/// Equipment rental is not part of the split; reporting only sums the
/// venue and coach shares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RevenueSplit {
    pub venue: Money,
    pub coach: Money,
    pub platform: Money,
}

impl RevenueSplit {
    /// `{venue: venue_rate, coach: coach_rate_or_0, platform: 0}`.
    pub fn compute(venue_rate: Money, coach_rate: Option<Money>) -> Self {
        RevenueSplit {
            venue: venue_rate,
            coach: coach_rate.unwrap_or_default(),
            platform: Money::zero(),
        }
    }
}

// =============================================================================
// Price Quote
// =============================================================================

/// Per-component breakdown of a booking price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PriceQuote {
    pub venue_rate: Money,
    /// `None` when no coach slot is attached.
    pub coach_rate: Option<Money>,
    pub lines: Vec<PricedLine>,
    pub equipment_total: Money,
    pub total: Money,
    pub split: RevenueSplit,
}

impl PriceQuote {
    /// Builds a quote from current rates.
    pub fn build(
        venue_rate: Money,
        coach_rate: Option<Money>,
        lines: Vec<PricedLine>,
    ) -> CoreResult<Self> {
        let equipment_total = equipment_total(&lines)?;
        let total = compute_total(venue_rate, coach_rate, &lines)?;

        Ok(PriceQuote {
            venue_rate,
            coach_rate,
            lines,
            equipment_total,
            total,
            split: RevenueSplit::compute(venue_rate, coach_rate),
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
