//! # Inventory Counters
//!
//! Two-phase equipment stock arithmetic.
//!
//! ## Phases
//! ```text
//!   create/update          confirm_payment            refund
//!  ───────────────►  ─────────────────────────►  ─────────────────►
//!   reserved += q     stock     -= q                stock     += q
//!                     reserved  -= q                committed -= q
//!                     committed += q
//!
//!   delete (PENDING): reserved -= q
//! ```
//!
//! A PENDING hold never blocks another hold: every request is checked
//! against `on_hand` alone, and the real check happens again at commit time.
//! The ledger in `courtside-db` reads a row, runs it through these rules and
//! writes the result back with a compare-and-set UPDATE.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};

/// Counter triple of one equipment item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct StockLevel {
    pub on_hand: i64,
    pub reserved: i64,
    pub committed: i64,
}

impl StockLevel {
    pub const fn new(on_hand: i64, reserved: i64, committed: i64) -> Self {
        StockLevel {
            on_hand,
            reserved,
            committed,
        }
    }

    /// True iff `on_hand >= quantity`.
    #[inline]
    pub const fn is_available(&self, quantity: i64) -> bool {
        self.on_hand >= quantity
    }

    /// Fails with `InsufficientStock` unless `quantity` fits in `on_hand`.
    pub fn ensure_available(&self, equipment: &str, quantity: i64) -> CoreResult<()> {
        if self.is_available(quantity) {
            Ok(())
        } else {
            Err(CoreError::InsufficientStock {
                equipment: equipment.to_string(),
                available: self.on_hand,
                requested: quantity,
            })
        }
    }

    /// Places a tentative hold.
    pub fn hold(&self, equipment: &str, quantity: i64) -> CoreResult<Self> {
        self.ensure_available(equipment, quantity)?;
        Ok(StockLevel {
            reserved: self.reserved + quantity,
            ..*self
        })
    }

    /// Drops a tentative hold. Never goes below zero.
    pub fn release_hold(&self, quantity: i64) -> Self {
        StockLevel {
            reserved: (self.reserved - quantity).max(0),
            ..*self
        }
    }

    /// Deducts stock for a confirmed booking.
    pub fn commit(&self, equipment: &str, quantity: i64) -> CoreResult<Self> {
        self.ensure_available(equipment, quantity)?;
        Ok(StockLevel {
            on_hand: self.on_hand - quantity,
            reserved: (self.reserved - quantity).max(0),
            committed: self.committed + quantity,
        })
    }

    /// Returns committed stock to the shelf.
    pub fn restore(&self, quantity: i64) -> Self {
        StockLevel {
            on_hand: self.on_hand + quantity,
            committed: (self.committed - quantity).max(0),
            ..*self
        }
    }

    /// on_hand + committed: the stock the item started with.
    #[inline]
    pub const fn original_stock(&self) -> i64 {
        self.on_hand + self.committed
    }
}
