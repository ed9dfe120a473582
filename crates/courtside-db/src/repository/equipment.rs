//! # Inventory Ledger
//!
//! Equipment stock with explicit hold and commit phases.
//!
//! ## Counter Moves
//! ```text
//! ┌────────────────────┬──────────────────────────────────────────────────┐
//! │ Operation          │ StockLevel rule applied to the current row       │
//! ├────────────────────┼──────────────────────────────────────────────────┤
//! │ hold               │ hold          (rejects q > stock)                │
//! │ release_hold       │ release_hold  (floored at 0)                     │
//! │ commit_deduction   │ commit        (rejects q > stock)                │
//! │ restore            │ restore                                          │
//! └────────────────────┴──────────────────────────────────────────────────┘
//!
//!   read row ──► StockLevel::rule ──► UPDATE ... WHERE counters = read
//!                      │                         │
//!                      ▼                         ▼ 0 rows
//!              Rejected (no write)          re-read, retry
//! ```
//!
//! The counter arithmetic lives in `courtside_core::inventory`; this module
//! only persists its results. `stock_quantity` is only ever decremented by
//! `commit`, which refuses to go below zero, and the CHECK constraints on
//! the table back this up.

use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;
use uuid::Uuid;

use crate::error::{BookingResult, DbError, DbResult};
use courtside_core::validation::{validate_name, validate_quantity, validate_rate, validate_stock};
use courtside_core::{CoreError, CoreResult, EquipmentItem, StockLevel};

const EQUIPMENT_COLUMNS: &str = "id, venue_id, name, unit_price, stock_quantity, \
                                 reserved_quantity, committed_quantity";

/// Compare-and-set attempts before a pool-level ledger write gives up.
const LEDGER_ATTEMPTS: usize = 5;

/// Repository for equipment stock.
#[derive(Debug, Clone)]
pub struct EquipmentLedger {
    pool: SqlitePool,
}

impl EquipmentLedger {
    /// Creates a new EquipmentLedger.
    pub fn new(pool: SqlitePool) -> Self {
        EquipmentLedger { pool }
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Gets an equipment item by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<EquipmentItem>> {
        let mut conn = self.pool.acquire().await?;
        Self::get_in(&mut conn, id).await
    }

    pub(crate) async fn get_in(
        conn: &mut SqliteConnection,
        id: &str,
    ) -> DbResult<Option<EquipmentItem>> {
        let item = sqlx::query_as::<_, EquipmentItem>(&format!(
            "SELECT {} FROM equipment WHERE id = ?1",
            EQUIPMENT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(item)
    }

    /// Gets an item only if it belongs to `venue_id`.
    ///
    /// Equipment of another venue is reported as `NotFound`.
    pub(crate) async fn get_for_venue_in(
        conn: &mut SqliteConnection,
        id: &str,
        venue_id: &str,
    ) -> BookingResult<EquipmentItem> {
        let item = sqlx::query_as::<_, EquipmentItem>(&format!(
            "SELECT {} FROM equipment WHERE id = ?1 AND venue_id = ?2",
            EQUIPMENT_COLUMNS
        ))
        .bind(id)
        .bind(venue_id)
        .fetch_optional(&mut *conn)
        .await?;

        item.ok_or_else(|| CoreError::not_found("Equipment", id).into())
    }

    /// True iff the item has at least `quantity` on hand.
    pub async fn check_available(&self, id: &str, quantity: i64) -> BookingResult<bool> {
        let item = self
            .get_by_id(id)
            .await?
            .ok_or_else(|| CoreError::not_found("Equipment", id))?;

        Ok(item.stock_level().is_available(quantity))
    }

    // =========================================================================
    // Writes
    // =========================================================================

    /// Inserts an equipment item with no holds or commits.
    pub async fn insert(
        &self,
        venue_id: &str,
        name: &str,
        unit_price: i64,
        stock_quantity: i64,
    ) -> BookingResult<EquipmentItem> {
        validate_name("name", name)?;
        validate_rate("unit_price", unit_price)?;
        validate_stock(stock_quantity)?;

        let item = EquipmentItem {
            id: Uuid::new_v4().to_string(),
            venue_id: venue_id.to_string(),
            name: name.trim().to_string(),
            unit_price,
            stock_quantity,
            reserved_quantity: 0,
            committed_quantity: 0,
        };
        let now = Utc::now();

        debug!(id = %item.id, name = %item.name, stock = stock_quantity, "Inserting equipment");

        sqlx::query(
            r#"
            INSERT INTO equipment (
                id, venue_id, name, unit_price,
                stock_quantity, reserved_quantity, committed_quantity,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, 0, 0, ?6, ?6)
            "#,
        )
        .bind(&item.id)
        .bind(&item.venue_id)
        .bind(&item.name)
        .bind(item.unit_price)
        .bind(item.stock_quantity)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(item)
    }

    /// Places a tentative hold for a PENDING booking.
    pub(crate) async fn hold_in(
        conn: &mut SqliteConnection,
        id: &str,
        quantity: i64,
    ) -> BookingResult<StockLevel> {
        validate_quantity(quantity)?;
        debug!(equipment_id = %id, quantity, "Holding equipment");

        Self::apply_in(conn, id, |item| {
            item.stock_level().hold(&item.name, quantity)
        })
        .await
    }

    /// Drops a tentative hold.
    pub(crate) async fn release_hold_in(
        conn: &mut SqliteConnection,
        id: &str,
        quantity: i64,
    ) -> BookingResult<StockLevel> {
        debug!(equipment_id = %id, quantity, "Releasing equipment hold");

        Self::apply_in(conn, id, |item| Ok(item.stock_level().release_hold(quantity))).await
    }

    /// Deducts stock at payment confirmation.
    ///
    /// Re-checked against the current row, not the level seen at booking
    /// time. Fails with `InsufficientStock` and leaves the row untouched if
    /// there isn't enough.
    pub async fn commit_deduction(&self, id: &str, quantity: i64) -> BookingResult<StockLevel> {
        let mut conn = self.pool.acquire().await?;
        Self::commit_deduction_in(&mut conn, id, quantity).await
    }

    pub(crate) async fn commit_deduction_in(
        conn: &mut SqliteConnection,
        id: &str,
        quantity: i64,
    ) -> BookingResult<StockLevel> {
        validate_quantity(quantity)?;
        debug!(equipment_id = %id, quantity, "Committing equipment deduction");

        Self::apply_in(conn, id, |item| {
            item.stock_level().commit(&item.name, quantity)
        })
        .await
    }

    /// Returns committed stock to the shelf (refund of a confirmed booking).
    pub async fn restore(&self, id: &str, quantity: i64) -> BookingResult<StockLevel> {
        let mut conn = self.pool.acquire().await?;
        Self::restore_in(&mut conn, id, quantity).await
    }

    pub(crate) async fn restore_in(
        conn: &mut SqliteConnection,
        id: &str,
        quantity: i64,
    ) -> BookingResult<StockLevel> {
        debug!(equipment_id = %id, quantity, "Restoring equipment stock");

        Self::apply_in(conn, id, |item| Ok(item.stock_level().restore(quantity))).await
    }

    /// Reads the row, runs `step` on its counters and writes the result
    /// back only if the row still holds what was read.
    ///
    /// Inside a booking transaction the write lock is already held and the
    /// first attempt always lands. Pool-level callers can race, so a lost
    /// compare-and-set re-reads and tries again.
    async fn apply_in<F>(conn: &mut SqliteConnection, id: &str, step: F) -> BookingResult<StockLevel>
    where
        F: Fn(&EquipmentItem) -> CoreResult<StockLevel>,
    {
        for _ in 0..LEDGER_ATTEMPTS {
            let item = Self::get_in(conn, id)
                .await?
                .ok_or_else(|| CoreError::not_found("Equipment", id))?;
            let current = item.stock_level();
            let next = step(&item)?;

            let result = sqlx::query(
                r#"
                UPDATE equipment SET
                    stock_quantity = ?2,
                    reserved_quantity = ?3,
                    committed_quantity = ?4,
                    updated_at = ?5
                WHERE id = ?1
                  AND stock_quantity = ?6
                  AND reserved_quantity = ?7
                  AND committed_quantity = ?8
                "#,
            )
            .bind(id)
            .bind(next.on_hand)
            .bind(next.reserved)
            .bind(next.committed)
            .bind(Utc::now())
            .bind(current.on_hand)
            .bind(current.reserved)
            .bind(current.committed)
            .execute(&mut *conn)
            .await?;

            if result.rows_affected() == 1 {
                return Ok(next);
            }
            debug!(equipment_id = %id, "Equipment counters moved, re-reading");
        }

        Err(DbError::QueryFailed(format!("equipment {} kept changing during update", id)).into())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
