//! # Booking Repository
//!
//! Rows of `bookings` and `booking_equipment_lines`.
//!
//! Writes here are building blocks for the lifecycle manager and only run
//! inside its transactions. The public methods are owner-scoped reads.
//!
//! ## Ownership Scoping
//! ```text
//! touch_owned_in:  UPDATE bookings SET updated_at = ?
//!                  WHERE id = ? AND customer_id = ?
//!
//!   0 rows → NotFound (missing, or someone else's booking)
//!   1 row  → caller owns it, and this connection now holds the write lock
//! ```

use chrono::{DateTime, Utc};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::{BookingResult, DbError, DbResult};
use courtside_core::{Booking, BookingEquipmentLine, CoreError};

const BOOKING_COLUMNS: &str = "id, customer_id, venue_id, venue_slot_id, coach_id, \
                               coach_slot_id, total_price, created_at, updated_at";

const LINE_COLUMNS: &str = "id, booking_id, equipment_id, name_snapshot, unit_price, \
                            quantity, line_subtotal, created_at";

/// Repository for booking rows.
#[derive(Debug, Clone)]
pub struct BookingRepository {
    pool: SqlitePool,
}

impl BookingRepository {
    /// Creates a new BookingRepository.
    pub fn new(pool: SqlitePool) -> Self {
        BookingRepository { pool }
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Counts live bookings holding a slot. Exclusivity means 0 or 1.
    pub async fn count_live_for_slot(&self, slot_id: &str) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM bookings
            WHERE released_at IS NULL
              AND (venue_slot_id = ?1 OR coach_slot_id = ?1)
            "#,
        )
        .bind(slot_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    pub(crate) async fn require_in(conn: &mut SqliteConnection, id: &str) -> DbResult<Booking> {
        sqlx::query_as::<_, Booking>(&format!(
            "SELECT {} FROM bookings WHERE id = ?1",
            BOOKING_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or_else(|| DbError::not_found("Booking", id))
    }

    pub(crate) async fn lines_in(
        conn: &mut SqliteConnection,
        booking_id: &str,
    ) -> DbResult<Vec<BookingEquipmentLine>> {
        let lines = sqlx::query_as::<_, BookingEquipmentLine>(&format!(
            "SELECT {} FROM booking_equipment_lines WHERE booking_id = ?1 ORDER BY name_snapshot",
            LINE_COLUMNS
        ))
        .bind(booking_id)
        .fetch_all(&mut *conn)
        .await?;

        Ok(lines)
    }

    // =========================================================================
    // Ownership Locks
    // =========================================================================

    /// Bumps `updated_at` on a booking the customer owns.
    ///
    /// Run first in a transaction: it takes the write lock and proves
    /// ownership in one statement.
    pub(crate) async fn touch_owned_in(
        conn: &mut SqliteConnection,
        id: &str,
        customer_id: &str,
        now: DateTime<Utc>,
    ) -> BookingResult<()> {
        let result = sqlx::query(
            "UPDATE bookings SET updated_at = ?3 WHERE id = ?1 AND customer_id = ?2",
        )
        .bind(id)
        .bind(customer_id)
        .bind(now)
        .execute(&mut *conn)
        .await?;

        if result.rows_affected() == 0 {
            return Err(CoreError::not_found("Booking", id).into());
        }

        Ok(())
    }

    /// Bumps `updated_at` on a booking at one of the owner's venues.
    pub(crate) async fn touch_for_venue_owner_in(
        conn: &mut SqliteConnection,
        id: &str,
        owner_id: &str,
        now: DateTime<Utc>,
    ) -> BookingResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE bookings SET updated_at = ?3
            WHERE id = ?1
              AND venue_id IN (SELECT id FROM venues WHERE owner_id = ?2)
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .bind(now)
        .execute(&mut *conn)
        .await?;

        if result.rows_affected() == 0 {
            return Err(CoreError::not_found("Booking", id).into());
        }

        Ok(())
    }

    // =========================================================================
    // Writes
    // =========================================================================

    pub(crate) async fn insert_in(conn: &mut SqliteConnection, booking: &Booking) -> DbResult<()> {
        debug!(id = %booking.id, customer_id = %booking.customer_id, "Inserting booking");

        sqlx::query(
            r#"
            INSERT INTO bookings (
                id, customer_id, venue_id, venue_slot_id,
                coach_id, coach_slot_id, total_price,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
        )
        .bind(&booking.id)
        .bind(&booking.customer_id)
        .bind(&booking.venue_id)
        .bind(&booking.venue_slot_id)
        .bind(&booking.coach_id)
        .bind(&booking.coach_slot_id)
        .bind(booking.total_price)
        .bind(booking.created_at)
        .bind(booking.updated_at)
        .execute(&mut *conn)
        .await?;

        Ok(())
    }

    /// Writes the slot, coach and price columns of an updated booking.
    pub(crate) async fn update_in(conn: &mut SqliteConnection, booking: &Booking) -> DbResult<()> {
        debug!(id = %booking.id, total = booking.total_price, "Updating booking");

        sqlx::query(
            r#"
            UPDATE bookings SET
                venue_slot_id = ?2,
                coach_id = ?3,
                coach_slot_id = ?4,
                total_price = ?5,
                updated_at = ?6
            WHERE id = ?1
            "#,
        )
        .bind(&booking.id)
        .bind(&booking.venue_slot_id)
        .bind(&booking.coach_id)
        .bind(&booking.coach_slot_id)
        .bind(booking.total_price)
        .bind(booking.updated_at)
        .execute(&mut *conn)
        .await?;

        Ok(())
    }

    /// Marks a refunded booking as no longer holding its slots.
    pub(crate) async fn mark_released_in(
        conn: &mut SqliteConnection,
        id: &str,
        now: DateTime<Utc>,
    ) -> DbResult<()> {
        sqlx::query("UPDATE bookings SET released_at = ?2 WHERE id = ?1")
            .bind(id)
            .bind(now)
            .execute(&mut *conn)
            .await?;

        Ok(())
    }

    pub(crate) async fn delete_in(conn: &mut SqliteConnection, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting booking");

        sqlx::query("DELETE FROM bookings WHERE id = ?1")
            .bind(id)
            .execute(&mut *conn)
            .await?;

        Ok(())
    }

    /// Inserts one equipment line.
    ///
    /// ## Snapshot Pattern
    /// Name and unit price are copied onto the line so later catalog edits
    /// don't change what the customer agreed to.
    pub(crate) async fn insert_line_in(
        conn: &mut SqliteConnection,
        line: &BookingEquipmentLine,
    ) -> DbResult<()> {
        debug!(
            booking_id = %line.booking_id,
            equipment_id = %line.equipment_id,
            quantity = line.quantity,
            "Adding equipment line"
        );

        sqlx::query(
            r#"
            INSERT INTO booking_equipment_lines (
                id, booking_id, equipment_id, name_snapshot,
                unit_price, quantity, line_subtotal, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(&line.id)
        .bind(&line.booking_id)
        .bind(&line.equipment_id)
        .bind(&line.name_snapshot)
        .bind(line.unit_price)
        .bind(line.quantity)
        .bind(line.line_subtotal)
        .bind(line.created_at)
        .execute(&mut *conn)
        .await?;

        Ok(())
    }

    pub(crate) async fn delete_lines_in(
        conn: &mut SqliteConnection,
        booking_id: &str,
    ) -> DbResult<()> {
        sqlx::query("DELETE FROM booking_equipment_lines WHERE booking_id = ?1")
            .bind(booking_id)
            .execute(&mut *conn)
            .await?;

        Ok(())
    }
}
