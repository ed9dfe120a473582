//! # Transaction Repository
//!
//! The payment record attached 1:1 to each booking.
//!
//! ## Status Moves
//! ```text
//! pending ──mark_confirmed──► confirmed ──mark_cancelled──► cancelled
//! ```
//!
//! Both moves are conditional on the current status, so a lost race shows
//! up as zero rows affected rather than a silent overwrite.
//!
//! External revenue reporting reads confirmed rows through
//! [`TransactionRepository::list_confirmed_for_venue`] and
//! [`TransactionRepository::list_confirmed_for_coach`].

use chrono::{DateTime, Utc};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use courtside_core::{RevenueSplit, Transaction, TransactionStatus};

const TRANSACTION_COLUMNS: &str = "t.id, t.booking_id, t.status, t.payment_method, \
                                   t.revenue_venue, t.revenue_coach, t.revenue_platform, \
                                   t.created_at, t.confirmed_at, t.cancelled_at";

/// Repository for payment records.
#[derive(Debug, Clone)]
pub struct TransactionRepository {
    pool: SqlitePool,
}

impl TransactionRepository {
    /// Creates a new TransactionRepository.
    pub fn new(pool: SqlitePool) -> Self {
        TransactionRepository { pool }
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Gets the transaction of a booking.
    pub async fn get_by_booking(&self, booking_id: &str) -> DbResult<Option<Transaction>> {
        let mut conn = self.pool.acquire().await?;
        Self::get_by_booking_in(&mut conn, booking_id).await
    }

    pub(crate) async fn get_by_booking_in(
        conn: &mut SqliteConnection,
        booking_id: &str,
    ) -> DbResult<Option<Transaction>> {
        let transaction = sqlx::query_as::<_, Transaction>(&format!(
            "SELECT {} FROM transactions t WHERE t.booking_id = ?1",
            TRANSACTION_COLUMNS
        ))
        .bind(booking_id)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(transaction)
    }

    pub(crate) async fn require_by_booking_in(
        conn: &mut SqliteConnection,
        booking_id: &str,
    ) -> DbResult<Transaction> {
        Self::get_by_booking_in(conn, booking_id)
            .await?
            .ok_or_else(|| DbError::not_found("Transaction", booking_id))
    }

    /// Confirmed transactions of bookings at a venue, newest first.
    pub async fn list_confirmed_for_venue(&self, venue_id: &str) -> DbResult<Vec<Transaction>> {
        let rows = sqlx::query_as::<_, Transaction>(&format!(
            r#"
            SELECT {}
            FROM transactions t
            JOIN bookings b ON b.id = t.booking_id
            WHERE b.venue_id = ?1 AND t.status = ?2
            ORDER BY t.confirmed_at DESC
            "#,
            TRANSACTION_COLUMNS
        ))
        .bind(venue_id)
        .bind(TransactionStatus::Confirmed)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Confirmed transactions of bookings with a coach, newest first.
    pub async fn list_confirmed_for_coach(&self, coach_id: &str) -> DbResult<Vec<Transaction>> {
        let rows = sqlx::query_as::<_, Transaction>(&format!(
            r#"
            SELECT {}
            FROM transactions t
            JOIN bookings b ON b.id = t.booking_id
            WHERE b.coach_id = ?1 AND t.status = ?2
            ORDER BY t.confirmed_at DESC
            "#,
            TRANSACTION_COLUMNS
        ))
        .bind(coach_id)
        .bind(TransactionStatus::Confirmed)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    // =========================================================================
    // Writes
    // =========================================================================

    pub(crate) async fn insert_in(
        conn: &mut SqliteConnection,
        transaction: &Transaction,
    ) -> DbResult<()> {
        debug!(
            id = %transaction.id,
            booking_id = %transaction.booking_id,
            "Inserting transaction"
        );

        sqlx::query(
            r#"
            INSERT INTO transactions (
                id, booking_id, status, payment_method,
                revenue_venue, revenue_coach, revenue_platform,
                created_at, confirmed_at, cancelled_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
        )
        .bind(&transaction.id)
        .bind(&transaction.booking_id)
        .bind(transaction.status)
        .bind(transaction.payment_method)
        .bind(transaction.revenue_venue)
        .bind(transaction.revenue_coach)
        .bind(transaction.revenue_platform)
        .bind(transaction.created_at)
        .bind(transaction.confirmed_at)
        .bind(transaction.cancelled_at)
        .execute(&mut *conn)
        .await?;

        Ok(())
    }

    /// Overwrites the revenue split of a pending transaction.
    pub(crate) async fn update_split_in(
        conn: &mut SqliteConnection,
        booking_id: &str,
        split: &RevenueSplit,
    ) -> DbResult<()> {
        sqlx::query(
            r#"
            UPDATE transactions SET
                revenue_venue = ?2,
                revenue_coach = ?3,
                revenue_platform = ?4
            WHERE booking_id = ?1 AND status = 'pending'
            "#,
        )
        .bind(booking_id)
        .bind(split.venue.minor())
        .bind(split.coach.minor())
        .bind(split.platform.minor())
        .execute(&mut *conn)
        .await?;

        Ok(())
    }

    /// pending → confirmed. Returns false if the row wasn't pending.
    pub(crate) async fn mark_confirmed_in(
        conn: &mut SqliteConnection,
        booking_id: &str,
        now: DateTime<Utc>,
    ) -> DbResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE transactions SET
                status = 'confirmed',
                confirmed_at = ?2
            WHERE booking_id = ?1 AND status = 'pending'
            "#,
        )
        .bind(booking_id)
        .bind(now)
        .execute(&mut *conn)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    /// confirmed → cancelled. Returns false if the row wasn't confirmed.
    pub(crate) async fn mark_cancelled_in(
        conn: &mut SqliteConnection,
        booking_id: &str,
        now: DateTime<Utc>,
    ) -> DbResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE transactions SET
                status = 'cancelled',
                cancelled_at = ?2
            WHERE booking_id = ?1 AND status = 'confirmed'
            "#,
        )
        .bind(booking_id)
        .bind(now)
        .execute(&mut *conn)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    pub(crate) async fn delete_in(conn: &mut SqliteConnection, booking_id: &str) -> DbResult<()> {
        sqlx::query("DELETE FROM transactions WHERE booking_id = ?1")
            .bind(booking_id)
            .execute(&mut *conn)
            .await?;

        Ok(())
    }
}
