//! # Slot Store
//!
//! Venue and coach schedule slots.
//!
//! ## Reservation Is One Statement
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  UPDATE schedule_slots SET is_booked = 1                               │
//! │  WHERE id = ? AND is_available = 1 AND is_booked = 0                   │
//! │    AND slot_date >= today [AND kind = 'venue' AND owner_id = ?]        │
//! │                                                                         │
//! │  rows_affected == 1  → slot is ours                                    │
//! │  rows_affected == 0  → ScheduleUnavailable                             │
//! │                                                                         │
//! │  Check and set happen under SQLite's write lock, so two concurrent     │
//! │  callers can never both see 1.                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The booked flag is written only by the lifecycle manager. Schedule owners
//! control `is_available` and may delete slots that aren't booked.

use chrono::{NaiveDate, NaiveTime, Utc};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;
use uuid::Uuid;

use crate::error::{BookingResult, DbError, DbResult};
use courtside_core::validation::validate_slot_times;
use courtside_core::{CoreError, ScheduleSlot, SlotKind, ValidationError};

const SLOT_COLUMNS: &str = "id, kind, owner_id, slot_date, start_time, end_time, \
                            is_available, is_booked, created_at, updated_at";

/// Repository for schedule slot operations.
#[derive(Debug, Clone)]
pub struct SlotRepository {
    pool: SqlitePool,
}

impl SlotRepository {
    /// Creates a new SlotRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SlotRepository { pool }
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Gets a slot by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<ScheduleSlot>> {
        let mut conn = self.pool.acquire().await?;
        Self::get_in(&mut conn, id).await
    }

    pub(crate) async fn get_in(
        conn: &mut SqliteConnection,
        id: &str,
    ) -> DbResult<Option<ScheduleSlot>> {
        let slot = sqlx::query_as::<_, ScheduleSlot>(&format!(
            "SELECT {} FROM schedule_slots WHERE id = ?1",
            SLOT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(slot)
    }

    /// Like [`get_in`](Self::get_in) but the row must exist.
    pub(crate) async fn require_in(
        conn: &mut SqliteConnection,
        id: &str,
    ) -> DbResult<ScheduleSlot> {
        Self::get_in(conn, id)
            .await?
            .ok_or_else(|| DbError::not_found("ScheduleSlot", id))
    }

    /// Lists slots a new booking could take.
    ///
    /// ## Filter
    /// - `is_available = 1 AND is_booked = 0`
    /// - `from <= slot_date <= to`, with `from` clamped to today so past
    ///   slots never show up
    ///
    /// Ordered by (date, start_time) ascending.
    pub async fn find_available(
        &self,
        kind: SlotKind,
        owner_id: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> DbResult<Vec<ScheduleSlot>> {
        let from = from.max(Utc::now().date_naive());

        let slots = sqlx::query_as::<_, ScheduleSlot>(&format!(
            r#"
            SELECT {}
            FROM schedule_slots
            WHERE kind = ?1
              AND owner_id = ?2
              AND is_available = 1
              AND is_booked = 0
              AND slot_date >= ?3
              AND slot_date <= ?4
            ORDER BY slot_date, start_time
            "#,
            SLOT_COLUMNS
        ))
        .bind(kind)
        .bind(owner_id)
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;

        Ok(slots)
    }

    /// Finds the coach's slot covering exactly the venue slot's interval.
    ///
    /// Returns `None` when the coach has no free slot at that time; callers
    /// then proceed without a coach.
    pub async fn match_coach_slot(
        &self,
        venue_slot: &ScheduleSlot,
        coach_id: &str,
    ) -> DbResult<Option<ScheduleSlot>> {
        let mut conn = self.pool.acquire().await?;
        Self::match_coach_slot_in(&mut conn, venue_slot, coach_id).await
    }

    pub(crate) async fn match_coach_slot_in(
        conn: &mut SqliteConnection,
        venue_slot: &ScheduleSlot,
        coach_id: &str,
    ) -> DbResult<Option<ScheduleSlot>> {
        let slot = sqlx::query_as::<_, ScheduleSlot>(&format!(
            r#"
            SELECT {}
            FROM schedule_slots
            WHERE kind = 'coach'
              AND owner_id = ?1
              AND slot_date = ?2
              AND start_time = ?3
              AND end_time = ?4
              AND is_available = 1
              AND is_booked = 0
            LIMIT 1
            "#,
            SLOT_COLUMNS
        ))
        .bind(coach_id)
        .bind(venue_slot.slot_date)
        .bind(venue_slot.start_time)
        .bind(venue_slot.end_time)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(slot)
    }

    // =========================================================================
    // Reserve / Release
    // =========================================================================

    /// Atomically marks a slot booked.
    ///
    /// Fails with `ScheduleUnavailable` if the slot doesn't exist, is
    /// unavailable, already booked or in the past.
    pub async fn reserve(&self, slot_id: &str) -> BookingResult<()> {
        let mut conn = self.pool.acquire().await?;
        Self::reserve_in(&mut conn, slot_id, None, Utc::now().date_naive()).await
    }

    /// Check-and-set of `is_booked`.
    ///
    /// With `venue_id` set the slot must also be a venue slot of that venue.
    pub(crate) async fn reserve_in(
        conn: &mut SqliteConnection,
        slot_id: &str,
        venue_id: Option<&str>,
        today: NaiveDate,
    ) -> BookingResult<()> {
        debug!(slot_id = %slot_id, "Reserving slot");

        let result = sqlx::query(
            r#"
            UPDATE schedule_slots SET
                is_booked = 1,
                updated_at = ?4
            WHERE id = ?1
              AND is_available = 1
              AND is_booked = 0
              AND slot_date >= ?3
              AND (?2 IS NULL OR (kind = 'venue' AND owner_id = ?2))
            "#,
        )
        .bind(slot_id)
        .bind(venue_id)
        .bind(today)
        .bind(Utc::now())
        .execute(&mut *conn)
        .await?;

        if result.rows_affected() == 0 {
            return Err(CoreError::schedule_unavailable(slot_id).into());
        }

        Ok(())
    }

    /// Marks a slot free again. Idempotent: releasing a free or missing slot
    /// is a no-op.
    pub async fn release(&self, slot_id: &str) -> DbResult<()> {
        let mut conn = self.pool.acquire().await?;
        Self::release_in(&mut conn, slot_id).await
    }

    pub(crate) async fn release_in(conn: &mut SqliteConnection, slot_id: &str) -> DbResult<()> {
        debug!(slot_id = %slot_id, "Releasing slot");

        sqlx::query(
            r#"
            UPDATE schedule_slots SET
                is_booked = 0,
                updated_at = ?2
            WHERE id = ?1 AND is_booked = 1
            "#,
        )
        .bind(slot_id)
        .bind(Utc::now())
        .execute(&mut *conn)
        .await?;

        Ok(())
    }

    // =========================================================================
    // Schedule Management
    // =========================================================================

    /// Inserts a new slot, available and unbooked.
    ///
    /// ## Errors
    /// - `Validation(InvalidFormat)` if `end <= start`
    /// - `Validation(Duplicate)` if the owner already has a slot at that
    ///   date and start time
    pub async fn insert(
        &self,
        kind: SlotKind,
        owner_id: &str,
        slot_date: NaiveDate,
        start_time: NaiveTime,
        end_time: NaiveTime,
    ) -> BookingResult<ScheduleSlot> {
        validate_slot_times(start_time, end_time)?;

        let now = Utc::now();
        let slot = ScheduleSlot {
            id: Uuid::new_v4().to_string(),
            kind,
            owner_id: owner_id.to_string(),
            slot_date,
            start_time,
            end_time,
            is_available: true,
            is_booked: false,
            created_at: now,
            updated_at: now,
        };

        debug!(
            id = %slot.id,
            kind = slot.kind.as_str(),
            date = %slot.slot_date,
            start = %slot.start_time,
            "Inserting slot"
        );

        let inserted = sqlx::query(
            r#"
            INSERT INTO schedule_slots (
                id, kind, owner_id, slot_date, start_time, end_time,
                is_available, is_booked, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
        )
        .bind(&slot.id)
        .bind(slot.kind)
        .bind(&slot.owner_id)
        .bind(slot.slot_date)
        .bind(slot.start_time)
        .bind(slot.end_time)
        .bind(slot.is_available)
        .bind(slot.is_booked)
        .bind(slot.created_at)
        .bind(slot.updated_at)
        .execute(&self.pool)
        .await;

        match inserted.map_err(DbError::from) {
            Ok(_) => Ok(slot),
            Err(DbError::UniqueViolation { .. }) => Err(ValidationError::Duplicate {
                field: "slot".to_string(),
                value: format!("{} {}", slot.slot_date, slot.start_time),
            }
            .into()),
            Err(err) => Err(err.into()),
        }
    }

    /// Opens or closes a slot for new bookings.
    ///
    /// Closing a booked slot doesn't affect the booking holding it.
    pub async fn set_availability(&self, slot_id: &str, is_available: bool) -> BookingResult<()> {
        debug!(slot_id = %slot_id, is_available, "Setting slot availability");

        let result = sqlx::query(
            r#"
            UPDATE schedule_slots SET
                is_available = ?2,
                updated_at = ?3
            WHERE id = ?1
            "#,
        )
        .bind(slot_id)
        .bind(is_available)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(CoreError::not_found("ScheduleSlot", slot_id).into());
        }

        Ok(())
    }

    /// Deletes a slot.
    ///
    /// Refused with `ScheduleUnavailable` while it is booked, and also once
    /// released if a booking (cancelled or not) still references it.
    pub async fn delete(&self, slot_id: &str) -> BookingResult<()> {
        let mut tx = self.pool.begin().await?;

        let result = match sqlx::query("DELETE FROM schedule_slots WHERE id = ?1 AND is_booked = 0")
            .bind(slot_id)
            .execute(&mut *tx)
            .await
            .map_err(DbError::from)
        {
            Err(DbError::ForeignKeyViolation { .. }) => {
                debug!(slot_id = %slot_id, "Slot still referenced by a booking");
                return Err(CoreError::schedule_unavailable(slot_id).into());
            }
            other => other?,
        };

        if result.rows_affected() == 0 {
            return match Self::get_in(&mut tx, slot_id).await? {
                Some(_) => Err(CoreError::schedule_unavailable(slot_id).into()),
                None => Err(CoreError::not_found("ScheduleSlot", slot_id).into()),
            };
        }

        tx.commit().await?;
        debug!(slot_id = %slot_id, "Deleted slot");
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BookingError;
    use crate::{Database, DbConfig};
    use chrono::Duration;

    fn hour(h: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, 0, 0).unwrap()
    }

    fn tomorrow() -> NaiveDate {
        Utc::now().date_naive() + Duration::days(1)
    }

    async fn setup() -> (Database, String) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let venue = db
            .catalog()
            .insert_venue("owner-1", "Court A", "Bandung", 100_000)
            .await
            .unwrap();
        (db, venue.id)
    }

    #[tokio::test]
    async fn test_reserve_is_check_and_set() {
        let (db, venue_id) = setup().await;
        let slot = db
            .slots()
            .insert(SlotKind::Venue, &venue_id, tomorrow(), hour(18), hour(19))
            .await
            .unwrap();

        db.slots().reserve(&slot.id).await.unwrap();
        let second = db.slots().reserve(&slot.id).await;
        assert!(matches!(
            second,
            Err(BookingError::Rejected(CoreError::ScheduleUnavailable { .. }))
        ));

        let loaded = db.slots().get_by_id(&slot.id).await.unwrap().unwrap();
        assert!(loaded.is_booked);
    }

    #[tokio::test]
    async fn test_reserve_missing_slot() {
        let (db, _) = setup().await;
        assert!(db.slots().reserve("nope").await.is_err());
    }

    #[tokio::test]
    async fn test_release_is_idempotent() {
        let (db, venue_id) = setup().await;
        let slot = db
            .slots()
            .insert(SlotKind::Venue, &venue_id, tomorrow(), hour(18), hour(19))
            .await
            .unwrap();

        db.slots().reserve(&slot.id).await.unwrap();
        db.slots().release(&slot.id).await.unwrap();
        db.slots().release(&slot.id).await.unwrap();

        let loaded = db.slots().get_by_id(&slot.id).await.unwrap().unwrap();
        assert!(!loaded.is_booked);

        // Releasing a slot that never existed is also a no-op
        db.slots().release("missing").await.unwrap();
    }

    #[tokio::test]
    async fn test_find_available_skips_booked_unavailable_and_past() {
        let (db, venue_id) = setup().await;
        let slots = db.slots();
        let today = Utc::now().date_naive();

        let past = slots
            .insert(SlotKind::Venue, &venue_id, today - Duration::days(1), hour(9), hour(10))
            .await
            .unwrap();
        let late = slots
            .insert(SlotKind::Venue, &venue_id, tomorrow(), hour(20), hour(21))
            .await
            .unwrap();
        let early = slots
            .insert(SlotKind::Venue, &venue_id, tomorrow(), hour(8), hour(9))
            .await
            .unwrap();
        let booked = slots
            .insert(SlotKind::Venue, &venue_id, tomorrow(), hour(10), hour(11))
            .await
            .unwrap();
        let closed = slots
            .insert(SlotKind::Venue, &venue_id, tomorrow(), hour(12), hour(13))
            .await
            .unwrap();

        slots.reserve(&booked.id).await.unwrap();
        slots.set_availability(&closed.id, false).await.unwrap();

        let found = slots
            .find_available(
                SlotKind::Venue,
                &venue_id,
                today - Duration::days(7),
                today + Duration::days(7),
            )
            .await
            .unwrap();

        let ids: Vec<_> = found.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec![early.id.as_str(), late.id.as_str()]);
        assert!(!ids.contains(&past.id.as_str()));
    }

    #[tokio::test]
    async fn test_match_coach_slot_requires_exact_interval() {
        let (db, venue_id) = setup().await;
        let coach = db
            .catalog()
            .insert_coach("u-coach", "Rina", 50_000, &["Bandung"], true)
            .await
            .unwrap();
        let slots = db.slots();

        let venue_slot = slots
            .insert(SlotKind::Venue, &venue_id, tomorrow(), hour(18), hour(19))
            .await
            .unwrap();

        // Overlapping but not identical
        slots
            .insert(SlotKind::Coach, &coach.id, tomorrow(), hour(18), hour(20))
            .await
            .unwrap();
        assert!(slots
            .match_coach_slot(&venue_slot, &coach.id)
            .await
            .unwrap()
            .is_none());

        let earlier = slots
            .insert(SlotKind::Coach, &coach.id, tomorrow(), hour(17), hour(18))
            .await
            .unwrap();
        assert!(slots
            .match_coach_slot(&venue_slot, &coach.id)
            .await
            .unwrap()
            .is_none());
        slots.delete(&earlier.id).await.unwrap();

        let other_day = tomorrow() + Duration::days(1);
        let venue_slot_2 = slots
            .insert(SlotKind::Venue, &venue_id, other_day, hour(18), hour(19))
            .await
            .unwrap();
        let coach_slot = slots
            .insert(SlotKind::Coach, &coach.id, other_day, hour(18), hour(19))
            .await
            .unwrap();

        let matched = slots
            .match_coach_slot(&venue_slot_2, &coach.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(matched.id, coach_slot.id);

        slots.reserve(&coach_slot.id).await.unwrap();
        assert!(slots
            .match_coach_slot(&venue_slot_2, &coach.id)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_insert_rejects_duplicates_and_bad_times() {
        let (db, venue_id) = setup().await;
        let slots = db.slots();

        slots
            .insert(SlotKind::Venue, &venue_id, tomorrow(), hour(18), hour(19))
            .await
            .unwrap();

        let dup = slots
            .insert(SlotKind::Venue, &venue_id, tomorrow(), hour(18), hour(20))
            .await;
        assert!(matches!(
            dup,
            Err(BookingError::Rejected(CoreError::Validation(
                ValidationError::Duplicate { .. }
            )))
        ));

        let backwards = slots
            .insert(SlotKind::Venue, &venue_id, tomorrow(), hour(19), hour(18))
            .await;
        assert!(backwards.is_err());
    }

    #[tokio::test]
    async fn test_delete_refused_while_booked() {
        let (db, venue_id) = setup().await;
        let slots = db.slots();
        let slot = slots
            .insert(SlotKind::Venue, &venue_id, tomorrow(), hour(18), hour(19))
            .await
            .unwrap();

        slots.reserve(&slot.id).await.unwrap();
        assert!(matches!(
            slots.delete(&slot.id).await,
            Err(BookingError::Rejected(CoreError::ScheduleUnavailable { .. }))
        ));

        slots.release(&slot.id).await.unwrap();
        slots.delete(&slot.id).await.unwrap();
        assert!(slots.get_by_id(&slot.id).await.unwrap().is_none());

        assert!(matches!(
            slots.delete(&slot.id).await,
            Err(BookingError::Rejected(CoreError::NotFound { .. }))
        ));
    }
}
