//! # Booking Lifecycle Manager
//!
//! Creates, updates, deletes, confirms and refunds bookings, coordinating
//! the slot store, inventory ledger, pricing engine and payment tracker.
//!
//! ## One Operation, One Transaction
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  BEGIN                                                                  │
//! │    1st statement is a write:                                           │
//! │      create  → reserve venue slot (check-and-set)                      │
//! │      others  → touch booking row scoped to the caller                  │
//! │    ...reads see the latest committed state (we hold the write lock)    │
//! │    ...every further check re-runs against that state                   │
//! │  COMMIT  (or drop → ROLLBACK on any error)                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Any `?` inside an operation drops the `sqlx::Transaction`, which rolls
//! back every slot flip, hold and row written so far. Nothing partial is
//! ever visible to another request.

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{BookingError, BookingResult, DbError};
use crate::repository::booking::BookingRepository;
use crate::repository::catalog::CatalogRepository;
use crate::repository::equipment::EquipmentLedger;
use crate::repository::slot::SlotRepository;
use crate::repository::transaction::TransactionRepository;
use courtside_core::lifecycle::{ensure_transition, BookingAction};
use courtside_core::validation::{validate_equipment_requests, validate_id};
use courtside_core::{
    AvailableCoach, Booking, BookingEquipmentLine, BookingSnapshot, BookingUpdate,
    CoachProfile, CoachSelection, CoreError, EquipmentRequest, Identity, Money, NewBooking,
    PriceQuote, PricedLine, Role, ScheduleSlot, SlotKind, Transaction, TransactionStatus, Venue,
};

/// Coach and matching slot attached to a booking.
struct CoachBinding {
    coach: CoachProfile,
    slot_id: String,
}

/// Row of the available-coach query before the city filter.
#[derive(sqlx::FromRow)]
struct CoachSlotRow {
    coach_id: String,
    name: String,
    rate: i64,
    service_areas: String,
    coach_slot_id: String,
}

/// Orchestrates booking operations.
#[derive(Debug, Clone)]
pub struct BookingManager {
    pool: SqlitePool,
}

impl BookingManager {
    /// Creates a new BookingManager.
    pub fn new(pool: SqlitePool) -> Self {
        BookingManager { pool }
    }

    // =========================================================================
    // Create
    // =========================================================================

    /// Creates a PENDING booking.
    ///
    /// ## Steps (one transaction)
    /// 1. Reserve the venue slot: must belong to `venue_id`, be available,
    ///    unbooked and not in the past → else `ScheduleUnavailable`
    /// 2. Check every equipment line against current stock → else
    ///    `InsufficientStock` for the whole booking
    /// 3. Best-effort coach match; no match means no coach
    /// 4. Price, persist booking + lines + transaction, place holds
    pub async fn create(
        &self,
        identity: &Identity,
        request: &NewBooking,
    ) -> BookingResult<BookingSnapshot> {
        let customer_id = identity.require_customer()?;
        validate_id("venue_id", &request.venue_id)?;
        validate_id("schedule_id", &request.schedule_id)?;
        validate_equipment_requests(&request.equipment)?;

        let now = Utc::now();
        let today = now.date_naive();
        let mut tx = self.pool.begin().await?;

        if let Err(err) =
            SlotRepository::reserve_in(&mut tx, &request.schedule_id, Some(&request.venue_id), today)
                .await
        {
            warn!(
                schedule_id = %request.schedule_id,
                customer_id = %customer_id,
                "Create rejected: schedule unavailable"
            );
            return Err(err);
        }

        let venue = CatalogRepository::venue_in(&mut tx, &request.venue_id)
            .await?
            .ok_or_else(|| CoreError::not_found("Venue", &request.venue_id))?;
        let venue_slot = SlotRepository::require_in(&mut tx, &request.schedule_id).await?;

        let booking_id = Uuid::new_v4().to_string();
        let lines = place_lines(&mut tx, &booking_id, &venue.id, &request.equipment, now).await?;

        let coach = match &request.coach_id {
            Some(coach_id) => bind_coach(&mut tx, &venue_slot, coach_id, today).await?,
            None => None,
        };

        let quote = quote_for(&venue, coach.as_ref(), &lines)?;

        let booking = Booking {
            id: booking_id,
            customer_id: customer_id.to_string(),
            venue_id: venue.id.clone(),
            venue_slot_id: venue_slot.id.clone(),
            coach_id: coach.as_ref().map(|c| c.coach.id.clone()),
            coach_slot_id: coach.as_ref().map(|c| c.slot_id.clone()),
            total_price: quote.total.minor(),
            created_at: now,
            updated_at: now,
        };
        BookingRepository::insert_in(&mut tx, &booking).await?;
        for line in &lines {
            BookingRepository::insert_line_in(&mut tx, line).await?;
        }

        let transaction = Transaction {
            id: Uuid::new_v4().to_string(),
            booking_id: booking.id.clone(),
            status: TransactionStatus::Pending,
            payment_method: request.payment_method,
            revenue_venue: quote.split.venue.minor(),
            revenue_coach: quote.split.coach.minor(),
            revenue_platform: quote.split.platform.minor(),
            created_at: now,
            confirmed_at: None,
            cancelled_at: None,
        };
        TransactionRepository::insert_in(&mut tx, &transaction).await?;

        let snapshot = load_snapshot(&mut tx, &booking.id).await?;
        tx.commit().await?;

        info!(
            booking_id = %booking.id,
            customer_id = %customer_id,
            schedule_id = %booking.venue_slot_id,
            coach = booking.coach_id.is_some(),
            total = %quote.total,
            "Booking created"
        );

        Ok(snapshot)
    }

    // =========================================================================
    // Update
    // =========================================================================

    /// Changes the slot, coach or equipment of a PENDING booking.
    ///
    /// The new venue slot is reserved before the old one is released, so on
    /// `ScheduleUnavailable` the booking still holds its original slot.
    /// Price and revenue split are recomputed from current rates.
    pub async fn update(
        &self,
        identity: &Identity,
        booking_id: &str,
        changes: &BookingUpdate,
    ) -> BookingResult<BookingSnapshot> {
        let customer_id = customer_scope(identity, booking_id)?;
        if let Some(schedule_id) = &changes.schedule_id {
            validate_id("schedule_id", schedule_id)?;
        }
        if let Some(equipment) = &changes.equipment {
            validate_equipment_requests(equipment)?;
        }

        let now = Utc::now();
        let today = now.date_naive();
        let mut tx = self.pool.begin().await?;

        BookingRepository::touch_owned_in(&mut tx, booking_id, customer_id, now).await?;
        let mut booking = BookingRepository::require_in(&mut tx, booking_id).await?;
        let transaction = TransactionRepository::require_by_booking_in(&mut tx, booking_id).await?;
        ensure_transition(booking_id, transaction.status, BookingAction::Update)?;

        let venue = CatalogRepository::venue_in(&mut tx, &booking.venue_id)
            .await?
            .ok_or_else(|| DbError::not_found("Venue", &booking.venue_id))?;

        // Venue slot: reserve new, then release old
        let slot_changed = match &changes.schedule_id {
            Some(new_id) if *new_id != booking.venue_slot_id => {
                if let Err(err) =
                    SlotRepository::reserve_in(&mut tx, new_id, Some(&booking.venue_id), today).await
                {
                    warn!(
                        booking_id = %booking_id,
                        schedule_id = %new_id,
                        "Update rejected: schedule unavailable"
                    );
                    return Err(err);
                }
                SlotRepository::release_in(&mut tx, &booking.venue_slot_id).await?;
                booking.venue_slot_id = new_id.clone();
                true
            }
            _ => false,
        };
        let venue_slot = SlotRepository::require_in(&mut tx, &booking.venue_slot_id).await?;

        // Coach
        let coach = rebind_coach(&mut tx, &booking, &venue_slot, &changes.coach, slot_changed, today)
            .await?;
        booking.coach_id = coach.as_ref().map(|c| c.coach.id.clone());
        booking.coach_slot_id = coach.as_ref().map(|c| c.slot_id.clone());

        // Equipment: full replacement when given
        let lines = match &changes.equipment {
            Some(requests) => {
                for old in BookingRepository::lines_in(&mut tx, booking_id).await? {
                    EquipmentLedger::release_hold_in(&mut tx, &old.equipment_id, old.quantity)
                        .await?;
                }
                BookingRepository::delete_lines_in(&mut tx, booking_id).await?;

                let lines = place_lines(&mut tx, booking_id, &venue.id, requests, now).await?;
                for line in &lines {
                    BookingRepository::insert_line_in(&mut tx, line).await?;
                }
                lines
            }
            None => BookingRepository::lines_in(&mut tx, booking_id).await?,
        };

        let quote = quote_for(&venue, coach.as_ref(), &lines)?;
        booking.total_price = quote.total.minor();
        booking.updated_at = now;

        BookingRepository::update_in(&mut tx, &booking).await?;
        TransactionRepository::update_split_in(&mut tx, booking_id, &quote.split).await?;

        let snapshot = load_snapshot(&mut tx, booking_id).await?;
        tx.commit().await?;

        info!(
            booking_id = %booking_id,
            slot_changed,
            coach = booking.coach_id.is_some(),
            total = %quote.total,
            "Booking updated"
        );

        Ok(snapshot)
    }

    // =========================================================================
    // Delete
    // =========================================================================

    /// Deletes a PENDING booking, releasing its slots and equipment holds.
    pub async fn delete(&self, identity: &Identity, booking_id: &str) -> BookingResult<()> {
        let customer_id = customer_scope(identity, booking_id)?;
        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        BookingRepository::touch_owned_in(&mut tx, booking_id, customer_id, now).await?;
        let booking = BookingRepository::require_in(&mut tx, booking_id).await?;
        let transaction = TransactionRepository::require_by_booking_in(&mut tx, booking_id).await?;
        ensure_transition(booking_id, transaction.status, BookingAction::Delete)?;

        SlotRepository::release_in(&mut tx, &booking.venue_slot_id).await?;
        if let Some(coach_slot_id) = &booking.coach_slot_id {
            SlotRepository::release_in(&mut tx, coach_slot_id).await?;
        }

        for line in BookingRepository::lines_in(&mut tx, booking_id).await? {
            EquipmentLedger::release_hold_in(&mut tx, &line.equipment_id, line.quantity).await?;
        }

        BookingRepository::delete_lines_in(&mut tx, booking_id).await?;
        TransactionRepository::delete_in(&mut tx, booking_id).await?;
        BookingRepository::delete_in(&mut tx, booking_id).await?;

        tx.commit().await?;

        info!(booking_id = %booking_id, customer_id = %customer_id, "Booking deleted");
        Ok(())
    }

    // =========================================================================
    // Confirm Payment
    // =========================================================================

    /// PENDING → CONFIRMED, deducting every equipment line from stock.
    ///
    /// Stock is re-checked now, not at booking time. If any line is short
    /// the whole confirmation fails with `InsufficientStock` and nothing is
    /// deducted. CASH and TRANSFER confirm the same way.
    pub async fn confirm_payment(
        &self,
        identity: &Identity,
        booking_id: &str,
    ) -> BookingResult<BookingSnapshot> {
        let customer_id = customer_scope(identity, booking_id)?;
        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        BookingRepository::touch_owned_in(&mut tx, booking_id, customer_id, now).await?;
        let transaction = TransactionRepository::require_by_booking_in(&mut tx, booking_id).await?;
        ensure_transition(booking_id, transaction.status, BookingAction::Confirm)?;

        for line in BookingRepository::lines_in(&mut tx, booking_id).await? {
            if let Err(err) =
                EquipmentLedger::commit_deduction_in(&mut tx, &line.equipment_id, line.quantity)
                    .await
            {
                warn!(
                    booking_id = %booking_id,
                    equipment_id = %line.equipment_id,
                    "Confirmation rejected: {}",
                    err
                );
                return Err(err);
            }
        }

        if !TransactionRepository::mark_confirmed_in(&mut tx, booking_id, now).await? {
            return Err(locked(booking_id, transaction.status));
        }

        let snapshot = load_snapshot(&mut tx, booking_id).await?;
        tx.commit().await?;

        info!(
            booking_id = %booking_id,
            method = ?transaction.payment_method,
            "Payment confirmed"
        );

        Ok(snapshot)
    }

    // =========================================================================
    // Refund
    // =========================================================================

    /// CONFIRMED → CANCELLED by the owner of the booking's venue.
    ///
    /// Releases both slots and restores every committed equipment line. The
    /// booking row stays for audit but no longer holds its slots.
    pub async fn refund(
        &self,
        identity: &Identity,
        booking_id: &str,
    ) -> BookingResult<BookingSnapshot> {
        if identity.role != Role::VenueOwner {
            return Err(CoreError::not_found("Booking", booking_id).into());
        }

        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        BookingRepository::touch_for_venue_owner_in(&mut tx, booking_id, &identity.user_id, now)
            .await?;
        let booking = BookingRepository::require_in(&mut tx, booking_id).await?;
        let transaction = TransactionRepository::require_by_booking_in(&mut tx, booking_id).await?;
        ensure_transition(booking_id, transaction.status, BookingAction::Refund)?;

        SlotRepository::release_in(&mut tx, &booking.venue_slot_id).await?;
        if let Some(coach_slot_id) = &booking.coach_slot_id {
            SlotRepository::release_in(&mut tx, coach_slot_id).await?;
        }

        for line in BookingRepository::lines_in(&mut tx, booking_id).await? {
            EquipmentLedger::restore_in(&mut tx, &line.equipment_id, line.quantity).await?;
        }

        if !TransactionRepository::mark_cancelled_in(&mut tx, booking_id, now).await? {
            return Err(locked(booking_id, transaction.status));
        }
        BookingRepository::mark_released_in(&mut tx, booking_id, now).await?;

        let snapshot = load_snapshot(&mut tx, booking_id).await?;
        tx.commit().await?;

        info!(
            booking_id = %booking_id,
            owner_id = %identity.user_id,
            "Booking refunded"
        );

        Ok(snapshot)
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Verified coaches who serve the venue's city and have a free slot with
    /// exactly the venue slot's date and times.
    pub async fn list_available_coaches_for_slot(
        &self,
        schedule_id: &str,
    ) -> BookingResult<Vec<AvailableCoach>> {
        let mut conn = self.pool.acquire().await?;

        let venue_slot = SlotRepository::get_in(&mut conn, schedule_id)
            .await?
            .filter(|slot| slot.kind == SlotKind::Venue)
            .ok_or_else(|| CoreError::not_found("Schedule", schedule_id))?;

        let venue = CatalogRepository::venue_in(&mut conn, &venue_slot.owner_id)
            .await?
            .ok_or_else(|| CoreError::not_found("Venue", &venue_slot.owner_id))?;

        let rows = sqlx::query_as::<_, CoachSlotRow>(
            r#"
            SELECT
                c.id AS coach_id,
                c.name AS name,
                c.rate AS rate,
                c.service_areas AS service_areas,
                s.id AS coach_slot_id
            FROM coach_profiles c
            JOIN schedule_slots s ON s.kind = 'coach' AND s.owner_id = c.id
            WHERE c.is_verified = 1
              AND s.slot_date = ?1
              AND s.start_time = ?2
              AND s.end_time = ?3
              AND s.is_available = 1
              AND s.is_booked = 0
            ORDER BY c.name, c.id
            "#,
        )
        .bind(venue_slot.slot_date)
        .bind(venue_slot.start_time)
        .bind(venue_slot.end_time)
        .fetch_all(&mut *conn)
        .await?;

        let coaches: Vec<AvailableCoach> = rows
            .into_iter()
            .filter(|row| serves_city(&row.service_areas, &venue.city))
            .map(|row| AvailableCoach {
                coach_id: row.coach_id,
                name: row.name,
                rate: row.rate,
                coach_slot_id: row.coach_slot_id,
            })
            .collect();

        debug!(
            schedule_id = %schedule_id,
            city = %venue.city,
            count = coaches.len(),
            "Listed available coaches"
        );

        Ok(coaches)
    }

    /// Everything about one of the caller's bookings (update-form pre-fill).
    pub async fn get_booking_snapshot(
        &self,
        identity: &Identity,
        booking_id: &str,
    ) -> BookingResult<BookingSnapshot> {
        let customer_id = customer_scope(identity, booking_id)?;
        let mut conn = self.pool.acquire().await?;

        let owned: Option<String> =
            sqlx::query_scalar("SELECT id FROM bookings WHERE id = ?1 AND customer_id = ?2")
                .bind(booking_id)
                .bind(customer_id)
                .fetch_optional(&mut *conn)
                .await?;
        if owned.is_none() {
            return Err(CoreError::not_found("Booking", booking_id).into());
        }

        Ok(load_snapshot(&mut conn, booking_id).await?)
    }

    /// The caller's bookings, newest first.
    pub async fn list_customer_bookings(
        &self,
        identity: &Identity,
    ) -> BookingResult<Vec<BookingSnapshot>> {
        let customer_id = identity.require_customer()?;
        let mut conn = self.pool.acquire().await?;

        let ids: Vec<String> = sqlx::query_scalar(
            "SELECT id FROM bookings WHERE customer_id = ?1 ORDER BY created_at DESC, id",
        )
        .bind(customer_id)
        .fetch_all(&mut *conn)
        .await?;

        let mut snapshots = Vec::with_capacity(ids.len());
        for id in ids {
            snapshots.push(load_snapshot(&mut conn, &id).await?);
        }

        Ok(snapshots)
    }
}

// =============================================================================
// Helpers
// =============================================================================

/// Customer id for booking-scoped calls. Other roles see `NotFound`.
fn customer_scope<'a>(identity: &'a Identity, booking_id: &str) -> Result<&'a str, BookingError> {
    match identity.role {
        Role::Customer => Ok(&identity.user_id),
        _ => Err(CoreError::not_found("Booking", booking_id).into()),
    }
}

fn locked(booking_id: &str, status: TransactionStatus) -> BookingError {
    CoreError::BookingLocked {
        booking_id: booking_id.to_string(),
        status: status.to_string(),
    }
    .into()
}

fn serves_city(service_areas: &str, city: &str) -> bool {
    service_areas
        .split(',')
        .map(str::trim)
        .any(|area| !area.is_empty() && area.eq_ignore_ascii_case(city.trim()))
}

fn quote_for(
    venue: &Venue,
    coach: Option<&CoachBinding>,
    lines: &[BookingEquipmentLine],
) -> BookingResult<PriceQuote> {
    let priced = lines
        .iter()
        .map(|line| {
            PricedLine::new(
                line.name_snapshot.clone(),
                Money::from_minor(line.unit_price),
                line.quantity,
            )
        })
        .collect();

    Ok(PriceQuote::build(
        venue.rate(),
        coach.map(|c| c.coach.rate()),
        priced,
    )?)
}

/// Checks each request against the venue's equipment and current stock,
/// places a hold, and returns the priced lines (not yet inserted).
async fn place_lines(
    conn: &mut SqliteConnection,
    booking_id: &str,
    venue_id: &str,
    requests: &[EquipmentRequest],
    now: DateTime<Utc>,
) -> BookingResult<Vec<BookingEquipmentLine>> {
    let mut lines = Vec::with_capacity(requests.len());

    for request in requests {
        let item = EquipmentLedger::get_for_venue_in(conn, &request.equipment_id, venue_id).await?;
        if let Err(err) = item.stock_level().ensure_available(&item.name, request.quantity) {
            warn!(
                equipment_id = %item.id,
                requested = request.quantity,
                on_hand = item.stock_quantity,
                "Equipment request rejected"
            );
            return Err(err.into());
        }
        let subtotal = PricedLine::new(item.name.as_str(), item.unit_price(), request.quantity)
            .subtotal()?;
        EquipmentLedger::hold_in(conn, &item.id, request.quantity).await?;

        lines.push(BookingEquipmentLine {
            id: Uuid::new_v4().to_string(),
            booking_id: booking_id.to_string(),
            equipment_id: item.id,
            name_snapshot: item.name,
            unit_price: item.unit_price,
            quantity: request.quantity,
            line_subtotal: subtotal.minor(),
            created_at: now,
        });
    }

    Ok(lines)
}

/// Best-effort coach attachment for a venue slot.
///
/// Unknown or unverified coaches and coaches without a matching free slot
/// all yield `None`.
async fn bind_coach(
    conn: &mut SqliteConnection,
    venue_slot: &ScheduleSlot,
    coach_id: &str,
    today: NaiveDate,
) -> BookingResult<Option<CoachBinding>> {
    let coach = match CatalogRepository::coach_in(conn, coach_id).await? {
        Some(coach) if coach.is_verified => coach,
        _ => {
            debug!(coach_id = %coach_id, "Coach unknown or unverified, booking without coach");
            return Ok(None);
        }
    };

    let Some(slot) = SlotRepository::match_coach_slot_in(conn, venue_slot, &coach.id).await? else {
        debug!(
            coach_id = %coach_id,
            date = %venue_slot.slot_date,
            start = %venue_slot.start_time,
            "No matching coach slot, booking without coach"
        );
        return Ok(None);
    };

    SlotRepository::reserve_in(conn, &slot.id, None, today).await?;

    Ok(Some(CoachBinding {
        coach,
        slot_id: slot.id,
    }))
}

/// Works out the coach of an updated booking and moves coach slots.
async fn rebind_coach(
    conn: &mut SqliteConnection,
    booking: &Booking,
    venue_slot: &ScheduleSlot,
    selection: &CoachSelection,
    slot_changed: bool,
    today: NaiveDate,
) -> BookingResult<Option<CoachBinding>> {
    let current = booking.coach_id.as_deref().zip(booking.coach_slot_id.as_deref());

    let target = match selection {
        CoachSelection::Remove => None,
        CoachSelection::Keep => current.map(|(coach_id, _)| coach_id.to_string()),
        CoachSelection::Set(coach_id) => Some(coach_id.clone()),
    };

    // Same coach, same time: nothing moves
    if let (Some((coach_id, slot_id)), Some(target_id)) = (current, target.as_deref()) {
        if coach_id == target_id && !slot_changed {
            let coach = CatalogRepository::coach_in(conn, coach_id)
                .await?
                .ok_or_else(|| DbError::not_found("CoachProfile", coach_id))?;
            return Ok(Some(CoachBinding {
                coach,
                slot_id: slot_id.to_string(),
            }));
        }
    }

    if let Some((_, slot_id)) = current {
        SlotRepository::release_in(conn, slot_id).await?;
    }

    match target {
        Some(coach_id) => bind_coach(conn, venue_slot, &coach_id, today).await,
        None => Ok(None),
    }
}

/// Reads a booking with its slots, lines and transaction.
async fn load_snapshot(
    conn: &mut SqliteConnection,
    booking_id: &str,
) -> Result<BookingSnapshot, DbError> {
    let booking = BookingRepository::require_in(conn, booking_id).await?;
    let venue_slot = SlotRepository::require_in(conn, &booking.venue_slot_id).await?;
    let coach_slot = match &booking.coach_slot_id {
        Some(id) => SlotRepository::get_in(conn, id).await?,
        None => None,
    };
    let equipment = BookingRepository::lines_in(conn, booking_id).await?;
    let transaction = TransactionRepository::require_by_booking_in(conn, booking_id).await?;

    Ok(BookingSnapshot {
        booking,
        venue_slot,
        coach_slot,
        equipment,
        transaction,
    })
}
