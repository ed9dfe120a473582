//! End-to-end booking lifecycle scenarios against an in-memory database.

mod common;

use common::*;
use courtside_core::{
    BookingUpdate, CoachSelection, CoreError, Identity, TransactionStatus, ValidationError,
};
use courtside_db::BookingError;

fn alice() -> Identity {
    Identity::customer("alice")
}

fn bob() -> Identity {
    Identity::customer("bob")
}

fn rejected(result: Result<impl std::fmt::Debug, BookingError>) -> CoreError {
    match result {
        Err(BookingError::Rejected(err)) => err,
        other => panic!("expected a rejection, got {:?}", other),
    }
}

// =============================================================================
// Create
// =============================================================================

#[tokio::test]
async fn create_reserves_slot_and_prices_booking() {
    let fx = setup().await;
    let manager = fx.db.booking_manager();

    let snapshot = manager
        .create(&alice(), &new_booking(&fx, &fx.slot_a))
        .await
        .unwrap();

    assert_eq!(snapshot.booking.total_price, 100_000);
    assert_eq!(snapshot.status(), TransactionStatus::Pending);
    assert_eq!(snapshot.transaction.revenue_venue, 100_000);
    assert_eq!(snapshot.transaction.revenue_coach, 0);
    assert_eq!(snapshot.transaction.revenue_platform, 0);
    assert!(snapshot.coach_slot.is_none());
    assert!(slot_booked(&fx.db, &fx.slot_a.id).await);
}

#[tokio::test]
async fn second_create_on_same_slot_is_unavailable() {
    let fx = setup().await;
    let manager = fx.db.booking_manager();

    manager
        .create(&alice(), &new_booking(&fx, &fx.slot_a))
        .await
        .unwrap();

    let err = rejected(manager.create(&bob(), &new_booking(&fx, &fx.slot_a)).await);
    assert!(matches!(err, CoreError::ScheduleUnavailable { .. }));

    let live = fx.db.bookings().count_live_for_slot(&fx.slot_a.id).await.unwrap();
    assert_eq!(live, 1);
}

#[tokio::test]
async fn create_with_too_much_equipment_persists_nothing() {
    let fx = setup().await;
    let manager = fx.db.booking_manager();

    let mut request = new_booking(&fx, &fx.slot_a);
    request.equipment = rackets(&fx, 100);

    let err = rejected(manager.create(&alice(), &request).await);
    assert!(matches!(
        err,
        CoreError::InsufficientStock {
            available: 10,
            requested: 100,
            ..
        }
    ));

    // Rolled back: slot free, no booking, no hold
    assert!(!slot_booked(&fx.db, &fx.slot_a.id).await);
    assert!(manager.list_customer_bookings(&alice()).await.unwrap().is_empty());
    assert_eq!(stock(&fx.db, &fx.racket.id).await.reserved_quantity, 0);
}

#[tokio::test]
async fn create_with_matched_coach_adds_coach_rate() {
    let fx = setup().await;
    let manager = fx.db.booking_manager();

    let mut request = new_booking(&fx, &fx.slot_a);
    request.coach_id = Some(fx.coach.id.clone());

    let snapshot = manager.create(&alice(), &request).await.unwrap();

    assert_eq!(snapshot.booking.total_price, 150_000);
    assert_eq!(snapshot.booking.coach_id.as_deref(), Some(fx.coach.id.as_str()));
    assert_eq!(
        snapshot.coach_slot.as_ref().map(|s| s.id.as_str()),
        Some(fx.coach_slot_a.id.as_str())
    );
    assert_eq!(snapshot.transaction.revenue_coach, 50_000);
    assert!(slot_booked(&fx.db, &fx.coach_slot_a.id).await);
}

#[tokio::test]
async fn create_without_matching_coach_slot_proceeds_without_coach() {
    let fx = setup().await;
    let manager = fx.db.booking_manager();

    // Coach only has 18:00; slot B is 19:00
    let mut request = new_booking(&fx, &fx.slot_b);
    request.coach_id = Some(fx.coach.id.clone());

    let snapshot = manager.create(&alice(), &request).await.unwrap();
    assert_eq!(snapshot.booking.total_price, 100_000);
    assert!(snapshot.booking.coach_id.is_none());
    assert!(snapshot.coach_slot.is_none());
}

#[tokio::test]
async fn full_booking_total_is_deterministic() {
    let fx = setup().await;
    let manager = fx.db.booking_manager();

    let mut request = new_booking(&fx, &fx.slot_a);
    request.coach_id = Some(fx.coach.id.clone());
    request.equipment = rackets(&fx, 2);

    let snapshot = manager.create(&alice(), &request).await.unwrap();
    assert_eq!(snapshot.booking.total_price, 190_000);
    assert_eq!(snapshot.equipment.len(), 1);
    assert_eq!(snapshot.equipment[0].line_subtotal, 40_000);
    assert_eq!(stock(&fx.db, &fx.racket.id).await.reserved_quantity, 2);
}

#[tokio::test]
async fn create_rejects_slot_of_another_venue() {
    let fx = setup().await;
    let other = fx
        .db
        .catalog()
        .insert_venue("owner-2", "Court B", "Bandung", 80_000)
        .await
        .unwrap();

    let mut request = new_booking(&fx, &fx.slot_a);
    request.venue_id = other.id;

    let err = rejected(fx.db.booking_manager().create(&alice(), &request).await);
    assert!(matches!(err, CoreError::ScheduleUnavailable { .. }));
}

#[tokio::test]
async fn create_rejects_past_slot() {
    let fx = setup().await;
    let yesterday = chrono::Utc::now().date_naive() - chrono::Duration::days(1);
    let past = fx
        .db
        .slots()
        .insert(
            courtside_core::SlotKind::Venue,
            &fx.venue.id,
            yesterday,
            hour(18),
            hour(19),
        )
        .await
        .unwrap();

    let err = rejected(
        fx.db
            .booking_manager()
            .create(&alice(), &new_booking(&fx, &past))
            .await,
    );
    assert!(matches!(err, CoreError::ScheduleUnavailable { .. }));
}

#[tokio::test]
async fn create_rejects_duplicate_equipment_and_non_customers() {
    let fx = setup().await;
    let manager = fx.db.booking_manager();

    let mut request = new_booking(&fx, &fx.slot_a);
    request.equipment = vec![
        courtside_core::EquipmentRequest::new(fx.racket.id.clone(), 1),
        courtside_core::EquipmentRequest::new(fx.racket.id.clone(), 2),
    ];
    let err = rejected(manager.create(&alice(), &request).await);
    assert!(matches!(
        err,
        CoreError::Validation(ValidationError::Duplicate { .. })
    ));

    let err = rejected(
        manager
            .create(&Identity::venue_owner(OWNER), &new_booking(&fx, &fx.slot_a))
            .await,
    );
    assert!(matches!(err, CoreError::Validation(_)));
    assert!(!slot_booked(&fx.db, &fx.slot_a.id).await);
}

#[tokio::test]
async fn overflowing_price_is_rejected_and_rolled_back() {
    let fx = setup().await;
    let manager = fx.db.booking_manager();
    let gold = fx
        .db
        .equipment()
        .insert(&fx.venue.id, "Gold Racket", i64::MAX / 2, 10)
        .await
        .unwrap();

    let mut request = new_booking(&fx, &fx.slot_a);
    request.equipment = vec![courtside_core::EquipmentRequest::new(gold.id.clone(), 3)];

    let err = rejected(manager.create(&alice(), &request).await);
    assert!(matches!(
        err,
        CoreError::Validation(ValidationError::OutOfRange { .. })
    ));
    assert!(!slot_booked(&fx.db, &fx.slot_a.id).await);
    assert!(manager.list_customer_bookings(&alice()).await.unwrap().is_empty());
    assert_eq!(stock(&fx.db, &gold.id).await.reserved_quantity, 0);

    // Lines that fit individually but overflow the total
    let created = manager
        .create(&alice(), &new_booking(&fx, &fx.slot_a))
        .await
        .unwrap();
    let changes = BookingUpdate {
        equipment: Some(vec![
            courtside_core::EquipmentRequest::new(gold.id.clone(), 2),
            courtside_core::EquipmentRequest::new(fx.racket.id.clone(), 1),
        ]),
        ..Default::default()
    };
    let err = rejected(manager.update(&alice(), &created.booking.id, &changes).await);
    assert!(matches!(
        err,
        CoreError::Validation(ValidationError::OutOfRange { .. })
    ));

    let kept = manager
        .get_booking_snapshot(&alice(), &created.booking.id)
        .await
        .unwrap();
    assert_eq!(kept.booking.total_price, 100_000);
    assert!(kept.equipment.is_empty());
    assert_eq!(stock(&fx.db, &gold.id).await.reserved_quantity, 0);
    assert_eq!(stock(&fx.db, &fx.racket.id).await.reserved_quantity, 0);
}

// =============================================================================
// Update
// =============================================================================

#[tokio::test]
async fn update_onto_held_slot_keeps_original() {
    let fx = setup().await;
    let manager = fx.db.booking_manager();

    let mine = manager
        .create(&alice(), &new_booking(&fx, &fx.slot_a))
        .await
        .unwrap();
    manager
        .create(&bob(), &new_booking(&fx, &fx.slot_b))
        .await
        .unwrap();

    let changes = BookingUpdate {
        schedule_id: Some(fx.slot_b.id.clone()),
        ..Default::default()
    };
    let err = rejected(manager.update(&alice(), &mine.booking.id, &changes).await);
    assert!(matches!(err, CoreError::ScheduleUnavailable { .. }));

    let after = manager
        .get_booking_snapshot(&alice(), &mine.booking.id)
        .await
        .unwrap();
    assert_eq!(after.booking.venue_slot_id, fx.slot_a.id);
    assert!(slot_booked(&fx.db, &fx.slot_a.id).await);
}

#[tokio::test]
async fn update_moves_slot_and_rematches_coach() {
    let fx = setup().await;
    let manager = fx.db.booking_manager();

    let mut request = new_booking(&fx, &fx.slot_a);
    request.coach_id = Some(fx.coach.id.clone());
    let created = manager.create(&alice(), &request).await.unwrap();
    assert_eq!(created.booking.total_price, 150_000);

    // Coach has no 19:00 slot, so moving drops the coach
    let changes = BookingUpdate {
        schedule_id: Some(fx.slot_b.id.clone()),
        ..Default::default()
    };
    let moved = manager
        .update(&alice(), &created.booking.id, &changes)
        .await
        .unwrap();

    assert_eq!(moved.booking.venue_slot_id, fx.slot_b.id);
    assert!(moved.booking.coach_id.is_none());
    assert_eq!(moved.booking.total_price, 100_000);
    assert_eq!(moved.transaction.revenue_coach, 0);

    assert!(!slot_booked(&fx.db, &fx.slot_a.id).await);
    assert!(slot_booked(&fx.db, &fx.slot_b.id).await);
    assert!(!slot_booked(&fx.db, &fx.coach_slot_a.id).await);
}

#[tokio::test]
async fn update_sets_and_removes_coach() {
    let fx = setup().await;
    let manager = fx.db.booking_manager();

    let created = manager
        .create(&alice(), &new_booking(&fx, &fx.slot_a))
        .await
        .unwrap();

    let with_coach = manager
        .update(
            &alice(),
            &created.booking.id,
            &BookingUpdate {
                coach: CoachSelection::Set(fx.coach.id.clone()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(with_coach.booking.total_price, 150_000);
    assert_eq!(with_coach.transaction.revenue_coach, 50_000);
    assert!(slot_booked(&fx.db, &fx.coach_slot_a.id).await);

    // Keep leaves the coach untouched
    let kept = manager
        .update(&alice(), &created.booking.id, &BookingUpdate::default())
        .await
        .unwrap();
    assert_eq!(kept.booking.coach_slot_id, with_coach.booking.coach_slot_id);
    assert!(slot_booked(&fx.db, &fx.coach_slot_a.id).await);

    let removed = manager
        .update(
            &alice(),
            &created.booking.id,
            &BookingUpdate {
                coach: CoachSelection::Remove,
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert!(removed.booking.coach_id.is_none());
    assert_eq!(removed.booking.total_price, 100_000);
    assert_eq!(removed.transaction.revenue_coach, 0);
    assert!(!slot_booked(&fx.db, &fx.coach_slot_a.id).await);
}

#[tokio::test]
async fn update_replaces_equipment_and_holds() {
    let fx = setup().await;
    let manager = fx.db.booking_manager();

    let mut request = new_booking(&fx, &fx.slot_a);
    request.equipment = rackets(&fx, 2);
    let created = manager.create(&alice(), &request).await.unwrap();
    assert_eq!(stock(&fx.db, &fx.racket.id).await.reserved_quantity, 2);

    let updated = manager
        .update(
            &alice(),
            &created.booking.id,
            &BookingUpdate {
                equipment: Some(rackets(&fx, 5)),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.equipment.len(), 1);
    assert_eq!(updated.equipment[0].quantity, 5);
    assert_eq!(updated.booking.total_price, 200_000);
    assert_eq!(stock(&fx.db, &fx.racket.id).await.reserved_quantity, 5);

    let cleared = manager
        .update(
            &alice(),
            &created.booking.id,
            &BookingUpdate {
                equipment: Some(vec![]),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert!(cleared.equipment.is_empty());
    assert_eq!(cleared.booking.total_price, 100_000);
    assert_eq!(stock(&fx.db, &fx.racket.id).await.reserved_quantity, 0);
}

// =============================================================================
// Delete
// =============================================================================

#[tokio::test]
async fn delete_releases_everything() {
    let fx = setup().await;
    let manager = fx.db.booking_manager();

    let mut request = new_booking(&fx, &fx.slot_a);
    request.coach_id = Some(fx.coach.id.clone());
    request.equipment = rackets(&fx, 3);
    let created = manager.create(&alice(), &request).await.unwrap();

    manager.delete(&alice(), &created.booking.id).await.unwrap();

    assert!(!slot_booked(&fx.db, &fx.slot_a.id).await);
    assert!(!slot_booked(&fx.db, &fx.coach_slot_a.id).await);
    let racket = stock(&fx.db, &fx.racket.id).await;
    assert_eq!(racket.reserved_quantity, 0);
    assert_eq!(racket.stock_quantity, 10);

    let err = rejected(
        manager
            .get_booking_snapshot(&alice(), &created.booking.id)
            .await,
    );
    assert!(matches!(err, CoreError::NotFound { .. }));
    assert!(fx
        .db
        .transactions()
        .get_by_booking(&created.booking.id)
        .await
        .unwrap()
        .is_none());

    // Slot can be booked again
    manager
        .create(&bob(), &new_booking(&fx, &fx.slot_a))
        .await
        .unwrap();
}

// =============================================================================
// Confirm
// =============================================================================

#[tokio::test]
async fn confirm_deducts_stock_then_locks() {
    let fx = setup().await;
    let manager = fx.db.booking_manager();

    let mut request = new_booking(&fx, &fx.slot_a);
    request.equipment = rackets(&fx, 3);
    let created = manager.create(&alice(), &request).await.unwrap();

    let confirmed = manager
        .confirm_payment(&alice(), &created.booking.id)
        .await
        .unwrap();
    assert_eq!(confirmed.status(), TransactionStatus::Confirmed);
    assert!(confirmed.transaction.confirmed_at.is_some());

    let racket = stock(&fx.db, &fx.racket.id).await;
    assert_eq!(racket.stock_quantity, 7);
    assert_eq!(racket.reserved_quantity, 0);
    assert_eq!(racket.committed_quantity, 3);

    let err = rejected(manager.confirm_payment(&alice(), &created.booking.id).await);
    assert!(matches!(err, CoreError::BookingLocked { .. }));
    assert_eq!(stock(&fx.db, &fx.racket.id).await.stock_quantity, 7);
}

#[tokio::test]
async fn confirmed_booking_is_immutable() {
    let fx = setup().await;
    let manager = fx.db.booking_manager();

    let created = manager
        .create(&alice(), &new_booking(&fx, &fx.slot_a))
        .await
        .unwrap();
    manager
        .confirm_payment(&alice(), &created.booking.id)
        .await
        .unwrap();

    let changes = BookingUpdate {
        schedule_id: Some(fx.slot_b.id.clone()),
        ..Default::default()
    };
    let err = rejected(manager.update(&alice(), &created.booking.id, &changes).await);
    assert!(matches!(err, CoreError::BookingLocked { .. }));

    let err = rejected(manager.delete(&alice(), &created.booking.id).await);
    assert!(matches!(err, CoreError::BookingLocked { .. }));

    // Nothing moved
    assert!(slot_booked(&fx.db, &fx.slot_a.id).await);
    assert!(!slot_booked(&fx.db, &fx.slot_b.id).await);
}

#[tokio::test]
async fn confirm_rechecks_stock_and_rolls_back() {
    let fx = setup().await;
    let manager = fx.db.booking_manager();

    // Two pending holds of 8 against stock 10 are both accepted
    let mut first = new_booking(&fx, &fx.slot_a);
    first.equipment = rackets(&fx, 8);
    let first = manager.create(&alice(), &first).await.unwrap();

    let mut second = new_booking(&fx, &fx.slot_b);
    second.equipment = rackets(&fx, 8);
    let second = manager.create(&bob(), &second).await.unwrap();

    manager
        .confirm_payment(&alice(), &first.booking.id)
        .await
        .unwrap();

    let err = rejected(manager.confirm_payment(&bob(), &second.booking.id).await);
    assert!(matches!(
        err,
        CoreError::InsufficientStock {
            available: 2,
            requested: 8,
            ..
        }
    ));

    let still_pending = manager
        .get_booking_snapshot(&bob(), &second.booking.id)
        .await
        .unwrap();
    assert_eq!(still_pending.status(), TransactionStatus::Pending);

    let racket = stock(&fx.db, &fx.racket.id).await;
    assert_eq!(racket.stock_quantity, 2);
    assert_eq!(racket.committed_quantity, 8);
    assert_eq!(racket.reserved_quantity, 8);
}

// =============================================================================
// Refund
// =============================================================================

#[tokio::test]
async fn refund_restores_stock_and_frees_slots() {
    let fx = setup().await;
    let manager = fx.db.booking_manager();

    let mut request = new_booking(&fx, &fx.slot_a);
    request.coach_id = Some(fx.coach.id.clone());
    request.equipment = rackets(&fx, 3);
    let created = manager.create(&alice(), &request).await.unwrap();
    manager
        .confirm_payment(&alice(), &created.booking.id)
        .await
        .unwrap();

    // Customers and other owners cannot refund
    let err = rejected(manager.refund(&alice(), &created.booking.id).await);
    assert!(matches!(err, CoreError::NotFound { .. }));
    let err = rejected(
        manager
            .refund(&Identity::venue_owner("owner-2"), &created.booking.id)
            .await,
    );
    assert!(matches!(err, CoreError::NotFound { .. }));

    let refunded = manager
        .refund(&Identity::venue_owner(OWNER), &created.booking.id)
        .await
        .unwrap();
    assert_eq!(refunded.status(), TransactionStatus::Cancelled);
    assert!(refunded.transaction.cancelled_at.is_some());

    let racket = stock(&fx.db, &fx.racket.id).await;
    assert_eq!(racket.stock_quantity, 10);
    assert_eq!(racket.committed_quantity, 0);
    assert!(!slot_booked(&fx.db, &fx.slot_a.id).await);
    assert!(!slot_booked(&fx.db, &fx.coach_slot_a.id).await);

    // Second refund is locked; the slot is bookable again
    let err = rejected(
        manager
            .refund(&Identity::venue_owner(OWNER), &created.booking.id)
            .await,
    );
    assert!(matches!(err, CoreError::BookingLocked { .. }));

    manager
        .create(&bob(), &new_booking(&fx, &fx.slot_a))
        .await
        .unwrap();
    assert_eq!(
        fx.db.bookings().count_live_for_slot(&fx.slot_a.id).await.unwrap(),
        1
    );
}

#[tokio::test]
async fn refunded_booking_keeps_its_slots_from_being_deleted() {
    let fx = setup().await;
    let manager = fx.db.booking_manager();

    let mut request = new_booking(&fx, &fx.slot_a);
    request.coach_id = Some(fx.coach.id.clone());
    let created = manager.create(&alice(), &request).await.unwrap();
    manager
        .confirm_payment(&alice(), &created.booking.id)
        .await
        .unwrap();
    manager
        .refund(&Identity::venue_owner(OWNER), &created.booking.id)
        .await
        .unwrap();

    // Released, but the cancelled booking still points at both slots
    assert!(!slot_booked(&fx.db, &fx.slot_a.id).await);
    for slot_id in [&fx.slot_a.id, &fx.coach_slot_a.id] {
        let err = rejected(fx.db.slots().delete(slot_id).await);
        assert!(matches!(err, CoreError::ScheduleUnavailable { .. }));
        assert!(fx.db.slots().get_by_id(slot_id).await.unwrap().is_some());
    }

    // Unreferenced slots still delete
    fx.db.slots().delete(&fx.slot_b.id).await.unwrap();
}

#[tokio::test]
async fn stock_is_conserved_across_confirm_and_refund() {
    let fx = setup().await;
    let manager = fx.db.booking_manager();
    let owner = Identity::venue_owner(OWNER);

    let mut a = new_booking(&fx, &fx.slot_a);
    a.equipment = rackets(&fx, 4);
    let a = manager.create(&alice(), &a).await.unwrap();

    let mut b = new_booking(&fx, &fx.slot_b);
    b.equipment = rackets(&fx, 3);
    let b = manager.create(&bob(), &b).await.unwrap();

    manager.confirm_payment(&alice(), &a.booking.id).await.unwrap();
    manager.confirm_payment(&bob(), &b.booking.id).await.unwrap();
    manager.refund(&owner, &a.booking.id).await.unwrap();

    // initial 10 - still-committed 3
    let racket = stock(&fx.db, &fx.racket.id).await;
    assert_eq!(racket.stock_quantity, 7);
    assert_eq!(racket.committed_quantity, 3);
    assert_eq!(racket.stock_level().original_stock(), 10);
}

// =============================================================================
// Ownership & reads
// =============================================================================

#[tokio::test]
async fn other_customers_see_not_found() {
    let fx = setup().await;
    let manager = fx.db.booking_manager();

    let created = manager
        .create(&alice(), &new_booking(&fx, &fx.slot_a))
        .await
        .unwrap();
    let id = &created.booking.id;

    let err = rejected(manager.get_booking_snapshot(&bob(), id).await);
    assert!(matches!(err, CoreError::NotFound { .. }));
    let err = rejected(manager.update(&bob(), id, &BookingUpdate::default()).await);
    assert!(matches!(err, CoreError::NotFound { .. }));
    let err = rejected(manager.delete(&bob(), id).await);
    assert!(matches!(err, CoreError::NotFound { .. }));
    let err = rejected(manager.confirm_payment(&bob(), id).await);
    assert!(matches!(err, CoreError::NotFound { .. }));

    // Same answer as a booking that doesn't exist at all
    let missing = rejected(manager.get_booking_snapshot(&bob(), "no-such-booking").await);
    assert_eq!(
        std::mem::discriminant(&err),
        std::mem::discriminant(&missing)
    );
}

#[tokio::test]
async fn list_available_coaches_filters_city_verification_and_time() {
    let fx = setup().await;
    let catalog = fx.db.catalog();
    let slots = fx.db.slots();

    // Same time, wrong city
    let far = catalog
        .insert_coach("coach-user-2", "Agus", 75_000, &["Jakarta"], true)
        .await
        .unwrap();
    slots
        .insert(courtside_core::SlotKind::Coach, &far.id, tomorrow(), hour(18), hour(19))
        .await
        .unwrap();

    // Right city, unverified
    let unverified = catalog
        .insert_coach("coach-user-3", "Budi", 40_000, &["Bandung"], false)
        .await
        .unwrap();
    slots
        .insert(
            courtside_core::SlotKind::Coach,
            &unverified.id,
            tomorrow(),
            hour(18),
            hour(19),
        )
        .await
        .unwrap();

    let manager = fx.db.booking_manager();
    let coaches = manager
        .list_available_coaches_for_slot(&fx.slot_a.id)
        .await
        .unwrap();
    assert_eq!(coaches.len(), 1);
    assert_eq!(coaches[0].coach_id, fx.coach.id);
    assert_eq!(coaches[0].rate, 50_000);
    assert_eq!(coaches[0].coach_slot_id, fx.coach_slot_a.id);

    // Nobody at 19:00
    assert!(manager
        .list_available_coaches_for_slot(&fx.slot_b.id)
        .await
        .unwrap()
        .is_empty());

    let err = rejected(manager.list_available_coaches_for_slot("missing").await);
    assert!(matches!(err, CoreError::NotFound { .. }));
}

#[tokio::test]
async fn list_customer_bookings_is_scoped() {
    let fx = setup().await;
    let manager = fx.db.booking_manager();

    manager
        .create(&alice(), &new_booking(&fx, &fx.slot_a))
        .await
        .unwrap();
    manager
        .create(&bob(), &new_booking(&fx, &fx.slot_b))
        .await
        .unwrap();

    let mine = manager.list_customer_bookings(&alice()).await.unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].booking.customer_id, "alice");
}

#[tokio::test]
async fn revenue_reporting_reads_confirmed_only() {
    let fx = setup().await;
    let manager = fx.db.booking_manager();

    let mut with_coach = new_booking(&fx, &fx.slot_a);
    with_coach.coach_id = Some(fx.coach.id.clone());
    let paid = manager.create(&alice(), &with_coach).await.unwrap();
    manager
        .create(&bob(), &new_booking(&fx, &fx.slot_b))
        .await
        .unwrap();
    manager.confirm_payment(&alice(), &paid.booking.id).await.unwrap();

    let transactions = fx.db.transactions();
    let venue_rows = transactions
        .list_confirmed_for_venue(&fx.venue.id)
        .await
        .unwrap();
    assert_eq!(venue_rows.len(), 1);
    assert_eq!(venue_rows[0].revenue_split().venue.minor(), 100_000);

    let coach_rows = transactions
        .list_confirmed_for_coach(&fx.coach.id)
        .await
        .unwrap();
    assert_eq!(coach_rows.len(), 1);
    assert_eq!(coach_rows[0].revenue_coach, 50_000);
}
