//! Shared fixtures for the lifecycle integration tests.

#![allow(dead_code)]

use chrono::{Duration, NaiveDate, NaiveTime, Utc};
use courtside_core::{
    CoachProfile, EquipmentItem, EquipmentRequest, NewBooking, PaymentMethod, ScheduleSlot,
    SlotKind, Venue,
};
use courtside_db::{Database, DbConfig};

pub struct Fixture {
    pub db: Database,
    pub venue: Venue,
    pub coach: CoachProfile,
    pub racket: EquipmentItem,
    pub slot_a: ScheduleSlot,
    pub slot_b: ScheduleSlot,
    pub coach_slot_a: ScheduleSlot,
}

pub const OWNER: &str = "owner-1";

pub fn hour(h: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, 0, 0).unwrap()
}

pub fn tomorrow() -> NaiveDate {
    Utc::now().date_naive() + Duration::days(1)
}

/// Venue (rate 100000, Bandung) with a racket (20000, stock 10), two venue
/// slots tomorrow at 18:00 and 19:00, and a verified coach (rate 50000)
/// free at 18:00 only.
pub async fn setup_with(db: Database) -> Fixture {
    let venue = db
        .catalog()
        .insert_venue(OWNER, "Court A", "Bandung", 100_000)
        .await
        .unwrap();
    let coach = db
        .catalog()
        .insert_coach("coach-user-1", "Rina", 50_000, &["Bandung"], true)
        .await
        .unwrap();
    let racket = db
        .equipment()
        .insert(&venue.id, "Racket", 20_000, 10)
        .await
        .unwrap();

    let slots = db.slots();
    let slot_a = slots
        .insert(SlotKind::Venue, &venue.id, tomorrow(), hour(18), hour(19))
        .await
        .unwrap();
    let slot_b = slots
        .insert(SlotKind::Venue, &venue.id, tomorrow(), hour(19), hour(20))
        .await
        .unwrap();
    let coach_slot_a = slots
        .insert(SlotKind::Coach, &coach.id, tomorrow(), hour(18), hour(19))
        .await
        .unwrap();

    Fixture {
        db,
        venue,
        coach,
        racket,
        slot_a,
        slot_b,
        coach_slot_a,
    }
}

pub async fn setup() -> Fixture {
    let db = Database::new(DbConfig::in_memory()).await.unwrap();
    setup_with(db).await
}

pub fn new_booking(fx: &Fixture, slot: &ScheduleSlot) -> NewBooking {
    NewBooking {
        venue_id: fx.venue.id.clone(),
        schedule_id: slot.id.clone(),
        coach_id: None,
        equipment: vec![],
        payment_method: PaymentMethod::Cash,
    }
}

pub fn rackets(fx: &Fixture, quantity: i64) -> Vec<EquipmentRequest> {
    vec![EquipmentRequest::new(fx.racket.id.clone(), quantity)]
}

pub async fn slot_booked(db: &Database, id: &str) -> bool {
    db.slots().get_by_id(id).await.unwrap().unwrap().is_booked
}

pub async fn stock(db: &Database, id: &str) -> EquipmentItem {
    db.equipment().get_by_id(id).await.unwrap().unwrap()
}
