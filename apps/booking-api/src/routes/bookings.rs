//! Booking lifecycle endpoints.
//!
//! ```text
//! POST   /bookings               → create (PENDING)
//! PATCH  /bookings/{id}          → update   (PENDING only)
//! DELETE /bookings/{id}          → delete   (PENDING only)
//! POST   /bookings/{id}/confirm  → PENDING → CONFIRMED
//! POST   /bookings/{id}/refund   → CONFIRMED → CANCELLED (venue owner)
//! ```

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;

use courtside_core::{BookingSnapshot, BookingUpdate, NewBooking};

use super::json_body;
use crate::error::ApiResult;
use crate::identity::Caller;
use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/bookings", get(list_bookings).post(create_booking))
        .route(
            "/bookings/{id}",
            get(get_booking).patch(update_booking).delete(delete_booking),
        )
        .route("/bookings/{id}/confirm", post(confirm_payment))
        .route("/bookings/{id}/refund", post(refund_booking))
}

#[derive(Debug, Serialize)]
pub struct Deleted {
    pub id: String,
    pub deleted: bool,
}

async fn list_bookings(
    State(state): State<AppState>,
    Caller(identity): Caller,
) -> ApiResult<Json<Vec<BookingSnapshot>>> {
    let bookings = state
        .db
        .booking_manager()
        .list_customer_bookings(&identity)
        .await?;
    Ok(Json(bookings))
}

async fn create_booking(
    State(state): State<AppState>,
    Caller(identity): Caller,
    payload: Result<Json<NewBooking>, JsonRejection>,
) -> ApiResult<Json<BookingSnapshot>> {
    let request = json_body(payload)?;
    let snapshot = state.db.booking_manager().create(&identity, &request).await?;
    Ok(Json(snapshot))
}

async fn get_booking(
    State(state): State<AppState>,
    Caller(identity): Caller,
    Path(id): Path<String>,
) -> ApiResult<Json<BookingSnapshot>> {
    let snapshot = state
        .db
        .booking_manager()
        .get_booking_snapshot(&identity, &id)
        .await?;
    Ok(Json(snapshot))
}

async fn update_booking(
    State(state): State<AppState>,
    Caller(identity): Caller,
    Path(id): Path<String>,
    payload: Result<Json<BookingUpdate>, JsonRejection>,
) -> ApiResult<Json<BookingSnapshot>> {
    let changes = json_body(payload)?;
    let snapshot = state
        .db
        .booking_manager()
        .update(&identity, &id, &changes)
        .await?;
    Ok(Json(snapshot))
}

async fn delete_booking(
    State(state): State<AppState>,
    Caller(identity): Caller,
    Path(id): Path<String>,
) -> ApiResult<Json<Deleted>> {
    state.db.booking_manager().delete(&identity, &id).await?;
    Ok(Json(Deleted { id, deleted: true }))
}

async fn confirm_payment(
    State(state): State<AppState>,
    Caller(identity): Caller,
    Path(id): Path<String>,
) -> ApiResult<Json<BookingSnapshot>> {
    let snapshot = state
        .db
        .booking_manager()
        .confirm_payment(&identity, &id)
        .await?;
    Ok(Json(snapshot))
}

async fn refund_booking(
    State(state): State<AppState>,
    Caller(identity): Caller,
    Path(id): Path<String>,
) -> ApiResult<Json<BookingSnapshot>> {
    let snapshot = state.db.booking_manager().refund(&identity, &id).await?;
    Ok(Json(snapshot))
}
