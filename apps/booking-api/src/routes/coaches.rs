//! Coaches available for a venue slot.

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};

use courtside_core::AvailableCoach;

use crate::error::ApiResult;
use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/schedules/{schedule_id}/coaches", get(list_coaches))
}

async fn list_coaches(
    State(state): State<AppState>,
    Path(schedule_id): Path<String>,
) -> ApiResult<Json<Vec<AvailableCoach>>> {
    let coaches = state
        .db
        .booking_manager()
        .list_available_coaches_for_slot(&schedule_id)
        .await?;

    Ok(Json(coaches))
}
