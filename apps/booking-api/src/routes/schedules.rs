//! Available venue slots.

use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    routing::get,
    Json, Router,
};
use chrono::{Duration, NaiveDate, Utc};
use serde::Deserialize;

use courtside_core::{CoreError, ScheduleSlot, SlotKind, DEFAULT_SLOT_WINDOW_DAYS};

use super::query_params;
use crate::error::{ApiError, ApiResult};
use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/venues/{venue_id}/schedules", get(list_schedules))
}

/// `?from=YYYY-MM-DD&to=YYYY-MM-DD`, both optional.
#[derive(Debug, Default, Deserialize)]
pub struct ScheduleWindow {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl ScheduleWindow {
    /// Fills in today and today + the default window.
    fn resolve(&self, today: NaiveDate) -> ApiResult<(NaiveDate, NaiveDate)> {
        let from = self.from.unwrap_or(today);
        let to = self
            .to
            .unwrap_or_else(|| from + Duration::days(DEFAULT_SLOT_WINDOW_DAYS));

        if to < from {
            return Err(ApiError::validation("to must not be before from"));
        }
        Ok((from, to))
    }
}

/// Free, bookable slots of one venue, ordered by date and start time.
async fn list_schedules(
    State(state): State<AppState>,
    Path(venue_id): Path<String>,
    window: Result<Query<ScheduleWindow>, QueryRejection>,
) -> ApiResult<Json<Vec<ScheduleSlot>>> {
    let (from, to) = query_params(window)?.resolve(Utc::now().date_naive())?;

    if state.db.catalog().venue(&venue_id).await?.is_none() {
        return Err(CoreError::not_found("Venue", &venue_id).into());
    }

    let slots = state
        .db
        .slots()
        .find_available(SlotKind::Venue, &venue_id, from, to)
        .await?;

    Ok(Json(slots))
}
