//! HTTP route handlers.
//!
//! Handlers only translate: caller headers and JSON in, lifecycle call,
//! JSON or [`ApiError`](crate::error::ApiError) out.

pub mod bookings;
pub mod coaches;
pub mod health;
pub mod schedules;

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Json, Query};

use crate::error::{ApiError, ApiResult};

/// Unwraps a JSON body, reporting malformed input as a validation error.
pub(crate) fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> ApiResult<T> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| ApiError::validation(rejection.body_text()))
}

/// Unwraps query parameters, reporting malformed input as a validation error.
pub(crate) fn query_params<T>(params: Result<Query<T>, QueryRejection>) -> ApiResult<T> {
    params
        .map(|Query(value)| value)
        .map_err(|rejection| ApiError::validation(rejection.body_text()))
}
