//! Error types for the Booking API.
//!
//! Every failure leaves the server as `{ "code": "...", "message": "..." }`.
//!
//! ```text
//! ValidationError / ScheduleUnavailable / InsufficientStock / BookingLocked → 400
//! NotFound (missing or not yours)                                           → 404
//! Storage failures                                                          → 500
//! ```

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use courtside_core::CoreError;
use courtside_db::{BookingError, DbError};

/// Machine-readable error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    ValidationError,
    ScheduleUnavailable,
    InsufficientStock,
    BookingLocked,
    NotFound,
    MissingIdentity,
    InternalError,
}

impl ErrorCode {
    pub fn status(self) -> StatusCode {
        match self {
            ErrorCode::ValidationError
            | ErrorCode::ScheduleUnavailable
            | ErrorCode::InsufficientStock
            | ErrorCode::BookingLocked
            | ErrorCode::MissingIdentity => StatusCode::BAD_REQUEST,
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// What HTTP clients see.
#[derive(Debug, Clone, Serialize, Deserialize, thiserror::Error)]
#[error("{code:?}: {message}")]
pub struct ApiError {
    pub code: ErrorCode,
    pub message: String,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ValidationError, message)
    }

    pub fn internal() -> Self {
        Self::new(ErrorCode::InternalError, "Internal server error")
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        let code = match &err {
            CoreError::ScheduleUnavailable { .. } => ErrorCode::ScheduleUnavailable,
            CoreError::InsufficientStock { .. } => ErrorCode::InsufficientStock,
            CoreError::BookingLocked { .. } => ErrorCode::BookingLocked,
            CoreError::NotFound { .. } => ErrorCode::NotFound,
            CoreError::Validation(_) => ErrorCode::ValidationError,
        };
        ApiError::new(code, err.to_string())
    }
}

impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { .. } => ApiError::new(ErrorCode::NotFound, err.to_string()),
            other => {
                tracing::error!(error = %other, "Storage failure");
                ApiError::internal()
            }
        }
    }
}

impl From<BookingError> for ApiError {
    fn from(err: BookingError) -> Self {
        match err {
            BookingError::Rejected(core) => core.into(),
            BookingError::Storage(db) => db.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.code.status(), Json(self)).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
