//! # Error Types
//!
//! Domain-specific error types for courtside-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  courtside-core errors (this file)                                     │
//! │  ├── CoreError        - Booking rule violations                        │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  courtside-db errors (separate crate)                                  │
//! │  ├── DbError          - Database operation failures                    │
//! │  └── BookingError     - CoreError | DbError from lifecycle operations  │
//! │                                                                         │
//! │  booking-api errors (in app)                                           │
//! │  └── ApiError         - What HTTP clients see (code + message)         │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → BookingError → ApiError → Client  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every variant of [`CoreError`] is local to one operation and reported
//! synchronously. Nothing here is retried by the core.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Booking rule violations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// The requested schedule slot cannot be booked.
    ///
    /// ## When This Occurs
    /// - Slot id doesn't exist or belongs to another venue
    /// - Slot is marked unavailable by the venue owner
    /// - Slot is already held by another booking
    /// - Slot date has already passed
    ///
    /// ## User Workflow
    /// ```text
    /// Pick 18:00 on court A
    ///      │
    ///      ▼
    /// Another customer booked it a moment earlier
    ///      │
    ///      ▼
    /// ScheduleUnavailable { schedule_id }
    ///      │
    ///      ▼
    /// UI re-lists available slots
    /// ```
    #[error("Schedule {schedule_id} is not available")]
    ScheduleUnavailable { schedule_id: String },

    /// Equipment stock cannot cover the requested quantity.
    #[error("Insufficient stock for {equipment}: available {available}, requested {requested}")]
    InsufficientStock {
        equipment: String,
        available: i64,
        requested: i64,
    },

    /// The booking is no longer pending and cannot change.
    #[error("Booking {booking_id} is {status}, cannot perform operation")]
    BookingLocked { booking_id: String, status: String },

    /// Entity doesn't exist, or belongs to a different caller.
    ///
    /// Both cases produce the same error so callers cannot discover
    /// other customers' bookings.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// Creates a ScheduleUnavailable error for a slot id.
    pub fn schedule_unavailable(schedule_id: impl Into<String>) -> Self {
        CoreError::ScheduleUnavailable {
            schedule_id: schedule_id.into(),
        }
    }

    /// Creates a NotFound error for a given entity type and id.
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        CoreError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when caller input doesn't meet requirements.
/// Used for early validation before any slot or stock is touched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., invalid UUID, invalid time range).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },

    /// Duplicate value (e.g., the same equipment twice in one request).
    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
