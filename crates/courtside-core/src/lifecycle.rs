//! # Booking Lifecycle Rules
//!
//! Which operations a booking accepts in each payment state.
//!
//! ```text
//!   NONE ──create──► PENDING ──confirm──► CONFIRMED ──refund──► CANCELLED
//!                      │  ▲                   │
//!                update│  │                   └─ update/delete/confirm
//!                      └──┘                      → BookingLocked
//!                      │
//!                delete└──► (rows removed)
//! ```
//!
//! The transactional orchestration lives in `courtside-db`; these checks
//! are pure so the state machine can be tested without a database.

use crate::error::{CoreError, CoreResult};
use crate::types::TransactionStatus;

/// A customer or owner action on an existing booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingAction {
    Update,
    Delete,
    Confirm,
    Refund,
}

impl BookingAction {
    /// The state the booking must be in for this action.
    pub const fn required_status(&self) -> TransactionStatus {
        match self {
            BookingAction::Update | BookingAction::Delete | BookingAction::Confirm => {
                TransactionStatus::Pending
            }
            BookingAction::Refund => TransactionStatus::Confirmed,
        }
    }
}

/// Checks that `action` is legal on a booking in `status`.
///
/// Fails with `BookingLocked` otherwise.
pub fn ensure_transition(
    booking_id: &str,
    status: TransactionStatus,
    action: BookingAction,
) -> CoreResult<()> {
    if status == action.required_status() {
        Ok(())
    } else {
        Err(CoreError::BookingLocked {
            booking_id: booking_id.to_string(),
            status: status.to_string(),
        })
    }
}
