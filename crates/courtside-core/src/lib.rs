//! # courtside-core: Pure Booking Logic for Courtside
//!
//! This crate holds every rule of the booking core that can be expressed
//! without touching storage: money arithmetic, price computation, equipment
//! stock counters, the booking state machine, and input validation.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Courtside Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    booking-api (axum)                           │   │
//! │  │   POST /bookings ──► PATCH ──► POST /confirm ──► DELETE         │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               courtside-db (BookingManager)                     │   │
//! │  │        one SQLite transaction per booking operation             │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ calls into                             │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │            ★ courtside-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │  ┌─────────┐ ┌─────────┐ ┌───────────┐ ┌──────────┐ ┌────────┐ │   │
//! │  │  │  types  │ │ pricing │ │ inventory │ │lifecycle │ │validate│ │   │
//! │  │  └─────────┘ └─────────┘ └───────────┘ └──────────┘ └────────┘ │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (slots, equipment, bookings, transactions, identity)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`pricing`] - Total price and revenue split computation
//! - [`inventory`] - Two-phase equipment stock counters
//! - [`lifecycle`] - Transaction status transitions
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation
//!
//! ## Example Usage
//!
//! ```rust
//! use courtside_core::money::Money;
//! use courtside_core::pricing::{compute_total, PricedLine};
//!
//! let lines = [PricedLine::new("racket", Money::from_minor(20_000), 2)];
//! let total = compute_total(
//!     Money::from_minor(100_000),
//!     Some(Money::from_minor(50_000)),
//!     &lines,
//! )
//! .unwrap();
//! assert_eq!(total.minor(), 190_000);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod inventory;
pub mod lifecycle;
pub mod money;
pub mod pricing;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use inventory::StockLevel;
pub use money::Money;
pub use pricing::{PriceQuote, PricedLine, RevenueSplit};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum quantity of a single equipment item on one booking.
///
/// ## Business Reason
/// Prevents accidental over-ordering (e.g., typing 1000 instead of 10).
pub const MAX_EQUIPMENT_QUANTITY: i64 = 999;

/// Maximum number of distinct equipment lines on one booking.
pub const MAX_EQUIPMENT_LINES: usize = 20;

/// Default look-ahead window, in days, for available-slot queries.
pub const DEFAULT_SLOT_WINDOW_DAYS: i64 = 14;
