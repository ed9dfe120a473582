//! # courtside-db: Database Layer for Courtside
//!
//! SQLite persistence for the booking core, plus the lifecycle manager that
//! runs each booking operation as one database transaction.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Courtside Data Flow                              │
//! │                                                                         │
//! │  booking-api handler (POST /bookings)                                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   courtside-db (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │  ┌────────────────┐   ┌────────────────┐   ┌───────────────┐   │   │
//! │  │  │ BookingManager │──►│  Repositories  │   │  Migrations   │   │   │
//! │  │  │ (lifecycle.rs) │   │ slot, equipment│   │  (embedded)   │   │   │
//! │  │  │                │   │ booking, txn,  │   │ 0001_initial  │   │   │
//! │  │  │ one tx per op  │   │ catalog        │   │               │   │   │
//! │  │  └────────────────┘   └────────────────┘   └───────────────┘   │   │
//! │  │           │                    │                                │   │
//! │  │           └─────────┬──────────┘                                │   │
//! │  │                     ▼                                           │   │
//! │  │            Database (pool.rs) ── SqlitePool                     │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite (WAL) ── ./courtside.db                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database and booking error types
//! - [`repository`] - Slot store, inventory ledger, bookings, transactions, catalog
//! - [`lifecycle`] - Booking lifecycle manager
//!
//! ## Usage
//!
//! ```rust,ignore
//! use courtside_core::{Identity, NewBooking, PaymentMethod};
//! use courtside_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("./courtside.db")).await?;
//!
//! let snapshot = db
//!     .booking_manager()
//!     .create(&Identity::customer(user_id), &NewBooking {
//!         venue_id,
//!         schedule_id,
//!         coach_id: None,
//!         equipment: vec![],
//!         payment_method: PaymentMethod::Cash,
//!     })
//!     .await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod lifecycle;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{BookingError, BookingResult, DbError, DbResult};
pub use lifecycle::BookingManager;
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::booking::BookingRepository;
pub use repository::catalog::CatalogRepository;
pub use repository::equipment::EquipmentLedger;
pub use repository::slot::SlotRepository;
pub use repository::transaction::TransactionRepository;
