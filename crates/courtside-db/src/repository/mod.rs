//! # Repository Module
//!
//! Database repository implementations for Courtside.
//!
//! ## Two Ways In
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Standalone call                 Inside a booking operation             │
//! │  ───────────────                 ──────────────────────────             │
//! │  db.slots().release(id)          let mut tx = pool.begin().await?;     │
//! │       │                          SlotRepository::reserve_in(&mut tx..)  │
//! │       │ acquires a connection    EquipmentLedger::hold_in(&mut tx..)    │
//! │       ▼                          tx.commit().await?;                    │
//! │  SlotRepository::release_in           │                                 │
//! │       │                               │                                 │
//! │       └──────────────┬────────────────┘                                 │
//! │                      ▼                                                  │
//! │                  &mut SqliteConnection                                  │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every `*_in` function takes a `&mut SqliteConnection`, so the lifecycle
//! manager can run several of them inside one transaction. The methods on
//! the repository structs wrap them for standalone use.
//!
//! ## Available Repositories
//!
//! - [`CatalogRepository`](catalog::CatalogRepository) - Venues and coach profiles
//! - [`SlotRepository`](slot::SlotRepository) - Slot store
//! - [`EquipmentLedger`](equipment::EquipmentLedger) - Inventory ledger
//! - [`BookingRepository`](booking::BookingRepository) - Bookings and equipment lines
//! - [`TransactionRepository`](transaction::TransactionRepository) - Payment tracker

pub mod booking;
pub mod catalog;
pub mod equipment;
pub mod slot;
pub mod transaction;
