//! # Courtside Booking API
//!
//! HTTP surface for the booking core.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Booking API Routes                              │
//! │                                                                         │
//! │  ┌────────────────────┐  ┌────────────────────┐  ┌──────────────────┐  │
//! │  │  schedules         │  │  coaches           │  │  health          │  │
//! │  │                    │  │                    │  │                  │  │
//! │  │ GET /venues/{id}/  │  │ GET /schedules/    │  │ GET /health      │  │
//! │  │     schedules      │  │     {id}/coaches   │  │                  │  │
//! │  └────────────────────┘  └────────────────────┘  └──────────────────┘  │
//! │                                                                         │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  bookings                                                         │  │
//! │  │                                                                   │  │
//! │  │  GET    /bookings              POST /bookings                     │  │
//! │  │  GET    /bookings/{id}         PATCH /bookings/{id}               │  │
//! │  │  DELETE /bookings/{id}                                            │  │
//! │  │  POST   /bookings/{id}/confirm POST /bookings/{id}/refund         │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  Every handler: Caller (headers) → BookingManager → Json | ApiError   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration
//! Environment variables:
//! - `COURTSIDE_HTTP_PORT` - HTTP port (default: 8080)
//! - `COURTSIDE_DB_PATH` - SQLite file (default: ./courtside.db)
//! - `COURTSIDE_DB_MAX_CONNECTIONS` - Pool size (default: 5)
//! - `COURTSIDE_DB_BUSY_TIMEOUT_MS` - Write lock wait (default: 5000)
//! - `RUST_LOG` - Log filter (default: info,courtside=debug,sqlx=warn,tower_http=debug)

pub mod config;
pub mod error;
pub mod identity;
pub mod routes;

use axum::Router;
use tower_http::trace::TraceLayer;

use courtside_db::Database;

// Re-exports
pub use config::ApiConfig;
pub use error::{ApiError, ErrorCode};

/// Shared application state.
#[derive(Debug, Clone)]
pub struct AppState {
    pub db: Database,
}

impl AppState {
    pub fn new(db: Database) -> Self {
        AppState { db }
    }
}

/// Builds the router with every route and the request trace layer.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(routes::health::routes())
        .merge(routes::schedules::routes())
        .merge(routes::coaches::routes())
        .merge(routes::bookings::routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
