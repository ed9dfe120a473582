//! # Validation Module
//!
//! Input validation for booking requests and schedule management.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: HTTP extractors (booking-api)                                │
//! │  └── Type validation (JSON deserialization, headers)                   │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  └── Quantities, rates, ids, time ranges, duplicate lines              │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── CHECK constraints (stock never negative)                          │
//! │  ├── UNIQUE constraints (one booking per slot)                         │
//! │  └── Foreign key constraints                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use courtside_core::validation::{validate_quantity, validate_rate};
//!
//! assert!(validate_quantity(3).is_ok());
//! assert!(validate_quantity(0).is_err());
//! assert!(validate_rate("rate", 100_000).is_ok());
//! ```

use chrono::NaiveTime;
use std::collections::HashSet;

use crate::error::ValidationError;
use crate::types::EquipmentRequest;
use crate::{MAX_EQUIPMENT_LINES, MAX_EQUIPMENT_QUANTITY};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates an entity id (UUID text).
///
/// ## Example
/// ```rust
/// use courtside_core::validation::validate_id;
///
/// assert!(validate_id("booking_id", "6f1c2a9e-8d4b-4f7a-9c1e-2b3d4e5f6a7b").is_ok());
/// assert!(validate_id("booking_id", "").is_err());
/// assert!(validate_id("booking_id", "not-a-uuid").is_err());
/// ```
pub fn validate_id(field: &str, id: &str) -> ValidationResult<()> {
    let id = id.trim();

    if id.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    uuid::Uuid::parse_str(id).map_err(|_| ValidationError::InvalidFormat {
        field: field.to_string(),
        reason: "must be a valid UUID".to_string(),
    })?;

    Ok(())
}

/// Validates a display name (venue, coach, equipment).
///
/// ## Rules
/// - Must not be empty
/// - At most 200 characters
pub fn validate_name(field: &str, name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if name.len() > 200 {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: 200,
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates an equipment quantity.
///
/// ## Rules
/// - Must be at least 1
/// - Must not exceed MAX_EQUIPMENT_QUANTITY (999)
pub fn validate_quantity(quantity: i64) -> ValidationResult<()> {
    if quantity <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if quantity > MAX_EQUIPMENT_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_EQUIPMENT_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a rate or unit price in minor units. Zero is allowed.
pub fn validate_rate(field: &str, amount: i64) -> ValidationResult<()> {
    if amount < 0 {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: i64::MAX,
        });
    }
    Ok(())
}

/// Validates a stock count.
pub fn validate_stock(stock: i64) -> ValidationResult<()> {
    validate_rate("stock_quantity", stock)
}

// =============================================================================
// Schedule Validators
// =============================================================================

/// Validates a slot's time range.
///
/// ## Rules
/// - `end` must be strictly after `start` (no overnight slots)
pub fn validate_slot_times(start: NaiveTime, end: NaiveTime) -> ValidationResult<()> {
    if end <= start {
        return Err(ValidationError::InvalidFormat {
            field: "end_time".to_string(),
            reason: "must be after start_time".to_string(),
        });
    }
    Ok(())
}

// =============================================================================
// Request Validators
// =============================================================================

/// Validates the equipment lines of a create/update request.
///
/// ## Rules
/// - At most MAX_EQUIPMENT_LINES lines
/// - Every equipment id present, every quantity valid
/// - One line per distinct equipment item
///
/// ## Example
/// ```rust
/// use courtside_core::types::EquipmentRequest;
/// use courtside_core::validation::validate_equipment_requests;
///
/// let lines = vec![EquipmentRequest::new("racket", 2), EquipmentRequest::new("racket", 1)];
/// assert!(validate_equipment_requests(&lines).is_err());
/// ```
pub fn validate_equipment_requests(requests: &[EquipmentRequest]) -> ValidationResult<()> {
    if requests.len() > MAX_EQUIPMENT_LINES {
        return Err(ValidationError::OutOfRange {
            field: "equipment".to_string(),
            min: 0,
            max: MAX_EQUIPMENT_LINES as i64,
        });
    }

    let mut seen = HashSet::with_capacity(requests.len());
    for request in requests {
        if request.equipment_id.trim().is_empty() {
            return Err(ValidationError::Required {
                field: "equipment_id".to_string(),
            });
        }
        validate_quantity(request.quantity)?;

        if !seen.insert(request.equipment_id.as_str()) {
            return Err(ValidationError::Duplicate {
                field: "equipment_id".to_string(),
                value: request.equipment_id.clone(),
            });
        }
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
