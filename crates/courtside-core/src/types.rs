//! # Domain Types
//!
//! Core domain types used throughout Courtside.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │  ScheduleSlot   │   │     Booking     │   │   Transaction   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  kind (venue/   │◄──│  venue_slot_id  │◄──│  booking_id     │       │
//! │  │        coach)   │◄──│  coach_slot_id? │   │  status         │       │
//! │  │  date, start,   │   │  total_price    │   │  revenue split  │       │
//! │  │  end, booked    │   └────────┬────────┘   └─────────────────┘       │
//! │  └─────────────────┘            │                                       │
//! │                        ┌────────▼────────┐   ┌─────────────────┐       │
//! │                        │ EquipmentLine   │──►│  EquipmentItem  │       │
//! │                        │ qty, subtotal   │   │  stock/reserved │       │
//! │                        └─────────────────┘   │  /committed     │       │
//! │                                              └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identity
//! Every entity id is a UUID v4 stored as text. Venue and coach slots share
//! one shape; a coach slot is matched to a venue slot by identical
//! date/start/end, never by foreign key.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::{CoreResult, ValidationError};
use crate::inventory::StockLevel;
use crate::money::Money;
use crate::pricing::RevenueSplit;

// =============================================================================
// Identity
// =============================================================================

/// The role an authenticated caller acts in.
///
/// One caller, one role per request. Replaces per-profile boolean flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Customer,
    VenueOwner,
    Coach,
}

impl Default for Role {
    fn default() -> Self {
        Role::Customer
    }
}

impl FromStr for Role {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "customer" => Ok(Role::Customer),
            "venue_owner" => Ok(Role::VenueOwner),
            "coach" => Ok(Role::Coach),
            _ => Err(ValidationError::NotAllowed {
                field: "role".to_string(),
                allowed: vec![
                    "customer".to_string(),
                    "venue_owner".to_string(),
                    "coach".to_string(),
                ],
            }),
        }
    }
}

/// An authenticated caller, supplied by the surrounding identity layer.
///
/// The core trusts it as given.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub user_id: String,
    pub role: Role,
}

impl Identity {
    pub fn new(user_id: impl Into<String>, role: Role) -> Self {
        Identity {
            user_id: user_id.into(),
            role,
        }
    }

    /// Shorthand for a customer identity.
    pub fn customer(user_id: impl Into<String>) -> Self {
        Identity::new(user_id, Role::Customer)
    }

    /// Shorthand for a venue owner identity.
    pub fn venue_owner(user_id: impl Into<String>) -> Self {
        Identity::new(user_id, Role::VenueOwner)
    }

    /// Returns the customer id, or rejects callers acting in another role.
    pub fn require_customer(&self) -> CoreResult<&str> {
        match self.role {
            Role::Customer => Ok(&self.user_id),
            _ => Err(ValidationError::NotAllowed {
                field: "role".to_string(),
                allowed: vec!["customer".to_string()],
            }
            .into()),
        }
    }
}

// =============================================================================
// Catalog (read-only inputs)
// =============================================================================

/// A bookable venue. Its CRUD lifecycle lives outside the booking core.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Venue {
    pub id: String,
    /// User id of the venue owner (used for refunds).
    pub owner_id: String,
    pub name: String,
    /// City the venue is located in; matched against coach service areas.
    pub city: String,
    /// Rate per slot in minor units.
    pub rate: i64,
}

impl Venue {
    #[inline]
    pub fn rate(&self) -> Money {
        Money::from_minor(self.rate)
    }
}

/// A coach offering sessions at venues.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct CoachProfile {
    pub id: String,
    pub user_id: String,
    pub name: String,
    /// Rate per session in minor units.
    pub rate: i64,
    /// Comma-separated list of cities the coach works in.
    pub service_areas: String,
    pub is_verified: bool,
}

impl CoachProfile {
    #[inline]
    pub fn rate(&self) -> Money {
        Money::from_minor(self.rate)
    }

    /// Checks whether the coach works in the given city (case-insensitive).
    pub fn serves(&self, city: &str) -> bool {
        let city = city.trim();
        self.service_areas
            .split(',')
            .map(str::trim)
            .any(|area| !area.is_empty() && area.eq_ignore_ascii_case(city))
    }
}

// =============================================================================
// Schedule Slots
// =============================================================================

/// Whose schedule a slot belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum SlotKind {
    Venue,
    Coach,
}

impl SlotKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            SlotKind::Venue => "venue",
            SlotKind::Coach => "coach",
        }
    }
}

/// A fixed date/time interval on a venue or coach schedule.
///
/// `owner_id` is the venue id for [`SlotKind::Venue`] and the coach id for
/// [`SlotKind::Coach`].
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct ScheduleSlot {
    pub id: String,
    pub kind: SlotKind,
    pub owner_id: String,
    #[ts(as = "String")]
    pub slot_date: NaiveDate,
    #[ts(as = "String")]
    pub start_time: NaiveTime,
    #[ts(as = "String")]
    pub end_time: NaiveTime,
    /// Set by the schedule owner.
    pub is_available: bool,
    /// Set only by the booking lifecycle.
    pub is_booked: bool,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl ScheduleSlot {
    /// True if the slot date is before `today`.
    #[inline]
    pub fn is_past(&self, today: NaiveDate) -> bool {
        self.slot_date < today
    }

    /// True if a new booking could take this slot on `today`.
    pub fn is_bookable(&self, today: NaiveDate) -> bool {
        self.is_available && !self.is_booked && !self.is_past(today)
    }

    /// True if both slots cover exactly the same date and times.
    pub fn same_interval(&self, other: &ScheduleSlot) -> bool {
        self.slot_date == other.slot_date
            && self.start_time == other.start_time
            && self.end_time == other.end_time
    }
}

// =============================================================================
// Equipment
// =============================================================================

/// Rental equipment offered by a venue.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct EquipmentItem {
    pub id: String,
    pub venue_id: String,
    pub name: String,
    /// Rental price per unit in minor units.
    pub unit_price: i64,
    /// Units on hand. Decremented only when a payment is confirmed.
    pub stock_quantity: i64,
    /// Units held by PENDING bookings.
    pub reserved_quantity: i64,
    /// Units deducted by CONFIRMED bookings.
    pub committed_quantity: i64,
}

impl EquipmentItem {
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_minor(self.unit_price)
    }

    /// Returns the counter triple as a [`StockLevel`].
    pub fn stock_level(&self) -> StockLevel {
        StockLevel::new(
            self.stock_quantity,
            self.reserved_quantity,
            self.committed_quantity,
        )
    }
}

/// One equipment line requested by a customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct EquipmentRequest {
    pub equipment_id: String,
    pub quantity: i64,
}

impl EquipmentRequest {
    pub fn new(equipment_id: impl Into<String>, quantity: i64) -> Self {
        EquipmentRequest {
            equipment_id: equipment_id.into(),
            quantity,
        }
    }
}

// =============================================================================
// Transaction Status
// =============================================================================

/// Payment state of a booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionStatus {
    /// Booking created, payment outstanding. Slots and equipment are held.
    Pending,
    /// Payment confirmed, equipment deducted. Immutable to customers.
    Confirmed,
    /// Confirmed booking refunded by the venue owner.
    Cancelled,
}

impl Default for TransactionStatus {
    fn default() -> Self {
        TransactionStatus::Pending
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TransactionStatus::Pending => "PENDING",
            TransactionStatus::Confirmed => "CONFIRMED",
            TransactionStatus::Cancelled => "CANCELLED",
        };
        f.write_str(s)
    }
}

// =============================================================================
// Payment Method
// =============================================================================

/// How the customer intends to pay. Both methods confirm identically.
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    Cash,
    Transfer,
}

impl FromStr for PaymentMethod {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cash" => Ok(PaymentMethod::Cash),
            "transfer" | "bank_transfer" => Ok(PaymentMethod::Transfer),
            _ => Err(ValidationError::NotAllowed {
                field: "payment_method".to_string(),
                allowed: vec!["CASH".to_string(), "TRANSFER".to_string()],
            }),
        }
    }
}

// =============================================================================
// Booking
// =============================================================================

/// A customer's reservation of one venue slot and, optionally, a coach slot.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Booking {
    pub id: String,
    pub customer_id: String,
    pub venue_id: String,
    pub venue_slot_id: String,
    pub coach_id: Option<String>,
    pub coach_slot_id: Option<String>,
    /// Total in minor units, fixed at create/update time.
    pub total_price: i64,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    #[inline]
    pub fn total_price(&self) -> Money {
        Money::from_minor(self.total_price)
    }

    /// True if a coach slot is attached.
    #[inline]
    pub fn has_coach(&self) -> bool {
        self.coach_slot_id.is_some()
    }
}

/// An equipment line on a booking.
/// Uses snapshot pattern to freeze name and unit price at booking time.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct BookingEquipmentLine {
    pub id: String,
    pub booking_id: String,
    pub equipment_id: String,
    /// Equipment name at time of booking (frozen).
    pub name_snapshot: String,
    /// Unit price at time of booking (frozen).
    pub unit_price: i64,
    pub quantity: i64,
    /// unit_price × quantity.
    pub line_subtotal: i64,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl BookingEquipmentLine {
    #[inline]
    pub fn line_subtotal(&self) -> Money {
        Money::from_minor(self.line_subtotal)
    }
}

// =============================================================================
// Transaction
// =============================================================================

/// The payment record attached 1:1 to a booking.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Transaction {
    pub id: String,
    pub booking_id: String,
    pub status: TransactionStatus,
    pub payment_method: PaymentMethod,
    pub revenue_venue: i64,
    pub revenue_coach: i64,
    pub revenue_platform: i64,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "Option<String>")]
    pub confirmed_at: Option<DateTime<Utc>>,
    #[ts(as = "Option<String>")]
    pub cancelled_at: Option<DateTime<Utc>>,
}

impl Transaction {
    /// Returns the stored revenue split.
    pub fn revenue_split(&self) -> RevenueSplit {
        RevenueSplit {
            venue: Money::from_minor(self.revenue_venue),
            coach: Money::from_minor(self.revenue_coach),
            platform: Money::from_minor(self.revenue_platform),
        }
    }
}

// =============================================================================
// Lifecycle Inputs
// =============================================================================

/// Input for creating a booking.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewBooking {
    pub venue_id: String,
    pub schedule_id: String,
    #[serde(default)]
    pub coach_id: Option<String>,
    #[serde(default)]
    pub equipment: Vec<EquipmentRequest>,
    pub payment_method: PaymentMethod,
}

/// What to do with the coach when updating a booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "action", content = "coach_id", rename_all = "snake_case")]
pub enum CoachSelection {
    /// Keep the current coach (re-matched if the venue slot moves).
    Keep,
    /// Drop the coach and release the coach slot.
    Remove,
    /// Switch to the given coach (best-effort match).
    Set(String),
}

impl Default for CoachSelection {
    fn default() -> Self {
        CoachSelection::Keep
    }
}

/// Input for updating a pending booking. `None` fields stay unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct BookingUpdate {
    #[serde(default)]
    pub schedule_id: Option<String>,
    #[serde(default)]
    pub coach: CoachSelection,
    /// Replaces every equipment line when present.
    #[serde(default)]
    pub equipment: Option<Vec<EquipmentRequest>>,
}

// =============================================================================
// Lifecycle Outputs
// =============================================================================

/// Everything needed to render or pre-fill a booking.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct BookingSnapshot {
    pub booking: Booking,
    pub venue_slot: ScheduleSlot,
    pub coach_slot: Option<ScheduleSlot>,
    pub equipment: Vec<BookingEquipmentLine>,
    pub transaction: Transaction,
}

impl BookingSnapshot {
    #[inline]
    pub fn status(&self) -> TransactionStatus {
        self.transaction.status
    }
}

/// A coach who can be attached to a given venue slot.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AvailableCoach {
    pub coach_id: String,
    pub name: String,
    pub rate: i64,
    pub coach_slot_id: String,
}

// =============================================================================
// Unit Tests
// =============================================================================
