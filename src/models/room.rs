//! Conference room and reservation models

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Conference room from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ConferenceRoom {
    pub id: i32,
    pub room_name: String,
    pub crea_date: Option<DateTime<Utc>>,
}

/// A single 90-minute reservation held by a student.
///
/// Invariants maintained by the repository: `end_time` is `start_time`
/// plus 90 minutes, the interval lies within business hours on `date`,
/// and no two reservations in the same room overlap.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct RoomReservation {
    pub id: i32,
    pub room_id: i32,
    /// Student id number the slot is reserved for
    pub reserved_by: String,
    /// Calendar date the slot falls on
    pub date: NaiveDate,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

/// Student reservation request (slot is auto-allocated)
#[derive(Debug, Deserialize, ToSchema)]
pub struct ReserveRoomRequest {
    /// Requested date (YYYY-MM-DD); must be tomorrow
    pub reservation_date: String,
}

/// Admin reservation request with an exact start time
#[derive(Debug, Deserialize, ToSchema)]
pub struct AdminAddReservation {
    /// Student id number the reservation is for
    pub student_id: String,
    /// Reservation date (YYYY-MM-DD)
    pub reservation_date: String,
    /// Start time (HH:MM)
    pub start_time: String,
}

/// Reservation entry in a room overview
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ReservationSlotView {
    pub reserved_by: String,
    /// Human-readable "Month DD, YYYY, H:MM AM - H:MM PM" label
    pub time_frame: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

/// Per-room status for dashboards
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RoomOverview {
    pub room_id: i32,
    pub room_name: String,
    /// "Available" or "Currently in use by ... until H:MM PM"
    pub current_status: String,
    pub reservations: Vec<ReservationSlotView>,
    /// Start of the earliest free 90-minute slot, when the caller may book
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_available_slot: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_slot_label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_slot_end_label: Option<String>,
}
