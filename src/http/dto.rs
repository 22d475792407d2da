//! Request/response DTOs for the HTTP API.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::api::{BookingId, WindowId};
use crate::models::{
    AvailabilityWindow, Booking, BookingStatus, DayStatus, TimeOfDay, WindowScope,
};
use crate::scheduler::RejectReason;
use crate::store::EffectiveWindow;

/// GET /health response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub database: String,
}

/// POST bookings request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookSlotRequest {
    pub date: NaiveDate,
    pub start: TimeOfDay,
    pub end: TimeOfDay,
    pub service_tag: String,
}

/// POST bookings response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookSlotResponse {
    pub admitted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub booking_id: Option<BookingId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub window_id: Option<WindowId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<RejectReason>,
}

/// One cell of the month calendar grid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayCell {
    pub date: NaiveDate,
    pub status: DayStatus,
}

/// GET month calendar response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthCalendarResponse {
    pub year: i32,
    pub month: u32,
    /// Sunday-first grid; `null` cells are padding.
    pub cells: Vec<Option<DayCell>>,
}

/// GET day detail query parameters.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DayDetailQuery {
    #[serde(default)]
    pub include_cancelled: bool,
}

/// GET day detail response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayDetailResponse {
    pub date: NaiveDate,
    pub status: DayStatus,
    pub windows: Vec<EffectiveWindow>,
    pub bookings: Vec<Booking>,
}

/// PUT window request body. Capacity and buffer fall back to the policy
/// defaults; omitting the id creates a new window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpsertWindowRequest {
    #[serde(default)]
    pub id: Option<WindowId>,
    pub scope: WindowScope,
    pub start: TimeOfDay,
    pub end: TimeOfDay,
    #[serde(default)]
    pub max_concurrent_bookings: Option<u32>,
    #[serde(default)]
    pub buffer_minutes: Option<u16>,
    #[serde(default)]
    pub eligible_service_tags: Vec<String>,
}

/// PUT window response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpsertWindowResponse {
    pub window: AvailabilityWindow,
}

/// GET windows response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowListResponse {
    pub windows: Vec<AvailabilityWindow>,
    pub total: usize,
}

/// PUT holidays request body; replaces the full set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplaceHolidaysRequest {
    pub dates: Vec<NaiveDate>,
}

/// POST booking transition request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransitionBookingRequest {
    pub status: BookingStatus,
}
