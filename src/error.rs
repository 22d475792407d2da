//! Core error taxonomy for the availability engine.
//!
//! Business rejections (a full slot, a holiday) are *not* errors: they are
//! normal [`Decision`](crate::scheduler::Decision) return values. The types
//! here cover invariant violations — malformed input and illegal lifecycle
//! transitions — which propagate to the caller and must not be swallowed.

use chrono::NaiveDate;

use crate::api::{BookingId, WindowId};
use crate::models::{BookingStatus, TimeOfDay};

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Invariant-violation errors raised by the engine core.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EngineError {
    /// A time range where the end does not come strictly after the start.
    #[error("invalid time range: start {start} must be strictly before end {end}")]
    InvalidTimeRange { start: TimeOfDay, end: TimeOfDay },

    /// A string that does not parse as an `HH:MM` time of day.
    #[error("invalid time of day '{0}': expected HH:MM between 00:00 and 24:00")]
    InvalidTimeOfDay(String),

    /// Window validation failure (capacity, recurring overlap).
    #[error("invalid window: {0}")]
    InvalidWindow(String),

    /// Date-specific windows for past dates are append-only and cannot be
    /// edited or removed.
    #[error("window {id} targets past date {date}; past entries are locked")]
    PastDateLocked { id: WindowId, date: NaiveDate },

    /// Illegal booking status transition.
    #[error("invalid booking transition: {from} -> {to}")]
    InvalidTransition {
        from: BookingStatus,
        to: BookingStatus,
    },

    /// Booking id not present in the ledger.
    #[error("unknown booking: {0}")]
    UnknownBooking(BookingId),
}
