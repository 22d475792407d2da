//! Booking value type and status lifecycle.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::api::BookingId;
use crate::error::{EngineError, EngineResult};
use crate::models::TimeRange;

/// Booking lifecycle status.
///
/// Only `Pending` and `Confirmed` bookings count against capacity;
/// `Cancelled` bookings are retained for history and excluded from
/// conflict checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
}

impl BookingStatus {
    /// Whether this status counts against window capacity.
    pub fn is_active(&self) -> bool {
        matches!(self, BookingStatus::Pending | BookingStatus::Confirmed)
    }

    /// Legal transitions: Pending -> Confirmed, Pending -> Cancelled,
    /// Confirmed -> Cancelled. Everything else is invalid.
    pub fn can_transition_to(&self, next: BookingStatus) -> bool {
        matches!(
            (self, next),
            (BookingStatus::Pending, BookingStatus::Confirmed)
                | (BookingStatus::Pending, BookingStatus::Cancelled)
                | (BookingStatus::Confirmed, BookingStatus::Cancelled)
        )
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Cancelled => "cancelled",
        };
        write!(f, "{}", s)
    }
}

/// A booking held by the ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    pub id: BookingId,
    pub date: NaiveDate,
    pub range: TimeRange,
    pub service_tag: String,
    pub status: BookingStatus,
}

impl Booking {
    /// Create a new pending booking. The `end > start` invariant is carried
    /// by [`TimeRange`].
    pub fn pending(date: NaiveDate, range: TimeRange, service_tag: impl Into<String>) -> Self {
        Self {
            id: BookingId::new(),
            date,
            range,
            service_tag: service_tag.into(),
            status: BookingStatus::Pending,
        }
    }

    /// Apply a status transition, enforcing the lifecycle table.
    pub fn transition(&mut self, next: BookingStatus) -> EngineResult<()> {
        if !self.status.can_transition_to(next) {
            return Err(EngineError::InvalidTransition {
                from: self.status,
                to: next,
            });
        }
        self.status = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn booking() -> Booking {
        Booking::pending(
            NaiveDate::from_ymd_opt(2025, 6, 2).unwrap(),
            TimeRange::parse("10:00", "11:00").unwrap(),
            "haircut",
        )
    }

    #[test]
    fn test_new_booking_is_pending_and_active() {
        let b = booking();
        assert_eq!(b.status, BookingStatus::Pending);
        assert!(b.status.is_active());
    }

    #[test]
    fn test_pending_to_confirmed() {
        let mut b = booking();
        b.transition(BookingStatus::Confirmed).unwrap();
        assert_eq!(b.status, BookingStatus::Confirmed);
    }

    #[test]
    fn test_pending_to_cancelled() {
        let mut b = booking();
        b.transition(BookingStatus::Cancelled).unwrap();
        assert!(!b.status.is_active());
    }

    #[test]
    fn test_confirmed_to_cancelled() {
        let mut b = booking();
        b.transition(BookingStatus::Confirmed).unwrap();
        b.transition(BookingStatus::Cancelled).unwrap();
        assert_eq!(b.status, BookingStatus::Cancelled);
    }

    #[test]
    fn test_cancelled_is_terminal() {
        let mut b = booking();
        b.transition(BookingStatus::Cancelled).unwrap();
        for next in [
            BookingStatus::Pending,
            BookingStatus::Confirmed,
            BookingStatus::Cancelled,
        ] {
            let result = b.transition(next);
            assert!(matches!(
                result,
                Err(EngineError::InvalidTransition { .. })
            ));
        }
    }

    #[test]
    fn test_confirmed_cannot_revert_to_pending() {
        let mut b = booking();
        b.transition(BookingStatus::Confirmed).unwrap();
        assert!(b.transition(BookingStatus::Pending).is_err());
        // The failed transition must not corrupt the status.
        assert_eq!(b.status, BookingStatus::Confirmed);
    }
}
