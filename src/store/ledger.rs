//! Booking ledger: accepted bookings keyed by date.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::api::BookingId;
use crate::error::{EngineError, EngineResult};
use crate::models::{Booking, BookingStatus};

/// Holds the provider's bookings, keyed by date.
///
/// The ledger has no dependency on the availability store; the scheduler
/// joins the two. Appending after an admission decision is the caller's
/// responsibility and must share an exclusive scope with the `can_book`
/// call (see the calendar aggregate).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BookingLedger {
    by_date: BTreeMap<NaiveDate, Vec<Booking>>,
}

impl BookingLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Active (Pending or Confirmed) bookings on a date, in insertion
    /// order. Cancelled bookings are excluded from all conflict math.
    pub fn bookings_on(&self, date: NaiveDate) -> Vec<&Booking> {
        self.by_date
            .get(&date)
            .map(|bookings| bookings.iter().filter(|b| b.status.is_active()).collect())
            .unwrap_or_default()
    }

    /// All bookings on a date including cancelled ones, for audit views.
    pub fn bookings_on_including_cancelled(&self, date: NaiveDate) -> Vec<&Booking> {
        self.by_date
            .get(&date)
            .map(|bookings| bookings.iter().collect())
            .unwrap_or_default()
    }

    /// Bookings in a date range (inclusive), active only.
    pub fn bookings_between(&self, from: NaiveDate, to: NaiveDate) -> Vec<&Booking> {
        self.by_date
            .range(from..=to)
            .flat_map(|(_, bookings)| bookings.iter())
            .filter(|b| b.status.is_active())
            .collect()
    }

    /// Append a booking. The ledger does not re-run admission checks;
    /// callers go through the calendar aggregate for that.
    pub fn append(&mut self, booking: Booking) -> BookingId {
        let id = booking.id;
        log::debug!(
            "booking {} appended on {} ({} {})",
            id,
            booking.date,
            booking.range,
            booking.status
        );
        self.by_date.entry(booking.date).or_default().push(booking);
        id
    }

    pub fn booking(&self, id: BookingId) -> Option<&Booking> {
        self.by_date.values().flatten().find(|b| b.id == id)
    }

    /// Apply a status transition to a stored booking.
    pub fn transition(&mut self, id: BookingId, next: BookingStatus) -> EngineResult<()> {
        let booking = self
            .by_date
            .values_mut()
            .flatten()
            .find(|b| b.id == id)
            .ok_or(EngineError::UnknownBooking(id))?;
        booking.transition(next)?;
        log::debug!("booking {} transitioned to {}", id, next);
        Ok(())
    }

    /// Total number of stored bookings, cancelled included.
    pub fn len(&self) -> usize {
        self.by_date.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TimeRange;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 2).unwrap()
    }

    fn booking(start: &str, end: &str) -> Booking {
        Booking::pending(date(), TimeRange::parse(start, end).unwrap(), "haircut")
    }

    #[test]
    fn test_bookings_on_excludes_cancelled() {
        let mut ledger = BookingLedger::new();
        let kept = ledger.append(booking("09:00", "10:00"));
        let cancelled = ledger.append(booking("10:00", "11:00"));
        ledger.transition(cancelled, BookingStatus::Cancelled).unwrap();

        let active = ledger.bookings_on(date());
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, kept);

        // Audit view still sees both.
        assert_eq!(ledger.bookings_on_including_cancelled(date()).len(), 2);
    }

    #[test]
    fn test_bookings_on_empty_date() {
        let ledger = BookingLedger::new();
        assert!(ledger.bookings_on(date()).is_empty());
        assert!(ledger.bookings_on_including_cancelled(date()).is_empty());
    }

    #[test]
    fn test_bookings_between() {
        let mut ledger = BookingLedger::new();
        let d1 = NaiveDate::from_ymd_opt(2025, 6, 2).unwrap();
        let d2 = NaiveDate::from_ymd_opt(2025, 6, 5).unwrap();
        let d3 = NaiveDate::from_ymd_opt(2025, 6, 9).unwrap();
        for d in [d1, d2, d3] {
            ledger.append(Booking::pending(
                d,
                TimeRange::parse("09:00", "10:00").unwrap(),
                "haircut",
            ));
        }
        assert_eq!(ledger.bookings_between(d1, d2).len(), 2);
        assert_eq!(ledger.bookings_between(d1, d3).len(), 3);
    }

    #[test]
    fn test_transition_unknown_booking() {
        let mut ledger = BookingLedger::new();
        let result = ledger.transition(BookingId::new(), BookingStatus::Confirmed);
        assert!(matches!(result, Err(EngineError::UnknownBooking(_))));
    }

    #[test]
    fn test_transition_enforces_lifecycle() {
        let mut ledger = BookingLedger::new();
        let id = ledger.append(booking("09:00", "10:00"));
        ledger.transition(id, BookingStatus::Confirmed).unwrap();
        ledger.transition(id, BookingStatus::Cancelled).unwrap();
        let result = ledger.transition(id, BookingStatus::Confirmed);
        assert!(matches!(result, Err(EngineError::InvalidTransition { .. })));
    }
}
