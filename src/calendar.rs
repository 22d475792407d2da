//! Provider calendar aggregate.
//!
//! Owns the availability store and booking ledger for one provider and
//! serializes the check-then-act sequence: two near-simultaneous requests
//! must not both observe free capacity and both append. `try_book` holds
//! the write lock across the `can_book` call and the ledger append, so
//! admission and append are atomic as a unit even though `can_book` itself
//! is pure. Calendars are independent units of concurrency; nothing here
//! blocks on I/O.

use std::collections::HashMap;

use chrono::{Local, NaiveDate};
use parking_lot::RwLock;
use std::sync::Arc;

use crate::api::{BookingId, ProviderId, WindowId};
use crate::error::EngineResult;
use crate::models::{AvailabilityWindow, Booking, BookingStatus, DayStatus};
use crate::scheduler::{can_book, day_status, BookingRequest, Decision};
use crate::services::month_grid;
use crate::settings::SettingsPolicy;
use crate::store::{AvailabilityStore, BookingLedger, EffectiveWindow};

/// Outcome of an atomic booking attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum BookingOutcome {
    /// Admitted and appended; the new booking is Pending.
    Booked {
        booking_id: BookingId,
        window_id: WindowId,
    },
    /// Rejected; nothing was appended.
    Rejected(crate::scheduler::RejectReason),
}

struct CalendarState {
    availability: AvailabilityStore,
    ledger: BookingLedger,
}

/// One provider's calendar: availability, bookings, and policy behind a
/// single lock.
pub struct ProviderCalendar {
    policy: SettingsPolicy,
    state: RwLock<CalendarState>,
}

impl ProviderCalendar {
    /// Create a calendar seeded from the policy's weekly template.
    pub fn new(policy: SettingsPolicy) -> Self {
        let availability = AvailabilityStore::from_policy(&policy);
        Self {
            policy,
            state: RwLock::new(CalendarState {
                availability,
                ledger: BookingLedger::new(),
            }),
        }
    }

    /// Create a calendar from loaded state (see the repository layer).
    pub fn from_parts(
        policy: SettingsPolicy,
        availability: AvailabilityStore,
        ledger: BookingLedger,
    ) -> Self {
        Self {
            policy,
            state: RwLock::new(CalendarState {
                availability,
                ledger,
            }),
        }
    }

    pub fn policy(&self) -> &SettingsPolicy {
        &self.policy
    }

    fn today() -> NaiveDate {
        month_grid::normalize(Local::now())
    }

    /// Pure admission check; does not append. Prefer [`Self::try_book`]
    /// unless the caller only needs a preview.
    pub fn check(&self, request: &BookingRequest) -> EngineResult<Decision> {
        let state = self.state.read();
        can_book(
            &state.availability,
            &state.ledger,
            &self.policy,
            Self::today(),
            request,
        )
    }

    /// Atomically run the admission check and, on Admit, append the
    /// booking. The write guard spans both steps.
    pub fn try_book(&self, request: &BookingRequest) -> EngineResult<BookingOutcome> {
        let mut state = self.state.write();
        let decision = can_book(
            &state.availability,
            &state.ledger,
            &self.policy,
            Self::today(),
            request,
        )?;
        match decision {
            Decision::Admit { window_id } => {
                let range = crate::models::TimeRange::new(request.start, request.end)?;
                let booking = Booking::pending(request.date, range, request.service_tag.clone());
                let booking_id = state.ledger.append(booking);
                Ok(BookingOutcome::Booked {
                    booking_id,
                    window_id,
                })
            }
            Decision::Rejected { reason } => Ok(BookingOutcome::Rejected(reason)),
        }
    }

    pub fn day_status(&self, date: NaiveDate) -> DayStatus {
        let state = self.state.read();
        day_status(&state.availability, &state.ledger, date)
    }

    pub fn resolve_windows(&self, date: NaiveDate) -> Vec<EffectiveWindow> {
        self.state.read().availability.resolve_windows(date)
    }

    /// Month view: the Sunday-first grid with a status per day.
    pub fn month_statuses(&self, year: i32, month: u32) -> Vec<Option<(NaiveDate, DayStatus)>> {
        let state = self.state.read();
        month_grid::month_grid(year, month)
            .into_iter()
            .map(|cell| {
                cell.map(|date| (date, day_status(&state.availability, &state.ledger, date)))
            })
            .collect()
    }

    pub fn upsert_window(&self, window: AvailabilityWindow) -> EngineResult<()> {
        self.state
            .write()
            .availability
            .upsert_window(window, Self::today())
    }

    pub fn remove_window(&self, id: WindowId) -> EngineResult<()> {
        self.state.write().availability.remove_window(id, Self::today())
    }

    pub fn set_holiday(&self, date: NaiveDate) {
        self.state.write().availability.set_holiday(date);
    }

    pub fn clear_holiday(&self, date: NaiveDate) {
        self.state.write().availability.clear_holiday(date);
    }

    /// Replace the full holiday set under one write guard, so readers
    /// never observe a partially swapped set.
    pub fn replace_holidays(&self, dates: impl IntoIterator<Item = NaiveDate>) {
        self.state.write().availability.replace_holidays(dates);
    }

    pub fn transition_booking(&self, id: BookingId, next: BookingStatus) -> EngineResult<()> {
        self.state.write().ledger.transition(id, next)
    }

    pub fn booking(&self, id: BookingId) -> Option<Booking> {
        self.state.read().ledger.booking(id).cloned()
    }

    /// Snapshot of the day's bookings, for audit views when
    /// `include_cancelled` is set.
    pub fn bookings_on(&self, date: NaiveDate, include_cancelled: bool) -> Vec<Booking> {
        let state = self.state.read();
        let bookings = if include_cancelled {
            state.ledger.bookings_on_including_cancelled(date)
        } else {
            state.ledger.bookings_on(date)
        };
        bookings.into_iter().cloned().collect()
    }

    /// Snapshot of the configured windows.
    pub fn windows(&self) -> Vec<AvailabilityWindow> {
        self.state.read().availability.windows().cloned().collect()
    }

    pub fn window(&self, id: WindowId) -> Option<AvailabilityWindow> {
        self.state.read().availability.window(id).cloned()
    }

    /// Snapshot of the holiday set.
    pub fn holidays(&self) -> Vec<NaiveDate> {
        self.state.read().availability.holidays().collect()
    }
}

/// Registry of provider calendars. Providers are independent units of
/// concurrency: the registry lock only guards the map, never a calendar's
/// own state.
#[derive(Clone, Default)]
pub struct CalendarRegistry {
    calendars: Arc<RwLock<HashMap<ProviderId, Arc<ProviderCalendar>>>>,
    policy: SettingsPolicy,
}

impl CalendarRegistry {
    pub fn new(policy: SettingsPolicy) -> Self {
        Self {
            calendars: Arc::new(RwLock::new(HashMap::new())),
            policy,
        }
    }

    /// Get the provider's calendar, creating a policy-seeded one on first
    /// access.
    pub fn calendar(&self, provider: ProviderId) -> Arc<ProviderCalendar> {
        if let Some(calendar) = self.calendars.read().get(&provider) {
            return Arc::clone(calendar);
        }
        let mut calendars = self.calendars.write();
        Arc::clone(
            calendars
                .entry(provider)
                .or_insert_with(|| Arc::new(ProviderCalendar::new(self.policy.clone()))),
        )
    }

    /// Install a calendar built from persisted state.
    pub fn insert(&self, provider: ProviderId, calendar: ProviderCalendar) {
        self.calendars.write().insert(provider, Arc::new(calendar));
    }

    pub fn len(&self) -> usize {
        self.calendars.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.calendars.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{TimeRange, WindowScope};
    use crate::scheduler::RejectReason;
    use chrono::{Datelike, Days};

    /// A permissive policy plus the next occurrence of a weekday so tests
    /// stay valid relative to the real clock used by the aggregate.
    fn policy() -> SettingsPolicy {
        SettingsPolicy {
            max_daily_bookings: 100,
            advance_booking_days: 365,
            ..Default::default()
        }
        .with_weekday_template(TimeRange::parse("09:00", "17:00").unwrap())
    }

    fn upcoming_weekday() -> NaiveDate {
        // Tomorrow or later, first weekday (template covers Mon-Fri).
        let mut date = Local::now().date_naive() + Days::new(1);
        while matches!(date.weekday(), chrono::Weekday::Sat | chrono::Weekday::Sun) {
            date = date + Days::new(1);
        }
        date
    }

    fn request(date: NaiveDate, start: &str, end: &str) -> BookingRequest {
        BookingRequest::new(date, start.parse().unwrap(), end.parse().unwrap(), "haircut")
    }

    #[test]
    fn test_seeded_calendar_admits_and_appends() {
        let calendar = ProviderCalendar::new(policy());
        let date = upcoming_weekday();

        let outcome = calendar.try_book(&request(date, "10:00", "11:00")).unwrap();
        assert!(matches!(outcome, BookingOutcome::Booked { .. }));
        assert_eq!(calendar.bookings_on(date, false).len(), 1);
        assert_eq!(calendar.day_status(date), DayStatus::PartiallyBooked);
    }

    #[test]
    fn test_capacity_respected_under_sequential_attempts() {
        // Default capacity is 1; the second identical-slot attempt loses.
        let calendar = ProviderCalendar::new(policy());
        let date = upcoming_weekday();

        let first = calendar.try_book(&request(date, "10:00", "11:00")).unwrap();
        assert!(matches!(first, BookingOutcome::Booked { .. }));

        let second = calendar.try_book(&request(date, "10:00", "11:00")).unwrap();
        assert!(matches!(second, BookingOutcome::Rejected(_)));
        assert_eq!(calendar.bookings_on(date, false).len(), 1);
    }

    #[test]
    fn test_check_does_not_append() {
        let calendar = ProviderCalendar::new(policy());
        let date = upcoming_weekday();
        let decision = calendar.check(&request(date, "10:00", "11:00")).unwrap();
        assert!(decision.is_admitted());
        assert!(calendar.bookings_on(date, false).is_empty());
    }

    #[test]
    fn test_holiday_set_through_aggregate() {
        let calendar = ProviderCalendar::new(policy());
        let date = upcoming_weekday();
        calendar.set_holiday(date);

        let outcome = calendar.try_book(&request(date, "10:00", "11:00")).unwrap();
        assert_eq!(outcome, BookingOutcome::Rejected(RejectReason::Holiday));
        assert_eq!(calendar.day_status(date), DayStatus::Holiday);

        calendar.clear_holiday(date);
        assert_eq!(calendar.day_status(date), DayStatus::Available);
    }

    #[test]
    fn test_replace_holidays_swaps_whole_set() {
        let calendar = ProviderCalendar::new(policy());
        let date = upcoming_weekday();
        let later = date + Days::new(7);
        calendar.set_holiday(date);

        calendar.replace_holidays([later]);
        assert_eq!(calendar.holidays(), vec![later]);
        assert_eq!(calendar.day_status(date), DayStatus::Available);

        calendar.replace_holidays(std::iter::empty());
        assert!(calendar.holidays().is_empty());
    }

    #[test]
    fn test_replace_holidays_never_exposes_partial_set() {
        use std::thread;

        let calendar = Arc::new(ProviderCalendar::new(policy()));
        let set_a: Vec<NaiveDate> = (1..=5).map(|i| upcoming_weekday() + Days::new(i)).collect();
        let set_b: Vec<NaiveDate> = (11..=15).map(|i| upcoming_weekday() + Days::new(i)).collect();
        calendar.replace_holidays(set_a.iter().copied());

        let writer = {
            let calendar = Arc::clone(&calendar);
            let (set_a, set_b) = (set_a.clone(), set_b.clone());
            thread::spawn(move || {
                for _ in 0..200 {
                    calendar.replace_holidays(set_b.iter().copied());
                    calendar.replace_holidays(set_a.iter().copied());
                }
            })
        };

        // Readers must always see one complete set, never a mix or a
        // transiently empty set.
        for _ in 0..200 {
            let seen = calendar.holidays();
            assert!(
                seen == set_a || seen == set_b,
                "observed partial holiday set: {:?}",
                seen
            );
        }
        writer.join().unwrap();
    }

    #[test]
    fn test_month_statuses_shape() {
        let calendar = ProviderCalendar::new(policy());
        let date = upcoming_weekday();
        let statuses = calendar.month_statuses(date.year(), date.month());
        assert_eq!(statuses.len() % 7, 0);
        let our_day = statuses
            .iter()
            .flatten()
            .find(|(d, _)| *d == date)
            .expect("date present in its own month grid");
        assert_eq!(our_day.1, DayStatus::Available);
    }

    #[test]
    fn test_window_crud_through_aggregate() {
        let calendar = ProviderCalendar::new(SettingsPolicy::default());
        assert!(calendar.windows().is_empty());

        let date = upcoming_weekday();
        let window = AvailabilityWindow::new(
            WindowScope::DateSpecific { date },
            TimeRange::parse("09:00", "12:00").unwrap(),
            2,
            0,
        )
        .unwrap();
        let id = window.id;
        calendar.upsert_window(window).unwrap();
        assert_eq!(calendar.windows().len(), 1);
        assert_eq!(calendar.resolve_windows(date).len(), 1);

        calendar.remove_window(id).unwrap();
        assert!(calendar.windows().is_empty());
    }

    #[test]
    fn test_concurrent_try_book_admits_exactly_capacity() {
        use std::thread;

        let calendar = Arc::new(ProviderCalendar::new(policy()));
        let date = upcoming_weekday();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let calendar = Arc::clone(&calendar);
                thread::spawn(move || {
                    calendar
                        .try_book(&request(date, "10:00", "11:00"))
                        .unwrap()
                })
            })
            .collect();

        let booked = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|o| matches!(o, BookingOutcome::Booked { .. }))
            .count();
        // Capacity 1: exactly one contender wins regardless of interleaving.
        assert_eq!(booked, 1);
        assert_eq!(calendar.bookings_on(date, false).len(), 1);
    }

    #[test]
    fn test_registry_returns_same_calendar() {
        let registry = CalendarRegistry::new(policy());
        let provider = ProviderId::new();
        let a = registry.calendar(provider);
        let b = registry.calendar(provider);
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(registry.len(), 1);

        let other = registry.calendar(ProviderId::new());
        assert!(!Arc::ptr_eq(&a, &other));
        assert_eq!(registry.len(), 2);
    }
}
