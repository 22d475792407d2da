//! Scheduler / conflict resolver.
//!
//! The algorithmic heart of the engine: given a candidate booking request,
//! decide admissibility against the availability store and the booking
//! ledger, and classify a day's state for calendar rendering. Both entry
//! points are pure functions over borrowed snapshots — they never mutate
//! state, and business rejections are normal return values, not errors.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::api::WindowId;
use crate::error::EngineResult;
use crate::models::{Booking, DayStatus, TimeOfDay, TimeRange};
use crate::settings::SettingsPolicy;
use crate::store::{AvailabilityStore, BookingLedger, EffectiveWindow};


/// A candidate booking request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingRequest {
    pub date: NaiveDate,
    pub start: TimeOfDay,
    pub end: TimeOfDay,
    pub service_tag: String,
}

impl BookingRequest {
    pub fn new(
        date: NaiveDate,
        start: TimeOfDay,
        end: TimeOfDay,
        service_tag: impl Into<String>,
    ) -> Self {
        Self {
            date,
            start,
            end,
            service_tag: service_tag.into(),
        }
    }
}

/// Why a request was not admitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    /// Date is in the holiday set.
    Holiday,
    /// No open window contains the requested range and accepts the service.
    OutsideAvailability,
    /// Every containing window failed the buffer-gap check.
    BufferConflict,
    /// Every containing window is at capacity.
    CapacityExceeded,
    /// The whole-day booking cap is already reached.
    DailyCapExceeded,
    /// Date lies beyond the advance-booking horizon.
    TooFarInAdvance,
}

impl std::fmt::Display for RejectReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            RejectReason::Holiday => "holiday",
            RejectReason::OutsideAvailability => "outside_availability",
            RejectReason::BufferConflict => "buffer_conflict",
            RejectReason::CapacityExceeded => "capacity_exceeded",
            RejectReason::DailyCapExceeded => "daily_cap_exceeded",
            RejectReason::TooFarInAdvance => "too_far_in_advance",
        };
        write!(f, "{}", s)
    }
}

/// Admission decision for a booking request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum Decision {
    /// Admitted into the given window.
    Admit { window_id: WindowId },
    /// Rejected for a business reason; a normal outcome, not an error.
    Rejected { reason: RejectReason },
}

impl Decision {
    pub fn is_admitted(&self) -> bool {
        matches!(self, Decision::Admit { .. })
    }

    fn rejected(reason: RejectReason) -> Self {
        Decision::Rejected { reason }
    }
}

/// Decide whether a booking request can be admitted.
///
/// Guard checks run first: the advance-booking horizon (date-only, cheapest)
/// and the whole-day cap, both before window resolution. Then holiday, then
/// window matching in the store's deterministic order — first viable window
/// wins. Per window the buffer-gap check and the capacity check are
/// evaluated independently: a slot can have buffer clearance but no open
/// capacity, and capacity exhaustion still rejects.
///
/// A malformed range (`end <= start`) is a programmer error and fails
/// loudly; everything else comes back as a [`Decision`].
pub fn can_book(
    availability: &AvailabilityStore,
    ledger: &BookingLedger,
    policy: &SettingsPolicy,
    today: NaiveDate,
    request: &BookingRequest,
) -> EngineResult<Decision> {
    let range = TimeRange::new(request.start, request.end)?;

    let horizon = today
        .checked_add_days(Days::new(policy.advance_booking_days as u64))
        .unwrap_or(NaiveDate::MAX);
    if request.date > horizon {
        return Ok(Decision::rejected(RejectReason::TooFarInAdvance));
    }

    let day_bookings = ledger.bookings_on(request.date);
    if day_bookings.len() as u32 >= policy.max_daily_bookings {
        return Ok(Decision::rejected(RejectReason::DailyCapExceeded));
    }

    if availability.is_holiday(request.date) {
        return Ok(Decision::rejected(RejectReason::Holiday));
    }

    let candidates: Vec<EffectiveWindow> = availability
        .resolve_windows(request.date)
        .into_iter()
        .filter(|w| w.range.contains(&range) && w.accepts_service(&request.service_tag))
        .collect();
    if candidates.is_empty() {
        return Ok(Decision::rejected(RejectReason::OutsideAvailability));
    }

    let mut any_buffer_failure = false;
    for window in &candidates {
        let existing: Vec<&Booking> = day_bookings
            .iter()
            .copied()
            .filter(|b| window.range.contains(&b.range))
            .collect();

        let buffer_conflict = existing
            .iter()
            .any(|b| b.range.expanded(window.buffer_minutes).overlaps(&range));
        if buffer_conflict {
            any_buffer_failure = true;
        }

        let at_capacity = existing.len() as u32 >= window.max_concurrent_bookings;

        if !buffer_conflict && !at_capacity {
            return Ok(Decision::Admit {
                window_id: window.window_id,
            });
        }
    }

    if any_buffer_failure {
        Ok(Decision::rejected(RejectReason::BufferConflict))
    } else {
        Ok(Decision::rejected(RejectReason::CapacityExceeded))
    }
}

/// Classify a day for calendar rendering.
///
/// Precedence: Holiday > Conflict > FullyBooked > PartiallyBooked >
/// Available > Unavailable. Conflict re-runs the buffer/overlap check
/// pairwise across the stored bookings (and flags per-window capacity
/// excess) to surface data that bypassed `can_book`; the engine renders a
/// sane status instead of failing the read.
pub fn day_status(
    availability: &AvailabilityStore,
    ledger: &BookingLedger,
    date: NaiveDate,
) -> DayStatus {
    if availability.is_holiday(date) {
        return DayStatus::Holiday;
    }

    let windows = availability.resolve_windows(date);
    let bookings = ledger.bookings_on(date);

    if has_integrity_conflict(&windows, &bookings) {
        log::warn!(
            "integrity conflict among {} stored bookings on {}",
            bookings.len(),
            date
        );
        return DayStatus::Conflict;
    }

    if windows.is_empty() {
        return DayStatus::Unavailable;
    }

    let fully_booked = windows.iter().all(|w| {
        let count = bookings
            .iter()
            .filter(|b| w.range.contains(&b.range))
            .count() as u32;
        count >= w.max_concurrent_bookings
    });
    if fully_booked {
        return DayStatus::FullyBooked;
    }

    if bookings.is_empty() {
        DayStatus::Available
    } else {
        DayStatus::PartiallyBooked
    }
}

/// Pairwise buffer/overlap violation or per-window capacity excess among
/// already-stored bookings. Buffers come from the first window containing
/// each booking; an orphan booking (no containing window) gets buffer 0 but
/// still participates in raw overlap detection.
fn has_integrity_conflict(windows: &[EffectiveWindow], bookings: &[&Booking]) -> bool {
    let buffer_for = |booking: &Booking| -> u16 {
        windows
            .iter()
            .find(|w| w.range.contains(&booking.range))
            .map(|w| w.buffer_minutes)
            .unwrap_or(0)
    };

    for (i, &a) in bookings.iter().enumerate() {
        for &b in bookings.iter().skip(i + 1) {
            if a.range.expanded(buffer_for(a)).overlaps(&b.range)
                || b.range.expanded(buffer_for(b)).overlaps(&a.range)
            {
                return true;
            }
        }
    }

    windows.iter().any(|w| {
        let count = bookings
            .iter()
            .filter(|b| w.range.contains(&b.range))
            .count() as u32;
        count > w.max_concurrent_bookings
    })
}
