//! Calendar-month grid utilities.
//!
//! Pure helpers for rendering a month as a Sunday-first 7-column grid and
//! for normalizing timestamps to local calendar dates. Cheap to recompute,
//! so nothing here is cached.

use chrono::{DateTime, Datelike, Local, NaiveDate, Weekday};

/// Enumerate a month as a Sunday-first grid.
///
/// Leading `None` cells pad the offset of the first day; trailing `None`
/// cells pad the final week so the result length is always a multiple
/// of 7. Returns an empty grid for an invalid year/month.
pub fn month_grid(year: i32, month: u32) -> Vec<Option<NaiveDate>> {
    let Some(first) = NaiveDate::from_ymd_opt(year, month, 1) else {
        return Vec::new();
    };

    let mut grid: Vec<Option<NaiveDate>> = Vec::with_capacity(42);
    for _ in 0..first.weekday().num_days_from_sunday() {
        grid.push(None);
    }
    for day in 1..=days_in_month(year, month) {
        grid.push(NaiveDate::from_ymd_opt(year, month, day));
    }
    while grid.len() % 7 != 0 {
        grid.push(None);
    }
    grid
}

/// Number of days in the given month.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    let first = match NaiveDate::from_ymd_opt(year, month, 1) {
        Some(d) => d,
        None => return 0,
    };
    let next_month = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    };
    match next_month {
        Some(next) => next.signed_duration_since(first).num_days() as u32,
        None => 0,
    }
}

/// Canonical date key for a local timestamp.
///
/// The local calendar date is the join key between the availability store
/// and the booking ledger, so this must never go through a UTC shift: an
/// evening timestamp in a west-of-UTC zone would land on the next day.
pub fn normalize(datetime: DateTime<Local>) -> NaiveDate {
    datetime.date_naive()
}

/// Weekday of a date. Thin wrapper so callers outside the time modules do
/// not need a `Datelike` import.
pub fn weekday_of(date: NaiveDate) -> Weekday {
    date.weekday()
}
