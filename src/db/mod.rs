//! Persistence collaborator for provider calendars.
//!
//! The engine core is I/O-free; this module defines the repository
//! interface the surrounding application implements, plus an in-memory
//! backend for unit testing and local development. Callers load state
//! through the trait before constructing a [`ProviderCalendar`], and
//! persist accepted mutations after the atomic admission decision.
//!
//! [`ProviderCalendar`]: crate::calendar::ProviderCalendar

#[cfg(not(feature = "local-repo"))]
compile_error!("Enable at least one repository backend feature.");

pub mod error;
pub mod repository;

#[cfg(feature = "local-repo")]
pub mod local;

pub use error::{RepositoryError, RepositoryResult};
pub use repository::CalendarRepository;

#[cfg(feature = "local-repo")]
pub use local::LocalRepository;

use chrono::NaiveDate;

use crate::api::ProviderId;
use crate::calendar::ProviderCalendar;
use crate::settings::SettingsPolicy;
use crate::store::{AvailabilityStore, BookingLedger};

/// Load a provider's persisted state and assemble a calendar aggregate.
///
/// Bookings are loaded for the inclusive `[from, to]` range, which should
/// cover at least the policy's advance-booking horizon.
pub async fn load_calendar(
    repo: &dyn CalendarRepository,
    provider: ProviderId,
    policy: SettingsPolicy,
    from: NaiveDate,
    to: NaiveDate,
) -> RepositoryResult<ProviderCalendar> {
    let windows = repo.load_windows(provider).await?;
    let bookings = repo.load_bookings(provider, from, to).await?;
    let holidays = repo.load_holidays(provider).await?;

    let mut availability = AvailabilityStore::new();
    for window in windows {
        // Persisted windows predate "today"; seed without the past-date
        // lock by using the earliest representable date as the reference.
        availability
            .upsert_window(window, NaiveDate::MIN)
            .map_err(RepositoryError::from)?;
    }
    availability.replace_holidays(holidays);

    let mut ledger = BookingLedger::new();
    for booking in bookings {
        ledger.append(booking);
    }

    Ok(ProviderCalendar::from_parts(policy, availability, ledger))
}
