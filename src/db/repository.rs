//! Repository trait: the persistence collaborator interface.
//!
//! The engine core never performs I/O; the caller loads state through this
//! trait before constructing a calendar, and persists accepted mutations
//! after the atomic admission decision.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::api::{ProviderId, WindowId};
use crate::db::error::RepositoryResult;
use crate::models::{AvailabilityWindow, Booking};

/// Storage operations for provider calendars.
#[async_trait]
pub trait CalendarRepository: Send + Sync {
    /// Check that the backend is reachable.
    async fn health_check(&self) -> RepositoryResult<bool>;

    /// Load all availability windows for a provider.
    async fn load_windows(&self, provider: ProviderId) -> RepositoryResult<Vec<AvailabilityWindow>>;

    /// Load bookings for a provider in an inclusive date range.
    async fn load_bookings(
        &self,
        provider: ProviderId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> RepositoryResult<Vec<Booking>>;

    /// Load the provider's holiday set.
    async fn load_holidays(&self, provider: ProviderId) -> RepositoryResult<Vec<NaiveDate>>;

    /// Persist a window (insert or replace by id).
    async fn save_window(
        &self,
        provider: ProviderId,
        window: AvailabilityWindow,
    ) -> RepositoryResult<()>;

    /// Delete a window by id. Deleting a missing id is a no-op.
    async fn delete_window(&self, provider: ProviderId, id: WindowId) -> RepositoryResult<()>;

    /// Persist a booking (insert or replace by id, covering status
    /// transitions).
    async fn save_booking(&self, provider: ProviderId, booking: Booking) -> RepositoryResult<()>;

    /// Replace the provider's holiday set.
    async fn save_holidays(
        &self,
        provider: ProviderId,
        holidays: Vec<NaiveDate>,
    ) -> RepositoryResult<()>;
}
