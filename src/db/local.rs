//! In-memory local repository implementation.
//!
//! Stores all data in memory using HashMaps keyed by provider, giving
//! fast, deterministic, isolated execution for unit tests and local
//! development.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::api::{ProviderId, WindowId};
use crate::db::error::{RepositoryError, RepositoryResult};
use crate::db::repository::CalendarRepository;
use crate::models::{AvailabilityWindow, Booking};

#[derive(Default)]
struct ProviderData {
    windows: HashMap<WindowId, AvailabilityWindow>,
    bookings: Vec<Booking>,
    holidays: Vec<NaiveDate>,
}

#[derive(Default)]
struct LocalData {
    providers: HashMap<ProviderId, ProviderData>,
    is_healthy: bool,
}

/// In-memory local repository.
#[derive(Clone)]
pub struct LocalRepository {
    data: Arc<RwLock<LocalData>>,
}

impl LocalRepository {
    /// Create a new empty local repository.
    pub fn new() -> Self {
        Self {
            data: Arc::new(RwLock::new(LocalData {
                is_healthy: true,
                ..Default::default()
            })),
        }
    }

    /// Set the health status for testing connection failures.
    pub fn set_healthy(&self, healthy: bool) {
        self.data.write().unwrap().is_healthy = healthy;
    }

    /// Clear all data from the repository.
    pub fn clear(&self) {
        let mut data = self.data.write().unwrap();
        data.providers.clear();
    }

    /// Number of providers with any stored data.
    pub fn provider_count(&self) -> usize {
        self.data.read().unwrap().providers.len()
    }

    fn check_health(&self) -> RepositoryResult<()> {
        if !self.data.read().unwrap().is_healthy {
            return Err(RepositoryError::connection("repository is not healthy"));
        }
        Ok(())
    }
}

impl Default for LocalRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CalendarRepository for LocalRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        Ok(self.data.read().unwrap().is_healthy)
    }

    async fn load_windows(
        &self,
        provider: ProviderId,
    ) -> RepositoryResult<Vec<AvailabilityWindow>> {
        self.check_health()?;
        let data = self.data.read().unwrap();
        Ok(data
            .providers
            .get(&provider)
            .map(|p| p.windows.values().cloned().collect())
            .unwrap_or_default())
    }

    async fn load_bookings(
        &self,
        provider: ProviderId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> RepositoryResult<Vec<Booking>> {
        self.check_health()?;
        let data = self.data.read().unwrap();
        Ok(data
            .providers
            .get(&provider)
            .map(|p| {
                p.bookings
                    .iter()
                    .filter(|b| from <= b.date && b.date <= to)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn load_holidays(&self, provider: ProviderId) -> RepositoryResult<Vec<NaiveDate>> {
        self.check_health()?;
        let data = self.data.read().unwrap();
        Ok(data
            .providers
            .get(&provider)
            .map(|p| p.holidays.clone())
            .unwrap_or_default())
    }

    async fn save_window(
        &self,
        provider: ProviderId,
        window: AvailabilityWindow,
    ) -> RepositoryResult<()> {
        self.check_health()?;
        window.validate()?;
        let mut data = self.data.write().unwrap();
        data.providers
            .entry(provider)
            .or_default()
            .windows
            .insert(window.id, window);
        Ok(())
    }

    async fn delete_window(&self, provider: ProviderId, id: WindowId) -> RepositoryResult<()> {
        self.check_health()?;
        let mut data = self.data.write().unwrap();
        if let Some(p) = data.providers.get_mut(&provider) {
            p.windows.remove(&id);
        }
        Ok(())
    }

    async fn save_booking(&self, provider: ProviderId, booking: Booking) -> RepositoryResult<()> {
        self.check_health()?;
        let mut data = self.data.write().unwrap();
        let bookings = &mut data.providers.entry(provider).or_default().bookings;
        match bookings.iter_mut().find(|b| b.id == booking.id) {
            Some(existing) => *existing = booking,
            None => bookings.push(booking),
        }
        Ok(())
    }

    async fn save_holidays(
        &self,
        provider: ProviderId,
        holidays: Vec<NaiveDate>,
    ) -> RepositoryResult<()> {
        self.check_health()?;
        let mut data = self.data.write().unwrap();
        data.providers.entry(provider).or_default().holidays = holidays;
        Ok(())
    }
}
