//! Application state for the HTTP server.

use std::sync::Arc;

use crate::calendar::CalendarRegistry;
use crate::db::CalendarRepository;
use crate::settings::SettingsPolicy;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Per-provider calendar aggregates
    pub registry: CalendarRegistry,
    /// Persistence collaborator invoked after accepted mutations
    pub repository: Arc<dyn CalendarRepository>,
}

impl AppState {
    /// Create application state with the given repository and policy.
    pub fn new(repository: Arc<dyn CalendarRepository>, policy: SettingsPolicy) -> Self {
        Self {
            registry: CalendarRegistry::new(policy),
            repository,
        }
    }
}
