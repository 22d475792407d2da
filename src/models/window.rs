//! Availability window value type.

use std::collections::BTreeSet;

use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::api::WindowId;
use crate::error::{EngineError, EngineResult};
use crate::models::TimeRange;

/// Which days a window applies to.
///
/// Exactly one variant is active per window. A `DateSpecific` window
/// overrides any `Recurring` window of the matching weekday for the portion
/// of the day it covers; see `AvailabilityStore::resolve_windows`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WindowScope {
    /// Weekly template entry, applies to every date falling on the weekday.
    Recurring { weekday: Weekday },
    /// One-off override for a single calendar date.
    DateSpecific { date: NaiveDate },
}

impl WindowScope {
    /// Whether this scope applies to the given date.
    pub fn applies_to(&self, date: NaiveDate) -> bool {
        match self {
            WindowScope::Recurring { weekday } => {
                chrono::Datelike::weekday(&date) == *weekday
            }
            WindowScope::DateSpecific { date: d } => *d == date,
        }
    }
}

/// A bookable availability window created by the provider.
///
/// Immutable value type; edits go through
/// `AvailabilityStore::upsert_window`, which enforces the validity and
/// append-only-past rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvailabilityWindow {
    pub id: WindowId,
    pub scope: WindowScope,
    pub range: TimeRange,
    /// Number of bookings the window may hold at once. Always >= 1.
    pub max_concurrent_bookings: u32,
    /// Minimum gap in minutes between the end of one booking and the start
    /// of the next within this window.
    pub buffer_minutes: u16,
    /// Service-type labels this window accepts. Empty set accepts all.
    #[serde(default)]
    pub eligible_service_tags: BTreeSet<String>,
}

impl AvailabilityWindow {
    /// Create a window with a fresh id, validating capacity.
    pub fn new(
        scope: WindowScope,
        range: TimeRange,
        max_concurrent_bookings: u32,
        buffer_minutes: u16,
    ) -> EngineResult<Self> {
        let window = Self {
            id: WindowId::new(),
            scope,
            range,
            max_concurrent_bookings,
            buffer_minutes,
            eligible_service_tags: BTreeSet::new(),
        };
        window.validate()?;
        Ok(window)
    }

    /// Restrict the window to the given service tags.
    pub fn with_service_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.eligible_service_tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Check the window's own invariants. The range invariant is enforced
    /// by [`TimeRange`] at construction; capacity is checked here.
    pub fn validate(&self) -> EngineResult<()> {
        if self.max_concurrent_bookings < 1 {
            return Err(EngineError::InvalidWindow(format!(
                "window {} has zero capacity",
                self.id
            )));
        }
        Ok(())
    }

    /// Whether this window accepts the given service tag.
    pub fn accepts_service(&self, service_tag: &str) -> bool {
        self.eligible_service_tags.is_empty()
            || self.eligible_service_tags.contains(service_tag)
    }
}
