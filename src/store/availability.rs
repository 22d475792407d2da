//! Availability store: windows, holidays, and per-date window resolution.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::api::WindowId;
use crate::error::{EngineError, EngineResult};
use crate::models::{AvailabilityWindow, TimeRange, WindowScope};
use crate::settings::SettingsPolicy;

/// A window as it is effective on a concrete date.
///
/// Date-specific windows appear whole; recurring windows may appear as
/// clipped fragments when a date-specific window supersedes part of their
/// range. Fragments carry the parent window's id, capacity, buffer, and
/// tags, so admission decisions always attribute to a real window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectiveWindow {
    pub window_id: WindowId,
    pub range: TimeRange,
    pub max_concurrent_bookings: u32,
    pub buffer_minutes: u16,
    pub eligible_service_tags: BTreeSet<String>,
}

impl EffectiveWindow {
    fn from_window(window: &AvailabilityWindow, range: TimeRange) -> Self {
        Self {
            window_id: window.id,
            range,
            max_concurrent_bookings: window.max_concurrent_bookings,
            buffer_minutes: window.buffer_minutes,
            eligible_service_tags: window.eligible_service_tags.clone(),
        }
    }

    /// Whether this window accepts the given service tag (empty set
    /// accepts all).
    pub fn accepts_service(&self, service_tag: &str) -> bool {
        self.eligible_service_tags.is_empty()
            || self.eligible_service_tags.contains(service_tag)
    }
}

/// Holds the provider's availability windows and holiday set.
///
/// Owned by the provider's calendar aggregate; the scheduler borrows it
/// read-only per call.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AvailabilityStore {
    windows: BTreeMap<WindowId, AvailabilityWindow>,
    holidays: BTreeSet<NaiveDate>,
}

impl AvailabilityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a store from the policy's default weekly template.
    pub fn from_policy(policy: &SettingsPolicy) -> Self {
        let mut store = Self::new();
        for entry in &policy.default_weekly_template {
            let window = AvailabilityWindow {
                id: WindowId::new(),
                scope: WindowScope::Recurring {
                    weekday: entry.weekday,
                },
                range: entry.range,
                max_concurrent_bookings: policy.default_max_concurrent_bookings,
                buffer_minutes: policy.default_buffer_minutes,
                eligible_service_tags: BTreeSet::new(),
            };
            store.windows.insert(window.id, window);
        }
        store
    }

    /// All configured windows, in id order.
    pub fn windows(&self) -> impl Iterator<Item = &AvailabilityWindow> {
        self.windows.values()
    }

    pub fn window(&self, id: WindowId) -> Option<&AvailabilityWindow> {
        self.windows.get(&id)
    }

    /// Insert or replace a window.
    ///
    /// Fails with `InvalidWindow` when the window has zero capacity or
    /// would make two recurring windows of the same weekday overlap
    /// (date-specific overrides are exempt since they intentionally
    /// supersede). Fails with `PastDateLocked` when the window — or the
    /// stored entry it would replace — is date-specific for a date before
    /// `today`; past entries are append-only for audit.
    pub fn upsert_window(
        &mut self,
        window: AvailabilityWindow,
        today: NaiveDate,
    ) -> EngineResult<()> {
        window.validate()?;
        self.check_not_past(&window, today)?;
        if let Some(existing) = self.windows.get(&window.id) {
            self.check_not_past(existing, today)?;
        }

        if let WindowScope::Recurring { weekday } = window.scope {
            for other in self.windows.values() {
                if other.id == window.id {
                    continue;
                }
                let same_weekday = matches!(
                    other.scope,
                    WindowScope::Recurring { weekday: w } if w == weekday
                );
                if same_weekday && other.range.overlaps(&window.range) {
                    return Err(EngineError::InvalidWindow(format!(
                        "recurring window {} on {} overlaps existing window {} ({})",
                        window.range, weekday, other.id, other.range
                    )));
                }
            }
        }

        self.windows.insert(window.id, window);
        Ok(())
    }

    /// Remove a window by id. Idempotent: a missing id is a no-op so that
    /// UI delete retries are safe. Past-dated date-specific entries stay
    /// locked.
    pub fn remove_window(&mut self, id: WindowId, today: NaiveDate) -> EngineResult<()> {
        if let Some(existing) = self.windows.get(&id) {
            self.check_not_past(existing, today)?;
            self.windows.remove(&id);
        }
        Ok(())
    }

    fn check_not_past(&self, window: &AvailabilityWindow, today: NaiveDate) -> EngineResult<()> {
        if let WindowScope::DateSpecific { date } = window.scope {
            if date < today {
                return Err(EngineError::PastDateLocked {
                    id: window.id,
                    date,
                });
            }
        }
        Ok(())
    }

    pub fn is_holiday(&self, date: NaiveDate) -> bool {
        self.holidays.contains(&date)
    }

    /// Mark a date as a holiday. Effective immediately; no grace window.
    pub fn set_holiday(&mut self, date: NaiveDate) {
        if self.holidays.insert(date) {
            log::info!("holiday set for {}", date);
        }
    }

    pub fn clear_holiday(&mut self, date: NaiveDate) {
        if self.holidays.remove(&date) {
            log::info!("holiday cleared for {}", date);
        }
    }

    pub fn holidays(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.holidays.iter().copied()
    }

    /// Replace the full holiday set.
    pub fn replace_holidays(&mut self, dates: impl IntoIterator<Item = NaiveDate>) {
        self.holidays = dates.into_iter().collect();
    }

    /// Windows effective on `date`, ordered by start time ascending with
    /// ties broken by window id.
    ///
    /// Date-specific windows for the date replace the overlapping portions
    /// of recurring windows for that weekday; non-overlapping recurring
    /// portions survive as clipped fragments. Holidays are NOT considered
    /// here — callers check `is_holiday` separately, since holiday
    /// precedence belongs to the scheduler.
    pub fn resolve_windows(&self, date: NaiveDate) -> Vec<EffectiveWindow> {
        let specifics: Vec<&AvailabilityWindow> = self
            .windows
            .values()
            .filter(|w| matches!(w.scope, WindowScope::DateSpecific { date: d } if d == date))
            .collect();

        let mut effective: Vec<EffectiveWindow> = specifics
            .iter()
            .map(|w| EffectiveWindow::from_window(w, w.range))
            .collect();

        for window in self.windows.values() {
            if !matches!(window.scope, WindowScope::Recurring { .. })
                || !window.scope.applies_to(date)
            {
                continue;
            }
            let mut fragments = vec![window.range];
            for specific in &specifics {
                fragments = fragments
                    .into_iter()
                    .flat_map(|f| f.subtract(&specific.range))
                    .collect();
            }
            effective.extend(
                fragments
                    .into_iter()
                    .map(|f| EffectiveWindow::from_window(window, f)),
            );
        }

        effective.sort_by_key(|w| (w.range.start(), w.window_id));
        effective
    }
}
