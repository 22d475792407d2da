//! Public API surface for the availability engine.
//!
//! This file consolidates the identifier newtypes and re-exports the value
//! types and operations that external callers (request handlers, dashboards)
//! are expected to use.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Provider (seller) identifier. Each provider owns one calendar aggregate.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ProviderId(pub Uuid);

/// Availability window identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct WindowId(pub Uuid);

/// Booking identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BookingId(pub Uuid);

impl ProviderId {
    pub fn new() -> Self {
        ProviderId(Uuid::new_v4())
    }

    pub fn value(&self) -> Uuid {
        self.0
    }
}

impl WindowId {
    pub fn new() -> Self {
        WindowId(Uuid::new_v4())
    }

    pub fn value(&self) -> Uuid {
        self.0
    }
}

impl BookingId {
    pub fn new() -> Self {
        BookingId(Uuid::new_v4())
    }

    pub fn value(&self) -> Uuid {
        self.0
    }
}

impl Default for ProviderId {
    fn default() -> Self {
        Self::new()
    }
}

impl Default for WindowId {
    fn default() -> Self {
        Self::new()
    }
}

impl Default for BookingId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ProviderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::fmt::Display for WindowId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::fmt::Display for BookingId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

pub use crate::calendar::ProviderCalendar;
pub use crate::error::{EngineError, EngineResult};
pub use crate::models::{
    AvailabilityWindow, Booking, BookingStatus, DayStatus, TimeOfDay, TimeRange, WindowScope,
};
pub use crate::scheduler::{can_book, day_status, BookingRequest, Decision, RejectReason};
pub use crate::settings::SettingsPolicy;
pub use crate::store::{AvailabilityStore, BookingLedger, EffectiveWindow};
