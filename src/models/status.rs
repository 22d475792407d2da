//! Derived per-day calendar status.

use serde::{Deserialize, Serialize};

/// Day-level classification used for calendar rendering and admission
/// display. Derived fresh per query, never persisted.
///
/// Precedence (highest wins):
/// `Holiday > Conflict > FullyBooked > PartiallyBooked > Available > Unavailable`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayStatus {
    /// Date is in the holiday set; overrides everything else.
    Holiday,
    /// Stored bookings violate the buffer/overlap or capacity invariants.
    /// A data-integrity signal from an external mutation path, not a
    /// normal state.
    Conflict,
    /// Every window's capacity is consumed.
    FullyBooked,
    /// Some bookings exist, capacity remains.
    PartiallyBooked,
    /// Open windows exist and no bookings are placed.
    Available,
    /// No open window at all.
    Unavailable,
}

impl std::fmt::Display for DayStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            DayStatus::Holiday => "holiday",
            DayStatus::Conflict => "conflict",
            DayStatus::FullyBooked => "fully_booked",
            DayStatus::PartiallyBooked => "partially_booked",
            DayStatus::Available => "available",
            DayStatus::Unavailable => "unavailable",
        };
        write!(f, "{}", s)
    }
}
