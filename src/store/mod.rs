//! Calendar state: the availability store and the booking ledger.
//!
//! The two stores are deliberately independent of each other; only the
//! scheduler joins them, keyed by local calendar date.

pub mod availability;
pub mod ledger;

pub use availability::{AvailabilityStore, EffectiveWindow};
pub use ledger::BookingLedger;
