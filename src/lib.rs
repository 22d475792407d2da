//! # slotwise
//!
//! Provider availability and booking-conflict engine.
//!
//! This crate decides, for a single provider's calendar, whether a
//! requested time slot can be booked, how many concurrent bookings a slot
//! may hold, how recurring weekly availability interacts with one-off
//! overrides and holidays, and how to classify a day's state for calendar
//! rendering and admission control. The optional HTTP layer exposes the
//! engine as a REST API via Axum.
//!
//! ## Architecture
//!
//! - [`models`]: immutable value types (times, windows, bookings, statuses)
//! - [`store`]: the availability store and booking ledger
//! - [`scheduler`]: pure admission and day-classification functions
//! - [`calendar`]: the per-provider aggregate that makes check-then-append
//!   atomic
//! - [`settings`]: global scheduling defaults, loadable from TOML
//! - [`db`]: persistence collaborator interface and in-memory backend
//! - [`services`]: calendar-grid helpers for rendering
//! - [`http`]: Axum-based HTTP server and request handlers
//! - [`api`]: consolidated public surface and identifier newtypes

pub mod api;
pub mod calendar;
pub mod db;
pub mod error;
pub mod models;
pub mod scheduler;
pub mod services;
pub mod settings;
pub mod store;

#[cfg(feature = "http-server")]
pub mod http;
