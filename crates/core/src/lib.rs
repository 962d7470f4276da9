//! # SlotBook Core
//!
//! The scheduling and booking-consistency engine: what a bookable slot is,
//! which slots are taken, how weekly recurrences expand, and which lifecycle
//! transitions an appointment allows.
//!
//! - [`calendar`]: business hours, slot grid, week window, clock, edge parsing
//! - [`slots`]: slot generation for a week
//! - [`availability`]: free/taken classification of slots
//! - [`recurrence`]: weekly occurrence expansion
//! - [`store`]: the storage trait and the in-memory store
//! - [`service`]: the booking service that ties them together

pub mod availability;
pub mod calendar;
pub mod errors;
pub mod models;
pub mod recurrence;
pub mod service;
pub mod slots;
pub mod store;
