//! # Booking Store
//!
//! The store is the only shared mutable resource of the engine. Every
//! implementation must enforce, at commit time, that no two non-cancelled
//! appointments share a start time; an availability read beforehand is never
//! enough on its own.

pub mod memory;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::errors::BookingResult;
use crate::models::{
    actor::ActorRef,
    appointment::{Appointment, AppointmentDraft, AppointmentPatch, SearchQuery},
};

pub use memory::InMemoryAppointmentStore;

#[async_trait]
pub trait AppointmentStore: Send + Sync {
    /// Validates and commits a new active appointment.
    ///
    /// # Errors
    ///
    /// * `BookingError::Validation` - malformed fields or an off-grid time
    /// * `BookingError::SlotConflict` - the slot already holds an active appointment
    async fn insert(
        &self,
        draft: &AppointmentDraft,
        owner: &ActorRef,
        created_at: DateTime<Utc>,
    ) -> BookingResult<Appointment>;

    async fn get(&self, id: Uuid) -> BookingResult<Option<Appointment>>;

    /// Applies `patch` to an active appointment and re-validates the result.
    ///
    /// # Errors
    ///
    /// * `BookingError::NotFound` - unknown id
    /// * `BookingError::InvalidState` - the appointment is cancelled
    /// * `BookingError::Validation` - the merged record is invalid
    /// * `BookingError::SlotConflict` - the new time belongs to another active appointment
    async fn update(&self, id: Uuid, patch: &AppointmentPatch) -> BookingResult<Appointment>;

    /// Marks the appointment cancelled. Cancelling twice returns the same record.
    async fn cancel(&self, id: Uuid) -> BookingResult<Appointment>;

    /// Matches sorted active-first, then by name.
    async fn search(&self, query: &SearchQuery) -> BookingResult<Vec<Appointment>>;

    /// Appointments starting in `[from, to)`, chronologically.
    async fn list_range(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
        include_cancelled: bool,
    ) -> BookingResult<Vec<Appointment>>;

    /// Every appointment, chronologically.
    async fn list_all(&self, include_cancelled: bool) -> BookingResult<Vec<Appointment>>;
}

/// Ordering shared by every store's search results.
pub fn sort_search_results(results: &mut [Appointment]) {
    results.sort_by(|a, b| {
        a.cancelled
            .cmp(&b.cancelled)
            .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
            .then_with(|| a.start_time.cmp(&b.start_time))
    });
}
