//! # Booking Service
//!
//! Orchestrates every booking request against an [`AppointmentStore`]:
//! availability reads go through the slot generator and the matcher, writes go
//! through the recurrence expander and the store.
//!
//! Lifecycle of an appointment:
//!
//! ```text
//! Active --edit--> Active
//! Active --cancel--> Cancelled (terminal)
//! ```
//!
//! The service holds no session state. The caller's credential and resolved
//! actor arrive with each call in a [`RequestContext`].

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::availability::match_slots;
use crate::calendar::{BusinessCalendar, Clock, SystemClock, WeekWindow};
use crate::errors::{BookingError, BookingResult};
use crate::models::{
    actor::RequestContext,
    appointment::{Appointment, AppointmentDraft, AppointmentPatch, SearchQuery},
    booking::{Availability, CreateOutcome, OccurrenceResult, OccurrenceStatus},
};
use crate::recurrence::expand;
use crate::slots::slots_in_window;
use crate::store::AppointmentStore;

#[derive(Clone)]
pub struct BookingService {
    store: Arc<dyn AppointmentStore>,
    calendar: BusinessCalendar,
    clock: Arc<dyn Clock>,
    allow_past: bool,
}

impl BookingService {
    pub fn new(store: Arc<dyn AppointmentStore>) -> Self {
        Self {
            store,
            calendar: BusinessCalendar::default(),
            clock: Arc::new(SystemClock),
            allow_past: false,
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_calendar(mut self, calendar: BusinessCalendar) -> Self {
        self.calendar = calendar;
        self
    }

    /// Permits creating or moving appointments to instants before now.
    pub fn allow_past_bookings(mut self, allow: bool) -> Self {
        self.allow_past = allow;
        self
    }

    pub fn calendar(&self) -> &BusinessCalendar {
        &self.calendar
    }

    /// The current instant according to the service clock.
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Free slots and booked slots of the week starting on `week_start`.
    ///
    /// # Errors
    ///
    /// * `BookingError::InvalidWeekStart` - `week_start` is not a Monday
    /// * `BookingError::AmbiguousBooking` - the store holds two active bookings for one slot
    pub async fn availability(&self, ctx: &RequestContext, week_start: NaiveDate) -> BookingResult<Availability> {
        let window = WeekWindow::starting(week_start)?;
        let slots = slots_in_window(&self.calendar, &window);
        let bookings = self
            .store
            .list_range(window.start(), window.end(), false)
            .await?;

        let availability = match_slots(&slots, &bookings)?;
        debug!(
            "Availability for week {} requested by {}: {} free, {} booked",
            week_start,
            ctx.actor,
            availability.available.len(),
            availability.booked.len()
        );
        Ok(availability)
    }

    /// Books `draft` and `repeat_count` further weekly occurrences.
    ///
    /// Occurrences are attempted one after another in chronological order.
    /// A validation failure or slot conflict is recorded against its
    /// occurrence and the next one is still attempted; occurrences already
    /// committed stay committed. Only infrastructure errors abort the request.
    pub async fn create(
        &self,
        ctx: &RequestContext,
        draft: AppointmentDraft,
        repeat_count: i64,
    ) -> BookingResult<CreateOutcome> {
        let drafts = expand(&draft.normalized(), repeat_count)?;
        let mut outcome = CreateOutcome::default();

        for (index, occurrence) in drafts.iter().enumerate() {
            let attempt = match self.reject_past(occurrence.start_time) {
                Ok(()) => {
                    self.store
                        .insert(occurrence, &ctx.actor, self.clock.now())
                        .await
                }
                Err(err) => Err(err),
            };

            let status = match attempt {
                Ok(appointment) => {
                    info!(
                        "Appointment {} booked at {} by {}",
                        appointment.id, appointment.start_time, ctx.actor
                    );
                    OccurrenceStatus::Created { appointment }
                }
                Err(err) if err.is_occurrence_failure() => {
                    warn!(
                        "Occurrence {} at {} rejected: {}",
                        index + 1,
                        occurrence.start_time,
                        err
                    );
                    OccurrenceStatus::failed(&err)
                }
                Err(err) => return Err(err),
            };

            outcome.occurrences.push(OccurrenceResult {
                occurrence: index + 1,
                start_time: occurrence.start_time,
                status,
            });
        }

        Ok(outcome)
    }

    /// Edits contact fields and/or moves an active appointment.
    ///
    /// The end time is always recomputed as start + 30 minutes.
    ///
    /// # Errors
    ///
    /// * `BookingError::NotFound` - unknown id
    /// * `BookingError::InvalidState` - the appointment is cancelled
    /// * `BookingError::InvalidDay` - the new start falls on a weekend
    /// * `BookingError::Validation` / `BookingError::SlotConflict` - from the store
    pub async fn edit(&self, ctx: &RequestContext, id: Uuid, patch: AppointmentPatch) -> BookingResult<Appointment> {
        let existing = self
            .store
            .get(id)
            .await?
            .ok_or_else(|| BookingError::NotFound(format!("Appointment with ID {} not found", id)))?;

        if existing.cancelled {
            return Err(BookingError::InvalidState(
                "Cannot edit a cancelled appointment".to_string(),
            ));
        }

        if let Some(start) = patch.start_time {
            let day = start.date_naive();
            if !self.calendar.is_business_day(day) {
                return Err(BookingError::InvalidDay(day));
            }
            if start != existing.start_time {
                self.reject_past(start)?;
            }
        }

        let updated = self.store.update(id, &patch).await?;
        info!(
            "Appointment {} edited by {} (start {})",
            updated.id, ctx.actor, updated.start_time
        );
        Ok(updated)
    }

    /// Cancels an appointment. Repeating the call returns the same record.
    pub async fn cancel(&self, ctx: &RequestContext, id: Uuid) -> BookingResult<Appointment> {
        let cancelled = self.store.cancel(id).await?;
        info!("Appointment {} cancelled by {}", cancelled.id, ctx.actor);
        Ok(cancelled)
    }

    /// Case-insensitive search over name, email, phone and reason.
    ///
    /// A blank query returns nothing without reaching the store.
    pub async fn search(
        &self,
        ctx: &RequestContext,
        text: &str,
        on_date: Option<NaiveDate>,
    ) -> BookingResult<Vec<Appointment>> {
        let query = SearchQuery {
            text: text.to_string(),
            on_date,
            include_cancelled: true,
        };
        if query.is_blank() {
            return Ok(Vec::new());
        }

        debug!("Search by {} for '{}'", ctx.actor, query.text.trim());
        self.store.search(&query).await
    }

    pub async fn list(&self, _ctx: &RequestContext, include_cancelled: bool) -> BookingResult<Vec<Appointment>> {
        self.store.list_all(include_cancelled).await
    }

    fn reject_past(&self, start: DateTime<Utc>) -> BookingResult<()> {
        if !self.allow_past && start < self.clock.now() {
            return Err(BookingError::Validation(format!(
                "Cannot book a time in the past ({})",
                start
            )));
        }
        Ok(())
    }
}
