use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::calendar::BusinessCalendar;
use crate::errors::{BookingError, BookingResult};
use crate::models::{
    actor::ActorRef,
    appointment::{Appointment, AppointmentDraft, AppointmentPatch, SearchQuery},
};
use crate::store::{AppointmentStore, sort_search_results};

#[derive(Debug, Default)]
struct Records {
    appointments: HashMap<Uuid, Appointment>,
    /// start time -> id of the active appointment holding that slot
    active_slots: HashMap<DateTime<Utc>, Uuid>,
}

impl Records {
    fn holder_of(&self, start: DateTime<Utc>) -> Option<Uuid> {
        self.active_slots.get(&start).copied()
    }
}

/// Process-local store.
///
/// Writes hold the write lock across check and commit, which makes the slot
/// index a unique key. Reads clone under the read lock.
#[derive(Debug, Default)]
pub struct InMemoryAppointmentStore {
    calendar: BusinessCalendar,
    records: RwLock<Records>,
}

impl InMemoryAppointmentStore {
    pub fn new(calendar: BusinessCalendar) -> Self {
        Self {
            calendar,
            records: RwLock::new(Records::default()),
        }
    }
}

#[async_trait]
impl AppointmentStore for InMemoryAppointmentStore {
    async fn insert(
        &self,
        draft: &AppointmentDraft,
        owner: &ActorRef,
        created_at: DateTime<Utc>,
    ) -> BookingResult<Appointment> {
        let draft = draft.clone().normalized();
        draft.validate(&self.calendar)?;

        let mut records = self.records.write().await;
        if records.holder_of(draft.start_time).is_some() {
            return Err(BookingError::SlotConflict(draft.start_time));
        }

        let appointment = Appointment::from_draft(draft, owner.clone(), created_at);
        debug!(
            "Inserting appointment: id={}, start={}",
            appointment.id, appointment.start_time
        );
        records
            .active_slots
            .insert(appointment.start_time, appointment.id);
        records
            .appointments
            .insert(appointment.id, appointment.clone());

        Ok(appointment)
    }

    async fn get(&self, id: Uuid) -> BookingResult<Option<Appointment>> {
        Ok(self.records.read().await.appointments.get(&id).cloned())
    }

    async fn update(&self, id: Uuid, patch: &AppointmentPatch) -> BookingResult<Appointment> {
        let mut records = self.records.write().await;
        let current = records
            .appointments
            .get(&id)
            .ok_or_else(|| BookingError::NotFound(format!("Appointment with ID {} not found", id)))?;

        if current.cancelled {
            return Err(BookingError::InvalidState(
                "Cannot edit a cancelled appointment".to_string(),
            ));
        }

        let next = current.patched(patch, &self.calendar);
        next.validate(&self.calendar)?;

        if let Some(holder) = records.holder_of(next.start_time) {
            if holder != id {
                return Err(BookingError::SlotConflict(next.start_time));
            }
        }

        let previous_start = current.start_time;
        debug!(
            "Updating appointment: id={}, start {} -> {}",
            id, previous_start, next.start_time
        );
        records.active_slots.remove(&previous_start);
        records.active_slots.insert(next.start_time, id);
        records.appointments.insert(id, next.clone());

        Ok(next)
    }

    async fn cancel(&self, id: Uuid) -> BookingResult<Appointment> {
        let mut records = self.records.write().await;
        let appointment = records
            .appointments
            .get_mut(&id)
            .ok_or_else(|| BookingError::NotFound(format!("Appointment with ID {} not found", id)))?;

        if appointment.cancelled {
            return Ok(appointment.clone());
        }

        appointment.cancelled = true;
        let cancelled = appointment.clone();
        records.active_slots.remove(&cancelled.start_time);
        debug!("Cancelled appointment: id={}", id);

        Ok(cancelled)
    }

    async fn search(&self, query: &SearchQuery) -> BookingResult<Vec<Appointment>> {
        if query.is_blank() {
            return Ok(Vec::new());
        }
        let needle = query.needle();

        let records = self.records.read().await;
        let mut results: Vec<Appointment> = records
            .appointments
            .values()
            .filter(|a| query.include_cancelled || !a.cancelled)
            .filter(|a| query.on_date.is_none_or(|day| a.start_time.date_naive() == day))
            .filter(|a| a.matches_text(&needle))
            .cloned()
            .collect();
        drop(records);

        sort_search_results(&mut results);
        Ok(results)
    }

    async fn list_range(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
        include_cancelled: bool,
    ) -> BookingResult<Vec<Appointment>> {
        let records = self.records.read().await;
        let mut results: Vec<Appointment> = records
            .appointments
            .values()
            .filter(|a| include_cancelled || !a.cancelled)
            .filter(|a| a.start_time >= from && a.start_time < to)
            .cloned()
            .collect();
        drop(records);

        results.sort_by_key(|a| (a.start_time, a.cancelled));
        Ok(results)
    }

    async fn list_all(&self, include_cancelled: bool) -> BookingResult<Vec<Appointment>> {
        let records = self.records.read().await;
        let mut results: Vec<Appointment> = records
            .appointments
            .values()
            .filter(|a| include_cancelled || !a.cancelled)
            .cloned()
            .collect();
        drop(records);

        results.sort_by_key(|a| (a.start_time, a.cancelled));
        Ok(results)
    }
}
