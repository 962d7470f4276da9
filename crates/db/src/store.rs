//! PostgreSQL implementation of [`AppointmentStore`].
//!
//! The partial unique index `idx_appointments_active_slot` is the commit-time
//! guarantee that a slot holds at most one active appointment; a unique
//! violation from any write is reported as `SlotConflict`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use slotbook_core::{
    calendar::BusinessCalendar,
    errors::{BookingError, BookingResult},
    models::{
        actor::ActorRef,
        appointment::{Appointment, AppointmentDraft, AppointmentPatch, SearchQuery},
    },
    store::AppointmentStore,
};
use uuid::Uuid;

use crate::{DbPool, repositories::appointment as repo};

const UNIQUE_VIOLATION: &str = "23505";
const CHECK_VIOLATION: &str = "23514";

#[derive(Debug, Clone)]
pub struct PgAppointmentStore {
    pool: DbPool,
    calendar: BusinessCalendar,
}

impl PgAppointmentStore {
    pub fn new(pool: DbPool, calendar: BusinessCalendar) -> Self {
        Self { pool, calendar }
    }
}

/// Maps a failed write to a domain error, recognizing constraint violations.
fn write_error(report: eyre::Report, start: DateTime<Utc>) -> BookingError {
    let code = report
        .downcast_ref::<sqlx::Error>()
        .and_then(|err| err.as_database_error())
        .and_then(|db| db.code().map(|c| c.into_owned()));

    match code.as_deref() {
        Some(UNIQUE_VIOLATION) => BookingError::SlotConflict(start),
        Some(CHECK_VIOLATION) => {
            BookingError::Validation("Appointment violates the slot constraints".to_string())
        }
        _ => BookingError::Database(report),
    }
}

fn not_found(id: Uuid) -> BookingError {
    BookingError::NotFound(format!("Appointment with ID {} not found", id))
}

fn into_appointments(rows: Vec<crate::models::DbAppointment>) -> Vec<Appointment> {
    rows.into_iter().map(Appointment::from).collect()
}

#[async_trait]
impl AppointmentStore for PgAppointmentStore {
    async fn insert(
        &self,
        draft: &AppointmentDraft,
        owner: &ActorRef,
        created_at: DateTime<Utc>,
    ) -> BookingResult<Appointment> {
        let draft = draft.clone().normalized();
        draft.validate(&self.calendar)?;

        let appointment = Appointment::from_draft(draft, owner.clone(), created_at);
        let row = repo::insert_appointment(&self.pool, &appointment)
            .await
            .map_err(|e| write_error(e, appointment.start_time))?;

        Ok(row.into())
    }

    async fn get(&self, id: Uuid) -> BookingResult<Option<Appointment>> {
        let row = repo::get_appointment_by_id(&self.pool, id).await?;
        Ok(row.map(Appointment::from))
    }

    async fn update(&self, id: Uuid, patch: &AppointmentPatch) -> BookingResult<Appointment> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| BookingError::Database(e.into()))?;

        let current: Appointment = repo::lock_appointment(&mut *tx, id)
            .await?
            .ok_or_else(|| not_found(id))?
            .into();

        if current.cancelled {
            return Err(BookingError::InvalidState(
                "Cannot edit a cancelled appointment".to_string(),
            ));
        }

        let next = current.patched(patch, &self.calendar);
        next.validate(&self.calendar)?;

        let row = repo::update_appointment(&mut *tx, &next)
            .await
            .map_err(|e| write_error(e, next.start_time))?;
        tx.commit()
            .await
            .map_err(|e| write_error(e.into(), next.start_time))?;

        Ok(row.into())
    }

    async fn cancel(&self, id: Uuid) -> BookingResult<Appointment> {
        let row = repo::cancel_appointment(&self.pool, id)
            .await?
            .ok_or_else(|| not_found(id))?;
        Ok(row.into())
    }

    async fn search(&self, query: &SearchQuery) -> BookingResult<Vec<Appointment>> {
        if query.is_blank() {
            return Ok(Vec::new());
        }

        let rows = repo::search_appointments(
            &self.pool,
            query.text.trim(),
            query.on_date,
            query.include_cancelled,
        )
        .await?;
        Ok(into_appointments(rows))
    }

    async fn list_range(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
        include_cancelled: bool,
    ) -> BookingResult<Vec<Appointment>> {
        let rows = repo::list_appointments_in_range(&self.pool, from, to, include_cancelled).await?;
        Ok(into_appointments(rows))
    }

    async fn list_all(&self, include_cancelled: bool) -> BookingResult<Vec<Appointment>> {
        let rows = repo::list_appointments(&self.pool, include_cancelled).await?;
        Ok(into_appointments(rows))
    }
}
