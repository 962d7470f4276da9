//! # Appointment Handlers
//!
//! Create, edit, cancel, list and search appointments.
//!
//! Creating with `repeat = n` books the same slot on `n` further weeks. Each
//! occurrence succeeds or fails on its own; the response lists every
//! occurrence with its outcome.

use std::sync::Arc;

use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::json;
use slotbook_core::{
    calendar::{parse_date, parse_instant},
    errors::{BookingError, BookingResult},
    models::{
        appointment::{Appointment, AppointmentDraft, AppointmentPatch},
        booking::{CreateOutcome, OccurrenceStatus},
    },
};
use tracing::debug;
use uuid::Uuid;

use crate::{
    ApiState,
    middleware::{
        auth::Authenticated,
        error_handling::{AppError, status_for},
    },
};

/// Request body for creating one or more weekly appointments
#[derive(Debug, Deserialize)]
pub struct CreateAppointmentRequest {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub reason: Option<String>,
    pub start_time: String,
    /// Defaults to `start_time` plus one slot
    #[serde(default)]
    pub end_time: Option<String>,
    /// Number of additional weekly occurrences (0 to 4)
    #[serde(default)]
    pub repeat: Option<serde_json::Number>,
}

impl CreateAppointmentRequest {
    /// Splits the request into the draft of the first occurrence and the
    /// repeat count.
    pub fn into_draft(self, slot_length: chrono::Duration) -> BookingResult<(AppointmentDraft, i64)> {
        let start_time = parse_instant(&self.start_time)?;
        let end_time = match self.end_time.as_deref().filter(|s| !s.trim().is_empty()) {
            Some(raw) => parse_instant(raw)?,
            None => start_time.checked_add_signed(slot_length).ok_or_else(|| {
                BookingError::Validation(format!("Invalid start time {}", start_time))
            })?,
        };

        let repeat = match self.repeat {
            None => 0,
            Some(number) => number.as_i64().ok_or_else(|| {
                BookingError::Validation(format!("Repeat must be a whole number, got {}", number))
            })?,
        };

        let draft = AppointmentDraft {
            name: self.name,
            email: self.email,
            phone: self.phone,
            reason: self.reason,
            start_time,
            end_time,
        };
        Ok((draft, repeat))
    }
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
    /// Restricts matches to one day (`YYYY-MM-DD`)
    pub date: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ListParams {
    #[serde(default)]
    pub include_cancelled: bool,
}

/// Builds the response for a create request.
///
/// * every occurrence created: `201 Created`
/// * a single occurrence that failed: that error's status
/// * otherwise, when anything failed: `207 Multi-Status`
pub fn create_response(outcome: CreateOutcome) -> Response {
    if outcome.is_complete() {
        return (StatusCode::CREATED, Json(outcome)).into_response();
    }

    if let [only] = outcome.occurrences.as_slice() {
        if let OccurrenceStatus::Failed { error, reason } = &only.status {
            let body = Json(json!({ "error": reason, "kind": error }));
            return (status_for(*error), body).into_response();
        }
    }

    (StatusCode::MULTI_STATUS, Json(outcome)).into_response()
}

/// Creates an appointment and its weekly repeats
///
/// # Endpoint
///
/// ```text
/// POST /api/appointments
/// ```
pub async fn create_appointment(
    State(state): State<Arc<ApiState>>,
    Authenticated(ctx): Authenticated,
    body: Result<Json<CreateAppointmentRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(request) = body?;
    let (draft, repeat) = request.into_draft(state.service.calendar().slot_length())?;

    let outcome = state.service.create(&ctx, draft, repeat).await?;
    debug!(
        "Create request by {}: {} of {} occurrences booked",
        ctx.actor,
        outcome.created().count(),
        outcome.occurrences.len()
    );

    Ok(create_response(outcome))
}

/// Edits an active appointment
///
/// # Endpoint
///
/// ```text
/// PATCH /api/appointments/:id
/// ```
pub async fn edit_appointment(
    State(state): State<Arc<ApiState>>,
    Authenticated(ctx): Authenticated,
    id: Result<Path<Uuid>, PathRejection>,
    body: Result<Json<AppointmentPatch>, JsonRejection>,
) -> Result<Json<Appointment>, AppError> {
    let Path(id) = id?;
    let Json(patch) = body?;

    let appointment = state.service.edit(&ctx, id, patch).await?;
    Ok(Json(appointment))
}

/// Cancels an appointment; cancelling twice returns the same record
///
/// # Endpoint
///
/// ```text
/// DELETE /api/appointments/:id
/// ```
pub async fn cancel_appointment(
    State(state): State<Arc<ApiState>>,
    Authenticated(ctx): Authenticated,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<Appointment>, AppError> {
    let Path(id) = id?;
    let appointment = state.service.cancel(&ctx, id).await?;
    Ok(Json(appointment))
}

/// Free-text search over name, email, phone and reason, cancelled included
///
/// # Endpoint
///
/// ```text
/// GET /api/appointments/search?q=alice&date=2025-02-10
/// ```
pub async fn search_appointments(
    State(state): State<Arc<ApiState>>,
    Authenticated(ctx): Authenticated,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> Result<Json<Vec<Appointment>>, AppError> {
    let Query(params) = params?;
    let on_date = params
        .date
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .map(parse_date)
        .transpose()?;

    let results = state.service.search(&ctx, &params.q, on_date).await?;
    Ok(Json(results))
}

/// Lists appointments ordered by start time
///
/// # Endpoint
///
/// ```text
/// GET /api/appointments?include_cancelled=true
/// ```
pub async fn list_appointments(
    State(state): State<Arc<ApiState>>,
    Authenticated(ctx): Authenticated,
    params: Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<Vec<Appointment>>, AppError> {
    let Query(params) = params?;
    let appointments = state.service.list(&ctx, params.include_cancelled).await?;
    Ok(Json(appointments))
}
