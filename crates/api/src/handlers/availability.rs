//! # Availability Handlers
//!
//! Weekly availability for the booking page: every free 30 minute slot of a
//! Monday-to-Friday week, plus the active appointments occupying the rest.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use slotbook_core::{
    calendar::{monday_of, parse_date},
    models::{appointment::Appointment, slot::Slot},
};

use crate::{
    ApiState,
    middleware::{auth::Authenticated, error_handling::AppError},
};

/// Query parameters for the availability endpoint
#[derive(Debug, Deserialize)]
pub struct AvailabilityQuery {
    /// Monday of the requested week (`YYYY-MM-DD`); defaults to the current week
    pub start_date: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AvailabilityResponse {
    pub week_start: NaiveDate,
    pub available_slots: Vec<Slot>,
    /// Active appointments of the week, ordered by start time
    pub booked_slots: Vec<Appointment>,
}

/// Lists free and booked slots of one week
///
/// # Endpoint
///
/// ```text
/// GET /api/appointments/available?start_date=2025-02-10
/// ```
///
/// # Errors
///
/// * `BookingError::Validation` - `start_date` is not a date
/// * `BookingError::InvalidWeekStart` - `start_date` is not a Monday
pub async fn get_availability(
    State(state): State<Arc<ApiState>>,
    Authenticated(ctx): Authenticated,
    query: Result<Query<AvailabilityQuery>, QueryRejection>,
) -> Result<Json<AvailabilityResponse>, AppError> {
    let Query(query) = query?;

    let week_start = match query.start_date.as_deref().filter(|s| !s.trim().is_empty()) {
        Some(raw) => parse_date(raw)?,
        None => monday_of(state.service.now().date_naive()),
    };

    let availability = state.service.availability(&ctx, week_start).await?;

    Ok(Json(AvailabilityResponse {
        week_start,
        available_slots: availability.available,
        booked_slots: availability.booked.into_values().collect(),
    }))
}
