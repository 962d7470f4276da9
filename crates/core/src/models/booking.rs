use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::errors::{BookingError, BookingErrorKind};
use crate::models::{appointment::Appointment, slot::Slot};

/// Free slots and the bookings that occupy the taken ones.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Availability {
    pub available: Vec<Slot>,
    pub booked: BTreeMap<DateTime<Utc>, Appointment>,
}

/// Outcome of one occurrence of a (possibly recurring) create request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OccurrenceResult {
    /// 1-based position in the recurrence.
    pub occurrence: usize,
    pub start_time: DateTime<Utc>,
    #[serde(flatten)]
    pub status: OccurrenceStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum OccurrenceStatus {
    Created { appointment: Appointment },
    Failed { error: BookingErrorKind, reason: String },
}

impl OccurrenceStatus {
    pub fn failed(err: &BookingError) -> Self {
        OccurrenceStatus::Failed {
            error: err.kind(),
            reason: err.to_string(),
        }
    }
}

/// Per-occurrence report of a create request. Created occurrences stay
/// committed even when later ones fail.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CreateOutcome {
    pub occurrences: Vec<OccurrenceResult>,
}

impl CreateOutcome {
    pub fn created(&self) -> impl Iterator<Item = &Appointment> {
        self.occurrences.iter().filter_map(|o| match &o.status {
            OccurrenceStatus::Created { appointment } => Some(appointment),
            OccurrenceStatus::Failed { .. } => None,
        })
    }

    pub fn failures(&self) -> impl Iterator<Item = &OccurrenceResult> {
        self.occurrences
            .iter()
            .filter(|o| matches!(o.status, OccurrenceStatus::Failed { .. }))
    }

    pub fn is_complete(&self) -> bool {
        self.failures().next().is_none()
    }
}
