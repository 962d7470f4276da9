use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BookingError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Slot already booked: {0}")]
    SlotConflict(DateTime<Utc>),

    #[error("Appointments cannot be booked on {0} (weekend)")]
    InvalidDay(NaiveDate),

    #[error("Week must start on a Monday, got {0}")]
    InvalidWeekStart(NaiveDate),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Ambiguous booking: more than one active appointment at {0}")]
    AmbiguousBooking(DateTime<Utc>),

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Database error: {0}")]
    Database(#[from] eyre::Report),

    #[error("Internal server error: {0}")]
    Internal(#[from] Box<dyn std::error::Error + Send + Sync>),
}

/// Serializable discriminant of [`BookingError`], used where an error has to
/// travel inside a response body (per-occurrence failures).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingErrorKind {
    Validation,
    SlotConflict,
    InvalidDay,
    InvalidWeekStart,
    NotFound,
    InvalidState,
    AmbiguousBooking,
    Authentication,
    Database,
    Internal,
}

impl BookingError {
    pub fn kind(&self) -> BookingErrorKind {
        match self {
            BookingError::Validation(_) => BookingErrorKind::Validation,
            BookingError::SlotConflict(_) => BookingErrorKind::SlotConflict,
            BookingError::InvalidDay(_) => BookingErrorKind::InvalidDay,
            BookingError::InvalidWeekStart(_) => BookingErrorKind::InvalidWeekStart,
            BookingError::NotFound(_) => BookingErrorKind::NotFound,
            BookingError::InvalidState(_) => BookingErrorKind::InvalidState,
            BookingError::AmbiguousBooking(_) => BookingErrorKind::AmbiguousBooking,
            BookingError::Authentication(_) => BookingErrorKind::Authentication,
            BookingError::Database(_) => BookingErrorKind::Database,
            BookingError::Internal(_) => BookingErrorKind::Internal,
        }
    }

    /// Errors that belong to a single occurrence of a recurring booking and
    /// should be reported for that occurrence instead of aborting the batch.
    pub fn is_occurrence_failure(&self) -> bool {
        matches!(
            self,
            BookingError::Validation(_) | BookingError::SlotConflict(_) | BookingError::InvalidDay(_)
        )
    }
}

pub type BookingResult<T> = Result<T, BookingError>;
