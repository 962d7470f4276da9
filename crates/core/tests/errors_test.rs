use std::error::Error;

use chrono::{NaiveDate, TimeZone, Utc};
use slotbook_core::errors::{BookingError, BookingErrorKind, BookingResult};

#[test]
fn test_booking_error_display() {
    let not_found = BookingError::NotFound("Appointment not found".to_string());
    let validation = BookingError::Validation("Invalid input".to_string());
    let conflict = BookingError::SlotConflict(Utc.with_ymd_and_hms(2025, 2, 10, 9, 0, 0).unwrap());
    let invalid_day = BookingError::InvalidDay(NaiveDate::from_ymd_opt(2025, 2, 15).unwrap());
    let invalid_week = BookingError::InvalidWeekStart(NaiveDate::from_ymd_opt(2025, 2, 12).unwrap());
    let database = BookingError::Database(eyre::eyre!("Database connection failed"));
    let internal = BookingError::Internal(Box::new(std::io::Error::other("Internal error")));

    assert_eq!(
        not_found.to_string(),
        "Resource not found: Appointment not found"
    );
    assert_eq!(validation.to_string(), "Validation error: Invalid input");
    assert_eq!(
        conflict.to_string(),
        "Slot already booked: 2025-02-10 09:00:00 UTC"
    );
    assert!(invalid_day.to_string().contains("2025-02-15"));
    assert!(invalid_week.to_string().contains("Monday"));
    assert!(database.to_string().contains("Database error:"));
    assert!(internal.to_string().contains("Internal server error:"));
}

#[test]
fn test_error_kind_mapping() {
    let cases = [
        (BookingError::Validation(String::new()), BookingErrorKind::Validation),
        (
            BookingError::SlotConflict(Utc::now()),
            BookingErrorKind::SlotConflict,
        ),
        (BookingError::InvalidState(String::new()), BookingErrorKind::InvalidState),
        (
            BookingError::AmbiguousBooking(Utc::now()),
            BookingErrorKind::AmbiguousBooking,
        ),
        (BookingError::NotFound(String::new()), BookingErrorKind::NotFound),
    ];

    for (error, kind) in cases {
        assert_eq!(error.kind(), kind);
    }
}

#[test]
fn test_occurrence_failures() {
    assert!(BookingError::Validation(String::new()).is_occurrence_failure());
    assert!(BookingError::SlotConflict(Utc::now()).is_occurrence_failure());
    assert!(!BookingError::Database(eyre::eyre!("down")).is_occurrence_failure());
    assert!(!BookingError::AmbiguousBooking(Utc::now()).is_occurrence_failure());
}

#[test]
fn test_error_kind_serializes_snake_case() {
    let json = serde_json::to_string(&BookingErrorKind::SlotConflict).unwrap();
    assert_eq!(json, "\"slot_conflict\"");
}

#[test]
fn test_error_source() {
    let io_error = std::io::Error::other("IO error");
    let booking_error = BookingError::Internal(Box::new(io_error));

    assert!(booking_error.source().is_some());
}

#[test]
fn test_booking_result() {
    let result: BookingResult<i32> = Ok(42);
    assert_eq!(result.unwrap(), 42);

    let result: BookingResult<i32> = Err(BookingError::NotFound("Not found".to_string()));
    assert!(result.is_err());
}
