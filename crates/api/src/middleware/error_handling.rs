//! # Error Handling Middleware
//!
//! This module provides a standardized way to handle errors in the SlotBook API.
//! It maps booking errors to appropriate HTTP status codes and JSON
//! error responses, so every endpoint fails the same way.
//!
//! Every error body has the shape:
//!
//! ```json
//! { "error": "Slot already booked: 2025-02-10 09:00:00 UTC", "kind": "slot_conflict" }
//! ```

use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use slotbook_core::errors::{BookingError, BookingErrorKind};
use tracing::error;

/// Application error wrapper that provides HTTP status code mapping
///
/// `AppError` wraps a `BookingError` and implements `IntoResponse` so
/// handlers can return `Result<_, AppError>` and use `?` on service calls.
///
/// # Example
///
/// ```
/// use axum::Json;
/// use slotbook_api::middleware::error_handling::AppError;
/// use slotbook_core::errors::BookingError;
///
/// async fn handler(name: String) -> Result<Json<String>, AppError> {
///     if name.trim().is_empty() {
///         return Err(AppError(BookingError::Validation("name is required".to_string())));
///     }
///     Ok(Json(name))
/// }
/// # fn main() {}
/// ```
#[derive(Debug)]
pub struct AppError(pub BookingError);

/// HTTP status used for each kind of booking error.
pub fn status_for(kind: BookingErrorKind) -> StatusCode {
    match kind {
        BookingErrorKind::Validation
        | BookingErrorKind::InvalidDay
        | BookingErrorKind::InvalidWeekStart => StatusCode::BAD_REQUEST,
        BookingErrorKind::Authentication => StatusCode::UNAUTHORIZED,
        BookingErrorKind::NotFound => StatusCode::NOT_FOUND,
        BookingErrorKind::SlotConflict | BookingErrorKind::InvalidState => StatusCode::CONFLICT,
        BookingErrorKind::AmbiguousBooking
        | BookingErrorKind::Database
        | BookingErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let kind = self.0.kind();
        let status = status_for(kind);

        // Server-side failures are logged with detail and reported generically
        let message = if status.is_server_error() {
            error!("Request failed: {:?}", self.0);
            match kind {
                BookingErrorKind::AmbiguousBooking => self.0.to_string(),
                _ => "Internal server error".to_string(),
            }
        } else {
            self.0.to_string()
        };

        let body = Json(json!({ "error": message, "kind": kind }));
        (status, body).into_response()
    }
}

/// Allows `?` on `BookingResult` inside handlers.
impl From<BookingError> for AppError {
    fn from(err: BookingError) -> Self {
        AppError(err)
    }
}

/// Wraps infrastructure failures reported through eyre.
impl From<eyre::Report> for AppError {
    fn from(err: eyre::Report) -> Self {
        AppError(BookingError::Database(err))
    }
}

/// Malformed JSON bodies are validation failures.
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError(BookingError::Validation(rejection.body_text()))
    }
}

/// Malformed query strings are validation failures.
impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError(BookingError::Validation(rejection.body_text()))
    }
}

/// An unparsable appointment id cannot name an existing appointment.
impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError(BookingError::NotFound(rejection.body_text()))
    }
}

/// Maps a BookingError directly to an HTTP response
pub fn map_error(err: BookingError) -> Response {
    AppError(err).into_response()
}
