use axum::http::{HeaderValue, StatusCode, header::AUTHORIZATION};
use chrono::{NaiveDate, TimeZone, Utc};
use rstest::rstest;
use serde_json::Value;
use slotbook_api::middleware::error_handling::map_error;
use slotbook_core::errors::BookingError;

use crate::test_utils::TestContext;

fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 2, 15).unwrap()
}

#[rstest]
#[case(BookingError::Validation("bad".into()), StatusCode::BAD_REQUEST)]
#[case(BookingError::InvalidDay(day()), StatusCode::BAD_REQUEST)]
#[case(BookingError::InvalidWeekStart(day()), StatusCode::BAD_REQUEST)]
#[case(BookingError::Authentication("no".into()), StatusCode::UNAUTHORIZED)]
#[case(BookingError::NotFound("gone".into()), StatusCode::NOT_FOUND)]
#[case(
    BookingError::SlotConflict(Utc.with_ymd_and_hms(2025, 2, 10, 9, 0, 0).unwrap()),
    StatusCode::CONFLICT
)]
#[case(BookingError::InvalidState("cancelled".into()), StatusCode::CONFLICT)]
#[case(BookingError::Database(eyre::eyre!("down")), StatusCode::INTERNAL_SERVER_ERROR)]
fn test_error_status_mapping(#[case] error: BookingError, #[case] expected: StatusCode) {
    assert_eq!(map_error(error).status(), expected);
}

#[tokio::test]
async fn test_missing_credential_is_unauthorized() {
    let ctx = TestContext::new();

    let response = ctx.server.get("/api/appointments").await;

    response.assert_status(StatusCode::UNAUTHORIZED);
    let body: Value = response.json();
    assert_eq!(body["kind"], "authentication");
}

#[tokio::test]
async fn test_unknown_credential_is_unauthorized() {
    let ctx = TestContext::new();

    ctx.server
        .get("/api/appointments")
        .add_header(AUTHORIZATION, HeaderValue::from_static("Bearer guessed"))
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_health_needs_no_credential() {
    let ctx = TestContext::new();

    let response = ctx.server.get("/health").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["status"], "ok");
}
