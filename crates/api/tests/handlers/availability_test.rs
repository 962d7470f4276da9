use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::Value;

use crate::test_utils::{TestContext, auth, booking};

#[tokio::test]
async fn test_empty_week_lists_eighty_slots() {
    let ctx = TestContext::new();
    let (name, value) = auth();

    let response = ctx
        .server
        .get("/api/appointments/available")
        .add_query_param("start_date", "2025-02-10")
        .add_header(name, value)
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["week_start"], "2025-02-10");
    assert_eq!(body["available_slots"].as_array().unwrap().len(), 80);
    assert_eq!(body["booked_slots"].as_array().unwrap().len(), 0);
    assert_eq!(body["available_slots"][0]["start_time"], "09:00:00");
}

#[tokio::test]
async fn test_booked_slot_moves_out_of_available() {
    let ctx = TestContext::new();
    let (name, value) = auth();

    ctx.server
        .post("/api/appointments")
        .add_header(name.clone(), value.clone())
        .json(&booking("Alice", "2025-02-10T09:00:00Z"))
        .await
        .assert_status(StatusCode::CREATED);

    let response = ctx
        .server
        .get("/api/appointments/available")
        .add_query_param("start_date", "2025-02-10")
        .add_header(name, value)
        .await;

    let body: Value = response.json();
    assert_eq!(body["available_slots"].as_array().unwrap().len(), 79);
    assert_eq!(body["booked_slots"][0]["name"], "Alice");
    assert_eq!(body["booked_slots"][0]["owner_ref"], "front-desk");
}

#[tokio::test]
async fn test_default_week_is_current_week() {
    let ctx = TestContext::new();
    let (name, value) = auth();

    let response = ctx
        .server
        .get("/api/appointments/available")
        .add_header(name, value)
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["week_start"], "2025-02-03");
}

#[tokio::test]
async fn test_non_monday_is_rejected() {
    let ctx = TestContext::new();
    let (name, value) = auth();

    let response = ctx
        .server
        .get("/api/appointments/available")
        .add_query_param("start_date", "2025-02-11")
        .add_header(name, value)
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["kind"], "invalid_week_start");
}

#[tokio::test]
async fn test_malformed_date_is_rejected() {
    let ctx = TestContext::new();
    let (name, value) = auth();

    let response = ctx
        .server
        .get("/api/appointments/available")
        .add_query_param("start_date", "10/02/2025")
        .add_header(name, value)
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["kind"], "validation");
}

#[tokio::test]
async fn test_far_future_week_is_rejected() {
    let ctx = TestContext::new();
    let (name, value) = auth();

    let response = ctx
        .server
        .get("/api/appointments/available")
        .add_query_param("start_date", "+262142-12-31")
        .add_header(name, value)
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["kind"], "validation");
}
