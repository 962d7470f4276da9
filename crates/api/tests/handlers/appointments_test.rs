use std::sync::Arc;

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use slotbook_core::errors::BookingError;
use slotbook_db::mock::repositories::MockAppointmentRepo;

use crate::test_utils::{TestContext, auth, booking};

async fn create(ctx: &TestContext, body: &Value) -> axum_test::TestResponse {
    let (name, value) = auth();
    ctx.server
        .post("/api/appointments")
        .add_header(name, value)
        .json(body)
        .await
}

fn created_id(body: &Value) -> String {
    body["occurrences"][0]["appointment"]["id"]
        .as_str()
        .unwrap()
        .to_string()
}

#[tokio::test]
async fn test_create_then_conflict() {
    let ctx = TestContext::new();

    let response = create(&ctx, &booking("Alice", "2025-02-10T09:00:00Z")).await;
    response.assert_status(StatusCode::CREATED);
    let body: Value = response.json();
    assert_eq!(body["occurrences"][0]["status"], "created");
    assert_eq!(
        body["occurrences"][0]["appointment"]["end_time"],
        "2025-02-10T09:30:00Z"
    );

    let response = create(&ctx, &booking("Bob", "2025-02-10T09:00:00Z")).await;
    response.assert_status(StatusCode::CONFLICT);
    let body: Value = response.json();
    assert_eq!(body["kind"], "slot_conflict");
}

#[test_log::test(tokio::test)]
async fn test_recurring_create_reports_partial_success() {
    let ctx = TestContext::new();

    // Third occurrence of the series
    create(&ctx, &booking("Bob", "2025-02-24T10:00:00Z"))
        .await
        .assert_status(StatusCode::CREATED);

    let mut body = booking("Alice", "2025-02-10T10:00:00Z");
    body["repeat"] = json!(4);
    let response = create(&ctx, &body).await;

    response.assert_status(StatusCode::MULTI_STATUS);
    let body: Value = response.json();
    let statuses: Vec<&str> = body["occurrences"]
        .as_array()
        .unwrap()
        .iter()
        .map(|o| o["status"].as_str().unwrap())
        .collect();
    assert_eq!(
        statuses,
        vec!["created", "created", "failed", "created", "created"]
    );
    assert_eq!(body["occurrences"][2]["error"], "slot_conflict");
    assert_eq!(body["occurrences"][2]["occurrence"], 3);
}

#[tokio::test]
async fn test_invalid_repeat_values() {
    let ctx = TestContext::new();

    for repeat in [json!(5), json!(-1), json!(1.5)] {
        let mut body = booking("Alice", "2025-02-10T10:00:00Z");
        body["repeat"] = repeat;
        let response = create(&ctx, &body).await;
        response.assert_status(StatusCode::BAD_REQUEST);
    }
}

#[tokio::test]
async fn test_create_rejects_bad_input() {
    let ctx = TestContext::new();

    // Off the 30 minute grid
    create(&ctx, &booking("Alice", "2025-02-10T09:15:00Z"))
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    // Before the clock
    create(&ctx, &booking("Alice", "2025-02-03T09:00:00Z"))
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    // Beyond the supported calendar
    create(&ctx, &booking("Alice", "+262142-12-31T23:45"))
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    let mut body = booking("Alice", "2025-02-10T09:00:00Z");
    body["email"] = json!("not-an-email");
    create(&ctx, &body)
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_edit_moves_and_recomputes_end() {
    let ctx = TestContext::new();
    let (name, value) = auth();

    let body: Value = create(&ctx, &booking("Alice", "2025-02-10T09:00:00Z")).await.json();
    let id = created_id(&body);

    let response = ctx
        .server
        .patch(&format!("/api/appointments/{}", id))
        .add_header(name, value)
        .json(&json!({ "start_time": "2025-02-11T14:00:00Z", "reason": "Moved" }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["start_time"], "2025-02-11T14:00:00Z");
    assert_eq!(body["end_time"], "2025-02-11T14:30:00Z");
    assert_eq!(body["reason"], "Moved");
}

#[tokio::test]
async fn test_edit_to_weekend_is_invalid_day() {
    let ctx = TestContext::new();
    let (name, value) = auth();

    let body: Value = create(&ctx, &booking("Alice", "2025-02-10T09:00:00Z")).await.json();
    let id = created_id(&body);

    let response = ctx
        .server
        .patch(&format!("/api/appointments/{}", id))
        .add_header(name, value)
        .json(&json!({ "start_time": "2025-02-15T10:00:00Z" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["kind"], "invalid_day");
}

#[tokio::test]
async fn test_cancel_is_idempotent_and_blocks_edit() {
    let ctx = TestContext::new();
    let (name, value) = auth();

    let body: Value = create(&ctx, &booking("Alice", "2025-02-10T09:00:00Z")).await.json();
    let id = created_id(&body);
    let path = format!("/api/appointments/{}", id);

    let first: Value = ctx
        .server
        .delete(&path)
        .add_header(name.clone(), value.clone())
        .await
        .json();
    let second: Value = ctx
        .server
        .delete(&path)
        .add_header(name.clone(), value.clone())
        .await
        .json();
    assert_eq!(first["cancelled"], true);
    assert_eq!(first, second);

    ctx.server
        .patch(&path)
        .add_header(name, value)
        .json(&json!({ "name": "Alicia" }))
        .await
        .assert_status(StatusCode::CONFLICT);

    // The slot is free again
    create(&ctx, &booking("Bob", "2025-02-10T09:00:00Z"))
        .await
        .assert_status(StatusCode::CREATED);
}

#[tokio::test]
async fn test_unknown_ids() {
    let ctx = TestContext::new();
    let (name, value) = auth();

    ctx.server
        .delete("/api/appointments/00000000-0000-0000-0000-000000000000")
        .add_header(name.clone(), value.clone())
        .await
        .assert_status(StatusCode::NOT_FOUND);

    ctx.server
        .delete("/api/appointments/not-a-uuid")
        .add_header(name, value)
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_search_and_list() {
    let ctx = TestContext::new();
    let (name, value) = auth();

    create(&ctx, &booking("Alice", "2025-02-10T09:00:00Z")).await;
    create(&ctx, &booking("Bob", "2025-02-11T09:00:00Z")).await;

    let results: Value = ctx
        .server
        .get("/api/appointments/search")
        .add_query_param("q", "ALICE")
        .add_header(name.clone(), value.clone())
        .await
        .json();
    assert_eq!(results.as_array().unwrap().len(), 1);
    assert_eq!(results[0]["name"], "Alice");

    let results: Value = ctx
        .server
        .get("/api/appointments/search")
        .add_query_param("q", "example.com")
        .add_query_param("date", "2025-02-11")
        .add_header(name.clone(), value.clone())
        .await
        .json();
    assert_eq!(results.as_array().unwrap().len(), 1);
    assert_eq!(results[0]["name"], "Bob");

    let results: Value = ctx
        .server
        .get("/api/appointments/search")
        .add_query_param("q", "   ")
        .add_header(name.clone(), value.clone())
        .await
        .json();
    assert_eq!(results, json!([]));

    let listed: Value = ctx
        .server
        .get("/api/appointments")
        .add_header(name, value)
        .await
        .json();
    assert_eq!(listed.as_array().unwrap().len(), 2);
    assert_eq!(listed[0]["name"], "Alice");
}

#[tokio::test]
async fn test_blank_search_never_reaches_store() {
    let mut repo = MockAppointmentRepo::new();
    repo.expect_search().never();
    let ctx = TestContext::with_store(Arc::new(repo));
    let (name, value) = auth();

    ctx.server
        .get("/api/appointments/search")
        .add_query_param("q", "")
        .add_header(name, value)
        .await
        .assert_status_ok();
}

#[test_log::test(tokio::test)]
async fn test_store_failure_is_internal_error() {
    let mut repo = MockAppointmentRepo::new();
    repo.expect_list_all()
        .returning(|_| Err(BookingError::Database(eyre::eyre!("connection refused"))));
    let ctx = TestContext::with_store(Arc::new(repo));
    let (name, value) = auth();

    let response = ctx
        .server
        .get("/api/appointments")
        .add_header(name, value)
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json();
    assert_eq!(body["kind"], "database");
    assert_eq!(body["error"], "Internal server error");
}
