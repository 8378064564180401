//! API integration tests

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::Value;
use tower::util::ServiceExt;

mod common;
use common::create_test_router;

/// Helper to make a GET request and parse the body.
async fn get_request(app: &axum::Router, uri: &str) -> (StatusCode, String) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();

    (status, String::from_utf8(body_bytes.to_vec()).unwrap())
}

async fn get_json(app: &axum::Router, uri: &str) -> (StatusCode, Value) {
    let (status, body) = get_request(app, uri).await;
    let json = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_str(&body).unwrap()
    };
    (status, json)
}

#[tokio::test]
async fn test_health_check() {
    let (app, _sink) = create_test_router().await;

    let (status, body) = get_json(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["service"], "alarmwatcher");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_server_time_is_unix_seconds() {
    let (app, _sink) = create_test_router().await;

    let (status, body) = get_request(&app, "/api/serverTime").await;
    assert_eq!(status, StatusCode::OK);
    let timestamp: i64 = body.parse().expect("plain unix timestamp");
    assert!(timestamp > 1_600_000_000);
}

#[tokio::test]
async fn test_raise_alarm_returns_record() {
    let (app, sink) = create_test_router().await;

    let (status, body) = get_json(
        &app,
        "/api/raiseAlarm?alarm_id=pump1&alarm_class=2&alarm_state=active",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["alarm_id"], "pump1");
    assert_eq!(body["alarm_class"], 2);
    assert_eq!(body["alarm_state"], "active");
    assert_eq!(body["require_ack"], false);
    assert!(body["delete_time"].is_null());

    assert_eq!(sink.delivered().len(), 1);
}

#[tokio::test]
async fn test_raise_alarm_state_defaults_to_on() {
    let (app, _sink) = create_test_router().await;

    let (status, body) = get_json(&app, "/api/raiseAlarm?alarm_id=x&alarm_class=3").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["alarm_state"], "on");
}

#[tokio::test]
async fn test_raise_alarm_converts_duration() {
    let (app, _sink) = create_test_router().await;

    let (status, body) =
        get_json(&app, "/api/raiseAlarm?alarm_id=x&alarm_class=3&duration=60").await;
    assert_eq!(status, StatusCode::OK);

    let raised = body["raised_time"].as_i64().unwrap();
    let delete = body["delete_time"].as_i64().unwrap();
    assert_eq!(delete - raised, 60);
}

#[tokio::test]
async fn test_raise_alarm_validation_errors() {
    let (app, _sink) = create_test_router().await;

    let (status, _body) = get_json(&app, "/api/raiseAlarm?alarm_class=2").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _body) = get_json(&app, "/api/raiseAlarm?alarm_id=x").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = get_json(&app, "/api/raiseAlarm?alarm_id=x&alarm_class=7").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("alarm_class"));
}

#[tokio::test]
async fn test_duplicate_raise_conflicts() {
    let (app, _sink) = create_test_router().await;

    let uri = "/api/raiseAlarm?alarm_id=pump1&alarm_class=2&alarm_state=active";
    let (status, _body) = get_json(&app, uri).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = get_json(&app, uri).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].as_str().unwrap().contains("pump1"));

    // Store unchanged: still exactly one record.
    let (_, list) = get_json(&app, "/api/getAlarms").await;
    assert_eq!(list.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_ack_alarm_unknown_id_is_success() {
    let (app, _sink) = create_test_router().await;

    let (status, body) = get_json(&app, "/api/ackAlarm?alarm_id=missing").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "acknowledged");
}

#[tokio::test]
async fn test_ack_alarm_requires_id() {
    let (app, _sink) = create_test_router().await;

    let (status, _body) = get_json(&app, "/api/ackAlarm").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_clear_alarm_deletes_record() {
    let (app, _sink) = create_test_router().await;

    get_json(&app, "/api/raiseAlarm?alarm_id=x&alarm_class=3").await;

    let (status, body) = get_json(&app, "/api/clearAlarm?alarm_id=x").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "cleared");

    let (_, list) = get_json(&app, "/api/getAlarms").await;
    assert!(list.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_clear_unacknowledged_alarm_is_deferred() {
    let (app, _sink) = create_test_router().await;

    get_json(&app, "/api/raiseAlarm?alarm_id=x&alarm_class=1&req_ack=true").await;

    let (status, body) = get_json(&app, "/api/clearAlarm?alarm_id=x").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "clear_pending");

    // Record still listed with a pending delete_time.
    let (_, list) = get_json(&app, "/api/getAlarms?alarm_id=x").await;
    let records = list.as_array().unwrap();
    assert_eq!(records.len(), 1);
    assert!(records[0]["delete_time"].is_i64());
}

#[tokio::test]
async fn test_clear_unknown_id_is_success() {
    let (app, _sink) = create_test_router().await;

    let (status, _body) = get_json(&app, "/api/clearAlarm?alarm_id=missing").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_get_alarms_filters() {
    let (app, _sink) = create_test_router().await;

    get_json(&app, "/api/raiseAlarm?alarm_id=a&alarm_class=3").await;
    get_json(&app, "/api/raiseAlarm?alarm_id=b&alarm_class=3").await;

    let (status, list) = get_json(&app, "/api/getAlarms?alarm_id=a").await;
    assert_eq!(status, StatusCode::OK);
    let records = list.as_array().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["alarm_id"], "a");

    // A before-filter in the distant past matches nothing.
    let (status, list) = get_json(&app, "/api/getAlarms?before=1000").await;
    assert_eq!(status, StatusCode::OK);
    assert!(list.as_array().unwrap().is_empty());

    // An after-filter in the distant past matches everything.
    let (status, list) = get_json(&app, "/api/getAlarms?after=1000").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 2);
}
