//! services/api/tests/http_api.rs
//!
//! End-to-end tests for the REST surface, driving the router directly with
//! the in-memory store. The query behavior is backing-independent, so this
//! covers the wire contract for both variants.

use api_lib::config::{Config, StorageBackend};
use api_lib::web::{api_router, state::AppState};
use api_lib::adapters::MemoryStore;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use chrono::Utc;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

fn test_app() -> Router {
    let config = Config {
        bind_address: "127.0.0.1:0".parse().unwrap(),
        storage: StorageBackend::Memory,
        database_url: None,
        log_level: tracing::Level::INFO,
    };
    let state = Arc::new(AppState {
        store: Arc::new(MemoryStore::new()),
        config: Arc::new(config),
    });
    api_router(state)
}

async fn post_json(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

async fn register(app: &Router, username: &str) -> String {
    let (status, body) = post_json(app, "/api/users", json!({ "username": username })).await;
    assert_eq!(status, StatusCode::OK);
    body["_id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn register_user_returns_username_and_id() {
    let app = test_app();
    let (status, body) = post_json(&app, "/api/users", json!({ "username": "alice" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], "alice");
    assert!(body["_id"].is_string());
}

#[tokio::test]
async fn missing_username_is_a_client_error() {
    let app = test_app();
    let (status, body) = post_json(&app, "/api/users", json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "username is required");
}

#[tokio::test]
async fn user_list_keeps_registration_order() {
    let app = test_app();
    for name in ["carol", "alice", "bob"] {
        register(&app, name).await;
    }
    let (status, body) = get(&app, "/api/users").await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|u| u["username"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["carol", "alice", "bob"]);
}

#[tokio::test]
async fn add_exercise_renders_the_day_string() {
    let app = test_app();
    let id = register(&app, "alice").await;
    let (status, body) = post_json(
        &app,
        &format!("/api/users/{id}/exercises"),
        json!({ "description": "run", "duration": 30, "date": "2023-01-05" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["_id"], Value::String(id));
    assert_eq!(body["username"], "alice");
    assert_eq!(body["date"], "Thu Jan 05 2023");
    assert_eq!(body["duration"], 30);
    assert_eq!(body["description"], "run");
}

#[tokio::test]
async fn duration_accepts_numeric_strings() {
    let app = test_app();
    let id = register(&app, "alice").await;
    let (status, body) = post_json(
        &app,
        &format!("/api/users/{id}/exercises"),
        json!({ "description": "run", "duration": "45" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["duration"], 45);
}

#[tokio::test]
async fn exercise_validation_rejects_bad_required_fields() {
    let app = test_app();
    let id = register(&app, "alice").await;
    let uri = format!("/api/users/{id}/exercises");

    let (status, body) = post_json(&app, &uri, json!({ "duration": 30 })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "description is required");

    let (status, body) = post_json(&app, &uri, json!({ "description": "run" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "duration (number) is required");

    let (status, _) = post_json(
        &app,
        &uri,
        json!({ "description": "run", "duration": "abc" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Nothing was written along the way.
    let (_, body) = get(&app, &format!("/api/users/{id}/logs")).await;
    assert_eq!(body["count"], 0);
}

#[tokio::test]
async fn unknown_user_id_is_not_found() {
    let app = test_app();
    let (status, body) = post_json(
        &app,
        "/api/users/999/exercises",
        json!({ "description": "run", "duration": 30 }),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "user not found");

    let (status, body) = get(&app, "/api/users/999/logs").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.get("log").is_none());
}

#[tokio::test]
async fn bad_write_date_falls_back_to_today() {
    let app = test_app();
    let id = register(&app, "alice").await;
    let before = Utc::now().date_naive();
    let (status, body) = post_json(
        &app,
        &format!("/api/users/{id}/exercises"),
        json!({ "description": "run", "duration": 30, "date": "not-a-date" }),
    )
    .await;
    let after = Utc::now().date_naive();
    assert_eq!(status, StatusCode::OK);
    // Tolerate a midnight rollover between the two clock reads.
    let rendered = body["date"].as_str().unwrap();
    let candidates: Vec<String> = [before, after]
        .iter()
        .map(|d| d.format("%a %b %d %Y").to_string())
        .collect();
    assert!(candidates.iter().any(|c| c == rendered));
}

#[tokio::test]
async fn log_query_filters_sorts_and_counts() {
    let app = test_app();
    let id = register(&app, "alice").await;
    let uri = format!("/api/users/{id}/exercises");
    for (description, date) in [
        ("swim", "2023-03-01"),
        ("run", "2023-01-05"),
        ("bike", "2022-06-01"),
    ] {
        let (status, _) = post_json(
            &app,
            &uri,
            json!({ "description": description, "duration": 30, "date": date }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, body) = get(
        &app,
        &format!("/api/users/{id}/logs?from=2023-01-01&to=2023-12-31"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], "alice");
    assert_eq!(body["count"], 2);
    let log = body["log"].as_array().unwrap();
    assert_eq!(log[0]["description"], "run");
    assert_eq!(log[0]["date"], "Thu Jan 05 2023");
    assert_eq!(log[1]["description"], "swim");
}

#[tokio::test]
async fn limit_caps_the_sorted_log_and_bad_values_are_ignored() {
    let app = test_app();
    let id = register(&app, "alice").await;
    let uri = format!("/api/users/{id}/exercises");
    for date in ["2023-05-01", "2023-01-01", "2023-03-01"] {
        post_json(
            &app,
            &uri,
            json!({ "description": "run", "duration": 30, "date": date }),
        )
        .await;
    }

    let (_, body) = get(&app, &format!("/api/users/{id}/logs?limit=2")).await;
    assert_eq!(body["count"], 2);
    assert_eq!(body["log"][0]["date"], "Sun Jan 01 2023");

    for bad in ["0", "-1", "abc"] {
        let (_, body) = get(&app, &format!("/api/users/{id}/logs?limit={bad}")).await;
        assert_eq!(body["count"], 3);
    }
}

#[tokio::test]
async fn invalid_filter_bounds_are_ignored_not_errors() {
    let app = test_app();
    let id = register(&app, "alice").await;
    post_json(
        &app,
        &format!("/api/users/{id}/exercises"),
        json!({ "description": "run", "duration": 30, "date": "2023-01-05" }),
    )
    .await;

    let (status, body) = get(
        &app,
        &format!("/api/users/{id}/logs?from=2023-02-30&to=not-a-date"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 1);
}

#[tokio::test]
async fn empty_log_is_a_valid_result() {
    let app = test_app();
    let id = register(&app, "alice").await;
    let (status, body) = get(&app, &format!("/api/users/{id}/logs")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 0);
    assert_eq!(body["log"], json!([]));
}
