#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use personnel_api::{
    app::build_router,
    application::{employee_service::EmployeeService, position_service::PositionService},
    infrastructure::in_memory_directory::InMemoryDirectory,
    state::AppState,
};
use serde_json::Value;
use tower::ServiceExt;

pub fn build_app() -> Router {
    let directory = Arc::new(InMemoryDirectory::seeded());
    let state = AppState::new(
        Arc::new(EmployeeService::new(directory.clone())),
        Arc::new(PositionService::new(directory)),
    );
    build_router(state)
}

pub async fn request_json(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.expect("request completes");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body collects")
        .to_bytes();

    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    };
    (status, value)
}

pub async fn request_with_headers(
    app: Router,
    request: Request<Body>,
) -> (StatusCode, axum::http::HeaderMap, Value) {
    let response = app.oneshot(request).await.expect("request completes");
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body collects")
        .to_bytes();

    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    };
    (status, headers, value)
}

pub fn json_request(method: &str, uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("valid request")
}

pub fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .expect("valid request")
}

pub fn assert_problem(payload: &Value, status: u16, title: &str) {
    assert_eq!(
        payload.get("status").and_then(Value::as_u64),
        Some(u64::from(status))
    );
    assert_eq!(payload.get("title").and_then(Value::as_str), Some(title));
    assert!(payload.get("correlationId").and_then(Value::as_str).is_some());
}
