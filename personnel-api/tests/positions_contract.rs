mod common;

use axum::http::StatusCode;
use serde_json::{Value, json};

use common::{
    assert_problem, build_app, empty_request, json_request, request_json, request_with_headers,
};

#[tokio::test]
async fn seeded_positions_are_listed_in_order() {
    let app = build_app();

    let (status, listed) = request_json(app, empty_request("GET", "/positions")).await;
    assert_eq!(status, StatusCode::OK);

    let names: Vec<&str> = listed
        .as_array()
        .expect("array body")
        .iter()
        .filter_map(|row| row.get("name").and_then(Value::as_str))
        .collect();
    assert_eq!(names, vec![
        "Desarrollador",
        "Programador",
        "Tester",
        "Gerente",
        "Analista",
    ]);
    assert!(
        listed
            .as_array()
            .expect("array body")
            .iter()
            .all(|row| row.get("description").map(Value::is_null).unwrap_or(false))
    );
}

#[tokio::test]
async fn create_position_returns_created_with_location() {
    let app = build_app();

    let (status, headers, created) = request_with_headers(
        app.clone(),
        json_request(
            "POST",
            "/positions",
            &json!({"name": "Becario", "description": "Puesto temporal"}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(
        headers
            .get("location")
            .and_then(|value| value.to_str().ok()),
        Some("/positions/6")
    );
    assert_eq!(created.get("id").and_then(Value::as_i64), Some(6));
    assert_eq!(created.get("name").and_then(Value::as_str), Some("Becario"));

    let (_, listed) = request_json(app, empty_request("GET", "/positions")).await;
    assert_eq!(listed.as_array().map(Vec::len), Some(6));
}

#[tokio::test]
async fn blank_or_oversized_names_are_rejected() {
    let app = build_app();

    let (status, problem) = request_json(
        app.clone(),
        json_request("POST", "/positions", &json!({"name": "  "})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_problem(&problem, 400, "Validation failed");
    assert!(problem.pointer("/errors/name").is_some());

    let (status, problem) = request_json(
        app,
        json_request("POST", "/positions", &json!({"name": "x".repeat(51)})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(problem.pointer("/errors/name").is_some());
}

#[tokio::test]
async fn get_and_update_position() {
    let app = build_app();

    let (status, position) = request_json(app.clone(), empty_request("GET", "/positions/2")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        position.get("name").and_then(Value::as_str),
        Some("Programador")
    );

    let (status, body) = request_json(
        app.clone(),
        json_request(
            "PUT",
            "/positions/2",
            &json!({"name": "Ingeniero", "description": "Rol renombrado"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);

    let (_, updated) = request_json(app.clone(), empty_request("GET", "/positions/2")).await;
    assert_eq!(
        updated.get("name").and_then(Value::as_str),
        Some("Ingeniero")
    );

    let (status, problem) = request_json(
        app,
        json_request("PUT", "/positions/42", &json!({"name": "Nadie"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_problem(&problem, 404, "Not found");
}

#[tokio::test]
async fn referenced_position_cannot_be_deleted() {
    let app = build_app();

    let (status, _) = request_json(
        app.clone(),
        json_request(
            "POST",
            "/employees",
            &json!({
                "firstName": "Ana",
                "lastName": "Ruiz",
                "positionId": 1,
                "department": "IT",
                "salary": 3000,
                "birthDate": "1990-01-01"
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, problem) = request_json(app.clone(), empty_request("DELETE", "/positions/1")).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_problem(&problem, 409, "Conflict");
    assert_eq!(
        problem.get("detail").and_then(Value::as_str),
        Some("El puesto está asignado a uno o más empleados.")
    );

    // Failed delete leaves both tables unchanged.
    let (_, positions) = request_json(app.clone(), empty_request("GET", "/positions")).await;
    assert_eq!(positions.as_array().map(Vec::len), Some(5));
    let (_, employees) = request_json(app.clone(), empty_request("GET", "/employees")).await;
    assert_eq!(employees.as_array().map(Vec::len), Some(1));

    // Once the referencing employee is gone the delete goes through.
    let (status, _) = request_json(app.clone(), empty_request("DELETE", "/employees/1")).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = request_json(app.clone(), empty_request("DELETE", "/positions/1")).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, positions) = request_json(app, empty_request("GET", "/positions")).await;
    let ids: Vec<i64> = positions
        .as_array()
        .expect("array body")
        .iter()
        .filter_map(|row| row.get("id").and_then(Value::as_i64))
        .collect();
    assert!(!ids.contains(&1));
}

#[tokio::test]
async fn get_absent_position_is_not_found() {
    let app = build_app();
    let (status, problem) = request_json(app, empty_request("GET", "/positions/42")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_problem(&problem, 404, "Not found");
}
