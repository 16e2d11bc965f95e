use axum::{
    Json,
    extract::{Path, State},
    http::{HeaderMap, StatusCode, header},
};

use crate::{
    application::dto::{
        EmployeeDetailResponse, EmployeeRequest, EmployeeSummaryResponse, HealthResponse,
    },
    domain::employee::EmployeeId,
    interface::http::problem::{ApiProblem, ApiResult},
    state::AppState,
};

pub async fn healthcheck() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

pub async fn list_employees(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<Vec<EmployeeSummaryResponse>>> {
    let correlation_id = request_correlation_id(&headers);
    let employees = state
        .employee_service
        .list_employees()
        .await
        .map_err(|error| ApiProblem::from_domain_with_correlation(error, correlation_id))?;
    Ok(Json(employees))
}

pub async fn get_employee(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<EmployeeId>,
) -> ApiResult<Json<EmployeeDetailResponse>> {
    let correlation_id = request_correlation_id(&headers);
    let employee = state
        .employee_service
        .get_employee(id)
        .await
        .map_err(|error| ApiProblem::from_domain_with_correlation(error, correlation_id))?;
    Ok(Json(employee))
}

pub async fn create_employee(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<EmployeeRequest>,
) -> ApiResult<(StatusCode, [(header::HeaderName, String); 1], Json<EmployeeDetailResponse>)> {
    let correlation_id = request_correlation_id(&headers);
    let created = state
        .employee_service
        .create_employee(request)
        .await
        .map_err(|error| ApiProblem::from_domain_with_correlation(error, correlation_id))?;

    let location = format!("/employees/{}", created.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(created),
    ))
}

pub async fn update_employee(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<EmployeeId>,
    Json(request): Json<EmployeeRequest>,
) -> ApiResult<StatusCode> {
    let correlation_id = request_correlation_id(&headers);
    state
        .employee_service
        .update_employee(id, request)
        .await
        .map_err(|error| ApiProblem::from_domain_with_correlation(error, correlation_id))?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete_employee(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<EmployeeId>,
) -> ApiResult<StatusCode> {
    let correlation_id = request_correlation_id(&headers);
    state
        .employee_service
        .delete_employee(id)
        .await
        .map_err(|error| ApiProblem::from_domain_with_correlation(error, correlation_id))?;
    Ok(StatusCode::NO_CONTENT)
}

pub(crate) fn request_correlation_id(headers: &HeaderMap) -> Option<String> {
    headers
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .map(ToString::to_string)
}
