use axum::{
    Json,
    extract::{Path, State},
    http::{HeaderMap, StatusCode, header},
};

use crate::{
    application::dto::{PositionRequest, PositionResponse},
    domain::position::PositionId,
    interface::http::{
        employees_handler::request_correlation_id,
        problem::{ApiProblem, ApiResult},
    },
    state::AppState,
};

pub async fn list_positions(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<Vec<PositionResponse>>> {
    let correlation_id = request_correlation_id(&headers);
    let positions = state
        .position_service
        .list_positions()
        .await
        .map_err(|error| ApiProblem::from_domain_with_correlation(error, correlation_id))?;
    Ok(Json(positions))
}

pub async fn get_position(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<PositionId>,
) -> ApiResult<Json<PositionResponse>> {
    let correlation_id = request_correlation_id(&headers);
    let position = state
        .position_service
        .get_position(id)
        .await
        .map_err(|error| ApiProblem::from_domain_with_correlation(error, correlation_id))?;
    Ok(Json(position))
}

pub async fn create_position(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<PositionRequest>,
) -> ApiResult<(StatusCode, [(header::HeaderName, String); 1], Json<PositionResponse>)> {
    let correlation_id = request_correlation_id(&headers);
    let created = state
        .position_service
        .create_position(request)
        .await
        .map_err(|error| ApiProblem::from_domain_with_correlation(error, correlation_id))?;

    let location = format!("/positions/{}", created.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(created),
    ))
}

pub async fn update_position(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<PositionId>,
    Json(request): Json<PositionRequest>,
) -> ApiResult<StatusCode> {
    let correlation_id = request_correlation_id(&headers);
    state
        .position_service
        .update_position(id, request)
        .await
        .map_err(|error| ApiProblem::from_domain_with_correlation(error, correlation_id))?;
    Ok(StatusCode::NO_CONTENT)
}

/// 409 while any employee still references the position.
pub async fn delete_position(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<PositionId>,
) -> ApiResult<StatusCode> {
    let correlation_id = request_correlation_id(&headers);
    state
        .position_service
        .delete_position(id)
        .await
        .map_err(|error| ApiProblem::from_domain_with_correlation(error, correlation_id))?;
    Ok(StatusCode::NO_CONTENT)
}
