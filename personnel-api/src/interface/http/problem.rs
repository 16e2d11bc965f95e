use std::collections::BTreeMap;

use axum::{
    Json,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use uuid::Uuid;

use crate::domain::errors::DomainError;

pub type ApiResult<T> = Result<T, ApiProblem>;

/// RFC 9457 style error response. Validation problems additionally carry the
/// field→messages map so clients can render errors next to each input.
#[derive(Debug)]
pub struct ApiProblem {
    status: StatusCode,
    title: &'static str,
    detail: String,
    kind: &'static str,
    correlation_id: String,
    errors: Option<BTreeMap<String, Vec<String>>>,
}

impl ApiProblem {
    pub fn from_domain(error: DomainError) -> Self {
        Self::from_domain_with_correlation(error, None)
    }

    pub fn from_domain_with_correlation(
        error: DomainError,
        correlation_id: Option<String>,
    ) -> Self {
        match error {
            DomainError::Validation(fields) => Self::new(
                StatusCode::BAD_REQUEST,
                "Validation failed",
                "https://personnel.dev/problems/validation",
                "one or more fields failed validation",
                correlation_id,
            )
            .with_errors(fields.into_map()),
            DomainError::NotFound(detail) => Self::new(
                StatusCode::NOT_FOUND,
                "Not found",
                "https://personnel.dev/problems/not-found",
                detail,
                correlation_id,
            ),
            DomainError::Conflict(detail) => Self::new(
                StatusCode::CONFLICT,
                "Conflict",
                "https://personnel.dev/problems/conflict",
                detail,
                correlation_id,
            ),
            DomainError::Internal(detail) => Self::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error",
                "https://personnel.dev/problems/internal",
                detail,
                correlation_id,
            ),
        }
    }

    fn new(
        status: StatusCode,
        title: &'static str,
        kind: &'static str,
        detail: impl Into<String>,
        correlation_id: Option<String>,
    ) -> Self {
        Self {
            status,
            title,
            detail: detail.into(),
            kind,
            // If request middleware already produced `x-request-id`, reuse it
            // so logs and the response payload share one correlation key.
            correlation_id: correlation_id.unwrap_or_else(|| Uuid::new_v4().to_string()),
            errors: None,
        }
    }

    fn with_errors(mut self, errors: BTreeMap<String, Vec<String>>) -> Self {
        self.errors = Some(errors);
        self
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ProblemDetails {
    #[serde(rename = "type")]
    kind: String,
    title: String,
    status: u16,
    detail: String,
    correlation_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    errors: Option<BTreeMap<String, Vec<String>>>,
}

impl IntoResponse for ApiProblem {
    fn into_response(self) -> Response {
        let payload = ProblemDetails {
            kind: self.kind.to_string(),
            title: self.title.to_string(),
            status: self.status.as_u16(),
            detail: self.detail,
            correlation_id: self.correlation_id,
            errors: self.errors,
        };

        let mut response = (self.status, Json(payload)).into_response();
        response.headers_mut().insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/problem+json"),
        );

        response
    }
}
