use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use thiserror::Error;

pub type EmployeeId = i64;
pub type PositionId = i64;

pub type ApiResult<T> = Result<T, ApiError>;

/// Client-side mirror of the server's problem taxonomy, plus the transport
/// failures only the client can observe.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    #[error("validation failed")]
    Validation {
        fields: BTreeMap<String, Vec<String>>,
    },
    #[error("{message}")]
    Conflict { message: String },
    #[error("resource not found")]
    NotFound,
    #[error("transport error: {0}")]
    Transport(String),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeSummary {
    pub id: EmployeeId,
    pub first_name: String,
    pub last_name: String,
    pub position_name: String,
    pub department: String,
    pub salary: f64,
    pub birth_date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeDetail {
    pub id: EmployeeId,
    pub first_name: String,
    pub last_name: String,
    pub position_id: PositionId,
    pub position_name: String,
    pub department: String,
    pub salary: f64,
    pub birth_date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeInput {
    pub first_name: String,
    pub last_name: String,
    pub position_id: PositionId,
    pub department: String,
    pub salary: f64,
    pub birth_date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    pub id: PositionId,
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionInput {
    pub name: String,
    pub description: Option<String>,
}

/// The CRUD surface the store talks to. A trait so tests can substitute an
/// in-process fake for the HTTP gateway.
#[async_trait]
pub trait DirectoryApi: Send + Sync {
    async fn list_employees(&self) -> ApiResult<Vec<EmployeeSummary>>;
    async fn get_employee(&self, id: EmployeeId) -> ApiResult<EmployeeDetail>;
    async fn create_employee(&self, input: &EmployeeInput) -> ApiResult<EmployeeDetail>;
    async fn update_employee(&self, id: EmployeeId, input: &EmployeeInput) -> ApiResult<()>;
    async fn delete_employee(&self, id: EmployeeId) -> ApiResult<()>;

    async fn list_positions(&self) -> ApiResult<Vec<Position>>;
    async fn get_position(&self, id: PositionId) -> ApiResult<Position>;
    async fn create_position(&self, input: &PositionInput) -> ApiResult<Position>;
    async fn update_position(&self, id: PositionId, input: &PositionInput) -> ApiResult<()>;
    async fn delete_position(&self, id: PositionId) -> ApiResult<()>;
}

/// `application/problem+json` body, as far as the client cares about it.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProblemPayload {
    #[serde(default)]
    detail: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    errors: Option<BTreeMap<String, Vec<String>>>,
}

pub struct HttpDirectoryApi {
    http: reqwest::Client,
    base_url: String,
}

impl HttpDirectoryApi {
    pub fn new(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self { http, base_url }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> ApiResult<T> {
        let response = Self::check_status(response).await?;
        response
            .json::<T>()
            .await
            .map_err(|error| ApiError::Transport(error.to_string()))
    }

    async fn read_no_content(response: reqwest::Response) -> ApiResult<()> {
        Self::check_status(response).await.map(|_| ())
    }

    async fn check_status(response: reqwest::Response) -> ApiResult<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let payload = response.json::<ProblemPayload>().await.ok();
        tracing::debug!(status = %status, "API call failed");

        Err(match status.as_u16() {
            400 => ApiError::Validation {
                fields: payload.and_then(|p| p.errors).unwrap_or_default(),
            },
            404 => ApiError::NotFound,
            409 => ApiError::Conflict {
                message: payload
                    .and_then(|p| p.detail.or(p.title))
                    .unwrap_or_else(|| "conflicto".to_string()),
            },
            _ => ApiError::Transport(format!("unexpected status {status}")),
        })
    }

    fn transport(error: reqwest::Error) -> ApiError {
        ApiError::Transport(error.to_string())
    }
}

#[async_trait]
impl DirectoryApi for HttpDirectoryApi {
    async fn list_employees(&self) -> ApiResult<Vec<EmployeeSummary>> {
        let response = self
            .http
            .get(self.url("/employees"))
            .send()
            .await
            .map_err(Self::transport)?;
        Self::read_json(response).await
    }

    async fn get_employee(&self, id: EmployeeId) -> ApiResult<EmployeeDetail> {
        let response = self
            .http
            .get(self.url(&format!("/employees/{id}")))
            .send()
            .await
            .map_err(Self::transport)?;
        Self::read_json(response).await
    }

    async fn create_employee(&self, input: &EmployeeInput) -> ApiResult<EmployeeDetail> {
        let response = self
            .http
            .post(self.url("/employees"))
            .json(input)
            .send()
            .await
            .map_err(Self::transport)?;
        Self::read_json(response).await
    }

    async fn update_employee(&self, id: EmployeeId, input: &EmployeeInput) -> ApiResult<()> {
        let response = self
            .http
            .put(self.url(&format!("/employees/{id}")))
            .json(input)
            .send()
            .await
            .map_err(Self::transport)?;
        Self::read_no_content(response).await
    }

    async fn delete_employee(&self, id: EmployeeId) -> ApiResult<()> {
        let response = self
            .http
            .delete(self.url(&format!("/employees/{id}")))
            .send()
            .await
            .map_err(Self::transport)?;
        Self::read_no_content(response).await
    }

    async fn list_positions(&self) -> ApiResult<Vec<Position>> {
        let response = self
            .http
            .get(self.url("/positions"))
            .send()
            .await
            .map_err(Self::transport)?;
        Self::read_json(response).await
    }

    async fn get_position(&self, id: PositionId) -> ApiResult<Position> {
        let response = self
            .http
            .get(self.url(&format!("/positions/{id}")))
            .send()
            .await
            .map_err(Self::transport)?;
        Self::read_json(response).await
    }

    async fn create_position(&self, input: &PositionInput) -> ApiResult<Position> {
        let response = self
            .http
            .post(self.url("/positions"))
            .json(input)
            .send()
            .await
            .map_err(Self::transport)?;
        Self::read_json(response).await
    }

    async fn update_position(&self, id: PositionId, input: &PositionInput) -> ApiResult<()> {
        let response = self
            .http
            .put(self.url(&format!("/positions/{id}")))
            .json(input)
            .send()
            .await
            .map_err(Self::transport)?;
        Self::read_no_content(response).await
    }

    async fn delete_position(&self, id: PositionId) -> ApiResult<()> {
        let response = self
            .http
            .delete(self.url(&format!("/positions/{id}")))
            .send()
            .await
            .map_err(Self::transport)?;
        Self::read_no_content(response).await
    }
}
