use std::sync::Arc;

use crate::{
    application::dto::{PositionRequest, PositionResponse},
    domain::{errors::DomainError, position::PositionId},
    infrastructure::DirectoryRepository,
};

#[derive(Clone)]
pub struct PositionService {
    repository: Arc<dyn DirectoryRepository>,
}

impl PositionService {
    pub fn new(repository: Arc<dyn DirectoryRepository>) -> Self {
        Self { repository }
    }

    pub async fn list_positions(&self) -> Result<Vec<PositionResponse>, DomainError> {
        let positions = self.repository.list_positions().await?;
        Ok(positions.into_iter().map(PositionResponse::from).collect())
    }

    pub async fn get_position(&self, id: PositionId) -> Result<PositionResponse, DomainError> {
        let Some(position) = self.repository.get_position(id).await? else {
            return Err(DomainError::not_found("puesto no encontrado"));
        };
        Ok(PositionResponse::from(position))
    }

    pub async fn create_position(
        &self,
        request: PositionRequest,
    ) -> Result<PositionResponse, DomainError> {
        let position = request.into_domain()?;
        let created = self.repository.create_position(position).await?;
        Ok(PositionResponse::from(created))
    }

    pub async fn update_position(
        &self,
        id: PositionId,
        request: PositionRequest,
    ) -> Result<(), DomainError> {
        let position = request.into_domain()?;
        let Some(_) = self.repository.update_position(id, position).await? else {
            return Err(DomainError::not_found("puesto no encontrado"));
        };
        Ok(())
    }

    /// The repository refuses the delete while any employee references the
    /// position; the resulting `Conflict` flows through untouched.
    pub async fn delete_position(&self, id: PositionId) -> Result<(), DomainError> {
        self.repository.delete_position(id).await
    }
}
