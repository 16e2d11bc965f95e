use std::sync::Arc;

use crate::{
    application::dto::{EmployeeDetailResponse, EmployeeRequest, EmployeeSummaryResponse},
    domain::{employee::EmployeeId, errors::DomainError},
    infrastructure::DirectoryRepository,
};

#[derive(Clone)]
pub struct EmployeeService {
    repository: Arc<dyn DirectoryRepository>,
}

impl EmployeeService {
    pub fn new(repository: Arc<dyn DirectoryRepository>) -> Self {
        Self { repository }
    }

    pub async fn list_employees(&self) -> Result<Vec<EmployeeSummaryResponse>, DomainError> {
        let employees = self.repository.list_employees().await?;
        Ok(employees
            .into_iter()
            .map(EmployeeSummaryResponse::from)
            .collect())
    }

    pub async fn get_employee(
        &self,
        id: EmployeeId,
    ) -> Result<EmployeeDetailResponse, DomainError> {
        let Some(employee) = self.repository.get_employee(id).await? else {
            return Err(DomainError::not_found("empleado no encontrado"));
        };
        Ok(EmployeeDetailResponse::from(employee))
    }

    pub async fn create_employee(
        &self,
        request: EmployeeRequest,
    ) -> Result<EmployeeDetailResponse, DomainError> {
        let employee = request.into_domain()?;
        let created = self.repository.create_employee(employee).await?;
        Ok(EmployeeDetailResponse::from(created))
    }

    /// Full replace of every field except the id.
    pub async fn update_employee(
        &self,
        id: EmployeeId,
        request: EmployeeRequest,
    ) -> Result<(), DomainError> {
        let employee = request.into_domain()?;
        let Some(()) = self.repository.update_employee(id, employee).await? else {
            return Err(DomainError::not_found("empleado no encontrado"));
        };
        Ok(())
    }

    /// Unconditional: deleting an id that was never assigned still succeeds.
    pub async fn delete_employee(&self, id: EmployeeId) -> Result<(), DomainError> {
        self.repository.delete_employee(id).await
    }
}
