use async_trait::async_trait;

use crate::domain::{
    employee::{EmployeeId, EmployeeWithPosition, NewEmployee},
    errors::DomainError,
    position::{NewPosition, Position, PositionId},
};

pub mod in_memory_directory;

/// Storage seam for both tables. A single trait rather than one per entity
/// because the referential-integrity checks (employee create/update against
/// positions, position delete against employees) have to happen inside one
/// serialized store operation.
#[async_trait]
pub trait DirectoryRepository: Send + Sync {
    async fn list_employees(&self) -> Result<Vec<EmployeeWithPosition>, DomainError>;
    async fn get_employee(
        &self,
        id: EmployeeId,
    ) -> Result<Option<EmployeeWithPosition>, DomainError>;
    /// Fails with a `positionId` validation error when the referenced
    /// position does not exist.
    async fn create_employee(
        &self,
        employee: NewEmployee,
    ) -> Result<EmployeeWithPosition, DomainError>;
    /// Full replace of every field except the id. `Ok(None)` when the id is
    /// absent.
    async fn update_employee(
        &self,
        id: EmployeeId,
        employee: NewEmployee,
    ) -> Result<Option<()>, DomainError>;
    /// Deleting an absent id is a no-op success.
    async fn delete_employee(&self, id: EmployeeId) -> Result<(), DomainError>;

    async fn list_positions(&self) -> Result<Vec<Position>, DomainError>;
    async fn get_position(&self, id: PositionId) -> Result<Option<Position>, DomainError>;
    async fn create_position(&self, position: NewPosition) -> Result<Position, DomainError>;
    async fn update_position(
        &self,
        id: PositionId,
        position: NewPosition,
    ) -> Result<Option<Position>, DomainError>;
    /// Fails with `Conflict` while any employee still references `id`; the
    /// check and the delete are atomic with respect to concurrent employee
    /// writes.
    async fn delete_position(&self, id: PositionId) -> Result<(), DomainError>;
}
