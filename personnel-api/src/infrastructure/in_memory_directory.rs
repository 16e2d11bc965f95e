use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{
    domain::{
        employee::{Employee, EmployeeId, EmployeeWithPosition, NewEmployee},
        errors::DomainError,
        position::{NewPosition, Position, PositionId},
    },
    infrastructure::DirectoryRepository,
};

pub const SEED_POSITION_NAMES: [&str; 5] = [
    "Desarrollador",
    "Programador",
    "Tester",
    "Gerente",
    "Analista",
];

/// Both tables live behind one lock so the cross-table checks (dangling
/// `position_id` on employee writes, live references on position delete)
/// are serialized against every other write.
///
/// Ids come from monotonic counters, so `BTreeMap` iteration order is
/// insertion order, which is the list ordering the API promises.
pub struct InMemoryDirectory {
    tables: RwLock<DirectoryTables>,
}

#[derive(Default)]
struct DirectoryTables {
    employees: BTreeMap<EmployeeId, Employee>,
    positions: BTreeMap<PositionId, Position>,
    next_employee_id: EmployeeId,
    next_position_id: PositionId,
}

impl DirectoryTables {
    fn position_name(&self, id: PositionId) -> Option<String> {
        self.positions.get(&id).map(|position| position.name.clone())
    }
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(DirectoryTables {
                next_employee_id: 1,
                next_position_id: 1,
                ..DirectoryTables::default()
            }),
        }
    }

    /// Store pre-populated with the five fixed positions, matching the seed
    /// migration of the service this replaces.
    pub fn seeded() -> Self {
        let mut tables = DirectoryTables {
            next_employee_id: 1,
            next_position_id: 1,
            ..DirectoryTables::default()
        };
        for name in SEED_POSITION_NAMES {
            let id = tables.next_position_id;
            tables.next_position_id += 1;
            tables.positions.insert(
                id,
                Position {
                    id,
                    name: name.to_string(),
                    description: None,
                },
            );
        }
        Self {
            tables: RwLock::new(tables),
        }
    }
}

impl Default for InMemoryDirectory {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DirectoryRepository for InMemoryDirectory {
    async fn list_employees(&self) -> Result<Vec<EmployeeWithPosition>, DomainError> {
        let tables = self.tables.read().await;
        tables
            .employees
            .values()
            .map(|employee| {
                let position_name = tables.position_name(employee.position_id).ok_or_else(|| {
                    DomainError::internal("employee references a missing position")
                })?;
                Ok(EmployeeWithPosition {
                    employee: employee.clone(),
                    position_name,
                })
            })
            .collect()
    }

    async fn get_employee(
        &self,
        id: EmployeeId,
    ) -> Result<Option<EmployeeWithPosition>, DomainError> {
        let tables = self.tables.read().await;
        let Some(employee) = tables.employees.get(&id) else {
            return Ok(None);
        };
        let position_name = tables
            .position_name(employee.position_id)
            .ok_or_else(|| DomainError::internal("employee references a missing position"))?;
        Ok(Some(EmployeeWithPosition {
            employee: employee.clone(),
            position_name,
        }))
    }

    async fn create_employee(
        &self,
        employee: NewEmployee,
    ) -> Result<EmployeeWithPosition, DomainError> {
        let mut tables = self.tables.write().await;

        let Some(position_name) = tables.position_name(employee.position_id) else {
            return Err(DomainError::field(
                "positionId",
                "El ID del puesto no es válido.",
            ));
        };

        let id = tables.next_employee_id;
        tables.next_employee_id += 1;

        let created = Employee {
            id,
            first_name: employee.first_name,
            last_name: employee.last_name,
            position_id: employee.position_id,
            department: employee.department,
            salary: employee.salary,
            birth_date: employee.birth_date,
        };
        tables.employees.insert(id, created.clone());

        Ok(EmployeeWithPosition {
            employee: created,
            position_name,
        })
    }

    async fn update_employee(
        &self,
        id: EmployeeId,
        employee: NewEmployee,
    ) -> Result<Option<()>, DomainError> {
        let mut tables = self.tables.write().await;

        if !tables.employees.contains_key(&id) {
            return Ok(None);
        }
        if !tables.positions.contains_key(&employee.position_id) {
            return Err(DomainError::field(
                "positionId",
                "El ID del puesto no es válido.",
            ));
        }

        tables.employees.insert(
            id,
            Employee {
                id,
                first_name: employee.first_name,
                last_name: employee.last_name,
                position_id: employee.position_id,
                department: employee.department,
                salary: employee.salary,
                birth_date: employee.birth_date,
            },
        );
        Ok(Some(()))
    }

    async fn delete_employee(&self, id: EmployeeId) -> Result<(), DomainError> {
        self.tables.write().await.employees.remove(&id);
        Ok(())
    }

    async fn list_positions(&self) -> Result<Vec<Position>, DomainError> {
        Ok(self.tables.read().await.positions.values().cloned().collect())
    }

    async fn get_position(&self, id: PositionId) -> Result<Option<Position>, DomainError> {
        Ok(self.tables.read().await.positions.get(&id).cloned())
    }

    async fn create_position(&self, position: NewPosition) -> Result<Position, DomainError> {
        let mut tables = self.tables.write().await;

        let id = tables.next_position_id;
        tables.next_position_id += 1;

        let created = Position {
            id,
            name: position.name,
            description: position.description,
        };
        tables.positions.insert(id, created.clone());
        Ok(created)
    }

    async fn update_position(
        &self,
        id: PositionId,
        position: NewPosition,
    ) -> Result<Option<Position>, DomainError> {
        let mut tables = self.tables.write().await;

        let Some(existing) = tables.positions.get_mut(&id) else {
            return Ok(None);
        };
        existing.name = position.name;
        existing.description = position.description;
        Ok(Some(existing.clone()))
    }

    async fn delete_position(&self, id: PositionId) -> Result<(), DomainError> {
        let mut tables = self.tables.write().await;

        // Reference check and delete happen under the same write lock, so a
        // concurrent employee create against this position cannot interleave.
        if tables
            .employees
            .values()
            .any(|employee| employee.position_id == id)
        {
            return Err(DomainError::conflict(
                "El puesto está asignado a uno o más empleados.",
            ));
        }

        tables.positions.remove(&id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn sample_employee(position_id: PositionId) -> NewEmployee {
        NewEmployee {
            first_name: "Ana".to_string(),
            last_name: "Ruiz".to_string(),
            position_id,
            department: "IT".to_string(),
            salary: 3000.0,
            birth_date: NaiveDate::from_ymd_opt(1990, 1, 1).expect("valid date"),
        }
    }

    #[tokio::test]
    async fn seeded_store_contains_the_five_positions() {
        let directory = InMemoryDirectory::seeded();
        let positions = directory.list_positions().await.expect("list positions");

        let names: Vec<&str> = positions.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, SEED_POSITION_NAMES);
        assert!(positions.iter().all(|p| p.description.is_none()));
        assert_eq!(positions.first().map(|p| p.id), Some(1));
    }

    #[tokio::test]
    async fn create_employee_resolves_position_name() {
        let directory = InMemoryDirectory::seeded();
        let created = directory
            .create_employee(sample_employee(1))
            .await
            .expect("create employee");

        assert_eq!(created.employee.id, 1);
        assert_eq!(created.position_name, "Desarrollador");
    }

    #[tokio::test]
    async fn create_employee_rejects_dangling_position() {
        let directory = InMemoryDirectory::seeded();
        let result = directory.create_employee(sample_employee(99)).await;

        let Err(DomainError::Validation(fields)) = result else {
            panic!("expected a validation error, got {result:?}");
        };
        assert!(fields.as_map().contains_key("positionId"));
        assert!(directory.list_employees().await.expect("list").is_empty());
    }

    #[tokio::test]
    async fn delete_position_blocked_while_referenced() {
        let directory = InMemoryDirectory::seeded();
        directory
            .create_employee(sample_employee(1))
            .await
            .expect("create employee");

        let result = directory.delete_position(1).await;
        assert!(matches!(result, Err(DomainError::Conflict(_))));

        // Both tables untouched by the failed delete.
        assert_eq!(directory.list_positions().await.expect("list").len(), 5);
        assert_eq!(directory.list_employees().await.expect("list").len(), 1);
    }

    #[tokio::test]
    async fn delete_position_succeeds_once_unreferenced() {
        let directory = InMemoryDirectory::seeded();
        let created = directory
            .create_employee(sample_employee(1))
            .await
            .expect("create employee");

        directory
            .delete_employee(created.employee.id)
            .await
            .expect("delete employee");
        directory.delete_position(1).await.expect("delete position");

        let positions = directory.list_positions().await.expect("list");
        assert!(positions.iter().all(|p| p.id != 1));
    }

    #[tokio::test]
    async fn delete_absent_employee_is_a_noop_success() {
        let directory = InMemoryDirectory::seeded();
        directory.delete_employee(42).await.expect("noop delete");
    }

    #[tokio::test]
    async fn list_employees_keeps_insertion_order() {
        let directory = InMemoryDirectory::seeded();
        for position_id in [3, 1, 2] {
            directory
                .create_employee(sample_employee(position_id))
                .await
                .expect("create employee");
        }

        let ids: Vec<EmployeeId> = directory
            .list_employees()
            .await
            .expect("list")
            .iter()
            .map(|e| e.employee.id)
            .collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }
}
