use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{
    employee::{EmployeeId, EmployeeWithPosition, NewEmployee},
    errors::{DomainError, FieldErrors},
    position::{NewPosition, Position, PositionId},
};

pub const SALARY_MIN: f64 = 1000.0;
pub const SALARY_MAX: f64 = 10000.0;

/// Body of both POST and PUT /employees: an update is a full replace, so it
/// carries the same shape as a create.
///
/// Every field is optional at the wire level so a missing field surfaces as a
/// per-field validation message instead of a deserialization rejection.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub position_id: Option<PositionId>,
    pub department: Option<String>,
    pub salary: Option<f64>,
    pub birth_date: Option<NaiveDate>,
}

impl EmployeeRequest {
    pub fn into_domain(self) -> Result<NewEmployee, DomainError> {
        let mut errors = FieldErrors::new();

        let first_name = self.first_name.map(|value| value.trim().to_string());
        match &first_name {
            None => errors.push("firstName", "El nombre es obligatorio."),
            Some(value) if value.is_empty() => {
                errors.push("firstName", "El nombre es obligatorio.");
            }
            Some(value) if value.chars().count() > 50 => {
                errors.push("firstName", "El nombre no puede superar los 50 caracteres.");
            }
            Some(_) => {}
        }

        let last_name = self.last_name.map(|value| value.trim().to_string());
        if last_name.as_deref().is_none_or(str::is_empty) {
            errors.push("lastName", "Los apellidos son obligatorios.");
        }

        if self.position_id.is_none_or(|id| id < 1) {
            errors.push("positionId", "El ID del puesto no es válido.");
        }

        let department = self.department.map(|value| value.trim().to_string());
        if department.as_deref().is_none_or(str::is_empty) {
            errors.push("department", "El departamento es obligatorio.");
        }

        if self
            .salary
            .is_none_or(|salary| !(SALARY_MIN..=SALARY_MAX).contains(&salary))
        {
            errors.push("salary", "El salario debe estar entre 1000 y 10000.");
        }

        if self.birth_date.is_none() {
            errors.push("birthDate", "La fecha de nacimiento es obligatoria.");
        }

        errors.into_result()?;

        // Every field checked above, so the unwraps below cannot fail; keep
        // them as pattern matches to avoid panicking paths anyway.
        match (
            first_name,
            last_name,
            self.position_id,
            department,
            self.salary,
            self.birth_date,
        ) {
            (
                Some(first_name),
                Some(last_name),
                Some(position_id),
                Some(department),
                Some(salary),
                Some(birth_date),
            ) => Ok(NewEmployee {
                first_name,
                last_name,
                position_id,
                department,
                salary,
                birth_date,
            }),
            _ => Err(DomainError::internal("validated request had missing fields")),
        }
    }
}

/// Body of POST and PUT /positions.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionRequest {
    pub name: Option<String>,
    pub description: Option<String>,
}

impl PositionRequest {
    pub fn into_domain(self) -> Result<NewPosition, DomainError> {
        let mut errors = FieldErrors::new();

        let name = self.name.map(|value| value.trim().to_string());
        match &name {
            None => errors.push("name", "El nombre del puesto es obligatorio."),
            Some(value) if value.is_empty() => {
                errors.push("name", "El nombre del puesto es obligatorio.");
            }
            Some(value) if value.chars().count() > 50 => {
                errors.push(
                    "name",
                    "El nombre del puesto no puede superar los 50 caracteres.",
                );
            }
            Some(_) => {}
        }

        let description = self
            .description
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty());
        if description
            .as_deref()
            .is_some_and(|value| value.chars().count() > 250)
        {
            errors.push(
                "description",
                "La descripción no puede superar los 250 caracteres.",
            );
        }

        errors.into_result()?;

        let Some(name) = name else {
            return Err(DomainError::internal("validated request had missing name"));
        };
        Ok(NewPosition { name, description })
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeSummaryResponse {
    pub id: EmployeeId,
    pub first_name: String,
    pub last_name: String,
    pub position_name: String,
    pub department: String,
    pub salary: f64,
    pub birth_date: NaiveDate,
}

impl From<EmployeeWithPosition> for EmployeeSummaryResponse {
    fn from(value: EmployeeWithPosition) -> Self {
        Self {
            id: value.employee.id,
            first_name: value.employee.first_name,
            last_name: value.employee.last_name,
            position_name: value.position_name,
            department: value.employee.department,
            salary: value.employee.salary,
            birth_date: value.employee.birth_date,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeDetailResponse {
    pub id: EmployeeId,
    pub first_name: String,
    pub last_name: String,
    pub position_id: PositionId,
    pub position_name: String,
    pub department: String,
    pub salary: f64,
    pub birth_date: NaiveDate,
}

impl From<EmployeeWithPosition> for EmployeeDetailResponse {
    fn from(value: EmployeeWithPosition) -> Self {
        Self {
            id: value.employee.id,
            first_name: value.employee.first_name,
            last_name: value.employee.last_name,
            position_id: value.employee.position_id,
            position_name: value.position_name,
            department: value.employee.department,
            salary: value.employee.salary,
            birth_date: value.employee.birth_date,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionResponse {
    pub id: PositionId,
    pub name: String,
    pub description: Option<String>,
}

impl From<Position> for PositionResponse {
    fn from(value: Position) -> Self {
        Self {
            id: value.id,
            name: value.name,
            description: value.description,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_employee_request() -> EmployeeRequest {
        EmployeeRequest {
            first_name: Some("Ana".to_string()),
            last_name: Some("Ruiz".to_string()),
            position_id: Some(1),
            department: Some("IT".to_string()),
            salary: Some(3000.0),
            birth_date: NaiveDate::from_ymd_opt(1990, 1, 1),
        }
    }

    #[test]
    fn valid_employee_request_converts() {
        let employee = valid_employee_request()
            .into_domain()
            .expect("valid request");
        assert_eq!(employee.first_name, "Ana");
        assert_eq!(employee.position_id, 1);
    }

    #[test]
    fn out_of_range_salary_is_cited_by_field() {
        let request = EmployeeRequest {
            salary: Some(500.0),
            ..valid_employee_request()
        };

        let Err(DomainError::Validation(fields)) = request.into_domain() else {
            panic!("expected a validation error");
        };
        let messages = fields.as_map().get("salary").expect("salary messages");
        assert_eq!(messages, &vec![
            "El salario debe estar entre 1000 y 10000.".to_string()
        ]);
    }

    #[test]
    fn missing_fields_collect_one_message_each() {
        let request = EmployeeRequest {
            first_name: None,
            last_name: Some("  ".to_string()),
            position_id: Some(0),
            department: None,
            salary: None,
            birth_date: None,
        };

        let Err(DomainError::Validation(fields)) = request.into_domain() else {
            panic!("expected a validation error");
        };
        let keys: Vec<&str> = fields.as_map().keys().map(String::as_str).collect();
        assert_eq!(keys, vec![
            "birthDate",
            "department",
            "firstName",
            "lastName",
            "positionId",
            "salary",
        ]);
    }

    #[test]
    fn first_name_over_fifty_chars_is_rejected() {
        let request = EmployeeRequest {
            first_name: Some("a".repeat(51)),
            ..valid_employee_request()
        };
        assert!(matches!(
            request.into_domain(),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn position_request_trims_and_drops_blank_description() {
        let position = PositionRequest {
            name: Some("  Becario  ".to_string()),
            description: Some("   ".to_string()),
        }
        .into_domain()
        .expect("valid request");

        assert_eq!(position.name, "Becario");
        assert_eq!(position.description, None);
    }

    #[test]
    fn position_description_over_limit_is_rejected() {
        let request = PositionRequest {
            name: Some("Becario".to_string()),
            description: Some("x".repeat(251)),
        };
        let Err(DomainError::Validation(fields)) = request.into_domain() else {
            panic!("expected a validation error");
        };
        assert!(fields.as_map().contains_key("description"));
    }
}
