use chrono::NaiveDate;

use crate::domain::position::PositionId;

pub type EmployeeId = i64;

#[derive(Debug, Clone, PartialEq)]
pub struct Employee {
    pub id: EmployeeId,
    pub first_name: String,
    pub last_name: String,
    pub position_id: PositionId,
    pub department: String,
    pub salary: f64,
    pub birth_date: NaiveDate,
}

#[derive(Debug, Clone)]
pub struct NewEmployee {
    pub first_name: String,
    pub last_name: String,
    pub position_id: PositionId,
    pub department: String,
    pub salary: f64,
    pub birth_date: NaiveDate,
}

/// Employee joined with its position's display name, the shape every read
/// path hands back so clients never have to resolve the name themselves.
#[derive(Debug, Clone, PartialEq)]
pub struct EmployeeWithPosition {
    pub employee: Employee,
    pub position_name: String,
}
