use std::sync::Arc;

use crate::application::{employee_service::EmployeeService, position_service::PositionService};

#[derive(Clone)]
pub struct AppState {
    pub employee_service: Arc<EmployeeService>,
    pub position_service: Arc<PositionService>,
}

impl AppState {
    pub fn new(
        employee_service: Arc<EmployeeService>,
        position_service: Arc<PositionService>,
    ) -> Self {
        Self {
            employee_service,
            position_service,
        }
    }
}
