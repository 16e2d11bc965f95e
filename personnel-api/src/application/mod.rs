pub mod dto;
pub mod employee_service;
pub mod position_service;
