pub mod employee;
pub mod errors;
pub mod position;
