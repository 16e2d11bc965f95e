pub mod employees_handler;
pub mod positions_handler;
pub mod problem;
