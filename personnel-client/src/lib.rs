//! Headless client for the personnel API: the HTTP gateway, the state store
//! a UI drives, and the notification queue it drains.

pub mod api;
pub mod config;
pub mod notify;
pub mod store;
pub mod timer;

pub use api::{ApiError, DirectoryApi, HttpDirectoryApi};
pub use store::DirectoryStore;
