//! Employee Tracker - an interactive tracker for departments, roles and employees
//!
//! The `store` module is the data access layer over three related tables;
//! the `menu` module drives the interactive loop on top of it.

pub mod config;
pub mod db;
pub mod entity;
pub mod error;
pub mod menu;
pub mod store;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, AppResult};
pub use store::{CascadeReport, NewEmployee, Store};
