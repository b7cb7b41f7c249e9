//! API Handlers
//!
//! Request handlers for all API endpoints.
//! Each module handles a specific resource.

pub mod auth;
pub mod dashboard;
pub mod departments;
pub mod employees;
pub mod expense_types;
pub mod expenses;
pub mod health;
pub mod limits;

pub use health::*;
