//! Data Transfer Objects
//!
//! Request and response structures for the API. Field names are camelCase
//! and money is serialized as decimal strings.

pub mod auth;
pub mod common;
pub mod dashboard;
pub mod department;
pub mod employee;
pub mod expense;
pub mod expense_type;
pub mod limit;

pub use auth::*;
pub use common::*;
pub use dashboard::*;
pub use department::*;
pub use employee::*;
pub use expense::*;
pub use expense_type::*;
pub use limit::*;
