//! Spendwise Types - Canonical domain types for departmental expense control
//!
//! This crate contains all foundational types for Spendwise with zero
//! dependencies on other spendwise crates. It defines:
//!
//! - Identity types (DepartmentId, EmployeeId, CategoryId, etc.)
//! - Accounting periods (one calendar month each)
//! - Directory types (departments, employees, expense categories)
//! - Limit ledger entries and the effective limit snapshot
//! - Expenses and API users
//!
//! # Budget Invariants
//!
//! 1. At most one ledger entry per (department, period)
//! 2. `spent` on an entry equals the sum of admitted expenses in that period
//! 3. Carryover is the signed sum of `assigned_limit - spent` over all
//!    strictly earlier entries of the department
//! 4. An expense is admitted only if `spent + amount <= assigned + carryover`

pub mod identity;
pub mod period;
pub mod money;
pub mod directory;
pub mod ledger;
pub mod expense;
pub mod user;
pub mod error;

pub use identity::*;
pub use period::*;
pub use money::*;
pub use directory::*;
pub use ledger::*;
pub use expense::*;
pub use user::*;
pub use error::*;

/// Version of the Spendwise types schema
pub const TYPES_VERSION: &str = "0.1.0";
