//! Spendwise Ledger - Monthly limit accounting with carryover
//!
//! The ledger holds one entry per (department, period) with the assigned
//! limit and the running spend. On top of it:
//!
//! - [`carryover`] sums the unspent balance of every earlier period
//! - [`resolver`] turns entry + carryover into an [`EffectiveLimit`]
//! - [`admission`] admits or rejects new expenses against it
//! - [`reporter`] builds per-department and dashboard views
//!
//! Storage is reached only through the traits in [`store`].
//! [`MemoryStore`] implements them in-process.
//!
//! # Invariants
//!
//! 1. At most one entry per (department, period)
//! 2. `spent` increases only together with a stored expense
//! 3. A rejected admission leaves the ledger unchanged
//! 4. Admissions for the same (department, period) are serialized
//!
//! [`EffectiveLimit`]: spendwise_types::EffectiveLimit

pub mod admission;
pub mod carryover;
pub mod memory;
pub mod reporter;
pub mod resolver;
pub mod store;

pub use admission::{AdmissionController, AdmittedExpense, ExpenseRequest};
pub use carryover::carryover;
pub use memory::MemoryStore;
pub use reporter::{DashboardSummary, DepartmentFunds, FundsReporter, DASHBOARD_RECENT_EXPENSES};
pub use resolver::{resolve, resolve_from, Resolution};
pub use store::{
    CategoryStore, DepartmentStore, EmployeeFilter, EmployeeStore, ExpenseFilter, ExpenseStore,
    HealthCheck, LimitLedger, LimitUpsert, Page, PageRequest, Store, UserStore,
};
