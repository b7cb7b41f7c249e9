//! Error types for Spendwise
//!
//! Every variant except [`SpendError::Storage`] is a caller-correctable
//! condition and carries the data the caller needs to act on it.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::{CategoryId, DepartmentId, EmployeeId, LimitEntryId, Period};

/// Result type for Spendwise operations
pub type Result<T> = std::result::Result<T, SpendError>;

/// Spendwise error types
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SpendError {
    // ========================================================================
    // Lookup Errors
    // ========================================================================

    /// Expense category not found
    #[error("Expense category {category_id} not found")]
    CategoryNotFound { category_id: CategoryId },

    /// Department not found
    #[error("Department {department_id} not found")]
    DepartmentNotFound { department_id: DepartmentId },

    /// Employee not found
    #[error("Employee {employee_id} not found")]
    EmployeeNotFound { employee_id: EmployeeId },

    /// Limit ledger entry not found
    #[error("Limit entry {entry_id} not found")]
    LimitEntryNotFound { entry_id: LimitEntryId },

    // ========================================================================
    // Admission Errors
    // ========================================================================

    /// Amount is above the category's per-transaction cap
    #[error("Amount {attempted} exceeds the per-transaction cap of {cap}")]
    TransactionCapExceeded { cap: Decimal, attempted: Decimal },

    /// No ledger entry exists for the department and period
    #[error("No monthly limit configured for department {department_id} in {period}")]
    LimitNotConfigured {
        department_id: DepartmentId,
        period: Period,
    },

    /// Admitting the expense would push spent past the effective limit
    #[error("Effective limit {effective_limit} exceeded: spent {spent}, remaining {remaining}")]
    EffectiveLimitExceeded {
        effective_limit: Decimal,
        spent: Decimal,
        remaining: Decimal,
        carryover: Decimal,
    },

    // ========================================================================
    // Uniqueness Errors
    // ========================================================================

    /// A ledger entry for the department and period already exists
    #[error("A limit for {period} already exists for department {department_id}")]
    DuplicatePeriod {
        department_id: DepartmentId,
        period: Period,
    },

    /// Same name and position already exist in the department
    #[error("Employee {name} ({position}) already exists in department {department_id}")]
    DuplicateEmployee {
        name: String,
        position: String,
        department_id: DepartmentId,
    },

    /// Department name already taken
    #[error("Department {name} already exists")]
    DuplicateDepartment { name: String },

    /// Category name already taken
    #[error("Expense category {name} already exists")]
    DuplicateCategory { name: String },

    /// Email already registered
    #[error("User {email} already exists")]
    DuplicateUser { email: String },

    // ========================================================================
    // Referential Errors
    // ========================================================================

    /// Department still has employees
    #[error("Department {department_id} still has {employee_count} employees")]
    DepartmentHasEmployees {
        department_id: DepartmentId,
        employee_count: i64,
    },

    /// Record is still referenced elsewhere
    #[error("Conflict: {0}")]
    Conflict(String),

    // ========================================================================
    // Input & Storage Errors
    // ========================================================================

    /// Missing or malformed input
    #[error("Validation error: {0}")]
    Validation(String),

    /// The storage collaborator failed
    #[error("Storage error: {0}")]
    Storage(String),
}

impl SpendError {
    /// True for faults of the storage collaborator, false for
    /// caller-correctable conditions
    pub fn is_fault(&self) -> bool {
        matches!(self, Self::Storage(_))
    }

    /// Short machine-readable kind, used as a metrics label
    pub fn kind(&self) -> &'static str {
        match self {
            Self::CategoryNotFound { .. } => "category_not_found",
            Self::DepartmentNotFound { .. } => "department_not_found",
            Self::EmployeeNotFound { .. } => "employee_not_found",
            Self::LimitEntryNotFound { .. } => "limit_entry_not_found",
            Self::TransactionCapExceeded { .. } => "transaction_cap_exceeded",
            Self::LimitNotConfigured { .. } => "limit_not_configured",
            Self::EffectiveLimitExceeded { .. } => "effective_limit_exceeded",
            Self::DuplicatePeriod { .. } => "duplicate_period",
            Self::DuplicateEmployee { .. } => "duplicate_employee",
            Self::DuplicateDepartment { .. } => "duplicate_department",
            Self::DuplicateCategory { .. } => "duplicate_category",
            Self::DuplicateUser { .. } => "duplicate_user",
            Self::DepartmentHasEmployees { .. } => "department_has_employees",
            Self::Conflict(_) => "conflict",
            Self::Validation(_) => "validation",
            Self::Storage(_) => "storage",
        }
    }
}
