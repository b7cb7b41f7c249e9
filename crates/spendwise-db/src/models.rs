//! Database models - mapped from PostgreSQL tables

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::FromRow;
use uuid::Uuid;

use spendwise_types::{
    Department, Employee, Expense, ExpenseCategory, LimitLedgerEntry, Period, User,
};

// ============================================================================
// Directory Models
// ============================================================================

#[derive(Debug, Clone, FromRow)]
pub struct DbDepartment {
    pub id: Uuid,
    pub name: String,
    /// Computed by the query, not stored
    pub employee_count: i64,
    pub created_at: DateTime<Utc>,
}

impl From<DbDepartment> for Department {
    fn from(row: DbDepartment) -> Self {
        Self {
            id: row.id.into(),
            name: row.name,
            employee_count: row.employee_count,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct DbEmployee {
    pub id: Uuid,
    pub name: String,
    pub position: String,
    pub department_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl From<DbEmployee> for Employee {
    fn from(row: DbEmployee) -> Self {
        Self {
            id: row.id.into(),
            name: row.name,
            position: row.position,
            department_id: row.department_id.into(),
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct DbCategory {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub transaction_cap: Decimal,
    pub created_at: DateTime<Utc>,
}

impl From<DbCategory> for ExpenseCategory {
    fn from(row: DbCategory) -> Self {
        Self {
            id: row.id.into(),
            name: row.name,
            description: row.description,
            transaction_cap: row.transaction_cap,
            created_at: row.created_at,
        }
    }
}

// ============================================================================
// Ledger Models
// ============================================================================

#[derive(Debug, Clone, FromRow)]
pub struct DbLimitEntry {
    pub id: Uuid,
    pub department_id: Uuid,
    pub year: i32,
    pub month: i32,
    pub assigned_limit: Decimal,
    pub spent: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<DbLimitEntry> for LimitLedgerEntry {
    fn from(row: DbLimitEntry) -> Self {
        // Range is guaranteed by the table's CHECK constraints
        Self {
            id: row.id.into(),
            department_id: row.department_id.into(),
            period: Period {
                year: row.year,
                month: row.month as u32,
            },
            assigned_limit: row.assigned_limit,
            spent: row.spent,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct DbExpense {
    pub id: Uuid,
    pub amount: Decimal,
    pub date: DateTime<Utc>,
    pub category_id: Uuid,
    pub employee_id: Uuid,
    pub department_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl From<DbExpense> for Expense {
    fn from(row: DbExpense) -> Self {
        Self {
            id: row.id.into(),
            amount: row.amount,
            date: row.date,
            category_id: row.category_id.into(),
            employee_id: row.employee_id.into(),
            department_id: row.department_id.into(),
            created_at: row.created_at,
        }
    }
}

// ============================================================================
// User Models
// ============================================================================

#[derive(Debug, Clone, FromRow)]
pub struct DbUser {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl From<DbUser> for User {
    fn from(row: DbUser) -> Self {
        Self {
            id: row.id.into(),
            email: row.email,
            password_hash: row.password_hash,
            created_at: row.created_at,
        }
    }
}
