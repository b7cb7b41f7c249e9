//! Expense records

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
    validate_money, CategoryId, DepartmentId, EmployeeId, ExpenseId, Period, Result, SpendError,
};

/// An admitted expense; immutable once stored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: ExpenseId,
    pub amount: Decimal,
    /// Date the expense was incurred; determines its period
    pub date: DateTime<Utc>,
    pub category_id: CategoryId,
    pub employee_id: EmployeeId,
    pub department_id: DepartmentId,
    pub created_at: DateTime<Utc>,
}

impl Expense {
    pub fn period(&self) -> Period {
        Period::from_date(self.date)
    }
}

/// A validated expense waiting to be written
#[derive(Debug, Clone, PartialEq)]
pub struct NewExpense {
    pub amount: Decimal,
    pub date: DateTime<Utc>,
    pub category_id: CategoryId,
    pub employee_id: EmployeeId,
    pub department_id: DepartmentId,
}

impl NewExpense {
    pub fn period(&self) -> Period {
        Period::from_date(self.date)
    }

    /// Assign an id and creation time
    pub fn into_expense(self) -> Expense {
        Expense {
            id: ExpenseId::new(),
            amount: self.amount,
            date: self.date,
            category_id: self.category_id,
            employee_id: self.employee_id,
            department_id: self.department_id,
            created_at: Utc::now(),
        }
    }
}

/// Reject zero, negative and unstorable amounts
pub fn validate_amount(amount: Decimal) -> Result<()> {
    if amount <= Decimal::ZERO {
        return Err(SpendError::Validation(format!(
            "amount must be greater than zero, got {}",
            amount
        )));
    }
    validate_money("amount", amount)
}
