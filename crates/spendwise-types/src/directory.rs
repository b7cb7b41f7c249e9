//! Organisation directory types
//!
//! Departments own employees, employees incur expenses, and every expense
//! is classified by an [`ExpenseCategory`] that caps single transactions.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{validate_money, CategoryId, DepartmentId, EmployeeId, Result, SpendError};

/// A department that receives a monthly spending limit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Department {
    pub id: DepartmentId,
    /// Unique, non-empty name
    pub name: String,
    /// Number of employees, computed on read
    pub employee_count: i64,
    pub created_at: DateTime<Utc>,
}

impl Department {
    pub fn new(name: impl Into<String>) -> Result<Self> {
        Ok(Self {
            id: DepartmentId::new(),
            name: require_name("department name", name.into())?,
            employee_count: 0,
            created_at: Utc::now(),
        })
    }
}

/// An employee who belongs to exactly one department
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    pub id: EmployeeId,
    pub name: String,
    pub position: String,
    pub department_id: DepartmentId,
    pub created_at: DateTime<Utc>,
}

impl Employee {
    pub fn new(
        name: impl Into<String>,
        position: impl Into<String>,
        department_id: DepartmentId,
    ) -> Result<Self> {
        Ok(Self {
            id: EmployeeId::new(),
            name: require_name("employee name", name.into())?,
            position: require_name("position", position.into())?,
            department_id,
            created_at: Utc::now(),
        })
    }

    /// True if the employee is attached to `department_id`
    pub fn belongs_to(&self, department_id: DepartmentId) -> bool {
        self.department_id == department_id
    }
}

/// Partial update for an employee; absent fields keep their value
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmployeeUpdate {
    pub name: Option<String>,
    pub position: Option<String>,
    pub department_id: Option<DepartmentId>,
}

impl EmployeeUpdate {
    /// Merge the update into `employee`
    pub fn apply(self, employee: &mut Employee) -> Result<()> {
        if let Some(name) = self.name {
            employee.name = require_name("employee name", name)?;
        }
        if let Some(position) = self.position {
            employee.position = require_name("position", position)?;
        }
        if let Some(department_id) = self.department_id {
            employee.department_id = department_id;
        }
        Ok(())
    }
}

/// Expense classification with a per-transaction cap
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseCategory {
    pub id: CategoryId,
    /// Unique, non-empty name
    pub name: String,
    pub description: Option<String>,
    /// Largest amount a single expense of this category may carry
    pub transaction_cap: Decimal,
    pub created_at: DateTime<Utc>,
}

impl ExpenseCategory {
    pub fn new(
        name: impl Into<String>,
        description: Option<String>,
        transaction_cap: Decimal,
    ) -> Result<Self> {
        validate_transaction_cap(transaction_cap)?;
        Ok(Self {
            id: CategoryId::new(),
            name: require_name("category name", name.into())?,
            description,
            transaction_cap,
            created_at: Utc::now(),
        })
    }

    /// True if a single expense of `amount` fits under the cap
    pub fn permits(&self, amount: Decimal) -> bool {
        amount <= self.transaction_cap
    }
}

/// Partial update for a category; absent fields keep their value
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub transaction_cap: Option<Decimal>,
}

impl CategoryUpdate {
    /// Merge the update into `category`
    pub fn apply(self, category: &mut ExpenseCategory) -> Result<()> {
        if let Some(name) = self.name {
            category.name = require_name("category name", name)?;
        }
        if let Some(description) = self.description {
            category.description = Some(description);
        }
        if let Some(cap) = self.transaction_cap {
            validate_transaction_cap(cap)?;
            category.transaction_cap = cap;
        }
        Ok(())
    }
}

/// Reject negative and unstorable caps
pub fn validate_transaction_cap(cap: Decimal) -> Result<()> {
    if cap < Decimal::ZERO {
        return Err(SpendError::Validation(format!(
            "transaction cap must not be negative, got {}",
            cap
        )));
    }
    validate_money("transaction cap", cap)
}

/// Trim `value` and reject it when nothing is left
pub fn require_name(field: &str, value: String) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(SpendError::Validation(format!("{} must not be empty", field)));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_department_name_is_trimmed() {
        let dept = Department::new("  Operations ").unwrap();
        assert_eq!(dept.name, "Operations");
        assert_eq!(dept.employee_count, 0);
        assert!(Department::new("   ").is_err());
    }

    #[test]
    fn test_category_cap_must_not_be_negative() {
        assert!(ExpenseCategory::new("Travel", None, dec!(-1)).is_err());
        let travel = ExpenseCategory::new("Travel", None, dec!(500)).unwrap();
        assert!(travel.permits(dec!(500)));
        assert!(!travel.permits(dec!(500.01)));
    }

    #[test]
    fn test_category_cap_must_fit_storage() {
        assert!(ExpenseCategory::new("Travel", None, dec!(99.999)).is_err());
        assert!(ExpenseCategory::new("Travel", None, dec!(1000000000000)).is_err());
        assert!(matches!(
            validate_transaction_cap(dec!(0.005)),
            Err(SpendError::Validation(_))
        ));
    }

    #[test]
    fn test_employee_update_merges() {
        let dept = DepartmentId::new();
        let mut employee = Employee::new("Ada", "Engineer", dept).unwrap();
        let update = EmployeeUpdate {
            position: Some("Lead Engineer".to_string()),
            ..Default::default()
        };
        update.apply(&mut employee).unwrap();
        assert_eq!(employee.name, "Ada");
        assert_eq!(employee.position, "Lead Engineer");
        assert!(employee.belongs_to(dept));
    }

    #[test]
    fn test_category_update_validates_cap() {
        let mut meals = ExpenseCategory::new("Meals", None, dec!(100)).unwrap();
        let bad = CategoryUpdate {
            transaction_cap: Some(dec!(-10)),
            ..Default::default()
        };
        assert!(bad.apply(&mut meals.clone()).is_err());

        let good = CategoryUpdate {
            description: Some("Client dinners".to_string()),
            transaction_cap: Some(dec!(150)),
            ..Default::default()
        };
        good.apply(&mut meals).unwrap();
        assert_eq!(meals.transaction_cap, dec!(150));
        assert_eq!(meals.description.as_deref(), Some("Client dinners"));
    }
}
