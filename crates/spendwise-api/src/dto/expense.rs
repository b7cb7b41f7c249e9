//! Expense DTOs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use spendwise_ledger::{AdmittedExpense, ExpenseFilter, ExpenseRequest, PageRequest};
use spendwise_types::{CategoryId, DepartmentId, EmployeeId, Expense};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::common::{default_limit, default_page};

/// Record an expense
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateExpenseRequest {
    /// Must be greater than zero
    pub amount: Decimal,
    /// Defaults to now; selects the period charged
    pub date: Option<DateTime<Utc>>,
    pub category_id: Uuid,
    pub employee_id: Uuid,
    pub department_id: Uuid,
}

impl From<CreateExpenseRequest> for ExpenseRequest {
    fn from(request: CreateExpenseRequest) -> Self {
        Self {
            amount: request.amount,
            category_id: CategoryId::from(request.category_id),
            employee_id: EmployeeId::from(request.employee_id),
            department_id: DepartmentId::from(request.department_id),
            date: request.date,
        }
    }
}

/// Expense list filters
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ExpenseListQuery {
    pub department: Option<Uuid>,
    pub category: Option<Uuid>,
    pub employee: Option<Uuid>,
    /// Only expenses whose employee holds this position
    pub position: Option<String>,
    #[serde(default = "default_page")]
    #[validate(range(min = 1, message = "Page must be >= 1"))]
    pub page: u32,
    #[serde(default = "default_limit")]
    #[validate(range(max = 1000, message = "Limit must be at most 1000"))]
    pub limit: u32,
}

impl ExpenseListQuery {
    pub fn filter(&self) -> ExpenseFilter {
        ExpenseFilter {
            department_id: self.department.map(DepartmentId::from),
            category_id: self.category.map(CategoryId::from),
            employee_id: self.employee.map(EmployeeId::from),
            position: self.position.clone(),
        }
    }

    pub fn page_request(&self) -> PageRequest {
        PageRequest::new(self.page, self.limit)
    }
}

/// Expense view
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseResponse {
    pub id: Uuid,
    pub amount: Decimal,
    pub date: DateTime<Utc>,
    pub category_id: Uuid,
    pub employee_id: Uuid,
    pub department_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl From<Expense> for ExpenseResponse {
    fn from(expense: Expense) -> Self {
        Self {
            id: expense.id.into_uuid(),
            amount: expense.amount,
            date: expense.date,
            category_id: expense.category_id.into_uuid(),
            employee_id: expense.employee_id.into_uuid(),
            department_id: expense.department_id.into_uuid(),
            created_at: expense.created_at,
        }
    }
}

/// Ledger state after an admitted expense
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LimitInfo {
    /// Ledger entry id
    pub id: Uuid,
    pub department_id: Uuid,
    pub year: i32,
    pub month: u32,
    pub assigned_limit: Decimal,
    pub spent: Decimal,
    pub effective_limit: Decimal,
    pub carryover: Decimal,
    pub available: Decimal,
}

/// Admitted expense with the charged ledger entry
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateExpenseResponse {
    pub expense: ExpenseResponse,
    pub limit_info: LimitInfo,
}

impl From<AdmittedExpense> for CreateExpenseResponse {
    fn from(admitted: AdmittedExpense) -> Self {
        let AdmittedExpense { expense, entry, limit } = admitted;
        Self {
            expense: expense.into(),
            limit_info: LimitInfo {
                id: entry.id.into_uuid(),
                department_id: entry.department_id.into_uuid(),
                year: entry.period.year,
                month: entry.period.month,
                assigned_limit: limit.assigned_limit,
                spent: limit.spent,
                effective_limit: limit.effective_limit,
                carryover: limit.carryover,
                available: limit.available,
            },
        }
    }
}
