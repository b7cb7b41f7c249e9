//! Department funds reporting
//!
//! Read-only views built on the resolver: one department, every
//! department, and the system-wide dashboard.

use std::sync::Arc;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use spendwise_types::{
    Department, DepartmentId, EffectiveLimit, Expense, LimitLedgerEntry, Period, Result,
    SpendError,
};

use crate::resolver::resolve_from;
use crate::store::{DepartmentStore, ExpenseStore, LimitLedger, Store};

/// Number of expenses shown on the dashboard
pub const DASHBOARD_RECENT_EXPENSES: usize = 5;

/// Budget position of one department
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepartmentFunds {
    pub department_id: DepartmentId,
    pub department_name: String,
    pub period: Period,
    #[serde(flatten)]
    pub limit: EffectiveLimit,
}

/// System-wide totals for one period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub period: Period,
    /// Sum of effective limits
    pub total_limit: Decimal,
    pub total_spent: Decimal,
    pub total_available: Decimal,
    pub by_department: Vec<DepartmentFunds>,
    pub recent_expenses: Vec<Expense>,
}

/// Read-only funds reporter
#[derive(Clone)]
pub struct FundsReporter {
    store: Arc<dyn Store>,
}

impl FundsReporter {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    fn funds(department: &Department, entries: &[LimitLedgerEntry], period: Period) -> DepartmentFunds {
        DepartmentFunds {
            department_id: department.id,
            department_name: department.name.clone(),
            period,
            limit: resolve_from(entries, department.id, period).limit,
        }
    }

    /// Funds of one department; `DepartmentNotFound` for an unknown id
    pub async fn department_funds(
        &self,
        department_id: DepartmentId,
        period: Period,
    ) -> Result<DepartmentFunds> {
        let department = self
            .store
            .get_department(department_id)
            .await?
            .ok_or(SpendError::DepartmentNotFound { department_id })?;
        let entries = self.store.list_entries_for(department_id).await?;
        Ok(Self::funds(&department, &entries, period))
    }

    /// Funds of every department, sorted by department name
    pub async fn all_department_funds(&self, period: Period) -> Result<Vec<DepartmentFunds>> {
        let departments = self.store.list_departments().await?;
        let entries = self.store.list_entries().await?;
        Ok(departments
            .iter()
            .map(|d| Self::funds(d, &entries, period))
            .collect())
    }

    /// Totals across all departments plus the most recent expenses
    pub async fn dashboard(&self, period: Period) -> Result<DashboardSummary> {
        let by_department = self.all_department_funds(period).await?;
        let recent_expenses = self
            .store
            .recent_expenses(DASHBOARD_RECENT_EXPENSES)
            .await?;

        let total_limit: Decimal = by_department.iter().map(|f| f.limit.effective_limit).sum();
        let total_spent: Decimal = by_department.iter().map(|f| f.limit.spent).sum();

        Ok(DashboardSummary {
            period,
            total_limit,
            total_spent,
            total_available: total_limit - total_spent,
            by_department,
            recent_expenses,
        })
    }
}
