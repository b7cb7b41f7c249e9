//! Expense admission
//!
//! Validates a proposed expense against its category's per-transaction cap
//! and the department's effective limit, then records it. Decisions for the
//! same (department, period) are serialized in-process so two concurrent
//! admissions can never both pass against the same stale `spent`.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{debug, info};

use spendwise_types::{
    validate_amount, CategoryId, DepartmentId, EffectiveLimit, EmployeeId, Expense,
    LimitLedgerEntry, NewExpense, Period, Result, SpendError,
};

use crate::resolver::resolve;
use crate::store::{CategoryStore, DepartmentStore, EmployeeStore, LimitLedger, Store};

/// A proposed expense
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseRequest {
    pub amount: Decimal,
    pub category_id: CategoryId,
    pub employee_id: EmployeeId,
    pub department_id: DepartmentId,
    /// Defaults to now
    pub date: Option<DateTime<Utc>>,
}

/// A recorded expense with the ledger position after it was applied
#[derive(Debug, Clone, PartialEq)]
pub struct AdmittedExpense {
    pub expense: Expense,
    pub entry: LimitLedgerEntry,
    pub limit: EffectiveLimit,
}

type PeriodKey = (DepartmentId, Period);

/// Gatekeeper for new expenses
pub struct AdmissionController {
    store: Arc<dyn Store>,
    locks: DashMap<PeriodKey, Arc<Mutex<()>>>,
}

impl AdmissionController {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self {
            store,
            locks: DashMap::new(),
        }
    }

    fn lock_for(&self, key: PeriodKey) -> Arc<Mutex<()>> {
        self.locks
            .entry(key)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Serialize on `key` until the returned guard is dropped
    async fn acquire(&self, key: PeriodKey) -> KeyGuard<'_> {
        let guard = self.lock_for(key).lock_owned().await;
        KeyGuard {
            locks: &self.locks,
            key,
            guard: Some(guard),
        }
    }

    /// Admit or reject an expense.
    ///
    /// Checks run in this order, the first failure wins:
    ///
    /// 1. amount is positive
    /// 2. category exists and its cap covers the amount
    /// 3. department exists, employee exists and belongs to it
    /// 4. a ledger entry is configured for the expense's period
    /// 5. `spent + amount <= effective_limit`
    ///
    /// A rejection leaves the ledger untouched.
    pub async fn admit(&self, request: ExpenseRequest) -> Result<AdmittedExpense> {
        validate_amount(request.amount)?;

        let category = self
            .store
            .get_category(request.category_id)
            .await?
            .ok_or(SpendError::CategoryNotFound {
                category_id: request.category_id,
            })?;
        if !category.permits(request.amount) {
            return Err(SpendError::TransactionCapExceeded {
                cap: category.transaction_cap,
                attempted: request.amount,
            });
        }

        self.store
            .get_department(request.department_id)
            .await?
            .ok_or(SpendError::DepartmentNotFound {
                department_id: request.department_id,
            })?;
        let employee = self
            .store
            .get_employee(request.employee_id)
            .await?
            .ok_or(SpendError::EmployeeNotFound {
                employee_id: request.employee_id,
            })?;
        if !employee.belongs_to(request.department_id) {
            return Err(SpendError::Validation(format!(
                "employee {} does not belong to department {}",
                employee.id, request.department_id
            )));
        }

        let date = request.date.unwrap_or_else(Utc::now);
        let period = Period::from_date(date);
        let key = (request.department_id, period);

        let _guard = self.acquire(key).await;

        let resolution = resolve(&*self.store, request.department_id, period).await?;
        if resolution.entry.is_none() {
            debug!(
                department_id = %request.department_id,
                period = %period,
                "Expense rejected: no limit configured"
            );
            return Err(SpendError::LimitNotConfigured {
                department_id: request.department_id,
                period,
            });
        }

        let before = resolution.limit;
        if !before.admits(request.amount) {
            debug!(
                department_id = %request.department_id,
                period = %period,
                amount = %request.amount,
                effective_limit = %before.effective_limit,
                spent = %before.spent,
                "Expense rejected: effective limit exceeded"
            );
            return Err(SpendError::EffectiveLimitExceeded {
                effective_limit: before.effective_limit,
                spent: before.spent,
                remaining: before.available,
                carryover: before.carryover,
            });
        }

        let (expense, entry) = self
            .store
            .record_expense(
                NewExpense {
                    amount: request.amount,
                    date,
                    category_id: category.id,
                    employee_id: employee.id,
                    department_id: request.department_id,
                },
                before.carryover,
            )
            .await?;
        let limit = EffectiveLimit::new(entry.assigned_limit, entry.spent, before.carryover);

        info!(
            expense_id = %expense.id,
            department_id = %expense.department_id,
            period = %period,
            amount = %expense.amount,
            available = %limit.available,
            "Expense admitted"
        );

        Ok(AdmittedExpense {
            expense,
            entry,
            limit,
        })
    }
}

/// Held lock on one (department, period)
///
/// On drop the key's mutex leaves the table once nothing else holds it.
struct KeyGuard<'a> {
    locks: &'a DashMap<PeriodKey, Arc<Mutex<()>>>,
    key: PeriodKey,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for KeyGuard<'_> {
    fn drop(&mut self) {
        // Release our reference first so the count below sees only the table's
        drop(self.guard.take());
        self.locks
            .remove_if(&self.key, |_, held| Arc::strong_count(held) == 1);
    }
}
