//! Expense repository
//!
//! Expenses are written only through [`LimitRepo::record_expense`] so the
//! ledger's spent counter moves in the same transaction.
//!
//! [`LimitRepo::record_expense`]: crate::LimitRepo::record_expense

use rust_decimal::Decimal;
use sqlx::{PgExecutor, PgPool};

use spendwise_ledger::{ExpenseFilter, PageRequest};
use spendwise_types::{DepartmentId, Period};

use super::limit_offset;
use crate::{DbExpense, DbResult};

/// Expense repository
pub struct ExpenseRepo {
    pool: PgPool,
}

impl ExpenseRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List expenses by date, newest first. Returns the page and the total match count.
    pub async fn list(
        &self,
        filter: &ExpenseFilter,
        page: PageRequest,
    ) -> DbResult<(Vec<DbExpense>, i64)> {
        let department_id = filter.department_id.map(|id| id.into_uuid());
        let category_id = filter.category_id.map(|id| id.into_uuid());
        let employee_id = filter.employee_id.map(|id| id.into_uuid());
        let (limit, offset) = limit_offset(page);

        let expenses = sqlx::query_as::<_, DbExpense>(
            r#"
            SELECT x.id, x.amount, x.date, x.category_id, x.employee_id, x.department_id, x.created_at
            FROM expenses x
            JOIN employees e ON e.id = x.employee_id
            WHERE ($1::uuid IS NULL OR x.department_id = $1)
              AND ($2::uuid IS NULL OR x.category_id = $2)
              AND ($3::uuid IS NULL OR x.employee_id = $3)
              AND ($4::text IS NULL OR e.position = $4)
            ORDER BY x.date DESC
            LIMIT $5 OFFSET $6
            "#
        )
        .bind(department_id)
        .bind(category_id)
        .bind(employee_id)
        .bind(filter.position.as_deref())
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        let total = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM expenses x
            JOIN employees e ON e.id = x.employee_id
            WHERE ($1::uuid IS NULL OR x.department_id = $1)
              AND ($2::uuid IS NULL OR x.category_id = $2)
              AND ($3::uuid IS NULL OR x.employee_id = $3)
              AND ($4::text IS NULL OR e.position = $4)
            "#
        )
        .bind(department_id)
        .bind(category_id)
        .bind(employee_id)
        .bind(filter.position.as_deref())
        .fetch_one(&self.pool)
        .await?;

        Ok((expenses, total))
    }

    /// Most recently created expenses
    pub async fn recent(&self, limit: i64) -> DbResult<Vec<DbExpense>> {
        let expenses = sqlx::query_as::<_, DbExpense>(
            r#"
            SELECT id, amount, date, category_id, employee_id, department_id, created_at
            FROM expenses
            ORDER BY created_at DESC
            LIMIT $1
            "#
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(expenses)
    }

    /// Sum of expense amounts for a department within a period
    pub async fn sum_for_period(&self, department_id: DepartmentId, period: Period) -> DbResult<Decimal> {
        sum_for_period(&self.pool, department_id, period).await
    }
}

/// [`ExpenseRepo::sum_for_period`] on any executor, so it can run inside a transaction
pub(crate) async fn sum_for_period<'e, E>(
    executor: E,
    department_id: DepartmentId,
    period: Period,
) -> DbResult<Decimal>
where
    E: PgExecutor<'e>,
{
    let (start, end) = period.bounds()?;
    let total = sqlx::query_scalar::<_, Decimal>(
        r#"
        SELECT COALESCE(SUM(amount), 0)
        FROM expenses
        WHERE department_id = $1 AND date >= $2 AND date < $3
        "#
    )
    .bind(department_id.into_uuid())
    .bind(start)
    .bind(end)
    .fetch_one(executor)
    .await?;

    Ok(total)
}

/// True if any expense is recorded for the department within the period
pub(crate) async fn exists_in_period<'e, E>(
    executor: E,
    department_id: DepartmentId,
    period: Period,
) -> DbResult<bool>
where
    E: PgExecutor<'e>,
{
    let (start, end) = period.bounds()?;
    let exists = sqlx::query_scalar::<_, bool>(
        r#"
        SELECT EXISTS (
            SELECT 1 FROM expenses
            WHERE department_id = $1 AND date >= $2 AND date < $3
        )
        "#
    )
    .bind(department_id.into_uuid())
    .bind(start)
    .bind(end)
    .fetch_one(executor)
    .await?;

    Ok(exists)
}
