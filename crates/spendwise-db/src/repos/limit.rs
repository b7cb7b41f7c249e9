//! Monthly limit ledger repository
//!
//! Writes that touch `spent` lock the ledger row with `FOR UPDATE` and add
//! in place, so the stored total stays exact under concurrent writers.
//! Expense writes also re-check the effective limit against the locked row.

use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use spendwise_types::{
    validate_assigned_limit, DepartmentId, EffectiveLimit, LimitEntryId, LimitLedgerEntry,
    NewExpense, Period, SpendError,
};

use super::expense::{exists_in_period, sum_for_period};
use crate::{DbError, DbExpense, DbLimitEntry, DbResult};

/// Limit ledger repository
pub struct LimitRepo {
    pool: PgPool,
}

fn map_insert_error(e: sqlx::Error, department_id: DepartmentId, period: Period) -> DbError {
    if let sqlx::Error::Database(ref db_err) = e {
        match db_err.constraint() {
            Some("monthly_limits_period_key") => {
                return SpendError::DuplicatePeriod {
                    department_id,
                    period,
                }
                .into();
            }
            Some("monthly_limits_department_id_fkey") => {
                return SpendError::DepartmentNotFound { department_id }.into();
            }
            _ => {}
        }
    }
    DbError::Query(e)
}

impl LimitRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find the entry for a department and period
    pub async fn find(
        &self,
        department_id: DepartmentId,
        period: Period,
    ) -> DbResult<Option<DbLimitEntry>> {
        let entry = sqlx::query_as::<_, DbLimitEntry>(
            r#"
            SELECT id, department_id, year, month, assigned_limit, spent, created_at, updated_at
            FROM monthly_limits
            WHERE department_id = $1 AND year = $2 AND month = $3
            "#
        )
        .bind(department_id.into_uuid())
        .bind(period.year)
        .bind(period.month as i32)
        .fetch_optional(&self.pool)
        .await?;

        Ok(entry)
    }

    /// Find entry by ID
    pub async fn find_by_id(&self, id: LimitEntryId) -> DbResult<Option<DbLimitEntry>> {
        let entry = sqlx::query_as::<_, DbLimitEntry>(
            r#"
            SELECT id, department_id, year, month, assigned_limit, spent, created_at, updated_at
            FROM monthly_limits
            WHERE id = $1
            "#
        )
        .bind(id.into_uuid())
        .fetch_optional(&self.pool)
        .await?;

        Ok(entry)
    }

    /// Every entry, period descending
    pub async fn list_all(&self) -> DbResult<Vec<DbLimitEntry>> {
        let entries = sqlx::query_as::<_, DbLimitEntry>(
            r#"
            SELECT id, department_id, year, month, assigned_limit, spent, created_at, updated_at
            FROM monthly_limits
            ORDER BY year DESC, month DESC
            "#
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }

    /// Entries of one department, period descending
    pub async fn list_for_department(&self, department_id: DepartmentId) -> DbResult<Vec<DbLimitEntry>> {
        let entries = sqlx::query_as::<_, DbLimitEntry>(
            r#"
            SELECT id, department_id, year, month, assigned_limit, spent, created_at, updated_at
            FROM monthly_limits
            WHERE department_id = $1
            ORDER BY year DESC, month DESC
            "#
        )
        .bind(department_id.into_uuid())
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }

    /// Insert a new entry
    pub async fn insert(&self, entry: &LimitLedgerEntry) -> DbResult<DbLimitEntry> {
        let created = sqlx::query_as::<_, DbLimitEntry>(
            r#"
            INSERT INTO monthly_limits
                (id, department_id, year, month, assigned_limit, spent, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, department_id, year, month, assigned_limit, spent, created_at, updated_at
            "#
        )
        .bind(entry.id.into_uuid())
        .bind(entry.department_id.into_uuid())
        .bind(entry.period.year)
        .bind(entry.period.month as i32)
        .bind(entry.assigned_limit)
        .bind(entry.spent)
        .bind(entry.created_at)
        .bind(entry.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_insert_error(e, entry.department_id, entry.period))?;

        Ok(created)
    }

    /// Replace the assigned limit, or create the entry with `spent` seeded
    /// from expenses already recorded in the period. The flag is true on create.
    pub async fn upsert_assigned_limit(
        &self,
        department_id: DepartmentId,
        period: Period,
        amount: Decimal,
    ) -> DbResult<(DbLimitEntry, bool)> {
        validate_assigned_limit(amount)?;
        let mut tx = self.pool.begin().await?;

        let existing = sqlx::query_scalar::<_, Uuid>(
            r#"
            SELECT id FROM monthly_limits
            WHERE department_id = $1 AND year = $2 AND month = $3
            FOR UPDATE
            "#
        )
        .bind(department_id.into_uuid())
        .bind(period.year)
        .bind(period.month as i32)
        .fetch_optional(&mut *tx)
        .await?;

        let result = match existing {
            Some(id) => {
                let entry = sqlx::query_as::<_, DbLimitEntry>(
                    r#"
                    UPDATE monthly_limits SET assigned_limit = $2, updated_at = NOW()
                    WHERE id = $1
                    RETURNING id, department_id, year, month, assigned_limit, spent, created_at, updated_at
                    "#
                )
                .bind(id)
                .bind(amount)
                .fetch_one(&mut *tx)
                .await?;
                (entry, false)
            }
            None => {
                let spent = sum_for_period(&mut *tx, department_id, period).await?;
                let entry = LimitLedgerEntry::new(department_id, period, amount, spent)?;
                let created = sqlx::query_as::<_, DbLimitEntry>(
                    r#"
                    INSERT INTO monthly_limits
                        (id, department_id, year, month, assigned_limit, spent, created_at, updated_at)
                    VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                    RETURNING id, department_id, year, month, assigned_limit, spent, created_at, updated_at
                    "#
                )
                .bind(entry.id.into_uuid())
                .bind(department_id.into_uuid())
                .bind(period.year)
                .bind(period.month as i32)
                .bind(entry.assigned_limit)
                .bind(entry.spent)
                .bind(entry.created_at)
                .bind(entry.updated_at)
                .fetch_one(&mut *tx)
                .await
                .map_err(|e| map_insert_error(e, department_id, period))?;
                (created, true)
            }
        };

        tx.commit().await?;
        Ok(result)
    }

    /// Add `delta` to `spent` in place
    pub async fn increment_spent(
        &self,
        department_id: DepartmentId,
        period: Period,
        delta: Decimal,
    ) -> DbResult<DbLimitEntry> {
        let entry = sqlx::query_as::<_, DbLimitEntry>(
            r#"
            UPDATE monthly_limits SET spent = spent + $4, updated_at = NOW()
            WHERE department_id = $1 AND year = $2 AND month = $3
            RETURNING id, department_id, year, month, assigned_limit, spent, created_at, updated_at
            "#
        )
        .bind(department_id.into_uuid())
        .bind(period.year)
        .bind(period.month as i32)
        .bind(delta)
        .fetch_optional(&self.pool)
        .await?;

        entry.ok_or_else(|| {
            SpendError::LimitNotConfigured {
                department_id,
                period,
            }
            .into()
        })
    }

    /// Overwrite the assigned limit; spent is not recomputed
    pub async fn update_assigned_limit(
        &self,
        id: LimitEntryId,
        amount: Decimal,
    ) -> DbResult<DbLimitEntry> {
        validate_assigned_limit(amount)?;
        let entry = sqlx::query_as::<_, DbLimitEntry>(
            r#"
            UPDATE monthly_limits SET assigned_limit = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING id, department_id, year, month, assigned_limit, spent, created_at, updated_at
            "#
        )
        .bind(id.into_uuid())
        .bind(amount)
        .fetch_optional(&self.pool)
        .await?;

        entry.ok_or_else(|| SpendError::LimitEntryNotFound { entry_id: id }.into())
    }

    /// Delete an entry that no recorded expense falls under
    pub async fn delete(&self, id: LimitEntryId) -> DbResult<()> {
        let mut tx = self.pool.begin().await?;

        let entry: LimitLedgerEntry = sqlx::query_as::<_, DbLimitEntry>(
            r#"
            SELECT id, department_id, year, month, assigned_limit, spent, created_at, updated_at
            FROM monthly_limits
            WHERE id = $1
            FOR UPDATE
            "#
        )
        .bind(id.into_uuid())
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(SpendError::LimitEntryNotFound { entry_id: id })?
        .into();

        if exists_in_period(&mut *tx, entry.department_id, entry.period).await? {
            return Err(SpendError::Conflict(format!(
                "expenses are recorded against the {} limit of department {}",
                entry.period, entry.department_id
            ))
            .into());
        }

        sqlx::query("DELETE FROM monthly_limits WHERE id = $1")
            .bind(id.into_uuid())
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    /// Insert the expense and add its amount to the matching ledger row in
    /// one transaction. Fails with `LimitNotConfigured` if there is no row
    /// and with `EffectiveLimitExceeded` if the locked row, plus
    /// `carryover`, cannot absorb the amount.
    pub async fn record_expense(
        &self,
        expense: NewExpense,
        carryover: Decimal,
    ) -> DbResult<(DbExpense, DbLimitEntry)> {
        let period = expense.period();
        let mut tx = self.pool.begin().await?;

        let (entry_id, assigned_limit, spent) = sqlx::query_as::<_, (Uuid, Decimal, Decimal)>(
            r#"
            SELECT id, assigned_limit, spent FROM monthly_limits
            WHERE department_id = $1 AND year = $2 AND month = $3
            FOR UPDATE
            "#
        )
        .bind(expense.department_id.into_uuid())
        .bind(period.year)
        .bind(period.month as i32)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(SpendError::LimitNotConfigured {
            department_id: expense.department_id,
            period,
        })?;

        // Dropping `tx` on the error path rolls back and releases the row
        EffectiveLimit::new(assigned_limit, spent, carryover).ensure_admits(expense.amount)?;

        let expense = expense.into_expense();
        let stored = sqlx::query_as::<_, DbExpense>(
            r#"
            INSERT INTO expenses (id, amount, date, category_id, employee_id, department_id, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, amount, date, category_id, employee_id, department_id, created_at
            "#
        )
        .bind(expense.id.into_uuid())
        .bind(expense.amount)
        .bind(expense.date)
        .bind(expense.category_id.into_uuid())
        .bind(expense.employee_id.into_uuid())
        .bind(expense.department_id.into_uuid())
        .bind(expense.created_at)
        .fetch_one(&mut *tx)
        .await?;

        let entry = sqlx::query_as::<_, DbLimitEntry>(
            r#"
            UPDATE monthly_limits SET spent = spent + $2, updated_at = NOW()
            WHERE id = $1
            RETURNING id, department_id, year, month, assigned_limit, spent, created_at, updated_at
            "#
        )
        .bind(entry_id)
        .bind(expense.amount)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit()
            .await
            .map_err(|e| DbError::Transaction(e.to_string()))?;
        Ok((stored, entry))
    }
}
