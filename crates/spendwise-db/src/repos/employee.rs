//! Employee repository

use sqlx::PgPool;

use spendwise_ledger::{EmployeeFilter, PageRequest};
use spendwise_types::{Employee, EmployeeId, EmployeeUpdate, SpendError};

use super::{limit_offset, on_constraint};
use crate::{DbEmployee, DbError, DbResult};

/// Employee repository
pub struct EmployeeRepo {
    pool: PgPool,
}

fn map_write_error(e: sqlx::Error, employee: &Employee) -> DbError {
    let fk = matches!(
        &e,
        sqlx::Error::Database(db_err) if db_err.constraint() == Some("employees_department_id_fkey")
    );
    if fk {
        return SpendError::DepartmentNotFound {
            department_id: employee.department_id,
        }
        .into();
    }
    on_constraint(e, "employees_identity_key", || SpendError::DuplicateEmployee {
        name: employee.name.clone(),
        position: employee.position.clone(),
        department_id: employee.department_id,
    })
}

impl EmployeeRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List employees, newest first. Returns the page and the total match count.
    pub async fn list(
        &self,
        filter: &EmployeeFilter,
        page: PageRequest,
    ) -> DbResult<(Vec<DbEmployee>, i64)> {
        let department_id = filter.department_id.map(|d| d.into_uuid());
        let (limit, offset) = limit_offset(page);

        let employees = sqlx::query_as::<_, DbEmployee>(
            r#"
            SELECT id, name, position, department_id, created_at
            FROM employees
            WHERE ($1::uuid IS NULL OR department_id = $1)
              AND ($2::text IS NULL OR position = $2)
            ORDER BY created_at DESC
            LIMIT $3 OFFSET $4
            "#
        )
        .bind(department_id)
        .bind(filter.position.as_deref())
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        let total = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM employees
            WHERE ($1::uuid IS NULL OR department_id = $1)
              AND ($2::text IS NULL OR position = $2)
            "#
        )
        .bind(department_id)
        .bind(filter.position.as_deref())
        .fetch_one(&self.pool)
        .await?;

        Ok((employees, total))
    }

    /// Find employee by ID
    pub async fn find_by_id(&self, id: EmployeeId) -> DbResult<Option<DbEmployee>> {
        let employee = sqlx::query_as::<_, DbEmployee>(
            "SELECT id, name, position, department_id, created_at FROM employees WHERE id = $1"
        )
        .bind(id.into_uuid())
        .fetch_optional(&self.pool)
        .await?;

        Ok(employee)
    }

    /// Create a new employee
    pub async fn create(&self, employee: &Employee) -> DbResult<DbEmployee> {
        let created = sqlx::query_as::<_, DbEmployee>(
            r#"
            INSERT INTO employees (id, name, position, department_id, created_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, position, department_id, created_at
            "#
        )
        .bind(employee.id.into_uuid())
        .bind(&employee.name)
        .bind(&employee.position)
        .bind(employee.department_id.into_uuid())
        .bind(employee.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_write_error(e, employee))?;

        Ok(created)
    }

    /// Merge an update into a stored employee
    pub async fn update(&self, id: EmployeeId, update: EmployeeUpdate) -> DbResult<DbEmployee> {
        let mut employee: Employee = self
            .find_by_id(id)
            .await?
            .ok_or(SpendError::EmployeeNotFound { employee_id: id })?
            .into();
        update.apply(&mut employee)?;

        let updated = sqlx::query_as::<_, DbEmployee>(
            r#"
            UPDATE employees SET name = $2, position = $3, department_id = $4
            WHERE id = $1
            RETURNING id, name, position, department_id, created_at
            "#
        )
        .bind(id.into_uuid())
        .bind(&employee.name)
        .bind(&employee.position)
        .bind(employee.department_id.into_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_write_error(e, &employee))?;

        updated.ok_or_else(|| SpendError::EmployeeNotFound { employee_id: id }.into())
    }

    /// Delete an employee that has no recorded expenses
    pub async fn delete(&self, id: EmployeeId) -> DbResult<()> {
        let mut tx = self.pool.begin().await?;

        let exists = sqlx::query_scalar::<_, uuid::Uuid>(
            "SELECT id FROM employees WHERE id = $1 FOR UPDATE"
        )
        .bind(id.into_uuid())
        .fetch_optional(&mut *tx)
        .await?;
        if exists.is_none() {
            return Err(SpendError::EmployeeNotFound { employee_id: id }.into());
        }

        let has_expenses = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM expenses WHERE employee_id = $1)"
        )
        .bind(id.into_uuid())
        .fetch_one(&mut *tx)
        .await?;
        if has_expenses {
            return Err(SpendError::Conflict(format!("employee {} has recorded expenses", id)).into());
        }

        sqlx::query("DELETE FROM employees WHERE id = $1")
            .bind(id.into_uuid())
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    /// Distinct positions, sorted
    pub async fn positions(&self) -> DbResult<Vec<String>> {
        let positions = sqlx::query_scalar::<_, String>(
            "SELECT DISTINCT position FROM employees ORDER BY position"
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(positions)
    }
}
