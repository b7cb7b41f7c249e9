//! Department repository

use sqlx::PgPool;

use spendwise_types::{Department, DepartmentId, SpendError};

use super::on_constraint;
use crate::{DbDepartment, DbResult};

/// Department repository
pub struct DepartmentRepo {
    pool: PgPool,
}

impl DepartmentRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List all departments by name, with live employee counts
    pub async fn list(&self) -> DbResult<Vec<DbDepartment>> {
        let departments = sqlx::query_as::<_, DbDepartment>(
            r#"
            SELECT d.id, d.name, d.created_at,
                   (SELECT COUNT(*) FROM employees e WHERE e.department_id = d.id) AS employee_count
            FROM departments d
            ORDER BY d.name
            "#
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(departments)
    }

    /// Find department by ID
    pub async fn find_by_id(&self, id: DepartmentId) -> DbResult<Option<DbDepartment>> {
        let department = sqlx::query_as::<_, DbDepartment>(
            r#"
            SELECT d.id, d.name, d.created_at,
                   (SELECT COUNT(*) FROM employees e WHERE e.department_id = d.id) AS employee_count
            FROM departments d
            WHERE d.id = $1
            "#
        )
        .bind(id.into_uuid())
        .fetch_optional(&self.pool)
        .await?;

        Ok(department)
    }

    /// Create a new department
    pub async fn create(&self, department: &Department) -> DbResult<DbDepartment> {
        let created = sqlx::query_as::<_, DbDepartment>(
            r#"
            INSERT INTO departments (id, name, created_at)
            VALUES ($1, $2, $3)
            RETURNING id, name, created_at, 0::BIGINT AS employee_count
            "#
        )
        .bind(department.id.into_uuid())
        .bind(&department.name)
        .bind(department.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            on_constraint(e, "departments_name_key", || SpendError::DuplicateDepartment {
                name: department.name.clone(),
            })
        })?;

        Ok(created)
    }

    /// Rename a department
    pub async fn rename(&self, id: DepartmentId, name: &str) -> DbResult<DbDepartment> {
        let renamed = sqlx::query_as::<_, DbDepartment>(
            r#"
            UPDATE departments SET name = $2
            WHERE id = $1
            RETURNING id, name, created_at,
                      (SELECT COUNT(*) FROM employees e WHERE e.department_id = departments.id) AS employee_count
            "#
        )
        .bind(id.into_uuid())
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            on_constraint(e, "departments_name_key", || SpendError::DuplicateDepartment {
                name: name.to_string(),
            })
        })?;

        renamed.ok_or_else(|| SpendError::DepartmentNotFound { department_id: id }.into())
    }

    /// Delete a department and its ledger entries.
    ///
    /// Refused while employees or expenses still reference it.
    pub async fn delete(&self, id: DepartmentId) -> DbResult<()> {
        let mut tx = self.pool.begin().await?;

        let exists = sqlx::query_scalar::<_, uuid::Uuid>(
            "SELECT id FROM departments WHERE id = $1 FOR UPDATE"
        )
        .bind(id.into_uuid())
        .fetch_optional(&mut *tx)
        .await?;
        if exists.is_none() {
            return Err(SpendError::DepartmentNotFound { department_id: id }.into());
        }

        let employee_count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM employees WHERE department_id = $1"
        )
        .bind(id.into_uuid())
        .fetch_one(&mut *tx)
        .await?;
        if employee_count > 0 {
            return Err(SpendError::DepartmentHasEmployees {
                department_id: id,
                employee_count,
            }
            .into());
        }

        let has_expenses = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM expenses WHERE department_id = $1)"
        )
        .bind(id.into_uuid())
        .fetch_one(&mut *tx)
        .await?;
        if has_expenses {
            return Err(SpendError::Conflict(format!(
                "department {} has recorded expenses",
                id
            ))
            .into());
        }

        // monthly_limits rows go with it (ON DELETE CASCADE)
        sqlx::query("DELETE FROM departments WHERE id = $1")
            .bind(id.into_uuid())
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }
}
