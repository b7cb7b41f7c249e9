//! Expense category repository

use sqlx::PgPool;

use spendwise_types::{CategoryId, CategoryUpdate, ExpenseCategory, SpendError};

use super::on_constraint;
use crate::{DbCategory, DbResult};

/// Expense category repository
pub struct CategoryRepo {
    pool: PgPool,
}

impl CategoryRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List categories by name
    pub async fn list(&self) -> DbResult<Vec<DbCategory>> {
        let categories = sqlx::query_as::<_, DbCategory>(
            "SELECT id, name, description, transaction_cap, created_at FROM expense_categories ORDER BY name"
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(categories)
    }

    /// Find category by ID
    pub async fn find_by_id(&self, id: CategoryId) -> DbResult<Option<DbCategory>> {
        let category = sqlx::query_as::<_, DbCategory>(
            "SELECT id, name, description, transaction_cap, created_at FROM expense_categories WHERE id = $1"
        )
        .bind(id.into_uuid())
        .fetch_optional(&self.pool)
        .await?;

        Ok(category)
    }

    /// Create a new category
    pub async fn create(&self, category: &ExpenseCategory) -> DbResult<DbCategory> {
        let created = sqlx::query_as::<_, DbCategory>(
            r#"
            INSERT INTO expense_categories (id, name, description, transaction_cap, created_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, description, transaction_cap, created_at
            "#
        )
        .bind(category.id.into_uuid())
        .bind(&category.name)
        .bind(category.description.as_deref())
        .bind(category.transaction_cap)
        .bind(category.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            on_constraint(e, "expense_categories_name_key", || SpendError::DuplicateCategory {
                name: category.name.clone(),
            })
        })?;

        Ok(created)
    }

    /// Merge an update into a stored category
    pub async fn update(&self, id: CategoryId, update: CategoryUpdate) -> DbResult<DbCategory> {
        let mut category: ExpenseCategory = self
            .find_by_id(id)
            .await?
            .ok_or(SpendError::CategoryNotFound { category_id: id })?
            .into();
        update.apply(&mut category)?;

        let updated = sqlx::query_as::<_, DbCategory>(
            r#"
            UPDATE expense_categories SET name = $2, description = $3, transaction_cap = $4
            WHERE id = $1
            RETURNING id, name, description, transaction_cap, created_at
            "#
        )
        .bind(id.into_uuid())
        .bind(&category.name)
        .bind(category.description.as_deref())
        .bind(category.transaction_cap)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            on_constraint(e, "expense_categories_name_key", || SpendError::DuplicateCategory {
                name: category.name.clone(),
            })
        })?;

        updated.ok_or_else(|| SpendError::CategoryNotFound { category_id: id }.into())
    }

    /// Delete a category that no expense references
    pub async fn delete(&self, id: CategoryId) -> DbResult<()> {
        let mut tx = self.pool.begin().await?;

        let exists = sqlx::query_scalar::<_, uuid::Uuid>(
            "SELECT id FROM expense_categories WHERE id = $1 FOR UPDATE"
        )
        .bind(id.into_uuid())
        .fetch_optional(&mut *tx)
        .await?;
        if exists.is_none() {
            return Err(SpendError::CategoryNotFound { category_id: id }.into());
        }

        let has_expenses = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM expenses WHERE category_id = $1)"
        )
        .bind(id.into_uuid())
        .fetch_one(&mut *tx)
        .await?;
        if has_expenses {
            return Err(SpendError::Conflict(format!(
                "expense category {} has recorded expenses",
                id
            ))
            .into());
        }

        sqlx::query("DELETE FROM expense_categories WHERE id = $1")
            .bind(id.into_uuid())
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }
}
