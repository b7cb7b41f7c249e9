//! User repository

use sqlx::PgPool;

use spendwise_types::{SpendError, User, UserId};

use super::on_constraint;
use crate::{DbResult, DbUser};

/// User repository for authentication
pub struct UserRepo {
    pool: PgPool,
}

impl UserRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new user
    pub async fn create(&self, user: &User) -> DbResult<DbUser> {
        let created = sqlx::query_as::<_, DbUser>(
            r#"
            INSERT INTO users (id, email, password_hash, created_at)
            VALUES ($1, $2, $3, $4)
            RETURNING id, email, password_hash, created_at
            "#
        )
        .bind(user.id.into_uuid())
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            on_constraint(e, "users_email_key", || SpendError::DuplicateUser {
                email: user.email.clone(),
            })
        })?;

        Ok(created)
    }

    /// Find user by ID
    pub async fn find_by_id(&self, id: UserId) -> DbResult<Option<DbUser>> {
        let user = sqlx::query_as::<_, DbUser>(
            "SELECT id, email, password_hash, created_at FROM users WHERE id = $1"
        )
        .bind(id.into_uuid())
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Find user by (normalized) email
    pub async fn find_by_email(&self, email: &str) -> DbResult<Option<DbUser>> {
        let user = sqlx::query_as::<_, DbUser>(
            "SELECT id, email, password_hash, created_at FROM users WHERE email = $1"
        )
        .bind(spendwise_types::normalize_email(email))
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }
}
