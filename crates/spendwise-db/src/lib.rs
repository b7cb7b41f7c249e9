//! Spendwise Database Layer
//!
//! PostgreSQL persistence for departments, employees, expense categories,
//! expenses and the monthly limit ledger.
//!
//! # Repository Pattern
//!
//! Each table family has its own repository with CRUD and domain-specific
//! queries. [`Database`] implements the `spendwise-ledger` store traits on
//! top of them, so it can be used wherever an `Arc<dyn Store>` is expected.

pub mod config;
pub mod error;
pub mod models;
pub mod repos;
mod store;

use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::info;

pub use config::DatabaseConfig;
pub use error::{DbError, DbResult};
pub use models::*;
pub use repos::*;

/// Database connection pool
#[derive(Clone)]
pub struct Database {
    /// PostgreSQL connection pool
    pub pg: PgPool,
}

impl Database {
    /// Connect to PostgreSQL
    pub async fn connect(config: &DatabaseConfig) -> DbResult<Self> {
        info!("Connecting to PostgreSQL: {}", config.postgres_url_masked());

        let pg = PgPoolOptions::new()
            .max_connections(config.pg_max_connections)
            .min_connections(config.pg_min_connections)
            .acquire_timeout(std::time::Duration::from_secs(config.pg_acquire_timeout_secs))
            .connect(&config.postgres_url)
            .await
            .map_err(|e| DbError::Connection(format!("PostgreSQL: {}", e)))?;

        info!("Connected to PostgreSQL");

        Ok(Self { pg })
    }

    /// Wrap an existing pool
    pub fn from_pool(pg: PgPool) -> Self {
        Self { pg }
    }

    /// Run database migrations
    pub async fn migrate(&self) -> DbResult<()> {
        info!("Running database migrations...");
        sqlx::migrate!("./migrations")
            .run(&self.pg)
            .await
            .map_err(|e| DbError::Migration(e.to_string()))?;
        info!("Migrations complete");
        Ok(())
    }

    /// Health check
    pub async fn health_check(&self) -> HealthStatus {
        let postgres = sqlx::query("SELECT 1").fetch_one(&self.pg).await.is_ok();
        HealthStatus {
            postgres,
            healthy: postgres,
        }
    }

    /// Create repository instances
    pub fn department_repo(&self) -> DepartmentRepo {
        DepartmentRepo::new(self.pg.clone())
    }

    pub fn employee_repo(&self) -> EmployeeRepo {
        EmployeeRepo::new(self.pg.clone())
    }

    pub fn category_repo(&self) -> CategoryRepo {
        CategoryRepo::new(self.pg.clone())
    }

    pub fn expense_repo(&self) -> ExpenseRepo {
        ExpenseRepo::new(self.pg.clone())
    }

    pub fn limit_repo(&self) -> LimitRepo {
        LimitRepo::new(self.pg.clone())
    }

    pub fn user_repo(&self) -> UserRepo {
        UserRepo::new(self.pg.clone())
    }
}

/// Health status of the database connection
#[derive(Debug, Clone)]
pub struct HealthStatus {
    pub postgres: bool,
    pub healthy: bool,
}
