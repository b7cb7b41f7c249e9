//! Database error types

use spendwise_types::SpendError;
use thiserror::Error;

/// Database operation errors
#[derive(Debug, Error)]
pub enum DbError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Migration error: {0}")]
    Migration(String),

    #[error("Query error: {0}")]
    Query(#[from] sqlx::Error),

    #[error("Constraint violation: {0}")]
    Constraint(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Transaction error: {0}")]
    Transaction(String),

    /// Domain rule violated inside a repository operation
    #[error(transparent)]
    Domain(#[from] SpendError),
}

impl DbError {
    /// Name of the violated constraint, if the driver reported one
    pub fn constraint(&self) -> Option<&str> {
        match self {
            DbError::Query(sqlx::Error::Database(db_err)) => db_err.constraint(),
            _ => None,
        }
    }
}

impl From<DbError> for SpendError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::Domain(e) => e,
            DbError::Constraint(msg) => SpendError::Conflict(msg),
            DbError::InvalidInput(msg) => SpendError::Validation(msg),
            other => SpendError::Storage(other.to_string()),
        }
    }
}

/// Result type for database operations
pub type DbResult<T> = Result<T, DbError>;
