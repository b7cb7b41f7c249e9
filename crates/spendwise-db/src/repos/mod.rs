//! Repository implementations

mod category;
mod department;
mod employee;
mod expense;
mod limit;
mod user;

pub use category::CategoryRepo;
pub use department::DepartmentRepo;
pub use employee::EmployeeRepo;
pub use expense::ExpenseRepo;
pub use limit::LimitRepo;
pub use user::UserRepo;

use spendwise_ledger::PageRequest;
use spendwise_types::SpendError;

use crate::DbError;

/// Map a violation of `constraint` to a domain error, anything else to a query error
pub(crate) fn on_constraint(
    e: sqlx::Error,
    constraint: &str,
    to_domain: impl FnOnce() -> SpendError,
) -> DbError {
    if let sqlx::Error::Database(ref db_err) = e {
        if db_err.constraint() == Some(constraint) {
            return DbError::Domain(to_domain());
        }
    }
    DbError::Query(e)
}

/// `LIMIT` / `OFFSET` bind values; a NULL limit selects every row
pub(crate) fn limit_offset(page: PageRequest) -> (Option<i64>, i64) {
    let limit = (page.limit > 0).then(|| i64::from(page.limit));
    (limit, page.offset() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limit_offset() {
        assert_eq!(limit_offset(PageRequest::new(3, 10)), (Some(10), 20));
        assert_eq!(limit_offset(PageRequest::all()), (None, 0));
    }

    #[test]
    fn test_unrelated_errors_stay_query_errors() {
        let err = on_constraint(sqlx::Error::RowNotFound, "departments_name_key", || {
            SpendError::DuplicateDepartment { name: "Ops".into() }
        });
        assert!(matches!(err, DbError::Query(sqlx::Error::RowNotFound)));
    }
}
