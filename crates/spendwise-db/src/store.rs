//! Store trait implementations for [`Database`]

use async_trait::async_trait;
use rust_decimal::Decimal;

use spendwise_ledger::{
    CategoryStore, DepartmentStore, EmployeeFilter, EmployeeStore, ExpenseFilter, ExpenseStore,
    HealthCheck, LimitLedger, LimitUpsert, Page, PageRequest, UserStore,
};
use spendwise_types::{
    CategoryId, CategoryUpdate, Department, DepartmentId, Employee, EmployeeId, EmployeeUpdate,
    Expense, ExpenseCategory, LimitEntryId, LimitLedgerEntry, NewExpense, Period, Result,
    SpendError, User, UserId,
};

use crate::{Database, DbError};

fn page_of<R, T: From<R>>(rows: Vec<R>, total: i64, page: PageRequest) -> Page<T> {
    Page::new(
        rows.into_iter().map(T::from).collect(),
        total.max(0) as u64,
        page,
    )
}

fn all_into<R, T: From<R>>(rows: Vec<R>) -> Vec<T> {
    rows.into_iter().map(T::from).collect()
}

#[async_trait]
impl DepartmentStore for Database {
    async fn list_departments(&self) -> Result<Vec<Department>> {
        Ok(all_into(self.department_repo().list().await?))
    }

    async fn get_department(&self, id: DepartmentId) -> Result<Option<Department>> {
        Ok(self.department_repo().find_by_id(id).await?.map(Into::into))
    }

    async fn insert_department(&self, department: Department) -> Result<Department> {
        Ok(self.department_repo().create(&department).await?.into())
    }

    async fn rename_department(&self, id: DepartmentId, name: String) -> Result<Department> {
        let name = spendwise_types::require_name("department name", name)?;
        Ok(self.department_repo().rename(id, &name).await?.into())
    }

    async fn delete_department(&self, id: DepartmentId) -> Result<()> {
        Ok(self.department_repo().delete(id).await?)
    }
}

#[async_trait]
impl EmployeeStore for Database {
    async fn list_employees(
        &self,
        filter: &EmployeeFilter,
        page: PageRequest,
    ) -> Result<Page<Employee>> {
        let (rows, total) = self.employee_repo().list(filter, page).await?;
        Ok(page_of(rows, total, page))
    }

    async fn get_employee(&self, id: EmployeeId) -> Result<Option<Employee>> {
        Ok(self.employee_repo().find_by_id(id).await?.map(Into::into))
    }

    async fn insert_employee(&self, employee: Employee) -> Result<Employee> {
        Ok(self.employee_repo().create(&employee).await?.into())
    }

    async fn update_employee(&self, id: EmployeeId, update: EmployeeUpdate) -> Result<Employee> {
        Ok(self.employee_repo().update(id, update).await?.into())
    }

    async fn delete_employee(&self, id: EmployeeId) -> Result<()> {
        Ok(self.employee_repo().delete(id).await?)
    }

    async fn list_positions(&self) -> Result<Vec<String>> {
        Ok(self.employee_repo().positions().await?)
    }
}

#[async_trait]
impl CategoryStore for Database {
    async fn list_categories(&self) -> Result<Vec<ExpenseCategory>> {
        Ok(all_into(self.category_repo().list().await?))
    }

    async fn get_category(&self, id: CategoryId) -> Result<Option<ExpenseCategory>> {
        Ok(self.category_repo().find_by_id(id).await?.map(Into::into))
    }

    async fn insert_category(&self, category: ExpenseCategory) -> Result<ExpenseCategory> {
        Ok(self.category_repo().create(&category).await?.into())
    }

    async fn update_category(
        &self,
        id: CategoryId,
        update: CategoryUpdate,
    ) -> Result<ExpenseCategory> {
        Ok(self.category_repo().update(id, update).await?.into())
    }

    async fn delete_category(&self, id: CategoryId) -> Result<()> {
        Ok(self.category_repo().delete(id).await?)
    }
}

#[async_trait]
impl ExpenseStore for Database {
    async fn list_expenses(
        &self,
        filter: &ExpenseFilter,
        page: PageRequest,
    ) -> Result<Page<Expense>> {
        let (rows, total) = self.expense_repo().list(filter, page).await?;
        Ok(page_of(rows, total, page))
    }

    async fn recent_expenses(&self, limit: usize) -> Result<Vec<Expense>> {
        Ok(all_into(self.expense_repo().recent(limit as i64).await?))
    }

    async fn sum_expenses(&self, department_id: DepartmentId, period: Period) -> Result<Decimal> {
        Ok(self.expense_repo().sum_for_period(department_id, period).await?)
    }
}

#[async_trait]
impl LimitLedger for Database {
    async fn get_entry(
        &self,
        department_id: DepartmentId,
        period: Period,
    ) -> Result<Option<LimitLedgerEntry>> {
        Ok(self.limit_repo().find(department_id, period).await?.map(Into::into))
    }

    async fn get_entry_by_id(&self, id: LimitEntryId) -> Result<Option<LimitLedgerEntry>> {
        Ok(self.limit_repo().find_by_id(id).await?.map(Into::into))
    }

    async fn list_entries(&self) -> Result<Vec<LimitLedgerEntry>> {
        Ok(all_into(self.limit_repo().list_all().await?))
    }

    async fn list_entries_for(&self, department_id: DepartmentId) -> Result<Vec<LimitLedgerEntry>> {
        Ok(all_into(self.limit_repo().list_for_department(department_id).await?))
    }

    async fn insert_entry(&self, entry: LimitLedgerEntry) -> Result<LimitLedgerEntry> {
        Ok(self.limit_repo().insert(&entry).await?.into())
    }

    async fn upsert_assigned_limit(
        &self,
        department_id: DepartmentId,
        period: Period,
        amount: Decimal,
    ) -> Result<LimitUpsert> {
        let (row, created) = self
            .limit_repo()
            .upsert_assigned_limit(department_id, period, amount)
            .await?;
        Ok(LimitUpsert {
            entry: row.into(),
            created,
        })
    }

    async fn increment_spent(
        &self,
        department_id: DepartmentId,
        period: Period,
        delta: Decimal,
    ) -> Result<LimitLedgerEntry> {
        Ok(self
            .limit_repo()
            .increment_spent(department_id, period, delta)
            .await?
            .into())
    }

    async fn update_assigned_limit(
        &self,
        id: LimitEntryId,
        amount: Decimal,
    ) -> Result<LimitLedgerEntry> {
        Ok(self.limit_repo().update_assigned_limit(id, amount).await?.into())
    }

    async fn delete_entry(&self, id: LimitEntryId) -> Result<()> {
        Ok(self.limit_repo().delete(id).await?)
    }

    async fn record_expense(
        &self,
        expense: NewExpense,
        carryover: Decimal,
    ) -> Result<(Expense, LimitLedgerEntry)> {
        let (expense, entry) = self.limit_repo().record_expense(expense, carryover).await?;
        Ok((expense.into(), entry.into()))
    }
}

#[async_trait]
impl UserStore for Database {
    async fn insert_user(&self, user: User) -> Result<User> {
        Ok(self.user_repo().create(&user).await?.into())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        Ok(self.user_repo().find_by_email(email).await?.map(Into::into))
    }

    async fn get_user(&self, id: UserId) -> Result<Option<User>> {
        Ok(self.user_repo().find_by_id(id).await?.map(Into::into))
    }
}

#[async_trait]
impl HealthCheck for Database {
    async fn ping(&self) -> Result<()> {
        if self.health_check().await.healthy {
            Ok(())
        } else {
            Err(SpendError::from(DbError::Connection(
                "PostgreSQL is not reachable".to_string(),
            )))
        }
    }
}
