//! In-memory record store
//!
//! Everything lives behind one `RwLock`, so every write method is atomic
//! with respect to every other. Used by tests and the `memory` backend.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use tokio::sync::RwLock;

use spendwise_types::{
    validate_assigned_limit, CategoryId, CategoryUpdate, Department, DepartmentId, EffectiveLimit,
    Employee, EmployeeId, EmployeeUpdate, Expense, ExpenseCategory, LimitEntryId, LimitLedgerEntry,
    NewExpense, Period, Result, SpendError, User, UserId, require_name,
};

use crate::store::{
    CategoryStore, DepartmentStore, EmployeeFilter, EmployeeStore, ExpenseFilter, ExpenseStore,
    HealthCheck, LimitLedger, LimitUpsert, Page, PageRequest, UserStore,
};

#[derive(Debug, Default)]
struct MemoryState {
    departments: HashMap<DepartmentId, Department>,
    employees: HashMap<EmployeeId, Employee>,
    categories: HashMap<CategoryId, ExpenseCategory>,
    /// Append-only, in creation order
    expenses: Vec<Expense>,
    entries: HashMap<LimitEntryId, LimitLedgerEntry>,
    users: HashMap<UserId, User>,
}

impl MemoryState {
    fn employee_count(&self, department_id: DepartmentId) -> i64 {
        self.employees
            .values()
            .filter(|e| e.department_id == department_id)
            .count() as i64
    }

    fn department_view(&self, department: &Department) -> Department {
        Department {
            employee_count: self.employee_count(department.id),
            ..department.clone()
        }
    }

    fn require_department(&self, id: DepartmentId) -> Result<&Department> {
        self.departments
            .get(&id)
            .ok_or(SpendError::DepartmentNotFound { department_id: id })
    }

    fn entry_for_mut(
        &mut self,
        department_id: DepartmentId,
        period: Period,
    ) -> Option<&mut LimitLedgerEntry> {
        self.entries
            .values_mut()
            .find(|e| e.is_for(department_id, period))
    }

    fn sum_expenses(&self, department_id: DepartmentId, period: Period) -> Decimal {
        self.expenses
            .iter()
            .filter(|e| e.department_id == department_id && e.period() == period)
            .map(|e| e.amount)
            .sum()
    }

    fn check_employee_unique(&self, candidate: &Employee) -> Result<()> {
        let taken = self.employees.values().any(|e| {
            e.id != candidate.id
                && e.name == candidate.name
                && e.position == candidate.position
                && e.department_id == candidate.department_id
        });
        if taken {
            return Err(SpendError::DuplicateEmployee {
                name: candidate.name.clone(),
                position: candidate.position.clone(),
                department_id: candidate.department_id,
            });
        }
        Ok(())
    }
}

fn sorted_desc(mut entries: Vec<LimitLedgerEntry>) -> Vec<LimitLedgerEntry> {
    entries.sort_by(|a, b| b.period.cmp(&a.period));
    entries
}

/// Thread-safe in-memory store
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<RwLock<MemoryState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored expenses
    pub async fn expense_count(&self) -> usize {
        self.state.read().await.expenses.len()
    }
}

#[async_trait]
impl DepartmentStore for MemoryStore {
    async fn list_departments(&self) -> Result<Vec<Department>> {
        let state = self.state.read().await;
        let mut departments: Vec<Department> = state
            .departments
            .values()
            .map(|d| state.department_view(d))
            .collect();
        departments.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(departments)
    }

    async fn get_department(&self, id: DepartmentId) -> Result<Option<Department>> {
        let state = self.state.read().await;
        Ok(state.departments.get(&id).map(|d| state.department_view(d)))
    }

    async fn insert_department(&self, department: Department) -> Result<Department> {
        let mut state = self.state.write().await;
        if state.departments.values().any(|d| d.name == department.name) {
            return Err(SpendError::DuplicateDepartment {
                name: department.name,
            });
        }
        state.departments.insert(department.id, department.clone());
        Ok(state.department_view(&department))
    }

    async fn rename_department(&self, id: DepartmentId, name: String) -> Result<Department> {
        let name = require_name("department name", name)?;
        let mut state = self.state.write().await;
        state.require_department(id)?;
        if state
            .departments
            .values()
            .any(|d| d.id != id && d.name == name)
        {
            return Err(SpendError::DuplicateDepartment { name });
        }

        let department = state
            .departments
            .get_mut(&id)
            .ok_or(SpendError::DepartmentNotFound { department_id: id })?;
        department.name = name;
        let renamed = department.clone();
        Ok(state.department_view(&renamed))
    }

    async fn delete_department(&self, id: DepartmentId) -> Result<()> {
        let mut state = self.state.write().await;
        state.require_department(id)?;

        let employee_count = state.employee_count(id);
        if employee_count > 0 {
            return Err(SpendError::DepartmentHasEmployees {
                department_id: id,
                employee_count,
            });
        }
        if state.expenses.iter().any(|e| e.department_id == id) {
            return Err(SpendError::Conflict(format!(
                "department {} has recorded expenses",
                id
            )));
        }

        state.departments.remove(&id);
        state.entries.retain(|_, e| e.department_id != id);
        Ok(())
    }
}

#[async_trait]
impl EmployeeStore for MemoryStore {
    async fn list_employees(
        &self,
        filter: &EmployeeFilter,
        page: PageRequest,
    ) -> Result<Page<Employee>> {
        let state = self.state.read().await;
        let mut employees: Vec<Employee> = state
            .employees
            .values()
            .filter(|e| filter.matches(e))
            .cloned()
            .collect();
        employees.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(page.paginate(employees))
    }

    async fn get_employee(&self, id: EmployeeId) -> Result<Option<Employee>> {
        Ok(self.state.read().await.employees.get(&id).cloned())
    }

    async fn insert_employee(&self, employee: Employee) -> Result<Employee> {
        let mut state = self.state.write().await;
        state.require_department(employee.department_id)?;
        state.check_employee_unique(&employee)?;
        state.employees.insert(employee.id, employee.clone());
        Ok(employee)
    }

    async fn update_employee(&self, id: EmployeeId, update: EmployeeUpdate) -> Result<Employee> {
        let mut state = self.state.write().await;
        let mut employee = state
            .employees
            .get(&id)
            .cloned()
            .ok_or(SpendError::EmployeeNotFound { employee_id: id })?;

        update.apply(&mut employee)?;
        state.require_department(employee.department_id)?;
        state.check_employee_unique(&employee)?;

        state.employees.insert(id, employee.clone());
        Ok(employee)
    }

    async fn delete_employee(&self, id: EmployeeId) -> Result<()> {
        let mut state = self.state.write().await;
        if !state.employees.contains_key(&id) {
            return Err(SpendError::EmployeeNotFound { employee_id: id });
        }
        if state.expenses.iter().any(|e| e.employee_id == id) {
            return Err(SpendError::Conflict(format!(
                "employee {} has recorded expenses",
                id
            )));
        }
        state.employees.remove(&id);
        Ok(())
    }

    async fn list_positions(&self) -> Result<Vec<String>> {
        let state = self.state.read().await;
        let positions: BTreeSet<String> = state
            .employees
            .values()
            .map(|e| e.position.clone())
            .collect();
        Ok(positions.into_iter().collect())
    }
}

#[async_trait]
impl CategoryStore for MemoryStore {
    async fn list_categories(&self) -> Result<Vec<ExpenseCategory>> {
        let state = self.state.read().await;
        let mut categories: Vec<ExpenseCategory> = state.categories.values().cloned().collect();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(categories)
    }

    async fn get_category(&self, id: CategoryId) -> Result<Option<ExpenseCategory>> {
        Ok(self.state.read().await.categories.get(&id).cloned())
    }

    async fn insert_category(&self, category: ExpenseCategory) -> Result<ExpenseCategory> {
        let mut state = self.state.write().await;
        if state.categories.values().any(|c| c.name == category.name) {
            return Err(SpendError::DuplicateCategory {
                name: category.name,
            });
        }
        state.categories.insert(category.id, category.clone());
        Ok(category)
    }

    async fn update_category(
        &self,
        id: CategoryId,
        update: CategoryUpdate,
    ) -> Result<ExpenseCategory> {
        let mut state = self.state.write().await;
        let mut category = state
            .categories
            .get(&id)
            .cloned()
            .ok_or(SpendError::CategoryNotFound { category_id: id })?;

        update.apply(&mut category)?;
        if state
            .categories
            .values()
            .any(|c| c.id != id && c.name == category.name)
        {
            return Err(SpendError::DuplicateCategory {
                name: category.name,
            });
        }

        state.categories.insert(id, category.clone());
        Ok(category)
    }

    async fn delete_category(&self, id: CategoryId) -> Result<()> {
        let mut state = self.state.write().await;
        if !state.categories.contains_key(&id) {
            return Err(SpendError::CategoryNotFound { category_id: id });
        }
        if state.expenses.iter().any(|e| e.category_id == id) {
            return Err(SpendError::Conflict(format!(
                "expense category {} has recorded expenses",
                id
            )));
        }
        state.categories.remove(&id);
        Ok(())
    }
}

#[async_trait]
impl ExpenseStore for MemoryStore {
    async fn list_expenses(
        &self,
        filter: &ExpenseFilter,
        page: PageRequest,
    ) -> Result<Page<Expense>> {
        let state = self.state.read().await;
        let mut expenses: Vec<Expense> = state
            .expenses
            .iter()
            .filter(|e| filter.department_id.map_or(true, |d| e.department_id == d))
            .filter(|e| filter.category_id.map_or(true, |c| e.category_id == c))
            .filter(|e| filter.employee_id.map_or(true, |id| e.employee_id == id))
            .filter(|e| match filter.position.as_deref() {
                Some(position) => state
                    .employees
                    .get(&e.employee_id)
                    .is_some_and(|emp| emp.position == position),
                None => true,
            })
            .cloned()
            .collect();
        expenses.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(page.paginate(expenses))
    }

    async fn recent_expenses(&self, limit: usize) -> Result<Vec<Expense>> {
        let state = self.state.read().await;
        let mut expenses = state.expenses.clone();
        expenses.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        expenses.truncate(limit);
        Ok(expenses)
    }

    async fn sum_expenses(&self, department_id: DepartmentId, period: Period) -> Result<Decimal> {
        Ok(self.state.read().await.sum_expenses(department_id, period))
    }
}

#[async_trait]
impl LimitLedger for MemoryStore {
    async fn get_entry(
        &self,
        department_id: DepartmentId,
        period: Period,
    ) -> Result<Option<LimitLedgerEntry>> {
        let state = self.state.read().await;
        Ok(state
            .entries
            .values()
            .find(|e| e.is_for(department_id, period))
            .cloned())
    }

    async fn get_entry_by_id(&self, id: LimitEntryId) -> Result<Option<LimitLedgerEntry>> {
        Ok(self.state.read().await.entries.get(&id).cloned())
    }

    async fn list_entries(&self) -> Result<Vec<LimitLedgerEntry>> {
        let state = self.state.read().await;
        Ok(sorted_desc(state.entries.values().cloned().collect()))
    }

    async fn list_entries_for(&self, department_id: DepartmentId) -> Result<Vec<LimitLedgerEntry>> {
        let state = self.state.read().await;
        Ok(sorted_desc(
            state
                .entries
                .values()
                .filter(|e| e.department_id == department_id)
                .cloned()
                .collect(),
        ))
    }

    async fn insert_entry(&self, entry: LimitLedgerEntry) -> Result<LimitLedgerEntry> {
        let mut state = self.state.write().await;
        state.require_department(entry.department_id)?;
        if state.entry_for_mut(entry.department_id, entry.period).is_some() {
            return Err(SpendError::DuplicatePeriod {
                department_id: entry.department_id,
                period: entry.period,
            });
        }
        state.entries.insert(entry.id, entry.clone());
        Ok(entry)
    }

    async fn upsert_assigned_limit(
        &self,
        department_id: DepartmentId,
        period: Period,
        amount: Decimal,
    ) -> Result<LimitUpsert> {
        validate_assigned_limit(amount)?;
        let mut state = self.state.write().await;
        state.require_department(department_id)?;

        if let Some(entry) = state.entry_for_mut(department_id, period) {
            entry.assigned_limit = amount;
            entry.updated_at = Utc::now();
            return Ok(LimitUpsert {
                entry: entry.clone(),
                created: false,
            });
        }

        let spent = state.sum_expenses(department_id, period);
        let entry = LimitLedgerEntry::new(department_id, period, amount, spent)?;
        state.entries.insert(entry.id, entry.clone());
        Ok(LimitUpsert {
            entry,
            created: true,
        })
    }

    async fn increment_spent(
        &self,
        department_id: DepartmentId,
        period: Period,
        delta: Decimal,
    ) -> Result<LimitLedgerEntry> {
        let mut state = self.state.write().await;
        let entry = state
            .entry_for_mut(department_id, period)
            .ok_or(SpendError::LimitNotConfigured {
                department_id,
                period,
            })?;
        entry.spent += delta;
        entry.updated_at = Utc::now();
        Ok(entry.clone())
    }

    async fn update_assigned_limit(
        &self,
        id: LimitEntryId,
        amount: Decimal,
    ) -> Result<LimitLedgerEntry> {
        validate_assigned_limit(amount)?;
        let mut state = self.state.write().await;
        let entry = state
            .entries
            .get_mut(&id)
            .ok_or(SpendError::LimitEntryNotFound { entry_id: id })?;
        entry.assigned_limit = amount;
        entry.updated_at = Utc::now();
        Ok(entry.clone())
    }

    async fn delete_entry(&self, id: LimitEntryId) -> Result<()> {
        let mut state = self.state.write().await;
        let entry = state
            .entries
            .get(&id)
            .ok_or(SpendError::LimitEntryNotFound { entry_id: id })?;
        let (department_id, period) = (entry.department_id, entry.period);
        if state
            .expenses
            .iter()
            .any(|e| e.department_id == department_id && e.period() == period)
        {
            return Err(SpendError::Conflict(format!(
                "expenses are recorded against the {} limit of department {}",
                period, department_id
            )));
        }
        state.entries.remove(&id);
        Ok(())
    }

    async fn record_expense(
        &self,
        expense: NewExpense,
        carryover: Decimal,
    ) -> Result<(Expense, LimitLedgerEntry)> {
        let period = expense.period();
        let mut state = self.state.write().await;
        let entry = state
            .entry_for_mut(expense.department_id, period)
            .ok_or(SpendError::LimitNotConfigured {
                department_id: expense.department_id,
                period,
            })?;
        EffectiveLimit::new(entry.assigned_limit, entry.spent, carryover)
            .ensure_admits(expense.amount)?;

        let expense = expense.into_expense();
        entry.spent += expense.amount;
        entry.updated_at = Utc::now();
        let entry = entry.clone();

        state.expenses.push(expense.clone());
        Ok((expense, entry))
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn insert_user(&self, user: User) -> Result<User> {
        let mut state = self.state.write().await;
        if state.users.values().any(|u| u.email == user.email) {
            return Err(SpendError::DuplicateUser { email: user.email });
        }
        state.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let email = spendwise_types::normalize_email(email);
        let state = self.state.read().await;
        Ok(state.users.values().find(|u| u.email == email).cloned())
    }

    async fn get_user(&self, id: UserId) -> Result<Option<User>> {
        Ok(self.state.read().await.users.get(&id).cloned())
    }
}

#[async_trait]
impl HealthCheck for MemoryStore {
    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    async fn seeded() -> (MemoryStore, Department, Employee, ExpenseCategory) {
        let store = MemoryStore::new();
        let ops = store
            .insert_department(Department::new("Ops").unwrap())
            .await
            .unwrap();
        let ada = store
            .insert_employee(Employee::new("Ada", "Engineer", ops.id).unwrap())
            .await
            .unwrap();
        let travel = store
            .insert_category(ExpenseCategory::new("Travel", None, dec!(500)).unwrap())
            .await
            .unwrap();
        (store, ops, ada, travel)
    }

    fn june_expense(dept: &Department, emp: &Employee, cat: &ExpenseCategory, amount: Decimal) -> NewExpense {
        NewExpense {
            amount,
            date: Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap(),
            category_id: cat.id,
            employee_id: emp.id,
            department_id: dept.id,
        }
    }

    #[tokio::test]
    async fn test_employee_count_is_computed_on_read() {
        let (store, ops, _, _) = seeded().await;
        let dept = store.get_department(ops.id).await.unwrap().unwrap();
        assert_eq!(dept.employee_count, 1);

        let list = store.list_departments().await.unwrap();
        assert_eq!(list[0].employee_count, 1);
    }

    #[tokio::test]
    async fn test_duplicate_department_name() {
        let (store, _, _, _) = seeded().await;
        let result = store
            .insert_department(Department::new("Ops").unwrap())
            .await;
        assert!(matches!(result, Err(SpendError::DuplicateDepartment { .. })));
    }

    #[tokio::test]
    async fn test_duplicate_employee_triple() {
        let (store, ops, _, _) = seeded().await;
        let result = store
            .insert_employee(Employee::new("Ada", "Engineer", ops.id).unwrap())
            .await;
        assert!(matches!(result, Err(SpendError::DuplicateEmployee { .. })));

        store
            .insert_employee(Employee::new("Ada", "Manager", ops.id).unwrap())
            .await
            .unwrap();
        assert_eq!(
            store.list_positions().await.unwrap(),
            vec!["Engineer".to_string(), "Manager".to_string()]
        );
    }

    #[tokio::test]
    async fn test_insert_entry_rejects_duplicate_period() {
        let (store, ops, _, _) = seeded().await;
        let june = Period::new(2024, 6).unwrap();
        store
            .insert_entry(LimitLedgerEntry::new(ops.id, june, dec!(1000), dec!(0)).unwrap())
            .await
            .unwrap();

        let result = store
            .insert_entry(LimitLedgerEntry::new(ops.id, june, dec!(5), dec!(0)).unwrap())
            .await;
        assert!(matches!(result, Err(SpendError::DuplicatePeriod { .. })));
    }

    #[tokio::test]
    async fn test_upsert_seeds_spent_from_existing_expenses() {
        let (store, ops, ada, travel) = seeded().await;
        let june = Period::new(2024, 6).unwrap();

        // Limit set before the expenses so record_expense has an entry
        store.upsert_assigned_limit(ops.id, june, dec!(1000)).await.unwrap();
        store
            .record_expense(june_expense(&ops, &ada, &travel, dec!(120)), Decimal::ZERO)
            .await
            .unwrap();
        store
            .record_expense(june_expense(&ops, &ada, &travel, dec!(80)), Decimal::ZERO)
            .await
            .unwrap();

        // Re-key the ledger as if the limit had been declared afterwards
        let entry = store.get_entry(ops.id, june).await.unwrap().unwrap();
        store.state.write().await.entries.remove(&entry.id);

        let upsert = store.upsert_assigned_limit(ops.id, june, dec!(900)).await.unwrap();
        assert!(upsert.created);
        assert_eq!(upsert.entry.spent, dec!(200));

        let replaced = store.upsert_assigned_limit(ops.id, june, dec!(950)).await.unwrap();
        assert!(!replaced.created);
        assert_eq!(replaced.entry.assigned_limit, dec!(950));
        assert_eq!(replaced.entry.spent, dec!(200));
    }

    #[tokio::test]
    async fn test_increment_spent_requires_entry() {
        let (store, ops, _, _) = seeded().await;
        let june = Period::new(2024, 6).unwrap();
        let result = store.increment_spent(ops.id, june, dec!(10)).await;
        assert!(matches!(result, Err(SpendError::LimitNotConfigured { .. })));

        store.upsert_assigned_limit(ops.id, june, dec!(100)).await.unwrap();
        let entry = store.increment_spent(ops.id, june, dec!(10)).await.unwrap();
        assert_eq!(entry.spent, dec!(10));
    }

    #[tokio::test]
    async fn test_record_expense_rechecks_effective_limit() {
        let (store, ops, ada, travel) = seeded().await;
        let june = Period::new(2024, 6).unwrap();
        store.upsert_assigned_limit(ops.id, june, dec!(100)).await.unwrap();
        store
            .record_expense(june_expense(&ops, &ada, &travel, dec!(90)), Decimal::ZERO)
            .await
            .unwrap();

        let result = store
            .record_expense(june_expense(&ops, &ada, &travel, dec!(20)), Decimal::ZERO)
            .await;
        assert!(matches!(result, Err(SpendError::EffectiveLimitExceeded { .. })));

        // Carryover from earlier periods raises the ceiling
        let (_, entry) = store
            .record_expense(june_expense(&ops, &ada, &travel, dec!(20)), dec!(10))
            .await
            .unwrap();
        assert_eq!(entry.spent, dec!(110));
        assert_eq!(store.expense_count().await, 2);
    }

    #[tokio::test]
    async fn test_update_assigned_limit_keeps_spent() {
        let (store, ops, ada, travel) = seeded().await;
        let june = Period::new(2024, 6).unwrap();
        let upsert = store.upsert_assigned_limit(ops.id, june, dec!(1000)).await.unwrap();
        store
            .record_expense(june_expense(&ops, &ada, &travel, dec!(300)), Decimal::ZERO)
            .await
            .unwrap();

        let entry = store.update_assigned_limit(upsert.entry.id, dec!(400)).await.unwrap();
        assert_eq!(entry.assigned_limit, dec!(400));
        assert_eq!(entry.spent, dec!(300));
    }

    #[tokio::test]
    async fn test_delete_entry_guarded_by_expenses() {
        let (store, ops, ada, travel) = seeded().await;
        let june = Period::new(2024, 6).unwrap();
        let july = Period::new(2024, 7).unwrap();
        let june_entry = store.upsert_assigned_limit(ops.id, june, dec!(1000)).await.unwrap().entry;
        let july_entry = store.upsert_assigned_limit(ops.id, july, dec!(1000)).await.unwrap().entry;
        store
            .record_expense(june_expense(&ops, &ada, &travel, dec!(300)), Decimal::ZERO)
            .await
            .unwrap();

        let result = store.delete_entry(june_entry.id).await;
        assert!(matches!(result, Err(SpendError::Conflict(_))));

        store.delete_entry(july_entry.id).await.unwrap();
        assert!(store.get_entry(ops.id, july).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_department_delete_guards() {
        let (store, ops, ada, _) = seeded().await;
        let result = store.delete_department(ops.id).await;
        assert!(matches!(
            result,
            Err(SpendError::DepartmentHasEmployees { employee_count: 1, .. })
        ));

        store.delete_employee(ada.id).await.unwrap();
        let june = Period::new(2024, 6).unwrap();
        store.upsert_assigned_limit(ops.id, june, dec!(10)).await.unwrap();

        store.delete_department(ops.id).await.unwrap();
        assert!(store.get_department(ops.id).await.unwrap().is_none());
        assert!(store.list_entries().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_expenses_filters_by_position() {
        let (store, ops, ada, travel) = seeded().await;
        let bob = store
            .insert_employee(Employee::new("Bob", "Analyst", ops.id).unwrap())
            .await
            .unwrap();
        let june = Period::new(2024, 6).unwrap();
        store.upsert_assigned_limit(ops.id, june, dec!(1000)).await.unwrap();
        store
            .record_expense(june_expense(&ops, &ada, &travel, dec!(10)), Decimal::ZERO)
            .await
            .unwrap();
        store
            .record_expense(june_expense(&ops, &bob, &travel, dec!(20)), Decimal::ZERO)
            .await
            .unwrap();

        let filter = ExpenseFilter {
            position: Some("Analyst".to_string()),
            ..Default::default()
        };
        let page = store.list_expenses(&filter, PageRequest::default()).await.unwrap();
        assert_eq!(page.total_count, 1);
        assert_eq!(page.items[0].employee_id, bob.id);
    }

    #[tokio::test]
    async fn test_duplicate_user_email() {
        let store = MemoryStore::new();
        store
            .insert_user(User::new("fin@example.com", "hash".to_string()))
            .await
            .unwrap();
        let result = store
            .insert_user(User::new("FIN@example.com", "hash".to_string()))
            .await;
        assert!(matches!(result, Err(SpendError::DuplicateUser { .. })));
        assert!(store
            .find_user_by_email(" Fin@Example.com")
            .await
            .unwrap()
            .is_some());
    }
}
