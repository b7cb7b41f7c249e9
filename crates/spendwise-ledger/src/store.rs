//! Record-store seams
//!
//! The ledger core talks to storage only through these traits. Every
//! backend (in-memory, PostgreSQL) implements all of them and is then
//! usable as an `Arc<dyn Store>`.

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use spendwise_types::{
    CategoryId, CategoryUpdate, Department, DepartmentId, Employee, EmployeeId, EmployeeUpdate,
    Expense, ExpenseCategory, LimitEntryId, LimitLedgerEntry, NewExpense, Period, Result, User,
    UserId,
};

/// Page selection; `limit == 0` selects everything
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// 1-based page number
    pub page: u32,
    pub limit: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self { page: 1, limit: 10 }
    }
}

impl PageRequest {
    pub fn new(page: u32, limit: u32) -> Self {
        Self {
            page: page.max(1),
            limit,
        }
    }

    /// Everything on one page
    pub fn all() -> Self {
        Self { page: 1, limit: 0 }
    }

    /// Rows to skip
    pub fn offset(&self) -> u64 {
        if self.limit == 0 {
            0
        } else {
            u64::from(self.page.max(1) - 1) * u64::from(self.limit)
        }
    }

    /// Slice an already sorted result set
    pub fn paginate<T>(&self, rows: Vec<T>) -> Page<T> {
        let total_count = rows.len() as u64;
        let items = if self.limit == 0 {
            rows
        } else {
            rows.into_iter()
                .skip(self.offset() as usize)
                .take(self.limit as usize)
                .collect()
        };
        Page::new(items, total_count, *self)
    }
}

/// One page of a listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total_count: u64,
    pub total_pages: u32,
    pub current_page: u32,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total_count: u64, request: PageRequest) -> Self {
        let (total_pages, current_page) = if request.limit == 0 {
            (1, 1)
        } else {
            (
                total_count.div_ceil(u64::from(request.limit)) as u32,
                request.page.max(1),
            )
        };
        Self {
            items,
            total_count,
            total_pages,
            current_page,
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total_count: self.total_count,
            total_pages: self.total_pages,
            current_page: self.current_page,
        }
    }
}

/// Employee listing filter
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmployeeFilter {
    pub department_id: Option<DepartmentId>,
    pub position: Option<String>,
}

impl EmployeeFilter {
    pub fn matches(&self, employee: &Employee) -> bool {
        self.department_id.map_or(true, |d| employee.department_id == d)
            && self.position.as_deref().map_or(true, |p| employee.position == p)
    }
}

/// Expense listing filter
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpenseFilter {
    pub department_id: Option<DepartmentId>,
    pub category_id: Option<CategoryId>,
    pub employee_id: Option<EmployeeId>,
    /// Position held by the expense's employee
    pub position: Option<String>,
}

/// Outcome of [`LimitLedger::upsert_assigned_limit`]
#[derive(Debug, Clone, PartialEq)]
pub struct LimitUpsert {
    pub entry: LimitLedgerEntry,
    /// True if a new entry was created, false if an existing one was replaced
    pub created: bool,
}

#[async_trait]
pub trait DepartmentStore: Send + Sync {
    /// All departments sorted by name, employee counts filled in
    async fn list_departments(&self) -> Result<Vec<Department>>;

    async fn get_department(&self, id: DepartmentId) -> Result<Option<Department>>;

    /// Fails with `DuplicateDepartment` on a name collision
    async fn insert_department(&self, department: Department) -> Result<Department>;

    async fn rename_department(&self, id: DepartmentId, name: String) -> Result<Department>;

    /// Refused while employees or expenses reference the department.
    /// Ledger entries of the department are removed with it.
    async fn delete_department(&self, id: DepartmentId) -> Result<()>;
}

#[async_trait]
pub trait EmployeeStore: Send + Sync {
    /// Newest first
    async fn list_employees(&self, filter: &EmployeeFilter, page: PageRequest)
        -> Result<Page<Employee>>;

    async fn get_employee(&self, id: EmployeeId) -> Result<Option<Employee>>;

    /// Fails with `DepartmentNotFound` or `DuplicateEmployee`
    async fn insert_employee(&self, employee: Employee) -> Result<Employee>;

    async fn update_employee(&self, id: EmployeeId, update: EmployeeUpdate) -> Result<Employee>;

    /// Refused while expenses reference the employee
    async fn delete_employee(&self, id: EmployeeId) -> Result<()>;

    /// Distinct positions, sorted
    async fn list_positions(&self) -> Result<Vec<String>>;
}

#[async_trait]
pub trait CategoryStore: Send + Sync {
    /// Sorted by name
    async fn list_categories(&self) -> Result<Vec<ExpenseCategory>>;

    async fn get_category(&self, id: CategoryId) -> Result<Option<ExpenseCategory>>;

    async fn insert_category(&self, category: ExpenseCategory) -> Result<ExpenseCategory>;

    async fn update_category(&self, id: CategoryId, update: CategoryUpdate)
        -> Result<ExpenseCategory>;

    /// Refused while expenses reference the category
    async fn delete_category(&self, id: CategoryId) -> Result<()>;
}

#[async_trait]
pub trait ExpenseStore: Send + Sync {
    /// Newest date first
    async fn list_expenses(&self, filter: &ExpenseFilter, page: PageRequest)
        -> Result<Page<Expense>>;

    /// The `limit` most recently created expenses system-wide
    async fn recent_expenses(&self, limit: usize) -> Result<Vec<Expense>>;

    /// Sum of amounts recorded for the department within the period
    async fn sum_expenses(&self, department_id: DepartmentId, period: Period) -> Result<Decimal>;
}

/// The authoritative store of one entry per (department, period)
#[async_trait]
pub trait LimitLedger: Send + Sync {
    async fn get_entry(
        &self,
        department_id: DepartmentId,
        period: Period,
    ) -> Result<Option<LimitLedgerEntry>>;

    async fn get_entry_by_id(&self, id: LimitEntryId) -> Result<Option<LimitLedgerEntry>>;

    /// Every entry, period descending
    async fn list_entries(&self) -> Result<Vec<LimitLedgerEntry>>;

    /// Entries of one department, period descending
    async fn list_entries_for(&self, department_id: DepartmentId) -> Result<Vec<LimitLedgerEntry>>;

    /// Fails with `DuplicatePeriod` if the key is taken
    async fn insert_entry(&self, entry: LimitLedgerEntry) -> Result<LimitLedgerEntry>;

    /// Replace the assigned limit of an existing entry, or create one
    /// whose spent is seeded from the expenses already recorded
    async fn upsert_assigned_limit(
        &self,
        department_id: DepartmentId,
        period: Period,
        amount: Decimal,
    ) -> Result<LimitUpsert>;

    /// Atomic add in place; `LimitNotConfigured` if there is no entry
    async fn increment_spent(
        &self,
        department_id: DepartmentId,
        period: Period,
        delta: Decimal,
    ) -> Result<LimitLedgerEntry>;

    /// Administrative edit; spent is left untouched
    async fn update_assigned_limit(
        &self,
        id: LimitEntryId,
        amount: Decimal,
    ) -> Result<LimitLedgerEntry>;

    /// Refused while expenses are recorded for the entry's department and period
    async fn delete_entry(&self, id: LimitEntryId) -> Result<()>;

    /// Persist the expense and add its amount to the matching entry as one
    /// atomic unit. Returns the stored expense and the updated entry.
    ///
    /// The effective limit (`assigned_limit + carryover`) is checked again
    /// against the entry as locked for the write, so a concurrent writer
    /// outside this process cannot push `spent` past it.
    async fn record_expense(
        &self,
        expense: NewExpense,
        carryover: Decimal,
    ) -> Result<(Expense, LimitLedgerEntry)>;
}

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Fails with `DuplicateUser` if the email is taken
    async fn insert_user(&self, user: User) -> Result<User>;

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>>;

    async fn get_user(&self, id: UserId) -> Result<Option<User>>;
}

#[async_trait]
pub trait HealthCheck: Send + Sync {
    /// Cheap round trip to the backend
    async fn ping(&self) -> Result<()>;
}

/// Everything the service needs from a backend
pub trait Store:
    DepartmentStore + EmployeeStore + CategoryStore + ExpenseStore + LimitLedger + UserStore + HealthCheck
{
}

impl<T> Store for T where
    T: DepartmentStore
        + EmployeeStore
        + CategoryStore
        + ExpenseStore
        + LimitLedger
        + UserStore
        + HealthCheck
{
}
