//! Employee DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use spendwise_ledger::{EmployeeFilter, PageRequest};
use spendwise_types::{DepartmentId, Employee, EmployeeUpdate};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::common::{default_limit, default_page};

/// Create an employee
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateEmployeeRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1 to 100 characters"))]
    pub name: String,
    #[validate(length(min = 1, max = 100, message = "Position must be 1 to 100 characters"))]
    pub position: String,
    pub department_id: Uuid,
}

/// Merge the given fields into an employee
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEmployeeRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1 to 100 characters"))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 100, message = "Position must be 1 to 100 characters"))]
    pub position: Option<String>,
    pub department_id: Option<Uuid>,
}

impl From<UpdateEmployeeRequest> for EmployeeUpdate {
    fn from(request: UpdateEmployeeRequest) -> Self {
        Self {
            name: request.name,
            position: request.position,
            department_id: request.department_id.map(DepartmentId::from),
        }
    }
}

/// Employee list filters
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct EmployeeListQuery {
    pub department: Option<Uuid>,
    pub position: Option<String>,
    #[serde(default = "default_page")]
    #[validate(range(min = 1, message = "Page must be >= 1"))]
    pub page: u32,
    /// `0` returns every match on one page
    #[serde(default = "default_limit")]
    #[validate(range(max = 1000, message = "Limit must be at most 1000"))]
    pub limit: u32,
}

impl EmployeeListQuery {
    pub fn filter(&self) -> EmployeeFilter {
        EmployeeFilter {
            department_id: self.department.map(DepartmentId::from),
            position: self.position.clone(),
        }
    }

    pub fn page_request(&self) -> PageRequest {
        PageRequest::new(self.page, self.limit)
    }
}

/// Employee view
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeResponse {
    pub id: Uuid,
    pub name: String,
    pub position: String,
    pub department_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl From<Employee> for EmployeeResponse {
    fn from(employee: Employee) -> Self {
        Self {
            id: employee.id.into_uuid(),
            name: employee.name,
            position: employee.position,
            department_id: employee.department_id.into_uuid(),
            created_at: employee.created_at,
        }
    }
}
