//! Department DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use spendwise_ledger::DepartmentFunds;
use spendwise_types::Department;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::FundsInfo;

/// Create or rename a department
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct DepartmentRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1 to 100 characters"))]
    pub name: String,
}

/// Department with its employee count
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentResponse {
    pub id: Uuid,
    pub name: String,
    pub employee_count: i64,
    pub created_at: DateTime<Utc>,
    /// Current-period funds, present on list responses
    #[serde(skip_serializing_if = "Option::is_none")]
    pub funds: Option<FundsInfo>,
}

impl From<Department> for DepartmentResponse {
    fn from(department: Department) -> Self {
        Self {
            id: department.id.into_uuid(),
            name: department.name,
            employee_count: department.employee_count,
            created_at: department.created_at,
            funds: None,
        }
    }
}

impl DepartmentResponse {
    pub fn with_funds(mut self, funds: FundsInfo) -> Self {
        self.funds = Some(funds);
        self
    }
}

/// Funds available to one department in one period
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentFundsResponse {
    pub department_id: Uuid,
    pub department_name: String,
    pub funds: FundsInfo,
}

impl From<DepartmentFunds> for DepartmentFundsResponse {
    fn from(funds: DepartmentFunds) -> Self {
        Self {
            department_id: funds.department_id.into_uuid(),
            department_name: funds.department_name,
            funds: FundsInfo::new(funds.period, funds.limit),
        }
    }
}
