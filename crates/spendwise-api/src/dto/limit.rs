//! Limit ledger DTOs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use spendwise_types::LimitLedgerEntry;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Set the assigned limit of a department for a month
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpsertLimitRequest {
    pub department_id: Uuid,
    #[validate(range(min = 1900, max = 9999, message = "Year must be between 1900 and 9999"))]
    pub year: i32,
    #[validate(range(min = 1, max = 12, message = "Month must be between 1 and 12"))]
    pub month: u32,
    pub assigned_limit: Decimal,
}

/// Replace the assigned limit of an existing entry
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLimitRequest {
    pub assigned_limit: Decimal,
}

/// Limit list filters
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct LimitListQuery {
    pub department: Option<Uuid>,
}

/// Ledger entry view
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LimitResponse {
    pub id: Uuid,
    pub department_id: Uuid,
    pub year: i32,
    pub month: u32,
    pub assigned_limit: Decimal,
    pub spent: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<LimitLedgerEntry> for LimitResponse {
    fn from(entry: LimitLedgerEntry) -> Self {
        Self {
            id: entry.id.into_uuid(),
            department_id: entry.department_id.into_uuid(),
            year: entry.period.year,
            month: entry.period.month,
            assigned_limit: entry.assigned_limit,
            spent: entry.spent,
            created_at: entry.created_at,
            updated_at: entry.updated_at,
        }
    }
}
