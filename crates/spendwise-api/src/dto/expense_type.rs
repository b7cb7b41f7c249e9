//! Expense category DTOs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use spendwise_types::{CategoryUpdate, ExpenseCategory};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Create an expense category
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCategoryRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1 to 100 characters"))]
    pub name: String,
    #[validate(length(max = 500, message = "Description must be at most 500 characters"))]
    pub description: Option<String>,
    /// Largest amount a single expense in this category may have
    pub transaction_cap: Decimal,
}

/// Merge the given fields into a category
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCategoryRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1 to 100 characters"))]
    pub name: Option<String>,
    #[validate(length(max = 500, message = "Description must be at most 500 characters"))]
    pub description: Option<String>,
    pub transaction_cap: Option<Decimal>,
}

impl From<UpdateCategoryRequest> for CategoryUpdate {
    fn from(request: UpdateCategoryRequest) -> Self {
        Self {
            name: request.name,
            description: request.description,
            transaction_cap: request.transaction_cap,
        }
    }
}

/// Expense category view
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryResponse {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub transaction_cap: Decimal,
    pub created_at: DateTime<Utc>,
}

impl From<ExpenseCategory> for CategoryResponse {
    fn from(category: ExpenseCategory) -> Self {
        Self {
            id: category.id.into_uuid(),
            name: category.name,
            description: category.description,
            transaction_cap: category.transaction_cap,
            created_at: category.created_at,
        }
    }
}
