//! Expense Category Handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use spendwise_ledger::CategoryStore;
use spendwise_types::{CategoryId, ExpenseCategory};
use std::sync::Arc;
use uuid::Uuid;

use crate::dto::{CategoryResponse, CreateCategoryRequest, UpdateCategoryRequest};
use crate::error::ApiResult;
use crate::extractors::ValidatedJson;
use crate::state::AppState;

/// List expense categories
#[utoipa::path(
    get,
    path = "/api/v1/expense-types",
    tag = "Expense Types",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Categories sorted by name", body = Vec<CategoryResponse>)
    )
)]
pub async fn list_categories(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<CategoryResponse>>> {
    let mut categories = state.store.list_categories().await?;
    categories.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(Json(categories.into_iter().map(Into::into).collect()))
}

/// Create an expense category
#[utoipa::path(
    post,
    path = "/api/v1/expense-types",
    tag = "Expense Types",
    request_body = CreateCategoryRequest,
    security(("bearer" = [])),
    responses(
        (status = 201, description = "Category created", body = CategoryResponse),
        (status = 400, description = "Invalid name or cap", body = crate::error::ErrorResponse),
        (status = 409, description = "Name already taken", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_category(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<CreateCategoryRequest>,
) -> ApiResult<(StatusCode, Json<CategoryResponse>)> {
    let category = ExpenseCategory::new(request.name, request.description, request.transaction_cap)?;
    let category = state.store.insert_category(category).await?;

    tracing::info!(
        category_id = %category.id,
        transaction_cap = %category.transaction_cap,
        "Expense category created"
    );

    Ok((StatusCode::CREATED, Json(category.into())))
}

/// Update an expense category
#[utoipa::path(
    patch,
    path = "/api/v1/expense-types/{id}",
    tag = "Expense Types",
    params(("id" = Uuid, Path, description = "Category ID")),
    request_body = UpdateCategoryRequest,
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Category updated", body = CategoryResponse),
        (status = 404, description = "Category not found", body = crate::error::ErrorResponse),
        (status = 409, description = "Name already taken", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_category(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    ValidatedJson(request): ValidatedJson<UpdateCategoryRequest>,
) -> ApiResult<Json<CategoryResponse>> {
    let category = state
        .store
        .update_category(CategoryId::from(id), request.into())
        .await?;
    Ok(Json(category.into()))
}

/// Delete an expense category
#[utoipa::path(
    delete,
    path = "/api/v1/expense-types/{id}",
    tag = "Expense Types",
    params(("id" = Uuid, Path, description = "Category ID")),
    security(("bearer" = [])),
    responses(
        (status = 204, description = "Category deleted"),
        (status = 404, description = "Category not found", body = crate::error::ErrorResponse),
        (status = 409, description = "Category has expenses", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_category(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state.store.delete_category(CategoryId::from(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}
