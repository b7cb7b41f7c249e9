//! Expense Handlers
//!
//! Expenses are only created through admission; there is no edit or
//! delete path, so recorded spend never diverges from the ledger.

use axum::{extract::State, http::StatusCode, Json};
use spendwise_ledger::{ExpenseRequest, ExpenseStore};
use std::sync::Arc;
use uuid::Uuid;

use crate::dto::{
    CreateExpenseRequest, CreateExpenseResponse, ExpenseListQuery, ExpensePage, ExpenseResponse,
    PaginatedResponse,
};
use crate::error::ApiResult;
use crate::extractors::{CurrentUser, ValidatedJson, ValidatedQuery};
use crate::state::AppState;

/// Record an expense
///
/// Admitted only when the category cap and the department's effective
/// limit for the expense's month both allow it.
#[utoipa::path(
    post,
    path = "/api/v1/expenses",
    tag = "Expenses",
    request_body = CreateExpenseRequest,
    security(("bearer" = [])),
    responses(
        (status = 201, description = "Expense recorded", body = CreateExpenseResponse),
        (status = 400, description = "Invalid amount or employee not in department", body = crate::error::ErrorResponse),
        (status = 404, description = "Category, department or employee not found", body = crate::error::ErrorResponse),
        (status = 422, description = "Cap exceeded, no limit configured, or effective limit exceeded", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_expense(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    ValidatedJson(request): ValidatedJson<CreateExpenseRequest>,
) -> ApiResult<(StatusCode, Json<CreateExpenseResponse>)> {
    let request = ExpenseRequest::from(request);

    match state.admission.admit(request).await {
        Ok(admitted) => {
            metrics::counter!("spendwise_expenses_admitted_total").increment(1);
            tracing::debug!(
                user_id = %user.user_id,
                expense_id = %admitted.expense.id,
                "Expense submitted"
            );
            Ok((StatusCode::CREATED, Json(admitted.into())))
        }
        Err(err) => {
            if !err.is_fault() {
                metrics::counter!("spendwise_expenses_rejected_total", "reason" => err.kind())
                    .increment(1);
            }
            Err(err.into())
        }
    }
}

/// List expenses
///
/// Newest first by date.
#[utoipa::path(
    get,
    path = "/api/v1/expenses",
    tag = "Expenses",
    params(
        ("department" = Option<Uuid>, Query, description = "Department ID"),
        ("category" = Option<Uuid>, Query, description = "Expense category ID"),
        ("employee" = Option<Uuid>, Query, description = "Employee ID"),
        ("position" = Option<String>, Query, description = "Position of the spending employee"),
        ("page" = Option<u32>, Query, description = "Page number (default 1)"),
        ("limit" = Option<u32>, Query, description = "Page size (default 10, 0 for all)")
    ),
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Expenses", body = ExpensePage),
        (status = 400, description = "Invalid query", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_expenses(
    State(state): State<Arc<AppState>>,
    ValidatedQuery(query): ValidatedQuery<ExpenseListQuery>,
) -> ApiResult<Json<PaginatedResponse<ExpenseResponse>>> {
    let page = state
        .store
        .list_expenses(&query.filter(), query.page_request())
        .await?;
    Ok(Json(page.into()))
}
