//! Employee Handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use spendwise_ledger::EmployeeStore;
use spendwise_types::{DepartmentId, Employee, EmployeeId};
use std::sync::Arc;
use uuid::Uuid;

use crate::dto::{
    CreateEmployeeRequest, EmployeeListQuery, EmployeePage, EmployeeResponse, PaginatedResponse,
    UpdateEmployeeRequest,
};
use crate::error::ApiResult;
use crate::extractors::{ValidatedJson, ValidatedQuery};
use crate::state::AppState;

/// List employees
///
/// Newest first. `limit=0` returns every match on one page.
#[utoipa::path(
    get,
    path = "/api/v1/employees",
    tag = "Employees",
    params(
        ("department" = Option<Uuid>, Query, description = "Department ID"),
        ("position" = Option<String>, Query, description = "Exact position"),
        ("page" = Option<u32>, Query, description = "Page number (default 1)"),
        ("limit" = Option<u32>, Query, description = "Page size (default 10, 0 for all)")
    ),
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Employees", body = EmployeePage),
        (status = 400, description = "Invalid query", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_employees(
    State(state): State<Arc<AppState>>,
    ValidatedQuery(query): ValidatedQuery<EmployeeListQuery>,
) -> ApiResult<Json<PaginatedResponse<EmployeeResponse>>> {
    let page = state
        .store
        .list_employees(&query.filter(), query.page_request())
        .await?;
    Ok(Json(page.into()))
}

/// Create an employee
#[utoipa::path(
    post,
    path = "/api/v1/employees",
    tag = "Employees",
    request_body = CreateEmployeeRequest,
    security(("bearer" = [])),
    responses(
        (status = 201, description = "Employee created", body = EmployeeResponse),
        (status = 404, description = "Department not found", body = crate::error::ErrorResponse),
        (status = 409, description = "Employee already exists", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_employee(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<CreateEmployeeRequest>,
) -> ApiResult<(StatusCode, Json<EmployeeResponse>)> {
    let employee = Employee::new(
        request.name,
        request.position,
        DepartmentId::from(request.department_id),
    )?;
    let employee = state.store.insert_employee(employee).await?;

    tracing::info!(
        employee_id = %employee.id,
        department_id = %employee.department_id,
        "Employee created"
    );

    Ok((StatusCode::CREATED, Json(employee.into())))
}

/// Distinct employee positions
#[utoipa::path(
    get,
    path = "/api/v1/employees/positions",
    tag = "Employees",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Positions in alphabetical order", body = Vec<String>)
    )
)]
pub async fn list_positions(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<String>>> {
    Ok(Json(state.store.list_positions().await?))
}

/// Update an employee
#[utoipa::path(
    patch,
    path = "/api/v1/employees/{id}",
    tag = "Employees",
    params(("id" = Uuid, Path, description = "Employee ID")),
    request_body = UpdateEmployeeRequest,
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Employee updated", body = EmployeeResponse),
        (status = 404, description = "Employee or department not found", body = crate::error::ErrorResponse),
        (status = 409, description = "Employee already exists", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_employee(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    ValidatedJson(request): ValidatedJson<UpdateEmployeeRequest>,
) -> ApiResult<Json<EmployeeResponse>> {
    let employee = state
        .store
        .update_employee(EmployeeId::from(id), request.into())
        .await?;
    Ok(Json(employee.into()))
}

/// Delete an employee
#[utoipa::path(
    delete,
    path = "/api/v1/employees/{id}",
    tag = "Employees",
    params(("id" = Uuid, Path, description = "Employee ID")),
    security(("bearer" = [])),
    responses(
        (status = 204, description = "Employee deleted"),
        (status = 404, description = "Employee not found", body = crate::error::ErrorResponse),
        (status = 409, description = "Employee has expenses", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_employee(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state.store.delete_employee(EmployeeId::from(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}
