//! Department Handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use spendwise_ledger::DepartmentStore;
use spendwise_types::{Department, DepartmentId, Period};
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::dto::{DepartmentFundsResponse, DepartmentRequest, DepartmentResponse, FundsInfo};
use crate::error::ApiResult;
use crate::extractors::ValidatedJson;
use crate::state::AppState;

/// List departments
///
/// Sorted by name, each with its funds for the current period.
#[utoipa::path(
    get,
    path = "/api/v1/departments",
    tag = "Departments",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Departments", body = Vec<DepartmentResponse>),
        (status = 401, description = "Unauthorized", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_departments(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<DepartmentResponse>>> {
    let period = Period::current();
    let mut departments = state.store.list_departments().await?;
    departments.sort_by(|a, b| a.name.cmp(&b.name));

    let mut funds: HashMap<DepartmentId, FundsInfo> = state
        .reporter
        .all_department_funds(period)
        .await?
        .into_iter()
        .map(|f| (f.department_id, FundsInfo::new(f.period, f.limit)))
        .collect();

    let response = departments
        .into_iter()
        .map(|department| {
            let info = funds.remove(&department.id);
            let view = DepartmentResponse::from(department);
            match info {
                Some(info) => view.with_funds(info),
                None => view,
            }
        })
        .collect();

    Ok(Json(response))
}

/// Create a department
#[utoipa::path(
    post,
    path = "/api/v1/departments",
    tag = "Departments",
    request_body = DepartmentRequest,
    security(("bearer" = [])),
    responses(
        (status = 201, description = "Department created", body = DepartmentResponse),
        (status = 400, description = "Invalid name", body = crate::error::ErrorResponse),
        (status = 409, description = "Name already taken", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_department(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<DepartmentRequest>,
) -> ApiResult<(StatusCode, Json<DepartmentResponse>)> {
    let department = state
        .store
        .insert_department(Department::new(request.name)?)
        .await?;

    tracing::info!(department_id = %department.id, name = %department.name, "Department created");

    Ok((StatusCode::CREATED, Json(department.into())))
}

/// Rename a department
#[utoipa::path(
    patch,
    path = "/api/v1/departments/{id}",
    tag = "Departments",
    params(("id" = Uuid, Path, description = "Department ID")),
    request_body = DepartmentRequest,
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Department renamed", body = DepartmentResponse),
        (status = 404, description = "Department not found", body = crate::error::ErrorResponse),
        (status = 409, description = "Name already taken", body = crate::error::ErrorResponse)
    )
)]
pub async fn rename_department(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    ValidatedJson(request): ValidatedJson<DepartmentRequest>,
) -> ApiResult<Json<DepartmentResponse>> {
    let department = state
        .store
        .rename_department(DepartmentId::from(id), request.name)
        .await?;
    Ok(Json(department.into()))
}

/// Delete a department
///
/// Refused while employees or expenses reference it. Its ledger entries
/// are removed with it.
#[utoipa::path(
    delete,
    path = "/api/v1/departments/{id}",
    tag = "Departments",
    params(("id" = Uuid, Path, description = "Department ID")),
    security(("bearer" = [])),
    responses(
        (status = 204, description = "Department deleted"),
        (status = 404, description = "Department not found", body = crate::error::ErrorResponse),
        (status = 409, description = "Department still referenced", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_department(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    let id = DepartmentId::from(id);
    state.store.delete_department(id).await?;

    tracing::info!(department_id = %id, "Department deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// Funds available to a department this period
#[utoipa::path(
    get,
    path = "/api/v1/departments/{id}/available-funds",
    tag = "Departments",
    params(("id" = Uuid, Path, description = "Department ID")),
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Effective limit breakdown", body = DepartmentFundsResponse),
        (status = 404, description = "Department not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn available_funds(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<DepartmentFundsResponse>> {
    let funds = state
        .reporter
        .department_funds(DepartmentId::from(id), Period::current())
        .await?;
    Ok(Json(funds.into()))
}
