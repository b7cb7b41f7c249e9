//! Limit Ledger Handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use spendwise_ledger::{DepartmentStore, LimitLedger};
use spendwise_types::{DepartmentId, LimitEntryId, Period, SpendError};
use std::sync::Arc;
use uuid::Uuid;

use crate::dto::{LimitListQuery, LimitResponse, UpdateLimitRequest, UpsertLimitRequest};
use crate::error::ApiResult;
use crate::extractors::{ValidatedJson, ValidatedQuery};
use crate::state::AppState;

/// List ledger entries
///
/// Every entry, or one department's, newest period first.
#[utoipa::path(
    get,
    path = "/api/v1/limits",
    tag = "Limits",
    params(("department" = Option<Uuid>, Query, description = "Department ID")),
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Ledger entries", body = Vec<LimitResponse>),
        (status = 400, description = "Malformed filter", body = crate::error::ErrorResponse),
        (status = 404, description = "Department not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_limits(
    State(state): State<Arc<AppState>>,
    ValidatedQuery(query): ValidatedQuery<LimitListQuery>,
) -> ApiResult<Json<Vec<LimitResponse>>> {
    let entries = match query.department.map(DepartmentId::from) {
        Some(department_id) => {
            if state.store.get_department(department_id).await?.is_none() {
                return Err(SpendError::DepartmentNotFound { department_id }.into());
            }
            state.store.list_entries_for(department_id).await?
        }
        None => state.store.list_entries().await?,
    };
    Ok(Json(entries.into_iter().map(Into::into).collect()))
}

/// Set a department's assigned limit for a month
///
/// Creates the entry (201) with spent seeded from recorded expenses, or
/// replaces the assigned limit of the existing one (200).
#[utoipa::path(
    post,
    path = "/api/v1/limits",
    tag = "Limits",
    request_body = UpsertLimitRequest,
    security(("bearer" = [])),
    responses(
        (status = 201, description = "Entry created", body = LimitResponse),
        (status = 200, description = "Assigned limit replaced", body = LimitResponse),
        (status = 400, description = "Invalid period or amount", body = crate::error::ErrorResponse),
        (status = 404, description = "Department not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn upsert_limit(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<UpsertLimitRequest>,
) -> ApiResult<(StatusCode, Json<LimitResponse>)> {
    let department_id = DepartmentId::from(request.department_id);
    let period = Period::new(request.year, request.month)?;

    let upsert = state
        .store
        .upsert_assigned_limit(department_id, period, request.assigned_limit)
        .await?;

    tracing::info!(
        department_id = %department_id,
        period = %period,
        assigned_limit = %upsert.entry.assigned_limit,
        created = upsert.created,
        "Assigned limit set"
    );

    let status = if upsert.created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(upsert.entry.into())))
}

/// Replace the assigned limit of an entry
///
/// Spent is left as recorded.
#[utoipa::path(
    patch,
    path = "/api/v1/limits/{id}",
    tag = "Limits",
    params(("id" = Uuid, Path, description = "Ledger entry ID")),
    request_body = UpdateLimitRequest,
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Assigned limit replaced", body = LimitResponse),
        (status = 400, description = "Invalid amount", body = crate::error::ErrorResponse),
        (status = 404, description = "Entry not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_limit(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    ValidatedJson(request): ValidatedJson<UpdateLimitRequest>,
) -> ApiResult<Json<LimitResponse>> {
    let entry = state
        .store
        .update_assigned_limit(LimitEntryId::from(id), request.assigned_limit)
        .await?;
    Ok(Json(entry.into()))
}

/// Delete a ledger entry
#[utoipa::path(
    delete,
    path = "/api/v1/limits/{id}",
    tag = "Limits",
    params(("id" = Uuid, Path, description = "Ledger entry ID")),
    security(("bearer" = [])),
    responses(
        (status = 204, description = "Entry deleted"),
        (status = 404, description = "Entry not found", body = crate::error::ErrorResponse),
        (status = 409, description = "Expenses recorded for the period", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_limit(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state.store.delete_entry(LimitEntryId::from(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}
