//! Dashboard Handlers

use axum::{extract::State, Json};
use spendwise_types::Period;
use std::sync::Arc;

use crate::dto::DashboardResponse;
use crate::error::ApiResult;
use crate::state::AppState;

/// Organisation-wide funds for the current period
#[utoipa::path(
    get,
    path = "/api/v1/dashboard/summary",
    tag = "Dashboard",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Dashboard summary", body = DashboardResponse),
        (status = 401, description = "Unauthorized", body = crate::error::ErrorResponse)
    )
)]
pub async fn dashboard_summary(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<DashboardResponse>> {
    let summary = state.reporter.dashboard(Period::current()).await?;
    Ok(Json(summary.into()))
}
