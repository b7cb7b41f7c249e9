//! API Routes
//!
//! Route definitions for all API endpoints.

use axum::{
    middleware::from_fn,
    routing::{get, patch, post},
    Router,
};
use std::sync::Arc;

use crate::handlers;
use crate::middleware::require_auth_middleware;
use crate::state::AppState;

/// Create API v1 routes
///
/// `/auth` is public; everything else requires a verified caller.
pub fn api_v1_routes() -> Router<Arc<AppState>> {
    Router::new()
        .nest("/auth", auth_routes())
        .merge(protected_routes())
}

/// Authentication routes
fn auth_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login))
        .route("/refresh", post(handlers::auth::refresh_token))
        .route("/logout", post(handlers::auth::logout))
}

/// Routes behind the bearer token guard
fn protected_routes() -> Router<Arc<AppState>> {
    Router::new()
        .nest("/departments", department_routes())
        .nest("/employees", employee_routes())
        .nest("/expense-types", expense_type_routes())
        .nest("/expenses", expense_routes())
        .nest("/limits", limit_routes())
        .route("/dashboard/summary", get(handlers::dashboard::dashboard_summary))
        .route_layer(from_fn(require_auth_middleware))
}

/// Department routes
fn department_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/",
            get(handlers::departments::list_departments).post(handlers::departments::create_department),
        )
        .route(
            "/:id",
            patch(handlers::departments::rename_department)
                .delete(handlers::departments::delete_department),
        )
        .route("/:id/available-funds", get(handlers::departments::available_funds))
}

/// Employee routes
fn employee_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/",
            get(handlers::employees::list_employees).post(handlers::employees::create_employee),
        )
        .route("/positions", get(handlers::employees::list_positions))
        .route(
            "/:id",
            patch(handlers::employees::update_employee).delete(handlers::employees::delete_employee),
        )
}

/// Expense category routes
fn expense_type_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/",
            get(handlers::expense_types::list_categories)
                .post(handlers::expense_types::create_category),
        )
        .route(
            "/:id",
            patch(handlers::expense_types::update_category)
                .delete(handlers::expense_types::delete_category),
        )
}

/// Expense routes
fn expense_routes() -> Router<Arc<AppState>> {
    Router::new().route(
        "/",
        get(handlers::expenses::list_expenses).post(handlers::expenses::create_expense),
    )
}

/// Limit ledger routes
fn limit_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/",
            get(handlers::limits::list_limits).post(handlers::limits::upsert_limit),
        )
        .route(
            "/:id",
            patch(handlers::limits::update_limit).delete(handlers::limits::delete_limit),
        )
}

/// Create Swagger UI routes
pub fn swagger_routes() -> Router<Arc<AppState>> {
    use crate::openapi::ApiDoc;
    use utoipa::OpenApi;
    use utoipa_swagger_ui::SwaggerUi;

    Router::new().merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
