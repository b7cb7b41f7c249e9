//! Spendwise REST API
//!
//! HTTP surface over the expense ledger: departments, employees, expense
//! categories, monthly limits, expense admission and the funds dashboard.
//!
//! # API Structure
//!
//! ```text
//! /api/v1/
//! ├── /auth           - Registration, login, token refresh, logout
//! ├── /departments    - Departments and their available funds
//! ├── /employees      - Employee directory
//! ├── /expense-types  - Expense categories and transaction caps
//! ├── /expenses       - Expense admission and history
//! ├── /limits         - Monthly department limits
//! └── /dashboard      - Organisation-wide summary
//! ```
//!
//! Every route outside `/auth` requires a JWT bearer token.

pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod state;

use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderName, Method};
use axum::Router;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

pub use error::{ApiError, ApiResult};
pub use state::AppState;

use crate::middleware::{
    request_id_middleware, timing_middleware, SlowRequestThreshold, REQUEST_ID_HEADER,
};

/// API configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Enable CORS for browser clients
    pub enable_cors: bool,
    /// Allowed origins for CORS
    pub cors_origins: Vec<String>,
    /// Enable response compression
    pub enable_compression: bool,
    /// Enable request tracing
    pub enable_tracing: bool,
    /// Maximum request body size in bytes
    pub max_body_size: usize,
    /// Requests slower than this are logged at warn
    pub slow_request_threshold: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            enable_cors: true,
            cors_origins: vec!["*".to_string()],
            enable_compression: true,
            enable_tracing: true,
            max_body_size: 1024 * 1024, // 1MB
            slow_request_threshold: Duration::from_millis(1000),
        }
    }
}

/// Create the main API router with all middleware
pub fn create_router(state: Arc<AppState>, config: ApiConfig) -> Router {
    let auth_layer = state.auth.layer();

    let mut router = Router::new()
        // API v1 routes
        .nest("/api/v1", routes::api_v1_routes())
        // Health check at root
        .route("/health", axum::routing::get(handlers::health::health_check))
        .route("/ready", axum::routing::get(handlers::health::readiness_check))
        // OpenAPI documentation
        .merge(routes::swagger_routes())
        .with_state(state)
        // Attach the caller before any route guard runs
        .layer(auth_layer)
        .layer(axum::middleware::from_fn(request_id_middleware))
        .layer(DefaultBodyLimit::max(config.max_body_size));

    if config.enable_compression {
        router = router.layer(CompressionLayer::new());
    }

    if config.enable_cors {
        router = router.layer(cors_layer(&config.cors_origins));
    }

    router = router.layer(axum::middleware::from_fn_with_state(
        SlowRequestThreshold(config.slow_request_threshold),
        timing_middleware,
    ));

    if config.enable_tracing {
        router = router.layer(TraceLayer::new_for_http().make_span_with(
            |request: &axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get(REQUEST_ID_HEADER)
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or("unknown");

                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = %request_id,
                )
            },
        ));
    }

    // Outermost, so the trace span sees the id
    let x_request_id = HeaderName::from_static(REQUEST_ID_HEADER);
    router
        .layer(PropagateRequestIdLayer::new(x_request_id.clone()))
        .layer(SetRequestIdLayer::new(x_request_id, MakeRequestUuid))
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|o| o == "*") {
        return CorsLayer::permissive();
    }
    CorsLayer::new()
        .allow_origin(
            origins
                .iter()
                .filter_map(|o| o.parse().ok())
                .collect::<Vec<_>>(),
        )
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(Any)
}

/// Create a minimal router for testing
///
/// Routes, auth layer, error request ids and state only; no tracing,
/// compression or CORS. Callers supply `x-request-id` themselves.
pub fn create_test_router(state: Arc<AppState>) -> Router {
    let auth_layer = state.auth.layer();
    Router::new()
        .nest("/api/v1", routes::api_v1_routes())
        .route("/health", axum::routing::get(handlers::health::health_check))
        .route("/ready", axum::routing::get(handlers::health::readiness_check))
        .with_state(state)
        .layer(auth_layer)
        .layer(axum::middleware::from_fn(request_id_middleware))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ApiConfig::default();
        assert!(config.enable_cors);
        assert!(config.enable_compression);
        assert_eq!(config.slow_request_threshold, Duration::from_millis(1000));
    }

    #[test]
    fn test_cors_layer_accepts_explicit_origins() {
        // Builds without panicking for a mixed list including an unparsable entry
        let _ = cors_layer(&["https://finance.example.com".to_string(), "\n".to_string()]);
    }
}
