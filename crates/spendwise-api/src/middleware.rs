//! API Middleware
//!
//! Request timing, request ids on error bodies and the route-level
//! authentication guard.

use axum::{
    body::Body,
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::time::{Duration, Instant};

use crate::error::{ApiError, ErrorResponse};
use crate::extractors::AuthenticatedUser;

/// Threshold above which a request is logged as slow
#[derive(Debug, Clone, Copy)]
pub struct SlowRequestThreshold(pub Duration);

/// Request timing middleware
pub async fn timing_middleware(
    State(SlowRequestThreshold(threshold)): State<SlowRequestThreshold>,
    req: Request,
    next: Next,
) -> Response {
    let start = Instant::now();
    let method = req.method().clone();
    let uri = req.uri().clone();

    let response = next.run(req).await;

    let elapsed = start.elapsed();
    if elapsed > threshold {
        tracing::warn!(
            method = %method,
            uri = %uri,
            elapsed_ms = elapsed.as_millis() as u64,
            status = response.status().as_u16(),
            "Slow request detected"
        );
    } else {
        tracing::debug!(
            method = %method,
            uri = %uri,
            elapsed_ms = elapsed.as_millis() as u64,
            status = response.status().as_u16(),
            "Request completed"
        );
    }

    response
}

/// Authentication requirement middleware
///
/// Rejects requests the auth layer did not attach a caller to.
pub async fn require_auth_middleware(req: Request, next: Next) -> Result<Response, Response> {
    if req.extensions().get::<AuthenticatedUser>().is_none() {
        return Err(ApiError::Unauthorized.into_response());
    }
    Ok(next.run(req).await)
}

/// Header carrying the request id set by the outer layers
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Copy the request id into `ApiError` bodies
///
/// Must sit inside the request id layers and inside compression: it
/// rewrites the body of responses that carry an [`ErrorResponse`].
pub async fn request_id_middleware(req: Request, next: Next) -> Response {
    let request_id = req
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);

    let response = next.run(req).await;

    let Some(request_id) = request_id else {
        return response;
    };
    let Some(body) = response.extensions().get::<ErrorResponse>().cloned() else {
        return response;
    };

    let body = ErrorResponse {
        request_id: Some(request_id),
        ..body
    };
    let Ok(bytes) = serde_json::to_vec(&body) else {
        return response;
    };

    let (mut parts, _) = response.into_parts();
    parts.headers.remove(header::CONTENT_LENGTH);
    parts.extensions.insert(body);
    Response::from_parts(parts, Body::from(bytes))
}
