//! Authentication Middleware for Axum
//!
//! [`AuthLayer`] verifies a `Bearer` access token when one is presented and
//! attaches the [`AuthenticatedUser`] to the request extensions. The layer
//! never rejects: requests without a usable token pass through without a
//! caller, and the router decides which routes need one.

use axum::{
    extract::Request,
    http::{header, HeaderMap},
    response::Response,
};
use std::sync::Arc;
use std::task::{Context, Poll};
use tower::{Layer, Service};

use crate::error::AuthError;
use crate::jwt::JwtService;
use crate::types::AuthenticatedUser;

/// Authentication middleware layer
#[derive(Clone)]
pub struct AuthLayer {
    jwt: Arc<JwtService>,
}

impl AuthLayer {
    /// Create a new authentication layer
    pub fn new(jwt: Arc<JwtService>) -> Self {
        Self { jwt }
    }
}

impl<S> Layer<S> for AuthLayer {
    type Service = AuthMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        AuthMiddleware {
            inner,
            jwt: self.jwt.clone(),
        }
    }
}

/// Authentication middleware service
#[derive(Clone)]
pub struct AuthMiddleware<S> {
    inner: S,
    jwt: Arc<JwtService>,
}

impl<S> Service<Request> for AuthMiddleware<S>
where
    S: Service<Request, Response = Response> + Send + Clone + 'static,
    S::Future: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>> + Send>,
    >;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request) -> Self::Future {
        let jwt = self.jwt.clone();
        // Take the service that was driven to readiness, leave a fresh clone behind
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);

        Box::pin(async move {
            match authenticate_request(req.headers(), &jwt).await {
                Ok(user) => {
                    req.extensions_mut().insert(user);
                }
                Err(AuthError::Unauthenticated) => {}
                // A stale token must not lock the caller out of public routes
                Err(e) => {
                    tracing::debug!(error = %e, "Ignoring unusable bearer token");
                }
            }
            inner.call(req).await
        })
    }
}

/// Authenticate a request from its `Authorization` header
async fn authenticate_request(
    headers: &HeaderMap,
    jwt: &JwtService,
) -> Result<AuthenticatedUser, AuthError> {
    let token = bearer_token(headers)?.ok_or(AuthError::Unauthenticated)?;
    let claims = jwt.validate_access_token(token).await?;
    let user_id = claims.user_id().ok_or(AuthError::InvalidToken)?;

    Ok(AuthenticatedUser {
        user_id,
        email: claims.email,
        token_id: claims.jti,
        token_expires_at: claims.exp,
    })
}

/// `Ok(None)` when no bearer credentials are present at all
fn bearer_token(headers: &HeaderMap) -> Result<Option<&str>, AuthError> {
    let Some(value) = headers.get(header::AUTHORIZATION) else {
        return Ok(None);
    };
    let value = value.to_str().map_err(|_| AuthError::InvalidToken)?;
    match value.strip_prefix("Bearer ") {
        Some(token) if !token.trim().is_empty() => Ok(Some(token.trim())),
        Some(_) => Err(AuthError::InvalidToken),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bearer_token_extraction() {
        let mut headers = HeaderMap::new();
        assert!(matches!(bearer_token(&headers), Ok(None)));

        headers.insert(header::AUTHORIZATION, "Bearer abc.def.ghi".parse().unwrap());
        assert_eq!(bearer_token(&headers).unwrap(), Some("abc.def.ghi"));

        headers.insert(header::AUTHORIZATION, "Basic dXNlcjpwdw==".parse().unwrap());
        assert!(matches!(bearer_token(&headers), Ok(None)));

        headers.insert(header::AUTHORIZATION, "Bearer   ".parse().unwrap());
        assert!(matches!(bearer_token(&headers), Err(AuthError::InvalidToken)));
    }
}
