//! Authentication Handlers
//!
//! Registration, login, token refresh and logout.

use axum::{extract::State, http::StatusCode, Json};
use spendwise_ledger::UserStore;
use spendwise_types::{normalize_email, SpendError, User};
use std::sync::Arc;

use crate::dto::{
    LoginRequest, LoginResponse, RefreshTokenRequest, RefreshTokenResponse, RegisterRequest,
    RegisterResponse, SuccessResponse,
};
use crate::error::{ApiError, ApiResult};
use crate::extractors::{CurrentUser, ValidatedJson};
use crate::state::AppState;

/// User registration
#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    tag = "Authentication",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Registration successful", body = RegisterResponse),
        (status = 400, description = "Invalid email or weak password", body = crate::error::ErrorResponse),
        (status = 409, description = "Email already registered", body = crate::error::ErrorResponse)
    )
)]
pub async fn register(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<RegisterResponse>)> {
    let email = normalize_email(&request.email);
    if state.store.find_user_by_email(&email).await?.is_some() {
        return Err(SpendError::DuplicateUser { email }.into());
    }

    let password_hash = state.auth.password.hash_password(&request.password)?;

    // The store rejects a concurrent registration of the same email
    let user = state.store.insert_user(User::new(&email, password_hash)).await?;

    tracing::info!(user_id = %user.id, email = %user.email, "User registered");

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse { user: user.into() }),
    ))
}

/// User login
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 400, description = "Invalid request", body = crate::error::ErrorResponse),
        (status = 401, description = "Invalid credentials", body = crate::error::ErrorResponse)
    )
)]
pub async fn login(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let user = state
        .store
        .find_user_by_email(&normalize_email(&request.email))
        .await?
        .ok_or(ApiError::InvalidCredentials)?;

    let is_valid = state
        .auth
        .password
        .verify_password(&request.password, &user.password_hash)
        .map_err(|_| ApiError::InvalidCredentials)?;
    if !is_valid {
        tracing::debug!(user_id = %user.id, "Login rejected");
        return Err(ApiError::InvalidCredentials);
    }

    let tokens = state.auth.jwt.generate_token_pair(user.id, &user.email)?;

    tracing::info!(user_id = %user.id, "User logged in");

    Ok(Json(LoginResponse::new(tokens, user)))
}

/// Refresh access token
///
/// The presented refresh token is revoked and a new pair is issued.
#[utoipa::path(
    post,
    path = "/api/v1/auth/refresh",
    tag = "Authentication",
    request_body = RefreshTokenRequest,
    responses(
        (status = 200, description = "Token refreshed", body = RefreshTokenResponse),
        (status = 401, description = "Invalid or revoked refresh token", body = crate::error::ErrorResponse)
    )
)]
pub async fn refresh_token(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<RefreshTokenRequest>,
) -> ApiResult<Json<RefreshTokenResponse>> {
    let tokens = state.auth.jwt.refresh_tokens(&request.refresh_token).await?;
    Ok(Json(tokens.into()))
}

/// User logout
///
/// Revokes the access token used for this request.
#[utoipa::path(
    post,
    path = "/api/v1/auth/logout",
    tag = "Authentication",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Logout successful", body = SuccessResponse),
        (status = 401, description = "Unauthorized", body = crate::error::ErrorResponse)
    )
)]
pub async fn logout(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
) -> ApiResult<Json<SuccessResponse>> {
    state
        .auth
        .jwt
        .revoke_token(&user.token_id, user.token_expires_at)
        .await;

    tracing::info!(user_id = %user.user_id, "User logged out");

    Ok(Json(SuccessResponse::ok()))
}
