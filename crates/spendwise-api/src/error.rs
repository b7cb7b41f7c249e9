//! API error handling
//!
//! Every failure leaves the API as `{ code, msg, details?, requestId? }` with
//! a numeric error code grouped by range:
//!
//! | Range | Group |
//! |---|---|
//! | -1000 | authentication |
//! | -1100 | request |
//! | -2000 | lookup |
//! | -3000 | admission |
//! | -4000 | conflict |
//! | -5000 | internal |

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use spendwise_auth::AuthError;
use spendwise_types::SpendError;
use thiserror::Error;
use utoipa::ToSchema;

/// API result type
pub type ApiResult<T> = Result<T, ApiError>;

/// API error
#[derive(Debug, Error)]
pub enum ApiError {
    // =========================================================================
    // Authentication Errors (-1000 to -1099)
    // =========================================================================
    #[error("Unauthorized")]
    Unauthorized,

    #[error("Invalid credentials")]
    InvalidCredentials,

    // =========================================================================
    // Request Errors (-1100 to -1199)
    // =========================================================================
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    // =========================================================================
    // Domain Errors (-2000 to -4099)
    // =========================================================================
    #[error(transparent)]
    Domain(SpendError),

    // =========================================================================
    // Internal Errors (-5000 to -5099)
    // =========================================================================
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Get the numeric error code
    pub fn error_code(&self) -> i32 {
        match self {
            Self::Unauthorized => -1010,
            Self::InvalidCredentials => -1005,

            Self::BadRequest(_) => -1100,
            Self::ValidationError(_) => -1102,

            Self::Domain(err) => match err {
                SpendError::CategoryNotFound { .. } => -2001,
                SpendError::DepartmentNotFound { .. } => -2002,
                SpendError::EmployeeNotFound { .. } => -2003,
                SpendError::LimitEntryNotFound { .. } => -2004,

                SpendError::TransactionCapExceeded { .. } => -3001,
                SpendError::LimitNotConfigured { .. } => -3002,
                SpendError::EffectiveLimitExceeded { .. } => -3003,

                SpendError::DuplicatePeriod { .. } => -4001,
                SpendError::DuplicateEmployee { .. } => -4002,
                SpendError::DuplicateDepartment { .. } => -4003,
                SpendError::DuplicateCategory { .. } => -4004,
                SpendError::DuplicateUser { .. } => -4005,
                SpendError::DepartmentHasEmployees { .. } => -4006,
                SpendError::Conflict(_) => -4010,

                SpendError::Validation(_) => -1102,
                SpendError::Storage(_) => -5002,
            },

            Self::Internal(_) => -5000,
        }
    }

    /// Get the HTTP status code
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Unauthorized | Self::InvalidCredentials => StatusCode::UNAUTHORIZED,
            Self::BadRequest(_) | Self::ValidationError(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,

            Self::Domain(err) => match err {
                SpendError::Validation(_) => StatusCode::BAD_REQUEST,

                SpendError::CategoryNotFound { .. }
                | SpendError::DepartmentNotFound { .. }
                | SpendError::EmployeeNotFound { .. }
                | SpendError::LimitEntryNotFound { .. } => StatusCode::NOT_FOUND,

                SpendError::DuplicatePeriod { .. }
                | SpendError::DuplicateEmployee { .. }
                | SpendError::DuplicateDepartment { .. }
                | SpendError::DuplicateCategory { .. }
                | SpendError::DuplicateUser { .. }
                | SpendError::DepartmentHasEmployees { .. }
                | SpendError::Conflict(_) => StatusCode::CONFLICT,

                SpendError::TransactionCapExceeded { .. }
                | SpendError::LimitNotConfigured { .. }
                | SpendError::EffectiveLimitExceeded { .. } => StatusCode::UNPROCESSABLE_ENTITY,

                SpendError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    /// Client-safe message; faults never expose their detail
    pub fn message(&self) -> String {
        match self {
            Self::Internal(_) | Self::Domain(SpendError::Storage(_)) => {
                "Internal server error".to_string()
            }
            Self::Domain(err) => err.to_string(),
            other => other.to_string(),
        }
    }

    /// Caller-actionable numbers for domain rejections
    pub fn details(&self) -> Option<Value> {
        let Self::Domain(err) = self else {
            return None;
        };
        match err {
            SpendError::TransactionCapExceeded { cap, attempted } => Some(json!({
                "cap": cap,
                "attempted": attempted,
            })),
            SpendError::EffectiveLimitExceeded {
                effective_limit,
                spent,
                remaining,
                carryover,
            } => Some(json!({
                "effectiveLimit": effective_limit,
                "spent": spent,
                "remaining": remaining,
                "carryover": carryover,
            })),
            SpendError::LimitNotConfigured {
                department_id,
                period,
            }
            | SpendError::DuplicatePeriod {
                department_id,
                period,
            } => Some(json!({
                "departmentId": department_id,
                "year": period.year,
                "month": period.month,
            })),
            SpendError::DepartmentHasEmployees {
                department_id,
                employee_count,
            } => Some(json!({
                "departmentId": department_id,
                "employeeCount": employee_count,
            })),
            _ => None,
        }
    }

    fn is_fault(&self) -> bool {
        matches!(self, Self::Internal(_)) || matches!(self, Self::Domain(e) if e.is_fault())
    }
}

/// API error response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    /// Numeric error code
    pub code: i32,
    /// Human-readable error message
    pub msg: String,
    /// Structured data for domain rejections
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub details: Option<Value>,
    /// `x-request-id` of the failed request
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

impl From<&ApiError> for ErrorResponse {
    fn from(err: &ApiError) -> Self {
        Self {
            code: err.error_code(),
            msg: err.message(),
            details: err.details(),
            request_id: None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.is_fault() {
            tracing::error!(error = %self, "Request failed with an internal fault");
        }
        let body = ErrorResponse::from(&self);
        let mut response = (self.status_code(), Json(body.clone())).into_response();
        // Kept so the request id middleware can re-render the body
        response.extensions_mut().insert(body);
        response
    }
}

impl From<SpendError> for ApiError {
    fn from(err: SpendError) -> Self {
        Self::Domain(err)
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials | AuthError::PasswordVerificationFailed => {
                Self::InvalidCredentials
            }
            AuthError::TokenExpired
            | AuthError::InvalidToken
            | AuthError::TokenRevoked
            | AuthError::InvalidTokenType
            | AuthError::Unauthenticated => Self::Unauthorized,
            AuthError::WeakPassword(msg) => Self::ValidationError(msg),
            other => Self::Internal(other.to_string()),
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(err: validator::ValidationErrors) -> Self {
        Self::ValidationError(format_validation_errors(&err))
    }
}

/// Format validation errors into a readable string
pub(crate) fn format_validation_errors(errors: &validator::ValidationErrors) -> String {
    let mut messages: Vec<String> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| match e.message.as_ref() {
                Some(message) => message.to_string(),
                None => format!("{}: validation failed", field),
            })
        })
        .collect();
    messages.sort();
    messages.join(", ")
}
