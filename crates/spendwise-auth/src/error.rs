//! Authentication error types
//!
//! Errors are safe for external exposure: internal variants render a
//! generic client message and never leak their detail.

use thiserror::Error;

/// Result type alias for authentication operations
pub type AuthResult<T> = Result<T, AuthError>;

/// Authentication error types
#[derive(Debug, Error)]
pub enum AuthError {
    // =========================================================================
    // Token Errors
    // =========================================================================
    /// Token has expired
    #[error("Token has expired")]
    TokenExpired,

    /// Token is invalid (malformed, wrong signature, etc.)
    #[error("Invalid token")]
    InvalidToken,

    /// Token has been revoked
    #[error("Token has been revoked")]
    TokenRevoked,

    /// Token type mismatch (expected access, got refresh, etc.)
    #[error("Invalid token type")]
    InvalidTokenType,

    // =========================================================================
    // Credential Errors
    // =========================================================================
    /// Unknown email or wrong password
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Password does not meet requirements
    #[error("Password does not meet requirements: {0}")]
    WeakPassword(String),

    /// Password hash could not be parsed or checked
    #[error("Password verification failed")]
    PasswordVerificationFailed,

    /// Password hashing failed
    #[error("Password hashing failed")]
    PasswordHashingFailed,

    /// No credentials were presented
    #[error("Authentication required")]
    Unauthenticated,

    // =========================================================================
    // Internal Errors
    // =========================================================================
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error (should not be exposed to clients)
    #[error("Internal error")]
    Internal(String),
}

impl AuthError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            Self::WeakPassword(_) | Self::InvalidTokenType => 400,

            Self::TokenExpired
            | Self::InvalidToken
            | Self::TokenRevoked
            | Self::InvalidCredentials
            | Self::PasswordVerificationFailed
            | Self::Unauthenticated => 401,

            Self::PasswordHashingFailed | Self::Config(_) | Self::Internal(_) => 500,
        }
    }

    /// Get an error code for the client (safe to expose)
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::TokenExpired => "TOKEN_EXPIRED",
            Self::InvalidToken => "INVALID_TOKEN",
            Self::TokenRevoked => "TOKEN_REVOKED",
            Self::InvalidTokenType => "INVALID_TOKEN_TYPE",
            Self::InvalidCredentials | Self::PasswordVerificationFailed => "INVALID_CREDENTIALS",
            Self::WeakPassword(_) => "WEAK_PASSWORD",
            Self::Unauthenticated => "UNAUTHENTICATED",
            Self::PasswordHashingFailed | Self::Config(_) | Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Check if this error should be logged at error level
    pub fn is_server_error(&self) -> bool {
        self.status_code() >= 500
    }

    /// Get safe message for client (doesn't leak internal details)
    pub fn client_message(&self) -> String {
        match self {
            Self::Internal(_) | Self::Config(_) => "An internal error occurred".to_string(),
            _ => self.to_string(),
        }
    }
}

impl From<jsonwebtoken::errors::Error> for AuthError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;
        match err.kind() {
            ErrorKind::ExpiredSignature => Self::TokenExpired,
            _ => Self::InvalidToken,
        }
    }
}

impl From<argon2::password_hash::Error> for AuthError {
    fn from(_: argon2::password_hash::Error) -> Self {
        Self::PasswordVerificationFailed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(AuthError::InvalidCredentials.status_code(), 401);
        assert_eq!(AuthError::TokenRevoked.status_code(), 401);
        assert_eq!(AuthError::WeakPassword("short".into()).status_code(), 400);
        assert_eq!(AuthError::Internal("boom".into()).status_code(), 500);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(AuthError::TokenExpired.error_code(), "TOKEN_EXPIRED");
        assert_eq!(
            AuthError::PasswordVerificationFailed.error_code(),
            "INVALID_CREDENTIALS"
        );
    }

    #[test]
    fn test_client_message_hides_internal_details() {
        let err = AuthError::Internal("signing key rejected".to_string());
        assert_eq!(err.client_message(), "An internal error occurred");
        assert!(err.is_server_error());
    }
}
