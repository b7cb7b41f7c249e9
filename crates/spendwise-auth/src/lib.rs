//! Spendwise Authentication Layer
//!
//! Authentication for the Spendwise API:
//!
//! - **JWT Authentication**: HS256 access tokens + refresh tokens with rotation
//! - **Password Security**: Argon2id hashing with an optional pepper
//! - **Middleware**: a tower layer that attaches the verified caller to the
//!   request
//!
//! ```text
//! Request → AuthLayer ──Bearer──▶ JwtService ──▶ AuthenticatedUser (extension)
//!                │
//!                └── no or unusable token ──▶ passed through without a caller
//! ```
//!
//! User records live in the record store; this crate only issues and checks
//! credentials.

pub mod config;
pub mod error;
pub mod jwt;
pub mod middleware;
pub mod password;
pub mod types;

pub use config::{AuthConfig, JwtConfig, PasswordConfig};
pub use error::{AuthError, AuthResult};
pub use jwt::JwtService;
pub use middleware::{AuthLayer, AuthMiddleware};
pub use password::PasswordService;
pub use types::*;

use std::sync::Arc;

/// Main authentication service combining token and password handling
#[derive(Clone)]
pub struct AuthService {
    pub jwt: Arc<JwtService>,
    pub password: PasswordService,
    config: AuthConfig,
}

impl AuthService {
    /// Create a new auth service
    pub fn new(config: AuthConfig) -> Self {
        Self {
            jwt: Arc::new(JwtService::new(config.jwt.clone())),
            password: PasswordService::new(config.password.clone()),
            config,
        }
    }

    /// Get the config reference
    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    /// Create an auth layer for Axum router
    pub fn layer(&self) -> AuthLayer {
        AuthLayer::new(self.jwt.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spendwise_types::UserId;

    #[tokio::test]
    async fn test_clones_share_revocations() {
        let mut config = AuthConfig::default();
        config.jwt.secret = "a".repeat(32);
        let service = AuthService::new(config);

        let pair = service.jwt.generate_token_pair(UserId::new(), "a@b.io").unwrap();
        let claims = service.jwt.validate_access_token(&pair.access_token).await.unwrap();
        service.jwt.revoke_token(&claims.jti, claims.exp).await;

        let clone = service.clone();
        assert!(matches!(
            clone.jwt.validate_access_token(&pair.access_token).await,
            Err(AuthError::TokenRevoked)
        ));
    }
}
