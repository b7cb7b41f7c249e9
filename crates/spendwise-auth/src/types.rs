//! Core authentication types
//!
//! Shared types used across the authentication components.

use serde::{Deserialize, Serialize};
use spendwise_types::UserId;

/// Caller identity extracted from a verified access token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    /// User ID
    pub user_id: UserId,
    /// User email
    pub email: String,
    /// `jti` of the presented access token, used for revocation
    pub token_id: String,
    /// Expiry of the presented access token (Unix timestamp)
    pub token_expires_at: i64,
}

/// Token pair returned after authentication
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPair {
    /// Access token
    pub access_token: String,
    /// Refresh token
    pub refresh_token: String,
    /// Access token expiry (Unix timestamp)
    pub access_expires_at: i64,
    /// Refresh token expiry (Unix timestamp)
    pub refresh_expires_at: i64,
    /// Access token lifetime in seconds
    pub expires_in: i64,
    /// Token type (always "Bearer")
    pub token_type: String,
}

impl TokenPair {
    pub fn new(
        access_token: String,
        refresh_token: String,
        issued_at: i64,
        access_expires_at: i64,
        refresh_expires_at: i64,
    ) -> Self {
        Self {
            access_token,
            refresh_token,
            access_expires_at,
            refresh_expires_at,
            expires_in: access_expires_at - issued_at,
            token_type: "Bearer".to_string(),
        }
    }
}

/// Token type enum for JWT claims
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenType {
    Access,
    Refresh,
}

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject (user ID)
    pub sub: String,
    /// Token type
    pub token_type: TokenType,
    /// User email
    pub email: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Not before (Unix timestamp)
    pub nbf: i64,
    /// Issuer
    pub iss: String,
    /// Audience
    pub aud: String,
    /// JWT ID (unique identifier)
    pub jti: String,
}

impl TokenClaims {
    /// Parse the subject back into a user id
    pub fn user_id(&self) -> Option<UserId> {
        UserId::parse(&self.sub).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_pair_expires_in() {
        let pair = TokenPair::new("a".into(), "r".into(), 1_000, 1_900, 9_000);
        assert_eq!(pair.expires_in, 900);
        assert_eq!(pair.token_type, "Bearer");
    }

    #[test]
    fn test_token_type_serializes_snake_case() {
        assert_eq!(serde_json::to_string(&TokenType::Refresh).unwrap(), "\"refresh\"");
    }
}
