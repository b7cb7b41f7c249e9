//! JWT Token Service
//!
//! HS256 access and refresh tokens with:
//! - Refresh token rotation
//! - In-process revocation by `jti`
//! - Issuer, audience, expiry and not-before validation

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use spendwise_types::UserId;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::config::JwtConfig;
use crate::error::{AuthError, AuthResult};
use crate::types::{TokenClaims, TokenPair, TokenType};

/// Revoked `jti` values mapped to the expiry of the token they belong to
type RevocationList = Arc<RwLock<HashMap<String, i64>>>;

/// JWT service for token management
#[derive(Clone)]
pub struct JwtService {
    config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    revoked_tokens: RevocationList,
    revoked_refresh_tokens: RevocationList,
}

impl JwtService {
    /// Create a new JWT service
    pub fn new(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        Self {
            config,
            encoding_key,
            decoding_key,
            revoked_tokens: Arc::default(),
            revoked_refresh_tokens: Arc::default(),
        }
    }

    /// Generate a new token pair (access + refresh)
    pub fn generate_token_pair(&self, user_id: UserId, email: &str) -> AuthResult<TokenPair> {
        let now = Utc::now();
        let access_exp = now
            + Duration::from_std(self.config.access_token_lifetime)
                .map_err(|e| AuthError::Internal(e.to_string()))?;
        let refresh_exp = now
            + Duration::from_std(self.config.refresh_token_lifetime)
                .map_err(|e| AuthError::Internal(e.to_string()))?;

        let access_token = self.encode_claims(TokenClaims {
            sub: user_id.to_string(),
            token_type: TokenType::Access,
            email: email.to_string(),
            iat: now.timestamp(),
            exp: access_exp.timestamp(),
            nbf: now.timestamp(),
            iss: self.config.issuer.clone(),
            aud: self.config.audience.clone(),
            jti: Uuid::new_v4().to_string(),
        })?;

        let refresh_token = self.encode_claims(TokenClaims {
            sub: user_id.to_string(),
            token_type: TokenType::Refresh,
            email: email.to_string(),
            iat: now.timestamp(),
            exp: refresh_exp.timestamp(),
            nbf: now.timestamp(),
            iss: self.config.issuer.clone(),
            aud: self.config.audience.clone(),
            jti: Uuid::new_v4().to_string(),
        })?;

        Ok(TokenPair::new(
            access_token,
            refresh_token,
            now.timestamp(),
            access_exp.timestamp(),
            refresh_exp.timestamp(),
        ))
    }

    /// Validate an access token and return claims
    pub async fn validate_access_token(&self, token: &str) -> AuthResult<TokenClaims> {
        let claims = self.decode_token(token)?;

        if claims.token_type != TokenType::Access {
            return Err(AuthError::InvalidTokenType);
        }
        if self.revoked_tokens.read().await.contains_key(&claims.jti) {
            return Err(AuthError::TokenRevoked);
        }

        Ok(claims)
    }

    /// Validate a refresh token and return claims
    pub async fn validate_refresh_token(&self, token: &str) -> AuthResult<TokenClaims> {
        let claims = self.decode_token(token)?;

        if claims.token_type != TokenType::Refresh {
            return Err(AuthError::InvalidTokenType);
        }
        if self.revoked_refresh_tokens.read().await.contains_key(&claims.jti) {
            return Err(AuthError::TokenRevoked);
        }

        Ok(claims)
    }

    /// Exchange a refresh token for a new pair, rotating the old one out
    pub async fn refresh_tokens(&self, refresh_token: &str) -> AuthResult<TokenPair> {
        let claims = if self.config.rotate_refresh_tokens {
            let claims = self.decode_token(refresh_token)?;
            if claims.token_type != TokenType::Refresh {
                return Err(AuthError::InvalidTokenType);
            }
            // Check and revoke under one lock: a refresh token is exchanged once
            if !revoke(&self.revoked_refresh_tokens, &claims.jti, claims.exp).await {
                return Err(AuthError::TokenRevoked);
            }
            claims
        } else {
            self.validate_refresh_token(refresh_token).await?
        };
        let user_id = claims.user_id().ok_or(AuthError::InvalidToken)?;

        self.generate_token_pair(user_id, &claims.email)
    }

    /// Revoke an access token until it would have expired anyway
    pub async fn revoke_token(&self, jti: &str, expires_at: i64) {
        let _ = revoke(&self.revoked_tokens, jti, expires_at).await;
        tracing::debug!(jti = %jti, "Access token revoked");
    }

    /// Decode and validate a token (shared logic)
    fn decode_token(&self, token: &str) -> AuthResult<TokenClaims> {
        let mut validation = Validation::default();
        validation.set_issuer(&[&self.config.issuer]);
        validation.set_audience(&[&self.config.audience]);
        validation.validate_exp = true;
        validation.validate_nbf = true;

        let token_data = decode::<TokenClaims>(token, &self.decoding_key, &validation)?;
        Ok(token_data.claims)
    }

    fn encode_claims(&self, claims: TokenClaims) -> AuthResult<String> {
        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AuthError::Internal(format!("Failed to encode token: {}", e)))
    }
}

/// Insert a revoked id, pruning entries whose tokens have already expired
///
/// Returns `false` when the id was already revoked.
async fn revoke(list: &RevocationList, jti: &str, expires_at: i64) -> bool {
    let now = Utc::now().timestamp();
    let mut revoked = list.write().await;
    revoked.retain(|_, exp| *exp > now);
    revoked.insert(jti.to_string(), expires_at).is_none()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> JwtConfig {
        JwtConfig {
            secret: "test-secret-key-for-jwt-tokens-min-32-bytes!".to_string(),
            access_token_lifetime: std::time::Duration::from_secs(900),
            refresh_token_lifetime: std::time::Duration::from_secs(604800),
            issuer: "test-issuer".to_string(),
            audience: "test-audience".to_string(),
            rotate_refresh_tokens: true,
        }
    }

    #[test]
    fn test_generate_token_pair() {
        let service = JwtService::new(test_config());
        let pair = service
            .generate_token_pair(UserId::new(), "test@example.com")
            .unwrap();

        assert!(!pair.access_token.is_empty());
        assert!(!pair.refresh_token.is_empty());
        assert_eq!(pair.token_type, "Bearer");
        assert_eq!(pair.expires_in, 900);
    }

    #[tokio::test]
    async fn test_validate_access_token() {
        let service = JwtService::new(test_config());
        let user_id = UserId::new();
        let pair = service.generate_token_pair(user_id, "test@example.com").unwrap();

        let claims = service.validate_access_token(&pair.access_token).await.unwrap();
        assert_eq!(claims.user_id(), Some(user_id));
        assert_eq!(claims.email, "test@example.com");
        assert_eq!(claims.token_type, TokenType::Access);
    }

    #[tokio::test]
    async fn test_access_token_fails_as_refresh() {
        let service = JwtService::new(test_config());
        let pair = service
            .generate_token_pair(UserId::new(), "test@example.com")
            .unwrap();

        let result = service.validate_refresh_token(&pair.access_token).await;
        assert!(matches!(result, Err(AuthError::InvalidTokenType)));

        let result = service.validate_access_token(&pair.refresh_token).await;
        assert!(matches!(result, Err(AuthError::InvalidTokenType)));
    }

    #[tokio::test]
    async fn test_token_revocation() {
        let service = JwtService::new(test_config());
        let pair = service
            .generate_token_pair(UserId::new(), "test@example.com")
            .unwrap();

        let claims = service.validate_access_token(&pair.access_token).await.unwrap();
        service.revoke_token(&claims.jti, claims.exp).await;

        let result = service.validate_access_token(&pair.access_token).await;
        assert!(matches!(result, Err(AuthError::TokenRevoked)));
    }

    #[tokio::test]
    async fn test_refresh_token_rotation() {
        let service = JwtService::new(test_config());
        let user_id = UserId::new();
        let pair = service.generate_token_pair(user_id, "test@example.com").unwrap();

        let new_pair = service.refresh_tokens(&pair.refresh_token).await.unwrap();
        let claims = service.validate_access_token(&new_pair.access_token).await.unwrap();
        assert_eq!(claims.user_id(), Some(user_id));

        let result = service.refresh_tokens(&pair.refresh_token).await;
        assert!(matches!(result, Err(AuthError::TokenRevoked)));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_refresh_exchanges_token_once() {
        let service = Arc::new(JwtService::new(test_config()));
        let pair = service
            .generate_token_pair(UserId::new(), "test@example.com")
            .unwrap();

        let attempts: Vec<_> = (0..8)
            .map(|_| {
                let service = service.clone();
                let token = pair.refresh_token.clone();
                tokio::spawn(async move { service.refresh_tokens(&token).await })
            })
            .collect();

        let mut exchanged = 0;
        for attempt in attempts {
            match attempt.await.unwrap() {
                Ok(_) => exchanged += 1,
                Err(e) => assert!(matches!(e, AuthError::TokenRevoked)),
            }
        }
        assert_eq!(exchanged, 1);
    }

    #[tokio::test]
    async fn test_wrong_audience_is_rejected() {
        let issuer = JwtService::new(test_config());
        let mut other = test_config();
        other.audience = "someone-else".to_string();
        let verifier = JwtService::new(other);

        let pair = issuer
            .generate_token_pair(UserId::new(), "test@example.com")
            .unwrap();
        let result = verifier.validate_access_token(&pair.access_token).await;
        assert!(matches!(result, Err(AuthError::InvalidToken)));
    }

    #[test]
    fn test_invalid_token() {
        let service = JwtService::new(test_config());
        assert!(matches!(
            service.decode_token("invalid-token"),
            Err(AuthError::InvalidToken)
        ));
    }
}
