//! Authentication configuration
//!
//! Token and password settings with secure defaults following OWASP
//! recommendations.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Minimum JWT secret length in bytes (256 bits)
pub const MIN_SECRET_LEN: usize = 32;

/// Main authentication configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthConfig {
    /// JWT configuration
    pub jwt: JwtConfig,
    /// Password hashing configuration
    pub password: PasswordConfig,
}

/// JWT token configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct JwtConfig {
    /// Secret key for signing tokens (should be at least 256 bits)
    pub secret: String,
    /// Access token lifetime
    #[serde(with = "humantime_serde")]
    pub access_token_lifetime: Duration,
    /// Refresh token lifetime
    #[serde(with = "humantime_serde")]
    pub refresh_token_lifetime: Duration,
    /// Token issuer claim
    pub issuer: String,
    /// Token audience claim
    pub audience: String,
    /// Revoke a refresh token once it has been exchanged
    pub rotate_refresh_tokens: bool,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: String::new(), // Must be set in production
            access_token_lifetime: Duration::from_secs(24 * 60 * 60), // 24 hours
            refresh_token_lifetime: Duration::from_secs(7 * 24 * 60 * 60), // 7 days
            issuer: "spendwise".to_string(),
            audience: "spendwise-api".to_string(),
            rotate_refresh_tokens: true,
        }
    }
}

/// Password hashing configuration (Argon2id)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PasswordConfig {
    /// Memory cost in KiB (OWASP recommends 19456 KiB = 19 MiB minimum)
    pub memory_cost: u32,
    /// Time cost (iterations) - OWASP recommends 2 minimum
    pub time_cost: u32,
    /// Parallelism factor
    pub parallelism: u32,
    /// Output hash length in bytes
    pub hash_length: u32,
    /// Pepper (additional secret, optional)
    pub pepper: Option<String>,
    /// Minimum password length
    pub min_password_length: usize,
    /// Maximum password length (to bound hashing cost)
    pub max_password_length: usize,
    /// Require at least one letter
    pub require_letter: bool,
    /// Require at least one digit
    pub require_digit: bool,
}

impl Default for PasswordConfig {
    fn default() -> Self {
        Self {
            memory_cost: 19456, // 19 MiB
            time_cost: 2,
            parallelism: 1,
            hash_length: 32,
            pepper: None,
            min_password_length: 8,
            max_password_length: 128,
            require_letter: true,
            require_digit: true,
        }
    }
}

impl AuthConfig {
    /// Create configuration from environment variables
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(secret) = std::env::var("JWT_SECRET") {
            config.jwt.secret = secret;
        }
        if let Ok(issuer) = std::env::var("JWT_ISSUER") {
            config.jwt.issuer = issuer;
        }
        if let Ok(audience) = std::env::var("JWT_AUDIENCE") {
            config.jwt.audience = audience;
        }
        if let Ok(pepper) = std::env::var("PASSWORD_PEPPER") {
            config.password.pepper = Some(pepper);
        }

        config
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.jwt.secret.is_empty() {
            errors.push("JWT secret must be set".to_string());
        } else if self.jwt.secret.len() < MIN_SECRET_LEN {
            errors.push(format!(
                "JWT secret should be at least 256 bits ({} bytes)",
                MIN_SECRET_LEN
            ));
        }
        if self.jwt.access_token_lifetime.is_zero() {
            errors.push("Access token lifetime must be positive".to_string());
        }

        if self.password.memory_cost < 19456 {
            errors.push("Argon2 memory cost should be at least 19456 KiB (OWASP recommendation)".to_string());
        }
        if self.password.time_cost < 2 {
            errors.push("Argon2 time cost should be at least 2 (OWASP recommendation)".to_string());
        }
        if self.password.min_password_length > self.password.max_password_length {
            errors.push("Minimum password length exceeds the maximum".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AuthConfig::default();
        assert_eq!(config.jwt.access_token_lifetime, Duration::from_secs(24 * 60 * 60));
        assert_eq!(config.jwt.issuer, "spendwise");
        assert_eq!(config.password.memory_cost, 19456);
        assert_eq!(config.password.min_password_length, 8);
    }

    #[test]
    fn test_config_validation_missing_secret() {
        let config = AuthConfig::default();
        let errors = config.validate().unwrap_err();
        assert_eq!(errors, vec!["JWT secret must be set".to_string()]);
    }

    #[test]
    fn test_config_validation_short_secret() {
        let mut config = AuthConfig::default();
        config.jwt.secret = "too-short".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_valid() {
        let mut config = AuthConfig::default();
        config.jwt.secret = "a".repeat(32);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_durations_parse_from_humantime() {
        let config: JwtConfig = serde_json::from_str(
            r#"{"secret":"s","access_token_lifetime":"30m","refresh_token_lifetime":"2days"}"#,
        )
        .unwrap();
        assert_eq!(config.access_token_lifetime, Duration::from_secs(30 * 60));
        assert_eq!(config.refresh_token_lifetime, Duration::from_secs(2 * 24 * 60 * 60));
        assert_eq!(config.issuer, "spendwise");
    }
}
