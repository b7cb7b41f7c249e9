//! Password Service
//!
//! Argon2id hashing with an optional pepper. Parameters are embedded in
//! each hash, so verification keeps working after the costs change.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use zeroize::Zeroizing;

use crate::config::PasswordConfig;
use crate::error::{AuthError, AuthResult};

const COMMON_PASSWORDS: &[&str] = &[
    "password", "123456", "12345678", "qwerty", "abc123", "letmein", "iloveyou", "welcome",
];

/// Password service for hashing and verification
#[derive(Clone)]
pub struct PasswordService {
    config: PasswordConfig,
}

impl PasswordService {
    /// Create a new password service
    pub fn new(config: PasswordConfig) -> Self {
        Self { config }
    }

    /// Validate strength, then hash with Argon2id
    pub fn hash_password(&self, password: &str) -> AuthResult<String> {
        self.validate_password_strength(password)?;

        let peppered = self.peppered(password);
        let salt = SaltString::generate(&mut OsRng);

        let params = Params::new(
            self.config.memory_cost,
            self.config.time_cost,
            self.config.parallelism,
            Some(self.config.hash_length as usize),
        )
        .map_err(|e| AuthError::Config(format!("Invalid Argon2 params: {}", e)))?;

        let hash = Argon2::new(Algorithm::Argon2id, Version::V0x13, params)
            .hash_password(peppered.as_bytes(), &salt)
            .map_err(|_| AuthError::PasswordHashingFailed)?;

        Ok(hash.to_string())
    }

    /// Verify a password against a stored hash
    pub fn verify_password(&self, password: &str, hash: &str) -> AuthResult<bool> {
        let peppered = self.peppered(password);
        let parsed_hash = PasswordHash::new(hash)?;

        match Argon2::default().verify_password(peppered.as_bytes(), &parsed_hash) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(_) => Err(AuthError::PasswordVerificationFailed),
        }
    }

    /// Collects every unmet rule into one `WeakPassword` message
    pub fn validate_password_strength(&self, password: &str) -> AuthResult<()> {
        let mut errors = Vec::new();
        let length = password.chars().count();

        if length < self.config.min_password_length {
            errors.push(format!(
                "Password must be at least {} characters",
                self.config.min_password_length
            ));
        }
        if length > self.config.max_password_length {
            errors.push(format!(
                "Password must be at most {} characters",
                self.config.max_password_length
            ));
        }
        if self.config.require_letter && !password.chars().any(char::is_alphabetic) {
            errors.push("Password must contain at least one letter".to_string());
        }
        if self.config.require_digit && !password.chars().any(|c| c.is_ascii_digit()) {
            errors.push("Password must contain at least one digit".to_string());
        }

        let lowercase = password.to_lowercase();
        if COMMON_PASSWORDS.iter().any(|common| lowercase.contains(common)) {
            errors.push("Password is too common".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(AuthError::WeakPassword(errors.join("; ")))
        }
    }

    fn peppered(&self, password: &str) -> Zeroizing<String> {
        match self.config.pepper {
            Some(ref pepper) => Zeroizing::new(format!("{}{}", password, pepper)),
            None => Zeroizing::new(password.to_string()),
        }
    }
}
