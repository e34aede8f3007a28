use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::rand_core::RngCore;
use serde::Deserialize;
use serde::Serialize;
use uuid::Builder;

use super::errors::JwtError;

/// Claims carried by access and refresh tokens.
///
/// Both token kinds share this shape; only the caller knows which one a
/// string is. Serialized with the registered JWT claim names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Credential identifier the token was issued for
    #[serde(rename = "sub")]
    pub subject: String,

    /// Issued at (Unix timestamp)
    #[serde(rename = "iat")]
    pub issued_at: i64,

    /// Expiration time (Unix timestamp)
    #[serde(rename = "exp")]
    pub expires_at: i64,

    /// Unique token identifier
    #[serde(rename = "jti")]
    pub token_id: String,
}

impl TokenClaims {
    /// Create claims valid from `now` for `ttl_seconds`.
    ///
    /// # Errors
    /// * `RandomSourceUnavailable` - The OS random source could not be read
    pub fn new(subject: impl ToString, now: i64, ttl_seconds: i64) -> Result<Self, JwtError> {
        Ok(Self {
            subject: subject.to_string(),
            issued_at: now,
            expires_at: now.saturating_add(ttl_seconds),
            token_id: random_token_id()?,
        })
    }

    /// Check if token is expired. A token is still valid at its expiry second.
    pub fn is_expired(&self, current_timestamp: i64) -> bool {
        current_timestamp > self.expires_at
    }
}

// Random (v4) UUID drawn without panicking on entropy failure
fn random_token_id() -> Result<String, JwtError> {
    let mut bytes = [0u8; 16];
    OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(|e| JwtError::RandomSourceUnavailable(e.to_string()))?;

    Ok(Builder::from_random_bytes(bytes).into_uuid().to_string())
}
