use std::hint::black_box;

use chrono::Duration;
use serde::Serialize;

use crate::jwt::JwtError;
use crate::jwt::JwtHandler;
use crate::jwt::TokenClaims;
use crate::password::EncodedHash;
use crate::password::HashParameters;
use crate::password::PasswordError;
use crate::password::PasswordHasher;

/// Authentication coordinator combining password verification and JWT generation.
///
/// Provides high-level authentication operations by coordinating
/// password hashing and JWT token handling. Holds no mutable state and can be
/// shared across tasks behind an `Arc`.
#[derive(Debug)]
pub struct Authenticator {
    password_hasher: PasswordHasher,
    jwt_handler: JwtHandler,
    lifetimes: TokenLifetimes,
    /// Well-formed hash under the default parameters that matches no password
    decoy_hash: String,
}

/// Lifetimes of the two token kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenLifetimes {
    pub access: Duration,
    pub refresh: Duration,
}

impl Default for TokenLifetimes {
    fn default() -> Self {
        Self {
            access: Duration::minutes(15),
            refresh: Duration::days(7),
        }
    }
}

/// Access and refresh tokens minted by one authentication event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    pub token_type: String,
    pub access_token: String,
    /// Unix timestamp after which the access token is rejected
    pub access_token_expires_at: i64,
    pub refresh_token: String,
}

/// Authentication operation errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthenticationError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Password error: {0}")]
    PasswordError(#[from] PasswordError),

    #[error("JWT error: {0}")]
    JwtError(#[from] JwtError),

    #[error("Invalid token lifetimes: access {access}s, refresh {refresh}s")]
    InvalidLifetimes { access: i64, refresh: i64 },
}

impl Authenticator {
    /// Create a new authenticator.
    ///
    /// # Arguments
    /// * `jwt_secret` - Secret key for JWT signing
    /// * `hash_parameters` - Cost parameters for newly hashed passwords
    /// * `lifetimes` - Access and refresh token lifetimes
    ///
    /// # Errors
    /// * `JwtError(WeakKey)` - `jwt_secret` is too short for HS256
    /// * `PasswordError(InvalidParameters)` - `hash_parameters` cannot be used
    /// * `InvalidLifetimes` - Access lifetime under one second, or refresh
    ///   lifetime shorter than access
    pub fn new(
        jwt_secret: &[u8],
        hash_parameters: HashParameters,
        lifetimes: TokenLifetimes,
    ) -> Result<Self, AuthenticationError> {
        let access = lifetimes.access.num_seconds();
        let refresh = lifetimes.refresh.num_seconds();
        if access <= 0 || refresh < access {
            return Err(AuthenticationError::InvalidLifetimes { access, refresh });
        }

        PasswordHasher::validate(&hash_parameters)?;
        let decoy_hash = EncodedHash::new(
            hash_parameters,
            vec![0; hash_parameters.salt_length as usize],
            vec![0; hash_parameters.key_length as usize],
        )?
        .encode();

        Ok(Self {
            password_hasher: PasswordHasher::new(hash_parameters),
            jwt_handler: JwtHandler::new(jwt_secret)?,
            lifetimes,
            decoy_hash,
        })
    }

    pub fn lifetimes(&self) -> TokenLifetimes {
        self.lifetimes
    }

    /// Hash a password for storage.
    ///
    /// # Returns
    /// Encoded hash string
    ///
    /// # Errors
    /// * `RandomSourceUnavailable` - No salt could be drawn; fatal
    /// * `InvalidParameters` - Default parameters are rejected by Argon2
    pub fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        self.password_hasher
            .hash(password.as_bytes())
            .map(|hash| hash.encode())
    }

    /// Check a password against a stored hash.
    ///
    /// # Errors
    /// * `PasswordError` - Stored hash is corrupt
    pub fn verify_password(&self, password: &str, stored_hash: &str) -> Result<bool, PasswordError> {
        self.password_hasher.verify(password.as_bytes(), stored_hash)
    }

    /// Spend the same derivation work as `verify_password` under the default
    /// parameters, for callers that have no stored hash to check against.
    pub fn verify_against_decoy(&self, password: &str) {
        let _ = black_box(
            self.password_hasher
                .verify(password.as_bytes(), &self.decoy_hash),
        );
    }

    /// Verify credentials and generate a token pair.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to verify
    /// * `stored_hash` - Stored password hash
    /// * `subject` - Identifier placed in the token claims
    /// * `now` - Current Unix timestamp
    ///
    /// # Errors
    /// * `InvalidCredentials` - Password does not match
    /// * `PasswordError` - Stored hash is corrupt
    /// * `JwtError` - Token generation failed
    pub fn authenticate(
        &self,
        password: &str,
        stored_hash: &str,
        subject: &str,
        now: i64,
    ) -> Result<TokenPair, AuthenticationError> {
        if !self.verify_password(password, stored_hash)? {
            return Err(AuthenticationError::InvalidCredentials);
        }

        Ok(self.issue_token_pair(subject, now)?)
    }

    /// Generate a token pair without password verification.
    ///
    /// Used by refresh flows once the presented refresh token has been
    /// validated.
    ///
    /// # Errors
    /// * `JwtError` - Token generation failed
    pub fn issue_token_pair(&self, subject: &str, now: i64) -> Result<TokenPair, JwtError> {
        let access_token = self.jwt_handler.issue(subject, now, self.lifetimes.access)?;
        let refresh_token = self.jwt_handler.issue(subject, now, self.lifetimes.refresh)?;

        Ok(TokenPair {
            token_type: "Bearer".to_string(),
            access_token,
            access_token_expires_at: now.saturating_add(self.lifetimes.access.num_seconds()),
            refresh_token,
        })
    }

    /// Validate a token and return its claims.
    ///
    /// # Errors
    /// * `JwtError` - Token is malformed, forged, or expired
    pub fn validate_token(&self, token: &str, now: i64) -> Result<TokenClaims, JwtError> {
        self.jwt_handler.verify(token, now)
    }
}
