use std::fmt;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::Duration;
use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;
use serde::Deserialize;

use super::claims::TokenClaims;
use super::errors::JwtError;

/// Shortest HMAC-SHA256 key accepted, in bytes.
pub const MIN_KEY_LENGTH: usize = 32;

const ALGORITHM_NAME: &str = "HS256";

/// JWT token handler for issuing and verifying tokens.
///
/// Uses HS256 (HMAC with SHA-256) only; tokens declaring any other algorithm
/// are rejected before their signature is looked at. The key never leaves
/// this type.
pub struct JwtHandler {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

#[derive(Deserialize)]
struct RawHeader {
    alg: String,
}

impl JwtHandler {
    /// Create a new JWT handler with a secret key.
    ///
    /// # Arguments
    /// * `secret` - Secret key for signing tokens, at least 32 bytes
    ///
    /// # Errors
    /// * `WeakKey` - Secret is shorter than `MIN_KEY_LENGTH`
    pub fn new(secret: &[u8]) -> Result<Self, JwtError> {
        if secret.len() < MIN_KEY_LENGTH {
            return Err(JwtError::WeakKey {
                min: MIN_KEY_LENGTH,
                actual: secret.len(),
            });
        }

        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked against the caller's clock in `verify`
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.leeway = 0;
        validation.required_spec_claims.clear();

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
        })
    }

    /// Issue a signed token for `subject`, valid from `now` for `ttl`.
    ///
    /// # Errors
    /// * `InvalidTtl` - `ttl` is zero or negative
    /// * `RandomSourceUnavailable` - No token ID could be drawn; fatal
    /// * `EncodingFailed` - Token encoding failed
    pub fn issue(&self, subject: &str, now: i64, ttl: Duration) -> Result<String, JwtError> {
        let ttl_seconds = ttl.num_seconds();
        if ttl_seconds <= 0 {
            return Err(JwtError::InvalidTtl(ttl_seconds));
        }

        self.encode(&TokenClaims::new(subject, now, ttl_seconds)?)
    }

    /// Sign already-built claims.
    ///
    /// # Errors
    /// * `EncodingFailed` - Token encoding failed
    pub fn encode(&self, claims: &TokenClaims) -> Result<String, JwtError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(|e| JwtError::EncodingFailed(e.to_string()))
    }

    /// Verify a token and return its claims.
    ///
    /// # Errors
    /// * `MalformedToken` - Not three segments, or undecodable header or payload
    /// * `UnsupportedAlgorithm` - Header declares anything but HS256
    /// * `InvalidSignature` - Signature does not match
    /// * `TokenExpired` - `now` is past the expiry
    pub fn verify(&self, token: &str, now: i64) -> Result<TokenClaims, JwtError> {
        let segments: Vec<&str> = token.split('.').collect();
        if segments.len() != 3 {
            return Err(JwtError::MalformedToken(format!(
                "expected 3 segments, got {}",
                segments.len()
            )));
        }

        check_algorithm(segments[0])?;

        let token_data = decode::<TokenClaims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature => JwtError::InvalidSignature,
                ErrorKind::InvalidAlgorithm => JwtError::UnsupportedAlgorithm(e.to_string()),
                ErrorKind::ExpiredSignature => JwtError::TokenExpired,
                _ => JwtError::MalformedToken(e.to_string()),
            })?;

        if token_data.claims.is_expired(now) {
            return Err(JwtError::TokenExpired);
        }

        Ok(token_data.claims)
    }
}

impl fmt::Debug for JwtHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtHandler")
            .field("algorithm", &ALGORITHM_NAME)
            .finish_non_exhaustive()
    }
}

fn check_algorithm(header_segment: &str) -> Result<(), JwtError> {
    let bytes = URL_SAFE_NO_PAD
        .decode(header_segment)
        .map_err(|e| JwtError::MalformedToken(format!("header: {}", e)))?;
    let header: RawHeader = serde_json::from_slice(&bytes)
        .map_err(|e| JwtError::MalformedToken(format!("header: {}", e)))?;

    if header.alg != ALGORITHM_NAME {
        return Err(JwtError::UnsupportedAlgorithm(header.alg));
    }

    Ok(())
}
