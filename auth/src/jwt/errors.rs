use thiserror::Error;

/// Error type for JWT operations.
///
/// Every verification failure should reach the client as a plain
/// "unauthorized"; the variants exist for logging and tests.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JwtError {
    #[error("Failed to encode token: {0}")]
    EncodingFailed(String),

    #[error("Malformed token: {0}")]
    MalformedToken(String),

    #[error("Token signature is invalid")]
    InvalidSignature,

    #[error("Unsupported token algorithm: {0}")]
    UnsupportedAlgorithm(String),

    #[error("Token is expired")]
    TokenExpired,

    #[error("Token lifetime must be positive, got {0}s")]
    InvalidTtl(i64),

    #[error("Signing key too short: minimum {min} bytes, got {actual}")]
    WeakKey { min: usize, actual: usize },

    #[error("Secure random source unavailable: {0}")]
    RandomSourceUnavailable(String),
}

impl JwtError {
    /// Whether the process can no longer issue credentials safely.
    pub fn is_fatal(&self) -> bool {
        matches!(self, JwtError::RandomSourceUnavailable(_))
    }

    /// Whether the failure lies with the issuing side rather than the
    /// presented token.
    pub fn is_server_side(&self) -> bool {
        matches!(
            self,
            JwtError::EncodingFailed(_)
                | JwtError::InvalidTtl(_)
                | JwtError::WeakKey { .. }
                | JwtError::RandomSourceUnavailable(_)
        )
    }
}
