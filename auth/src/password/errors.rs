use thiserror::Error;

/// Error type for password hashing and encoded hash parsing.
///
/// `MalformedHash`, `UnsupportedVersion` and `InvalidEncoding` all mean the
/// stored hash is corrupt. Callers should report them as a failed sign-in and
/// never echo the detail back to the client.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PasswordError {
    #[error("Malformed password hash: {0}")]
    MalformedHash(String),

    #[error("Unsupported argon2 version: {0}")]
    UnsupportedVersion(u32),

    #[error("Invalid base64 in password hash: {0}")]
    InvalidEncoding(String),

    #[error("Secure random source unavailable: {0}")]
    RandomSourceUnavailable(String),

    #[error("Invalid hash parameters: {0}")]
    InvalidParameters(String),
}

impl PasswordError {
    /// Whether the process can no longer issue credentials safely.
    pub fn is_fatal(&self) -> bool {
        matches!(self, PasswordError::RandomSourceUnavailable(_))
    }
}
