use auth::AuthenticationError;
use auth::JwtError;
use auth::PasswordError;
use thiserror::Error;

/// Error for CredentialId parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CredentialIdError {
    #[error("Invalid UUID format: {0}")]
    InvalidFormat(String),
}

/// Error for Identifier validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IdentifierError {
    #[error("Identifier too short: minimum {min} characters, got {actual}")]
    TooShort { min: usize, actual: usize },

    #[error("Identifier too long: maximum {max} characters, got {actual}")]
    TooLong { max: usize, actual: usize },

    #[error("Identifier must not contain whitespace or control characters")]
    InvalidCharacters,
}

/// Error for PersonName validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum NameError {
    #[error("Name must not be empty")]
    Empty,

    #[error("Name too long: maximum {max} characters, got {actual}")]
    TooLong { max: usize, actual: usize },
}

/// Top-level error for authentication operations.
///
/// `UserNotFound` and `InvalidPassword` are distinct here for logging, but the
/// transport layer must answer both with the same response.
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    // Value object validation errors (automatically converted via #[from])
    #[error("Invalid credential ID: {0}")]
    InvalidCredentialId(#[from] CredentialIdError),

    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(#[from] IdentifierError),

    #[error("Invalid name: {0}")]
    InvalidName(#[from] NameError),

    // Credential primitives
    #[error("Password error: {0}")]
    Password(#[from] PasswordError),

    #[error("Token error: {0}")]
    Token(#[from] JwtError),

    // Domain-level errors
    #[error("User not found")]
    UserNotFound,

    #[error("Invalid password")]
    InvalidPassword,

    #[error("Identifier already exists: {0}")]
    IdentifierAlreadyExists(String),

    // Infrastructure errors
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl AuthError {
    /// Whether the process can no longer issue credentials safely.
    pub fn is_fatal(&self) -> bool {
        match self {
            AuthError::Password(err) => err.is_fatal(),
            AuthError::Token(err) => err.is_fatal(),
            _ => false,
        }
    }
}

impl From<AuthenticationError> for AuthError {
    fn from(err: AuthenticationError) -> Self {
        match err {
            AuthenticationError::InvalidCredentials => AuthError::InvalidPassword,
            AuthenticationError::PasswordError(e) => AuthError::Password(e),
            AuthenticationError::JwtError(e) => AuthError::Token(e),
            AuthenticationError::InvalidLifetimes { .. } => AuthError::Unknown(err.to_string()),
        }
    }
}

impl From<anyhow::Error> for AuthError {
    fn from(err: anyhow::Error) -> Self {
        AuthError::Unknown(err.to_string())
    }
}
