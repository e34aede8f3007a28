use std::fmt;

use auth::TokenPair;
use chrono::DateTime;
use chrono::Utc;
use uuid::Uuid;

use crate::credential::errors::CredentialIdError;
use crate::credential::errors::IdentifierError;
use crate::credential::errors::NameError;

/// Stored credential of one account.
///
/// Owned by the credential store. `password_hash` is the encoded Argon2id
/// string and never leaves the domain layer.
#[derive(Debug, Clone)]
pub struct CredentialRecord {
    pub id: CredentialId,
    pub identifier: Identifier,
    pub first_name: PersonName,
    pub last_name: PersonName,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Credential unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CredentialId(pub Uuid);

impl CredentialId {
    /// Generate a new random credential ID.
    ///
    /// # Returns
    /// CredentialId with random UUID v4
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a credential ID from string.
    ///
    /// # Errors
    /// * `InvalidFormat` - String is not a valid UUID
    pub fn from_string(s: &str) -> Result<Self, CredentialIdError> {
        Uuid::parse_str(s)
            .map(CredentialId)
            .map_err(|e| CredentialIdError::InvalidFormat(e.to_string()))
    }
}

impl Default for CredentialId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CredentialId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Sign-in identifier (phone number, login name).
///
/// Surrounding whitespace is trimmed; the rest must be 3-64 characters with
/// no whitespace or control characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identifier(String);

impl Identifier {
    const MIN_LENGTH: usize = 3;
    const MAX_LENGTH: usize = 64;

    /// Create a new valid identifier.
    ///
    /// # Errors
    /// * `TooShort` - Shorter than 3 characters after trimming
    /// * `TooLong` - Longer than 64 characters
    /// * `InvalidCharacters` - Contains whitespace or control characters
    pub fn new(identifier: String) -> Result<Self, IdentifierError> {
        let identifier = identifier.trim();
        let length = identifier.chars().count();

        if length < Self::MIN_LENGTH {
            return Err(IdentifierError::TooShort {
                min: Self::MIN_LENGTH,
                actual: length,
            });
        }
        if length > Self::MAX_LENGTH {
            return Err(IdentifierError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            });
        }
        if identifier
            .chars()
            .any(|c| c.is_whitespace() || c.is_control())
        {
            return Err(IdentifierError::InvalidCharacters);
        }

        Ok(Self(identifier.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// First or last name shown in the public profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonName(String);

impl PersonName {
    const MAX_LENGTH: usize = 64;

    /// Create a new valid name.
    ///
    /// # Errors
    /// * `Empty` - Nothing left after trimming
    /// * `TooLong` - Longer than 64 characters
    pub fn new(name: String) -> Result<Self, NameError> {
        let name = name.trim();
        let length = name.chars().count();

        if length == 0 {
            return Err(NameError::Empty);
        }
        if length > Self::MAX_LENGTH {
            return Err(NameError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            });
        }

        Ok(Self(name.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Role name handed back by the role resolver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleName(String);

impl RoleName {
    /// Role of accounts without an explicit assignment.
    pub const DEFAULT: &'static str = "user";

    pub fn new(role: impl Into<String>) -> Self {
        Self(role.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for RoleName {
    fn default() -> Self {
        Self::new(Self::DEFAULT)
    }
}

impl fmt::Display for RoleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Account data safe to return to the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicProfile {
    pub id: CredentialId,
    pub identifier: Identifier,
    pub first_name: PersonName,
    pub last_name: PersonName,
    pub role: RoleName,
}

/// Result of a successful sign-in or refresh.
#[derive(Debug, Clone)]
pub struct Authenticated {
    pub profile: PublicProfile,
    pub tokens: TokenPair,
}

/// Command to register a new credential
#[derive(Debug)]
pub struct SignUpCommand {
    pub identifier: Identifier,
    pub first_name: PersonName,
    pub last_name: PersonName,
    pub password: String,
}

impl SignUpCommand {
    /// Construct a new sign-up command.
    ///
    /// # Arguments
    /// * `password` - Plain text password (will be hashed by service)
    pub fn new(
        identifier: Identifier,
        first_name: PersonName,
        last_name: PersonName,
        password: String,
    ) -> Self {
        Self {
            identifier,
            first_name,
            last_name,
            password,
        }
    }
}

/// Command to sign in with an identifier and password
#[derive(Debug)]
pub struct SignInCommand {
    pub identifier: Identifier,
    pub password: String,
}
