use async_trait::async_trait;
use chrono::Utc;

use crate::credential::errors::AuthError;
use crate::credential::models::Authenticated;
use crate::credential::models::CredentialId;
use crate::credential::models::CredentialRecord;
use crate::credential::models::Identifier;
use crate::credential::models::PublicProfile;
use crate::credential::models::RoleName;
use crate::credential::models::SignInCommand;
use crate::credential::models::SignUpCommand;

/// Port for authentication operations consumed by the transport layer.
#[async_trait]
pub trait AuthenticatePort: Send + Sync + 'static {
    /// Verify an identifier and password and mint a token pair.
    ///
    /// # Errors
    /// * `UserNotFound` - No credential with this identifier
    /// * `InvalidPassword` - Password does not match
    /// * `Password` - Stored hash is corrupt
    /// * `DatabaseError` - Store lookup failed
    async fn sign_in(&self, command: SignInCommand) -> Result<Authenticated, AuthError>;

    /// Register a new credential. Does not issue tokens.
    ///
    /// # Returns
    /// ID of the stored credential
    ///
    /// # Errors
    /// * `IdentifierAlreadyExists` - Identifier is taken
    /// * `Password` - Hashing failed; `RandomSourceUnavailable` is fatal
    /// * `DatabaseError` - Store insert failed
    async fn sign_up(&self, command: SignUpCommand) -> Result<CredentialId, AuthError>;

    /// Exchange a valid refresh token for a new token pair.
    ///
    /// # Errors
    /// * `Token` - Refresh token is malformed, forged, or expired
    /// * `UserNotFound` - Subject no longer exists
    /// * `DatabaseError` - Store lookup failed
    async fn refresh(&self, refresh_token: &str) -> Result<Authenticated, AuthError>;

    /// Validate an access token and return its subject.
    ///
    /// # Errors
    /// * `Token` - Access token is malformed, forged, or expired
    /// * `UserNotFound` - Subject is not a credential ID
    async fn authorize(&self, access_token: &str) -> Result<CredentialId, AuthError>;

    /// Load the public profile of a credential.
    ///
    /// # Errors
    /// * `UserNotFound` - Credential does not exist
    /// * `DatabaseError` - Store lookup failed
    async fn get_profile(&self, id: &CredentialId) -> Result<PublicProfile, AuthError>;
}

/// Persistence operations for credentials.
#[async_trait]
pub trait CredentialStore: Send + Sync + 'static {
    /// Persist a new credential.
    ///
    /// # Errors
    /// * `IdentifierAlreadyExists` - Identifier is taken
    /// * `DatabaseError` - Database operation failed
    async fn insert(&self, record: CredentialRecord) -> Result<CredentialId, AuthError>;

    /// Retrieve a credential by sign-in identifier.
    ///
    /// # Returns
    /// Optional record (None if not found)
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_by_identifier(
        &self,
        identifier: &Identifier,
    ) -> Result<Option<CredentialRecord>, AuthError>;

    /// Retrieve a credential by ID.
    ///
    /// # Returns
    /// Optional record (None if not found)
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_by_id(&self, id: &CredentialId) -> Result<Option<CredentialRecord>, AuthError>;
}

/// Role lookup for credentials.
#[async_trait]
pub trait RoleResolver: Send + Sync + 'static {
    /// Resolve the role name of a credential.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn role_for(&self, id: &CredentialId) -> Result<RoleName, AuthError>;
}

/// Source of the current Unix time in seconds.
pub trait Clock: Send + Sync + 'static {
    fn now(&self) -> i64;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> i64 {
        Utc::now().timestamp()
    }
}
