use std::sync::Arc;

use async_trait::async_trait;
use auth::AuthenticationError;
use auth::Authenticator;
use chrono::Utc;

use crate::credential::errors::AuthError;
use crate::credential::models::Authenticated;
use crate::credential::models::CredentialId;
use crate::credential::models::CredentialRecord;
use crate::credential::models::PublicProfile;
use crate::credential::models::SignInCommand;
use crate::credential::models::SignUpCommand;
use crate::credential::ports::AuthenticatePort;
use crate::credential::ports::Clock;
use crate::credential::ports::CredentialStore;
use crate::credential::ports::RoleResolver;
use crate::credential::ports::SystemClock;

/// Domain service implementation for authentication.
///
/// Composes the credential store and role resolver with the password hasher
/// and token signer held by `Authenticator`. Tokens are stateless: nothing is
/// recorded when they are issued, so a refresh token stays usable until it
/// expires.
pub struct AuthenticationService<CS, RR, C = SystemClock>
where
    CS: CredentialStore,
    RR: RoleResolver,
    C: Clock,
{
    store: Arc<CS>,
    roles: Arc<RR>,
    authenticator: Arc<Authenticator>,
    clock: C,
}

impl<CS, RR> AuthenticationService<CS, RR, SystemClock>
where
    CS: CredentialStore,
    RR: RoleResolver,
{
    /// Create a new authentication service with injected dependencies.
    ///
    /// # Arguments
    /// * `store` - Credential persistence implementation
    /// * `roles` - Role lookup implementation
    /// * `authenticator` - Password hasher and token signer
    pub fn new(store: Arc<CS>, roles: Arc<RR>, authenticator: Arc<Authenticator>) -> Self {
        Self::with_clock(store, roles, authenticator, SystemClock)
    }
}

impl<CS, RR, C> AuthenticationService<CS, RR, C>
where
    CS: CredentialStore,
    RR: RoleResolver,
    C: Clock,
{
    pub fn with_clock(
        store: Arc<CS>,
        roles: Arc<RR>,
        authenticator: Arc<Authenticator>,
        clock: C,
    ) -> Self {
        Self {
            store,
            roles,
            authenticator,
            clock,
        }
    }

    async fn profile_for(&self, record: CredentialRecord) -> Result<PublicProfile, AuthError> {
        let role = self.roles.role_for(&record.id).await?;

        Ok(PublicProfile {
            id: record.id,
            identifier: record.identifier,
            first_name: record.first_name,
            last_name: record.last_name,
            role,
        })
    }

    async fn authenticated(&self, record: CredentialRecord) -> Result<Authenticated, AuthError> {
        let tokens = self
            .authenticator
            .issue_token_pair(&record.id.to_string(), self.clock.now())?;
        let profile = self.profile_for(record).await?;

        Ok(Authenticated { profile, tokens })
    }
}

#[async_trait]
impl<CS, RR, C> AuthenticatePort for AuthenticationService<CS, RR, C>
where
    CS: CredentialStore,
    RR: RoleResolver,
    C: Clock,
{
    async fn sign_in(&self, command: SignInCommand) -> Result<Authenticated, AuthError> {
        let Some(record) = self.store.find_by_identifier(&command.identifier).await? else {
            // Unknown identifiers must cost as much as a wrong password
            self.authenticator.verify_against_decoy(&command.password);
            tracing::warn!("Sign-in rejected: unknown identifier");
            return Err(AuthError::UserNotFound);
        };

        let tokens = self
            .authenticator
            .authenticate(
                &command.password,
                &record.password_hash,
                &record.id.to_string(),
                self.clock.now(),
            )
            .inspect_err(|e| match e {
                AuthenticationError::InvalidCredentials => {
                    tracing::warn!(credential_id = %record.id, "Sign-in rejected: password mismatch");
                }
                AuthenticationError::PasswordError(err) => {
                    tracing::error!(credential_id = %record.id, error = %err, "Stored password hash is corrupt");
                }
                _ => {}
            })?;

        tracing::info!(credential_id = %record.id, "Sign-in succeeded");
        let profile = self.profile_for(record).await?;

        Ok(Authenticated { profile, tokens })
    }

    async fn sign_up(&self, command: SignUpCommand) -> Result<CredentialId, AuthError> {
        let password_hash = self.authenticator.hash_password(&command.password)?;

        let record = CredentialRecord {
            id: CredentialId::new(),
            identifier: command.identifier,
            first_name: command.first_name,
            last_name: command.last_name,
            password_hash,
            created_at: Utc::now(),
        };

        let id = self.store.insert(record).await?;
        tracing::info!(credential_id = %id, "Credential registered");

        Ok(id)
    }

    async fn refresh(&self, refresh_token: &str) -> Result<Authenticated, AuthError> {
        let claims = self
            .authenticator
            .validate_token(refresh_token, self.clock.now())
            .inspect_err(|e| tracing::warn!(error = %e, "Refresh token rejected"))?;

        let id = CredentialId::from_string(&claims.subject).map_err(|_| AuthError::UserNotFound)?;
        let record = self
            .store
            .find_by_id(&id)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        tracing::info!(credential_id = %record.id, "Token pair refreshed");
        self.authenticated(record).await
    }

    async fn authorize(&self, access_token: &str) -> Result<CredentialId, AuthError> {
        let claims = self
            .authenticator
            .validate_token(access_token, self.clock.now())?;

        CredentialId::from_string(&claims.subject).map_err(|_| AuthError::UserNotFound)
    }

    async fn get_profile(&self, id: &CredentialId) -> Result<PublicProfile, AuthError> {
        let record = self
            .store
            .find_by_id(id)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        self.profile_for(record).await
    }
}
