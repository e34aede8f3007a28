use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::credential::errors::AuthError;
use crate::credential::models::CredentialId;
use crate::credential::models::CredentialRecord;
use crate::credential::models::Identifier;
use crate::credential::models::RoleName;
use crate::credential::ports::CredentialStore;
use crate::credential::ports::RoleResolver;

/// Process-local credential store for development and tests.
#[derive(Default)]
pub struct InMemoryCredentialStore {
    records: RwLock<HashMap<CredentialId, CredentialRecord>>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop a credential, as an account deletion would.
    pub async fn remove(&self, id: &CredentialId) -> Option<CredentialRecord> {
        self.records.write().await.remove(id)
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn insert(&self, record: CredentialRecord) -> Result<CredentialId, AuthError> {
        let mut records = self.records.write().await;

        if records
            .values()
            .any(|existing| existing.identifier == record.identifier)
        {
            return Err(AuthError::IdentifierAlreadyExists(
                record.identifier.as_str().to_string(),
            ));
        }

        let id = record.id;
        records.insert(id, record);
        Ok(id)
    }

    async fn find_by_identifier(
        &self,
        identifier: &Identifier,
    ) -> Result<Option<CredentialRecord>, AuthError> {
        Ok(self
            .records
            .read()
            .await
            .values()
            .find(|record| &record.identifier == identifier)
            .cloned())
    }

    async fn find_by_id(&self, id: &CredentialId) -> Result<Option<CredentialRecord>, AuthError> {
        Ok(self.records.read().await.get(id).cloned())
    }
}

/// Process-local role assignments; unassigned credentials get `RoleName::DEFAULT`.
#[derive(Default)]
pub struct InMemoryRoleResolver {
    roles: RwLock<HashMap<CredentialId, RoleName>>,
}

impl InMemoryRoleResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn assign(&self, id: CredentialId, role: RoleName) {
        self.roles.write().await.insert(id, role);
    }
}

#[async_trait]
impl RoleResolver for InMemoryRoleResolver {
    async fn role_for(&self, id: &CredentialId) -> Result<RoleName, AuthError> {
        Ok(self
            .roles
            .read()
            .await
            .get(id)
            .cloned()
            .unwrap_or_default())
    }
}
