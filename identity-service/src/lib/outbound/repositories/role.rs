use async_trait::async_trait;
use sqlx::PgPool;

use crate::credential::errors::AuthError;
use crate::credential::models::CredentialId;
use crate::credential::models::RoleName;
use crate::credential::ports::RoleResolver;

/// Resolves roles from the `credential_roles` table.
///
/// Credentials without a row get `RoleName::DEFAULT`.
pub struct PostgresRoleResolver {
    pool: PgPool,
}

impl PostgresRoleResolver {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RoleResolver for PostgresRoleResolver {
    async fn role_for(&self, id: &CredentialId) -> Result<RoleName, AuthError> {
        let role: Option<String> = sqlx::query_scalar(
            r#"
            SELECT role
            FROM credential_roles
            WHERE credential_id = $1
            "#,
        )
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AuthError::DatabaseError(e.to_string()))?;

        Ok(role.map(RoleName::new).unwrap_or_default())
    }
}
