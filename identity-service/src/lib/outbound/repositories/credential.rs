use anyhow::Context;
use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::FromRow;
use sqlx::PgPool;
use uuid::Uuid;

use crate::credential::errors::AuthError;
use crate::credential::models::CredentialId;
use crate::credential::models::CredentialRecord;
use crate::credential::models::Identifier;
use crate::credential::models::PersonName;
use crate::credential::ports::CredentialStore;

const IDENTIFIER_CONSTRAINT: &str = "credentials_identifier_key";

/// PostgreSQL credential store. All caller input is bound, never interpolated.
pub struct PostgresCredentialStore {
    pool: PgPool,
}

impl PostgresCredentialStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct CredentialRow {
    id: Uuid,
    identifier: String,
    first_name: String,
    last_name: String,
    password_hash: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<CredentialRow> for CredentialRecord {
    type Error = AuthError;

    // A stored row that no longer validates is corruption, not bad input
    fn try_from(row: CredentialRow) -> Result<Self, Self::Error> {
        let id = row.id;
        Ok(CredentialRecord {
            id: CredentialId(id),
            identifier: Identifier::new(row.identifier)
                .with_context(|| format!("Stored identifier of credential {} is invalid", id))?,
            first_name: PersonName::new(row.first_name)
                .with_context(|| format!("Stored first name of credential {} is invalid", id))?,
            last_name: PersonName::new(row.last_name)
                .with_context(|| format!("Stored last name of credential {} is invalid", id))?,
            password_hash: row.password_hash,
            created_at: row.created_at,
        })
    }
}

#[async_trait]
impl CredentialStore for PostgresCredentialStore {
    async fn insert(&self, record: CredentialRecord) -> Result<CredentialId, AuthError> {
        sqlx::query(
            r#"
            INSERT INTO credentials (id, identifier, first_name, last_name, password_hash, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(record.id.0)
        .bind(record.identifier.as_str())
        .bind(record.first_name.as_str())
        .bind(record.last_name.as_str())
        .bind(&record.password_hash)
        .bind(record.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() && db_err.constraint() == Some(IDENTIFIER_CONSTRAINT)
                {
                    return AuthError::IdentifierAlreadyExists(
                        record.identifier.as_str().to_string(),
                    );
                }
            }
            AuthError::DatabaseError(e.to_string())
        })?;

        Ok(record.id)
    }

    async fn find_by_identifier(
        &self,
        identifier: &Identifier,
    ) -> Result<Option<CredentialRecord>, AuthError> {
        let row = sqlx::query_as::<_, CredentialRow>(
            r#"
            SELECT id, identifier, first_name, last_name, password_hash, created_at
            FROM credentials
            WHERE identifier = $1
            "#,
        )
        .bind(identifier.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AuthError::DatabaseError(e.to_string()))?;

        row.map(CredentialRecord::try_from).transpose()
    }

    async fn find_by_id(&self, id: &CredentialId) -> Result<Option<CredentialRecord>, AuthError> {
        let row = sqlx::query_as::<_, CredentialRow>(
            r#"
            SELECT id, identifier, first_name, last_name, password_hash, created_at
            FROM credentials
            WHERE id = $1
            "#,
        )
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AuthError::DatabaseError(e.to_string()))?;

        row.map(CredentialRecord::try_from).transpose()
    }
}
