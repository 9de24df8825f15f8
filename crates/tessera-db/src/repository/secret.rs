//! SurrealDB implementation of [`SecretLinkRepository`].
//!
//! The secret token itself is the record ID, so lookups are direct
//! record fetches. Expiry is a policy concern and lives above this
//! layer; the repository only stores, finds, and deletes.

use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tessera_core::error::TesseraResult;
use tessera_core::models::secret::{CreateSecretLink, SecretLink};
use tessera_core::repository::SecretLinkRepository;

use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct SecretRow {
    path: String,
    module_mapper_key: Option<String>,
    user_key: Option<String>,
    email: Option<String>,
    cursor: Option<String>,
    complete_list_size: Option<String>,
    created_at: DateTime<Utc>,
}

impl SecretRow {
    fn into_secret(self, secret_key: String) -> SecretLink {
        SecretLink {
            secret_key,
            path: self.path,
            module_mapper_key: self.module_mapper_key,
            user_key: self.user_key,
            email: self.email,
            cursor: self.cursor,
            complete_list_size: self.complete_list_size,
            created_at: self.created_at,
        }
    }
}

/// SurrealDB implementation of the secret-link repository.
#[derive(Clone)]
pub struct SurrealSecretLinkRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealSecretLinkRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> SecretLinkRepository for SurrealSecretLinkRepository<C> {
    async fn create(&self, input: CreateSecretLink) -> TesseraResult<SecretLink> {
        let key = input.secret_key.clone();

        let result = self
            .db
            .query(
                "CREATE type::record('password_secrecy', $key) SET \
                 path = $path, module_mapper_key = $module_mapper_key, \
                 user_key = $user_key, email = $email, \
                 cursor = $cursor, \
                 complete_list_size = $complete_list_size",
            )
            .bind(("key", key.clone()))
            .bind(("path", input.path))
            .bind(("module_mapper_key", input.module_mapper_key))
            .bind(("user_key", input.user_key))
            .bind(("email", input.email))
            .bind(("cursor", input.cursor))
            .bind(("complete_list_size", input.complete_list_size))
            .await
            .map_err(DbError::from)?;

        let mut result = result.check().map_err(DbError::from)?;

        let rows: Vec<SecretRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "password_secrecy".into(),
            key: key.clone(),
        })?;

        Ok(row.into_secret(key))
    }

    async fn find_by_key(&self, secret_key: &str) -> TesseraResult<Option<SecretLink>> {
        let key = secret_key.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('password_secrecy', $key)")
            .bind(("key", key.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<SecretRow> = result.take(0).map_err(DbError::from)?;

        Ok(rows.into_iter().next().map(|row| row.into_secret(key)))
    }

    async fn delete_by_key(&self, secret_key: &str) -> TesseraResult<()> {
        self.db
            .query("DELETE type::record('password_secrecy', $key)")
            .bind(("key", secret_key.to_string()))
            .await
            .map_err(DbError::from)?;

        Ok(())
    }
}
