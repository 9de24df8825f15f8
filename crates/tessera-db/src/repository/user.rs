//! SurrealDB implementation of [`UserRepository`].

use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tessera_core::error::{TesseraError, TesseraResult};
use tessera_core::models::user::{CreateUser, User};
use tessera_core::repository::UserRepository;

use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct UserRow {
    email: String,
    name: String,
    password_hash: String,
    roles: Vec<String>,
    super_admin: bool,
    enabled: bool,
    deactive: bool,
    password_temporary: bool,
    created_at: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self, key: String) -> User {
        User {
            user_key: key,
            email: self.email,
            name: self.name,
            password_hash: self.password_hash,
            roles: self.roles,
            is_super_admin: self.super_admin,
            is_enabled: self.enabled,
            is_deactive: self.deactive,
            is_password_temporary: self.password_temporary,
            created_at: self.created_at,
        }
    }
}

#[derive(Debug, SurrealValue)]
struct UserRowWithId {
    record_id: String,
    email: String,
    name: String,
    password_hash: String,
    roles: Vec<String>,
    super_admin: bool,
    enabled: bool,
    deactive: bool,
    password_temporary: bool,
    created_at: DateTime<Utc>,
}

impl UserRowWithId {
    fn into_user(self) -> User {
        User {
            user_key: self.record_id,
            email: self.email,
            name: self.name,
            password_hash: self.password_hash,
            roles: self.roles,
            is_super_admin: self.super_admin,
            is_enabled: self.enabled,
            is_deactive: self.deactive,
            is_password_temporary: self.password_temporary,
            created_at: self.created_at,
        }
    }
}

/// SurrealDB implementation of the user repository.
#[derive(Clone)]
pub struct SurrealUserRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealUserRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> UserRepository for SurrealUserRepository<C> {
    async fn create(&self, input: CreateUser) -> TesseraResult<User> {
        if self.find_by_email(&input.email).await?.is_some() {
            return Err(TesseraError::AlreadyExists {
                message: "A user with this email already exists".into(),
            });
        }

        let key = input.user_key.clone();

        let result = self
            .db
            .query(
                "CREATE type::record('user', $key) SET \
                 email = $email, name = $name, \
                 password_hash = $password_hash, roles = [], \
                 super_admin = $super_admin, enabled = true, \
                 deactive = false, \
                 password_temporary = $password_temporary",
            )
            .bind(("key", key.clone()))
            .bind(("email", input.email))
            .bind(("name", input.name))
            .bind(("password_hash", input.password_hash))
            .bind(("super_admin", input.is_super_admin))
            .bind(("password_temporary", input.is_password_temporary))
            .await
            .map_err(DbError::from)?;

        let mut result = result.check().map_err(DbError::from)?;

        let rows: Vec<UserRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "user".into(),
            key: key.clone(),
        })?;

        Ok(row.into_user(key))
    }

    async fn get_by_key(&self, key: &str) -> TesseraResult<User> {
        let key = key.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('user', $key)")
            .bind(("key", key.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<UserRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "user".into(),
            key: key.clone(),
        })?;

        Ok(row.into_user(key))
    }

    async fn find_by_email(&self, email: &str) -> TesseraResult<Option<User>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM user \
                 WHERE email = $email",
            )
            .bind(("email", email.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<UserRowWithId> = result.take(0).map_err(DbError::from)?;

        Ok(rows.into_iter().next().map(UserRowWithId::into_user))
    }

    async fn set_roles(&self, key: &str, roles: Vec<String>) -> TesseraResult<()> {
        let result = self
            .db
            .query("UPDATE type::record('user', $key) SET roles = $roles")
            .bind(("key", key.to_string()))
            .bind(("roles", roles))
            .await
            .map_err(DbError::from)?;

        result.check().map_err(DbError::from)?;

        Ok(())
    }

    async fn set_password(
        &self,
        key: &str,
        password_hash: String,
        temporary: bool,
    ) -> TesseraResult<()> {
        let result = self
            .db
            .query(
                "UPDATE type::record('user', $key) SET \
                 password_hash = $password_hash, \
                 password_temporary = $temporary",
            )
            .bind(("key", key.to_string()))
            .bind(("password_hash", password_hash))
            .bind(("temporary", temporary))
            .await
            .map_err(DbError::from)?;

        result.check().map_err(DbError::from)?;

        Ok(())
    }

    async fn delete(&self, key: &str) -> TesseraResult<()> {
        self.db
            .query("DELETE type::record('user', $key)")
            .bind(("key", key.to_string()))
            .await
            .map_err(DbError::from)?;

        Ok(())
    }
}
