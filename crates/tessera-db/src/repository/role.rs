//! SurrealDB implementations of [`RoleRepository`] and
//! [`CompanyRoleRepository`].

use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tessera_core::error::{TesseraError, TesseraResult};
use tessera_core::models::role::{
    CompanyRoleMapper, CreateCompanyRoleMapper, CreateRole, Role,
};
use tessera_core::repository::{CompanyRoleRepository, RoleRepository};

use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct RoleRow {
    name: String,
    role: String,
    company_role: bool,
    description: Option<String>,
}

impl RoleRow {
    fn into_role(self, key: String) -> Role {
        Role {
            role_key: key,
            name: self.name,
            role: self.role,
            company_role: self.company_role,
            description: self.description,
        }
    }
}

#[derive(Debug, SurrealValue)]
struct RoleRowWithId {
    record_id: String,
    name: String,
    role: String,
    company_role: bool,
    description: Option<String>,
}

impl RoleRowWithId {
    fn into_role(self) -> Role {
        Role {
            role_key: self.record_id,
            name: self.name,
            role: self.role,
            company_role: self.company_role,
            description: self.description,
        }
    }
}

#[derive(Debug, SurrealValue)]
struct CompanyRoleRow {
    company_key: String,
    role_key: String,
    archived: bool,
}

impl CompanyRoleRow {
    fn into_mapper(self, key: String) -> CompanyRoleMapper {
        CompanyRoleMapper {
            company_role_key: key,
            company_key: self.company_key,
            role_key: self.role_key,
            archived: self.archived,
        }
    }
}

#[derive(Debug, SurrealValue)]
struct CompanyRoleRowWithId {
    record_id: String,
    company_key: String,
    role_key: String,
    archived: bool,
}

impl CompanyRoleRowWithId {
    fn into_mapper(self) -> CompanyRoleMapper {
        CompanyRoleMapper {
            company_role_key: self.record_id,
            company_key: self.company_key,
            role_key: self.role_key,
            archived: self.archived,
        }
    }
}

#[derive(Debug, SurrealValue)]
struct CountRow {
    total: u64,
}

#[derive(Debug, SurrealValue)]
struct KeyRow {
    record_id: String,
}

/// SurrealDB implementation of the role catalog repository.
#[derive(Clone)]
pub struct SurrealRoleRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealRoleRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> RoleRepository for SurrealRoleRepository<C> {
    async fn create(&self, input: CreateRole) -> TesseraResult<Role> {
        if self.find_by_discriminator(&input.role).await?.is_some() {
            return Err(TesseraError::AlreadyExists {
                message: "This name is already used".into(),
            });
        }

        let key = input.role_key.clone();

        let result = self
            .db
            .query(
                "CREATE type::record('role', $key) SET \
                 name = $name, role = $role, \
                 company_role = $company_role, \
                 description = $description",
            )
            .bind(("key", key.clone()))
            .bind(("name", input.name))
            .bind(("role", input.role))
            .bind(("company_role", input.company_role))
            .bind(("description", input.description))
            .await
            .map_err(DbError::from)?;

        let mut result = result.check().map_err(DbError::from)?;

        let rows: Vec<RoleRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "role".into(),
            key: key.clone(),
        })?;

        Ok(row.into_role(key))
    }

    async fn get_by_key(&self, key: &str) -> TesseraResult<Role> {
        let key = key.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('role', $key)")
            .bind(("key", key.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<RoleRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "role".into(),
            key: key.clone(),
        })?;

        Ok(row.into_role(key))
    }

    async fn find_by_discriminator(&self, role: &str) -> TesseraResult<Option<Role>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM role \
                 WHERE role = $role",
            )
            .bind(("role", role.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<RoleRowWithId> = result.take(0).map_err(DbError::from)?;

        Ok(rows.into_iter().next().map(RoleRowWithId::into_role))
    }

    async fn list(&self) -> TesseraResult<Vec<Role>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM role \
                 ORDER BY name ASC",
            )
            .await
            .map_err(DbError::from)?;

        let rows: Vec<RoleRowWithId> = result.take(0).map_err(DbError::from)?;

        Ok(rows.into_iter().map(RoleRowWithId::into_role).collect())
    }

    async fn delete(&self, key: &str) -> TesseraResult<()> {
        let key = key.to_string();

        // The role is referenced by memberships only indirectly,
        // through company-role grants. Collect the grant keys first,
        // then count memberships pointing at any of them.
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id \
                 FROM company_role_mapper WHERE role_key = $key",
            )
            .bind(("key", key.clone()))
            .await
            .map_err(DbError::from)?;
        let grant_rows: Vec<KeyRow> = result.take(0).map_err(DbError::from)?;
        let grant_keys: Vec<String> = grant_rows.into_iter().map(|r| r.record_id).collect();

        if !grant_keys.is_empty() {
            let mut result = self
                .db
                .query(
                    "SELECT count() AS total FROM user_company_role \
                     WHERE company_role_key IN $grant_keys GROUP ALL",
                )
                .bind(("grant_keys", grant_keys))
                .await
                .map_err(DbError::from)?;
            let rows: Vec<CountRow> = result.take(0).map_err(DbError::from)?;
            if rows.first().map(|r| r.total).unwrap_or(0) > 0 {
                return Err(TesseraError::InvariantViolation {
                    message: "Cannot delete role that is assigned to users".into(),
                });
            }
        }

        let result = self
            .db
            .query(
                "BEGIN TRANSACTION; \
                 DELETE company_role_mapper WHERE role_key = $key; \
                 DELETE type::record('role', $key); \
                 COMMIT TRANSACTION;",
            )
            .bind(("key", key))
            .await
            .map_err(DbError::from)?;

        result.check().map_err(DbError::from)?;

        Ok(())
    }
}

/// SurrealDB implementation of the company-role grant repository.
#[derive(Clone)]
pub struct SurrealCompanyRoleRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealCompanyRoleRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> CompanyRoleRepository for SurrealCompanyRoleRepository<C> {
    async fn create(&self, input: CreateCompanyRoleMapper) -> TesseraResult<CompanyRoleMapper> {
        let key = input.company_role_key.clone();

        let result = self
            .db
            .query(
                "CREATE type::record('company_role_mapper', $key) SET \
                 company_key = $company_key, role_key = $role_key, \
                 archived = false",
            )
            .bind(("key", key.clone()))
            .bind(("company_key", input.company_key))
            .bind(("role_key", input.role_key))
            .await
            .map_err(DbError::from)?;

        let mut result = result.check().map_err(DbError::from)?;

        let rows: Vec<CompanyRoleRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "company_role_mapper".into(),
            key: key.clone(),
        })?;

        Ok(row.into_mapper(key))
    }

    async fn get_by_key(&self, key: &str) -> TesseraResult<CompanyRoleMapper> {
        let key = key.to_string();

        let mut result = self
            .db
            .query(
                "SELECT * FROM type::record('company_role_mapper', $key) \
                 WHERE archived = false",
            )
            .bind(("key", key.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<CompanyRoleRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "company_role_mapper".into(),
            key: key.clone(),
        })?;

        Ok(row.into_mapper(key))
    }

    async fn list_by_company(&self, company_key: &str) -> TesseraResult<Vec<CompanyRoleMapper>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * \
                 FROM company_role_mapper \
                 WHERE company_key = $company_key \
                 AND archived = false",
            )
            .bind(("company_key", company_key.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<CompanyRoleRowWithId> = result.take(0).map_err(DbError::from)?;

        Ok(rows
            .into_iter()
            .map(CompanyRoleRowWithId::into_mapper)
            .collect())
    }

    async fn archive(&self, key: &str) -> TesseraResult<()> {
        let result = self
            .db
            .query(
                "UPDATE type::record('company_role_mapper', $key) SET \
                 archived = true",
            )
            .bind(("key", key.to_string()))
            .await
            .map_err(DbError::from)?;

        result.check().map_err(DbError::from)?;

        Ok(())
    }
}
