//! SurrealDB implementation of [`MembershipRepository`].
//!
//! Membership mutations touch several tables at once (the membership
//! row, its module grants, and the user's cached role set); each
//! public operation runs as a single SurrealDB transaction.

use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tessera_core::error::TesseraResult;
use tessera_core::models::membership::{
    CreateMembership, Membership, ModuleGrant, PostDeleteAction, ReplaceMembershipRole,
};
use tessera_core::repository::MembershipRepository;

use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct MembershipRowWithId {
    record_id: String,
    user_key: String,
    company_key: String,
    company_role_key: String,
    active: bool,
    created_at: DateTime<Utc>,
}

impl MembershipRowWithId {
    fn into_membership(self) -> Membership {
        Membership {
            user_company_role_key: self.record_id,
            user_key: self.user_key,
            company_key: self.company_key,
            company_role_key: self.company_role_key,
            active: self.active,
            created_at: self.created_at,
        }
    }
}

#[derive(Debug, SurrealValue)]
struct GrantRowWithId {
    record_id: String,
    user_key: String,
    company_key: String,
    module_mapper_key: String,
    active: bool,
    created_at: DateTime<Utc>,
}

impl GrantRowWithId {
    fn into_grant(self) -> ModuleGrant {
        ModuleGrant {
            user_company_module_key: self.record_id,
            user_key: self.user_key,
            company_key: self.company_key,
            module_mapper_key: self.module_mapper_key,
            active: self.active,
            created_at: self.created_at,
        }
    }
}

/// SurrealDB implementation of the membership repository.
#[derive(Clone)]
pub struct SurrealMembershipRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealMembershipRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> MembershipRepository for SurrealMembershipRepository<C> {
    async fn create(&self, input: CreateMembership) -> TesseraResult<Membership> {
        let mut statements = vec![
            "CREATE type::record('user_company_role', $membership_key) SET \
             user_key = $user_key, company_key = $company_key, \
             company_role_key = $company_role_key, active = $active"
                .to_string(),
        ];

        // Grant rows are written active regardless of the membership
        // flag; visibility is gated by the membership itself.
        for i in 0..input.grants.len() {
            statements.push(format!(
                "CREATE type::record('user_company_module', $grant_key_{i}) SET \
                 user_key = $user_key, company_key = $company_key, \
                 module_mapper_key = $grant_mapper_{i}, active = true"
            ));
        }

        if input.roles_update.is_some() {
            statements.push(
                "UPDATE type::record('user', $user_key) SET roles = $roles".to_string(),
            );
        }

        let query = format!("BEGIN TRANSACTION; {}; COMMIT TRANSACTION;", statements.join("; "));

        let mut builder = self
            .db
            .query(&query)
            .bind(("membership_key", input.user_company_role_key.clone()))
            .bind(("user_key", input.user_key.clone()))
            .bind(("company_key", input.company_key.clone()))
            .bind(("company_role_key", input.company_role_key))
            .bind(("active", input.active));

        for (i, grant) in input.grants.into_iter().enumerate() {
            builder = builder
                .bind((format!("grant_key_{i}"), grant.user_company_module_key))
                .bind((format!("grant_mapper_{i}"), grant.module_mapper_key));
        }

        if let Some(roles) = input.roles_update {
            builder = builder.bind(("roles", roles));
        }

        let result = builder.await.map_err(DbError::from)?;
        result.check().map_err(DbError::from)?;

        // Positional take() is unreliable on transactional responses;
        // read the committed row back instead.
        let membership = self
            .find_by_company_and_user(&input.company_key, &input.user_key)
            .await?
            .ok_or_else(|| DbError::NotFound {
                entity: "user_company_role".into(),
                key: input.user_company_role_key,
            })?;

        Ok(membership)
    }

    async fn find_by_company_and_user(
        &self,
        company_key: &str,
        user_key: &str,
    ) -> TesseraResult<Option<Membership>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * \
                 FROM user_company_role \
                 WHERE company_key = $company_key \
                 AND user_key = $user_key",
            )
            .bind(("company_key", company_key.to_string()))
            .bind(("user_key", user_key.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<MembershipRowWithId> = result.take(0).map_err(DbError::from)?;

        Ok(rows
            .into_iter()
            .next()
            .map(MembershipRowWithId::into_membership))
    }

    async fn find_active_by_user(&self, user_key: &str) -> TesseraResult<Option<Membership>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * \
                 FROM user_company_role \
                 WHERE user_key = $user_key AND active = true",
            )
            .bind(("user_key", user_key.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<MembershipRowWithId> = result.take(0).map_err(DbError::from)?;

        Ok(rows
            .into_iter()
            .next()
            .map(MembershipRowWithId::into_membership))
    }

    async fn replace_role(&self, input: ReplaceMembershipRole) -> TesseraResult<()> {
        let mut statements = vec![
            "UPDATE type::record('user_company_role', $membership_key) SET \
             company_role_key = $new_company_role_key"
                .to_string(),
            "DELETE user_company_module WHERE user_key = $user_key \
             AND company_key = $company_key"
                .to_string(),
        ];

        for i in 0..input.grants.len() {
            statements.push(format!(
                "CREATE type::record('user_company_module', $grant_key_{i}) SET \
                 user_key = $user_key, company_key = $company_key, \
                 module_mapper_key = $grant_mapper_{i}, active = true"
            ));
        }

        if input.roles_update.is_some() {
            statements.push(
                "UPDATE type::record('user', $user_key) SET roles = $roles".to_string(),
            );
        }

        let query = format!("BEGIN TRANSACTION; {}; COMMIT TRANSACTION;", statements.join("; "));

        let mut builder = self
            .db
            .query(&query)
            .bind(("membership_key", input.user_company_role_key))
            .bind(("user_key", input.user_key))
            .bind(("company_key", input.company_key))
            .bind(("new_company_role_key", input.new_company_role_key));

        for (i, grant) in input.grants.into_iter().enumerate() {
            builder = builder
                .bind((format!("grant_key_{i}"), grant.user_company_module_key))
                .bind((format!("grant_mapper_{i}"), grant.module_mapper_key));
        }

        if let Some(roles) = input.roles_update {
            builder = builder.bind(("roles", roles));
        }

        let result = builder.await.map_err(DbError::from)?;
        result.check().map_err(DbError::from)?;

        Ok(())
    }

    async fn delete(
        &self,
        membership_key: &str,
        company_key: &str,
        user_key: &str,
        action: PostDeleteAction,
    ) -> TesseraResult<()> {
        let mut statements = vec![
            "DELETE user_company_module WHERE user_key = $user_key \
             AND company_key = $company_key"
                .to_string(),
            "DELETE type::record('user_company_role', $membership_key)".to_string(),
        ];

        let roles_update = match action {
            PostDeleteAction::RecomputeRoles(roles) => {
                statements.push(
                    "UPDATE type::record('user', $user_key) SET roles = $roles".to_string(),
                );
                Some(roles)
            }
            PostDeleteAction::DeleteUser => {
                statements.push("DELETE type::record('user', $user_key)".to_string());
                None
            }
        };

        let query = format!("BEGIN TRANSACTION; {}; COMMIT TRANSACTION;", statements.join("; "));

        let mut builder = self
            .db
            .query(&query)
            .bind(("membership_key", membership_key.to_string()))
            .bind(("company_key", company_key.to_string()))
            .bind(("user_key", user_key.to_string()));

        if let Some(roles) = roles_update {
            builder = builder.bind(("roles", roles));
        }

        let result = builder.await.map_err(DbError::from)?;
        result.check().map_err(DbError::from)?;

        Ok(())
    }

    async fn list_grants(
        &self,
        company_key: &str,
        user_key: &str,
    ) -> TesseraResult<Vec<ModuleGrant>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * \
                 FROM user_company_module \
                 WHERE company_key = $company_key \
                 AND user_key = $user_key",
            )
            .bind(("company_key", company_key.to_string()))
            .bind(("user_key", user_key.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<GrantRowWithId> = result.take(0).map_err(DbError::from)?;

        Ok(rows.into_iter().map(GrantRowWithId::into_grant).collect())
    }
}
