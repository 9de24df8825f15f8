//! User-company-role assignment.
//!
//! A user belongs to companies through memberships; at most one
//! membership is active at a time, and the active one determines the
//! user's cached role set. Every mutation here commits its membership
//! row, module grants, and role-set update as one transaction in the
//! repository layer.

use tessera_core::error::TesseraResult;
use tessera_core::keygen;
use tessera_core::models::membership::{
    CreateMembership, GrantSeed, Membership, PostDeleteAction, ReplaceMembershipRole,
};
use tessera_core::models::role::ROLE_COMPANY_ADMIN;
use tessera_core::models::user::{CreateUser, User};
use tessera_core::repository::{
    CompanyRoleRepository, MapperRepository, MembershipRepository, RoleRepository, UserRepository,
};
use tracing::{debug, info};

use crate::config::AccessConfig;
use crate::password;

/// A freshly onboarded user together with the generated temporary
/// password (to be delivered out of band; only its hash is stored).
#[derive(Debug)]
pub struct OnboardedUser {
    pub user: User,
    pub temporary_password: String,
}

/// User-company-role assignment service.
pub struct MembershipService<UR, MeR, RR, CRR, MR> {
    users: UR,
    memberships: MeR,
    roles: RR,
    company_roles: CRR,
    mappers: MR,
    config: AccessConfig,
}

impl<UR, MeR, RR, CRR, MR> MembershipService<UR, MeR, RR, CRR, MR>
where
    UR: UserRepository,
    MeR: MembershipRepository,
    RR: RoleRepository,
    CRR: CompanyRoleRepository,
    MR: MapperRepository,
{
    pub fn new(
        users: UR,
        memberships: MeR,
        roles: RR,
        company_roles: CRR,
        mappers: MR,
        config: AccessConfig,
    ) -> Self {
        Self {
            users,
            memberships,
            roles,
            company_roles,
            mappers,
            config,
        }
    }

    /// Create a user for assignment with a generated temporary
    /// password.
    pub async fn onboard_user(&self, email: &str, name: &str) -> TesseraResult<OnboardedUser> {
        let temporary_password = keygen::temporary_password();
        let password_hash =
            password::hash_password(&temporary_password, self.config.pepper.as_deref())?;

        let user = self
            .users
            .create(CreateUser {
                user_key: keygen::entity_key(),
                email: email.to_string(),
                name: name.to_string(),
                password_hash,
                is_super_admin: false,
                is_password_temporary: true,
            })
            .await?;

        info!(user_key = %user.user_key, "User onboarded with temporary password");

        Ok(OnboardedUser {
            user,
            temporary_password,
        })
    }

    /// Add a user to a company under a company-role grant.
    ///
    /// The membership becomes active only when the user has no active
    /// membership elsewhere; in that case the user's cached role set
    /// is rewritten to exactly the granted role. Module keys resolving
    /// to live mappings get grant rows; unresolved keys are skipped
    /// silently.
    pub async fn add_user_to_company(
        &self,
        company_key: &str,
        company_role_key: &str,
        user_key: &str,
        module_keys: &[String],
    ) -> TesseraResult<Membership> {
        let grant = self.company_roles.get_by_key(company_role_key).await?;
        let role = self.roles.get_by_key(&grant.role_key).await?;

        let active = self
            .memberships
            .find_active_by_user(user_key)
            .await?
            .is_none();
        let roles_update = active.then(|| vec![role.role.clone()]);

        let grants = self.resolve_grants(module_keys).await?;

        let membership = self
            .memberships
            .create(CreateMembership {
                user_company_role_key: keygen::entity_key(),
                user_key: user_key.to_string(),
                company_key: company_key.to_string(),
                company_role_key: company_role_key.to_string(),
                active,
                roles_update,
                grants,
            })
            .await?;

        info!(
            user_key,
            company_key,
            role = %role.role,
            active = membership.active,
            "User added to company"
        );

        Ok(membership)
    }

    /// Replace the user's role within a company.
    ///
    /// Returns `false` when the user has no membership there. Prior
    /// module grants are deleted unconditionally; replacement grants
    /// are written only for company admins — other roles carry no
    /// module grants. The cached role set follows the new role only
    /// while the membership is the active one.
    pub async fn update_user_company_role(
        &self,
        company_key: &str,
        new_company_role_key: &str,
        user_key: &str,
        module_keys: &[String],
    ) -> TesseraResult<bool> {
        let Some(membership) = self
            .memberships
            .find_by_company_and_user(company_key, user_key)
            .await?
        else {
            return Ok(false);
        };

        let grant = self.company_roles.get_by_key(new_company_role_key).await?;
        let role = self.roles.get_by_key(&grant.role_key).await?;

        let roles_update = membership.active.then(|| vec![role.role.clone()]);
        let grants = if role.role == ROLE_COMPANY_ADMIN {
            self.resolve_grants(module_keys).await?
        } else {
            Vec::new()
        };

        self.memberships
            .replace_role(ReplaceMembershipRole {
                user_company_role_key: membership.user_company_role_key,
                user_key: user_key.to_string(),
                company_key: company_key.to_string(),
                new_company_role_key: new_company_role_key.to_string(),
                roles_update,
                grants,
            })
            .await?;

        info!(user_key, company_key, role = %role.role, "User role replaced");

        Ok(true)
    }

    /// Remove a user from a company.
    ///
    /// Returns `false` when the user has no membership there. The
    /// membership and its grants are deleted; if another active
    /// membership remains the role set is recomputed from it,
    /// otherwise the user record itself is deleted.
    pub async fn delete_user_from_company(
        &self,
        company_key: &str,
        user_key: &str,
    ) -> TesseraResult<bool> {
        let Some(membership) = self
            .memberships
            .find_by_company_and_user(company_key, user_key)
            .await?
        else {
            return Ok(false);
        };

        let action = match self.memberships.find_active_by_user(user_key).await? {
            Some(active)
                if active.user_company_role_key != membership.user_company_role_key =>
            {
                let grant = self
                    .company_roles
                    .get_by_key(&active.company_role_key)
                    .await?;
                let role = self.roles.get_by_key(&grant.role_key).await?;
                PostDeleteAction::RecomputeRoles(vec![role.role])
            }
            _ => PostDeleteAction::DeleteUser,
        };

        self.memberships
            .delete(
                &membership.user_company_role_key,
                company_key,
                user_key,
                action,
            )
            .await?;

        info!(user_key, company_key, "User removed from company");

        Ok(true)
    }

    /// Resolve module keys to grant seeds, skipping keys without a
    /// non-archived mapping.
    async fn resolve_grants(&self, module_keys: &[String]) -> TesseraResult<Vec<GrantSeed>> {
        let mut grants = Vec::with_capacity(module_keys.len());

        for key in module_keys {
            match self.mappers.find_by_key(key).await? {
                Some(mapper) => grants.push(GrantSeed {
                    user_company_module_key: keygen::entity_key(),
                    module_mapper_key: mapper.module_mapper_key,
                }),
                None => {
                    debug!(module_mapper_key = %key, "Skipping unresolved module grant");
                }
            }
        }

        Ok(grants)
    }
}
