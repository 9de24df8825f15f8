//! Role administration.

use tessera_core::error::TesseraResult;
use tessera_core::keygen;
use tessera_core::models::role::{CompanyRoleMapper, CreateCompanyRoleMapper, CreateRole, Role};
use tessera_core::repository::{CompanyRoleRepository, RoleRepository};
use tracing::info;

/// Role catalog and per-company role-grant administration.
pub struct RoleAdminService<RR, CRR> {
    roles: RR,
    company_roles: CRR,
}

impl<RR, CRR> RoleAdminService<RR, CRR>
where
    RR: RoleRepository,
    CRR: CompanyRoleRepository,
{
    pub fn new(roles: RR, company_roles: CRR) -> Self {
        Self {
            roles,
            company_roles,
        }
    }

    /// Create a role. The discriminator must be unique.
    pub async fn create_role(
        &self,
        name: &str,
        discriminator: &str,
        company_role: bool,
        description: Option<String>,
    ) -> TesseraResult<Role> {
        let role = self
            .roles
            .create(CreateRole {
                role_key: keygen::entity_key(),
                name: name.to_string(),
                role: discriminator.to_string(),
                company_role,
                description,
            })
            .await?;

        info!(role_key = %role.role_key, role = %role.role, "Role created");

        Ok(role)
    }

    /// Delete a role. Fails while any membership still holds it.
    pub async fn delete_role(&self, role_key: &str) -> TesseraResult<()> {
        self.roles.delete(role_key).await?;
        info!(role_key, "Role deleted");
        Ok(())
    }

    /// Make a role grantable within a company.
    pub async fn enable_role_for_company(
        &self,
        company_key: &str,
        role_key: &str,
    ) -> TesseraResult<CompanyRoleMapper> {
        self.company_roles
            .create(CreateCompanyRoleMapper {
                company_role_key: keygen::entity_key(),
                company_key: company_key.to_string(),
                role_key: role_key.to_string(),
            })
            .await
    }

    /// Withdraw a role grant from a company.
    pub async fn disable_role_for_company(&self, company_role_key: &str) -> TesseraResult<()> {
        self.company_roles.archive(company_role_key).await
    }

    pub async fn list_roles(&self) -> TesseraResult<Vec<Role>> {
        self.roles.list().await
    }
}
