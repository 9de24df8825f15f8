//! Role and company-role-grant domain models.

use serde::{Deserialize, Serialize};

/// Platform-wide role discriminators.
pub const ROLE_SUPER_ADMIN: &str = "ROLE_SUPER_ADMIN";
pub const ROLE_COMPANY_ADMIN: &str = "ROLE_COMPANY_ADMIN";
pub const ROLE_COMPANY_AUTHOR: &str = "ROLE_COMPANY_AUTHOR";
pub const ROLE_COMPANY_REVIEWER: &str = "ROLE_COMPANY_REVIEWER";
pub const ROLE_COMPANY_USER: &str = "ROLE_COMPANY_USER";

/// A role catalog entry. Cannot be deleted while any user holds it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Role {
    /// Opaque unique key; the public identifier for this role.
    pub role_key: String,
    pub name: String,
    /// Unique discriminator string, e.g. `ROLE_COMPANY_ADMIN`.
    pub role: String,
    /// Tenant-scoped role (grantable within companies) vs.
    /// platform-scoped.
    pub company_role: bool,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateRole {
    pub role_key: String,
    pub name: String,
    pub role: String,
    pub company_role: bool,
    pub description: Option<String>,
}

/// Enables a role to be granted within one company.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanyRoleMapper {
    /// Opaque unique key; the public identifier for this grant.
    pub company_role_key: String,
    pub company_key: String,
    pub role_key: String,
    pub archived: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCompanyRoleMapper {
    pub company_role_key: String,
    pub company_key: String,
    pub role_key: String,
}
