//! Repository trait definitions for data access abstraction.
//!
//! All repository operations are async. Methods named `find_*` return
//! `Option` for probes the caller treats as soft misses; `get_*`
//! methods fail with `NotFound`. Operations that back one public
//! service operation with multiple row mutations are composite and
//! must commit atomically.

use crate::error::TesseraResult;
use crate::models::{
    company::{Company, CreateCompany, UpdateCompany},
    mapper::{CompanyModuleMapper, CreateMapper},
    membership::{
        CreateMembership, Membership, ModuleGrant, PostDeleteAction, ReplaceMembershipRole,
    },
    menu::{CreateMenu, MapperMenu},
    module::{CreateModule, Module, ModuleKind},
    role::{CompanyRoleMapper, CreateCompanyRoleMapper, CreateRole, Role},
    secret::{CreateSecretLink, SecretLink},
    user::{CreateUser, User},
};

/// Pagination parameters for list queries.
#[derive(Debug, Clone)]
pub struct Pagination {
    pub offset: u64,
    pub limit: u64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: 50,
        }
    }
}

/// A paginated result set.
#[derive(Debug, Clone)]
pub struct PaginatedResult<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub offset: u64,
    pub limit: u64,
}

// ---------------------------------------------------------------------------
// Tenant directory
// ---------------------------------------------------------------------------

pub trait CompanyRepository: Send + Sync {
    /// Fails with `AlreadyExists` when the name or slug is taken.
    fn create(&self, input: CreateCompany) -> impl Future<Output = TesseraResult<Company>> + Send;
    fn get_by_key(&self, key: &str) -> impl Future<Output = TesseraResult<Company>> + Send;
    fn find_by_name(
        &self,
        name: &str,
    ) -> impl Future<Output = TesseraResult<Option<Company>>> + Send;
    fn update(
        &self,
        key: &str,
        input: UpdateCompany,
    ) -> impl Future<Output = TesseraResult<Company>> + Send;
    /// Atomically set the company's `active` flag and flip every one
    /// of its mappers: active ⇒ `live=true, archived=false`,
    /// inactive ⇒ `live=false, archived=true`. Single transaction.
    fn set_active(
        &self,
        key: &str,
        active: bool,
    ) -> impl Future<Output = TesseraResult<Company>> + Send;
    /// Soft-delete. Companies are never hard-deleted.
    fn archive(&self, key: &str) -> impl Future<Output = TesseraResult<()>> + Send;
    fn list(
        &self,
        pagination: Pagination,
    ) -> impl Future<Output = TesseraResult<PaginatedResult<Company>>> + Send;
}

// ---------------------------------------------------------------------------
// Module catalog
// ---------------------------------------------------------------------------

pub trait ModuleRepository: Send + Sync {
    fn create(&self, input: CreateModule) -> impl Future<Output = TesseraResult<Module>> + Send;
    /// Non-archived catalog entry by key.
    fn get_by_key(&self, key: &str) -> impl Future<Output = TesseraResult<Module>> + Send;
    /// Non-archived catalog entry by kind.
    fn find_by_kind(
        &self,
        kind: ModuleKind,
    ) -> impl Future<Output = TesseraResult<Option<Module>>> + Send;
    fn list_active(&self) -> impl Future<Output = TesseraResult<Vec<Module>>> + Send;
    fn archive(&self, key: &str) -> impl Future<Output = TesseraResult<()>> + Send;
}

// ---------------------------------------------------------------------------
// Company-module mappers
// ---------------------------------------------------------------------------

pub trait MapperRepository: Send + Sync {
    /// Fails with `AlreadyExists` when the company already has a
    /// non-archived mapper for the module, or when another live
    /// non-archived mapper claims the same host.
    fn create(
        &self,
        input: CreateMapper,
    ) -> impl Future<Output = TesseraResult<CompanyModuleMapper>> + Send;
    /// Non-archived mapper by key; soft miss.
    fn find_by_key(
        &self,
        key: &str,
    ) -> impl Future<Output = TesseraResult<Option<CompanyModuleMapper>>> + Send;
    /// The unique live, non-archived mapper serving a host; soft miss
    /// (the resolver raises `HostNotFound`).
    fn find_live_by_host(
        &self,
        host: &str,
    ) -> impl Future<Output = TesseraResult<Option<CompanyModuleMapper>>> + Send;
    /// The company's non-archived mapper for a module; soft miss (the
    /// resolver raises `ModuleNotProvisioned`).
    fn find_by_company_and_module(
        &self,
        company_key: &str,
        module_key: &str,
    ) -> impl Future<Output = TesseraResult<Option<CompanyModuleMapper>>> + Send;
    fn list_by_company(
        &self,
        company_key: &str,
    ) -> impl Future<Output = TesseraResult<Vec<CompanyModuleMapper>>> + Send;
    fn archive(&self, key: &str) -> impl Future<Output = TesseraResult<()>> + Send;
}

// ---------------------------------------------------------------------------
// Roles
// ---------------------------------------------------------------------------

pub trait RoleRepository: Send + Sync {
    /// Fails with `AlreadyExists` on a duplicate discriminator.
    fn create(&self, input: CreateRole) -> impl Future<Output = TesseraResult<Role>> + Send;
    fn get_by_key(&self, key: &str) -> impl Future<Output = TesseraResult<Role>> + Send;
    fn find_by_discriminator(
        &self,
        role: &str,
    ) -> impl Future<Output = TesseraResult<Option<Role>>> + Send;
    fn list(&self) -> impl Future<Output = TesseraResult<Vec<Role>>> + Send;
    /// Fails with `InvariantViolation` while any membership still
    /// references the role through a company-role grant.
    fn delete(&self, key: &str) -> impl Future<Output = TesseraResult<()>> + Send;
}

pub trait CompanyRoleRepository: Send + Sync {
    fn create(
        &self,
        input: CreateCompanyRoleMapper,
    ) -> impl Future<Output = TesseraResult<CompanyRoleMapper>> + Send;
    /// Non-archived grant by key.
    fn get_by_key(&self, key: &str) -> impl Future<Output = TesseraResult<CompanyRoleMapper>> + Send;
    fn list_by_company(
        &self,
        company_key: &str,
    ) -> impl Future<Output = TesseraResult<Vec<CompanyRoleMapper>>> + Send;
    fn archive(&self, key: &str) -> impl Future<Output = TesseraResult<()>> + Send;
}

// ---------------------------------------------------------------------------
// Users & memberships
// ---------------------------------------------------------------------------

pub trait UserRepository: Send + Sync {
    /// Fails with `AlreadyExists` on a duplicate email.
    fn create(&self, input: CreateUser) -> impl Future<Output = TesseraResult<User>> + Send;
    fn get_by_key(&self, key: &str) -> impl Future<Output = TesseraResult<User>> + Send;
    fn find_by_email(
        &self,
        email: &str,
    ) -> impl Future<Output = TesseraResult<Option<User>>> + Send;
    /// Rewrite the cached role-name set.
    fn set_roles(
        &self,
        key: &str,
        roles: Vec<String>,
    ) -> impl Future<Output = TesseraResult<()>> + Send;
    fn set_password(
        &self,
        key: &str,
        password_hash: String,
        temporary: bool,
    ) -> impl Future<Output = TesseraResult<()>> + Send;
    fn delete(&self, key: &str) -> impl Future<Output = TesseraResult<()>> + Send;
}

pub trait MembershipRepository: Send + Sync {
    /// Create a membership, its module-grant rows, and (when it
    /// becomes the active membership) the user's cached role set, in
    /// one transaction.
    fn create(
        &self,
        input: CreateMembership,
    ) -> impl Future<Output = TesseraResult<Membership>> + Send;
    fn find_by_company_and_user(
        &self,
        company_key: &str,
        user_key: &str,
    ) -> impl Future<Output = TesseraResult<Option<Membership>>> + Send;
    /// The user's single active membership, if any.
    fn find_active_by_user(
        &self,
        user_key: &str,
    ) -> impl Future<Output = TesseraResult<Option<Membership>>> + Send;
    /// Replace the membership's role, delete all prior module grants,
    /// write the replacement grants, and update the cached role set
    /// when requested — one transaction.
    fn replace_role(
        &self,
        input: ReplaceMembershipRole,
    ) -> impl Future<Output = TesseraResult<()>> + Send;
    /// Delete the membership and its module grants, then apply the
    /// post-delete action to the user row — one transaction.
    fn delete(
        &self,
        membership_key: &str,
        company_key: &str,
        user_key: &str,
        action: PostDeleteAction,
    ) -> impl Future<Output = TesseraResult<()>> + Send;
    fn list_grants(
        &self,
        company_key: &str,
        user_key: &str,
    ) -> impl Future<Output = TesseraResult<Vec<ModuleGrant>>> + Send;
}

// ---------------------------------------------------------------------------
// Secret links
// ---------------------------------------------------------------------------

pub trait SecretLinkRepository: Send + Sync {
    fn create(
        &self,
        input: CreateSecretLink,
    ) -> impl Future<Output = TesseraResult<SecretLink>> + Send;
    fn find_by_key(
        &self,
        secret_key: &str,
    ) -> impl Future<Output = TesseraResult<Option<SecretLink>>> + Send;
    /// Used by the lazy-expiration check and by callers wanting
    /// single-use semantics.
    fn delete_by_key(&self, secret_key: &str) -> impl Future<Output = TesseraResult<()>> + Send;
}

// ---------------------------------------------------------------------------
// Mapper menus
// ---------------------------------------------------------------------------

pub trait MenuRepository: Send + Sync {
    /// Create unless a menu of the same `menu_type` already exists
    /// for the mapper. Returns `true` when a row was created.
    fn create_if_absent(
        &self,
        input: CreateMenu,
    ) -> impl Future<Output = TesseraResult<bool>> + Send;
    fn list_by_mapper(
        &self,
        module_mapper_key: &str,
    ) -> impl Future<Output = TesseraResult<Vec<MapperMenu>>> + Send;
}
