//! Membership and module-grant domain models.
//!
//! A membership (UserCompanyRole) binds a user to a company through a
//! company-role grant. At most one membership per user is `active` at
//! any time; the active row's role determines the user's effective
//! role set.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Membership {
    /// Opaque unique key; the public identifier for this membership.
    pub user_company_role_key: String,
    pub user_key: String,
    pub company_key: String,
    pub company_role_key: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

/// Per-module visibility grant accompanying a membership. Replaced
/// wholesale whenever the role or module grants are updated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleGrant {
    pub user_company_module_key: String,
    pub user_key: String,
    pub company_key: String,
    pub module_mapper_key: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

/// One grant row to be written alongside a membership mutation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrantSeed {
    pub user_company_module_key: String,
    pub module_mapper_key: String,
}

/// All rows of an atomic membership creation.
#[derive(Debug, Clone)]
pub struct CreateMembership {
    pub user_company_role_key: String,
    pub user_key: String,
    pub company_key: String,
    pub company_role_key: String,
    pub active: bool,
    /// When the new membership becomes active, the user's cached role
    /// set is rewritten to this in the same transaction.
    pub roles_update: Option<Vec<String>>,
    pub grants: Vec<GrantSeed>,
}

/// All rows of an atomic role replacement on an existing membership.
#[derive(Debug, Clone)]
pub struct ReplaceMembershipRole {
    pub user_company_role_key: String,
    pub user_key: String,
    pub company_key: String,
    pub new_company_role_key: String,
    /// Set when the membership is active and the cached role set must
    /// follow the new role.
    pub roles_update: Option<Vec<String>>,
    /// Prior grants are always deleted; these replace them (empty for
    /// non-admin roles).
    pub grants: Vec<GrantSeed>,
}

/// What happens to the user row after a membership is deleted.
#[derive(Debug, Clone)]
pub enum PostDeleteAction {
    /// Another active membership remains; rewrite the cached role set
    /// from it.
    RecomputeRoles(Vec<String>),
    /// No active membership remains; the user record is deleted.
    DeleteUser,
}
