//! User domain model.
//!
//! Users are global identities keyed by unique email. The cached
//! `roles` set is derived from the user's single active membership
//! and recomputed transactionally whenever membership state changes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Opaque unique key; the public identifier for this user.
    pub user_key: String,
    pub email: String,
    pub name: String,
    /// Argon2id PHC-format hash.
    pub password_hash: String,
    /// Cached role names, derived from the active membership.
    pub roles: Vec<String>,
    pub is_super_admin: bool,
    pub is_enabled: bool,
    pub is_deactive: bool,
    /// Set while the user holds a generated onboarding password.
    pub is_password_temporary: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUser {
    pub user_key: String,
    pub email: String,
    pub name: String,
    pub password_hash: String,
    pub is_super_admin: bool,
    pub is_password_temporary: bool,
}
