//! Secret link (time-boxed access token) domain model.
//!
//! A secret link grants access to one specific form on one specific
//! mapper, outside any login session. Links expire 30 minutes after
//! creation; expiry is checked lazily on read, and an expired record
//! is deleted by the check itself.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The one form path a mapper-scoped secret link may unlock.
pub const JOURNAL_INDEX_APPLICATION_PATH: &str = "website_index_journal_application_form";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecretLink {
    /// The token itself, embedded in the emailed URL.
    pub secret_key: String,
    /// Form path this link is scoped to.
    pub path: String,
    /// Mapper this link belongs to. A wrong-mapper secret must look
    /// indistinguishable from no secret.
    pub module_mapper_key: Option<String>,
    pub user_key: Option<String>,
    pub email: Option<String>,
    /// Pagination context carried by listing-style links.
    pub cursor: Option<String>,
    pub complete_list_size: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSecretLink {
    pub secret_key: String,
    pub path: String,
    pub module_mapper_key: Option<String>,
    pub user_key: Option<String>,
    pub email: Option<String>,
    pub cursor: Option<String>,
    pub complete_list_size: Option<String>,
}
