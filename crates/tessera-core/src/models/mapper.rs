//! Company-to-module mapping domain model.
//!
//! A mapper binds one company to one enabled module and carries the
//! public hostname serving that pairing. Host uniqueness among live,
//! non-archived mappers is the crux of tenant resolution.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Default theme colors applied to a new mapper.
pub const DEFAULT_COLORS_JSON: &str = "{\"top-bar\":\"#0A69AD\",\"top-bar-btn\":\"#ffffff\",\
\"footer\":\"#0A69AD\",\"footer-btn\":\"#ffffff\",\"header-background\":\"#ffffff\",\
\"header-btn\":\"#ffffff\",\"header-navbar\":\"#1C1474\",\"header-navbar-hover\":\"#ffffff\",\
\"theme\":\"#1C1474\",\"hover\":\"#1C1474\",\"dark\":\"#05172e\"}";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanyModuleMapper {
    /// Opaque unique key; the public identifier for this mapping.
    pub module_mapper_key: String,
    pub company_key: String,
    pub module_key: String,
    /// Public hostname serving this tenant+module pairing.
    pub host: Option<String>,
    /// Subscription is currently active/billed. Billing suspension
    /// clears this flag, which is what turns host resolution into a
    /// 403.
    pub live: bool,
    pub archived: bool,
    /// Marks the company's primary/default mapper.
    pub master: bool,
    pub directory: Option<String>,
    pub email: Option<String>,
    /// Theme colors as a JSON document.
    pub colors: String,
    pub header: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateMapper {
    pub module_mapper_key: String,
    pub company_key: String,
    pub module_key: String,
    pub host: Option<String>,
    pub live: bool,
    pub master: bool,
    pub directory: Option<String>,
    pub email: Option<String>,
    /// `None` applies [`DEFAULT_COLORS_JSON`].
    pub colors: Option<String>,
}
