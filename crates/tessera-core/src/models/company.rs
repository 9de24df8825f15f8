//! Company (tenant) domain model.
//!
//! A company is an isolated customer organization. Its `active` flag
//! drives the `live`/`archived` flags on every one of its module
//! mappings: deactivating a company suspends all of its hosts in the
//! same transaction.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Company {
    /// Opaque unique key; the public identifier for this tenant.
    pub company_key: String,
    /// Display name, unique across the platform.
    pub name: String,
    /// URL-safe identifier derived from the name, unique.
    pub slug: String,
    pub description: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    /// ISO 3166-1 alpha-2 country code.
    pub country: Option<String>,
    pub time_zone: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub lang: Option<String>,
    /// External billing reference.
    pub billing_id: Option<String>,
    pub active: bool,
    pub archived: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields required to create a new company.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCompany {
    pub company_key: String,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub time_zone: Option<String>,
    pub lang: Option<String>,
    pub billing_id: Option<String>,
    pub active: bool,
}

/// Fields that can be updated on an existing company.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateCompany {
    pub name: Option<String>,
    pub description: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub time_zone: Option<String>,
    pub lang: Option<String>,
    pub billing_id: Option<String>,
}
