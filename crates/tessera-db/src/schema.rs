//! Schema definitions and migration runner for SurrealDB.
//!
//! All table definitions use SCHEMAFULL mode for data integrity.
//! Entity keys are the record IDs; foreign references are stored as
//! plain key strings. Enums are stored as strings with ASSERT
//! constraints for validation.

use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tracing::info;

use crate::error::DbError;

// -----------------------------------------------------------------------
// Migration tracking
// -----------------------------------------------------------------------

const MIGRATION_TABLE_DDL: &str = "\
DEFINE TABLE IF NOT EXISTS _migration SCHEMAFULL;
DEFINE FIELD IF NOT EXISTS version ON TABLE _migration TYPE int;
DEFINE FIELD IF NOT EXISTS name ON TABLE _migration TYPE string;
DEFINE FIELD IF NOT EXISTS applied_at ON TABLE _migration TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX IF NOT EXISTS idx_migration_version ON TABLE _migration \
    COLUMNS version UNIQUE;
";

#[derive(Debug, SurrealValue)]
struct MigrationRecord {
    version: u32,
    #[allow(dead_code)]
    name: String,
}

struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

static MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "initial_schema",
    sql: SCHEMA_V1,
}];

// -----------------------------------------------------------------------
// Schema v1 — initial table definitions
// -----------------------------------------------------------------------

const SCHEMA_V1: &str = "\
-- =======================================================================
-- Companies (tenants)
-- =======================================================================
DEFINE TABLE company SCHEMAFULL;
DEFINE FIELD name ON TABLE company TYPE string;
DEFINE FIELD slug ON TABLE company TYPE string;
DEFINE FIELD description ON TABLE company TYPE option<string>;
DEFINE FIELD address ON TABLE company TYPE option<string>;
DEFINE FIELD city ON TABLE company TYPE option<string>;
DEFINE FIELD country ON TABLE company TYPE option<string>;
DEFINE FIELD time_zone ON TABLE company TYPE option<string>;
DEFINE FIELD email ON TABLE company TYPE option<string>;
DEFINE FIELD phone ON TABLE company TYPE option<string>;
DEFINE FIELD lang ON TABLE company TYPE option<string>;
DEFINE FIELD billing_id ON TABLE company TYPE option<string>;
DEFINE FIELD active ON TABLE company TYPE bool DEFAULT false;
DEFINE FIELD archived ON TABLE company TYPE bool DEFAULT false;
DEFINE FIELD created_at ON TABLE company TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE company TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_company_name ON TABLE company COLUMNS name UNIQUE;
DEFINE INDEX idx_company_slug ON TABLE company COLUMNS slug UNIQUE;

-- =======================================================================
-- Module catalog (reference data)
-- =======================================================================
DEFINE TABLE module SCHEMAFULL;
DEFINE FIELD name ON TABLE module TYPE string;
DEFINE FIELD description ON TABLE module TYPE option<string>;
DEFINE FIELD kind ON TABLE module TYPE string \
    ASSERT $value IN ['website', 'education', 'journal', 'rj-index', \
    'review-and-submission'];
DEFINE FIELD archived ON TABLE module TYPE bool DEFAULT false;
DEFINE INDEX idx_module_name ON TABLE module COLUMNS name UNIQUE;

-- =======================================================================
-- Company-module mappers (host -> tenant+module resolution)
-- =======================================================================
DEFINE TABLE company_module_mapper SCHEMAFULL;
DEFINE FIELD company_key ON TABLE company_module_mapper TYPE string;
DEFINE FIELD module_key ON TABLE company_module_mapper TYPE string;
DEFINE FIELD host ON TABLE company_module_mapper TYPE option<string>;
DEFINE FIELD live ON TABLE company_module_mapper TYPE bool DEFAULT true;
DEFINE FIELD archived ON TABLE company_module_mapper TYPE bool \
    DEFAULT false;
DEFINE FIELD master ON TABLE company_module_mapper TYPE bool \
    DEFAULT false;
DEFINE FIELD directory ON TABLE company_module_mapper \
    TYPE option<string>;
DEFINE FIELD email ON TABLE company_module_mapper TYPE option<string>;
DEFINE FIELD colors ON TABLE company_module_mapper TYPE string;
DEFINE FIELD header ON TABLE company_module_mapper TYPE string \
    DEFAULT '1';
DEFINE FIELD created_at ON TABLE company_module_mapper TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE company_module_mapper TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_mapper_host ON TABLE company_module_mapper \
    COLUMNS host;
DEFINE INDEX idx_mapper_company ON TABLE company_module_mapper \
    COLUMNS company_key;

-- =======================================================================
-- Roles
-- =======================================================================
DEFINE TABLE role SCHEMAFULL;
DEFINE FIELD name ON TABLE role TYPE string;
DEFINE FIELD role ON TABLE role TYPE string;
DEFINE FIELD company_role ON TABLE role TYPE bool DEFAULT true;
DEFINE FIELD description ON TABLE role TYPE option<string>;
DEFINE INDEX idx_role_discriminator ON TABLE role COLUMNS role UNIQUE;

-- =======================================================================
-- Company-role grants
-- =======================================================================
DEFINE TABLE company_role_mapper SCHEMAFULL;
DEFINE FIELD company_key ON TABLE company_role_mapper TYPE string;
DEFINE FIELD role_key ON TABLE company_role_mapper TYPE string;
DEFINE FIELD archived ON TABLE company_role_mapper TYPE bool \
    DEFAULT false;
DEFINE INDEX idx_company_role_company ON TABLE company_role_mapper \
    COLUMNS company_key;

-- =======================================================================
-- Users (global identities)
-- =======================================================================
DEFINE TABLE user SCHEMAFULL;
DEFINE FIELD email ON TABLE user TYPE string;
DEFINE FIELD name ON TABLE user TYPE string;
DEFINE FIELD password_hash ON TABLE user TYPE string;
DEFINE FIELD roles ON TABLE user TYPE array<string> DEFAULT [];
DEFINE FIELD super_admin ON TABLE user TYPE bool DEFAULT false;
DEFINE FIELD enabled ON TABLE user TYPE bool DEFAULT true;
DEFINE FIELD deactive ON TABLE user TYPE bool DEFAULT false;
DEFINE FIELD password_temporary ON TABLE user TYPE bool DEFAULT false;
DEFINE FIELD created_at ON TABLE user TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_user_email ON TABLE user COLUMNS email UNIQUE;

-- =======================================================================
-- Memberships (user-company-role)
-- =======================================================================
DEFINE TABLE user_company_role SCHEMAFULL;
DEFINE FIELD user_key ON TABLE user_company_role TYPE string;
DEFINE FIELD company_key ON TABLE user_company_role TYPE string;
DEFINE FIELD company_role_key ON TABLE user_company_role TYPE string;
DEFINE FIELD active ON TABLE user_company_role TYPE bool DEFAULT false;
DEFINE FIELD created_at ON TABLE user_company_role TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_membership_company_user ON TABLE user_company_role \
    COLUMNS company_key, user_key UNIQUE;
DEFINE INDEX idx_membership_user ON TABLE user_company_role \
    COLUMNS user_key;

-- =======================================================================
-- Module grants (user-company-module)
-- =======================================================================
DEFINE TABLE user_company_module SCHEMAFULL;
DEFINE FIELD user_key ON TABLE user_company_module TYPE string;
DEFINE FIELD company_key ON TABLE user_company_module TYPE string;
DEFINE FIELD module_mapper_key ON TABLE user_company_module \
    TYPE string;
DEFINE FIELD active ON TABLE user_company_module TYPE bool \
    DEFAULT false;
DEFINE FIELD created_at ON TABLE user_company_module TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_grant_user_company ON TABLE user_company_module \
    COLUMNS user_key, company_key;

-- =======================================================================
-- Secret links (time-boxed, lazily expired)
-- =======================================================================
DEFINE TABLE password_secrecy SCHEMAFULL;
DEFINE FIELD path ON TABLE password_secrecy TYPE string;
DEFINE FIELD module_mapper_key ON TABLE password_secrecy \
    TYPE option<string>;
DEFINE FIELD user_key ON TABLE password_secrecy TYPE option<string>;
DEFINE FIELD email ON TABLE password_secrecy TYPE option<string>;
DEFINE FIELD cursor ON TABLE password_secrecy TYPE option<string>;
DEFINE FIELD complete_list_size ON TABLE password_secrecy \
    TYPE option<string>;
DEFINE FIELD created_at ON TABLE password_secrecy TYPE datetime \
    DEFAULT time::now();

-- =======================================================================
-- Mapper menus (ordered navigation entries)
-- =======================================================================
DEFINE TABLE mapper_menu SCHEMAFULL;
DEFINE FIELD module_mapper_key ON TABLE mapper_menu TYPE string;
DEFINE FIELD name ON TABLE mapper_menu TYPE string;
DEFINE FIELD menu_type ON TABLE mapper_menu TYPE string;
DEFINE FIELD route_name ON TABLE mapper_menu TYPE string;
DEFINE FIELD position ON TABLE mapper_menu TYPE int;
DEFINE FIELD main_menu ON TABLE mapper_menu TYPE bool DEFAULT true;
DEFINE FIELD footer_menu ON TABLE mapper_menu TYPE bool DEFAULT true;
DEFINE FIELD home_page ON TABLE mapper_menu TYPE bool DEFAULT true;
DEFINE FIELD public_menu ON TABLE mapper_menu TYPE bool DEFAULT true;
DEFINE INDEX idx_menu_mapper_type ON TABLE mapper_menu \
    COLUMNS module_mapper_key, menu_type UNIQUE;
";

// -----------------------------------------------------------------------
// Public API
// -----------------------------------------------------------------------

/// Run all pending migrations against the given SurrealDB client.
///
/// Creates a `_migration` tracking table on first run, then applies
/// each migration whose version exceeds the current maximum.
/// All DEFINE statements are idempotent so re-running is safe.
pub async fn run_migrations<C: Connection>(db: &Surreal<C>) -> Result<(), DbError> {
    // Ensure migration tracking table exists (idempotent).
    db.query(MIGRATION_TABLE_DDL)
        .await?
        .check()
        .map_err(|e| DbError::Migration(e.to_string()))?;

    // Determine current schema version.
    let mut result = db
        .query("SELECT * FROM _migration ORDER BY version DESC LIMIT 1")
        .await?;
    let records: Vec<MigrationRecord> = result.take(0)?;
    let current_version = records.first().map(|m| m.version).unwrap_or(0);

    for migration in MIGRATIONS {
        if migration.version > current_version {
            info!(
                version = migration.version,
                name = migration.name,
                "Applying migration"
            );
            db.query(migration.sql).await?.check().map_err(|e| {
                DbError::Migration(format!(
                    "Migration v{} '{}' failed: {}",
                    migration.version, migration.name, e,
                ))
            })?;

            // Record the applied migration.
            db.query(
                "CREATE _migration SET version = $version, \
                 name = $name",
            )
            .bind(("version", migration.version))
            .bind(("name", migration.name.to_string()))
            .await?
            .check()
            .map_err(|e| {
                DbError::Migration(format!(
                    "Failed to record migration v{}: {}",
                    migration.version, e,
                ))
            })?;

            info!(
                version = migration.version,
                "Migration applied successfully"
            );
        }
    }

    Ok(())
}

/// Returns the raw schema DDL for version 1.
///
/// Exposed for testing with in-memory SurrealDB instances that
/// bypass the migration runner.
pub fn schema_v1() -> &'static str {
    SCHEMA_V1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_v1_is_nonempty() {
        assert!(!SCHEMA_V1.is_empty());
    }

    #[test]
    fn migrations_are_ordered() {
        for window in MIGRATIONS.windows(2) {
            assert!(
                window[0].version < window[1].version,
                "Migrations must be in ascending version order"
            );
        }
    }
}
