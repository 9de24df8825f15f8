//! Connection management for the platform database.

use surrealdb::Surreal;
use surrealdb::engine::remote::ws::{Client, Ws};
use surrealdb::opt::auth::Root;
use tessera_core::error::TesseraResult;
use tracing::info;

use crate::schema::run_migrations;
use crate::seed::seed_module_catalog;

fn env_or(key: &str, fallback: String) -> String {
    std::env::var(key).unwrap_or(fallback)
}

/// Connection settings for the platform database.
///
/// Production deployments populate these from `TESSERA_DB_*`
/// environment variables; the defaults target a local instance.
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// WebSocket URL (e.g., `127.0.0.1:8000`).
    pub url: String,
    pub namespace: String,
    pub database: String,
    pub username: String,
    pub password: String,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            url: "127.0.0.1:8000".into(),
            namespace: "tessera".into(),
            database: "main".into(),
            username: "root".into(),
            password: "root".into(),
        }
    }
}

impl DbConfig {
    /// Build the configuration from `TESSERA_DB_*` environment
    /// variables, keeping the default for any that is unset.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            url: env_or("TESSERA_DB_URL", defaults.url),
            namespace: env_or("TESSERA_DB_NAMESPACE", defaults.namespace),
            database: env_or("TESSERA_DB_DATABASE", defaults.database),
            username: env_or("TESSERA_DB_USERNAME", defaults.username),
            password: env_or("TESSERA_DB_PASSWORD", defaults.password),
        }
    }
}

/// Owns the live SurrealDB session shared by all repositories.
#[derive(Clone)]
pub struct DbManager {
    db: Surreal<Client>,
}

impl DbManager {
    /// Open a WebSocket session, authenticate as root, and select the
    /// configured namespace and database.
    pub async fn connect(config: &DbConfig) -> Result<Self, surrealdb::Error> {
        info!(
            url = %config.url,
            namespace = %config.namespace,
            database = %config.database,
            "Connecting to SurrealDB"
        );

        let db = Surreal::new::<Ws>(&config.url).await?;

        db.signin(Root {
            username: config.username.clone(),
            password: config.password.clone(),
        })
        .await?;

        db.use_ns(&config.namespace)
            .use_db(&config.database)
            .await?;

        Ok(Self { db })
    }

    /// Bring the database up to date: apply pending schema migrations,
    /// then seed the module catalog. Both steps are idempotent, so this
    /// runs unconditionally on every startup.
    pub async fn initialize(&self) -> TesseraResult<()> {
        run_migrations(&self.db).await?;
        seed_module_catalog(&self.db).await?;

        info!("Database schema and module catalog ready");

        Ok(())
    }

    /// Returns a reference to the underlying SurrealDB client.
    pub fn client(&self) -> &Surreal<Client> {
        &self.db
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_targets_local_instance() {
        let config = DbConfig::default();
        assert_eq!(config.url, "127.0.0.1:8000");
        assert_eq!(config.namespace, "tessera");
        assert_eq!(config.database, "main");
    }

    #[test]
    fn from_env_keeps_defaults_when_unset() {
        // The TESSERA_DB_* variables are not set under test.
        let config = DbConfig::from_env();
        let defaults = DbConfig::default();
        assert_eq!(config.namespace, defaults.namespace);
        assert_eq!(config.database, defaults.database);
    }
}
