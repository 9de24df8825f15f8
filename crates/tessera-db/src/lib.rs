//! Tessera Database — SurrealDB connection management and repository
//! implementations.
//!
//! This crate provides:
//! - Connection management ([`DbManager`], [`DbConfig`])
//! - Schema initialization and migrations ([`run_migrations`])
//! - Catalog seeding ([`seed_module_catalog`])
//! - Error types ([`DbError`])
//! - SurrealDB implementations of every `tessera-core` repository
//!   trait

mod connection;
mod error;
pub mod repository;
mod schema;
mod seed;

pub use connection::{DbConfig, DbManager};
pub use error::DbError;
pub use schema::{run_migrations, schema_v1};
pub use seed::seed_module_catalog;
