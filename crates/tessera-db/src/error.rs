//! Database-specific error types and conversions.

use tessera_core::error::TesseraError;

/// Database-layer error type.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("SurrealDB error: {0}")]
    Surreal(#[from] surrealdb::Error),

    #[error("Migration failed: {0}")]
    Migration(String),

    #[error("Record not found: {entity} with key {key}")]
    NotFound { entity: String, key: String },

    #[error("Failed to decode record: {0}")]
    Decode(String),
}

impl From<DbError> for TesseraError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, key } => TesseraError::NotFound { entity, key },
            other => TesseraError::Database(other.to_string()),
        }
    }
}
