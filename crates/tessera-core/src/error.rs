//! Error types for the Tessera platform.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TesseraError {
    /// No live, non-archived module mapping exists for the request
    /// host. Deliberately a 403, not a 404: billing suspension turns
    /// the mapper's `live` flag off, and a suspended tenant must be
    /// distinguishable from one that never existed.
    #[error("Website is currently unavailable due to non-payment.")]
    HostNotFound,

    /// The host resolved to a mapper whose owning company is not
    /// active. Guards against stale mapper rows.
    #[error("Your company is not active")]
    CompanyInactive,

    #[error("Entity not found: {entity} with key {key}")]
    NotFound { entity: String, key: String },

    /// The module exists in the catalog but the company has no
    /// non-archived mapping for it.
    #[error("{message}")]
    ModuleNotProvisioned { message: String },

    #[error("Unauthorized access!")]
    Unauthorized,

    /// Duplicate name/role/module-for-company. Carries the exact
    /// message the admin UI expects.
    #[error("{message}")]
    AlreadyExists { message: String },

    #[error("{message}")]
    InvariantViolation { message: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl TesseraError {
    /// HTTP status code this error maps to at the request boundary.
    pub fn http_status(&self) -> u16 {
        match self {
            TesseraError::HostNotFound => 403,
            TesseraError::CompanyInactive
            | TesseraError::NotFound { .. }
            | TesseraError::ModuleNotProvisioned { .. } => 404,
            TesseraError::Unauthorized => 401,
            TesseraError::AlreadyExists { .. }
            | TesseraError::InvariantViolation { .. }
            | TesseraError::Validation { .. } => 400,
            TesseraError::Database(_) | TesseraError::Internal(_) => 500,
        }
    }
}

pub type TesseraResult<T> = Result<T, TesseraError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suspended_host_is_forbidden_not_missing() {
        assert_eq!(TesseraError::HostNotFound.http_status(), 403);
        assert_eq!(
            TesseraError::NotFound {
                entity: "company".into(),
                key: "x".into()
            }
            .http_status(),
            404
        );
    }

    #[test]
    fn conflict_keeps_legacy_400() {
        let err = TesseraError::AlreadyExists {
            message: "This name is already used".into(),
        };
        assert_eq!(err.http_status(), 400);
        assert_eq!(err.to_string(), "This name is already used");
    }
}
