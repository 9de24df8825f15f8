//! Access-layer error types.

use tessera_core::error::TesseraError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AccessError {
    #[error("cryptography error: {0}")]
    Crypto(String),
}

impl From<AccessError> for TesseraError {
    fn from(err: AccessError) -> Self {
        match err {
            AccessError::Crypto(msg) => TesseraError::Internal(msg),
        }
    }
}
