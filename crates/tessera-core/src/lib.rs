//! Tessera Core — domain models, repository trait definitions, key
//! generation, and the shared error type for the multi-tenant
//! administration platform.
//!
//! This crate has no I/O dependencies; persistence lives in
//! `tessera-db` and the access/provisioning services in
//! `tessera-access`.

pub mod context;
pub mod error;
pub mod keygen;
pub mod models;
pub mod repository;

pub use context::{Principal, RequestContext};
pub use error::{TesseraError, TesseraResult};
