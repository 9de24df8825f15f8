//! Domain models for the Tessera platform.
//!
//! These are the core types shared across all crates.

pub mod company;
pub mod mapper;
pub mod membership;
pub mod menu;
pub mod module;
pub mod role;
pub mod secret;
pub mod user;
