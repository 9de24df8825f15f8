//! Tessera Access — the functional kernel of the platform.
//!
//! This crate provides:
//! - Tenant resolution by request host ([`TenantResolver`])
//! - Module-scoped access gating ([`AccessGate`])
//! - Company lifecycle management ([`CompanyService`])
//! - Module provisioning with default menus ([`ModuleProvisioner`])
//! - User-company-role assignment ([`MembershipService`])
//! - Role administration ([`RoleAdminService`])
//!
//! Everything is generic over the `tessera-core` repository traits, so
//! the kernel carries no database dependency of its own.

pub mod assignment;
pub mod company;
pub mod config;
pub mod error;
pub mod gate;
pub mod password;
pub mod provisioner;
pub mod resolver;
pub mod roles;

pub use assignment::MembershipService;
pub use company::CompanyService;
pub use config::AccessConfig;
pub use error::AccessError;
pub use gate::{AccessGate, Capability, ModuleAccess, PublicAccess};
pub use provisioner::ModuleProvisioner;
pub use resolver::{ResolvedHost, TenantResolver};
pub use roles::RoleAdminService;
