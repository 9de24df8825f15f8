//! SurrealDB implementations of the `tessera-core` repository traits.

mod company;
mod mapper;
mod membership;
mod menu;
mod module;
mod role;
mod secret;
mod user;

pub use company::SurrealCompanyRepository;
pub use mapper::SurrealMapperRepository;
pub use membership::SurrealMembershipRepository;
pub use menu::SurrealMenuRepository;
pub use module::SurrealModuleRepository;
pub use role::{SurrealCompanyRoleRepository, SurrealRoleRepository};
pub use secret::SurrealSecretLinkRepository;
pub use user::SurrealUserRepository;
