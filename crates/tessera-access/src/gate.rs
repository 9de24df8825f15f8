//! Module-scoped access gating.
//!
//! The gate is read-only: it resolves the tenant, narrows to the
//! requested module, and checks that a principal is present where one
//! is required. It never verifies credentials and never mutates state.

use tessera_core::context::{PARAM_MODULE_KEY, Principal, RequestContext};
use tessera_core::error::{TesseraError, TesseraResult};
use tessera_core::models::mapper::CompanyModuleMapper;
use tessera_core::repository::{
    CompanyRepository, MapperRepository, ModuleRepository, SecretLinkRepository,
};
use tracing::debug;

use crate::resolver::{ResolvedHost, TenantResolver};

/// Capability a gated request is exercised under. All capabilities
/// share one policy today; the parameter keeps the call sites honest
/// about intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    Member,
    Author,
    Reviewer,
}

/// Result of an authenticated gate check.
#[derive(Debug, Clone)]
pub struct ModuleAccess {
    pub resolved: ResolvedHost,
    /// The mapper the request is scoped to: the `moduleKey` parameter
    /// when present, the host mapper otherwise.
    pub module_mapper: CompanyModuleMapper,
    pub principal: Principal,
}

/// Result of a public (unauthenticated) gate check.
#[derive(Debug, Clone)]
pub struct PublicAccess {
    pub resolved: ResolvedHost,
    pub module_mapper: CompanyModuleMapper,
}

/// Access gate over a [`TenantResolver`].
pub struct AccessGate<CR, MR, MoR, SR> {
    resolver: TenantResolver<CR, MR, MoR, SR>,
}

impl<CR, MR, MoR, SR> AccessGate<CR, MR, MoR, SR>
where
    CR: CompanyRepository,
    MR: MapperRepository,
    MoR: ModuleRepository,
    SR: SecretLinkRepository,
{
    pub fn new(resolver: TenantResolver<CR, MR, MoR, SR>) -> Self {
        Self { resolver }
    }

    pub fn resolver(&self) -> &TenantResolver<CR, MR, MoR, SR> {
        &self.resolver
    }

    /// Gate a module-scoped request that requires an authenticated
    /// principal.
    pub async fn authenticate_module(&self, ctx: &RequestContext) -> TesseraResult<ModuleAccess> {
        let resolved = self.resolver.resolve_by_host(ctx).await?;

        let principal = ctx.principal().cloned().ok_or_else(|| {
            debug!(host = ctx.host(), "Request without principal");
            TesseraError::Unauthorized
        })?;

        let module_mapper = self
            .resolver
            .resolve_module_for_company(&resolved, ctx.parameter(PARAM_MODULE_KEY))
            .await?;

        Ok(ModuleAccess {
            resolved,
            module_mapper,
            principal,
        })
    }

    /// Gate a request under a named capability. The capability-
    /// specific policies are identical for now, so this delegates to
    /// [`authenticate_module`].
    pub async fn authenticate_as(
        &self,
        ctx: &RequestContext,
        capability: Capability,
    ) -> TesseraResult<ModuleAccess> {
        debug!(?capability, "Gating request");
        self.authenticate_module(ctx).await
    }

    /// Gate a public tenant-scoped request: host resolution and
    /// optional module narrowing, no principal required.
    pub async fn authenticate_user(&self, ctx: &RequestContext) -> TesseraResult<PublicAccess> {
        let resolved = self.resolver.resolve_by_host(ctx).await?;

        let module_mapper = self
            .resolver
            .resolve_module_for_company(&resolved, ctx.parameter(PARAM_MODULE_KEY))
            .await?;

        Ok(PublicAccess {
            resolved,
            module_mapper,
        })
    }
}
