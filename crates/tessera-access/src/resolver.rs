//! Tenant-module resolution by request host.
//!
//! Every tenant-scoped request starts here: the host names exactly one
//! live mapper, the mapper names the owning company, and an optional
//! `moduleKey` parameter narrows the request to one of the company's
//! provisioned modules.

use chrono::{Duration, Utc};
use tessera_core::context::{PARAM_SECRET_KEY, RequestContext};
use tessera_core::error::{TesseraError, TesseraResult};
use tessera_core::models::company::Company;
use tessera_core::models::mapper::CompanyModuleMapper;
use tessera_core::models::module::ModuleKind;
use tessera_core::models::secret::{JOURNAL_INDEX_APPLICATION_PATH, SecretLink};
use tessera_core::repository::{
    CompanyRepository, MapperRepository, ModuleRepository, SecretLinkRepository,
};
use tracing::debug;

use crate::config::AccessConfig;

/// The tenant a request host resolved to.
#[derive(Debug, Clone)]
pub struct ResolvedHost {
    pub company: Company,
    /// The live mapper serving the host.
    pub mapper: CompanyModuleMapper,
}

fn not_provisioned_message(kind: ModuleKind) -> &'static str {
    match kind {
        ModuleKind::Journal => "Your company is not registered for research journal module",
        ModuleKind::JournalIndex => {
            "Your company is not registered for research journal indexing module"
        }
        _ => "Selected module not found for your company",
    }
}

/// Resolves request hosts to tenants and validates secret links.
///
/// Generic over repository implementations so resolution carries no
/// database dependency.
pub struct TenantResolver<CR, MR, MoR, SR> {
    companies: CR,
    mappers: MR,
    modules: MoR,
    secrets: SR,
    config: AccessConfig,
}

impl<CR, MR, MoR, SR> TenantResolver<CR, MR, MoR, SR>
where
    CR: CompanyRepository,
    MR: MapperRepository,
    MoR: ModuleRepository,
    SR: SecretLinkRepository,
{
    pub fn new(companies: CR, mappers: MR, modules: MoR, secrets: SR, config: AccessConfig) -> Self {
        Self {
            companies,
            mappers,
            modules,
            secrets,
            config,
        }
    }

    /// Resolve the request host to its company and mapper.
    ///
    /// A host with no live, non-archived mapper fails with
    /// `HostNotFound` (billing suspension also lands here, because
    /// suspension clears the mapper's `live` flag). A resolvable host
    /// whose company is missing or inactive fails with
    /// `CompanyInactive`.
    pub async fn resolve_by_host(&self, ctx: &RequestContext) -> TesseraResult<ResolvedHost> {
        let host = ctx.host().ok_or(TesseraError::HostNotFound)?;

        let mapper = self
            .mappers
            .find_live_by_host(host)
            .await?
            .ok_or_else(|| {
                debug!(host, "No live mapper for host");
                TesseraError::HostNotFound
            })?;

        let company = match self.companies.get_by_key(&mapper.company_key).await {
            Ok(company) => company,
            Err(TesseraError::NotFound { .. }) => return Err(TesseraError::CompanyInactive),
            Err(e) => return Err(e),
        };

        if !company.active || company.archived {
            debug!(host, company_key = %company.company_key, "Company inactive");
            return Err(TesseraError::CompanyInactive);
        }

        Ok(ResolvedHost { company, mapper })
    }

    /// Narrow a resolved host to one of the company's modules.
    ///
    /// `None` returns the host-resolved mapper unchanged. A key naming
    /// an unknown or archived catalog module fails with `NotFound`;
    /// one the company has no mapping for fails with
    /// `ModuleNotProvisioned`.
    pub async fn resolve_module_for_company(
        &self,
        resolved: &ResolvedHost,
        module_key: Option<&str>,
    ) -> TesseraResult<CompanyModuleMapper> {
        let Some(module_key) = module_key else {
            return Ok(resolved.mapper.clone());
        };

        let module = self.modules.get_by_key(module_key).await?;

        self.mappers
            .find_by_company_and_module(&resolved.company.company_key, &module.module_key)
            .await?
            .ok_or_else(|| TesseraError::ModuleNotProvisioned {
                message: "Selected module not found for your company".into(),
            })
    }

    /// Resolve the company's mapper for a module kind. Used by feature
    /// gating where the module is fixed by the feature, not chosen by
    /// the client.
    ///
    /// A kind absent from the catalog is a plain `NotFound`; the
    /// per-kind "not registered" message is reserved for a company
    /// that lacks a mapping for an existing module.
    pub async fn resolve_module_by_kind(
        &self,
        company: &Company,
        kind: ModuleKind,
    ) -> TesseraResult<CompanyModuleMapper> {
        let module = self.modules.find_by_kind(kind).await?.ok_or_else(|| {
            TesseraError::NotFound {
                entity: "module".into(),
                key: kind.as_str().into(),
            }
        })?;

        self.mappers
            .find_by_company_and_module(&company.company_key, &module.module_key)
            .await?
            .ok_or_else(|| TesseraError::ModuleNotProvisioned {
                message: not_provisioned_message(kind).into(),
            })
    }

    /// Validate the secret link named by the request, if any.
    ///
    /// Expiry is checked lazily: a record older than the configured
    /// TTL is deleted here and treated as absent. A valid link is
    /// returned unconsumed.
    pub async fn validate_secret_link(
        &self,
        ctx: &RequestContext,
    ) -> TesseraResult<Option<SecretLink>> {
        let Some(secret_key) = ctx.parameter(PARAM_SECRET_KEY) else {
            return Ok(None);
        };

        let Some(secret) = self.secrets.find_by_key(secret_key).await? else {
            return Ok(None);
        };

        let age = Utc::now() - secret.created_at;
        if age > Duration::minutes(self.config.secret_link_ttl_mins) {
            debug!(path = %secret.path, "Deleting expired secret link");
            self.secrets.delete_by_key(&secret.secret_key).await?;
            return Ok(None);
        }

        Ok(Some(secret))
    }

    /// Validate a secret link scoped to one mapper's journal-index
    /// application form. A wrong-mapper or wrong-path secret is
    /// indistinguishable from no secret at all.
    pub async fn validate_secret_link_for_mapper(
        &self,
        ctx: &RequestContext,
        mapper: &CompanyModuleMapper,
    ) -> TesseraResult<Option<SecretLink>> {
        let Some(secret) = self.validate_secret_link(ctx).await? else {
            return Ok(None);
        };

        if secret.module_mapper_key.as_deref() != Some(mapper.module_mapper_key.as_str()) {
            return Ok(None);
        }
        if secret.path != JOURNAL_INDEX_APPLICATION_PATH {
            return Ok(None);
        }

        Ok(Some(secret))
    }
}
