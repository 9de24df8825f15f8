//! Module provisioning: granting modules to companies and seeding the
//! default navigation menus.

use tessera_core::error::{TesseraError, TesseraResult};
use tessera_core::keygen;
use tessera_core::models::company::Company;
use tessera_core::models::mapper::{CompanyModuleMapper, CreateMapper};
use tessera_core::models::menu::{CreateMenu, default_menu_set};
use tessera_core::models::module::ModuleKind;
use tessera_core::repository::{MapperRepository, MenuRepository, ModuleRepository};
use tracing::{debug, info};

/// Input for granting a module to a company.
#[derive(Debug, Clone, Default)]
pub struct AddModule {
    pub module_key: String,
    pub host: Option<String>,
    pub master: bool,
    pub directory: Option<String>,
    pub email: Option<String>,
}

/// Grants modules to companies and seeds their default menus.
pub struct ModuleProvisioner<MoR, MR, MeR> {
    modules: MoR,
    mappers: MR,
    menus: MeR,
}

impl<MoR, MR, MeR> ModuleProvisioner<MoR, MR, MeR>
where
    MoR: ModuleRepository,
    MR: MapperRepository,
    MeR: MenuRepository,
{
    pub fn new(modules: MoR, mappers: MR, menus: MeR) -> Self {
        Self {
            modules,
            mappers,
            menus,
        }
    }

    /// Grant a module to a company: creates the mapper (duplicate
    /// module or host conflicts fail), then seeds the default menu set
    /// for the module's kind.
    ///
    /// The mapper is created live only when the company is active, so
    /// provisioning a suspended tenant never exposes a host.
    pub async fn add_module(
        &self,
        company: &Company,
        input: AddModule,
    ) -> TesseraResult<CompanyModuleMapper> {
        let module = self.modules.get_by_key(&input.module_key).await?;

        let mapper = self
            .mappers
            .create(CreateMapper {
                module_mapper_key: keygen::entity_key(),
                company_key: company.company_key.clone(),
                module_key: module.module_key.clone(),
                host: input.host,
                live: company.active,
                master: input.master,
                directory: input.directory,
                email: input.email,
                colors: None,
            })
            .await?;

        info!(
            company_key = %company.company_key,
            module_mapper_key = %mapper.module_mapper_key,
            kind = module.kind.as_str(),
            "Module granted to company"
        );

        self.provision_default_menus(company, &mapper, module.kind)
            .await?;

        Ok(mapper)
    }

    /// Revoke a company's module by archiving its mapper.
    pub async fn remove_module(&self, company: &Company, module_key: &str) -> TesseraResult<()> {
        let mapper = self
            .mappers
            .find_by_company_and_module(&company.company_key, module_key)
            .await?
            .ok_or_else(|| TesseraError::ModuleNotProvisioned {
                message: "Selected module not found for your company".into(),
            })?;

        self.mappers.archive(&mapper.module_mapper_key).await?;
        info!(
            company_key = %company.company_key,
            module_mapper_key = %mapper.module_mapper_key,
            "Module removed from company"
        );

        Ok(())
    }

    /// Seed the default menu set for a freshly granted module.
    ///
    /// Specialized sets (Education, Journal, JournalIndex) extend the
    /// company's website navigation, so they attach to the website
    /// mapper; when the company has no website module this is a silent
    /// no-op. The generic set attaches to the new mapper itself.
    /// Creation is idempotent per (mapper, menu_type).
    pub async fn provision_default_menus(
        &self,
        company: &Company,
        new_mapper: &CompanyModuleMapper,
        kind: ModuleKind,
    ) -> TesseraResult<()> {
        let target_key = match kind {
            ModuleKind::Education | ModuleKind::Journal | ModuleKind::JournalIndex => {
                match self.find_website_mapper(company).await? {
                    Some(website) => website.module_mapper_key,
                    None => {
                        debug!(
                            company_key = %company.company_key,
                            kind = kind.as_str(),
                            "No website module; skipping menu provisioning"
                        );
                        return Ok(());
                    }
                }
            }
            ModuleKind::Website | ModuleKind::Review => new_mapper.module_mapper_key.clone(),
        };

        let mut created = 0u32;
        for seed in default_menu_set(kind) {
            let fresh = self
                .menus
                .create_if_absent(CreateMenu {
                    menu_key: keygen::entity_key(),
                    module_mapper_key: target_key.clone(),
                    name: seed.menu_type.to_string(),
                    menu_type: seed.menu_type.to_string(),
                    route_name: seed.route_name.to_string(),
                    position: seed.position,
                    main_menu: true,
                    footer_menu: true,
                    home_page: true,
                    public_menu: true,
                })
                .await?;
            if fresh {
                created += 1;
            }
        }

        debug!(
            module_mapper_key = %target_key,
            kind = kind.as_str(),
            created,
            "Default menus provisioned"
        );

        Ok(())
    }

    async fn find_website_mapper(
        &self,
        company: &Company,
    ) -> TesseraResult<Option<CompanyModuleMapper>> {
        let Some(website) = self.modules.find_by_kind(ModuleKind::Website).await? else {
            return Ok(None);
        };

        self.mappers
            .find_by_company_and_module(&company.company_key, &website.module_key)
            .await
    }
}
