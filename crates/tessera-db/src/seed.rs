//! Module catalog seeding.
//!
//! The catalog is fixed reference data: one entry per module kind.
//! Seeding is idempotent and runs at every startup after migrations.

use surrealdb::{Connection, Surreal};
use tessera_core::error::TesseraResult;
use tessera_core::keygen;
use tessera_core::models::module::{CreateModule, ModuleKind};
use tessera_core::repository::ModuleRepository;
use tracing::info;

use crate::repository::SurrealModuleRepository;

fn catalog_entry(kind: ModuleKind) -> (&'static str, &'static str) {
    match kind {
        ModuleKind::Website => ("Website", "Public website and content management"),
        ModuleKind::Education => ("Education", "Alumni, programs and facilities"),
        ModuleKind::Journal => ("Journal", "Research journal publishing"),
        ModuleKind::JournalIndex => ("Journal Index", "Research journal indexing"),
        ModuleKind::Review => ("Review and Submission", "Manuscript review workflow"),
    }
}

/// Ensure every module kind has a catalog entry. Existing entries are
/// left untouched.
pub async fn seed_module_catalog<C: Connection>(db: &Surreal<C>) -> TesseraResult<()> {
    let modules = SurrealModuleRepository::new(db.clone());

    for kind in ModuleKind::all() {
        if modules.find_by_kind(kind).await?.is_some() {
            continue;
        }

        let (name, description) = catalog_entry(kind);
        let module = modules
            .create(CreateModule {
                module_key: keygen::entity_key(),
                name: name.to_string(),
                description: Some(description.to_string()),
                kind,
            })
            .await?;

        info!(
            module_key = %module.module_key,
            kind = kind.as_str(),
            "Seeded module catalog entry"
        );
    }

    Ok(())
}
