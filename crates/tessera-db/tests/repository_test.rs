//! Integration tests for company, module and mapper repository
//! implementations using in-memory SurrealDB.

use surrealdb::Surreal;
use surrealdb::engine::local::Mem;
use tessera_core::error::TesseraError;
use tessera_core::keygen;
use tessera_core::models::company::{CreateCompany, UpdateCompany};
use tessera_core::models::mapper::{CreateMapper, DEFAULT_COLORS_JSON};
use tessera_core::models::module::ModuleKind;
use tessera_core::repository::{
    CompanyRepository, MapperRepository, ModuleRepository, Pagination,
};
use tessera_db::repository::{
    SurrealCompanyRepository, SurrealMapperRepository, SurrealModuleRepository,
};

/// Helper: spin up in-memory DB and run migrations.
async fn setup() -> Surreal<surrealdb::engine::local::Db> {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    tessera_db::run_migrations(&db).await.unwrap();
    db
}

fn new_company(name: &str, slug: &str) -> CreateCompany {
    CreateCompany {
        company_key: keygen::entity_key(),
        name: name.into(),
        slug: slug.into(),
        description: None,
        address: None,
        city: None,
        country: Some("NL".into()),
        time_zone: None,
        lang: Some("en".into()),
        billing_id: None,
        active: true,
    }
}

fn new_mapper(company_key: &str, module_key: &str, host: Option<&str>) -> CreateMapper {
    CreateMapper {
        module_mapper_key: keygen::entity_key(),
        company_key: company_key.into(),
        module_key: module_key.into(),
        host: host.map(Into::into),
        live: true,
        master: false,
        directory: None,
        email: None,
        colors: None,
    }
}

// -----------------------------------------------------------------------
// Company tests
// -----------------------------------------------------------------------

#[tokio::test]
async fn create_and_get_company() {
    let db = setup().await;
    let repo = SurrealCompanyRepository::new(db);

    let company = repo
        .create(new_company("ACME University", "acme-university"))
        .await
        .unwrap();

    assert_eq!(company.name, "ACME University");
    assert!(company.active);
    assert!(!company.archived);

    let fetched = repo.get_by_key(&company.company_key).await.unwrap();
    assert_eq!(fetched.company_key, company.company_key);
    assert_eq!(fetched.name, company.name);
    assert_eq!(fetched.slug, "acme-university");
}

#[tokio::test]
async fn duplicate_company_name_rejected() {
    let db = setup().await;
    let repo = SurrealCompanyRepository::new(db);

    repo.create(new_company("Twice Inc", "twice-a"))
        .await
        .unwrap();

    let err = repo
        .create(new_company("Twice Inc", "twice-b"))
        .await
        .unwrap_err();

    match err {
        TesseraError::AlreadyExists { message } => {
            assert_eq!(message, "This name is already used");
        }
        other => panic!("expected AlreadyExists, got {other:?}"),
    }
}

#[tokio::test]
async fn update_company_fields() {
    let db = setup().await;
    let repo = SurrealCompanyRepository::new(db);

    let company = repo
        .create(new_company("Before Ltd", "before-ltd"))
        .await
        .unwrap();

    let updated = repo
        .update(
            &company.company_key,
            UpdateCompany {
                name: Some("After Ltd".into()),
                city: Some("Rotterdam".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.name, "After Ltd");
    assert_eq!(updated.city.as_deref(), Some("Rotterdam"));
    assert_eq!(updated.slug, "before-ltd"); // unchanged
    assert!(updated.updated_at >= company.updated_at);
}

#[tokio::test]
async fn archived_company_excluded_from_list() {
    let db = setup().await;
    let repo = SurrealCompanyRepository::new(db);

    let keep = repo.create(new_company("Keeper", "keeper")).await.unwrap();
    let gone = repo.create(new_company("Goner", "goner")).await.unwrap();

    repo.archive(&gone.company_key).await.unwrap();

    let page = repo.list(Pagination::default()).await.unwrap();
    assert_eq!(page.total, 1);
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].company_key, keep.company_key);
}

// -----------------------------------------------------------------------
// Module catalog tests
// -----------------------------------------------------------------------

#[tokio::test]
async fn module_catalog_seed_is_idempotent() {
    let db = setup().await;

    tessera_db::seed_module_catalog(&db).await.unwrap();
    tessera_db::seed_module_catalog(&db).await.unwrap();

    let repo = SurrealModuleRepository::new(db);
    let modules = repo.list_active().await.unwrap();
    assert_eq!(modules.len(), 5);

    for kind in ModuleKind::all() {
        assert!(
            repo.find_by_kind(kind).await.unwrap().is_some(),
            "missing catalog entry for {}",
            kind.as_str()
        );
    }
}

#[tokio::test]
async fn archived_module_invisible_by_kind() {
    let db = setup().await;
    tessera_db::seed_module_catalog(&db).await.unwrap();
    let repo = SurrealModuleRepository::new(db);

    let journal = repo
        .find_by_kind(ModuleKind::Journal)
        .await
        .unwrap()
        .unwrap();
    repo.archive(&journal.module_key).await.unwrap();

    assert!(repo.find_by_kind(ModuleKind::Journal).await.unwrap().is_none());
    assert!(repo.get_by_key(&journal.module_key).await.is_err());
}

// -----------------------------------------------------------------------
// Mapper tests
// -----------------------------------------------------------------------

#[tokio::test]
async fn mapper_gets_default_colors_and_header() {
    let db = setup().await;
    tessera_db::seed_module_catalog(&db).await.unwrap();

    let companies = SurrealCompanyRepository::new(db.clone());
    let modules = SurrealModuleRepository::new(db.clone());
    let mappers = SurrealMapperRepository::new(db);

    let company = companies
        .create(new_company("Colorful", "colorful"))
        .await
        .unwrap();
    let website = modules
        .find_by_kind(ModuleKind::Website)
        .await
        .unwrap()
        .unwrap();

    let mapper = mappers
        .create(new_mapper(
            &company.company_key,
            &website.module_key,
            Some("colorful.example.org"),
        ))
        .await
        .unwrap();

    assert_eq!(mapper.colors, DEFAULT_COLORS_JSON);
    assert_eq!(mapper.header, "1");
    assert!(mapper.live);
    assert!(!mapper.archived);
}

#[tokio::test]
async fn duplicate_module_for_company_rejected() {
    let db = setup().await;
    tessera_db::seed_module_catalog(&db).await.unwrap();

    let companies = SurrealCompanyRepository::new(db.clone());
    let modules = SurrealModuleRepository::new(db.clone());
    let mappers = SurrealMapperRepository::new(db);

    let company = companies
        .create(new_company("Dup Modules", "dup-modules"))
        .await
        .unwrap();
    let website = modules
        .find_by_kind(ModuleKind::Website)
        .await
        .unwrap()
        .unwrap();

    mappers
        .create(new_mapper(&company.company_key, &website.module_key, None))
        .await
        .unwrap();

    let err = mappers
        .create(new_mapper(&company.company_key, &website.module_key, None))
        .await
        .unwrap_err();

    match err {
        TesseraError::AlreadyExists { message } => {
            assert_eq!(message, "Module already exists for this company");
        }
        other => panic!("expected AlreadyExists, got {other:?}"),
    }
}

#[tokio::test]
async fn host_conflict_between_live_mappers_rejected() {
    let db = setup().await;
    tessera_db::seed_module_catalog(&db).await.unwrap();

    let companies = SurrealCompanyRepository::new(db.clone());
    let modules = SurrealModuleRepository::new(db.clone());
    let mappers = SurrealMapperRepository::new(db);

    let first = companies
        .create(new_company("Host One", "host-one"))
        .await
        .unwrap();
    let second = companies
        .create(new_company("Host Two", "host-two"))
        .await
        .unwrap();
    let website = modules
        .find_by_kind(ModuleKind::Website)
        .await
        .unwrap()
        .unwrap();

    mappers
        .create(new_mapper(
            &first.company_key,
            &website.module_key,
            Some("shared.example.org"),
        ))
        .await
        .unwrap();

    let err = mappers
        .create(new_mapper(
            &second.company_key,
            &website.module_key,
            Some("shared.example.org"),
        ))
        .await
        .unwrap_err();

    assert!(matches!(err, TesseraError::AlreadyExists { .. }));
}

#[tokio::test]
async fn deactivating_company_suspends_all_mappers() {
    let db = setup().await;
    tessera_db::seed_module_catalog(&db).await.unwrap();

    let companies = SurrealCompanyRepository::new(db.clone());
    let modules = SurrealModuleRepository::new(db.clone());
    let mappers = SurrealMapperRepository::new(db);

    let company = companies
        .create(new_company("Suspended U", "suspended-u"))
        .await
        .unwrap();
    let website = modules
        .find_by_kind(ModuleKind::Website)
        .await
        .unwrap()
        .unwrap();
    let journal = modules
        .find_by_kind(ModuleKind::Journal)
        .await
        .unwrap()
        .unwrap();

    mappers
        .create(new_mapper(
            &company.company_key,
            &website.module_key,
            Some("suspended.example.org"),
        ))
        .await
        .unwrap();
    mappers
        .create(new_mapper(&company.company_key, &journal.module_key, None))
        .await
        .unwrap();

    // Host resolves while the company is active.
    assert!(
        mappers
            .find_live_by_host("suspended.example.org")
            .await
            .unwrap()
            .is_some()
    );

    let company = companies
        .set_active(&company.company_key, false)
        .await
        .unwrap();
    assert!(!company.active);

    // Every mapper is suspended, so host resolution stops.
    assert!(
        mappers
            .find_live_by_host("suspended.example.org")
            .await
            .unwrap()
            .is_none()
    );
    assert!(
        mappers
            .list_by_company(&company.company_key)
            .await
            .unwrap()
            .is_empty(),
        "suspended mappers are archived and drop out of listings"
    );

    // Reactivating restores every mapper in one step.
    let company = companies
        .set_active(&company.company_key, true)
        .await
        .unwrap();
    assert!(company.active);

    let restored = mappers
        .list_by_company(&company.company_key)
        .await
        .unwrap();
    assert_eq!(restored.len(), 2);
    assert!(restored.iter().all(|m| m.live && !m.archived));
    assert!(
        mappers
            .find_live_by_host("suspended.example.org")
            .await
            .unwrap()
            .is_some()
    );
}
