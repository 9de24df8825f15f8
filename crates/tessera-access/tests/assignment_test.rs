//! Integration tests for user onboarding and user-company-role
//! assignment, using in-memory SurrealDB.

use surrealdb::Surreal;
use surrealdb::engine::local::Mem;
use tessera_access::company::NewCompany;
use tessera_access::provisioner::AddModule;
use tessera_access::{
    AccessConfig, CompanyService, MembershipService, ModuleProvisioner, RoleAdminService,
    password,
};
use tessera_core::models::company::Company;
use tessera_core::models::module::ModuleKind;
use tessera_core::models::role::{ROLE_COMPANY_ADMIN, ROLE_COMPANY_USER};
use tessera_core::repository::{
    MembershipRepository, ModuleRepository, RoleRepository, UserRepository,
};
use tessera_db::repository::{
    SurrealCompanyRepository, SurrealCompanyRoleRepository, SurrealMapperRepository,
    SurrealMembershipRepository, SurrealMenuRepository, SurrealModuleRepository,
    SurrealRoleRepository, SurrealUserRepository,
};

type Engine = surrealdb::engine::local::Db;
type Memberships = MembershipService<
    SurrealUserRepository<Engine>,
    SurrealMembershipRepository<Engine>,
    SurrealRoleRepository<Engine>,
    SurrealCompanyRoleRepository<Engine>,
    SurrealMapperRepository<Engine>,
>;

async fn setup() -> Surreal<Engine> {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    tessera_db::run_migrations(&db).await.unwrap();
    tessera_db::seed_module_catalog(&db).await.unwrap();
    db
}

fn memberships(db: &Surreal<Engine>) -> Memberships {
    MembershipService::new(
        SurrealUserRepository::new(db.clone()),
        SurrealMembershipRepository::new(db.clone()),
        SurrealRoleRepository::new(db.clone()),
        SurrealCompanyRoleRepository::new(db.clone()),
        SurrealMapperRepository::new(db.clone()),
        AccessConfig::default(),
    )
}

fn role_admin(
    db: &Surreal<Engine>,
) -> RoleAdminService<SurrealRoleRepository<Engine>, SurrealCompanyRoleRepository<Engine>> {
    RoleAdminService::new(
        SurrealRoleRepository::new(db.clone()),
        SurrealCompanyRoleRepository::new(db.clone()),
    )
}

async fn active_company(db: &Surreal<Engine>, name: &str) -> Company {
    CompanyService::new(SurrealCompanyRepository::new(db.clone()))
        .create(NewCompany {
            name: name.into(),
            active: true,
            ..Default::default()
        })
        .await
        .unwrap()
}

/// Helper: a role enabled for the given company; returns the
/// company-role grant key.
async fn enabled_role(db: &Surreal<Engine>, company: &Company, discriminator: &str) -> String {
    let admin = role_admin(db);
    let roles = SurrealRoleRepository::new(db.clone());

    let role = match roles.find_by_discriminator(discriminator).await.unwrap() {
        Some(role) => role,
        None => admin
            .create_role(discriminator, discriminator, true, None)
            .await
            .unwrap(),
    };

    admin
        .enable_role_for_company(&company.company_key, &role.role_key)
        .await
        .unwrap()
        .company_role_key
}

/// Helper: a website mapper for the company, returned by key.
async fn website_mapper_key(db: &Surreal<Engine>, company: &Company, host: &str) -> String {
    let modules = SurrealModuleRepository::new(db.clone());
    let website = modules
        .find_by_kind(ModuleKind::Website)
        .await
        .unwrap()
        .unwrap();

    ModuleProvisioner::new(
        modules,
        SurrealMapperRepository::new(db.clone()),
        SurrealMenuRepository::new(db.clone()),
    )
    .add_module(
        company,
        AddModule {
            module_key: website.module_key,
            host: Some(host.into()),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .module_mapper_key
}

// -----------------------------------------------------------------------
// Onboarding
// -----------------------------------------------------------------------

#[tokio::test]
async fn onboarded_user_gets_verifiable_temporary_password() {
    let db = setup().await;
    let service = memberships(&db);

    let onboarded = service
        .onboard_user("fresh@example.org", "Fresh User")
        .await
        .unwrap();

    assert_eq!(onboarded.temporary_password.len(), 8);
    assert!(onboarded.user.is_password_temporary);
    assert!(
        password::verify_password(
            &onboarded.temporary_password,
            &onboarded.user.password_hash,
            None,
        )
        .unwrap()
    );
}

// -----------------------------------------------------------------------
// Assignment
// -----------------------------------------------------------------------

#[tokio::test]
async fn first_membership_is_active_and_sets_roles() {
    let db = setup().await;
    let service = memberships(&db);

    let company = active_company(&db, "First Co").await;
    let grant = enabled_role(&db, &company, ROLE_COMPANY_ADMIN).await;
    let mapper_key = website_mapper_key(&db, &company, "first.example.org").await;
    let user = service
        .onboard_user("first@example.org", "First")
        .await
        .unwrap()
        .user;

    let membership = service
        .add_user_to_company(
            &company.company_key,
            &grant,
            &user.user_key,
            &[mapper_key.clone()],
        )
        .await
        .unwrap();

    assert!(membership.active);

    let users = SurrealUserRepository::new(db.clone());
    let fetched = users.get_by_key(&user.user_key).await.unwrap();
    assert_eq!(fetched.roles, vec![ROLE_COMPANY_ADMIN.to_string()]);

    let grants = SurrealMembershipRepository::new(db.clone())
        .list_grants(&company.company_key, &user.user_key)
        .await
        .unwrap();
    assert_eq!(grants.len(), 1);
    assert_eq!(grants[0].module_mapper_key, mapper_key);
}

#[tokio::test]
async fn second_membership_stays_inactive_and_keeps_roles() {
    let db = setup().await;
    let service = memberships(&db);

    let first = active_company(&db, "Primary Co").await;
    let second = active_company(&db, "Secondary Co").await;
    let first_grant = enabled_role(&db, &first, ROLE_COMPANY_ADMIN).await;
    let second_grant = enabled_role(&db, &second, ROLE_COMPANY_USER).await;
    let user = service
        .onboard_user("two@example.org", "Two Companies")
        .await
        .unwrap()
        .user;

    service
        .add_user_to_company(&first.company_key, &first_grant, &user.user_key, &[])
        .await
        .unwrap();

    let membership = service
        .add_user_to_company(&second.company_key, &second_grant, &user.user_key, &[])
        .await
        .unwrap();

    assert!(!membership.active, "second membership must stay inactive");

    // The cached role set still reflects the active membership.
    let fetched = SurrealUserRepository::new(db.clone())
        .get_by_key(&user.user_key)
        .await
        .unwrap();
    assert_eq!(fetched.roles, vec![ROLE_COMPANY_ADMIN.to_string()]);
}

#[tokio::test]
async fn inactive_membership_still_gets_active_module_grants() {
    let db = setup().await;
    let service = memberships(&db);

    let home = active_company(&db, "Home Co").await;
    let side = active_company(&db, "Side Co").await;
    let home_grant = enabled_role(&db, &home, ROLE_COMPANY_ADMIN).await;
    let side_grant = enabled_role(&db, &side, ROLE_COMPANY_ADMIN).await;
    let side_mapper = website_mapper_key(&db, &side, "side.example.org").await;
    let user = service
        .onboard_user("side@example.org", "Sider")
        .await
        .unwrap()
        .user;

    service
        .add_user_to_company(&home.company_key, &home_grant, &user.user_key, &[])
        .await
        .unwrap();

    let membership = service
        .add_user_to_company(
            &side.company_key,
            &side_grant,
            &user.user_key,
            &[side_mapper.clone()],
        )
        .await
        .unwrap();
    assert!(!membership.active);

    // Grant rows carry their own flag and are always written active;
    // the inactive membership is what withholds visibility.
    let grants = SurrealMembershipRepository::new(db.clone())
        .list_grants(&side.company_key, &user.user_key)
        .await
        .unwrap();
    assert_eq!(grants.len(), 1);
    assert_eq!(grants[0].module_mapper_key, side_mapper);
    assert!(grants[0].active);
}

#[tokio::test]
async fn unresolved_module_keys_are_skipped() {
    let db = setup().await;
    let service = memberships(&db);

    let company = active_company(&db, "Skipper Co").await;
    let grant = enabled_role(&db, &company, ROLE_COMPANY_ADMIN).await;
    let mapper_key = website_mapper_key(&db, &company, "skipper.example.org").await;
    let user = service
        .onboard_user("skip@example.org", "Skipper")
        .await
        .unwrap()
        .user;

    service
        .add_user_to_company(
            &company.company_key,
            &grant,
            &user.user_key,
            &[mapper_key.clone(), "no-such-mapper".into()],
        )
        .await
        .unwrap();

    let grants = SurrealMembershipRepository::new(db.clone())
        .list_grants(&company.company_key, &user.user_key)
        .await
        .unwrap();
    assert_eq!(grants.len(), 1);
    assert_eq!(grants[0].module_mapper_key, mapper_key);
}

// -----------------------------------------------------------------------
// Role replacement
// -----------------------------------------------------------------------

#[tokio::test]
async fn demotion_drops_grants_and_recomputes_roles() {
    let db = setup().await;
    let service = memberships(&db);

    let company = active_company(&db, "Demote Co").await;
    let admin_grant = enabled_role(&db, &company, ROLE_COMPANY_ADMIN).await;
    let user_grant = enabled_role(&db, &company, ROLE_COMPANY_USER).await;
    let mapper_key = website_mapper_key(&db, &company, "demote.example.org").await;
    let user = service
        .onboard_user("demote@example.org", "Demotee")
        .await
        .unwrap()
        .user;

    service
        .add_user_to_company(
            &company.company_key,
            &admin_grant,
            &user.user_key,
            &[mapper_key.clone()],
        )
        .await
        .unwrap();

    // Non-admin roles carry no module grants, even when keys are
    // supplied.
    let changed = service
        .update_user_company_role(
            &company.company_key,
            &user_grant,
            &user.user_key,
            &[mapper_key.clone()],
        )
        .await
        .unwrap();
    assert!(changed);

    let grants = SurrealMembershipRepository::new(db.clone())
        .list_grants(&company.company_key, &user.user_key)
        .await
        .unwrap();
    assert!(grants.is_empty());

    let fetched = SurrealUserRepository::new(db.clone())
        .get_by_key(&user.user_key)
        .await
        .unwrap();
    assert_eq!(fetched.roles, vec![ROLE_COMPANY_USER.to_string()]);

    // Promotion back to admin restores the grants.
    let changed = service
        .update_user_company_role(
            &company.company_key,
            &admin_grant,
            &user.user_key,
            &[mapper_key.clone()],
        )
        .await
        .unwrap();
    assert!(changed);

    let grants = SurrealMembershipRepository::new(db.clone())
        .list_grants(&company.company_key, &user.user_key)
        .await
        .unwrap();
    assert_eq!(grants.len(), 1);
}

#[tokio::test]
async fn role_update_without_membership_reports_false() {
    let db = setup().await;
    let service = memberships(&db);

    let company = active_company(&db, "Nobody Co").await;
    let grant = enabled_role(&db, &company, ROLE_COMPANY_USER).await;
    let user = service
        .onboard_user("nobody@example.org", "Nobody")
        .await
        .unwrap()
        .user;

    let changed = service
        .update_user_company_role(&company.company_key, &grant, &user.user_key, &[])
        .await
        .unwrap();
    assert!(!changed);

    let removed = service
        .delete_user_from_company(&company.company_key, &user.user_key)
        .await
        .unwrap();
    assert!(!removed);
}

// -----------------------------------------------------------------------
// Removal
// -----------------------------------------------------------------------

#[tokio::test]
async fn deleting_only_membership_deletes_user() {
    let db = setup().await;
    let service = memberships(&db);

    let company = active_company(&db, "Sole Co").await;
    let grant = enabled_role(&db, &company, ROLE_COMPANY_USER).await;
    let user = service
        .onboard_user("sole@example.org", "Sole")
        .await
        .unwrap()
        .user;

    service
        .add_user_to_company(&company.company_key, &grant, &user.user_key, &[])
        .await
        .unwrap();

    let removed = service
        .delete_user_from_company(&company.company_key, &user.user_key)
        .await
        .unwrap();
    assert!(removed);

    // No membership left anywhere: the user record itself goes.
    assert!(
        SurrealUserRepository::new(db.clone())
            .get_by_key(&user.user_key)
            .await
            .is_err()
    );
}

#[tokio::test]
async fn deleting_inactive_membership_keeps_user_with_active_roles() {
    let db = setup().await;
    let service = memberships(&db);

    let primary = active_company(&db, "Keep Primary").await;
    let secondary = active_company(&db, "Drop Secondary").await;
    let primary_grant = enabled_role(&db, &primary, ROLE_COMPANY_ADMIN).await;
    let secondary_grant = enabled_role(&db, &secondary, ROLE_COMPANY_USER).await;
    let user = service
        .onboard_user("keep@example.org", "Keeper")
        .await
        .unwrap()
        .user;

    service
        .add_user_to_company(&primary.company_key, &primary_grant, &user.user_key, &[])
        .await
        .unwrap();
    service
        .add_user_to_company(&secondary.company_key, &secondary_grant, &user.user_key, &[])
        .await
        .unwrap();

    let removed = service
        .delete_user_from_company(&secondary.company_key, &user.user_key)
        .await
        .unwrap();
    assert!(removed);

    // The user survives; the role set follows the remaining active
    // membership.
    let fetched = SurrealUserRepository::new(db.clone())
        .get_by_key(&user.user_key)
        .await
        .unwrap();
    assert_eq!(fetched.roles, vec![ROLE_COMPANY_ADMIN.to_string()]);
}
