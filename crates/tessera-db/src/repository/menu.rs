//! SurrealDB implementation of [`MenuRepository`].

use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tessera_core::error::TesseraResult;
use tessera_core::models::menu::{CreateMenu, MapperMenu};
use tessera_core::repository::MenuRepository;

use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct MenuRowWithId {
    record_id: String,
    module_mapper_key: String,
    name: String,
    menu_type: String,
    route_name: String,
    position: u32,
    main_menu: bool,
    footer_menu: bool,
    home_page: bool,
    public_menu: bool,
}

impl MenuRowWithId {
    fn into_menu(self) -> MapperMenu {
        MapperMenu {
            menu_key: self.record_id,
            module_mapper_key: self.module_mapper_key,
            name: self.name,
            menu_type: self.menu_type,
            route_name: self.route_name,
            position: self.position,
            main_menu: self.main_menu,
            footer_menu: self.footer_menu,
            home_page: self.home_page,
            public_menu: self.public_menu,
        }
    }
}

#[derive(Debug, SurrealValue)]
struct CountRow {
    total: u64,
}

/// SurrealDB implementation of the mapper-menu repository.
#[derive(Clone)]
pub struct SurrealMenuRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealMenuRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> MenuRepository for SurrealMenuRepository<C> {
    async fn create_if_absent(&self, input: CreateMenu) -> TesseraResult<bool> {
        let mut result = self
            .db
            .query(
                "SELECT count() AS total FROM mapper_menu \
                 WHERE module_mapper_key = $module_mapper_key \
                 AND menu_type = $menu_type GROUP ALL",
            )
            .bind(("module_mapper_key", input.module_mapper_key.clone()))
            .bind(("menu_type", input.menu_type.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<CountRow> = result.take(0).map_err(DbError::from)?;
        if rows.first().map(|r| r.total).unwrap_or(0) > 0 {
            return Ok(false);
        }

        let result = self
            .db
            .query(
                "CREATE type::record('mapper_menu', $key) SET \
                 module_mapper_key = $module_mapper_key, \
                 name = $name, menu_type = $menu_type, \
                 route_name = $route_name, position = $position, \
                 main_menu = $main_menu, footer_menu = $footer_menu, \
                 home_page = $home_page, public_menu = $public_menu",
            )
            .bind(("key", input.menu_key))
            .bind(("module_mapper_key", input.module_mapper_key))
            .bind(("name", input.name))
            .bind(("menu_type", input.menu_type))
            .bind(("route_name", input.route_name))
            .bind(("position", input.position))
            .bind(("main_menu", input.main_menu))
            .bind(("footer_menu", input.footer_menu))
            .bind(("home_page", input.home_page))
            .bind(("public_menu", input.public_menu))
            .await
            .map_err(DbError::from)?;

        result.check().map_err(DbError::from)?;

        Ok(true)
    }

    async fn list_by_mapper(&self, module_mapper_key: &str) -> TesseraResult<Vec<MapperMenu>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM mapper_menu \
                 WHERE module_mapper_key = $module_mapper_key \
                 ORDER BY position ASC",
            )
            .bind(("module_mapper_key", module_mapper_key.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<MenuRowWithId> = result.take(0).map_err(DbError::from)?;

        Ok(rows.into_iter().map(MenuRowWithId::into_menu).collect())
    }
}
