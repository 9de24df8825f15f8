//! SurrealDB implementation of [`ModuleRepository`].

use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tessera_core::error::TesseraResult;
use tessera_core::models::module::{CreateModule, Module, ModuleKind};
use tessera_core::repository::ModuleRepository;

use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct ModuleRow {
    name: String,
    description: Option<String>,
    kind: String,
    archived: bool,
}

impl ModuleRow {
    fn try_into_module(self, key: String) -> Result<Module, DbError> {
        let kind = ModuleKind::parse(&self.kind)
            .ok_or_else(|| DbError::Decode(format!("unknown module kind '{}'", self.kind)))?;
        Ok(Module {
            module_key: key,
            name: self.name,
            description: self.description,
            kind,
            archived: self.archived,
        })
    }
}

#[derive(Debug, SurrealValue)]
struct ModuleRowWithId {
    record_id: String,
    name: String,
    description: Option<String>,
    kind: String,
    archived: bool,
}

impl ModuleRowWithId {
    fn try_into_module(self) -> Result<Module, DbError> {
        let kind = ModuleKind::parse(&self.kind)
            .ok_or_else(|| DbError::Decode(format!("unknown module kind '{}'", self.kind)))?;
        Ok(Module {
            module_key: self.record_id,
            name: self.name,
            description: self.description,
            kind,
            archived: self.archived,
        })
    }
}

/// SurrealDB implementation of the module catalog repository.
#[derive(Clone)]
pub struct SurrealModuleRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealModuleRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> ModuleRepository for SurrealModuleRepository<C> {
    async fn create(&self, input: CreateModule) -> TesseraResult<Module> {
        let key = input.module_key.clone();

        let result = self
            .db
            .query(
                "CREATE type::record('module', $key) SET \
                 name = $name, description = $description, \
                 kind = $kind, archived = false",
            )
            .bind(("key", key.clone()))
            .bind(("name", input.name))
            .bind(("description", input.description))
            .bind(("kind", input.kind.as_str().to_string()))
            .await
            .map_err(DbError::from)?;

        let mut result = result.check().map_err(DbError::from)?;

        let rows: Vec<ModuleRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "module".into(),
            key: key.clone(),
        })?;

        Ok(row.try_into_module(key)?)
    }

    async fn get_by_key(&self, key: &str) -> TesseraResult<Module> {
        let key = key.to_string();

        let mut result = self
            .db
            .query(
                "SELECT * FROM type::record('module', $key) \
                 WHERE archived = false",
            )
            .bind(("key", key.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ModuleRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "module".into(),
            key: key.clone(),
        })?;

        Ok(row.try_into_module(key)?)
    }

    async fn find_by_kind(&self, kind: ModuleKind) -> TesseraResult<Option<Module>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM module \
                 WHERE kind = $kind AND archived = false",
            )
            .bind(("kind", kind.as_str().to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ModuleRowWithId> = result.take(0).map_err(DbError::from)?;

        match rows.into_iter().next() {
            Some(row) => Ok(Some(row.try_into_module()?)),
            None => Ok(None),
        }
    }

    async fn list_active(&self) -> TesseraResult<Vec<Module>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM module \
                 WHERE archived = false ORDER BY name ASC",
            )
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ModuleRowWithId> = result.take(0).map_err(DbError::from)?;

        let modules = rows
            .into_iter()
            .map(ModuleRowWithId::try_into_module)
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(modules)
    }

    async fn archive(&self, key: &str) -> TesseraResult<()> {
        let result = self
            .db
            .query("UPDATE type::record('module', $key) SET archived = true")
            .bind(("key", key.to_string()))
            .await
            .map_err(DbError::from)?;

        result.check().map_err(DbError::from)?;

        Ok(())
    }
}
