//! SurrealDB implementation of [`MapperRepository`].

use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tessera_core::error::{TesseraError, TesseraResult};
use tessera_core::models::mapper::{CompanyModuleMapper, CreateMapper, DEFAULT_COLORS_JSON};
use tessera_core::repository::MapperRepository;

use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct MapperRow {
    company_key: String,
    module_key: String,
    host: Option<String>,
    live: bool,
    archived: bool,
    master: bool,
    directory: Option<String>,
    email: Option<String>,
    colors: String,
    header: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl MapperRow {
    fn into_mapper(self, key: String) -> CompanyModuleMapper {
        CompanyModuleMapper {
            module_mapper_key: key,
            company_key: self.company_key,
            module_key: self.module_key,
            host: self.host,
            live: self.live,
            archived: self.archived,
            master: self.master,
            directory: self.directory,
            email: self.email,
            colors: self.colors,
            header: self.header,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(Debug, SurrealValue)]
struct MapperRowWithId {
    record_id: String,
    company_key: String,
    module_key: String,
    host: Option<String>,
    live: bool,
    archived: bool,
    master: bool,
    directory: Option<String>,
    email: Option<String>,
    colors: String,
    header: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl MapperRowWithId {
    fn into_mapper(self) -> CompanyModuleMapper {
        CompanyModuleMapper {
            module_mapper_key: self.record_id,
            company_key: self.company_key,
            module_key: self.module_key,
            host: self.host,
            live: self.live,
            archived: self.archived,
            master: self.master,
            directory: self.directory,
            email: self.email,
            colors: self.colors,
            header: self.header,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(Debug, SurrealValue)]
struct CountRow {
    total: u64,
}

/// SurrealDB implementation of the company-module mapper repository.
#[derive(Clone)]
pub struct SurrealMapperRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealMapperRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }

    async fn count_by_company_and_module(
        &self,
        company_key: &str,
        module_key: &str,
    ) -> Result<u64, DbError> {
        let mut result = self
            .db
            .query(
                "SELECT count() AS total FROM company_module_mapper \
                 WHERE company_key = $company_key \
                 AND module_key = $module_key \
                 AND archived = false GROUP ALL",
            )
            .bind(("company_key", company_key.to_string()))
            .bind(("module_key", module_key.to_string()))
            .await?;

        let rows: Vec<CountRow> = result.take(0)?;
        Ok(rows.first().map(|r| r.total).unwrap_or(0))
    }

    async fn count_live_by_host(&self, host: &str) -> Result<u64, DbError> {
        let mut result = self
            .db
            .query(
                "SELECT count() AS total FROM company_module_mapper \
                 WHERE host = $host AND live = true \
                 AND archived = false GROUP ALL",
            )
            .bind(("host", host.to_string()))
            .await?;

        let rows: Vec<CountRow> = result.take(0)?;
        Ok(rows.first().map(|r| r.total).unwrap_or(0))
    }
}

impl<C: Connection> MapperRepository for SurrealMapperRepository<C> {
    async fn create(&self, input: CreateMapper) -> TesseraResult<CompanyModuleMapper> {
        if self
            .count_by_company_and_module(&input.company_key, &input.module_key)
            .await?
            > 0
        {
            return Err(TesseraError::AlreadyExists {
                message: "Module already exists for this company".into(),
            });
        }

        if let Some(host) = &input.host {
            if input.live && self.count_live_by_host(host).await? > 0 {
                return Err(TesseraError::AlreadyExists {
                    message: "Host is already in use".into(),
                });
            }
        }

        let key = input.module_mapper_key.clone();
        let colors = input
            .colors
            .unwrap_or_else(|| DEFAULT_COLORS_JSON.to_string());

        let result = self
            .db
            .query(
                "CREATE type::record('company_module_mapper', $key) SET \
                 company_key = $company_key, module_key = $module_key, \
                 host = $host, live = $live, archived = false, \
                 master = $master, directory = $directory, \
                 email = $email, colors = $colors, header = '1'",
            )
            .bind(("key", key.clone()))
            .bind(("company_key", input.company_key))
            .bind(("module_key", input.module_key))
            .bind(("host", input.host))
            .bind(("live", input.live))
            .bind(("master", input.master))
            .bind(("directory", input.directory))
            .bind(("email", input.email))
            .bind(("colors", colors))
            .await
            .map_err(DbError::from)?;

        let mut result = result.check().map_err(DbError::from)?;

        let rows: Vec<MapperRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "company_module_mapper".into(),
            key: key.clone(),
        })?;

        Ok(row.into_mapper(key))
    }

    async fn find_by_key(&self, key: &str) -> TesseraResult<Option<CompanyModuleMapper>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * \
                 FROM type::record('company_module_mapper', $key) \
                 WHERE archived = false",
            )
            .bind(("key", key.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<MapperRowWithId> = result.take(0).map_err(DbError::from)?;

        Ok(rows.into_iter().next().map(MapperRowWithId::into_mapper))
    }

    async fn find_live_by_host(&self, host: &str) -> TesseraResult<Option<CompanyModuleMapper>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * \
                 FROM company_module_mapper \
                 WHERE host = $host AND live = true \
                 AND archived = false",
            )
            .bind(("host", host.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<MapperRowWithId> = result.take(0).map_err(DbError::from)?;

        Ok(rows.into_iter().next().map(MapperRowWithId::into_mapper))
    }

    async fn find_by_company_and_module(
        &self,
        company_key: &str,
        module_key: &str,
    ) -> TesseraResult<Option<CompanyModuleMapper>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * \
                 FROM company_module_mapper \
                 WHERE company_key = $company_key \
                 AND module_key = $module_key \
                 AND archived = false",
            )
            .bind(("company_key", company_key.to_string()))
            .bind(("module_key", module_key.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<MapperRowWithId> = result.take(0).map_err(DbError::from)?;

        Ok(rows.into_iter().next().map(MapperRowWithId::into_mapper))
    }

    async fn list_by_company(&self, company_key: &str) -> TesseraResult<Vec<CompanyModuleMapper>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * \
                 FROM company_module_mapper \
                 WHERE company_key = $company_key \
                 AND archived = false \
                 ORDER BY created_at ASC",
            )
            .bind(("company_key", company_key.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<MapperRowWithId> = result.take(0).map_err(DbError::from)?;

        Ok(rows.into_iter().map(MapperRowWithId::into_mapper).collect())
    }

    async fn archive(&self, key: &str) -> TesseraResult<()> {
        let result = self
            .db
            .query(
                "UPDATE type::record('company_module_mapper', $key) SET \
                 archived = true, live = false, updated_at = time::now()",
            )
            .bind(("key", key.to_string()))
            .await
            .map_err(DbError::from)?;

        result.check().map_err(DbError::from)?;

        Ok(())
    }
}
