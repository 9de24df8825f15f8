//! SurrealDB implementation of [`CompanyRepository`].

use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tessera_core::error::{TesseraError, TesseraResult};
use tessera_core::models::company::{Company, CreateCompany, UpdateCompany};
use tessera_core::repository::{CompanyRepository, PaginatedResult, Pagination};

use crate::error::DbError;

/// DB-side row struct for queries where the key is already known.
#[derive(Debug, SurrealValue)]
struct CompanyRow {
    name: String,
    slug: String,
    description: Option<String>,
    address: Option<String>,
    city: Option<String>,
    country: Option<String>,
    time_zone: Option<String>,
    email: Option<String>,
    phone: Option<String>,
    lang: Option<String>,
    billing_id: Option<String>,
    active: bool,
    archived: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl CompanyRow {
    fn into_company(self, key: String) -> Company {
        Company {
            company_key: key,
            name: self.name,
            slug: self.slug,
            description: self.description,
            address: self.address,
            city: self.city,
            country: self.country,
            time_zone: self.time_zone,
            email: self.email,
            phone: self.phone,
            lang: self.lang,
            billing_id: self.billing_id,
            active: self.active,
            archived: self.archived,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// DB-side row struct that includes the record ID via `meta::id(id)`.
#[derive(Debug, SurrealValue)]
struct CompanyRowWithId {
    record_id: String,
    name: String,
    slug: String,
    description: Option<String>,
    address: Option<String>,
    city: Option<String>,
    country: Option<String>,
    time_zone: Option<String>,
    email: Option<String>,
    phone: Option<String>,
    lang: Option<String>,
    billing_id: Option<String>,
    active: bool,
    archived: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl CompanyRowWithId {
    fn into_company(self) -> Company {
        Company {
            company_key: self.record_id,
            name: self.name,
            slug: self.slug,
            description: self.description,
            address: self.address,
            city: self.city,
            country: self.country,
            time_zone: self.time_zone,
            email: self.email,
            phone: self.phone,
            lang: self.lang,
            billing_id: self.billing_id,
            active: self.active,
            archived: self.archived,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Row struct for count queries.
#[derive(Debug, SurrealValue)]
struct CountRow {
    total: u64,
}

/// SurrealDB implementation of the Company repository.
#[derive(Clone)]
pub struct SurrealCompanyRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealCompanyRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> CompanyRepository for SurrealCompanyRepository<C> {
    async fn create(&self, input: CreateCompany) -> TesseraResult<Company> {
        // Name uniqueness is also enforced by a unique index; checking
        // first yields the expected error message instead of a raw
        // index violation.
        if self.find_by_name(&input.name).await?.is_some() {
            return Err(TesseraError::AlreadyExists {
                message: "This name is already used".into(),
            });
        }

        let key = input.company_key.clone();

        let result = self
            .db
            .query(
                "CREATE type::record('company', $key) SET \
                 name = $name, slug = $slug, \
                 description = $description, address = $address, \
                 city = $city, country = $country, \
                 time_zone = $time_zone, email = NONE, phone = NONE, \
                 lang = $lang, billing_id = $billing_id, \
                 active = $active, archived = false",
            )
            .bind(("key", key.clone()))
            .bind(("name", input.name))
            .bind(("slug", input.slug))
            .bind(("description", input.description))
            .bind(("address", input.address))
            .bind(("city", input.city))
            .bind(("country", input.country))
            .bind(("time_zone", input.time_zone))
            .bind(("lang", input.lang))
            .bind(("billing_id", input.billing_id))
            .bind(("active", input.active))
            .await
            .map_err(DbError::from)?;

        let mut result = result.check().map_err(DbError::from)?;

        let rows: Vec<CompanyRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "company".into(),
            key: key.clone(),
        })?;

        Ok(row.into_company(key))
    }

    async fn get_by_key(&self, key: &str) -> TesseraResult<Company> {
        let key = key.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('company', $key)")
            .bind(("key", key.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<CompanyRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "company".into(),
            key: key.clone(),
        })?;

        Ok(row.into_company(key))
    }

    async fn find_by_name(&self, name: &str) -> TesseraResult<Option<Company>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM company \
                 WHERE name = $name AND archived = false",
            )
            .bind(("name", name.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<CompanyRowWithId> = result.take(0).map_err(DbError::from)?;

        Ok(rows.into_iter().next().map(CompanyRowWithId::into_company))
    }

    async fn update(&self, key: &str, input: UpdateCompany) -> TesseraResult<Company> {
        let key = key.to_string();

        if let Some(name) = &input.name {
            // Renames must not collide with another company.
            if let Some(existing) = self.find_by_name(name).await? {
                if existing.company_key != key {
                    return Err(TesseraError::AlreadyExists {
                        message: "This name is already used".into(),
                    });
                }
            }
        }

        let mut sets = Vec::new();
        if input.name.is_some() {
            sets.push("name = $name");
        }
        if input.description.is_some() {
            sets.push("description = $description");
        }
        if input.address.is_some() {
            sets.push("address = $address");
        }
        if input.city.is_some() {
            sets.push("city = $city");
        }
        if input.country.is_some() {
            sets.push("country = $country");
        }
        if input.time_zone.is_some() {
            sets.push("time_zone = $time_zone");
        }
        if input.lang.is_some() {
            sets.push("lang = $lang");
        }
        if input.billing_id.is_some() {
            sets.push("billing_id = $billing_id");
        }
        sets.push("updated_at = time::now()");

        let query = format!(
            "UPDATE type::record('company', $key) SET {}",
            sets.join(", ")
        );

        let mut builder = self.db.query(&query).bind(("key", key.clone()));

        if let Some(name) = input.name {
            builder = builder.bind(("name", name));
        }
        if let Some(description) = input.description {
            builder = builder.bind(("description", description));
        }
        if let Some(address) = input.address {
            builder = builder.bind(("address", address));
        }
        if let Some(city) = input.city {
            builder = builder.bind(("city", city));
        }
        if let Some(country) = input.country {
            builder = builder.bind(("country", country));
        }
        if let Some(time_zone) = input.time_zone {
            builder = builder.bind(("time_zone", time_zone));
        }
        if let Some(lang) = input.lang {
            builder = builder.bind(("lang", lang));
        }
        if let Some(billing_id) = input.billing_id {
            builder = builder.bind(("billing_id", billing_id));
        }

        let result = builder.await.map_err(DbError::from)?;
        let mut result = result.check().map_err(DbError::from)?;

        let rows: Vec<CompanyRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "company".into(),
            key: key.clone(),
        })?;

        Ok(row.into_company(key))
    }

    async fn set_active(&self, key: &str, active: bool) -> TesseraResult<Company> {
        let key = key.to_string();

        // The mapper flips and the company flag must land together.
        // Positional take() is unreliable on transactional responses,
        // so run the transaction, check it, then read the row back.
        let result = self
            .db
            .query(
                "BEGIN TRANSACTION; \
                 UPDATE type::record('company', $key) SET \
                 active = $active, updated_at = time::now(); \
                 UPDATE company_module_mapper SET \
                 live = $live, archived = $mapper_archived, \
                 updated_at = time::now() \
                 WHERE company_key = $key; \
                 COMMIT TRANSACTION;",
            )
            .bind(("key", key.clone()))
            .bind(("active", active))
            .bind(("live", active))
            .bind(("mapper_archived", !active))
            .await
            .map_err(DbError::from)?;

        result.check().map_err(DbError::from)?;

        self.get_by_key(&key).await
    }

    async fn archive(&self, key: &str) -> TesseraResult<()> {
        let result = self
            .db
            .query(
                "UPDATE type::record('company', $key) SET \
                 archived = true, updated_at = time::now()",
            )
            .bind(("key", key.to_string()))
            .await
            .map_err(DbError::from)?;

        result.check().map_err(DbError::from)?;

        Ok(())
    }

    async fn list(&self, pagination: Pagination) -> TesseraResult<PaginatedResult<Company>> {
        let mut count_result = self
            .db
            .query(
                "SELECT count() AS total FROM company \
                 WHERE archived = false GROUP ALL",
            )
            .await
            .map_err(DbError::from)?;
        let count_rows: Vec<CountRow> = count_result.take(0).map_err(DbError::from)?;
        let total = count_rows.first().map(|r| r.total).unwrap_or(0);

        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM company \
                 WHERE archived = false \
                 ORDER BY created_at ASC \
                 LIMIT $limit START $offset",
            )
            .bind(("limit", pagination.limit))
            .bind(("offset", pagination.offset))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<CompanyRowWithId> = result.take(0).map_err(DbError::from)?;
        let items = rows
            .into_iter()
            .map(CompanyRowWithId::into_company)
            .collect();

        Ok(PaginatedResult {
            items,
            total,
            offset: pagination.offset,
            limit: pagination.limit,
        })
    }
}
