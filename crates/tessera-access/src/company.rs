//! Company lifecycle management.

use tessera_core::error::{TesseraError, TesseraResult};
use tessera_core::keygen;
use tessera_core::models::company::{Company, CreateCompany, UpdateCompany};
use tessera_core::repository::{CompanyRepository, PaginatedResult, Pagination};
use tracing::info;

/// Input for registering a new company.
#[derive(Debug, Clone, Default)]
pub struct NewCompany {
    pub name: String,
    pub description: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub time_zone: Option<String>,
    pub lang: Option<String>,
    pub billing_id: Option<String>,
    pub active: bool,
}

/// Derive a URL-safe slug from a company name: lowercase, runs of
/// non-alphanumerics collapse to single hyphens.
fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_hyphen = false;

    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_hyphen = true;
        }
    }

    slug
}

/// Company lifecycle service.
pub struct CompanyService<CR> {
    companies: CR,
}

impl<CR: CompanyRepository> CompanyService<CR> {
    pub fn new(companies: CR) -> Self {
        Self { companies }
    }

    /// Register a new company. The name must be unique; the slug is
    /// derived from it.
    pub async fn create(&self, input: NewCompany) -> TesseraResult<Company> {
        if input.name.trim().is_empty() {
            return Err(TesseraError::Validation {
                message: "Company name must not be empty".into(),
            });
        }

        let company = self
            .companies
            .create(CreateCompany {
                company_key: keygen::entity_key(),
                slug: slugify(&input.name),
                name: input.name,
                description: input.description,
                address: input.address,
                city: input.city,
                country: input.country,
                time_zone: input.time_zone,
                lang: input.lang,
                billing_id: input.billing_id,
                active: input.active,
            })
            .await?;

        info!(company_key = %company.company_key, name = %company.name, "Company created");

        Ok(company)
    }

    /// Update company fields. An `active` change additionally flips
    /// every one of the company's mappers in the same transaction:
    /// activation restores them, deactivation suspends them.
    pub async fn update(
        &self,
        company_key: &str,
        input: UpdateCompany,
        active: Option<bool>,
    ) -> TesseraResult<Company> {
        let current = self.companies.get_by_key(company_key).await?;

        let mut company = self.companies.update(company_key, input).await?;

        if let Some(active) = active
            && active != current.active
        {
            company = self.companies.set_active(company_key, active).await?;
            info!(company_key, active, "Company activation changed");
        }

        Ok(company)
    }

    /// Archive a company. Active companies must be deactivated first.
    pub async fn archive(&self, company_key: &str) -> TesseraResult<()> {
        let company = self.companies.get_by_key(company_key).await?;

        if company.active {
            return Err(TesseraError::InvariantViolation {
                message: "Company is active, de-activate first!".into(),
            });
        }

        self.companies.archive(company_key).await?;
        info!(company_key, "Company archived");

        Ok(())
    }

    pub async fn get(&self, company_key: &str) -> TesseraResult<Company> {
        self.companies.get_by_key(company_key).await
    }

    pub async fn list(&self, pagination: Pagination) -> TesseraResult<PaginatedResult<Company>> {
        self.companies.list(pagination).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slug_collapses_separators() {
        assert_eq!(slugify("ACME  University"), "acme-university");
        assert_eq!(slugify("St. Mary's College"), "st-mary-s-college");
    }

    #[test]
    fn slug_ignores_leading_and_trailing_noise() {
        assert_eq!(slugify("  Twice Inc.  "), "twice-inc");
    }
}
