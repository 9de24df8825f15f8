//! Access-layer configuration.

/// Configuration for the access services.
#[derive(Debug, Clone)]
pub struct AccessConfig {
    /// Secret-link lifetime in minutes (default: 30).
    pub secret_link_ttl_mins: i64,
    /// Optional pepper prepended to passwords before Argon2id hashing.
    pub pepper: Option<String>,
}

impl Default for AccessConfig {
    fn default() -> Self {
        Self {
            secret_link_ttl_mins: 30,
            pepper: None,
        }
    }
}
