//! Explicit per-request context.
//!
//! The resolver and access gate receive a [`RequestContext`] by
//! parameter instead of reaching into thread-bound global request
//! state. The HTTP layer builds one per inbound request.

use std::collections::HashMap;

/// Query parameter carrying an explicit module selector.
pub const PARAM_MODULE_KEY: &str = "moduleKey";
/// Query parameter carrying a secret-link token.
pub const PARAM_SECRET_KEY: &str = "secretKey";

/// Client-IP-revealing headers, in priority order.
const CLIENT_IP_HEADERS: &[&str] = &[
    "X-Forwarded-For",
    "X-Real-IP",
    "Proxy-Client-IP",
    "WL-Proxy-Client-IP",
    "HTTP_CLIENT_IP",
    "HTTP_X_FORWARDED_FOR",
];

/// An authenticated principal, as established by the session provider.
/// The core never verifies credentials itself.
#[derive(Debug, Clone)]
pub struct Principal {
    pub user_key: String,
    /// Role names held by the principal (e.g. `ROLE_COMPANY_ADMIN`).
    pub roles: Vec<String>,
}

impl Principal {
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }
}

/// Snapshot of the inbound request the kernel needs: hostname, named
/// parameters, headers, remote address, and the authenticated
/// principal (if any).
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    host: Option<String>,
    params: HashMap<String, String>,
    /// Header names stored lowercased for case-insensitive lookup.
    headers: HashMap<String, String>,
    remote_addr: Option<String>,
    principal: Option<Principal>,
}

impl RequestContext {
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: Some(host.into()),
            ..Default::default()
        }
    }

    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.insert(name.to_ascii_lowercase(), value.into());
        self
    }

    pub fn with_remote_addr(mut self, addr: impl Into<String>) -> Self {
        self.remote_addr = Some(addr.into());
        self
    }

    pub fn with_principal(mut self, principal: Principal) -> Self {
        self.principal = Some(principal);
        self
    }

    pub fn host(&self) -> Option<&str> {
        self.host.as_deref()
    }

    pub fn parameter(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str).filter(|v| !v.is_empty())
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    pub fn principal(&self) -> Option<&Principal> {
        self.principal.as_ref()
    }

    /// Best-effort client IP: proxy headers in priority order, then
    /// the socket remote address. A header valued `unknown` (any
    /// case) counts as absent. Falls back to `"unknown"`.
    pub fn client_ip(&self) -> String {
        for name in CLIENT_IP_HEADERS {
            if let Some(value) = self.header(name)
                && !value.is_empty()
                && !value.eq_ignore_ascii_case("unknown")
            {
                return value.to_string();
            }
        }
        self.remote_addr
            .clone()
            .filter(|a| !a.is_empty())
            .unwrap_or_else(|| "unknown".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_ip_prefers_forwarded_for() {
        let ctx = RequestContext::new("acme.example.com")
            .with_header("X-Forwarded-For", "203.0.113.7")
            .with_header("X-Real-IP", "198.51.100.1")
            .with_remote_addr("10.0.0.1");
        assert_eq!(ctx.client_ip(), "203.0.113.7");
    }

    #[test]
    fn client_ip_skips_unknown_headers() {
        let ctx = RequestContext::new("acme.example.com")
            .with_header("X-Forwarded-For", "UNKNOWN")
            .with_header("Proxy-Client-IP", "198.51.100.9")
            .with_remote_addr("10.0.0.1");
        assert_eq!(ctx.client_ip(), "198.51.100.9");
    }

    #[test]
    fn client_ip_falls_back_to_remote_addr() {
        let ctx = RequestContext::new("acme.example.com").with_remote_addr("10.0.0.1");
        assert_eq!(ctx.client_ip(), "10.0.0.1");
    }

    #[test]
    fn client_ip_unknown_when_nothing_present() {
        let ctx = RequestContext::new("acme.example.com");
        assert_eq!(ctx.client_ip(), "unknown");
    }

    #[test]
    fn header_lookup_is_case_insensitive() {
        let ctx = RequestContext::new("h").with_header("X-Real-IP", "1.2.3.4");
        assert_eq!(ctx.header("x-real-ip"), Some("1.2.3.4"));
    }

    #[test]
    fn empty_parameter_counts_as_absent() {
        let ctx = RequestContext::new("h").with_param(PARAM_SECRET_KEY, "");
        assert_eq!(ctx.parameter(PARAM_SECRET_KEY), None);
    }
}
