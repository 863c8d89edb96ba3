//! Client configuration
//!
//! All options are fixed once a [`JwksClient`](crate::JwksClient) is built.

use crate::error::{Error, Result};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use std::collections::BTreeMap;
use std::time::Duration;

/// Bounds for the per-`kid` signing key cache
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheOptions {
    /// Maximum number of cached `kid`s before the least recently used is evicted
    pub max_entries: u64,
    /// Age after which a cached key is resolved again
    pub max_age: Duration,
}

impl Default for CacheOptions {
    fn default() -> Self {
        Self {
            max_entries: 5,
            max_age: Duration::from_secs(10 * 60 * 60),
        }
    }
}

/// Quota of resolutions admitted per rolling minute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitOptions {
    /// Resolutions admitted in any sixty second window
    pub requests_per_minute: u32,
}

impl Default for RateLimitOptions {
    fn default() -> Self {
        Self {
            requests_per_minute: 10,
        }
    }
}

/// Which lookups count against the rate limit when caching is also enabled
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RateLimitScope {
    /// Only lookups that miss the cache and reach the endpoint
    #[default]
    CacheMisses,
    /// Every lookup, including cache hits
    AllLookups,
}

/// HTTP transport options
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransportOptions {
    /// Additional trusted root certificate (PEM)
    pub ca_certificate_pem: Option<String>,
    /// Total request timeout
    pub timeout: Option<Duration>,
    /// `User-Agent` header value, reqwest's default when unset
    pub user_agent: Option<String>,
}

/// Options for building a [`JwksClient`](crate::JwksClient)
///
/// ```
/// use jwks_client::{CacheOptions, ClientOptions, RateLimitOptions};
///
/// let mut options = ClientOptions::new("https://example.com/.well-known/jwks.json");
/// options
///     .cache(CacheOptions::default())
///     .rate_limit(RateLimitOptions { requests_per_minute: 10 })
///     .header("x-tenant", "acme");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientOptions {
    pub(crate) jwks_uri: String,
    pub(crate) strict_ssl: bool,
    pub(crate) cache: Option<CacheOptions>,
    pub(crate) rate_limit: Option<RateLimitOptions>,
    pub(crate) rate_limit_scope: RateLimitScope,
    pub(crate) headers: BTreeMap<String, String>,
    pub(crate) transport: TransportOptions,
}

impl ClientOptions {
    /// Options for `jwks_uri` with TLS verification on, no cache and no rate limit
    pub fn new(jwks_uri: impl Into<String>) -> Self {
        Self {
            jwks_uri: jwks_uri.into(),
            strict_ssl: true,
            cache: None,
            rate_limit: None,
            rate_limit_scope: RateLimitScope::default(),
            headers: BTreeMap::new(),
            transport: TransportOptions::default(),
        }
    }

    /// Verify the endpoint's TLS certificate (default `true`)
    pub fn strict_ssl(&mut self, strict: bool) -> &mut Self {
        self.strict_ssl = strict;
        self
    }

    /// Enable the signing key cache
    pub fn cache(&mut self, options: CacheOptions) -> &mut Self {
        self.cache = Some(options);
        self
    }

    /// Enable rate limiting
    pub fn rate_limit(&mut self, options: RateLimitOptions) -> &mut Self {
        self.rate_limit = Some(options);
        self
    }

    /// Choose what the rate limit counts when the cache is enabled
    pub fn rate_limit_scope(&mut self, scope: RateLimitScope) -> &mut Self {
        self.rate_limit_scope = scope;
        self
    }

    /// Add a header sent with every request
    pub fn header(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Add several headers sent with every request
    pub fn headers<I, K, V>(&mut self, headers: I) -> &mut Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.headers
            .extend(headers.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Replace the HTTP transport options
    pub fn transport(&mut self, options: TransportOptions) -> &mut Self {
        self.transport = options;
        self
    }

    /// The configured JWKS endpoint
    pub fn jwks_uri(&self) -> &str {
        &self.jwks_uri
    }

    /// Check the option values that do not depend on the URI or transport
    pub(crate) fn validate(&self) -> Result<()> {
        if let Some(cache) = &self.cache {
            if cache.max_entries == 0 {
                return Err(Error::InvalidConfiguration(
                    "cache max_entries must be greater than zero".to_string(),
                ));
            }
            if cache.max_age.is_zero() {
                return Err(Error::InvalidConfiguration(
                    "cache max_age must be greater than zero".to_string(),
                ));
            }
        }
        if let Some(rate_limit) = &self.rate_limit {
            if rate_limit.requests_per_minute == 0 {
                return Err(Error::InvalidConfiguration(
                    "requests_per_minute must be greater than zero".to_string(),
                ));
            }
        }
        if self.transport.timeout.is_some_and(|t| t.is_zero()) {
            return Err(Error::InvalidConfiguration(
                "transport timeout must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Build the default header map sent with every request
    pub(crate) fn header_map(&self) -> Result<HeaderMap> {
        let mut map = HeaderMap::with_capacity(self.headers.len());
        for (name, value) in &self.headers {
            let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|_| {
                Error::InvalidConfiguration(format!("invalid header name '{name}'"))
            })?;
            let header_value = HeaderValue::from_str(value).map_err(|_| {
                Error::InvalidConfiguration(format!("invalid value for header '{name}'"))
            })?;
            map.insert(header_name, header_value);
        }
        Ok(map)
    }

    /// Build the HTTP client for these options
    pub(crate) fn http_client(&self) -> Result<reqwest::Client> {
        let mut builder = reqwest::Client::builder()
            .default_headers(self.header_map()?)
            .danger_accept_invalid_certs(!self.strict_ssl);

        if let Some(pem) = &self.transport.ca_certificate_pem {
            let parsed = pem::parse(pem.as_bytes()).map_err(|e| {
                Error::InvalidConfiguration(format!("invalid CA certificate: {e}"))
            })?;
            if parsed.tag() != "CERTIFICATE" {
                return Err(Error::InvalidConfiguration(format!(
                    "invalid CA certificate: unexpected PEM block '{}'",
                    parsed.tag()
                )));
            }
            let certificate = reqwest::Certificate::from_pem(pem.as_bytes()).map_err(|e| {
                Error::InvalidConfiguration(format!("invalid CA certificate: {e}"))
            })?;
            builder = builder.add_root_certificate(certificate);
        }
        if let Some(timeout) = self.transport.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(user_agent) = &self.transport.user_agent {
            builder = builder.user_agent(user_agent.as_str());
        }

        builder
            .build()
            .map_err(|e| Error::InvalidConfiguration(format!("http client: {e}")))
    }
}
