//! JWKS client

use crate::caching::CachingResolver;
use crate::config::{ClientOptions, RateLimitScope};
use crate::error::Result;
use crate::jwks::KeySetFetcher;
use crate::jwks::jwk::Jwk;
use crate::jwks::signing_key::SigningKey;
use crate::rate_limit::RateLimitedResolver;
use crate::resolver::{RemoteResolver, SigningKeyResolver};
use crate::url::validate_jwks_uri;
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Resolves signing keys published at one JWKS endpoint
///
/// Lookups by `kid` go through the cache and rate limit configured in
/// [`ClientOptions`]. [`get_keys`](Self::get_keys) and
/// [`get_signing_keys`](Self::get_signing_keys) always fetch the full set
/// and bypass both.
///
/// Cloning is cheap. Clones share the HTTP client, the cache and the rate
/// limit window.
#[derive(Clone)]
pub struct JwksClient {
    remote: RemoteResolver,
    resolver: Arc<dyn SigningKeyResolver>,
}

impl JwksClient {
    /// Build a client, validating `options`
    ///
    /// # Errors
    ///
    /// [`Error::InvalidConfiguration`](crate::Error::InvalidConfiguration)
    /// when the URI, a bound, a header or the transport options are invalid.
    pub fn new(options: ClientOptions) -> Result<Self> {
        let jwks_uri = validate_jwks_uri(&options.jwks_uri)?;
        options.validate()?;
        let http = options.http_client()?;

        let remote = RemoteResolver::new(KeySetFetcher::new(http, jwks_uri));
        let inner = remote.clone();

        let resolver: Arc<dyn SigningKeyResolver> = match (options.cache, options.rate_limit) {
            (None, None) => Arc::new(inner),
            (Some(cache), None) => Arc::new(CachingResolver::new(inner, cache)),
            (None, Some(rate_limit)) => Arc::new(RateLimitedResolver::new(inner, rate_limit)),
            (Some(cache), Some(rate_limit)) => match options.rate_limit_scope {
                RateLimitScope::CacheMisses => Arc::new(CachingResolver::new(
                    RateLimitedResolver::new(inner, rate_limit),
                    cache,
                )),
                RateLimitScope::AllLookups => Arc::new(RateLimitedResolver::new(
                    CachingResolver::new(inner, cache),
                    rate_limit,
                )),
            },
        };

        debug!(
            uri = %remote.jwks_uri(),
            cache = options.cache.is_some(),
            rate_limit = options.rate_limit.is_some(),
            "created jwks client"
        );

        Ok(Self { remote, resolver })
    }

    /// The endpoint this client reads from
    pub fn jwks_uri(&self) -> &str {
        self.remote.jwks_uri().as_str()
    }

    /// Fetch the raw key set, unfiltered
    pub async fn get_keys(&self) -> Result<Vec<Jwk>> {
        self.remote.keys().await
    }

    /// Fetch the key set and extract every signing key
    pub async fn get_signing_keys(&self) -> Result<Vec<SigningKey>> {
        self.remote.signing_keys().await
    }

    /// Resolve the signing key for `kid`
    ///
    /// # Errors
    ///
    /// - [`Error::SigningKeyNotFound`](crate::Error::SigningKeyNotFound) if
    ///   the key set is valid but has no key for `kid`
    /// - [`Error::RateLimitExceeded`](crate::Error::RateLimitExceeded) if the
    ///   rate limit rejected the lookup
    /// - any fetch or extraction error, unchanged
    pub async fn get_signing_key(&self, kid: &str) -> Result<SigningKey> {
        self.resolver.resolve(kid).await
    }
}

#[async_trait]
impl SigningKeyResolver for JwksClient {
    async fn resolve(&self, kid: &str) -> Result<SigningKey> {
        self.get_signing_key(kid).await
    }
}

impl fmt::Debug for JwksClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwksClient")
            .field("jwks_uri", &self.jwks_uri())
            .finish_non_exhaustive()
    }
}
