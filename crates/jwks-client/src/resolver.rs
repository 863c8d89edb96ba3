//! Signing key resolution by `kid`

use crate::error::{Error, Result};
use crate::jwks::KeySetFetcher;
use crate::jwks::jwk::Jwk;
use crate::jwks::signing_key::{SigningKey, extract_signing_keys};
use async_trait::async_trait;
use tracing::debug;

/// Resolves one signing key by its `kid`
///
/// The remote resolver and its caching and rate-limiting decorators all share
/// this signature, so they can wrap one another in any order.
#[async_trait]
pub trait SigningKeyResolver: Send + Sync {
    async fn resolve(&self, kid: &str) -> Result<SigningKey>;
}

/// Fetches and extracts the key set on every call
#[derive(Debug, Clone)]
pub(crate) struct RemoteResolver {
    fetcher: KeySetFetcher,
}

impl RemoteResolver {
    pub(crate) fn new(fetcher: KeySetFetcher) -> Self {
        Self { fetcher }
    }

    pub(crate) fn jwks_uri(&self) -> &url::Url {
        self.fetcher.jwks_uri()
    }

    pub(crate) async fn keys(&self) -> Result<Vec<Jwk>> {
        self.fetcher.fetch().await
    }

    pub(crate) async fn signing_keys(&self) -> Result<Vec<SigningKey>> {
        let keys = self.keys().await?;
        extract_signing_keys(&keys)
    }
}

#[async_trait]
impl SigningKeyResolver for RemoteResolver {
    async fn resolve(&self, kid: &str) -> Result<SigningKey> {
        debug!(kid, "fetching signing key");
        let keys = self.signing_keys().await?;

        keys.into_iter().find(|key| key.kid() == kid).ok_or_else(|| {
            debug!(kid, "signing key not found");
            Error::SigningKeyNotFound {
                kid: kid.to_string(),
            }
        })
    }
}
