//! Per-`kid` signing key cache
//!
//! Backed by a [`moka::future::Cache`] with LRU eviction and a time-to-live.
//! Concurrent misses for one `kid` are coalesced by `try_get_with` into a
//! single inner resolution whose result every waiter receives. Failed
//! resolutions are shared with those waiters but never stored.

use crate::config::CacheOptions;
use crate::error::{Error, Result};
use crate::jwks::signing_key::SigningKey;
use crate::resolver::SigningKeyResolver;
use async_trait::async_trait;
use moka::future::Cache;
use moka::policy::EvictionPolicy;
use std::sync::Arc;
use tracing::debug;

pub(crate) struct CachingResolver<R> {
    inner: R,
    cache: Cache<String, SigningKey>,
}

impl<R: SigningKeyResolver> CachingResolver<R> {
    pub(crate) fn new(inner: R, options: CacheOptions) -> Self {
        debug!(
            max_entries = options.max_entries,
            max_age = ?options.max_age,
            "configured signing key cache"
        );
        let cache = Cache::builder()
            .max_capacity(options.max_entries)
            .time_to_live(options.max_age)
            .eviction_policy(EvictionPolicy::lru())
            .build();
        Self { inner, cache }
    }

    #[cfg(test)]
    pub(crate) async fn run_pending_tasks(&self) {
        self.cache.run_pending_tasks().await;
    }

    #[cfg(test)]
    pub(crate) fn contains(&self, kid: &str) -> bool {
        self.cache.contains_key(kid)
    }
}

#[async_trait]
impl<R: SigningKeyResolver> SigningKeyResolver for CachingResolver<R> {
    async fn resolve(&self, kid: &str) -> Result<SigningKey> {
        self.cache
            .try_get_with(kid.to_string(), async {
                let key = self.inner.resolve(kid).await?;
                debug!(kid, "caching signing key");
                Ok::<_, Error>(key)
            })
            .await
            .map_err(Arc::unwrap_or_clone)
    }
}
