//! Admission control for signing key resolutions
//!
//! A sliding one-minute log of admitted calls. Calls over the quota are
//! rejected immediately, they never wait for capacity.

use crate::config::RateLimitOptions;
use crate::error::{Error, Result};
use crate::jwks::signing_key::SigningKey;
use crate::resolver::SigningKeyResolver;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::time::Duration;
use tokio::time::Instant;
use tracing::warn;

const WINDOW: Duration = Duration::from_secs(60);

/// Sliding-window counter owned by one client
#[derive(Debug)]
pub(crate) struct RateLimiter {
    quota: u32,
    window: Duration,
    admitted: Mutex<VecDeque<Instant>>,
}

impl RateLimiter {
    pub(crate) fn new(options: RateLimitOptions) -> Self {
        Self::with_window(options.requests_per_minute, WINDOW)
    }

    fn with_window(quota: u32, window: Duration) -> Self {
        Self {
            quota,
            window,
            admitted: Mutex::new(VecDeque::new()),
        }
    }

    pub(crate) fn quota(&self) -> u32 {
        self.quota
    }

    /// Record one call if the window has room for it
    pub(crate) fn try_acquire(&self) -> bool {
        let now = Instant::now();
        let mut admitted = self.admitted.lock();

        while admitted
            .front()
            .is_some_and(|at| now.duration_since(*at) >= self.window)
        {
            admitted.pop_front();
        }

        if admitted.len() >= self.quota as usize {
            return false;
        }
        admitted.push_back(now);
        true
    }
}

/// Rejects resolutions beyond the quota before they reach `inner`
pub(crate) struct RateLimitedResolver<R> {
    inner: R,
    limiter: RateLimiter,
}

impl<R: SigningKeyResolver> RateLimitedResolver<R> {
    pub(crate) fn new(inner: R, options: RateLimitOptions) -> Self {
        Self {
            inner,
            limiter: RateLimiter::new(options),
        }
    }
}

#[async_trait]
impl<R: SigningKeyResolver> SigningKeyResolver for RateLimitedResolver<R> {
    async fn resolve(&self, kid: &str) -> Result<SigningKey> {
        if !self.limiter.try_acquire() {
            warn!(kid, quota = self.limiter.quota(), "too many requests to the JWKS endpoint");
            return Err(Error::RateLimitExceeded {
                quota: self.limiter.quota(),
            });
        }
        self.inner.resolve(kid).await
    }
}
