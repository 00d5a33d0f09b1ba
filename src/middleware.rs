//! Middleware implementation for reqwest that routes requests through the relay.

use anyhow::anyhow;
use async_trait::async_trait;
use governor::{
    clock::DefaultClock,
    middleware::NoOpMiddleware,
    state::{InMemoryState, NotKeyed},
    Quota, RateLimiter,
};
use log::{info, warn};
use reqwest_middleware::{Error, Middleware, Next, Result};
use std::num::NonZeroU32;
use std::sync::Arc;
use url::Url;

/// Middleware that rewrites every outbound request into a relay request.
///
/// A request for `https://example.com/page` becomes
/// `<endpoint>?url=https%3A%2F%2Fexample.com%2Fpage`.
#[derive(Clone)]
pub struct RelayMiddleware {
    /// The relay endpoint.
    endpoint: Url,
    /// Number of times to retry after a transport failure.
    retry_count: usize,
    /// Rate limiter shared by every request through this middleware.
    limiter: Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock, NoOpMiddleware>>,
}

impl RelayMiddleware {
    /// Create a new relay middleware.
    pub fn new(endpoint: Url, retry_count: usize, max_rps: f64) -> Self {
        let per_second = NonZeroU32::new(max_rps.ceil() as u32).unwrap_or(NonZeroU32::MIN);
        let limiter = Arc::new(RateLimiter::direct(Quota::per_second(per_second)));

        Self {
            endpoint,
            retry_count,
            limiter,
        }
    }

    /// Build the relay URL for a target address.
    pub fn relay_url(&self, target: &str) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut().append_pair("url", target);
        url
    }
}

#[async_trait]
impl Middleware for RelayMiddleware {
    async fn handle(
        &self,
        mut req: reqwest::Request,
        extensions: &mut http::Extensions,
        next: Next<'_>,
    ) -> Result<reqwest::Response> {
        let target = req.url().to_string();
        *req.url_mut() = self.relay_url(&target);

        let mut retry_count = 0;

        loop {
            let relayed = req.try_clone().ok_or_else(|| {
                Error::Middleware(anyhow!(
                    "Request object is not cloneable. Are you passing a streaming body?"
                        .to_string()
                ))
            })?;

            // Apply rate limiting
            self.limiter.until_ready().await;
            info!("Relaying {} (attempt {})", target, retry_count + 1);

            match next.clone().run(relayed, extensions).await {
                Ok(response) => return Ok(response),
                Err(err) => {
                    warn!(
                        "Relay request for {} failed (attempt {}): {}",
                        target,
                        retry_count + 1,
                        err
                    );

                    retry_count += 1;
                    if retry_count > self.retry_count {
                        return Err(err);
                    }
                }
            }
        }
    }
}
