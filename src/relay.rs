//! Client side of the relay: fetch a remote page's markup.

use crate::config::BoardConfig;
use crate::error::RelayError;
use crate::middleware::RelayMiddleware;

use log::{info, warn};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use url::Url;

/// Fetches remote pages through the relay endpoint.
#[derive(Clone)]
pub struct RelayClient {
    client: ClientWithMiddleware,
}

impl RelayClient {
    /// Create a relay client from the board configuration.
    pub fn new(config: &BoardConfig) -> Result<Self, RelayError> {
        let endpoint =
            Url::parse(&config.relay_endpoint).map_err(|source| RelayError::InvalidEndpoint {
                endpoint: config.relay_endpoint.clone(),
                source,
            })?;

        let inner = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| RelayError::Transport(e.into()))?;

        let client = ClientBuilder::new(inner)
            .with(RelayMiddleware::new(
                endpoint,
                config.retry_count,
                config.max_requests_per_second,
            ))
            .build();

        Ok(Self { client })
    }

    /// Fetch the raw markup at `address`.
    ///
    /// Any non-2xx relay response is an [`RelayError::Upstream`] carrying the
    /// body the relay sent back, which holds its reason for failing.
    pub async fn fetch_markup(&self, address: &str) -> Result<String, RelayError> {
        let target = Url::parse(address).map_err(|source| RelayError::InvalidAddress {
            address: address.to_string(),
            source,
        })?;

        let response = self.client.get(target).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let reason = match body.trim() {
                "" => status.canonical_reason().unwrap_or("upstream failure").to_string(),
                text => text.to_string(),
            };
            warn!("Relay returned {} for {}: {}", status, address, reason);
            return Err(RelayError::Upstream { status, reason });
        }

        let markup = response.text().await.map_err(RelayError::Body)?;
        info!("Fetched {} bytes from {}", markup.len(), address);
        Ok(markup)
    }
}
