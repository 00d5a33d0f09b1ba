//! Configuration for the board, the reachability simulator and the relay server.

use std::net::SocketAddr;
use std::ops::Range;
use std::path::PathBuf;
use std::time::Duration;

/// User agent the relay presents to upstream servers.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Precedence table used by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClassificationScheme {
    /// Anchored scheme prefixes, strict MTProto, the full protocol set.
    #[default]
    Strict,
    /// Unanchored substring matching over a reduced protocol set.
    Loose,
}

/// Parameters of the simulated reachability check.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationConfig {
    /// Delay before an outcome is reported, in milliseconds.
    pub delay_ms: Range<u64>,
    /// Probability that a check succeeds.
    pub success_probability: f64,
    /// Latency reported on success, in milliseconds.
    pub latency_ms: Range<u32>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            delay_ms: 500..2500,
            success_probability: 0.7,
            latency_ms: 50..450,
        }
    }
}

/// Configuration for the board.
#[derive(Debug, Clone)]
pub struct BoardConfig {
    /// Relay endpoint, e.g. "http://127.0.0.1:3000/api/fetch".
    pub relay_endpoint: String,
    /// Timeout for a single relay request.
    pub request_timeout: Duration,
    /// Number of times to retry a relay request after a transport failure.
    pub retry_count: usize,
    /// Maximum relay requests per second.
    pub max_requests_per_second: f64,
    /// Precedence table used to classify configurations.
    pub classification: ClassificationScheme,
    /// Reachability simulator parameters.
    pub simulation: SimulationConfig,
    /// Start a simulated test of every item after a remote fetch.
    pub auto_test_after_fetch: bool,
    /// File the theme preference is persisted to.
    pub preferences_path: Option<PathBuf>,
}

impl BoardConfig {
    /// Create a new configuration builder.
    pub fn builder() -> BoardConfigBuilder {
        BoardConfigBuilder::new()
    }
}

impl Default for BoardConfig {
    fn default() -> Self {
        BoardConfigBuilder::new().build()
    }
}

/// Builder for `BoardConfig`.
pub struct BoardConfigBuilder {
    relay_endpoint: Option<String>,
    request_timeout: Option<Duration>,
    retry_count: Option<usize>,
    max_requests_per_second: Option<f64>,
    classification: Option<ClassificationScheme>,
    simulation: Option<SimulationConfig>,
    auto_test_after_fetch: Option<bool>,
    preferences_path: Option<PathBuf>,
}

impl BoardConfigBuilder {
    /// Create a new builder with default values.
    pub fn new() -> Self {
        Self {
            relay_endpoint: None,
            request_timeout: None,
            retry_count: None,
            max_requests_per_second: None,
            classification: None,
            simulation: None,
            auto_test_after_fetch: None,
            preferences_path: None,
        }
    }

    /// Set the relay endpoint remote addresses are fetched through.
    pub fn relay_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.relay_endpoint = Some(endpoint.into());
        self
    }

    /// Set the timeout for a single relay request.
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Set the number of retries after a transport failure.
    pub fn retry_count(mut self, count: usize) -> Self {
        self.retry_count = Some(count);
        self
    }

    /// Set the maximum relay requests per second.
    pub fn max_requests_per_second(mut self, rps: f64) -> Self {
        self.max_requests_per_second = Some(rps);
        self
    }

    /// Set the classification precedence table.
    pub fn classification(mut self, scheme: ClassificationScheme) -> Self {
        self.classification = Some(scheme);
        self
    }

    /// Set the reachability simulator parameters.
    pub fn simulation(mut self, simulation: SimulationConfig) -> Self {
        self.simulation = Some(simulation);
        self
    }

    /// Enable or disable the automatic test run after a remote fetch.
    pub fn auto_test_after_fetch(mut self, enabled: bool) -> Self {
        self.auto_test_after_fetch = Some(enabled);
        self
    }

    /// Persist the theme preference to this file.
    pub fn preferences_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.preferences_path = Some(path.into());
        self
    }

    /// Build the configuration.
    pub fn build(self) -> BoardConfig {
        BoardConfig {
            relay_endpoint: self
                .relay_endpoint
                .unwrap_or_else(|| "http://127.0.0.1:3000/api/fetch".to_string()),
            request_timeout: self.request_timeout.unwrap_or(Duration::from_secs(30)),
            retry_count: self.retry_count.unwrap_or(1),
            max_requests_per_second: self.max_requests_per_second.unwrap_or(5.0),
            classification: self.classification.unwrap_or_default(),
            simulation: self.simulation.unwrap_or_default(),
            auto_test_after_fetch: self.auto_test_after_fetch.unwrap_or(true),
            preferences_path: self.preferences_path,
        }
    }
}

impl Default for BoardConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Configuration for the relay server.
#[derive(Debug, Clone)]
pub struct RelayServerConfig {
    /// Address to listen on.
    pub listen: SocketAddr,
    /// Route the relay is mounted at.
    pub path: String,
    /// User agent sent upstream.
    pub user_agent: String,
    /// Timeout for the upstream fetch.
    pub upstream_timeout: Duration,
}

impl Default for RelayServerConfig {
    fn default() -> Self {
        Self {
            listen: SocketAddr::from(([127, 0, 0, 1], 3000)),
            path: "/api/fetch".to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            upstream_timeout: Duration::from_secs(30),
        }
    }
}
