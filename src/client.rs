use crate::error::{ApiError, Result};
use reqwest::blocking::{Client, ClientBuilder};
use serde::Deserialize;
use std::time::Duration;

/// Key of the response payload in an enveloped response
pub const PRIMARY_DATA_KEY: &str = "data";
/// Key of the response metadata in an enveloped response
pub const PRIMARY_META_KEY: &str = "meta";
/// Key of the pagination block inside the metadata
pub const PAGINATION_KEY: &str = "pagination";

/// Create the HTTP client for API requests from the given configuration
pub fn create_rest_client(config: &Config) -> Result<Client> {
    ClientBuilder::new()
        .pool_max_idle_per_host(50)
        .timeout(config.timeout())
        .connect_timeout(config.connect_timeout())
        .build()
        .map_err(ApiError::transport)
}

/// Configuration for the API client
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// API base URL, without trailing slash
    pub base_url: String,
    /// API version path segment
    pub version: String,
    /// Maximum number of token regenerations per call
    pub retry_token_max: u32,
    /// Delay before re-attempting a call after token regeneration, in milliseconds
    pub retry_token_delay_ms: u64,
    /// Page size used by `NodeList::next_page`
    pub items_per_page: u32,
    /// Whole-request timeout, in milliseconds
    pub timeout_ms: u64,
    /// Connection timeout, in milliseconds
    pub connect_timeout_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            base_url: "http://www.example.com".to_string(),
            version: "v1".to_string(),
            retry_token_max: 1,
            retry_token_delay_ms: 1000,
            items_per_page: 20,
            timeout_ms: 300_000,
            connect_timeout_ms: 10_000,
        }
    }
}

impl Config {
    /// Create a new configuration with the given base URL and version
    pub fn new(base_url: impl Into<String>, version: impl Into<String>) -> Self {
        Config {
            base_url: base_url.into(),
            version: version.into(),
            ..Config::default()
        }
    }

    /// Set the maximum number of token regenerations per call
    pub fn with_retry_token_max(mut self, max: u32) -> Self {
        self.retry_token_max = max;
        self
    }

    /// Set the delay applied before a retried attempt
    pub fn with_retry_token_delay(mut self, delay: Duration) -> Self {
        self.retry_token_delay_ms = delay.as_millis() as u64;
        self
    }

    /// Set the default page size
    pub fn with_items_per_page(mut self, items: u32) -> Self {
        self.items_per_page = items;
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = timeout.as_millis() as u64;
        self
    }

    /// Set the connection timeout
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout_ms = timeout.as_millis() as u64;
        self
    }

    /// Get the delay applied before a retried attempt
    pub fn retry_token_delay(&self) -> Duration {
        Duration::from_millis(self.retry_token_delay_ms)
    }

    /// Get the request timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Get the connection timeout
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    /// Get the absolute URL for an endpoint path
    pub fn api_url(&self, path: &str) -> String {
        format!(
            "{}/{}/{}",
            self.base_url.trim_end_matches('/'),
            self.version,
            path.trim_start_matches('/')
        )
    }
}
