// Shared transport configuration for building reqwest::Client instances.
//
// Shelly devices speak plain HTTP on the LAN, so there is no TLS story
// here; the config only carries the per-request timeout.

use std::time::Duration;

/// Default per-request timeout applied to every device call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Transport configuration for building the shared HTTP client.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Timeout applied to each RPC call; expiry cancels only that call.
    pub timeout: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl TransportConfig {
    pub fn with_timeout(timeout: Duration) -> Self {
        Self { timeout }
    }

    /// Build a `reqwest::Client` from this config.
    pub fn build_client(&self) -> Result<reqwest::Client, crate::error::Error> {
        reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(concat!("plugctl/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| crate::error::Error::ClientBuild(e.to_string()))
    }
}
