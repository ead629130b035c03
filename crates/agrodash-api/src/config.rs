//! Data source configuration.

use std::time::Duration;

use tracing::warn;

/// Environment variable overriding the simulated latency, in milliseconds.
pub const LATENCY_ENV: &str = "AGRODASH_LATENCY_MS";

/// Data source configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApiConfig {
    /// Simulated latency of every endpoint.
    pub latency: Duration,
}

impl ApiConfig {
    /// Defaults, with the latency taken from `AGRODASH_LATENCY_MS` when set.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(raw) = std::env::var(LATENCY_ENV) {
            match raw.trim().parse::<u64>() {
                Ok(ms) => config.latency = Duration::from_millis(ms),
                Err(e) => warn!(value = %raw, error = %e, "Ignoring invalid {}", LATENCY_ENV),
            }
        }
        config
    }

    /// Builder method to set the latency.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            latency: Duration::from_millis(500),
        }
    }
}
