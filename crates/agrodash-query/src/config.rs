//! Query client configuration.

use std::time::Duration;

use crate::RetryPolicy;

/// Query client configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryConfig {
    /// How long a successful entry is served without refetching.
    pub stale_time: Duration,

    /// Retry policy applied inside each fetch cycle.
    pub retry: RetryPolicy,
}

impl QueryConfig {
    /// Builder method to set the stale time.
    pub fn with_stale_time(mut self, stale_time: Duration) -> Self {
        self.stale_time = stale_time;
        self
    }

    /// Builder method to set the retry policy.
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            stale_time: Duration::from_secs(30),
            retry: RetryPolicy::None,
        }
    }
}
