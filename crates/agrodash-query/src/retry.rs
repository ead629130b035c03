//! Retry policy for failed fetches.

use std::time::Duration;

/// How a failed fetch is retried within a single fetch cycle.
///
/// The entry stays pending while retries run and only reaches the error
/// state once the policy is exhausted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RetryPolicy {
    /// Fail on the first error.
    #[default]
    None,

    /// Retry up to `retries` times, waiting `delay` between attempts.
    Fixed { retries: u32, delay: Duration },

    /// Retry up to `retries` times, doubling the wait from `base` up to `max`.
    Exponential {
        retries: u32,
        base: Duration,
        max: Duration,
    },
}

impl RetryPolicy {
    /// Maximum number of retries after the first attempt.
    pub fn max_retries(&self) -> u32 {
        match self {
            Self::None => 0,
            Self::Fixed { retries, .. } | Self::Exponential { retries, .. } => *retries,
        }
    }

    /// Delay before retry number `retry` (1-based), or `None` when exhausted.
    pub fn delay_for(&self, retry: u32) -> Option<Duration> {
        if retry == 0 || retry > self.max_retries() {
            return None;
        }

        match self {
            Self::None => None,
            Self::Fixed { delay, .. } => Some(*delay),
            Self::Exponential { base, max, .. } => {
                let factor = 2u32.saturating_pow(retry - 1);
                Some(base.saturating_mul(factor).min(*max))
            }
        }
    }
}
