//! Query cache errors.

use thiserror::Error;

use crate::QueryKey;

/// Errors surfaced through a cache entry.
///
/// Cloneable so one failure can be handed to every caller waiting on the key.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    /// The data source failed to produce a value.
    #[error("Source failed for '{key}': {message}")]
    SourceFailure { key: QueryKey, message: String },

    /// The cached value under this key has a different type than requested.
    ///
    /// Happens when one key is reused for two different payloads.
    #[error("Cached value for '{key}' is not a {expected}")]
    TypeMismatch { key: QueryKey, expected: &'static str },

    /// The fetch never settled (the source panicked or the runtime shut down).
    #[error("Fetch for '{key}' was aborted")]
    Aborted { key: QueryKey },
}

impl QueryError {
    /// Key the error belongs to.
    pub fn key(&self) -> &QueryKey {
        match self {
            Self::SourceFailure { key, .. } | Self::TypeMismatch { key, .. } | Self::Aborted { key } => key,
        }
    }
}
