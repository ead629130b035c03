//! Data source errors.

use thiserror::Error;

use crate::Endpoint;

/// Errors returned by data sources.
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// The endpoint failed to produce a value.
    #[error("Endpoint '{endpoint}' is unavailable")]
    Unavailable { endpoint: Endpoint },
}
