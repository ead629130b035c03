//! Core domain errors.

use thiserror::Error;

/// Core domain errors for AgroDash.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// Endpoint name does not match any data source.
    #[error("Unknown endpoint: {0}")]
    UnknownEndpoint(String),

    /// Report kind not recognised.
    #[error("Unknown report kind: {0}")]
    UnknownReportKind(String),

    /// Farm module not recognised.
    #[error("Unknown farm module: {0}")]
    UnknownModule(String),
}
