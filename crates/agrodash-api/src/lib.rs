//! AgroDash data sources.
//!
//! Each endpoint is an asynchronous function that takes no arguments and
//! returns a fixed payload. [`MockFarmApi`] serves seeded data after a
//! simulated latency and can inject failures per endpoint.

mod client;
mod config;
mod endpoint;
mod error;
mod mock;
pub mod seed;

pub use client::FarmApi;
pub use config::ApiConfig;
pub use endpoint::Endpoint;
pub use error::ApiError;
pub use mock::{FailureMode, MockFarmApi};
