//! AgroDash Query Cache
//!
//! A keyed cache in front of asynchronous data sources:
//! - `key`: stable, ordered query keys
//! - `entry`: the tagged Pending/Success/Error state stored per key
//! - `cache`: the explicit store, created by the caller and injected
//! - `client`: the wrapper that fetches, deduplicates and invalidates
//!
//! At most one fetch is in flight per key. Every caller waiting on a key
//! receives the same `Arc` of the resolved value.

pub mod cache;
pub mod client;
pub mod config;
pub mod entry;
pub mod error;
pub mod key;
pub mod retry;
pub mod subscription;

pub use cache::QueryCache;
pub use client::QueryClient;
pub use config::QueryConfig;
pub use entry::{CacheEntry, QueryState, QueryView};
pub use error::QueryError;
pub use key::QueryKey;
pub use retry::RetryPolicy;
pub use subscription::QuerySubscription;
