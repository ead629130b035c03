//! AgroDash dashboard queries.
//!
//! Binds each data source endpoint to a stable query key and exposes it as a
//! named query returning a [`QueryView`](agrodash_query::QueryView).

pub mod keys;
mod queries;
mod snapshot;

pub use queries::DashboardQueries;
pub use snapshot::DashboardSnapshot;
