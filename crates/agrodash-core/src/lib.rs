//! AgroDash Core Domain Types
//!
//! This crate contains the farm payloads served to the dashboard, with no
//! dependencies on:
//! - The query cache
//! - Data sources or transport
//! - Runtime specifics
//!
//! The cache treats every type here as an opaque value.

pub mod activity;
pub mod error;
pub mod ids;
pub mod inventory;
pub mod metric;
pub mod production;
pub mod report;
pub mod status;
pub mod task;
pub mod weather;
pub mod worker;

// Re-export commonly used types
pub use activity::{Activity, ActivityKind};
pub use error::CoreError;
pub use ids::{ActivityId, ItemId, ReportId, TaskId, WorkerId};
pub use inventory::InventoryItem;
pub use metric::DashboardMetric;
pub use production::{ModuleComparison, MonthlyIncome, ProductionSummary};
pub use report::{GeneratedReport, ReportFormat, ReportKind, ReportSchedule, ReportesTask};
pub use status::{FarmModule, Priority, StockStatus, TaskStatus, Trend};
pub use task::Task;
pub use weather::{DailyForecast, WeatherCondition, WeatherData};
pub use worker::WorkerSummary;
