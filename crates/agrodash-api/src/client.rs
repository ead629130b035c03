//! The data source interface consumed by the dashboard queries.

use async_trait::async_trait;

use agrodash_core::{
    Activity, DashboardMetric, GeneratedReport, InventoryItem, ModuleComparison, MonthlyIncome,
    ProductionSummary, ReportKind, ReportesTask, Task, WeatherData, WorkerSummary,
};

use crate::ApiError;

/// Farm data API. One method per endpoint.
///
/// Implemented by [`MockFarmApi`](crate::MockFarmApi); a networked client can
/// implement it without touching the query layer.
#[async_trait]
pub trait FarmApi: Send + Sync {
    /// Stat cards at the top of the dashboard.
    async fn metrics(&self) -> Result<Vec<DashboardMetric>, ApiError>;

    /// Production totals per module.
    async fn production_summary(&self) -> Result<Vec<ProductionSummary>, ApiError>;

    /// Inventory items with their stock status.
    async fn inventory(&self) -> Result<Vec<InventoryItem>, ApiError>;

    /// Farm task board.
    async fn tasks(&self) -> Result<Vec<Task>, ApiError>;

    /// Worker workload summaries.
    async fn workers(&self) -> Result<Vec<WorkerSummary>, ApiError>;

    /// Recent activity feed.
    async fn activities(&self) -> Result<Vec<Activity>, ApiError>;

    /// Current weather and forecast.
    async fn weather(&self) -> Result<WeatherData, ApiError>;

    /// Income and expenses per month.
    async fn monthly_income(&self) -> Result<Vec<MonthlyIncome>, ApiError>;

    /// Income, expenses and production share per module.
    async fn module_comparison(&self) -> Result<Vec<ModuleComparison>, ApiError>;

    /// Reports already generated.
    async fn generated_reports(&self) -> Result<Vec<GeneratedReport>, ApiError>;

    /// Scheduled tasks of the reports module.
    async fn reportes_tasks(&self) -> Result<Vec<ReportesTask>, ApiError>;

    /// Generate a new report of the given kind.
    async fn generate_report(&self, kind: ReportKind) -> Result<GeneratedReport, ApiError>;
}
