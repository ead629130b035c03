//! Every dashboard query loaded at once.

use tracing::{debug, warn};

use agrodash_core::{
    Activity, DashboardMetric, GeneratedReport, InventoryItem, ModuleComparison, MonthlyIncome,
    ProductionSummary, ReportesTask, Task, WeatherData, WorkerSummary,
};
use agrodash_query::{QueryError, QueryView};

use crate::DashboardQueries;

/// Views of all dashboard queries, as a page would render them.
#[derive(Debug, Clone)]
pub struct DashboardSnapshot {
    pub metrics: QueryView<Vec<DashboardMetric>>,
    pub production_summary: QueryView<Vec<ProductionSummary>>,
    pub inventory: QueryView<Vec<InventoryItem>>,
    pub tasks: QueryView<Vec<Task>>,
    pub workers: QueryView<Vec<WorkerSummary>>,
    pub activities: QueryView<Vec<Activity>>,
    pub weather: QueryView<WeatherData>,
    pub monthly_income: QueryView<Vec<MonthlyIncome>>,
    pub module_comparison: QueryView<Vec<ModuleComparison>>,
    pub generated_reports: QueryView<Vec<GeneratedReport>>,
    pub reportes_tasks: QueryView<Vec<ReportesTask>>,
}

impl DashboardSnapshot {
    /// Load every query concurrently.
    ///
    /// A failing query leaves its view in the error state; the others still load.
    pub async fn load(queries: &DashboardQueries) -> Self {
        let (
            metrics,
            production_summary,
            inventory,
            tasks,
            workers,
            activities,
            weather,
            monthly_income,
            module_comparison,
            generated_reports,
            reportes_tasks,
        ) = tokio::join!(
            queries.metrics(),
            queries.production_summary(),
            queries.inventory(),
            queries.tasks(),
            queries.workers(),
            queries.activities(),
            queries.weather(),
            queries.monthly_income(),
            queries.module_comparison(),
            queries.generated_reports(),
            queries.reportes_tasks(),
        );

        let snapshot = Self {
            metrics,
            production_summary,
            inventory,
            tasks,
            workers,
            activities,
            weather,
            monthly_income,
            module_comparison,
            generated_reports,
            reportes_tasks,
        };

        let failed = snapshot.errors();
        if failed.is_empty() {
            debug!("Dashboard snapshot loaded");
        } else {
            warn!(failed = failed.len(), "Dashboard snapshot loaded with errors");
        }
        snapshot
    }

    /// Invalidate every query, then load again.
    pub async fn refresh(queries: &DashboardQueries) -> Self {
        queries.invalidate_all().await;
        Self::load(queries).await
    }

    /// Sections whose query failed, with their error.
    pub fn errors(&self) -> Vec<(&'static str, &QueryError)> {
        [
            ("metrics", self.metrics.error.as_ref()),
            ("production_summary", self.production_summary.error.as_ref()),
            ("inventory", self.inventory.error.as_ref()),
            ("tasks", self.tasks.error.as_ref()),
            ("workers", self.workers.error.as_ref()),
            ("activities", self.activities.error.as_ref()),
            ("weather", self.weather.error.as_ref()),
            ("monthly_income", self.monthly_income.error.as_ref()),
            ("module_comparison", self.module_comparison.error.as_ref()),
            ("generated_reports", self.generated_reports.error.as_ref()),
            ("reportes_tasks", self.reportes_tasks.error.as_ref()),
        ]
        .into_iter()
        .filter_map(|(section, error)| error.map(|error| (section, error)))
        .collect()
    }

    /// Returns true if every section has data.
    pub fn is_complete(&self) -> bool {
        self.errors().is_empty()
    }
}
