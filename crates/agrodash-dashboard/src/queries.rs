//! Named dashboard queries.

use std::future::Future;
use std::sync::Arc;

use tracing::info;

use agrodash_api::{ApiError, Endpoint, FarmApi};
use agrodash_core::{
    Activity, DashboardMetric, GeneratedReport, InventoryItem, ModuleComparison, MonthlyIncome,
    ProductionSummary, ReportKind, ReportesTask, Task, WeatherData, WorkerSummary,
};
use agrodash_query::{QueryClient, QueryKey, QuerySubscription, QueryView};

use crate::keys;

/// One named query per data source endpoint, backed by a shared [`QueryClient`].
///
/// Cheap to clone; clones share the cache and the API.
#[derive(Clone)]
pub struct DashboardQueries {
    client: QueryClient,
    api: Arc<dyn FarmApi>,
}

impl DashboardQueries {
    /// Create the queries over a client and a data source.
    pub fn new(client: QueryClient, api: Arc<dyn FarmApi>) -> Self {
        Self { client, api }
    }

    pub fn client(&self) -> &QueryClient {
        &self.client
    }

    pub fn api(&self) -> &Arc<dyn FarmApi> {
        &self.api
    }

    /// Wrap an API call as a no-argument query source.
    fn source<T, F, Fut>(&self, call: F) -> impl Fn() -> Fut + Send + Sync + 'static
    where
        F: Fn(Arc<dyn FarmApi>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, ApiError>> + Send + 'static,
    {
        let api = Arc::clone(&self.api);
        move || call(Arc::clone(&api))
    }

    pub async fn metrics(&self) -> QueryView<Vec<DashboardMetric>> {
        let source = self.source(|api| async move { api.metrics().await });
        self.client.query(&keys::metrics(), source).await
    }

    pub async fn production_summary(&self) -> QueryView<Vec<ProductionSummary>> {
        let source = self.source(|api| async move { api.production_summary().await });
        self.client.query(&keys::production_summary(), source).await
    }

    pub async fn inventory(&self) -> QueryView<Vec<InventoryItem>> {
        let source = self.source(|api| async move { api.inventory().await });
        self.client.query(&keys::inventory(), source).await
    }

    pub async fn tasks(&self) -> QueryView<Vec<Task>> {
        let source = self.source(|api| async move { api.tasks().await });
        self.client.query(&keys::tasks(), source).await
    }

    pub async fn workers(&self) -> QueryView<Vec<WorkerSummary>> {
        let source = self.source(|api| async move { api.workers().await });
        self.client.query(&keys::workers(), source).await
    }

    pub async fn activities(&self) -> QueryView<Vec<Activity>> {
        let source = self.source(|api| async move { api.activities().await });
        self.client.query(&keys::activities(), source).await
    }

    pub async fn weather(&self) -> QueryView<WeatherData> {
        let source = self.source(|api| async move { api.weather().await });
        self.client.query(&keys::weather(), source).await
    }

    pub async fn monthly_income(&self) -> QueryView<Vec<MonthlyIncome>> {
        let source = self.source(|api| async move { api.monthly_income().await });
        self.client.query(&keys::monthly_income(), source).await
    }

    pub async fn module_comparison(&self) -> QueryView<Vec<ModuleComparison>> {
        let source = self.source(|api| async move { api.module_comparison().await });
        self.client.query(&keys::module_comparison(), source).await
    }

    pub async fn generated_reports(&self) -> QueryView<Vec<GeneratedReport>> {
        let source = self.source(|api| async move { api.generated_reports().await });
        self.client.query(&keys::generated_reports(), source).await
    }

    pub async fn reportes_tasks(&self) -> QueryView<Vec<ReportesTask>> {
        let source = self.source(|api| async move { api.reportes_tasks().await });
        self.client.query(&keys::reportes_tasks(), source).await
    }

    /// Follow the metrics cards as they load and refresh.
    pub async fn subscribe_metrics(&self) -> QuerySubscription<Vec<DashboardMetric>> {
        let source = self.source(|api| async move { api.metrics().await });
        self.client.subscribe(&keys::metrics(), source).await
    }

    /// Generate a report, then invalidate the reports queries so the next
    /// read includes it.
    pub async fn generate_report(&self, kind: ReportKind) -> Result<GeneratedReport, ApiError> {
        let report = self.api.generate_report(kind).await?;
        let invalidated = self.client.invalidate_prefix(&keys::reportes()).await;
        info!(report_id = %report.id, kind = %kind, invalidated, "Generated report");
        Ok(report)
    }

    /// Mark one endpoint's query stale.
    pub async fn invalidate(&self, endpoint: Endpoint) -> bool {
        match keys::for_endpoint(endpoint) {
            Some(key) => self.client.invalidate(&key).await,
            None => false,
        }
    }

    /// Mark every dashboard and reports query stale.
    pub async fn invalidate_all(&self) -> usize {
        let prefixes: [QueryKey; 2] = [keys::dashboard(), keys::reportes()];
        let mut count = 0;
        for prefix in &prefixes {
            count += self.client.invalidate_prefix(prefix).await;
        }
        count
    }
}
