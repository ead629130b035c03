//! Mock farm API serving seeded data after a simulated latency.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use agrodash_core::{
    Activity, DashboardMetric, GeneratedReport, InventoryItem, ModuleComparison, MonthlyIncome,
    ProductionSummary, ReportFormat, ReportId, ReportKind, ReportesTask, Task, WeatherData,
    WorkerSummary,
};

use crate::{seed, ApiConfig, ApiError, Endpoint, FarmApi};

/// Injected failure behavior of one endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailureMode {
    /// Always succeed.
    #[default]
    Never,
    /// Always fail.
    Always,
    /// Fail the next `n` calls, then succeed.
    Times(u32),
}

/// In-memory [`FarmApi`] backed by the seeded data.
pub struct MockFarmApi {
    config: ApiConfig,

    /// Calls per endpoint, including failed ones.
    calls: HashMap<Endpoint, AtomicU64>,

    /// Injected failures per endpoint.
    failures: Mutex<HashMap<Endpoint, FailureMode>>,

    /// Reports list; grows with every generated report.
    reports: RwLock<Vec<GeneratedReport>>,
}

impl MockFarmApi {
    /// Create a new MockFarmApi.
    pub fn new(config: ApiConfig) -> Self {
        Self {
            config,
            calls: Endpoint::ALL
                .into_iter()
                .map(|endpoint| (endpoint, AtomicU64::new(0)))
                .collect(),
            failures: Mutex::new(HashMap::new()),
            reports: RwLock::new(seed::generated_reports()),
        }
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// Builder method to inject a failure mode.
    pub fn with_failure(self, endpoint: Endpoint, mode: FailureMode) -> Self {
        self.set_failure(endpoint, mode);
        self
    }

    /// Change the failure mode of an endpoint.
    pub fn set_failure(&self, endpoint: Endpoint, mode: FailureMode) {
        let mut failures = self.failures.lock().unwrap_or_else(|e| e.into_inner());
        failures.insert(endpoint, mode);
    }

    /// Number of times an endpoint was called.
    pub fn call_count(&self, endpoint: Endpoint) -> u64 {
        self.calls
            .get(&endpoint)
            .map_or(0, |count| count.load(Ordering::SeqCst))
    }

    /// Record a call, wait the simulated latency, then apply injected failures.
    async fn call(&self, endpoint: Endpoint) -> Result<(), ApiError> {
        if let Some(count) = self.calls.get(&endpoint) {
            count.fetch_add(1, Ordering::SeqCst);
        }
        debug!(endpoint = %endpoint, latency = ?self.config.latency, "Serving mock endpoint");

        tokio::time::sleep(self.config.latency).await;

        if self.should_fail(endpoint) {
            warn!(endpoint = %endpoint, "Injected endpoint failure");
            return Err(ApiError::Unavailable { endpoint });
        }
        Ok(())
    }

    fn should_fail(&self, endpoint: Endpoint) -> bool {
        let mut failures = self.failures.lock().unwrap_or_else(|e| e.into_inner());
        match failures.get_mut(&endpoint) {
            None | Some(FailureMode::Never) => false,
            Some(FailureMode::Always) => true,
            Some(FailureMode::Times(0)) => false,
            Some(FailureMode::Times(n)) => {
                *n -= 1;
                true
            }
        }
    }
}

impl Default for MockFarmApi {
    fn default() -> Self {
        Self::new(ApiConfig::default())
    }
}

#[async_trait]
impl FarmApi for MockFarmApi {
    async fn metrics(&self) -> Result<Vec<DashboardMetric>, ApiError> {
        self.call(Endpoint::Metrics).await?;
        Ok(seed::metrics())
    }

    async fn production_summary(&self) -> Result<Vec<ProductionSummary>, ApiError> {
        self.call(Endpoint::ProductionSummary).await?;
        Ok(seed::production_summary())
    }

    async fn inventory(&self) -> Result<Vec<InventoryItem>, ApiError> {
        self.call(Endpoint::Inventory).await?;
        Ok(seed::inventory())
    }

    async fn tasks(&self) -> Result<Vec<Task>, ApiError> {
        self.call(Endpoint::Tasks).await?;
        Ok(seed::tasks())
    }

    async fn workers(&self) -> Result<Vec<WorkerSummary>, ApiError> {
        self.call(Endpoint::Workers).await?;
        Ok(seed::workers())
    }

    async fn activities(&self) -> Result<Vec<Activity>, ApiError> {
        self.call(Endpoint::Activities).await?;
        Ok(seed::activities())
    }

    async fn weather(&self) -> Result<WeatherData, ApiError> {
        self.call(Endpoint::Weather).await?;
        Ok(seed::weather())
    }

    async fn monthly_income(&self) -> Result<Vec<MonthlyIncome>, ApiError> {
        self.call(Endpoint::MonthlyIncome).await?;
        Ok(seed::monthly_income())
    }

    async fn module_comparison(&self) -> Result<Vec<ModuleComparison>, ApiError> {
        self.call(Endpoint::ModuleComparison).await?;
        Ok(seed::module_comparison())
    }

    async fn generated_reports(&self) -> Result<Vec<GeneratedReport>, ApiError> {
        self.call(Endpoint::GeneratedReports).await?;
        Ok(self.reports.read().await.clone())
    }

    async fn reportes_tasks(&self) -> Result<Vec<ReportesTask>, ApiError> {
        self.call(Endpoint::ReportesTasks).await?;
        Ok(seed::reportes_tasks())
    }

    async fn generate_report(&self, kind: ReportKind) -> Result<GeneratedReport, ApiError> {
        self.call(Endpoint::GenerateReport).await?;

        let report = GeneratedReport {
            id: ReportId::generate(),
            title: kind.title().to_string(),
            kind,
            format: ReportFormat::default(),
            generated_at: Utc::now(),
            size_kb: 128,
        };

        // Newest first, like the seeded list.
        self.reports.write().await.insert(0, report.clone());
        Ok(report)
    }
}
