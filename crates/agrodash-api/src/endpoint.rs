//! Names of the data source endpoints.

use std::fmt;
use std::str::FromStr;

use agrodash_core::CoreError;

/// One data source endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Endpoint {
    Metrics,
    ProductionSummary,
    Inventory,
    Tasks,
    Workers,
    Activities,
    Weather,
    MonthlyIncome,
    ModuleComparison,
    GeneratedReports,
    ReportesTasks,
    GenerateReport,
}

impl Endpoint {
    /// All endpoints.
    pub const ALL: [Endpoint; 12] = [
        Self::Metrics,
        Self::ProductionSummary,
        Self::Inventory,
        Self::Tasks,
        Self::Workers,
        Self::Activities,
        Self::Weather,
        Self::MonthlyIncome,
        Self::ModuleComparison,
        Self::GeneratedReports,
        Self::ReportesTasks,
        Self::GenerateReport,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Metrics => "metrics",
            Self::ProductionSummary => "production_summary",
            Self::Inventory => "inventory",
            Self::Tasks => "tasks",
            Self::Workers => "workers",
            Self::Activities => "activities",
            Self::Weather => "weather",
            Self::MonthlyIncome => "monthly_income",
            Self::ModuleComparison => "module_comparison",
            Self::GeneratedReports => "generated_reports",
            Self::ReportesTasks => "reportes_tasks",
            Self::GenerateReport => "generate_report",
        }
    }

    /// Returns true if calling the endpoint changes server-side data.
    pub fn is_mutation(&self) -> bool {
        matches!(self, Self::GenerateReport)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Endpoint {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|e| e.as_str().eq_ignore_ascii_case(&wanted))
            .ok_or_else(|| CoreError::UnknownEndpoint(s.to_string()))
    }
}
