//! Key factory for every dashboard query.
//!
//! Keys are pure functions of the request, so two consumers of the same
//! resource always share one cache entry.

use agrodash_api::Endpoint;
use agrodash_query::QueryKey;

/// Root segment of the dashboard queries.
pub const DASHBOARD: &str = "dashboard";

/// Root segment of the reports module queries.
pub const REPORTES: &str = "reportes";

/// Prefix of every dashboard query.
pub fn dashboard() -> QueryKey {
    QueryKey::from([DASHBOARD])
}

/// Prefix of every reports query.
pub fn reportes() -> QueryKey {
    QueryKey::from([REPORTES])
}

pub fn metrics() -> QueryKey {
    dashboard().child("metrics")
}

pub fn production_summary() -> QueryKey {
    dashboard().child("production_summary")
}

pub fn inventory() -> QueryKey {
    dashboard().child("inventory")
}

pub fn tasks() -> QueryKey {
    dashboard().child("tasks")
}

pub fn workers() -> QueryKey {
    dashboard().child("workers")
}

pub fn activities() -> QueryKey {
    dashboard().child("activities")
}

pub fn weather() -> QueryKey {
    dashboard().child("weather")
}

pub fn monthly_income() -> QueryKey {
    dashboard().child("monthly_income")
}

pub fn module_comparison() -> QueryKey {
    dashboard().child("module_comparison")
}

pub fn generated_reports() -> QueryKey {
    reportes().child("generated")
}

pub fn reportes_tasks() -> QueryKey {
    reportes().child("tasks")
}

/// Key of the query reading an endpoint. Mutations have no key.
pub fn for_endpoint(endpoint: Endpoint) -> Option<QueryKey> {
    let key = match endpoint {
        Endpoint::Metrics => metrics(),
        Endpoint::ProductionSummary => production_summary(),
        Endpoint::Inventory => inventory(),
        Endpoint::Tasks => tasks(),
        Endpoint::Workers => workers(),
        Endpoint::Activities => activities(),
        Endpoint::Weather => weather(),
        Endpoint::MonthlyIncome => monthly_income(),
        Endpoint::ModuleComparison => module_comparison(),
        Endpoint::GeneratedReports => generated_reports(),
        Endpoint::ReportesTasks => reportes_tasks(),
        Endpoint::GenerateReport => return None,
    };
    Some(key)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_keys_are_stable() {
        assert_eq!(metrics(), metrics());
        assert_eq!(metrics().to_string(), "dashboard/metrics");
        assert_eq!(generated_reports().to_string(), "reportes/generated");
    }

    #[test]
    fn test_every_query_endpoint_has_a_distinct_key() {
        let keys: Vec<QueryKey> = Endpoint::ALL
            .into_iter()
            .filter_map(for_endpoint)
            .collect();
        let unique: HashSet<&QueryKey> = keys.iter().collect();

        assert_eq!(keys.len(), Endpoint::ALL.len() - 1);
        assert_eq!(unique.len(), keys.len());
    }

    #[test]
    fn test_report_keys_share_prefix() {
        assert!(generated_reports().starts_with(&reportes()));
        assert!(reportes_tasks().starts_with(&reportes()));
        assert!(!metrics().starts_with(&reportes()));
    }
}
