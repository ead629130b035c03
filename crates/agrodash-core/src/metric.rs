//! Stat-card metrics shown at the top of the dashboard.

use serde::{Deserialize, Serialize};

use crate::Trend;

/// A single stat card: a headline value and its change against the previous period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardMetric {
    /// Stable card identifier (e.g., "produccion_total").
    pub id: String,

    /// Card title.
    pub title: String,

    /// Current value.
    pub value: f64,

    /// Unit suffix (e.g., "L", "kg", "USD").
    pub unit: String,

    /// Percentage change against the previous period.
    pub change_pct: f64,

    /// Direction of the change.
    pub trend: Trend,
}

impl DashboardMetric {
    /// Create a metric, deriving the trend from the change.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        value: f64,
        unit: impl Into<String>,
        change_pct: f64,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            value,
            unit: unit.into(),
            change_pct,
            trend: Trend::from_change(change_pct),
        }
    }
}
