//! Generated reports and scheduled report tasks.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::{CoreError, ReportId, TaskId};

/// Subject of a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportKind {
    Produccion,
    Financiero,
    Inventario,
    Personal,
}

impl ReportKind {
    pub const ALL: [ReportKind; 4] = [
        Self::Produccion,
        Self::Financiero,
        Self::Inventario,
        Self::Personal,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Produccion => "produccion",
            Self::Financiero => "financiero",
            Self::Inventario => "inventario",
            Self::Personal => "personal",
        }
    }

    /// Title used for newly generated reports.
    pub fn title(&self) -> &'static str {
        match self {
            Self::Produccion => "Reporte de producción",
            Self::Financiero => "Reporte financiero",
            Self::Inventario => "Reporte de inventario",
            Self::Personal => "Reporte de personal",
        }
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for ReportKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| CoreError::UnknownReportKind(s.to_string()))
    }
}

/// File format of a generated report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportFormat {
    #[default]
    Pdf,
    Excel,
}

/// A report that has already been produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedReport {
    pub id: ReportId,

    pub title: String,

    pub kind: ReportKind,

    pub format: ReportFormat,

    /// When it was generated.
    pub generated_at: DateTime<Utc>,

    /// File size in kilobytes.
    pub size_kb: u32,
}

/// How often a scheduled report runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportSchedule {
    Diario,
    Semanal,
    Mensual,
}

/// A scheduled task of the reports module.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportesTask {
    pub id: TaskId,

    pub title: String,

    pub kind: ReportKind,

    pub schedule: ReportSchedule,

    /// Next scheduled run.
    pub next_run: NaiveDate,

    /// Whether the schedule is active.
    pub enabled: bool,
}
