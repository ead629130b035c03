//! Recent activity feed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ActivityId;

/// Kind of event recorded in the activity feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    Produccion,
    Inventario,
    Tarea,
    Venta,
    Salud,
}

/// One entry of the activity feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    pub id: ActivityId,

    pub kind: ActivityKind,

    /// Human-readable description.
    pub description: String,

    /// Who recorded it.
    pub user: String,

    /// When it happened.
    pub timestamp: DateTime<Utc>,
}
