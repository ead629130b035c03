//! Status and classification enums shared by the farm payloads.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::CoreError;

/// Stock level of an inventory item.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
    /// Quantity above the minimum stock.
    #[default]
    EnStock,
    /// Quantity at or below the minimum stock.
    Bajo,
    /// Quantity at or below half the minimum stock.
    Critico,
}

impl StockStatus {
    /// Classify a quantity against its minimum stock level.
    pub fn from_levels(quantity: f64, min_stock: f64) -> Self {
        if quantity <= min_stock / 2.0 {
            Self::Critico
        } else if quantity <= min_stock {
            Self::Bajo
        } else {
            Self::EnStock
        }
    }

    /// Returns true if the item needs restocking.
    pub fn needs_restock(&self) -> bool {
        !matches!(self, Self::EnStock)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EnStock => "en_stock",
            Self::Bajo => "bajo",
            Self::Critico => "critico",
        }
    }
}

impl fmt::Display for StockStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Status of a farm task.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Task not started.
    #[default]
    Pendiente,
    /// Task being worked on.
    EnProgreso,
    /// Task finished.
    Completada,
}

impl TaskStatus {
    /// Returns true if the task is finished.
    pub fn is_done(&self) -> bool {
        matches!(self, Self::Completada)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pendiente => "pendiente",
            Self::EnProgreso => "en_progreso",
            Self::Completada => "completada",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Priority of a farm task.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Baja,
    #[default]
    Media,
    Alta,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Baja => "baja",
            Self::Media => "media",
            Self::Alta => "alta",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Direction of a metric compared to the previous period.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Up,
    Down,
    #[default]
    Stable,
}

impl Trend {
    /// Derive the trend from a percentage change.
    pub fn from_change(change_pct: f64) -> Self {
        if change_pct > 0.0 {
            Self::Up
        } else if change_pct < 0.0 {
            Self::Down
        } else {
            Self::Stable
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Up => "▲",
            Self::Down => "▼",
            Self::Stable => "=",
        }
    }
}

/// Production module of the farm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FarmModule {
    /// Cattle.
    Ganaderia,
    /// Crops.
    Agricultura,
    /// Poultry.
    Avicultura,
    /// Fish farming.
    Piscicultura,
}

impl FarmModule {
    /// All modules in display order.
    pub const ALL: [FarmModule; 4] = [
        Self::Ganaderia,
        Self::Agricultura,
        Self::Avicultura,
        Self::Piscicultura,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ganaderia => "ganaderia",
            Self::Agricultura => "agricultura",
            Self::Avicultura => "avicultura",
            Self::Piscicultura => "piscicultura",
        }
    }
}

impl fmt::Display for FarmModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for FarmModule {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| CoreError::UnknownModule(s.to_string()))
    }
}
