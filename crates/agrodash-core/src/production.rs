//! Production, income and module comparison figures.

use serde::{Deserialize, Serialize};

use crate::FarmModule;

/// Production total of one farm module for the current period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductionSummary {
    /// Module that produced it.
    pub module: FarmModule,

    /// Product label (e.g., "Leche", "Huevos").
    pub product: String,

    /// Quantity produced.
    pub quantity: f64,

    /// Unit of the quantity.
    pub unit: String,

    /// Percentage change against the previous period.
    pub change_pct: f64,
}

/// Income and expenses of one month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyIncome {
    /// Short month label (e.g., "Ene").
    pub month: String,

    pub income: f64,

    pub expenses: f64,
}

impl MonthlyIncome {
    /// Income minus expenses.
    pub fn profit(&self) -> f64 {
        self.income - self.expenses
    }
}

/// Side-by-side figures of one module, used by the comparison chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleComparison {
    pub module: FarmModule,

    pub income: f64,

    pub expenses: f64,

    /// Share of total farm production, in percent.
    pub production_share_pct: f64,
}

impl ModuleComparison {
    /// Profit margin in percent, or zero when the module has no income.
    pub fn margin_pct(&self) -> f64 {
        if self.income == 0.0 {
            return 0.0;
        }
        (self.income - self.expenses) / self.income * 100.0
    }
}
