//! Inventory items.

use serde::{Deserialize, Serialize};

use crate::{ItemId, StockStatus};

/// A stocked supply (feed, fertilizer, medicine, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryItem {
    /// Unique item identifier.
    pub id: ItemId,

    /// Item name.
    pub name: String,

    /// Category (e.g., "Alimento", "Fertilizante").
    pub category: String,

    /// Quantity on hand.
    pub quantity: f64,

    /// Unit of the quantity.
    pub unit: String,

    /// Minimum stock before restocking.
    pub min_stock: f64,

    /// Current stock level.
    pub status: StockStatus,
}

impl InventoryItem {
    /// Create an item, classifying its status from the stock levels.
    pub fn new(
        id: impl Into<ItemId>,
        name: impl Into<String>,
        category: impl Into<String>,
        quantity: f64,
        unit: impl Into<String>,
        min_stock: f64,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category: category.into(),
            quantity,
            unit: unit.into(),
            min_stock,
            status: StockStatus::from_levels(quantity, min_stock),
        }
    }
}
