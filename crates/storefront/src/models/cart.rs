//! Cart line type.

use serde::{Deserialize, Serialize};

use shophere_core::{Money, ProductId};

/// One product's quantity within the current session's cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    /// Catalog reference; unique within a cart.
    pub product_id: ProductId,
    /// Product name at the time it was added.
    pub name: String,
    /// Price of one unit.
    pub unit_price: Money,
    /// Image reference for display.
    pub image: String,
    /// Selling vendor's name.
    pub vendor: String,
    /// Units in the cart. Never zero once stored.
    pub quantity: u32,
}

impl CartLine {
    /// `unit_price * quantity`, unrounded.
    #[must_use]
    pub fn line_total(&self) -> Money {
        self.unit_price * self.quantity
    }
}
