//! Cart aggregation.
//!
//! [`Cart`] keeps one line per product for the current session. Lines keep
//! the order in which their products were first added.

use tracing::debug;

use shophere_core::{Money, ProductId};

use crate::models::CartLine;

/// The current session's cart.
///
/// Invariants: product IDs are unique across lines, and every stored line
/// has a quantity of at least one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// An empty cart.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a line, merging with an existing line for the same product.
    ///
    /// A quantity of zero counts as one. When the product is already in the
    /// cart the existing line keeps its details and only its quantity grows.
    pub fn add_item(&mut self, mut line: CartLine) {
        line.quantity = line.quantity.max(1);

        if let Some(existing) = self.line_mut(&line.product_id) {
            existing.quantity = existing.quantity.saturating_add(line.quantity);
            debug!(product_id = %existing.product_id, quantity = existing.quantity, "Merged cart line");
        } else {
            debug!(product_id = %line.product_id, quantity = line.quantity, "Added cart line");
            self.lines.push(line);
        }
    }

    /// Set a line's quantity. Zero or less removes the line.
    ///
    /// Unknown products are ignored.
    pub fn update_quantity(&mut self, product_id: &ProductId, quantity: i64) {
        if quantity <= 0 {
            self.remove_item(product_id);
            return;
        }

        let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        if let Some(line) = self.line_mut(product_id) {
            line.quantity = quantity;
            debug!(%product_id, quantity, "Updated cart line");
        }
    }

    /// Remove a product's line if present.
    pub fn remove_item(&mut self, product_id: &ProductId) {
        let before = self.lines.len();
        self.lines.retain(|line| &line.product_id != product_id);
        if self.lines.len() != before {
            debug!(%product_id, "Removed cart line");
        }
    }

    /// Empty the cart.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Take ordered quantities out of the cart.
    ///
    /// Lines drop out once nothing is left of them. Products added after the
    /// order was taken, and quantity beyond what was ordered, stay.
    pub fn deduct(&mut self, ordered: &[CartLine]) {
        for placed in ordered {
            if let Some(line) = self.line_mut(&placed.product_id) {
                line.quantity = line.quantity.saturating_sub(placed.quantity);
            }
        }
        self.lines.retain(|line| line.quantity > 0);
    }

    /// Lines in display order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// The line for a product, if any.
    #[must_use]
    pub fn line(&self, product_id: &ProductId) -> Option<&CartLine> {
        self.lines.iter().find(|line| &line.product_id == product_id)
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Sum of all line quantities.
    #[must_use]
    pub fn total_item_count(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.quantity)).sum()
    }

    /// Sum of line totals, unrounded.
    #[must_use]
    pub fn subtotal(&self) -> Money {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    fn line_mut(&mut self, product_id: &ProductId) -> Option<&mut CartLine> {
        self.lines
            .iter_mut()
            .find(|line| &line.product_id == product_id)
    }
}
