//! Simulated checkout.
//!
//! No payment provider is involved: placing an order waits out a fixed delay
//! and prices the cart with the store policy from [`OrderSummary`].

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use tracing::info;

use shophere_core::OrderSummary;

use crate::models::CartLine;

/// Errors that can occur when placing an order.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CheckoutError {
    /// Checkout requires a signed-in session.
    #[error("Please sign in to check out")]
    LoginRequired,

    /// There is nothing to order.
    #[error("Your cart is empty")]
    EmptyCart,
}

/// A placed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderConfirmation {
    /// The lines that were ordered.
    pub lines: Vec<CartLine>,
    /// Subtotal, tax, shipping and total.
    pub summary: OrderSummary,
    /// When the order was placed.
    pub placed_at: DateTime<Utc>,
}

impl OrderConfirmation {
    /// Total units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.quantity)).sum()
    }
}

/// Price `lines` and place the order after `latency`.
///
/// # Errors
///
/// Returns `CheckoutError::EmptyCart` if `lines` is empty.
pub async fn place_order(
    lines: Vec<CartLine>,
    latency: Duration,
) -> Result<OrderConfirmation, CheckoutError> {
    if lines.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }

    let subtotal = lines.iter().map(CartLine::line_total).sum();
    let summary = OrderSummary::from_subtotal(subtotal);

    tokio::time::sleep(latency).await;

    info!(lines = lines.len(), total = %summary.total, "Order placed");
    Ok(OrderConfirmation {
        lines,
        summary,
        placed_at: Utc::now(),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;
    use shophere_core::{Money, ProductId};

    use super::*;

    fn line(id: &str, price: &str, quantity: u32) -> CartLine {
        CartLine {
            product_id: ProductId::from(id),
            name: id.to_owned(),
            unit_price: Money::new(price.parse::<Decimal>().unwrap()),
            image: String::new(),
            vendor: "TechStore Pro".to_owned(),
            quantity,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_place_order_prices_lines() {
        let started = tokio::time::Instant::now();
        let order = place_order(
            vec![line("p1", "10", 3), line("p2", "4.99", 2)],
            Duration::from_millis(2000),
        )
        .await
        .unwrap();

        assert!(started.elapsed() >= Duration::from_millis(2000));
        assert_eq!(order.item_count(), 5);
        assert_eq!(order.summary.subtotal.display(), "$39.98");
        assert_eq!(order.summary.tax.display(), "$3.20");
        assert_eq!(order.summary.shipping, Money::ZERO);
        assert_eq!(order.summary.total.display(), "$43.18");
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_order_is_rejected_without_waiting() {
        let started = tokio::time::Instant::now();
        let err = place_order(Vec::new(), Duration::from_millis(2000))
            .await
            .unwrap_err();
        assert_eq!(err, CheckoutError::EmptyCart);
        assert!(started.elapsed() < Duration::from_millis(2000));
    }
}
