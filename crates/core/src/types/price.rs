//! Money amounts and order pricing.
//!
//! Amounts stay at full decimal precision internally; rounding to cents
//! happens only when a value is formatted for display. Arithmetic saturates
//! at `Decimal::MAX` instead of overflowing.

use core::fmt;
use core::iter::Sum;
use core::ops::{Add, Mul};

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Sales tax applied to a cart subtotal (8%).
pub const SALES_TAX_RATE: Decimal = Decimal::from_parts(8, 0, 0, false, 2);

/// A non-negative amount in the store currency (USD).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    /// Zero dollars.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create an amount, clamping negative input to zero.
    #[must_use]
    pub fn new(amount: Decimal) -> Self {
        Self(amount.max(Decimal::ZERO))
    }

    /// The unrounded amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// The amount rounded half away from zero to cents.
    #[must_use]
    pub fn rounded(&self) -> Decimal {
        self.0
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    }

    /// Format for display (e.g., "$19.99").
    #[must_use]
    pub fn display(&self) -> String {
        format!("${:.2}", self.rounded())
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

impl From<Decimal> for Money {
    fn from(amount: Decimal) -> Self {
        Self::new(amount)
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl Mul<u32> for Money {
    type Output = Self;

    fn mul(self, quantity: u32) -> Self::Output {
        Self(self.0.saturating_mul(Decimal::from(quantity)))
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

/// Totals shown at checkout, derived from a cart subtotal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderSummary {
    /// Sum of line totals.
    pub subtotal: Money,
    /// Sales tax at [`SALES_TAX_RATE`].
    pub tax: Money,
    /// Shipping charge. Shipping is free.
    pub shipping: Money,
    /// Subtotal plus tax and shipping.
    pub total: Money,
}

impl OrderSummary {
    /// Apply the store pricing policy to a subtotal.
    #[must_use]
    pub fn from_subtotal(subtotal: Money) -> Self {
        let tax = Money::new(subtotal.amount().saturating_mul(SALES_TAX_RATE));
        let shipping = Money::ZERO;
        Self {
            subtotal,
            tax,
            shipping,
            total: subtotal + tax + shipping,
        }
    }
}
