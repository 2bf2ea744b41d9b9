//! Core types for ShopHere.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod credential;
pub mod email;
pub mod id;
pub mod price;
pub mod role;

pub use credential::Password;
pub use email::{Email, EmailError};
pub use id::*;
pub use price::{Money, OrderSummary, SALES_TAX_RATE};
pub use role::{Role, RoleParseError};
