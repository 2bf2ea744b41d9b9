//! Business logic services for the storefront core.
//!
//! # Services
//!
//! - [`auth`] - Session & access coordination: login, registration, logout,
//!   rehydration and the demo role override
//! - [`cart`] - Cart aggregation: product quantities and subtotal
//! - [`checkout`] - Order placement over a cart snapshot

pub mod auth;
pub mod cart;
pub mod checkout;
