//! ShopHere Core - Shared types library.
//!
//! This crate provides common types used across all ShopHere components:
//! - `storefront` - Session, cart and navigation logic for the marketplace client
//! - `cli` - Interactive shell and maintenance commands
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O, no persistence,
//! no async runtime. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, money, emails, roles and credentials

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
