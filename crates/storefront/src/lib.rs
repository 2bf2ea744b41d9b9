//! `ShopHere` storefront client core.
//!
//! Holds the state a marketplace client needs besides its views: who is
//! signed in and in which role, what is in the cart, and which page may be
//! shown. [`state::AppState`] ties the pieces together for a presentation
//! layer.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
