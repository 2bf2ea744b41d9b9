//! Domain models for the storefront core.
//!
//! These are the values the presentation layer reads: who is signed in, in
//! which role, and what is in the cart.

pub mod cart;
pub mod session;
pub mod user;

pub use cart::CartLine;
pub use session::{Session, SessionPhase, keys as session_keys};
pub use user::{Identity, Profile};
