//! Storage for the storefront core.
//!
//! Two stores live here, with different lifetimes:
//!
//! - [`credentials`] - the identity registry consulted by login and register.
//!   In-memory only; registrations are lost when the process exits.
//! - [`session_store`] - the durable key/value record used to rehydrate the
//!   session on the next start.

pub mod credentials;
pub mod session_store;

pub use credentials::{CredentialRecord, CredentialRepository, InMemoryCredentialStore};
pub use session_store::{FileSessionStore, MemorySessionStore, SessionStore, StoreError};

/// Errors from credential repository operations.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// An identity with this email is already registered.
    #[error("identity already registered: {0}")]
    DuplicateIdentity(String),

    /// The backing store cannot be used.
    #[error("credential store unavailable: {0}")]
    Unavailable(String),
}
