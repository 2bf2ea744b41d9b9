//! Authentication error types.

use thiserror::Error;

use shophere_core::Role;

use crate::db::RepositoryError;

/// Errors that can occur during authentication operations.
///
/// The user-facing variants render as the message shown in the sign-in form.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Malformed email address.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] shophere_core::EmailError),

    /// No identity is registered under the email.
    #[error("User not found")]
    NotFound,

    /// The password does not match.
    #[error("Invalid password")]
    BadCredential,

    /// The account exists but was registered with a different role.
    #[error("This account is not registered as a {role}")]
    RoleMismatch {
        /// The role the caller claimed.
        role: Role,
    },

    /// Registration with an email that is already taken.
    #[error("User already exists with this email")]
    AlreadyExists,

    /// A newer login/register call or a logout overtook this call.
    #[error("sign-in request was superseded by a newer one")]
    Superseded,

    /// Credential store failure.
    #[error("credential store error: {0}")]
    Repository(#[from] RepositoryError),

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,
}

impl AuthError {
    /// Whether the error describes the caller's input rather than a fault.
    #[must_use]
    pub const fn is_rejection(&self) -> bool {
        !matches!(self, Self::Repository(_) | Self::PasswordHash)
    }
}
