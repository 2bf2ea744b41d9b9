//! Session-related types.
//!
//! A [`Session`] is a snapshot of the authenticated-or-anonymous state. Only
//! the coordinator in `services::auth` mutates it.

use shophere_core::Role;

use super::user::Identity;

/// Where the session stands in the login lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// No identity and no call in flight.
    Anonymous,
    /// A login or register call is waiting to resolve.
    Authenticating,
    /// Signed in with the given active role.
    Authenticated(Role),
}

/// The current process's session.
///
/// Invariant: `is_authenticated()` holds exactly when an identity is present,
/// and the active role is `customer` whenever it does not.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    identity: Option<Identity>,
    role: Role,
    pending_attempt: Option<u64>,
}

impl Session {
    /// A signed-in session, as produced by login, register or rehydration.
    #[must_use]
    pub const fn authenticated(identity: Identity, role: Role) -> Self {
        Self {
            identity: Some(identity),
            role,
            pending_attempt: None,
        }
    }

    /// The signed-in identity, if any.
    #[must_use]
    pub const fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    /// The active role. `customer` when anonymous.
    #[must_use]
    pub const fn role(&self) -> Role {
        self.role
    }

    /// Whether an identity is signed in.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }

    /// Whether the session is signed in with the given active role.
    #[must_use]
    pub fn has_role(&self, role: Role) -> bool {
        self.is_authenticated() && self.role == role
    }

    /// Lifecycle phase derived from the snapshot.
    #[must_use]
    pub const fn phase(&self) -> SessionPhase {
        if self.pending_attempt.is_some() {
            SessionPhase::Authenticating
        } else if self.identity.is_some() {
            SessionPhase::Authenticated(self.role)
        } else {
            SessionPhase::Anonymous
        }
    }

    pub(crate) const fn pending_attempt(&self) -> Option<u64> {
        self.pending_attempt
    }

    pub(crate) const fn begin_attempt(&mut self, attempt: u64) {
        self.pending_attempt = Some(attempt);
    }

    /// Clears the pending attempt if it is `attempt`. Returns whether it was.
    pub(crate) fn settle_attempt(&mut self, attempt: u64) -> bool {
        if self.pending_attempt == Some(attempt) {
            self.pending_attempt = None;
            true
        } else {
            false
        }
    }

    pub(crate) fn sign_in(&mut self, identity: Identity, role: Role) {
        self.identity = Some(identity);
        self.role = role;
    }

    pub(crate) fn sign_out(&mut self) {
        *self = Self::default();
    }

    pub(crate) const fn set_role(&mut self, role: Role) {
        self.role = role;
    }
}

/// Keys of the durable session record.
pub mod keys {
    /// Serialized [`Identity`](super::Identity), without credential.
    pub const USER: &str = "user";

    /// Active role: `customer`, `vendor` or `admin`.
    pub const USER_ROLE: &str = "userRole";
}
