//! Session & access coordination.
//!
//! [`SessionCoordinator`] owns the authenticated-identity lifecycle: it
//! rehydrates the durable session record once at construction, resolves
//! login and registration after a simulated round trip, ends sessions on
//! logout, and publishes every change on a `watch` channel.
//!
//! # Overlapping calls
//!
//! Each login/register takes the next attempt number and records it as the
//! session's pending attempt. A call only applies its result if its attempt
//! is still pending when it resolves, so an older call that finishes late can
//! never overwrite a newer one. Logout clears the pending attempt.

mod error;
mod password;

pub use error::AuthError;
pub use password::{hash_password, verify_password};

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use chrono::Utc;
use tokio::sync::watch;
use tracing::{debug, info, instrument, warn};

use shophere_core::{Email, Password, Role, UserId};

use crate::db::{CredentialRecord, CredentialRepository, RepositoryError, SessionStore};
use crate::models::{Identity, Profile, Session, session_keys};

/// Coordinates the session lifecycle.
///
/// Cheap to clone; clones share one session.
pub struct SessionCoordinator<R> {
    inner: Arc<Inner<R>>,
}

struct Inner<R> {
    credentials: R,
    store: Arc<dyn SessionStore>,
    latency: Duration,
    attempts: AtomicU64,
    session: watch::Sender<Session>,
}

impl<R> Clone for SessionCoordinator<R> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<R: CredentialRepository> SessionCoordinator<R> {
    /// Create a coordinator, rehydrating from `store`.
    ///
    /// If the store holds both a `user` and a `userRole` entry the session
    /// starts authenticated with them; the credential repository is not
    /// consulted. Otherwise the session starts anonymous.
    ///
    /// # Arguments
    ///
    /// * `credentials` - Identity registry used by login and register
    /// * `store` - Durable session record
    /// * `latency` - Simulated round trip applied to login and register
    pub fn new(credentials: R, store: Arc<dyn SessionStore>, latency: Duration) -> Self {
        let session = rehydrate(store.as_ref()).unwrap_or_default();

        Self {
            inner: Arc::new(Inner {
                credentials,
                store,
                latency,
                attempts: AtomicU64::new(0),
                session: watch::Sender::new(session),
            }),
        }
    }

    /// Snapshot of the current session.
    #[must_use]
    pub fn session(&self) -> Session {
        self.inner.session.borrow().clone()
    }

    /// Receiver notified after every session change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.inner.session.subscribe()
    }

    /// The credential repository backing login and register.
    #[must_use]
    pub fn credentials(&self) -> &R {
        &self.inner.credentials
    }

    /// Sign in with an email, password and the role the caller claims.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` if the email is malformed.
    /// Returns `AuthError::NotFound` if no identity uses the email.
    /// Returns `AuthError::BadCredential` if the password is wrong.
    /// Returns `AuthError::RoleMismatch` if the account has a different role.
    /// Returns `AuthError::Superseded` if a newer call or a logout overtook this one.
    #[instrument(skip(self, password), fields(role = %claimed_role))]
    pub async fn login(
        &self,
        email: &str,
        password: &Password,
        claimed_role: Role,
    ) -> Result<Identity, AuthError> {
        let attempt = self.begin_attempt();
        tokio::time::sleep(self.inner.latency).await;

        let outcome = self.check_credentials(email, password, claimed_role).await;
        self.resolve(attempt, outcome, claimed_role)
    }

    /// Register a new identity and sign it in.
    ///
    /// Profile fields are stored as given; validation is the caller's job.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` if the email is malformed.
    /// Returns `AuthError::AlreadyExists` if the email is already registered.
    /// Returns `AuthError::Superseded` if a newer call or a logout overtook this one.
    #[instrument(skip(self, profile, password), fields(email = %profile.email, role = %role))]
    pub async fn register(
        &self,
        profile: Profile,
        password: &Password,
        role: Role,
    ) -> Result<Identity, AuthError> {
        let attempt = self.begin_attempt();
        tokio::time::sleep(self.inner.latency).await;

        let outcome = self.create_account(attempt, profile, password, role).await;
        self.resolve(attempt, outcome, role)
    }

    /// End the session.
    ///
    /// Clears the identity, resets the role to `customer`, abandons any
    /// in-flight login and removes the durable record.
    pub fn logout(&self) {
        self.inner.session.send_modify(|session| {
            if let Some(identity) = session.identity() {
                info!(email = %identity.email, "Signed out");
            }
            session.sign_out();
            self.forget_record();
        });
    }

    /// Override the active role without re-authenticating.
    ///
    /// Demo-only: backs the role selector of the demo client. It performs no
    /// credential check and must not be used as an authorization mechanism.
    /// Does nothing when no one is signed in.
    ///
    /// Returns whether the override was applied.
    #[cfg(feature = "demo-role-switch")]
    pub fn demo_switch_role(&self, role: Role) -> bool {
        self.inner.session.send_if_modified(|session| {
            if !session.is_authenticated() {
                debug!(%role, "Ignoring role switch without a session");
                return false;
            }
            warn!(from = %session.role(), to = %role, "Unverified demo role switch");
            session.set_role(role);
            self.write_record(session_keys::USER_ROLE, role.as_str());
            true
        })
    }

    // =========================================================================
    // Attempt bookkeeping
    // =========================================================================

    fn begin_attempt(&self) -> u64 {
        let mut attempt = 0;
        self.inner.session.send_modify(|session| {
            attempt = self.inner.attempts.fetch_add(1, Ordering::Relaxed) + 1;
            session.begin_attempt(attempt);
        });
        debug!(attempt, "Sign-in attempt started");
        attempt
    }

    fn is_pending(&self, attempt: u64) -> bool {
        self.inner.session.borrow().pending_attempt() == Some(attempt)
    }

    /// Apply `outcome` if `attempt` is still the pending one.
    fn resolve(
        &self,
        attempt: u64,
        outcome: Result<Identity, AuthError>,
        role: Role,
    ) -> Result<Identity, AuthError> {
        let mut current = false;
        self.inner.session.send_if_modified(|session| {
            if !session.settle_attempt(attempt) {
                return false;
            }
            current = true;
            if let Ok(identity) = &outcome {
                session.sign_in(identity.clone(), role);
                self.persist(identity, role);
            }
            true
        });

        if !current {
            debug!(attempt, "Discarding superseded sign-in result");
            return Err(AuthError::Superseded);
        }

        match &outcome {
            Ok(identity) => info!(attempt, email = %identity.email, %role, "Signed in"),
            Err(e) => info!(attempt, error = %e, "Sign-in rejected"),
        }
        outcome
    }

    // =========================================================================
    // Credential checks
    // =========================================================================

    async fn check_credentials(
        &self,
        email: &str,
        password: &Password,
        claimed_role: Role,
    ) -> Result<Identity, AuthError> {
        let email = Email::parse(email)?;

        let record = self
            .inner
            .credentials
            .find(&email)
            .await?
            .ok_or(AuthError::NotFound)?;

        verify_password(password, &record.password_hash)?;

        if record.identity.role != claimed_role {
            return Err(AuthError::RoleMismatch { role: claimed_role });
        }

        Ok(record.identity)
    }

    async fn create_account(
        &self,
        attempt: u64,
        profile: Profile,
        password: &Password,
        role: Role,
    ) -> Result<Identity, AuthError> {
        let email = Email::parse(&profile.email)?;

        if self.inner.credentials.exists(&email).await? {
            return Err(AuthError::AlreadyExists);
        }

        // A superseded registration must not leave an account behind.
        if !self.is_pending(attempt) {
            return Err(AuthError::Superseded);
        }

        let identity = Identity {
            id: UserId::new(Utc::now().timestamp_millis()),
            name: profile.name,
            email,
            role,
            business_name: profile.business_name,
            phone: profile.phone,
        };
        let password_hash = hash_password(password)?;

        self.inner
            .credentials
            .insert(CredentialRecord {
                identity: identity.clone(),
                password_hash,
            })
            .await
            .map_err(|e| match e {
                RepositoryError::DuplicateIdentity(_) => AuthError::AlreadyExists,
                other => AuthError::Repository(other),
            })?;

        info!(id = %identity.id, email = %identity.email, "Registered identity");
        Ok(identity)
    }

    // =========================================================================
    // Durable record (best effort)
    // =========================================================================

    fn persist(&self, identity: &Identity, role: Role) {
        match serde_json::to_string(identity) {
            Ok(json) => {
                self.write_record(session_keys::USER, &json);
                self.write_record(session_keys::USER_ROLE, role.as_str());
            }
            Err(e) => warn!(error = %e, "Failed to serialize identity for session record"),
        }
    }

    fn write_record(&self, key: &str, value: &str) {
        if let Err(e) = self.inner.store.insert(key, value) {
            warn!(error = %e, key, "Failed to persist session record");
        }
    }

    fn forget_record(&self) {
        for key in [session_keys::USER, session_keys::USER_ROLE] {
            if let Err(e) = self.inner.store.remove(key) {
                warn!(error = %e, key, "Failed to clear session record");
            }
        }
    }
}

/// Restore a session from the durable record, if it holds one.
fn rehydrate(store: &dyn SessionStore) -> Option<Session> {
    let user = read_record(store, session_keys::USER)?;
    let role = read_record(store, session_keys::USER_ROLE)?;

    let identity: Identity = serde_json::from_str(&user)
        .map_err(|e| warn!(error = %e, "Ignoring unreadable identity in session record"))
        .ok()?;
    let role: Role = role
        .parse()
        .map_err(|e| warn!(error = %e, "Ignoring unknown role in session record"))
        .ok()?;

    info!(email = %identity.email, %role, "Restored session from durable record");
    Some(Session::authenticated(identity, role))
}

fn read_record(store: &dyn SessionStore, key: &str) -> Option<String> {
    store
        .get(key)
        .map_err(|e| warn!(error = %e, key, "Failed to read session record"))
        .ok()
        .flatten()
}
