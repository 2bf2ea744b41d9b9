//! Credential registry.
//!
//! [`CredentialRepository`] is the seam a real account backend would plug
//! into; [`InMemoryCredentialStore`] is the seeded, process-local registry
//! the client ships with.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use shophere_core::{Email, EmailError, Password, Role, UserId};

use super::RepositoryError;
use crate::models::Identity;
use crate::services::auth::{AuthError, hash_password};

/// Password shared by the seeded demo accounts.
pub const DEMO_PASSWORD: &str = "password123";

/// An identity together with its Argon2 password hash.
#[derive(Debug, Clone)]
pub struct CredentialRecord {
    /// Profile and assigned role.
    pub identity: Identity,
    /// PHC-format Argon2id hash.
    pub password_hash: String,
}

/// Lookup and insertion of identities keyed by email.
pub trait CredentialRepository: Send + Sync + 'static {
    /// Find the record for an email.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Unavailable` if the store cannot be read.
    fn find(
        &self,
        email: &Email,
    ) -> impl Future<Output = Result<Option<CredentialRecord>, RepositoryError>> + Send;

    /// Whether an identity is registered under this email.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Unavailable` if the store cannot be read.
    fn exists(&self, email: &Email) -> impl Future<Output = Result<bool, RepositoryError>> + Send;

    /// Register a new identity.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::DuplicateIdentity` if the email is taken.
    /// Returns `RepositoryError::Unavailable` if the store cannot be written.
    fn insert(
        &self,
        record: CredentialRecord,
    ) -> impl Future<Output = Result<(), RepositoryError>> + Send;
}

/// Process-local credential registry.
#[derive(Debug, Default)]
pub struct InMemoryCredentialStore {
    records: RwLock<HashMap<Email, CredentialRecord>>,
}

impl InMemoryCredentialStore {
    /// An empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry seeded with one account per role, all using [`DEMO_PASSWORD`].
    ///
    /// # Errors
    ///
    /// Returns `AuthError::PasswordHash` if hashing the demo password fails.
    pub fn with_demo_accounts() -> Result<Self, AuthError> {
        let password = Password::from(DEMO_PASSWORD);
        let mut records = HashMap::new();
        for identity in demo_identities()? {
            let password_hash = hash_password(&password)?;
            records.insert(
                identity.email.clone(),
                CredentialRecord {
                    identity,
                    password_hash,
                },
            );
        }

        Ok(Self {
            records: RwLock::new(records),
        })
    }

    /// Number of registered identities.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Unavailable` if the lock is poisoned.
    pub fn len(&self) -> Result<usize, RepositoryError> {
        Ok(self.read()?.len())
    }

    /// Whether no identity is registered.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Unavailable` if the lock is poisoned.
    pub fn is_empty(&self) -> Result<bool, RepositoryError> {
        Ok(self.read()?.is_empty())
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, HashMap<Email, CredentialRecord>>, RepositoryError> {
        self.records
            .read()
            .map_err(|_| RepositoryError::Unavailable("credential lock poisoned".to_owned()))
    }

    fn write(
        &self,
    ) -> Result<RwLockWriteGuard<'_, HashMap<Email, CredentialRecord>>, RepositoryError> {
        self.records
            .write()
            .map_err(|_| RepositoryError::Unavailable("credential lock poisoned".to_owned()))
    }
}

impl CredentialRepository for InMemoryCredentialStore {
    async fn find(&self, email: &Email) -> Result<Option<CredentialRecord>, RepositoryError> {
        Ok(self.read()?.get(email).cloned())
    }

    async fn exists(&self, email: &Email) -> Result<bool, RepositoryError> {
        Ok(self.read()?.contains_key(email))
    }

    async fn insert(&self, record: CredentialRecord) -> Result<(), RepositoryError> {
        let mut records = self.write()?;
        let email = record.identity.email.clone();
        if records.contains_key(&email) {
            return Err(RepositoryError::DuplicateIdentity(email.into_inner()));
        }
        records.insert(email, record);
        Ok(())
    }
}

/// Profiles of the seeded demo accounts.
///
/// # Errors
///
/// Returns `EmailError` only if a seeded address is malformed.
pub fn demo_identities() -> Result<Vec<Identity>, EmailError> {
    Ok(vec![
        Identity {
            id: UserId::new(1),
            name: "John Customer".to_owned(),
            email: Email::parse("customer@demo.com")?,
            role: Role::Customer,
            business_name: None,
            phone: None,
        },
        Identity {
            id: UserId::new(2),
            name: "Jane Vendor".to_owned(),
            email: Email::parse("vendor@demo.com")?,
            role: Role::Vendor,
            business_name: Some("TechStore Pro".to_owned()),
            phone: None,
        },
        Identity {
            id: UserId::new(3),
            name: "Admin User".to_owned(),
            email: Email::parse("admin@demo.com")?,
            role: Role::Admin,
            business_name: None,
            phone: None,
        },
    ])
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::services::auth::verify_password;

    fn email(s: &str) -> Email {
        Email::parse(s).unwrap()
    }

    #[tokio::test]
    async fn test_demo_accounts_cover_every_role() {
        let store = InMemoryCredentialStore::with_demo_accounts().unwrap();
        assert_eq!(store.len().unwrap(), 3);

        for (address, role) in [
            ("customer@demo.com", Role::Customer),
            ("vendor@demo.com", Role::Vendor),
            ("admin@demo.com", Role::Admin),
        ] {
            let record = store.find(&email(address)).await.unwrap().unwrap();
            assert_eq!(record.identity.role, role);
            assert_ne!(record.password_hash, DEMO_PASSWORD);
            verify_password(&Password::from(DEMO_PASSWORD), &record.password_hash).unwrap();
        }
    }

    #[tokio::test]
    async fn test_find_unknown_is_none() {
        let store = InMemoryCredentialStore::with_demo_accounts().unwrap();
        assert!(store.find(&email("ghost@demo.com")).await.unwrap().is_none());
        assert!(!store.exists(&email("ghost@demo.com")).await.unwrap());
    }

    #[tokio::test]
    async fn test_insert_rejects_duplicate_without_overwriting() {
        let store = InMemoryCredentialStore::with_demo_accounts().unwrap();
        let original = store.find(&email("vendor@demo.com")).await.unwrap().unwrap();

        let mut impostor = original.clone();
        impostor.identity.name = "Impostor".to_owned();
        impostor.password_hash = "not-a-hash".to_owned();

        let err = store.insert(impostor).await.unwrap_err();
        assert!(matches!(err, RepositoryError::DuplicateIdentity(ref e) if e == "vendor@demo.com"));

        let after = store.find(&email("vendor@demo.com")).await.unwrap().unwrap();
        assert_eq!(after.identity, original.identity);
        assert_eq!(after.password_hash, original.password_hash);
        assert_eq!(store.len().unwrap(), 3);
    }

    #[tokio::test]
    async fn test_insert_new_identity() {
        let store = InMemoryCredentialStore::new();
        assert!(store.is_empty().unwrap());

        let identity = Identity {
            id: UserId::new(42),
            name: "Sam Shopper".to_owned(),
            email: email("sam@shop.io"),
            role: Role::Customer,
            business_name: None,
            phone: Some("555-0100".to_owned()),
        };
        store
            .insert(CredentialRecord {
                identity: identity.clone(),
                password_hash: "hash".to_owned(),
            })
            .await
            .unwrap();

        assert!(store.exists(&email("SAM@shop.io")).await.unwrap());
        let found = store.find(&identity.email).await.unwrap().unwrap();
        assert_eq!(found.identity, identity);
    }
}
