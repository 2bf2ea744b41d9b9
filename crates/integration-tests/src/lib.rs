//! Integration tests for `ShopHere`.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p shophere-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `session_lifecycle` - Login, registration, logout and rehydration
//! - `cart_checkout` - Cart aggregation through checkout
//! - `navigation` - Page gating as the session changes
//!
//! The helpers below build an [`AppState`] the way the client does at
//! startup, with the default simulated latencies. Tests run on a paused tokio
//! clock so those latencies elapse instantly.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use rust_decimal::Decimal;

use shophere_core::{Email, Money, Password, ProductId, Role};
use shophere_storefront::config::StorefrontConfig;
use shophere_storefront::db::{
    CredentialRecord, CredentialRepository, InMemoryCredentialStore, RepositoryError, SessionStore,
};
use shophere_storefront::models::CartLine;
use shophere_storefront::routes::forms::LoginForm;
use shophere_storefront::state::AppState;

/// Password of every demo account.
pub const DEMO_PASSWORD: &str = "password123";

/// Demo credential store that counts every lookup.
pub struct CountingStore {
    inner: InMemoryCredentialStore,
    lookups: Arc<AtomicUsize>,
}

impl CountingStore {
    /// Seeded store plus a handle to its lookup counter.
    ///
    /// # Panics
    ///
    /// Panics if the demo accounts cannot be seeded.
    #[must_use]
    pub fn seeded() -> (Self, Arc<AtomicUsize>) {
        let lookups = Arc::new(AtomicUsize::new(0));
        let store = Self {
            inner: InMemoryCredentialStore::with_demo_accounts().expect("seed demo accounts"),
            lookups: Arc::clone(&lookups),
        };
        (store, lookups)
    }
}

impl CredentialRepository for CountingStore {
    fn find(
        &self,
        email: &Email,
    ) -> impl Future<Output = Result<Option<CredentialRecord>, RepositoryError>> + Send {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.inner.find(email)
    }

    fn exists(&self, email: &Email) -> impl Future<Output = Result<bool, RepositoryError>> + Send {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.inner.exists(email)
    }

    fn insert(
        &self,
        record: CredentialRecord,
    ) -> impl Future<Output = Result<(), RepositoryError>> + Send {
        self.inner.insert(record)
    }
}

/// Client state over the demo accounts and the given session record.
///
/// Returns the state and the credential lookup counter.
#[must_use]
pub fn client(store: Arc<dyn SessionStore>) -> (AppState<CountingStore>, Arc<AtomicUsize>) {
    let (credentials, lookups) = CountingStore::seeded();
    let state = AppState::new(StorefrontConfig::default(), credentials, store);
    (state, lookups)
}

/// Sign-in form for a demo account.
#[must_use]
pub fn demo_login(email: &str, role: Role) -> LoginForm {
    LoginForm {
        email: email.to_owned(),
        password: Password::from(DEMO_PASSWORD),
        role,
    }
}

/// A cart line for product `id` at a whole-dollar price.
#[must_use]
pub fn cart_line(id: &str, price: i64, quantity: u32) -> CartLine {
    CartLine {
        product_id: ProductId::from(id),
        name: format!("Product {id}"),
        unit_price: Money::new(Decimal::from(price)),
        image: format!("/images/{id}.jpg"),
        vendor: "TechStore Pro".to_owned(),
        quantity,
    }
}
