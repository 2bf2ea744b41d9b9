//! Client state shared by the presentation layer.
//!
//! [`AppState`] is the one context object the presentation layer holds: the
//! session coordinator, the cart, the current page and the login prompt. It is
//! constructed at startup and passed explicitly; nothing here is global.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::watch;
use tracing::{info, warn};

use shophere_core::ProductId;

use crate::config::StorefrontConfig;
use crate::db::{CredentialRepository, FileSessionStore, InMemoryCredentialStore, SessionStore};
use crate::error::{self, AppError};
use crate::models::{CartLine, Identity, Session};
use crate::routes::forms::{LoginForm, RegistrationForm};
use crate::routes::{AccessDenied, GateDecision, GateEffect, Navigation, Page};
use crate::services::auth::{AuthError, SessionCoordinator};
use crate::services::cart::Cart;
use crate::services::checkout::{self, CheckoutError, OrderConfirmation};

/// Client state shared across the presentation layer.
///
/// This struct is cheaply cloneable via `Arc`; clones see the same session,
/// cart and page.
pub struct AppState<R = InMemoryCredentialStore> {
    inner: Arc<AppStateInner<R>>,
}

struct AppStateInner<R> {
    config: StorefrontConfig,
    coordinator: SessionCoordinator<R>,
    view: Mutex<ViewState>,
}

/// Per-session view state. Never held across an await.
#[derive(Debug, Default)]
struct ViewState {
    cart: Cart,
    navigation: Navigation,
    login_prompt: bool,
}

impl<R> Clone for AppState<R> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl AppState {
    /// Create the client state from configuration.
    ///
    /// Uses the seeded in-memory credential store and the file-backed session
    /// record at `config.session_file`.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::PasswordHash` if seeding the demo accounts fails.
    pub fn from_config(config: StorefrontConfig) -> Result<Self, AuthError> {
        let credentials = InMemoryCredentialStore::with_demo_accounts()?;
        let store = Arc::new(FileSessionStore::new(&config.session_file));
        Ok(Self::new(config, credentials, store))
    }
}

impl<R: CredentialRepository> AppState<R> {
    /// Create a new client state.
    ///
    /// # Arguments
    ///
    /// * `config` - Storefront configuration
    /// * `credentials` - Identity registry
    /// * `store` - Durable session record; rehydrated from immediately
    pub fn new(config: StorefrontConfig, credentials: R, store: Arc<dyn SessionStore>) -> Self {
        let coordinator = SessionCoordinator::new(credentials, store, config.auth_latency);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                coordinator,
                view: Mutex::new(ViewState::default()),
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the session coordinator.
    #[must_use]
    pub fn coordinator(&self) -> &SessionCoordinator<R> {
        &self.inner.coordinator
    }

    /// Snapshot of the current session.
    #[must_use]
    pub fn session(&self) -> Session {
        self.inner.coordinator.session()
    }

    /// Receiver notified after every session change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.inner.coordinator.subscribe()
    }

    /// Snapshot of the cart.
    #[must_use]
    pub fn cart(&self) -> Cart {
        self.view().cart.clone()
    }

    /// Snapshot of the navigation state.
    #[must_use]
    pub fn navigation(&self) -> Navigation {
        self.view().navigation.clone()
    }

    /// Whether the login prompt is open.
    #[must_use]
    pub fn login_prompt_open(&self) -> bool {
        self.view().login_prompt
    }

    /// Open the login prompt.
    pub fn open_login_prompt(&self) {
        self.view().login_prompt = true;
    }

    /// Close the login prompt.
    pub fn close_login_prompt(&self) {
        self.view().login_prompt = false;
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    /// Ask to move to `page`.
    pub fn request_page(&self, page: Page) -> GateDecision {
        error::add_breadcrumb("navigation", "Requested page", Some(&[("page", page.as_str())]));
        let session = self.session();
        let mut view = self.view();
        let decision = view.navigation.request_page(page, &session);
        view.apply(decision);
        decision
    }

    /// Select a product and show its page.
    pub fn select_product(&self, product: ProductId) {
        self.view().navigation.select_product(product);
    }

    /// Re-check the current page against the session; call before showing it.
    pub fn render(&self) -> GateDecision {
        let session = self.session();
        let mut view = self.view();
        let decision = view.navigation.render(&session);
        view.apply(decision);
        decision
    }

    // =========================================================================
    // Session
    // =========================================================================

    /// Validate the form and sign in.
    ///
    /// Closes the login prompt on success.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Form` if the input is invalid, or `AppError::Auth`
    /// if the coordinator rejects it.
    pub async fn login(&self, form: &LoginForm) -> Result<Identity, AppError> {
        form.validate()?;
        let identity = self
            .inner
            .coordinator
            .login(&form.email, &form.password, form.role)
            .await?;
        self.signed_in(&identity);
        Ok(identity)
    }

    /// Validate the form and register a new identity.
    ///
    /// Closes the login prompt on success.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Form` if the input is invalid, or `AppError::Auth`
    /// if the coordinator rejects it.
    pub async fn register(&self, form: &RegistrationForm) -> Result<Identity, AppError> {
        form.validate()?;
        let identity = self
            .inner
            .coordinator
            .register(form.profile(), &form.password, form.role)
            .await?;
        self.signed_in(&identity);
        Ok(identity)
    }

    /// End the session, empty the cart and re-check the current page.
    pub fn logout(&self) -> GateDecision {
        self.inner.coordinator.logout();
        error::clear_sentry_user();
        self.view().cart.clear();
        self.render()
    }

    /// Unverified demo role override; see
    /// [`SessionCoordinator::demo_switch_role`].
    #[cfg(feature = "demo-role-switch")]
    pub fn demo_switch_role(&self, role: shophere_core::Role) -> bool {
        let switched = self.inner.coordinator.demo_switch_role(role);
        if switched {
            self.render();
        }
        switched
    }

    fn signed_in(&self, identity: &Identity) {
        error::set_sentry_user(&identity.id, Some(identity.email.as_str()));
        self.close_login_prompt();
    }

    // =========================================================================
    // Cart
    // =========================================================================

    /// Add a line to the cart. Requires a signed-in session.
    ///
    /// # Errors
    ///
    /// Returns `AccessDenied::LoginRequired` when no one is signed in; the
    /// login prompt is opened.
    pub fn add_to_cart(&self, line: CartLine) -> Result<(), AccessDenied> {
        let signed_in = self.session().is_authenticated();
        let mut view = self.view();
        if !signed_in {
            view.login_prompt = true;
            return Err(AccessDenied::LoginRequired);
        }
        view.cart.add_item(line);
        Ok(())
    }

    /// Set a cart line's quantity; zero or less removes it.
    pub fn update_quantity(&self, product_id: &ProductId, quantity: i64) {
        self.view().cart.update_quantity(product_id, quantity);
    }

    /// Remove a cart line.
    pub fn remove_from_cart(&self, product_id: &ProductId) {
        self.view().cart.remove_item(product_id);
    }

    /// Place an order for the cart and take the ordered lines out of it.
    ///
    /// Lines added while the order is in flight stay in the cart.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::LoginRequired` when no one is signed in, or
    /// when the shopper signed out before the order went through. Returns
    /// `CheckoutError::EmptyCart` if there is nothing to order.
    pub async fn checkout(&self) -> Result<OrderConfirmation, CheckoutError> {
        let Some(shopper) = self.session().identity().cloned() else {
            self.open_login_prompt();
            return Err(CheckoutError::LoginRequired);
        };

        let lines = self.view().cart.lines().to_vec();
        let order = checkout::place_order(lines, self.inner.config.checkout_latency).await?;

        if self.session().identity() != Some(&shopper) {
            warn!(email = %shopper.email, "Session changed during checkout, order dropped");
            self.open_login_prompt();
            return Err(CheckoutError::LoginRequired);
        }

        self.view().cart.deduct(&order.lines);
        info!(items = order.item_count(), "Cart checked out");
        Ok(order)
    }

    fn view(&self) -> MutexGuard<'_, ViewState> {
        self.inner
            .view
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl ViewState {
    const fn apply(&mut self, decision: GateDecision) {
        if matches!(decision.effect, Some(GateEffect::PromptLogin)) {
            self.login_prompt = true;
        }
    }
}
