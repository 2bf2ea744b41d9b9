//! Page routing and the navigation gate.
//!
//! # Page Access
//!
//! ```text
//! home      - anyone
//! product   - anyone
//! cart      - signed in            (otherwise: prompt login, stay put)
//! orders    - signed in            (otherwise: prompt login, stay put)
//! vendor    - signed in as vendor  (otherwise: access denied, go home)
//! admin     - signed in as admin   (otherwise: access denied, go home)
//! ```
//!
//! [`check_access`] is a pure function of the requested page and the current
//! session. [`Navigation`] applies it on every page request and again every
//! time the current page is rendered, so a page never outlives the session
//! that allowed it.

pub mod forms;

use std::fmt;

use thiserror::Error;
use tracing::debug;

use shophere_core::{ProductId, Role};

use crate::models::Session;

/// Known pages. Unknown identifiers resolve to [`Page::Home`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Page {
    /// Product listing.
    #[default]
    Home,
    /// A single product.
    Product,
    /// The session's cart.
    Cart,
    /// Order history.
    Orders,
    /// Vendor dashboard.
    Vendor,
    /// Admin dashboard.
    Admin,
}

impl Page {
    /// All pages.
    pub const ALL: [Self; 6] = [
        Self::Home,
        Self::Product,
        Self::Cart,
        Self::Orders,
        Self::Vendor,
        Self::Admin,
    ];

    /// Page identifier.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::Product => "product",
            Self::Cart => "cart",
            Self::Orders => "orders",
            Self::Vendor => "vendor",
            Self::Admin => "admin",
        }
    }

    /// Role a page is reserved for, if any.
    #[must_use]
    pub const fn required_role(&self) -> Option<Role> {
        match self {
            Self::Vendor => Some(Role::Vendor),
            Self::Admin => Some(Role::Admin),
            _ => None,
        }
    }

    /// Whether the page needs a signed-in session.
    #[must_use]
    pub const fn requires_login(&self) -> bool {
        matches!(self, Self::Cart | Self::Orders | Self::Vendor | Self::Admin)
    }
}

impl From<&str> for Page {
    fn from(id: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|page| page.as_str() == id)
            .unwrap_or_default()
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A refused page or action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AccessDenied {
    /// No one is signed in.
    #[error("Please log in to continue")]
    LoginRequired,

    /// Signed in, but with a different active role.
    #[error("Access denied. {} account required.", .0.label())]
    RoleRequired(Role),
}

/// What the presentation layer should do besides showing the allowed page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateEffect {
    /// Open the login prompt.
    PromptLogin,
    /// Tell the user the page was refused.
    Denied(AccessDenied),
}

/// Outcome of a navigation check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GateDecision {
    /// The page to show.
    pub page: Page,
    /// Side effect to apply, if any.
    pub effect: Option<GateEffect>,
}

impl GateDecision {
    const fn allow(page: Page) -> Self {
        Self { page, effect: None }
    }

    /// Whether the requested page was allowed.
    #[must_use]
    pub const fn is_allowed(&self) -> bool {
        self.effect.is_none()
    }
}

/// Decide which page may be shown for `requested`.
///
/// `current` is where a refused login-only request stays. Role-restricted
/// pages always fall back to [`Page::Home`].
#[must_use]
pub fn check_access(requested: Page, current: Page, session: &Session) -> GateDecision {
    if let Some(role) = requested.required_role() {
        if session.has_role(role) {
            return GateDecision::allow(requested);
        }
        let reason = if session.is_authenticated() {
            AccessDenied::RoleRequired(role)
        } else {
            AccessDenied::LoginRequired
        };
        return GateDecision {
            page: Page::Home,
            effect: Some(GateEffect::Denied(reason)),
        };
    }

    if requested.requires_login() && !session.is_authenticated() {
        return GateDecision {
            page: current,
            effect: Some(GateEffect::PromptLogin),
        };
    }

    GateDecision::allow(requested)
}

/// Current page and selected product.
///
/// Only the gate moves between pages.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Navigation {
    page: Page,
    selected_product: Option<ProductId>,
}

impl Navigation {
    /// Start on the home page.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The page currently shown.
    #[must_use]
    pub const fn page(&self) -> Page {
        self.page
    }

    /// The product selected for the product page.
    #[must_use]
    pub const fn selected_product(&self) -> Option<&ProductId> {
        self.selected_product.as_ref()
    }

    /// Ask to move to `requested`.
    pub fn request_page(&mut self, requested: Page, session: &Session) -> GateDecision {
        let decision = check_access(requested, self.page, session);
        if !decision.is_allowed() {
            debug!(%requested, shown = %decision.page, effect = ?decision.effect, "Navigation refused");
        }
        self.page = decision.page;
        decision
    }

    /// Select a product and show its page.
    pub fn select_product(&mut self, product: ProductId) {
        self.selected_product = Some(product);
        self.page = Page::Product;
    }

    /// Re-check the current page against `session` before it is shown.
    ///
    /// A page the session no longer allows is replaced by the home page.
    pub fn render(&mut self, session: &Session) -> GateDecision {
        let decision = check_access(self.page, Page::Home, session);
        if !decision.is_allowed() {
            debug!(page = %self.page, effect = ?decision.effect, "Current page no longer allowed");
        }
        self.page = decision.page;
        decision
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use shophere_core::{Email, UserId};

    use super::*;
    use crate::models::Identity;

    fn signed_in(role: Role) -> Session {
        let identity = Identity {
            id: UserId::new(1),
            name: "John Customer".to_owned(),
            email: Email::parse("customer@demo.com").unwrap(),
            role: Role::Customer,
            business_name: None,
            phone: None,
        };
        Session::authenticated(identity, role)
    }

    #[test]
    fn test_unknown_page_is_home() {
        assert_eq!(Page::from("settings"), Page::Home);
        assert_eq!(Page::from("Admin"), Page::Home);
        assert_eq!(Page::from("orders"), Page::Orders);
    }

    #[test]
    fn test_public_pages_are_open() {
        let anonymous = Session::default();
        for page in [Page::Home, Page::Product] {
            assert_eq!(check_access(page, Page::Home, &anonymous), GateDecision::allow(page));
        }
    }

    #[test]
    fn test_login_pages_prompt_and_stay() {
        let anonymous = Session::default();
        for page in [Page::Cart, Page::Orders] {
            let decision = check_access(page, Page::Product, &anonymous);
            assert_eq!(decision.page, Page::Product);
            assert_eq!(decision.effect, Some(GateEffect::PromptLogin));
        }

        let decision = check_access(Page::Cart, Page::Home, &signed_in(Role::Vendor));
        assert_eq!(decision, GateDecision::allow(Page::Cart));
    }

    #[test]
    fn test_admin_page_never_shown_to_others() {
        for session in [
            Session::default(),
            signed_in(Role::Customer),
            signed_in(Role::Vendor),
        ] {
            let decision = check_access(Page::Admin, Page::Cart, &session);
            assert_eq!(decision.page, Page::Home);
            assert!(matches!(decision.effect, Some(GateEffect::Denied(_))));
        }
        assert!(check_access(Page::Admin, Page::Home, &signed_in(Role::Admin)).is_allowed());
    }

    #[test]
    fn test_denial_reason() {
        let anonymous = check_access(Page::Vendor, Page::Home, &Session::default());
        assert_eq!(
            anonymous.effect,
            Some(GateEffect::Denied(AccessDenied::LoginRequired))
        );

        let customer = check_access(Page::Vendor, Page::Home, &signed_in(Role::Customer));
        assert_eq!(
            customer.effect,
            Some(GateEffect::Denied(AccessDenied::RoleRequired(Role::Vendor)))
        );
        assert_eq!(
            AccessDenied::RoleRequired(Role::Vendor).to_string(),
            "Access denied. Vendor account required."
        );
    }

    #[test]
    fn test_active_role_decides_not_registered_role() {
        // Registered as a customer but switched to vendor.
        let session = signed_in(Role::Vendor);
        assert!(check_access(Page::Vendor, Page::Home, &session).is_allowed());
    }

    #[test]
    fn test_render_rechecks_after_logout() {
        let mut nav = Navigation::new();
        let vendor = signed_in(Role::Vendor);
        assert!(nav.request_page(Page::Vendor, &vendor).is_allowed());
        assert_eq!(nav.render(&vendor).page, Page::Vendor);

        let decision = nav.render(&Session::default());
        assert_eq!(decision.page, Page::Home);
        assert_eq!(nav.page(), Page::Home);
    }

    #[test]
    fn test_render_cart_after_logout_prompts_login() {
        let mut nav = Navigation::new();
        nav.request_page(Page::Cart, &signed_in(Role::Customer));

        let decision = nav.render(&Session::default());
        assert_eq!(decision.page, Page::Home);
        assert_eq!(decision.effect, Some(GateEffect::PromptLogin));
    }

    #[test]
    fn test_refused_request_keeps_current_page() {
        let mut nav = Navigation::new();
        nav.select_product(ProductId::from("p1"));
        assert_eq!(nav.page(), Page::Product);

        nav.request_page(Page::Orders, &Session::default());
        assert_eq!(nav.page(), Page::Product);
        assert_eq!(nav.selected_product(), Some(&ProductId::from("p1")));

        nav.request_page(Page::Admin, &Session::default());
        assert_eq!(nav.page(), Page::Home);
    }
}
