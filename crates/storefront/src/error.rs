//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type for everything the presentation layer
//! can be refused. Faults are captured to Sentry before a message is shown;
//! rejections of the user's input are only logged.

use thiserror::Error;

use crate::config::ConfigError;
use crate::db::StoreError;
use crate::routes::AccessDenied;
use crate::routes::forms::FormErrors;
use crate::services::auth::AuthError;
use crate::services::checkout::CheckoutError;

/// Application-level error type for the storefront client.
#[derive(Debug, Error)]
pub enum AppError {
    /// Login, registration or session failure.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// A page or action was refused by the gate.
    #[error("Access denied: {0}")]
    Access(#[from] AccessDenied),

    /// Checkout failed.
    #[error("Checkout error: {0}")]
    Checkout(#[from] CheckoutError),

    /// Form input failed validation.
    #[error("Invalid input: {0}")]
    Form(#[from] FormErrors),

    /// Durable session record failure.
    #[error("Session store error: {0}")]
    Store(#[from] StoreError),

    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl AppError {
    /// Whether this is a fault rather than a refusal of the user's input.
    #[must_use]
    pub const fn is_internal(&self) -> bool {
        match self {
            Self::Auth(err) => !err.is_rejection(),
            Self::Store(_) | Self::Config(_) => true,
            Self::Access(_) | Self::Checkout(_) | Self::Form(_) => false,
        }
    }

    /// Message to show the user.
    ///
    /// Faults are reported to Sentry and shown generically.
    #[must_use]
    pub fn report(&self) -> String {
        if self.is_internal() {
            let event_id = sentry::capture_error(self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Storefront error"
            );
            return "Something went wrong, please try again".to_string();
        }

        tracing::debug!(error = %self, "Request refused");
        match self {
            Self::Auth(err) => err.to_string(),
            Self::Access(err) => err.to_string(),
            Self::Checkout(err) => err.to_string(),
            Self::Form(errors) => errors
                .iter()
                .map(|(_, message)| message)
                .collect::<Vec<_>>()
                .join("; "),
            Self::Store(_) | Self::Config(_) => self.to_string(),
        }
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context from a user ID.
///
/// Call this after successful authentication to associate errors with users.
pub fn set_sentry_user(user_id: &impl ToString, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
///
/// Call this on logout to stop associating errors with the user.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

/// Add a breadcrumb for user actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of user actions
/// leading up to an error.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("navigation", "Requested page", Some(&[("page", "cart")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}
