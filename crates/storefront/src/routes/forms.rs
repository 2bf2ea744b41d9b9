//! Sign-in and registration form validation.
//!
//! Runs before the session coordinator is called; the coordinator itself
//! stores registration profiles as given.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use shophere_core::{Password, Role};

use crate::models::Profile;

const MIN_PASSWORD_LENGTH: usize = 6;

static EMAIL_SHAPE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\S+@\S+\.\S+").expect("Invalid regex"));

/// Form fields that can carry a validation message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Name,
    Email,
    Password,
    ConfirmPassword,
    BusinessName,
}

impl Field {
    /// Form field identifier.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::Password => "password",
            Self::ConfirmPassword => "confirmPassword",
            Self::BusinessName => "businessName",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-field validation messages.
#[derive(Debug, Clone, Default, PartialEq, Eq, thiserror::Error)]
#[error("{} field(s) need attention", .errors.len())]
pub struct FormErrors {
    errors: BTreeMap<Field, &'static str>,
}

impl FormErrors {
    /// Message for a field, if it failed.
    #[must_use]
    pub fn get(&self, field: Field) -> Option<&'static str> {
        self.errors.get(&field).copied()
    }

    /// Failed fields and their messages, in form order.
    pub fn iter(&self) -> impl Iterator<Item = (Field, &'static str)> + '_ {
        self.errors.iter().map(|(field, message)| (*field, *message))
    }

    /// Whether every field passed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    fn add(&mut self, field: Field, message: &'static str) {
        self.errors.entry(field).or_insert(message);
    }

    fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

/// Sign-in form input.
#[derive(Debug, Clone)]
pub struct LoginForm {
    pub email: String,
    pub password: Password,
    /// Role selected in the form.
    pub role: Role,
}

impl LoginForm {
    /// Check the input.
    ///
    /// # Errors
    ///
    /// Returns `FormErrors` listing every field that failed.
    pub fn validate(&self) -> Result<(), FormErrors> {
        let mut errors = FormErrors::default();
        check_credentials(&self.email, &self.password, &mut errors);
        errors.into_result()
    }
}

/// Registration form input.
#[derive(Debug, Clone)]
pub struct RegistrationForm {
    pub name: String,
    pub email: String,
    pub password: Password,
    pub confirm_password: Password,
    /// Role selected in the form.
    pub role: Role,
    /// Required for vendors, ignored otherwise.
    pub business_name: String,
    /// Optional; blank means none.
    pub phone: String,
}

impl RegistrationForm {
    /// Check the input.
    ///
    /// # Errors
    ///
    /// Returns `FormErrors` listing every field that failed.
    pub fn validate(&self) -> Result<(), FormErrors> {
        let mut errors = FormErrors::default();
        check_credentials(&self.email, &self.password, &mut errors);

        if self.name.is_empty() {
            errors.add(Field::Name, "Name is required");
        }
        if self.password.expose() != self.confirm_password.expose() {
            errors.add(Field::ConfirmPassword, "Passwords do not match");
        }
        if self.role == Role::Vendor && self.business_name.is_empty() {
            errors.add(Field::BusinessName, "Business name is required for vendors");
        }

        errors.into_result()
    }

    /// Profile to register. Business name is kept for vendors only; blank
    /// optional fields become `None`.
    #[must_use]
    pub fn profile(&self) -> Profile {
        Profile {
            name: self.name.clone(),
            email: self.email.clone(),
            business_name: (self.role == Role::Vendor)
                .then(|| non_blank(&self.business_name))
                .flatten(),
            phone: non_blank(&self.phone),
        }
    }
}

fn check_credentials(email: &str, password: &Password, errors: &mut FormErrors) {
    if email.is_empty() {
        errors.add(Field::Email, "Email is required");
    } else if !EMAIL_SHAPE_RE.is_match(email) {
        errors.add(Field::Email, "Email is invalid");
    }

    if password.is_empty() {
        errors.add(Field::Password, "Password is required");
    } else if password.char_count() < MIN_PASSWORD_LENGTH {
        errors.add(Field::Password, "Password must be at least 6 characters");
    }
}

fn non_blank(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_owned())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn registration(role: Role) -> RegistrationForm {
        RegistrationForm {
            name: "Sam Shopper".to_owned(),
            email: "sam@shop.io".to_owned(),
            password: Password::from("secret1"),
            confirm_password: Password::from("secret1"),
            role,
            business_name: String::new(),
            phone: String::new(),
        }
    }

    #[test]
    fn test_login_form_accepts_demo_credentials() {
        let form = LoginForm {
            email: "vendor@demo.com".to_owned(),
            password: Password::from("password123"),
            role: Role::Vendor,
        };
        assert!(form.validate().is_ok());
    }

    #[test]
    fn test_login_form_reports_each_field() {
        let form = LoginForm {
            email: String::new(),
            password: Password::from(""),
            role: Role::Customer,
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.get(Field::Email), Some("Email is required"));
        assert_eq!(errors.get(Field::Password), Some("Password is required"));
        assert_eq!(errors.iter().count(), 2);
    }

    #[test]
    fn test_email_shape() {
        for (email, ok) in [
            ("a@b.co", true),
            ("first.last@shop.example", true),
            ("no-at-sign.com", false),
            ("user@nodot", false),
            ("@b.c", false),
        ] {
            let form = LoginForm {
                email: email.to_owned(),
                password: Password::from("password123"),
                role: Role::Customer,
            };
            assert_eq!(form.validate().is_ok(), ok, "{email}");
        }
    }

    #[test]
    fn test_short_password() {
        let form = LoginForm {
            email: "a@b.co".to_owned(),
            password: Password::from("12345"),
            role: Role::Customer,
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(
            errors.get(Field::Password),
            Some("Password must be at least 6 characters")
        );
    }

    #[test]
    fn test_registration_checks() {
        let mut form = registration(Role::Vendor);
        form.name.clear();
        form.confirm_password = Password::from("secret2");

        let errors = form.validate().unwrap_err();
        assert_eq!(errors.get(Field::Name), Some("Name is required"));
        assert_eq!(
            errors.get(Field::ConfirmPassword),
            Some("Passwords do not match")
        );
        assert_eq!(
            errors.get(Field::BusinessName),
            Some("Business name is required for vendors")
        );
        assert_eq!(errors.get(Field::Email), None);
    }

    #[test]
    fn test_customer_needs_no_business_name() {
        assert!(registration(Role::Customer).validate().is_ok());
    }

    #[test]
    fn test_profile_drops_blank_and_foreign_fields() {
        let mut customer = registration(Role::Customer);
        customer.business_name = "Ignored Inc".to_owned();
        customer.phone = "  ".to_owned();
        let profile = customer.profile();
        assert_eq!(profile.business_name, None);
        assert_eq!(profile.phone, None);

        let mut vendor = registration(Role::Vendor);
        vendor.business_name = "Gadget Barn".to_owned();
        vendor.phone = "555-0100".to_owned();
        let profile = vendor.profile();
        assert_eq!(profile.business_name.as_deref(), Some("Gadget Barn"));
        assert_eq!(profile.phone.as_deref(), Some("555-0100"));
    }
}
