//! Credential types.
//!
//! A [`Password`] is only ever handed to the credential store for hashing or
//! verification; it never appears in `Debug` output or serialized identities.

use secrecy::{ExposeSecret, SecretString};

/// A plaintext password supplied by the caller.
#[derive(Clone)]
pub struct Password(SecretString);

impl Password {
    /// Wrap a plaintext password.
    #[must_use]
    pub fn new(password: impl Into<String>) -> Self {
        Self(SecretString::from(password.into()))
    }

    /// Borrow the plaintext for hashing or verification.
    #[must_use]
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }

    /// Number of characters in the password.
    #[must_use]
    pub fn char_count(&self) -> usize {
        self.expose().chars().count()
    }

    /// Whether the password is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.expose().is_empty()
    }
}

impl std::fmt::Debug for Password {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Password([REDACTED])")
    }
}

impl From<&str> for Password {
    fn from(password: &str) -> Self {
        Self::new(password)
    }
}

impl From<String> for Password {
    fn from(password: String) -> Self {
        Self::new(password)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_is_redacted() {
        let password = Password::from("password123");
        let debug = format!("{password:?}");
        assert!(!debug.contains("password123"));
        assert!(debug.contains("REDACTED"));
    }

    #[test]
    fn test_char_count_counts_unicode_scalars() {
        assert_eq!(Password::from("pässwörd").char_count(), 8);
        assert!(Password::from("").is_empty());
    }
}
