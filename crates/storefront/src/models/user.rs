//! User domain types.
//!
//! An [`Identity`] is what the rest of the client sees of an account. The
//! password hash stays inside the credential store.

use serde::{Deserialize, Serialize};

use shophere_core::{Email, Role, UserId};

/// A registered user's profile and assigned role.
///
/// Serialized in camelCase with absent optional fields omitted; this is the
/// JSON kept under the `user` key of the durable session record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    /// Unique user ID.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Identity key.
    pub email: Email,
    /// Role the account was registered with.
    pub role: Role,
    /// Shop name, present for vendors.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business_name: Option<String>,
    /// Contact phone number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// Profile fields supplied at registration.
///
/// The caller validates these (see `routes::forms`); the coordinator stores
/// them as given.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Profile {
    /// Display name.
    pub name: String,
    /// Email address, parsed into an [`Email`] by the coordinator.
    pub email: String,
    /// Shop name for vendor accounts.
    pub business_name: Option<String>,
    /// Optional phone number.
    pub phone: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn vendor() -> Identity {
        Identity {
            id: UserId::new(2),
            name: "Jane Vendor".to_owned(),
            email: Email::parse("vendor@demo.com").unwrap(),
            role: Role::Vendor,
            business_name: Some("TechStore Pro".to_owned()),
            phone: None,
        }
    }

    #[test]
    fn test_identity_json_shape() {
        let json = serde_json::to_value(vendor()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": 2,
                "name": "Jane Vendor",
                "email": "vendor@demo.com",
                "role": "vendor",
                "businessName": "TechStore Pro"
            })
        );
    }

    #[test]
    fn test_identity_ignores_unknown_fields() {
        let json = r#"{"id":2,"name":"Jane Vendor","email":"vendor@demo.com","role":"vendor","businessName":"TechStore Pro","avatar":"x.png"}"#;
        let identity: Identity = serde_json::from_str(json).unwrap();
        assert_eq!(identity, vendor());
    }
}
