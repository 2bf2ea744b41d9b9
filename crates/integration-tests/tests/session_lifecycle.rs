//! Login, registration, logout and rehydration through the client state.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;
use std::sync::atomic::Ordering;

use shophere_core::{Password, Role};
use shophere_integration_tests::{cart_line, client, demo_login};
use shophere_storefront::db::{FileSessionStore, MemorySessionStore, SessionStore};
use shophere_storefront::error::AppError;
use shophere_storefront::models::SessionPhase;
use shophere_storefront::routes::forms::RegistrationForm;
use shophere_storefront::services::auth::AuthError;

const DEMO_ACCOUNTS: [(&str, Role); 3] = [
    ("customer@demo.com", Role::Customer),
    ("vendor@demo.com", Role::Vendor),
    ("admin@demo.com", Role::Admin),
];

#[tokio::test(start_paused = true)]
async fn test_every_demo_account_signs_in_with_its_role() {
    for (email, role) in DEMO_ACCOUNTS {
        let (state, _) = client(Arc::new(MemorySessionStore::new()));
        let identity = state.login(&demo_login(email, role)).await.unwrap();

        assert_eq!(identity.email.as_str(), email);
        assert_eq!(identity.role, role);
        let session = state.session();
        assert_eq!(session.phase(), SessionPhase::Authenticated(role));
        assert_eq!(session.identity(), Some(&identity));
    }
}

#[tokio::test(start_paused = true)]
async fn test_claiming_another_role_is_refused() {
    for (email, registered) in DEMO_ACCOUNTS {
        for claimed in Role::ALL.into_iter().filter(|r| *r != registered) {
            let (state, _) = client(Arc::new(MemorySessionStore::new()));
            let err = state.login(&demo_login(email, claimed)).await.unwrap_err();

            match err {
                AppError::Auth(AuthError::RoleMismatch { role }) => assert_eq!(role, claimed),
                other => panic!("unexpected error: {other}"),
            }
            assert_eq!(state.session().phase(), SessionPhase::Anonymous);
            assert_eq!(state.session().role(), Role::Customer);
        }
    }
}

#[tokio::test(start_paused = true)]
async fn test_duplicate_registration_changes_nothing() {
    let (state, _) = client(Arc::new(MemorySessionStore::new()));
    let form = RegistrationForm {
        name: "Second Jane".to_owned(),
        email: "vendor@demo.com".to_owned(),
        password: Password::from("another1"),
        confirm_password: Password::from("another1"),
        role: Role::Vendor,
        business_name: "Copycat Co".to_owned(),
        phone: String::new(),
    };

    let err = state.register(&form).await.unwrap_err();
    assert!(matches!(err, AppError::Auth(AuthError::AlreadyExists)));

    // The original vendor still signs in with the original password.
    let identity = state
        .login(&demo_login("vendor@demo.com", Role::Vendor))
        .await
        .unwrap();
    assert_eq!(identity.name, "Jane Vendor");
    assert_eq!(identity.business_name.as_deref(), Some("TechStore Pro"));
}

#[tokio::test(start_paused = true)]
async fn test_registered_vendor_can_sign_in_again() {
    let (state, _) = client(Arc::new(MemorySessionStore::new()));
    let form = RegistrationForm {
        name: "Gadget Barn Owner".to_owned(),
        email: "owner@gadgetbarn.io".to_owned(),
        password: Password::from("barn-secret"),
        confirm_password: Password::from("barn-secret"),
        role: Role::Vendor,
        business_name: "Gadget Barn".to_owned(),
        phone: "555-0199".to_owned(),
    };

    let registered = state.register(&form).await.unwrap();
    assert!(state.session().has_role(Role::Vendor));
    assert!(registered.id.as_i64() > 3);

    state.logout();
    let mut login = demo_login("owner@gadgetbarn.io", Role::Vendor);
    login.password = Password::from("barn-secret");
    let identity = state.login(&login).await.unwrap();
    assert_eq!(identity, registered);
}

#[tokio::test(start_paused = true)]
async fn test_logout_resets_everything() {
    let store = Arc::new(MemorySessionStore::new());
    let (state, _) = client(store.clone());
    state
        .login(&demo_login("admin@demo.com", Role::Admin))
        .await
        .unwrap();
    state.add_to_cart(cart_line("p1", 10, 1)).unwrap();
    assert!(store.get("user").unwrap().is_some());

    state.logout();

    let session = state.session();
    assert_eq!(session.phase(), SessionPhase::Anonymous);
    assert_eq!(session.role(), Role::Customer);
    assert!(state.cart().is_empty());
    assert_eq!(store.get("user").unwrap(), None);
    assert_eq!(store.get("userRole").unwrap(), None);
}

#[tokio::test(start_paused = true)]
async fn test_persisted_vendor_rehydrates_without_lookup() {
    let store = Arc::new(MemorySessionStore::with_entries([
        (
            "user",
            r#"{"id":2,"name":"Jane Vendor","email":"vendor@demo.com","role":"vendor","businessName":"TechStore Pro"}"#,
        ),
        ("userRole", "vendor"),
    ]));
    let (state, lookups) = client(store);

    let session = state.session();
    assert_eq!(session.phase(), SessionPhase::Authenticated(Role::Vendor));
    assert_eq!(session.identity().unwrap().name, "Jane Vendor");
    assert_eq!(lookups.load(Ordering::SeqCst), 0);
}

#[tokio::test(start_paused = true)]
async fn test_session_survives_restart_through_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state/session.json");

    {
        let (state, _) = client(Arc::new(FileSessionStore::new(&path)));
        state
            .login(&demo_login("customer@demo.com", Role::Customer))
            .await
            .unwrap();
    }

    let file: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(file["userRole"], "customer");
    let user: serde_json::Value = serde_json::from_str(file["user"].as_str().unwrap()).unwrap();
    assert_eq!(user["id"], 1);
    assert!(user.get("password").is_none());

    let (restarted, lookups) = client(Arc::new(FileSessionStore::new(&path)));
    assert!(restarted.session().has_role(Role::Customer));
    assert_eq!(lookups.load(Ordering::SeqCst), 0);

    restarted.logout();
    let (after_logout, _) = client(Arc::new(FileSessionStore::new(&path)));
    assert!(!after_logout.session().is_authenticated());
}

#[tokio::test(start_paused = true)]
async fn test_overlapping_logins_keep_the_latest() {
    let (state, _) = client(Arc::new(MemorySessionStore::new()));
    let customer = demo_login("customer@demo.com", Role::Customer);
    let admin = demo_login("admin@demo.com", Role::Admin);

    let (first, second) = tokio::join!(state.login(&customer), state.login(&admin));

    assert!(matches!(first, Err(AppError::Auth(AuthError::Superseded))));
    assert_eq!(second.unwrap().role, Role::Admin);
    assert!(state.session().has_role(Role::Admin));
}

#[tokio::test(start_paused = true)]
async fn test_role_switch_persists_only_the_role() {
    let store = Arc::new(MemorySessionStore::new());
    let (state, lookups) = client(store.clone());
    state
        .login(&demo_login("customer@demo.com", Role::Customer))
        .await
        .unwrap();
    let before = lookups.load(Ordering::SeqCst);

    assert!(state.demo_switch_role(Role::Vendor));
    assert_eq!(lookups.load(Ordering::SeqCst), before);
    assert_eq!(store.get("userRole").unwrap().as_deref(), Some("vendor"));

    let (restarted, _) = client(store);
    assert!(restarted.session().has_role(Role::Vendor));
}
