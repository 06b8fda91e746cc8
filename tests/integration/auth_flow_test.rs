//! Login, persistence across restarts and logout against a mock backend

use serde_json::json;
use tenant_console::auth::{FileSessionStore, SessionStore, StorageKey};
use tenant_console::models::Role;
use tenant_console::routing::Navigator;
use tenant_console::views::LoginForm;

use super::test_harness::{me_body, partial_json, TestEnvironment};

#[tokio::test]
async fn login_persists_session_for_next_run() {
    let mut env = TestEnvironment::new().await;
    let login = env
        .server
        .mock("POST", "/auth/login/")
        .match_body(partial_json(json!({"email": "owner@club.test", "password": "secret-password"})))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"access": "access-1", "refresh": "refresh-1"}"#)
        .expect(1)
        .create_async()
        .await;
    let me = env
        .server
        .mock("GET", "/api/v1/me/")
        .match_header("authorization", "Bearer access-1")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "role": "OWNER",
                "tenant": {"id": 3, "name": "Club Nord", "slug": "club-nord"},
                "profile": {"id": 9, "email": "owner@club.test", "role": "OWNER"}
            })
            .to_string(),
        )
        .expect(1)
        .create_async()
        .await;

    let console = env.console();
    let user = console
        .auth()
        .login("owner@club.test", "secret-password")
        .await
        .unwrap();

    assert_eq!(user.role, Role::Owner);
    assert_eq!(console.navigator().current(), "/owner/dashboard");
    assert!(env.session_file().contains("sports_access_token"));
    login.assert_async().await;

    // Second run: session comes from disk, no profile round-trip
    let restarted = env.console();
    restarted.restore().await;
    assert!(restarted.auth().is_authenticated());
    assert!(restarted.auth().ensure_profile_loaded().await);
    assert_eq!(
        restarted.owner_settings_view().tenant().map(|t| t.slug),
        Some("club-nord".to_string())
    );
    me.assert_async().await;
}

#[tokio::test]
async fn wrong_password_stores_nothing() {
    let mut env = TestEnvironment::new().await;
    env.server
        .mock("POST", "/auth/login/")
        .with_status(401)
        .with_header("content-type", "application/json")
        .with_body(r#"{"detail": "No active account found with the given credentials"}"#)
        .create_async()
        .await;
    let refresh = env
        .server
        .mock("POST", "/auth/refresh/")
        .expect(0)
        .create_async()
        .await;

    let console = env.console();
    let mut view = console.login_view();
    let form = LoginForm {
        email: "owner@club.test".into(),
        password: "wrong".into(),
    };

    assert!(view.submit(&form).await.is_none());
    assert_eq!(
        view.error(),
        Some("No active account found with the given credentials")
    );
    assert!(!console.auth().is_authenticated());
    assert!(!env.session_file().contains("sports_access_token"));
    refresh.assert_async().await;
}

#[tokio::test]
async fn logout_clears_session_file() {
    let mut env = TestEnvironment::new().await;
    let console = env.console();
    env.sign_in(&console, "SUPERADMIN").await;
    let mut session = console.auth().subscribe();
    assert!(session.borrow_and_update().is_some());

    console.auth().logout();

    assert!(session.has_changed().unwrap());
    assert!(session.borrow().is_none());
    assert_eq!(console.navigator().current(), "/auth/login");
    let file = env.session_file();
    for key in ["sports_access_token", "sports_refresh_token", "sports_current_user"] {
        assert!(!file.contains(key), "{key} left in session file");
    }
    assert!(!env.console().auth().is_authenticated());
}

#[tokio::test]
async fn restore_drops_session_when_profile_fails() {
    let mut env = TestEnvironment::new().await;
    {
        let console = env.console();
        env.sign_in(&console, "OWNER").await;
    }
    // Keep the tokens but lose the cached profile
    let store = FileSessionStore::open(env.session_path()).unwrap();
    store.remove(StorageKey::CurrentUser).unwrap();
    env.server.reset_async().await;
    env.server
        .mock("GET", "/api/v1/me/")
        .with_status(500)
        .create_async()
        .await;

    let console = env.console();
    console.restore().await;

    assert!(!console.auth().is_authenticated());
    assert!(console.auth().current_user().is_none());
}

#[tokio::test]
async fn explicit_refresh_rotates_tokens() {
    let mut env = TestEnvironment::new().await;
    let console = env.console();
    env.sign_in(&console, "OWNER").await;
    let refresh = env
        .server
        .mock("POST", "/auth/refresh/")
        .match_body(partial_json(json!({"refresh": "refresh-1"})))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"access": "access-2", "refresh": "refresh-2"}"#)
        .expect(1)
        .create_async()
        .await;

    let token = console.auth().refresh_tokens().await.unwrap();

    assert_eq!(token.as_deref(), Some("access-2"));
    assert_eq!(console.auth().refresh_token().as_deref(), Some("refresh-2"));
    let restarted = env.console();
    assert_eq!(restarted.auth().access_token().as_deref(), Some("access-2"));
    assert_eq!(restarted.auth().refresh_token().as_deref(), Some("refresh-2"));
    refresh.assert_async().await;
}

#[tokio::test]
async fn flat_profile_is_accepted() {
    let mut env = TestEnvironment::new().await;
    env.mock_login("access-1", "refresh-1").await;
    env.mock_me("access-1", me_body("SUPERADMIN")).await;

    let console = env.console();
    let user = console
        .auth()
        .login("user@club.test", "secret-password")
        .await
        .unwrap();

    assert_eq!(user.role, Role::Superadmin);
    assert_eq!(user.profile.display_name(), "Camille Martin");
    assert_eq!(console.navigator().current(), "/superadmin/tenants");
}
