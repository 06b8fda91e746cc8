//! Concurrent requests hitting an expired token share one refresh

use futures::future::join_all;
use serde_json::json;
use tenant_console::auth::{FileSessionStore, SessionStore, StorageKey};
use tenant_console::routing::Navigator;
use tenant_console::ConsoleError;

use super::test_harness::{me_body, TestEnvironment};

/// Leave a session on disk whose access token the server no longer accepts
fn seed_expired_session(env: &TestEnvironment) {
    let store = FileSessionStore::open(env.session_path()).unwrap();
    let user = json!({
        "role": "SUPERADMIN",
        "tenant": null,
        "profile": me_body("SUPERADMIN")
    });
    store
        .set_many(&[
            (StorageKey::AccessToken, "stale".to_string()),
            (StorageKey::RefreshToken, "refresh-1".to_string()),
            (StorageKey::CurrentUser, user.to_string()),
        ])
        .unwrap();
}

async fn mock_tenant_list(env: &mut TestEnvironment) {
    env.mock_authorized(
        "GET",
        "/api/v1/tenants/",
        "stale",
        401,
        json!({"detail": "Given token not valid for any token type", "code": "token_not_valid"}),
    )
    .await;
    env.mock_authorized(
        "GET",
        "/api/v1/tenants/",
        "fresh",
        200,
        json!([{"id": 1, "name": "Club Nord", "slug": "club-nord", "owners_count": 1}]),
    )
    .await;
}

#[tokio::test]
async fn concurrent_unauthorized_requests_refresh_once() {
    let mut env = TestEnvironment::new().await;
    seed_expired_session(&env);
    mock_tenant_list(&mut env).await;
    let refresh = env
        .server
        .mock("POST", "/auth/refresh/")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"access": "fresh"}"#)
        .expect(1)
        .create_async()
        .await;

    let console = env.console();
    let calls = (0..8).map(|_| console.tenants().list_tenants());
    let results = join_all(calls).await;

    for result in results {
        assert_eq!(result.unwrap().len(), 1);
    }
    refresh.assert_async().await;
    assert_eq!(console.auth().access_token().as_deref(), Some("fresh"));
    // Rotation absent: the original refresh token is kept
    assert_eq!(console.auth().refresh_token().as_deref(), Some("refresh-1"));
    assert!(!console.auth().is_refreshing());
}

#[tokio::test]
async fn rejected_refresh_fails_every_request_and_logs_out() {
    let mut env = TestEnvironment::new().await;
    seed_expired_session(&env);
    mock_tenant_list(&mut env).await;
    let refresh = env
        .server
        .mock("POST", "/auth/refresh/")
        .with_status(401)
        .with_header("content-type", "application/json")
        .with_body(r#"{"detail": "Token is invalid or expired"}"#)
        .expect(1)
        .create_async()
        .await;

    let console = env.console();
    console.navigator().navigate("/superadmin/tenants");
    let calls = (0..4).map(|_| console.tenants().list_tenants());
    let results = join_all(calls).await;

    for result in results {
        let err = result.unwrap_err();
        assert!(err.clears_session(), "unexpected error: {err}");
    }
    refresh.assert_async().await;
    assert!(!console.auth().is_authenticated());
    assert!(console.auth().current_user().is_none());
    assert_eq!(console.navigator().current(), "/auth/login");
}

#[tokio::test]
async fn missing_refresh_token_expires_without_refreshing() {
    let mut env = TestEnvironment::new().await;
    FileSessionStore::open(env.session_path())
        .unwrap()
        .set(StorageKey::AccessToken, "stale".to_string())
        .unwrap();
    mock_tenant_list(&mut env).await;
    let refresh = env
        .server
        .mock("POST", "/auth/refresh/")
        .expect(0)
        .create_async()
        .await;

    let console = env.console();
    let err = console.tenants().list_tenants().await.unwrap_err();

    assert_eq!(err, ConsoleError::SessionExpired);
    refresh.assert_async().await;
}
