//! Guarded navigation and the onboarding flow

use serde_json::json;
use tenant_console::routing::Navigator;
use tenant_console::views::AcceptInviteForm;
use tenant_console::Page;

use super::test_harness::{me_body, partial_json, TestEnvironment};

#[tokio::test]
async fn anonymous_user_is_sent_to_login() {
    let env = TestEnvironment::new().await;
    let console = env.console();

    for path in ["/superadmin/tenants", "/owner/settings", "/", "/nowhere"] {
        let location = console.router().navigate(path).await.unwrap();
        assert_eq!(location.page, Page::Login, "navigating to {path}");
    }
}

#[tokio::test]
async fn owner_is_redirected_to_dashboard() {
    let mut env = TestEnvironment::new().await;
    let console = env.console();
    env.sign_in(&console, "OWNER").await;

    let location = console.router().navigate("/superadmin/tenants/3").await.unwrap();
    assert_eq!(location.page, Page::OwnerDashboard);
    assert_eq!(console.navigator().current(), "/owner/dashboard");

    let location = console.router().navigate("/owner").await.unwrap();
    assert_eq!(location.page, Page::OwnerDashboard);

    let location = console.router().navigate("/owner/settings").await.unwrap();
    assert_eq!(location.page, Page::OwnerSettings);
}

#[tokio::test]
async fn superadmin_reaches_tenant_pages() {
    let mut env = TestEnvironment::new().await;
    let console = env.console();
    env.sign_in(&console, "SUPERADMIN").await;

    let location = console.router().navigate("/superadmin").await.unwrap();
    assert_eq!(location.page, Page::TenantList);

    let location = console.router().navigate("/owner/dashboard").await.unwrap();
    assert_eq!(location.page, Page::TenantList);
}

#[tokio::test]
async fn accept_invite_creates_account_and_signs_in() {
    let mut env = TestEnvironment::new().await;
    let accept = env
        .server
        .mock("POST", "/api/v1/owners/accept-invite/")
        .match_body(partial_json(json!({
            "token": "inv-123",
            "password": "correct-horse",
            "first_name": "Camille",
            "last_name": "Martin"
        })))
        .with_status(201)
        .with_header("content-type", "application/json")
        .with_body(r#"{"message": "Compte créé.", "email": "user@club.test"}"#)
        .expect(1)
        .create_async()
        .await;
    let login = env
        .server
        .mock("POST", "/auth/login/")
        .match_body(partial_json(json!({"email": "user@club.test", "password": "correct-horse"})))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"access": "access-1", "refresh": "refresh-1"}"#)
        .expect(1)
        .create_async()
        .await;
    env.mock_me("access-1", me_body("OWNER")).await;

    let console = env.console();
    let location = console.router().navigate("/accept-invite/inv-123").await.unwrap();
    assert_eq!(location.page, Page::AcceptInvite);

    let mut view = console.accept_invite_view(location.param("token").unwrap_or_default());
    let user = view
        .submit(&AcceptInviteForm {
            password: "correct-horse".into(),
            first_name: "Camille".into(),
            last_name: "Martin".into(),
        })
        .await
        .unwrap();

    assert_eq!(user.profile.email, "user@club.test");
    assert_eq!(console.navigator().current(), "/owner/dashboard");
    accept.assert_async().await;
    login.assert_async().await;
}
