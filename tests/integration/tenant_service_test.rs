//! Tenant administration through the view models

use serde_json::json;
use tenant_console::routing::Navigator;
use tenant_console::views::TenantForm;
use tenant_console::ConsoleError;

use super::test_harness::{partial_json, TestEnvironment};

#[tokio::test]
async fn create_tenant_then_open_it() {
    let mut env = TestEnvironment::new().await;
    let console = env.console();
    env.sign_in(&console, "SUPERADMIN").await;
    let create = env
        .server
        .mock("POST", "/api/v1/tenants/")
        .match_header("authorization", "Bearer access-1")
        .match_body(partial_json(json!({
            "name": "Club Nord",
            "slug": "club-nord",
            "contact_email": "contact@club-nord.test",
            "is_active": true
        })))
        .with_status(201)
        .with_header("content-type", "application/json")
        .with_body(r#"{"id": 21, "name": "Club Nord", "slug": "club-nord"}"#)
        .expect(1)
        .create_async()
        .await;

    let mut view = console.tenant_create_view();
    let tenant = view
        .submit(&TenantForm {
            name: "Club Nord".into(),
            slug: "club-nord".into(),
            contact_email: "contact@club-nord.test".into(),
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(tenant.id(), 21);
    assert_eq!(console.navigator().current(), "/superadmin/tenants/21");
    create.assert_async().await;
}

#[tokio::test]
async fn list_and_invite_owner() {
    let mut env = TestEnvironment::new().await;
    let console = env.console();
    env.sign_in(&console, "SUPERADMIN").await;
    env.mock_authorized(
        "GET",
        "/api/v1/tenants/",
        "access-1",
        200,
        json!([
            {"id": 1, "name": "Club Nord", "slug": "club-nord", "owners_count": 0},
            {"id": 2, "name": "Club Sud", "slug": "club-sud", "is_active": false,
             "owners": [{"id": 4, "email": "o@sud.test", "first_name": "Lou", "last_name": "Petit"}]}
        ]),
    )
    .await;
    env.mock_authorized(
        "GET",
        "/api/v1/tenants/1/",
        "access-1",
        200,
        json!({"id": 1, "name": "Club Nord", "slug": "club-nord", "owners": []}),
    )
    .await;
    let invite = env
        .server
        .mock("POST", "/api/v1/tenants/1/invite-owner/")
        .match_body(partial_json(json!({"email": "new-owner@club-nord.test"})))
        .with_status(201)
        .with_header("content-type", "application/json")
        .with_body(r#"{"token": "inv-123", "email": "new-owner@club-nord.test", "status": "PENDING"}"#)
        .expect(1)
        .create_async()
        .await;

    let mut list = console.tenant_list_view();
    list.fetch().await;
    assert!(list.error().is_none());
    assert_eq!(list.tenants().len(), 2);
    assert_eq!(list.tenants()[1].owner_count(), 1);

    let location = list.open_tenant(1).await.unwrap();
    assert_eq!(location.param("id"), Some("1"));

    let mut detail = console.tenant_detail_view();
    detail.load(1).await;
    let invitation = detail.invite_owner("new-owner@club-nord.test").await.unwrap();

    assert_eq!(invitation.token, "inv-123");
    assert_eq!(detail.info(), Some("Invitation envoyée ! Token: inv-123"));
    invite.assert_async().await;
}

#[tokio::test]
async fn assign_owner_and_pass_through_errors() {
    let mut env = TestEnvironment::new().await;
    let console = env.console();
    env.sign_in(&console, "SUPERADMIN").await;
    let assign = env
        .server
        .mock("POST", "/api/v1/tenants/1/assign-owner/")
        .match_body(partial_json(json!({"user_id": 12})))
        .with_status(204)
        .expect(1)
        .create_async()
        .await;
    env.mock_authorized(
        "GET",
        "/api/v1/tenants/99/",
        "access-1",
        404,
        json!({"detail": "Not found."}),
    )
    .await;

    console.tenants().assign_owner(1, 12).await.unwrap();
    assign.assert_async().await;

    let err = console.tenants().get_tenant(99).await.unwrap_err();
    assert!(matches!(err, ConsoleError::Api { status: 404, .. }));
    assert_eq!(err.server_detail(), Some("Not found."));

    let mut detail = console.tenant_detail_view();
    detail.load(99).await;
    assert_eq!(detail.error(), Some("Impossible de charger le tenant."));
}
