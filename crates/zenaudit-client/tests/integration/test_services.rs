//! Service endpoints

use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, ResponseTemplate};

use zenaudit_client::types::ServiceDetails;

use crate::common;

#[tokio::test]
async fn test_register_service() {
    let (server, client) = common::setup().await;

    Mock::given(method("POST"))
        .and(path("/1.0/audit/org/org-1/services/register/"))
        .and(body_json(json!({"name": "Billing"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "svc-1",
            "org_id": "org-1",
            "name": "Billing"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let registration = client
        .register_service("org-1", None, &ServiceDetails { name: "Billing".into() })
        .await
        .expect("register service failed");

    assert_eq!(registration.id, "svc-1");
    assert_eq!(registration.org_id, "org-1");
    assert_eq!(registration.name, "Billing");
}

#[tokio::test]
async fn test_unregister_service_sends_identifier() {
    let (server, client) = common::setup().await;

    Mock::given(method("DELETE"))
        .and(path("/1.0/audit/org/org-1/services/register/"))
        .and(header("Audit-Identifier", "svc-1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"id": "svc-1", "org_id": "org-1"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let unregistered = client
        .unregister_service("org-1", "svc-1")
        .await
        .expect("unregister service failed");
    assert_eq!(unregistered.id, "svc-1");
    assert_eq!(unregistered.org_id.as_deref(), Some("org-1"));
}

#[tokio::test]
async fn test_list_services() {
    let (server, client) = common::setup().await;

    Mock::given(method("GET"))
        .and(path("/1.0/audit/org/org-1/services/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"org_id": "org-1", "service_id": "a", "timestamp": 10, "name": "A", "status": 1},
            {"org_id": "org-1", "service_id": "b", "timestamp": 20, "status": 0}
        ])))
        .mount(&server)
        .await;

    let services = client.list_services("org-1").await.expect("list failed");
    assert_eq!(services.len(), 2);
    assert!(services[0].is_active());
    assert_eq!(services[0].name(), Some("A"));
    assert!(!services[1].is_active());
}

#[tokio::test]
async fn test_register_service_for_inactive_org_is_rejected() {
    let (server, client) = common::setup().await;
    common::mount_rejection(
        &server,
        "POST",
        "/1.0/audit/org/org-1/services/register/",
        "Invalid organisation supplied",
    )
    .await;

    let err = client
        .register_service("org-1", None, &ServiceDetails { name: "Billing".into() })
        .await
        .unwrap_err();
    assert!(err.is_rejected());
    assert!(err.to_string().contains("Invalid organisation supplied"));
}
