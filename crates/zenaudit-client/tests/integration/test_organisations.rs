//! Organisation endpoints

use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, ResponseTemplate};

use zenaudit_client::types::OrganisationDetails;
use zenaudit_client::ClientError;
use zenaudit_core::domain::EntityStatus;

use crate::common;

fn acme() -> OrganisationDetails {
    OrganisationDetails {
        name: "Acme".into(),
        contact: "a@acme.com".into(),
        website: "acme.com".into(),
    }
}

#[tokio::test]
async fn test_register_organisation_returns_id_and_details() {
    let (_server, client) = common::setup_org_mock().await;

    let registration = client
        .register_organisation(None, &acme())
        .await
        .expect("register failed");

    assert_eq!(registration.id, "org-1");
    assert_eq!(registration.details, acme());
}

#[tokio::test]
async fn test_register_organisation_sends_body_and_identifier() {
    let (server, client) = common::setup().await;

    Mock::given(method("POST"))
        .and(path("/1.0/audit/org/register/"))
        .and(header("Audit-Identifier", "existing"))
        .and(body_json(json!({
            "name": "Acme",
            "contact": "a@acme.com",
            "website": "acme.com"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "existing",
            "name": "Acme",
            "contact": "a@acme.com",
            "website": "acme.com"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let registration = client
        .register_organisation(Some("existing"), &acme())
        .await
        .expect("register failed");
    assert_eq!(registration.id, "existing");
}

#[tokio::test]
async fn test_unregister_organisation() {
    let (_server, client) = common::setup_org_mock().await;

    let unregistered = client
        .unregister_organisation("org-1")
        .await
        .expect("unregister failed");

    assert_eq!(unregistered.id, "org-1");
    assert_eq!(unregistered.org_id, None);
}

#[tokio::test]
async fn test_list_organisations_decodes_status() {
    let (_server, client) = common::setup_org_mock().await;

    let orgs = client.list_organisations().await.expect("list failed");

    assert_eq!(orgs.len(), 2);
    assert_eq!(orgs[0].org_id().as_str(), "org-1");
    assert_eq!(orgs[0].status(), EntityStatus::Active);
    assert_eq!(orgs[0].name(), Some("Acme"));
    assert_eq!(orgs[1].status(), EntityStatus::Inactive);
    assert_eq!(orgs[1].name(), None);
}

#[tokio::test]
async fn test_rejection_maps_to_api_error() {
    let (server, client) = common::setup().await;
    common::mount_rejection(
        &server,
        "DELETE",
        "/1.0/audit/org/register/",
        "No organisation identifier supplied for unregistration",
    )
    .await;

    let err = client.unregister_organisation("ghost").await.unwrap_err();

    assert!(err.is_rejected());
    match err {
        ClientError::Api { status, message } => {
            assert_eq!(status, 404);
            assert_eq!(message, "No organisation identifier supplied for unregistration");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_non_json_error_body_is_kept_verbatim() {
    let (server, client) = common::setup().await;

    Mock::given(method("GET"))
        .and(path("/1.0/audit/org/"))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .mount(&server)
        .await;

    let err = client.list_organisations().await.unwrap_err();
    assert!(!err.is_rejected());
    assert!(matches!(
        err,
        ClientError::Api { status: 502, ref message } if message == "bad gateway"
    ));
}

#[tokio::test]
async fn test_malformed_success_body_is_invalid_response() {
    let (server, client) = common::setup().await;

    Mock::given(method("GET"))
        .and(path("/1.0/audit/org/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let err = client.list_organisations().await.unwrap_err();
    assert!(matches!(err, ClientError::InvalidResponse(_)));
}
