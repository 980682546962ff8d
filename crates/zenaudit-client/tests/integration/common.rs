//! Shared test helpers for audit API integration tests
//!
//! Each helper mounts mock endpoints on a wiremock server and returns an
//! AuditClient pointing at it.

use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use zenaudit_client::AuditClient;

/// Starts an empty mock server and a client pointing at it
pub async fn setup() -> (MockServer, AuditClient) {
    let server = MockServer::start().await;
    let client = AuditClient::new(server.uri());
    (server, client)
}

/// Sets up a mock server with the organisation endpoints used by most tests.
///
/// Pre-configured endpoints:
/// - POST /1.0/audit/org/register/ → registration echo with id `org-1`
/// - DELETE /1.0/audit/org/register/ (Audit-Identifier: org-1) → `{id}`
/// - GET /1.0/audit/org/ → two organisations
pub async fn setup_org_mock() -> (MockServer, AuditClient) {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/1.0/audit/org/register/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "org-1",
            "name": "Acme",
            "contact": "a@acme.com",
            "website": "acme.com"
        })))
        .mount(&server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/1.0/audit/org/register/"))
        .and(header("Audit-Identifier", "org-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "org-1"})))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/1.0/audit/org/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "org_id": "org-1",
                "timestamp": 63_871_286_400_000_000_i64,
                "name": "Acme",
                "contact": "a@acme.com",
                "website": "acme.com",
                "status": 1
            },
            {
                "org_id": "org-2",
                "timestamp": 63_871_286_400_000_001_i64,
                "status": 0
            }
        ])))
        .mount(&server)
        .await;

    (server, client)
}

/// Mounts a 404 error response in the server's `{status, error_message}` shape
pub async fn mount_rejection(server: &MockServer, http_method: &str, route: &str, message: &str) {
    Mock::given(method(http_method))
        .and(path(route))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "status": 404,
            "error_message": message
        })))
        .mount(server)
        .await;
}
