//! Audit record endpoints

use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

use zenaudit_client::types::NewAuditRecord;
use zenaudit_core::domain::{derive, AuditRecordQuery, Timestamp};

use crate::common;

#[tokio::test]
async fn test_save_record() {
    let (server, client) = common::setup().await;

    Mock::given(method("POST"))
        .and(path("/1.0/audit/org/org-1/services/svc-1/save/"))
        .and(body_json(json!({"timestamp": 1000, "obo_id": "u1", "actor_id": "u1"})))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"status": "saved", "total_time": 42})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let receipt = client
        .save_record(
            "org-1",
            "svc-1",
            &NewAuditRecord {
                timestamp: 1000,
                obo_id: "u1".into(),
                actor_id: "u1".into(),
            },
        )
        .await
        .expect("save failed");

    assert_eq!(receipt.status, "saved");
    assert_eq!(receipt.total_time, 42);
}

#[tokio::test]
async fn test_save_record_for_inactive_org_is_rejected() {
    let (server, client) = common::setup().await;
    common::mount_rejection(
        &server,
        "POST",
        "/1.0/audit/org/org-1/services/svc-1/save/",
        "Invalid organisation supplied",
    )
    .await;

    let record = NewAuditRecord {
        timestamp: 1,
        obo_id: "u1".into(),
        actor_id: "u1".into(),
    };
    let err = client.save_record("org-1", "svc-1", &record).await.unwrap_err();
    assert!(err.is_rejected());
}

#[tokio::test]
async fn test_records_for_service_sends_query() {
    let (server, client) = common::setup().await;
    let key = derive("|", &["svc-1", "org-1"]).unwrap();
    let user_key = derive("|", &["org-1", "u1"]).unwrap();

    Mock::given(method("GET"))
        .and(path("/1.0/audit/org/org-1/services/svc-1/records/"))
        .and(query_param("since", "100"))
        .and(query_param("limit", "10"))
        .and(query_param("order", "asc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "service_org_hash": key.as_str(),
                "org_user_hash": user_key.as_str(),
                "timestamp": 150,
                "obo_id": "u1",
                "actor_id": "admin"
            }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let query = AuditRecordQuery::default()
        .with_since(Timestamp::from_raw(100))
        .with_limit(10)
        .oldest_first();
    let records = client
        .records_for_service("org-1", "svc-1", &query)
        .await
        .expect("query failed");

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].service_org_hash, key);
    assert_eq!(records[0].timestamp, Timestamp::from_raw(150));
    assert!(!records[0].is_self_service());
}

#[tokio::test]
async fn test_records_for_user_defaults_to_newest_first() {
    let (server, client) = common::setup().await;

    Mock::given(method("GET"))
        .and(path("/1.0/audit/org/org-1/users/u1/records/"))
        .and(query_param("order", "desc"))
        .and(query_param("limit", "100"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let records = client
        .records_for_user("org-1", "u1", &AuditRecordQuery::default())
        .await
        .expect("query failed");
    assert!(records.is_empty());
}

#[tokio::test]
async fn test_ids_are_percent_encoded_in_the_path() {
    let (server, client) = common::setup().await;

    Mock::given(method("GET"))
        .and(path("/1.0/audit/org/org%201/users/jane%20doe/records/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/1.0/audit/org/org%201/services/a%2Fb/save/"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"status": "saved", "total_time": 1})),
        )
        .expect(1)
        .mount(&server)
        .await;

    client
        .records_for_user("org 1", "jane doe", &AuditRecordQuery::default())
        .await
        .expect("query failed");

    let record = NewAuditRecord {
        timestamp: 1,
        obo_id: "jane doe".into(),
        actor_id: "jane doe".into(),
    };
    client
        .save_record("org 1", "a/b", &record)
        .await
        .expect("save failed");
}
