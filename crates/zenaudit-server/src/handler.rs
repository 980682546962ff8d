//! Request handling for the audit API
//!
//! Translates HTTP requests into registry and audit-record use case calls
//! and their outcomes into JSON responses. Validation and input errors
//! answer `404` with `{status, error_message}`; store failures answer `500`.

use std::str::FromStr;

use http_body_util::{BodyExt, Full};
use hyper::body::{Body, Bytes};
use hyper::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use hyper::{Request, Response, StatusCode};
use serde::Serialize;
use serde_json::{json, Map, Value};
use tracing::{debug, error, trace};
use url::form_urlencoded;

use zenaudit_core::domain::validation;
use zenaudit_core::domain::{AuditError, AuditRecordQuery, Timestamp};
use zenaudit_core::usecases::{AuditRecordUseCase, RegistryUseCase};

use crate::routes::{Route, IDENTIFIER_HEADER};

/// Handles API requests against the registry and audit record use cases
pub struct ApiHandler {
    registry: RegistryUseCase,
    records: AuditRecordUseCase,
}

impl ApiHandler {
    pub fn new(registry: RegistryUseCase, records: AuditRecordUseCase) -> Self {
        Self { registry, records }
    }

    /// Handles one request and always produces a response
    pub async fn handle<B>(&self, req: Request<B>) -> Response<Full<Bytes>>
    where
        B: Body,
        B::Error: std::fmt::Display,
    {
        let started = Timestamp::now();
        let (parts, body) = req.into_parts();

        let Some(route) = Route::resolve(&parts.method, parts.uri.path()) else {
            debug!(method = %parts.method, path = %parts.uri.path(), "No route");
            return error_response(
                StatusCode::NOT_FOUND,
                &format!("No route for {} {}", parts.method, parts.uri.path()),
            );
        };
        trace!(?route, "Dispatching request");

        let identifier = identifier(&parts.headers);
        let query = parts.uri.query();

        let result = match route {
            Route::RegisterOrganisation => match read_payload(body).await {
                Ok(data) => self
                    .registry
                    .register_organisation(identifier.as_deref(), &data)
                    .await
                    .map(Value::Object),
                Err(e) => Err(e),
            },
            Route::UnregisterOrganisation => self
                .registry
                .unregister_organisation(identifier.as_deref())
                .await
                .and_then(|u| to_json(&u)),
            Route::ListOrganisations => self
                .registry
                .list_organisations()
                .await
                .and_then(|orgs| to_json(&orgs)),
            Route::ListServices { org_id } => self
                .registry
                .list_services(&org_id)
                .await
                .and_then(|services| to_json(&services)),
            Route::RegisterService { org_id } => match read_payload(body).await {
                Ok(data) => self
                    .registry
                    .register_service(&org_id, identifier.as_deref(), &data)
                    .await
                    .map(Value::Object),
                Err(e) => Err(e),
            },
            Route::UnregisterService { org_id } => self
                .registry
                .unregister_service(&org_id, identifier.as_deref())
                .await
                .and_then(|u| to_json(&u)),
            Route::SaveRecord { org_id, service_id } => match read_payload(body).await {
                Ok(data) => self
                    .records
                    .save(&org_id, &service_id, &data)
                    .await
                    .map(|_| {
                        json!({
                            "status": "saved",
                            "total_time": Timestamp::now().micros_since(started),
                        })
                    }),
                Err(e) => Err(e),
            },
            Route::ServiceRecords { org_id, service_id } => match parse_query(query) {
                Ok(q) => self
                    .records
                    .records_for_service(&org_id, &service_id, &q)
                    .await
                    .and_then(|records| to_json(&records)),
                Err(e) => Err(e),
            },
            Route::UserRecords { org_id, obo_id } => match parse_query(query) {
                Ok(q) => self
                    .records
                    .records_for_user(&org_id, &obo_id, &q)
                    .await
                    .and_then(|records| to_json(&records)),
                Err(e) => Err(e),
            },
        };

        match result {
            Ok(value) => json_response(StatusCode::OK, &value),
            Err(err) => audit_error_response(&err),
        }
    }
}

// ============================================================================
// Request helpers
// ============================================================================

/// Reads the `Audit-Identifier` header, treating blank values as absent
fn identifier(headers: &HeaderMap) -> Option<String> {
    headers
        .get(IDENTIFIER_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Collects the body and parses it as a JSON object
async fn read_payload<B>(body: B) -> Result<Map<String, Value>, AuditError>
where
    B: Body,
    B::Error: std::fmt::Display,
{
    let bytes = body
        .collect()
        .await
        .map_err(|e| AuditError::InvalidInput(format!("failed to read request body: {e}")))?
        .to_bytes();

    let value: Value = serde_json::from_slice(&bytes)
        .map_err(|e| AuditError::validation(format!("request body is not valid JSON: {e}")))?;

    Ok(validation::as_object(&value)?.clone())
}

/// Parses `since`, `until`, `limit` and `order` from the query string
///
/// Keys and values are form-url-decoded. Unknown parameters are ignored.
fn parse_query(raw: Option<&str>) -> Result<AuditRecordQuery, AuditError> {
    let mut query = AuditRecordQuery::default();

    for (key, value) in form_urlencoded::parse(raw.unwrap_or_default().as_bytes()) {
        let (key, value) = (key.as_ref(), value.as_ref());
        match key {
            "since" => query = query.with_since(parse_param(key, value)?),
            "until" => query = query.with_until(parse_param(key, value)?),
            "limit" => query = query.with_limit(parse_param(key, value)?),
            "order" => match value {
                "asc" => query = query.oldest_first(),
                "desc" => query.newest_first = true,
                other => {
                    return Err(AuditError::validation(format!(
                        "invalid value for 'order': '{other}' (expected asc or desc)"
                    )))
                }
            },
            _ => {}
        }
    }

    Ok(query)
}

fn parse_param<T: FromStr>(key: &str, value: &str) -> Result<T, AuditError> {
    value
        .parse()
        .map_err(|_| AuditError::validation(format!("invalid value for '{key}': '{value}'")))
}

// ============================================================================
// Response helpers
// ============================================================================

fn to_json<T: Serialize>(value: &T) -> Result<Value, AuditError> {
    serde_json::to_value(value).map_err(|e| AuditError::InvalidInput(e.to_string()))
}

fn json_response(status: StatusCode, value: &Value) -> Response<Full<Bytes>> {
    let mut response = Response::new(Full::new(Bytes::from(value.to_string())));
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    response
}

fn error_response(status: StatusCode, message: &str) -> Response<Full<Bytes>> {
    json_response(
        status,
        &json!({
            "status": status.as_u16(),
            "error_message": message,
        }),
    )
}

fn audit_error_response(err: &AuditError) -> Response<Full<Bytes>> {
    match err {
        AuditError::Validation(message) | AuditError::InvalidInput(message) => {
            debug!(kind = err.kind(), error = %message, "Request rejected");
            error_response(StatusCode::NOT_FOUND, message)
        }
        AuditError::Store(_) => {
            error!(error = %err, "Store failure while handling request");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, &err.to_string())
        }
    }
}
