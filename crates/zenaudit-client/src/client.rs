//! ZenAudit API client
//!
//! Provides a typed HTTP client for the audit API. Handles the
//! `Audit-Identifier` header, JSON bodies and error decoding.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use zenaudit_client::AuditClient;
//! use zenaudit_client::types::OrganisationDetails;
//!
//! # async fn example() -> Result<(), zenaudit_client::ClientError> {
//! let client = AuditClient::new("http://127.0.0.1:5000");
//! let org = client
//!     .register_organisation(None, &OrganisationDetails {
//!         name: "Acme".into(),
//!         contact: "a@acme.com".into(),
//!         website: "acme.com".into(),
//!     })
//!     .await?;
//! println!("registered {}", org.id);
//! # Ok(())
//! # }
//! ```

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use tracing::debug;

use zenaudit_core::domain::AuditRecordQuery;

use crate::types::{
    AuditRecord, ErrorBody, NewAuditRecord, Organisation, OrganisationDetails,
    OrganisationRegistration, SaveReceipt, Service, ServiceDetails, ServiceRegistration,
    Unregistered,
};
use crate::{ClientError, ClientResult};

/// Path prefix shared by every route
const API_PREFIX: &str = "/1.0/audit/org";

/// Characters escaped inside a path parameter, including `/` and `%`
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Header carrying an existing organisation or service id
const IDENTIFIER_HEADER: &str = "Audit-Identifier";

/// HTTP client for the audit API
pub struct AuditClient {
    /// The underlying HTTP client
    client: Client,
    /// Base URL for API requests, without a trailing slash
    base_url: String,
}

impl AuditClient {
    /// Creates a client for the server at `base_url`, e.g. `http://127.0.0.1:5000`
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Returns the base URL requests are sent to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Creates a request builder for the given method and API path
    ///
    /// # Arguments
    /// * `method` - HTTP method
    /// * `path` - Path below `/1.0/audit/org`, e.g. `"/register/"`, with
    ///   parameters already percent-encoded
    pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}{}", self.base_url, API_PREFIX, path);
        self.client.request(method, &url)
    }

    /// Sends the request and decodes a JSON success body
    ///
    /// Non-success statuses become [`ClientError::Api`].
    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> ClientResult<T> {
        let response = builder.send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            let message = match serde_json::from_slice::<ErrorBody>(&body) {
                Ok(error) => error.error_message,
                Err(_) => String::from_utf8_lossy(&body).into_owned(),
            };
            debug!(status = status.as_u16(), message = %message, "Audit API returned error");
            return Err(ClientError::Api {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_slice(&body).map_err(|e| ClientError::InvalidResponse(e.to_string()))
    }

    fn with_identifier(builder: RequestBuilder, id: Option<&str>) -> RequestBuilder {
        match id {
            Some(id) => builder.header(IDENTIFIER_HEADER, id),
            None => builder,
        }
    }

    // ========================================================================
    // Organisations
    // ========================================================================

    /// Registers an organisation, or updates the one identified by `id`
    pub async fn register_organisation(
        &self,
        id: Option<&str>,
        details: &OrganisationDetails,
    ) -> ClientResult<OrganisationRegistration> {
        debug!(id = ?id, "Registering organisation");
        let builder = self.request(Method::POST, "/register/").json(details);
        self.send(Self::with_identifier(builder, id)).await
    }

    /// Unregisters the organisation `id`
    pub async fn unregister_organisation(&self, id: &str) -> ClientResult<Unregistered> {
        debug!(id = %id, "Unregistering organisation");
        let builder = self.request(Method::DELETE, "/register/");
        self.send(Self::with_identifier(builder, Some(id))).await
    }

    /// Lists every organisation with its current status
    pub async fn list_organisations(&self) -> ClientResult<Vec<Organisation>> {
        self.send(self.request(Method::GET, "/")).await
    }

    // ========================================================================
    // Services
    // ========================================================================

    /// Registers a service under `org_id`, or updates the one identified by `id`
    pub async fn register_service(
        &self,
        org_id: &str,
        id: Option<&str>,
        details: &ServiceDetails,
    ) -> ClientResult<ServiceRegistration> {
        debug!(org_id = %org_id, id = ?id, "Registering service");
        let path = format!("/{}/services/register/", segment(org_id));
        let builder = self.request(Method::POST, &path).json(details);
        self.send(Self::with_identifier(builder, id)).await
    }

    /// Unregisters the service `id` of `org_id`
    pub async fn unregister_service(&self, org_id: &str, id: &str) -> ClientResult<Unregistered> {
        debug!(org_id = %org_id, id = %id, "Unregistering service");
        let path = format!("/{}/services/register/", segment(org_id));
        let builder = self.request(Method::DELETE, &path);
        self.send(Self::with_identifier(builder, Some(id))).await
    }

    /// Lists the services of `org_id` with their current status
    pub async fn list_services(&self, org_id: &str) -> ClientResult<Vec<Service>> {
        let path = format!("/{}/services/", segment(org_id));
        self.send(self.request(Method::GET, &path)).await
    }

    // ========================================================================
    // Audit records
    // ========================================================================

    /// Saves an audit record for `org_id`/`service_id`
    pub async fn save_record(
        &self,
        org_id: &str,
        service_id: &str,
        record: &NewAuditRecord,
    ) -> ClientResult<SaveReceipt> {
        let path = format!("/{}/services/{}/save/", segment(org_id), segment(service_id));
        let builder = self.request(Method::POST, &path).json(record);
        self.send(builder).await
    }

    /// Queries the records written for `org_id`/`service_id`
    pub async fn records_for_service(
        &self,
        org_id: &str,
        service_id: &str,
        query: &AuditRecordQuery,
    ) -> ClientResult<Vec<AuditRecord>> {
        let path = format!("/{}/services/{}/records/", segment(org_id), segment(service_id));
        let builder = self
            .request(Method::GET, &path)
            .query(&query_params(query));
        self.send(builder).await
    }

    /// Queries the records of `obo_id` across every service of `org_id`
    pub async fn records_for_user(
        &self,
        org_id: &str,
        obo_id: &str,
        query: &AuditRecordQuery,
    ) -> ClientResult<Vec<AuditRecord>> {
        let path = format!("/{}/users/{}/records/", segment(org_id), segment(obo_id));
        let builder = self
            .request(Method::GET, &path)
            .query(&query_params(query));
        self.send(builder).await
    }
}

/// Percent-encodes an id for use as a single path segment
fn segment(id: &str) -> String {
    utf8_percent_encode(id, SEGMENT).to_string()
}

/// Converts a query into `since`, `until`, `limit` and `order` parameters
fn query_params(query: &AuditRecordQuery) -> Vec<(&'static str, String)> {
    let mut params = Vec::with_capacity(4);
    if let Some(since) = query.since {
        params.push(("since", since.to_string()));
    }
    if let Some(until) = query.until {
        params.push(("until", until.to_string()));
    }
    params.push(("limit", query.limit.to_string()));
    let order = if query.newest_first { "desc" } else { "asc" };
    params.push(("order", order.to_string()));
    params
}
