//! URL routing for the audit API
//!
//! Every route lives under `/1.0/audit/org`. A trailing slash is optional.
//! Path parameters arrive percent-encoded and are decoded after matching, so
//! an encoded `/` stays inside its segment.

use hyper::Method;
use percent_encoding::percent_decode_str;

/// Path prefix shared by every route
pub const API_PREFIX: &str = "/1.0/audit/org";

/// Header carrying an existing organisation or service id (`Audit-Identifier`)
pub const IDENTIFIER_HEADER: &str = "audit-identifier";

/// A resolved API route with its path parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// `POST /1.0/audit/org/register/`
    RegisterOrganisation,
    /// `DELETE /1.0/audit/org/register/`
    UnregisterOrganisation,
    /// `GET /1.0/audit/org/`
    ListOrganisations,
    /// `GET /1.0/audit/org/{org_id}/services/`
    ListServices { org_id: String },
    /// `POST /1.0/audit/org/{org_id}/services/register/`
    RegisterService { org_id: String },
    /// `DELETE /1.0/audit/org/{org_id}/services/register/`
    UnregisterService { org_id: String },
    /// `POST /1.0/audit/org/{org_id}/services/{service_id}/save/`
    SaveRecord { org_id: String, service_id: String },
    /// `GET /1.0/audit/org/{org_id}/services/{service_id}/records/`
    ServiceRecords { org_id: String, service_id: String },
    /// `GET /1.0/audit/org/{org_id}/users/{obo_id}/records/`
    UserRecords { org_id: String, obo_id: String },
}

impl Route {
    /// Matches a method and path against the route table
    ///
    /// Returns `None` for unknown paths, for known paths with the wrong
    /// method and for parameters that do not decode to UTF-8.
    pub fn resolve(method: &Method, path: &str) -> Option<Route> {
        let rest = path.strip_prefix(API_PREFIX)?;
        if !(rest.is_empty() || rest.starts_with('/')) {
            return None;
        }

        let segments: Vec<&str> = rest.split('/').filter(|s| !s.is_empty()).collect();

        let route = match (method, segments.as_slice()) {
            (&Method::GET, []) => Route::ListOrganisations,
            (&Method::POST, ["register"]) => Route::RegisterOrganisation,
            (&Method::DELETE, ["register"]) => Route::UnregisterOrganisation,
            (&Method::GET, [org, "services"]) => Route::ListServices {
                org_id: decode(org)?,
            },
            (&Method::POST, [org, "services", "register"]) => Route::RegisterService {
                org_id: decode(org)?,
            },
            (&Method::DELETE, [org, "services", "register"]) => Route::UnregisterService {
                org_id: decode(org)?,
            },
            (&Method::POST, [org, "services", service, "save"]) => Route::SaveRecord {
                org_id: decode(org)?,
                service_id: decode(service)?,
            },
            (&Method::GET, [org, "services", service, "records"]) => Route::ServiceRecords {
                org_id: decode(org)?,
                service_id: decode(service)?,
            },
            (&Method::GET, [org, "users", obo, "records"]) => Route::UserRecords {
                org_id: decode(org)?,
                obo_id: decode(obo)?,
            },
            _ => return None,
        };

        Some(route)
    }
}

fn decode(segment: &str) -> Option<String> {
    percent_decode_str(segment)
        .decode_utf8()
        .ok()
        .map(|decoded| decoded.into_owned())
}
