//! Audit record entity and read-side query parameters

use serde::{Deserialize, Serialize};

use super::hash_key::HashKey;
use super::timestamp::Timestamp;

/// Default number of records returned by a query
pub const DEFAULT_QUERY_LIMIT: u32 = 100;

/// Upper bound on the number of records a single query may return
pub const MAX_QUERY_LIMIT: u32 = 1000;

/// An immutable audit event
///
/// Written once and never updated. The two hash keys let the same record be
/// found by `(service, organisation)` and by `(organisation, user)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditRecord {
    /// `derive("|", [service_id, org_id])`, the partition key
    pub service_org_hash: HashKey,
    /// `derive("|", [org_id, obo_id])`, the secondary index key
    pub org_user_hash: HashKey,
    /// Event time supplied by the caller
    pub timestamp: Timestamp,
    /// User on whose behalf the action was taken
    pub obo_id: String,
    /// User who performed the action
    pub actor_id: String,
}

impl AuditRecord {
    /// Builds a record for the given organisation/service pair
    pub fn new(
        org_id: &str,
        service_id: &str,
        timestamp: Timestamp,
        obo_id: impl Into<String>,
        actor_id: impl Into<String>,
    ) -> Self {
        let obo_id = obo_id.into();
        Self {
            service_org_hash: HashKey::service_org(service_id, org_id),
            org_user_hash: HashKey::org_user(org_id, &obo_id),
            timestamp,
            obo_id,
            actor_id: actor_id.into(),
        }
    }

    /// Returns true if the actor acted on their own behalf
    pub fn is_self_service(&self) -> bool {
        self.obo_id == self.actor_id
    }
}

/// Range and ordering of an audit record query
///
/// Both bounds are inclusive. When unset, the range is unbounded on that
/// side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditRecordQuery {
    pub since: Option<Timestamp>,
    pub until: Option<Timestamp>,
    pub limit: u32,
    pub newest_first: bool,
}

impl Default for AuditRecordQuery {
    fn default() -> Self {
        Self {
            since: None,
            until: None,
            limit: DEFAULT_QUERY_LIMIT,
            newest_first: true,
        }
    }
}

impl AuditRecordQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_since(mut self, since: Timestamp) -> Self {
        self.since = Some(since);
        self
    }

    pub fn with_until(mut self, until: Timestamp) -> Self {
        self.until = Some(until);
        self
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    pub fn oldest_first(mut self) -> Self {
        self.newest_first = false;
        self
    }

    /// Limit clamped to `1..=MAX_QUERY_LIMIT`
    pub fn effective_limit(&self) -> u32 {
        self.limit.clamp(1, MAX_QUERY_LIMIT)
    }

    /// Lower bound as a raw value, `i64::MIN` when unbounded
    pub fn lower_bound(&self) -> i64 {
        self.since.map_or(i64::MIN, |t| t.as_i64())
    }

    /// Upper bound as a raw value, `i64::MAX` when unbounded
    pub fn upper_bound(&self) -> i64 {
        self.until.map_or(i64::MAX, |t| t.as_i64())
    }
}
