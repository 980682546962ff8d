//! Shared test helpers: an in-memory repository with failure injection

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use zenaudit_core::domain::{
    AuditRecord, AuditRecordQuery, HashKey, MonotonicClock, OrgId, Organisation, Service, ServiceId,
};
use zenaudit_core::ports::IAuditRepository;
use zenaudit_core::usecases::{AuditRecordUseCase, RegistryUseCase};

/// Append-only in-memory repository
///
/// Vectors keep insertion order, which stands in for the store's insertion
/// sequence when timestamps tie.
#[derive(Default)]
pub struct MemoryRepository {
    organisations: Mutex<Vec<Organisation>>,
    services: Mutex<Vec<Service>>,
    records: Mutex<Vec<AuditRecord>>,
    fail_writes: AtomicBool,
    fail_reads: AtomicBool,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent append fail
    pub fn fail_writes(&self) {
        self.fail_writes.store(true, Ordering::SeqCst);
    }

    /// Makes every subsequent lookup, listing and query fail
    pub fn fail_reads(&self) {
        self.fail_reads.store(true, Ordering::SeqCst);
    }

    pub fn organisation_rows(&self) -> Vec<Organisation> {
        self.organisations.lock().unwrap().clone()
    }

    pub fn service_rows(&self) -> Vec<Service> {
        self.services.lock().unwrap().clone()
    }

    pub fn records(&self) -> Vec<AuditRecord> {
        self.records.lock().unwrap().clone()
    }

    fn check_writable(&self) -> anyhow::Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            anyhow::bail!("simulated write failure");
        }
        Ok(())
    }

    fn check_readable(&self) -> anyhow::Result<()> {
        if self.fail_reads.load(Ordering::SeqCst) {
            anyhow::bail!("simulated read failure");
        }
        Ok(())
    }
}

fn latest_by<T: Clone, K: Ord>(rows: &[T], key: impl Fn(&T) -> K) -> Option<T> {
    rows.iter()
        .enumerate()
        .max_by_key(|(seq, row)| (key(row), *seq))
        .map(|(_, row)| row.clone())
}

fn select(records: &[AuditRecord], matches: impl Fn(&AuditRecord) -> bool, query: &AuditRecordQuery) -> Vec<AuditRecord> {
    let mut selected: Vec<(usize, AuditRecord)> = records
        .iter()
        .cloned()
        .enumerate()
        .filter(|(_, r)| matches(r))
        .filter(|(_, r)| {
            r.timestamp.as_i64() >= query.lower_bound() && r.timestamp.as_i64() <= query.upper_bound()
        })
        .collect();
    selected.sort_by_key(|(seq, r)| (r.timestamp, *seq));
    if query.newest_first {
        selected.reverse();
    }
    selected
        .into_iter()
        .take(query.effective_limit() as usize)
        .map(|(_, r)| r)
        .collect()
}

#[async_trait]
impl IAuditRepository for MemoryRepository {
    async fn append_organisation(&self, organisation: &Organisation) -> anyhow::Result<()> {
        self.check_writable()?;
        self.organisations.lock().unwrap().push(organisation.clone());
        Ok(())
    }

    async fn latest_organisation(&self, org_id: &OrgId) -> anyhow::Result<Option<Organisation>> {
        self.check_readable()?;
        let rows: Vec<Organisation> = self
            .organisations
            .lock()
            .unwrap()
            .iter()
            .filter(|o| o.org_id() == org_id)
            .cloned()
            .collect();
        Ok(latest_by(&rows, |o| o.timestamp()))
    }

    async fn list_organisations(&self) -> anyhow::Result<Vec<Organisation>> {
        self.check_readable()?;
        let rows = self.organisations.lock().unwrap().clone();
        let mut grouped: BTreeMap<OrgId, Vec<Organisation>> = BTreeMap::new();
        for row in rows {
            grouped.entry(row.org_id().clone()).or_default().push(row);
        }
        Ok(grouped
            .values()
            .filter_map(|rows| latest_by(rows, |o| o.timestamp()))
            .collect())
    }

    async fn append_service(&self, service: &Service) -> anyhow::Result<()> {
        self.check_writable()?;
        self.services.lock().unwrap().push(service.clone());
        Ok(())
    }

    async fn latest_service(
        &self,
        org_id: &OrgId,
        service_id: &ServiceId,
    ) -> anyhow::Result<Option<Service>> {
        self.check_readable()?;
        let rows: Vec<Service> = self
            .services
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.org_id() == org_id && s.service_id() == service_id)
            .cloned()
            .collect();
        Ok(latest_by(&rows, |s| s.timestamp()))
    }

    async fn list_services(&self, org_id: &OrgId) -> anyhow::Result<Vec<Service>> {
        self.check_readable()?;
        let rows = self.services.lock().unwrap().clone();
        let mut grouped: BTreeMap<ServiceId, Vec<Service>> = BTreeMap::new();
        for row in rows.into_iter().filter(|s| s.org_id() == org_id) {
            grouped.entry(row.service_id().clone()).or_default().push(row);
        }
        Ok(grouped
            .values()
            .filter_map(|rows| latest_by(rows, |s| s.timestamp()))
            .collect())
    }

    async fn append_record(&self, record: &AuditRecord) -> anyhow::Result<()> {
        self.check_writable()?;
        self.records.lock().unwrap().push(record.clone());
        Ok(())
    }

    async fn query_by_service_org(
        &self,
        service_org_hash: &HashKey,
        query: &AuditRecordQuery,
    ) -> anyhow::Result<Vec<AuditRecord>> {
        self.check_readable()?;
        let records = self.records.lock().unwrap().clone();
        Ok(select(&records, |r| &r.service_org_hash == service_org_hash, query))
    }

    async fn query_by_org_user(
        &self,
        org_user_hash: &HashKey,
        query: &AuditRecordQuery,
    ) -> anyhow::Result<Vec<AuditRecord>> {
        self.check_readable()?;
        let records = self.records.lock().unwrap().clone();
        Ok(select(&records, |r| &r.org_user_hash == org_user_hash, query))
    }
}

/// Registry and audit use cases sharing one in-memory repository
pub struct Harness {
    pub repo: Arc<MemoryRepository>,
    pub registry: RegistryUseCase,
    pub records: AuditRecordUseCase,
}

pub fn harness() -> Harness {
    let repo = Arc::new(MemoryRepository::new());
    let registry = RegistryUseCase::new(repo.clone(), Arc::new(MonotonicClock::new()));
    let records = AuditRecordUseCase::new(repo.clone(), registry.clone());
    Harness {
        repo,
        registry,
        records,
    }
}

/// Converts a `json!` object literal into a payload map
pub fn payload(value: serde_json::Value) -> serde_json::Map<String, serde_json::Value> {
    value.as_object().cloned().expect("payload must be an object")
}
