//! In-memory [`DnsProvider`] for tests and dry runs.
//!
//! Behaves like a strongly consistent provider: every call is visible to
//! the next one. Individual calls can be made to fail to exercise the
//! reconciler's error paths.

use async_trait::async_trait;
use dnspin_core::{
    name_key, DesiredRecord, DnsPinError, DnsProvider, ExistingRecord, RecordType, Result, ZoneRef,
};
use std::collections::{HashMap, HashSet};
use tokio::sync::Mutex;

/// A provider call, as recorded by [`MemoryProvider::calls`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    /// `find_zone(name)`
    FindZone(String),
    /// `list_records(zone_id, type, name)`
    List(String, RecordType, Option<String>),
    /// `create_record(zone_id, name, content)`
    Create(String, String, String),
    /// `delete_record(zone_id, id)`
    Delete(String, String),
}

#[derive(Default)]
struct State {
    zones: Vec<ZoneRef>,
    records: HashMap<String, Vec<ExistingRecord>>,
    next_id: u64,
    fail_create: HashSet<String>,
    fail_delete: HashMap<String, u16>,
    calls: Vec<Call>,
}

/// In-memory DNS provider
#[derive(Default)]
pub struct MemoryProvider {
    state: Mutex<State>,
}

impl MemoryProvider {
    /// Create an empty provider with no zones
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a zone and return its reference
    pub async fn add_zone(&self, name: &str) -> ZoneRef {
        let mut state = self.state.lock().await;
        let zone = ZoneRef::new(format!("zone-{}", state.zones.len() + 1), name.trim_end_matches('.'));
        state.zones.push(zone.clone());
        state.records.entry(zone.id.clone()).or_default();
        zone
    }

    /// Seed a record directly, bypassing the call log
    pub async fn insert(
        &self,
        zone_id: &str,
        name: &str,
        record_type: RecordType,
        content: &str,
    ) -> ExistingRecord {
        let mut state = self.state.lock().await;
        let record = ExistingRecord {
            id: state.allocate_id(),
            name: name.to_string(),
            record_type,
            content: content.to_string(),
        };
        state
            .records
            .entry(zone_id.to_string())
            .or_default()
            .push(record.clone());
        record
    }

    /// Make every create for `name` fail with a 400
    pub async fn fail_create_for(&self, name: &str) {
        self.state.lock().await.fail_create.insert(name_key(name));
    }

    /// Make deletes of `record_id` fail with the given HTTP status
    pub async fn fail_delete_for(&self, record_id: &str, status: u16) {
        self.state
            .lock()
            .await
            .fail_delete
            .insert(record_id.to_string(), status);
    }

    /// Remove a record without logging a call, as another client would
    pub async fn remove_externally(&self, zone_id: &str, record_id: &str) {
        let mut state = self.state.lock().await;
        if let Some(records) = state.records.get_mut(zone_id) {
            records.retain(|r| r.id != record_id);
        }
    }

    /// Snapshot of a zone's records in insertion order
    pub async fn records(&self, zone_id: &str) -> Vec<ExistingRecord> {
        self.state
            .lock()
            .await
            .records
            .get(zone_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Every provider call made so far, in order
    pub async fn calls(&self) -> Vec<Call> {
        self.state.lock().await.calls.clone()
    }

    /// Mutating calls only (create and delete)
    pub async fn mutations(&self) -> Vec<Call> {
        self.calls()
            .await
            .into_iter()
            .filter(|c| matches!(c, Call::Create(..) | Call::Delete(..)))
            .collect()
    }
}

impl State {
    fn allocate_id(&mut self) -> String {
        self.next_id += 1;
        format!("rec-{}", self.next_id)
    }

    fn zone_records(&mut self, zone_id: &str) -> Result<&mut Vec<ExistingRecord>> {
        self.records.get_mut(zone_id).ok_or_else(|| DnsPinError::NotFound {
            resource: format!("zone {zone_id}"),
        })
    }
}

#[async_trait]
impl DnsProvider for MemoryProvider {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn find_zone(&self, zone_name: &str) -> Result<ZoneRef> {
        let mut state = self.state.lock().await;
        state.calls.push(Call::FindZone(zone_name.to_string()));
        let wanted = name_key(zone_name);
        state
            .zones
            .iter()
            .find(|z| name_key(&z.name) == wanted)
            .cloned()
            .ok_or_else(|| DnsPinError::ZoneNotFound {
                zone: zone_name.trim_end_matches('.').to_string(),
            })
    }

    async fn list_records(
        &self,
        zone_id: &str,
        record_type: RecordType,
        name_filter: Option<&str>,
    ) -> Result<Vec<ExistingRecord>> {
        let mut state = self.state.lock().await;
        state.calls.push(Call::List(
            zone_id.to_string(),
            record_type,
            name_filter.map(str::to_string),
        ));
        let wanted = name_filter.map(name_key);
        Ok(state
            .zone_records(zone_id)?
            .iter()
            .filter(|r| r.record_type == record_type)
            .filter(|r| wanted.as_ref().map_or(true, |w| name_key(&r.name) == *w))
            .cloned()
            .collect())
    }

    async fn create_record(&self, zone_id: &str, record: &DesiredRecord) -> Result<ExistingRecord> {
        let mut state = self.state.lock().await;
        state.calls.push(Call::Create(
            zone_id.to_string(),
            record.name.clone(),
            record.content.clone(),
        ));

        if state.fail_create.contains(&name_key(&record.name)) {
            return Err(DnsPinError::Provider {
                status: 400,
                message: format!("create rejected for {}", record.name),
            });
        }

        let created = ExistingRecord {
            id: state.allocate_id(),
            name: record.name.clone(),
            record_type: record.record_type,
            content: record.content.clone(),
        };
        state.zone_records(zone_id)?.push(created.clone());
        Ok(created)
    }

    async fn delete_record(&self, zone_id: &str, record_id: &str) -> Result<()> {
        let mut state = self.state.lock().await;
        state
            .calls
            .push(Call::Delete(zone_id.to_string(), record_id.to_string()));

        if let Some(&status) = state.fail_delete.get(record_id) {
            return Err(DnsPinError::Provider {
                status,
                message: format!("delete rejected for {record_id}"),
            });
        }

        let records = state.zone_records(zone_id)?;
        let before = records.len();
        records.retain(|r| r.id != record_id);
        if records.len() == before {
            return Err(DnsPinError::NotFound {
                resource: format!("record {record_id}"),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::{assert_err, assert_ok};

    #[tokio::test]
    async fn test_create_list_delete() {
        let provider = MemoryProvider::new();
        let zone = provider.add_zone("example.com").await;

        let desired = DesiredRecord::new("_mta-sts.example.com", RecordType::Txt, "v=STSv1; id=1");
        let created = assert_ok!(provider.create_record(&zone.id, &desired).await);

        let listed = provider
            .list_records(&zone.id, RecordType::Txt, Some("_MTA-STS.example.com."))
            .await
            .unwrap();
        assert_eq!(listed, vec![created.clone()]);

        assert_ok!(provider.delete_record(&zone.id, &created.id).await);
        let err = assert_err!(provider.delete_record(&zone.id, &created.id).await);
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_unknown_zone() {
        let provider = MemoryProvider::new();
        let err = assert_err!(provider.find_zone("example.com").await);
        assert!(matches!(err, DnsPinError::ZoneNotFound { .. }));
    }
}
