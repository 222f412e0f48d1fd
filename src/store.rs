//! The campaign list and its persisted copy.
//!
//! The store is the only writer of the list. Every mutation rewrites the whole
//! list as one JSON array under a single key. Persistence is best effort: a
//! failed write is reported but never undoes the in-memory change.

use crate::ids::IdGenerator;
use crate::models::CampaignRecord;
use crate::storage::{KeyValueStore, StorageError};
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info};

pub const STORAGE_KEY: &str = "campaignData";

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("failed to read saved campaigns: {0}")]
    Read(#[source] StorageError),
    #[error("saved campaigns are corrupt: {0}")]
    Corrupt(#[source] serde_json::Error),
    #[error("failed to encode campaigns: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("failed to save campaigns: {0}")]
    Write(#[source] StorageError),
}

impl PersistenceError {
    pub fn is_read(&self) -> bool {
        matches!(self, Self::Read(_) | Self::Corrupt(_))
    }

    /// Text for the dashboard banner.
    pub fn user_message(&self) -> &'static str {
        if self.is_read() {
            "Failed to load saved data"
        } else {
            "Failed to save data locally"
        }
    }
}

/// Outcome of removing a record: what was removed and whether the shrunken
/// list reached storage.
#[derive(Debug)]
pub struct Deletion {
    pub removed: CampaignRecord,
    pub saved: Result<(), PersistenceError>,
}

pub struct CampaignStore {
    records: Vec<CampaignRecord>,
    backend: Arc<dyn KeyValueStore>,
    ids: IdGenerator,
}

impl CampaignStore {
    pub fn new(backend: Arc<dyn KeyValueStore>) -> Self {
        Self {
            records: Vec::new(),
            backend,
            ids: IdGenerator::default(),
        }
    }

    /// Replace the list with the persisted one.
    ///
    /// A missing key yields an empty list. An unreadable or corrupt blob also
    /// yields an empty list, and the error is returned for the caller to show.
    pub fn load(&mut self) -> Result<(), PersistenceError> {
        self.records.clear();

        let raw = match self.backend.get(STORAGE_KEY) {
            Ok(Some(raw)) if !raw.trim().is_empty() => raw,
            Ok(_) => return Ok(()),
            Err(err) => {
                error!("failed to read saved campaigns: {err}");
                return Err(PersistenceError::Read(err));
            }
        };

        match serde_json::from_str::<Vec<CampaignRecord>>(&raw) {
            Ok(records) => {
                for record in &records {
                    self.ids.observe(record.id);
                }
                info!(count = records.len(), "loaded campaigns");
                self.records = records;
                Ok(())
            }
            Err(err) => {
                error!("failed to parse saved campaigns: {err}");
                Err(PersistenceError::Corrupt(err))
            }
        }
    }

    /// Write the current list under the store key.
    pub fn save(&self) -> Result<(), PersistenceError> {
        let payload = serde_json::to_string(&self.records).map_err(PersistenceError::Encode)?;
        self.backend.set(STORAGE_KEY, &payload).map_err(|err| {
            error!("failed to save campaigns: {err}");
            PersistenceError::Write(err)
        })
    }

    /// Append a record and persist. On `Err` the record is still in the list.
    pub fn add(&mut self, record: CampaignRecord) -> Result<(), PersistenceError> {
        self.ids.observe(record.id);
        self.records.push(record);
        self.save()
    }

    /// Remove the first record with `id`. Returns `None`, and leaves storage
    /// untouched, when nothing matches.
    pub fn delete(&mut self, id: u64) -> Option<Deletion> {
        let index = self.records.iter().position(|record| record.id == id)?;
        let removed = self.records.remove(index);
        let saved = self.save();
        Some(Deletion { removed, saved })
    }

    pub fn all(&self) -> &[CampaignRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn next_id(&self) -> u64 {
        self.ids.next_id()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryKeyValueStore;

    fn record(id: u64, name: &str) -> CampaignRecord {
        CampaignRecord {
            id,
            name: name.to_string(),
            impressions: 1000,
            clicks: 50,
            budget: 500.0,
            ctr: 5.0,
            cpc: 10.0,
        }
    }

    fn blob(backend: &MemoryKeyValueStore) -> Option<String> {
        backend.get(STORAGE_KEY).unwrap()
    }

    #[test]
    fn missing_key_loads_empty() {
        let backend = Arc::new(MemoryKeyValueStore::new());
        let mut store = CampaignStore::new(backend);
        assert!(store.load().is_ok());
        assert!(store.is_empty());
    }

    #[test]
    fn persisted_list_round_trips_in_order() {
        let backend = Arc::new(MemoryKeyValueStore::new());
        let mut store = CampaignStore::new(backend.clone());
        store.add(record(2, "Beta")).unwrap();
        store.add(record(1, "Alpha")).unwrap();
        store.add(record(3, "Gamma")).unwrap();

        let mut reloaded = CampaignStore::new(backend);
        reloaded.load().unwrap();
        assert_eq!(reloaded.all(), store.all());
        let names: Vec<_> = reloaded.all().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["Beta", "Alpha", "Gamma"]);
    }

    #[test]
    fn blob_uses_plain_record_fields() {
        let backend = Arc::new(MemoryKeyValueStore::new());
        let mut store = CampaignStore::new(backend.clone());
        store.add(record(7, "Launch")).unwrap();
        let value: serde_json::Value = serde_json::from_str(&blob(&backend).unwrap()).unwrap();
        assert_eq!(
            value,
            serde_json::json!([{
                "id": 7, "name": "Launch", "impressions": 1000, "clicks": 50,
                "budget": 500.0, "ctr": 5.0, "cpc": 10.0
            }])
        );
    }

    #[test]
    fn corrupt_blob_resets_to_empty() {
        let backend = Arc::new(MemoryKeyValueStore::with_entry(STORAGE_KEY, "{not json"));
        let mut store = CampaignStore::new(backend);
        let err = store.load().unwrap_err();
        assert!(matches!(err, PersistenceError::Corrupt(_)));
        assert!(err.is_read());
        assert_eq!(err.user_message(), "Failed to load saved data");
        assert!(store.is_empty());
    }

    #[test]
    fn unreadable_storage_resets_to_empty() {
        let backend = Arc::new(MemoryKeyValueStore::new());
        let mut store = CampaignStore::new(backend.clone());
        store.add(record(1, "Alpha")).unwrap();
        backend.set_fail_reads(true);
        assert!(matches!(store.load(), Err(PersistenceError::Read(_))));
        assert!(store.is_empty());
    }

    #[test]
    fn failed_write_keeps_in_memory_record() {
        let backend = Arc::new(MemoryKeyValueStore::new());
        let mut store = CampaignStore::new(backend.clone());
        backend.set_fail_writes(true);
        let err = store.add(record(1, "Alpha")).unwrap_err();
        assert!(matches!(err, PersistenceError::Write(_)));
        assert_eq!(err.user_message(), "Failed to save data locally");
        assert_eq!(store.len(), 1);
        assert!(blob(&backend).is_none());

        // The next successful mutation persists everything held in memory.
        backend.set_fail_writes(false);
        store.add(record(2, "Beta")).unwrap();
        let mut reloaded = CampaignStore::new(backend);
        reloaded.load().unwrap();
        assert_eq!(reloaded.len(), 2);
    }

    #[test]
    fn deleting_unknown_id_changes_nothing() {
        let backend = Arc::new(MemoryKeyValueStore::new());
        let mut store = CampaignStore::new(backend.clone());
        store.add(record(1, "Alpha")).unwrap();
        let before = blob(&backend);

        assert!(store.delete(99).is_none());
        assert_eq!(store.len(), 1);
        assert_eq!(blob(&backend), before);
    }

    #[test]
    fn deleting_existing_id_removes_and_persists() {
        let backend = Arc::new(MemoryKeyValueStore::new());
        let mut store = CampaignStore::new(backend.clone());
        store.add(record(1, "Alpha")).unwrap();
        store.add(record(2, "Beta")).unwrap();
        store.add(record(3, "Gamma")).unwrap();

        let deletion = store.delete(2).expect("record removed");
        assert_eq!(deletion.removed.name, "Beta");
        assert!(deletion.saved.is_ok());
        assert!(store.all().iter().all(|record| record.id != 2));

        let mut reloaded = CampaignStore::new(backend);
        reloaded.load().unwrap();
        let ids: Vec<_> = reloaded.all().iter().map(|r| r.id).collect();
        assert_eq!(ids, [1, 3]);
    }

    #[test]
    fn delete_removes_only_first_match() {
        let backend = Arc::new(MemoryKeyValueStore::new());
        let mut store = CampaignStore::new(backend);
        store.add(record(5, "One")).unwrap();
        store.add(record(5, "Two")).unwrap();
        store.delete(5).unwrap();
        assert_eq!(store.all().len(), 1);
        assert_eq!(store.all()[0].name, "Two");
    }

    #[test]
    fn ids_follow_loaded_records() {
        let far_future = u64::MAX / 2;
        let backend = Arc::new(MemoryKeyValueStore::new());
        let mut store = CampaignStore::new(backend.clone());
        store.add(record(far_future, "Alpha")).unwrap();

        let mut reloaded = CampaignStore::new(backend);
        reloaded.load().unwrap();
        assert!(reloaded.next_id() > far_future);
    }
}
