use anyhow::{Context, Result};
use serde::{de::DeserializeOwned, Serialize};
use std::fs;
use tracing::{debug, info};

use super::connection::JsonConnection;
use crate::storage::record_store::{Collection, RecordStore};
use crate::storage::seed;
use crate::storage::traits::{PersistenceHook, SnapshotSource};

/// Persists each record store collection as a JSON file under its storage key
#[derive(Debug, Clone)]
pub struct JsonSnapshotRepository {
    connection: JsonConnection,
}

impl JsonSnapshotRepository {
    pub fn new(connection: JsonConnection) -> Self {
        Self { connection }
    }

    /// Read the value stored under `key`, or `None` if the key was never written
    fn read_key<T: DeserializeOwned>(&self, key: &str) -> Result<Option<Vec<T>>> {
        let path = self.connection.key_path(key);
        if !path.exists() {
            debug!("No snapshot for key {}", key);
            return Ok(None);
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let items = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        Ok(Some(items))
    }

    /// Write `items` under `key` atomically
    fn write_key<T: Serialize>(&self, key: &str, items: &[T]) -> Result<()> {
        let path = self.connection.key_path(key);
        let temp_path = path.with_extension("json.tmp");

        let content = serde_json::to_string_pretty(items)
            .with_context(|| format!("Failed to serialize {}", key))?;
        fs::write(&temp_path, content)
            .with_context(|| format!("Failed to write {}", temp_path.display()))?;
        fs::rename(&temp_path, &path)
            .with_context(|| format!("Failed to move snapshot into {}", path.display()))?;

        debug!("Wrote {} entries under {}", items.len(), key);
        Ok(())
    }

    fn write_collection(&self, store: &RecordStore, collection: Collection) -> Result<()> {
        let key = collection.storage_key();
        match collection {
            Collection::Students => self.write_key(key, store.students()),
            Collection::Groups => self.write_key(key, store.groups()),
            Collection::Attendance => self.write_key(key, store.attendance()),
            Collection::Transactions => self.write_key(key, store.transactions()),
        }
    }

    /// Write every collection, e.g. after seeding a fresh data directory
    pub fn write_all(&self, store: &RecordStore) -> Result<()> {
        self.persist(store, &Collection::ALL)
    }
}

impl PersistenceHook for JsonSnapshotRepository {
    fn persist(&self, store: &RecordStore, changed: &[Collection]) -> Result<()> {
        for collection in changed {
            self.write_collection(store, *collection)?;
        }
        Ok(())
    }
}

impl SnapshotSource for JsonSnapshotRepository {
    fn has_snapshot(&self) -> bool {
        Collection::ALL
            .iter()
            .any(|collection| self.connection.key_path(collection.storage_key()).exists())
    }

    fn load(&self, seed_missing: bool) -> Result<RecordStore> {
        if seed_missing && !self.has_snapshot() {
            info!(
                "No snapshot in {}, starting from the seed dataset",
                self.connection.base_directory().display()
            );
            return Ok(seed::seed_store());
        }

        // Once any key exists a missing one means an empty collection
        let students = self.read_key(Collection::Students.storage_key())?.unwrap_or_default();
        let groups = self.read_key(Collection::Groups.storage_key())?.unwrap_or_default();
        let attendance = self.read_key(Collection::Attendance.storage_key())?.unwrap_or_default();
        let transactions = self
            .read_key(Collection::Transactions.storage_key())?
            .unwrap_or_default();

        let store = RecordStore::from_parts(students, groups, attendance, transactions);
        info!(
            "Loaded {} students, {} groups, {} attendance records, {} transactions from {}",
            store.students().len(),
            store.groups().len(),
            store.attendance().len(),
            store.transactions().len(),
            self.connection.base_directory().display()
        );
        Ok(store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::attendance::{AttendanceRecord, AttendanceStatus};
    use chrono::NaiveDate;
    use tempfile::tempdir;

    fn setup_test() -> (tempfile::TempDir, JsonSnapshotRepository) {
        let temp_dir = tempdir().unwrap();
        let connection = JsonConnection::new(temp_dir.path()).unwrap();
        (temp_dir, JsonSnapshotRepository::new(connection))
    }

    #[test]
    fn test_load_empty_directory_seeds() {
        let (_dir, repo) = setup_test();
        let store = repo.load(true).unwrap();
        assert_eq!(store.students().len(), 3);
        assert_eq!(store.groups().len(), 2);
        assert_eq!(store.transactions().len(), 1);
        assert!(store.attendance().is_empty());
    }

    #[test]
    fn test_load_empty_directory_without_seed() {
        let (_dir, repo) = setup_test();
        let store = repo.load(false).unwrap();
        assert_eq!(store, RecordStore::default());
    }

    #[test]
    fn test_persisted_collections_survive_reload() {
        let (dir, repo) = setup_test();
        let mut store = repo.load(true).unwrap();
        store
            .insert_record(AttendanceRecord {
                id: "att-1".to_string(),
                student_id: "s1".to_string(),
                group_id: "g1".to_string(),
                date: NaiveDate::from_ymd_opt(2024, 5, 2).unwrap(),
                status: AttendanceStatus::Late,
            })
            .unwrap();
        repo.write_all(&store).unwrap();

        assert!(dir.path().join("ecp_attendance.json").exists());
        assert!(!dir.path().join("ecp_attendance.json.tmp").exists());

        let reloaded = repo.load(true).unwrap();
        assert_eq!(reloaded, store);
    }

    #[test]
    fn test_only_changed_collections_are_written() {
        let (dir, repo) = setup_test();
        let store = repo.load(true).unwrap();
        repo.persist(&store, &[Collection::Transactions]).unwrap();

        assert!(dir.path().join("ecp_transactions.json").exists());
        assert!(!dir.path().join("ecp_students.json").exists());
    }

    #[test]
    fn test_corrupt_snapshot_is_an_error() {
        let (dir, repo) = setup_test();
        fs::write(dir.path().join("ecp_students.json"), "not json").unwrap();
        assert!(repo.load(true).is_err());
    }

    #[test]
    fn test_deleted_key_is_not_reseeded() {
        let (dir, repo) = setup_test();
        assert!(!repo.has_snapshot());
        repo.write_all(&repo.load(true).unwrap()).unwrap();
        assert!(repo.has_snapshot());

        fs::remove_file(dir.path().join("ecp_transactions.json")).unwrap();
        let store = repo.load(true).unwrap();
        assert!(store.transactions().is_empty());
        assert_eq!(store.students().len(), 3);
        assert_eq!(store.groups().len(), 2);
    }

    #[test]
    fn test_empty_persisted_collection_is_not_reseeded() {
        let (_dir, repo) = setup_test();
        repo.write_all(&RecordStore::default()).unwrap();
        let store = repo.load(true).unwrap();
        assert!(store.students().is_empty());
    }
}
