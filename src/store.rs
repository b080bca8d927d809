//! Registry stores: JSON files on disk, or memory.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use serde_json::Value;

use crate::error::StorageError;
use crate::traits::{Collection, RegistryStore};

/// File-backed registry: one JSON array per collection in `data_dir`.
///
/// Appends hold a per-collection lock across load, modify, and save, so two
/// concurrent appends to the same collection never drop a record.
#[derive(Debug)]
pub struct JsonFileStore {
    data_dir: PathBuf,
    villages: Mutex<()>,
    relief_centers: Mutex<()>,
}

impl JsonFileStore {
    /// Open a store, creating the directory and empty collections as needed.
    pub fn open(data_dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let data_dir = data_dir.into();
        fs::create_dir_all(&data_dir).map_err(|source| StorageError::Io {
            path: data_dir.clone(),
            source,
        })?;

        let store = Self {
            data_dir,
            villages: Mutex::new(()),
            relief_centers: Mutex::new(()),
        };

        for collection in Collection::ALL {
            let path = store.path_for(collection);
            if !path.exists() {
                write_records(&path, &[])?;
            }
        }

        Ok(store)
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn path_for(&self, collection: Collection) -> PathBuf {
        self.data_dir.join(collection.file_name())
    }

    fn lock(&self, collection: Collection) -> Result<MutexGuard<'_, ()>, StorageError> {
        let mutex = match collection {
            Collection::Villages => &self.villages,
            Collection::ReliefCenters => &self.relief_centers,
        };
        mutex.lock().map_err(|_| StorageError::Poisoned)
    }
}

impl RegistryStore for JsonFileStore {
    fn load(&self, collection: Collection) -> Result<Vec<Value>, StorageError> {
        let _guard = self.lock(collection)?;
        read_records(&self.path_for(collection))
    }

    fn append(&self, collection: Collection, record: Value) -> Result<(), StorageError> {
        let _guard = self.lock(collection)?;
        let path = self.path_for(collection);

        let mut records = read_records(&path)?;
        records.push(record);
        write_records(&path, &records)?;

        tracing::debug!(path = %path.display(), count = records.len(), "appended registry record");
        Ok(())
    }
}

fn read_records(path: &Path) -> Result<Vec<Value>, StorageError> {
    let json = fs::read_to_string(path).map_err(|source| StorageError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let value: Value = serde_json::from_str(&json).map_err(|source| StorageError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    match value {
        Value::Array(records) => Ok(records),
        _ => Err(StorageError::Malformed(path.to_path_buf())),
    }
}

/// Write through a sibling temp file so readers never see a half-written array.
fn write_records(path: &Path, records: &[Value]) -> Result<(), StorageError> {
    let json = serde_json::to_string_pretty(records).map_err(|source| StorageError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json).map_err(|source| StorageError::Io {
        path: tmp.clone(),
        source,
    })?;
    fs::rename(&tmp, path).map_err(|source| StorageError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// In-process registry.
#[derive(Debug, Default)]
pub struct MemoryStore {
    villages: Mutex<Vec<Value>>,
    relief_centers: Mutex<Vec<Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a store with existing records.
    pub fn with_records(villages: Vec<Value>, relief_centers: Vec<Value>) -> Self {
        Self {
            villages: Mutex::new(villages),
            relief_centers: Mutex::new(relief_centers),
        }
    }

    fn records(&self, collection: Collection) -> Result<MutexGuard<'_, Vec<Value>>, StorageError> {
        let mutex = match collection {
            Collection::Villages => &self.villages,
            Collection::ReliefCenters => &self.relief_centers,
        };
        mutex.lock().map_err(|_| StorageError::Poisoned)
    }
}

impl RegistryStore for MemoryStore {
    fn load(&self, collection: Collection) -> Result<Vec<Value>, StorageError> {
        Ok(self.records(collection)?.clone())
    }

    fn append(&self, collection: Collection, record: Value) -> Result<(), StorageError> {
        self.records(collection)?.push(record);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_memory_store_append_and_load() {
        let store = MemoryStore::new();
        store.append(Collection::Villages, json!({"name": "Gosaba"})).unwrap();

        assert_eq!(store.load(Collection::Villages).unwrap(), vec![json!({"name": "Gosaba"})]);
        assert!(store.load(Collection::ReliefCenters).unwrap().is_empty());
    }

    #[test]
    fn test_file_store_creates_empty_collections() {
        let tmp = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open(tmp.path().join("data")).unwrap();

        for collection in Collection::ALL {
            assert!(store.path_for(collection).exists());
            assert!(store.load(collection).unwrap().is_empty());
        }
    }

    #[test]
    fn test_file_store_rejects_non_array() {
        let tmp = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open(tmp.path()).unwrap();
        fs::write(store.path_for(Collection::Villages), "{\"name\": \"oops\"}").unwrap();

        assert!(matches!(
            store.load(Collection::Villages),
            Err(StorageError::Malformed(_))
        ));
    }
}
