//! Store implementations: one JSON file per key, and an in-memory map.

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::PathBuf;
use std::rc::Rc;

use serde_json::Value;

use super::Store;
use crate::error::StorageError;

/// File-backed store. Each key maps to `<dir>/<key>.json`, overwritten
/// whole on every save.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Store rooted at the default data directory.
    pub fn open_default() -> Result<Self, std::io::Error> {
        Ok(Self::new(super::data_dir()?))
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl Store for JsonFileStore {
    fn load(&self, key: &str) -> Option<Value> {
        let raw = std::fs::read_to_string(self.path_for(key)).ok()?;
        serde_json::from_str(&raw).ok()
    }

    fn save(&self, key: &str, value: &Value) -> Result<(), StorageError> {
        let path = self.path_for(key);
        let raw = serde_json::to_string_pretty(value).map_err(|e| {
            StorageError::SerializeFailed {
                key: key.to_string(),
                message: e.to_string(),
            }
        })?;
        std::fs::write(&path, raw).map_err(|e| StorageError::WriteFailed {
            key: key.to_string(),
            path,
            message: e.to_string(),
        })
    }
}

/// In-memory store with shared handles. For hosts that persist elsewhere
/// and for tests that want to inspect written snapshots.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore(Rc<RefCell<HashMap<String, Value>>>);

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The last snapshot saved under `key`, if any.
    pub fn snapshot(&self, key: &str) -> Option<Value> {
        self.0.borrow().get(key).cloned()
    }

    /// Pre-populate a key, e.g. to simulate previously persisted state.
    pub fn preload(&self, key: &str, value: Value) {
        self.0.borrow_mut().insert(key.to_string(), value);
    }
}

impl Store for MemoryStore {
    fn load(&self, key: &str) -> Option<Value> {
        self.0.borrow().get(key).cloned()
    }

    fn save(&self, key: &str, value: &Value) -> Result<(), StorageError> {
        self.0.borrow_mut().insert(key.to_string(), value.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn file_store_round_trips_a_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path());

        store
            .save("daily_goals", &json!([{"id": "g-1", "text": "Exercise"}]))
            .unwrap();
        let loaded = store.load("daily_goals").unwrap();
        assert_eq!(loaded[0]["text"], "Exercise");
    }

    #[test]
    fn file_store_missing_key_loads_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path());
        assert!(store.load("penalties").is_none());
    }

    #[test]
    fn file_store_corrupt_json_loads_none() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("counters.json"), "{not json").unwrap();

        let store = JsonFileStore::new(dir.path());
        assert!(store.load("counters").is_none());
    }

    #[test]
    fn memory_store_shares_state_across_handles() {
        let store = MemoryStore::new();
        let handle = store.clone();

        store.save("counters", &json!({"streak": 3})).unwrap();
        assert_eq!(handle.snapshot("counters").unwrap()["streak"], 3);
    }
}
