//! File-based storage implementation

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::application::errors::StorageError;
use crate::domain::entities::PlayerRecords;
use crate::domain::traits::RecordStorage;

/// JSON file store for player records
pub struct JsonStore {
    path: PathBuf,
}

impl JsonStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RecordStorage for JsonStore {
    fn load(&self) -> Result<Option<PlayerRecords>, StorageError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&self.path)?;
        Ok(Some(serde_json::from_str(&content)?))
    }

    fn save(&self, records: &PlayerRecords) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        // Write next to the target and rename so a crash never leaves half a file
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, serde_json::to_string_pretty(records)?)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

/// In-memory store; clones share the same contents
#[derive(Clone, Default)]
pub struct MemoryStorage {
    contents: Arc<Mutex<Option<String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with raw serialized contents, valid or not
    pub fn with_contents(contents: impl Into<String>) -> Self {
        Self {
            contents: Arc::new(Mutex::new(Some(contents.into()))),
        }
    }

    /// Raw serialized contents, if anything was saved
    pub fn contents(&self) -> Option<String> {
        self.contents.lock().ok().and_then(|c| c.clone())
    }
}

impl RecordStorage for MemoryStorage {
    fn load(&self) -> Result<Option<PlayerRecords>, StorageError> {
        let contents = self
            .contents
            .lock()
            .map_err(|_| StorageError::Unavailable("Lock poisoned".to_string()))?;

        match contents.as_deref() {
            Some(raw) => Ok(Some(serde_json::from_str(raw)?)),
            None => Ok(None),
        }
    }

    fn save(&self, records: &PlayerRecords) -> Result<(), StorageError> {
        let serialized = serde_json::to_string_pretty(records)?;
        let mut contents = self
            .contents
            .lock()
            .map_err(|_| StorageError::Unavailable("Lock poisoned".to_string()))?;
        *contents = Some(serialized);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::PlayerRecord;

    fn sample() -> PlayerRecords {
        let mut records = PlayerRecords::new();
        for (id, name) in [("76561198000000001", "Ærwyn"), ("2", "\"Quoted\" Name")] {
            records.insert(
                id.to_string(),
                PlayerRecord {
                    id: id.to_string(),
                    name: name.to_string(),
                },
            );
        }
        records
    }

    #[test]
    fn test_json_store_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::new(dir.path().join("players.json"));
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_json_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::new(dir.path().join("data").join("players.json"));

        store.save(&sample()).unwrap();
        assert_eq!(store.load().unwrap(), Some(sample()));
        assert!(!dir.path().join("data").join("players.json.tmp").exists());
    }

    #[test]
    fn test_json_store_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("players.json");
        std::fs::write(&path, "[1, 2").unwrap();

        let err = JsonStore::new(path).load().unwrap_err();
        assert!(matches!(err, StorageError::Serialization(_)));
    }

    #[test]
    fn test_memory_storage_shared_between_clones() {
        let storage = MemoryStorage::new();
        storage.clone().save(&sample()).unwrap();
        assert_eq!(storage.load().unwrap(), Some(sample()));
    }
}
