//! Player store - Durable id → name records

use std::sync::Arc;

use tracing::{info, warn};

use crate::application::errors::StorageError;
use crate::domain::entities::{Player, PlayerRecord, PlayerRecords};
use crate::domain::traits::RecordStorage;

/// Every player the server has ever seen, backed by a [`RecordStorage`]
pub struct PlayerStore {
    records: PlayerRecords,
    storage: Box<dyn RecordStorage>,
}

impl PlayerStore {
    /// Read the stored records. Missing or unreadable storage yields an
    /// empty store instead of an error.
    pub fn load(storage: Box<dyn RecordStorage>) -> Self {
        let records = match storage.load() {
            Ok(Some(records)) => {
                info!("Loaded {} player records", records.len());
                records
            }
            Ok(None) => PlayerRecords::new(),
            Err(e) => {
                warn!("Failed to load player records, starting empty: {}", e);
                PlayerRecords::new()
            }
        };

        Self { records, storage }
    }

    /// Record `name` for `id` and return a fresh identity object for it
    pub fn merge(&mut self, id: &str, name: &str) -> Arc<Player> {
        let player = Arc::new(Player::new(id, name));
        self.records.insert(id.to_string(), player.to_record());
        player
    }

    /// Write every record to storage
    pub fn save(&self) -> Result<(), StorageError> {
        self.storage.save(&self.records)?;
        info!("Saved {} player records", self.records.len());
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&PlayerRecord> {
        self.records.get(id)
    }

    pub fn records(&self) -> &PlayerRecords {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::storage::MemoryStorage;

    #[test]
    fn test_load_missing_storage_is_empty() {
        let store = PlayerStore::load(Box::new(MemoryStorage::new()));
        assert!(store.is_empty());
    }

    #[test]
    fn test_load_corrupt_storage_is_empty() {
        let storage = MemoryStorage::with_contents("{ not json");
        let store = PlayerStore::load(Box::new(storage));
        assert!(store.is_empty());
    }

    #[test]
    fn test_merge_updates_name_in_place() {
        let mut store = PlayerStore::load(Box::new(MemoryStorage::new()));
        let first = store.merge("42", "Alice");
        let second = store.merge("42", "Bob");

        assert_eq!(store.len(), 1);
        assert_eq!(store.get("42").unwrap().name, "Bob");
        assert_eq!(first.name(), "Alice");
        assert_eq!(second.name(), "Bob");
        assert!(!Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_save_then_reload() {
        let storage = MemoryStorage::new();
        let mut store = PlayerStore::load(Box::new(storage.clone()));
        store.merge("1", "Zoë");
        store.merge("2", "Бармалей");
        store.save().unwrap();

        let reloaded = PlayerStore::load(Box::new(storage));
        assert_eq!(reloaded.records(), store.records());
        assert_eq!(reloaded.get("1").unwrap().name, "Zoë");
    }

    #[test]
    fn test_save_is_stable() {
        let storage = MemoryStorage::new();
        let mut store = PlayerStore::load(Box::new(storage.clone()));
        store.merge("b", "Bea");
        store.merge("a", "Al");
        store.save().unwrap();
        let first = storage.contents().unwrap();

        PlayerStore::load(Box::new(storage.clone())).save().unwrap();
        PlayerStore::load(Box::new(storage.clone())).save().unwrap();
        assert_eq!(storage.contents().unwrap(), first);
    }
}
