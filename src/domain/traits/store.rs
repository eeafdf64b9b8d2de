use crate::application::errors::StorageError;
use crate::domain::entities::PlayerRecords;

/// Durable backing for the player store
pub trait RecordStorage: Send + Sync {
    /// Read every stored record. `Ok(None)` when nothing has been saved yet.
    fn load(&self) -> Result<Option<PlayerRecords>, StorageError>;

    /// Overwrite the stored records wholesale
    fn save(&self, records: &PlayerRecords) -> Result<(), StorageError>;
}
