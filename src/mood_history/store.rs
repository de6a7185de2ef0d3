use crate::mood::MoodRecord;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Stored history could not be decoded: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Per-user, insertion-ordered sequence of mood records.
///
/// Every mutation rewrites the user's whole history. There is no protection
/// against concurrent writers for the same user: the last write wins.
pub trait MoodHistoryStore: Send + Sync {
    /// A user without history gets an empty sequence, not an error.
    fn load(&self, user_id: usize) -> Result<Vec<MoodRecord>, StorageError>;

    /// Creates the history as `[record]` if the user has none yet.
    fn append(&self, user_id: usize, record: MoodRecord) -> Result<(), StorageError>;

    /// Removes the record at `index` (insertion order). Returns false, and
    /// writes nothing, when `index` is out of range.
    fn delete_at(&self, user_id: usize, index: usize) -> Result<bool, StorageError>;

    fn clear(&self, user_id: usize) -> Result<(), StorageError>;
}
