mod sqlite_store;
mod store;

pub use sqlite_store::SqliteMoodHistoryStore;
pub use store::{MoodHistoryStore, StorageError};
