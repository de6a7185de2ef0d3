//! Moodify Server Library
//!
//! This library exposes the internal modules for testing and potential reuse.

pub mod assistant;
pub mod catalog;
pub mod config;
pub mod llm;
pub mod mood;
pub mod mood_history;
pub mod server;
pub mod sqlite_persistence;
pub mod user;

// Re-export commonly used types for convenience
pub use catalog::{CatalogSearch, SpotifyCatalog};
pub use llm::{GeminiProvider, LlmProvider};
pub use mood::{MoodClassifier, MoodRecord, MoodService};
pub use mood_history::{MoodHistoryStore, SqliteMoodHistoryStore};
pub use server::{run_server, RequestsLoggingLevel};
pub use user::{SqliteUserStore, UserManager, UserStore};
