//! Music catalog search, behind the [`CatalogSearch`] trait.

mod browse;
mod models;
mod search_history;
mod spotify;

pub use browse::{browse_genre, find_genre, BrowseCursor, BrowsePage, BROWSE_CAP, GENRES, PAGE_SIZE};
pub use models::Track;
pub use search_history::SearchHistory;
pub use spotify::SpotifyCatalog;

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Catalog request failed: {0}")]
    Upstream(String),

    #[error("Catalog rate limited")]
    RateLimited,

    #[error("Invalid catalog response: {0}")]
    InvalidResponse(String),
}

#[async_trait]
pub trait CatalogSearch: Send + Sync {
    /// Tracks matching `query`, in the catalog's relevance order.
    async fn search_tracks(
        &self,
        query: &str,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<Track>, CatalogError>;
}

/// Used when no catalog credentials are configured. Every search comes back
/// empty.
pub struct NoOpCatalog;

#[async_trait]
impl CatalogSearch for NoOpCatalog {
    async fn search_tracks(
        &self,
        _query: &str,
        _limit: usize,
        _offset: usize,
    ) -> Result<Vec<Track>, CatalogError> {
        Ok(vec![])
    }
}
