//! Paged genre browsing.

use super::{CatalogError, CatalogSearch, Track};
use serde::Serialize;

pub const GENRES: &[&str] = &[
    "Pop",
    "Rock",
    "Hip Hop",
    "Jazz",
    "Classical",
    "Electronic",
    "Country",
    "Reggae",
    "Blues",
    "r&b",
];

pub const PAGE_SIZE: usize = 20;

/// No genre is browsed past this many tracks.
pub const BROWSE_CAP: usize = 50;

/// Case-insensitive lookup in [`GENRES`], returning the canonical name.
pub fn find_genre(name: &str) -> Option<&'static str> {
    let name = name.trim();
    GENRES.iter().copied().find(|g| g.eq_ignore_ascii_case(name))
}

/// Position in a paged browse. Browsing stops after a short page or once
/// [`BROWSE_CAP`] tracks have been handed out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BrowseCursor {
    offset: usize,
    exhausted: bool,
}

impl BrowseCursor {
    pub fn at(offset: usize) -> Self {
        Self {
            offset,
            exhausted: offset >= BROWSE_CAP,
        }
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Page size for the next request, `None` once browsing is over.
    pub fn next_limit(&self) -> Option<usize> {
        if self.exhausted {
            return None;
        }
        Some(PAGE_SIZE.min(BROWSE_CAP - self.offset))
    }

    pub fn advance(&mut self, requested: usize, returned: usize) {
        self.offset += returned;
        if returned < requested || self.offset >= BROWSE_CAP {
            self.exhausted = true;
        }
    }

    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BrowsePage {
    pub genre: String,
    pub offset: usize,
    pub tracks: Vec<Track>,
    /// Offset to ask for next, absent when there is nothing more to browse.
    pub next_offset: Option<usize>,
}

pub async fn browse_genre(
    catalog: &dyn CatalogSearch,
    genre: &str,
    offset: usize,
) -> Result<BrowsePage, CatalogError> {
    let mut cursor = BrowseCursor::at(offset);
    let tracks = match cursor.next_limit() {
        Some(limit) => {
            let mut tracks = catalog.search_tracks(genre, limit, offset).await?;
            tracks.truncate(limit);
            cursor.advance(limit, tracks.len());
            tracks
        }
        None => vec![],
    };

    Ok(BrowsePage {
        genre: genre.to_string(),
        offset,
        tracks,
        next_offset: (!cursor.is_exhausted()).then(|| cursor.offset()),
    })
}
