use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub id: String,
    pub name: String,
    pub artists: Vec<String>,
    pub album_art: Option<String>,
    /// Short audio preview, not every track has one.
    pub preview_url: Option<String>,
    /// Link to the track on the catalog's own site.
    pub external_url: Option<String>,
}
