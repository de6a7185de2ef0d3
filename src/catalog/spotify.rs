//! Spotify Web API client, authenticated with the client-credentials flow.

use super::{CatalogError, CatalogSearch, Track};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// Tokens are refreshed a little before they actually expire.
const TOKEN_EXPIRY_MARGIN: Duration = Duration::from_secs(30);

struct CachedToken {
    value: String,
    expires_at: Instant,
}

pub struct SpotifyCatalog {
    client: Client,
    accounts_url: String,
    api_url: String,
    client_id: String,
    client_secret: String,
    token: Mutex<Option<CachedToken>>,
}

impl SpotifyCatalog {
    pub fn new(
        accounts_url: impl Into<String>,
        api_url: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, CatalogError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CatalogError::Upstream(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self {
            client,
            accounts_url: accounts_url.into().trim_end_matches('/').to_string(),
            api_url: api_url.into().trim_end_matches('/').to_string(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            token: Mutex::new(None),
        })
    }

    async fn access_token(&self) -> Result<String, CatalogError> {
        let mut cached = self.token.lock().await;
        if let Some(token) = cached.as_ref() {
            if token.expires_at > Instant::now() {
                return Ok(token.value.clone());
            }
        }

        debug!("Requesting new catalog access token");
        let basic = STANDARD.encode(format!("{}:{}", self.client_id, self.client_secret));
        let response = self
            .client
            .post(format!("{}/api/token", self.accounts_url))
            .header("Authorization", format!("Basic {}", basic))
            .header("Content-Type", "application/x-www-form-urlencoded")
            .body("grant_type=client_credentials")
            .send()
            .await
            .map_err(|e| CatalogError::Upstream(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CatalogError::Upstream(format!(
                "Token request failed with status {}: {}",
                status, body
            )));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| CatalogError::InvalidResponse(e.to_string()))?;
        let lifetime = Duration::from_secs(token.expires_in).saturating_sub(TOKEN_EXPIRY_MARGIN);
        *cached = Some(CachedToken {
            value: token.access_token.clone(),
            expires_at: Instant::now() + lifetime,
        });
        Ok(token.access_token)
    }

    async fn invalidate_token(&self) {
        *self.token.lock().await = None;
    }

    async fn search_once(
        &self,
        query: &str,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<Track>, SearchFailure> {
        let token = self.access_token().await?;
        let limit = limit.to_string();
        let offset = offset.to_string();
        let response = self
            .client
            .get(format!("{}/v1/search", self.api_url))
            .bearer_auth(token)
            .query(&[
                ("q", query),
                ("type", "track"),
                ("limit", limit.as_str()),
                ("offset", offset.as_str()),
            ])
            .send()
            .await
            .map_err(|e| CatalogError::Upstream(e.to_string()))?;

        match response.status() {
            StatusCode::UNAUTHORIZED => return Err(SearchFailure::TokenRejected),
            StatusCode::TOO_MANY_REQUESTS => return Err(CatalogError::RateLimited.into()),
            status if !status.is_success() => {
                let body = response.text().await.unwrap_or_default();
                return Err(CatalogError::Upstream(format!(
                    "Search failed with status {}: {}",
                    status, body
                ))
                .into());
            }
            _ => {}
        }

        let body: SearchResponse = response
            .json()
            .await
            .map_err(|e| CatalogError::InvalidResponse(e.to_string()))?;
        Ok(body
            .tracks
            .map(|page| page.items.into_iter().flatten().map(Track::from).collect())
            .unwrap_or_default())
    }
}

enum SearchFailure {
    /// The cached token was revoked before its expiry.
    TokenRejected,
    Failed(CatalogError),
}

impl From<CatalogError> for SearchFailure {
    fn from(err: CatalogError) -> Self {
        SearchFailure::Failed(err)
    }
}

#[async_trait]
impl CatalogSearch for SpotifyCatalog {
    async fn search_tracks(
        &self,
        query: &str,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<Track>, CatalogError> {
        match self.search_once(query, limit, offset).await {
            Ok(tracks) => Ok(tracks),
            Err(SearchFailure::Failed(err)) => Err(err),
            Err(SearchFailure::TokenRejected) => {
                warn!("Catalog rejected the access token, retrying with a fresh one");
                self.invalidate_token().await;
                match self.search_once(query, limit, offset).await {
                    Ok(tracks) => Ok(tracks),
                    Err(SearchFailure::Failed(err)) => Err(err),
                    Err(SearchFailure::TokenRejected) => Err(CatalogError::Upstream(
                        "Access token rejected twice".to_string(),
                    )),
                }
            }
        }
    }
}

// Spotify API types

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: u64,
}

fn default_expires_in() -> u64 {
    3600
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    tracks: Option<TrackPage>,
}

#[derive(Debug, Deserialize)]
struct TrackPage {
    #[serde(default)]
    items: Vec<Option<SpotifyTrack>>,
}

#[derive(Debug, Deserialize)]
struct SpotifyTrack {
    id: String,
    name: String,
    #[serde(default)]
    artists: Vec<SpotifyArtist>,
    album: Option<SpotifyAlbum>,
    preview_url: Option<String>,
    #[serde(default)]
    external_urls: SpotifyExternalUrls,
}

#[derive(Debug, Deserialize)]
struct SpotifyArtist {
    name: String,
}

#[derive(Debug, Deserialize)]
struct SpotifyAlbum {
    #[serde(default)]
    images: Vec<SpotifyImage>,
}

#[derive(Debug, Deserialize)]
struct SpotifyImage {
    url: String,
}

#[derive(Debug, Deserialize, Default)]
struct SpotifyExternalUrls {
    spotify: Option<String>,
}

impl From<SpotifyTrack> for Track {
    fn from(track: SpotifyTrack) -> Self {
        Track {
            id: track.id,
            name: track.name,
            artists: track.artists.into_iter().map(|a| a.name).collect(),
            // Spotify lists the largest image first.
            album_art: track
                .album
                .and_then(|album| album.images.into_iter().next())
                .map(|image| image.url),
            preview_url: track.preview_url,
            external_url: track.external_urls.spotify,
        }
    }
}
