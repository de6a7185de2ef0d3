mod file_config;

pub use file_config::{CatalogFileConfig, ClassifierFileConfig, FileConfig};

use crate::server::RequestsLoggingLevel;
use anyhow::{bail, Result};
use clap::ValueEnum;
use std::path::PathBuf;

pub const DEFAULT_CLIENT_ORIGIN: &str = "http://localhost:5173";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_SPOTIFY_ACCOUNTS_URL: &str = "https://accounts.spotify.com";
pub const DEFAULT_SPOTIFY_API_URL: &str = "https://api.spotify.com";
const DEFAULT_UPSTREAM_TIMEOUT_SEC: u64 = 30;

/// CLI arguments that can be used for config resolution.
/// This struct mirrors the CLI arguments that can be overridden by TOML config.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub db_dir: Option<PathBuf>,
    pub port: u16,
    pub metrics_port: u16,
    pub logging_level: RequestsLoggingLevel,
    pub frontend_dir_path: Option<String>,
    pub client_origin: Option<String>,
    pub gemini_api_key: Option<String>,
    pub gemini_model: Option<String>,
    pub gemini_base_url: Option<String>,
    pub spotify_client_id: Option<String>,
    pub spotify_client_secret: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub db_dir: PathBuf,
    pub port: u16,
    pub metrics_port: u16,
    pub logging_level: RequestsLoggingLevel,
    pub frontend_dir_path: Option<String>,
    pub client_origin: String,

    pub classifier: ClassifierSettings,
    pub catalog: CatalogSettings,
}

#[derive(Debug, Clone)]
pub struct ClassifierSettings {
    pub base_url: String,
    pub model: String,
    /// Without a key the classifier is disabled and every submission gets
    /// the fallback mood record.
    pub api_key: Option<String>,
    pub timeout_sec: u64,
}

impl Default for ClassifierSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            model: DEFAULT_GEMINI_MODEL.to_string(),
            api_key: None,
            timeout_sec: DEFAULT_UPSTREAM_TIMEOUT_SEC,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CatalogSettings {
    pub accounts_url: String,
    pub api_url: String,
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub timeout_sec: u64,
}

impl CatalogSettings {
    /// Both halves of the client credentials are needed to talk to the catalog.
    pub fn credentials(&self) -> Option<(String, String)> {
        match (&self.client_id, &self.client_secret) {
            (Some(id), Some(secret)) if !id.is_empty() && !secret.is_empty() => {
                Some((id.clone(), secret.clone()))
            }
            _ => None,
        }
    }
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            accounts_url: DEFAULT_SPOTIFY_ACCOUNTS_URL.to_string(),
            api_url: DEFAULT_SPOTIFY_API_URL.to_string(),
            client_id: None,
            client_secret: None,
            timeout_sec: DEFAULT_UPSTREAM_TIMEOUT_SEC,
        }
    }
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and optional TOML file config.
    /// TOML values override CLI values where present.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        let db_dir = file
            .db_dir
            .map(PathBuf::from)
            .or_else(|| cli.db_dir.clone())
            .ok_or_else(|| {
                anyhow::anyhow!("db_dir must be specified via --db-dir or in config file")
            })?;

        if !db_dir.exists() {
            bail!("Database directory does not exist: {:?}", db_dir);
        }
        if !db_dir.is_dir() {
            bail!("db_dir is not a directory: {:?}", db_dir);
        }

        let port = file.port.unwrap_or(cli.port);
        let metrics_port = file.metrics_port.unwrap_or(cli.metrics_port);
        if port != 0 && port == metrics_port {
            bail!("port and metrics_port must differ, both are {}", port);
        }

        let logging_level = file
            .logging_level
            .and_then(|s| parse_logging_level(&s))
            .unwrap_or_else(|| cli.logging_level.clone());

        let frontend_dir_path = file
            .frontend_dir_path
            .or_else(|| cli.frontend_dir_path.clone());

        let client_origin = file
            .client_origin
            .or_else(|| cli.client_origin.clone())
            .unwrap_or_else(|| DEFAULT_CLIENT_ORIGIN.to_string());

        let classifier_file = file.classifier.unwrap_or_default();
        let defaults = ClassifierSettings::default();
        let classifier = ClassifierSettings {
            base_url: classifier_file
                .base_url
                .or_else(|| cli.gemini_base_url.clone())
                .unwrap_or(defaults.base_url),
            model: classifier_file
                .model
                .or_else(|| cli.gemini_model.clone())
                .unwrap_or(defaults.model),
            api_key: classifier_file
                .api_key
                .or_else(|| cli.gemini_api_key.clone())
                .filter(|k| !k.is_empty()),
            timeout_sec: classifier_file.timeout_sec.unwrap_or(defaults.timeout_sec),
        };

        let catalog_file = file.catalog.unwrap_or_default();
        let defaults = CatalogSettings::default();
        let catalog = CatalogSettings {
            accounts_url: catalog_file.accounts_url.unwrap_or(defaults.accounts_url),
            api_url: catalog_file.api_url.unwrap_or(defaults.api_url),
            client_id: catalog_file
                .client_id
                .or_else(|| cli.spotify_client_id.clone()),
            client_secret: catalog_file
                .client_secret
                .or_else(|| cli.spotify_client_secret.clone()),
            timeout_sec: catalog_file.timeout_sec.unwrap_or(defaults.timeout_sec),
        };

        Ok(Self {
            db_dir,
            port,
            metrics_port,
            logging_level,
            frontend_dir_path,
            client_origin,
            classifier,
            catalog,
        })
    }

    pub fn user_db_path(&self) -> PathBuf {
        self.db_dir.join("user.db")
    }

    pub fn mood_db_path(&self) -> PathBuf {
        self.db_dir.join("mood.db")
    }
}

/// Parses a logging level string into RequestsLoggingLevel.
/// Uses clap's ValueEnum trait for parsing.
fn parse_logging_level(s: &str) -> Option<RequestsLoggingLevel> {
    RequestsLoggingLevel::from_str(s, true).ok()
}
