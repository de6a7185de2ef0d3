use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use std::time::Duration;
use std::{fmt::Debug, path::PathBuf};
use tracing::{info, level_filters::LevelFilter, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use moodify_server::assistant::MoodAssistant;
use moodify_server::catalog::{CatalogSearch, NoOpCatalog, SpotifyCatalog};
use moodify_server::config::{self, AppConfig, FileConfig};
use moodify_server::llm::{GeminiProvider, LlmProvider, NoOpLlmProvider};
use moodify_server::mood::{MoodClassifier, MoodService};
use moodify_server::mood_history::SqliteMoodHistoryStore;
use moodify_server::server::{metrics, run_server, RequestsLoggingLevel, ServerConfig};
use moodify_server::user::{SqliteUserStore, UserManager};

fn parse_path(s: &str) -> Result<PathBuf, String> {
    let path_buf = PathBuf::from(s);
    let original_path = match path_buf.canonicalize() {
        Ok(path) => path,
        Err(msg) => {
            if msg.kind() == std::io::ErrorKind::NotFound {
                path_buf
            } else {
                return Err(format!("Error resolving path '{}': {}", s, msg));
            }
        }
    };
    if original_path.is_absolute() {
        return Ok(original_path);
    }
    let cwd = std::env::current_dir().map_err(|e| format!("Failed to get current dir: {}", e))?;
    Ok(cwd.join(original_path))
}

fn parse_dir(s: &str) -> Result<PathBuf, String> {
    let path = parse_path(s)?;
    if !path.exists() {
        return Err(format!("Directory does not exist: {}", s));
    }
    if !path.is_dir() {
        return Err(format!("Path is not a directory: {}", s));
    }
    Ok(path)
}

#[derive(Parser, Debug)]
struct CliArgs {
    /// Path to TOML configuration file. Values in the file override CLI arguments.
    #[clap(long, value_parser = parse_path)]
    pub config: Option<PathBuf>,

    /// Directory containing database files (user.db, mood.db).
    /// Can also be specified in config file.
    #[clap(long, value_parser = parse_dir)]
    pub db_dir: Option<PathBuf>,

    /// The port to listen on.
    #[clap(short, long, default_value_t = 3001)]
    pub port: u16,

    /// The port for the metrics server (Prometheus scraping).
    #[clap(long, default_value_t = 9091)]
    pub metrics_port: u16,

    /// The level of logging to perform on each request.
    #[clap(long, default_value = "path")]
    pub logging_level: RequestsLoggingLevel,

    /// Path to the frontend directory to be statically served.
    #[clap(long)]
    pub frontend_dir_path: Option<String>,

    /// Origin allowed to call the API from a browser.
    #[clap(long)]
    pub client_origin: Option<String>,

    /// API key of the Gemini text generation service.
    #[clap(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    pub gemini_api_key: Option<String>,

    #[clap(long)]
    pub gemini_model: Option<String>,

    #[clap(long)]
    pub gemini_base_url: Option<String>,

    #[clap(long, env = "SPOTIFY_CLIENT_ID")]
    pub spotify_client_id: Option<String>,

    #[clap(long, env = "SPOTIFY_CLIENT_SECRET", hide_env_values = true)]
    pub spotify_client_secret: Option<String>,
}

/// Convert CLI args to CliConfig for config resolution
impl From<&CliArgs> for config::CliConfig {
    fn from(args: &CliArgs) -> Self {
        config::CliConfig {
            db_dir: args.db_dir.clone(),
            port: args.port,
            metrics_port: args.metrics_port,
            logging_level: args.logging_level.clone(),
            frontend_dir_path: args.frontend_dir_path.clone(),
            client_origin: args.client_origin.clone(),
            gemini_api_key: args.gemini_api_key.clone(),
            gemini_model: args.gemini_model.clone(),
            gemini_base_url: args.gemini_base_url.clone(),
            spotify_client_id: args.spotify_client_id.clone(),
            spotify_client_secret: args.spotify_client_secret.clone(),
        }
    }
}

fn make_llm_provider(app_config: &AppConfig) -> Arc<dyn LlmProvider> {
    let settings = &app_config.classifier;
    match &settings.api_key {
        Some(api_key) => {
            info!("Using Gemini model {}", settings.model);
            Arc::new(GeminiProvider::new(
                settings.base_url.clone(),
                settings.model.clone(),
                api_key.clone(),
            ))
        }
        None => {
            warn!("No Gemini API key configured, every mood will be classified as the default");
            Arc::new(NoOpLlmProvider)
        }
    }
}

fn make_catalog(app_config: &AppConfig) -> Result<Arc<dyn CatalogSearch>> {
    let settings = &app_config.catalog;
    match settings.credentials() {
        Some((client_id, client_secret)) => Ok(Arc::new(SpotifyCatalog::new(
            settings.accounts_url.clone(),
            settings.api_url.clone(),
            client_id,
            client_secret,
            Duration::from_secs(settings.timeout_sec),
        )?)),
        None => {
            warn!("No Spotify credentials configured, song searches will come back empty");
            Ok(Arc::new(NoOpCatalog))
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()?;

    let file_config = match &cli_args.config {
        Some(path) => {
            info!("Loading config from {:?}", path);
            Some(FileConfig::load(path)?)
        }
        None => None,
    };
    let app_config = AppConfig::resolve(&(&cli_args).into(), file_config)?;

    metrics::init_metrics();

    info!("Opening user store at {:?}", app_config.user_db_path());
    let user_store = SqliteUserStore::new(app_config.user_db_path())?;
    let user_manager = UserManager::new(Box::new(user_store));

    info!("Opening mood history at {:?}", app_config.mood_db_path());
    let history = Arc::new(SqliteMoodHistoryStore::new(app_config.mood_db_path())?);

    let provider = make_llm_provider(&app_config);
    let catalog = make_catalog(&app_config)?;
    let timeout = Duration::from_secs(app_config.classifier.timeout_sec);

    let mood_service = MoodService::new(
        MoodClassifier::new(provider.clone(), timeout),
        history,
        catalog.clone(),
    );
    let assistant = MoodAssistant::new(provider, timeout);

    let server_config = ServerConfig {
        requests_logging_level: app_config.logging_level.clone(),
        port: app_config.port,
        frontend_dir_path: app_config.frontend_dir_path.clone(),
        client_origin: app_config.client_origin.clone(),
    };

    tokio::select! {
        result = run_server(
            server_config,
            app_config.metrics_port,
            user_manager,
            mood_service,
            assistant,
            catalog,
        ) => {
            info!("HTTP server stopped: {:?}", result);
            result
        },
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl+C, shutting down");
            Ok(())
        }
    }
}
