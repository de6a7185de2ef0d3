//! Test server lifecycle management
//!
//! Each test gets an isolated server with its own databases, a fake text
//! generation model and a fake music catalog.

use super::constants::*;
use super::fakes::{FakeCatalog, FakeLlm};
use moodify_server::assistant::MoodAssistant;
use moodify_server::catalog::CatalogSearch;
use moodify_server::llm::LlmProvider;
use moodify_server::mood::{MoodClassifier, MoodService};
use moodify_server::mood_history::SqliteMoodHistoryStore;
use moodify_server::server::{server::make_app, RequestsLoggingLevel, ServerConfig};
use moodify_server::user::{SqliteUserStore, UserManager};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;
use tokio::net::TcpListener;

/// Test server instance with isolated databases
///
/// When dropped, the server gracefully shuts down and temp resources are cleaned up.
pub struct TestServer {
    /// Base URL for making requests (e.g., "http://127.0.0.1:12345")
    pub base_url: String,

    /// The port the server is listening on
    pub port: u16,

    /// The model behind classification and the assistant
    pub llm: Arc<FakeLlm>,

    /// The catalog behind recommendations, search and browsing
    pub catalog: Arc<FakeCatalog>,

    // Private fields - keep resources alive until drop
    _temp_db_dir: TempDir,
    _shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
}

impl TestServer {
    /// Spawns a new test server on a random port, with the test user already
    /// registered.
    ///
    /// # Panics
    ///
    /// Panics if the databases cannot be created, the port cannot be bound
    /// or the server doesn't become ready within timeout.
    pub async fn spawn() -> Self {
        let temp_db_dir = TempDir::new().expect("Failed to create temp dir");

        let user_store = SqliteUserStore::new(temp_db_dir.path().join("user.db"))
            .expect("Failed to open user store");
        let user_manager = UserManager::new(Box::new(user_store));
        user_manager
            .create_account(TEST_USERNAME, TEST_EMAIL, TEST_PASS)
            .expect("Failed to create test user");

        let history = SqliteMoodHistoryStore::new(temp_db_dir.path().join("mood.db"))
            .expect("Failed to open mood history store");

        let llm = Arc::new(FakeLlm::new(HAPPY_ENGLISH_REPLY));
        let catalog = Arc::new(FakeCatalog::default());
        let provider: Arc<dyn LlmProvider> = llm.clone();
        let catalog_search: Arc<dyn CatalogSearch> = catalog.clone();
        let timeout = Duration::from_secs(2);

        // Bind to random port
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");

        let port = listener
            .local_addr()
            .expect("Failed to get local address")
            .port();

        let base_url = format!("http://127.0.0.1:{}", port);

        // Create shutdown channel
        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();

        let config = ServerConfig {
            port,
            requests_logging_level: RequestsLoggingLevel::None,
            frontend_dir_path: None,
            client_origin: "http://localhost:5173".to_string(),
        };

        let app = make_app(
            config,
            Arc::new(Mutex::new(user_manager)),
            MoodService::new(
                MoodClassifier::new(provider.clone(), timeout),
                Arc::new(history),
                catalog_search.clone(),
            ),
            MoodAssistant::new(provider, timeout),
            catalog_search,
        )
        .expect("Failed to build app");

        // Spawn server in background task with graceful shutdown
        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .expect("Server failed");
        });

        let server = Self {
            base_url,
            port,
            llm,
            catalog,
            _temp_db_dir: temp_db_dir,
            _shutdown_tx: Some(shutdown_tx),
        };

        server.wait_for_ready().await;

        server
    }

    /// Waits for the server to become ready by polling the home endpoint
    async fn wait_for_ready(&self) {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(100))
            .build()
            .expect("Failed to build reqwest client");

        let start = std::time::Instant::now();
        let timeout = Duration::from_millis(SERVER_READY_TIMEOUT_MS);

        loop {
            if start.elapsed() > timeout {
                panic!(
                    "Server did not become ready within {}ms",
                    SERVER_READY_TIMEOUT_MS
                );
            }

            match client.get(format!("{}/", self.base_url)).send().await {
                Ok(response) if response.status().is_success() => return,
                _ => {
                    tokio::time::sleep(Duration::from_millis(SERVER_READY_POLL_INTERVAL_MS)).await;
                }
            }
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self._shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}
