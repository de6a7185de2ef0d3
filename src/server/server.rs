use anyhow::{Context, Result};
use std::{
    future::IntoFuture,
    sync::{Arc, Mutex},
    time::{Duration, Instant},
};

use axum::{
    extract::State,
    http::{header, HeaderValue, Method},
    middleware,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::Serialize;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tracing::info;

use super::auth_routes::make_auth_routes;
use super::catalog_routes::make_catalog_routes;
use super::mood_routes::make_mood_routes;
use super::{assistant_routes::make_assistant_routes, metrics::metrics_handler};
use super::{log_requests, state::*, ServerConfig};
use crate::assistant::MoodAssistant;
use crate::catalog::{CatalogSearch, SearchHistory};
use crate::mood::MoodService;
use crate::user::UserManager;

#[allow(unused_imports)]
use super::slowdown_request;

#[derive(Serialize)]
struct ServerStats {
    pub uptime: String,
    pub hash: String,
}

fn format_uptime(duration: Duration) -> String {
    let total_seconds = duration.as_secs();

    let days = total_seconds / 86_400;
    let hours = (total_seconds % 86_400) / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    format!("{}d {:02}:{:02}:{:02}", days, hours, minutes, seconds)
}

async fn home(State(state): State<ServerState>) -> impl IntoResponse {
    let stats = ServerStats {
        uptime: format_uptime(state.start_time.elapsed()),
        hash: state.hash.clone(),
    };
    Json(stats)
}

impl ServerState {
    fn new(
        config: ServerConfig,
        user_manager: GuardedUserManager,
        mood_service: MoodService,
        assistant: MoodAssistant,
        catalog: Arc<dyn CatalogSearch>,
    ) -> ServerState {
        ServerState {
            config,
            start_time: Instant::now(),
            hash: env!("CARGO_PKG_VERSION").to_owned(),
            user_manager,
            mood_service: Arc::new(mood_service),
            assistant: Arc::new(assistant),
            catalog,
            search_history: Arc::new(SearchHistory::default()),
        }
    }
}

fn make_cors_layer(client_origin: &str) -> Result<CorsLayer> {
    let origin = HeaderValue::from_str(client_origin)
        .with_context(|| format!("Invalid client origin {}", client_origin))?;
    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true))
}

pub fn make_app(
    config: ServerConfig,
    user_manager: GuardedUserManager,
    mood_service: MoodService,
    assistant: MoodAssistant,
    catalog: Arc<dyn CatalogSearch>,
) -> Result<Router> {
    let state = ServerState::new(
        config.clone(),
        user_manager,
        mood_service,
        assistant,
        catalog,
    );

    let home_router: Router = match config.frontend_dir_path {
        Some(frontend_path) => {
            let static_files_service =
                ServeDir::new(frontend_path).append_index_html_on_directories(true);
            Router::new().fallback_service(static_files_service)
        }
        None => Router::new()
            .route("/", get(home))
            .with_state(state.clone()),
    };

    let mut app: Router = home_router
        .nest("/v1/auth", make_auth_routes(state.clone()))
        .nest("/v1/mood", make_mood_routes(state.clone()))
        .nest("/v1/assistant", make_assistant_routes(state.clone()))
        .nest("/v1/catalog", make_catalog_routes(state.clone()));

    #[cfg(feature = "slowdown")]
    {
        app = app.layer(middleware::from_fn(slowdown_request));
    }
    app = app
        .layer(make_cors_layer(&config.client_origin)?)
        .layer(middleware::from_fn_with_state(state.clone(), log_requests));

    Ok(app)
}

pub fn make_metrics_app() -> Router {
    Router::new().route("/metrics", get(metrics_handler))
}

pub async fn run_server(
    config: ServerConfig,
    metrics_port: u16,
    user_manager: UserManager,
    mood_service: MoodService,
    assistant: MoodAssistant,
    catalog: Arc<dyn CatalogSearch>,
) -> Result<()> {
    let port = config.port;
    let app = make_app(
        config,
        Arc::new(Mutex::new(user_manager)),
        mood_service,
        assistant,
        catalog,
    )?;

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port))
        .await
        .with_context(|| format!("Failed to bind port {}", port))?;
    let metrics_listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", metrics_port))
        .await
        .with_context(|| format!("Failed to bind metrics port {}", metrics_port))?;

    info!("Ready to serve at port {}!", port);
    info!("Metrics available at port {}!", metrics_port);

    tokio::select! {
        result = axum::serve(listener, app).into_future() => result?,
        result = axum::serve(metrics_listener, make_metrics_app()).into_future() => result?,
    }
    Ok(())
}
