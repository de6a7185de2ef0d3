use super::responses::error_response;
use super::session::Session;
use super::state::{GuardedCatalog, GuardedSearchHistory, ServerState};
use crate::catalog::{browse_genre, find_genre, GENRES, PAGE_SIZE};

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use tracing::debug;

#[derive(Deserialize)]
struct SearchParams {
    #[serde(default)]
    pub q: String,
}

#[derive(Deserialize)]
struct BrowseParams {
    #[serde(default)]
    pub offset: usize,
}

async fn search(
    session: Session,
    State(catalog): State<GuardedCatalog>,
    State(search_history): State<GuardedSearchHistory>,
    Query(params): Query<SearchParams>,
) -> Response {
    let query = params.q.trim();
    if query.is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "Search query cannot be empty");
    }
    debug!("search() user={} query={}", session.user_id, query);

    match catalog.search_tracks(query, PAGE_SIZE, 0).await {
        Ok(tracks) => {
            search_history.record(session.user_id, query);
            Json(tracks).into_response()
        }
        Err(err) => err.into_response(),
    }
}

async fn get_search_history(
    session: Session,
    State(search_history): State<GuardedSearchHistory>,
) -> Json<Vec<String>> {
    Json(search_history.recent(session.user_id))
}

async fn get_genres(_session: Session) -> Json<&'static [&'static str]> {
    Json(GENRES)
}

async fn get_genre(
    _session: Session,
    State(catalog): State<GuardedCatalog>,
    Path(genre): Path<String>,
    Query(params): Query<BrowseParams>,
) -> Response {
    let Some(genre) = find_genre(&genre) else {
        return error_response(StatusCode::NOT_FOUND, "Unknown genre");
    };
    match browse_genre(catalog.as_ref(), genre, params.offset).await {
        Ok(page) => Json(page).into_response(),
        Err(err) => err.into_response(),
    }
}

pub fn make_catalog_routes(state: ServerState) -> Router {
    Router::new()
        .route("/search", get(search))
        .route("/search/history", get(get_search_history))
        .route("/genres", get(get_genres))
        .route("/genre/{genre}", get(get_genre))
        .with_state(state)
}
