use super::metrics::record_classification;
use super::responses::error_response;
use super::session::Session;
use super::state::{GuardedAssistant, GuardedMoodService, ServerState};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use serde::Deserialize;

#[derive(Deserialize)]
struct FeelingsBody {
    pub text: String,
}

async fn submit_feelings(
    session: Session,
    State(mood_service): State<GuardedMoodService>,
    Json(body): Json<FeelingsBody>,
) -> Response {
    match mood_service
        .submit_feelings(session.user_id, &body.text)
        .await
    {
        Ok(submission) => {
            record_classification(submission.outcome.as_str());
            Json(submission).into_response()
        }
        Err(err) => err.into_response(),
    }
}

async fn get_history(session: Session, State(mood_service): State<GuardedMoodService>) -> Response {
    match mood_service.history(session.user_id) {
        Ok(history) => Json(history).into_response(),
        Err(err) => err.into_response(),
    }
}

async fn clear_history(
    session: Session,
    State(mood_service): State<GuardedMoodService>,
) -> Response {
    match mood_service.clear_history(session.user_id) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => err.into_response(),
    }
}

async fn delete_history_entry(
    session: Session,
    State(mood_service): State<GuardedMoodService>,
    Path(index): Path<usize>,
) -> Response {
    match mood_service.delete_entry(session.user_id, index) {
        Ok(true) => StatusCode::NO_CONTENT.into_response(),
        Ok(false) => error_response(StatusCode::NOT_FOUND, "History entry not found"),
        Err(err) => err.into_response(),
    }
}

async fn get_insights(session: Session, State(mood_service): State<GuardedMoodService>) -> Response {
    match mood_service.insights(session.user_id) {
        Ok(insights) => Json(insights).into_response(),
        Err(err) => err.into_response(),
    }
}

/// Responds with `null` while the user has no history.
async fn get_solution(
    session: Session,
    State(mood_service): State<GuardedMoodService>,
    State(assistant): State<GuardedAssistant>,
) -> Response {
    let snapshot = match mood_service.snapshot(session.user_id) {
        Ok(snapshot) => snapshot,
        Err(err) => return err.into_response(),
    };
    Json(assistant.suggest_solution(&snapshot).await).into_response()
}

pub fn make_mood_routes(state: ServerState) -> Router {
    Router::new()
        .route("/", post(submit_feelings))
        .route("/history", get(get_history))
        .route("/history", delete(clear_history))
        .route("/history/{index}", delete(delete_history_entry))
        .route("/insights", get(get_insights))
        .route("/solution", get(get_solution))
        .with_state(state)
}
