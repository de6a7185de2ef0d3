use super::responses::error_response;
use super::session::Session;
use super::state::{GuardedAssistant, ServerState};
use crate::assistant::GREETING;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

#[derive(Deserialize)]
struct ChatBody {
    pub question: String,
}

#[derive(Serialize)]
struct GreetingResponse {
    text: &'static str,
}

async fn greeting(_session: Session) -> Json<GreetingResponse> {
    Json(GreetingResponse { text: GREETING })
}

async fn chat(
    _session: Session,
    State(assistant): State<GuardedAssistant>,
    Json(body): Json<ChatBody>,
) -> Response {
    let question = body.question.trim();
    if question.is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "Question cannot be empty");
    }
    Json(assistant.ask(question).await).into_response()
}

pub fn make_assistant_routes(state: ServerState) -> Router {
    Router::new()
        .route("/chat", get(greeting))
        .route("/chat", post(chat))
        .with_state(state)
}
