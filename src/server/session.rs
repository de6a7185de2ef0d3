use super::state::ServerState;
use crate::user::AuthTokenValue;

use axum::{
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
    response::IntoResponse,
};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use tracing::{debug, error};

#[derive(Debug)]
pub struct Session {
    pub user_id: usize,
    pub token: String,
}

pub const COOKIE_SESSION_TOKEN_KEY: &str = "session_token";
pub const HEADER_SESSION_TOKEN_KEY: &str = "Authorization";

pub enum SessionExtractionError {
    AccessDenied,
    InternalError,
}

impl IntoResponse for SessionExtractionError {
    fn into_response(self) -> axum::response::Response {
        match self {
            SessionExtractionError::AccessDenied => StatusCode::FORBIDDEN.into_response(),
            SessionExtractionError::InternalError => {
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        }
    }
}

fn extract_session_token_from_cookies(parts: &Parts) -> Option<String> {
    CookieJar::from_headers(&parts.headers)
        .get(COOKIE_SESSION_TOKEN_KEY)
        .map(Cookie::value)
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
}

/// Accepts both `Bearer <token>` and the bare token.
fn extract_session_token_from_headers(parts: &Parts) -> Option<String> {
    let value = parts.headers.get(HEADER_SESSION_TOKEN_KEY)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ").unwrap_or(value).trim();
    (!token.is_empty()).then(|| token.to_string())
}

fn extract_session_from_request_parts(
    parts: &Parts,
    ctx: &ServerState,
) -> Result<Session, SessionExtractionError> {
    let token = match extract_session_token_from_cookies(parts)
        .or_else(|| extract_session_token_from_headers(parts))
    {
        None => {
            debug!("No token in cookies nor headers.");
            return Err(SessionExtractionError::AccessDenied);
        }
        Some(x) => x,
    };

    let user_manager = ctx.user_manager.lock().unwrap();
    match user_manager.resolve_session(&AuthTokenValue(token)) {
        Ok(Some(auth_token)) => {
            debug!("Found auth token for user_id={}", auth_token.user_id);
            Ok(Session {
                user_id: auth_token.user_id,
                token: auth_token.value.0,
            })
        }
        Ok(None) => {
            debug!("Auth token not found in database");
            Err(SessionExtractionError::AccessDenied)
        }
        Err(e) => {
            error!("Failed to resolve session: {}", e);
            Err(SessionExtractionError::InternalError)
        }
    }
}

impl FromRequestParts<ServerState> for Session {
    type Rejection = SessionExtractionError;

    async fn from_request_parts(
        parts: &mut Parts,
        ctx: &ServerState,
    ) -> Result<Self, Self::Rejection> {
        extract_session_from_request_parts(parts, ctx)
    }
}
