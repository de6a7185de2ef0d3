use super::metrics::record_login_attempt;
use super::session::{Session, COOKIE_SESSION_TOKEN_KEY};
use super::state::{GuardedUserManager, ServerState};
use crate::user::{AuthError, AuthToken, AuthTokenValue};

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::cookie::{Cookie, SameSite};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, info};

#[derive(Deserialize)]
struct SignupBody {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
struct LoginBody {
    pub email: String,
    pub password: String,
}

#[derive(Serialize)]
struct TokenResponse {
    token: String,
}

fn session_cookie(value: String) -> Cookie<'static> {
    Cookie::build((COOKIE_SESSION_TOKEN_KEY, value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

fn token_response(status: StatusCode, token: AuthToken) -> Response {
    let cookie = session_cookie(token.value.0.clone());
    (
        status,
        [(header::SET_COOKIE, cookie.to_string())],
        Json(TokenResponse {
            token: token.value.0,
        }),
    )
        .into_response()
}

async fn signup(
    State(user_manager): State<GuardedUserManager>,
    Json(body): Json<SignupBody>,
) -> Response {
    debug!("signup() called for {}", body.email);
    let result = user_manager
        .lock()
        .unwrap()
        .create_account(&body.username, &body.email, &body.password);
    match result {
        Ok(token) => token_response(StatusCode::CREATED, token),
        Err(err) => err.into_response(),
    }
}

async fn login(
    State(user_manager): State<GuardedUserManager>,
    Json(body): Json<LoginBody>,
) -> Response {
    debug!("login() called for {}", body.email);
    let start = Instant::now();
    let result = user_manager
        .lock()
        .unwrap()
        .authenticate(&body.email, &body.password);
    match result {
        Ok(token) => {
            record_login_attempt("success", start.elapsed());
            info!("User {} logged in", token.user_id);
            token_response(StatusCode::OK, token)
        }
        Err(err) => {
            let status = match err {
                AuthError::InvalidCredentials => "failure",
                _ => "error",
            };
            record_login_attempt(status, start.elapsed());
            err.into_response()
        }
    }
}

async fn logout(State(user_manager): State<GuardedUserManager>, session: Session) -> Response {
    let result = user_manager
        .lock()
        .unwrap()
        .logout(&AuthTokenValue(session.token));
    match result {
        Ok(_) => {
            let cookie = Cookie::build((COOKIE_SESSION_TOKEN_KEY, ""))
                .path("/")
                .expires(time::OffsetDateTime::now_utc() - time::Duration::days(1))
                .same_site(SameSite::Lax)
                .build();
            (StatusCode::OK, [(header::SET_COOKIE, cookie.to_string())]).into_response()
        }
        Err(err) => err.into_response(),
    }
}

async fn userinfo(State(user_manager): State<GuardedUserManager>, session: Session) -> Response {
    let result = user_manager.lock().unwrap().get_profile(session.user_id);
    match result {
        Ok(profile) => Json(profile).into_response(),
        Err(err) => err.into_response(),
    }
}

pub fn make_auth_routes(state: ServerState) -> Router {
    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
        .route("/logout", get(logout))
        .route("/userinfo", get(userinfo))
        .with_state(state)
}
