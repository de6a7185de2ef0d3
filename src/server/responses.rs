//! JSON error bodies and the mapping from domain errors to HTTP statuses.

use super::metrics::record_upstream_error;
use crate::catalog::CatalogError;
use crate::mood::SubmitError;
use crate::mood_history::StorageError;
use crate::user::AuthError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::error;

pub const GENERIC_FAILURE: &str = "Something went wrong. Please try again.";

#[derive(Serialize)]
struct ErrorBody<'a> {
    message: &'a str,
}

pub fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(ErrorBody { message })).into_response()
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = match &self {
            AuthError::Duplicate | AuthError::Validation(_) => StatusCode::BAD_REQUEST,
            AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AuthError::NotFound => StatusCode::NOT_FOUND,
            AuthError::Storage(err) => {
                error!("User storage failure: {:#}", err);
                return error_response(StatusCode::INTERNAL_SERVER_ERROR, GENERIC_FAILURE);
            }
        };
        error_response(status, &self.to_string())
    }
}

impl IntoResponse for StorageError {
    fn into_response(self) -> Response {
        error!("Mood history storage failure: {}", self);
        error_response(StatusCode::INTERNAL_SERVER_ERROR, GENERIC_FAILURE)
    }
}

impl IntoResponse for CatalogError {
    fn into_response(self) -> Response {
        let error_type = match &self {
            CatalogError::Upstream(_) => "upstream",
            CatalogError::RateLimited => "rate_limited",
            CatalogError::InvalidResponse(_) => "invalid_response",
        };
        record_upstream_error("catalog", error_type);
        error!("Catalog failure: {}", self);
        error_response(StatusCode::BAD_GATEWAY, GENERIC_FAILURE)
    }
}

impl IntoResponse for SubmitError {
    fn into_response(self) -> Response {
        match self {
            SubmitError::EmptyText => error_response(
                StatusCode::BAD_REQUEST,
                "Please describe how you are feeling.",
            ),
            SubmitError::Catalog(err) => err.into_response(),
        }
    }
}
