//! Per-request logging, verbosity picked by [`RequestsLoggingLevel`].

use super::super::state::ServerState;
use crate::server::metrics::record_http_request;
use axum::{
    body::Body,
    extract::State,
    http::{header::CONTENT_LENGTH, HeaderMap, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::time::Instant;
use tracing::{error, info};

#[derive(PartialEq, PartialOrd, Clone, Debug, Default, clap::ValueEnum)]
pub enum RequestsLoggingLevel {
    None,
    #[default]
    Path,
    Headers,
    Body,
}

impl std::fmt::Display for RequestsLoggingLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Bodies at least this long are only reported by size.
const BODY_LOG_LIMIT: usize = 1024;

/// Declared body length, or why it can't be used.
fn declared_length(headers: &HeaderMap) -> Result<usize, &'static str> {
    headers
        .get(CONTENT_LENGTH)
        .ok_or("no content-length")?
        .to_str()
        .map_err(|_| "content-length is not text")?
        .parse()
        .map_err(|_| "content-length is not a number")
}

fn dump_headers(direction: &str, headers: &HeaderMap) {
    info!("  {} headers:", direction);
    for (name, value) in headers {
        info!("    {}: {:?}", name, value);
    }
}

/// Logs a body small enough to print and hands back an equivalent one, since
/// reading it consumes the original.
async fn capture_body(
    direction: &str,
    headers: &HeaderMap,
    body: Body,
) -> Result<Body, axum::Error> {
    match declared_length(headers) {
        Err(reason) => {
            info!("  {} body: {}", direction, reason);
            Ok(body)
        }
        Ok(size) if size >= BODY_LOG_LIMIT => {
            info!(
                "  {} body: {:#}, not logged",
                direction,
                byte_unit::Byte::from(size)
            );
            Ok(body)
        }
        Ok(size) => {
            let bytes = axum::body::to_bytes(body, size).await?;
            info!("  {} body:\n{}", direction, String::from_utf8_lossy(&bytes));
            Ok(Body::from(bytes))
        }
    }
}

pub async fn log_requests(
    State(state): State<ServerState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let level = state.config.requests_logging_level.clone();
    let started = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    if level >= RequestsLoggingLevel::Path {
        info!(">>> {} {}", method, request.uri());
    }
    if level >= RequestsLoggingLevel::Headers {
        dump_headers("request", request.headers());
    }

    let request = if level >= RequestsLoggingLevel::Body {
        let (parts, body) = request.into_parts();
        match capture_body("request", &parts.headers, body).await {
            Ok(body) => Request::from_parts(parts, body),
            Err(err) => {
                error!("Could not read request body: {}", err);
                return StatusCode::INTERNAL_SERVER_ERROR.into_response();
            }
        }
    } else {
        request
    };

    let response = next.run(request).await;

    if level >= RequestsLoggingLevel::Headers {
        dump_headers("response", response.headers());
    }

    let response = if level >= RequestsLoggingLevel::Body {
        let (parts, body) = response.into_parts();
        match capture_body("response", &parts.headers, body).await {
            Ok(body) => Response::from_parts(parts, body),
            Err(err) => {
                error!("Could not read response body: {}", err);
                return StatusCode::INTERNAL_SERVER_ERROR.into_response();
            }
        }
    } else {
        response
    };

    let status = response.status().as_u16();
    let elapsed = started.elapsed();
    if level >= RequestsLoggingLevel::Path {
        info!("<<< {} {} {} in {}ms", method, path, status, elapsed.as_millis());
    }
    record_http_request(method.as_str(), &path, status, elapsed);

    response
}
