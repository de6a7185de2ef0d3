//! Random slowdown middleware, for trying the frontend against a slow backend
#![allow(dead_code)] // Feature-gated middleware

use axum::body::Body;
use axum::extract::Request;
use axum::middleware::Next;
use axum::response::IntoResponse;
use rand_distr::{Distribution, Normal};
use std::time::Duration;

/// Delays the request by a gaussian amount of time, mean 1 second and
/// standard deviation 2 seconds, clamped at zero.
pub async fn slowdown_request(request: Request<Body>, next: Next) -> impl IntoResponse {
    if let Ok(normal) = Normal::new(1000.0, 2000.0) {
        let millis = 0.0f64.max(normal.sample(&mut rand::rng()));
        tokio::time::sleep(Duration::from_millis(millis as u64)).await;
    }
    next.run(request).await
}
