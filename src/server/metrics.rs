use axum::{http::StatusCode, response::IntoResponse};
use lazy_static::lazy_static;
use prometheus::{
    CounterVec, Encoder, Histogram, HistogramOpts, HistogramVec, Opts, Registry, TextEncoder,
};
use std::time::Duration;

/// Metric name prefix for all Moodify metrics
const PREFIX: &str = "moodify";

lazy_static! {
    pub static ref REGISTRY: Registry = Registry::new();

    // HTTP
    pub static ref HTTP_REQUESTS_TOTAL: CounterVec = CounterVec::new(
        Opts::new(format!("{PREFIX}_http_requests_total"), "Total number of HTTP requests"),
        &["method", "path", "status"]
    ).expect("Failed to create http_requests_total metric");

    pub static ref HTTP_REQUEST_DURATION_SECONDS: HistogramVec = HistogramVec::new(
        HistogramOpts::new(
            format!("{PREFIX}_http_request_duration_seconds"),
            "HTTP request duration in seconds"
        )
        .buckets(vec![0.001, 0.01, 0.05, 0.1, 0.5, 1.0, 2.0, 5.0, 10.0]),
        &["method", "path"]
    ).expect("Failed to create http_request_duration_seconds metric");

    // Authentication
    pub static ref AUTH_LOGIN_ATTEMPTS_TOTAL: CounterVec = CounterVec::new(
        Opts::new(format!("{PREFIX}_auth_login_attempts_total"), "Total login attempts"),
        &["status"]
    ).expect("Failed to create auth_login_attempts_total metric");

    pub static ref AUTH_LOGIN_DURATION_SECONDS: Histogram = Histogram::with_opts(
        HistogramOpts::new(
            format!("{PREFIX}_auth_login_duration_seconds"),
            "Login request duration in seconds"
        )
        .buckets(vec![0.1, 0.5, 1.0, 2.0, 5.0, 10.0])
    ).expect("Failed to create auth_login_duration_seconds metric");

    // Mood classification
    pub static ref CLASSIFICATIONS_TOTAL: CounterVec = CounterVec::new(
        Opts::new(
            format!("{PREFIX}_classifications_total"),
            "Mood classifications by outcome"
        ),
        &["outcome"]
    ).expect("Failed to create classifications_total metric");

    // Upstream services
    pub static ref UPSTREAM_ERRORS_TOTAL: CounterVec = CounterVec::new(
        Opts::new(
            format!("{PREFIX}_upstream_errors_total"),
            "Failed calls to external services"
        ),
        &["service", "error_type"]
    ).expect("Failed to create upstream_errors_total metric");
}

/// Registers every metric. Safe to call more than once.
pub fn init_metrics() {
    let _ = REGISTRY.register(Box::new(HTTP_REQUESTS_TOTAL.clone()));
    let _ = REGISTRY.register(Box::new(HTTP_REQUEST_DURATION_SECONDS.clone()));
    let _ = REGISTRY.register(Box::new(AUTH_LOGIN_ATTEMPTS_TOTAL.clone()));
    let _ = REGISTRY.register(Box::new(AUTH_LOGIN_DURATION_SECONDS.clone()));
    let _ = REGISTRY.register(Box::new(CLASSIFICATIONS_TOTAL.clone()));
    let _ = REGISTRY.register(Box::new(UPSTREAM_ERRORS_TOTAL.clone()));

    tracing::info!("Metrics system initialized successfully");
}

pub fn record_http_request(method: &str, path: &str, status: u16, duration: Duration) {
    HTTP_REQUESTS_TOTAL
        .with_label_values(&[method, path, &status.to_string()])
        .inc();

    HTTP_REQUEST_DURATION_SECONDS
        .with_label_values(&[method, path])
        .observe(duration.as_secs_f64());
}

pub fn record_login_attempt(status: &str, duration: Duration) {
    AUTH_LOGIN_ATTEMPTS_TOTAL.with_label_values(&[status]).inc();

    AUTH_LOGIN_DURATION_SECONDS.observe(duration.as_secs_f64());
}

/// `outcome` is one of `parsed`, `fallback` or `unavailable`.
pub fn record_classification(outcome: &str) {
    CLASSIFICATIONS_TOTAL.with_label_values(&[outcome]).inc();
}

pub fn record_upstream_error(service: &str, error_type: &str) {
    UPSTREAM_ERRORS_TOTAL
        .with_label_values(&[service, error_type])
        .inc();
}

/// Handler for the /metrics endpoint
pub async fn metrics_handler() -> impl IntoResponse {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();

    let mut buffer = vec![];
    match encoder.encode(&metric_families, &mut buffer) {
        Ok(()) => {
            let response = String::from_utf8(buffer).unwrap_or_default();
            (StatusCode::OK, response)
        }
        Err(e) => {
            tracing::error!("Failed to encode metrics: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to encode metrics: {}", e),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn has_metric(name: &str) -> bool {
        REGISTRY.gather().iter().any(|m| m.get_name() == name)
    }

    #[test]
    fn test_metrics_initialization() {
        init_metrics();
        init_metrics();

        // Vec metrics only show up once a label set has been used.
        record_login_attempt("success", Duration::from_millis(10));
        assert!(has_metric("moodify_auth_login_attempts_total"));
        assert!(has_metric("moodify_auth_login_duration_seconds"));
    }

    #[test]
    fn test_record_http_request() {
        init_metrics();

        record_http_request("GET", "/v1/mood/history", 200, Duration::from_millis(50));

        assert!(has_metric("moodify_http_requests_total"));
        assert!(has_metric("moodify_http_request_duration_seconds"));
        assert!(
            HTTP_REQUESTS_TOTAL
                .with_label_values(&["GET", "/v1/mood/history", "200"])
                .get()
                >= 1.0
        );
    }

    #[test]
    fn test_record_classification() {
        init_metrics();

        let before = CLASSIFICATIONS_TOTAL.with_label_values(&["fallback"]).get();
        record_classification("fallback");
        let after = CLASSIFICATIONS_TOTAL.with_label_values(&["fallback"]).get();

        assert!(after >= before + 1.0);
        assert!(has_metric("moodify_classifications_total"));
    }

    #[test]
    fn test_record_upstream_error() {
        init_metrics();

        record_upstream_error("catalog", "rate_limited");

        assert!(has_metric("moodify_upstream_errors_total"));
    }

    #[tokio::test]
    async fn test_metrics_handler_renders_text() {
        init_metrics();
        record_classification("parsed");

        let response = metrics_handler().await.into_response();
        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = String::from_utf8(body.to_vec()).unwrap();
        assert!(body.contains("moodify_classifications_total"));
    }
}
