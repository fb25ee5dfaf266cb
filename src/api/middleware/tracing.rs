//! HTTP request/response tracing middleware.

use axum::body::Body;
use axum::extract::MatchedPath;
use axum::http::Request;
use tower_http::LatencyUnit;
use tower_http::classify::{ServerErrorsAsFailures, SharedClassifier};
use tower_http::trace::{DefaultOnFailure, DefaultOnResponse, TraceLayer};
use tracing::{Level, Span};

type MakeRequestSpan = fn(&Request<Body>) -> Span;

/// Creates the tracing layer used by the application router.
///
/// Every request gets an `INFO` span carrying the method, the raw path and
/// the matched route, so redirects for different codes group under
/// `/{code}`. Responses are logged at `INFO` with latency in milliseconds,
/// 5xx responses additionally at `ERROR`.
///
/// ```text
/// INFO request{method=GET path=/abc123 route=/{code}}: finished processing request latency=1 ms status=307
/// ```
pub fn layer() -> TraceLayer<SharedClassifier<ServerErrorsAsFailures>, MakeRequestSpan> {
    TraceLayer::new_for_http()
        .make_span_with(request_span as MakeRequestSpan)
        .on_response(
            DefaultOnResponse::new()
                .level(Level::INFO)
                .latency_unit(LatencyUnit::Millis),
        )
        .on_failure(
            DefaultOnFailure::new()
                .level(Level::ERROR)
                .latency_unit(LatencyUnit::Millis),
        )
}

fn request_span(request: &Request<Body>) -> Span {
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(MatchedPath::as_str)
        .unwrap_or("-");

    tracing::info_span!(
        "request",
        method = %request.method(),
        path = %request.uri().path(),
        route = route,
    )
}
