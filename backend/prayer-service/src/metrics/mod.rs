//! Prometheus metrics for the prayer service.
//!
//! Collectors register with the default registry on first use; `/metrics`
//! renders them in the text exposition format.

use actix_web::HttpResponse;
use lazy_static::lazy_static;
use prometheus::{
    register_histogram, register_histogram_vec, register_int_counter_vec, Encoder, Histogram,
    HistogramVec, IntCounterVec, TextEncoder,
};

lazy_static! {
    /// HTTP requests by method, route pattern and status.
    pub static ref HTTP_REQUESTS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "praynet_http_requests_total",
        "Total HTTP requests segmented by method, route and status",
        &["method", "route", "status"]
    )
    .expect("failed to register praynet_http_requests_total");

    pub static ref HTTP_REQUEST_DURATION_SECONDS: HistogramVec = register_histogram_vec!(
        "praynet_http_request_duration_seconds",
        "HTTP request duration segmented by method and route",
        &["method", "route"]
    )
    .expect("failed to register praynet_http_request_duration_seconds");

    /// Daily verse cache events (hit/miss/fetch_error).
    pub static ref DAILY_VERSE_CACHE_EVENTS: IntCounterVec = register_int_counter_vec!(
        "praynet_daily_verse_cache_events_total",
        "Daily verse cache events segmented by outcome",
        &["event"]
    )
    .expect("failed to register praynet_daily_verse_cache_events_total");

    pub static ref TRENDING_QUERY_DURATION_SECONDS: Histogram = register_histogram!(
        "praynet_trending_query_duration_seconds",
        "Time spent assembling the trending prayer requests list"
    )
    .expect("failed to register praynet_trending_query_duration_seconds");
}

/// Actix handler that renders Prometheus metrics in text format.
pub async fn serve_metrics() -> HttpResponse {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();

    let mut buffer = Vec::new();
    if let Err(err) = encoder.encode(&metric_families, &mut buffer) {
        return HttpResponse::InternalServerError().body(err.to_string());
    }

    HttpResponse::Ok()
        .content_type(encoder.format_type())
        .body(buffer)
}
