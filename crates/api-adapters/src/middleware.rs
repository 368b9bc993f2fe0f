//! settings-gate/crates/api-adapters/src/middleware.rs Middleware
//!
//! CORS and request tracing layers.

use std::time::Duration;

use axum::http::{
    header::{self, HeaderName},
    Method,
};
use tower_http::{
    classify::{ServerErrorsAsFailures, SharedClassifier},
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::extract::USER_ID_HEADER;

/// Headers the browser client sends to the time endpoint.
pub const TIME_ALLOWED_HEADERS: &str = "authorization, x-client-info, apikey, content-type";

// CORS for the settings API. The web app and the API live on different origins.
pub fn cors_policy() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static(USER_ID_HEADER),
        ])
        .max_age(Duration::from_secs(60 * 60))
}

/// Open-origin headers attached by hand to every time endpoint response,
/// preflight included.
pub fn open_cors_headers() -> [(HeaderName, &'static str); 2] {
    [
        (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
        (header::ACCESS_CONTROL_ALLOW_HEADERS, TIME_ALLOWED_HEADERS),
    ]
}

// One span per request: method, path, status, latency.
pub fn request_tracing() -> TraceLayer<SharedClassifier<ServerErrorsAsFailures>> {
    TraceLayer::new_for_http()
}
