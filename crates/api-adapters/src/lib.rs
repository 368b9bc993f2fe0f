//! # api-adapters
//!
//! The web routing and orchestration layer for settings-gate.
//! Everything except the wire types sits behind the `web-axum` feature.

pub mod dto;

#[cfg(feature = "web-axum")]
pub mod error;
#[cfg(feature = "web-axum")]
pub mod extract;
#[cfg(feature = "web-axum")]
pub mod handlers;
#[cfg(feature = "web-axum")]
pub mod middleware;

#[cfg(feature = "web-axum")]
pub use handlers::AppState;

/// Builds the full router.
///
/// The settings API carries the CORS layer; the time endpoint answers its own
/// preflight with fixed open-origin headers.
#[cfg(feature = "web-axum")]
pub fn router(state: AppState) -> axum::Router {
    use axum::routing::{get, post, put};

    let api = axum::Router::new()
        .route("/preferences/dnd", put(handlers::put_dnd).get(handlers::get_dnd))
        .route("/feedback/eligibility", get(handlers::feedback_eligibility))
        .route("/feedback", post(handlers::submit_feedback))
        .route("/feedback/history", get(handlers::feedback_history))
        .route("/reference/cuisines", get(handlers::list_cuisines))
        .route("/reference/flavor-moods", get(handlers::list_flavor_moods))
        .layer(middleware::cors_policy());

    let time = axum::Router::new().route(
        "/server-time",
        get(handlers::server_time).options(handlers::server_time_preflight),
    );

    api.merge(time)
        .layer(middleware::request_tracing())
        .with_state(state)
}
