//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET /health`        - Health check: store, job queue
//! - `GET /popular.json`  - Most clicked links
//! - `GET /broken.json`   - Links whose last check failed
//! - `GET /{token}`       - Redirect, direct-link page or error page
//! - `GET /{token}.json`  - Link info (same route, suffix dispatched in the handler)
//!
//! `HEAD /{token}` is answered with 405 so it never counts as a visit.
//!
//! Static routes take priority over `/{token}`, so `popular.json`,
//! `broken.json` and `health` can never be tokens.
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **CORS** - Any origin may `GET`, so the JSON views are readable from browsers
//! - **Path normalization** - Trailing slash handling

use crate::api::handlers::{
    broken_handler, head_not_allowed, health_handler, popular_handler, redirect_handler,
};
use crate::api::middleware::tracing;
use crate::state::AppState;
use axum::Router;
use axum::http::Method;
use axum::routing::get;
use tower::Layer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Builds the router with all routes, CORS and request tracing.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/popular.json", get(popular_handler))
        .route("/broken.json", get(broken_handler))
        .route("/{token}", get(redirect_handler).head(head_not_allowed))
        .with_state(state)
        .layer(cors_layer())
        .layer(tracing::layer())
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET])
}

/// Wraps [`router`] so `/abc/` resolves like `/abc`.
pub fn app_router(state: AppState) -> NormalizePath<Router> {
    NormalizePathLayer::trim_trailing_slash().layer(router(state))
}
