//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! Binds the mock login endpoint and a health probe under one Axum router.
//! Browser clients call the login endpoint cross-origin, so the router
//! reflects the caller's origin and allows credentials.

pub mod auth;

use std::time::Duration;

use axum::Router;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Method, StatusCode};
use axum::routing::{get, post};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

const CORS_MAX_AGE: Duration = Duration::from_secs(86_400);

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::mirror_request())
        .allow_credentials(true)
        .allow_methods([Method::POST, Method::GET, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .max_age(CORS_MAX_AGE)
}

/// API router with CORS and request tracing applied.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/api/login", post(auth::login))
        .route("/healthz", get(healthz))
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
