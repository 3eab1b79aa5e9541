//! Route definitions for the Neoterik HTTP API.
//!
//! The router receives `AppState` and passes it to all handlers via Axum's
//! `State` extractor.

use axum::{
    Router, middleware as axum_middleware,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
///
/// The CORS layer is only mounted outside production, where the frontend
/// dev server runs on another origin.
pub fn build_router(state: AppState) -> Router {
    let mut router = Router::new()
        .merge(auth_routes())
        .merge(health_routes())
        .layer(TraceLayer::new_for_http())
        .layer(axum_middleware::from_fn(middleware::logging::request_logging));

    if !state.config.is_production() {
        router = router.layer(middleware::cors::build_cors_layer(&state.config.server.cors));
    }

    router.with_state(state)
}

/// Auth endpoints: register, login, session, logout
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(handlers::auth::register))
        .route("/auth/login", post(handlers::auth::login))
        .route("/auth/session", get(handlers::auth::session))
        .route("/auth/logout", post(handlers::auth::logout))
}

/// Health check endpoint (no session required)
fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health_check))
}
