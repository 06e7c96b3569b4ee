//! Route definitions for the Tana HTTP API.
//!
//! All routes are mounted under `/api`.

use axum::Router;
use axum::routing::{get, post};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware::build_cors_layer;
use crate::state::AppState;

/// Build the router with every route and layer, bound to `state`.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(auth_routes())
        .route("/events", get(handlers::events::stream_events))
        .route("/health", get(handlers::health::health));

    let cors = build_cors_layer(&state.config.server);

    Router::new()
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::auth::ping))
        .route("/session", get(handlers::auth::session))
        .route("/sign-in", post(handlers::auth::sign_in))
        .route("/sign-up", post(handlers::auth::sign_up))
        .route("/sign-out", post(handlers::auth::sign_out))
}
