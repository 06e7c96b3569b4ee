//! Health check handler.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use tana_core::traits::CacheProvider;
use tana_database::UserStore;

use crate::dto::response::HealthResponse;
use crate::state::AppState;

/// GET /api/health
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let (cache, database) = tokio::join!(state.cache.health_check(), state.users.health_check());
    let cache = cache.unwrap_or(false);
    let database = database.unwrap_or(false);

    let (status, label) = if cache && database {
        (StatusCode::OK, "ok")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "degraded")
    };

    (
        status,
        Json(HealthResponse {
            status: label.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            cache,
            database,
            event_subscribers: state.hub.receiver_count(),
        }),
    )
}
