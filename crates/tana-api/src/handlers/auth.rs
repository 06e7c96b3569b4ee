//! Auth handlers: ping, session, sign-in, sign-up, sign-out.

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;

use tana_auth::{SignInForm, SignUpForm};
use tana_entity::session::Session;

use crate::dto::response::MessageResponse;
use crate::error::ApiError;
use crate::extractors::AuthSession;
use crate::state::AppState;

/// GET /api
pub async fn ping() -> Json<MessageResponse> {
    Json(MessageResponse::new("ok"))
}

/// GET /api/session
pub async fn session(AuthSession(session): AuthSession) -> Json<Session> {
    Json(session)
}

/// POST /api/sign-in
pub async fn sign_in(
    State(state): State<AppState>,
    payload: Result<Json<SignInForm>, JsonRejection>,
) -> Result<Json<Session>, ApiError> {
    let Json(form) = payload?;
    let session = state.sessions.sign_in(form).await?;
    Ok(Json(session))
}

/// POST /api/sign-up
pub async fn sign_up(
    State(state): State<AppState>,
    payload: Result<Json<SignUpForm>, JsonRejection>,
) -> Result<Json<Session>, ApiError> {
    let Json(form) = payload?;
    let session = state.sessions.sign_up(form).await?;
    Ok(Json(session))
}

/// POST /api/sign-out
pub async fn sign_out(
    State(state): State<AppState>,
    auth: AuthSession,
) -> Result<Json<MessageResponse>, ApiError> {
    state.sessions.sign_out(&auth.token).await?;
    Ok(Json(MessageResponse::new("Signed out")))
}
