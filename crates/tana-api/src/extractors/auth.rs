//! `AuthSession` extractor: finds the request's token and resolves it.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use tana_auth::extract_token;
use tana_core::error::AppError;
use tana_entity::session::Session;

use crate::error::ApiError;
use crate::state::AppState;

/// The resolved session of an authenticated request.
///
/// Resolving also slides the session's expiry.
#[derive(Debug, Clone)]
pub struct AuthSession(pub Session);

impl std::ops::Deref for AuthSession {
    type Target = Session;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequestParts<AppState> for AuthSession {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_token(parts)
            .ok_or_else(|| AppError::unauthorized("Missing session token"))?;

        let session = state.sessions.store().resolve(&token).await?;
        Ok(AuthSession(session))
    }
}
