//! Cache-backed session store.
//!
//! A session is the cache entry `prefix + token → email`. It is valid while
//! the entry exists and the email belongs to a live user. Every successful
//! resolution pushes the entry's expiry back to the full TTL.

use std::future::Future;
use std::sync::Arc;

use tracing::{debug, error, warn};

use tana_cache::keys;
use tana_core::config::SessionConfig;
use tana_core::error::AppError;
use tana_core::result::AppResult;
use tana_core::traits::CacheProvider;
use tana_database::UserStore;
use tana_entity::session::Session;
use tana_entity::user::SessionUser;

use super::token::generate_token;

/// Fresh tokens drawn before giving up on a key collision.
const MAX_ISSUE_ATTEMPTS: usize = 3;

const INVALID_SESSION: &str = "Invalid or expired session";

/// Maps tokens to users through the cache, checking the user store on
/// every lookup.
#[derive(Debug, Clone)]
pub struct SessionStore {
    cache: Arc<dyn CacheProvider>,
    users: Arc<dyn UserStore>,
    config: SessionConfig,
}

impl SessionStore {
    /// Create a store over shared cache and user store handles.
    pub fn new(
        cache: Arc<dyn CacheProvider>,
        users: Arc<dyn UserStore>,
        config: SessionConfig,
    ) -> Self {
        Self {
            cache,
            users,
            config,
        }
    }

    /// The user store sessions are checked against.
    pub fn users(&self) -> &Arc<dyn UserStore> {
        &self.users
    }

    /// Resolve a token to its session and slide the entry's expiry.
    pub async fn resolve(&self, token: &str) -> AppResult<Session> {
        if token.is_empty() {
            return Err(AppError::unauthorized(INVALID_SESSION));
        }

        let key = keys::session(&self.config.key_prefix, token);

        let email = self
            .bounded("cache get", self.cache.get(&key))
            .await?
            .filter(|email| !email.is_empty())
            .ok_or_else(|| AppError::unauthorized(INVALID_SESSION))?;

        let user = self
            .bounded("user lookup", self.users.find_session_user(&email))
            .await?
            .ok_or_else(|| {
                debug!("Session refers to a missing or deleted user");
                AppError::unauthorized(INVALID_SESSION)
            })?;

        // Only touch an existing key so a concurrent revoke is not undone.
        let refreshed = self
            .bounded("cache expire", self.cache.expire(&key, self.config.ttl()))
            .await?;
        if !refreshed {
            return Err(AppError::unauthorized(INVALID_SESSION));
        }

        Ok(Session::new(token, user))
    }

    /// Mint a token for `user` and store it with the full TTL.
    pub async fn issue(&self, user: SessionUser) -> AppResult<Session> {
        for _ in 0..MAX_ISSUE_ATTEMPTS {
            let token = generate_token(self.config.token_bytes).map_err(|e| {
                error!(error = %e, "Token generation failed");
                AppError::internal("Internal server error")
            })?;
            let key = keys::session(&self.config.key_prefix, &token);

            let stored = self
                .bounded(
                    "cache set",
                    self.cache.set_nx(&key, &user.email, self.config.ttl()),
                )
                .await?;
            if stored {
                debug!(user_id = user.id, "Session issued");
                return Ok(Session::new(token, user));
            }
            warn!("Session key collision, drawing a new token");
        }

        error!(user_id = user.id, "Could not store a unique session key");
        Err(AppError::internal("Internal server error"))
    }

    /// Delete the session for `token`. Unknown tokens are ignored.
    pub async fn revoke(&self, token: &str) -> AppResult<()> {
        if token.is_empty() {
            return Ok(());
        }
        let key = keys::session(&self.config.key_prefix, token);
        self.bounded("cache delete", self.cache.delete(&key)).await
    }

    /// Run one backing-store call under the configured deadline.
    ///
    /// Timeouts and infrastructure failures become a generic `Internal`
    /// error; the detail is logged here. Other kinds pass through.
    pub(crate) async fn bounded<T, F>(&self, op: &'static str, fut: F) -> AppResult<T>
    where
        F: Future<Output = AppResult<T>>,
    {
        match tokio::time::timeout(self.config.operation_timeout(), fut).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) if e.kind.is_infrastructure() => {
                error!(op, error = %e, "Session backend call failed");
                Err(AppError::internal("Internal server error"))
            }
            Ok(Err(e)) => Err(e),
            Err(_) => {
                error!(
                    op,
                    timeout_ms = self.config.operation_timeout_ms,
                    "Session backend call timed out"
                );
                Err(AppError::internal("Internal server error"))
            }
        }
    }
}
