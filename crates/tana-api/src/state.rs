//! Application state shared across all handlers.

use std::sync::Arc;

use tana_auth::SessionManager;
use tana_core::config::AppConfig;
use tana_core::traits::CacheProvider;
use tana_database::UserStore;
use tana_realtime::EventHub;

/// Shared dependencies handed to every handler via `State<AppState>`.
///
/// All fields are cheap to clone.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// Session cache (Redis or in-memory).
    pub cache: Arc<dyn CacheProvider>,
    /// Durable user store.
    pub users: Arc<dyn UserStore>,
    /// Sign-up/sign-in/sign-out flows and session resolution.
    pub sessions: Arc<SessionManager>,
    /// In-process event fan-out.
    pub hub: EventHub,
}
