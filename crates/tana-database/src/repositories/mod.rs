//! User store abstraction and its implementations.

pub mod memory;
pub mod user;

use std::fmt::Debug;
use std::sync::Arc;

use async_trait::async_trait;

use tana_core::config::DatabaseConfig;
use tana_core::error::AppError;
use tana_core::result::AppResult;
use tana_entity::user::{NewUser, SessionUser, User, UserCredentials};

use crate::connection::DatabasePool;
use crate::migration::run_migrations;

pub use memory::MemoryUserRepository;
pub use user::UserRepository;

/// Durable user records as seen by the session core.
///
/// Lookups only ever return users whose `deleted_at` is unset.
#[async_trait]
pub trait UserStore: Send + Sync + Debug + 'static {
    /// Public fields of the live user with this email.
    async fn find_session_user(&self, email: &str) -> AppResult<Option<SessionUser>>;

    /// Public fields plus password hash of the live user with this email.
    async fn find_credentials(&self, email: &str) -> AppResult<Option<UserCredentials>>;

    /// Insert a user. Fails with `Conflict` when the email is taken.
    async fn create(&self, user: NewUser) -> AppResult<User>;

    /// Whether the backing store is reachable.
    async fn health_check(&self) -> AppResult<bool>;
}

/// Build the user store selected by `database.driver`.
pub async fn build_user_store(config: &DatabaseConfig) -> AppResult<Arc<dyn UserStore>> {
    match config.driver.as_str() {
        "postgres" => {
            let db = DatabasePool::connect(config).await?;
            if config.run_migrations {
                run_migrations(db.pool()).await?;
            }
            Ok(Arc::new(UserRepository::new(db)))
        }
        "memory" => Ok(Arc::new(MemoryUserRepository::new())),
        other => Err(AppError::configuration(format!(
            "Unknown database driver '{other}'; expected 'postgres' or 'memory'"
        ))),
    }
}
