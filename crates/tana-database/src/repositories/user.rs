//! PostgreSQL user repository.

use async_trait::async_trait;

use tana_core::error::{AppError, ErrorKind};
use tana_core::result::AppResult;
use tana_entity::user::projection::SESSION_FIELDS;
use tana_entity::user::{NewUser, SessionUser, User, UserCredentials};

use super::UserStore;
use crate::connection::DatabasePool;

/// Unique constraint guarding `users.email`.
const EMAIL_CONSTRAINT: &str = "users_email_key";

/// [`UserStore`] backed by the `users` table.
#[derive(Debug, Clone)]
pub struct UserRepository {
    db: DatabasePool,
}

impl UserRepository {
    /// Create a repository over an open pool.
    pub fn new(db: DatabasePool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserStore for UserRepository {
    async fn find_session_user(&self, email: &str) -> AppResult<Option<SessionUser>> {
        let sql = format!(
            "SELECT {SESSION_FIELDS} FROM users WHERE email = $1 AND deleted_at IS NULL LIMIT 1"
        );
        sqlx::query_as::<_, SessionUser>(&sql)
            .bind(email)
            .fetch_optional(self.db.pool())
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to load session user", e))
    }

    async fn find_credentials(&self, email: &str) -> AppResult<Option<UserCredentials>> {
        let sql = format!(
            "SELECT {SESSION_FIELDS}, password FROM users \
             WHERE email = $1 AND deleted_at IS NULL LIMIT 1"
        );
        sqlx::query_as::<_, UserCredentials>(&sql)
            .bind(email)
            .fetch_optional(self.db.pool())
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to load credentials", e))
    }

    async fn create(&self, user: NewUser) -> AppResult<User> {
        sqlx::query_as::<_, User>(
            "INSERT INTO users (name, last_name, email, password, phone) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING *",
        )
        .bind(&user.name)
        .bind(&user.last_name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.phone)
        .fetch_one(self.db.pool())
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.constraint() == Some(EMAIL_CONSTRAINT) => {
                AppError::conflict(format!("{} already exists", user.email))
            }
            other => AppError::with_source(ErrorKind::Database, "Failed to create user", other),
        })
    }

    async fn health_check(&self) -> AppResult<bool> {
        self.db.health_check().await
    }
}
