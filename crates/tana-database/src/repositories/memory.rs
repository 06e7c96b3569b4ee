//! In-process user store.
//!
//! Used by the `memory` database driver for local development and by tests.
//! Data is lost on restart.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use tana_core::error::AppError;
use tana_core::result::AppResult;
use tana_entity::user::{NewUser, SessionUser, User, UserCredentials};

use super::UserStore;

#[derive(Debug, Default)]
struct Inner {
    next_id: i64,
    by_email: HashMap<String, User>,
}

/// [`UserStore`] holding users in a map keyed by email.
#[derive(Debug, Clone, Default)]
pub struct MemoryUserRepository {
    inner: Arc<RwLock<Inner>>,
}

impl MemoryUserRepository {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Soft-delete the user with this email. Returns whether a live user
    /// was found.
    pub async fn soft_delete(&self, email: &str) -> bool {
        let mut inner = self.inner.write().await;
        match inner.by_email.get_mut(email) {
            Some(user) if !user.is_deleted() => {
                user.deleted_at = Some(Utc::now());
                true
            }
            _ => false,
        }
    }

    async fn live_user(&self, email: &str) -> Option<User> {
        let inner = self.inner.read().await;
        inner
            .by_email
            .get(email)
            .filter(|u| !u.is_deleted())
            .cloned()
    }
}

#[async_trait]
impl UserStore for MemoryUserRepository {
    async fn find_session_user(&self, email: &str) -> AppResult<Option<SessionUser>> {
        Ok(self.live_user(email).await.map(|u| u.to_session_user()))
    }

    async fn find_credentials(&self, email: &str) -> AppResult<Option<UserCredentials>> {
        Ok(self.live_user(email).await.map(|u| UserCredentials {
            id: u.id,
            name: u.name,
            last_name: u.last_name,
            email: u.email,
            photo_url: u.photo_url,
            phone: u.phone,
            password_hash: u.password_hash,
        }))
    }

    async fn create(&self, user: NewUser) -> AppResult<User> {
        let mut inner = self.inner.write().await;
        // Soft-deleted rows keep their email, matching the table constraint.
        if inner.by_email.contains_key(&user.email) {
            return Err(AppError::conflict(format!("{} already exists", user.email)));
        }

        inner.next_id += 1;
        let record = User {
            id: inner.next_id,
            validation_code: String::new(),
            verified: false,
            name: user.name,
            last_name: user.last_name,
            email: user.email,
            password_hash: user.password_hash,
            photo_url: String::new(),
            phone: user.phone,
            role: "user".to_string(),
            created_at: Utc::now(),
            updated_at: None,
            deleted_at: None,
        };
        inner.by_email.insert(record.email.clone(), record.clone());
        Ok(record)
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }
}
