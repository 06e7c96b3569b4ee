//! User entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::projection::SessionUser;

/// A registered user.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    /// Unique user identifier.
    pub id: i64,
    /// Pending email verification code.
    pub validation_code: String,
    /// Whether the email address has been verified.
    pub verified: bool,
    /// First name.
    pub name: String,
    /// Last name.
    pub last_name: String,
    /// Unique email address.
    pub email: String,
    /// Argon2 password hash.
    #[serde(skip_serializing)]
    #[sqlx(rename = "password")]
    pub password_hash: String,
    /// Avatar URL.
    pub photo_url: String,
    /// Phone number.
    pub phone: String,
    /// Role name.
    pub role: String,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
    /// When the user was last updated.
    pub updated_at: Option<DateTime<Utc>>,
    /// Soft-delete marker.
    pub deleted_at: Option<DateTime<Utc>>,
}

impl User {
    /// Whether the user has been soft-deleted.
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// Public projection carried by sessions.
    pub fn to_session_user(&self) -> SessionUser {
        SessionUser {
            id: self.id,
            name: self.name.clone(),
            last_name: self.last_name.clone(),
            email: self.email.clone(),
            photo_url: self.photo_url.clone(),
            phone: self.phone.clone(),
        }
    }
}

/// Data required to create a new user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewUser {
    /// First name.
    pub name: String,
    /// Last name.
    pub last_name: String,
    /// Email address.
    pub email: String,
    /// Phone number.
    pub phone: String,
    /// Pre-hashed password.
    #[serde(skip_serializing)]
    pub password_hash: String,
}
