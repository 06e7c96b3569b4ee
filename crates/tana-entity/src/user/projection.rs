//! Column projections of the `users` table used by the session core.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Column list of [`SessionUser`], in `SELECT` order.
pub const SESSION_FIELDS: &str = "id, name, last_name, email, photo_url, phone";

/// Public user fields carried by a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct SessionUser {
    /// User identifier.
    pub id: i64,
    /// First name.
    pub name: String,
    /// Last name.
    pub last_name: String,
    /// Email address.
    pub email: String,
    /// Avatar URL.
    pub photo_url: String,
    /// Phone number.
    pub phone: String,
}

/// Public fields plus the password hash, read only during sign-in.
#[derive(Debug, Clone, FromRow)]
pub struct UserCredentials {
    /// User identifier.
    pub id: i64,
    /// First name.
    pub name: String,
    /// Last name.
    pub last_name: String,
    /// Email address.
    pub email: String,
    /// Avatar URL.
    pub photo_url: String,
    /// Phone number.
    pub phone: String,
    /// Argon2 password hash.
    #[sqlx(rename = "password")]
    pub password_hash: String,
}

impl UserCredentials {
    /// Drop the password hash, keeping only the public fields.
    pub fn into_session_user(self) -> SessionUser {
        SessionUser {
            id: self.id,
            name: self.name,
            last_name: self.last_name,
            email: self.email,
            photo_url: self.photo_url,
            phone: self.phone,
        }
    }
}
