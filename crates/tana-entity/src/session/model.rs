//! Session value object.

use serde::{Deserialize, Serialize};

use crate::user::SessionUser;

/// An authenticated session: an opaque token paired with a snapshot of the
/// user's public fields.
///
/// Sessions are not persisted as rows. They live only as cache entries
/// keyed by the token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Opaque bearer token.
    pub token: String,
    /// Public user fields.
    pub user: SessionUser,
}

impl Session {
    /// Pair a token with a user snapshot.
    pub fn new(token: impl Into<String>, user: SessionUser) -> Self {
        Self {
            token: token.into(),
            user,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_public_fields_only() {
        let session = Session::new(
            "tok",
            SessionUser {
                id: 1,
                name: "A".to_string(),
                last_name: "B".to_string(),
                email: "a@b.com".to_string(),
                photo_url: String::new(),
                phone: "5123456789".to_string(),
            },
        );
        let json = serde_json::to_value(&session).unwrap();
        assert_eq!(json["token"], "tok");
        assert_eq!(json["user"]["email"], "a@b.com");
        assert!(json["user"].get("password").is_none());
    }
}
