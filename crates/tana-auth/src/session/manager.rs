//! Sign-up, sign-in, and sign-out flows.

use serde_json::json;
use tracing::{error, info};

use tana_core::error::{AppError, ErrorKind};
use tana_core::result::AppResult;
use tana_database::UserStore;
use tana_entity::session::Session;
use tana_entity::user::NewUser;

use crate::credential::{FieldErrors, SignInForm, SignUpForm, validate_sign_up};
use crate::password::PasswordHasher;

use super::store::SessionStore;

const BAD_CREDENTIALS: &str = "Invalid email or password";

/// Drives the credential flows that create and end sessions.
#[derive(Debug, Clone)]
pub struct SessionManager {
    store: SessionStore,
    hasher: PasswordHasher,
}

impl SessionManager {
    /// Create a manager issuing sessions through `store`.
    pub fn new(store: SessionStore) -> Self {
        Self {
            store,
            hasher: PasswordHasher::new(),
        }
    }

    /// The session store backing this manager.
    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// Register a new user and open a session for them.
    ///
    /// Fails with `Validation` (field map in `details`) when the form is
    /// rejected and with `Conflict` when the email is already registered.
    pub async fn sign_up(&self, form: SignUpForm) -> AppResult<Session> {
        validate_sign_up(&form).map_err(validation_error)?;

        let password_hash = self.hasher.hash_password(&form.password)?;
        let email = form.email.clone();

        let created = self
            .store
            .bounded(
                "user insert",
                self.store.users().create(NewUser {
                    name: form.name,
                    last_name: form.last_name,
                    email: form.email,
                    phone: form.phone,
                    password_hash,
                }),
            )
            .await
            .map_err(|e| match e.kind {
                ErrorKind::Conflict => {
                    let message = format!("{email} already exists");
                    AppError::conflict(message.clone()).with_details(json!({ "email": message }))
                }
                _ => e,
            })?;

        info!(user_id = created.id, "User signed up");
        self.store.issue(created.to_session_user()).await
    }

    /// Check credentials and open a session.
    ///
    /// Unknown emails, deleted users, and wrong passwords are all reported
    /// as the same `Unauthorized` error.
    pub async fn sign_in(&self, form: SignInForm) -> AppResult<Session> {
        let missing = form.missing_fields();
        if !missing.is_empty() {
            return Err(validation_error(missing));
        }

        let credentials = self
            .store
            .bounded(
                "credential lookup",
                self.store.users().find_credentials(&form.email),
            )
            .await?
            .ok_or_else(|| AppError::unauthorized(BAD_CREDENTIALS))?;

        if !self
            .hasher
            .verify_password(&form.password, &credentials.password_hash)
        {
            return Err(AppError::unauthorized(BAD_CREDENTIALS));
        }

        let user = credentials.into_session_user();
        info!(user_id = user.id, "User signed in");
        self.store.issue(user).await
    }

    /// End the session identified by `token`.
    pub async fn sign_out(&self, token: &str) -> AppResult<()> {
        self.store.revoke(token).await.inspect_err(|e| {
            error!(error = %e, "Sign-out failed");
        })
    }
}

fn validation_error(fields: FieldErrors) -> AppError {
    AppError::validation("Validation failed").with_details(json!(fields))
}
