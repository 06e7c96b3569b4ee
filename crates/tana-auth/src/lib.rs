//! # tana-auth
//!
//! Authentication for the Tana API.
//!
//! ## Modules
//!
//! - `credential`: sign-up/sign-in forms, password strength and phone rules
//! - `password`: Argon2id password hashing
//! - `session`: opaque tokens, the cache-backed session store, and the
//!   sign-up/sign-in/sign-out flows

pub mod credential;
pub mod password;
pub mod session;

pub use credential::{FieldErrors, SignInForm, SignUpForm};
pub use password::PasswordHasher;
pub use session::{SessionManager, SessionStore, extract_token};
