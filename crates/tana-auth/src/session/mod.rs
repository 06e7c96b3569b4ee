//! Session lifecycle: opaque tokens, cache-backed resolution, and the
//! sign-up/sign-in/sign-out flows that mint and revoke them.

pub mod manager;
pub mod store;
pub mod token;

pub use manager::SessionManager;
pub use store::SessionStore;
pub use token::{extract_token, generate_token};
