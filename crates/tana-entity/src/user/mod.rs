//! User domain entities.

pub mod model;
pub mod projection;

pub use model::{NewUser, User};
pub use projection::{SessionUser, UserCredentials};
