//! # tana-api
//!
//! Thin HTTP surface over the session core, built on Axum: ping, session
//! lookup, sign-in/sign-up/sign-out, a server-sent event stream fed by the
//! event hub, and a health probe. Everything is mounted under `/api`.

pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use error::ApiError;
pub use router::build_router;
pub use state::AppState;
