//! # tana-database
//!
//! Durable user storage for Tana. The session core only talks to the
//! [`UserStore`] trait; the PostgreSQL [`UserRepository`] and the in-process
//! [`MemoryUserRepository`] are selected by `database.driver`.

pub mod connection;
pub mod migration;
pub mod repositories;

pub use connection::DatabasePool;
pub use repositories::{MemoryUserRepository, UserRepository, UserStore, build_user_store};
