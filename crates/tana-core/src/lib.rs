//! # tana-core
//!
//! Core crate for the Tana API. Contains the cache provider trait,
//! configuration schemas, the pub/sub event model, and the unified
//! error system.
//!
//! This crate has **no** internal dependencies on other Tana crates.

pub mod config;
pub mod error;
pub mod events;
pub mod result;
pub mod traits;

pub use error::AppError;
pub use result::AppResult;
