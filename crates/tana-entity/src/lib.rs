//! # tana-entity
//!
//! Domain entity models for the Tana API. `User` mirrors the `users` table;
//! the projections in [`user::projection`] are the only shapes the session
//! core reads back. Database rows derive `sqlx::FromRow`.

pub mod session;
pub mod user;
