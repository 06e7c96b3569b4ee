//! Session value objects.

pub mod model;

pub use model::Session;
