//! Core traits defined in `tana-core` and implemented by other crates.

pub mod cache;

pub use cache::CacheProvider;
