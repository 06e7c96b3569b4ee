//! # tana-cache
//!
//! Key-value cache backends holding session entries. Two providers exist:
//!
//! - **redis**: shared Redis instance via [redis](https://crates.io/crates/redis)
//! - **memory**: in-process [moka](https://crates.io/crates/moka) cache with per-entry TTL
//!
//! [`CacheManager`] selects one at startup from `cache.provider`.

pub mod keys;
#[cfg(feature = "memory")]
pub mod memory;
pub mod provider;
#[cfg(feature = "redis-backend")]
pub mod redis;

pub use provider::CacheManager;
