//! Redis connection management.

use redis::Client;
use redis::aio::ConnectionManager;
use tracing::info;

use tana_core::config::cache::RedisCacheConfig;
use tana_core::error::{AppError, ErrorKind};
use tana_core::result::AppResult;

/// Reconnecting Redis connection plus the configured key prefix.
#[derive(Clone)]
pub struct RedisClient {
    conn: ConnectionManager,
    key_prefix: String,
}

// `ConnectionManager` does not implement `Debug` in redis 0.32.
impl std::fmt::Debug for RedisClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisClient")
            .field("key_prefix", &self.key_prefix)
            .finish_non_exhaustive()
    }
}

impl RedisClient {
    /// Connect using the `cache.redis` section.
    pub async fn connect(config: &RedisCacheConfig) -> AppResult<Self> {
        info!(url = %mask_redis_url(&config.url), "Connecting to Redis");

        let client = Client::open(config.url.as_str()).map_err(|e| {
            AppError::with_source(ErrorKind::Cache, "Invalid Redis URL", e)
        })?;

        let conn = ConnectionManager::new(client).await.map_err(|e| {
            AppError::with_source(ErrorKind::Cache, "Failed to connect to Redis", e)
        })?;

        Ok(Self {
            conn,
            key_prefix: config.key_prefix.clone(),
        })
    }

    /// A connection handle; clones share the underlying multiplexed link.
    pub fn conn(&self) -> ConnectionManager {
        self.conn.clone()
    }

    /// Apply the configured prefix to `key`.
    pub fn prefixed_key(&self, key: &str) -> String {
        format!("{}{key}", self.key_prefix)
    }
}

/// Hide the password component of a Redis URL.
pub fn mask_redis_url(url: &str) -> String {
    let scheme_end = url.find("://").map(|p| p + 3).unwrap_or(0);
    let Some(at) = url[scheme_end..].rfind('@').map(|p| p + scheme_end) else {
        return url.to_string();
    };
    match url[scheme_end..at].find(':') {
        Some(colon) => format!("{}:****{}", &url[..scheme_end + colon], &url[at..]),
        None => format!("{}****{}", &url[..scheme_end], &url[at..]),
    }
}
