//! Redis cache provider implementation.

use std::time::Duration;

use async_trait::async_trait;
use redis::AsyncCommands;

use tana_core::error::{AppError, ErrorKind};
use tana_core::result::AppResult;
use tana_core::traits::CacheProvider;

use super::client::RedisClient;

/// Redis-backed cache provider. TTLs are applied with millisecond precision.
#[derive(Debug, Clone)]
pub struct RedisCacheProvider {
    client: RedisClient,
}

impl RedisCacheProvider {
    /// Create a provider over a connected client.
    pub fn new(client: RedisClient) -> Self {
        Self { client }
    }

    fn map_err(e: redis::RedisError) -> AppError {
        AppError::with_source(ErrorKind::Cache, format!("Redis error: {e}"), e)
    }
}

fn millis(ttl: Duration) -> u64 {
    // PX 0 is rejected by Redis.
    (ttl.as_millis() as u64).max(1)
}

#[async_trait]
impl CacheProvider for RedisCacheProvider {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        let mut conn = self.client.conn();
        conn.get(self.client.prefixed_key(key))
            .await
            .map_err(Self::map_err)
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> AppResult<()> {
        let mut conn = self.client.conn();
        let _: () = conn
            .pset_ex(self.client.prefixed_key(key), value, millis(ttl))
            .await
            .map_err(Self::map_err)?;
        Ok(())
    }

    async fn set_nx(&self, key: &str, value: &str, ttl: Duration) -> AppResult<bool> {
        let mut conn = self.client.conn();

        // SET key value PX ttl NX
        let result: Option<String> = redis::cmd("SET")
            .arg(self.client.prefixed_key(key))
            .arg(value)
            .arg("PX")
            .arg(millis(ttl))
            .arg("NX")
            .query_async(&mut conn)
            .await
            .map_err(Self::map_err)?;

        Ok(result.is_some())
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        let mut conn = self.client.conn();
        let _: () = conn
            .del(self.client.prefixed_key(key))
            .await
            .map_err(Self::map_err)?;
        Ok(())
    }

    async fn expire(&self, key: &str, ttl: Duration) -> AppResult<bool> {
        let mut conn = self.client.conn();
        conn.pexpire(self.client.prefixed_key(key), millis(ttl) as i64)
            .await
            .map_err(Self::map_err)
    }

    async fn ttl(&self, key: &str) -> AppResult<Option<Duration>> {
        let mut conn = self.client.conn();
        let remaining: i64 = conn
            .pttl(self.client.prefixed_key(key))
            .await
            .map_err(Self::map_err)?;

        // -2: no such key, -1: no expiry.
        Ok((remaining >= 0).then(|| Duration::from_millis(remaining as u64)))
    }

    async fn health_check(&self) -> AppResult<bool> {
        let mut conn = self.client.conn();
        let pong: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(Self::map_err)?;
        Ok(pong == "PONG")
    }
}
