//! In-memory cache implementation using the moka crate.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use moka::Expiry;
use moka::future::Cache;
use moka::ops::compute::{CompResult, Op};

use tana_core::config::cache::MemoryCacheConfig;
use tana_core::result::AppResult;
use tana_core::traits::CacheProvider;

/// A stored value together with the TTL it was written with.
#[derive(Debug, Clone)]
struct CachedValue {
    value: String,
    ttl: Duration,
    written_at: Instant,
}

impl CachedValue {
    fn new(value: String, ttl: Duration) -> Self {
        Self {
            value,
            ttl,
            written_at: Instant::now(),
        }
    }

    fn remaining(&self) -> Duration {
        self.ttl.saturating_sub(self.written_at.elapsed())
    }
}

/// Expires each entry after the TTL it carries; reads never extend it.
struct PerEntryTtl;

impl Expiry<String, CachedValue> for PerEntryTtl {
    fn expire_after_create(
        &self,
        _key: &String,
        value: &CachedValue,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(value.ttl)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        value: &CachedValue,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(value.ttl)
    }
}

/// In-memory cache provider using moka.
#[derive(Debug, Clone)]
pub struct MemoryCacheProvider {
    cache: Cache<String, CachedValue>,
}

impl MemoryCacheProvider {
    /// Create an empty cache bounded by `max_capacity` entries.
    pub fn new(config: &MemoryCacheConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(config.max_capacity)
            .expire_after(PerEntryTtl)
            .build();
        Self { cache }
    }
}

#[async_trait]
impl CacheProvider for MemoryCacheProvider {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        Ok(self.cache.get(key).await.map(|v| v.value))
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> AppResult<()> {
        self.cache
            .insert(key.to_string(), CachedValue::new(value.to_string(), ttl))
            .await;
        Ok(())
    }

    async fn set_nx(&self, key: &str, value: &str, ttl: Duration) -> AppResult<bool> {
        let entry = self
            .cache
            .entry(key.to_string())
            .or_insert_with(async { CachedValue::new(value.to_string(), ttl) })
            .await;
        Ok(entry.is_fresh())
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        self.cache.remove(key).await;
        Ok(())
    }

    async fn expire(&self, key: &str, ttl: Duration) -> AppResult<bool> {
        // Compute under the entry lock so a concurrent delete is never undone.
        let result = self
            .cache
            .entry(key.to_string())
            .and_compute_with(|existing| {
                let op = match existing {
                    Some(entry) => Op::Put(CachedValue::new(entry.into_value().value, ttl)),
                    None => Op::Nop,
                };
                std::future::ready(op)
            })
            .await;
        Ok(matches!(result, CompResult::ReplacedWith(_)))
    }

    async fn ttl(&self, key: &str) -> AppResult<Option<Duration>> {
        Ok(self.cache.get(key).await.map(|v| v.remaining()))
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }
}
