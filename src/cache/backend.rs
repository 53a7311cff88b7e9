use std::time::Duration;

use tracing::info;

use super::error::CacheResult;
use super::memory::MemoryCache;
use super::redis_cache::RedisCache;
use crate::config::Config;

/// Expiring key/value store used as the read-through accelerator.
pub trait CacheTier: Send + Sync {
    /// Short backend name for logs.
    fn name(&self) -> &'static str;

    /// Returns `true` if the backend is reachable.
    fn is_ready(&self) -> impl std::future::Future<Output = bool> + Send;

    /// Returns the raw value under `key`, or `None` if absent or expired.
    fn get(
        &self,
        key: &str,
    ) -> impl std::future::Future<Output = CacheResult<Option<String>>> + Send;

    /// Stores `value` under `key`, replacing any previous value and resetting its TTL.
    fn set_ex(
        &self,
        key: &str,
        value: &str,
        ttl: Duration,
    ) -> impl std::future::Future<Output = CacheResult<()>> + Send;

    /// Removes `key` if present.
    fn delete(&self, key: &str) -> impl std::future::Future<Output = CacheResult<()>> + Send;
}

/// Cache tier selected at startup from `REDIS_URL`.
#[derive(Debug, Clone)]
pub enum CacheBackend {
    Redis(RedisCache),
    Memory(MemoryCache),
}

impl CacheBackend {
    /// Connects the backend named by [`Config::redis_url`].
    pub async fn from_config(config: &Config) -> CacheResult<Self> {
        if config.uses_memory_cache() {
            info!(
                capacity = config.memory_cache_capacity,
                "Using in-process cache tier"
            );
            return Ok(Self::Memory(MemoryCache::with_capacity(
                config.memory_cache_capacity,
            )));
        }

        let cache = RedisCache::connect(&config.redis_url).await?;
        info!("Connected to Redis cache tier");
        Ok(Self::Redis(cache))
    }
}

impl CacheTier for CacheBackend {
    fn name(&self) -> &'static str {
        match self {
            CacheBackend::Redis(cache) => cache.name(),
            CacheBackend::Memory(cache) => cache.name(),
        }
    }

    async fn is_ready(&self) -> bool {
        match self {
            CacheBackend::Redis(cache) => cache.is_ready().await,
            CacheBackend::Memory(cache) => cache.is_ready().await,
        }
    }

    async fn get(&self, key: &str) -> CacheResult<Option<String>> {
        match self {
            CacheBackend::Redis(cache) => cache.get(key).await,
            CacheBackend::Memory(cache) => cache.get(key).await,
        }
    }

    async fn set_ex(&self, key: &str, value: &str, ttl: Duration) -> CacheResult<()> {
        match self {
            CacheBackend::Redis(cache) => cache.set_ex(key, value, ttl).await,
            CacheBackend::Memory(cache) => cache.set_ex(key, value, ttl).await,
        }
    }

    async fn delete(&self, key: &str) -> CacheResult<()> {
        match self {
            CacheBackend::Redis(cache) => cache.delete(key).await,
            CacheBackend::Memory(cache) => cache.delete(key).await,
        }
    }
}
