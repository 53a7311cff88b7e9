//! Tiered store: expiring cache tier in front of the durable tier.
//!
//! Writes go to both tiers (cache first, then durable). Reads are cache-first; a cache
//! miss that the durable tier satisfies re-inserts the record into the cache with a fresh
//! TTL.

use std::time::Duration;

use tracing::{debug, info, instrument, warn};

use super::backend::CacheTier;
use super::error::{StoreError, StoreResult};
#[cfg(any(test, feature = "mock"))]
use super::mock::MockCacheTier;
use super::types::LookupStatus;
use crate::config::CacheWritePolicy;
use crate::constants::{CACHE_TTL, MAX_ID_ATTEMPTS, cache_key};
use crate::ident::{IdError, generate_id};
use crate::storage::{DurableStore, ShaderRecord};

/// Outcome of [`TieredStore::get`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TieredLookup {
    HitCache(ShaderRecord),
    HitDurable(ShaderRecord),
    Miss,
}

impl TieredLookup {
    pub fn status(&self) -> LookupStatus {
        match self {
            TieredLookup::HitCache(_) => LookupStatus::HitCache,
            TieredLookup::HitDurable(_) => LookupStatus::HitDurable,
            TieredLookup::Miss => LookupStatus::Miss,
        }
    }

    pub fn into_record(self) -> Option<ShaderRecord> {
        match self {
            TieredLookup::HitCache(record) | TieredLookup::HitDurable(record) => Some(record),
            TieredLookup::Miss => None,
        }
    }
}

/// Cache tier `C` in front of a [`DurableStore`].
pub struct TieredStore<C: CacheTier> {
    cache: C,
    durable: DurableStore,
    write_policy: CacheWritePolicy,
    ttl: Duration,
}

impl<C: CacheTier> std::fmt::Debug for TieredStore<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TieredStore")
            .field("cache", &self.cache.name())
            .field("durable", &self.durable)
            .field("write_policy", &self.write_policy)
            .field("ttl", &self.ttl)
            .finish()
    }
}

impl<C: CacheTier> TieredStore<C> {
    pub fn new(cache: C, durable: DurableStore) -> Self {
        Self {
            cache,
            durable,
            write_policy: CacheWritePolicy::default(),
            ttl: CACHE_TTL,
        }
    }

    pub fn with_write_policy(mut self, write_policy: CacheWritePolicy) -> Self {
        self.write_policy = write_policy;
        self
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn cache(&self) -> &C {
        &self.cache
    }

    pub fn durable(&self) -> &DurableStore {
        &self.durable
    }

    pub fn write_policy(&self) -> CacheWritePolicy {
        self.write_policy
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Stores `source` under `id` in both tiers.
    ///
    /// Overwrites any record already stored under `id`. Nothing is stored if the durable
    /// write fails; the cache entry written just before is evicted best-effort.
    #[instrument(skip(self, source), fields(id = %id, source_len = source.len()))]
    pub async fn put(&self, id: &str, source: &str) -> StoreResult<ShaderRecord> {
        if source.is_empty() {
            return Err(StoreError::EmptySource);
        }

        let record = ShaderRecord::new(source);
        let key = cache_key(id);
        let payload = record.to_json()?;

        let cached = match self.cache.set_ex(&key, &payload, self.ttl).await {
            Ok(()) => true,
            Err(e) => match self.write_policy {
                CacheWritePolicy::Strict => {
                    warn!(error = %e, cache = self.cache.name(), "Cache write failed, aborting");
                    return Err(StoreError::Cache(e));
                }
                CacheWritePolicy::Degrade => {
                    warn!(
                        error = %e,
                        cache = self.cache.name(),
                        "Cache write failed, continuing durable-only"
                    );
                    false
                }
            },
        };

        if let Err(e) = self.durable.insert(id, record.clone()).await {
            if cached && let Err(evict) = self.cache.delete(&key).await {
                warn!(error = %evict, "Failed to evict cache entry after durable failure");
            }
            return Err(e.into());
        }

        info!(created = record.created, "Shader stored");
        Ok(record)
    }

    /// Looks `id` up cache-first, falling back to (and repopulating from) the durable tier.
    ///
    /// Cache read errors and undecodable cache payloads are treated as misses.
    #[instrument(skip(self), fields(id = %id))]
    pub async fn get(&self, id: &str) -> TieredLookup {
        let key = cache_key(id);

        match self.cache.get(&key).await {
            Ok(Some(raw)) => match ShaderRecord::from_json(&raw) {
                Ok(record) => {
                    debug!("Cache hit");
                    return TieredLookup::HitCache(record);
                }
                Err(e) => warn!(error = %e, "Corrupt cache payload, falling back to durable tier"),
            },
            Ok(None) => debug!("Cache miss"),
            Err(e) => warn!(error = %e, "Cache read failed, falling back to durable tier"),
        }

        let Some(record) = self.durable.get(id) else {
            debug!("Durable miss");
            return TieredLookup::Miss;
        };

        match record.to_json() {
            Ok(payload) => match self.cache.set_ex(&key, &payload, self.ttl).await {
                Ok(()) => debug!("Durable hit, cache repopulated"),
                Err(e) => warn!(error = %e, "Durable hit, cache repopulation failed"),
            },
            Err(e) => warn!(error = %e, "Durable hit, record not serializable for cache"),
        }

        TieredLookup::HitDurable(record)
    }

    /// Stores `source` under a freshly generated identifier and returns it.
    ///
    /// Identifiers already present in the durable tier are skipped, up to
    /// [`MAX_ID_ATTEMPTS`] draws.
    pub async fn save(&self, source: &str) -> StoreResult<(String, ShaderRecord)> {
        self.save_with_ids(source, generate_id).await
    }

    pub(crate) async fn save_with_ids<F>(
        &self,
        source: &str,
        mut next_id: F,
    ) -> StoreResult<(String, ShaderRecord)>
    where
        F: FnMut() -> Result<String, IdError> + Send,
    {
        if source.is_empty() {
            return Err(StoreError::EmptySource);
        }

        for attempt in 1..=MAX_ID_ATTEMPTS {
            let id = next_id()?;
            if self.durable.contains(&id) {
                warn!(id = %id, attempt, "Generated id already stored, drawing another");
                continue;
            }
            let record = self.put(&id, source).await?;
            return Ok((id, record));
        }

        Err(StoreError::IdSpaceExhausted {
            attempts: MAX_ID_ATTEMPTS,
        })
    }

    pub async fn is_ready(&self) -> bool {
        self.cache.is_ready().await
    }
}

#[cfg(any(test, feature = "mock"))]
pub type MockTieredStore = TieredStore<MockCacheTier>;

#[cfg(any(test, feature = "mock"))]
impl TieredStore<MockCacheTier> {
    /// Creates a store with a fresh [`MockCacheTier`] and a durable file at `path`.
    pub async fn new_mock(path: impl Into<std::path::PathBuf>) -> StoreResult<Self> {
        let durable = DurableStore::open(path).await?;
        Ok(Self::new(MockCacheTier::new(), durable))
    }

    /// Creates a store over an existing mock cache (shared state) and durable file.
    pub async fn new_mock_with_cache(
        cache: MockCacheTier,
        path: impl Into<std::path::PathBuf>,
    ) -> StoreResult<Self> {
        let durable = DurableStore::open(path).await?;
        Ok(Self::new(cache, durable))
    }
}
