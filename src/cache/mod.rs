//! Cache tier backends and the tiered store built on them.

pub mod backend;
pub mod error;
pub mod memory;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod redis_cache;
pub mod tiered;
pub mod types;


pub use backend::{CacheBackend, CacheTier};
pub use error::{CacheError, CacheResult, StoreError, StoreResult};
pub use memory::MemoryCache;
#[cfg(any(test, feature = "mock"))]
pub use mock::MockCacheTier;
pub use redis_cache::RedisCache;

#[cfg(any(test, feature = "mock"))]
pub use tiered::MockTieredStore;
pub use tiered::{TieredLookup, TieredStore};

pub use types::{
    LookupStatus, SHADER_STATUS_ERROR, SHADER_STATUS_HEADER, SHADER_STATUS_HEALTHY,
    SHADER_STATUS_NOT_READY, SHADER_STATUS_READY,
};
