//! Shaderbin library crate (used by the server and integration tests).
//!
//! # Public API Surface
//!
//! ## Core Types
//! - [`Config`], [`ConfigError`], [`CacheWritePolicy`] - Server configuration
//! - [`ShaderRecord`] - Stored shader (`source` plus millisecond `created` timestamp)
//! - [`TieredStore`], [`TieredLookup`] - Cache tier in front of the durable tier
//! - [`DurableStore`] - JSON-file durable tier
//!
//! ## Cache Tiers
//! - [`CacheTier`] - Expiring key/value contract
//! - [`RedisCache`], [`MemoryCache`], [`CacheBackend`] - Implementations
//!
//! ## Utilities
//! - [`generate_id`], [`is_valid_id`] - Shader identifiers
//!
//! ## Test/Mock Support
//! Mock implementations are available behind `#[cfg(any(test, feature = "mock"))]`.

pub mod cache;
pub mod config;
pub mod constants;
pub mod gateway;
pub mod ident;
pub mod storage;

pub use cache::{
    CacheBackend, CacheError, CacheResult, CacheTier, LookupStatus, MemoryCache, RedisCache,
    SHADER_STATUS_ERROR, SHADER_STATUS_HEADER, SHADER_STATUS_HEALTHY, SHADER_STATUS_NOT_READY,
    SHADER_STATUS_READY, StoreError, StoreResult, TieredLookup, TieredStore,
};
#[cfg(any(test, feature = "mock"))]
pub use cache::{MockCacheTier, MockTieredStore};

pub use config::{CacheWritePolicy, Config, ConfigError};
pub use constants::{CACHE_TTL, CACHE_TTL_SECS, MAX_BODY_BYTES, cache_key};
pub use gateway::{GatewayError, HandlerState, create_router_with_state};
pub use ident::{IdError, generate_id, is_valid_id};
pub use storage::{DurableStore, ShaderRecord, StorageError, StorageResult};
