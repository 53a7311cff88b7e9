//! Scriptable cache tier for tests (in-memory map + failure switches).

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;

use parking_lot::RwLock;

use super::backend::CacheTier;
use super::error::{CacheError, CacheResult};

#[derive(Default)]
struct MockState {
    entries: RwLock<HashMap<String, (String, Duration)>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    delay_ms: AtomicU64,
    get_calls: AtomicUsize,
    set_calls: AtomicUsize,
    delete_calls: AtomicUsize,
}

/// In-memory [`CacheTier`] whose reads and writes can be made to fail or stall.
///
/// Clones share state, so a test can keep a handle after moving one into a store.
/// Entries never expire on their own; tests simulate expiry with [`clear`](Self::clear).
#[derive(Default, Clone)]
pub struct MockCacheTier {
    state: Arc<MockState>,
}

impl MockCacheTier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a raw value (e.g. a corrupt payload) bypassing failure switches.
    pub fn insert_raw(&self, key: &str, value: &str) {
        self.state
            .entries
            .write()
            .insert(key.to_string(), (value.to_string(), Duration::ZERO));
    }

    /// Returns the raw value under `key`.
    pub fn raw(&self, key: &str) -> Option<String> {
        self.state
            .entries
            .read()
            .get(key)
            .map(|(value, _)| value.clone())
    }

    /// Returns the TTL most recently set for `key`.
    pub fn ttl(&self, key: &str) -> Option<Duration> {
        self.state.entries.read().get(key).map(|(_, ttl)| *ttl)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.state.entries.read().contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.state.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.entries.read().is_empty()
    }

    /// Drops every entry, as if all TTLs lapsed.
    pub fn clear(&self) {
        self.state.entries.write().clear();
    }

    pub fn set_fail_reads(&self, fail: bool) {
        self.state.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.state.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Makes every subsequent `get`, `set_ex` and `delete` sleep for `delay` first.
    pub fn set_delay(&self, delay: Duration) {
        self.state
            .delay_ms
            .store(delay.as_millis() as u64, Ordering::SeqCst);
    }

    /// Number of `get` calls, failed ones included.
    pub fn get_calls(&self) -> usize {
        self.state.get_calls.load(Ordering::SeqCst)
    }

    /// Number of successful `set_ex` calls.
    pub fn set_calls(&self) -> usize {
        self.state.set_calls.load(Ordering::SeqCst)
    }

    /// Number of successful `delete` calls.
    pub fn delete_calls(&self) -> usize {
        self.state.delete_calls.load(Ordering::SeqCst)
    }

    async fn stall(&self) {
        let delay_ms = self.state.delay_ms.load(Ordering::SeqCst);
        if delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(delay_ms)).await;
        }
    }

    fn unavailable() -> CacheError {
        CacheError::Unavailable {
            reason: "mock cache tier offline".to_string(),
        }
    }
}

impl std::fmt::Debug for MockCacheTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockCacheTier")
            .field("entries", &self.len())
            .finish_non_exhaustive()
    }
}

impl CacheTier for MockCacheTier {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn is_ready(&self) -> bool {
        !self.state.fail_reads.load(Ordering::SeqCst)
    }

    async fn get(&self, key: &str) -> CacheResult<Option<String>> {
        self.state.get_calls.fetch_add(1, Ordering::SeqCst);
        self.stall().await;
        if self.state.fail_reads.load(Ordering::SeqCst) {
            return Err(Self::unavailable());
        }
        Ok(self.raw(key))
    }

    async fn set_ex(&self, key: &str, value: &str, ttl: Duration) -> CacheResult<()> {
        self.stall().await;
        if self.state.fail_writes.load(Ordering::SeqCst) {
            return Err(Self::unavailable());
        }
        self.state
            .entries
            .write()
            .insert(key.to_string(), (value.to_string(), ttl));
        self.state.set_calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn delete(&self, key: &str) -> CacheResult<()> {
        self.stall().await;
        if self.state.fail_writes.load(Ordering::SeqCst) {
            return Err(Self::unavailable());
        }
        self.state.entries.write().remove(key);
        self.state.delete_calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
