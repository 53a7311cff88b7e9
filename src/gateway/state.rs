use std::sync::Arc;
use std::time::Duration;

use crate::cache::{CacheTier, TieredStore};

pub struct HandlerState<C: CacheTier + 'static> {
    pub store: Arc<TieredStore<C>>,

    pub request_timeout: Duration,
}

impl<C: CacheTier + 'static> HandlerState<C> {
    pub fn new(store: Arc<TieredStore<C>>, request_timeout: Duration) -> Self {
        Self {
            store,
            request_timeout,
        }
    }
}

impl<C: CacheTier + 'static> Clone for HandlerState<C> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            request_timeout: self.request_timeout,
        }
    }
}
