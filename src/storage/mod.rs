//! Durable tier: the authoritative, non-expiring record store.

pub mod durable;
pub mod error;
mod model;

#[cfg(test)]
mod tests;

pub use durable::DurableStore;
pub use error::{StorageError, StorageResult};
pub use model::ShaderRecord;
