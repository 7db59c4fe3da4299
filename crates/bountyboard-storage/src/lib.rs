//! Durable key-value storage for client state.
//!
//! The session record, the bookmark set and every bounty's winner drafts
//! each live under a single string key. This crate provides:
//! - [`KeyValueStore`], the synchronous storage seam
//! - [`FileStore`], one file per key under a data directory
//! - [`MemoryStore`], a shared in-process map for tests and ephemeral use
//! - [`load_json`] / [`save_json`], typed helpers that never fail on bad data

mod error;
mod file;
mod json;
mod memory;

pub use error::{Result, StorageError};
pub use file::FileStore;
pub use json::{load_json, save_json};
pub use memory::MemoryStore;

use std::sync::Arc;

/// Synchronous string key-value storage.
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Delete `key`. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<()>;
}

/// Shared storage handle.
pub type SharedStore = Arc<dyn KeyValueStore>;

impl<T: KeyValueStore + ?Sized> KeyValueStore for Arc<T> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
}
