//! Typed JSON helpers over a [`KeyValueStore`].

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::KeyValueStore;
use crate::error::{Result, StorageError};

/// Load and parse the JSON value under `key`.
///
/// Returns `None` when the key is missing, unreadable, or holds data that
/// does not parse as `T`. Failures are logged; they never reach the caller.
pub fn load_json<T, S>(store: &S, key: &str) -> Option<T>
where
    T: DeserializeOwned,
    S: KeyValueStore + ?Sized,
{
    let raw = match store.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            tracing::warn!(key, error = %e, "failed to read stored value");
            return None;
        }
    };

    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(key, error = %e, "discarding unparseable stored value");
            None
        }
    }
}

/// Serialize `value` as JSON and store it under `key`.
pub fn save_json<T, S>(store: &S, key: &str, value: &T) -> Result<()>
where
    T: Serialize + ?Sized,
    S: KeyValueStore + ?Sized,
{
    let raw = serde_json::to_string(value).map_err(|source| StorageError::Serialize {
        key: key.to_string(),
        source,
    })?;
    store.set(key, &raw)
}
