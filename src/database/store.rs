//! Key-value persistence seam for progress snapshots.

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};

use crate::error::Result;

/// String-valued key-value storage, the server-side analogue of browser
/// local storage. Writes are last-writer-wins.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Raw value stored under `key`, if any.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing what was there.
    async fn set(&self, key: &str, value: String) -> Result<()>;

    /// Remove `key`. Clearing a missing key is not an error.
    async fn clear(&self, key: &str) -> Result<()>;
}

/// Reads and deserializes the JSON value stored under `key`.
pub async fn load_json<T>(store: &dyn KeyValueStore, key: &str) -> Result<Option<T>>
where
    T: DeserializeOwned,
{
    match store.get(key).await? {
        Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
        None => Ok(None),
    }
}

pub async fn save_json<T>(store: &dyn KeyValueStore, key: &str, value: &T) -> Result<()>
where
    T: Serialize + ?Sized,
{
    let raw = serde_json::to_string(value)?;
    store.set(key, raw).await
}
