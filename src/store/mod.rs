/// Document storage layer
///
/// Every piece of app state lives as one JSON document under a fixed key.
/// `DocumentStore` is the raw key-value seam (SQLite or in-memory);
/// `Repository` adds typed access with parse-and-fallback reads.

pub mod keys;
pub mod memory;
pub mod sqlite;

pub use keys::StoreKey;
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use crate::error::AmoraResult;
use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

/// Raw key-value document storage
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetch the raw document stored under `key`
    async fn get(&self, key: &str) -> AmoraResult<Option<String>>;

    /// Replace the document stored under `key`
    async fn put(&self, key: &str, document: String) -> AmoraResult<()>;

    /// Remove a single document; missing keys are not an error
    async fn remove(&self, key: &str) -> AmoraResult<()>;

    /// Remove every document
    async fn clear(&self) -> AmoraResult<()>;

    /// List the keys currently present
    async fn keys(&self) -> AmoraResult<Vec<String>>;
}

/// Typed access to the document store
#[derive(Clone)]
pub struct Repository {
    store: Arc<dyn DocumentStore>,
}

impl Repository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Load and decode a document.
    ///
    /// Unreadable or malformed documents are logged and treated as absent.
    pub async fn load<T: DeserializeOwned>(&self, key: StoreKey) -> Option<T> {
        let raw = match self.store.get(key.as_str()).await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!("store miss: {}", key);
                return None;
            }
            Err(e) => {
                warn!("Failed to read {} from store: {}", key, e);
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("Malformed document under {}, ignoring it: {}", key, e);
                None
            }
        }
    }

    /// Load a document, falling back to `T::default()`
    pub async fn load_or_default<T: DeserializeOwned + Default>(&self, key: StoreKey) -> T {
        self.load(key).await.unwrap_or_default()
    }

    /// Encode and store a document
    pub async fn save<T: Serialize + ?Sized>(&self, key: StoreKey, value: &T) -> AmoraResult<()> {
        let raw = serde_json::to_string(value)?;
        self.store.put(key.as_str(), raw).await
    }

    pub async fn remove(&self, key: StoreKey) -> AmoraResult<()> {
        self.store.remove(key.as_str()).await
    }

    /// Remove a set of keys
    pub async fn remove_all(&self, keys: &[StoreKey]) -> AmoraResult<()> {
        for key in keys {
            self.store.remove(key.as_str()).await?;
        }
        Ok(())
    }

    /// Wipe the whole store
    pub async fn clear(&self) -> AmoraResult<()> {
        self.store.clear().await
    }

    /// Whether a document exists under `key`, regardless of whether it parses
    pub async fn contains(&self, key: StoreKey) -> bool {
        matches!(self.store.get(key.as_str()).await, Ok(Some(_)))
    }

    /// Append an id to a persisted id list unless it is already present.
    ///
    /// Returns true when the list changed.
    pub async fn push_unique_id(&self, key: StoreKey, id: &str) -> AmoraResult<bool> {
        let mut ids: Vec<String> = self.load_or_default(key).await;
        if ids.iter().any(|existing| existing == id) {
            return Ok(false);
        }
        ids.push(id.to_string());
        self.save(key, &ids).await?;
        Ok(true)
    }

    /// Remove an id from a persisted id list.
    ///
    /// Returns true when the id was present.
    pub async fn remove_id(&self, key: StoreKey, id: &str) -> AmoraResult<bool> {
        let mut ids: Vec<String> = self.load_or_default(key).await;
        let before = ids.len();
        ids.retain(|existing| existing != id);
        if ids.len() == before {
            return Ok(false);
        }
        self.save(key, &ids).await?;
        Ok(true)
    }

    /// Access the raw store
    pub fn store(&self) -> &Arc<dyn DocumentStore> {
        &self.store
    }
}
