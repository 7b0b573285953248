use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::errors::ServiceError;
use crate::storage::json_map_store::JsonMapStore;

/// Durable string key-value storage, the shape of a browser's local storage.
/// Implementations can be file-backed, in-memory, or remote.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, ServiceError>;
    async fn set(&self, key: &str, value: String) -> Result<(), ServiceError>;
}

/// Key-value store persisted to a single JSON file.
#[derive(Clone)]
pub struct FileKvStore {
    store: Arc<JsonMapStore<String>>,
}

impl FileKvStore {
    /// Open (or create) the store at `path`. With `reset_on_corrupt`, an
    /// unparsable file is moved aside and the store starts empty.
    pub async fn new<P: Into<PathBuf>>(path: P, reset_on_corrupt: bool) -> Result<Arc<Self>, ServiceError> {
        let store = JsonMapStore::<String>::new(path, reset_on_corrupt).await?;
        Ok(Arc::new(Self { store }))
    }
}

#[async_trait]
impl KeyValueStore for FileKvStore {
    async fn get(&self, key: &str) -> Result<Option<String>, ServiceError> {
        Ok(self.store.get(key).await)
    }

    async fn set(&self, key: &str, value: String) -> Result<(), ServiceError> {
        self.store.insert(key.to_string(), value).await
    }
}

/// Process-local store for tests and ephemeral sessions.
#[derive(Default)]
pub struct MemoryKvStore {
    map: RwLock<HashMap<String, String>>,
    fail_writes: AtomicBool,
}

impl MemoryKvStore {
    pub fn new() -> Self { Self::default() }

    /// Seed a value without going through `set`.
    pub fn with_entry(key: &str, value: impl Into<String>) -> Self {
        let mut map = HashMap::new();
        map.insert(key.to_string(), value.into());
        Self { map: RwLock::new(map), fail_writes: AtomicBool::new(false) }
    }

    /// Make every subsequent `set` fail, simulating a full or revoked storage quota.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl KeyValueStore for MemoryKvStore {
    async fn get(&self, key: &str) -> Result<Option<String>, ServiceError> {
        Ok(self.map.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> Result<(), ServiceError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(ServiceError::Storage("write rejected".into()));
        }
        self.map.write().await.insert(key.to_string(), value);
        Ok(())
    }
}
