use std::{collections::BTreeMap, path::{Path, PathBuf}, sync::Arc};
use tokio::{fs, sync::RwLock};
use tracing::warn;

use crate::errors::ServiceError;

/// Generic JSON file-backed key-value map store.
///
/// Persists a `BTreeMap<String, V>` to a JSON file; every write flushes the
/// whole map to a sibling temp file and renames it over the original, so a
/// crash mid-write leaves the previous contents intact.
pub struct JsonMapStore<V> {
    inner: RwLock<BTreeMap<String, V>>,
    file_path: PathBuf,
}

fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(suffix);
    PathBuf::from(name)
}

impl<V> JsonMapStore<V>
where
    V: serde::Serialize + serde::de::DeserializeOwned + Clone,
{
    /// Initialize the store from a path. Creates the file with an empty map if
    /// missing. An existing file that does not parse is `CorruptStorage`,
    /// unless `reset_on_corrupt` is set: then it is moved aside to
    /// `<path>.corrupt` and the store starts empty.
    pub async fn new<P: Into<PathBuf>>(path: P, reset_on_corrupt: bool) -> Result<Arc<Self>, ServiceError> {
        let file_path = path.into();
        if let Some(parent) = file_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .await
                    .map_err(|e| ServiceError::Storage(format!("cannot create {}: {e}", parent.display())))?;
            }
        }

        let store = Self { inner: RwLock::new(BTreeMap::new()), file_path };
        let map: BTreeMap<String, V> = match fs::read(&store.file_path).await {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => BTreeMap::new(),
            Ok(bytes) => match serde_json::from_slice(&bytes) {
                Ok(map) => map,
                Err(e) if reset_on_corrupt => {
                    let backup = sibling(&store.file_path, ".corrupt");
                    warn!(path = %store.file_path.display(), backup = %backup.display(), error = %e, "storage file unreadable; starting empty");
                    fs::rename(&store.file_path, &backup)
                        .await
                        .map_err(|e| ServiceError::Storage(e.to_string()))?;
                    let empty = BTreeMap::new();
                    store.save(&empty).await?;
                    empty
                }
                Err(e) => {
                    return Err(ServiceError::CorruptStorage(format!(
                        "{} is not a JSON object: {e}",
                        store.file_path.display()
                    )))
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let empty = BTreeMap::new();
                store.save(&empty).await?;
                empty
            }
            Err(e) => return Err(ServiceError::Storage(format!("cannot read {}: {e}", store.file_path.display()))),
        };

        *store.inner.write().await = map;
        Ok(Arc::new(store))
    }

    async fn save(&self, map: &BTreeMap<String, V>) -> Result<(), ServiceError> {
        let data = serde_json::to_vec_pretty(map).map_err(|e| ServiceError::Storage(e.to_string()))?;
        let tmp = sibling(&self.file_path, ".tmp");
        fs::write(&tmp, data).await.map_err(|e| ServiceError::Storage(e.to_string()))?;
        fs::rename(&tmp, &self.file_path).await.map_err(|e| ServiceError::Storage(e.to_string()))?;
        Ok(())
    }

    /// Get value by key.
    pub async fn get(&self, key: &str) -> Option<V> {
        let map = self.inner.read().await;
        map.get(key).cloned()
    }

    /// Insert or replace a value and persist. The in-memory map only changes
    /// once the file write succeeded.
    pub async fn insert(&self, key: String, value: V) -> Result<(), ServiceError> {
        let mut map = self.inner.write().await;
        let mut next = map.clone();
        next.insert(key, value);
        self.save(&next).await?;
        *map = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tmp_path() -> PathBuf {
        std::env::temp_dir().join(format!("json_map_store_{}.json", uuid::Uuid::new_v4()))
    }

    #[tokio::test]
    async fn json_map_store_persists_across_reload() -> Result<(), anyhow::Error> {
        let tmp = tmp_path();
        let store = JsonMapStore::<String>::new(&tmp, false).await?;

        // initially empty
        assert!(store.get("a").await.is_none());

        store.insert("a".into(), "1".into()).await?;
        store.insert("b".into(), "2".into()).await?;
        store.insert("a".into(), "10".into()).await?;
        assert_eq!(store.get("a").await.as_deref(), Some("10"));
        // temp file was renamed into place
        assert!(tokio::fs::metadata(sibling(&tmp, ".tmp")).await.is_err());

        let reloaded = JsonMapStore::<String>::new(&tmp, false).await?;
        assert_eq!(reloaded.get("a").await.as_deref(), Some("10"));
        assert_eq!(reloaded.get("b").await.as_deref(), Some("2"));

        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }

    #[tokio::test]
    async fn truncated_file_is_rejected_without_reset() -> Result<(), anyhow::Error> {
        let tmp = tmp_path();
        tokio::fs::write(&tmp, br#"{"@storefront:cart": "[{"#).await?;
        assert!(matches!(JsonMapStore::<String>::new(&tmp, false).await, Err(ServiceError::CorruptStorage(_))));
        // file left untouched for inspection
        assert_eq!(tokio::fs::read(&tmp).await?, br#"{"@storefront:cart": "[{"#.to_vec());
        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }

    #[tokio::test]
    async fn truncated_file_is_moved_aside_with_reset() -> Result<(), anyhow::Error> {
        let tmp = tmp_path();
        tokio::fs::write(&tmp, br#"{"@storefront:cart": "[{"#).await?;
        let store = JsonMapStore::<String>::new(&tmp, true).await?;
        assert!(store.get("@storefront:cart").await.is_none());

        let backup = sibling(&tmp, ".corrupt");
        assert_eq!(tokio::fs::read(&backup).await?, br#"{"@storefront:cart": "[{"#.to_vec());
        // the fresh file parses again
        JsonMapStore::<String>::new(&tmp, false).await?;

        let _ = tokio::fs::remove_file(&tmp).await;
        let _ = tokio::fs::remove_file(&backup).await;
        Ok(())
    }

    #[tokio::test]
    async fn uncreatable_parent_dir_is_an_error() -> Result<(), anyhow::Error> {
        // a regular file where a directory is expected
        let blocker = tmp_path();
        tokio::fs::write(&blocker, b"x").await?;
        let res = JsonMapStore::<String>::new(blocker.join("storage.json"), false).await;
        assert!(matches!(res, Err(ServiceError::Storage(_))));
        let _ = tokio::fs::remove_file(&blocker).await;
        Ok(())
    }
}
