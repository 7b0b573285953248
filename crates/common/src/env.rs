//! Environment/runtime helpers
//!
//! Sanity checks to ensure the storage directory exists at startup.

use std::path::Path;
use tracing::{info, warn};

/// Ensure the parent directory of the storage file exists; warn when the
/// optional local catalog fixture is missing.
pub async fn ensure_env(storage_path: &str, catalog_path: Option<&str>) -> anyhow::Result<()> {
    if let Some(parent) = Path::new(storage_path).parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| anyhow::anyhow!("cannot create {}: {e}", parent.display()))?;
        }
    }
    if let Some(catalog_path) = catalog_path {
        if tokio::fs::metadata(catalog_path).await.is_err() {
            warn!(%catalog_path, "local catalog fixture not found; products and stock will 404");
        } else {
            info!(%catalog_path, "serving local catalog fixture");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn creates_missing_storage_dir() -> anyhow::Result<()> {
        let dir = std::env::temp_dir().join(format!("storefront_env_{}", std::process::id()));
        let file = dir.join("nested").join("storage.json");
        ensure_env(&file.to_string_lossy(), Some("/nonexistent/catalog.json")).await?;
        assert!(tokio::fs::metadata(dir.join("nested")).await.is_ok());
        let _ = tokio::fs::remove_dir_all(&dir).await;
        Ok(())
    }
}
