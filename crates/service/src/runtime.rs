//! Runtime environment helpers
//!
//! Thin wrapper around `common::env` to keep binary crates importing
//! `service::runtime::ensure_env` without depending directly on `common`.

/// Ensure the storage directory exists; warn on a missing local catalog fixture.
pub async fn ensure_env(storage_path: &str, catalog_path: Option<&str>) -> anyhow::Result<()> {
    common::env::ensure_env(storage_path, catalog_path).await
}
