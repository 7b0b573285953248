use anyhow::Result;
use serde::Deserialize;
use anyhow::anyhow;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "127.0.0.1".into(), port: 8081, worker_threads: Some(4) }
    }
}

/// Where product metadata and stock figures come from.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogConfig {
    #[serde(default)]
    pub base_url: String,
    #[serde(default = "default_catalog_timeout")]
    pub timeout_secs: u64,
    /// Host `/products` and `/stock` from `data_path` on the same server.
    #[serde(default)]
    pub serve_local: bool,
    #[serde(default = "default_catalog_data_path")]
    pub data_path: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            timeout_secs: default_catalog_timeout(),
            serve_local: false,
            data_path: default_catalog_data_path(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_storage_path")]
    pub path: String,
    #[serde(default = "default_cart_key")]
    pub cart_key: String,
    /// Start with an empty cart instead of failing when the stored value is unreadable.
    #[serde(default)]
    pub reset_on_corrupt: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self { path: default_storage_path(), cart_key: default_cart_key(), reset_on_corrupt: false }
    }
}

pub const DEFAULT_CATALOG_URL: &str = "http://localhost:3333";

fn default_catalog_timeout() -> u64 { 10 }
fn default_catalog_data_path() -> String { "data/catalog.json".into() }
fn default_storage_path() -> String { "data/storage.json".into() }
fn default_cart_key() -> String { "@storefront:cart".into() }

fn config_path() -> String {
    std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string())
}


impl AppConfig {
    /// Load from `CONFIG_PATH` (default `config.toml`). A missing file yields defaults (still
    /// normalized from the environment). A file that exists and does not
    /// read or parse is an error.
    pub fn load_or_default() -> Result<Self> {
        Self::load_or_default_from(&config_path())
    }

    pub fn load_or_default_from(path: &str) -> Result<Self> {
        let mut cfg = match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str::<AppConfig>(&content).map_err(|e| anyhow!("invalid config {path}: {e}"))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => AppConfig::default(),
            Err(e) => return Err(anyhow!("cannot read config {path}: {e}")),
        };
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize()?;
        self.catalog.normalize_from_env();
        self.catalog.validate()?;
        self.storage.validate()?;
        Ok(())
    }
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = "127.0.0.1".to_string();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be in 1..=65535"));
        }
        match self.worker_threads {
            Some(0) | None => self.worker_threads = Some(4),
            Some(_) => {}
        }
        Ok(())
    }
}

impl CatalogConfig {
    pub fn normalize_from_env(&mut self) {
        if self.base_url.trim().is_empty() {
            self.base_url = std::env::var("CATALOG_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_CATALOG_URL.to_string());
        }
        // 统一去掉末尾斜杠，拼接路径时不会出现 `//`
        let trimmed = self.base_url.trim().trim_end_matches('/').to_string();
        self.base_url = trimmed;
    }

    pub fn validate(&self) -> Result<()> {
        let lower = self.base_url.to_lowercase();
        if !(lower.starts_with("http://") || lower.starts_with("https://")) {
            return Err(anyhow!("catalog.base_url must start with http:// or https://"));
        }
        if self.timeout_secs == 0 {
            return Err(anyhow!("catalog.timeout_secs must be a positive number of seconds"));
        }
        if self.serve_local && self.data_path.trim().is_empty() {
            return Err(anyhow!("catalog.data_path is required when catalog.serve_local is set"));
        }
        Ok(())
    }
}

impl StorageConfig {
    pub fn validate(&self) -> Result<()> {
        if self.path.trim().is_empty() {
            return Err(anyhow!("storage.path is empty"));
        }
        if self.cart_key.trim().is_empty() {
            return Err(anyhow!("storage.cart_key is empty"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_partial_toml_with_defaults() {
        let cfg: AppConfig = toml::from_str(
            r#"
            [server]
            host = "0.0.0.0"
            port = 9000

            [catalog]
            base_url = "http://catalog.local:3333/"
            "#,
        )
        .expect("parse");
        assert_eq!(cfg.server.port, 9000);
        assert_eq!(cfg.catalog.timeout_secs, 10);
        assert_eq!(cfg.storage.cart_key, "@storefront:cart");
        assert!(!cfg.storage.reset_on_corrupt);
    }

    #[test]
    fn normalize_trims_trailing_slash_and_fills_threads() -> Result<()> {
        let mut cfg = AppConfig::default();
        cfg.catalog.base_url = "http://catalog.local:3333/".into();
        cfg.server.worker_threads = Some(0);
        cfg.normalize_and_validate()?;
        assert_eq!(cfg.catalog.base_url, "http://catalog.local:3333");
        assert_eq!(cfg.server.worker_threads, Some(4));
        Ok(())
    }

    #[test]
    fn rejects_invalid_values() {
        let mut cfg = AppConfig::default();
        cfg.catalog.base_url = "ftp://catalog".into();
        assert!(cfg.normalize_and_validate().is_err());

        let mut cfg = AppConfig::default();
        cfg.catalog.base_url = "http://catalog".into();
        cfg.storage.cart_key = "  ".into();
        assert!(cfg.normalize_and_validate().is_err());

        let mut cfg = AppConfig::default();
        cfg.catalog.base_url = "http://catalog".into();
        cfg.server.port = 0;
        assert!(cfg.normalize_and_validate().is_err());
    }

    fn temp_config(name: &str, content: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("storefront_cfg_{}_{name}.toml", std::process::id()));
        std::fs::write(&path, content).expect("write temp config");
        path
    }

    #[test]
    fn broken_config_file_is_an_error_not_defaults() {
        let path = temp_config("broken", "[server]\nport = \"not a number\"\n[storage]\ncart_key = \"@custom\"\n");
        let res = AppConfig::load_or_default_from(&path.to_string_lossy());
        assert!(res.is_err());
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn missing_config_file_falls_back_to_defaults() -> Result<()> {
        let path = std::env::temp_dir().join(format!("storefront_cfg_{}_missing.toml", std::process::id()));
        let cfg = AppConfig::load_or_default_from(&path.to_string_lossy())?;
        assert_eq!(cfg.storage.cart_key, "@storefront:cart");
        assert_eq!(cfg.server.worker_threads, Some(4));
        Ok(())
    }

    #[test]
    fn valid_config_file_is_honoured() -> Result<()> {
        let path = temp_config(
            "valid",
            "[catalog]\nbase_url = \"http://catalog.local\"\n[storage]\ncart_key = \"@custom\"\n",
        );
        let cfg = AppConfig::load_or_default_from(&path.to_string_lossy())?;
        assert_eq!(cfg.storage.cart_key, "@custom");
        assert_eq!(cfg.catalog.base_url, "http://catalog.local");
        let _ = std::fs::remove_file(&path);
        Ok(())
    }
}
