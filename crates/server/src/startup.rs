use std::{net::SocketAddr, sync::Arc, time::Duration};

use axum::Router;
use configs::AppConfig;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use crate::errors::StartupError;
use crate::routes;
use crate::state::AppState;
use service::{
    cart::{CartStore, CartStoreOptions},
    catalog::{FileCatalog, HttpCatalog},
    notify::TracingNotifier,
    runtime,
    storage::FileKvStore,
};

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Wire the cart store (and the optional local catalog) from configuration.
pub async fn build_state(cfg: &AppConfig) -> Result<AppState, StartupError> {
    let catalog_fixture = cfg.catalog.serve_local.then_some(cfg.catalog.data_path.as_str());
    runtime::ensure_env(&cfg.storage.path, catalog_fixture).await?;

    let storage = FileKvStore::new(&cfg.storage.path, cfg.storage.reset_on_corrupt).await?;
    let catalog = HttpCatalog::new(&cfg.catalog.base_url, Duration::from_secs(cfg.catalog.timeout_secs))?;
    info!(catalog = %catalog.base_url(), storage = %cfg.storage.path, "cart collaborators ready");

    let opts = CartStoreOptions {
        key: cfg.storage.cart_key.clone(),
        reset_on_corrupt: cfg.storage.reset_on_corrupt,
    };
    let cart = CartStore::load(Arc::new(catalog), storage, Arc::new(TracingNotifier), opts).await?;

    let local_catalog = match catalog_fixture {
        Some(path) => match FileCatalog::load(path).await {
            Ok(c) => Some(Arc::new(c)),
            Err(e) => {
                warn!(error = %e, "local catalog disabled");
                None
            }
        },
        None => None,
    };

    Ok(AppState { cart, local_catalog })
}

/// Build the router for a ready state.
pub fn build_app(state: AppState) -> Router {
    routes::build_router(state, build_cors())
}

fn bind_addr(cfg: &AppConfig) -> Result<SocketAddr, StartupError> {
    format!("{}:{}", cfg.server.host, cfg.server.port)
        .parse()
        .map_err(|e| StartupError::InvalidConfig(format!("server address: {e}")))
}

/// Public entry: build the app from a loaded configuration and run the HTTP server
pub async fn run(cfg: AppConfig) -> anyhow::Result<()> {
    let state = build_state(&cfg).await?;
    let app = build_app(state);

    let addr = bind_addr(&cfg)?;
    info!(%addr, "starting storefront server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bind_addr_from_config() {
        let mut cfg = AppConfig::default();
        cfg.server.host = "0.0.0.0".into();
        cfg.server.port = 9100;
        assert_eq!(bind_addr(&cfg).unwrap().port(), 9100);

        cfg.server.host = "not a host".into();
        assert!(matches!(bind_addr(&cfg), Err(StartupError::InvalidConfig(_))));
    }

    fn config_with_storage(path: &std::path::Path, reset_on_corrupt: bool) -> AppConfig {
        let mut cfg = AppConfig::default();
        cfg.catalog.base_url = "http://127.0.0.1:9".into();
        cfg.storage.path = path.to_string_lossy().into_owned();
        cfg.storage.reset_on_corrupt = reset_on_corrupt;
        cfg
    }

    #[tokio::test]
    async fn half_written_storage_file_honours_reset_on_corrupt() -> anyhow::Result<()> {
        let dir = std::env::temp_dir().join(format!("storefront_startup_{}", uuid::Uuid::new_v4()));
        tokio::fs::create_dir_all(&dir).await?;
        let path = dir.join("storage.json");
        tokio::fs::write(&path, br#"{"@storefront:cart": "[{"#).await?;

        let res = build_state(&config_with_storage(&path, false)).await;
        assert!(matches!(res, Err(StartupError::Service(service::errors::ServiceError::CorruptStorage(_)))));

        let state = build_state(&config_with_storage(&path, true)).await?;
        assert!(state.cart.cart().await.is_empty());

        let _ = tokio::fs::remove_dir_all(&dir).await;
        Ok(())
    }
}
