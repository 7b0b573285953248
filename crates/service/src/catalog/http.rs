use std::time::Duration;

use async_trait::async_trait;
use models::{CatalogProduct, ProductId, Stock};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use tracing::debug;

use super::CatalogService;
use crate::errors::ServiceError;

/// Catalog client for a json-server style API:
/// `GET {base}/products/{id}` and `GET {base}/stock/{id}`.
#[derive(Clone)]
pub struct HttpCatalog {
    client: reqwest::Client,
    base_url: String,
}

impl HttpCatalog {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ServiceError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ServiceError::Catalog(e.to_string()))?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str { &self.base_url }

    async fn get_json<T: DeserializeOwned>(&self, entity: &str, path: String) -> Result<T, ServiceError> {
        let url = format!("{}/{}", self.base_url, path);
        debug!(%url, "catalog request");
        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ServiceError::Catalog(e.to_string()))?;
        if resp.status() == StatusCode::NOT_FOUND {
            return Err(ServiceError::not_found(entity));
        }
        let resp = resp.error_for_status().map_err(|e| ServiceError::Catalog(e.to_string()))?;
        resp.json::<T>()
            .await
            .map_err(|e| ServiceError::Catalog(format!("malformed {entity} response: {e}")))
    }
}

#[async_trait]
impl CatalogService for HttpCatalog {
    async fn fetch_product(&self, id: ProductId) -> Result<CatalogProduct, ServiceError> {
        self.get_json("product", format!("products/{id}")).await
    }

    async fn fetch_stock(&self, id: ProductId) -> Result<Stock, ServiceError> {
        self.get_json("stock", format!("stock/{id}")).await
    }
}
