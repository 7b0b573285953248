use std::path::Path;

use async_trait::async_trait;
use models::{CatalogProduct, ProductId, Stock};
use serde::Deserialize;
use tracing::info;

use super::CatalogService;
use crate::errors::ServiceError;

/// On-disk fixture: `{ "products": [...], "stock": [...] }`.
#[derive(Debug, Default, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    products: Vec<CatalogProduct>,
    #[serde(default)]
    stock: Vec<Stock>,
}

/// Read-only catalog loaded once from a JSON fixture.
#[derive(Debug, Default)]
pub struct FileCatalog {
    products: Vec<CatalogProduct>,
    stock: Vec<Stock>,
}

impl FileCatalog {
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, ServiceError> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| ServiceError::Catalog(format!("cannot read {}: {e}", path.display())))?;
        let catalog = Self::from_json(&bytes)?;
        info!(path = %path.display(), products = catalog.products.len(), "catalog fixture loaded");
        Ok(catalog)
    }

    pub fn from_json(bytes: &[u8]) -> Result<Self, ServiceError> {
        let file: CatalogFile =
            serde_json::from_slice(bytes).map_err(|e| ServiceError::Catalog(format!("invalid catalog fixture: {e}")))?;
        Ok(Self { products: file.products, stock: file.stock })
    }

    pub fn products(&self) -> &[CatalogProduct] { &self.products }

    pub fn product(&self, id: ProductId) -> Option<&CatalogProduct> {
        self.products.iter().find(|p| p.id == id)
    }

    pub fn stock(&self, id: ProductId) -> Option<Stock> {
        self.stock.iter().find(|s| s.id == id).copied()
    }
}

#[async_trait]
impl CatalogService for FileCatalog {
    async fn fetch_product(&self, id: ProductId) -> Result<CatalogProduct, ServiceError> {
        self.product(id).cloned().ok_or_else(|| ServiceError::not_found("product"))
    }

    async fn fetch_stock(&self, id: ProductId) -> Result<Stock, ServiceError> {
        self.stock(id).ok_or_else(|| ServiceError::not_found("stock"))
    }
}
