//! Catalog and stock lookups.
//!
//! The cart consults the catalog on every add and quantity change; nothing is
//! cached between operations.

pub mod file;
pub mod http;

use async_trait::async_trait;
use models::{CatalogProduct, ProductId, Stock};

use crate::errors::ServiceError;

pub use file::FileCatalog;
pub use http::HttpCatalog;

/// Source of product metadata and authoritative stock figures.
#[async_trait]
pub trait CatalogService: Send + Sync {
    async fn fetch_product(&self, id: ProductId) -> Result<CatalogProduct, ServiceError>;
    async fn fetch_stock(&self, id: ProductId) -> Result<Stock, ServiceError>;
}

/// Simple in-memory mock catalog for tests and doc examples
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::{Mutex, PoisonError};

    #[derive(Default)]
    pub struct MockCatalog {
        products: Mutex<HashMap<ProductId, CatalogProduct>>,
        stock: Mutex<HashMap<ProductId, i64>>,
        unavailable: AtomicBool,
        stock_calls: AtomicUsize,
    }

    impl MockCatalog {
        /// Register a product titled `Product {id}` with the given stock.
        pub fn with_product(self, id: ProductId, stock: i64) -> Self {
            let product = CatalogProduct {
                id,
                title: format!("Product {id}"),
                image: format!("https://cdn.example.com/products/{id}.jpg"),
                price: 99.9,
            };
            self.products.lock().unwrap_or_else(PoisonError::into_inner).insert(id, product);
            self.set_stock(id, stock);
            self
        }

        pub fn set_stock(&self, id: ProductId, amount: i64) {
            self.stock.lock().unwrap_or_else(PoisonError::into_inner).insert(id, amount);
        }

        /// Make every lookup fail as if the service were unreachable.
        pub fn set_unavailable(&self, unavailable: bool) {
            self.unavailable.store(unavailable, Ordering::SeqCst);
        }

        /// Number of stock lookups served so far.
        pub fn stock_calls(&self) -> usize {
            self.stock_calls.load(Ordering::SeqCst)
        }

        fn check_available(&self) -> Result<(), ServiceError> {
            if self.unavailable.load(Ordering::SeqCst) {
                return Err(ServiceError::Catalog("connection refused".into()));
            }
            Ok(())
        }
    }

    #[async_trait]
    impl CatalogService for MockCatalog {
        async fn fetch_product(&self, id: ProductId) -> Result<CatalogProduct, ServiceError> {
            self.check_available()?;
            let products = self.products.lock().unwrap_or_else(PoisonError::into_inner);
            products.get(&id).cloned().ok_or_else(|| ServiceError::not_found("product"))
        }

        async fn fetch_stock(&self, id: ProductId) -> Result<Stock, ServiceError> {
            self.stock_calls.fetch_add(1, Ordering::SeqCst);
            self.check_available()?;
            // yield so concurrent operations interleave at the network boundary
            tokio::task::yield_now().await;
            let stock = self.stock.lock().unwrap_or_else(PoisonError::into_inner);
            stock
                .get(&id)
                .map(|amount| Stock { id, amount: *amount })
                .ok_or_else(|| ServiceError::not_found("stock"))
        }
    }
}
