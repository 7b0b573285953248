#![cfg(test)]
use std::sync::Arc;

use models::{Cart, Product, ProductId};

use crate::cart::{CartStore, CartStoreOptions};
use crate::catalog::mock::MockCatalog;
use crate::notify::RecordingNotifier;
use crate::storage::{KeyValueStore, MemoryKvStore};

/// Cart line as `MockCatalog::with_product` would produce it.
pub fn line(id: ProductId, amount: i64) -> Product {
    Product {
        id,
        title: format!("Product {id}"),
        image: format!("https://cdn.example.com/products/{id}.jpg"),
        price: 99.9,
        amount,
    }
}

pub fn cart_of(lines: Vec<Product>) -> Cart {
    Cart::from_products(lines).expect("unique ids")
}

/// A cart store wired to in-memory collaborators, with handles kept for assertions.
pub struct Fixture {
    pub store: Arc<CartStore>,
    pub catalog: Arc<MockCatalog>,
    pub storage: Arc<MemoryKvStore>,
    pub notifier: Arc<RecordingNotifier>,
}

impl Fixture {
    /// Seed storage with `initial` (unless empty) and load a store from it.
    pub async fn new(catalog: MockCatalog, initial: Cart) -> Result<Self, anyhow::Error> {
        let key = CartStoreOptions::default().key;
        let storage = Arc::new(if initial.is_empty() {
            MemoryKvStore::new()
        } else {
            MemoryKvStore::with_entry(&key, initial.to_json()?)
        });
        let catalog = Arc::new(catalog);
        let notifier = Arc::new(RecordingNotifier::new());
        let store = CartStore::load(catalog.clone(), storage.clone(), notifier.clone(), CartStoreOptions::default()).await?;
        Ok(Self { store, catalog, storage, notifier })
    }

    /// The cart as currently stored under the default key.
    pub async fn persisted(&self) -> Result<Cart, anyhow::Error> {
        let raw = self.storage.get(&CartStoreOptions::default().key).await?.unwrap_or_else(|| "[]".into());
        Ok(Cart::from_json(&raw)?)
    }
}
