use std::sync::Arc;

use models::{Cart, ProductId};
use tokio::sync::RwLock;
use tracing::{debug, info, instrument, warn};

use super::domain::{Operation, UpdateProductAmount};
use super::errors::CartError;
use crate::catalog::CatalogService;
use crate::errors::ServiceError;
use crate::metrics;
use crate::notify::{Notice, Notifier};
use crate::storage::KeyValueStore;

/// Startup options for a `CartStore`.
#[derive(Debug, Clone)]
pub struct CartStoreOptions {
    /// Storage key holding the JSON cart.
    pub key: String,
    /// Start empty instead of failing when the stored cart does not parse.
    pub reset_on_corrupt: bool,
}

impl Default for CartStoreOptions {
    fn default() -> Self {
        Self { key: "@storefront:cart".into(), reset_on_corrupt: false }
    }
}

/// Shopping cart state shared by every view of a session.
///
/// Each operation first performs its catalog lookups, then, under the cart
/// lock, reads the current cart, computes the next value once, writes that
/// value to storage and only then publishes it. A failed lookup or write
/// leaves the cart untouched.
pub struct CartStore {
    catalog: Arc<dyn CatalogService>,
    storage: Arc<dyn KeyValueStore>,
    notifier: Arc<dyn Notifier>,
    key: String,
    cart: RwLock<Cart>,
}

impl CartStore {
    /// Restore the cart from `storage`, or start empty when nothing (or an
    /// empty string) is stored.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    /// use service::cart::{CartStore, CartStoreOptions};
    /// use service::catalog::mock::MockCatalog;
    /// use service::notify::RecordingNotifier;
    /// use service::storage::MemoryKvStore;
    ///
    /// let catalog = Arc::new(MockCatalog::default().with_product(1, 5));
    /// let store = tokio_test::block_on(CartStore::load(
    ///     catalog,
    ///     Arc::new(MemoryKvStore::new()),
    ///     Arc::new(RecordingNotifier::new()),
    ///     CartStoreOptions::default(),
    /// ))
    /// .unwrap();
    /// let cart = tokio_test::block_on(store.add_product(1)).unwrap();
    /// assert_eq!(cart.find(1).unwrap().amount, 1);
    /// ```
    pub async fn load(
        catalog: Arc<dyn CatalogService>,
        storage: Arc<dyn KeyValueStore>,
        notifier: Arc<dyn Notifier>,
        opts: CartStoreOptions,
    ) -> Result<Arc<Self>, ServiceError> {
        let cart = match storage.get(&opts.key).await? {
            None => Cart::new(),
            Some(raw) if raw.trim().is_empty() => Cart::new(),
            Some(raw) => match Cart::from_json(&raw) {
                Ok(cart) => cart,
                Err(e) if opts.reset_on_corrupt => {
                    warn!(key = %opts.key, error = %e, "stored cart unreadable; starting empty");
                    Cart::new()
                }
                Err(e) => return Err(ServiceError::CorruptCart(e.to_string())),
            },
        };
        info!(key = %opts.key, items = cart.len(), "cart restored");
        Ok(Arc::new(Self { catalog, storage, notifier, key: opts.key, cart: RwLock::new(cart) }))
    }

    /// Snapshot of the current cart.
    pub async fn cart(&self) -> Cart {
        self.cart.read().await.clone()
    }

    /// Add one unit of `product_id`, appending a new line when it is not in the cart yet.
    #[instrument(skip(self))]
    pub async fn add_product(&self, product_id: ProductId) -> Result<Cart, Notice> {
        let res = self.try_add(product_id).await;
        self.finish(Operation::Add, res)
    }

    /// Drop the line for `product_id`. Removing an absent product is an error.
    #[instrument(skip(self))]
    pub async fn remove_product(&self, product_id: ProductId) -> Result<Cart, Notice> {
        let res = self.try_remove(product_id).await;
        self.finish(Operation::Remove, res)
    }

    /// Set the quantity of a line. Non-positive amounts are ignored without a
    /// notice and without consulting the catalog.
    #[instrument(skip(self))]
    pub async fn update_product_amount(&self, input: UpdateProductAmount) -> Result<Cart, Notice> {
        if input.amount <= 0 {
            debug!(event = "cart_update_ignored", product_id = input.product_id, amount = input.amount);
            return Ok(self.cart().await);
        }
        let res = self.try_update(input).await;
        self.finish(Operation::UpdateAmount, res)
    }

    async fn try_add(&self, product_id: ProductId) -> Result<Cart, CartError> {
        let product = self.catalog.fetch_product(product_id).await?;
        let stock = self.catalog.fetch_stock(product_id).await?;
        if product.id != product_id {
            return Err(ServiceError::Catalog(format!("asked for product {product_id}, got {}", product.id)).into());
        }

        let mut cart = self.cart.write().await;
        let next = match cart.find(product_id) {
            Some(line) if stock.amount > line.amount => cart.with_incremented(product_id),
            Some(line) => {
                return Err(CartError::OutOfStock {
                    product_id,
                    requested: line.amount.saturating_add(1),
                    available: stock.amount,
                })
            }
            None if stock.amount > 0 => cart.with_appended(product),
            None => return Err(CartError::OutOfStock { product_id, requested: 1, available: stock.amount }),
        };
        self.commit(&mut cart, next).await
    }

    async fn try_remove(&self, product_id: ProductId) -> Result<Cart, CartError> {
        let mut cart = self.cart.write().await;
        if !cart.contains(product_id) {
            return Err(CartError::NotInCart(product_id));
        }
        let next = cart.without(product_id);
        self.commit(&mut cart, next).await
    }

    async fn try_update(&self, input: UpdateProductAmount) -> Result<Cart, CartError> {
        let UpdateProductAmount { product_id, amount } = input;
        let stock = self.catalog.fetch_stock(product_id).await?;
        if stock.amount <= 0 || stock.amount < amount {
            return Err(CartError::OutOfStock { product_id, requested: amount, available: stock.amount });
        }

        let mut cart = self.cart.write().await;
        let next = cart.with_amount(product_id, amount);
        self.commit(&mut cart, next).await
    }

    /// Persist `next`, then publish it. Both sides see the same value.
    async fn commit(&self, current: &mut Cart, next: Cart) -> Result<Cart, CartError> {
        let raw = next.to_json().map_err(ServiceError::from)?;
        self.storage.set(&self.key, raw).await?;
        *current = next.clone();
        Ok(next)
    }

    fn finish(&self, op: Operation, res: Result<Cart, CartError>) -> Result<Cart, Notice> {
        match res {
            Ok(cart) => {
                metrics::record(op, "ok");
                info!(event = "cart_updated", operation = op.as_str(), items = cart.len());
                Ok(cart)
            }
            Err(err) => {
                metrics::record(op, err.outcome());
                match &err {
                    CartError::OutOfStock { .. } => info!(event = "cart_out_of_stock", operation = op.as_str(), reason = %err),
                    _ => warn!(event = "cart_operation_failed", operation = op.as_str(), error = %err),
                }
                let notice = err.notice(op);
                self.notifier.notify(&notice);
                Err(notice)
            }
        }
    }
}
