//! Cart value and its pure transitions.
//!
//! Every transition returns a new `Cart`; the receiver is never modified, so a
//! caller can persist and publish exactly the value it computed.

use serde::{Deserialize, Serialize};

use crate::errors::ModelError;
use crate::product::{CatalogProduct, Product, ProductId};

/// Ordered cart lines; insertion order is display order and ids are unique.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart(Vec<Product>);

impl Cart {
    pub fn new() -> Self { Self(Vec::new()) }

    /// Build a cart from stored lines, rejecting duplicate ids and
    /// non-positive amounts.
    pub fn from_products(products: Vec<Product>) -> Result<Self, ModelError> {
        for (i, p) in products.iter().enumerate() {
            if p.amount <= 0 {
                return Err(ModelError::Validation(format!("product {} has amount {}", p.id, p.amount)));
            }
            if products[..i].iter().any(|q| q.id == p.id) {
                return Err(ModelError::Validation(format!("duplicate product id {} in cart", p.id)));
            }
        }
        Ok(Self(products))
    }

    /// Decode the JSON array form used by the persistent store.
    pub fn from_json(raw: &str) -> Result<Self, ModelError> {
        let products: Vec<Product> = serde_json::from_str(raw)?;
        Self::from_products(products)
    }

    pub fn to_json(&self) -> Result<String, ModelError> {
        Ok(serde_json::to_string(&self.0)?)
    }

    pub fn products(&self) -> &[Product] { &self.0 }

    pub fn len(&self) -> usize { self.0.len() }

    pub fn is_empty(&self) -> bool { self.0.is_empty() }

    pub fn find(&self, id: ProductId) -> Option<&Product> {
        self.0.iter().find(|p| p.id == id)
    }

    pub fn contains(&self, id: ProductId) -> bool { self.find(id).is_some() }

    /// Copy of the cart with the line for `id` incremented by one.
    pub fn with_incremented(&self, id: ProductId) -> Self {
        self.map_line(id, |p| p.amount += 1)
    }

    /// Copy of the cart with `product` appended as a new line of amount 1.
    pub fn with_appended(&self, product: CatalogProduct) -> Self {
        let mut lines = self.0.clone();
        lines.push(product.into_cart_line(1));
        Self(lines)
    }

    /// Copy of the cart without the line for `id`; relative order is kept.
    pub fn without(&self, id: ProductId) -> Self {
        Self(self.0.iter().filter(|p| p.id != id).cloned().collect())
    }

    /// Copy of the cart with the line for `id` set to `amount`. A missing id
    /// matches nothing and yields an equal cart.
    pub fn with_amount(&self, id: ProductId, amount: i64) -> Self {
        self.map_line(id, |p| p.amount = amount)
    }

    fn map_line(&self, id: ProductId, f: impl Fn(&mut Product)) -> Self {
        Self(
            self.0
                .iter()
                .cloned()
                .map(|mut p| {
                    if p.id == id {
                        f(&mut p);
                    }
                    p
                })
                .collect(),
        )
    }
}
