use serde::{Deserialize, Serialize};

pub type ProductId = u64;

/// A cart line: catalog fields plus the quantity held in the cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    pub image: String,
    pub price: f64,
    pub amount: i64,
}

/// Product metadata as served by the catalog, without a cart quantity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogProduct {
    pub id: ProductId,
    pub title: String,
    pub image: String,
    pub price: f64,
}

impl CatalogProduct {
    pub fn into_cart_line(self, amount: i64) -> Product {
        Product { id: self.id, title: self.title, image: self.image, price: self.price, amount }
    }
}

/// Units available for a product, as reported by the stock endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stock {
    pub id: ProductId,
    pub amount: i64,
}
