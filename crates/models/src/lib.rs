//! Domain types shared by the cart service and the HTTP surface.

pub mod errors;
pub mod product;
pub mod cart;

pub use cart::Cart;
pub use product::{CatalogProduct, Product, ProductId, Stock};
