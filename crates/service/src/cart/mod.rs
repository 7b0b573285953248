//! Cart module: domain inputs, business errors and the `CartStore` service.

pub mod domain;
pub mod errors;
pub mod service;

pub use domain::{Operation, UpdateProductAmount};
pub use errors::CartError;
pub use service::{CartStore, CartStoreOptions};
