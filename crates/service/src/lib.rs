//! Service layer for the storefront cart.
//! - `cart` holds the cart state and its three operations.
//! - `catalog` and `storage` are the collaborators it is wired to, behind traits.
//! - `notify` carries user-facing notices; `metrics` counts outcomes.

pub mod errors;
pub mod cart;
pub mod catalog;
pub mod metrics;
pub mod notify;
pub mod runtime;
pub mod storage;
#[cfg(test)]
pub mod test_support;
