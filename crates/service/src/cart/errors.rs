use models::ProductId;
use thiserror::Error;

use super::domain::Operation;
use crate::errors::ServiceError;
use crate::notify::{Notice, NoticeKind};

/// Why a cart operation did not change the cart.
#[derive(Debug, Error)]
pub enum CartError {
    #[error("product {product_id}: requested {requested}, {available} in stock")]
    OutOfStock { product_id: ProductId, requested: i64, available: i64 },
    #[error("product {0} is not in the cart")]
    NotInCart(ProductId),
    #[error(transparent)]
    Service(#[from] ServiceError),
}

impl CartError {
    /// Map to the notice shown for `op`. Only stock rejections keep their own
    /// message; everything else collapses into the operation's generic failure.
    pub fn notice(&self, op: Operation) -> Notice {
        match self {
            CartError::OutOfStock { .. } => Notice::out_of_stock(),
            CartError::NotInCart(_) => Notice { kind: NoticeKind::NotInCart, message: op.failure_message() },
            CartError::Service(_) => Notice { kind: NoticeKind::Failure, message: op.failure_message() },
        }
    }

    /// Stable label for metrics
    pub fn outcome(&self) -> &'static str {
        match self {
            CartError::OutOfStock { .. } => "out_of_stock",
            CartError::NotInCart(_) => "not_in_cart",
            CartError::Service(_) => "failed",
        }
    }
}
