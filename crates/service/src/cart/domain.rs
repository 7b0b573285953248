use models::ProductId;

use crate::notify::{ADD_FAILED, REMOVE_FAILED, UPDATE_FAILED};

/// Input of a quantity change. `amount` is signed: non-positive values are
/// accepted and ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateProductAmount {
    pub product_id: ProductId,
    pub amount: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Add,
    Remove,
    UpdateAmount,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Add => "add",
            Operation::Remove => "remove",
            Operation::UpdateAmount => "update_amount",
        }
    }

    /// Generic message shown when the operation fails for any reason other
    /// than stock.
    pub fn failure_message(&self) -> &'static str {
        match self {
            Operation::Add => ADD_FAILED,
            Operation::Remove => REMOVE_FAILED,
            Operation::UpdateAmount => UPDATE_FAILED,
        }
    }
}
