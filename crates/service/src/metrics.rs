use once_cell::sync::Lazy;
use prometheus::{register_int_counter_vec, Encoder, IntCounterVec, TextEncoder};

use crate::cart::Operation;
use crate::errors::ServiceError;

// Prometheus metrics (default registry)
pub static CART_OPERATIONS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "storefront_cart_operations_total",
        "Cart operations by operation and outcome",
        &["operation", "outcome"]
    )
    .expect("register cart_operations_total")
});

pub fn record(op: Operation, outcome: &str) {
    CART_OPERATIONS_TOTAL.with_label_values(&[op.as_str(), outcome]).inc();
}

/// Render the default registry in the text exposition format.
pub fn gather_text() -> Result<String, ServiceError> {
    // touch the lazy so the family is listed even before the first operation
    Lazy::force(&CART_OPERATIONS_TOTAL);
    let mut buf = Vec::new();
    TextEncoder::new()
        .encode(&prometheus::gather(), &mut buf)
        .map_err(|e| ServiceError::Internal(e.to_string()))?;
    String::from_utf8(buf).map_err(|e| ServiceError::Internal(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_show_up_in_exposition() -> Result<(), anyhow::Error> {
        record(Operation::Remove, "not_in_cart");
        let text = gather_text()?;
        assert!(text.contains("storefront_cart_operations_total"));
        assert!(text.contains(r#"operation="remove""#));
        Ok(())
    }
}
