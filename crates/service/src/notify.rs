//! User-facing notices (toasts) raised by cart operations.

use std::sync::{Mutex, PoisonError};

use serde::Serialize;
use tracing::info;

pub const OUT_OF_STOCK: &str = "requested quantity out of stock";
pub const ADD_FAILED: &str = "failed to add product";
pub const REMOVE_FAILED: &str = "failed to remove product";
pub const UPDATE_FAILED: &str = "failed to change product quantity";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeKind {
    OutOfStock,
    NotInCart,
    Failure,
}

/// A transient message for the shopper. Carries no cause; causes are logged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: &'static str,
}

impl Notice {
    pub fn out_of_stock() -> Self { Self { kind: NoticeKind::OutOfStock, message: OUT_OF_STOCK } }
}

impl std::fmt::Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message)
    }
}

/// Delivery channel for notices (toast widget, log, test recorder).
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: &Notice);
}

/// Emits notices as structured log events.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notice: &Notice) {
        info!(event = "toast", kind = ?notice.kind, text = notice.message, "notice raised");
    }
}

/// Keeps every notice in memory, in order.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl RecordingNotifier {
    pub fn new() -> Self { Self::default() }

    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: &Notice) {
        self.notices.lock().unwrap_or_else(PoisonError::into_inner).push(notice.clone());
    }
}
