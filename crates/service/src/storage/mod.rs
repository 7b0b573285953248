//! Storage abstractions for the service layer
//!
//! The cart is persisted through a small string key-value interface so the
//! backing medium (JSON file on disk, in-memory map in tests) can be swapped.

pub mod json_map_store;
pub mod kv_store;

pub use kv_store::{FileKvStore, KeyValueStore, MemoryKvStore};
