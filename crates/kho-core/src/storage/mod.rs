//! Durable key-value storage
//!
//! The dashboard keeps two durable records, the tab strip (`browser-tabs`)
//! and the page data cache (`tab-data-cache`). Both are whole-document JSON
//! strings written under a single key, so the backend only needs string
//! get/put/remove.

mod file_store;
mod memory_store;


pub use file_store::FileStore;
pub use memory_store::MemoryDurableStore;

use crate::error::KhoResult;
use async_trait::async_trait;
use std::sync::Arc;

/// Durable key for the serialized tab-data cache map
pub const TAB_DATA_CACHE_KEY: &str = "tab-data-cache";

/// Durable key for the serialized tab list
pub const BROWSER_TABS_KEY: &str = "browser-tabs";

/// Durable string store
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DurableStore: Send + Sync {
    /// Read the raw value stored under `key`
    async fn read(&self, key: &str) -> KhoResult<Option<String>>;

    /// Replace the value stored under `key`
    async fn write(&self, key: &str, value: &str) -> KhoResult<()>;

    /// Remove `key`; removing a missing key is not an error
    async fn remove(&self, key: &str) -> KhoResult<()>;

    /// List stored keys
    async fn keys(&self) -> KhoResult<Vec<String>>;
}

/// Shared durable store handle
pub type SharedStore = Arc<dyn DurableStore>;
