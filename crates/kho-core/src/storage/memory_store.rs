//! In-process durable store, for tests and ephemeral sessions

use super::DurableStore;
use crate::error::KhoResult;
use async_trait::async_trait;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

/// Durable store that lives only as long as the process
#[derive(Debug, Default)]
pub struct MemoryDurableStore {
    values: RwLock<BTreeMap<String, String>>,
}

impl MemoryDurableStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with `entries`
    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            values: RwLock::new(
                entries
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }
}

#[async_trait]
impl DurableStore for MemoryDurableStore {
    async fn read(&self, key: &str) -> KhoResult<Option<String>> {
        Ok(self.values.read().await.get(key).cloned())
    }

    async fn write(&self, key: &str, value: &str) -> KhoResult<()> {
        self.values
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> KhoResult<()> {
        self.values.write().await.remove(key);
        Ok(())
    }

    async fn keys(&self) -> KhoResult<Vec<String>> {
        Ok(self.values.read().await.keys().cloned().collect())
    }
}
