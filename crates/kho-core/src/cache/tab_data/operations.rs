//! TabDataCache operations

use super::persistence::{DebouncedWriter, EntryMap, load_entries};
use crate::cache::types::{TabDataEntry, TabDataStats};
use crate::clock::SharedClock;
use crate::config::TabDataConfig;
use crate::error::KhoResult;
use crate::storage::SharedStore;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// Durable cache of fetched page data, keyed by composite key
pub struct TabDataCache {
    config: TabDataConfig,
    clock: SharedClock,
    entries: Arc<RwLock<EntryMap>>,
    writer: DebouncedWriter,
}

impl std::fmt::Debug for TabDataCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TabDataCache")
            .field("config", &self.config)
            .field("writer", &self.writer)
            .finish_non_exhaustive()
    }
}

impl TabDataCache {
    /// Read the durable map once, dropping entries that are already stale
    pub async fn load(store: SharedStore, clock: SharedClock, config: TabDataConfig) -> Self {
        let now = clock.now_millis();
        let mut entries = load_entries(&store).await;

        let before = entries.len();
        entries.retain(|_, entry| !entry.is_stale(now, config.stale_after));
        if entries.len() < before {
            debug!("Dropped {} stale tab data entries on load", before - entries.len());
        }

        let entries = Arc::new(RwLock::new(entries));
        let writer = DebouncedWriter::new(store, entries.clone(), config.debounce);

        Self {
            config,
            clock,
            entries,
            writer,
        }
    }

    /// Store `value` under `key`, remembering the route it was fetched for
    pub async fn set_tab_data(
        &self,
        key: impl Into<String>,
        value: Value,
        path: impl Into<String>,
    ) {
        let key = key.into();
        let entry = TabDataEntry::new(value, path, self.clock.now_millis());
        self.entries.write().await.insert(key.clone(), entry);
        debug!("Cached tab data for {}", key);
        self.writer.schedule();
    }

    /// Cached value for `key`, or `None` if absent or stale
    pub async fn get_tab_data(&self, key: &str) -> Option<Value> {
        self.get_tab_entry(key).await.map(|entry| entry.data)
    }

    /// Cached entry for `key` with its timestamp and origin path
    ///
    /// A stale entry is deleted and persistence is scheduled.
    pub async fn get_tab_entry(&self, key: &str) -> Option<TabDataEntry> {
        let now = self.clock.now_millis();

        {
            let entries = self.entries.read().await;
            match entries.get(key) {
                None => return None,
                Some(entry) if !entry.is_stale(now, self.config.stale_after) => {
                    return Some(entry.clone());
                }
                Some(_) => {}
            }
        }

        let removed = {
            let mut entries = self.entries.write().await;
            // Re-check: another writer may have refreshed the entry meanwhile
            match entries.get(key) {
                Some(entry) if entry.is_stale(now, self.config.stale_after) => {
                    entries.remove(key);
                    true
                }
                Some(entry) => return Some(entry.clone()),
                None => false,
            }
        };

        if removed {
            debug!("Dropped stale tab data for {}", key);
            self.writer.schedule();
        }
        None
    }

    /// Remove one entry; returns whether it existed
    pub async fn clear_tab_data(&self, key: &str) -> bool {
        let removed = self.entries.write().await.remove(key).is_some();
        if removed {
            self.writer.schedule();
        }
        removed
    }

    /// Remove every entry
    pub async fn clear_all_tab_data(&self) {
        self.entries.write().await.clear();
        self.writer.schedule();
    }

    /// Remove every stale entry now; returns how many were removed
    pub async fn prune_stale(&self) -> usize {
        let now = self.clock.now_millis();
        let removed = {
            let mut entries = self.entries.write().await;
            let before = entries.len();
            entries.retain(|_, entry| !entry.is_stale(now, self.config.stale_after));
            before - entries.len()
        };
        if removed > 0 {
            self.writer.schedule();
        }
        removed
    }

    /// Write the map to durable storage immediately
    pub async fn flush(&self) -> KhoResult<()> {
        self.writer.flush().await
    }

    /// Number of entries, stale ones included
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Whether the cache holds no entries
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Cached keys in sorted order
    pub async fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.entries.read().await.keys().cloned().collect();
        keys.sort();
        keys
    }

    /// Every entry sorted by key, stale ones included
    ///
    /// Unlike [`TabDataCache::get_tab_entry`] this never removes anything.
    pub async fn entries(&self) -> Vec<(String, TabDataEntry)> {
        let mut entries: Vec<(String, TabDataEntry)> = self
            .entries
            .read()
            .await
            .iter()
            .map(|(key, entry)| (key.clone(), entry.clone()))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        entries
    }

    /// Whether `entry` is past the configured staleness window now
    pub fn is_stale(&self, entry: &TabDataEntry) -> bool {
        entry.is_stale(self.clock.now_millis(), self.config.stale_after)
    }

    /// Snapshot of the cache's statistics
    pub async fn stats(&self) -> TabDataStats {
        let now = self.clock.now_millis();
        let entries = self.entries.read().await;
        TabDataStats {
            entries: entries.len(),
            stale_entries: entries
                .values()
                .filter(|entry| entry.is_stale(now, self.config.stale_after))
                .count(),
            pending_write: self.writer.has_pending(),
        }
    }

    /// Configured staleness and debounce settings
    pub fn config(&self) -> &TabDataConfig {
        &self.config
    }
}
