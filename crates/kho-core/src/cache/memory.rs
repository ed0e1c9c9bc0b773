//! In-memory LRU store bounded by entry count and estimated size

use super::types::{MemoryEntry, MemoryStats, estimate_size};
use crate::clock::SharedClock;
use crate::config::MemoryConfig;
use lru::LruCache;
use serde_json::Value;
use std::sync::{Arc, Weak};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Mutable state behind the store's lock
#[derive(Debug)]
struct MemoryInner {
    /// Recency-ordered entries; the LRU end has the oldest `last_accessed`
    entries: LruCache<String, MemoryEntry>,
    /// Sum of `size_bytes` over `entries`
    total_size: usize,
    stats: MemoryStats,
}

impl MemoryInner {
    fn remove(&mut self, key: &str) -> Option<MemoryEntry> {
        let entry = self.entries.pop(key)?;
        self.total_size = self.total_size.saturating_sub(entry.size_bytes);
        Some(entry)
    }
}

/// Size-bounded in-memory cache in front of the durable tab data cache
#[derive(Debug)]
pub struct MemoryStore {
    config: MemoryConfig,
    clock: SharedClock,
    inner: Mutex<MemoryInner>,
}

impl MemoryStore {
    /// Create an empty store with the given limits
    pub fn new(config: MemoryConfig, clock: SharedClock) -> Self {
        let stats = MemoryStats {
            max_size_bytes: config.max_size_bytes,
            max_entries: config.max_entries,
            ..Default::default()
        };

        Self {
            config,
            clock,
            inner: Mutex::new(MemoryInner {
                // Capacity is enforced by `set`, which also accounts for size
                entries: LruCache::unbounded(),
                total_size: 0,
                stats,
            }),
        }
    }

    /// Configured limits
    pub fn config(&self) -> &MemoryConfig {
        &self.config
    }

    /// Get a value, refreshing its recency
    ///
    /// Entries older than the TTL are removed and reported as a miss.
    pub async fn get(&self, key: &str) -> Option<Value> {
        let now = self.clock.now();
        let mut inner = self.inner.lock().await;

        let expired = match inner.entries.peek(key) {
            Some(entry) => entry.is_expired(now, self.config.ttl),
            None => {
                inner.stats.misses += 1;
                return None;
            }
        };

        if expired {
            inner.remove(key);
            inner.stats.expirations += 1;
            inner.stats.misses += 1;
            debug!("Memory cache entry expired: {}", key);
            return None;
        }

        let value = inner.entries.get_mut(key).map(|entry| {
            entry.mark_accessed(now);
            entry.value.clone()
        });
        if value.is_some() {
            inner.stats.hits += 1;
        } else {
            inner.stats.misses += 1;
        }
        value
    }

    /// Store a value, evicting least recently accessed entries to make room
    ///
    /// Returns `false` without storing anything when the value's estimated
    /// size exceeds half of `max_size_bytes`.
    pub async fn set(&self, key: impl Into<String>, value: Value) -> bool {
        let key = key.into();
        let size = estimate_size(&value);

        if size > self.config.max_value_bytes() {
            warn!(
                "Refusing to cache {}: {} bytes exceeds the {} byte limit",
                key,
                size,
                self.config.max_value_bytes()
            );
            self.inner.lock().await.stats.rejected += 1;
            return false;
        }

        let now = self.clock.now();
        let mut inner = self.inner.lock().await;

        // Replacing a key must not count its old size against the new value
        inner.remove(&key);

        while (inner.total_size + size > self.config.max_size_bytes
            || inner.entries.len() + 1 > self.config.max_entries)
            && !inner.entries.is_empty()
        {
            let Some((evicted_key, evicted)) = inner.entries.pop_lru() else {
                break;
            };
            inner.total_size = inner.total_size.saturating_sub(evicted.size_bytes);
            inner.stats.evictions += 1;
            debug!(
                "Evicted {} ({} bytes, last accessed {})",
                evicted_key, evicted.size_bytes, evicted.last_accessed
            );
        }

        inner
            .entries
            .put(key.clone(), MemoryEntry::new(key, value, size, now));
        inner.total_size += size;
        true
    }

    /// Remove a key; returns whether it was present
    pub async fn delete(&self, key: &str) -> bool {
        self.inner.lock().await.remove(key).is_some()
    }

    /// Remove every entry; counters are kept
    pub async fn clear(&self) {
        let mut inner = self.inner.lock().await;
        inner.entries.clear();
        inner.total_size = 0;
    }

    /// Whether `key` is present, without touching its recency
    pub async fn contains(&self, key: &str) -> bool {
        self.inner.lock().await.entries.contains(key)
    }

    /// Keys from most to least recently accessed
    pub async fn keys(&self) -> Vec<String> {
        self.inner
            .lock()
            .await
            .entries
            .iter()
            .map(|(k, _)| k.clone())
            .collect()
    }

    /// Number of entries
    pub async fn len(&self) -> usize {
        self.inner.lock().await.entries.len()
    }

    /// Whether the store holds no entries
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Snapshot of the store's statistics
    pub async fn stats(&self) -> MemoryStats {
        let inner = self.inner.lock().await;
        MemoryStats {
            entries: inner.entries.len(),
            total_size_bytes: inner.total_size,
            ..inner.stats.clone()
        }
    }

    /// Remove every entry older than the TTL; returns how many were removed
    pub async fn cleanup(&self) -> usize {
        let now = self.clock.now();
        let mut inner = self.inner.lock().await;

        let expired: Vec<String> = inner
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired(now, self.config.ttl))
            .map(|(k, _)| k.clone())
            .collect();

        for key in &expired {
            inner.remove(key);
        }
        inner.stats.expirations += expired.len() as u64;

        if !expired.is_empty() {
            debug!("Memory cache cleanup removed {} entries", expired.len());
        }
        expired.len()
    }

    /// Run `cleanup` every `cleanup_interval` until the store is dropped
    pub fn spawn_cleanup(self: &Arc<Self>) -> JoinHandle<()> {
        let store: Weak<Self> = Arc::downgrade(self);
        let period = self.config.cleanup_interval;

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            // The first tick completes immediately
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let Some(store) = store.upgrade() else {
                    break;
                };
                store.cleanup().await;
            }
        })
    }
}
