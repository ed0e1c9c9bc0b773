//! Cache types and data structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Entry held by the in-memory LRU store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryEntry {
    /// Key the entry is stored under
    pub key: String,
    /// Cached value
    pub value: serde_json::Value,
    /// When the entry was written
    pub created_at: DateTime<Utc>,
    /// Last read or write
    pub last_accessed: DateTime<Utc>,
    /// Number of reads served from this entry
    pub access_count: u64,
    /// Estimated size (serialized JSON length)
    pub size_bytes: usize,
}

impl MemoryEntry {
    /// Create a new entry stamped with `now`
    pub fn new(
        key: String,
        value: serde_json::Value,
        size_bytes: usize,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            key,
            value,
            created_at: now,
            last_accessed: now,
            access_count: 0,
            size_bytes,
        }
    }

    /// Whether the entry is older than `ttl` at `now`
    pub fn is_expired(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        match chrono::Duration::from_std(ttl) {
            Ok(ttl) => now.signed_duration_since(self.created_at) > ttl,
            Err(_) => false,
        }
    }

    /// Mark the entry as accessed
    pub fn mark_accessed(&mut self, now: DateTime<Utc>) {
        self.access_count += 1;
        self.last_accessed = now;
    }
}

/// Estimate the in-memory footprint of a value by its JSON length
pub fn estimate_size(value: &serde_json::Value) -> usize {
    value.to_string().len()
}

/// Statistics for the in-memory LRU store
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MemoryStats {
    /// Number of entries currently held
    pub entries: usize,
    /// Sum of estimated entry sizes
    pub total_size_bytes: usize,
    /// Configured size ceiling
    pub max_size_bytes: usize,
    /// Configured entry ceiling
    pub max_entries: usize,
    /// Reads that returned a value
    pub hits: u64,
    /// Reads that returned nothing
    pub misses: u64,
    /// Entries removed to make room
    pub evictions: u64,
    /// Entries removed for exceeding the TTL
    pub expirations: u64,
    /// Values refused for being larger than half the size ceiling
    pub rejected: u64,
}

impl MemoryStats {
    /// Calculate hit rate
    pub fn hit_rate(&self) -> f64 {
        let total_requests = self.hits + self.misses;
        if total_requests == 0 {
            0.0
        } else {
            self.hits as f64 / total_requests as f64
        }
    }

    /// Fraction of the size ceiling in use
    pub fn size_utilization(&self) -> f64 {
        if self.max_size_bytes == 0 {
            0.0
        } else {
            self.total_size_bytes as f64 / self.max_size_bytes as f64
        }
    }
}

/// Entry held by the durable tab data cache
///
/// Serialized as `{"data": .., "timestamp": <ms since epoch>, "path": ..}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TabDataEntry {
    /// Cached value
    pub data: serde_json::Value,
    /// Creation time in milliseconds since the Unix epoch
    pub timestamp: i64,
    /// Route the value was fetched for
    pub path: String,
}

impl TabDataEntry {
    /// Create an entry stamped at `timestamp`
    pub fn new(data: serde_json::Value, path: impl Into<String>, timestamp: i64) -> Self {
        Self {
            data,
            timestamp,
            path: path.into(),
        }
    }

    /// Whether the entry is older than `stale_after` at `now_millis`
    pub fn is_stale(&self, now_millis: i64, stale_after: Duration) -> bool {
        let stale_after = i64::try_from(stale_after.as_millis()).unwrap_or(i64::MAX);
        now_millis.saturating_sub(self.timestamp) > stale_after
    }

    /// Age of the entry at `now_millis`
    pub fn age(&self, now_millis: i64) -> Duration {
        Duration::from_millis(now_millis.saturating_sub(self.timestamp).max(0) as u64)
    }
}

/// Statistics for the durable tab data cache
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TabDataStats {
    /// Entries in the mirror, stale ones included
    pub entries: usize,
    /// Entries that would be dropped on their next read
    pub stale_entries: usize,
    /// Whether a debounced write has not happened yet
    pub pending_write: bool,
}
