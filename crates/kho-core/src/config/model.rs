//! Configuration model

use super::logging_config::LoggingConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Default directory name under the home directory
const DEFAULT_DATA_DIR: &str = ".kho";

/// Root configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KhoConfig {
    /// Durable storage location
    pub storage: StorageConfig,
    /// In-memory LRU store limits
    pub memory: MemoryConfig,
    /// Durable tab-data cache behavior
    pub tab_data: TabDataConfig,
    /// Tab strip behavior
    pub tabs: TabsConfig,
    /// Logging
    pub logging: LoggingConfig,
}

/// Where durable records are kept
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding one JSON file per durable key
    pub data_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(DEFAULT_DATA_DIR),
        }
    }
}

/// Limits for the in-memory LRU store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryConfig {
    /// Ceiling on the total estimated size of all entries
    pub max_size_bytes: usize,
    /// Ceiling on the number of entries
    pub max_entries: usize,
    /// Entries older than this are dropped
    #[serde(with = "humantime_serde")]
    pub ttl: Duration,
    /// How often the background cleanup runs
    #[serde(with = "humantime_serde")]
    pub cleanup_interval: Duration,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            max_size_bytes: 50 * 1024 * 1024, // 50MB
            max_entries: 1000,
            ttl: Duration::from_secs(30 * 60),              // 30 minutes
            cleanup_interval: Duration::from_secs(5 * 60), // 5 minutes
        }
    }
}

impl MemoryConfig {
    /// Largest single value `set` will accept
    pub fn max_value_bytes(&self) -> usize {
        self.max_size_bytes / 2
    }
}

/// Durable tab-data cache behavior
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TabDataConfig {
    /// Entries older than this are stale and dropped on read
    #[serde(with = "humantime_serde")]
    pub stale_after: Duration,
    /// Quiet period before the cache map is written out
    #[serde(with = "humantime_serde")]
    pub debounce: Duration,
}

impl Default for TabDataConfig {
    fn default() -> Self {
        Self {
            stale_after: Duration::from_secs(24 * 60 * 60), // 24 hours
            debounce: Duration::from_millis(500),
        }
    }
}

/// Tab strip behavior
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TabsConfig {
    /// Maximum number of open tabs
    pub max_tabs: usize,
    /// Route to show once the last tab is closed
    pub default_route: String,
}

impl Default for TabsConfig {
    fn default() -> Self {
        Self {
            max_tabs: 15,
            default_route: "/dashboard".to_string(),
        }
    }
}
