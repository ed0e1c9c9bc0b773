//! Debounced persistence of the tab data map

use crate::cache::types::TabDataEntry;
use crate::error::{KhoError, KhoResult};
use crate::storage::{SharedStore, TAB_DATA_CACHE_KEY};
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};

pub(super) type EntryMap = HashMap<String, TabDataEntry>;

/// Load the persisted map, degrading to empty on any failure
pub(super) async fn load_entries(store: &SharedStore) -> EntryMap {
    match store.read(TAB_DATA_CACHE_KEY).await {
        Ok(Some(content)) => match serde_json::from_str::<EntryMap>(&content) {
            Ok(entries) => {
                tracing::debug!("Loaded {} tab data entries", entries.len());
                entries
            }
            Err(e) => {
                tracing::warn!("Failed to parse {}: {}", TAB_DATA_CACHE_KEY, e);
                EntryMap::new()
            }
        },
        Ok(None) => EntryMap::new(),
        Err(e) => {
            tracing::warn!("Failed to read {}: {}", TAB_DATA_CACHE_KEY, e);
            EntryMap::new()
        }
    }
}

/// Coalesces bursts of mutations into a single write
///
/// Every `schedule` bumps a generation and spawns a task that sleeps for the
/// debounce delay; only the task whose generation is still current when it
/// wakes performs the write.
pub(super) struct DebouncedWriter {
    store: SharedStore,
    entries: Arc<RwLock<EntryMap>>,
    delay: Duration,
    scheduled: Arc<AtomicU64>,
    written: Arc<AtomicU64>,
    /// Serializes writes so a late snapshot never overwrites a newer one
    write_lock: Arc<Mutex<()>>,
}

impl std::fmt::Debug for DebouncedWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DebouncedWriter")
            .field("delay", &self.delay)
            .field("scheduled", &self.scheduled.load(Ordering::SeqCst))
            .field("written", &self.written.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}

impl DebouncedWriter {
    pub(super) fn new(store: SharedStore, entries: Arc<RwLock<EntryMap>>, delay: Duration) -> Self {
        Self {
            store,
            entries,
            delay,
            scheduled: Arc::new(AtomicU64::new(0)),
            written: Arc::new(AtomicU64::new(0)),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Schedule a write after the debounce delay, superseding any pending one
    pub(super) fn schedule(&self) {
        let generation = self.scheduled.fetch_add(1, Ordering::SeqCst) + 1;
        let store = self.store.clone();
        let entries = self.entries.clone();
        let scheduled = self.scheduled.clone();
        let written = self.written.clone();
        let write_lock = self.write_lock.clone();
        let delay = self.delay;

        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // Superseded by a later schedule, or already written by a flush
            if scheduled.load(Ordering::SeqCst) != generation
                || written.load(Ordering::SeqCst) >= generation
            {
                return;
            }
            if let Err(e) =
                write_snapshot(&store, &entries, &scheduled, &written, &write_lock).await
            {
                tracing::warn!("Failed to persist tab data cache: {}", e);
            }
        });
    }

    /// Write the current map now
    pub(super) async fn flush(&self) -> KhoResult<()> {
        write_snapshot(
            &self.store,
            &self.entries,
            &self.scheduled,
            &self.written,
            &self.write_lock,
        )
        .await
    }

    /// Whether a scheduled write has not been performed yet
    pub(super) fn has_pending(&self) -> bool {
        self.written.load(Ordering::SeqCst) < self.scheduled.load(Ordering::SeqCst)
    }
}

async fn write_snapshot(
    store: &SharedStore,
    entries: &RwLock<EntryMap>,
    scheduled: &AtomicU64,
    written: &AtomicU64,
    write_lock: &Mutex<()>,
) -> KhoResult<()> {
    let _guard = write_lock.lock().await;

    // Every mutation up to this generation is part of the snapshot
    let generation = scheduled.load(Ordering::SeqCst);
    let content = {
        let entries = entries.read().await;
        serde_json::to_string(&*entries).map_err(|e| {
            KhoError::storage_for_key(
                format!("Failed to serialize tab data cache: {}", e),
                TAB_DATA_CACHE_KEY,
            )
        })?
    };

    store.write(TAB_DATA_CACHE_KEY, &content).await?;
    written.fetch_max(generation, Ordering::SeqCst);
    tracing::debug!("Persisted tab data cache ({} bytes)", content.len());
    Ok(())
}
