//! Helpers shared by unit tests

use crate::clock::{ManualClock, SharedClock};
use crate::error::KhoResult;
use crate::storage::{DurableStore, MemoryDurableStore};
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Durable store that counts writes per call
#[derive(Debug, Default)]
pub(crate) struct CountingStore {
    inner: MemoryDurableStore,
    writes: AtomicUsize,
}

impl CountingStore {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub(crate) fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub(crate) async fn raw(&self, key: &str) -> Option<String> {
        self.inner.read(key).await.unwrap()
    }
}

#[async_trait]
impl DurableStore for CountingStore {
    async fn read(&self, key: &str) -> KhoResult<Option<String>> {
        self.inner.read(key).await
    }

    async fn write(&self, key: &str, value: &str) -> KhoResult<()> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.inner.write(key, value).await
    }

    async fn remove(&self, key: &str) -> KhoResult<()> {
        self.inner.remove(key).await
    }

    async fn keys(&self) -> KhoResult<Vec<String>> {
        self.inner.keys().await
    }
}

/// Manual clock fixed at a known instant, plus its shared handle
pub(crate) fn manual_clock() -> (ManualClock, SharedClock) {
    let clock = ManualClock::new(Utc.with_ymd_and_hms(2024, 6, 1, 8, 0, 0).unwrap());
    let shared: SharedClock = Arc::new(clock.clone());
    (clock, shared)
}
