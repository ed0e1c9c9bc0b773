//! Two-tier lookup and write-through for page data

use super::types::{DataSource, TierWrite, WriteReport};
use crate::cache::{MemoryStore, TabDataCache};
use crate::error::KhoResult;
use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use tracing::debug;

/// Value produced by a fetch plus how it was written back
#[derive(Debug, Clone)]
pub struct FetchOutcome {
    pub value: Value,
    pub report: WriteReport,
}

type SharedFetch = Shared<BoxFuture<'static, KhoResult<FetchOutcome>>>;
type InFlight = Arc<Mutex<HashMap<String, SharedFetch>>>;

/// Coordinates the memory store and the durable tab data cache
///
/// Concurrent fetches for the same composite key share one callback
/// invocation; later callers await the first caller's result. A started
/// fetch always runs to completion and writes its result, even when the
/// page that asked for it is gone.
pub struct PageDataLoader {
    memory: Arc<MemoryStore>,
    tab_data: Arc<TabDataCache>,
    in_flight: InFlight,
}

impl std::fmt::Debug for PageDataLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageDataLoader")
            .field("memory", &self.memory)
            .field("tab_data", &self.tab_data)
            .field("in_flight", &self.in_flight.lock().len())
            .finish()
    }
}

impl PageDataLoader {
    /// Create a loader over the two cache tiers
    pub fn new(memory: Arc<MemoryStore>, tab_data: Arc<TabDataCache>) -> Self {
        Self {
            memory,
            tab_data,
            in_flight: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Cache key for a logical key on a route: `{path}-{key}`
    pub fn composite_key(path: &str, key: &str) -> String {
        format!("{}-{}", path, key)
    }

    /// Memory tier handle
    pub fn memory(&self) -> &Arc<MemoryStore> {
        &self.memory
    }

    /// Durable tier handle
    pub fn tab_data(&self) -> &Arc<TabDataCache> {
        &self.tab_data
    }

    /// Look a composite key up in memory, then in the durable cache
    ///
    /// A durable hit is promoted into memory.
    pub async fn lookup(&self, composite: &str) -> Option<(Value, DataSource)> {
        if let Some(value) = self.memory.get(composite).await {
            debug!("Page data memory hit: {}", composite);
            return Some((value, DataSource::Memory));
        }

        let value = self.tab_data.get_tab_data(composite).await?;
        debug!("Page data durable hit: {}", composite);
        self.memory.set(composite, value.clone()).await;
        Some((value, DataSource::Durable))
    }

    /// Store a value in both tiers and report each tier's outcome
    pub async fn write_through(&self, composite: &str, value: Value, path: &str) -> WriteReport {
        write_through(&self.memory, &self.tab_data, composite, value, path).await
    }

    /// Remove a composite key from both tiers
    pub async fn invalidate(&self, composite: &str) {
        let in_memory = self.memory.delete(composite).await;
        let durable = self.tab_data.clear_tab_data(composite).await;
        debug!(
            "Invalidated {} (memory: {}, durable: {})",
            composite, in_memory, durable
        );
    }

    /// Run `fetch` and write its result through, sharing in-flight calls
    ///
    /// If a fetch for `composite` is already running, `fetch` is not called
    /// and the running fetch's outcome is returned instead.
    pub async fn fetch_shared<F, Fut>(
        &self,
        composite: &str,
        path: &str,
        fetch: F,
    ) -> KhoResult<FetchOutcome>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = KhoResult<Value>> + Send + 'static,
    {
        let shared = {
            let mut in_flight = self.in_flight.lock();
            match in_flight.get(composite) {
                Some(running) => {
                    debug!("Joining in-flight fetch for {}", composite);
                    running.clone()
                }
                None => {
                    let memory = self.memory.clone();
                    let tab_data = self.tab_data.clone();
                    let key = composite.to_string();
                    let path = path.to_string();
                    let request = fetch();

                    let shared = async move {
                        let value = request.await?;
                        let report =
                            write_through(&memory, &tab_data, &key, value.clone(), &path).await;
                        Ok(FetchOutcome { value, report })
                    }
                    .boxed()
                    .shared();

                    in_flight.insert(composite.to_string(), shared.clone());

                    // Driven to completion even if every caller goes away
                    let registry = self.in_flight.clone();
                    let running = shared.clone();
                    let key = composite.to_string();
                    tokio::spawn(async move {
                        let _ = running.clone().await;
                        release(&registry, &key, &running);
                    });
                    shared
                }
            }
        };

        let outcome = shared.clone().await;
        release(&self.in_flight, composite, &shared);
        outcome
    }

    /// Number of fetches currently running
    pub fn in_flight(&self) -> usize {
        self.in_flight.lock().len()
    }
}

/// Drop `composite` from the registry if it still maps to `fetch`
fn release(
    in_flight: &Mutex<HashMap<String, SharedFetch>>,
    composite: &str,
    fetch: &SharedFetch,
) {
    let mut in_flight = in_flight.lock();
    if in_flight
        .get(composite)
        .is_some_and(|running| running.ptr_eq(fetch))
    {
        in_flight.remove(composite);
    }
}

async fn write_through(
    memory: &MemoryStore,
    tab_data: &TabDataCache,
    composite: &str,
    value: Value,
    path: &str,
) -> WriteReport {
    let memory_write = if memory.set(composite, value.clone()).await {
        TierWrite::Stored
    } else {
        TierWrite::Rejected
    };
    tab_data.set_tab_data(composite, value, path).await;

    let report = WriteReport {
        memory: memory_write,
        durable: TierWrite::Stored,
    };
    if !report.is_complete() {
        tracing::warn!(
            "Partial write for {}: {:?} tier rejected the value",
            composite,
            report.rejected_tiers()
        );
    }
    debug!("Wrote through {}: {:?}", composite, report);
    report
}
