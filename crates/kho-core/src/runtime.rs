//! Wiring of the stores, caches and registry for one process

use crate::cache::{MemoryStore, TabDataCache};
use crate::clock::{SharedClock, system_clock};
use crate::config::KhoConfig;
use crate::error::KhoResult;
use crate::page::{PageData, PageDataLoader};
use crate::storage::{FileStore, SharedStore};
use crate::tabs::TabRegistry;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::info;

/// Every component built from one configuration and one durable store
pub struct KhoRuntime {
    config: KhoConfig,
    store: SharedStore,
    tabs: Arc<TabRegistry>,
    loader: Arc<PageDataLoader>,
    cleanup: JoinHandle<()>,
}

impl std::fmt::Debug for KhoRuntime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KhoRuntime")
            .field("config", &self.config)
            .field("tabs", &self.tabs)
            .field("loader", &self.loader)
            .finish_non_exhaustive()
    }
}

impl KhoRuntime {
    /// Open the file store under the configured data directory
    pub async fn open(config: KhoConfig) -> KhoResult<Self> {
        config.validate()?;
        let store: SharedStore = Arc::new(FileStore::new(&config.storage.data_dir)?);
        info!("Opened data directory {}", config.storage.data_dir.display());
        Self::with_store(config, store, system_clock()).await
    }

    /// Build every component over an existing store and clock
    ///
    /// Starts the memory store's periodic cleanup, stopped when the runtime
    /// is dropped. Fails if `config` does not validate.
    pub async fn with_store(
        config: KhoConfig,
        store: SharedStore,
        clock: SharedClock,
    ) -> KhoResult<Self> {
        config.validate()?;

        let memory = Arc::new(MemoryStore::new(config.memory.clone(), clock.clone()));
        let tab_data =
            Arc::new(TabDataCache::load(store.clone(), clock, config.tab_data.clone()).await);
        let tabs = Arc::new(TabRegistry::load(store.clone(), config.tabs.clone()).await);
        let cleanup = memory.spawn_cleanup();
        let loader = Arc::new(PageDataLoader::new(memory, tab_data));

        Ok(Self {
            config,
            store,
            tabs,
            loader,
            cleanup,
        })
    }

    pub fn config(&self) -> &KhoConfig {
        &self.config
    }

    pub fn store(&self) -> &SharedStore {
        &self.store
    }

    pub fn tabs(&self) -> &Arc<TabRegistry> {
        &self.tabs
    }

    pub fn loader(&self) -> &Arc<PageDataLoader> {
        &self.loader
    }

    pub fn memory(&self) -> &Arc<MemoryStore> {
        self.loader.memory()
    }

    pub fn tab_data(&self) -> &Arc<TabDataCache> {
        self.loader.tab_data()
    }

    /// Page data handle for `key` sharing this runtime's caches
    pub fn page<T>(&self, key: impl Into<String>) -> PageData<T>
    where
        T: Serialize + DeserializeOwned + Clone + Send + Sync + 'static,
    {
        PageData::new(self.loader.clone(), key)
    }

    /// Write any pending tab data before the process exits
    pub async fn shutdown(&self) -> KhoResult<()> {
        self.tab_data().flush().await
    }
}

impl Drop for KhoRuntime {
    fn drop(&mut self) {
        self.cleanup.abort();
    }
}
