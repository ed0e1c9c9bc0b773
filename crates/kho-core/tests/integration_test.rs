//! Integration tests for Kho core functionality
//!
//! Runs the registry and page caches over a file store and checks what
//! survives a restart.

use kho_core::{
    AddTabOutcome, DataSource, FileStore, KhoConfig, KhoError, KhoResult, KhoRuntime, ManualClock,
    NewTab, SharedClock, SharedStore,
};
use serde_json::{Value, json};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tempfile::TempDir;

fn config_in(dir: &TempDir) -> KhoConfig {
    let mut config = KhoConfig::default();
    config.storage.data_dir = dir.path().to_path_buf();
    config
}

#[tokio::test]
async fn test_state_survives_restart() -> KhoResult<()> {
    let dir = TempDir::new()?;
    let calls = Arc::new(AtomicUsize::new(0));

    {
        let runtime = KhoRuntime::open(config_in(&dir)).await?;
        let outcome = runtime
            .tabs()
            .add_tab(NewTab::new("/kho", "Danh sách kho"))
            .await?;
        assert!(matches!(outcome, AddTabOutcome::Opened { evicted: None, .. }));

        let counter = calls.clone();
        let page = runtime.page::<Value>("products").with_fetcher(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            async { Ok::<_, String>(json!([{"id": 1, "name": "Thép cuộn"}])) }
        });
        let state = page.on_route_change("/kho").await;
        assert_eq!(state.source, Some(DataSource::Fetched));

        runtime.shutdown().await?;
    }

    assert!(dir.path().join("browser-tabs.json").exists());
    assert!(dir.path().join("tab-data-cache.json").exists());

    let runtime = KhoRuntime::open(config_in(&dir)).await?;
    let tabs = runtime.tabs().tabs().await;
    assert_eq!(tabs.len(), 1);
    assert_eq!(tabs[0].title, "Danh sách kho");
    assert_eq!(runtime.tabs().active().await.map(|tab| tab.id), Some(tabs[0].id));

    // The memory tier is gone after a restart; the durable tier answers
    let page = runtime.page::<Value>("products");
    let state = page.on_route_change("/kho").await;
    assert_eq!(state.source, Some(DataSource::Durable));
    assert_eq!(state.data, Some(json!([{"id": 1, "name": "Thép cuộn"}])));
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    Ok(())
}

#[tokio::test]
async fn test_stale_entries_dropped_on_reopen() -> KhoResult<()> {
    let dir = TempDir::new()?;
    let store: SharedStore = Arc::new(FileStore::new(dir.path())?);
    let clock = ManualClock::starting_now();
    let shared: SharedClock = Arc::new(clock.clone());

    let runtime = KhoRuntime::with_store(config_in(&dir), store.clone(), shared.clone()).await?;
    runtime
        .tab_data()
        .set_tab_data("/kho-products", json!({"id": 1}), "/kho")
        .await;
    runtime.shutdown().await?;
    drop(runtime);

    clock.advance(Duration::from_secs(24 * 60 * 60) + Duration::from_millis(1));

    let runtime = KhoRuntime::with_store(config_in(&dir), store, shared).await?;
    assert!(runtime.tab_data().is_empty().await);
    assert_eq!(runtime.tab_data().get_tab_data("/kho-products").await, None);

    Ok(())
}

#[tokio::test]
async fn test_invalid_config_is_refused() -> KhoResult<()> {
    let dir = TempDir::new()?;
    let store: SharedStore = Arc::new(FileStore::new(dir.path())?);

    let mut config = config_in(&dir);
    config.memory.cleanup_interval = Duration::ZERO;
    let clock: SharedClock = Arc::new(ManualClock::starting_now());
    let err = KhoRuntime::with_store(config, store, clock).await.unwrap_err();
    assert!(matches!(
        err,
        KhoError::InvalidInput { ref field, .. }
            if field.as_deref() == Some("memory.cleanup_interval")
    ));

    let mut config = config_in(&dir);
    config.memory.max_entries = 0;
    let err = KhoRuntime::open(config).await.unwrap_err();
    assert_eq!(err.error_code(), "KHO_INVALID_INPUT");

    Ok(())
}

#[tokio::test]
async fn test_corrupt_files_start_empty() -> KhoResult<()> {
    let dir = TempDir::new()?;
    std::fs::write(dir.path().join("browser-tabs.json"), "not json")?;
    std::fs::write(dir.path().join("tab-data-cache.json"), "{\"broken\":")?;

    let runtime = KhoRuntime::open(config_in(&dir)).await?;
    assert!(runtime.tabs().is_empty().await);
    assert!(runtime.tab_data().is_empty().await);

    // A new mutation overwrites the corrupt list
    runtime.tabs().add_tab(NewTab::new("/kho", "Kho")).await?;
    let restored = KhoRuntime::open(config_in(&dir)).await?;
    assert_eq!(restored.tabs().len().await, 1);

    Ok(())
}
