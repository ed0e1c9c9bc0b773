//! Cache system tests

#[cfg(test)]
mod tests {
    use crate::cache::{MemoryStore, TabDataCache, TabDataEntry};
    use crate::clock::{Clock, ManualClock};
    use crate::config::{MemoryConfig, TabDataConfig};
    use crate::error::KhoError;
    use crate::storage::{MemoryDurableStore, MockDurableStore, SharedStore, TAB_DATA_CACHE_KEY};
    use crate::test_support::{CountingStore, manual_clock};
    use serde_json::{Value, json};
    use std::collections::HashMap;
    use std::sync::Arc;
    use std::time::Duration;

    const DAY: Duration = Duration::from_secs(24 * 60 * 60);

    fn memory_config(max_size_bytes: usize, max_entries: usize) -> MemoryConfig {
        MemoryConfig {
            max_size_bytes,
            max_entries,
            ..Default::default()
        }
    }

    /// A string value whose JSON encoding is exactly `size` bytes
    fn value_of_size(size: usize) -> Value {
        Value::String("x".repeat(size - 2))
    }

    #[tokio::test]
    async fn test_memory_set_then_get_returns_value() {
        let (_clock, shared) = manual_clock();
        let store = MemoryStore::new(MemoryConfig::default(), shared);

        let value = json!({"id": 1, "name": "Kho A", "items": [1, 2, 3]});
        assert!(store.set("/kho-products", value.clone()).await);
        assert_eq!(store.get("/kho-products").await, Some(value));

        let stats = store.stats().await;
        assert_eq!(stats.entries, 1);
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 0);
    }

    #[tokio::test]
    async fn test_memory_rejects_value_over_half_capacity() {
        let (_clock, shared) = manual_clock();
        let store = MemoryStore::new(memory_config(100, 10), shared);

        assert!(!store.set("k", value_of_size(51)).await);
        assert_eq!(store.get("k").await, None);

        // Exactly half is accepted
        assert!(store.set("k", value_of_size(50)).await);
        assert_eq!(store.stats().await.rejected, 1);
    }

    #[tokio::test]
    async fn test_memory_evicts_least_recently_accessed_by_count() {
        let (clock, shared) = manual_clock();
        let store = MemoryStore::new(memory_config(10_000, 3), shared);

        for key in ["a", "b", "c"] {
            store.set(key, json!(key)).await;
            clock.advance(Duration::from_millis(10));
        }

        // Touch "a" so "b" becomes the oldest access
        assert!(store.get("a").await.is_some());
        clock.advance(Duration::from_millis(10));
        store.set("d", json!("d")).await;

        assert!(!store.contains("b").await);
        for key in ["a", "c", "d"] {
            assert!(store.contains(key).await, "{} should survive", key);
        }
        assert_eq!(store.stats().await.evictions, 1);
    }

    #[tokio::test]
    async fn test_memory_evicts_by_size_until_room() {
        let (_clock, shared) = manual_clock();
        let store = MemoryStore::new(memory_config(100, 100), shared);

        store.set("a", value_of_size(30)).await;
        store.set("b", value_of_size(30)).await;
        store.set("c", value_of_size(30)).await;

        // 90 + 50 > 100: "a" and "b" must go, 30 + 50 fits
        assert!(store.set("d", value_of_size(50)).await);

        assert_eq!(store.keys().await, vec!["d", "c"]);
        let stats = store.stats().await;
        assert_eq!(stats.total_size_bytes, 80);
        assert_eq!(stats.evictions, 2);
    }

    #[tokio::test]
    async fn test_memory_stays_within_bounds_under_load() {
        let (clock, shared) = manual_clock();
        let store = MemoryStore::new(memory_config(500, 8), shared);

        let mut order = Vec::new();
        for i in 0..50usize {
            let key = format!("k{}", i);
            store.set(key.clone(), value_of_size(20 + (i * 7) % 60)).await;
            order.push(key);
            clock.advance(Duration::from_millis(1));

            let stats = store.stats().await;
            assert!(stats.entries <= 8);
            assert!(stats.total_size_bytes <= 500);
        }

        // Survivors are always the most recently written keys
        let survivors = store.keys().await;
        let expected: Vec<String> = order.iter().rev().take(survivors.len()).cloned().collect();
        assert_eq!(survivors, expected);
    }

    #[tokio::test]
    async fn test_memory_replace_does_not_double_count() {
        let (_clock, shared) = manual_clock();
        let store = MemoryStore::new(memory_config(1000, 10), shared);

        store.set("k", value_of_size(100)).await;
        store.set("k", value_of_size(40)).await;

        let stats = store.stats().await;
        assert_eq!(stats.entries, 1);
        assert_eq!(stats.total_size_bytes, 40);
        assert_eq!(stats.evictions, 0);
    }

    #[tokio::test]
    async fn test_memory_expired_entry_is_a_miss() {
        let (clock, shared) = manual_clock();
        let config = MemoryConfig {
            ttl: Duration::from_secs(60),
            ..Default::default()
        };
        let store = MemoryStore::new(config, shared);

        store.set("k", json!(1)).await;
        clock.advance(Duration::from_secs(59));
        assert_eq!(store.get("k").await, Some(json!(1)));

        // Reads do not extend the TTL, which runs from creation
        clock.advance(Duration::from_secs(2));
        assert_eq!(store.get("k").await, None);

        let stats = store.stats().await;
        assert_eq!(stats.entries, 0);
        assert_eq!(stats.expirations, 1);
        assert_eq!(stats.misses, 1);
    }

    #[tokio::test]
    async fn test_memory_cleanup_removes_only_old_entries() {
        let (clock, shared) = manual_clock();
        let config = MemoryConfig {
            ttl: Duration::from_secs(60),
            ..Default::default()
        };
        let store = MemoryStore::new(config, shared);

        store.set("old", json!("old")).await;
        clock.advance(Duration::from_secs(45));
        store.set("new", json!("new")).await;
        clock.advance(Duration::from_secs(30));

        assert_eq!(store.cleanup().await, 1);
        assert!(!store.contains("old").await);
        assert!(store.contains("new").await);
    }

    #[tokio::test]
    async fn test_memory_delete_and_clear() {
        let (_clock, shared) = manual_clock();
        let store = MemoryStore::new(MemoryConfig::default(), shared);

        store.set("a", json!(1)).await;
        store.set("b", json!(2)).await;

        assert!(store.delete("a").await);
        assert!(!store.delete("a").await);
        assert_eq!(store.len().await, 1);

        store.clear().await;
        assert!(store.is_empty().await);
        assert_eq!(store.stats().await.total_size_bytes, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_memory_background_cleanup() {
        let (clock, shared) = manual_clock();
        let config = MemoryConfig {
            ttl: Duration::from_secs(60),
            cleanup_interval: Duration::from_secs(300),
            ..Default::default()
        };
        let store = Arc::new(MemoryStore::new(config, shared));
        let handle = store.spawn_cleanup();

        store.set("k", json!(1)).await;
        clock.advance(Duration::from_secs(120));

        tokio::time::sleep(Duration::from_secs(301)).await;
        assert!(!store.contains("k").await);

        handle.abort();
    }

    async fn tab_data_cache(store: SharedStore) -> (ManualClock, TabDataCache) {
        let (clock, shared) = manual_clock();
        let cache = TabDataCache::load(store, shared, TabDataConfig::default()).await;
        (clock, cache)
    }

    #[tokio::test]
    async fn test_tab_data_expires_after_a_day() {
        let (clock, cache) = tab_data_cache(Arc::new(MemoryDurableStore::new())).await;

        cache
            .set_tab_data("/kho-products", json!({"id": 1}), "/kho")
            .await;
        assert_eq!(
            cache.get_tab_data("/kho-products").await,
            Some(json!({"id": 1}))
        );

        clock.advance(DAY + Duration::from_millis(1));
        assert_eq!(cache.get_tab_data("/kho-products").await, None);
    }

    #[tokio::test]
    async fn test_tab_data_stale_read_removes_entry() {
        let (clock, cache) = tab_data_cache(Arc::new(MemoryDurableStore::new())).await;

        cache.set_tab_data("/kho-a", json!(1), "/kho").await;
        clock.advance(Duration::from_secs(3600));
        cache.set_tab_data("/kho-b", json!(2), "/kho").await;
        clock.advance(DAY - Duration::from_secs(1800));

        assert_eq!(cache.stats().await.stale_entries, 1);
        assert_eq!(cache.get_tab_data("/kho-a").await, None);

        let stats = cache.stats().await;
        assert_eq!(stats.entries, 1);
        assert_eq!(stats.stale_entries, 0);
        assert_eq!(cache.keys().await, vec!["/kho-b"]);
    }

    #[tokio::test]
    async fn test_tab_data_entry_keeps_origin_path() {
        let (_clock, cache) = tab_data_cache(Arc::new(MemoryDurableStore::new())).await;

        cache
            .set_tab_data("/phieu-nhap-list", json!([1, 2]), "/phieu-nhap")
            .await;
        let entry = cache.get_tab_entry("/phieu-nhap-list").await.unwrap();
        assert_eq!(entry.path, "/phieu-nhap");
        assert_eq!(entry.data, json!([1, 2]));
    }

    #[tokio::test(start_paused = true)]
    async fn test_tab_data_writes_are_debounced() {
        let store = CountingStore::new();
        let (_clock, cache) = tab_data_cache(store.clone()).await;

        for i in 0..5 {
            cache
                .set_tab_data(format!("/kho-{}", i), json!(i), "/kho")
                .await;
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
        assert_eq!(store.writes(), 0);
        assert!(cache.stats().await.pending_write);

        tokio::time::sleep(Duration::from_millis(600)).await;
        assert_eq!(store.writes(), 1);
        assert!(!cache.stats().await.pending_write);

        let persisted: HashMap<String, TabDataEntry> =
            serde_json::from_str(&store.raw(TAB_DATA_CACHE_KEY).await.unwrap()).unwrap();
        assert_eq!(persisted.len(), 5);
        assert_eq!(persisted["/kho-3"].data, json!(3));
    }

    #[tokio::test(start_paused = true)]
    async fn test_tab_data_clear_persists() {
        let store = CountingStore::new();
        let (_clock, cache) = tab_data_cache(store.clone()).await;

        cache.set_tab_data("/kho-a", json!(1), "/kho").await;
        cache.set_tab_data("/kho-b", json!(2), "/kho").await;
        assert!(cache.clear_tab_data("/kho-a").await);
        assert!(!cache.clear_tab_data("/kho-a").await);
        tokio::time::sleep(Duration::from_millis(600)).await;

        let raw = store.raw(TAB_DATA_CACHE_KEY).await.unwrap();
        let persisted: HashMap<String, TabDataEntry> = serde_json::from_str(&raw).unwrap();
        assert_eq!(persisted.keys().collect::<Vec<_>>(), vec!["/kho-b"]);

        cache.clear_all_tab_data().await;
        tokio::time::sleep(Duration::from_millis(600)).await;
        assert_eq!(store.raw(TAB_DATA_CACHE_KEY).await.as_deref(), Some("{}"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_tab_data_flush_writes_immediately() {
        let store = CountingStore::new();
        let (_clock, cache) = tab_data_cache(store.clone()).await;

        cache.set_tab_data("/kho-a", json!(1), "/kho").await;
        cache.flush().await.unwrap();

        assert_eq!(store.writes(), 1);
        assert!(!cache.stats().await.pending_write);

        // The debounced write covered by the flush is skipped
        tokio::time::sleep(Duration::from_millis(600)).await;
        assert_eq!(store.writes(), 1);
    }

    #[tokio::test]
    async fn test_tab_data_load_drops_stale_entries() {
        let (clock, shared) = manual_clock();
        let now = clock.now_millis();
        let day_ms = DAY.as_millis() as i64;

        let persisted = json!({
            "/kho-fresh": {"data": {"id": 1}, "timestamp": now - 1000, "path": "/kho"},
            "/kho-old": {"data": {"id": 2}, "timestamp": now - day_ms - 1, "path": "/kho"},
        });
        let store: SharedStore = Arc::new(MemoryDurableStore::with_entries([(
            TAB_DATA_CACHE_KEY,
            persisted.to_string(),
        )]));

        let cache = TabDataCache::load(store, shared, TabDataConfig::default()).await;
        assert_eq!(cache.keys().await, vec!["/kho-fresh"]);
        assert_eq!(
            cache.get_tab_data("/kho-fresh").await,
            Some(json!({"id": 1}))
        );
    }

    #[tokio::test]
    async fn test_tab_data_corrupt_payload_starts_empty() {
        let store: SharedStore = Arc::new(MemoryDurableStore::with_entries([(
            TAB_DATA_CACHE_KEY,
            "{not json",
        )]));
        let (_clock, cache) = tab_data_cache(store).await;
        assert!(cache.is_empty().await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_tab_data_entries_lists_stale_without_removing() {
        let store = CountingStore::new();
        let (clock, cache) = tab_data_cache(store.clone()).await;

        cache.set_tab_data("/kho-b", json!(2), "/kho").await;
        cache.set_tab_data("/kho-a", json!(1), "/kho").await;
        cache.flush().await.unwrap();
        clock.advance(DAY + Duration::from_secs(1));

        let entries = cache.entries().await;
        let keys: Vec<&str> = entries.iter().map(|(key, _)| key.as_str()).collect();
        assert_eq!(keys, vec!["/kho-a", "/kho-b"]);
        assert!(entries.iter().all(|(_, entry)| cache.is_stale(entry)));

        assert_eq!(cache.len().await, 2);
        assert!(!cache.stats().await.pending_write);
        tokio::time::sleep(Duration::from_millis(600)).await;
        assert_eq!(store.writes(), 1);
    }

    #[tokio::test]
    async fn test_tab_data_prune_stale() {
        let (clock, cache) = tab_data_cache(Arc::new(MemoryDurableStore::new())).await;

        cache.set_tab_data("/a-1", json!(1), "/a").await;
        cache.set_tab_data("/a-2", json!(2), "/a").await;
        clock.advance(DAY + Duration::from_secs(1));
        cache.set_tab_data("/a-3", json!(3), "/a").await;

        assert_eq!(cache.prune_stale().await, 2);
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_tab_data_storage_failures_degrade() {
        let mut mock = MockDurableStore::new();
        mock.expect_read()
            .returning(|_| Err(KhoError::storage("storage unavailable")));
        mock.expect_write()
            .returning(|_, _| Err(KhoError::storage("quota exceeded")));
        let store: SharedStore = Arc::new(mock);

        let (_clock, cache) = tab_data_cache(store).await;
        assert!(cache.is_empty().await);

        // The mirror keeps working even though nothing persists
        cache.set_tab_data("/kho-a", json!(1), "/kho").await;
        tokio::time::sleep(Duration::from_millis(600)).await;
        assert_eq!(cache.get_tab_data("/kho-a").await, Some(json!(1)));
        assert!(cache.stats().await.pending_write);

        // An explicit flush reports the failure
        let err = cache.flush().await.unwrap_err();
        assert!(matches!(err, KhoError::Storage { .. }));
    }
}
