//! Cached page data commands

use crate::console::CliConsole;
use chrono::{TimeZone, Utc};
use colored::*;
use humantime_serde::re::humantime;
use kho_core::cache::TabDataCache;
use kho_core::error::{KhoError, KhoResult};

/// Summarize the durable cache
pub async fn stats(console: &CliConsole, cache: &TabDataCache) -> KhoResult<()> {
    console.print_header("Page data cache");

    let stats = cache.stats().await;
    console.print_field("Entries", stats.entries);
    console.print_field("Stale entries", stats.stale_entries);
    console.print_field("Stale after", humanize(cache.config().stale_after));

    let now = Utc::now().timestamp_millis();
    for (key, entry) in cache.entries().await {
        let age = format!("{} old", humanize(entry.age(now)));
        let age = if cache.is_stale(&entry) {
            format!("{age}, stale").yellow()
        } else {
            age.dimmed()
        };
        println!("  {}  {}  {}", key.cyan(), entry.path.dimmed(), age);
    }
    Ok(())
}

/// Print one cached value as pretty JSON
pub async fn get(console: &CliConsole, cache: &TabDataCache, key: &str) -> KhoResult<()> {
    let entry = cache
        .get_tab_entry(key)
        .await
        .ok_or_else(|| {
            KhoError::not_found_resource(format!("No cached data for {key}"), "cache entry")
        })?;

    let fetched = Utc
        .timestamp_millis_opt(entry.timestamp)
        .single()
        .map(|at| at.to_rfc3339())
        .unwrap_or_else(|| entry.timestamp.to_string());
    console.info(&format!("Fetched for {} at {}", entry.path, fetched));
    println!("{}", serde_json::to_string_pretty(&entry.data)?);
    Ok(())
}

pub async fn clear(console: &CliConsole, cache: &TabDataCache, key: Option<&str>) -> KhoResult<()> {
    match key {
        Some(key) => {
            if cache.clear_tab_data(key).await {
                console.success(&format!("Removed {key}"));
            } else {
                console.warn(&format!("No cached data for {key}"));
            }
        }
        None => {
            let count = cache.len().await;
            cache.clear_all_tab_data().await;
            console.success(&format!("Removed {count} entries"));
        }
    }
    Ok(())
}

pub async fn prune(console: &CliConsole, cache: &TabDataCache) -> KhoResult<()> {
    let removed = cache.prune_stale().await;
    console.success(&format!("Pruned {removed} stale entries"));
    Ok(())
}

fn humanize(duration: std::time::Duration) -> String {
    // Whole seconds keep the output short
    let secs = std::time::Duration::from_secs(duration.as_secs());
    humantime::format_duration(secs).to_string()
}
