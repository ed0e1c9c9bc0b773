//! Environment variable overrides

use super::model::KhoConfig;
use crate::error::{KhoError, KhoResult};
use std::path::PathBuf;
use std::str::FromStr;

/// Apply `KHO_*` variables from the process environment
pub fn apply_env_overrides(config: &mut KhoConfig) -> KhoResult<()> {
    apply_overrides(config, |name| std::env::var(name).ok())
}

/// Apply overrides from an arbitrary variable lookup
///
/// Recognized variables: `KHO_DATA_DIR`, `KHO_MAX_TABS`,
/// `KHO_DEFAULT_ROUTE`, `KHO_MEMORY_MAX_ENTRIES`, `KHO_MEMORY_MAX_SIZE`,
/// `KHO_LOG_LEVEL`.
pub fn apply_overrides<F>(config: &mut KhoConfig, lookup: F) -> KhoResult<()>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(dir) = lookup("KHO_DATA_DIR") {
        config.storage.data_dir = PathBuf::from(shellexpand::tilde(&dir).into_owned());
    }
    if let Some(value) = lookup("KHO_MAX_TABS") {
        config.tabs.max_tabs = parse_var("KHO_MAX_TABS", &value)?;
    }
    if let Some(route) = lookup("KHO_DEFAULT_ROUTE") {
        config.tabs.default_route = route;
    }
    if let Some(value) = lookup("KHO_MEMORY_MAX_ENTRIES") {
        config.memory.max_entries = parse_var("KHO_MEMORY_MAX_ENTRIES", &value)?;
    }
    if let Some(value) = lookup("KHO_MEMORY_MAX_SIZE") {
        config.memory.max_size_bytes = parse_var("KHO_MEMORY_MAX_SIZE", &value)?;
    }
    if let Some(level) = lookup("KHO_LOG_LEVEL") {
        config.logging.level = level;
    }
    Ok(())
}

fn parse_var<T: FromStr>(name: &str, value: &str) -> KhoResult<T> {
    value
        .trim()
        .parse()
        .map_err(|_| KhoError::config(format!("Invalid {} value: {:?}", name, value)))
}
