//! Configuration for the tab registry and page data caches
//!
//! Sources are applied in order: built-in defaults, a JSON/TOML/YAML file,
//! then `KHO_*` environment variables. The merged result is validated
//! before use.

mod env_loader;
mod file_loader;
mod logging_config;
mod model;
mod validation;

pub use env_loader::{apply_env_overrides, apply_overrides};
pub use file_loader::load_from_file;
pub use logging_config::{LogFormat, LoggingConfig};
pub use model::{KhoConfig, MemoryConfig, StorageConfig, TabDataConfig, TabsConfig};

use crate::error::KhoResult;
use std::path::Path;

/// Load configuration from an optional file plus the process environment
pub fn load_config(path: Option<&Path>) -> KhoResult<KhoConfig> {
    let mut config = match path {
        Some(path) => load_from_file(path)?,
        None => KhoConfig::default(),
    };
    apply_env_overrides(&mut config)?;
    config.validate()?;
    tracing::debug!("Loaded configuration: {:?}", config);
    Ok(config)
}
