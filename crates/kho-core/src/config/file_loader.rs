//! File-based configuration loading

use super::model::KhoConfig;
use crate::error::{KhoError, KhoResult, ResultExt};
use std::fs;
use std::path::Path;

/// Serialization format, chosen by file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConfigFormat {
    Json,
    Toml,
    Yaml,
}

impl ConfigFormat {
    /// Anything that is not TOML or YAML is read as JSON
    fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Self::Toml,
            Some("yaml" | "yml") => Self::Yaml,
            _ => Self::Json,
        }
    }

    fn parse(self, content: &str) -> KhoResult<KhoConfig> {
        match self {
            Self::Toml => Ok(toml::from_str(content)?),
            Self::Yaml => Ok(serde_yaml::from_str(content)?),
            Self::Json => serde_json::from_str(content)
                .map_err(|e| KhoError::config(format!("Invalid JSON: {}", e))),
        }
    }
}

/// Load configuration from a JSON, TOML or YAML file
///
/// A missing file yields the defaults.
pub fn load_from_file(path: &Path) -> KhoResult<KhoConfig> {
    if !path.exists() {
        tracing::debug!("Config file {:?} not found, using defaults", path);
        return Ok(KhoConfig::default());
    }

    let format = ConfigFormat::from_path(path);
    fs::read_to_string(path)
        .map_err(KhoError::from)
        .and_then(|content| format.parse(&content))
        .with_context(|| format!("Loading {:?} configuration from '{}'", format, path.display()))
}
