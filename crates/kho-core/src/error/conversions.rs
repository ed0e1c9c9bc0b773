//! From trait implementations for KhoError conversions

use super::types::KhoError;

impl From<std::io::Error> for KhoError {
    fn from(error: std::io::Error) -> Self {
        Self::io(error.to_string())
    }
}

impl From<serde_json::Error> for KhoError {
    fn from(error: serde_json::Error) -> Self {
        Self::json(error.to_string())
    }
}

impl From<toml::de::Error> for KhoError {
    fn from(error: toml::de::Error) -> Self {
        Self::config(format!("Invalid TOML: {}", error))
    }
}

impl From<serde_yaml::Error> for KhoError {
    fn from(error: serde_yaml::Error) -> Self {
        Self::config(format!("Invalid YAML: {}", error))
    }
}
