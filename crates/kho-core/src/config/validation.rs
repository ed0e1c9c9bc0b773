//! Configuration validation

use super::model::KhoConfig;
use crate::error::{KhoError, KhoResult};

impl KhoConfig {
    /// Reject limits that would make the caches or tab strip unusable
    pub fn validate(&self) -> KhoResult<()> {
        if self.memory.max_entries == 0 {
            return Err(KhoError::invalid_field(
                "must be greater than zero",
                "memory.max_entries",
            ));
        }
        if self.memory.max_size_bytes < 2 {
            return Err(KhoError::invalid_field(
                "must be at least 2 bytes",
                "memory.max_size_bytes",
            ));
        }
        if self.memory.ttl.is_zero() {
            return Err(KhoError::invalid_field("must be non-zero", "memory.ttl"));
        }
        if self.memory.cleanup_interval.is_zero() {
            return Err(KhoError::invalid_field(
                "must be non-zero",
                "memory.cleanup_interval",
            ));
        }
        if self.tab_data.stale_after.is_zero() {
            return Err(KhoError::invalid_field(
                "must be non-zero",
                "tab_data.stale_after",
            ));
        }
        if self.tabs.max_tabs == 0 {
            return Err(KhoError::invalid_field(
                "must be greater than zero",
                "tabs.max_tabs",
            ));
        }
        if !self.tabs.default_route.starts_with('/') {
            return Err(KhoError::invalid_field(
                format!("must be an absolute route, got {:?}", self.tabs.default_route),
                "tabs.default_route",
            ));
        }
        Ok(())
    }
}
