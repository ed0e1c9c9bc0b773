//! Page data types

use crate::error::KhoError;
use serde::{Deserialize, Serialize};

/// Where a page's data came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSource {
    Memory,
    Durable,
    Fetched,
}

/// A cache tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Memory,
    Durable,
}

/// Outcome of writing one tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TierWrite {
    Stored,
    Rejected,
}

/// Per-tier outcome of a write-through
///
/// The durable tier's persistence is debounced; `Stored` there means the
/// entry is in the cache's mirror. Use `TabDataCache::flush` to observe
/// persistence failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriteReport {
    pub memory: TierWrite,
    pub durable: TierWrite,
}

impl WriteReport {
    /// Both tiers hold the value
    pub fn is_complete(&self) -> bool {
        self.memory == TierWrite::Stored && self.durable == TierWrite::Stored
    }

    /// Tiers that did not store the value
    pub fn rejected_tiers(&self) -> Vec<Tier> {
        let mut tiers = Vec::new();
        if self.memory == TierWrite::Rejected {
            tiers.push(Tier::Memory);
        }
        if self.durable == TierWrite::Rejected {
            tiers.push(Tier::Durable);
        }
        tiers
    }
}

/// Observable state of a page's data
#[derive(Debug, Clone, PartialEq)]
pub struct PageDataState<T> {
    pub data: Option<T>,
    pub loading: bool,
    pub error: Option<KhoError>,
    pub source: Option<DataSource>,
    /// Outcome of the last write-through, if the last load fetched
    pub last_write: Option<WriteReport>,
}

impl<T> Default for PageDataState<T> {
    fn default() -> Self {
        Self {
            data: None,
            loading: false,
            error: None,
            source: None,
            last_write: None,
        }
    }
}
