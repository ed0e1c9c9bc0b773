//! Kho Core Library
//!
//! Tab and page data layer of the Kho warehouse dashboard: a bounded,
//! persisted tab registry, a durable tab-scoped data cache, a size-bounded
//! in-memory LRU store and the page data loader that ties the caches together.

pub mod cache;
pub mod clock;
pub mod config;
pub mod error;
pub mod page;
pub mod runtime;
pub mod storage;
pub mod tabs;

#[cfg(test)]
mod test_support;

// Re-export commonly used types
pub use cache::{MemoryStats, MemoryStore, TabDataCache, TabDataEntry, TabDataStats};
pub use clock::{Clock, ManualClock, SharedClock, SystemClock};
pub use config::{KhoConfig, load_config};
pub use error::{KhoError, KhoResult, OptionExt, ResultExt};
pub use page::{DataSource, PageData, PageDataLoader, PageDataState, WriteReport};
pub use runtime::KhoRuntime;
pub use storage::{DurableStore, FileStore, MemoryDurableStore, SharedStore};
pub use tabs::{AddTabOutcome, NewTab, Tab, TabChange, TabId, TabRegistry, TabUpdate};
