//! Page data caching
//!
//! Two tiers sit in front of every page fetch:
//!
//! - **Memory store**: a size- and count-bounded LRU map that lives only for
//!   the current process. Values are estimated by their serialized JSON size.
//! - **Tab data cache**: a durable map keyed by composite key, mirrored in
//!   memory and written out as one document under `tab-data-cache` after a
//!   short debounce. Entries go stale after 24 hours and are dropped lazily.
//!
//! The tiers are written independently; `page::PageDataLoader` reports the
//! outcome of each tier on write-through.

pub mod memory;
pub mod tab_data;
pub mod types;

#[cfg(test)]
mod tests;

pub use memory::MemoryStore;
pub use tab_data::TabDataCache;
pub use types::{MemoryEntry, MemoryStats, TabDataEntry, TabDataStats};
