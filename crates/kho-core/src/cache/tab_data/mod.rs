//! Durable tab-scoped data cache
//!
//! The whole cache is one JSON object stored under `tab-data-cache`:
//!
//! ```json
//! { "/kho-products": { "data": {"id": 1}, "timestamp": 1718000000000, "path": "/kho" } }
//! ```
//!
//! Mutations update the in-memory mirror immediately and schedule a
//! debounced write of the full map. Load and write failures are logged and
//! leave the cache running without persistence.

mod operations;
mod persistence;

pub use operations::TabDataCache;
