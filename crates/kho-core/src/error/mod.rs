//! Error types for Kho
//!
//! A single `KhoError` enum is shared by every component. Storage and cache
//! failures inside the library are mostly logged and degraded to cache misses;
//! the variants here are what still reaches a caller:
//! - configuration problems while loading `KhoConfig`
//! - explicit `flush()` calls on the durable store
//! - fetch callback failures surfaced through page state
//! - registry operations on unknown or non-closable tabs

mod constructors;
mod conversions;
mod types;

pub use types::{KhoError, KhoResult, OptionExt, ResultExt};
