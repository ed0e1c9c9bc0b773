//! Page data loading
//!
//! A page asks for its data by logical key. The key is combined with the
//! current route into a composite key (`{path}-{key}`), looked up in the
//! memory store and then in the durable tab data cache, and only fetched
//! when both miss. Fetched values are written through to both tiers.

mod handle;
mod loader;
mod types;


pub use handle::PageData;
pub use loader::{FetchOutcome, PageDataLoader};
pub use types::{DataSource, PageDataState, Tier, TierWrite, WriteReport};
