//! Tab registry for the dashboard tab strip
//!
//! Keeps the ordered list of open tabs (oldest first), tracks the active tab
//! and writes the full list to the `browser-tabs` durable key after every
//! mutation. Tab identity is a UUID assigned on creation, so renaming a tab
//! never changes which tab it is.

mod registry;
mod types;


pub use registry::TabRegistry;
pub use types::{AddTabOutcome, NewTab, Tab, TabChange, TabId, TabUpdate};
