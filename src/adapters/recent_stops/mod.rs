//! Recent stop adapters.

mod in_memory;

pub use in_memory::{InMemoryRecentStopStore, DEFAULT_RECENT_STOP_CAPACITY};
