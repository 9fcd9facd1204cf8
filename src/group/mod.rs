//! Group Module
//!
//! Named cache namespaces, the registry that holds them and the loader
//! interface they fall back to.

mod loader;
mod orchestrator;
mod registry;
mod stats;

pub use loader::{loader_fn, Loader, LoaderFn};
pub use orchestrator::Group;
pub use registry::GroupRegistry;
pub use stats::{GroupStats, GroupStatsSnapshot};
