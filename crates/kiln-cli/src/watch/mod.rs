//! Change watching: a debounced filesystem watcher and the router that maps
//! changed paths to watch bindings.

mod bindings;
mod watcher;

pub use bindings::{WatchAction, WatchBinding, WatchRouter};
pub use watcher::{FileWatcher, IgnoreRules};
