// Application state module
// Shared, read-only runtime state handed to every connection task

use crate::routing::RouteTable;
use crate::store::FilePageStore;

use super::types::Config;

/// Application state
///
/// Built once at startup; nothing here mutates at runtime except the page
/// store snapshot, which manages its own interior locking.
pub struct AppState {
    pub config: Config,
    pub store: FilePageStore,
    pub routes: RouteTable,
}

impl AppState {
    /// Wire up state from configuration. The page store starts empty;
    /// callers run the initial `store.load()` and decide how to report it.
    pub fn new(config: &Config) -> Self {
        Self {
            config: config.clone(),
            store: FilePageStore::new(&config.content.pages_file),
            routes: RouteTable::build(&config.content),
        }
    }
}
