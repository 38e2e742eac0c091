//! Application state for the web layer.

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::graph::{MutatorConfig, Network};
use crate::planner::SearchConfig;

/// Shared application state.
///
/// The network sits behind one reader-writer lock: a query holds the read
/// guard for its whole search and so always observes a consistent graph
/// and index; a mutation holds the write guard across validate, apply and
/// index refresh.
#[derive(Clone)]
pub struct AppState {
    /// The graph and its derived index, in lockstep
    pub network: Arc<RwLock<Network>>,

    /// Planner configuration
    pub search: Arc<SearchConfig>,

    /// Mutation configuration
    pub mutator: Arc<MutatorConfig>,
}

impl AppState {
    pub fn new(network: Network, search: SearchConfig, mutator: MutatorConfig) -> Self {
        Self {
            network: Arc::new(RwLock::new(network)),
            search: Arc::new(search),
            mutator: Arc::new(mutator),
        }
    }
}
