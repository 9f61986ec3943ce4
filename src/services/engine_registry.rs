//! Registry mapping engines to their adapter implementations.
//!
//! Adding an engine means registering a new adapter here; chain and router
//! control flow never changes.

use std::collections::HashMap;
use std::sync::Arc;

use crate::domain::ports::EngineAdapter;
use crate::domain::models::Engine;

/// Open, pluggable set of execution backends keyed by engine.
#[derive(Default, Clone)]
pub struct EngineRegistry {
    adapters: HashMap<Engine, Arc<dyn EngineAdapter>>,
}

impl EngineRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an adapter under the engine it reports. Replaces any
    /// previous registration for that engine.
    pub fn register(&mut self, adapter: Arc<dyn EngineAdapter>) {
        self.adapters.insert(adapter.engine(), adapter);
    }

    pub fn adapter(&self, engine: Engine) -> Option<Arc<dyn EngineAdapter>> {
        self.adapters.get(&engine).cloned()
    }

    pub fn is_registered(&self, engine: Engine) -> bool {
        self.adapters.contains_key(&engine)
    }
}
