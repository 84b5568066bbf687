use crate::pool::{available_workers, DEFAULT_QUEUE_CAPACITY};
use serde::{Deserialize, Serialize};

/// Engine tuning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Worker threads; `None` matches the host's hardware parallelism.
    pub worker_count: Option<usize>,
    /// Bound on jobs queued but not yet picked up by a worker.
    pub queue_capacity: usize,
    /// Stop resolving a tick after this many rounds. `None` never caps; every
    /// round that keeps going destroys a wall, so the loop ends on its own.
    pub max_rounds_per_tick: Option<u32>,
}

impl EngineConfig {
    pub fn with_workers(worker_count: usize) -> Self {
        Self {
            worker_count: Some(worker_count),
            ..Self::default()
        }
    }

    pub fn resolved_worker_count(&self) -> usize {
        self.worker_count.unwrap_or_else(available_workers)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            worker_count: None,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            max_rounds_per_tick: None,
        }
    }
}
