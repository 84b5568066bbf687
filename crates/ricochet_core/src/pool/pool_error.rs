use std::io;
use thiserror::Error;

/// Errors raised while building or submitting work to a `WorkerPool`.
#[derive(Debug, Error)]
pub enum PoolError {
    #[error("worker pool needs at least one worker")]
    ZeroWorkers,

    #[error("worker pool queue capacity must be non-zero")]
    ZeroCapacity,

    #[error("failed to spawn worker thread {index}")]
    Spawn {
        index: usize,
        #[source]
        source: io::Error,
    },

    #[error("worker pool has been shut down")]
    ShutDown,
}
