use crate::pool::PoolError;
use thiserror::Error;

/// Errors reported by `Engine`.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("tick delta must be finite and non-negative, got {0}")]
    InvalidDelta(f32),

    #[error("engine state is poisoned: a previous tick panicked")]
    Poisoned,

    #[error(transparent)]
    Pool(#[from] PoolError),
}
