use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors from loading or validating a scenario.
#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed scenario JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("{entity} {index}: `{field}` is not a finite vector")]
    InvalidVector {
        entity: &'static str,
        index: usize,
        field: &'static str,
    },

    #[error("bullet {index}: `{field}` must be finite and non-negative, got {value}")]
    InvalidTime {
        index: usize,
        field: &'static str,
        value: f32,
    },
}
