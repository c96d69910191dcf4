//! Errors raised by the terrain pipeline.

use thiserror::Error;

/// Reasons a terrain generation request cannot run.
#[derive(Debug, Error)]
pub enum TerrainError {
    /// A heightfield needs at least one cell on each axis.
    #[error("invalid heightfield dimensions {width}x{height} (both must be >= 1)")]
    InvalidDimensions { width: usize, height: usize },

    /// A tuning parameter is outside the range the pipeline accepts.
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    /// The background worker thread could not be started.
    #[error("failed to spawn terrain worker: {0}")]
    Worker(#[from] std::io::Error),

    /// A background run panicked before producing terrain.
    #[error("terrain generation panicked: {0}")]
    Panicked(String),
}

impl TerrainError {
    pub(crate) fn parameter(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}
