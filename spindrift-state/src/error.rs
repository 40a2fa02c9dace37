//! Error types for the sparse-state engine

use thiserror::Error;

/// Errors that can occur in sparse-state operations
#[derive(Error, Debug)]
pub enum StateError {
    /// `soft_max` below the minimum useful size
    #[error("`soft_max` must be at least 2, but got {0}")]
    InvalidSoftMax(usize),

    /// `hard_max` must be a positive allocation hint
    #[error("`hard_max` must be positive")]
    InvalidHardMax,

    /// Shard routing uses the first configuration byte, which caps the count
    #[error("shard count must be a power of two not exceeding 256, but got {0}")]
    InvalidShardCount(usize),

    /// Normalizing a state with no weight
    #[error("cannot normalize a state with zero total weight")]
    ZeroNorm,

    /// Building a weighted sampler from an empty distribution
    #[error("cannot sample: all weights are zero")]
    ZeroWeights,

    /// Malformed state input
    #[error("line {line}: {msg}")]
    Parse { line: usize, msg: String },

    /// Underlying stream failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A shard worker died; the builder session is lost
    #[error("shard worker panicked")]
    WorkerPanicked,

    /// Stopping an updater that has no running worker
    #[error("shard updater is not running")]
    UpdaterNotRunning,
}

/// Result type for sparse-state operations
pub type Result<T> = std::result::Result<T, StateError>;
