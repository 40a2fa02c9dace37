//! Error types for the diffusion driver

use spindrift_state::StateError;
use thiserror::Error;

/// Errors that can occur while driving a diffusion run
#[derive(Error, Debug)]
pub enum SimError {
    /// The diffusion loop needs at least one iteration
    #[error("number of iterations must be at least 1")]
    InvalidIterationCount,

    /// Failure inside the state engine
    #[error(transparent)]
    State(#[from] StateError),

    /// Malformed Hamiltonian input
    #[error("line {line}: {msg}")]
    Parse { line: usize, msg: String },

    /// Underlying stream failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for driver operations
pub type Result<T> = std::result::Result<T, SimError>;
