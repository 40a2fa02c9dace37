//! Error types for configuration and parsing operations

use thiserror::Error;

/// Errors produced when constructing or parsing spin configurations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// Configuration exceeds the packed width
    #[error("configuration has {got} spins, but at most {max} are supported")]
    TooManySpins { got: usize, max: usize },

    /// Character other than '0'/'1' in a spin string
    #[error("allowed spin values are '0' and '1', but got '{0}'")]
    InvalidSpinChar(char),

    /// Trailing input after a complete spin configuration
    #[error("unexpected trailing input \"{0}\" after a spin configuration")]
    TrailingInput(String),

    /// Reached end of input while a specific character was expected
    #[error("expected '{expected}', but reached the end of input")]
    UnexpectedEnd { expected: char },

    /// A specific character was expected but something else was found
    #[error("expected '{expected}', but got '{got}'")]
    UnexpectedChar { expected: char, got: char },

    /// An integer was expected
    #[error("expected an integer, but got \"{0}\"")]
    ExpectedInteger(String),

    /// A floating-point number was expected
    #[error("expected a number, but got \"{0}\"")]
    ExpectedNumber(String),
}

/// Result type for configuration and parsing operations
pub type Result<T> = std::result::Result<T, CoreError>;
