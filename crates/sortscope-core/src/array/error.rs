//! Instrumented array error types

use thiserror::Error;

/// Errors that can occur during array access
///
/// Index failures are the only recoverable condition of the array layer;
/// algorithms treat any of them as "stop the algorithm".
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrayError {
    /// Index at or past the end of the array
    #[error("Index {index} out of range for array of length {len}")]
    IndexOutOfRange { index: usize, len: usize },
}

/// Result type for array operations
pub type ArrayResult<T> = Result<T, ArrayError>;
