//! Demonstration error types

use thiserror::Error;

use super::ShowPhase;
use crate::array::ArrayError;

/// Errors that stop a demonstration
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ShowError {
    /// An algorithm hit an array error; the remaining phases are skipped
    #[error("{phase} ({algorithm}) stopped prematurely")]
    AlgorithmFailed {
        phase: ShowPhase,
        algorithm: &'static str,
        #[source]
        source: ArrayError,
    },
}

/// Result type for demonstration runs
pub type ShowResult<T> = Result<T, ShowError>;
