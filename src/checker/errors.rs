//! # Checker Errors

use thiserror::Error;

use crate::hasher::HashError;
use crate::index::IndexError;
use crate::wheel::WheelError;

/// Result type for checker operations
pub type CheckerResult<T> = Result<T, CheckerError>;

/// Checker errors
#[derive(Debug, Error)]
pub enum CheckerError {
    #[error("Invalid checker configuration: {0}")]
    InvalidConfig(String),

    #[error("Malformed checker configuration: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Checker I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Worker {0} panicked")]
    WorkerPanicked(usize),

    #[error(transparent)]
    Hash(#[from] HashError),

    #[error(transparent)]
    Wheel(#[from] WheelError),

    #[error(transparent)]
    Index(#[from] IndexError),
}

impl CheckerError {
    pub fn code(&self) -> &'static str {
        match self {
            CheckerError::InvalidConfig(_) => "CHECKER_INVALID_CONFIG",
            CheckerError::Parse(_) => "CHECKER_PARSE_ERROR",
            CheckerError::Io(_) => "CHECKER_IO_ERROR",
            CheckerError::WorkerPanicked(_) => "CHECKER_WORKER_PANICKED",
            CheckerError::Hash(e) => e.code(),
            CheckerError::Wheel(e) => e.code(),
            CheckerError::Index(e) => e.code().code(),
        }
    }
}
