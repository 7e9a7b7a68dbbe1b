//! Index error types
//!
//! Error codes:
//! - INDEX_NOT_FOUND: exact-match operation on an absent record or address
//! - INDEX_INVALID_CONFIG: index cannot be built from the given config
//!
//! Lookup misses (`contains_*`, `find_*`, `get`) are not errors.

use std::fmt;

/// Index-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexErrorCode {
    NotFound,
    InvalidConfig,
}

impl IndexErrorCode {
    pub fn code(&self) -> &'static str {
        match self {
            IndexErrorCode::NotFound => "INDEX_NOT_FOUND",
            IndexErrorCode::InvalidConfig => "INDEX_INVALID_CONFIG",
        }
    }
}

impl fmt::Display for IndexErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Index error with code, message and the address involved, if any
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexError {
    code: IndexErrorCode,
    message: String,
    address: Option<u64>,
}

impl IndexError {
    /// No live record sits at `address`
    pub fn address_not_found(address: u64) -> Self {
        Self {
            code: IndexErrorCode::NotFound,
            message: format!("no record at address {}", address),
            address: Some(address),
        }
    }

    /// The (key, value) pair is not stored
    pub fn record_not_found() -> Self {
        Self {
            code: IndexErrorCode::NotFound,
            message: "record is not in the index".to_string(),
            address: None,
        }
    }

    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self {
            code: IndexErrorCode::InvalidConfig,
            message: reason.into(),
            address: None,
        }
    }

    pub fn code(&self) -> IndexErrorCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn address(&self) -> Option<u64> {
        self.address
    }

    pub fn is_not_found(&self) -> bool {
        self.code == IndexErrorCode::NotFound
    }
}

impl fmt::Display for IndexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for IndexError {}

/// Result type for index operations
pub type IndexResult<T> = Result<T, IndexError>;
