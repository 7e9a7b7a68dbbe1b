//! # Hasher errors

use std::fmt;

use thiserror::Error;

use crate::wheel::WheelError;

/// Result type for hashing operations
pub type HashResult<T> = Result<T, HashError>;

/// Point of the pipeline at which an input length was checked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputStage {
    /// As supplied by the caller
    Raw,
    /// After trimming, case folding and range filtering
    Sanitized,
}

impl fmt::Display for InputStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputStage::Raw => write!(f, "Raw"),
            InputStage::Sanitized => write!(f, "Sanitized"),
        }
    }
}

/// Hashing errors. All of them are scoped to the call that produced them.
#[derive(Debug, Error)]
pub enum HashError {
    #[error("Missing argument: {0} must not be empty")]
    Argument(&'static str),

    #[error("{stage} input length {actual} outside accepted range {min}..={max}")]
    Size {
        stage: InputStage,
        actual: usize,
        min: usize,
        max: usize,
    },

    #[error("Glyph '{0}' is not on the encoding wheel")]
    GlyphNotFound(char),

    #[error("Index {index} does not address a glyph (wheel holds {glyph_count})")]
    IndexOutOfRange { index: usize, glyph_count: usize },

    #[error("Invalid hasher configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Wheel(#[from] WheelError),
}

impl HashError {
    /// Stable error code, used in log lines
    pub fn code(&self) -> &'static str {
        match self {
            HashError::Argument(_) => "HASH_ARGUMENT_ERROR",
            HashError::Size { .. } => "HASH_SIZE_ERROR",
            HashError::GlyphNotFound(_) => "HASH_GLYPH_NOT_FOUND",
            HashError::IndexOutOfRange { .. } => "HASH_INDEX_OUT_OF_RANGE",
            HashError::InvalidConfig(_) => "HASH_INVALID_CONFIG",
            HashError::Wheel(e) => e.code(),
        }
    }

    /// Whether regenerating the input could make the call succeed
    pub fn is_input_error(&self) -> bool {
        matches!(self, HashError::Argument(_) | HashError::Size { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_error_display() {
        let err = HashError::Size {
            stage: InputStage::Sanitized,
            actual: 3,
            min: 11,
            max: 1024,
        };
        let display = err.to_string();
        assert!(display.starts_with("Sanitized input length 3"));
        assert!(display.contains("11..=1024"));
        assert!(err.is_input_error());
    }

    #[test]
    fn test_wheel_error_code_passes_through() {
        let err: HashError = WheelError::InvalidConfig("empty".into()).into();
        assert_eq!(err.code(), "WHEEL_INVALID_CONFIG");
        assert!(!err.is_input_error());
    }
}
