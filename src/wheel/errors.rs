//! # Encoding wheel errors

use thiserror::Error;

/// Result type for encoding wheel operations
pub type WheelResult<T> = Result<T, WheelError>;

/// Encoding wheel errors
#[derive(Debug, Error)]
pub enum WheelError {
    #[error("Glyph index {index} is outside the wheel (0..{glyph_count})")]
    IndexOutOfRange { index: usize, glyph_count: usize },

    #[error("Invalid wheel configuration: {0}")]
    InvalidConfig(String),

    #[error("Malformed wheel document: {0}")]
    Deserialization(String),

    #[error("Wheel I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

impl WheelError {
    /// Stable error code, used in log lines
    pub fn code(&self) -> &'static str {
        match self {
            WheelError::IndexOutOfRange { .. } => "WHEEL_INDEX_OUT_OF_RANGE",
            WheelError::InvalidConfig(_) => "WHEEL_INVALID_CONFIG",
            WheelError::Deserialization(_) => "WHEEL_DESERIALIZATION_FAILED",
            WheelError::Io(_) => "WHEEL_IO_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes() {
        let err = WheelError::IndexOutOfRange {
            index: 40,
            glyph_count: 32,
        };
        assert_eq!(err.code(), "WHEEL_INDEX_OUT_OF_RANGE");
        assert!(err.to_string().contains("40"));
        assert_eq!(
            WheelError::Deserialization("x".into()).code(),
            "WHEEL_DESERIALIZATION_FAILED"
        );
    }
}
