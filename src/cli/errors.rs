//! CLI-specific error types
//!
//! Every CLI error ends the process with a non-zero exit code.

use std::fmt;
use std::io;

use crate::checker::CheckerError;
use crate::hasher::HashError;
use crate::wheel::WheelError;

/// CLI error codes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliErrorCode {
    /// Configuration file missing or malformed
    ConfigError,
    /// stdin/stdout or file I/O failed
    IoError,
    /// Hashing rejected the input
    HashError,
    /// Wheel could not be loaded, built or saved
    WheelError,
    /// Collision checker failed
    CheckerError,
}

impl CliErrorCode {
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfigError => "CLI_CONFIG_ERROR",
            Self::IoError => "CLI_IO_ERROR",
            Self::HashError => "CLI_HASH_ERROR",
            Self::WheelError => "CLI_WHEEL_ERROR",
            Self::CheckerError => "CLI_CHECKER_ERROR",
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    code: CliErrorCode,
    message: String,
}

impl CliError {
    pub fn new(code: CliErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::ConfigError, msg)
    }

    pub fn io_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::IoError, msg)
    }

    pub fn code(&self) -> &CliErrorCode {
        &self.code
    }

    pub fn code_str(&self) -> &'static str {
        self.code.code()
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for CliError {}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        Self::io_error(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::config_error(format!("JSON error: {}", e))
    }
}

impl From<HashError> for CliError {
    fn from(e: HashError) -> Self {
        Self::new(CliErrorCode::HashError, format!("[{}] {}", e.code(), e))
    }
}

impl From<WheelError> for CliError {
    fn from(e: WheelError) -> Self {
        Self::new(CliErrorCode::WheelError, format!("[{}] {}", e.code(), e))
    }
}

impl From<CheckerError> for CliError {
    fn from(e: CheckerError) -> Self {
        Self::new(CliErrorCode::CheckerError, format!("[{}] {}", e.code(), e))
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;
