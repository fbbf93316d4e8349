//! CLI-specific error types and mappings.
//!
//! Maps core and provider errors to exit codes and user-facing messages.

use aigate_ark::ArkError;
use aigate_core::CoreError;
use thiserror::Error;

/// CLI-specific error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Bad function name or empty content.
    #[error("Invalid arguments: {0}")]
    Arguments(String),

    /// Missing credential or unusable settings.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The provider call failed.
    #[error("Provider error: {0}")]
    Provider(String),

    /// Writing to the terminal failed.
    #[error("IO error: {0}")]
    Io(String),
}

impl CliError {
    /// Map error to an exit code.
    ///
    /// Codes follow sysexits.h. Errors that are not a `CliError` exit with 1.
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Arguments(_) => 2, // EX_USAGE
            Self::Provider(_) => 69, // EX_UNAVAILABLE
            Self::Io(_) => 74,       // EX_IOERR
            Self::Config(_) => 78,   // EX_CONFIG
        }
    }
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::UnsupportedFunction(_) | CoreError::Validation(_) => {
                Self::Arguments(err.to_string())
            }
            CoreError::Provider(e) => Self::Provider(e.to_string()),
        }
    }
}

impl From<ArkError> for CliError {
    fn from(err: ArkError) -> Self {
        match err {
            ArkError::MissingApiKey | ArkError::ZeroTimeout => Self::Config(err.to_string()),
            other => Self::Provider(other.to_string()),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}
