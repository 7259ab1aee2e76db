//! Error types and exit codes for the polyver CLI.
//!
//! ## Error Code Mapping
//!
//! - `2`: Invalid arguments (bad flags, unreadable or invalid configuration)
//! - `3`: Input errors (unreadable input file, malformed syntax tree JSON)
//! - `4`: Synthesis failed for at least one versioned group
//! - `10`: Internal errors (failed to write output, unexpected state)

use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

use polyver_core::{ConfigError, SynthesisError};

// ============================================================================
// Output Error Codes
// ============================================================================

/// Error codes for JSON output, also used as process exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum OutputErrorCode {
    /// Invalid arguments from caller.
    InvalidArguments = 2,
    /// An input file could not be read or parsed.
    InputError = 3,
    /// One or more versioned groups failed to synthesize.
    SynthesisFailed = 4,
    /// Internal errors (bugs, unexpected state, output I/O).
    InternalError = 10,
}

impl OutputErrorCode {
    /// Get the numeric code value.
    pub fn code(&self) -> u8 {
        *self as u8
    }
}

impl fmt::Display for OutputErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

// ============================================================================
// Unified Error Type
// ============================================================================

/// Every failure the CLI reports.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("invalid arguments: {message}")]
    InvalidArguments { message: String },

    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("cannot read {}: {}", .path.display(), .source)]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid syntax tree in {}: {}", .path.display(), .source)]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("cannot write {}: {}", .path.display(), .source)]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{} group(s) failed to synthesize: {}", .base_names.len(), .base_names.join(", "))]
    SynthesisFailed { base_names: Vec<String> },

    #[error("internal error: {message}")]
    Internal { message: String },
}

impl CliError {
    pub fn invalid_args(message: impl Into<String>) -> Self {
        CliError::InvalidArguments {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        CliError::Internal {
            message: message.into(),
        }
    }

    /// The error reporting every failed group of a run.
    pub fn synthesis_failed(failures: &[SynthesisError]) -> Self {
        CliError::SynthesisFailed {
            base_names: failures.iter().map(|f| f.base_name().to_string()).collect(),
        }
    }

    /// Get the error code for this error.
    pub fn error_code(&self) -> OutputErrorCode {
        OutputErrorCode::from(self)
    }
}

impl From<&CliError> for OutputErrorCode {
    fn from(err: &CliError) -> Self {
        match err {
            CliError::InvalidArguments { .. } => OutputErrorCode::InvalidArguments,
            CliError::Config(_) => OutputErrorCode::InvalidArguments,
            CliError::Read { .. } => OutputErrorCode::InputError,
            CliError::Json { .. } => OutputErrorCode::InputError,
            CliError::SynthesisFailed { .. } => OutputErrorCode::SynthesisFailed,
            CliError::Write { .. } => OutputErrorCode::InternalError,
            CliError::Internal { .. } => OutputErrorCode::InternalError,
        }
    }
}
