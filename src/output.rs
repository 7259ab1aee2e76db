//! JSON output types for CLI responses.
//!
//! Every command prints exactly one JSON document on stdout. Successful
//! runs print the command's response; failures print an [`ErrorResponse`].

use std::io::{self, Write};

use serde::Serialize;

use polyver_core::{RewriteStats, SymbolTable, SynthesisError};

use crate::error::CliError;

/// Schema version for compatibility.
pub const SCHEMA_VERSION: &str = "1";

/// A group that failed to synthesize.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailureInfo {
    pub base_name: String,
    pub message: String,
}

impl From<&SynthesisError> for FailureInfo {
    fn from(err: &SynthesisError) -> Self {
        FailureInfo {
            base_name: err.base_name().to_string(),
            message: err.to_string(),
        }
    }
}

/// Response for `polyver transform`.
#[derive(Debug, Clone, Serialize)]
pub struct TransformResponse {
    /// "ok" when every group synthesized, "error" otherwise.
    pub status: String,
    pub schema_version: String,
    /// Input files read, in processing order.
    pub inputs: usize,
    /// Output files written, relative to the output directory.
    pub written: Vec<String>,
    pub failures: Vec<FailureInfo>,
    /// SHA-256 of the JSON form of all output units.
    pub digest: String,
    pub stats: RewriteStats,
}

/// Response for `polyver symbols`.
#[derive(Debug, Clone, Serialize)]
pub struct SymbolsResponse {
    pub status: String,
    pub schema_version: String,
    pub symbols: SymbolTable,
}

/// Error information.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorInfo {
    /// Numeric error code, equal to the exit code.
    pub code: u8,
    /// Human-readable message.
    pub message: String,
}

impl ErrorInfo {
    pub fn from_error(err: &CliError) -> Self {
        ErrorInfo {
            code: err.error_code().code(),
            message: err.to_string(),
        }
    }
}

/// Response printed when a command fails before producing its own response.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub status: String,
    pub schema_version: String,
    pub error: ErrorInfo,
}

impl ErrorResponse {
    pub fn from_error(err: &CliError) -> Self {
        ErrorResponse {
            status: "error".to_string(),
            schema_version: SCHEMA_VERSION.to_string(),
            error: ErrorInfo::from_error(err),
        }
    }
}

/// Emit a response as pretty-printed JSON to a writer.
pub fn emit_response<T: Serialize>(response: &T, writer: &mut impl Write) -> io::Result<()> {
    let json = serde_json::to_string_pretty(response)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    writeln!(writer, "{}", json)
}
