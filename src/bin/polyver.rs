//! Binary entry point for the polyver CLI.
//!
//! ## Usage
//!
//! ```bash
//! # Transform every syntax tree under trees/ and write Java sources to out/
//! polyver transform trees/ --out out/
//!
//! # Write JSON trees instead, with custom reserved names
//! polyver --config polyver.json transform trees/ --out out/ --emit json
//!
//! # Dump the symbol table
//! polyver symbols trees/
//! ```
//!
//! Every command prints one JSON document on stdout. Logs go to stderr.

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};

use polyver::cli::{load_options, run_symbols, run_transform, EmitFormat};
use polyver::error::CliError;
use polyver::output::{emit_response, ErrorResponse};

// ============================================================================
// CLI Structure
// ============================================================================

/// Merge versioned type declarations into runtime-switchable types.
#[derive(Parser, Debug)]
#[command(name = "polyver", version, about)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,
    #[command(subcommand)]
    command: Command,
}

/// Global arguments shared by all subcommands.
#[derive(Parser, Debug)]
struct GlobalArgs {
    /// Log level for tracing output.
    #[arg(long, global = true, value_enum, default_value = "warn")]
    log_level: LogLevel,

    /// JSON file with transformation options (reserved names, separator).
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

/// Log level for tracing output.
#[derive(Clone, Copy, Debug, ValueEnum)]
enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    fn to_tracing_level(self) -> tracing::Level {
        match self {
            LogLevel::Trace => tracing::Level::TRACE,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Error => tracing::Level::ERROR,
        }
    }
}

/// Output format for transformed units.
#[derive(Clone, Copy, Debug, ValueEnum)]
enum Emit {
    /// Rendered source files.
    Java,
    /// JSON syntax trees.
    Json,
}

impl From<Emit> for EmitFormat {
    fn from(emit: Emit) -> Self {
        match emit {
            Emit::Java => EmitFormat::Java,
            Emit::Json => EmitFormat::Json,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Transform a directory of JSON syntax trees.
    Transform {
        /// Directory searched recursively for `*.json` trees.
        input: PathBuf,
        /// Directory the output units are written to.
        #[arg(long)]
        out: PathBuf,
        /// What to write for each output unit.
        #[arg(long, value_enum, default_value_t = Emit::Java)]
        emit: Emit,
    },
    /// Print the symbol table of a directory of JSON syntax trees.
    Symbols {
        /// Directory searched recursively for `*.json` trees.
        input: PathBuf,
    },
}

// ============================================================================
// Main Entry Point
// ============================================================================

fn main() -> ExitCode {
    let cli = Cli::parse();

    init_tracing(cli.global.log_level);

    match execute(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "command failed");
            // A transform with failed groups has already printed its summary.
            if !matches!(err, CliError::SynthesisFailed { .. }) {
                let response = ErrorResponse::from_error(&err);
                let _ = emit_response(&response, &mut io::stdout());
            }
            let _ = io::stdout().flush();
            ExitCode::from(err.error_code().code())
        }
    }
}

/// Initialize tracing subscriber.
fn init_tracing(level: LogLevel) {
    use tracing_subscriber::fmt::format::FmtSpan;
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.to_tracing_level().to_string()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_span_events(FmtSpan::CLOSE)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

/// Execute the CLI command.
fn execute(cli: Cli) -> Result<(), CliError> {
    let options = load_options(cli.global.config.as_deref())?;
    match cli.command {
        Command::Transform { input, out, emit } => {
            let response = run_transform(&input, &out, emit.into(), options)?;
            emit_response(&response, &mut io::stdout())
                .map_err(|e| CliError::internal(e.to_string()))?;
            if response.failures.is_empty() {
                Ok(())
            } else {
                Err(CliError::SynthesisFailed {
                    base_names: response
                        .failures
                        .into_iter()
                        .map(|f| f.base_name)
                        .collect(),
                })
            }
        }
        Command::Symbols { input } => {
            let response = run_symbols(&input, options)?;
            emit_response(&response, &mut io::stdout())
                .map_err(|e| CliError::internal(e.to_string()))
        }
    }
}
