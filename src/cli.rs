//! CLI operations behind the `polyver` binary.
//!
//! - `transform` - read every `*.json` syntax tree under a directory, run
//!   the pipeline, write one file per output unit
//! - `symbols` - read the same input and report the symbol table
//!
//! Inputs are the serde form of [`CompilationUnit`], as produced by an
//! external parser. Files are processed in sorted path order so repeated
//! runs see the same batch.
//!
//! All functions return `Result<T, CliError>`; the binary maps errors to
//! exit codes.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};
use walkdir::WalkDir;

use polyver_ast::codegen::render;
use polyver_ast::CompilationUnit;
use polyver_core::{TransformOptions, Transformer};

use crate::error::CliError;
use crate::output::{FailureInfo, SymbolsResponse, TransformResponse, SCHEMA_VERSION};

/// What `transform` writes for each output unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmitFormat {
    /// Rendered source text.
    #[default]
    Java,
    /// The unit's JSON tree.
    Json,
}

impl EmitFormat {
    pub fn extension(self) -> &'static str {
        match self {
            EmitFormat::Java => "java",
            EmitFormat::Json => "json",
        }
    }
}

/// Read options from a JSON file, or the defaults without one.
pub fn load_options(path: Option<&Path>) -> Result<TransformOptions, CliError> {
    let Some(path) = path else {
        return Ok(TransformOptions::default());
    };
    let text = fs::read_to_string(path).map_err(|e| {
        CliError::invalid_args(format!("cannot read config {}: {}", path.display(), e))
    })?;
    Ok(TransformOptions::from_json(&text)?)
}

/// Every `*.json` file below `dir`, sorted by path.
pub fn collect_inputs(dir: &Path) -> Result<Vec<PathBuf>, CliError> {
    if !dir.is_dir() {
        return Err(CliError::invalid_args(format!(
            "input directory {} does not exist",
            dir.display()
        )));
    }
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.map_err(|e| {
            let path = e.path().map_or_else(|| dir.to_path_buf(), Path::to_path_buf);
            CliError::Read {
                path,
                source: e.into(),
            }
        })?;
        if entry.file_type().is_file() && entry.path().extension().is_some_and(|ext| ext == "json")
        {
            files.push(entry.into_path());
        }
    }
    files.sort();
    Ok(files)
}

/// Parse each file as one compilation unit.
pub fn load_units(files: &[PathBuf]) -> Result<Vec<CompilationUnit>, CliError> {
    files
        .iter()
        .map(|path| {
            let text = fs::read_to_string(path).map_err(|source| CliError::Read {
                path: path.clone(),
                source,
            })?;
            let unit = serde_json::from_str(&text).map_err(|source| CliError::Json {
                path: path.clone(),
                source,
            })?;
            debug!(path = %path.display(), "loaded syntax tree");
            Ok(unit)
        })
        .collect()
}

/// `<PrimaryType>.<ext>`, or `unit<index>.<ext>` for a unit without types.
pub fn output_file_name(unit: &CompilationUnit, index: usize, format: EmitFormat) -> String {
    match unit.primary_type_name() {
        Some(name) => format!("{}.{}", name, format.extension()),
        None => format!("unit{}.{}", index, format.extension()),
    }
}

/// Write every unit into `out_dir`, returning the file names written.
pub fn write_units(
    units: &[CompilationUnit],
    out_dir: &Path,
    format: EmitFormat,
) -> Result<Vec<String>, CliError> {
    fs::create_dir_all(out_dir).map_err(|source| CliError::Write {
        path: out_dir.to_path_buf(),
        source,
    })?;
    let mut written = Vec::with_capacity(units.len());
    for (index, unit) in units.iter().enumerate() {
        let name = output_file_name(unit, index, format);
        let path = out_dir.join(&name);
        let contents = match format {
            EmitFormat::Java => render(unit),
            EmitFormat::Json => {
                serde_json::to_string_pretty(unit).map_err(|e| CliError::internal(e.to_string()))?
            }
        };
        fs::write(&path, contents).map_err(|source| CliError::Write { path, source })?;
        written.push(name);
    }
    Ok(written)
}

/// Run the whole pipeline from `input` to `out_dir`.
///
/// Failed groups do not make this function fail: they are listed in the
/// response, and every unit that did synthesize is still written.
pub fn run_transform(
    input: &Path,
    out_dir: &Path,
    format: EmitFormat,
    options: TransformOptions,
) -> Result<TransformResponse, CliError> {
    let transformer = Transformer::new(options)?;
    let files = collect_inputs(input)?;
    let units = load_units(&files)?;
    info!(inputs = files.len(), input = %input.display(), "loaded input trees");

    let output = transformer.transform(units);
    let digest = output
        .digest()
        .map_err(|e| CliError::internal(e.to_string()))?;
    let written = write_units(&output.units, out_dir, format)?;
    info!(written = written.len(), out_dir = %out_dir.display(), "wrote output");

    let status = if output.is_success() { "ok" } else { "error" };
    Ok(TransformResponse {
        status: status.to_string(),
        schema_version: SCHEMA_VERSION.to_string(),
        inputs: files.len(),
        written,
        failures: output.failures.iter().map(FailureInfo::from).collect(),
        digest: digest.to_string(),
        stats: output.stats,
    })
}

/// Build the symbol table of every tree under `input`.
pub fn run_symbols(input: &Path, options: TransformOptions) -> Result<SymbolsResponse, CliError> {
    let transformer = Transformer::new(options)?;
    let files = collect_inputs(input)?;
    let units = load_units(&files)?;
    Ok(SymbolsResponse {
        status: "ok".to_string(),
        schema_version: SCHEMA_VERSION.to_string(),
        symbols: transformer.symbols(&units),
    })
}
